//! Runtime-tunable settings stored in the `config` collection.
//!
//! A missing key is never an error; reads fall back to the built-in default
//! for that key.

use serde_json::Value;
use sqlx::SqlitePool;

use crate::document;
use crate::error::Result;

/// Collection holding config entries.
pub const COLLECTION: &str = "config";

/// Known keys and their defaults.
pub const DEFAULTS: &[(&str, &str)] = &[
    ("model", "local-model"),
    ("system_prompt", "You are a helpful assistant."),
    ("lm_studio_url", "http://127.0.0.1:1234/v1"),
    ("ollama_url", "http://127.0.0.1:11434"),
    ("ai_provider", "lm_studio"),
    ("access_password", "secret"),
    ("webui_password", "admin"),
    ("secret_key", "super-secret-key-change-me"),
    ("bot_token", ""),
];

/// Keys written at first boot so the admin UI has something to show.
/// Secrets stay out of the store until an admin sets them explicitly.
const SEEDED: &[&str] = &[
    "model",
    "system_prompt",
    "lm_studio_url",
    "ollama_url",
    "ai_provider",
];

/// The built-in default for a known key.
pub fn default_for(key: &str) -> Option<&'static str> {
    DEFAULTS
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, v)| *v)
}

fn value_to_string(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

/// Fetch a setting, or `None` when unset.
pub async fn get(pool: &SqlitePool, key: &str) -> Result<Option<String>> {
    Ok(document::get(pool, COLLECTION, key)
        .await?
        .map(value_to_string))
}

/// Fetch a setting with an explicit fallback.
pub async fn get_or(pool: &SqlitePool, key: &str, default: &str) -> Result<String> {
    Ok(get(pool, key).await?.unwrap_or_else(|| default.to_string()))
}

/// Fetch a setting, falling back to the built-in default for its key.
pub async fn get_or_default(pool: &SqlitePool, key: &str) -> Result<String> {
    get_or(pool, key, default_for(key).unwrap_or("")).await
}

/// Set a setting, creating or overwriting it.
pub async fn set(pool: &SqlitePool, key: &str, value: &str) -> Result<()> {
    document::put(pool, COLLECTION, key, &Value::String(value.to_string())).await
}

/// Write first-boot defaults for keys that are still absent.
pub async fn seed_defaults(pool: &SqlitePool) -> Result<()> {
    for key in SEEDED {
        let default = default_for(key).unwrap_or("");
        document::put_if_absent(pool, COLLECTION, key, &Value::String(default.to_string()))
            .await?;
    }
    Ok(())
}
