//! Turn processor that connects the access gate to the provider router.

use std::sync::Arc;

use gatekeeper::{AccessController, AccessOutcome, GatekeeperError};
use provider_core::Message;
use provider_router::{ProviderOptions, ProviderRouter};
use storage::{config, principal, Database, StorageError};
use thiserror::Error;
use tracing::{error, info};

/// Fallback user text when a turn carries only an image.
const DEFAULT_IMAGE_PROMPT: &str = "What is in this image?";

/// Errors that can occur while handling a turn.
#[derive(Debug, Error)]
pub enum RelayError {
    /// Error from the document store.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Error from the access controller.
    #[error("gatekeeper error: {0}")]
    Gatekeeper(#[from] GatekeeperError),
}

/// Reply produced for one inbound turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnReply {
    /// Nothing should be sent back.
    Silent,
    /// Plain text to send back to the sender.
    Text(String),
}

/// Handles one inbound turn at a time: authorization first, then at most
/// one chat dispatch.
///
/// The relay is stateless between turns. Every dispatch carries the system
/// prompt plus the single current user turn; prior turns are never replayed.
pub struct RelayProcessor {
    db: Database,
    gate: AccessController,
    router: Arc<ProviderRouter>,
}

impl RelayProcessor {
    /// Create a processor over the given store and router.
    pub fn new(db: Database, router: Arc<ProviderRouter>) -> Self {
        let gate = AccessController::new(db.clone());
        Self { db, gate, router }
    }

    /// Get a reference to the router.
    pub fn router(&self) -> &ProviderRouter {
        &self.router
    }

    /// Handle one inbound turn and produce a reply.
    ///
    /// A turn with no text and no usable image is a silent no-op; an image
    /// alone counts only for an already-authorized sender.
    pub async fn handle_turn(
        &self,
        user_id: i64,
        display_name: &str,
        text: Option<&str>,
        image_base64: Option<String>,
    ) -> Result<TurnReply, RelayError> {
        let pool = self.db.pool();

        if text.is_none()
            && (image_base64.is_none() || !principal::is_authorized(pool, user_id).await?)
        {
            return Ok(TurnReply::Silent);
        }

        let text = text.unwrap_or("");

        match self.gate.authorize(user_id, display_name, text).await? {
            AccessOutcome::GrantedUser => Ok(TurnReply::Text(
                "Password accepted! You are now authorized to use this bot.".to_string(),
            )),
            AccessOutcome::GrantedAdmin => Ok(TurnReply::Text(
                "Admin Access Granted! You can now control models and users.".to_string(),
            )),
            AccessOutcome::GrantedByInvite { is_admin } => {
                let role_msg = if is_admin {
                    "Admin Access Granted!"
                } else {
                    "Invite accepted!"
                };
                Ok(TurnReply::Text(format!(
                    "{} You are now authorized to use this bot.",
                    role_msg
                )))
            }
            AccessOutcome::PromotedToAdmin => {
                Ok(TurnReply::Text("You are now an admin.".to_string()))
            }
            AccessOutcome::Denied => Ok(TurnReply::Text(
                "Access denied. Please enter the correct password.".to_string(),
            )),
            AccessOutcome::AlreadyAuthorized => {
                self.dispatch_chat(user_id, text, image_base64).await
            }
        }
    }

    /// Send the single current turn to the configured backend.
    async fn dispatch_chat(
        &self,
        user_id: i64,
        text: &str,
        image_base64: Option<String>,
    ) -> Result<TurnReply, RelayError> {
        let pool = self.db.pool();

        let model = config::get_or_default(pool, "model").await?;
        let system_prompt = config::get_or_default(pool, "system_prompt").await?;
        let provider_name = config::get_or_default(pool, "ai_provider").await?;

        // Per-provider base URL lives under "<provider>_url".
        let options = match config::get(pool, &format!("{}_url", provider_name)).await? {
            Some(url) => ProviderOptions::with_base_url(url),
            None => ProviderOptions::default(),
        };
        self.router.ensure_configured(&provider_name, options).await;

        let user_text = if text.is_empty() && image_base64.is_some() {
            DEFAULT_IMAGE_PROMPT
        } else {
            text
        };
        let user_message = match image_base64 {
            Some(image) => Message::user_with_image(user_text, image),
            None => Message::user(user_text),
        };
        let messages = [Message::system(system_prompt), user_message];

        info!(
            "Dispatching turn for {} via {} with model {}",
            user_id, provider_name, model
        );

        match self
            .router
            .chat(&messages, &model, Some(&provider_name))
            .await
        {
            Ok(response) => {
                if response.text.is_empty() {
                    Ok(TurnReply::Text(format!(
                        "{} returned an empty response.",
                        provider_name
                    )))
                } else {
                    Ok(TurnReply::Text(response.text))
                }
            }
            Err(e) => {
                error!("Provider error for {}: {}", user_id, e);
                Ok(TurnReply::Text(format!(
                    "Error communicating with the AI backend: {}",
                    e
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_processor() -> (RelayProcessor, Database) {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.init().await.unwrap();
        let router = Arc::new(ProviderRouter::new());
        (RelayProcessor::new(db.clone(), router), db)
    }

    #[tokio::test]
    async fn test_empty_turn_is_silent() {
        let (relay, _db) = test_processor().await;

        let reply = relay.handle_turn(111, "Alice", None, None).await.unwrap();
        assert_eq!(reply, TurnReply::Silent);
    }

    #[tokio::test]
    async fn test_image_only_from_stranger_is_silent() {
        let (relay, _db) = test_processor().await;

        let reply = relay
            .handle_turn(111, "Alice", None, Some("QUJD".to_string()))
            .await
            .unwrap();
        assert_eq!(reply, TurnReply::Silent);
    }

    #[tokio::test]
    async fn test_access_secret_turn_authorizes() {
        let (relay, db) = test_processor().await;

        let reply = relay
            .handle_turn(111, "Alice", Some("secret"), None)
            .await
            .unwrap();
        assert_eq!(
            reply,
            TurnReply::Text("Password accepted! You are now authorized to use this bot.".to_string())
        );
        assert!(principal::is_authorized(db.pool(), 111).await.unwrap());
    }

    #[tokio::test]
    async fn test_wrong_secret_turn_denied() {
        let (relay, db) = test_processor().await;

        let reply = relay
            .handle_turn(111, "Alice", Some("wrong"), None)
            .await
            .unwrap();
        assert_eq!(
            reply,
            TurnReply::Text("Access denied. Please enter the correct password.".to_string())
        );
        assert!(!principal::is_authorized(db.pool(), 111).await.unwrap());
    }

    #[tokio::test]
    async fn test_invite_turn_and_replay() {
        let (relay, db) = test_processor().await;

        let code = storage::invite::create(db.pool(), true).await.unwrap();
        let reply = relay
            .handle_turn(222, "Carol", Some(&code), None)
            .await
            .unwrap();
        assert_eq!(
            reply,
            TurnReply::Text("Admin Access Granted! You are now authorized to use this bot.".to_string())
        );
        assert!(principal::is_admin(db.pool(), 222).await.unwrap());

        // The code is consumed: a second identity replaying it is denied.
        let reply = relay
            .handle_turn(333, "Mallory", Some(&code), None)
            .await
            .unwrap();
        assert_eq!(
            reply,
            TurnReply::Text("Access denied. Please enter the correct password.".to_string())
        );
    }

    #[tokio::test]
    async fn test_admin_secret_promotes_authorized_user() {
        let (relay, db) = test_processor().await;

        relay
            .handle_turn(111, "Alice", Some("secret"), None)
            .await
            .unwrap();
        let reply = relay
            .handle_turn(111, "Alice", Some("admin"), None)
            .await
            .unwrap();

        assert_eq!(reply, TurnReply::Text("You are now an admin.".to_string()));
        assert!(principal::is_admin(db.pool(), 111).await.unwrap());
    }

    #[tokio::test]
    async fn test_chat_turn_surfaces_backend_failure() {
        let (relay, db) = test_processor().await;

        // Point the configured provider at a dead port.
        storage::config::set(db.pool(), "ai_provider", "ollama")
            .await
            .unwrap();
        storage::config::set(db.pool(), "ollama_url", "http://127.0.0.1:9")
            .await
            .unwrap();

        relay
            .handle_turn(111, "Alice", Some("secret"), None)
            .await
            .unwrap();
        let reply = relay
            .handle_turn(111, "Alice", Some("hello"), None)
            .await
            .unwrap();

        match reply {
            TurnReply::Text(text) => {
                assert!(text.starts_with("Error communicating with the AI backend"), "{}", text);
            }
            TurnReply::Silent => panic!("expected an error reply"),
        }
    }

    #[tokio::test]
    async fn test_chat_turn_applies_configured_base_url() {
        let (relay, db) = test_processor().await;

        storage::config::set(db.pool(), "ai_provider", "ollama")
            .await
            .unwrap();
        storage::config::set(db.pool(), "ollama_url", "http://127.0.0.1:9")
            .await
            .unwrap();

        relay
            .handle_turn(111, "Alice", Some("secret"), None)
            .await
            .unwrap();
        relay
            .handle_turn(111, "Alice", Some("hello"), None)
            .await
            .unwrap();

        // The dispatch configured the router from the stored URL.
        assert!(relay.router().list_configured().await.contains(&"ollama"));
    }
}
