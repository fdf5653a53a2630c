//! Generic document operations over the shared envelope table.
//!
//! Every function takes a `SqliteExecutor`, so callers can run a sequence of
//! operations inside one transaction when a read-modify-write must be atomic.
//! Passing the pool directly gives the usual acquire-per-call behavior.

use serde_json::{Map, Value};
use sqlx::{SqlitePool, SqliteExecutor};

use crate::error::{Result, StorageError};
use crate::models::DocumentRow;

fn parse_value(collection: &str, raw: &str) -> Result<Value> {
    serde_json::from_str(raw).map_err(|source| StorageError::Malformed {
        collection: collection.to_string(),
        source,
    })
}

/// Upsert a document, overwriting its value and refreshing `updated_at`.
pub async fn put<'e, E>(exec: E, collection: &str, key: &str, value: &Value) -> Result<()>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query(
        r#"
        INSERT INTO documents (collection, key, value)
        VALUES (?, ?, ?)
        ON CONFLICT(collection, key)
        DO UPDATE SET value = excluded.value, updated_at = datetime('now')
        "#,
    )
    .bind(collection)
    .bind(key)
    .bind(value.to_string())
    .execute(exec)
    .await?;

    Ok(())
}

/// Insert a document only when the key is absent. Returns true if inserted.
pub async fn put_if_absent<'e, E>(
    exec: E,
    collection: &str,
    key: &str,
    value: &Value,
) -> Result<bool>
where
    E: SqliteExecutor<'e>,
{
    let result = sqlx::query(
        r#"
        INSERT INTO documents (collection, key, value)
        VALUES (?, ?, ?)
        ON CONFLICT(collection, key) DO NOTHING
        "#,
    )
    .bind(collection)
    .bind(key)
    .bind(value.to_string())
    .execute(exec)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Fetch a document's value, or `None` when the key is absent.
pub async fn get<'e, E>(exec: E, collection: &str, key: &str) -> Result<Option<Value>>
where
    E: SqliteExecutor<'e>,
{
    let raw = sqlx::query_scalar::<_, String>(
        r#"
        SELECT value FROM documents
        WHERE collection = ? AND key = ?
        "#,
    )
    .bind(collection)
    .bind(key)
    .fetch_optional(exec)
    .await?;

    match raw {
        Some(raw) => Ok(Some(parse_value(collection, &raw)?)),
        None => Ok(None),
    }
}

/// Delete a document. Returns true iff a row existed.
pub async fn delete<'e, E>(exec: E, collection: &str, key: &str) -> Result<bool>
where
    E: SqliteExecutor<'e>,
{
    let result = sqlx::query(
        r#"
        DELETE FROM documents
        WHERE collection = ? AND key = ?
        "#,
    )
    .bind(collection)
    .bind(key)
    .execute(exec)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// List every document in a collection.
pub async fn list_all<'e, E>(exec: E, collection: &str) -> Result<Vec<DocumentRow>>
where
    E: SqliteExecutor<'e>,
{
    let rows = sqlx::query_as::<_, (String, String, String)>(
        r#"
        SELECT key, created_at, value FROM documents
        WHERE collection = ?
        ORDER BY created_at
        "#,
    )
    .bind(collection)
    .fetch_all(exec)
    .await?;

    rows.into_iter()
        .map(|(key, created_at, raw)| {
            Ok(DocumentRow {
                key,
                created_at,
                value: parse_value(collection, &raw)?,
            })
        })
        .collect()
}

/// Shallow-merge `partial` into an existing document's top-level fields.
///
/// Runs as a single transaction. Returns false when the key does not exist.
pub async fn merge(
    pool: &SqlitePool,
    collection: &str,
    key: &str,
    partial: &Map<String, Value>,
) -> Result<bool> {
    let mut tx = pool.begin().await?;

    let Some(mut value) = get(&mut *tx, collection, key).await? else {
        return Ok(false);
    };

    if let Value::Object(ref mut fields) = value {
        for (k, v) in partial {
            fields.insert(k.clone(), v.clone());
        }
    }

    put(&mut *tx, collection, key, &value).await?;
    tx.commit().await?;

    Ok(true)
}

/// Delete every document in a collection older than `ttl_secs`.
///
/// Returns the number of rows swept.
pub async fn purge_older_than<'e, E>(exec: E, collection: &str, ttl_secs: i64) -> Result<u64>
where
    E: SqliteExecutor<'e>,
{
    let result = sqlx::query(
        r#"
        DELETE FROM documents
        WHERE collection = ? AND datetime(created_at) <= datetime('now', ?)
        "#,
    )
    .bind(collection)
    .bind(format!("-{} seconds", ttl_secs))
    .execute(exec)
    .await?;

    Ok(result.rows_affected())
}

/// Atomically remove and return a document that is younger than `ttl_secs`.
///
/// The age check and the delete are one statement, so two concurrent callers
/// with the same key cannot both observe the document.
pub async fn take_if_fresh<'e, E>(
    exec: E,
    collection: &str,
    key: &str,
    ttl_secs: i64,
) -> Result<Option<Value>>
where
    E: SqliteExecutor<'e>,
{
    let raw = sqlx::query_scalar::<_, String>(
        r#"
        DELETE FROM documents
        WHERE collection = ? AND key = ? AND datetime(created_at) > datetime('now', ?)
        RETURNING value
        "#,
    )
    .bind(collection)
    .bind(key)
    .bind(format!("-{} seconds", ttl_secs))
    .fetch_optional(exec)
    .await?;

    raw.map(|raw| parse_value(collection, &raw)).transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Database;
    use serde_json::json;

    async fn test_db() -> Database {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.migrate().await.unwrap();
        db
    }

    #[tokio::test]
    async fn test_put_get_roundtrip() {
        let db = test_db().await;

        let value = json!({"name": "Alice", "is_admin": true});
        put(db.pool(), "users", "111", &value).await.unwrap();

        let fetched = get(db.pool(), "users", "111").await.unwrap().unwrap();
        assert_eq!(fetched, value);
    }

    #[tokio::test]
    async fn test_put_overwrites_value() {
        let db = test_db().await;

        put(db.pool(), "config", "model", &json!("old")).await.unwrap();
        put(db.pool(), "config", "model", &json!("new")).await.unwrap();

        let fetched = get(db.pool(), "config", "model").await.unwrap().unwrap();
        assert_eq!(fetched, json!("new"));
    }

    #[tokio::test]
    async fn test_put_if_absent_does_not_overwrite() {
        let db = test_db().await;

        assert!(put_if_absent(db.pool(), "config", "model", &json!("seeded"))
            .await
            .unwrap());
        assert!(!put_if_absent(db.pool(), "config", "model", &json!("ignored"))
            .await
            .unwrap());

        let fetched = get(db.pool(), "config", "model").await.unwrap().unwrap();
        assert_eq!(fetched, json!("seeded"));
    }

    #[tokio::test]
    async fn test_get_missing_is_none() {
        let db = test_db().await;
        assert!(get(db.pool(), "users", "absent").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_reports_existence() {
        let db = test_db().await;

        put(db.pool(), "users", "111", &json!({})).await.unwrap();
        assert!(delete(db.pool(), "users", "111").await.unwrap());
        assert!(!delete(db.pool(), "users", "111").await.unwrap());
    }

    #[tokio::test]
    async fn test_list_all_scoped_to_collection() {
        let db = test_db().await;

        put(db.pool(), "users", "111", &json!({"name": "Alice"})).await.unwrap();
        put(db.pool(), "users", "222", &json!({"name": "Bob"})).await.unwrap();
        put(db.pool(), "invites", "abcd", &json!({})).await.unwrap();

        let rows = list_all(db.pool(), "users").await.unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| !r.created_at.is_empty()));
    }

    #[tokio::test]
    async fn test_merge_updates_only_given_fields() {
        let db = test_db().await;

        put(db.pool(), "users", "111", &json!({"name": "Alice", "is_admin": false}))
            .await
            .unwrap();

        let mut partial = Map::new();
        partial.insert("is_admin".to_string(), json!(true));
        assert!(merge(db.pool(), "users", "111", &partial).await.unwrap());

        let fetched = get(db.pool(), "users", "111").await.unwrap().unwrap();
        assert_eq!(fetched, json!({"name": "Alice", "is_admin": true}));
    }

    #[tokio::test]
    async fn test_merge_missing_key_is_false() {
        let db = test_db().await;
        assert!(!merge(db.pool(), "users", "absent", &Map::new()).await.unwrap());
    }

    #[tokio::test]
    async fn test_take_if_fresh_consumes_once() {
        let db = test_db().await;

        put(db.pool(), "invites", "a1b2c3d4", &json!({"is_admin_invite": false}))
            .await
            .unwrap();

        assert!(take_if_fresh(db.pool(), "invites", "a1b2c3d4", 3600)
            .await
            .unwrap()
            .is_some());
        assert!(take_if_fresh(db.pool(), "invites", "a1b2c3d4", 3600)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_purge_older_than_sweeps_stale_rows() {
        let db = test_db().await;

        put(db.pool(), "invites", "fresh", &json!({})).await.unwrap();
        put(db.pool(), "invites", "stale", &json!({})).await.unwrap();
        sqlx::query(
            "UPDATE documents SET created_at = datetime('now', '-2 hours') \
             WHERE collection = 'invites' AND key = 'stale'",
        )
        .execute(db.pool())
        .await
        .unwrap();

        let swept = purge_older_than(db.pool(), "invites", 3600).await.unwrap();
        assert_eq!(swept, 1);
        assert!(get(db.pool(), "invites", "fresh").await.unwrap().is_some());
        assert!(get(db.pool(), "invites", "stale").await.unwrap().is_none());
    }
}
