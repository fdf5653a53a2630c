//! Principal repository: authorized identities and their privilege flags.
//!
//! Every read-modify-write runs in a single transaction, so concurrent
//! promotions or removals of the same principal cannot interleave.

use serde_json::Value;
use sqlx::{SqlitePool, SqliteExecutor};

use crate::document;
use crate::error::{Result, StorageError};
use crate::models::{Principal, PrincipalDoc};

/// Collection holding principal documents, keyed by the decimal id.
pub const COLLECTION: &str = "users";

fn decode(value: Value) -> Result<PrincipalDoc> {
    serde_json::from_value(value).map_err(|source| StorageError::Malformed {
        collection: COLLECTION.to_string(),
        source,
    })
}

fn encode(doc: &PrincipalDoc) -> Result<Value> {
    serde_json::to_value(doc).map_err(|source| StorageError::Malformed {
        collection: COLLECTION.to_string(),
        source,
    })
}

async fn fetch<'e, E>(exec: E, id: i64) -> Result<Option<PrincipalDoc>>
where
    E: SqliteExecutor<'e>,
{
    document::get(exec, COLLECTION, &id.to_string())
        .await?
        .map(decode)
        .transpose()
}

/// Create or update a principal.
///
/// Privilege flags use OR-semantics: a flag already true is never cleared by
/// a lower-privilege upsert, and a super admin is always an admin.
pub async fn upsert(
    pool: &SqlitePool,
    id: i64,
    name: &str,
    is_admin: bool,
    is_super_admin: bool,
) -> Result<()> {
    let mut tx = pool.begin().await?;

    let existing = document::get(&mut *tx, COLLECTION, &id.to_string())
        .await?
        .map(decode)
        .transpose()?
        .unwrap_or_default();

    let is_super_admin = is_super_admin || existing.is_super_admin;
    let doc = PrincipalDoc {
        name: name.to_string(),
        is_admin: is_admin || existing.is_admin || is_super_admin,
        is_super_admin,
        extra: existing.extra,
    };

    document::put(&mut *tx, COLLECTION, &id.to_string(), &encode(&doc)?).await?;
    tx.commit().await?;

    Ok(())
}

/// Set or clear a principal's admin flag.
///
/// Demoting a super admin is refused: returns false with no mutation.
/// Returns false when the principal does not exist.
pub async fn promote(pool: &SqlitePool, id: i64, to_admin: bool) -> Result<bool> {
    let mut tx = pool.begin().await?;

    let Some(mut doc) = fetch(&mut *tx, id).await? else {
        return Ok(false);
    };
    if !to_admin && doc.is_super_admin {
        return Ok(false);
    }

    doc.is_admin = to_admin;
    document::put(&mut *tx, COLLECTION, &id.to_string(), &encode(&doc)?).await?;
    tx.commit().await?;

    Ok(true)
}

/// Set or clear a principal's super-admin flag.
///
/// Granting super admin also forces the admin flag in the same write.
/// Returns false when the principal does not exist.
pub async fn set_super_admin(pool: &SqlitePool, id: i64, flag: bool) -> Result<bool> {
    let mut tx = pool.begin().await?;

    let Some(mut doc) = fetch(&mut *tx, id).await? else {
        return Ok(false);
    };

    doc.is_super_admin = flag;
    if flag {
        doc.is_admin = true;
    }
    document::put(&mut *tx, COLLECTION, &id.to_string(), &encode(&doc)?).await?;
    tx.commit().await?;

    Ok(true)
}

/// Delete a principal. Refused (false, no mutation) for super admins;
/// false when the principal does not exist.
pub async fn remove(pool: &SqlitePool, id: i64) -> Result<bool> {
    let mut tx = pool.begin().await?;

    let Some(doc) = fetch(&mut *tx, id).await? else {
        return Ok(false);
    };
    if doc.is_super_admin {
        return Ok(false);
    }

    let deleted = document::delete(&mut *tx, COLLECTION, &id.to_string()).await?;
    tx.commit().await?;

    Ok(deleted)
}

/// Whether the id has a principal record at all.
pub async fn is_authorized(pool: &SqlitePool, id: i64) -> Result<bool> {
    Ok(fetch(pool, id).await?.is_some())
}

/// Whether the principal exists and has the admin flag.
pub async fn is_admin(pool: &SqlitePool, id: i64) -> Result<bool> {
    Ok(fetch(pool, id).await?.map(|d| d.is_admin).unwrap_or(false))
}

/// Whether the principal exists and has the super-admin flag.
pub async fn is_super_admin(pool: &SqlitePool, id: i64) -> Result<bool> {
    Ok(fetch(pool, id)
        .await?
        .map(|d| d.is_super_admin)
        .unwrap_or(false))
}

/// List every principal.
pub async fn list(pool: &SqlitePool) -> Result<Vec<Principal>> {
    let rows = document::list_all(pool, COLLECTION).await?;

    rows.into_iter()
        .map(|row| {
            let id = row.key.parse::<i64>().map_err(|_| StorageError::InvalidKey {
                collection: COLLECTION.to_string(),
                key: row.key.clone(),
            })?;
            let doc = decode(row.value)?;
            Ok(Principal {
                id,
                name: doc.name,
                is_admin: doc.is_admin,
                is_super_admin: doc.is_super_admin,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Database;

    async fn test_db() -> Database {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.migrate().await.unwrap();
        db
    }

    #[tokio::test]
    async fn test_upsert_and_queries() {
        let db = test_db().await;

        upsert(db.pool(), 111, "Alice", false, false).await.unwrap();

        assert!(is_authorized(db.pool(), 111).await.unwrap());
        assert!(!is_admin(db.pool(), 111).await.unwrap());
        assert!(!is_super_admin(db.pool(), 111).await.unwrap());
        assert!(!is_authorized(db.pool(), 999).await.unwrap());
    }

    #[tokio::test]
    async fn test_upsert_never_clears_elevated_flags() {
        let db = test_db().await;

        upsert(db.pool(), 111, "Alice", true, false).await.unwrap();
        // A later plain-user upsert must not strip the admin flag.
        upsert(db.pool(), 111, "Alice", false, false).await.unwrap();

        assert!(is_admin(db.pool(), 111).await.unwrap());
    }

    #[tokio::test]
    async fn test_upsert_super_forces_admin() {
        let db = test_db().await;

        upsert(db.pool(), 111, "Alice", false, true).await.unwrap();

        assert!(is_admin(db.pool(), 111).await.unwrap());
        assert!(is_super_admin(db.pool(), 111).await.unwrap());
    }

    #[tokio::test]
    async fn test_promote_and_demote() {
        let db = test_db().await;

        upsert(db.pool(), 111, "Alice", false, false).await.unwrap();
        assert!(promote(db.pool(), 111, true).await.unwrap());
        assert!(is_admin(db.pool(), 111).await.unwrap());

        assert!(promote(db.pool(), 111, false).await.unwrap());
        assert!(!is_admin(db.pool(), 111).await.unwrap());
    }

    #[tokio::test]
    async fn test_promote_missing_principal_is_false() {
        let db = test_db().await;
        assert!(!promote(db.pool(), 999, true).await.unwrap());
    }

    #[tokio::test]
    async fn test_demote_super_admin_refused() {
        let db = test_db().await;

        upsert(db.pool(), 111, "Alice", false, false).await.unwrap();
        assert!(set_super_admin(db.pool(), 111, true).await.unwrap());

        assert!(!promote(db.pool(), 111, false).await.unwrap());
        assert!(is_admin(db.pool(), 111).await.unwrap());
        assert!(is_super_admin(db.pool(), 111).await.unwrap());
    }

    #[tokio::test]
    async fn test_set_super_admin_forces_admin_flag() {
        let db = test_db().await;

        upsert(db.pool(), 111, "Alice", false, false).await.unwrap();
        assert!(set_super_admin(db.pool(), 111, true).await.unwrap());

        assert!(is_admin(db.pool(), 111).await.unwrap());
        assert!(is_super_admin(db.pool(), 111).await.unwrap());

        // Clearing super admin leaves the admin flag in place.
        assert!(set_super_admin(db.pool(), 111, false).await.unwrap());
        assert!(is_admin(db.pool(), 111).await.unwrap());
        assert!(!is_super_admin(db.pool(), 111).await.unwrap());
    }

    #[tokio::test]
    async fn test_set_super_admin_missing_is_false() {
        let db = test_db().await;
        assert!(!set_super_admin(db.pool(), 999, true).await.unwrap());
    }

    #[tokio::test]
    async fn test_remove_refuses_super_admin() {
        let db = test_db().await;

        upsert(db.pool(), 111, "Alice", false, true).await.unwrap();

        assert!(!remove(db.pool(), 111).await.unwrap());
        assert!(is_authorized(db.pool(), 111).await.unwrap());
    }

    #[tokio::test]
    async fn test_remove_ordinary_principal() {
        let db = test_db().await;

        upsert(db.pool(), 111, "Alice", true, false).await.unwrap();

        assert!(remove(db.pool(), 111).await.unwrap());
        assert!(!is_authorized(db.pool(), 111).await.unwrap());
        assert!(!remove(db.pool(), 111).await.unwrap());
    }

    #[tokio::test]
    async fn test_list_principals() {
        let db = test_db().await;

        upsert(db.pool(), 111, "Alice", false, false).await.unwrap();
        upsert(db.pool(), 222, "Bob", true, false).await.unwrap();

        let mut principals = list(db.pool()).await.unwrap();
        principals.sort_by_key(|p| p.id);

        assert_eq!(principals.len(), 2);
        assert_eq!(principals[0].name, "Alice");
        assert!(!principals[0].is_admin);
        assert_eq!(principals[1].name, "Bob");
        assert!(principals[1].is_admin);
    }

    #[tokio::test]
    async fn test_unknown_fields_survive_promotion() {
        let db = test_db().await;

        // Simulate a record written by a newer deployment.
        crate::document::put(
            db.pool(),
            COLLECTION,
            "111",
            &serde_json::json!({"name": "Alice", "is_admin": false, "locale": "de"}),
        )
        .await
        .unwrap();

        assert!(promote(db.pool(), 111, true).await.unwrap());

        let value = crate::document::get(db.pool(), COLLECTION, "111")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(value["locale"], "de");
        assert_eq!(value["is_admin"], true);
    }
}
