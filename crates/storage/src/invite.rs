//! Invite manager: single-use, time-boxed access tokens.

use rand::RngCore;
use sqlx::SqlitePool;
use tracing::debug;

use crate::document;
use crate::error::{Result, StorageError};
use crate::models::{InviteDoc, InviteGrant};

/// Collection holding invite documents, keyed by the code itself.
pub const COLLECTION: &str = "invites";

/// Validity window for an invite.
pub const INVITE_TTL_SECS: i64 = 3600;

/// Random bytes per code; hex-encoded to an 8-character token.
const CODE_BYTES: usize = 4;

fn decode(value: serde_json::Value) -> Result<InviteDoc> {
    serde_json::from_value(value).map_err(|source| StorageError::Malformed {
        collection: COLLECTION.to_string(),
        source,
    })
}

/// Create an invite and return its code.
pub async fn create(pool: &SqlitePool, is_admin_invite: bool) -> Result<String> {
    let mut bytes = [0u8; CODE_BYTES];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    let code = hex::encode(bytes);

    let doc = InviteDoc {
        is_admin_invite,
        extra: serde_json::Map::new(),
    };
    let value = serde_json::to_value(&doc).map_err(|source| StorageError::Malformed {
        collection: COLLECTION.to_string(),
        source,
    })?;
    document::put(pool, COLLECTION, &code, &value).await?;

    debug!("Created invite (admin: {})", is_admin_invite);
    Ok(code)
}

/// Redeem an invite code.
///
/// Expired invites are swept on every call, matching or not. The lookup and
/// the consume are one compare-and-delete, so a code redeems exactly once
/// even under concurrent calls. Unknown and expired codes both yield `None`.
pub async fn redeem(pool: &SqlitePool, code: &str) -> Result<Option<InviteGrant>> {
    let swept = document::purge_older_than(pool, COLLECTION, INVITE_TTL_SECS).await?;
    if swept > 0 {
        debug!("Swept {} expired invite(s)", swept);
    }

    let Some(value) = document::take_if_fresh(pool, COLLECTION, code, INVITE_TTL_SECS).await?
    else {
        return Ok(None);
    };

    let doc = decode(value)?;
    Ok(Some(InviteGrant {
        is_admin: doc.is_admin_invite,
    }))
}
