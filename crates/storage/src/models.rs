//! Storage models.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// An authorized identity and its privilege level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// Stable numeric identity assigned by the messaging front end.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Whether the principal may run administrative operations.
    pub is_admin: bool,
    /// Whether the principal is protected from demotion and removal.
    pub is_super_admin: bool,
}

/// Persisted payload of a principal document.
///
/// Unknown fields survive a read-modify-write cycle through `extra`, so a
/// newer deployment can add fields without a migration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrincipalDoc {
    pub name: String,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub is_super_admin: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Persisted payload of an invite document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InviteDoc {
    #[serde(default)]
    pub is_admin_invite: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// What a successfully redeemed invite grants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InviteGrant {
    /// Whether the invite was created with admin privilege.
    pub is_admin: bool,
}

/// One row of a collection listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRow {
    pub key: String,
    pub created_at: String,
    pub value: Value,
}
