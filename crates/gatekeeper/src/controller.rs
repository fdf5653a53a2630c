//! Authorization decisions for inbound identities.

use storage::{config, invite, principal, Database};
use tracing::{debug, info};

use crate::error::GatekeeperError;
use crate::policy::{match_access_secret, match_admin_secret, Grant};

/// Outcome of running an (identity, text) pair through the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessOutcome {
    /// Already-authorized principal supplied the admin secret and was
    /// promoted in place.
    PromotedToAdmin,
    /// Access secret matched; a plain user principal was created.
    GrantedUser,
    /// Admin secret matched; an admin principal was created.
    GrantedAdmin,
    /// A live invite was redeemed and consumed.
    GrantedByInvite { is_admin: bool },
    /// Already authorized and the text is an ordinary chat turn.
    AlreadyAuthorized,
    /// Nothing matched; no state was touched.
    Denied,
}

/// Applies the shared-secret and invite policies against the principal store.
pub struct AccessController {
    db: Database,
}

impl AccessController {
    /// Create a controller over the given store.
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Decide what `text` means for the given identity.
    ///
    /// An authorized principal sending the admin secret is silently promoted
    /// to admin — deliberate, and worth knowing about when auditing a
    /// deployment. For unauthorized identities the policies run in a fixed
    /// order: access secret, admin secret, invite. First match wins; expired
    /// and unknown invites are indistinguishable from a wrong secret.
    pub async fn authorize(
        &self,
        user_id: i64,
        display_name: &str,
        text: &str,
    ) -> Result<AccessOutcome, GatekeeperError> {
        let pool = self.db.pool();
        let access_secret = config::get_or_default(pool, "access_password").await?;
        let admin_secret = config::get_or_default(pool, "webui_password").await?;

        if principal::is_authorized(pool, user_id).await? {
            if text == admin_secret {
                principal::promote(pool, user_id, true).await?;
                info!("Principal {} promoted to admin via shared secret", user_id);
                return Ok(AccessOutcome::PromotedToAdmin);
            }
            return Ok(AccessOutcome::AlreadyAuthorized);
        }

        let grant = if let Some(grant) = match_access_secret(text, &access_secret) {
            Some(grant)
        } else if let Some(grant) = match_admin_secret(text, &admin_secret) {
            Some(grant)
        } else {
            invite::redeem(pool, text)
                .await?
                .map(|g| Grant::Invite { is_admin: g.is_admin })
        };

        match grant {
            Some(Grant::User) => {
                principal::upsert(pool, user_id, display_name, false, false).await?;
                info!("Granted user access to {} ({})", display_name, user_id);
                Ok(AccessOutcome::GrantedUser)
            }
            Some(Grant::Admin) => {
                principal::upsert(pool, user_id, display_name, true, false).await?;
                info!("Granted admin access to {} ({})", display_name, user_id);
                Ok(AccessOutcome::GrantedAdmin)
            }
            Some(Grant::Invite { is_admin }) => {
                principal::upsert(pool, user_id, display_name, is_admin, false).await?;
                info!(
                    "Invite redeemed by {} ({}), admin: {}",
                    display_name, user_id, is_admin
                );
                Ok(AccessOutcome::GrantedByInvite { is_admin })
            }
            None => {
                debug!("Access denied for {}", user_id);
                Ok(AccessOutcome::Denied)
            }
        }
    }
}
