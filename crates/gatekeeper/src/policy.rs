//! Grant policies for not-yet-authorized identities.
//!
//! The controller evaluates these in a fixed order — access secret, admin
//! secret, invite — and the first match wins. The two secret checks are pure
//! functions; invite redemption lives in the store and is applied last by
//! the controller.

/// What a matched policy grants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grant {
    /// Plain user access via the shared access secret.
    User,
    /// Admin access via the shared admin secret.
    Admin,
    /// Access via a redeemed invite, at the invite's privilege level.
    Invite { is_admin: bool },
}

/// First check: the shared access secret grants plain user access.
pub fn match_access_secret(text: &str, access_secret: &str) -> Option<Grant> {
    (text == access_secret).then_some(Grant::User)
}

/// Second check: the shared admin secret grants admin access.
pub fn match_admin_secret(text: &str, admin_secret: &str) -> Option<Grant> {
    (text == admin_secret).then_some(Grant::Admin)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_secret_exact_match_only() {
        assert_eq!(match_access_secret("secret", "secret"), Some(Grant::User));
        assert_eq!(match_access_secret("Secret", "secret"), None);
        assert_eq!(match_access_secret("secret ", "secret"), None);
        assert_eq!(match_access_secret("", "secret"), None);
    }

    #[test]
    fn test_admin_secret_exact_match_only() {
        assert_eq!(match_admin_secret("admin", "admin"), Some(Grant::Admin));
        assert_eq!(match_admin_secret("nope", "admin"), None);
    }

    #[test]
    fn test_access_secret_checked_before_admin_secret() {
        // When both secrets are identical the access secret wins, because
        // the controller evaluates it first. Mirror that ordering here.
        let text = "same";
        let first = match_access_secret(text, "same")
            .or_else(|| match_admin_secret(text, "same"));
        assert_eq!(first, Some(Grant::User));
    }
}
