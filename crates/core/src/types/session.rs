//! Session and user types.
//!
//! The session is the single source of truth consulted by route
//! authorization. It is either fully anonymous or fully authenticated; no
//! half-populated state is constructible through the public API.

use serde::{Deserialize, Serialize};

use super::email::Email;
use super::id::{StoreId, UserId};
use super::role::Role;

/// A platform user as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Opaque user identifier.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Login email address.
    pub email: Email,
    /// Role assigned by the backend.
    pub role: Role,
    /// The user's store, when one has been created.
    ///
    /// Absence means the user still needs to create a store; route
    /// authorization redirects accordingly.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_id: Option<StoreId>,
}

/// Authentication state for the current deployment.
///
/// Invariant: `is_authenticated()` holds exactly when both the token and
/// the user record are present. The constructors make a partially-populated
/// session unrepresentable; the partial updaters on the session store exist
/// for out-of-band refresh and trust their callers.
///
/// `Debug` redacts the token so sessions can be logged safely.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    token: Option<String>,
    user: Option<User>,
}

impl Session {
    /// The fully-unauthenticated session.
    #[must_use]
    pub const fn anonymous() -> Self {
        Self {
            token: None,
            user: None,
        }
    }

    /// A fully-authenticated session.
    #[must_use]
    pub const fn authenticated(token: String, user: User) -> Self {
        Self {
            token: Some(token),
            user: Some(user),
        }
    }

    /// Whether both token and user are present.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.token.is_some() && self.user.is_some()
    }

    /// The bearer token, if authenticated.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// The current user record, if authenticated.
    #[must_use]
    pub const fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// Replace the user record, keeping the token.
    pub fn set_user(&mut self, user: User) {
        self.user = Some(user);
    }

    /// Replace the token, keeping the user record.
    pub fn set_token(&mut self, token: String) {
        self.token = Some(token);
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::anonymous()
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("user", &self.user)
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn merchant() -> User {
        User {
            id: UserId::new("usr_1"),
            name: "Maya".to_owned(),
            email: Email::parse("maya@example.com").unwrap(),
            role: Role::Merchant,
            store_id: Some(StoreId::new("str_1")),
        }
    }

    #[test]
    fn test_anonymous_is_not_authenticated() {
        let session = Session::anonymous();
        assert!(!session.is_authenticated());
        assert!(session.token().is_none());
        assert!(session.user().is_none());
    }

    #[test]
    fn test_authenticated_holds_both_parts() {
        let session = Session::authenticated("tok_1".to_owned(), merchant());
        assert!(session.is_authenticated());
        assert_eq!(session.token(), Some("tok_1"));
        assert_eq!(session.user().unwrap().name, "Maya");
    }

    #[test]
    fn test_debug_redacts_token() {
        let session = Session::authenticated("super-secret-token".to_owned(), merchant());
        let debug = format!("{session:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("super-secret-token"));
    }

    #[test]
    fn test_serde_roundtrip() {
        let session = Session::authenticated("tok_1".to_owned(), merchant());
        let json = serde_json::to_string(&session).unwrap();
        let parsed: Session = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, session);
    }

    #[test]
    fn test_user_without_store_roundtrips() {
        let user = User {
            store_id: None,
            ..merchant()
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("store_id"));
        let parsed: User = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.store_id, None);
    }
}
