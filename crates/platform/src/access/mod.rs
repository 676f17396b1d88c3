//! Route authorization policy.
//!
//! The guard is a pure function over a session snapshot so every branch can
//! be tested without an HTTP harness. The operator allow-list is kept as
//! its own type rather than inlined into the role comparison: it is a trust
//! override with security weight, and it should be auditable in isolation.

use std::collections::HashSet;

use nerix_core::{Email, Role, Session, User};

/// Where unauthenticated visitors are sent.
pub const LOGIN_PATH: &str = "/login";

/// Where authorized-but-wrong-role users with a store are sent.
pub const STORE_PATH: &str = "/store";

/// Where authorized-but-wrong-role users without a store are sent.
pub const CREATE_STORE_PATH: &str = "/create-store";

/// Operator emails granted console access when no allow-list is configured.
const DEFAULT_OPERATOR_EMAILS: [&str; 2] = ["admin@nerix.online", "ops@nerix.online"];

/// Outcome of a guard decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    /// The session may see the protected subtree.
    Granted,
    /// The session is sent elsewhere; authorization failures are silent
    /// redirects, never error responses.
    Redirect(&'static str),
}

/// Case-insensitive set of emails trusted with the operator console.
///
/// Membership grants operator access regardless of the user's backend role;
/// see [`guard`] for how the override slots into the decision.
#[derive(Debug, Clone)]
pub struct AllowList {
    emails: HashSet<String>,
}

impl AllowList {
    /// Parse a comma-separated allow-list, falling back to the built-in
    /// default set when the input is absent or contains no addresses.
    #[must_use]
    pub fn from_config(raw: Option<&str>) -> Self {
        let emails: HashSet<String> = raw
            .unwrap_or_default()
            .split(',')
            .map(|entry| entry.trim().to_ascii_lowercase())
            .filter(|entry| !entry.is_empty())
            .collect();

        if emails.is_empty() {
            return Self::default();
        }

        Self { emails }
    }

    /// Whether `email` is on the allow-list, ignoring case.
    #[must_use]
    pub fn contains(&self, email: &Email) -> bool {
        self.emails.contains(&email.normalized())
    }
}

impl Default for AllowList {
    fn default() -> Self {
        Self {
            emails: DEFAULT_OPERATOR_EMAILS
                .iter()
                .map(|email| (*email).to_owned())
                .collect(),
        }
    }
}

/// Decide whether `session` may enter a subtree requiring `required`.
///
/// Decision order:
///
/// 1. Anonymous sessions go to the login page.
/// 2. No required role means any authenticated session passes.
/// 3. The operator console is granted solely by allow-list membership; the
///    backend role is not consulted for it. Everyone else is sent to their
///    store, or to store creation when they have none.
/// 4. Any other required role is a plain equality check against the user's
///    role, with the same store-aware redirect on mismatch.
///
/// Operators are never redirected *toward* their console; it is reached
/// only by direct navigation.
#[must_use]
pub fn guard(session: &Session, required: Option<Role>, allowlist: &AllowList) -> Access {
    let Some(user) = session.user().filter(|_| session.is_authenticated()) else {
        return Access::Redirect(LOGIN_PATH);
    };

    let Some(required) = required else {
        return Access::Granted;
    };

    if required == Role::Operator {
        if allowlist.contains(&user.email) {
            return Access::Granted;
        }
        return store_redirect(user);
    }

    if user.role == required {
        return Access::Granted;
    }

    store_redirect(user)
}

/// The redirect for an authenticated user denied a subtree.
fn store_redirect(user: &User) -> Access {
    if user.store_id.is_some() {
        Access::Redirect(STORE_PATH)
    } else {
        Access::Redirect(CREATE_STORE_PATH)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use nerix_core::{StoreId, UserId};

    use super::*;

    fn user(email: &str, role: Role, store: Option<&str>) -> User {
        User {
            id: UserId::new("usr_1"),
            name: "Test".to_owned(),
            email: Email::parse(email).unwrap(),
            role,
            store_id: store.map(StoreId::new),
        }
    }

    fn session(email: &str, role: Role, store: Option<&str>) -> Session {
        Session::authenticated("tok_1".to_owned(), user(email, role, store))
    }

    fn allowlist() -> AllowList {
        AllowList::from_config(Some("admin@nerix.online,ops@nerix.online"))
    }

    #[test]
    fn test_anonymous_goes_to_login() {
        let access = guard(&Session::anonymous(), None, &allowlist());
        assert_eq!(access, Access::Redirect(LOGIN_PATH));

        let access = guard(&Session::anonymous(), Some(Role::Operator), &allowlist());
        assert_eq!(access, Access::Redirect(LOGIN_PATH));
    }

    #[test]
    fn test_no_required_role_admits_any_authenticated_user() {
        for role in [Role::Customer, Role::Merchant, Role::Operator] {
            let access = guard(&session("a@b.c", role, None), None, &allowlist());
            assert_eq!(access, Access::Granted);
        }
    }

    #[test]
    fn test_allowlist_overrides_role_for_operator_console() {
        // Merchant by role, but on the allow-list: granted anyway.
        let session = session("admin@nerix.online", Role::Merchant, Some("str_1"));
        let access = guard(&session, Some(Role::Operator), &allowlist());
        assert_eq!(access, Access::Granted);
    }

    #[test]
    fn test_allowlist_is_case_insensitive() {
        let session = session("Admin@Nerix.Online", Role::Merchant, None);
        let access = guard(&session, Some(Role::Operator), &allowlist());
        assert_eq!(access, Access::Granted);
    }

    #[test]
    fn test_operator_console_requires_allowlist_even_for_operators() {
        let session = session("someone@else.com", Role::Operator, None);
        let access = guard(&session, Some(Role::Operator), &allowlist());
        assert_eq!(access, Access::Redirect(CREATE_STORE_PATH));
    }

    #[test]
    fn test_role_mismatch_redirects_by_store_presence() {
        let with_store = session("m@example.com", Role::Customer, Some("str_1"));
        assert_eq!(
            guard(&with_store, Some(Role::Merchant), &allowlist()),
            Access::Redirect(STORE_PATH)
        );

        let without_store = session("m@example.com", Role::Customer, None);
        assert_eq!(
            guard(&without_store, Some(Role::Merchant), &allowlist()),
            Access::Redirect(CREATE_STORE_PATH)
        );
    }

    #[test]
    fn test_matching_role_is_granted() {
        let session = session("m@example.com", Role::Merchant, Some("str_1"));
        assert_eq!(guard(&session, Some(Role::Merchant), &allowlist()), Access::Granted);
    }

    #[test]
    fn test_from_config_trims_and_lowercases() {
        let list = AllowList::from_config(Some(" Alice@Example.com , bob@example.com ,"));
        assert!(list.contains(&Email::parse("alice@example.com").unwrap()));
        assert!(list.contains(&Email::parse("BOB@EXAMPLE.COM").unwrap()));
        assert!(!list.contains(&Email::parse("eve@example.com").unwrap()));
    }

    #[test]
    fn test_unconfigured_falls_back_to_default_set() {
        for raw in [None, Some(""), Some(" , ")] {
            let list = AllowList::from_config(raw);
            assert!(list.contains(&Email::parse("admin@nerix.online").unwrap()));
            assert!(list.contains(&Email::parse("ops@nerix.online").unwrap()));
        }
    }
}
