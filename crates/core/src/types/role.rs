//! User roles.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Role attached to a platform user by the backend.
///
/// `Operator` is the privileged role: it gates the operator console and is
/// the only role subject to the email allow-list override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// A storefront shopper.
    Customer,
    /// A merchant managing one store.
    Merchant,
    /// A platform operator.
    Operator,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Customer => "customer",
            Self::Merchant => "merchant",
            Self::Operator => "operator",
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_snake_case() {
        assert_eq!(serde_json::to_string(&Role::Operator).unwrap(), "\"operator\"");
        let role: Role = serde_json::from_str("\"merchant\"").unwrap();
        assert_eq!(role, Role::Merchant);
    }

    #[test]
    fn test_display() {
        assert_eq!(Role::Customer.to_string(), "customer");
        assert_eq!(Role::Operator.to_string(), "operator");
    }
}
