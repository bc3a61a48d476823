//! Role-based permission policy.
//!
//! Roles and operations are closed enums and the capability table is an
//! exhaustive `match`, so adding a role without deciding its permissions is a
//! compile error. Anything that does not parse into these enums is denied.

use axum::http::Method;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// A CRUD verb the policy can grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create,
    Read,
    Update,
    Delete,
}

impl Operation {
    pub const ALL: [Operation; 4] = [
        Operation::Create,
        Operation::Read,
        Operation::Update,
        Operation::Delete,
    ];

    /// The operation implied by an HTTP method, if any.
    pub fn from_method(method: &Method) -> Option<Self> {
        match *method {
            Method::POST => Some(Operation::Create),
            Method::GET | Method::HEAD => Some(Operation::Read),
            Method::PUT | Method::PATCH => Some(Operation::Update),
            Method::DELETE => Some(Operation::Delete),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::Read => "read",
            Operation::Update => "update",
            Operation::Delete => "delete",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "create" => Ok(Operation::Create),
            "read" => Ok(Operation::Read),
            "update" => Ok(Operation::Update),
            "delete" => Ok(Operation::Delete),
            other => Err(UnknownVariant(other.to_string())),
        }
    }
}

/// A user's role. Stored and transmitted in lowercase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Writer,
    Editor,
    Admin,
}

impl Role {
    /// Whether this role may perform `op`.
    pub fn allows(self, op: Operation) -> bool {
        use Operation::*;

        match self {
            Role::User => matches!(op, Read),
            Role::Writer => matches!(op, Read | Create),
            Role::Editor => matches!(op, Read | Create | Update),
            Role::Admin => matches!(op, Read | Create | Update | Delete),
        }
    }

    /// Every operation this role is granted, in canonical order.
    pub fn capabilities(self) -> Vec<Operation> {
        Operation::ALL
            .into_iter()
            .filter(|op| self.allows(*op))
            .collect()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Writer => "writer",
            Role::Editor => "editor",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "writer" => Ok(Role::Writer),
            "editor" => Ok(Role::Editor),
            "admin" => Ok(Role::Admin),
            other => Err(UnknownVariant(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown variant '{0}'")]
pub struct UnknownVariant(pub String);

/// String-keyed policy check used at the token boundary, where the role
/// arrives as an unverified-shape string. Unknown role or operation denies.
pub fn is_allowed(role: &str, operation: &str) -> bool {
    match (role.parse::<Role>(), operation.parse::<Operation>()) {
        (Ok(role), Ok(op)) => role.allows(op),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capability_table() {
        assert_eq!(Role::User.capabilities(), vec![Operation::Read]);
        assert_eq!(
            Role::Writer.capabilities(),
            vec![Operation::Create, Operation::Read]
        );
        assert_eq!(
            Role::Editor.capabilities(),
            vec![Operation::Create, Operation::Read, Operation::Update]
        );
        assert_eq!(Role::Admin.capabilities(), Operation::ALL.to_vec());
    }

    #[test]
    fn test_unknown_roles_are_denied_everything() {
        for role in ["", "root", "Admin", "ADMIN", "superuser", "admin ", "guest"] {
            for op in Operation::ALL {
                assert!(
                    !is_allowed(role, op.as_str()),
                    "role {role:?} must not be allowed {op}"
                );
            }
        }
    }

    #[test]
    fn test_unknown_operations_are_denied() {
        for role in ["user", "writer", "editor", "admin"] {
            for op in ["", "write", "DELETE", "patch", "*"] {
                assert!(!is_allowed(role, op), "{role} must not be allowed {op:?}");
            }
        }
    }

    #[test]
    fn test_string_policy_matches_typed_policy() {
        for role in [Role::User, Role::Writer, Role::Editor, Role::Admin] {
            for op in Operation::ALL {
                assert_eq!(is_allowed(role.as_str(), op.as_str()), role.allows(op));
            }
        }
    }

    #[test]
    fn test_method_mapping() {
        assert_eq!(Operation::from_method(&Method::POST), Some(Operation::Create));
        assert_eq!(Operation::from_method(&Method::GET), Some(Operation::Read));
        assert_eq!(Operation::from_method(&Method::PUT), Some(Operation::Update));
        assert_eq!(Operation::from_method(&Method::PATCH), Some(Operation::Update));
        assert_eq!(Operation::from_method(&Method::DELETE), Some(Operation::Delete));
        assert_eq!(Operation::from_method(&Method::OPTIONS), None);
        assert_eq!(Operation::from_method(&Method::TRACE), None);
    }

    #[test]
    fn test_role_round_trips_through_str() {
        for role in [Role::User, Role::Writer, Role::Editor, Role::Admin] {
            assert_eq!(role.as_str().parse::<Role>(), Ok(role));
        }
        assert_eq!(Role::default(), Role::User);
    }
}
