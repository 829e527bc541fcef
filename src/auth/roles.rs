//! Role levels and per-operation requirements
//!
//! Two static roles guard every resource operation. ADMIN implies USER,
//! expressed through the derived ordering.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Caller roles, ordered so that a comparison expresses implication
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
#[repr(u8)]
#[derive(Default)]
pub enum Role {
    /// Authenticated reader - list and get
    #[default]
    User = 0,
    /// Administrator - create, update, delete
    Admin = 1,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "USER"),
            Role::Admin => write!(f, "ADMIN"),
        }
    }
}

/// The five resource operations, each with a minimum required role
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    Get,
    Create,
    Update,
    Delete,
}

impl Operation {
    /// Minimum role required to perform this operation
    pub fn required_role(self) -> Role {
        match self {
            Operation::List | Operation::Get => Role::User,
            Operation::Create | Operation::Update | Operation::Delete => Role::Admin,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::List => write!(f, "list"),
            Operation::Get => write!(f, "get"),
            Operation::Create => write!(f, "create"),
            Operation::Update => write!(f, "update"),
            Operation::Delete => write!(f, "delete"),
        }
    }
}

/// Check if an operation is allowed for the given role
pub fn is_allowed(operation: Operation, role: Role) -> bool {
    role >= operation.required_role()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_operations() {
        assert!(is_allowed(Operation::List, Role::User));
        assert!(is_allowed(Operation::List, Role::Admin));
        assert!(is_allowed(Operation::Get, Role::User));
        assert!(is_allowed(Operation::Get, Role::Admin));
    }

    #[test]
    fn test_write_operations() {
        assert!(!is_allowed(Operation::Create, Role::User));
        assert!(is_allowed(Operation::Create, Role::Admin));
        assert!(!is_allowed(Operation::Update, Role::User));
        assert!(is_allowed(Operation::Update, Role::Admin));
        assert!(!is_allowed(Operation::Delete, Role::User));
        assert!(is_allowed(Operation::Delete, Role::Admin));
    }

    #[test]
    fn test_role_ordering() {
        assert!(Role::Admin > Role::User);
    }

    #[test]
    fn test_role_serialization() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"ADMIN\"");
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"USER\"");
        let role: Role = serde_json::from_str("\"ADMIN\"").unwrap();
        assert_eq!(role, Role::Admin);
    }
}
