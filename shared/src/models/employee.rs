//! Employee and Role Models

use serde::{Deserialize, Serialize};

/// Operator role, ordered by privilege
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Cashier,
    Manager,
    Admin,
}

impl Role {
    /// Whether this role outranks `other` (strictly)
    pub fn outranks(&self, other: Role) -> bool {
        *self > other
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Cashier => write!(f, "cashier"),
            Role::Manager => write!(f, "manager"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

/// Operator identity as returned by the identity provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Operator {
    pub id: String,
    /// Display name (snapshot into events and audit entries)
    pub name: String,
    pub role: Role,
}
