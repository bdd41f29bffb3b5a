//! Audit entry types

use serde::{Deserialize, Serialize};

/// What kind of sensitive mutation the entry records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverrideKind {
    /// Line or order void
    Void,
    /// Manual unit price replacing the catalog price
    PriceOverride,
    /// Line-level discount
    ItemDiscount,
    /// Order-level discount
    OrderDiscount,
}

impl std::fmt::Display for OverrideKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OverrideKind::Void => write!(f, "void"),
            OverrideKind::PriceOverride => write!(f, "price_override"),
            OverrideKind::ItemDiscount => write!(f, "item_discount"),
            OverrideKind::OrderDiscount => write!(f, "order_discount"),
        }
    }
}

/// One immutable audit record
///
/// `actor` is whoever authorized the mutation: the operator when their
/// own role allowed it, the approving manager when a second credential
/// was required.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverrideAuditEntry {
    /// Monotonically increasing sequence (unique within the ledger)
    pub id: u64,
    /// Unix milliseconds
    pub timestamp: i64,
    pub actor_id: String,
    pub actor_name: String,
    /// Order the mutation targeted
    pub order_id: String,
    /// Line instance, when the target is a line (None for order-level)
    pub instance_id: Option<String>,
    pub kind: OverrideKind,
    /// Mandatory, non-empty
    pub reason: String,
    /// Value before the mutation (JSON)
    pub before: serde_json::Value,
    /// Value after the mutation (JSON)
    pub after: serde_json::Value,
    /// Hash of the previous entry (all-zero for the first)
    pub prev_hash: String,
    /// SHA-256 over this entry's fields + prev_hash
    pub curr_hash: String,
}
