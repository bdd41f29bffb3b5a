//! Order snapshot - computed state from the event stream
//!
//! The snapshot includes a `state_checksum` field for drift detection.
//! A client replaying the same events can compare its locally computed
//! checksum with the engine's to detect reducer divergence.

use super::types::{
    CartItemSnapshot, CustomerRef, Discount, OrderType, PaymentRecord,
};
use serde::{Deserialize, Serialize};
use std::hash::Hash;

/// Order status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    Active,
    Completed,
    Void,
}

/// Order snapshot - computed from the event stream
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderSnapshot {
    /// Order ID (assigned by the engine)
    pub order_id: String,
    /// Receipt number (assigned at open, immutable)
    pub receipt_number: String,
    /// Order status
    pub status: OrderStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_type: Option<OrderType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_name: Option<String>,
    /// Guest count
    pub guest_count: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<CustomerRef>,
    /// Free-text order notes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// Items in the order (insertion order = display order)
    pub items: Vec<CartItemSnapshot>,
    /// Payment records
    pub payments: Vec<PaymentRecord>,
    /// The single order-level discount, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_discount: Option<Discount>,
    /// Tax rate snapshot (e.g. 0.08 = 8%), taken from config at open
    pub tax_rate: f64,
    /// Tip amount
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tip: Option<f64>,

    // === Computed totals (refreshed on every mutation) ===
    /// Σ line totals, after line-level discounts
    pub subtotal: f64,
    /// Order-level discount amount
    #[serde(default)]
    pub discount: f64,
    /// Tax on the discounted subtotal
    #[serde(default)]
    pub tax: f64,
    /// taxable base + tax + tip
    pub total: f64,
    /// Amount paid (non-cancelled tenders)
    #[serde(default)]
    pub paid_amount: f64,

    /// Order start time (Unix milliseconds)
    pub start_time: i64,
    /// Order end time (completion or void)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<i64>,
    /// Creation timestamp
    pub created_at: i64,
    /// Last update timestamp
    pub updated_at: i64,
    /// Last applied event sequence (for incremental updates)
    pub last_sequence: u64,
    /// State checksum for drift detection (hex string), computed from
    /// item count, total, paid amount, last sequence and status
    #[serde(default)]
    pub state_checksum: String,
}

impl OrderSnapshot {
    /// Create a new empty order
    pub fn new(order_id: String, tax_rate: f64) -> Self {
        let now = crate::util::now_millis();
        let mut snapshot = Self {
            order_id,
            receipt_number: String::new(),
            status: OrderStatus::Active,
            order_type: None,
            table_name: None,
            guest_count: 1,
            customer: None,
            note: None,
            items: Vec::new(),
            payments: Vec::new(),
            order_discount: None,
            tax_rate,
            tip: None,
            subtotal: 0.0,
            discount: 0.0,
            tax: 0.0,
            total: 0.0,
            paid_amount: 0.0,
            start_time: now,
            end_time: None,
            created_at: now,
            updated_at: now,
            last_sequence: 0,
            state_checksum: String::new(),
        };
        snapshot.update_checksum();
        snapshot
    }

    /// Check if order is active
    pub fn is_active(&self) -> bool {
        self.status == OrderStatus::Active
    }

    /// Check if order is completed
    pub fn is_completed(&self) -> bool {
        self.status == OrderStatus::Completed
    }

    /// Check if order is voided
    pub fn is_voided(&self) -> bool {
        self.status == OrderStatus::Void
    }

    /// Calculate remaining amount to pay
    pub fn remaining_amount(&self) -> f64 {
        (self.total - self.paid_amount).max(0.0)
    }

    /// Whether the order is fully paid, within a 1-cent epsilon that
    /// absorbs floating rounding
    pub fn is_settled(&self) -> bool {
        self.total - self.paid_amount <= 0.01
    }

    /// Find an item by instance ID
    pub fn find_item(&self, instance_id: &str) -> Option<&CartItemSnapshot> {
        self.items.iter().find(|i| i.instance_id == instance_id)
    }

    /// Compute state checksum for drift detection
    ///
    /// Hashes the fields that must match between two replicas after
    /// applying the same events. Monetary values are hashed in cents to
    /// avoid float representation issues. Returns a 16-character hex
    /// string.
    pub fn compute_checksum(&self) -> String {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::Hasher as _;

        let mut hasher = DefaultHasher::new();

        self.items.len().hash(&mut hasher);
        ((self.total * 100.0).round() as i64).hash(&mut hasher);
        ((self.paid_amount * 100.0).round() as i64).hash(&mut hasher);
        self.last_sequence.hash(&mut hasher);
        (self.status as u8).hash(&mut hasher);

        format!("{:016x}", hasher.finish())
    }

    /// Update the state_checksum field based on current state
    pub fn update_checksum(&mut self) {
        self.state_checksum = self.compute_checksum();
    }

    /// Verify that the state_checksum matches the computed checksum.
    /// Returns false if drift is detected.
    pub fn verify_checksum(&self) -> bool {
        self.state_checksum == self.compute_checksum()
    }
}
