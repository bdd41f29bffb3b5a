//! Shared types for the order engine

use serde::{Deserialize, Serialize};

// ============================================================================
// Discounts and overrides
// ============================================================================

/// Discount kind
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiscountKind {
    /// Percentage of the discounted base (e.g. 10 = 10% off)
    Percentage,
    /// Fixed amount, capped at the discounted base
    FixedAmount,
}

/// A discount applied to a line item or to the whole order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Discount {
    pub kind: DiscountKind,
    /// Percentage (0-100) or fixed amount depending on `kind`
    pub value: f64,
    /// Reason from the configured taxonomy (free text under "Other").
    /// The permission gate rejects discounts without one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Manually set unit price replacing the catalog/variation price
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PriceOverride {
    pub value: f64,
    /// Mandatory, non-empty
    pub reason: String,
}

// ============================================================================
// Cart item types
// ============================================================================

/// Selected variation snapshot (e.g. "Medium" size)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VariationInfo {
    pub id: String,
    pub name: String,
    /// Replaces the product price as the unit basis
    pub price: f64,
}

/// A modifier selected on a line item, with its own quantity
/// (e.g. "2x Extra Shot")
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ItemModifier {
    pub id: String,
    pub name: String,
    /// Price per unit of the modifier
    pub price: f64,
    pub quantity: i32,
}

/// Cart item input - for adding items (without instance_id)
///
/// Overrides and discounts are never part of the input; they are applied
/// afterwards through permission-gated commands.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItemInput {
    /// Product ID
    pub product_id: String,
    /// Product name
    pub name: String,
    /// Category name snapshot (for Z-report grouping)
    pub category_name: String,
    /// Catalog unit price
    pub price: f64,
    /// Selected variation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variation: Option<VariationInfo>,
    /// Selected modifiers, in selection order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modifiers: Vec<ItemModifier>,
    /// Quantity
    pub quantity: i32,
    /// Seat this line belongs to (for split-by-seat)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seat_number: Option<i32>,
    /// Course (e.g. "starter", "main")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course: Option<String>,
    /// Item note
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Cart item snapshot - complete line state within an order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartItemSnapshot {
    /// Product ID
    pub id: String,
    /// Instance ID (content-addressed hash)
    pub instance_id: String,
    /// Product name
    pub name: String,
    /// Category name snapshot (for Z-report grouping)
    pub category_name: String,
    /// Catalog unit price (variation price folds in via `variation`)
    pub price: f64,
    /// Selected variation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variation: Option<VariationInfo>,
    /// Selected modifiers
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modifiers: Vec<ItemModifier>,
    /// Quantity
    pub quantity: i32,
    /// Manual price override (gated; reason mandatory)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_override: Option<PriceOverride>,
    /// Line-level discount (gated)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount: Option<Discount>,
    /// Seat this line belongs to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seat_number: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// Who authorized the override/discount on this line, when it was
    /// someone other than the operator
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authorizer_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authorizer_name: Option<String>,

    // === Computed fields (refreshed by the engine on every mutation) ===
    /// Per-unit basis after override/variation resolution
    #[serde(default)]
    pub unit_basis: f64,
    /// Σ modifier.price × modifier.quantity
    #[serde(default)]
    pub modifiers_total: f64,
    /// (unit_basis + modifiers_total) × quantity, before discount
    #[serde(default)]
    pub line_subtotal: f64,
    /// Discount amount taken off this line
    #[serde(default)]
    pub discount_amount: f64,
    /// max(0, line_subtotal − discount_amount)
    #[serde(default)]
    pub line_total: f64,
}

/// Item changes for modification (quantity/modifier/note edits).
///
/// These are the ungated edits; discounts and price overrides have their
/// own commands so they route through the permission gate.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ItemChanges {
    /// New quantity; 0 removes the line silently (no audit entry -
    /// distinct from a void)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i32>,
    /// Replace the selected modifiers (None = no change)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modifiers: Option<Vec<ItemModifier>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl ItemChanges {
    pub fn is_empty(&self) -> bool {
        self.quantity.is_none()
            && self.modifiers.is_none()
            && self.course.is_none()
            && self.note.is_none()
    }
}

// ============================================================================
// Orders
// ============================================================================

/// Order type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderType {
    #[default]
    DineIn,
    Takeout,
    Delivery,
    InStore,
    Pickup,
}

/// Customer reference attached to an order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CustomerRef {
    pub id: String,
    pub name: String,
}

// ============================================================================
// Payments
// ============================================================================

/// Tender method
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TenderMethod {
    Cash,
    Card,
    Cheque,
    GiftCard,
}

impl std::fmt::Display for TenderMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TenderMethod::Cash => write!(f, "Cash"),
            TenderMethod::Card => write!(f, "Card"),
            TenderMethod::Cheque => write!(f, "Cheque"),
            TenderMethod::GiftCard => write!(f, "Gift Card"),
        }
    }
}

/// Payment input for adding a tender
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentInput {
    pub method: TenderMethod,
    /// Amount to apply toward the order
    pub amount: f64,
    /// Cash handed over; may exceed `amount`, change is returned
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tendered: Option<f64>,
    /// Gift card identifier (required for GiftCard tenders)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Payment record in a snapshot
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentRecord {
    pub payment_id: String,
    pub method: TenderMethod,
    /// Amount recorded against the order
    pub amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tendered: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub timestamp: i64,
    #[serde(default)]
    pub cancelled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancel_reason: Option<String>,
}

/// Payment summary line for a completed order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentSummaryItem {
    pub method: TenderMethod,
    pub amount: f64,
}
