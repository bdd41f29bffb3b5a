//! Catalog Models
//!
//! Read-only reference data supplied by the product/inventory provider.
//! The engine never mutates any of these; they feed pricing inputs and
//! the stock-availability quantity ceiling.

use serde::{Deserialize, Serialize};

/// Product entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    /// Category name (snapshot into line items for Z-report grouping)
    pub category: String,
    /// Unit price used when no variation is selected
    pub price: f64,
    pub in_stock: bool,
    /// On-hand quantity; `None` means stock is not tracked
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock_quantity: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub barcode: Option<String>,
    /// Selectable variations (e.g. sizes); variation price replaces
    /// the product price when selected
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub variations: Vec<ProductVariation>,
    /// Modifiers offered for this product
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modifiers: Vec<Modifier>,
}

/// Product variation (e.g. "Medium")
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductVariation {
    pub id: String,
    pub name: String,
    pub price: f64,
    /// On-hand quantity for this variation; `None` means untracked
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock_quantity: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
}

/// Modifier offered on a product (e.g. "Extra Shot")
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Modifier {
    pub id: String,
    pub name: String,
    /// Price per unit of the modifier; zero-priced modifiers are valid
    #[serde(default)]
    pub price: f64,
}

/// Gift card balance record
///
/// Balance is only debited when an order is finalized, never while the
/// tender sits in a pending checkout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GiftCard {
    pub card_number: String,
    pub balance: f64,
    pub is_active: bool,
}
