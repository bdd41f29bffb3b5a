//! Z-Report Model
//!
//! End-of-shift settlement report. Derived from a closed shift on
//! demand, never stored and never mutated; generating it twice from the
//! same shift yields identical aggregates.

use super::shift::{CashTransaction, Shift};
use serde::{Deserialize, Serialize};

/// Sales grouped by tender method
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentMethodSale {
    /// Tender method name
    pub method: String,
    /// Number of payments taken with this method
    pub count: i64,
    /// Total amount collected with this method
    pub amount: f64,
}

/// Sales grouped by product category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySale {
    pub category: String,
    /// Units sold
    pub quantity: i64,
    pub amount: f64,
}

/// Per-kind totals over the shift's cash movements
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashTransactionTotal {
    pub kind: String,
    pub count: i64,
    pub total: f64,
}

/// Cash drawer reconciliation block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashReconciliation {
    pub opening_balance: f64,
    pub cash_sales: f64,
    pub cash_returns: f64,
    pub cash_in: f64,
    pub cash_out: f64,
    /// opening + cash sales − cash returns + cash in − cash out
    pub expected_cash: f64,
    /// Cash counted at clock-out
    pub counted_cash: f64,
    /// counted − expected
    pub variance: f64,
}

/// Z-Report - the end-of-shift summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZReport {
    pub terminal: String,
    pub cashier: String,
    /// The closed shift this report was generated from
    pub shift: Shift,
    pub total_orders: i64,
    pub gross_sales: f64,
    pub payment_method_sales: Vec<PaymentMethodSale>,
    pub category_sales: Vec<CategorySale>,
    pub cash_transaction_totals: Vec<CashTransactionTotal>,
    /// Raw cash movements for the detail section of the printout
    pub cash_transaction_report: Vec<CashTransaction>,
    pub reconciliation: CashReconciliation,
    /// Unix milliseconds
    pub generated_at: i64,
}
