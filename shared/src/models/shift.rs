//! Shift Model
//!
//! One clock-in-to-clock-out session on a terminal by one operator.
//! The transaction log is append-only while the shift is open; closing a
//! shift is irreversible and freezes the record.

use serde::{Deserialize, Serialize};

/// Shift status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ShiftStatus {
    #[default]
    #[serde(rename = "OPEN")]
    Open,
    #[serde(rename = "CLOSED")]
    Closed,
}

/// Kind of cash-drawer transaction recorded against a shift
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CashTransactionKind {
    /// Completed order (amount = total; cash portion tracked separately)
    Sale,
    /// Refund leaving the drawer
    Return,
    /// Money added to the drawer outside a sale
    CashIn,
    /// Money removed from the drawer outside a sale
    CashOut,
    /// Drawer opened without a transaction
    NoSale,
}

impl std::fmt::Display for CashTransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CashTransactionKind::Sale => write!(f, "Sale"),
            CashTransactionKind::Return => write!(f, "Return"),
            CashTransactionKind::CashIn => write!(f, "Cash In"),
            CashTransactionKind::CashOut => write!(f, "Cash Out"),
            CashTransactionKind::NoSale => write!(f, "No Sale"),
        }
    }
}

/// One entry in a shift's transaction log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashTransaction {
    pub kind: CashTransactionKind,
    /// Movement amount; zero for NoSale
    pub amount: f64,
    /// Cash-drawer portion of the amount (sales may be paid by card)
    #[serde(default)]
    pub cash_amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// Unix milliseconds
    pub timestamp: i64,
}

/// Completed-order summary retained on the shift for reporting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShiftOrderSummary {
    pub order_id: String,
    pub receipt_number: String,
    pub total: f64,
    /// Amount per tender method, in submission order
    pub payments: Vec<(String, f64)>,
    /// Quantity and amount per category name
    pub category_sales: Vec<(String, i32, f64)>,
    /// Unix milliseconds
    pub completed_at: i64,
}

/// Shift record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shift {
    pub id: String,
    /// Terminal this shift ran on
    pub terminal_id: String,
    pub terminal_name: String,
    /// Operator who clocked in
    pub operator_id: String,
    pub operator_name: String,
    pub status: ShiftStatus,
    /// Unix milliseconds
    pub start_time: i64,
    /// Unix milliseconds; set exactly once, at close
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<i64>,
    /// Opening cash balance counted at clock-in
    pub opening_balance: f64,
    /// Cash counted at clock-out
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closing_balance: Option<f64>,
    /// counted − expected; reported, never auto-corrected
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cash_variance: Option<f64>,
    /// Completed orders, in completion order
    #[serde(default)]
    pub orders: Vec<ShiftOrderSummary>,
    /// Cash movements, in record order
    #[serde(default)]
    pub transactions: Vec<CashTransaction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl Shift {
    pub fn is_open(&self) -> bool {
        self.status == ShiftStatus::Open
    }

    pub fn is_closed(&self) -> bool {
        self.status == ShiftStatus::Closed
    }
}

/// Open shift payload (clock-in)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShiftOpen {
    pub terminal_id: String,
    pub terminal_name: String,
    pub operator_id: String,
    pub operator_name: String,
    /// Opening cash balance (default 0)
    #[serde(default)]
    pub opening_balance: f64,
    pub note: Option<String>,
}

/// Close shift payload (clock-out with cash counting)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShiftClose {
    /// Actual cash counted in the drawer
    pub counted_cash: f64,
    pub note: Option<String>,
}
