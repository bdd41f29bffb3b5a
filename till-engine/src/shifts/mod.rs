//! Shift ledger and cash-drawer reconciliation
//!
//! One clock-in/clock-out session per terminal: `NotStarted → Open →
//! Closed`, with `Closed` terminal. While open, completed orders and
//! cash movements append to the shift's transaction log. Closing is a
//! single atomic step that freezes the log, reconciles the drawer and
//! generates the Z-report.

pub mod report;

use thiserror::Error;
use tracing::{info, warn};

use shared::models::{
    CashTransaction, CashTransactionKind, Shift, ShiftClose, ShiftOpen, ShiftOrderSummary,
    ShiftStatus, ZReport,
};
use shared::order::{OrderSnapshot, TenderMethod};
use shared::util::{now_millis, snowflake_id};

use crate::orders::money::{money_eq, sum_payments, to_decimal, to_f64};
use crate::providers::{NoopRepository, ShiftRepository};

pub use report::generate_z_report;

/// Shift lifecycle errors.
///
/// `AlreadyClosed` and `NotOpen` are invariant violations - a correct
/// caller never triggers them, and they must not be swallowed.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ShiftError {
    #[error("no shift is open")]
    NotOpen,

    #[error("a shift is already open")]
    AlreadyOpen,

    #[error("shift is already closed")]
    AlreadyClosed,

    #[error("shift is not closed")]
    NotClosed,

    #[error("{0}")]
    InvalidAmount(String),

    #[error("order is not completed")]
    OrderNotCompleted,

    #[error("order total does not match its tenders")]
    UnbalancedOrder,
}

impl From<ShiftError> for shared::error::AppError {
    fn from(err: ShiftError) -> Self {
        use shared::error::{AppError, ErrorCode};
        let code = match &err {
            ShiftError::NotOpen => ErrorCode::ShiftNotOpen,
            ShiftError::AlreadyOpen => ErrorCode::ShiftAlreadyOpen,
            ShiftError::AlreadyClosed => ErrorCode::ShiftAlreadyClosed,
            ShiftError::InvalidAmount(_) => ErrorCode::ValidationFailed,
            // Caller bugs: must surface loudly, never as a user error
            ShiftError::NotClosed
            | ShiftError::OrderNotCompleted
            | ShiftError::UnbalancedOrder => ErrorCode::InvariantViolation,
        };
        AppError::with_message(code, err.to_string())
    }
}

/// Cash amounts must be finite and non-negative
fn validate_cash(value: f64, field: &str) -> Result<(), ShiftError> {
    if !value.is_finite() {
        return Err(ShiftError::InvalidAmount(format!(
            "{} must be a finite number",
            field
        )));
    }
    if value < 0.0 {
        return Err(ShiftError::InvalidAmount(format!(
            "{} must be non-negative, got {}",
            field, value
        )));
    }
    Ok(())
}

enum ShiftState {
    NotStarted,
    Open(Shift),
    Closed(Shift),
}

/// The shift ledger: one logical cash drawer on one terminal
pub struct ShiftLedger {
    state: ShiftState,
    repository: Box<dyn ShiftRepository>,
}

impl Default for ShiftLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl ShiftLedger {
    pub fn new() -> Self {
        Self::with_repository(Box::new(NoopRepository))
    }

    pub fn with_repository(repository: Box<dyn ShiftRepository>) -> Self {
        Self {
            state: ShiftState::NotStarted,
            repository,
        }
    }

    /// The open shift, if any
    pub fn current(&self) -> Option<&Shift> {
        match &self.state {
            ShiftState::Open(shift) => Some(shift),
            _ => None,
        }
    }

    /// The closed shift, if the ledger has been closed
    pub fn closed(&self) -> Option<&Shift> {
        match &self.state {
            ShiftState::Closed(shift) => Some(shift),
            _ => None,
        }
    }

    /// Clock in: open the shift with a counted opening balance.
    pub fn open(&mut self, payload: ShiftOpen) -> Result<&Shift, ShiftError> {
        match self.state {
            ShiftState::NotStarted => {}
            ShiftState::Open(_) => return Err(ShiftError::AlreadyOpen),
            ShiftState::Closed(_) => return Err(ShiftError::AlreadyClosed),
        }
        validate_cash(payload.opening_balance, "opening_balance")?;

        let shift = Shift {
            id: format!("shift-{}", snowflake_id()),
            terminal_id: payload.terminal_id,
            terminal_name: payload.terminal_name,
            operator_id: payload.operator_id,
            operator_name: payload.operator_name,
            status: ShiftStatus::Open,
            start_time: now_millis(),
            end_time: None,
            opening_balance: payload.opening_balance,
            closing_balance: None,
            cash_variance: None,
            orders: Vec::new(),
            transactions: Vec::new(),
            note: payload.note,
        };
        info!(
            shift_id = %shift.id,
            operator = %shift.operator_name,
            opening_balance = shift.opening_balance,
            "shift opened"
        );

        self.state = ShiftState::Open(shift);
        Ok(self.current().expect("just opened"))
    }

    fn open_shift_mut(&mut self) -> Result<&mut Shift, ShiftError> {
        match &mut self.state {
            ShiftState::Open(shift) => Ok(shift),
            ShiftState::NotStarted => Err(ShiftError::NotOpen),
            ShiftState::Closed(_) => Err(ShiftError::AlreadyClosed),
        }
    }

    /// Record a completed order against the shift.
    ///
    /// The order must be completed and its non-cancelled tenders must
    /// sum to its total (within a cent) - anything else indicates the
    /// caller skipped the tender allocator and is rejected loudly.
    pub fn record_order(&mut self, snapshot: &OrderSnapshot) -> Result<(), ShiftError> {
        if !snapshot.is_completed() {
            return Err(ShiftError::OrderNotCompleted);
        }
        if !money_eq(sum_payments(&snapshot.payments), snapshot.total) {
            warn!(
                order_id = %snapshot.order_id,
                total = snapshot.total,
                paid = sum_payments(&snapshot.payments),
                "rejecting unbalanced order"
            );
            return Err(ShiftError::UnbalancedOrder);
        }

        let shift = self.open_shift_mut()?;

        // Per-method tender amounts, in submission order
        let mut payments: Vec<(String, f64)> = Vec::new();
        let mut cash_amount = rust_decimal::Decimal::ZERO;
        for payment in snapshot.payments.iter().filter(|p| !p.cancelled) {
            payments.push((payment.method.to_string(), payment.amount));
            if payment.method == TenderMethod::Cash {
                cash_amount += to_decimal(payment.amount);
            }
        }

        // Quantity and amount per category
        let mut category_sales: Vec<(String, i32, f64)> = Vec::new();
        for item in &snapshot.items {
            match category_sales
                .iter_mut()
                .find(|(category, _, _)| *category == item.category_name)
            {
                Some((_, quantity, amount)) => {
                    *quantity += item.quantity;
                    *amount += item.line_total;
                }
                None => category_sales.push((
                    item.category_name.clone(),
                    item.quantity,
                    item.line_total,
                )),
            }
        }

        let completed_at = snapshot.end_time.unwrap_or_else(now_millis);
        shift.orders.push(ShiftOrderSummary {
            order_id: snapshot.order_id.clone(),
            receipt_number: snapshot.receipt_number.clone(),
            total: snapshot.total,
            payments,
            category_sales,
            completed_at,
        });
        shift.transactions.push(CashTransaction {
            kind: CashTransactionKind::Sale,
            amount: snapshot.total,
            cash_amount: to_f64(cash_amount),
            note: Some(snapshot.receipt_number.clone()),
            timestamp: completed_at,
        });

        Ok(())
    }

    /// Record a refund leaving the drawer (or a non-cash refund, which
    /// affects totals but not expected cash).
    pub fn record_return(
        &mut self,
        amount: f64,
        method: TenderMethod,
        note: Option<String>,
    ) -> Result<(), ShiftError> {
        validate_cash(amount, "return amount")?;
        let shift = self.open_shift_mut()?;
        shift.transactions.push(CashTransaction {
            kind: CashTransactionKind::Return,
            amount,
            cash_amount: if method == TenderMethod::Cash { amount } else { 0.0 },
            note,
            timestamp: now_millis(),
        });
        Ok(())
    }

    /// Money added to the drawer outside a sale
    pub fn record_cash_in(&mut self, amount: f64, note: Option<String>) -> Result<(), ShiftError> {
        validate_cash(amount, "cash in amount")?;
        let shift = self.open_shift_mut()?;
        shift.transactions.push(CashTransaction {
            kind: CashTransactionKind::CashIn,
            amount,
            cash_amount: amount,
            note,
            timestamp: now_millis(),
        });
        Ok(())
    }

    /// Money removed from the drawer outside a sale
    pub fn record_cash_out(&mut self, amount: f64, note: Option<String>) -> Result<(), ShiftError> {
        validate_cash(amount, "cash out amount")?;
        let shift = self.open_shift_mut()?;
        shift.transactions.push(CashTransaction {
            kind: CashTransactionKind::CashOut,
            amount,
            cash_amount: amount,
            note,
            timestamp: now_millis(),
        });
        Ok(())
    }

    /// Drawer opened without a transaction
    pub fn record_no_sale(&mut self, note: Option<String>) -> Result<(), ShiftError> {
        let shift = self.open_shift_mut()?;
        shift.transactions.push(CashTransaction {
            kind: CashTransactionKind::NoSale,
            amount: 0.0,
            cash_amount: 0.0,
            note,
            timestamp: now_millis(),
        });
        Ok(())
    }

    /// Expected drawer cash for the open shift:
    /// opening + cash sales − cash returns + cash in − cash out
    pub fn expected_cash(&self) -> Result<f64, ShiftError> {
        match &self.state {
            ShiftState::Open(shift) | ShiftState::Closed(shift) => {
                Ok(report::expected_cash(shift))
            }
            ShiftState::NotStarted => Err(ShiftError::NotOpen),
        }
    }

    /// Clock out: close the shift against the counted drawer cash.
    ///
    /// This transition is irreversible and atomic - it freezes the
    /// transaction log, records the variance (reported, never
    /// auto-corrected), generates the Z-report and hands the closed
    /// shift to the repository in one step. No order can be appended
    /// after the closing balance is recorded.
    pub fn close(&mut self, payload: ShiftClose) -> Result<ZReport, ShiftError> {
        validate_cash(payload.counted_cash, "counted_cash")?;

        let shift = match &mut self.state {
            ShiftState::Open(shift) => shift,
            ShiftState::NotStarted => return Err(ShiftError::NotOpen),
            ShiftState::Closed(_) => return Err(ShiftError::AlreadyClosed),
        };

        let expected = report::expected_cash(shift);
        let variance = to_f64(to_decimal(payload.counted_cash) - to_decimal(expected));

        shift.status = ShiftStatus::Closed;
        shift.end_time = Some(now_millis());
        shift.closing_balance = Some(payload.counted_cash);
        shift.cash_variance = Some(variance);
        if let Some(note) = payload.note {
            shift.note = Some(note);
        }

        if variance != 0.0 {
            warn!(
                shift_id = %shift.id,
                expected,
                counted = payload.counted_cash,
                variance,
                "shift closed with cash variance"
            );
        } else {
            info!(shift_id = %shift.id, expected, "shift closed, drawer balanced");
        }

        let z_report = generate_z_report(shift);
        self.repository.store_shift(shift);

        // Freeze: the shift is terminal from here on
        let closed = std::mem::replace(
            &mut self.state,
            ShiftState::NotStarted,
        );
        if let ShiftState::Open(shift) = closed {
            self.state = ShiftState::Closed(shift);
        }

        Ok(z_report)
    }

    /// Regenerate the Z-report from the closed shift. Pure read -
    /// generating it twice yields identical aggregates.
    pub fn report(&self) -> Result<ZReport, ShiftError> {
        match &self.state {
            ShiftState::Closed(shift) => Ok(generate_z_report(shift)),
            _ => Err(ShiftError::NotClosed),
        }
    }
}

#[cfg(test)]
mod tests;
