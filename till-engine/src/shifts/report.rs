//! Z-report generation
//!
//! A pure read of a shift's data: aggregates per payment method, per
//! category and per cash-movement kind, plus the drawer reconciliation
//! block. Everything is deterministic - same shift in, same report out.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use shared::models::{
    CashReconciliation, CashTransactionKind, CategorySale, PaymentMethodSale, Shift,
    CashTransactionTotal, ZReport,
};

use crate::orders::money::{to_decimal, to_f64};

/// Expected drawer cash:
/// opening + cash sales − cash returns + cash in − cash out
pub fn expected_cash(shift: &Shift) -> f64 {
    let mut expected = to_decimal(shift.opening_balance);
    for transaction in &shift.transactions {
        let cash = to_decimal(transaction.cash_amount);
        match transaction.kind {
            CashTransactionKind::Sale | CashTransactionKind::CashIn => expected += cash,
            CashTransactionKind::Return | CashTransactionKind::CashOut => expected -= cash,
            CashTransactionKind::NoSale => {}
        }
    }
    to_f64(expected)
}

/// Generate the Z-report for a shift.
///
/// The report timestamp is the shift's end time, so regenerating from
/// the same closed shift yields an identical report.
pub fn generate_z_report(shift: &Shift) -> ZReport {
    // Sales per payment method (sorted by method name)
    let mut methods: BTreeMap<String, (i64, Decimal)> = BTreeMap::new();
    for order in &shift.orders {
        for (method, amount) in &order.payments {
            let entry = methods.entry(method.clone()).or_insert((0, Decimal::ZERO));
            entry.0 += 1;
            entry.1 += to_decimal(*amount);
        }
    }
    let payment_method_sales = methods
        .into_iter()
        .map(|(method, (count, amount))| PaymentMethodSale {
            method,
            count,
            amount: to_f64(amount),
        })
        .collect();

    // Sales per category (sorted by category name)
    let mut categories: BTreeMap<String, (i64, Decimal)> = BTreeMap::new();
    for order in &shift.orders {
        for (category, quantity, amount) in &order.category_sales {
            let entry = categories
                .entry(category.clone())
                .or_insert((0, Decimal::ZERO));
            entry.0 += *quantity as i64;
            entry.1 += to_decimal(*amount);
        }
    }
    let category_sales = categories
        .into_iter()
        .map(|(category, (quantity, amount))| CategorySale {
            category,
            quantity,
            amount: to_f64(amount),
        })
        .collect();

    // Cash movement totals, in fixed kind order
    let kinds = [
        CashTransactionKind::Sale,
        CashTransactionKind::Return,
        CashTransactionKind::CashIn,
        CashTransactionKind::CashOut,
        CashTransactionKind::NoSale,
    ];
    let cash_transaction_totals = kinds
        .iter()
        .map(|kind| {
            let mut count = 0;
            let mut total = Decimal::ZERO;
            for transaction in shift.transactions.iter().filter(|t| t.kind == *kind) {
                count += 1;
                total += to_decimal(transaction.amount);
            }
            CashTransactionTotal {
                kind: kind.to_string(),
                count,
                total: to_f64(total),
            }
        })
        .collect();

    // Reconciliation block
    let mut cash_sales = Decimal::ZERO;
    let mut cash_returns = Decimal::ZERO;
    let mut cash_in = Decimal::ZERO;
    let mut cash_out = Decimal::ZERO;
    for transaction in &shift.transactions {
        let cash = to_decimal(transaction.cash_amount);
        match transaction.kind {
            CashTransactionKind::Sale => cash_sales += cash,
            CashTransactionKind::Return => cash_returns += cash,
            CashTransactionKind::CashIn => cash_in += cash,
            CashTransactionKind::CashOut => cash_out += cash,
            CashTransactionKind::NoSale => {}
        }
    }
    let expected = expected_cash(shift);
    let counted = shift.closing_balance.unwrap_or(expected);
    let reconciliation = CashReconciliation {
        opening_balance: shift.opening_balance,
        cash_sales: to_f64(cash_sales),
        cash_returns: to_f64(cash_returns),
        cash_in: to_f64(cash_in),
        cash_out: to_f64(cash_out),
        expected_cash: expected,
        counted_cash: counted,
        variance: to_f64(to_decimal(counted) - to_decimal(expected)),
    };

    let gross_sales: Decimal = shift.orders.iter().map(|o| to_decimal(o.total)).sum();

    ZReport {
        terminal: shift.terminal_name.clone(),
        cashier: shift.operator_name.clone(),
        shift: shift.clone(),
        total_orders: shift.orders.len() as i64,
        gross_sales: to_f64(gross_sales),
        payment_method_sales,
        category_sales,
        cash_transaction_totals,
        cash_transaction_report: shift.transactions.clone(),
        reconciliation,
        // End time keeps regeneration idempotent; open shifts preview
        // with their start time
        generated_at: shift.end_time.unwrap_or(shift.start_time),
    }
}
