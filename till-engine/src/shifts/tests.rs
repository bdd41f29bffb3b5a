//! Shift ledger and reconciliation tests

use super::*;
use shared::order::{OrderStatus, PaymentRecord};
use std::cell::RefCell;
use std::rc::Rc;

fn open_payload(opening: f64) -> ShiftOpen {
    ShiftOpen {
        terminal_id: "term-1".to_string(),
        terminal_name: "Front Counter".to_string(),
        operator_id: "user-1".to_string(),
        operator_name: "Casey".to_string(),
        opening_balance: opening,
        note: None,
    }
}

fn open_ledger(opening: f64) -> ShiftLedger {
    let mut ledger = ShiftLedger::new();
    ledger.open(open_payload(opening)).unwrap();
    ledger
}

fn completed_order(
    order_id: &str,
    total: f64,
    payments: Vec<(TenderMethod, f64)>,
) -> OrderSnapshot {
    let mut snapshot = OrderSnapshot::new(order_id.to_string(), 0.0);
    snapshot.status = OrderStatus::Completed;
    snapshot.receipt_number = format!("R-{}", order_id);
    snapshot.total = total;
    snapshot.end_time = Some(snapshot.start_time);
    for (idx, (method, amount)) in payments.into_iter().enumerate() {
        snapshot.payments.push(PaymentRecord {
            payment_id: format!("pay-{}-{}", order_id, idx),
            method,
            amount,
            tendered: None,
            change: None,
            card_number: None,
            note: None,
            timestamp: snapshot.start_time,
            cancelled: false,
            cancel_reason: None,
        });
    }
    snapshot
}

fn cash_order(order_id: &str, total: f64) -> OrderSnapshot {
    completed_order(order_id, total, vec![(TenderMethod::Cash, total)])
}

// ============================================================================
// Lifecycle
// ============================================================================

#[test]
fn open_then_close_is_terminal() {
    let mut ledger = open_ledger(100.0);
    assert!(ledger.current().is_some());

    let report = ledger
        .close(ShiftClose {
            counted_cash: 100.0,
            note: None,
        })
        .unwrap();
    assert_eq!(report.reconciliation.variance, 0.0);
    assert!(ledger.current().is_none());
    assert!(ledger.closed().is_some());

    // Closing twice is an invariant violation, not a silent no-op
    assert!(matches!(
        ledger.close(ShiftClose {
            counted_cash: 100.0,
            note: None,
        }),
        Err(ShiftError::AlreadyClosed)
    ));
}

#[test]
fn double_open_rejected() {
    let mut ledger = open_ledger(100.0);
    assert!(matches!(
        ledger.open(open_payload(50.0)),
        Err(ShiftError::AlreadyOpen)
    ));
}

#[test]
fn recording_without_open_shift_rejected() {
    let mut ledger = ShiftLedger::new();
    assert_eq!(
        ledger.record_cash_in(10.0, None),
        Err(ShiftError::NotOpen)
    );
    assert_eq!(
        ledger.record_order(&cash_order("o1", 10.0)),
        Err(ShiftError::NotOpen)
    );
}

#[test]
fn nothing_can_be_recorded_after_close() {
    let mut ledger = open_ledger(100.0);
    ledger
        .close(ShiftClose {
            counted_cash: 100.0,
            note: None,
        })
        .unwrap();

    assert_eq!(
        ledger.record_order(&cash_order("o1", 10.0)),
        Err(ShiftError::AlreadyClosed)
    );
    assert_eq!(
        ledger.record_cash_out(5.0, None),
        Err(ShiftError::AlreadyClosed)
    );
}

#[test]
fn negative_opening_balance_rejected() {
    let mut ledger = ShiftLedger::new();
    assert!(matches!(
        ledger.open(open_payload(-1.0)),
        Err(ShiftError::InvalidAmount(_))
    ));
}

// ============================================================================
// Recording
// ============================================================================

#[test]
fn incomplete_order_rejected() {
    let mut ledger = open_ledger(100.0);
    let mut snapshot = cash_order("o1", 10.0);
    snapshot.status = OrderStatus::Active;
    assert_eq!(
        ledger.record_order(&snapshot),
        Err(ShiftError::OrderNotCompleted)
    );
}

#[test]
fn unbalanced_order_rejected() {
    let mut ledger = open_ledger(100.0);
    let snapshot = completed_order("o1", 20.0, vec![(TenderMethod::Cash, 12.0)]);
    assert_eq!(
        ledger.record_order(&snapshot),
        Err(ShiftError::UnbalancedOrder)
    );
}

#[test]
fn sale_tracks_cash_portion_separately() {
    let mut ledger = open_ledger(100.0);
    let snapshot = completed_order(
        "o1",
        50.0,
        vec![(TenderMethod::Cash, 20.0), (TenderMethod::Card, 30.0)],
    );
    ledger.record_order(&snapshot).unwrap();

    let shift = ledger.current().unwrap();
    assert_eq!(shift.transactions.len(), 1);
    assert_eq!(shift.transactions[0].amount, 50.0);
    assert_eq!(shift.transactions[0].cash_amount, 20.0);
    // Only cash affects the drawer
    assert_eq!(ledger.expected_cash().unwrap(), 120.0);
}

// ============================================================================
// Reconciliation
// ============================================================================

#[test]
fn expected_cash_round_trip_with_only_sales() {
    // With zero cash movements beyond sales:
    // expected = opening + cash sales
    let mut ledger = open_ledger(100.0);
    ledger.record_order(&cash_order("o1", 40.0)).unwrap();
    ledger.record_order(&cash_order("o2", 25.5)).unwrap();

    assert_eq!(ledger.expected_cash().unwrap(), 165.5);
}

#[test]
fn spec_scenario_drawer_short_five() {
    // opening $100, $240 cash sales, $20 cashOut, counted $315
    // → expected 320, variance −5
    let mut ledger = open_ledger(100.0);
    ledger.record_order(&cash_order("o1", 240.0)).unwrap();
    ledger
        .record_cash_out(20.0, Some("bank drop".to_string()))
        .unwrap();

    let report = ledger
        .close(ShiftClose {
            counted_cash: 315.0,
            note: None,
        })
        .unwrap();

    assert_eq!(report.reconciliation.expected_cash, 320.0);
    assert_eq!(report.reconciliation.counted_cash, 315.0);
    assert_eq!(report.reconciliation.variance, -5.0);
    assert_eq!(ledger.closed().unwrap().cash_variance, Some(-5.0));
}

#[test]
fn returns_and_cash_in_feed_the_formula() {
    let mut ledger = open_ledger(50.0);
    ledger.record_order(&cash_order("o1", 100.0)).unwrap();
    ledger.record_cash_in(30.0, None).unwrap();
    ledger
        .record_return(15.0, TenderMethod::Cash, Some("refund".to_string()))
        .unwrap();
    ledger.record_return(10.0, TenderMethod::Card, None).unwrap();
    ledger.record_no_sale(Some("change request".to_string())).unwrap();

    // 50 + 100 + 30 − 15 (card return does not touch the drawer)
    assert_eq!(ledger.expected_cash().unwrap(), 165.0);
}

// ============================================================================
// Z-report
// ============================================================================

#[test]
fn z_report_aggregates_methods_and_categories() {
    let mut ledger = open_ledger(100.0);

    let mut o1 = completed_order(
        "o1",
        30.0,
        vec![(TenderMethod::Cash, 10.0), (TenderMethod::Card, 20.0)],
    );
    o1.items.push({
        let mut item = shared::order::CartItemSnapshot {
            id: "p1".to_string(),
            instance_id: "i1".to_string(),
            name: "Latte".to_string(),
            category_name: "Coffee".to_string(),
            price: 15.0,
            variation: None,
            modifiers: Vec::new(),
            quantity: 2,
            price_override: None,
            discount: None,
            seat_number: None,
            course: None,
            note: None,
            authorizer_id: None,
            authorizer_name: None,
            unit_basis: 0.0,
            modifiers_total: 0.0,
            line_subtotal: 0.0,
            discount_amount: 0.0,
            line_total: 0.0,
        };
        item.line_total = 30.0;
        item
    });
    ledger.record_order(&o1).unwrap();
    ledger.record_order(&cash_order("o2", 12.0)).unwrap();

    let report = ledger
        .close(ShiftClose {
            counted_cash: 122.0,
            note: None,
        })
        .unwrap();

    assert_eq!(report.total_orders, 2);
    assert_eq!(report.gross_sales, 42.0);
    assert_eq!(report.terminal, "Front Counter");
    assert_eq!(report.cashier, "Casey");

    // Methods sorted by name: Card before Cash
    assert_eq!(report.payment_method_sales.len(), 2);
    assert_eq!(report.payment_method_sales[0].method, "Card");
    assert_eq!(report.payment_method_sales[0].amount, 20.0);
    assert_eq!(report.payment_method_sales[1].method, "Cash");
    assert_eq!(report.payment_method_sales[1].amount, 22.0);

    assert_eq!(report.category_sales.len(), 1);
    assert_eq!(report.category_sales[0].category, "Coffee");
    assert_eq!(report.category_sales[0].quantity, 2);
    assert_eq!(report.category_sales[0].amount, 30.0);
}

#[test]
fn z_report_generation_is_idempotent() {
    let mut ledger = open_ledger(100.0);
    ledger.record_order(&cash_order("o1", 55.25)).unwrap();
    ledger.record_cash_out(10.0, None).unwrap();

    let first = ledger
        .close(ShiftClose {
            counted_cash: 145.0,
            note: None,
        })
        .unwrap();
    let second = ledger.report().unwrap();
    let third = ledger.report().unwrap();

    assert_eq!(first.generated_at, second.generated_at);
    assert_eq!(first.reconciliation, second.reconciliation);
    assert_eq!(first.payment_method_sales, second.payment_method_sales);
    assert_eq!(first.category_sales, second.category_sales);
    assert_eq!(first.cash_transaction_totals, second.cash_transaction_totals);
    assert_eq!(second.reconciliation, third.reconciliation);
}

#[test]
fn report_before_close_rejected() {
    let ledger = open_ledger(100.0);
    assert!(matches!(ledger.report(), Err(ShiftError::NotClosed)));
}

#[test]
fn shift_errors_map_to_boundary_codes() {
    use shared::error::{AppError, ErrorCode};
    let err: AppError = ShiftError::AlreadyClosed.into();
    assert_eq!(err.code, ErrorCode::ShiftAlreadyClosed);
    let err: AppError = ShiftError::UnbalancedOrder.into();
    assert_eq!(err.code, ErrorCode::InvariantViolation);
}

#[test]
fn close_hands_shift_to_repository() {
    let repo = Rc::new(RefCell::new(crate::providers::InMemoryRepository::new()));
    let mut ledger = ShiftLedger::with_repository(Box::new(Rc::clone(&repo)));
    ledger.open(open_payload(80.0)).unwrap();
    ledger
        .close(ShiftClose {
            counted_cash: 80.0,
            note: Some("quiet night".to_string()),
        })
        .unwrap();

    let stored = repo.borrow();
    assert_eq!(stored.shifts.len(), 1);
    assert!(stored.shifts[0].is_closed());
    assert_eq!(stored.shifts[0].closing_balance, Some(80.0));
}
