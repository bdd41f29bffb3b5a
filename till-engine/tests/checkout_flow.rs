//! End-to-end checkout flows: open → price → gate → tender → complete
//! → shift reconciliation, through the public engine surface only.

use std::cell::RefCell;
use std::rc::Rc;

use shared::models::{Operator, Role, ShiftClose, ShiftOpen};
use shared::order::{
    CartItemInput, CommandErrorCode, Discount, DiscountKind, ItemChanges, OrderCommand,
    OrderCommandPayload, OrderSnapshot, OrderStatus, PaymentInput, TenderMethod,
};
use till_engine::audit::OverrideKind;
use till_engine::auth::{GateDecision, GateValue, SensitiveAction};
use till_engine::orders::reducer;
use till_engine::providers::{
    Credential, InMemoryCatalog, InMemoryGiftCards, InMemoryIdentities, InMemoryRepository,
    NoGiftCards, UntrackedCatalog,
};
use till_engine::{EngineConfig, OrdersManager, ShiftLedger};

// ============================================================================
// Helpers
// ============================================================================

fn cashier() -> Operator {
    Operator {
        id: "cashier-1".to_string(),
        name: "Casey".to_string(),
        role: Role::Cashier,
    }
}

fn command(operator: &Operator, payload: OrderCommandPayload) -> OrderCommand {
    OrderCommand {
        command_id: uuid::Uuid::new_v4().to_string(),
        operator_id: operator.id.clone(),
        operator_name: operator.name.clone(),
        timestamp: shared::util::now_millis(),
        payload,
    }
}

fn latte(quantity: i32) -> CartItemInput {
    CartItemInput {
        product_id: "prod-latte".to_string(),
        name: "Latte".to_string(),
        category_name: "Coffee".to_string(),
        price: 10.0,
        variation: None,
        modifiers: Vec::new(),
        quantity,
        seat_number: None,
        course: None,
        note: None,
    }
}

fn config_with_tax(tax_rate: f64) -> EngineConfig {
    EngineConfig {
        tax_rate,
        ..EngineConfig::default()
    }
}

/// Open an order and return its id
fn open_order(manager: &mut OrdersManager, operator: &Operator) -> String {
    let response = manager.process_command(
        &command(
            operator,
            OrderCommandPayload::OpenOrder {
                order_type: None,
                table_name: None,
                guest_count: None,
                customer: None,
            },
        ),
        operator.role,
        None,
    );
    assert!(response.success, "open failed: {:?}", response.error);
    response.order_id.expect("OpenOrder returns the new id")
}

fn add_items(
    manager: &mut OrdersManager,
    operator: &Operator,
    order_id: &str,
    items: Vec<CartItemInput>,
) {
    let response = manager.process_command(
        &command(
            operator,
            OrderCommandPayload::AddItems {
                order_id: order_id.to_string(),
                items,
            },
        ),
        operator.role,
        None,
    );
    assert!(response.success, "add items failed: {:?}", response.error);
}

fn pay_cash(manager: &mut OrdersManager, operator: &Operator, order_id: &str, amount: f64, tendered: f64) {
    let response = manager.process_command(
        &command(
            operator,
            OrderCommandPayload::AddPayment {
                order_id: order_id.to_string(),
                payment: PaymentInput {
                    method: TenderMethod::Cash,
                    amount,
                    tendered: Some(tendered),
                    card_number: None,
                    note: None,
                },
            },
        ),
        operator.role,
        None,
    );
    assert!(response.success, "payment failed: {:?}", response.error);
}

fn complete(manager: &mut OrdersManager, operator: &Operator, order_id: &str) {
    let response = manager.process_command(
        &command(
            operator,
            OrderCommandPayload::CompleteOrder {
                order_id: order_id.to_string(),
            },
        ),
        operator.role,
        None,
    );
    assert!(response.success, "complete failed: {:?}", response.error);
}

// ============================================================================
// Full checkout, end to end
// ============================================================================

#[test]
fn full_checkout_with_discounts_tax_and_change() {
    let repo = Rc::new(RefCell::new(InMemoryRepository::new()));
    let mut manager = OrdersManager::with_providers(
        config_with_tax(0.08),
        Box::new(UntrackedCatalog),
        Box::new(NoGiftCards),
        Box::new(Rc::clone(&repo)),
    );
    let casey = cashier();

    // One line: $10.00 × 2 with a 10% line discount → 18.00
    let order_id = open_order(&mut manager, &casey);
    add_items(&mut manager, &casey, &order_id, vec![latte(2)]);

    let instance_id = manager.order(&order_id).unwrap().items[0].instance_id.clone();
    let response = manager.process_command(
        &command(
            &casey,
            OrderCommandPayload::ApplyItemDiscount {
                order_id: order_id.clone(),
                instance_id,
                discount: Discount {
                    kind: DiscountKind::Percentage,
                    value: 10.0,
                    reason: Some("Promotional".to_string()),
                },
                authorizer_id: None,
                authorizer_name: None,
            },
        ),
        casey.role,
        None,
    );
    assert!(response.success);

    {
        let order = manager.order(&order_id).unwrap();
        assert_eq!(order.items[0].line_subtotal, 20.0);
        assert_eq!(order.items[0].discount_amount, 2.0);
        assert_eq!(order.items[0].line_total, 18.0);
        assert_eq!(order.subtotal, 18.0);
    }

    // Order-level fixed $3.00 discount → taxable 15.00, tax 1.20, total 16.20
    let response = manager.process_command(
        &command(
            &casey,
            OrderCommandPayload::ApplyOrderDiscount {
                order_id: order_id.clone(),
                discount: Discount {
                    kind: DiscountKind::FixedAmount,
                    value: 3.0,
                    reason: Some("Promotional".to_string()),
                },
                authorizer_id: None,
                authorizer_name: None,
            },
        ),
        casey.role,
        None,
    );
    assert!(response.success);

    {
        let order = manager.order(&order_id).unwrap();
        assert_eq!(order.discount, 3.0);
        assert_eq!(order.tax, 1.2);
        assert_eq!(order.total, 16.2);
    }

    // Cash $20 on $16.20 → change 3.80, settled
    pay_cash(&mut manager, &casey, &order_id, 16.2, 20.0);
    {
        let order = manager.order(&order_id).unwrap();
        assert_eq!(order.paid_amount, 16.2);
        assert_eq!(order.remaining_amount(), 0.0);
        assert!(order.is_settled());
        assert_eq!(order.payments[0].change, Some(3.8));
    }

    complete(&mut manager, &casey, &order_id);
    let order = manager.order(&order_id).unwrap().clone();
    assert_eq!(order.status, OrderStatus::Completed);

    // Tenders sum to the total exactly
    let paid: f64 = order
        .payments
        .iter()
        .filter(|p| !p.cancelled)
        .map(|p| p.amount)
        .sum();
    assert!((paid - order.total).abs() <= 0.01);

    // Handed off to the repository
    assert_eq!(repo.borrow().orders.len(), 1);
    assert_eq!(repo.borrow().orders[0].order_id, order_id);

    // Shift picks it up, reconciles, and the Z-report agrees
    let mut shift = ShiftLedger::with_repository(Box::new(Rc::clone(&repo)));
    shift
        .open(ShiftOpen {
            terminal_id: "term-1".to_string(),
            terminal_name: "Front".to_string(),
            operator_id: casey.id.clone(),
            operator_name: casey.name.clone(),
            opening_balance: 100.0,
            note: None,
        })
        .unwrap();
    shift.record_order(&order).unwrap();

    assert_eq!(shift.expected_cash().unwrap(), 116.2);
    let report = shift
        .close(ShiftClose {
            counted_cash: 116.2,
            note: None,
        })
        .unwrap();
    assert_eq!(report.total_orders, 1);
    assert_eq!(report.gross_sales, 16.2);
    assert_eq!(report.reconciliation.variance, 0.0);
    assert_eq!(report.payment_method_sales[0].method, "Cash");
    assert_eq!(report.payment_method_sales[0].amount, 16.2);
    assert_eq!(repo.borrow().shifts.len(), 1);
}

// ============================================================================
// Permission gate + approval flow
// ============================================================================

#[test]
fn cashier_discount_beyond_ceiling_needs_manager_approval() {
    let mut manager = OrdersManager::new(config_with_tax(0.0));
    let casey = cashier();

    let order_id = open_order(&mut manager, &casey);
    add_items(&mut manager, &casey, &order_id, vec![latte(1)]);
    let instance_id = manager.order(&order_id).unwrap().items[0].instance_id.clone();

    let discount_command = command(
        &casey,
        OrderCommandPayload::ApplyItemDiscount {
            order_id: order_id.clone(),
            instance_id: instance_id.clone(),
            discount: Discount {
                kind: DiscountKind::Percentage,
                value: 25.0,
                reason: Some("Manager Discretion".to_string()),
            },
            authorizer_id: None,
            authorizer_name: None,
        },
    );

    // 25% is beyond the cashier's 10% ceiling
    let response = manager.process_command(&discount_command, casey.role, None);
    assert!(!response.success);
    let error = response.error.unwrap();
    assert_eq!(error.code, CommandErrorCode::ApprovalRequired);
    assert!(error.message.contains("10%"), "got: {}", error.message);
    assert!(manager.order(&order_id).unwrap().items[0].discount.is_none());
    assert!(manager.audit().is_empty());

    // Two-phase approval: request → manager PIN → approval
    let mut identities = InMemoryIdentities::new();
    identities.register(
        "4242",
        Operator {
            id: "mgr-1".to_string(),
            name: "Morgan".to_string(),
            role: Role::Manager,
        },
    );
    let decision = manager.gate().check(
        SensitiveAction::ApplyDiscount,
        casey.role,
        Some(&GateValue::Percent(25.0)),
    );
    let reason = match decision {
        GateDecision::RequiresApproval { reason } => reason,
        GateDecision::Allowed => panic!("expected RequiresApproval"),
    };
    let token = manager.gate().request_approval(
        SensitiveAction::ApplyDiscount,
        Some(GateValue::Percent(25.0)),
        &casey,
        reason,
    );
    let approval = manager
        .gate()
        .approve(token, &Credential::pin("4242"), &identities)
        .unwrap();

    // Same command, now with the approval attached
    let response = manager.process_command(&discount_command, casey.role, Some(&approval));
    assert!(response.success, "approved retry failed: {:?}", response.error);

    let order = manager.order(&order_id).unwrap();
    assert_eq!(order.items[0].discount.as_ref().unwrap().value, 25.0);
    assert_eq!(order.items[0].line_total, 7.5);
    // The approving manager, not the cashier, is on the line and in the audit
    assert_eq!(order.items[0].authorizer_id.as_deref(), Some("mgr-1"));

    assert_eq!(manager.audit().len(), 1);
    let entry = &manager.audit().entries()[0];
    assert_eq!(entry.kind, OverrideKind::ItemDiscount);
    assert_eq!(entry.actor_id, "mgr-1");
    assert_eq!(entry.actor_name, "Morgan");
    assert_eq!(entry.reason, "Manager Discretion");
}

#[test]
fn discount_outside_taxonomy_rejected() {
    let mut config = config_with_tax(0.0);
    config.discount_reasons.retain(|r| r != "Other");
    let mut manager = OrdersManager::new(config);
    let casey = cashier();

    let order_id = open_order(&mut manager, &casey);
    add_items(&mut manager, &casey, &order_id, vec![latte(1)]);
    let instance_id = manager.order(&order_id).unwrap().items[0].instance_id.clone();

    let response = manager.process_command(
        &command(
            &casey,
            OrderCommandPayload::ApplyItemDiscount {
                order_id,
                instance_id,
                discount: Discount {
                    kind: DiscountKind::Percentage,
                    value: 5.0,
                    reason: Some("because".to_string()),
                },
                authorizer_id: None,
                authorizer_name: None,
            },
        ),
        casey.role,
        None,
    );
    assert!(!response.success);
    assert_eq!(response.error.unwrap().code, CommandErrorCode::MissingReason);
}

#[test]
fn client_supplied_authorizer_is_ignored() {
    // A client cannot smuggle an authorizer past the gate: the engine
    // overwrites the fields from the verified approval (or clears them)
    let mut manager = OrdersManager::new(config_with_tax(0.0));
    let casey = cashier();

    let order_id = open_order(&mut manager, &casey);
    add_items(&mut manager, &casey, &order_id, vec![latte(1)]);
    let instance_id = manager.order(&order_id).unwrap().items[0].instance_id.clone();

    let response = manager.process_command(
        &command(
            &casey,
            OrderCommandPayload::VoidItem {
                order_id: order_id.clone(),
                instance_id,
                quantity: None,
                reason: "oops".to_string(),
                authorizer_id: Some("mgr-forged".to_string()),
                authorizer_name: Some("Forged".to_string()),
            },
        ),
        casey.role,
        None,
    );
    // Cashier cannot void, forged fields change nothing
    assert!(!response.success);
    assert_eq!(
        response.error.unwrap().code,
        CommandErrorCode::ApprovalRequired
    );
    assert!(manager.audit().is_empty());
}

// ============================================================================
// Void vs silent removal
// ============================================================================

#[test]
fn void_audits_but_quantity_zero_does_not() {
    let mut manager = OrdersManager::new(config_with_tax(0.0));
    let manager_op = Operator {
        id: "mgr-1".to_string(),
        name: "Morgan".to_string(),
        role: Role::Manager,
    };

    let order_id = open_order(&mut manager, &manager_op);
    add_items(&mut manager, &manager_op, &order_id, vec![latte(1)]);
    let mut tea = latte(1);
    tea.product_id = "prod-tea".to_string();
    tea.name = "Tea".to_string();
    add_items(&mut manager, &manager_op, &order_id, vec![tea]);

    let (latte_id, tea_id) = {
        let order = manager.order(&order_id).unwrap();
        (
            order.items[0].instance_id.clone(),
            order.items[1].instance_id.clone(),
        )
    };

    // Quantity → 0: silent removal, no audit entry
    let response = manager.process_command(
        &command(
            &manager_op,
            OrderCommandPayload::ModifyItem {
                order_id: order_id.clone(),
                instance_id: latte_id,
                changes: ItemChanges {
                    quantity: Some(0),
                    ..Default::default()
                },
            },
        ),
        manager_op.role,
        None,
    );
    assert!(response.success);
    assert_eq!(manager.order(&order_id).unwrap().items.len(), 1);
    assert!(manager.audit().is_empty());

    // Void: removal + exactly one audit entry
    let response = manager.process_command(
        &command(
            &manager_op,
            OrderCommandPayload::VoidItem {
                order_id: order_id.clone(),
                instance_id: tea_id,
                quantity: None,
                reason: "Customer changed mind".to_string(),
                authorizer_id: None,
                authorizer_name: None,
            },
        ),
        manager_op.role,
        None,
    );
    assert!(response.success);
    assert!(manager.order(&order_id).unwrap().items.is_empty());
    assert_eq!(manager.audit().len(), 1);
    assert_eq!(manager.audit().entries()[0].kind, OverrideKind::Void);
    assert_eq!(manager.audit().entries()[0].actor_id, "mgr-1");
    assert!(manager.audit().verify_chain().chain_intact);
}

// ============================================================================
// Stock ceiling
// ============================================================================

#[test]
fn stock_ceiling_blocks_over_adding() {
    let mut catalog = InMemoryCatalog::new();
    catalog.set_stock("prod-latte", None, 2);
    let mut manager = OrdersManager::with_providers(
        config_with_tax(0.0),
        Box::new(catalog),
        Box::new(NoGiftCards),
        Box::new(InMemoryRepository::new()),
    );
    let casey = cashier();

    let order_id = open_order(&mut manager, &casey);
    let response = manager.process_command(
        &command(
            &casey,
            OrderCommandPayload::AddItems {
                order_id: order_id.clone(),
                items: vec![latte(3)],
            },
        ),
        casey.role,
        None,
    );
    assert!(!response.success);
    assert_eq!(
        response.error.unwrap().code,
        CommandErrorCode::InsufficientStock
    );
    assert!(manager.order(&order_id).unwrap().items.is_empty());

    // Within stock is fine
    add_items(&mut manager, &casey, &order_id, vec![latte(2)]);
    assert_eq!(manager.order(&order_id).unwrap().items[0].quantity, 2);
}

// ============================================================================
// Gift cards: redemption only at completion
// ============================================================================

#[test]
fn abandoned_checkout_never_debits_gift_card() {
    let cards = Rc::new(RefCell::new(InMemoryGiftCards::new()));
    cards.borrow_mut().issue("GC-100", 30.0);
    let mut manager = OrdersManager::with_providers(
        config_with_tax(0.0),
        Box::new(UntrackedCatalog),
        Box::new(Rc::clone(&cards)),
        Box::new(InMemoryRepository::new()),
    );
    let casey = cashier();

    let order_id = open_order(&mut manager, &casey);
    add_items(&mut manager, &casey, &order_id, vec![latte(1)]);

    let response = manager.process_command(
        &command(
            &casey,
            OrderCommandPayload::AddPayment {
                order_id: order_id.clone(),
                payment: PaymentInput {
                    method: TenderMethod::GiftCard,
                    amount: 10.0,
                    tendered: None,
                    card_number: Some("GC-100".to_string()),
                    note: None,
                },
            },
        ),
        casey.role,
        None,
    );
    assert!(response.success);

    // Tender is pending, card untouched
    assert_eq!(cards.borrow().card("GC-100").unwrap().balance, 30.0);

    // Abandon: cancel the tender and void the order
    let payment_id = manager.order(&order_id).unwrap().payments[0].payment_id.clone();
    let response = manager.process_command(
        &command(
            &casey,
            OrderCommandPayload::CancelPayment {
                order_id: order_id.clone(),
                payment_id,
                reason: Some("customer walked".to_string()),
                authorizer_id: None,
                authorizer_name: None,
            },
        ),
        casey.role,
        None,
    );
    assert!(response.success);
    assert_eq!(cards.borrow().card("GC-100").unwrap().balance, 30.0);
}

#[test]
fn completion_debits_gift_card_once() {
    let cards = Rc::new(RefCell::new(InMemoryGiftCards::new()));
    cards.borrow_mut().issue("GC-100", 30.0);
    let mut manager = OrdersManager::with_providers(
        config_with_tax(0.0),
        Box::new(UntrackedCatalog),
        Box::new(Rc::clone(&cards)),
        Box::new(InMemoryRepository::new()),
    );
    let casey = cashier();

    let order_id = open_order(&mut manager, &casey);
    add_items(&mut manager, &casey, &order_id, vec![latte(1)]);

    let response = manager.process_command(
        &command(
            &casey,
            OrderCommandPayload::AddPayment {
                order_id: order_id.clone(),
                payment: PaymentInput {
                    method: TenderMethod::GiftCard,
                    amount: 10.0,
                    tendered: None,
                    card_number: Some("GC-100".to_string()),
                    note: None,
                },
            },
        ),
        casey.role,
        None,
    );
    assert!(response.success);

    complete(&mut manager, &casey, &order_id);
    assert_eq!(cards.borrow().card("GC-100").unwrap().balance, 20.0);
}

#[test]
fn gift_card_tender_beyond_balance_rejected() {
    let cards = Rc::new(RefCell::new(InMemoryGiftCards::new()));
    cards.borrow_mut().issue("GC-100", 5.0);
    let mut manager = OrdersManager::with_providers(
        config_with_tax(0.0),
        Box::new(UntrackedCatalog),
        Box::new(Rc::clone(&cards)),
        Box::new(InMemoryRepository::new()),
    );
    let casey = cashier();

    let order_id = open_order(&mut manager, &casey);
    add_items(&mut manager, &casey, &order_id, vec![latte(1)]);

    let response = manager.process_command(
        &command(
            &casey,
            OrderCommandPayload::AddPayment {
                order_id,
                payment: PaymentInput {
                    method: TenderMethod::GiftCard,
                    amount: 10.0,
                    tendered: None,
                    card_number: Some("GC-100".to_string()),
                    note: None,
                },
            },
        ),
        casey.role,
        None,
    );
    assert!(!response.success);
    assert_eq!(
        response.error.unwrap().code,
        CommandErrorCode::GiftCardInsufficient
    );
}

// ============================================================================
// Invariants
// ============================================================================

#[test]
fn completing_unsettled_order_fails_loudly() {
    let mut manager = OrdersManager::new(config_with_tax(0.0));
    let casey = cashier();

    let order_id = open_order(&mut manager, &casey);
    add_items(&mut manager, &casey, &order_id, vec![latte(2)]);

    let response = manager.process_command(
        &command(
            &casey,
            OrderCommandPayload::CompleteOrder {
                order_id: order_id.clone(),
            },
        ),
        casey.role,
        None,
    );
    assert!(!response.success);
    assert_eq!(
        response.error.unwrap().code,
        CommandErrorCode::OrderNotSettled
    );
    assert_eq!(manager.order(&order_id).unwrap().status, OrderStatus::Active);
}

#[test]
fn event_replay_reproduces_the_snapshot() {
    let mut manager = OrdersManager::new(config_with_tax(0.08));
    let casey = cashier();

    let order_id = open_order(&mut manager, &casey);
    add_items(&mut manager, &casey, &order_id, vec![latte(2)]);
    pay_cash(&mut manager, &casey, &order_id, 21.6, 25.0);
    complete(&mut manager, &casey, &order_id);

    let live = manager.order(&order_id).unwrap().clone();

    let mut replayed = OrderSnapshot::new(order_id.clone(), 0.08);
    let events: Vec<_> = manager
        .events()
        .iter()
        .filter(|e| e.order_id == order_id)
        .cloned()
        .collect();
    reducer::replay(&mut replayed, &events);

    assert_eq!(replayed.state_checksum, live.state_checksum);
    assert_eq!(replayed.total, live.total);
    assert_eq!(replayed.paid_amount, live.paid_amount);
    assert_eq!(replayed.status, live.status);
    assert_eq!(replayed.items, live.items);
}
