//! OrdersManager - the command processing pipeline
//!
//! The single entry point for every order mutation:
//!
//! 1. Derive the sensitive action (if any) and consult the permission
//!    gate; a request beyond the actor's ceiling must arrive with a
//!    matching [`Approval`] or it is rejected as `APPROVAL_REQUIRED`.
//! 2. Execute the action handler, which validates and emits events.
//! 3. Fold the events into the snapshot, append audit entries for
//!    voids/overrides/discounts, and run completion side effects
//!    (gift-card redemption, repository hand-off).
//!
//! The permission check and the mutation are atomic with respect to
//! each other: the manager is `&mut self` all the way through and
//! nothing interleaves between check and apply.

use std::collections::HashMap;

use tracing::{debug, info, warn};

use shared::models::{Operator, Role};
use shared::order::{
    CommandErrorCode, CommandResponse, EventPayload, OrderCommand, OrderCommandPayload,
    OrderEvent, OrderSnapshot, TenderMethod,
};
use shared::util::snowflake_id;

use crate::audit::{AuditLedger, OverrideKind};
use crate::auth::{Approval, GateDecision, GateValue, PermissionGate, SensitiveAction};
use crate::config::EngineConfig;
use crate::providers::{
    CatalogProvider, GiftCardStore, NoGiftCards, NoopRepository, OrderRepository, UntrackedCatalog,
};

use super::actions::{stock_key, CommandAction, OpenOrderAction};
use super::appliers::EventAction;
use super::money::{price_line, to_f64};
use super::traits::{CommandContext, CommandHandler, CommandMetadata, EventApplier, OrderError};

/// Core order engine: active snapshots, event log, gate, audit ledger
/// and the injected collaborators.
pub struct OrdersManager {
    config: EngineConfig,
    gate: PermissionGate,
    audit: AuditLedger,
    orders: HashMap<String, OrderSnapshot>,
    event_log: Vec<OrderEvent>,
    next_sequence: u64,
    catalog: Box<dyn CatalogProvider>,
    gift_cards: Box<dyn GiftCardStore>,
    repository: Box<dyn OrderRepository>,
}

impl OrdersManager {
    /// Manager with no-op collaborators (untracked stock, no gift
    /// cards, discarded hand-offs)
    pub fn new(config: EngineConfig) -> Self {
        Self::with_providers(
            config,
            Box::new(UntrackedCatalog),
            Box::new(NoGiftCards),
            Box::new(NoopRepository),
        )
    }

    pub fn with_providers(
        config: EngineConfig,
        catalog: Box<dyn CatalogProvider>,
        gift_cards: Box<dyn GiftCardStore>,
        repository: Box<dyn OrderRepository>,
    ) -> Self {
        Self {
            gate: PermissionGate::new(config.clone()),
            config,
            audit: AuditLedger::new(),
            orders: HashMap::new(),
            event_log: Vec::new(),
            next_sequence: 1,
            catalog,
            gift_cards,
            repository,
        }
    }

    // ==================== Accessors ====================

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn gate(&self) -> &PermissionGate {
        &self.gate
    }

    pub fn audit(&self) -> &AuditLedger {
        &self.audit
    }

    pub fn order(&self, order_id: &str) -> Option<&OrderSnapshot> {
        self.orders.get(order_id)
    }

    pub fn active_orders(&self) -> impl Iterator<Item = &OrderSnapshot> {
        self.orders.values().filter(|o| o.is_active())
    }

    pub fn events(&self) -> &[OrderEvent] {
        &self.event_log
    }

    pub fn gift_cards(&self) -> &dyn GiftCardStore {
        self.gift_cards.as_ref()
    }

    // ==================== Command processing ====================

    /// Process one command on behalf of an operator with `actor_role`.
    ///
    /// A sensitive command beyond the actor's authority must arrive
    /// with an [`Approval`] from the gate's two-phase flow; the
    /// approving identity is then recorded in the audit trail instead
    /// of the requester's.
    pub fn process_command(
        &mut self,
        command: &OrderCommand,
        actor_role: Role,
        approval: Option<&Approval>,
    ) -> CommandResponse {
        match self.try_process(command, actor_role, approval) {
            Ok(order_id) => {
                debug!(command_id = %command.command_id, "command processed");
                CommandResponse::success(command.command_id.clone(), order_id)
            }
            Err(err) => {
                warn!(
                    command_id = %command.command_id,
                    error = %err,
                    "command rejected"
                );
                CommandResponse::error(command.command_id.clone(), err.to_command_error())
            }
        }
    }

    fn try_process(
        &mut self,
        command: &OrderCommand,
        actor_role: Role,
        approval: Option<&Approval>,
    ) -> Result<Option<String>, OrderError> {
        // 1. Permission gate (atomic with the mutation below)
        let authorizer = match self.gate_request(&command.payload) {
            Some((action, value)) => {
                self.validate_discount_reason(&command.payload)?;
                match self.gate.check(action, actor_role, value.as_ref()) {
                    GateDecision::Allowed => None,
                    GateDecision::RequiresApproval { reason } => {
                        match approval {
                            Some(approval)
                                if self.gate.verify_approval(approval, action, value.as_ref()) =>
                            {
                                Some(approval.approver.clone())
                            }
                            _ => {
                                return Err(OrderError::InvalidOperation(
                                    CommandErrorCode::ApprovalRequired,
                                    reason,
                                ));
                            }
                        }
                    }
                }
            }
            None => None,
        };

        // 2. Build the action, generating ids for OpenOrder
        let mut new_order_id = None;
        let mut action = match &command.payload {
            OrderCommandPayload::OpenOrder {
                order_type,
                table_name,
                guest_count,
                customer,
            } => {
                let order_id = uuid::Uuid::new_v4().to_string();
                new_order_id = Some(order_id.clone());
                CommandAction::OpenOrder(OpenOrderAction {
                    order_id,
                    receipt_number: format!("R-{}", snowflake_id()),
                    tax_rate: self.config.tax_rate,
                    order_type: *order_type,
                    table_name: table_name.clone(),
                    guest_count: *guest_count,
                    customer: customer.clone(),
                })
            }
            _ => CommandAction::from(command),
        };

        // 3. Inject collaborator data and the verified authorizer
        self.inject(&mut action, authorizer.as_ref());

        // 4. Execute: validation + event emission (no state change yet)
        let metadata = CommandMetadata::from(command);
        let mut ctx = CommandContext::new(&self.orders, self.next_sequence);
        let events = action.execute(&mut ctx, &metadata)?;
        self.next_sequence = ctx.sequence_cursor();

        // 5. Fold events into snapshots and run side effects
        for event in &events {
            self.orders
                .entry(event.order_id.clone())
                .or_insert_with(|| {
                    OrderSnapshot::new(event.order_id.clone(), self.config.tax_rate)
                });
            let snapshot = self
                .orders
                .get_mut(&event.order_id)
                .expect("snapshot just ensured");
            EventAction::from(event).apply(snapshot, event);

            self.record_audit(event, authorizer.as_ref(), &metadata);
            self.run_side_effects(event);
        }
        self.event_log.extend(events);

        Ok(new_order_id)
    }

    /// Which gate check (if any) a command payload demands
    fn gate_request(
        &self,
        payload: &OrderCommandPayload,
    ) -> Option<(SensitiveAction, Option<GateValue>)> {
        match payload {
            OrderCommandPayload::VoidItem { .. } | OrderCommandPayload::VoidOrder { .. } => {
                Some((SensitiveAction::VoidItems, None))
            }
            OrderCommandPayload::ApplyItemDiscount { discount, .. }
            | OrderCommandPayload::ApplyOrderDiscount { discount, .. } => {
                let value = match discount.kind {
                    shared::order::DiscountKind::Percentage => GateValue::Percent(discount.value),
                    shared::order::DiscountKind::FixedAmount => GateValue::Amount(discount.value),
                };
                Some((SensitiveAction::ApplyDiscount, Some(value)))
            }
            OrderCommandPayload::OverridePrice {
                order_id,
                instance_id,
                new_price,
                ..
            } => {
                // Ceiling applies to the markdown: catalog basis − new price
                let markdown = self
                    .orders
                    .get(order_id)
                    .and_then(|o| o.find_item(instance_id))
                    .map(|item| (to_f64(price_line(item).unit_basis) - new_price).max(0.0))
                    .unwrap_or(0.0);
                Some((SensitiveAction::PriceOverride, Some(GateValue::Amount(markdown))))
            }
            _ => None,
        }
    }

    /// Discounts must carry a reason from the configured taxonomy
    fn validate_discount_reason(&self, payload: &OrderCommandPayload) -> Result<(), OrderError> {
        let reason = match payload {
            OrderCommandPayload::ApplyItemDiscount { discount, .. }
            | OrderCommandPayload::ApplyOrderDiscount { discount, .. } => &discount.reason,
            _ => return Ok(()),
        };
        if let Some(reason) = reason {
            if !self.config.is_valid_discount_reason(reason) {
                return Err(OrderError::InvalidOperation(
                    CommandErrorCode::MissingReason,
                    format!("discount reason '{}' is not in the configured taxonomy", reason),
                ));
            }
        }
        // A missing reason is rejected by the action handler
        Ok(())
    }

    /// Fill in the fields the engine injects: stock levels, gift card
    /// balances, and the verified approver identity.
    fn inject(&self, action: &mut CommandAction, authorizer: Option<&Operator>) {
        let (authorizer_id, authorizer_name) = match authorizer {
            Some(op) => (Some(op.id.clone()), Some(op.name.clone())),
            None => (None, None),
        };

        match action {
            CommandAction::AddItems(a) => {
                for item in &a.items {
                    let variation_id = item.variation.as_ref().map(|v| v.id.as_str());
                    if let Some(stock) = self.catalog.available_stock(&item.product_id, variation_id)
                    {
                        a.stock
                            .insert(stock_key(&item.product_id, variation_id), stock);
                    }
                }
            }
            CommandAction::ModifyItem(a) => {
                a.available_stock = self
                    .orders
                    .get(&a.order_id)
                    .and_then(|o| o.find_item(&a.instance_id))
                    .and_then(|item| {
                        self.catalog.available_stock(
                            &item.id,
                            item.variation.as_ref().map(|v| v.id.as_str()),
                        )
                    });
            }
            CommandAction::AddPayment(a) => {
                if a.payment.method == TenderMethod::GiftCard {
                    a.gift_card_balance = a
                        .payment
                        .card_number
                        .as_deref()
                        .and_then(|card| self.gift_cards.balance(card));
                }
            }
            CommandAction::CompleteOrder(a) => {
                if let Some(order) = self.orders.get(&a.order_id) {
                    for payment in &order.payments {
                        if payment.cancelled || payment.method != TenderMethod::GiftCard {
                            continue;
                        }
                        if let Some(card) = &payment.card_number {
                            if let Some(balance) = self.gift_cards.balance(card) {
                                a.gift_card_balances.insert(card.clone(), balance);
                            }
                        }
                    }
                }
            }
            // The engine decides who the authorizer is - never the client
            CommandAction::VoidItem(a) => {
                a.authorizer_id = authorizer_id;
                a.authorizer_name = authorizer_name;
            }
            CommandAction::VoidOrder(a) => {
                a.authorizer_id = authorizer_id;
                a.authorizer_name = authorizer_name;
            }
            CommandAction::ApplyItemDiscount(a) => {
                a.authorizer_id = authorizer_id;
                a.authorizer_name = authorizer_name;
            }
            CommandAction::ApplyOrderDiscount(a) => {
                a.authorizer_id = authorizer_id;
                a.authorizer_name = authorizer_name;
            }
            CommandAction::OverridePrice(a) => {
                a.authorizer_id = authorizer_id;
                a.authorizer_name = authorizer_name;
            }
            _ => {}
        }
    }

    /// Append the audit entry for events that record a void, override
    /// or discount. The actor is the approving manager when one was
    /// involved, the operator otherwise.
    fn record_audit(
        &mut self,
        event: &OrderEvent,
        authorizer: Option<&Operator>,
        metadata: &CommandMetadata,
    ) {
        let (actor_id, actor_name) = match authorizer {
            Some(op) => (op.id.as_str(), op.name.as_str()),
            None => (metadata.operator_id.as_str(), metadata.operator_name.as_str()),
        };

        match &event.payload {
            EventPayload::ItemVoided {
                instance_id,
                item_name,
                quantity,
                reason,
                ..
            } => {
                self.audit.append(
                    actor_id,
                    actor_name,
                    &event.order_id,
                    Some(instance_id),
                    OverrideKind::Void,
                    reason,
                    serde_json::json!({ "item": item_name, "quantity": quantity }),
                    serde_json::Value::Null,
                );
            }
            EventPayload::PriceOverridden {
                instance_id,
                item_name,
                new_price,
                previous_price,
                reason,
                ..
            } => {
                self.audit.append(
                    actor_id,
                    actor_name,
                    &event.order_id,
                    Some(instance_id),
                    OverrideKind::PriceOverride,
                    reason,
                    serde_json::json!({ "item": item_name, "price": previous_price }),
                    serde_json::json!({ "item": item_name, "price": new_price }),
                );
            }
            EventPayload::ItemDiscountApplied {
                instance_id,
                discount,
                previous,
                ..
            } => {
                self.audit.append(
                    actor_id,
                    actor_name,
                    &event.order_id,
                    Some(instance_id),
                    OverrideKind::ItemDiscount,
                    discount.reason.as_deref().unwrap_or_default(),
                    serde_json::to_value(previous).unwrap_or(serde_json::Value::Null),
                    serde_json::to_value(discount).unwrap_or(serde_json::Value::Null),
                );
            }
            EventPayload::OrderDiscountApplied {
                discount, previous, ..
            } => {
                self.audit.append(
                    actor_id,
                    actor_name,
                    &event.order_id,
                    None,
                    OverrideKind::OrderDiscount,
                    discount.reason.as_deref().unwrap_or_default(),
                    serde_json::to_value(previous).unwrap_or(serde_json::Value::Null),
                    serde_json::to_value(discount).unwrap_or(serde_json::Value::Null),
                );
            }
            EventPayload::OrderVoided { reason, .. } => {
                self.audit.append(
                    actor_id,
                    actor_name,
                    &event.order_id,
                    None,
                    OverrideKind::Void,
                    reason,
                    serde_json::json!({ "status": "ACTIVE" }),
                    serde_json::json!({ "status": "VOID" }),
                );
            }
            _ => {}
        }
    }

    /// Completion/void side effects: gift card redemption and the
    /// fire-and-forget repository hand-off.
    fn run_side_effects(&mut self, event: &OrderEvent) {
        match &event.payload {
            EventPayload::OrderCompleted {
                receipt_number,
                final_total,
                gift_card_redemptions,
                ..
            } => {
                // Debit gift cards only now - an abandoned checkout
                // never touches a card. Balances were re-validated by
                // the action, so a failure here is a provider bug.
                for (card_number, amount) in gift_card_redemptions {
                    if let Err(err) = self.gift_cards.redeem(card_number, *amount) {
                        warn!(card = %card_number, amount, error = %err, "gift card redemption failed");
                    }
                }

                if let Some(snapshot) = self.orders.get(&event.order_id) {
                    self.repository.store_order(snapshot);
                }
                info!(
                    order_id = %event.order_id,
                    receipt_number = %receipt_number,
                    total = final_total,
                    "order completed"
                );
            }
            EventPayload::OrderVoided { reason, .. } => {
                if let Some(snapshot) = self.orders.get(&event.order_id) {
                    self.repository.store_order(snapshot);
                }
                info!(order_id = %event.order_id, reason = %reason, "order voided");
            }
            _ => {}
        }
    }
}
