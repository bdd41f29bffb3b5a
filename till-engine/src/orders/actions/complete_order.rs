//! CompleteOrder command handler
//!
//! Finalizes a settled order: validates payment sufficiency, summarizes
//! tenders per method and lists the gift-card redemptions to be applied.
//! Completing an unsettled order is a caller bug and fails loudly.

use std::collections::HashMap;

use rust_decimal::Decimal;

use crate::orders::money::{is_payment_sufficient, to_decimal, to_f64, MONEY_TOLERANCE};
use crate::orders::traits::{CommandContext, CommandHandler, CommandMetadata, OrderError};
use shared::order::{
    CommandErrorCode, EventPayload, OrderEvent, OrderEventType, PaymentSummaryItem, TenderMethod,
};

/// Fixed summary order so completion payloads are deterministic
const METHOD_ORDER: [TenderMethod; 4] = [
    TenderMethod::Cash,
    TenderMethod::Card,
    TenderMethod::Cheque,
    TenderMethod::GiftCard,
];

/// CompleteOrder action
#[derive(Debug, Clone)]
pub struct CompleteOrderAction {
    pub order_id: String,
    /// Balance per referenced gift card at completion time.
    /// Injected by OrdersManager; redemptions are re-checked here so the
    /// completion either fully succeeds or changes nothing.
    pub gift_card_balances: HashMap<String, f64>,
}

impl CommandHandler for CompleteOrderAction {
    fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<OrderEvent>, OrderError> {
        let snapshot = ctx.load_snapshot(&self.order_id)?;
        super::validate_active_order(&snapshot, &self.order_id)?;

        // Payment summary per method, in fixed method order
        let mut totals: HashMap<TenderMethod, Decimal> = HashMap::new();
        let mut total_paid = Decimal::ZERO;
        for payment in &snapshot.payments {
            if !payment.cancelled {
                let amount = to_decimal(payment.amount);
                *totals.entry(payment.method).or_insert(Decimal::ZERO) += amount;
                total_paid += amount;
            }
        }

        // Settlement check - an unsettled completion is a caller bug
        let total_paid_f64 = to_f64(total_paid);
        if !is_payment_sufficient(total_paid_f64, snapshot.total) {
            return Err(OrderError::InvalidOperation(
                CommandErrorCode::OrderNotSettled,
                format!(
                    "Payment insufficient: paid {:.2}, required {:.2}",
                    total_paid_f64, snapshot.total
                ),
            ));
        }

        let payment_summary: Vec<PaymentSummaryItem> = METHOD_ORDER
            .iter()
            .filter_map(|method| {
                totals.get(method).map(|amount| PaymentSummaryItem {
                    method: *method,
                    amount: to_f64(*amount),
                })
            })
            .collect();

        // Gift card redemptions: one per card, validated against the
        // balances at completion time
        let mut redemptions: Vec<(String, f64)> = Vec::new();
        for payment in &snapshot.payments {
            if payment.cancelled || payment.method != TenderMethod::GiftCard {
                continue;
            }
            let Some(card_number) = &payment.card_number else {
                continue;
            };
            match redemptions.iter_mut().find(|(card, _)| card == card_number) {
                Some((_, amount)) => *amount += payment.amount,
                None => redemptions.push((card_number.clone(), payment.amount)),
            }
        }
        for (card_number, amount) in &redemptions {
            let balance = self.gift_card_balances.get(card_number).copied().ok_or_else(|| {
                OrderError::InvalidOperation(
                    CommandErrorCode::GiftCardInsufficient,
                    format!("gift card {} not found or inactive", card_number),
                )
            })?;
            if to_decimal(*amount) > to_decimal(balance) + MONEY_TOLERANCE {
                return Err(OrderError::InvalidOperation(
                    CommandErrorCode::GiftCardInsufficient,
                    format!(
                        "gift card {} balance {:.2} below redemption {:.2}",
                        card_number, balance, amount
                    ),
                ));
            }
        }

        let seq = ctx.next_sequence();

        let event = OrderEvent::new(
            seq,
            self.order_id.clone(),
            metadata.operator_id.clone(),
            metadata.operator_name.clone(),
            metadata.command_id.clone(),
            Some(metadata.timestamp),
            OrderEventType::OrderCompleted,
            EventPayload::OrderCompleted {
                receipt_number: snapshot.receipt_number.clone(),
                final_total: snapshot.total,
                payment_summary,
                gift_card_redemptions: redemptions,
            },
        );

        Ok(vec![event])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::order::{OrderSnapshot, OrderStatus, PaymentRecord};

    fn create_test_metadata() -> CommandMetadata {
        CommandMetadata {
            command_id: "cmd-1".to_string(),
            operator_id: "user-1".to_string(),
            operator_name: "Test User".to_string(),
            timestamp: 1234567890,
        }
    }

    fn payment(method: TenderMethod, amount: f64) -> PaymentRecord {
        PaymentRecord {
            payment_id: format!("pay-{}", uuid::Uuid::new_v4()),
            method,
            amount,
            tendered: None,
            change: None,
            card_number: None,
            note: None,
            timestamp: 1234567890,
            cancelled: false,
            cancel_reason: None,
        }
    }

    fn active_snapshot(total: f64) -> OrderSnapshot {
        let mut snapshot = OrderSnapshot::new("order-1".to_string(), 0.0);
        snapshot.status = OrderStatus::Active;
        snapshot.receipt_number = "R-1001".to_string();
        snapshot.total = total;
        snapshot
    }

    fn run(snapshot: OrderSnapshot, balances: HashMap<String, f64>) -> Result<Vec<OrderEvent>, OrderError> {
        let mut orders = HashMap::new();
        orders.insert("order-1".to_string(), snapshot);
        let mut ctx = CommandContext::new(&orders, 1);
        let action = CompleteOrderAction {
            order_id: "order-1".to_string(),
            gift_card_balances: balances,
        };
        action.execute(&mut ctx, &create_test_metadata())
    }

    #[test]
    fn settled_order_completes_with_summary() {
        let mut snapshot = active_snapshot(100.0);
        snapshot.payments.push(payment(TenderMethod::Cash, 50.0));
        snapshot.payments.push(payment(TenderMethod::Card, 30.0));
        snapshot.payments.push(payment(TenderMethod::Cash, 20.0));

        let events = run(snapshot, HashMap::new()).unwrap();
        if let EventPayload::OrderCompleted {
            receipt_number,
            final_total,
            payment_summary,
            ..
        } = &events[0].payload
        {
            assert_eq!(receipt_number, "R-1001");
            assert_eq!(*final_total, 100.0);
            assert_eq!(payment_summary.len(), 2);
            // Fixed method order: cash before card
            assert_eq!(payment_summary[0].method, TenderMethod::Cash);
            assert_eq!(payment_summary[0].amount, 70.0);
            assert_eq!(payment_summary[1].method, TenderMethod::Card);
            assert_eq!(payment_summary[1].amount, 30.0);
        } else {
            panic!("Expected OrderCompleted payload");
        }
    }

    #[test]
    fn unsettled_completion_is_loud_error() {
        let mut snapshot = active_snapshot(100.0);
        snapshot.payments.push(payment(TenderMethod::Card, 60.0));

        let result = run(snapshot, HashMap::new());
        assert!(matches!(
            result,
            Err(OrderError::InvalidOperation(
                CommandErrorCode::OrderNotSettled,
                _
            ))
        ));
    }

    #[test]
    fn cancelled_payments_do_not_settle() {
        let mut snapshot = active_snapshot(100.0);
        let mut p = payment(TenderMethod::Card, 100.0);
        p.cancelled = true;
        snapshot.payments.push(p);

        assert!(run(snapshot, HashMap::new()).is_err());
    }

    #[test]
    fn one_cent_short_is_still_settled() {
        let mut snapshot = active_snapshot(100.0);
        snapshot.payments.push(payment(TenderMethod::Card, 99.99));

        assert!(run(snapshot, HashMap::new()).is_ok());
    }

    #[test]
    fn gift_card_redemptions_are_listed_per_card() {
        let mut snapshot = active_snapshot(60.0);
        let mut g1 = payment(TenderMethod::GiftCard, 20.0);
        g1.card_number = Some("GC-100".to_string());
        let mut g2 = payment(TenderMethod::GiftCard, 15.0);
        g2.card_number = Some("GC-100".to_string());
        snapshot.payments.push(g1);
        snapshot.payments.push(g2);
        snapshot.payments.push(payment(TenderMethod::Cash, 25.0));

        let mut balances = HashMap::new();
        balances.insert("GC-100".to_string(), 50.0);

        let events = run(snapshot, balances).unwrap();
        if let EventPayload::OrderCompleted {
            gift_card_redemptions,
            ..
        } = &events[0].payload
        {
            assert_eq!(gift_card_redemptions.len(), 1);
            assert_eq!(gift_card_redemptions[0], ("GC-100".to_string(), 35.0));
        } else {
            panic!("Expected OrderCompleted payload");
        }
    }

    #[test]
    fn completion_fails_when_card_balance_dropped() {
        let mut snapshot = active_snapshot(20.0);
        let mut g = payment(TenderMethod::GiftCard, 20.0);
        g.card_number = Some("GC-100".to_string());
        snapshot.payments.push(g);

        let mut balances = HashMap::new();
        balances.insert("GC-100".to_string(), 5.0);

        assert!(run(snapshot, balances).is_err());
    }

    #[test]
    fn completing_completed_order_fails() {
        let mut snapshot = active_snapshot(0.0);
        snapshot.status = OrderStatus::Completed;

        assert!(matches!(
            run(snapshot, HashMap::new()),
            Err(OrderError::OrderAlreadyCompleted(_))
        ));
    }
}
