//! CancelPayment command handler
//!
//! Cancels a pending tender before the order completes. The record is
//! kept (marked cancelled) so the tender history stays auditable.

use crate::orders::traits::{CommandContext, CommandHandler, CommandMetadata, OrderError};
use shared::order::{CommandErrorCode, EventPayload, OrderEvent, OrderEventType};

/// CancelPayment action
#[derive(Debug, Clone)]
pub struct CancelPaymentAction {
    pub order_id: String,
    pub payment_id: String,
    pub reason: Option<String>,
    pub authorizer_id: Option<String>,
    pub authorizer_name: Option<String>,
}

impl CommandHandler for CancelPaymentAction {
    fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<OrderEvent>, OrderError> {
        let snapshot = ctx.load_snapshot(&self.order_id)?;
        super::validate_active_order(&snapshot, &self.order_id)?;

        let payment = snapshot
            .payments
            .iter()
            .find(|p| p.payment_id == self.payment_id)
            .ok_or_else(|| OrderError::PaymentNotFound(self.payment_id.clone()))?;

        if payment.cancelled {
            return Err(OrderError::InvalidOperation(
                CommandErrorCode::InvalidOperation,
                format!("payment {} is already cancelled", self.payment_id),
            ));
        }

        let seq = ctx.next_sequence();

        let event = OrderEvent::new(
            seq,
            self.order_id.clone(),
            metadata.operator_id.clone(),
            metadata.operator_name.clone(),
            metadata.command_id.clone(),
            Some(metadata.timestamp),
            OrderEventType::PaymentCancelled,
            EventPayload::PaymentCancelled {
                payment_id: self.payment_id.clone(),
                method: payment.method,
                amount: payment.amount,
                reason: self.reason.clone(),
                authorizer_id: self.authorizer_id.clone(),
                authorizer_name: self.authorizer_name.clone(),
            },
        );

        Ok(vec![event])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::order::{OrderSnapshot, OrderStatus, PaymentRecord, TenderMethod};
    use std::collections::HashMap;

    fn create_test_metadata() -> CommandMetadata {
        CommandMetadata {
            command_id: "cmd-1".to_string(),
            operator_id: "user-1".to_string(),
            operator_name: "Test User".to_string(),
            timestamp: 1234567890,
        }
    }

    fn orders_with_payment(cancelled: bool) -> HashMap<String, OrderSnapshot> {
        let mut snapshot = OrderSnapshot::new("order-1".to_string(), 0.0);
        snapshot.status = OrderStatus::Active;
        snapshot.total = 50.0;
        snapshot.payments.push(PaymentRecord {
            payment_id: "pay-1".to_string(),
            method: TenderMethod::Card,
            amount: 20.0,
            tendered: None,
            change: None,
            card_number: None,
            note: None,
            timestamp: 0,
            cancelled,
            cancel_reason: None,
        });
        let mut orders = HashMap::new();
        orders.insert("order-1".to_string(), snapshot);
        orders
    }

    #[test]
    fn cancel_emits_event() {
        let orders = orders_with_payment(false);
        let mut ctx = CommandContext::new(&orders, 1);

        let action = CancelPaymentAction {
            order_id: "order-1".to_string(),
            payment_id: "pay-1".to_string(),
            reason: Some("card declined".to_string()),
            authorizer_id: None,
            authorizer_name: None,
        };

        let events = action.execute(&mut ctx, &create_test_metadata()).unwrap();
        assert_eq!(events[0].event_type, OrderEventType::PaymentCancelled);
    }

    #[test]
    fn double_cancel_rejected() {
        let orders = orders_with_payment(true);
        let mut ctx = CommandContext::new(&orders, 1);

        let action = CancelPaymentAction {
            order_id: "order-1".to_string(),
            payment_id: "pay-1".to_string(),
            reason: None,
            authorizer_id: None,
            authorizer_name: None,
        };

        assert!(action.execute(&mut ctx, &create_test_metadata()).is_err());
    }

    #[test]
    fn unknown_payment_rejected() {
        let orders = orders_with_payment(false);
        let mut ctx = CommandContext::new(&orders, 1);

        let action = CancelPaymentAction {
            order_id: "order-1".to_string(),
            payment_id: "pay-404".to_string(),
            reason: None,
            authorizer_id: None,
            authorizer_name: None,
        };

        assert!(matches!(
            action.execute(&mut ctx, &create_test_metadata()),
            Err(OrderError::PaymentNotFound(_))
        ));
    }
}
