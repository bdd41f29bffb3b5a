//! PaymentAdded event applier

use crate::orders::traits::EventApplier;
use shared::order::{EventPayload, OrderEvent, OrderSnapshot, PaymentRecord};

/// PaymentAdded applier
pub struct PaymentAddedApplier;

impl EventApplier for PaymentAddedApplier {
    fn apply(&self, snapshot: &mut OrderSnapshot, event: &OrderEvent) {
        if let EventPayload::PaymentAdded {
            payment_id,
            method,
            amount,
            tendered,
            change,
            card_number,
            note,
        } = &event.payload
        {
            snapshot.payments.push(PaymentRecord {
                payment_id: payment_id.clone(),
                method: *method,
                amount: *amount,
                tendered: *tendered,
                change: *change,
                card_number: card_number.clone(),
                note: note.clone(),
                timestamp: event.timestamp,
                cancelled: false,
                cancel_reason: None,
            });

            super::finalize(snapshot, event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::order::{OrderEventType, TenderMethod};

    #[test]
    fn payment_raises_paid_amount() {
        let mut snapshot = OrderSnapshot::new("order-1".to_string(), 0.0);
        let event = OrderEvent::new(
            1,
            "order-1".to_string(),
            "user-1".to_string(),
            "Test User".to_string(),
            "cmd-1".to_string(),
            None,
            OrderEventType::PaymentAdded,
            EventPayload::PaymentAdded {
                payment_id: "pay-1".to_string(),
                method: TenderMethod::Cash,
                amount: 16.2,
                tendered: Some(20.0),
                change: Some(3.8),
                card_number: None,
                note: None,
            },
        );
        PaymentAddedApplier.apply(&mut snapshot, &event);

        assert_eq!(snapshot.payments.len(), 1);
        assert_eq!(snapshot.paid_amount, 16.2);
        assert_eq!(snapshot.payments[0].change, Some(3.8));
    }
}
