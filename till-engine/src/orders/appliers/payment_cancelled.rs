//! PaymentCancelled event applier
//!
//! Marks the record as cancelled rather than deleting it - the tender
//! history stays visible on the order.

use crate::orders::traits::EventApplier;
use shared::order::{EventPayload, OrderEvent, OrderSnapshot};

/// PaymentCancelled applier
pub struct PaymentCancelledApplier;

impl EventApplier for PaymentCancelledApplier {
    fn apply(&self, snapshot: &mut OrderSnapshot, event: &OrderEvent) {
        if let EventPayload::PaymentCancelled {
            payment_id, reason, ..
        } = &event.payload
        {
            let Some(payment) = snapshot
                .payments
                .iter_mut()
                .find(|p| p.payment_id == *payment_id)
            else {
                return;
            };
            payment.cancelled = true;
            payment.cancel_reason = reason.clone();

            super::finalize(snapshot, event);
        }
    }
}
