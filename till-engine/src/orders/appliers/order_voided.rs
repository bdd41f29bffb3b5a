//! OrderVoided event applier

use crate::orders::traits::EventApplier;
use shared::order::{EventPayload, OrderEvent, OrderSnapshot, OrderStatus};

/// OrderVoided applier
pub struct OrderVoidedApplier;

impl EventApplier for OrderVoidedApplier {
    fn apply(&self, snapshot: &mut OrderSnapshot, event: &OrderEvent) {
        if let EventPayload::OrderVoided { .. } = &event.payload {
            snapshot.status = OrderStatus::Void;
            snapshot.end_time = Some(event.timestamp);

            super::finalize(snapshot, event);
        }
    }
}
