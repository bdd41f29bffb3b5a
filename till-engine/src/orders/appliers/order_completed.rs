//! OrderCompleted event applier

use crate::orders::traits::EventApplier;
use shared::order::{EventPayload, OrderEvent, OrderSnapshot, OrderStatus};

/// OrderCompleted applier
pub struct OrderCompletedApplier;

impl EventApplier for OrderCompletedApplier {
    fn apply(&self, snapshot: &mut OrderSnapshot, event: &OrderEvent) {
        if let EventPayload::OrderCompleted { .. } = &event.payload {
            snapshot.status = OrderStatus::Completed;
            snapshot.end_time = Some(event.timestamp);

            super::finalize(snapshot, event);
        }
    }
}
