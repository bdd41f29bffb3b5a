//! OrderOpened event applier

use crate::orders::traits::EventApplier;
use shared::order::{EventPayload, OrderEvent, OrderSnapshot, OrderStatus};

/// OrderOpened applier
pub struct OrderOpenedApplier;

impl EventApplier for OrderOpenedApplier {
    fn apply(&self, snapshot: &mut OrderSnapshot, event: &OrderEvent) {
        if let EventPayload::OrderOpened {
            receipt_number,
            tax_rate,
            order_type,
            table_name,
            guest_count,
            customer,
        } = &event.payload
        {
            snapshot.receipt_number = receipt_number.clone();
            snapshot.tax_rate = *tax_rate;
            snapshot.order_type = *order_type;
            snapshot.table_name = table_name.clone();
            snapshot.guest_count = *guest_count;
            snapshot.customer = customer.clone();
            snapshot.status = OrderStatus::Active;
            snapshot.start_time = event.timestamp;
            snapshot.created_at = event.timestamp;

            super::finalize(snapshot, event);
        }
    }
}
