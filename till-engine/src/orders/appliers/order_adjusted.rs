//! Appliers for order-level adjustments
//!
//! - **OrderDiscountApplied** / **OrderDiscountCleared**: the single
//!   order-level discount slot
//! - **TipSet**: tip amount
//! - **OrderInfoUpdated**: type/guests/table/customer/notes

use crate::orders::traits::EventApplier;
use shared::order::{EventPayload, OrderEvent, OrderSnapshot};

/// OrderDiscountApplied applier
pub struct OrderDiscountAppliedApplier;

impl EventApplier for OrderDiscountAppliedApplier {
    fn apply(&self, snapshot: &mut OrderSnapshot, event: &OrderEvent) {
        if let EventPayload::OrderDiscountApplied { discount, .. } = &event.payload {
            // At most one order-level discount: applying replaces
            snapshot.order_discount = Some(discount.clone());
            super::finalize(snapshot, event);
        }
    }
}

/// OrderDiscountCleared applier
pub struct OrderDiscountClearedApplier;

impl EventApplier for OrderDiscountClearedApplier {
    fn apply(&self, snapshot: &mut OrderSnapshot, event: &OrderEvent) {
        if let EventPayload::OrderDiscountCleared { .. } = &event.payload {
            snapshot.order_discount = None;
            super::finalize(snapshot, event);
        }
    }
}

/// TipSet applier
pub struct TipSetApplier;

impl EventApplier for TipSetApplier {
    fn apply(&self, snapshot: &mut OrderSnapshot, event: &OrderEvent) {
        if let EventPayload::TipSet { tip, .. } = &event.payload {
            snapshot.tip = *tip;
            super::finalize(snapshot, event);
        }
    }
}

/// OrderInfoUpdated applier
pub struct OrderInfoUpdatedApplier;

impl EventApplier for OrderInfoUpdatedApplier {
    fn apply(&self, snapshot: &mut OrderSnapshot, event: &OrderEvent) {
        if let EventPayload::OrderInfoUpdated {
            order_type,
            guest_count,
            table_name,
            customer,
            note,
        } = &event.payload
        {
            if let Some(order_type) = order_type {
                snapshot.order_type = Some(*order_type);
            }
            if let Some(guest_count) = guest_count {
                snapshot.guest_count = *guest_count;
            }
            if let Some(table_name) = table_name {
                snapshot.table_name = Some(table_name.clone());
            }
            if let Some(customer) = customer {
                snapshot.customer = Some(customer.clone());
            }
            if let Some(note) = note {
                snapshot.note = Some(note.clone());
            }

            super::finalize(snapshot, event);
        }
    }
}
