//! ItemVoided event applier
//!
//! Applies the audited removal of a line. Supports both full voids and
//! partial voids (by quantity). The audit entry itself is appended by
//! the manager; this applier only folds the state change.

use crate::orders::traits::EventApplier;
use shared::order::{EventPayload, OrderEvent, OrderSnapshot};

/// ItemVoided applier
pub struct ItemVoidedApplier;

impl EventApplier for ItemVoidedApplier {
    fn apply(&self, snapshot: &mut OrderSnapshot, event: &OrderEvent) {
        if let EventPayload::ItemVoided {
            instance_id,
            quantity,
            ..
        } = &event.payload
        {
            apply_item_voided(snapshot, instance_id, *quantity);
            super::finalize(snapshot, event);
        }
    }
}

/// Apply an item void to the snapshot.
///
/// Removes only the FIRST matching line by index; duplicate instance_ids
/// can exist transiently and must not all disappear at once.
fn apply_item_voided(snapshot: &mut OrderSnapshot, instance_id: &str, quantity: Option<i32>) {
    let Some(idx) = snapshot
        .items
        .iter()
        .position(|i| i.instance_id == instance_id)
    else {
        return;
    };

    match quantity {
        Some(qty) => {
            // Partial void: reduce quantity, drop the line at zero
            snapshot.items[idx].quantity = (snapshot.items[idx].quantity - qty).max(0);
            if snapshot.items[idx].quantity == 0 {
                snapshot.items.remove(idx);
            }
        }
        None => {
            snapshot.items.remove(idx);
        }
    }
}
