//! ItemsAdded event applier
//!
//! Appends item snapshots to the order; an incoming item whose
//! instance_id matches an existing line merges into it (quantities add).

use crate::orders::traits::EventApplier;
use shared::order::{EventPayload, OrderEvent, OrderSnapshot};

/// ItemsAdded applier
pub struct ItemsAddedApplier;

impl EventApplier for ItemsAddedApplier {
    fn apply(&self, snapshot: &mut OrderSnapshot, event: &OrderEvent) {
        if let EventPayload::ItemsAdded { items } = &event.payload {
            for incoming in items {
                match snapshot
                    .items
                    .iter_mut()
                    .find(|i| i.instance_id == incoming.instance_id)
                {
                    Some(existing) => {
                        existing.quantity += incoming.quantity;
                    }
                    None => snapshot.items.push(incoming.clone()),
                }
            }

            super::finalize(snapshot, event);
        }
    }
}
