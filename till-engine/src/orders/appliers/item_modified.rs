//! ItemModified event applier
//!
//! Applies plain quantity/modifier/note edits. A quantity of 0 removes
//! the line silently - this is the non-audited path, distinct from a
//! void (see `item_voided`).

use crate::orders::traits::EventApplier;
use shared::order::{EventPayload, OrderEvent, OrderSnapshot};

/// ItemModified applier
pub struct ItemModifiedApplier;

impl EventApplier for ItemModifiedApplier {
    fn apply(&self, snapshot: &mut OrderSnapshot, event: &OrderEvent) {
        if let EventPayload::ItemModified {
            instance_id,
            changes,
            removed,
            ..
        } = &event.payload
        {
            let Some(idx) = snapshot
                .items
                .iter()
                .position(|i| i.instance_id == *instance_id)
            else {
                return;
            };

            if *removed {
                snapshot.items.remove(idx);
            } else {
                let item = &mut snapshot.items[idx];
                if let Some(quantity) = changes.quantity {
                    item.quantity = quantity;
                }
                if let Some(modifiers) = &changes.modifiers {
                    item.modifiers = modifiers.clone();
                }
                if let Some(course) = &changes.course {
                    item.course = Some(course.clone());
                }
                if let Some(note) = &changes.note {
                    item.note = Some(note.clone());
                }
            }

            super::finalize(snapshot, event);
        }
    }
}
