//! ModifyItem command handler
//!
//! Plain quantity/modifier/note edits. No permission check is involved:
//! these are the everyday cart edits. Setting quantity to 0 removes the
//! line silently - deliberately NOT the same operation as a void, which
//! is audited and requires a reason.

use crate::orders::money::validate_item_changes;
use crate::orders::traits::{CommandContext, CommandHandler, CommandMetadata, OrderError};
use shared::order::{
    CommandErrorCode, EventPayload, ItemChanges, OrderEvent, OrderEventType,
};

use super::add_items::{quantity_in_order, stock_key};

/// ModifyItem action
#[derive(Debug, Clone)]
pub struct ModifyItemAction {
    pub order_id: String,
    pub instance_id: String,
    pub changes: ItemChanges,
    /// Available stock for this item's product/variation; `None` means
    /// untracked. Injected by OrdersManager.
    pub available_stock: Option<i32>,
}

impl CommandHandler for ModifyItemAction {
    fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<OrderEvent>, OrderError> {
        if self.changes.is_empty() {
            return Err(OrderError::InvalidOperation(
                CommandErrorCode::InvalidOperation,
                "no changes requested".to_string(),
            ));
        }
        validate_item_changes(&self.changes)?;

        let snapshot = ctx.load_snapshot(&self.order_id)?;
        super::validate_active_order(&snapshot, &self.order_id)?;

        let item = snapshot
            .find_item(&self.instance_id)
            .ok_or_else(|| OrderError::ItemNotFound(self.instance_id.clone()))?;

        // Stock ceiling applies to quantity increases
        if let (Some(new_quantity), Some(available)) = (self.changes.quantity, self.available_stock)
        {
            if new_quantity > item.quantity {
                let key = stock_key(&item.id, item.variation.as_ref().map(|v| v.id.as_str()));
                let held_elsewhere = quantity_in_order(&snapshot, &key) - item.quantity;
                if held_elsewhere + new_quantity > available {
                    return Err(OrderError::InvalidOperation(
                        CommandErrorCode::InsufficientStock,
                        format!(
                            "requested quantity {} exceeds available stock {}",
                            new_quantity, available
                        ),
                    ));
                }
            }
        }

        // Capture previous values for the fields being changed
        let previous = ItemChanges {
            quantity: self.changes.quantity.map(|_| item.quantity),
            modifiers: self.changes.modifiers.as_ref().map(|_| item.modifiers.clone()),
            course: self.changes.course.as_ref().and_then(|_| item.course.clone()),
            note: self.changes.note.as_ref().and_then(|_| item.note.clone()),
        };

        let removed = self.changes.quantity == Some(0);

        let seq = ctx.next_sequence();

        let event = OrderEvent::new(
            seq,
            self.order_id.clone(),
            metadata.operator_id.clone(),
            metadata.operator_name.clone(),
            metadata.command_id.clone(),
            Some(metadata.timestamp),
            OrderEventType::ItemModified,
            EventPayload::ItemModified {
                instance_id: self.instance_id.clone(),
                changes: self.changes.clone(),
                previous,
                removed,
            },
        );

        Ok(vec![event])
    }
}
