//! AddItems command handler
//!
//! Adds items to an existing order, enforcing the stock-availability
//! quantity ceiling: a line may never grow beyond the on-hand inventory
//! the catalog reports at the moment of the edit.

use std::collections::HashMap;

use crate::orders::money::validate_cart_item;
use crate::orders::reducer::input_to_snapshot;
use crate::orders::traits::{CommandContext, CommandHandler, CommandMetadata, OrderError};
use shared::order::{
    CartItemInput, CommandErrorCode, EventPayload, OrderEvent, OrderEventType, OrderSnapshot,
};

/// Stock lookup key for a product or one of its variations
pub(crate) fn stock_key(product_id: &str, variation_id: Option<&str>) -> String {
    match variation_id {
        Some(variation) => format!("{}:{}", product_id, variation),
        None => product_id.to_string(),
    }
}

/// Quantity of a product/variation already held by the order
pub(crate) fn quantity_in_order(snapshot: &OrderSnapshot, key: &str) -> i32 {
    snapshot
        .items
        .iter()
        .filter(|i| stock_key(&i.id, i.variation.as_ref().map(|v| v.id.as_str())) == key)
        .map(|i| i.quantity)
        .sum()
}

/// AddItems action
#[derive(Debug, Clone)]
pub struct AddItemsAction {
    pub order_id: String,
    pub items: Vec<CartItemInput>,
    /// Available stock per stock_key; absent key = untracked.
    /// Injected by OrdersManager from the catalog provider.
    pub stock: HashMap<String, i32>,
}

impl CommandHandler for AddItemsAction {
    fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<OrderEvent>, OrderError> {
        if self.items.is_empty() {
            return Err(OrderError::InvalidOperation(
                CommandErrorCode::InvalidOperation,
                "no items to add".to_string(),
            ));
        }

        let snapshot = ctx.load_snapshot(&self.order_id)?;
        super::validate_active_order(&snapshot, &self.order_id)?;

        // Validate every input before emitting anything
        let mut requested: HashMap<String, i32> = HashMap::new();
        for item in &self.items {
            validate_cart_item(item)?;
            let key = stock_key(
                &item.product_id,
                item.variation.as_ref().map(|v| v.id.as_str()),
            );
            *requested.entry(key).or_insert(0) += item.quantity;
        }

        // Stock ceiling: in-order quantity + requested must fit on-hand
        for (key, requested_qty) in &requested {
            if let Some(available) = self.stock.get(key) {
                let held = quantity_in_order(&snapshot, key);
                if held + requested_qty > *available {
                    return Err(OrderError::InvalidOperation(
                        CommandErrorCode::InsufficientStock,
                        format!(
                            "requested {} of '{}' but only {} in stock ({} already in order)",
                            requested_qty, key, available, held
                        ),
                    ));
                }
            }
        }

        let seq = ctx.next_sequence();

        let event = OrderEvent::new(
            seq,
            self.order_id.clone(),
            metadata.operator_id.clone(),
            metadata.operator_name.clone(),
            metadata.command_id.clone(),
            Some(metadata.timestamp),
            OrderEventType::ItemsAdded,
            EventPayload::ItemsAdded {
                items: self.items.iter().map(input_to_snapshot).collect(),
            },
        );

        Ok(vec![event])
    }
}
