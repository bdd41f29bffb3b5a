//! VoidItem command handler
//!
//! Audited removal of a line - requires a non-empty reason and routes
//! through the permission gate before it reaches this handler. The
//! OrdersManager appends the matching audit entry when the event lands.

use crate::orders::traits::{CommandContext, CommandHandler, CommandMetadata, OrderError};
use shared::order::{CommandErrorCode, EventPayload, OrderEvent, OrderEventType};

/// VoidItem action
#[derive(Debug, Clone)]
pub struct VoidItemAction {
    pub order_id: String,
    pub instance_id: String,
    /// Partial void quantity; None voids the whole line
    pub quantity: Option<i32>,
    pub reason: String,
    pub authorizer_id: Option<String>,
    pub authorizer_name: Option<String>,
}

impl CommandHandler for VoidItemAction {
    fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<OrderEvent>, OrderError> {
        if self.reason.trim().is_empty() {
            return Err(OrderError::InvalidOperation(
                CommandErrorCode::MissingReason,
                "void requires a reason".to_string(),
            ));
        }

        let snapshot = ctx.load_snapshot(&self.order_id)?;
        super::validate_active_order(&snapshot, &self.order_id)?;

        let item = snapshot
            .find_item(&self.instance_id)
            .ok_or_else(|| OrderError::ItemNotFound(self.instance_id.clone()))?;

        if let Some(qty) = self.quantity {
            if qty <= 0 {
                return Err(OrderError::InvalidOperation(
                    CommandErrorCode::InvalidQuantity,
                    format!("void quantity must be positive, got {}", qty),
                ));
            }
            if qty > item.quantity {
                return Err(OrderError::InsufficientQuantity);
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
            OrderEventType::ItemVoided,
            EventPayload::ItemVoided {
                instance_id: self.instance_id.clone(),
                item_name: item.name.clone(),
                quantity: self.quantity,
                reason: self.reason.clone(),
                authorizer_id: self.authorizer_id.clone(),
                authorizer_name: self.authorizer_name.clone(),
            },
        );

        Ok(vec![event])
    }
}
