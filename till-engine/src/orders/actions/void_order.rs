//! VoidOrder command handler
//!
//! Voids a whole order. Requires a non-empty reason and a clean tender
//! list - outstanding payments must be cancelled first so the drawer
//! math stays consistent.

use crate::orders::traits::{CommandContext, CommandHandler, CommandMetadata, OrderError};
use shared::order::{CommandErrorCode, EventPayload, OrderEvent, OrderEventType};

/// VoidOrder action
#[derive(Debug, Clone)]
pub struct VoidOrderAction {
    pub order_id: String,
    pub reason: String,
    pub authorizer_id: Option<String>,
    pub authorizer_name: Option<String>,
}

impl CommandHandler for VoidOrderAction {
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

        if snapshot.payments.iter().any(|p| !p.cancelled) {
            return Err(OrderError::InvalidOperation(
                CommandErrorCode::InvalidOperation,
                "cancel outstanding payments before voiding the order".to_string(),
            ));
        }

        let seq = ctx.next_sequence();

        let event = OrderEvent::new(
            seq,
            self.order_id.clone(),
            metadata.operator_id.clone(),
            metadata.operator_name.clone(),
            metadata.command_id.clone(),
            Some(metadata.timestamp),
            OrderEventType::OrderVoided,
            EventPayload::OrderVoided {
                reason: self.reason.clone(),
                authorizer_id: self.authorizer_id.clone(),
                authorizer_name: self.authorizer_name.clone(),
            },
        );

        Ok(vec![event])
    }
}
