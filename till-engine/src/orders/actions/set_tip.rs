//! SetTip command handler

use crate::orders::traits::{CommandContext, CommandHandler, CommandMetadata, OrderError};
use shared::order::{CommandErrorCode, EventPayload, OrderEvent, OrderEventType};

/// SetTip action
#[derive(Debug, Clone)]
pub struct SetTipAction {
    pub order_id: String,
    /// None clears the tip
    pub tip: Option<f64>,
}

impl CommandHandler for SetTipAction {
    fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<OrderEvent>, OrderError> {
        if let Some(tip) = self.tip {
            if !tip.is_finite() || tip < 0.0 {
                return Err(OrderError::InvalidOperation(
                    CommandErrorCode::InvalidAmount,
                    format!("tip must be a non-negative amount, got {}", tip),
                ));
            }
        }

        let snapshot = ctx.load_snapshot(&self.order_id)?;
        super::validate_active_order(&snapshot, &self.order_id)?;

        let seq = ctx.next_sequence();

        let event = OrderEvent::new(
            seq,
            self.order_id.clone(),
            metadata.operator_id.clone(),
            metadata.operator_name.clone(),
            metadata.command_id.clone(),
            Some(metadata.timestamp),
            OrderEventType::TipSet,
            EventPayload::TipSet {
                tip: self.tip,
                previous: snapshot.tip,
            },
        );

        Ok(vec![event])
    }
}
