//! UpdateOrderInfo command handler

use crate::orders::traits::{CommandContext, CommandHandler, CommandMetadata, OrderError};
use shared::order::{
    CommandErrorCode, CustomerRef, EventPayload, OrderEvent, OrderEventType, OrderType,
};

/// UpdateOrderInfo action
#[derive(Debug, Clone)]
pub struct UpdateOrderInfoAction {
    pub order_id: String,
    pub order_type: Option<OrderType>,
    pub guest_count: Option<i32>,
    pub table_name: Option<String>,
    pub customer: Option<CustomerRef>,
    pub note: Option<String>,
}

impl CommandHandler for UpdateOrderInfoAction {
    fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<OrderEvent>, OrderError> {
        if let Some(guests) = self.guest_count {
            if guests < 1 {
                return Err(OrderError::InvalidOperation(
                    CommandErrorCode::InvalidQuantity,
                    format!("guest count must be at least 1, got {}", guests),
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
            OrderEventType::OrderInfoUpdated,
            EventPayload::OrderInfoUpdated {
                order_type: self.order_type,
                guest_count: self.guest_count,
                table_name: self.table_name.clone(),
                customer: self.customer.clone(),
                note: self.note.clone(),
            },
        );

        Ok(vec![event])
    }
}
