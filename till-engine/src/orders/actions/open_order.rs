//! OpenOrder command handler
//!
//! Creates a new order. The OrdersManager constructs this action
//! directly (never via `From<&OrderCommand>`) because the order_id and
//! receipt_number are engine-generated.

use crate::orders::traits::{CommandContext, CommandHandler, CommandMetadata, OrderError};
use shared::order::{
    CommandErrorCode, CustomerRef, EventPayload, OrderEvent, OrderEventType, OrderType,
};

/// OpenOrder action
#[derive(Debug, Clone)]
pub struct OpenOrderAction {
    /// Engine-generated order ID
    pub order_id: String,
    /// Engine-generated receipt number
    pub receipt_number: String,
    /// Tax rate snapshot from configuration
    pub tax_rate: f64,
    pub order_type: Option<OrderType>,
    pub table_name: Option<String>,
    pub guest_count: Option<i32>,
    pub customer: Option<CustomerRef>,
}

impl CommandHandler for OpenOrderAction {
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

        let seq = ctx.next_sequence();

        let event = OrderEvent::new(
            seq,
            self.order_id.clone(),
            metadata.operator_id.clone(),
            metadata.operator_name.clone(),
            metadata.command_id.clone(),
            Some(metadata.timestamp),
            OrderEventType::OrderOpened,
            EventPayload::OrderOpened {
                receipt_number: self.receipt_number.clone(),
                tax_rate: self.tax_rate,
                order_type: self.order_type,
                table_name: self.table_name.clone(),
                guest_count: self.guest_count.unwrap_or(1),
                customer: self.customer.clone(),
            },
        );

        Ok(vec![event])
    }
}
