//! AssignSeat command handler
//!
//! Moves a line item to a seat (or clears the assignment) for the
//! split-by-seat calculator.

use crate::orders::traits::{CommandContext, CommandHandler, CommandMetadata, OrderError};
use shared::order::{CommandErrorCode, EventPayload, OrderEvent, OrderEventType};

/// AssignSeat action
#[derive(Debug, Clone)]
pub struct AssignSeatAction {
    pub order_id: String,
    pub instance_id: String,
    /// None clears the seat assignment
    pub seat_number: Option<i32>,
}

impl CommandHandler for AssignSeatAction {
    fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<OrderEvent>, OrderError> {
        if let Some(seat) = self.seat_number {
            if seat <= 0 {
                return Err(OrderError::InvalidOperation(
                    CommandErrorCode::InvalidQuantity,
                    format!("seat number must be positive, got {}", seat),
                ));
            }
        }

        let snapshot = ctx.load_snapshot(&self.order_id)?;
        super::validate_active_order(&snapshot, &self.order_id)?;

        if snapshot.find_item(&self.instance_id).is_none() {
            return Err(OrderError::ItemNotFound(self.instance_id.clone()));
        }

        let seq = ctx.next_sequence();

        let event = OrderEvent::new(
            seq,
            self.order_id.clone(),
            metadata.operator_id.clone(),
            metadata.operator_name.clone(),
            metadata.command_id.clone(),
            Some(metadata.timestamp),
            OrderEventType::SeatAssigned,
            EventPayload::SeatAssigned {
                instance_id: self.instance_id.clone(),
                seat_number: self.seat_number,
            },
        );

        Ok(vec![event])
    }
}
