//! Order-level discount command handlers
//!
//! An order carries at most one order-level discount; applying a new
//! one replaces the old. Line-level and order-level discounts are
//! independent and both apply.

use crate::orders::money::validate_discount;
use crate::orders::traits::{CommandContext, CommandHandler, CommandMetadata, OrderError};
use shared::order::{CommandErrorCode, Discount, EventPayload, OrderEvent, OrderEventType};

/// ApplyOrderDiscount action
#[derive(Debug, Clone)]
pub struct ApplyOrderDiscountAction {
    pub order_id: String,
    pub discount: Discount,
    pub authorizer_id: Option<String>,
    pub authorizer_name: Option<String>,
}

impl CommandHandler for ApplyOrderDiscountAction {
    fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<OrderEvent>, OrderError> {
        validate_discount(&self.discount)?;
        if self
            .discount
            .reason
            .as_deref()
            .map_or(true, |r| r.trim().is_empty())
        {
            return Err(OrderError::InvalidOperation(
                CommandErrorCode::MissingReason,
                "discount requires a reason".to_string(),
            ));
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
            OrderEventType::OrderDiscountApplied,
            EventPayload::OrderDiscountApplied {
                discount: self.discount.clone(),
                previous: snapshot.order_discount.clone(),
                authorizer_id: self.authorizer_id.clone(),
                authorizer_name: self.authorizer_name.clone(),
            },
        );

        Ok(vec![event])
    }
}

/// ClearOrderDiscount action
#[derive(Debug, Clone)]
pub struct ClearOrderDiscountAction {
    pub order_id: String,
}

impl CommandHandler for ClearOrderDiscountAction {
    fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<OrderEvent>, OrderError> {
        let snapshot = ctx.load_snapshot(&self.order_id)?;
        super::validate_active_order(&snapshot, &self.order_id)?;

        if snapshot.order_discount.is_none() {
            return Err(OrderError::InvalidOperation(
                CommandErrorCode::InvalidOperation,
                "no order discount to clear".to_string(),
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
            OrderEventType::OrderDiscountCleared,
            EventPayload::OrderDiscountCleared {
                previous: snapshot.order_discount.clone(),
            },
        );

        Ok(vec![event])
    }
}
