//! ApplyItemDiscount command handler
//!
//! Applies (or replaces) a line-level discount. Ceiling enforcement is
//! the permission gate's job; this handler validates the value itself
//! and requires a reason.

use crate::orders::money::validate_discount;
use crate::orders::traits::{CommandContext, CommandHandler, CommandMetadata, OrderError};
use shared::order::{CommandErrorCode, Discount, EventPayload, OrderEvent, OrderEventType};

/// ApplyItemDiscount action
#[derive(Debug, Clone)]
pub struct ApplyItemDiscountAction {
    pub order_id: String,
    pub instance_id: String,
    pub discount: Discount,
    pub authorizer_id: Option<String>,
    pub authorizer_name: Option<String>,
}

impl CommandHandler for ApplyItemDiscountAction {
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

        let item = snapshot
            .find_item(&self.instance_id)
            .ok_or_else(|| OrderError::ItemNotFound(self.instance_id.clone()))?;

        let seq = ctx.next_sequence();

        let event = OrderEvent::new(
            seq,
            self.order_id.clone(),
            metadata.operator_id.clone(),
            metadata.operator_name.clone(),
            metadata.command_id.clone(),
            Some(metadata.timestamp),
            OrderEventType::ItemDiscountApplied,
            EventPayload::ItemDiscountApplied {
                instance_id: self.instance_id.clone(),
                item_name: item.name.clone(),
                discount: self.discount.clone(),
                previous: item.discount.clone(),
                authorizer_id: self.authorizer_id.clone(),
                authorizer_name: self.authorizer_name.clone(),
            },
        );

        Ok(vec![event])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::order::types::DiscountKind;
    use shared::order::{CartItemSnapshot, OrderSnapshot, OrderStatus};
    use std::collections::HashMap;

    fn create_test_metadata() -> CommandMetadata {
        CommandMetadata {
            command_id: "cmd-1".to_string(),
            operator_id: "user-1".to_string(),
            operator_name: "Test User".to_string(),
            timestamp: 1234567890,
        }
    }

    fn test_item(instance_id: &str) -> CartItemSnapshot {
        CartItemSnapshot {
            id: "prod-1".to_string(),
            instance_id: instance_id.to_string(),
            name: "Latte".to_string(),
            category_name: "Coffee".to_string(),
            price: 4.0,
            variation: None,
            modifiers: Vec::new(),
            quantity: 1,
            price_override: None,
            discount: None,
            seat_number: None,
            course: None,
            note: None,
            authorizer_id: None,
            authorizer_name: None,
            unit_basis: 0.0,
            modifiers_total: 0.0,
            line_subtotal: 0.0,
            discount_amount: 0.0,
            line_total: 0.0,
        }
    }

    fn orders_with_item() -> HashMap<String, OrderSnapshot> {
        let mut snapshot = OrderSnapshot::new("order-1".to_string(), 0.0);
        snapshot.status = OrderStatus::Active;
        snapshot.items.push(test_item("inst-1"));
        let mut orders = HashMap::new();
        orders.insert("order-1".to_string(), snapshot);
        orders
    }

    fn discount(value: f64, reason: Option<&str>) -> Discount {
        Discount {
            kind: DiscountKind::Percentage,
            value,
            reason: reason.map(|r| r.to_string()),
        }
    }

    #[test]
    fn discount_with_reason_accepted() {
        let orders = orders_with_item();
        let mut ctx = CommandContext::new(&orders, 1);

        let action = ApplyItemDiscountAction {
            order_id: "order-1".to_string(),
            instance_id: "inst-1".to_string(),
            discount: discount(10.0, Some("Promotional")),
            authorizer_id: None,
            authorizer_name: None,
        };

        let events = action.execute(&mut ctx, &create_test_metadata()).unwrap();
        assert_eq!(events[0].event_type, OrderEventType::ItemDiscountApplied);
    }

    #[test]
    fn missing_reason_rejected() {
        let orders = orders_with_item();
        let mut ctx = CommandContext::new(&orders, 1);

        let action = ApplyItemDiscountAction {
            order_id: "order-1".to_string(),
            instance_id: "inst-1".to_string(),
            discount: discount(10.0, None),
            authorizer_id: None,
            authorizer_name: None,
        };

        assert!(matches!(
            action.execute(&mut ctx, &create_test_metadata()),
            Err(OrderError::InvalidOperation(
                CommandErrorCode::MissingReason,
                _
            ))
        ));
    }

    #[test]
    fn percentage_above_hundred_rejected_at_boundary() {
        let orders = orders_with_item();
        let mut ctx = CommandContext::new(&orders, 1);

        let action = ApplyItemDiscountAction {
            order_id: "order-1".to_string(),
            instance_id: "inst-1".to_string(),
            discount: discount(120.0, Some("Promotional")),
            authorizer_id: None,
            authorizer_name: None,
        };

        assert!(matches!(
            action.execute(&mut ctx, &create_test_metadata()),
            Err(OrderError::InvalidOperation(
                CommandErrorCode::InvalidDiscount,
                _
            ))
        ));
    }
}
