//! OverridePrice command handler
//!
//! Manually sets a line's unit price, replacing the catalog/variation
//! price. Always requires a non-empty reason; the permission gate
//! decides whether the markdown needs manager approval.

use crate::orders::money::{price_line, to_f64, validate_price};
use crate::orders::traits::{CommandContext, CommandHandler, CommandMetadata, OrderError};
use shared::order::{CommandErrorCode, EventPayload, OrderEvent, OrderEventType};

/// OverridePrice action
#[derive(Debug, Clone)]
pub struct OverridePriceAction {
    pub order_id: String,
    pub instance_id: String,
    pub new_price: f64,
    pub reason: String,
    pub authorizer_id: Option<String>,
    pub authorizer_name: Option<String>,
}

impl CommandHandler for OverridePriceAction {
    fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<OrderEvent>, OrderError> {
        validate_price(self.new_price, "override price")?;
        if self.reason.trim().is_empty() {
            return Err(OrderError::InvalidOperation(
                CommandErrorCode::MissingReason,
                "price override requires a reason".to_string(),
            ));
        }

        let snapshot = ctx.load_snapshot(&self.order_id)?;
        super::validate_active_order(&snapshot, &self.order_id)?;

        let item = snapshot
            .find_item(&self.instance_id)
            .ok_or_else(|| OrderError::ItemNotFound(self.instance_id.clone()))?;

        // Unit basis before the override, for the audit trail
        let previous_price = to_f64(price_line(item).unit_basis);

        let seq = ctx.next_sequence();

        let event = OrderEvent::new(
            seq,
            self.order_id.clone(),
            metadata.operator_id.clone(),
            metadata.operator_name.clone(),
            metadata.command_id.clone(),
            Some(metadata.timestamp),
            OrderEventType::PriceOverridden,
            EventPayload::PriceOverridden {
                instance_id: self.instance_id.clone(),
                item_name: item.name.clone(),
                new_price: self.new_price,
                previous_price,
                reason: self.reason.clone(),
                authorizer_id: self.authorizer_id.clone(),
                authorizer_name: self.authorizer_name.clone(),
            },
        );

        Ok(vec![event])
    }
}
