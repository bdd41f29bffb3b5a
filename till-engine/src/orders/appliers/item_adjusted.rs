//! Appliers for gated line-level adjustments
//!
//! - **ItemDiscountApplied**: sets/replaces a line discount
//! - **PriceOverridden**: sets the manual unit price
//! - **SeatAssigned**: moves a line to a seat (or back to unassigned)

use crate::orders::traits::EventApplier;
use shared::order::types::PriceOverride;
use shared::order::{EventPayload, OrderEvent, OrderSnapshot};

/// ItemDiscountApplied applier
pub struct ItemDiscountAppliedApplier;

impl EventApplier for ItemDiscountAppliedApplier {
    fn apply(&self, snapshot: &mut OrderSnapshot, event: &OrderEvent) {
        if let EventPayload::ItemDiscountApplied {
            instance_id,
            discount,
            authorizer_id,
            authorizer_name,
            ..
        } = &event.payload
        {
            let Some(item) = snapshot
                .items
                .iter_mut()
                .find(|i| i.instance_id == *instance_id)
            else {
                return;
            };
            item.discount = Some(discount.clone());
            item.authorizer_id = authorizer_id.clone();
            item.authorizer_name = authorizer_name.clone();

            super::finalize(snapshot, event);
        }
    }
}

/// PriceOverridden applier
pub struct PriceOverriddenApplier;

impl EventApplier for PriceOverriddenApplier {
    fn apply(&self, snapshot: &mut OrderSnapshot, event: &OrderEvent) {
        if let EventPayload::PriceOverridden {
            instance_id,
            new_price,
            reason,
            authorizer_id,
            authorizer_name,
            ..
        } = &event.payload
        {
            let Some(item) = snapshot
                .items
                .iter_mut()
                .find(|i| i.instance_id == *instance_id)
            else {
                return;
            };
            item.price_override = Some(PriceOverride {
                value: *new_price,
                reason: reason.clone(),
            });
            item.authorizer_id = authorizer_id.clone();
            item.authorizer_name = authorizer_name.clone();

            super::finalize(snapshot, event);
        }
    }
}

/// SeatAssigned applier
pub struct SeatAssignedApplier;

impl EventApplier for SeatAssignedApplier {
    fn apply(&self, snapshot: &mut OrderSnapshot, event: &OrderEvent) {
        if let EventPayload::SeatAssigned {
            instance_id,
            seat_number,
        } = &event.payload
        {
            let Some(item) = snapshot
                .items
                .iter_mut()
                .find(|i| i.instance_id == *instance_id)
            else {
                return;
            };
            item.seat_number = *seat_number;

            super::finalize(snapshot, event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::order::types::{Discount, DiscountKind};
    use shared::order::{CartItemSnapshot, OrderEventType};

    fn test_item(instance_id: &str, price: f64, quantity: i32) -> CartItemSnapshot {
        CartItemSnapshot {
            id: "prod-1".to_string(),
            instance_id: instance_id.to_string(),
            name: "Latte".to_string(),
            category_name: "Coffee".to_string(),
            price,
            variation: None,
            modifiers: Vec::new(),
            quantity,
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

    #[test]
    fn discount_applies_and_records_authorizer() {
        let mut snapshot = OrderSnapshot::new("order-1".to_string(), 0.0);
        snapshot.items.push(test_item("inst-1", 10.0, 2));

        let event = OrderEvent::new(
            1,
            "order-1".to_string(),
            "user-1".to_string(),
            "Cashier".to_string(),
            "cmd-1".to_string(),
            None,
            OrderEventType::ItemDiscountApplied,
            EventPayload::ItemDiscountApplied {
                instance_id: "inst-1".to_string(),
                item_name: "Latte".to_string(),
                discount: Discount {
                    kind: DiscountKind::Percentage,
                    value: 25.0,
                    reason: Some("Manager Discretion".to_string()),
                },
                previous: None,
                authorizer_id: Some("mgr-1".to_string()),
                authorizer_name: Some("Manager".to_string()),
            },
        );
        ItemDiscountAppliedApplier.apply(&mut snapshot, &event);

        assert_eq!(snapshot.items[0].discount_amount, 5.0);
        assert_eq!(snapshot.items[0].line_total, 15.0);
        assert_eq!(snapshot.items[0].authorizer_id.as_deref(), Some("mgr-1"));
        assert_eq!(snapshot.subtotal, 15.0);
    }

    #[test]
    fn override_changes_unit_basis() {
        let mut snapshot = OrderSnapshot::new("order-1".to_string(), 0.0);
        snapshot.items.push(test_item("inst-1", 10.0, 2));

        let event = OrderEvent::new(
            1,
            "order-1".to_string(),
            "user-1".to_string(),
            "Cashier".to_string(),
            "cmd-1".to_string(),
            None,
            OrderEventType::PriceOverridden,
            EventPayload::PriceOverridden {
                instance_id: "inst-1".to_string(),
                item_name: "Latte".to_string(),
                new_price: 8.0,
                previous_price: 10.0,
                reason: "Price Match".to_string(),
                authorizer_id: None,
                authorizer_name: None,
            },
        );
        PriceOverriddenApplier.apply(&mut snapshot, &event);

        assert_eq!(snapshot.items[0].unit_basis, 8.0);
        assert_eq!(snapshot.subtotal, 16.0);
    }

    #[test]
    fn seat_assignment_moves_line() {
        let mut snapshot = OrderSnapshot::new("order-1".to_string(), 0.0);
        snapshot.items.push(test_item("inst-1", 10.0, 1));

        let event = OrderEvent::new(
            1,
            "order-1".to_string(),
            "user-1".to_string(),
            "Cashier".to_string(),
            "cmd-1".to_string(),
            None,
            OrderEventType::SeatAssigned,
            EventPayload::SeatAssigned {
                instance_id: "inst-1".to_string(),
                seat_number: Some(3),
            },
        );
        SeatAssignedApplier.apply(&mut snapshot, &event);

        assert_eq!(snapshot.items[0].seat_number, Some(3));
    }
}
