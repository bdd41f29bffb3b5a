//! Order snapshot utilities
//!
//! - `generate_instance_id`: content-addressed instance IDs for items
//! - `input_to_snapshot`: convert CartItemInput to CartItemSnapshot
//! - `replay`: fold an event stream into a snapshot
//!
//! Event application itself lives in the appliers module; `replay` is a
//! thin loop over `EventAction`.

use shared::order::{CartItemInput, CartItemSnapshot, OrderEvent, OrderSnapshot};

use super::appliers::EventAction;
use super::traits::EventApplier;

/// Generate a content-addressed instance_id from CartItemInput
///
/// The instance_id is a hash of the item's identity-defining properties:
/// product, price, variation, modifiers, seat and course. Items with the
/// same instance_id are merged (quantities added together); anything
/// that changes what the guest is charged for, or who owes it, yields a
/// distinct line.
pub fn generate_instance_id(input: &CartItemInput) -> String {
    use sha2::{Digest, Sha256};

    let mut hasher = Sha256::new();

    hasher.update(input.product_id.as_bytes());
    hasher.update(input.price.to_be_bytes());

    if let Some(variation) = &input.variation {
        hasher.update(variation.id.as_bytes());
        hasher.update(variation.price.to_be_bytes());
    }

    for modifier in &input.modifiers {
        hasher.update(modifier.id.as_bytes());
        hasher.update(modifier.price.to_be_bytes());
        hasher.update(modifier.quantity.to_be_bytes());
    }

    if let Some(seat) = input.seat_number {
        hasher.update(seat.to_be_bytes());
    }

    if let Some(course) = &input.course {
        hasher.update(course.as_bytes());
    }

    let result = hasher.finalize();
    hex::encode(&result[..16]) // Use first 16 bytes for shorter ID
}

/// Convert CartItemInput to CartItemSnapshot with generated instance_id
///
/// Computed pricing fields start at zero; `recalculate_totals` fills
/// them when the item lands in a snapshot.
pub fn input_to_snapshot(input: &CartItemInput) -> CartItemSnapshot {
    CartItemSnapshot {
        id: input.product_id.clone(),
        instance_id: generate_instance_id(input),
        name: input.name.clone(),
        category_name: input.category_name.clone(),
        price: input.price,
        variation: input.variation.clone(),
        modifiers: input.modifiers.clone(),
        quantity: input.quantity,
        price_override: None,
        discount: None,
        seat_number: input.seat_number,
        course: input.course.clone(),
        note: input.note.clone(),
        authorizer_id: None,
        authorizer_name: None,
        unit_basis: 0.0,
        modifiers_total: 0.0,
        line_subtotal: 0.0,
        discount_amount: 0.0,
        line_total: 0.0,
    }
}

/// Replay an event stream over a snapshot.
///
/// Applying the same events to the same starting snapshot always yields
/// the same result, checksum included.
pub fn replay(snapshot: &mut OrderSnapshot, events: &[OrderEvent]) {
    for event in events {
        EventAction::from(event).apply(snapshot, event);
    }
}
