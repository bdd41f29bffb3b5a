//! Event applier implementations
//!
//! Each applier implements the `EventApplier` trait and handles one
//! specific event family. Appliers are PURE functions of
//! (snapshot, event) - replay determinism depends on it.

use enum_dispatch::enum_dispatch;

use shared::order::{EventPayload, OrderEvent, OrderSnapshot};

use super::money;
use super::traits::EventApplier;

mod item_adjusted;
mod item_modified;
mod item_voided;
mod items_added;
mod order_adjusted;
mod order_completed;
mod order_opened;
mod order_voided;
mod payment_added;
mod payment_cancelled;

pub use item_adjusted::{ItemDiscountAppliedApplier, PriceOverriddenApplier, SeatAssignedApplier};
pub use item_modified::ItemModifiedApplier;
pub use item_voided::ItemVoidedApplier;
pub use items_added::ItemsAddedApplier;
pub use order_adjusted::{
    OrderDiscountAppliedApplier, OrderDiscountClearedApplier, OrderInfoUpdatedApplier,
    TipSetApplier,
};
pub use order_completed::OrderCompletedApplier;
pub use order_opened::OrderOpenedApplier;
pub use order_voided::OrderVoidedApplier;
pub use payment_added::PaymentAddedApplier;
pub use payment_cancelled::PaymentCancelledApplier;

/// EventAction enum - dispatches to concrete applier implementations
///
/// Uses enum_dispatch for zero-cost static dispatch.
#[enum_dispatch(EventApplier)]
pub enum EventAction {
    OrderOpened(OrderOpenedApplier),
    ItemsAdded(ItemsAddedApplier),
    ItemModified(ItemModifiedApplier),
    ItemVoided(ItemVoidedApplier),
    ItemDiscountApplied(ItemDiscountAppliedApplier),
    PriceOverridden(PriceOverriddenApplier),
    SeatAssigned(SeatAssignedApplier),
    OrderDiscountApplied(OrderDiscountAppliedApplier),
    OrderDiscountCleared(OrderDiscountClearedApplier),
    TipSet(TipSetApplier),
    OrderInfoUpdated(OrderInfoUpdatedApplier),
    PaymentAdded(PaymentAddedApplier),
    PaymentCancelled(PaymentCancelledApplier),
    OrderCompleted(OrderCompletedApplier),
    OrderVoided(OrderVoidedApplier),
}

/// Convert OrderEvent reference to EventAction
///
/// This is the ONLY place with a match on EventPayload.
impl From<&OrderEvent> for EventAction {
    fn from(event: &OrderEvent) -> Self {
        match &event.payload {
            EventPayload::OrderOpened { .. } => EventAction::OrderOpened(OrderOpenedApplier),
            EventPayload::ItemsAdded { .. } => EventAction::ItemsAdded(ItemsAddedApplier),
            EventPayload::ItemModified { .. } => EventAction::ItemModified(ItemModifiedApplier),
            EventPayload::ItemVoided { .. } => EventAction::ItemVoided(ItemVoidedApplier),
            EventPayload::ItemDiscountApplied { .. } => {
                EventAction::ItemDiscountApplied(ItemDiscountAppliedApplier)
            }
            EventPayload::PriceOverridden { .. } => {
                EventAction::PriceOverridden(PriceOverriddenApplier)
            }
            EventPayload::SeatAssigned { .. } => EventAction::SeatAssigned(SeatAssignedApplier),
            EventPayload::OrderDiscountApplied { .. } => {
                EventAction::OrderDiscountApplied(OrderDiscountAppliedApplier)
            }
            EventPayload::OrderDiscountCleared { .. } => {
                EventAction::OrderDiscountCleared(OrderDiscountClearedApplier)
            }
            EventPayload::TipSet { .. } => EventAction::TipSet(TipSetApplier),
            EventPayload::OrderInfoUpdated { .. } => {
                EventAction::OrderInfoUpdated(OrderInfoUpdatedApplier)
            }
            EventPayload::PaymentAdded { .. } => EventAction::PaymentAdded(PaymentAddedApplier),
            EventPayload::PaymentCancelled { .. } => {
                EventAction::PaymentCancelled(PaymentCancelledApplier)
            }
            EventPayload::OrderCompleted { .. } => {
                EventAction::OrderCompleted(OrderCompletedApplier)
            }
            EventPayload::OrderVoided { .. } => EventAction::OrderVoided(OrderVoidedApplier),
        }
    }
}

/// Shared epilogue: bump sequence/timestamp, recompute totals, refresh
/// the drift-detection checksum
pub(crate) fn finalize(snapshot: &mut OrderSnapshot, event: &OrderEvent) {
    snapshot.last_sequence = event.sequence;
    snapshot.updated_at = event.timestamp;
    money::recalculate_totals(snapshot);
    snapshot.update_checksum();
}
