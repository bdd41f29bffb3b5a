//! Order domain types
//!
//! Commands express what the operator asked for, events record what the
//! engine decided, and snapshots are the computed state the presentation
//! layer renders. Pricing math lives in the engine crate; these types
//! only carry the data.

pub mod command;
pub mod event;
pub mod snapshot;
pub mod types;

pub use command::{
    CommandError, CommandErrorCode, CommandResponse, OrderCommand, OrderCommandPayload,
};
pub use event::{EventPayload, OrderEvent, OrderEventType};
pub use snapshot::{OrderSnapshot, OrderStatus};
pub use types::{
    CartItemInput, CartItemSnapshot, CustomerRef, Discount, DiscountKind, ItemChanges,
    ItemModifier, OrderType, PaymentInput, PaymentRecord, PaymentSummaryItem, PriceOverride,
    TenderMethod, VariationInfo,
};
