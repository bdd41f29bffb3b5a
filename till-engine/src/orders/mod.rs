//! Order engine: pricing, commands, events, tenders and splits
//!
//! The order side of the engine is event-sourced:
//!
//! - **actions**: one handler per command - validate, then emit events
//! - **appliers**: one applier per event - fold into the snapshot
//! - **money**: decimal-precise pricing and aggregation
//! - **reducer**: instance IDs, input conversion, event replay
//! - **split**: pure split-check calculators (seat / even / subset)
//! - **manager**: the OrdersManager command pipeline
//!
//! # Data Flow
//!
//! ```text
//! Command → OrdersManager → PermissionGate check
//!                 ↓
//!          CommandAction::execute  → OrderEvent(s)
//!                 ↓
//!          EventAction::apply      → OrderSnapshot (+ totals + checksum)
//!                 ↓
//!          audit entries, gift-card redemption, repository hand-off
//! ```

pub mod actions;
pub mod appliers;
pub mod manager;
pub mod money;
pub mod reducer;
pub mod split;
pub mod traits;

// Re-exports
pub use manager::OrdersManager;
pub use reducer::{generate_instance_id, input_to_snapshot, replay};
pub use split::{
    split_by_items, split_by_seat, split_even, EvenSplit, ItemSplit, SeatShare, SeatSplit,
    SplitLine,
};
pub use traits::{CommandContext, CommandHandler, CommandMetadata, EventApplier, OrderError};

// Re-export shared types for convenience
pub use shared::order::{
    CommandError, CommandErrorCode, CommandResponse, EventPayload, OrderCommand,
    OrderCommandPayload, OrderEvent, OrderEventType, OrderSnapshot, OrderStatus,
};
