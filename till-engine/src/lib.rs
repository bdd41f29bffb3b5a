//! Till Engine - transaction calculation and shift reconciliation
//!
//! The in-process core of a point-of-sale client:
//!
//! - **orders**: cart pricing, command/event processing, tender
//!   allocation and split-check calculators
//! - **auth**: the permission gate with two-phase manager approval
//! - **audit**: append-only override/void ledger with hash chain
//! - **shifts**: shift lifecycle, cash-drawer reconciliation, Z-reports
//!
//! Everything here is synchronous: one cashier, one terminal, no
//! concurrent writers. Rendering, persistence and identity verification
//! are injected collaborators (see [`providers`]).
//!
//! # Data Flow
//!
//! ```text
//! Command → OrdersManager → PermissionGate → Action → Events
//!                 ↓                                      ↓
//!            AuditLedger                          Snapshot Update
//!                                                        ↓
//!                                     ShiftLedger → Z-Report (at close)
//! ```

pub mod audit;
pub mod auth;
pub mod config;
pub mod orders;
pub mod providers;
pub mod shifts;

// Re-exports
pub use audit::{AuditLedger, OverrideAuditEntry, OverrideKind};
pub use auth::{Approval, ApprovalToken, GateDecision, GateError, PermissionGate, SensitiveAction};
pub use config::{DiscountCeiling, EngineConfig, RolePolicy};
pub use orders::{OrderError, OrdersManager};
pub use providers::{
    CatalogProvider, Credential, GiftCardStore, IdentityProvider, OrderRepository,
    ShiftRepository,
};
pub use shifts::{ShiftError, ShiftLedger};
