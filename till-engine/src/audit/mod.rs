//! Override/void audit ledger
//!
//! Append-only record of every void, price override and discount that
//! proceeded. Entries are immutable, never edited or deleted, and carry
//! a SHA-256 hash chain so tampering is detectable. There is no code
//! path that mutates a price or voids a line without an entry landing
//! here.

mod ledger;
mod types;

pub use ledger::{AuditChainBreak, AuditChainVerification, AuditLedger};
pub use types::{OverrideAuditEntry, OverrideKind};
