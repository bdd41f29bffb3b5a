//! Permission gate
//!
//! All role-ceiling logic for sensitive actions lives here - one
//! component consulted by every mutating command, instead of checks
//! re-implemented per dialog. Manager override is an explicit two-phase
//! flow: `request_approval` hands out a token, `approve` turns it into
//! an [`Approval`] after a second credential check.

mod gate;

pub use gate::{
    Approval, ApprovalToken, GateDecision, GateError, GateValue, PermissionGate, SensitiveAction,
};
