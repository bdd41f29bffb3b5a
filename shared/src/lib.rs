//! Shared types for the Till engine
//!
//! Common types used across the workspace: domain models, order
//! commands/events/snapshots, error types, and utility helpers.

pub mod error;
pub mod models;
pub mod order;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};
