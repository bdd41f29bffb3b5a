//! Data models
//!
//! Shared between the engine and the presentation layer. All IDs are
//! `String` (catalog references come from the injected provider) and all
//! timestamps are Unix milliseconds.

pub mod catalog;
pub mod employee;
pub mod shift;
pub mod z_report;

// Re-exports
pub use catalog::*;
pub use employee::*;
pub use shift::*;
pub use z_report::*;
