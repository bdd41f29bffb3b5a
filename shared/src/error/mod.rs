//! Unified error system for the Till engine
//!
//! This module provides the error handling surface shared between the
//! engine and its callers:
//! - [`ErrorCode`]: Standardized error codes for all error types
//! - [`AppError`]: Rich error type with codes, messages, and details
//!
//! # Error Code Ranges
//!
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 4xxx: Order errors
//! - 5xxx: Payment errors
//! - 8xxx: Shift errors
//! - 9xxx: System errors
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode};
//!
//! // Create a simple error
//! let err = AppError::new(ErrorCode::NotFound);
//!
//! // Create an error with custom message and details
//! let err = AppError::validation("discount value out of range")
//!     .with_detail("field", "discount");
//! ```

mod codes;
mod types;

pub use codes::ErrorCode;
pub use types::{AppError, AppResult};
