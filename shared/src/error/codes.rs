//! Unified error codes for the Till engine
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 4xxx: Order errors
//! - 5xxx: Payment errors
//! - 8xxx: Shift errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient
/// serialization and cross-language compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Invalid request
    InvalidRequest = 5,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 1xxx: Auth ====================
    /// Invalid credentials (PIN / badge)
    InvalidCredentials = 1002,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Manager approval required before the operation can proceed
    ApprovalRequired = 2006,
    /// Approval credential rejected or not elevated enough
    ApprovalDenied = 2007,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Order already completed
    OrderAlreadyCompleted = 4002,
    /// Order already voided
    OrderAlreadyVoided = 4003,
    /// Line item not found
    ItemNotFound = 4004,
    /// Requested quantity exceeds what the order holds
    InsufficientQuantity = 4005,
    /// Requested quantity exceeds available stock
    InsufficientStock = 4006,

    // ==================== 5xxx: Payment ====================
    /// Payment amount invalid
    InvalidAmount = 5001,
    /// Payment exceeds remaining balance
    PaymentExceedsRemaining = 5002,
    /// Gift card balance insufficient
    GiftCardInsufficient = 5003,
    /// Payment not found
    PaymentNotFound = 5004,
    /// Order not fully paid
    OrderNotSettled = 5005,

    // ==================== 8xxx: Shift ====================
    /// No shift is open
    ShiftNotOpen = 8001,
    /// A shift is already open
    ShiftAlreadyOpen = 8002,
    /// Shift already closed
    ShiftAlreadyClosed = 8003,

    // ==================== 9xxx: System ====================
    /// Internal error
    InternalError = 9001,
    /// Invariant violated (caller bug, must not be swallowed)
    InvariantViolation = 9002,
}

impl ErrorCode {
    /// Default human-readable message for this error code
    pub fn message(&self) -> &'static str {
        match self {
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            ErrorCode::InvalidCredentials => "Invalid credentials",

            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::ApprovalRequired => "Manager approval required",
            ErrorCode::ApprovalDenied => "Approval credential rejected",

            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::OrderAlreadyCompleted => "Order is already completed",
            ErrorCode::OrderAlreadyVoided => "Order is already voided",
            ErrorCode::ItemNotFound => "Line item not found",
            ErrorCode::InsufficientQuantity => "Insufficient quantity",
            ErrorCode::InsufficientStock => "Insufficient stock",

            ErrorCode::InvalidAmount => "Payment amount is invalid",
            ErrorCode::PaymentExceedsRemaining => "Payment exceeds remaining balance",
            ErrorCode::GiftCardInsufficient => "Gift card balance insufficient",
            ErrorCode::PaymentNotFound => "Payment not found",
            ErrorCode::OrderNotSettled => "Order is not fully paid",

            ErrorCode::ShiftNotOpen => "No shift is open",
            ErrorCode::ShiftAlreadyOpen => "A shift is already open",
            ErrorCode::ShiftAlreadyClosed => "Shift is already closed",

            ErrorCode::InternalError => "Internal error",
            ErrorCode::InvariantViolation => "Invariant violation",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message(), *self as u16)
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> Self {
        code as u16
    }
}

impl TryFrom<u16> for ErrorCode {
    type Error = String;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            5 => Ok(ErrorCode::InvalidRequest),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),
            1002 => Ok(ErrorCode::InvalidCredentials),
            2001 => Ok(ErrorCode::PermissionDenied),
            2006 => Ok(ErrorCode::ApprovalRequired),
            2007 => Ok(ErrorCode::ApprovalDenied),
            4001 => Ok(ErrorCode::OrderNotFound),
            4002 => Ok(ErrorCode::OrderAlreadyCompleted),
            4003 => Ok(ErrorCode::OrderAlreadyVoided),
            4004 => Ok(ErrorCode::ItemNotFound),
            4005 => Ok(ErrorCode::InsufficientQuantity),
            4006 => Ok(ErrorCode::InsufficientStock),
            5001 => Ok(ErrorCode::InvalidAmount),
            5002 => Ok(ErrorCode::PaymentExceedsRemaining),
            5003 => Ok(ErrorCode::GiftCardInsufficient),
            5004 => Ok(ErrorCode::PaymentNotFound),
            5005 => Ok(ErrorCode::OrderNotSettled),
            8001 => Ok(ErrorCode::ShiftNotOpen),
            8002 => Ok(ErrorCode::ShiftAlreadyOpen),
            8003 => Ok(ErrorCode::ShiftAlreadyClosed),
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::InvariantViolation),
            other => Err(format!("unknown error code: {}", other)),
        }
    }
}
