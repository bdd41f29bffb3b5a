//! Core traits and error types for command processing

use enum_dispatch::enum_dispatch;
use crate::orders::appliers::{
    EventAction, ItemDiscountAppliedApplier, ItemModifiedApplier, ItemVoidedApplier,
    ItemsAddedApplier, OrderCompletedApplier, OrderDiscountAppliedApplier,
    OrderDiscountClearedApplier, OrderInfoUpdatedApplier, OrderOpenedApplier, OrderVoidedApplier,
    PaymentAddedApplier, PaymentCancelledApplier, PriceOverriddenApplier, SeatAssignedApplier,
    TipSetApplier,
};
use shared::error::{AppError, ErrorCode};
use shared::order::{
    CommandError, CommandErrorCode, OrderCommand, OrderEvent, OrderSnapshot,
};
use std::collections::HashMap;
use thiserror::Error;

/// Errors produced while validating and executing commands.
///
/// Validation errors leave the engine state untouched; the caller shows
/// the message and does not retry automatically. Invariant violations
/// (completing an unsettled order, paying a voided one) indicate a
/// caller bug and must not be swallowed.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderError {
    #[error("Order not found: {0}")]
    OrderNotFound(String),

    #[error("Order already completed: {0}")]
    OrderAlreadyCompleted(String),

    #[error("Order already voided: {0}")]
    OrderAlreadyVoided(String),

    #[error("Item not found: {0}")]
    ItemNotFound(String),

    #[error("Payment not found: {0}")]
    PaymentNotFound(String),

    #[error("Insufficient quantity")]
    InsufficientQuantity,

    #[error("Invalid payment amount")]
    InvalidAmount,

    #[error("{1}")]
    InvalidOperation(CommandErrorCode, String),
}

impl OrderError {
    /// The wire-level error code for this error
    pub fn code(&self) -> CommandErrorCode {
        match self {
            OrderError::OrderNotFound(_) => CommandErrorCode::OrderNotFound,
            OrderError::OrderAlreadyCompleted(_) => CommandErrorCode::OrderAlreadyCompleted,
            OrderError::OrderAlreadyVoided(_) => CommandErrorCode::OrderAlreadyVoided,
            OrderError::ItemNotFound(_) => CommandErrorCode::ItemNotFound,
            OrderError::PaymentNotFound(_) => CommandErrorCode::PaymentNotFound,
            OrderError::InsufficientQuantity => CommandErrorCode::InsufficientQuantity,
            OrderError::InvalidAmount => CommandErrorCode::InvalidAmount,
            OrderError::InvalidOperation(code, _) => code.clone(),
        }
    }

    /// Convert into the response-level error
    pub fn to_command_error(&self) -> CommandError {
        CommandError::new(self.code(), self.to_string())
    }
}

/// Presentation-boundary mapping. Validation failures stay retriable
/// user errors; acting on terminal orders or completing unsettled ones
/// surfaces as an invariant violation the UI must treat as a bug.
impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        let code = match &err {
            OrderError::OrderNotFound(_) => ErrorCode::OrderNotFound,
            OrderError::OrderAlreadyCompleted(_) => ErrorCode::OrderAlreadyCompleted,
            OrderError::OrderAlreadyVoided(_) => ErrorCode::OrderAlreadyVoided,
            OrderError::ItemNotFound(_) => ErrorCode::ItemNotFound,
            OrderError::PaymentNotFound(_) => ErrorCode::PaymentNotFound,
            OrderError::InsufficientQuantity => ErrorCode::InsufficientQuantity,
            OrderError::InvalidAmount => ErrorCode::InvalidAmount,
            OrderError::InvalidOperation(code, _) => match code {
                CommandErrorCode::ApprovalRequired => ErrorCode::ApprovalRequired,
                CommandErrorCode::ApprovalDenied => ErrorCode::ApprovalDenied,
                CommandErrorCode::InsufficientStock => ErrorCode::InsufficientStock,
                CommandErrorCode::GiftCardInsufficient => ErrorCode::GiftCardInsufficient,
                CommandErrorCode::PaymentExceedsRemaining => ErrorCode::PaymentExceedsRemaining,
                CommandErrorCode::OrderNotSettled => ErrorCode::OrderNotSettled,
                CommandErrorCode::MissingReason => ErrorCode::RequiredField,
                CommandErrorCode::InvalidAmount => ErrorCode::InvalidAmount,
                CommandErrorCode::InvalidQuantity
                | CommandErrorCode::InvalidDiscount => ErrorCode::ValidationFailed,
                CommandErrorCode::OrderAlreadyCompleted => ErrorCode::OrderAlreadyCompleted,
                CommandErrorCode::OrderAlreadyVoided => ErrorCode::OrderAlreadyVoided,
                CommandErrorCode::OrderNotFound => ErrorCode::OrderNotFound,
                CommandErrorCode::ItemNotFound => ErrorCode::ItemNotFound,
                CommandErrorCode::PaymentNotFound => ErrorCode::PaymentNotFound,
                CommandErrorCode::InsufficientQuantity => ErrorCode::InsufficientQuantity,
                CommandErrorCode::InvalidOperation => ErrorCode::InvalidRequest,
                CommandErrorCode::InternalError => ErrorCode::InternalError,
            },
        };
        AppError::with_message(code, err.to_string())
    }
}

/// Metadata extracted from the command envelope, passed to every handler
#[derive(Debug, Clone)]
pub struct CommandMetadata {
    pub command_id: String,
    pub operator_id: String,
    pub operator_name: String,
    /// Client timestamp (Unix milliseconds)
    pub timestamp: i64,
}

impl From<&OrderCommand> for CommandMetadata {
    fn from(command: &OrderCommand) -> Self {
        Self {
            command_id: command.command_id.clone(),
            operator_id: command.operator_id.clone(),
            operator_name: command.operator_name.clone(),
            timestamp: command.timestamp,
        }
    }
}

/// Execution context handed to command handlers: a read view of the
/// active orders plus the global sequence allocator.
///
/// Handlers never mutate snapshots directly - they emit events, and the
/// appliers mutate. That keeps validation and application separable and
/// replay deterministic.
pub struct CommandContext<'a> {
    orders: &'a HashMap<String, OrderSnapshot>,
    next_sequence: u64,
}

impl<'a> CommandContext<'a> {
    pub fn new(orders: &'a HashMap<String, OrderSnapshot>, current_sequence: u64) -> Self {
        Self {
            orders,
            next_sequence: current_sequence,
        }
    }

    /// Load a snapshot by order ID (cloned; handlers work on a copy)
    pub fn load_snapshot(&self, order_id: &str) -> Result<OrderSnapshot, OrderError> {
        self.orders
            .get(order_id)
            .cloned()
            .ok_or_else(|| OrderError::OrderNotFound(order_id.to_string()))
    }

    /// Allocate the next global sequence number
    pub fn next_sequence(&mut self) -> u64 {
        let seq = self.next_sequence;
        self.next_sequence += 1;
        seq
    }

    /// Where the allocator currently stands (handed back to the manager
    /// after a successful execution)
    pub fn sequence_cursor(&self) -> u64 {
        self.next_sequence
    }
}

/// A command handler validates one command and emits the events that
/// record it. Handlers are pure with respect to engine state.
pub trait CommandHandler {
    fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<OrderEvent>, OrderError>;
}

/// An event applier folds one event into a snapshot. Appliers are pure
/// functions of (snapshot, event) and must stay deterministic - replay
/// depends on it.
#[enum_dispatch]
pub trait EventApplier {
    fn apply(&self, snapshot: &mut OrderSnapshot, event: &OrderEvent);
}
