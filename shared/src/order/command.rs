//! Order commands - operator intent submitted to the engine
//!
//! Commands are validated by the engine's action handlers; a command
//! either produces events or a [`CommandError`], never a partial
//! mutation.

use super::types::{
    CartItemInput, CustomerRef, Discount, ItemChanges, OrderType, PaymentInput,
};
use serde::{Deserialize, Serialize};

/// Order command envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCommand {
    /// Client-generated command ID (idempotency + audit tracing)
    pub command_id: String,
    /// Operator issuing the command
    pub operator_id: String,
    /// Operator name (snapshot for audit)
    pub operator_name: String,
    /// Client timestamp (Unix milliseconds)
    pub timestamp: i64,
    /// The operation requested
    pub payload: OrderCommandPayload,
}

/// Command payload variants
///
/// Sensitive payloads (void, price override, discounts) carry optional
/// authorizer fields: when a manager approved the action on behalf of
/// the operator, the approving identity lands here and is what the
/// audit entry records.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderCommandPayload {
    /// Start a new order (cart)
    OpenOrder {
        #[serde(skip_serializing_if = "Option::is_none")]
        order_type: Option<OrderType>,
        #[serde(skip_serializing_if = "Option::is_none")]
        table_name: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        guest_count: Option<i32>,
        #[serde(skip_serializing_if = "Option::is_none")]
        customer: Option<CustomerRef>,
    },

    /// Add items to an order
    AddItems {
        order_id: String,
        items: Vec<CartItemInput>,
    },

    /// Plain quantity/modifier/note edits - no permission check.
    /// Quantity 0 removes the line silently (not a void).
    ModifyItem {
        order_id: String,
        instance_id: String,
        changes: ItemChanges,
    },

    /// Audited removal of a line. Reason is mandatory.
    VoidItem {
        order_id: String,
        instance_id: String,
        /// Partial void quantity; None voids the whole line
        #[serde(skip_serializing_if = "Option::is_none")]
        quantity: Option<i32>,
        reason: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        authorizer_id: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        authorizer_name: Option<String>,
    },

    /// Apply (or replace) a line-level discount
    ApplyItemDiscount {
        order_id: String,
        instance_id: String,
        discount: Discount,
        #[serde(skip_serializing_if = "Option::is_none")]
        authorizer_id: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        authorizer_name: Option<String>,
    },

    /// Manually set a line's unit price. Reason is mandatory.
    OverridePrice {
        order_id: String,
        instance_id: String,
        new_price: f64,
        reason: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        authorizer_id: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        authorizer_name: Option<String>,
    },

    /// Apply (or replace) the single order-level discount
    ApplyOrderDiscount {
        order_id: String,
        discount: Discount,
        #[serde(skip_serializing_if = "Option::is_none")]
        authorizer_id: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        authorizer_name: Option<String>,
    },

    /// Remove the order-level discount
    ClearOrderDiscount { order_id: String },

    /// Set (or clear) the tip
    SetTip {
        order_id: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        tip: Option<f64>,
    },

    /// Assign (or clear) the seat a line belongs to
    AssignSeat {
        order_id: String,
        instance_id: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        seat_number: Option<i32>,
    },

    /// Update order-level info (type, guests, table, customer, notes)
    UpdateOrderInfo {
        order_id: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        order_type: Option<OrderType>,
        #[serde(skip_serializing_if = "Option::is_none")]
        guest_count: Option<i32>,
        #[serde(skip_serializing_if = "Option::is_none")]
        table_name: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        customer: Option<CustomerRef>,
        #[serde(skip_serializing_if = "Option::is_none")]
        note: Option<String>,
    },

    /// Add a tender toward the order total
    AddPayment {
        order_id: String,
        payment: PaymentInput,
    },

    /// Cancel a pending tender (before completion)
    CancelPayment {
        order_id: String,
        payment_id: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        authorizer_id: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        authorizer_name: Option<String>,
    },

    /// Finalize a settled order
    CompleteOrder { order_id: String },

    /// Void the whole order. Reason is mandatory.
    VoidOrder {
        order_id: String,
        reason: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        authorizer_id: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        authorizer_name: Option<String>,
    },
}

impl OrderCommandPayload {
    /// The order this command targets, if any (OpenOrder creates one)
    pub fn order_id(&self) -> Option<&str> {
        match self {
            OrderCommandPayload::OpenOrder { .. } => None,
            OrderCommandPayload::AddItems { order_id, .. }
            | OrderCommandPayload::ModifyItem { order_id, .. }
            | OrderCommandPayload::VoidItem { order_id, .. }
            | OrderCommandPayload::ApplyItemDiscount { order_id, .. }
            | OrderCommandPayload::OverridePrice { order_id, .. }
            | OrderCommandPayload::ApplyOrderDiscount { order_id, .. }
            | OrderCommandPayload::ClearOrderDiscount { order_id }
            | OrderCommandPayload::SetTip { order_id, .. }
            | OrderCommandPayload::AssignSeat { order_id, .. }
            | OrderCommandPayload::UpdateOrderInfo { order_id, .. }
            | OrderCommandPayload::AddPayment { order_id, .. }
            | OrderCommandPayload::CancelPayment { order_id, .. }
            | OrderCommandPayload::CompleteOrder { order_id }
            | OrderCommandPayload::VoidOrder { order_id, .. } => Some(order_id),
        }
    }
}

/// Command response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandResponse {
    /// The command ID this responds to
    pub command_id: String,
    /// Whether the command succeeded
    pub success: bool,
    /// New order ID (only for OpenOrder)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    /// Error details if failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<CommandError>,
}

impl CommandResponse {
    pub fn success(command_id: String, order_id: Option<String>) -> Self {
        Self {
            command_id,
            success: true,
            order_id,
            error: None,
        }
    }

    pub fn error(command_id: String, error: CommandError) -> Self {
        Self {
            command_id,
            success: false,
            order_id: None,
            error: Some(error),
        }
    }
}

/// Command error
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandError {
    pub code: CommandErrorCode,
    pub message: String,
}

impl CommandError {
    pub fn new(code: CommandErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Command error codes
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommandErrorCode {
    OrderNotFound,
    OrderAlreadyCompleted,
    OrderAlreadyVoided,
    ItemNotFound,
    PaymentNotFound,
    InsufficientQuantity,
    InsufficientStock,
    InvalidAmount,
    InvalidQuantity,
    InvalidDiscount,
    MissingReason,
    PaymentExceedsRemaining,
    GiftCardInsufficient,
    OrderNotSettled,
    /// Recoverable: retry the same command with a manager credential
    ApprovalRequired,
    ApprovalDenied,
    InvalidOperation,
    InternalError,
}
