//! Order events - immutable facts recorded after command processing

use super::types::{
    CartItemSnapshot, CustomerRef, Discount, ItemChanges, OrderType, PaymentSummaryItem,
    TenderMethod,
};
use serde::{Deserialize, Serialize};

/// Order event - immutable record of one state transition
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderEvent {
    /// Event unique ID
    pub event_id: String,
    /// Global sequence number (authoritative ordering for replay)
    pub sequence: u64,
    /// Order this event belongs to
    pub order_id: String,
    /// Engine timestamp (Unix milliseconds) - authoritative
    pub timestamp: i64,
    /// Client timestamp from the command, for audit (may have clock skew)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_timestamp: Option<i64>,
    /// Operator who triggered this event
    pub operator_id: String,
    /// Operator name (snapshot for audit)
    pub operator_name: String,
    /// Command that triggered this event (for audit tracing)
    pub command_id: String,
    /// Event type
    pub event_type: OrderEventType,
    /// Event payload
    pub payload: EventPayload,
}

/// Event type enumeration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderEventType {
    // Lifecycle
    OrderOpened,
    OrderCompleted,
    OrderVoided,

    // Items
    ItemsAdded,
    ItemModified,
    ItemVoided,
    ItemDiscountApplied,
    PriceOverridden,
    SeatAssigned,

    // Order-level adjustments
    OrderDiscountApplied,
    OrderDiscountCleared,
    TipSet,
    OrderInfoUpdated,

    // Payments
    PaymentAdded,
    PaymentCancelled,
}

impl std::fmt::Display for OrderEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderEventType::OrderOpened => write!(f, "ORDER_OPENED"),
            OrderEventType::OrderCompleted => write!(f, "ORDER_COMPLETED"),
            OrderEventType::OrderVoided => write!(f, "ORDER_VOIDED"),
            OrderEventType::ItemsAdded => write!(f, "ITEMS_ADDED"),
            OrderEventType::ItemModified => write!(f, "ITEM_MODIFIED"),
            OrderEventType::ItemVoided => write!(f, "ITEM_VOIDED"),
            OrderEventType::ItemDiscountApplied => write!(f, "ITEM_DISCOUNT_APPLIED"),
            OrderEventType::PriceOverridden => write!(f, "PRICE_OVERRIDDEN"),
            OrderEventType::SeatAssigned => write!(f, "SEAT_ASSIGNED"),
            OrderEventType::OrderDiscountApplied => write!(f, "ORDER_DISCOUNT_APPLIED"),
            OrderEventType::OrderDiscountCleared => write!(f, "ORDER_DISCOUNT_CLEARED"),
            OrderEventType::TipSet => write!(f, "TIP_SET"),
            OrderEventType::OrderInfoUpdated => write!(f, "ORDER_INFO_UPDATED"),
            OrderEventType::PaymentAdded => write!(f, "PAYMENT_ADDED"),
            OrderEventType::PaymentCancelled => write!(f, "PAYMENT_CANCELLED"),
        }
    }
}

/// Event payload variants
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventPayload {
    // ========== Lifecycle ==========
    OrderOpened {
        /// Engine-generated receipt number (always present)
        receipt_number: String,
        /// Tax rate snapshot taken from configuration at open
        tax_rate: f64,
        #[serde(skip_serializing_if = "Option::is_none")]
        order_type: Option<OrderType>,
        #[serde(skip_serializing_if = "Option::is_none")]
        table_name: Option<String>,
        guest_count: i32,
        #[serde(skip_serializing_if = "Option::is_none")]
        customer: Option<CustomerRef>,
    },

    OrderCompleted {
        receipt_number: String,
        final_total: f64,
        payment_summary: Vec<PaymentSummaryItem>,
        /// Gift cards debited at finalization (card number, amount)
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        gift_card_redemptions: Vec<(String, f64)>,
    },

    OrderVoided {
        reason: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        authorizer_id: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        authorizer_name: Option<String>,
    },

    // ========== Items ==========
    ItemsAdded {
        /// Complete snapshots of the added items
        items: Vec<CartItemSnapshot>,
    },

    ItemModified {
        instance_id: String,
        /// Changes applied
        changes: ItemChanges,
        /// Previous values for comparison
        previous: ItemChanges,
        /// True when quantity reached 0 and the line was removed
        /// (silent removal, not a void)
        removed: bool,
    },

    ItemVoided {
        instance_id: String,
        item_name: String,
        /// Partial void quantity; None voided the whole line
        #[serde(skip_serializing_if = "Option::is_none")]
        quantity: Option<i32>,
        reason: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        authorizer_id: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        authorizer_name: Option<String>,
    },

    ItemDiscountApplied {
        instance_id: String,
        item_name: String,
        discount: Discount,
        #[serde(skip_serializing_if = "Option::is_none")]
        previous: Option<Discount>,
        #[serde(skip_serializing_if = "Option::is_none")]
        authorizer_id: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        authorizer_name: Option<String>,
    },

    PriceOverridden {
        instance_id: String,
        item_name: String,
        new_price: f64,
        /// Unit basis before the override (catalog or prior override)
        previous_price: f64,
        reason: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        authorizer_id: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        authorizer_name: Option<String>,
    },

    SeatAssigned {
        instance_id: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        seat_number: Option<i32>,
    },

    // ========== Order-level adjustments ==========
    OrderDiscountApplied {
        discount: Discount,
        #[serde(skip_serializing_if = "Option::is_none")]
        previous: Option<Discount>,
        #[serde(skip_serializing_if = "Option::is_none")]
        authorizer_id: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        authorizer_name: Option<String>,
    },

    OrderDiscountCleared {
        #[serde(skip_serializing_if = "Option::is_none")]
        previous: Option<Discount>,
    },

    TipSet {
        #[serde(skip_serializing_if = "Option::is_none")]
        tip: Option<f64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        previous: Option<f64>,
    },

    OrderInfoUpdated {
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

    // ========== Payments ==========
    PaymentAdded {
        payment_id: String,
        method: TenderMethod,
        /// Amount recorded against the order (min of requested and
        /// remaining balance)
        amount: f64,
        #[serde(skip_serializing_if = "Option::is_none")]
        tendered: Option<f64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        change: Option<f64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        card_number: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        note: Option<String>,
    },

    PaymentCancelled {
        payment_id: String,
        method: TenderMethod,
        amount: f64,
        #[serde(skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        authorizer_id: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        authorizer_name: Option<String>,
    },
}

impl OrderEvent {
    /// Create a new event
    ///
    /// # Arguments
    /// * `sequence` - Global sequence number (authoritative ordering)
    /// * `order_id` - Order this event belongs to
    /// * `operator_id` - Operator who triggered this event
    /// * `operator_name` - Operator name (snapshot for audit)
    /// * `command_id` - Command that triggered this event
    /// * `client_timestamp` - Client-provided timestamp (for audit)
    /// * `event_type` - Event type
    /// * `payload` - Event payload
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        sequence: u64,
        order_id: String,
        operator_id: String,
        operator_name: String,
        command_id: String,
        client_timestamp: Option<i64>,
        event_type: OrderEventType,
        payload: EventPayload,
    ) -> Self {
        Self {
            event_id: uuid::Uuid::new_v4().to_string(),
            sequence,
            order_id,
            // Engine timestamp is authoritative for state evolution
            timestamp: crate::util::now_millis(),
            client_timestamp,
            operator_id,
            operator_name,
            command_id,
            event_type,
            payload,
        }
    }

    /// Create an event from a command envelope (extracts operator
    /// metadata including the client timestamp)
    pub fn from_command(
        sequence: u64,
        order_id: String,
        command: &super::OrderCommand,
        event_type: OrderEventType,
        payload: EventPayload,
    ) -> Self {
        Self::new(
            sequence,
            order_id,
            command.operator_id.clone(),
            command.operator_name.clone(),
            command.command_id.clone(),
            Some(command.timestamp),
            event_type,
            payload,
        )
    }
}
