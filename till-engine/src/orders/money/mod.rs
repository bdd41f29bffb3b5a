//! Money calculation utilities using rust_decimal for precision
//!
//! This module provides precise decimal arithmetic for monetary
//! calculations. All calculations are done using `Decimal` internally,
//! then converted to `f64` only where a value crosses into an event or
//! snapshot - never between intermediate steps, so rounding error does
//! not compound across many line items.

use crate::orders::traits::OrderError;
use rust_decimal::prelude::*;
use shared::order::types::{CartItemInput, CartItemSnapshot, Discount, DiscountKind, ItemChanges};
use shared::order::{CommandErrorCode, OrderSnapshot, PaymentInput, PaymentRecord, TenderMethod};

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Tolerance for monetary comparisons (0.01)
pub const MONEY_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Maximum allowed price per item ($1,000,000)
const MAX_PRICE: f64 = 1_000_000.0;
/// Maximum allowed quantity per line
const MAX_QUANTITY: i32 = 9999;
/// Maximum allowed quantity per modifier
pub const MAX_MODIFIER_QUANTITY: i32 = 99;
/// Maximum allowed payment amount ($1,000,000)
const MAX_PAYMENT_AMOUNT: f64 = 1_000_000.0;

/// Validate that a f64 value is finite (not NaN, not Infinity)
#[inline]
fn require_finite(value: f64, field_name: &str) -> Result<(), OrderError> {
    if !value.is_finite() {
        return Err(OrderError::InvalidOperation(
            CommandErrorCode::InvalidAmount,
            format!("{} must be a finite number, got {}", field_name, value),
        ));
    }
    Ok(())
}

pub(crate) fn validate_price(value: f64, field_name: &str) -> Result<(), OrderError> {
    require_finite(value, field_name)?;
    if value < 0.0 {
        return Err(OrderError::InvalidOperation(
            CommandErrorCode::InvalidAmount,
            format!("{} must be non-negative, got {}", field_name, value),
        ));
    }
    if value > MAX_PRICE {
        return Err(OrderError::InvalidOperation(
            CommandErrorCode::InvalidAmount,
            format!(
                "{} exceeds maximum allowed ({}), got {}",
                field_name, MAX_PRICE, value
            ),
        ));
    }
    Ok(())
}

/// Validate a discount at the input boundary.
///
/// Percentages must be within [0, 100] here; the pricer itself computes
/// whatever it is handed so that an out-of-range value slipping past the
/// gate stays observable in tests.
pub fn validate_discount(discount: &Discount) -> Result<(), OrderError> {
    require_finite(discount.value, "discount value")?;
    if discount.value < 0.0 {
        return Err(OrderError::InvalidOperation(
            CommandErrorCode::InvalidDiscount,
            format!("discount value must be non-negative, got {}", discount.value),
        ));
    }
    match discount.kind {
        DiscountKind::Percentage => {
            if discount.value > 100.0 {
                return Err(OrderError::InvalidOperation(
                    CommandErrorCode::InvalidDiscount,
                    format!(
                        "percentage discount must be between 0 and 100, got {}",
                        discount.value
                    ),
                ));
            }
        }
        DiscountKind::FixedAmount => {
            if discount.value > MAX_PRICE {
                return Err(OrderError::InvalidOperation(
                    CommandErrorCode::InvalidDiscount,
                    format!(
                        "fixed discount exceeds maximum allowed ({}), got {}",
                        MAX_PRICE, discount.value
                    ),
                ));
            }
        }
    }
    Ok(())
}

/// Validate a CartItemInput before processing
pub fn validate_cart_item(item: &CartItemInput) -> Result<(), OrderError> {
    validate_price(item.price, "price")?;

    if let Some(variation) = &item.variation {
        validate_price(variation.price, "variation price")?;
    }

    // Quantity must be positive and within bounds
    if item.quantity <= 0 {
        return Err(OrderError::InvalidOperation(
            CommandErrorCode::InvalidQuantity,
            format!("quantity must be positive, got {}", item.quantity),
        ));
    }
    if item.quantity > MAX_QUANTITY {
        return Err(OrderError::InvalidOperation(
            CommandErrorCode::InvalidQuantity,
            format!(
                "quantity exceeds maximum allowed ({}), got {}",
                MAX_QUANTITY, item.quantity
            ),
        ));
    }

    // Modifier prices and quantities must be valid
    for modifier in &item.modifiers {
        require_finite(modifier.price, "modifier price")?;
        if modifier.price.abs() > MAX_PRICE {
            return Err(OrderError::InvalidOperation(
                CommandErrorCode::InvalidAmount,
                format!(
                    "modifier price exceeds maximum allowed, got {} for '{}'",
                    modifier.price, modifier.name
                ),
            ));
        }
        if modifier.quantity <= 0 {
            return Err(OrderError::InvalidOperation(
                CommandErrorCode::InvalidQuantity,
                format!(
                    "modifier quantity must be positive, got {} for '{}'",
                    modifier.quantity, modifier.name
                ),
            ));
        }
        if modifier.quantity > MAX_MODIFIER_QUANTITY {
            return Err(OrderError::InvalidOperation(
                CommandErrorCode::InvalidQuantity,
                format!(
                    "modifier quantity exceeds maximum allowed ({}), got {} for '{}'",
                    MAX_MODIFIER_QUANTITY, modifier.quantity, modifier.name
                ),
            ));
        }
    }

    if let Some(seat) = item.seat_number {
        if seat <= 0 {
            return Err(OrderError::InvalidOperation(
                CommandErrorCode::InvalidQuantity,
                format!("seat number must be positive, got {}", seat),
            ));
        }
    }

    Ok(())
}

/// Validate a PaymentInput before processing
pub fn validate_payment(payment: &PaymentInput) -> Result<(), OrderError> {
    // Amount must be finite and positive
    require_finite(payment.amount, "payment amount")?;
    if payment.amount <= 0.0 {
        return Err(OrderError::InvalidAmount);
    }
    if payment.amount > MAX_PAYMENT_AMOUNT {
        return Err(OrderError::InvalidOperation(
            CommandErrorCode::InvalidAmount,
            format!(
                "payment amount exceeds maximum allowed ({}), got {}",
                MAX_PAYMENT_AMOUNT, payment.amount
            ),
        ));
    }

    // Tendered must be finite and non-negative if present
    if let Some(t) = payment.tendered {
        require_finite(t, "tendered")?;
        if t < 0.0 {
            return Err(OrderError::InvalidOperation(
                CommandErrorCode::InvalidAmount,
                "tendered amount must be non-negative".to_string(),
            ));
        }
    }

    // Only cash tenders carry a tendered amount (change is a cash concept)
    if payment.tendered.is_some() && payment.method != TenderMethod::Cash {
        return Err(OrderError::InvalidOperation(
            CommandErrorCode::InvalidOperation,
            format!("tendered amount is only valid for cash, got {}", payment.method),
        ));
    }

    // Gift card tenders must reference a card
    if payment.method == TenderMethod::GiftCard
        && payment.card_number.as_deref().map_or(true, |c| c.trim().is_empty())
    {
        return Err(OrderError::InvalidOperation(
            CommandErrorCode::InvalidOperation,
            "gift card payment requires a card number".to_string(),
        ));
    }

    Ok(())
}

/// Validate item changes (from ModifyItem command)
///
/// Quantity 0 is allowed: it removes the line silently, which is the
/// non-audited path distinct from a void.
pub fn validate_item_changes(changes: &ItemChanges) -> Result<(), OrderError> {
    if let Some(q) = changes.quantity {
        if q < 0 {
            return Err(OrderError::InvalidOperation(
                CommandErrorCode::InvalidQuantity,
                format!("quantity must not be negative, got {}", q),
            ));
        }
        if q > MAX_QUANTITY {
            return Err(OrderError::InvalidOperation(
                CommandErrorCode::InvalidQuantity,
                format!(
                    "quantity exceeds maximum allowed ({}), got {}",
                    MAX_QUANTITY, q
                ),
            ));
        }
    }

    if let Some(modifiers) = &changes.modifiers {
        for modifier in modifiers {
            require_finite(modifier.price, "modifier price")?;
            if modifier.quantity <= 0 || modifier.quantity > MAX_MODIFIER_QUANTITY {
                return Err(OrderError::InvalidOperation(
                    CommandErrorCode::InvalidQuantity,
                    format!(
                        "modifier quantity must be between 1 and {}, got {} for '{}'",
                        MAX_MODIFIER_QUANTITY, modifier.quantity, modifier.name
                    ),
                ));
            }
        }
    }

    Ok(())
}

/// Convert f64 to Decimal for calculation
///
/// Input values should be pre-validated via `require_finite()` at the
/// boundary. If NaN/Infinity somehow reaches here, logs an error and
/// returns ZERO to avoid silent data corruption.
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_else(|| {
        tracing::error!(value = ?value, "Non-finite f64 in monetary calculation, defaulting to zero");
        Decimal::ZERO
    })
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        // SAFETY: Decimal rounded to 2dp with max input ≤ 1_000_000 (validated
        // at boundary) is always within f64 representable range
        .expect("Decimal rounded to 2dp is always representable as f64")
}

/// Computed pricing for one cart line
#[derive(Debug, Clone, PartialEq)]
pub struct LinePricing {
    /// Override value if present, else variation price, else product price
    pub unit_basis: Decimal,
    /// Σ modifier.price × modifier.quantity
    pub modifiers_total: Decimal,
    /// (unit_basis + modifiers_total) × quantity
    pub line_subtotal: Decimal,
    /// Discount taken off this line
    pub discount_amount: Decimal,
    /// max(0, line_subtotal − discount_amount)
    pub line_total: Decimal,
}

/// Compute a discount amount against a base.
///
/// Percentage values are NOT clamped to ≤ 100 here: clamping is the
/// permission gate's concern, and computing a requested value faithfully
/// keeps the gate's rejection observable. Fixed amounts are capped at
/// the base.
pub fn discount_amount(discount: &Discount, base: Decimal) -> Decimal {
    match discount.kind {
        DiscountKind::Percentage => base * to_decimal(discount.value) / Decimal::ONE_HUNDRED,
        DiscountKind::FixedAmount => to_decimal(discount.value).min(base),
    }
}

/// Price a single cart line.
///
/// - `unit_basis` = price override if present, else variation price if a
///   variation is selected, else product price
/// - `line_subtotal` = (unit_basis + modifiers) × quantity
/// - `line_total` = max(0, line_subtotal − discount)
pub fn price_line(item: &CartItemSnapshot) -> LinePricing {
    let unit_basis = if let Some(override_) = &item.price_override {
        to_decimal(override_.value)
    } else if let Some(variation) = &item.variation {
        to_decimal(variation.price)
    } else {
        to_decimal(item.price)
    };

    let modifiers_total: Decimal = item
        .modifiers
        .iter()
        .map(|m| to_decimal(m.price) * Decimal::from(m.quantity))
        .sum();

    let quantity = Decimal::from(item.quantity);
    let line_subtotal = (unit_basis + modifiers_total) * quantity;

    let discount = item
        .discount
        .as_ref()
        .map(|d| discount_amount(d, line_subtotal))
        .unwrap_or(Decimal::ZERO);

    let line_total = (line_subtotal - discount).max(Decimal::ZERO);

    LinePricing {
        unit_basis,
        modifiers_total,
        line_subtotal,
        discount_amount: discount,
        line_total,
    }
}

/// Recalculate order totals from items using precise decimal arithmetic
///
/// - per-line computed fields (`unit_basis`, `modifiers_total`,
///   `line_subtotal`, `discount_amount`, `line_total`)
/// - `subtotal`: Σ line totals (each rounded at its own boundary, so the
///   stored lines always sum to the stored subtotal)
/// - `discount`: order-level discount amount, capped at the subtotal for
///   fixed discounts
/// - `tax`: (subtotal − discount) × tax_rate, never on a negative base
/// - `total`: taxable base + tax + tip
/// - `paid_amount`: Σ non-cancelled payment amounts
pub fn recalculate_totals(snapshot: &mut OrderSnapshot) {
    let mut subtotal = Decimal::ZERO;

    for item in &mut snapshot.items {
        let pricing = price_line(item);
        let line_total = pricing
            .line_total
            .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero);

        item.unit_basis = to_f64(pricing.unit_basis);
        item.modifiers_total = to_f64(pricing.modifiers_total);
        item.line_subtotal = to_f64(pricing.line_subtotal);
        item.discount_amount = to_f64(pricing.discount_amount);
        item.line_total = to_f64(line_total);

        subtotal += line_total;
    }

    let order_discount = snapshot
        .order_discount
        .as_ref()
        .map(|d| discount_amount(d, subtotal))
        .unwrap_or(Decimal::ZERO);

    let taxable_base = (subtotal - order_discount).max(Decimal::ZERO);
    let tax = taxable_base * to_decimal(snapshot.tax_rate);
    let tip = snapshot.tip.map(to_decimal).unwrap_or(Decimal::ZERO);
    let total = taxable_base + tax + tip;

    let paid: Decimal = snapshot
        .payments
        .iter()
        .filter(|p| !p.cancelled)
        .map(|p| to_decimal(p.amount))
        .sum();

    snapshot.subtotal = to_f64(subtotal);
    snapshot.discount = to_f64(order_discount);
    snapshot.tax = to_f64(tax);
    snapshot.total = to_f64(total.max(Decimal::ZERO));
    snapshot.paid_amount = to_f64(paid);
}

/// Sum payment amounts with precise arithmetic
pub fn sum_payments(payments: &[PaymentRecord]) -> f64 {
    let total: Decimal = payments
        .iter()
        .filter(|p| !p.cancelled)
        .map(|p| to_decimal(p.amount))
        .sum();

    to_f64(total)
}

/// Check if payment is sufficient (with small tolerance for edge cases)
///
/// Returns true if paid >= required - 0.01
pub fn is_payment_sufficient(paid: f64, required: f64) -> bool {
    let paid_dec = to_decimal(paid);
    let required_dec = to_decimal(required);
    paid_dec >= required_dec - MONEY_TOLERANCE
}

/// Compare two monetary values for equality (within 0.01 tolerance)
pub fn money_eq(a: f64, b: f64) -> bool {
    let diff = (to_decimal(a) - to_decimal(b)).abs();
    diff < MONEY_TOLERANCE
}
