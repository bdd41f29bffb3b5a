//! AddPayment command handler
//!
//! Adds a tender toward an order's total. The recorded amount is
//! `min(requested, remaining)`:
//!
//! - **Cash** may hand over more than the remaining balance; the excess
//!   comes back as change (`tendered − recorded`).
//! - **Card/cheque/gift-card** tenders cannot produce change, so a
//!   request beyond the remaining balance is rejected outright.
//! - **Gift cards** are additionally capped by the card's available
//!   balance. The card is NOT debited here - redemption happens at
//!   order completion, so an abandoned checkout never touches it.

use rust_decimal::Decimal;

use crate::orders::money::{to_decimal, to_f64, validate_payment, MONEY_TOLERANCE};
use crate::orders::traits::{CommandContext, CommandHandler, CommandMetadata, OrderError};
use shared::order::{
    CommandErrorCode, EventPayload, OrderEvent, OrderEventType, PaymentInput, TenderMethod,
};

/// AddPayment action
#[derive(Debug, Clone)]
pub struct AddPaymentAction {
    pub order_id: String,
    pub payment: PaymentInput,
    /// Available balance for the referenced gift card, if any.
    /// Injected by OrdersManager from the gift card store.
    pub gift_card_balance: Option<f64>,
}

impl CommandHandler for AddPaymentAction {
    fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<OrderEvent>, OrderError> {
        // 1. Validate payment input (finite, positive, within bounds)
        validate_payment(&self.payment)?;

        // 2. Load snapshot and check status
        let snapshot = ctx.load_snapshot(&self.order_id)?;
        super::validate_active_order(&snapshot, &self.order_id)?;

        // 3. Remaining balance at the time this tender is added
        let remaining = to_decimal(snapshot.total) - to_decimal(snapshot.paid_amount);
        if remaining <= MONEY_TOLERANCE {
            return Err(OrderError::InvalidOperation(
                CommandErrorCode::PaymentExceedsRemaining,
                "order is already settled".to_string(),
            ));
        }

        let requested = to_decimal(self.payment.amount);

        // 4. Non-cash tenders cannot exceed the remaining balance
        if self.payment.method != TenderMethod::Cash && requested > remaining + MONEY_TOLERANCE {
            return Err(OrderError::InvalidOperation(
                CommandErrorCode::PaymentExceedsRemaining,
                format!(
                    "Payment amount ({:.2}) exceeds remaining unpaid ({:.2})",
                    self.payment.amount,
                    to_f64(remaining)
                ),
            ));
        }

        // 5. Gift card balance limit
        if self.payment.method == TenderMethod::GiftCard {
            let balance = self.gift_card_balance.ok_or_else(|| {
                OrderError::InvalidOperation(
                    CommandErrorCode::GiftCardInsufficient,
                    "gift card not found or inactive".to_string(),
                )
            })?;
            if requested > to_decimal(balance) + MONEY_TOLERANCE {
                return Err(OrderError::InvalidOperation(
                    CommandErrorCode::GiftCardInsufficient,
                    format!(
                        "gift card balance {:.2} below requested {:.2}",
                        balance, self.payment.amount
                    ),
                ));
            }
        }

        // 6. Recorded amount and cash change
        let recorded = requested.min(remaining);

        let change = if self.payment.method == TenderMethod::Cash {
            let tendered = self
                .payment
                .tendered
                .map(to_decimal)
                .unwrap_or(requested);
            if tendered < recorded - MONEY_TOLERANCE {
                return Err(OrderError::InvalidOperation(
                    CommandErrorCode::InvalidAmount,
                    format!(
                        "Tendered {:.2} is less than required {:.2}",
                        to_f64(tendered),
                        to_f64(recorded)
                    ),
                ));
            }
            Some(to_f64((tendered - recorded).max(Decimal::ZERO)))
        } else {
            None
        };

        let tendered = if self.payment.method == TenderMethod::Cash {
            Some(self.payment.tendered.unwrap_or(self.payment.amount))
        } else {
            None
        };

        // 7. Create event
        let seq = ctx.next_sequence();
        let payment_id = uuid::Uuid::new_v4().to_string();

        let event = OrderEvent::new(
            seq,
            self.order_id.clone(),
            metadata.operator_id.clone(),
            metadata.operator_name.clone(),
            metadata.command_id.clone(),
            Some(metadata.timestamp),
            OrderEventType::PaymentAdded,
            EventPayload::PaymentAdded {
                payment_id,
                method: self.payment.method,
                amount: to_f64(recorded),
                tendered,
                change,
                card_number: self.payment.card_number.clone(),
                note: self.payment.note.clone(),
            },
        );

        Ok(vec![event])
    }
}
