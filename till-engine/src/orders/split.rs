//! Split-check calculators
//!
//! Three independent strategies, each a pure function of the snapshot:
//!
//! - **By seat**: per-seat line totals + tax. Lines with no seat are
//!   excluded from every seat and surfaced as `unassigned_total` so the
//!   UI can deal with shared items explicitly.
//! - **Even split**: `total / n` per person. The rounding residual is
//!   reported, not silently folded into any share - whether the last
//!   payer absorbs it is the payment step's decision.
//! - **Custom subset**: Σ line totals over selected items, with no
//!   proportional tax/tip allocation.
//!
//! None of these mutate the cart; they only report partition amounts
//! for the payment step to act on.

use rust_decimal::prelude::*;
use std::collections::{BTreeMap, HashSet};

use shared::order::{CommandErrorCode, OrderSnapshot};

use super::money::{to_decimal, to_f64};
use super::traits::OrderError;

/// One seat's share of the check
#[derive(Debug, Clone, PartialEq)]
pub struct SeatShare {
    pub seat_number: i32,
    /// Σ line totals for lines assigned to this seat
    pub subtotal: f64,
    /// subtotal × order tax rate
    pub tax: f64,
    /// subtotal + tax
    pub total: f64,
}

/// Result of a by-seat split
#[derive(Debug, Clone, PartialEq)]
pub struct SeatSplit {
    /// Shares in ascending seat order
    pub shares: Vec<SeatShare>,
    /// Σ line totals of lines with no seat assignment - excluded from
    /// every share, reported so nothing silently disappears
    pub unassigned_total: f64,
}

/// Result of an even n-way split
#[derive(Debug, Clone, PartialEq)]
pub struct EvenSplit {
    pub shares: i32,
    /// Order total / n, rounded to 2 decimals
    pub per_share: f64,
    /// total − shares × per_share; up to a cent of rounding residual
    pub remainder: f64,
}

/// One selected line within a custom split
#[derive(Debug, Clone, PartialEq)]
pub struct SplitLine {
    pub instance_id: String,
    pub name: String,
    pub quantity: i32,
    pub line_total: f64,
}

/// Result of a custom item-subset split
#[derive(Debug, Clone, PartialEq)]
pub struct ItemSplit {
    pub items: Vec<SplitLine>,
    /// Σ line totals over the subset (no tax/tip allocation)
    pub subtotal: f64,
}

/// Partition the check by seat.
pub fn split_by_seat(snapshot: &OrderSnapshot) -> SeatSplit {
    let tax_rate = to_decimal(snapshot.tax_rate);
    let mut per_seat: BTreeMap<i32, Decimal> = BTreeMap::new();
    let mut unassigned = Decimal::ZERO;

    for item in &snapshot.items {
        let line_total = to_decimal(item.line_total);
        match item.seat_number {
            Some(seat) => *per_seat.entry(seat).or_insert(Decimal::ZERO) += line_total,
            None => unassigned += line_total,
        }
    }

    let shares = per_seat
        .into_iter()
        .map(|(seat_number, subtotal)| {
            let tax = subtotal * tax_rate;
            SeatShare {
                seat_number,
                subtotal: to_f64(subtotal),
                tax: to_f64(tax),
                total: to_f64(subtotal + tax),
            }
        })
        .collect();

    SeatSplit {
        shares,
        unassigned_total: to_f64(unassigned),
    }
}

/// Split the order total evenly across `n` payers (n ≥ 2).
pub fn split_even(snapshot: &OrderSnapshot, n: i32) -> Result<EvenSplit, OrderError> {
    if n < 2 {
        return Err(OrderError::InvalidOperation(
            CommandErrorCode::InvalidQuantity,
            format!("even split needs at least 2 shares, got {}", n),
        ));
    }

    let total = to_decimal(snapshot.total);
    let per_share = (total / Decimal::from(n))
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let remainder = total - per_share * Decimal::from(n);

    Ok(EvenSplit {
        shares: n,
        per_share: to_f64(per_share),
        remainder: to_f64(remainder),
    })
}

/// Sum an operator-selected subset of lines.
///
/// Duplicate selections are rejected - they would double-count amounts.
pub fn split_by_items(
    snapshot: &OrderSnapshot,
    instance_ids: &[String],
) -> Result<ItemSplit, OrderError> {
    if instance_ids.is_empty() {
        return Err(OrderError::InvalidOperation(
            CommandErrorCode::InvalidOperation,
            "no items selected".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for instance_id in instance_ids {
        if !seen.insert(instance_id) {
            return Err(OrderError::InvalidOperation(
                CommandErrorCode::InvalidOperation,
                format!("duplicate instance_id '{}' in split items", instance_id),
            ));
        }
    }

    let mut items = Vec::with_capacity(instance_ids.len());
    let mut subtotal = Decimal::ZERO;
    for instance_id in instance_ids {
        let item = snapshot
            .find_item(instance_id)
            .ok_or_else(|| OrderError::ItemNotFound(instance_id.clone()))?;
        subtotal += to_decimal(item.line_total);
        items.push(SplitLine {
            instance_id: item.instance_id.clone(),
            name: item.name.clone(),
            quantity: item.quantity,
            line_total: item.line_total,
        });
    }

    Ok(ItemSplit {
        items,
        subtotal: to_f64(subtotal),
    })
}
