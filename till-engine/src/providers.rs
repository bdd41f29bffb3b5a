//! External collaborator seams
//!
//! The engine owns no I/O. Stock levels, identity verification, gift
//! card balances and durable storage are all reached through these
//! traits; the host application injects real implementations and tests
//! use the in-memory ones below.

use shared::models::{GiftCard, Operator, Shift};
use shared::order::OrderSnapshot;
use std::collections::HashMap;

/// A credential presented for a second, explicit identity check
/// (manager PIN or badge swipe)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub pin: String,
}

impl Credential {
    pub fn pin(pin: impl Into<String>) -> Self {
        Self { pin: pin.into() }
    }
}

/// Product/inventory provider - read-only, never mutated by the engine
pub trait CatalogProvider {
    /// On-hand quantity for a product (or one of its variations).
    /// `None` means stock is not tracked and no ceiling applies.
    fn available_stock(&self, product_id: &str, variation_id: Option<&str>) -> Option<i32>;
}

/// Identity/role provider - a black box returning allow/deny plus an
/// identity for a credential
pub trait IdentityProvider {
    fn verify_credential(&self, credential: &Credential) -> Option<Operator>;
}

/// Gift card balance store. Balances are only debited at order
/// finalization, never while a tender sits in a pending checkout.
pub trait GiftCardStore {
    fn balance(&self, card_number: &str) -> Option<f64>;
    /// Debit a card. Called exactly once per redemption, at completion.
    fn redeem(&mut self, card_number: &str, amount: f64) -> Result<(), String>;
}

/// Durable storage for completed/voided orders. Fire-and-forget:
/// retry and durability are the repository's responsibility.
pub trait OrderRepository {
    fn store_order(&mut self, snapshot: &OrderSnapshot);
}

/// Durable storage for closed shifts. Fire-and-forget.
pub trait ShiftRepository {
    fn store_shift(&mut self, shift: &Shift);
}

// Rc<RefCell<T>> passes through, so a host (or test) can keep a handle
// to a store it also hands to the engine - the engine is single-actor,
// no locking discipline needed.
impl<T: GiftCardStore> GiftCardStore for std::rc::Rc<std::cell::RefCell<T>> {
    fn balance(&self, card_number: &str) -> Option<f64> {
        self.borrow().balance(card_number)
    }

    fn redeem(&mut self, card_number: &str, amount: f64) -> Result<(), String> {
        self.borrow_mut().redeem(card_number, amount)
    }
}

impl<T: OrderRepository> OrderRepository for std::rc::Rc<std::cell::RefCell<T>> {
    fn store_order(&mut self, snapshot: &OrderSnapshot) {
        self.borrow_mut().store_order(snapshot);
    }
}

impl<T: ShiftRepository> ShiftRepository for std::rc::Rc<std::cell::RefCell<T>> {
    fn store_shift(&mut self, shift: &Shift) {
        self.borrow_mut().store_shift(shift);
    }
}

// ============================================================================
// In-memory implementations (tests, demos)
// ============================================================================

/// Catalog with fixed stock numbers; unknown products are untracked
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    /// (product_id, variation_id) → on-hand quantity
    stock: HashMap<(String, Option<String>), i32>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_stock(&mut self, product_id: &str, variation_id: Option<&str>, quantity: i32) {
        self.stock.insert(
            (product_id.to_string(), variation_id.map(|v| v.to_string())),
            quantity,
        );
    }
}

impl CatalogProvider for InMemoryCatalog {
    fn available_stock(&self, product_id: &str, variation_id: Option<&str>) -> Option<i32> {
        self.stock
            .get(&(product_id.to_string(), variation_id.map(|v| v.to_string())))
            .copied()
    }
}

/// Fixed PIN → operator table
#[derive(Debug, Default)]
pub struct InMemoryIdentities {
    operators: HashMap<String, Operator>,
}

impl InMemoryIdentities {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, pin: &str, operator: Operator) {
        self.operators.insert(pin.to_string(), operator);
    }
}

impl IdentityProvider for InMemoryIdentities {
    fn verify_credential(&self, credential: &Credential) -> Option<Operator> {
        self.operators.get(&credential.pin).cloned()
    }
}

/// Gift card store backed by a map
#[derive(Debug, Default)]
pub struct InMemoryGiftCards {
    cards: HashMap<String, GiftCard>,
}

impl InMemoryGiftCards {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&mut self, card_number: &str, balance: f64) {
        self.cards.insert(
            card_number.to_string(),
            GiftCard {
                card_number: card_number.to_string(),
                balance,
                is_active: true,
            },
        );
    }

    pub fn card(&self, card_number: &str) -> Option<&GiftCard> {
        self.cards.get(card_number)
    }
}

impl GiftCardStore for InMemoryGiftCards {
    fn balance(&self, card_number: &str) -> Option<f64> {
        self.cards
            .get(card_number)
            .filter(|c| c.is_active)
            .map(|c| c.balance)
    }

    fn redeem(&mut self, card_number: &str, amount: f64) -> Result<(), String> {
        let card = self
            .cards
            .get_mut(card_number)
            .filter(|c| c.is_active)
            .ok_or_else(|| format!("gift card {} not found or inactive", card_number))?;
        if card.balance + 1e-9 < amount {
            return Err(format!(
                "gift card {} balance {:.2} below redemption {:.2}",
                card_number, card.balance, amount
            ));
        }
        card.balance -= amount;
        Ok(())
    }
}

/// Repository that keeps records in memory (tests inspect it)
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    pub orders: Vec<OrderSnapshot>,
    pub shifts: Vec<Shift>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl OrderRepository for InMemoryRepository {
    fn store_order(&mut self, snapshot: &OrderSnapshot) {
        self.orders.push(snapshot.clone());
    }
}

impl ShiftRepository for InMemoryRepository {
    fn store_shift(&mut self, shift: &Shift) {
        self.shifts.push(shift.clone());
    }
}

/// Catalog that tracks nothing (no stock ceilings)
#[derive(Debug, Default)]
pub struct UntrackedCatalog;

impl CatalogProvider for UntrackedCatalog {
    fn available_stock(&self, _product_id: &str, _variation_id: Option<&str>) -> Option<i32> {
        None
    }
}

/// Repository that drops everything (hosts that wire their own sink)
#[derive(Debug, Default)]
pub struct NoopRepository;

impl OrderRepository for NoopRepository {
    fn store_order(&mut self, _snapshot: &OrderSnapshot) {}
}

impl ShiftRepository for NoopRepository {
    fn store_shift(&mut self, _shift: &Shift) {}
}

/// Gift card store with no cards (gift tenders always rejected)
#[derive(Debug, Default)]
pub struct NoGiftCards;

impl GiftCardStore for NoGiftCards {
    fn balance(&self, _card_number: &str) -> Option<f64> {
        None
    }

    fn redeem(&mut self, card_number: &str, _amount: f64) -> Result<(), String> {
        Err(format!("gift card {} not found", card_number))
    }
}
