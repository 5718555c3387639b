//! # Cart
//!
//! The ordered list of line items and the three quantity rules.
//!
//! ## Operations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Cart Operations                                 │
//! │                                                                         │
//! │  add(candidate)                                                         │
//! │    ├── id already in cart ──► quantity += 1   (position unchanged)      │
//! │    └── new id ──────────────► push { ..candidate, quantity: 1 }         │
//! │                                                                         │
//! │  increment(id)                                                          │
//! │    ├── id in cart ──────────► quantity += 1                             │
//! │    └── unknown id ──────────► Unchanged (not an error)                  │
//! │                                                                         │
//! │  decrement(id)                                                          │
//! │    ├── quantity > 1 ────────► quantity -= 1                             │
//! │    ├── quantity == 1 ───────► Unchanged (floor, item is NOT removed)    │
//! │    └── unknown id ──────────► Unchanged                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Lookups are linear scans. Carts hold a handful of items and keep their
//! insertion order, so a `Vec` beats a map here.
//!
//! ## Snapshot Format
//! A cart serializes as a bare JSON array of [`CartItem`]. Decoding goes
//! through [`validate_items`], so a snapshot that breaks an invariant is
//! rejected as a whole.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{CartCandidate, CartItem, CartTotals};
use crate::validation::{validate_candidate, validate_items};
use crate::MIN_ITEM_QUANTITY;

// =============================================================================
// Cart Change
// =============================================================================

/// What a cart operation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum CartChange {
    /// A new line item was appended with quantity 1.
    Added,

    /// An existing line item now has `quantity` units.
    QuantityChanged { quantity: u32 },

    /// Nothing changed (unknown id, or decrement at the floor).
    Unchanged,
}

impl CartChange {
    /// Returns true if the cart differs from before the operation.
    #[inline]
    pub const fn is_changed(&self) -> bool {
        !matches!(self, CartChange::Unchanged)
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The shopping cart.
///
/// ## Invariants
/// - Items are unique by `id` (adding the same product bumps its quantity)
/// - Every quantity is at least 1
/// - Insertion order is preserved
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<CartItem>", into = "Vec<CartItem>")]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Creates an empty cart.
    pub fn new() -> Self {
        Cart { items: Vec::new() }
    }

    /// Builds a cart from existing items, checking the invariants.
    pub fn from_items(items: Vec<CartItem>) -> CoreResult<Self> {
        validate_items(&items)?;
        Ok(Cart { items })
    }

    /// Line items in insertion order.
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Consumes the cart, returning its items.
    pub fn into_items(self) -> Vec<CartItem> {
        self.items
    }

    /// Number of distinct line items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Looks up a line item by product id.
    pub fn get(&self, id: &str) -> Option<&CartItem> {
        self.items.iter().find(|i| i.id == id)
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|i| i.id == id)
    }

    /// Adds a product, or bumps its quantity if it is already in the cart.
    ///
    /// ## Returns
    /// - `Ok(Added)` for a new id
    /// - `Ok(QuantityChanged)` for an existing id
    /// - `Err(Validation)` if a new candidate has no id or a bad price
    ///
    /// Only new items are validated. An id already in the cart is bumped
    /// exactly like [`Cart::increment`] would.
    pub fn add(&mut self, candidate: CartCandidate) -> CoreResult<CartChange> {
        if let Some(index) = self.position(&candidate.id) {
            return self.bump(index);
        }

        validate_candidate(&candidate)?;
        self.items.push(CartItem::from_candidate(candidate));
        Ok(CartChange::Added)
    }

    /// Increases the quantity of an item by one.
    ///
    /// Unknown ids are a no-op.
    pub fn increment(&mut self, id: &str) -> CoreResult<CartChange> {
        match self.position(id) {
            Some(index) => self.bump(index),
            None => Ok(CartChange::Unchanged),
        }
    }

    /// Decreases the quantity of an item by one, never below 1.
    ///
    /// A quantity-1 item stays in the cart; there is no removal path here.
    pub fn decrement(&mut self, id: &str) -> CartChange {
        let Some(item) = self.items.iter_mut().find(|i| i.id == id) else {
            return CartChange::Unchanged;
        };

        if item.quantity <= MIN_ITEM_QUANTITY {
            return CartChange::Unchanged;
        }

        item.quantity -= 1;
        CartChange::QuantityChanged {
            quantity: item.quantity,
        }
    }

    fn bump(&mut self, index: usize) -> CoreResult<CartChange> {
        let Some(item) = self.items.get_mut(index) else {
            return Ok(CartChange::Unchanged);
        };

        item.quantity = item
            .quantity
            .checked_add(1)
            .ok_or_else(|| CoreError::QuantityOverflow {
                id: item.id.clone(),
            })?;

        Ok(CartChange::QuantityChanged {
            quantity: item.quantity,
        })
    }

    /// Sum of all quantities.
    pub fn total_quantity(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    /// Sum of line totals.
    pub fn subtotal(&self) -> Money {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Totals for display.
    pub fn totals(&self) -> CartTotals {
        CartTotals {
            item_count: u32::try_from(self.items.len()).unwrap_or(u32::MAX),
            total_quantity: self.total_quantity(),
            subtotal: self.subtotal(),
        }
    }

    // =========================================================================
    // Snapshot Encoding
    // =========================================================================

    /// Encodes the cart as the JSON array stored on the device.
    pub fn to_json(&self) -> CoreResult<String> {
        serde_json::to_string(self).map_err(|e| CoreError::Serialization(e.to_string()))
    }

    /// Decodes a stored snapshot.
    ///
    /// Fails on malformed JSON, on the wrong shape, and on any invariant
    /// violation. Callers decide what to fall back to.
    pub fn from_json(raw: &str) -> CoreResult<Self> {
        serde_json::from_str(raw).map_err(|e| CoreError::InvalidSnapshot(e.to_string()))
    }
}

impl TryFrom<Vec<CartItem>> for Cart {
    type Error = CoreError;

    fn try_from(items: Vec<CartItem>) -> Result<Self, Self::Error> {
        Cart::from_items(items)
    }
}

impl From<Cart> for Vec<CartItem> {
    fn from(cart: Cart) -> Self {
        cart.items
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;

    fn product(id: &str) -> CartCandidate {
        CartCandidate::new(id, format!("Product {}", id), format!("https://img/{}", id), 10.0)
    }

    fn quantities(cart: &Cart) -> Vec<(&str, u32)> {
        cart.items()
            .iter()
            .map(|i| (i.id.as_str(), i.quantity))
            .collect()
    }

    #[test]
    fn test_add_new_item_appends_with_quantity_one() {
        let mut cart = Cart::new();
        cart.add(product("p1")).unwrap();

        let change = cart.add(product("p2")).unwrap();

        assert_eq!(change, CartChange::Added);
        assert_eq!(cart.len(), 2);
        assert_eq!(quantities(&cart), vec![("p1", 1), ("p2", 1)]);
    }

    #[test]
    fn test_add_existing_item_bumps_quantity_in_place() {
        let mut cart = Cart::new();
        cart.add(product("p1")).unwrap();
        cart.add(product("p2")).unwrap();

        let change = cart.add(product("p1")).unwrap();

        assert_eq!(change, CartChange::QuantityChanged { quantity: 2 });
        assert_eq!(cart.len(), 2);
        assert_eq!(quantities(&cart), vec![("p1", 2), ("p2", 1)]);
    }

    #[test]
    fn test_add_rejects_invalid_candidate() {
        let mut cart = Cart::new();
        let mut bad = product("p1");
        bad.price = f64::NAN;

        let err = cart.add(bad).unwrap_err();

        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::MustBeFinite { .. })
        ));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_increment_unknown_id_is_noop() {
        let mut cart = Cart::new();
        cart.add(product("p1")).unwrap();
        let before = cart.clone();

        assert_eq!(cart.increment("nope").unwrap(), CartChange::Unchanged);
        assert_eq!(cart, before);
    }

    #[test]
    fn test_increment_overflow_is_reported() {
        let mut item = CartItem::from_candidate(product("p1"));
        item.quantity = u32::MAX;
        let mut cart = Cart::from_items(vec![item]).unwrap();

        let err = cart.increment("p1").unwrap_err();

        assert!(matches!(err, CoreError::QuantityOverflow { .. }));
        assert_eq!(cart.get("p1").unwrap().quantity, u32::MAX);
    }

    #[test]
    fn test_decrement_floors_at_one() {
        let mut cart = Cart::new();
        cart.add(product("p1")).unwrap();

        assert_eq!(cart.decrement("p1"), CartChange::Unchanged);
        assert_eq!(quantities(&cart), vec![("p1", 1)]);
    }

    #[test]
    fn test_decrement_only_touches_target() {
        let mut cart = Cart::new();
        cart.add(product("p1")).unwrap();
        cart.add(product("p2")).unwrap();
        cart.increment("p2").unwrap();
        cart.increment("p2").unwrap();

        let change = cart.decrement("p2");

        assert_eq!(change, CartChange::QuantityChanged { quantity: 2 });
        assert_eq!(quantities(&cart), vec![("p1", 1), ("p2", 2)]);
    }

    #[test]
    fn test_add_increment_decrement_walkthrough() {
        let mut cart = Cart::new();

        cart.add(product("p1")).unwrap();
        assert_eq!(quantities(&cart), vec![("p1", 1)]);
        cart.increment("p1").unwrap();
        assert_eq!(quantities(&cart), vec![("p1", 2)]);
        cart.decrement("p1");
        assert_eq!(quantities(&cart), vec![("p1", 1)]);
        cart.decrement("p1");
        assert_eq!(quantities(&cart), vec![("p1", 1)]);
    }

    #[test]
    fn test_quantities_never_drop_below_one() {
        let mut cart = Cart::new();
        let ids = ["a", "b", "c"];

        // Deterministic mix of operations over a few ids
        for step in 0..300usize {
            let id = ids[step % ids.len()];
            match (step * 7 + step / 3) % 4 {
                0 => {
                    cart.add(product(id)).unwrap();
                }
                1 => {
                    cart.increment(id).unwrap();
                }
                _ => {
                    cart.decrement(id);
                }
            }
            assert!(cart.items().iter().all(|i| i.quantity >= 1));
        }
    }

    #[test]
    fn test_totals() {
        let mut cart = Cart::new();
        cart.add(CartCandidate::new("p1", "A", "", 19.9)).unwrap();
        cart.add(CartCandidate::new("p2", "B", "", 5.0)).unwrap();
        cart.increment("p1").unwrap();
        cart.increment("p1").unwrap();

        let totals = cart.totals();

        assert_eq!(totals.item_count, 2);
        assert_eq!(totals.total_quantity, 4);
        assert_eq!(totals.subtotal.cents(), 5970 + 500);
    }

    #[test]
    fn test_snapshot_round_trip_preserves_order() {
        let mut cart = Cart::new();
        cart.add(product("p2")).unwrap();
        cart.add(product("p1")).unwrap();
        cart.increment("p2").unwrap();

        let decoded = Cart::from_json(&cart.to_json().unwrap()).unwrap();

        assert_eq!(decoded, cart);
    }

    #[test]
    fn test_snapshot_is_a_bare_array() {
        let mut cart = Cart::new();
        cart.add(product("p1")).unwrap();

        let json: serde_json::Value = serde_json::from_str(&cart.to_json().unwrap()).unwrap();

        assert!(json.is_array());
        assert_eq!(json[0]["quantity"], 1);
    }

    #[test]
    fn test_from_json_rejects_bad_snapshots() {
        assert!(Cart::from_json("not json").is_err());
        assert!(Cart::from_json(r#"{"id":"p1"}"#).is_err());
        assert!(Cart::from_json(r#"[{"id":"p1","title":"A","image_url":"","price":1,"quantity":0}]"#).is_err());
        assert!(Cart::from_json(r#"[{"id":"p1","title":"A","image_url":"","price":1,"quantity":-3}]"#).is_err());
        assert!(Cart::from_json(
            r#"[{"id":"p1","title":"A","image_url":"","price":1,"quantity":1},
                {"id":"p1","title":"A","image_url":"","price":1,"quantity":2}]"#
        )
        .is_err());
    }

    #[test]
    fn test_from_json_accepts_existing_device_snapshot() {
        let raw = r#"[{"id":"1","title":"Cadeira Rivatti","image_url":"https://img/1.png","price":1400,"quantity":2}]"#;

        let cart = Cart::from_json(raw).unwrap();

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.get("1").unwrap().quantity, 2);
        assert_eq!(cart.subtotal().cents(), 280_000);
    }

    #[test]
    fn test_long_ids_add_and_readd_like_any_other() {
        let long_id = "sku-".repeat(50);
        let raw = format!(
            r#"[{{"id":"{}","title":"A","image_url":"","price":2,"quantity":1}}]"#,
            long_id
        );
        let mut cart = Cart::from_json(&raw).unwrap();

        assert_eq!(
            cart.increment(&long_id).unwrap(),
            CartChange::QuantityChanged { quantity: 2 }
        );
        assert_eq!(
            cart.add(product(&long_id)).unwrap(),
            CartChange::QuantityChanged { quantity: 3 }
        );

        let other = "x".repeat(129);
        assert_eq!(cart.add(product(&other)).unwrap(), CartChange::Added);
        assert_eq!(cart.len(), 2);
    }

    #[test]
    fn test_readd_bumps_even_if_candidate_fields_changed() {
        let mut cart = Cart::new();
        cart.add(product("p1")).unwrap();

        let mut stale = product("p1");
        stale.price = f64::NAN;

        assert_eq!(
            cart.add(stale).unwrap(),
            CartChange::QuantityChanged { quantity: 2 }
        );
        assert_eq!(cart.get("p1").unwrap().price, 10.0);
    }
}
