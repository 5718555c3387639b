//! # Domain Types
//!
//! Line-item types shared by the cart, the storage snapshot and the screens.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   add_to_cart   ┌─────────────────┐               │
//! │  │  CartCandidate  │ ──────────────► │    CartItem     │               │
//! │  │  ─────────────  │                 │  ─────────────  │               │
//! │  │  id             │                 │  id             │               │
//! │  │  title          │                 │  title          │               │
//! │  │  image_url      │                 │  image_url      │               │
//! │  │  price          │                 │  price          │               │
//! │  └─────────────────┘                 │  quantity ≥ 1   │               │
//! │                                      └─────────────────┘               │
//! │                                               │                         │
//! │                                               ▼                         │
//! │                                      ┌─────────────────┐               │
//! │                                      │   CartTotals    │               │
//! │                                      │  (derived only) │               │
//! │                                      └─────────────────┘               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Format
//! Field names are snake_case on purpose: the snapshot already stored on
//! devices looks like `{"id","title","image_url","price","quantity"}`.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::MIN_ITEM_QUANTITY;

// =============================================================================
// Cart Candidate
// =============================================================================

/// A catalog product about to be added to the cart.
///
/// Same shape as [`CartItem`] minus `quantity`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CartCandidate {
    /// Catalog product id.
    pub id: String,

    /// Display title.
    pub title: String,

    /// Product image shown in the cart list.
    pub image_url: String,

    /// Unit price in major units, as the catalog sends it.
    pub price: f64,
}

impl CartCandidate {
    /// Creates a candidate from its parts.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        image_url: impl Into<String>,
        price: f64,
    ) -> Self {
        CartCandidate {
            id: id.into(),
            title: title.into(),
            image_url: image_url.into(),
            price,
        }
    }
}

// =============================================================================
// Cart Item
// =============================================================================

/// A line in the cart.
///
/// ## Invariants
/// - `quantity` is at least [`MIN_ITEM_QUANTITY`]
/// - `id` is unique within a [`Cart`](crate::Cart)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CartItem {
    /// Catalog product id (line identity).
    pub id: String,

    /// Display title, frozen when the item was first added.
    pub title: String,

    /// Product image URL.
    pub image_url: String,

    /// Unit price in major units.
    pub price: f64,

    /// How many units are in the cart.
    pub quantity: u32,
}

impl CartItem {
    /// Creates a line item with the minimum quantity.
    pub fn from_candidate(candidate: CartCandidate) -> Self {
        CartItem {
            id: candidate.id,
            title: candidate.title,
            image_url: candidate.image_url,
            price: candidate.price,
            quantity: MIN_ITEM_QUANTITY,
        }
    }

    /// Unit price in cents.
    pub fn unit_price(&self) -> Money {
        Money::from_price(self.price)
    }

    /// Unit price × quantity.
    pub fn line_total(&self) -> Money {
        self.unit_price() * self.quantity
    }
}

// =============================================================================
// Cart Totals
// =============================================================================

/// Summary numbers shown on the floating cart and the cart screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CartTotals {
    /// Number of distinct line items.
    pub item_count: u32,

    /// Sum of all quantities.
    #[ts(type = "number")]
    pub total_quantity: u64,

    /// Sum of line totals, in cents.
    pub subtotal: Money,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_from_candidate_starts_at_one() {
        let item = CartItem::from_candidate(CartCandidate::new("p1", "Shoe", "img", 10.0));
        assert_eq!(item.quantity, 1);
        assert_eq!(item.id, "p1");
    }

    #[test]
    fn test_line_total() {
        let mut item = CartItem::from_candidate(CartCandidate::new("p1", "Shoe", "img", 19.9));
        item.quantity = 3;
        assert_eq!(item.line_total().cents(), 5970);
    }

    #[test]
    fn test_item_wire_format() {
        let item = CartItem::from_candidate(CartCandidate::new("p1", "Shoe", "https://img/1", 2.5));
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": "p1",
                "title": "Shoe",
                "image_url": "https://img/1",
                "price": 2.5,
                "quantity": 1
            })
        );
    }

    #[test]
    fn test_totals_typescript_matches_wire() {
        let decl = CartTotals::decl();
        assert!(decl.contains("total_quantity: number"), "{decl}");
        assert!(!decl.contains("bigint"), "{decl}");
        assert!(!Money::decl().contains("bigint"));

        let totals = CartTotals {
            item_count: 1,
            total_quantity: 2,
            subtotal: Money::from_cents(3980),
        };
        let json = serde_json::to_value(totals).unwrap();
        assert!(json["total_quantity"].is_number());
        assert!(json["subtotal"].is_number());
    }
}
