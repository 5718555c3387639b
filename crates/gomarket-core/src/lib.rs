//! # gomarket-core: Pure Cart Model for the GoMarketplace Storefront
//!
//! This crate holds the cart rules as plain data and pure functions. It never
//! touches device storage; `gomarket-db` and `gomarket-cart` do that.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     GoMarketplace Cart Architecture                     │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Screens (React Native)                          │   │
//! │  │       Dashboard ──► FloatingCart ──► Cart screen               │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ use_cart()                             │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 gomarket-cart (CartStore)                       │   │
//! │  │        add_to_cart, increment, decrement, subscribe             │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ gomarket-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   cart    │  │   money   │  │ validation│  │   │
//! │  │   │ CartItem  │  │   Cart    │  │   Money   │  │   rules   │  │   │
//! │  │   │ Candidate │  │ snapshot  │  │  totals   │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │        NO I/O • NO STORAGE • NO NETWORK • PURE FUNCTIONS        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Line items and the add-to-cart candidate
//! - [`cart`] - The ordered cart and its quantity rules
//! - [`money`] - Integer-cent money and totals
//! - [`error`] - Domain error types
//! - [`validation`] - Candidate and snapshot validation
//!
//! ## Example Usage
//!
//! ```rust
//! use gomarket_core::{Cart, CartCandidate, CartChange};
//!
//! let mut cart = Cart::new();
//! let shoe = CartCandidate::new("p1", "Running shoe", "https://cdn/p1.png", 199.9);
//!
//! assert_eq!(cart.add(shoe.clone()).unwrap(), CartChange::Added);
//! assert_eq!(cart.add(shoe).unwrap(), CartChange::QuantityChanged { quantity: 2 });
//!
//! // Quantity never drops below one
//! cart.decrement("p1");
//! assert_eq!(cart.decrement("p1"), CartChange::Unchanged);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartChange};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Storage key the cart snapshot lives under.
///
/// Namespaced by app so other modules can share the same device store.
pub const DEFAULT_STORAGE_KEY: &str = "@GoMarketPlace:products";

/// Lowest quantity a line item can have while it is in the cart.
pub const MIN_ITEM_QUANTITY: u32 = 1;
