//! # Cart Provider
//!
//! Screens never hold a `CartStore` directly. The app root wraps its work in
//! a [`CartProvider`] scope, and anything running inside that scope reaches
//! the cart through [`use_cart`].
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  provider.scope(async {                                                 │
//! │      ┌──────────────────────────────────────────────────────────────┐  │
//! │      │  let cart = use_cart()?;      ──► Ok(CartStore)               │  │
//! │      │  cart.increment("p1").await?;                                 │  │
//! │      └──────────────────────────────────────────────────────────────┘  │
//! │  }).await                                                               │
//! │                                                                         │
//! │  use_cart()  (no scope)          ──► Err(CartError::OutsideProvider)   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The scope is task-local. A task started with `tokio::spawn` from inside a
//! scope does not inherit it; wrap the spawned future in
//! [`CartProvider::scope`] again.

use std::future::Future;

use tracing::error;

use crate::error::{CartError, CartResult};
use crate::state::CartStore;

tokio::task_local! {
    static CURRENT_CART: CartStore;
}

/// Makes one [`CartStore`] available to everything running in its scope.
#[derive(Debug, Clone)]
pub struct CartProvider {
    store: CartStore,
}

impl CartProvider {
    pub fn new(store: CartStore) -> Self {
        CartProvider { store }
    }

    /// The store this provider hands out.
    pub fn store(&self) -> &CartStore {
        &self.store
    }

    /// Runs `future` with this provider's cart in scope.
    pub async fn scope<F>(&self, future: F) -> F::Output
    where
        F: Future,
    {
        CURRENT_CART.scope(self.store.clone(), future).await
    }

    /// Runs a synchronous closure with this provider's cart in scope.
    pub fn sync_scope<F, R>(&self, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        CURRENT_CART.sync_scope(self.store.clone(), f)
    }
}

/// Returns the cart of the enclosing [`CartProvider`] scope.
///
/// ## Errors
/// [`CartError::OutsideProvider`] when no provider scope is active. That is
/// a wiring mistake in the caller and is logged at error level.
pub fn use_cart() -> CartResult<CartStore> {
    CURRENT_CART.try_with(CartStore::clone).map_err(|_| {
        error!("use_cart() called outside of a CartProvider scope");
        CartError::OutsideProvider
    })
}
