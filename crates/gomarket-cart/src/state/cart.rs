//! # Cart Store
//!
//! The authoritative in-memory cart, mirrored to device storage.
//!
//! ## Mutation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    One Cart Mutation                                    │
//! │                                                                         │
//! │  increment("p1")                                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  wait for hydration ──► lock cart (held until the end)                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  next = cart.clone(); next.increment("p1")                              │
//! │       │                                                                 │
//! │       ├── Unchanged ──────────────────────────► return, no write        │
//! │       ▼                                                                 │
//! │  storage.set(key, next.to_json())                                       │
//! │       │                                                                 │
//! │       ├── Err ──► log, return Err, cart + subscribers untouched         │
//! │       ▼                                                                 │
//! │  *cart = next; publish(next) ──► subscribers see the new cart           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Thread Safety
//! The cart sits behind a Tokio `Mutex` that is held across the storage
//! write. Overlapping calls queue up instead of each computing from the
//! same stale snapshot, so no update is ever lost.

use std::fmt;
use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::{watch, Mutex};
use tracing::{debug, error, info, warn};

use gomarket_core::{Cart, CartCandidate, CartChange, CartTotals, CoreResult};
use gomarket_db::{KeyValueStorage, Storage};

use crate::error::{CartError, CartResult};

struct Inner<S> {
    storage: S,
    key: String,
    cart: Mutex<Cart>,
    published: watch::Sender<Cart>,
    hydrated: watch::Sender<bool>,
}

/// Cart state shared by every screen.
///
/// Cloning is cheap: clones are handles to the same store.
///
/// ## Usage
/// ```rust,ignore
/// let store = CartStore::open(storage, DEFAULT_STORAGE_KEY)?;
/// store.add_to_cart(CartCandidate::new("p1", "Shoe", url, 199.9)).await?;
/// store.increment("p1").await?;
/// let products = store.products();
/// ```
pub struct CartStore<S = Storage> {
    inner: Arc<Inner<S>>,
}

impl<S> Clone for CartStore<S> {
    fn clone(&self) -> Self {
        CartStore {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S> fmt::Debug for CartStore<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartStore")
            .field("key", &self.inner.key)
            .field("items", &self.inner.published.borrow().len())
            .field("hydrated", &*self.inner.hydrated.borrow())
            .finish()
    }
}

impl<S: KeyValueStorage + 'static> CartStore<S> {
    fn unhydrated(storage: S, key: String) -> Self {
        let (published, _) = watch::channel(Cart::new());
        let (hydrated, _) = watch::channel(false);

        CartStore {
            inner: Arc::new(Inner {
                storage,
                key,
                cart: Mutex::new(Cart::new()),
                published,
                hydrated,
            }),
        }
    }

    /// Creates a store and starts hydrating it in the background.
    ///
    /// Returns immediately with an empty cart. Mutations issued before
    /// hydration finishes wait for it, so they always apply on top of the
    /// persisted cart.
    ///
    /// ## Errors
    /// `CartError::NoRuntime` if called outside a Tokio runtime.
    pub fn open(storage: S, key: impl Into<String>) -> CartResult<Self> {
        let runtime = Handle::try_current().map_err(|_| CartError::NoRuntime)?;
        let store = Self::unhydrated(storage, key.into());

        let hydrating = store.clone();
        runtime.spawn(async move {
            hydrating.hydrate().await;
        });

        Ok(store)
    }

    /// Creates a store and hydrates it before returning.
    pub async fn load(storage: S, key: impl Into<String>) -> Self {
        let store = Self::unhydrated(storage, key.into());
        store.hydrate().await;
        store
    }

    // =========================================================================
    // Hydration
    // =========================================================================

    async fn hydrate(&self) {
        let loaded = self.read_snapshot().await;

        {
            let mut cart = self.inner.cart.lock().await;
            *cart = loaded.clone();
        }

        info!(
            key = %self.inner.key,
            items = loaded.len(),
            "Cart hydrated"
        );
        self.inner.published.send_replace(loaded);
        self.inner.hydrated.send_replace(true);
    }

    /// Reads the persisted cart, falling back to empty on any problem.
    async fn read_snapshot(&self) -> Cart {
        let raw = match self.inner.storage.get(&self.inner.key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(key = %self.inner.key, "No stored cart");
                return Cart::new();
            }
            Err(err) => {
                error!(key = %self.inner.key, error = %err, "Failed to read stored cart");
                return Cart::new();
            }
        };

        match Cart::from_json(&raw) {
            Ok(cart) => cart,
            Err(err) => {
                warn!(
                    key = %self.inner.key,
                    bytes = raw.len(),
                    error = %err,
                    "Discarding malformed cart snapshot"
                );
                Cart::new()
            }
        }
    }

    /// Waits until the persisted cart has been loaded.
    pub async fn ready(&self) {
        let mut hydrated = self.inner.hydrated.subscribe();
        // The sender lives as long as the store, so this only ends on `true`
        let _ = hydrated.wait_for(|done| *done).await;
    }

    /// Checks if hydration has finished.
    pub fn is_ready(&self) -> bool {
        *self.inner.hydrated.borrow()
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Adds a product, or bumps its quantity if it is already in the cart.
    pub async fn add_to_cart(&self, candidate: CartCandidate) -> CartResult<CartChange> {
        let id = candidate.id.clone();
        self.commit("add_to_cart", &id, |cart| cart.add(candidate)).await
    }

    /// Increases an item's quantity by one. Unknown ids are a no-op.
    pub async fn increment(&self, id: &str) -> CartResult<CartChange> {
        self.commit("increment", id, |cart| cart.increment(id)).await
    }

    /// Decreases an item's quantity by one, never below 1. Unknown ids are a no-op.
    pub async fn decrement(&self, id: &str) -> CartResult<CartChange> {
        self.commit("decrement", id, |cart| Ok(cart.decrement(id))).await
    }

    /// Applies `apply` to a copy of the cart, persists it, then commits it.
    async fn commit<F>(&self, op: &'static str, id: &str, apply: F) -> CartResult<CartChange>
    where
        F: FnOnce(&mut Cart) -> CoreResult<CartChange>,
    {
        self.ready().await;
        let mut cart = self.inner.cart.lock().await;

        let mut next = cart.clone();
        let change = apply(&mut next)?;

        if !change.is_changed() {
            debug!(op, id, "Cart unchanged");
            return Ok(change);
        }

        let payload = next.to_json()?;
        if let Err(err) = self.inner.storage.set(&self.inner.key, &payload).await {
            error!(op, id, error = %err, "Failed to persist cart, keeping previous state");
            return Err(err.into());
        }

        *cart = next.clone();
        self.inner.published.send_replace(next);

        debug!(op, id, ?change, "Cart updated");
        Ok(change)
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// The current committed cart.
    pub fn products(&self) -> Cart {
        self.inner.published.borrow().clone()
    }

    /// Totals of the current committed cart.
    pub fn totals(&self) -> CartTotals {
        self.inner.published.borrow().totals()
    }

    /// Subscribes to committed carts.
    ///
    /// The receiver always holds the latest cart; intermediate carts may be
    /// skipped by slow readers.
    pub fn subscribe(&self) -> watch::Receiver<Cart> {
        self.inner.published.subscribe()
    }

    /// Storage key the cart is persisted under.
    pub fn storage_key(&self) -> &str {
        &self.inner.key
    }

    /// The storage backend.
    pub fn storage(&self) -> &S {
        &self.inner.storage
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
