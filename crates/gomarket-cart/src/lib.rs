//! # gomarket-cart: Cart State for the GoMarketplace Storefront
//!
//! The one crate the storefront screens talk to. It turns the pure cart rules
//! of `gomarket-core` into a shared, persisted, observable store.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        App start-up                                     │
//! │                                                                         │
//! │  init_tracing(&config.log_filter)                                      │
//! │  CartConfig::load(None)  ──► open_cart(&config)                         │
//! │                                   │                                     │
//! │                                   ▼                                     │
//! │          open_storage ──► CartStore::open ──► CartProvider              │
//! │                                                  │                      │
//! │   provider.scope(app).await                      │                      │
//! │        │                                         ▼                      │
//! │        ├── Dashboard:    use_cart()?.add_to_cart(product)               │
//! │        ├── FloatingCart: use_cart()?.totals()                           │
//! │        └── Cart screen:  use_cart()?.increment(id) / decrement(id)      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Structure
//! ```text
//! src/
//! ├── lib.rs           ◄─── You are here (wiring, tracing)
//! ├── context.rs       ◄─── CartProvider / use_cart()
//! ├── error.rs         ◄─── CartError, ApiError
//! └── state/
//!     ├── mod.rs
//!     ├── cart.rs      ◄─── CartStore
//!     └── config.rs    ◄─── CartConfig
//! ```

pub mod context;
pub mod error;
pub mod state;

pub use context::{use_cart, CartProvider};
pub use error::{ApiError, CartError, CartResult, ErrorCode};
pub use state::{CartConfig, CartStore, StorageBackend};

pub use gomarket_core::{
    Cart, CartCandidate, CartChange, CartItem, CartTotals, Money, DEFAULT_STORAGE_KEY,
};

use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use gomarket_db::{MemoryStorage, SqliteConfig, SqliteStorage, Storage, StorageError};

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` wins over `default_filter` when set. Calling this more than once
/// is harmless; only the first call installs a subscriber.
pub fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Opens the storage backend named in `config`.
pub async fn open_storage(config: &CartConfig) -> CartResult<Storage> {
    match &config.storage {
        StorageBackend::Memory => {
            debug!("Using in-memory cart storage");
            Ok(Storage::from(MemoryStorage::new()))
        }
        StorageBackend::Sqlite { path } => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).map_err(|e| {
                    StorageError::ConnectionFailed(format!("{}: {}", parent.display(), e))
                })?;
            }

            let storage = SqliteStorage::connect(SqliteConfig::new(path.clone())).await?;
            Ok(Storage::from(storage))
        }
    }
}

/// Opens storage and a cart store on it, wrapped in a provider.
///
/// Hydration runs in the background; mutations issued before it finishes
/// wait for it.
pub async fn open_cart(config: &CartConfig) -> CartResult<CartProvider> {
    config.validate()?;

    let storage = open_storage(config).await?;
    info!(
        backend = storage.backend_name(),
        key = %config.storage_key,
        "Opening cart"
    );

    let store = CartStore::open(storage, config.storage_key.clone())?;
    Ok(CartProvider::new(store))
}
