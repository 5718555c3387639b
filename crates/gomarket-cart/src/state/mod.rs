//! # State Module
//!
//! Long-lived state owned by the cart layer.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────────────────────┐   ┌──────────────────────────────┐   │
//! │  │         CartStore            │   │         CartConfig           │   │
//! │  │                              │   │                              │   │
//! │  │  Mutex<Cart>   (writes)      │   │  storage backend             │   │
//! │  │  watch<Cart>   (readers)     │   │  storage key                 │   │
//! │  │  Storage       (device)      │   │  log filter, currency        │   │
//! │  └──────────────────────────────┘   └──────────────────────────────┘   │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • CartStore: one writer at a time, readers never block                │
//! │  • CartConfig: read-only after load                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod cart;
mod config;

pub use cart::CartStore;
pub use config::{CartConfig, StorageBackend};
