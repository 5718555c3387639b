//! # Cart Error Types
//!
//! [`CartError`] is what every cart operation returns. [`ApiError`] is the
//! serializable form the screens receive, with a machine-readable code.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Cart                               │
//! │                                                                         │
//! │  Screen                        Rust                                     │
//! │  ──────                        ────                                     │
//! │                                                                         │
//! │  cart.increment("p1")                                                   │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Outside a CartProvider? ── OutsideProvider ──────────┐          │  │
//! │  │         │                   (usage error, fix code)   │          │  │
//! │  │         ▼                                             ▼          │  │
//! │  │  Write failed? ──────────── Storage(..) ──────────► ApiError ───►│  │
//! │  │         │                   (cart unchanged)                     │  │
//! │  │         ▼                                                        │  │
//! │  │  Unknown id? ────────────── Ok(Unchanged)  (not an error)        │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  { code: "STORAGE_ERROR", message: "Could not save your cart" }         │
//! │  → toast with a retry button                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use thiserror::Error;

use gomarket_core::CoreError;
use gomarket_db::StorageError;

// =============================================================================
// Cart Error
// =============================================================================

/// Errors returned by cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// `use_cart()` was called with no active [`CartProvider`](crate::CartProvider) scope.
    ///
    /// A wiring bug in the calling code, never a data problem.
    #[error("use_cart() must be called inside a CartProvider scope")]
    OutsideProvider,

    /// A store was opened outside a Tokio runtime, so hydration cannot start.
    #[error("CartStore::open must be called from within a Tokio runtime")]
    NoRuntime,

    /// A cart rule rejected the operation.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Device storage failed; the in-memory cart was left unchanged.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration could not be loaded or is invalid.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl CartError {
    /// Returns true for errors caused by how the cart API is used.
    pub fn is_usage_error(&self) -> bool {
        matches!(self, CartError::OutsideProvider | CartError::NoRuntime)
    }
}

/// Result type for cart operations.
pub type CartResult<T> = Result<T, CartError>;

// =============================================================================
// API Error
// =============================================================================

/// Error shape handed to the screens.
///
/// ```json
/// {
///   "code": "STORAGE_ERROR",
///   "message": "Could not save your cart. Please try again."
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Human-readable message
    pub message: String,
}

/// Error codes for the screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Cart API used outside its provider, or without a runtime
    UsageError,

    /// Bad add-to-cart input
    ValidationError,

    /// Cart rule violation (overflow, bad snapshot)
    CartError,

    /// Device storage failed
    StorageError,

    /// Configuration problem
    ConfigError,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Whether retrying the same operation might succeed.
    pub fn is_retryable(&self) -> bool {
        self.code == ErrorCode::StorageError
    }
}

impl From<CartError> for ApiError {
    fn from(err: CartError) -> Self {
        match err {
            CartError::OutsideProvider | CartError::NoRuntime => {
                ApiError::new(ErrorCode::UsageError, err.to_string())
            }
            CartError::Core(CoreError::Validation(e)) => {
                ApiError::new(ErrorCode::ValidationError, e.to_string())
            }
            CartError::Core(e) => ApiError::new(ErrorCode::CartError, e.to_string()),
            CartError::Storage(e) => {
                // Log the actual error but return a friendly message
                tracing::error!("Cart storage failed: {}", e);
                ApiError::new(
                    ErrorCode::StorageError,
                    "Could not save your cart. Please try again.",
                )
            }
            CartError::Config(message) => ApiError::new(ErrorCode::ConfigError, message),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}
