//! Shared persistence vocabulary for the cart and order ports.
//!
//! The point of sale keeps its state in a local key-value store with a
//! single writer, so the last save wins. The keys below are the namespaces
//! every adapter must use.

use thiserror::Error;

/// Key under which the cart lines and tax rate are saved.
pub const CART_KEY: &str = "cart-storage";

/// Key under which the order history is saved.
pub const ORDERS_KEY: &str = "pos_orders";

/// Errors raised by persistence adapters.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the backing store failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored payload could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A stored payload was written by an incompatible layout.
    #[error("unsupported {key} layout version {found} (expected at most {supported})")]
    UnsupportedVersion {
        /// Storage key of the payload.
        key: &'static str,
        /// Version found in the payload.
        found: u64,
        /// Newest version this build reads.
        supported: u32,
    },
}
