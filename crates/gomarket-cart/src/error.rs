//! Cart error types.

use gomarket_storage::StoreError;
use thiserror::Error;

/// Errors that can occur while persisting or restoring the cart.
#[derive(Error, Debug)]
pub enum CartError {
    /// The key-value store rejected a read or write.
    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),

    /// The cart snapshot could not be encoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
