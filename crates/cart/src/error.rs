//! Cart error types.

use thiserror::Error;

use crate::storage::StorageError;

/// Errors surfaced by cart operations.
///
/// Restore failures never appear here: a cart that cannot be read back is
/// logged and started empty.
#[derive(Debug, Error)]
pub enum CartError {
    /// The cart was used through a context that no provider populated.
    #[error("cart accessed outside of a CartProvider")]
    OutsideProvider,

    /// Writing the cart to storage failed. The in-memory change is kept.
    #[error("failed to persist cart: {0}")]
    Storage(#[from] StorageError),

    /// The cart could not be serialized for storage.
    #[error("failed to encode cart: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Result type alias for `CartError`.
pub type Result<T> = std::result::Result<T, CartError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_error_display() {
        assert_eq!(
            CartError::OutsideProvider.to_string(),
            "cart accessed outside of a CartProvider"
        );

        let err = CartError::from(StorageError::Io {
            path: "cart.json".into(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        });
        assert_eq!(
            err.to_string(),
            "failed to persist cart: storage I/O error on cart.json: denied"
        );
    }
}
