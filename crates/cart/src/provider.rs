//! Scoped access to the cart for UI screens.
//!
//! A [`CartProvider`] opens the cart once and hands out [`CartContext`]
//! values. Screens carry a context and call [`CartContext::use_cart`] to get
//! the [`CartStore`] handle. A context that was never populated by a
//! provider, or whose provider has been dropped, refuses with
//! [`CartError::OutsideProvider`]; that is always a wiring bug in the caller.

use std::sync::{Arc, Weak};

use crate::config::CartConfig;
use crate::error::{CartError, Result};
use crate::storage::KeyValueStorage;
use crate::store::{CartStore, CartStoreInner};

/// Owner of the cart for the lifetime of a UI tree.
#[derive(Debug)]
pub struct CartProvider {
    store: CartStore,
}

impl CartProvider {
    /// Open the configured cart slot of `storage`.
    ///
    /// Resolves after the stored cart has been restored.
    pub async fn mount(storage: Arc<dyn KeyValueStorage>, config: &CartConfig) -> Self {
        let store = CartStore::open(storage, config.storage_key.clone()).await;
        tracing::info!(key = %config.storage_key, "Cart provider mounted");
        Self { store }
    }

    /// Context to pass down to screens that need the cart.
    #[must_use]
    pub fn context(&self) -> CartContext {
        CartContext {
            store: Some(self.store.downgrade()),
        }
    }

    /// The cart owned by this provider.
    #[must_use]
    pub const fn store(&self) -> &CartStore {
        &self.store
    }
}

/// Handle screens use to reach the cart of an enclosing [`CartProvider`].
///
/// `CartContext::default()` is a context with no provider above it.
#[derive(Debug, Clone, Default)]
pub struct CartContext {
    store: Option<Weak<CartStoreInner>>,
}

impl CartContext {
    /// Get the cart of the enclosing provider.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::OutsideProvider`] if no provider populated this
    /// context or the provider has since been dropped.
    pub fn use_cart(&self) -> Result<CartStore> {
        self.store
            .as_ref()
            .and_then(Weak::upgrade)
            .map(CartStore::from_inner)
            .ok_or_else(|| {
                tracing::error!("use_cart called outside of a CartProvider");
                CartError::OutsideProvider
            })
    }
}
