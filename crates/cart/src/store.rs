//! The cart state container.
//!
//! [`CartStore`] owns the ordered list of cart items, mirrors it to a single
//! slot of a [`KeyValueStorage`] after every change, and restores it from that
//! slot once when opened.
//!
//! # Consistency
//!
//! Every mutation holds the store's lock from the in-memory change until the
//! storage write returns, and writes exactly the list it just produced. The
//! stored copy therefore always matches the in-memory copy once an operation
//! has resolved, and writes reach storage in the order mutations happened.
//! A failed write is returned to the caller but the in-memory change stays.

use std::fmt;
use std::sync::{Arc, Weak};

use go_marketplace_core::{CartItem, Price, Product};
use tokio::sync::Mutex;
use tracing::instrument;

use crate::error::Result;
use crate::storage::KeyValueStorage;

/// Shared handle to the cart.
///
/// Cheap to clone; all clones operate on the same cart.
#[derive(Clone)]
pub struct CartStore {
    inner: Arc<CartStoreInner>,
}

pub(crate) struct CartStoreInner {
    storage: Arc<dyn KeyValueStorage>,
    key: String,
    products: Mutex<Vec<CartItem>>,
}

/// Totals shown at the bottom of the cart screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartSummary {
    /// Sum of all line quantities.
    pub item_count: i64,
    /// Sum of unit price times quantity over all lines.
    pub subtotal: Price,
}

impl CartStore {
    /// Open the cart stored under `key`.
    ///
    /// Resolves once the previous cart has been restored, so no caller can
    /// observe the cart before its stored contents are loaded. A missing or
    /// empty slot gives an empty cart. A slot that cannot be read or parsed
    /// is logged and also gives an empty cart; it is overwritten by the next
    /// mutation.
    pub async fn open(storage: Arc<dyn KeyValueStorage>, key: impl Into<String>) -> Self {
        let key = key.into();
        let products = restore(storage.as_ref(), &key).await;

        Self {
            inner: Arc::new(CartStoreInner {
                storage,
                key,
                products: Mutex::new(products),
            }),
        }
    }

    /// Key of the storage slot backing this cart.
    #[must_use]
    pub fn storage_key(&self) -> &str {
        &self.inner.key
    }

    /// Snapshot of the cart in insertion order.
    pub async fn products(&self) -> Vec<CartItem> {
        self.inner.products.lock().await.clone()
    }

    /// Item count and subtotal of the current cart.
    pub async fn summary(&self) -> CartSummary {
        let products = self.inner.products.lock().await;
        CartSummary {
            item_count: products
                .iter()
                .fold(0_i64, |count, item| count.saturating_add(item.quantity)),
            subtotal: products.iter().map(CartItem::line_total).sum(),
        }
    }

    /// Add a product to the cart.
    ///
    /// A product already in the cart has its quantity incremented, exactly as
    /// [`increment`](Self::increment) would. Otherwise a new line with
    /// quantity one is appended; any quantity carried by `product` is ignored.
    /// Returns the resulting line.
    ///
    /// # Errors
    ///
    /// Returns an error if the updated cart cannot be persisted. The cart
    /// keeps the change.
    #[instrument(skip_all)]
    pub async fn add_to_cart(&self, product: impl Into<Product>) -> Result<CartItem> {
        let product = product.into();
        let mut products = self.inner.products.lock().await;

        let item = if let Some(item) = adjust(&mut products, product.id.as_str(), 1) {
            item
        } else {
            let item = CartItem::first_of(product);
            products.push(item.clone());
            tracing::info!(product_id = %item.id, lines = products.len(), "Added product to cart");
            item
        };

        self.persist(&products).await?;
        Ok(item)
    }

    /// Increase the quantity of the line for `id` by one.
    ///
    /// Returns `None` without touching storage if `id` is not in the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the updated cart cannot be persisted. The cart
    /// keeps the change.
    pub async fn increment(&self, id: impl AsRef<str>) -> Result<Option<CartItem>> {
        self.adjust_and_persist(id.as_ref(), 1).await
    }

    /// Decrease the quantity of the line for `id` by one.
    ///
    /// The quantity is not floored and the line is never removed, so it can
    /// reach zero or go negative. Returns `None` without touching storage if
    /// `id` is not in the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the updated cart cannot be persisted. The cart
    /// keeps the change.
    pub async fn decrement(&self, id: impl AsRef<str>) -> Result<Option<CartItem>> {
        self.adjust_and_persist(id.as_ref(), -1).await
    }

    #[instrument(skip(self))]
    async fn adjust_and_persist(&self, id: &str, delta: i64) -> Result<Option<CartItem>> {
        let mut products = self.inner.products.lock().await;

        let Some(item) = adjust(&mut products, id, delta) else {
            tracing::debug!("Product not in cart, nothing to do");
            return Ok(None);
        };

        self.persist(&products).await?;
        Ok(Some(item))
    }

    /// Write `snapshot` to the cart slot.
    async fn persist(&self, snapshot: &[CartItem]) -> Result<()> {
        let data = serde_json::to_string(snapshot)?;

        if let Err(e) = self.inner.storage.set_item(&self.inner.key, data).await {
            tracing::warn!(key = %self.inner.key, error = %e, "Failed to persist cart");
            return Err(e.into());
        }

        tracing::debug!(key = %self.inner.key, lines = snapshot.len(), "Persisted cart");
        Ok(())
    }

    pub(crate) fn downgrade(&self) -> Weak<CartStoreInner> {
        Arc::downgrade(&self.inner)
    }

    pub(crate) const fn from_inner(inner: Arc<CartStoreInner>) -> Self {
        Self { inner }
    }
}

impl fmt::Debug for CartStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartStore")
            .field("key", &self.inner.key)
            .finish_non_exhaustive()
    }
}

/// Apply `delta` to the quantity of the first line matching `id`.
fn adjust(products: &mut [CartItem], id: &str, delta: i64) -> Option<CartItem> {
    let item = products.iter_mut().find(|item| item.id == id)?;
    item.quantity = item.quantity.saturating_add(delta);
    tracing::info!(product_id = %item.id, quantity = item.quantity, "Updated cart quantity");
    Some(item.clone())
}

/// Load the stored cart, falling back to empty on any failure.
///
/// Individual lines that do not parse are logged and left out.
async fn restore(storage: &dyn KeyValueStorage, key: &str) -> Vec<CartItem> {
    let data = match storage.get_item(key).await {
        Ok(Some(data)) if !data.trim().is_empty() => data,
        Ok(_) => {
            tracing::debug!(key, "No stored cart, starting empty");
            return Vec::new();
        }
        Err(e) => {
            tracing::warn!(key, error = %e, "Failed to read stored cart, starting empty");
            return Vec::new();
        }
    };

    let lines = match serde_json::from_str::<Option<Vec<serde_json::Value>>>(&data) {
        Ok(lines) => lines.unwrap_or_default(),
        Err(e) => {
            tracing::warn!(key, error = %e, "Stored cart is malformed, starting empty");
            return Vec::new();
        }
    };

    // Lines that fail to parse are skipped one at a time.
    let products: Vec<CartItem> = lines
        .into_iter()
        .enumerate()
        .filter_map(|(index, line)| match serde_json::from_value(line) {
            Ok(item) => Some(item),
            Err(e) => {
                tracing::warn!(key, index, error = %e, "Skipping unreadable cart line");
                None
            }
        })
        .collect();

    tracing::debug!(key, lines = products.len(), "Restored cart");
    products
}
