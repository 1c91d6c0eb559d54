//! Cart commands.
//!
//! Each invocation opens the file-backed cart, applies one operation and
//! exits. The storage file may be shared with other tools using the same
//! storage layout; only the configured cart key is touched.

use std::fmt::Write as _;
use std::sync::Arc;

use go_marketplace_cart::{
    CartConfig, CartError, CartProvider, CartStore, CartSummary, FileStorage, StorageError,
};
use go_marketplace_core::{CartItem, Product, ProductId};
use thiserror::Error;

/// Errors that can occur while running a cart command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The storage file could not be opened.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// A cart operation failed.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// The product is not in the cart.
    #[error("Product not in cart: {0}")]
    NotInCart(ProductId),
}

/// Open the cart described by `config`.
///
/// # Errors
///
/// Returns an error if the storage file cannot be read.
pub async fn open(config: &CartConfig) -> Result<CartStore, CommandError> {
    tracing::debug!(path = %config.storage_path.display(), "Opening cart storage");
    let storage = FileStorage::open(&config.storage_path).await?;
    let provider = CartProvider::mount(Arc::new(storage), config).await;
    Ok(provider.context().use_cart()?)
}

/// Print every cart line.
pub async fn list(cart: &CartStore) {
    let output = render_lines(&cart.products().await);

    #[allow(clippy::print_stdout)]
    {
        print!("{output}");
    }
}

/// Add `product` and print the resulting line.
///
/// # Errors
///
/// Returns an error if the cart cannot be saved.
pub async fn add(cart: &CartStore, product: Product) -> Result<(), CommandError> {
    let item = cart.add_to_cart(product).await?;
    print_line(&item);
    Ok(())
}

/// Increment the line for `id` and print it.
///
/// # Errors
///
/// Returns an error if `id` is not in the cart or the cart cannot be saved.
pub async fn increment(cart: &CartStore, id: &ProductId) -> Result<(), CommandError> {
    let item = cart
        .increment(id)
        .await?
        .ok_or_else(|| CommandError::NotInCart(id.clone()))?;
    print_line(&item);
    Ok(())
}

/// Decrement the line for `id` and print it.
///
/// # Errors
///
/// Returns an error if `id` is not in the cart or the cart cannot be saved.
pub async fn decrement(cart: &CartStore, id: &ProductId) -> Result<(), CommandError> {
    let item = cart
        .decrement(id)
        .await?
        .ok_or_else(|| CommandError::NotInCart(id.clone()))?;
    print_line(&item);
    Ok(())
}

/// Print item count and subtotal.
pub async fn summary(cart: &CartStore) {
    let output = render_summary(&cart.summary().await);

    #[allow(clippy::print_stdout)]
    {
        println!("{output}");
    }
}

fn print_line(item: &CartItem) {
    let output = render_lines(std::slice::from_ref(item));

    #[allow(clippy::print_stdout)]
    {
        print!("{output}");
    }
}

/// One tab-separated row per line: id, title, quantity, unit price, line total.
fn render_lines(items: &[CartItem]) -> String {
    if items.is_empty() {
        return "Cart is empty\n".to_string();
    }

    items.iter().fold(String::new(), |mut out, item| {
        let _ = writeln!(
            out,
            "{}\t{}\t{} x {}\t{}",
            item.id,
            item.title,
            item.quantity,
            item.price,
            item.line_total()
        );
        out
    })
}

fn render_summary(summary: &CartSummary) -> String {
    format!("{} items\tsubtotal {}", summary.item_count, summary.subtotal)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use go_marketplace_core::Price;

    use super::*;

    fn item(id: &str, quantity: i64, cents: i64) -> CartItem {
        CartItem {
            id: ProductId::parse(id).unwrap(),
            title: format!("Product {id}"),
            image_url: String::new(),
            price: Price::from_cents(cents),
            quantity,
        }
    }

    #[test]
    fn test_render_empty_cart() {
        assert_eq!(render_lines(&[]), "Cart is empty\n");
    }

    #[test]
    fn test_render_lines() {
        let output = render_lines(&[item("1", 2, 1999), item("2", 0, 500)]);
        assert_eq!(
            output,
            "1\tProduct 1\t2 x $19.99\t$39.98\n2\tProduct 2\t0 x $5.00\t$0.00\n"
        );
    }

    #[test]
    fn test_render_summary() {
        let summary = CartSummary {
            item_count: 3,
            subtotal: Price::from_cents(4498),
        };
        assert_eq!(render_summary(&summary), "3 items\tsubtotal $44.98");
    }

    #[test]
    fn test_not_in_cart_message() {
        let err = CommandError::NotInCart(ProductId::parse("9").unwrap());
        assert_eq!(err.to_string(), "Product not in cart: 9");
    }
}
