//! Catalog products and cart line items.
//!
//! The serialized form of [`CartItem`] is the persisted cart format: a JSON
//! object with `id`, `title`, `image_url`, `price` and `quantity`. Older
//! clients wrote `imageUrl`, which is accepted when reading.

use serde::{Deserialize, Serialize};

use crate::{Price, ProductId};

/// A catalog product as shown on the listing screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    #[serde(alias = "imageUrl")]
    pub image_url: String,
    pub price: Price,
}

/// One product line in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: ProductId,
    pub title: String,
    #[serde(alias = "imageUrl")]
    pub image_url: String,
    pub price: Price,
    /// Units in the cart. Decrementing does not stop at zero.
    pub quantity: i64,
}

impl CartItem {
    /// Create a line for `product` with a quantity of one.
    #[must_use]
    pub fn first_of(product: Product) -> Self {
        Self {
            id: product.id,
            title: product.title,
            image_url: product.image_url,
            price: product.price,
            quantity: 1,
        }
    }

    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price.times(self.quantity)
    }
}

impl From<CartItem> for Product {
    fn from(item: CartItem) -> Self {
        Self {
            id: item.id,
            title: item.title,
            image_url: item.image_url,
            price: item.price,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn product() -> Product {
        Product {
            id: ProductId::parse("1").unwrap(),
            title: "Cadeira Rivatti".to_string(),
            image_url: "https://example.com/chair.png".to_string(),
            price: Price::from_cents(39_990),
        }
    }

    #[test]
    fn test_first_of_forces_quantity_one() {
        let item = CartItem::first_of(product());
        assert_eq!(item.quantity, 1);
        assert_eq!(item.id, "1");
        assert_eq!(item.line_total(), Price::from_cents(39_990));
    }

    #[test]
    fn test_serialized_field_names() {
        let item = CartItem::first_of(product());
        let value = serde_json::to_value(&item).unwrap();
        let object = value.as_object().unwrap();

        let mut keys: Vec<_> = object.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, ["id", "image_url", "price", "quantity", "title"]);
        assert!(object["price"].is_number());
    }

    #[test]
    fn test_reads_camel_case_image_url() {
        let json = r#"{"id":"7","title":"Mug","imageUrl":"mug.png","price":4.5,"quantity":3}"#;
        let item: CartItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.image_url, "mug.png");
        assert_eq!(item.quantity, 3);
        assert_eq!(item.line_total(), Price::from_cents(1350));
    }

    #[test]
    fn test_into_product_drops_quantity() {
        let mut item = CartItem::first_of(product());
        item.quantity = 9;
        assert_eq!(Product::from(item), product());
    }
}
