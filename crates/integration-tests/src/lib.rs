//! Integration tests for Go Marketplace.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p go-marketplace-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_persistence` - Cart state across store re-opens on file storage
//! - `cart_provider` - Scoped access through providers and contexts
//!
//! The helpers below give every test its own storage file under the system
//! temp directory.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::{Path, PathBuf};

use go_marketplace_core::{Price, Product, ProductId};

/// A storage file path unique to one test, removed on drop.
pub struct TempStorage {
    dir: PathBuf,
}

impl TempStorage {
    /// Reserve a fresh directory name for a storage file.
    #[must_use]
    pub fn new() -> Self {
        Self {
            dir: std::env::temp_dir().join(format!("gm_it_{}", uuid::Uuid::new_v4())),
        }
    }

    /// Path of the storage file inside the directory.
    #[must_use]
    pub fn path(&self) -> PathBuf {
        self.dir.join("storage.json")
    }

    /// The reserved directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl Default for TempStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TempStorage {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.dir);
    }
}

/// Build a catalog product priced in cents.
///
/// # Panics
///
/// Panics if `id` is blank.
#[must_use]
#[allow(clippy::expect_used)]
pub fn product(id: &str, title: &str, cents: i64) -> Product {
    Product {
        id: ProductId::parse(id).expect("test product id must not be blank"),
        title: title.to_string(),
        image_url: format!("https://example.com/images/{id}.png"),
        price: Price::from_cents(cents),
    }
}
