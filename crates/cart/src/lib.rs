//! Go Marketplace Cart - persistent shopping-cart state.
//!
//! Holds the cart line items in memory and mirrors them to one slot of a
//! durable key-value storage after every change.
//!
//! # Usage
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use go_marketplace_cart::{CartConfig, CartProvider, FileStorage};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = CartConfig::from_env()?;
//! let storage = FileStorage::open(&config.storage_path).await?;
//! let provider = CartProvider::mount(Arc::new(storage), &config).await;
//!
//! // Hand `context` to whatever needs the cart.
//! let context = provider.context();
//! let cart = context.use_cart()?;
//! cart.increment("1").await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`store`] - The cart itself
//! - [`provider`] - Scoped access for UI screens
//! - [`storage`] - Key-value storage backends
//! - [`config`] - Environment configuration

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod provider;
pub mod storage;
pub mod store;

pub use config::{CartConfig, ConfigError};
pub use error::CartError;
pub use provider::{CartContext, CartProvider};
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage, StorageError};
pub use store::{CartStore, CartSummary};
