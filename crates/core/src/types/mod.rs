//! Core types for Go Marketplace.
//!
//! This module provides type-safe wrappers for the cart domain.

pub mod id;
pub mod item;
pub mod price;

pub use id::{ProductId, ProductIdError};
pub use item::{CartItem, Product};
pub use price::{Price, PriceError};
