//! Go Marketplace Core - Shared types library.
//!
//! This crate provides the types shared by the cart components:
//! - `cart` - Cart state container and its persistence
//! - `cli` - Command-line tool for inspecting and editing a persisted cart
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access, no
//! async runtime. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Product IDs, prices, catalog products and cart line items

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
