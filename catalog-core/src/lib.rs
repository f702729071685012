//! Core types for the catalog service.
//!
//! Defines the product record, the request payload, and the in-memory
//! [`ProductStore`] that owns every product and assigns ids.

#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]

pub mod error;
pub mod id;
pub mod product;
pub mod seed;
pub mod store;

pub use error::StoreError;
pub use id::ProductId;
pub use product::{Product, ProductPayload};
pub use seed::seed_products;
pub use store::ProductStore;
