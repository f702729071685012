//! HTTP gateway for the in-memory product catalog.
//!
//! Routes `/products` and `/products/{id}` to the list, get, create,
//! update and delete operations of a shared
//! [`ProductStore`](catalog_core::ProductStore).

#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]

pub mod config;
pub mod error;
pub mod response;
pub mod routes;
