//! Records loaded into the store at startup.

use crate::product::ProductPayload;

/// Returns the two products every fresh catalog starts with.
///
/// Inserted in order, they receive ids 1 and 2.
#[must_use]
pub fn seed_products() -> Vec<ProductPayload> {
    vec![ProductPayload::new("Laptop", 1200.0), ProductPayload::new("Mouse", 25.0)]
}
