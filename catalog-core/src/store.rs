//! In-memory product store.
//!
//! One `Mutex` guards both the id→product map and the next-id counter, and
//! every operation holds it for its whole duration. Reads take the same
//! exclusive lock as writes, so a list or get never interleaves with a
//! concurrent create, update or delete.

use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard},
};

use tracing::debug;

use crate::{
    error::StoreError,
    id::ProductId,
    product::{Product, ProductPayload},
    seed::seed_products,
};

#[derive(Debug)]
struct Inventory {
    products: HashMap<ProductId, Product>,
    next_id: ProductId,
}

impl Inventory {
    fn insert(&mut self, payload: ProductPayload) -> Product {
        let id = self.next_id;
        let product = Product::from_payload(id, payload);
        self.products.insert(id, product.clone());
        self.next_id = id.next();
        product
    }
}

/// Thread-safe product collection with sequential id assignment.
#[derive(Debug)]
pub struct ProductStore {
    inner: Mutex<Inventory>,
}

impl Default for ProductStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ProductStore {
    /// Create an empty store. The first created product gets id 1.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inventory {
                products: HashMap::new(),
                next_id: ProductId::FIRST,
            }),
        }
    }

    /// Create a store holding the startup seed records (ids 1 and 2).
    #[must_use]
    pub fn seeded() -> Self {
        Self::with_products(seed_products())
    }

    /// Create a store and insert `payloads` in order, as if created one by one.
    #[must_use]
    pub fn with_products(payloads: impl IntoIterator<Item = ProductPayload>) -> Self {
        let store = Self::new();
        {
            let mut inventory = store.lock();
            for payload in payloads {
                inventory.insert(payload);
            }
        }
        store
    }

    /// Number of stored products.
    ///
    /// # Panics
    /// Panics if the internal `Mutex` is poisoned.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().products.len()
    }

    /// Returns `true` if no products are stored.
    ///
    /// # Panics
    /// Panics if the internal `Mutex` is poisoned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clone out every stored product, in unspecified order.
    ///
    /// # Panics
    /// Panics if the internal `Mutex` is poisoned.
    #[must_use]
    pub fn list(&self) -> Vec<Product> {
        self.list_with(|products| products.into_iter().cloned().collect())
    }

    /// Run `f` over every stored product while the lock is held.
    ///
    /// Lets callers serialize a response without copying the records and
    /// without a mutation slipping in between the read and the encode.
    ///
    /// # Panics
    /// Panics if the internal `Mutex` is poisoned.
    pub fn list_with<R>(&self, f: impl FnOnce(Vec<&Product>) -> R) -> R {
        let inventory = self.lock();
        f(inventory.products.values().collect())
    }

    /// Clone out the product stored under `id`.
    ///
    /// # Errors
    /// Returns [`StoreError::NotFound`] if no product has that id.
    ///
    /// # Panics
    /// Panics if the internal `Mutex` is poisoned.
    pub fn get(&self, id: ProductId) -> Result<Product, StoreError> {
        self.get_with(id, Product::clone)
    }

    /// Run `f` over the product stored under `id` while the lock is held.
    ///
    /// # Errors
    /// Returns [`StoreError::NotFound`] if no product has that id.
    ///
    /// # Panics
    /// Panics if the internal `Mutex` is poisoned.
    pub fn get_with<R>(&self, id: ProductId, f: impl FnOnce(&Product) -> R) -> Result<R, StoreError> {
        let inventory = self.lock();
        inventory.products.get(&id).map(f).ok_or(StoreError::NotFound(id))
    }

    /// Store a new product under the next sequential id and return it.
    ///
    /// Any id carried by `payload` is ignored.
    ///
    /// # Panics
    /// Panics if the internal `Mutex` is poisoned.
    pub fn create(&self, payload: ProductPayload) -> Product {
        let product = self.lock().insert(payload);
        debug!(id = %product.id, name = %product.name, "product created");
        product
    }

    /// Replace the name and price of the product stored under `id`.
    ///
    /// Existence is checked before the body id, so an absent target reports
    /// `NotFound` even when the ids also disagree.
    ///
    /// # Errors
    /// Returns [`StoreError::NotFound`] if no product has that id, or
    /// [`StoreError::IdMismatch`] if the payload carries a different non-zero
    /// id. Neither error modifies the store.
    ///
    /// # Panics
    /// Panics if the internal `Mutex` is poisoned.
    pub fn update(&self, id: ProductId, payload: ProductPayload) -> Result<Product, StoreError> {
        let mut inventory = self.lock();
        let slot = inventory.products.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        if let Some(body) = payload.supplied_id() {
            if body != id {
                return Err(StoreError::IdMismatch { target: id, body });
            }
        }
        *slot = Product::from_payload(id, payload);
        debug!(id = %id, name = %slot.name, "product updated");
        Ok(slot.clone())
    }

    /// Remove the product stored under `id`.
    ///
    /// # Errors
    /// Returns [`StoreError::NotFound`] if no product has that id.
    ///
    /// # Panics
    /// Panics if the internal `Mutex` is poisoned.
    pub fn delete(&self, id: ProductId) -> Result<(), StoreError> {
        self.lock().products.remove(&id).ok_or(StoreError::NotFound(id))?;
        debug!(id = %id, "product deleted");
        Ok(())
    }

    #[expect(clippy::expect_used, reason = "lock poisoning is unrecoverable")]
    fn lock(&self) -> MutexGuard<'_, Inventory> {
        self.inner.lock().expect("product store lock poisoned")
    }
}
