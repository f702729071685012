//! Fuzz target: decoding of create/update request bodies.
//!
//! Arbitrary bytes fed to the body decoder must never panic, and any body
//! that decodes must survive a store round trip with its id preserved.

#![no_main]

use catalog_core::ProductStore;
use catalog_gateway::routes::ProductBody;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(ProductBody(payload)) = ProductBody::decode(data) else {
        return;
    };
    let store = ProductStore::seeded();
    let created = store.create(payload.clone());
    assert_eq!(created.id.get(), 3);
    let updated = store.update(created.id, payload);
    if let Ok(product) = updated {
        assert_eq!(product.id, created.id);
    }
    assert!(serde_json::to_vec(&created).is_ok(), "stored products must always encode");
});
