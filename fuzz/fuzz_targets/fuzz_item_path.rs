//! Fuzz target: product id extraction from request paths.
//!
//! Any path either yields an id or an `InvalidId` rejection; never a panic.

#![no_main]

use catalog_gateway::{error::GatewayError, routes::ItemId};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(segment) = std::str::from_utf8(data) else {
        return;
    };
    let path = format!("/products/{segment}");
    match ItemId::from_path(&path) {
        Ok(ItemId(id)) => assert_eq!(id.to_string().parse::<i64>().ok(), Some(id.get())),
        Err(GatewayError::InvalidId(_)) => {}
        Err(other) => panic!("unexpected rejection: {other}"),
    }
});
