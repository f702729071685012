use std::fmt;

use serde::{
    de::{IgnoredAny, MapAccess, Visitor},
    Deserialize, Deserializer, Serialize,
};

use crate::id::ProductId;

/// A product record as held by the store and returned to clients.
///
/// Serializes to `{"id": 1, "name": "Laptop", "price": 1200.0}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Assigned by the store on create; never changes afterwards.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Unit price. Non-negative by convention, not validated.
    pub price: f64,
}

impl Product {
    /// Builds a stored record from a payload, discarding any payload id.
    #[must_use]
    pub fn from_payload(id: ProductId, payload: ProductPayload) -> Self {
        Self { id, name: payload.name, price: payload.price }
    }
}

/// Request body accepted by create and update.
///
/// Decoding is lenient: keys match case-insensitively, a repeated key keeps
/// its last value, `null` leaves a field at its current value, missing
/// fields decode to zero values and unknown fields are ignored. `id` only
/// matters for update, where a non-zero value must match the id in the path.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProductPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<ProductId>,
    pub name: String,
    pub price: f64,
}

impl<'de> Deserialize<'de> for ProductPayload {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(PayloadVisitor)
    }
}

struct PayloadVisitor;

impl<'de> Visitor<'de> for PayloadVisitor {
    type Value = ProductPayload;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a product object")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut payload = ProductPayload::default();
        while let Some(key) = map.next_key::<String>()? {
            match key.to_lowercase().as_str() {
                "id" => {
                    if let Some(id) = map.next_value::<Option<ProductId>>()? {
                        payload.id = Some(id);
                    }
                }
                "name" => {
                    if let Some(name) = map.next_value::<Option<String>>()? {
                        payload.name = name;
                    }
                }
                "price" => {
                    if let Some(price) = map.next_value::<Option<f64>>()? {
                        payload.price = price;
                    }
                }
                _ => {
                    map.next_value::<IgnoredAny>()?;
                }
            }
        }
        Ok(payload)
    }
}

impl ProductPayload {
    /// Creates a payload without an id.
    pub fn new(name: impl Into<String>, price: f64) -> Self {
        Self { id: None, name: name.into(), price }
    }

    /// Sets the id carried in the body.
    #[must_use]
    pub fn with_id(mut self, id: ProductId) -> Self {
        self.id = Some(id);
        self
    }

    /// The body id, with an explicit zero treated the same as no id.
    #[must_use]
    pub fn supplied_id(&self) -> Option<ProductId> {
        self.id.filter(|id| !id.is_unset())
    }
}
