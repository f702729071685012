//! Axum route handlers for the catalog API.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, FromRequest, FromRequestParts, Request, State},
    http::{request::Parts, StatusCode},
    response::Response,
    routing::{get, MethodRouter},
    Router,
};
use catalog_core::{ProductId, ProductPayload, ProductStore};
use percent_encoding::percent_decode_str;
use tower_http::trace::TraceLayer;

use crate::{error::GatewayError, response};

// ── Shared state ─────────────────────────────────────────────────────────────

type Store = Arc<ProductStore>;

/// Collection path. Item paths are this prefix plus `/` and the id.
pub const COLLECTION_PATH: &str = "/products";

const ITEM_PREFIX: &str = "/products/";

// ── Extractors ───────────────────────────────────────────────────────────────

/// Product id taken from everything after `/products/` in the
/// percent-decoded request path.
///
/// Anything that is not a whole integer, including extra path segments,
/// rejects with [`GatewayError::InvalidId`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemId(pub ProductId);

impl ItemId {
    /// Parse the id out of a full, still percent-encoded request path.
    ///
    /// # Errors
    /// Returns [`GatewayError::InvalidId`] if the decoded path is not
    /// `/products/<int>`.
    pub fn from_path(path: &str) -> Result<Self, GatewayError> {
        let decoded = percent_decode_str(path)
            .decode_utf8()
            .map_err(|_| GatewayError::InvalidId(path.to_owned()))?;
        let decoded: &str = &decoded;
        let raw = decoded.strip_prefix(ITEM_PREFIX).unwrap_or(decoded);
        raw.parse::<ProductId>()
            .map(Self)
            .map_err(|_| GatewayError::InvalidId(raw.to_owned()))
    }
}

impl<S> FromRequestParts<S> for ItemId
where
    S: Send + Sync,
{
    type Rejection = GatewayError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Self::from_path(parts.uri.path())
    }
}

/// Create/update body decoded from the first JSON value in the request.
///
/// Decoding ignores the `Content-Type` header and any bytes after the first
/// value. A bare `null` decodes to an all-zero payload. An empty or malformed
/// body rejects with [`GatewayError::InvalidBody`].
#[derive(Debug, Clone, PartialEq)]
pub struct ProductBody(pub ProductPayload);

impl ProductBody {
    /// Decode the leading JSON value of `bytes` as a product payload.
    ///
    /// # Errors
    /// Returns [`GatewayError::InvalidBody`] if `bytes` is empty or does not
    /// start with a well-formed payload.
    pub fn decode(bytes: &[u8]) -> Result<Self, GatewayError> {
        let mut values =
            serde_json::Deserializer::from_slice(bytes).into_iter::<Option<ProductPayload>>();
        match values.next() {
            Some(Ok(payload)) => Ok(Self(payload.unwrap_or_default())),
            Some(Err(e)) => Err(GatewayError::InvalidBody(e.to_string())),
            None => Err(GatewayError::InvalidBody("empty body".to_owned())),
        }
    }
}

impl<S> FromRequest<S> for ProductBody
where
    S: Send + Sync,
{
    type Rejection = GatewayError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| GatewayError::InvalidBody(e.to_string()))?;
        Self::decode(&bytes)
    }
}

// ── Router ────────────────────────────────────────────────────────────────────

/// Build the application router over the given product store.
///
/// Request bodies are not size-limited.
pub fn create_router(store: Store) -> Router {
    Router::new()
        .route(
            COLLECTION_PATH,
            get(list_products)
                .head(method_not_allowed)
                .post(create_product)
                .fallback(method_not_allowed),
        )
        .route(ITEM_PREFIX, item_routes())
        .route("/products/{*id}", item_routes())
        .with_state(store)
        .layer(DefaultBodyLimit::disable())
        .layer(TraceLayer::new_for_http())
}

// An explicit HEAD route keeps axum from answering HEAD with the GET handler.
fn item_routes() -> MethodRouter<Store> {
    get(get_product)
        .head(item_method_not_allowed)
        .put(update_product)
        .delete(delete_product)
        .fallback(item_method_not_allowed)
}

// ── Handlers ──────────────────────────────────────────────────────────────────

/// `GET /products` — every stored product as a JSON array.
///
/// # Errors
/// Returns [`GatewayError::Encoding`] if the array cannot be serialized.
pub async fn list_products(State(store): State<Store>) -> Result<Response, GatewayError> {
    store.list_with(|products| response::json(StatusCode::OK, &products))
}

/// `POST /products` — store a new product under the next id.
///
/// # Errors
/// Returns [`GatewayError::InvalidBody`] if the body is not a product payload.
pub async fn create_product(
    State(store): State<Store>,
    ProductBody(payload): ProductBody,
) -> Result<Response, GatewayError> {
    let product = store.create(payload);
    response::json(StatusCode::CREATED, &product)
}

/// `GET /products/{id}` — a single product.
///
/// # Errors
/// Returns [`GatewayError::InvalidId`] for a non-integer id and
/// [`GatewayError::Store`] if the product does not exist.
pub async fn get_product(
    State(store): State<Store>,
    ItemId(id): ItemId,
) -> Result<Response, GatewayError> {
    store.get_with(id, |product| response::json(StatusCode::OK, product))?
}

/// `PUT /products/{id}` — replace a product's name and price.
///
/// # Errors
/// Returns [`GatewayError::InvalidId`] or [`GatewayError::InvalidBody`] for a
/// malformed request, and [`GatewayError::Store`] if the product does not
/// exist or the body id disagrees with the path id.
pub async fn update_product(
    State(store): State<Store>,
    ItemId(id): ItemId,
    ProductBody(payload): ProductBody,
) -> Result<Response, GatewayError> {
    let product = store.update(id, payload)?;
    response::json(StatusCode::OK, &product)
}

/// `DELETE /products/{id}` — remove a product.
///
/// # Errors
/// Returns [`GatewayError::InvalidId`] for a non-integer id and
/// [`GatewayError::Store`] if the product does not exist.
pub async fn delete_product(
    State(store): State<Store>,
    ItemId(id): ItemId,
) -> Result<StatusCode, GatewayError> {
    store.delete(id)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn method_not_allowed() -> GatewayError {
    GatewayError::MethodNotAllowed
}

// The id is validated before the method, so `PATCH /products/abc` is a 400.
async fn item_method_not_allowed(_id: ItemId) -> GatewayError {
    GatewayError::MethodNotAllowed
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use axum::{
        body::Body,
        http::{header, Method, Request, StatusCode},
    };
    use catalog_core::Product;
    use tower::ServiceExt;

    fn test_store() -> Store {
        Arc::new(ProductStore::seeded())
    }

    async fn send(app: &Router, method: Method, uri: &str, body: &str) -> (StatusCode, Bytes) {
        let req = match Request::builder().method(method).uri(uri).body(Body::from(body.to_owned())) {
            Ok(r) => r,
            Err(e) => panic!("failed to build request: {e}"),
        };
        let resp = match app.clone().oneshot(req).await {
            Ok(r) => r,
            Err(e) => panic!("handler error: {e}"),
        };
        let status = resp.status();
        let bytes = match axum::body::to_bytes(resp.into_body(), 64 * 1024).await {
            Ok(b) => b,
            Err(e) => panic!("failed to read body: {e}"),
        };
        (status, bytes)
    }

    fn parse<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> T {
        match serde_json::from_slice(bytes) {
            Ok(v) => v,
            Err(e) => panic!("invalid JSON: {e}"),
        }
    }

    #[tokio::test]
    async fn list_returns_seeded_products_as_json_array() {
        let app = create_router(test_store());
        let req = match Request::builder().uri("/products").body(Body::empty()) {
            Ok(r) => r,
            Err(e) => panic!("failed to build request: {e}"),
        };
        let resp = match app.oneshot(req).await {
            Ok(r) => r,
            Err(e) => panic!("handler error: {e}"),
        };
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get(header::CONTENT_TYPE).and_then(|v| v.to_str().ok()),
            Some("application/json")
        );
        let bytes = match axum::body::to_bytes(resp.into_body(), 64 * 1024).await {
            Ok(b) => b,
            Err(e) => panic!("failed to read body: {e}"),
        };
        let mut products: Vec<Product> = parse(&bytes);
        products.sort_by_key(|p| p.id);
        let names: Vec<_> = products.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Laptop", "Mouse"]);
    }

    #[tokio::test]
    async fn list_on_empty_store_is_empty_array() {
        let app = create_router(Arc::new(ProductStore::new()));
        let (status, body) = send(&app, Method::GET, "/products", "").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(&body[..], b"[]");
    }

    #[tokio::test]
    async fn create_returns_201_with_assigned_id() {
        let app = create_router(test_store());
        let (status, body) =
            send(&app, Method::POST, "/products", r#"{"id":77,"name":"Keyboard","price":45.0}"#).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(&body[..], br#"{"id":3,"name":"Keyboard","price":45.0}"#);
    }

    #[tokio::test]
    async fn create_accepts_body_without_content_type_and_trailing_newline() {
        let app = create_router(test_store());
        let (status, body) = send(&app, Method::POST, "/products", "{\"name\":\"Pad\",\"price\":5}\n").await;
        assert_eq!(status, StatusCode::CREATED);
        let product: Product = parse(&body);
        assert_eq!(product.id, ProductId(3));
    }

    #[tokio::test]
    async fn create_with_malformed_body_is_400_and_stores_nothing() {
        let store = test_store();
        let app = create_router(Arc::clone(&store));
        for bad in ["", "{", "[1,2]", r#"{"price":"free"}"#] {
            let (status, body) = send(&app, Method::POST, "/products", bad).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "body {bad:?}");
            assert_eq!(&body[..], b"Invalid request Body");
        }
        assert_eq!(store.len(), 2, "rejected bodies must not create products");
    }

    #[tokio::test]
    async fn get_invalid_id_is_400() {
        let app = create_router(test_store());
        for uri in ["/products/abc", "/products/", "/products/1/extra", "/products/1.5"] {
            let (status, body) = send(&app, Method::GET, uri, "").await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "uri {uri}");
            assert_eq!(&body[..], b"Invalid Product Id");
        }
    }

    #[tokio::test]
    async fn get_unknown_id_is_404() {
        let app = create_router(test_store());
        let (status, body) = send(&app, Method::GET, "/products/99", "").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(&body[..], b"Product not found");
    }

    #[tokio::test]
    async fn update_id_mismatch_is_400_and_record_unchanged() {
        let store = test_store();
        let app = create_router(Arc::clone(&store));
        let (status, body) =
            send(&app, Method::PUT, "/products/1", r#"{"id":2,"name":"Hacked","price":0}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(&body[..], b"ID in the URL and the Body do not match");
        assert_eq!(store.get(ProductId(1)).map(|p| p.name), Ok("Laptop".to_owned()));
    }

    #[tokio::test]
    async fn update_with_matching_body_id_succeeds() {
        let app = create_router(test_store());
        let (status, body) =
            send(&app, Method::PUT, "/products/2", r#"{"id":2,"name":"Trackball","price":60}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(&body[..], br#"{"id":2,"name":"Trackball","price":60.0}"#);
    }

    #[tokio::test]
    async fn update_unknown_id_is_404() {
        let app = create_router(test_store());
        let (status, _) = send(&app, Method::PUT, "/products/50", r#"{"name":"x","price":1}"#).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn update_checks_id_before_body() {
        let app = create_router(test_store());
        let (status, body) = send(&app, Method::PUT, "/products/x", "not json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(&body[..], b"Invalid Product Id");
    }

    #[tokio::test]
    async fn delete_twice_is_204_then_404() {
        let app = create_router(test_store());
        let (status, body) = send(&app, Method::DELETE, "/products/1", "").await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert!(body.is_empty(), "204 must carry no body");

        let (status, _) = send(&app, Method::DELETE, "/products/1", "").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, body) = send(&app, Method::GET, "/products", "").await;
        let products: Vec<Product> = parse(&body);
        assert!(products.iter().all(|p| p.id != ProductId(1)));
    }

    #[tokio::test]
    async fn unsupported_methods_are_405() {
        let app = create_router(test_store());
        let cases = [
            (Method::PUT, "/products"),
            (Method::DELETE, "/products"),
            (Method::PATCH, "/products"),
            (Method::HEAD, "/products"),
            (Method::HEAD, "/products/1"),
            (Method::POST, "/products/1"),
            (Method::PATCH, "/products/1"),
        ];
        for (method, uri) in cases {
            let (status, body) = send(&app, method.clone(), uri, "").await;
            assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED, "{method} {uri}");
            // HEAD responses never carry a body.
            if method != Method::HEAD {
                assert_eq!(&body[..], b"Method Not Allowed");
            }
        }
    }

    #[tokio::test]
    async fn create_accepts_null_fields_and_mixed_case_keys() {
        let app = create_router(test_store());
        let (status, body) =
            send(&app, Method::POST, "/products", r#"{"name":"Pad","price":null}"#).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(&body[..], br#"{"id":3,"name":"Pad","price":0.0}"#);

        let (status, body) = send(&app, Method::POST, "/products", "null").await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(&body[..], br#"{"id":4,"name":"","price":0.0}"#);

        let (status, body) = send(&app, Method::POST, "/products", r#"{"Name":"Pad","Price":5}"#).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(&body[..], br#"{"id":5,"name":"Pad","price":5.0}"#);

        let (status, body) =
            send(&app, Method::POST, "/products", r#"{"name":"A","name":"B","price":1}"#).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(&body[..], br#"{"id":6,"name":"B","price":1.0}"#);
    }

    #[tokio::test]
    async fn percent_encoded_id_is_decoded() {
        let app = create_router(test_store());
        let (status, body) = send(&app, Method::GET, "/products/%32", "").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(&body[..], br#"{"id":2,"name":"Mouse","price":25.0}"#);

        let (status, _) = send(&app, Method::GET, "/products/%FF", "").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn create_accepts_body_larger_than_axum_default_limit() {
        let store = test_store();
        let app = create_router(Arc::clone(&store));
        let name = "x".repeat(3 * 1024 * 1024);
        let body = format!(r#"{{"name":"{name}","price":1}}"#);
        let req = match Request::builder().method(Method::POST).uri("/products").body(Body::from(body)) {
            Ok(r) => r,
            Err(e) => panic!("failed to build request: {e}"),
        };
        let resp = match app.oneshot(req).await {
            Ok(r) => r,
            Err(e) => panic!("handler error: {e}"),
        };
        assert_eq!(resp.status(), StatusCode::CREATED);
        assert_eq!(store.get(ProductId(3)).map(|p| p.name.len()), Ok(3 * 1024 * 1024));
    }

    #[tokio::test]
    async fn unsupported_method_with_invalid_id_is_400() {
        let app = create_router(test_store());
        let (status, _) = send(&app, Method::PATCH, "/products/abc", "").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_creates_receive_unique_ids() {
        let store = test_store();
        let app = create_router(Arc::clone(&store));
        let tasks: Vec<_> = (0..50)
            .map(|i| {
                let app = app.clone();
                tokio::spawn(async move {
                    let body = format!(r#"{{"name":"item-{i}","price":{i}}}"#);
                    let (status, bytes) = send(&app, Method::POST, "/products", &body).await;
                    assert_eq!(status, StatusCode::CREATED);
                    parse::<Product>(&bytes).id
                })
            })
            .collect();

        let mut ids = HashSet::new();
        for task in tasks {
            let id = match task.await {
                Ok(id) => id,
                Err(e) => panic!("create task failed: {e}"),
            };
            assert!(ids.insert(id), "duplicate id {id}");
        }
        let expected: HashSet<_> = (3..53).map(ProductId).collect();
        assert_eq!(ids, expected);
        assert_eq!(store.len(), 52);
    }

    #[test]
    fn item_id_from_path_parses_trailing_segment() {
        assert_eq!(ItemId::from_path("/products/42").ok(), Some(ItemId(ProductId(42))));
        assert_eq!(ItemId::from_path("/products/-1").ok(), Some(ItemId(ProductId(-1))));
        assert!(matches!(ItemId::from_path("/products/4 2"), Err(GatewayError::InvalidId(_))));
        assert_eq!(ItemId::from_path("/products/%2D7").ok(), Some(ItemId(ProductId(-7))));
        assert!(matches!(ItemId::from_path("/products/1%2F2"), Err(GatewayError::InvalidId(_))));
    }

    #[test]
    fn product_body_decodes_first_value_only() {
        let body = match ProductBody::decode(br#"{"name":"A","price":1} {"name":"B"}"#) {
            Ok(b) => b,
            Err(e) => panic!("decode failed: {e}"),
        };
        assert_eq!(body.0.name, "A");
        assert!(matches!(ProductBody::decode(b"   "), Err(GatewayError::InvalidBody(_))));
        assert_eq!(ProductBody::decode(b"null").ok(), Some(ProductBody(ProductPayload::default())));
    }
}
