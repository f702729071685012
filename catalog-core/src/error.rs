use crate::id::ProductId;

/// Errors produced by [`ProductStore`](crate::ProductStore) operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum StoreError {
    /// No product is stored under the requested id.
    #[error("product {0} not found")]
    NotFound(ProductId),

    /// An update body carried a non-zero id different from the target id.
    #[error("body id {body} does not match target id {target}")]
    IdMismatch { target: ProductId, body: ProductId },
}
