use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use preorder_core::{DomainError, ProductId, ValidationErrors};
use preorder_products::Product;

/// Classification of a store-layer failure.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum StoreErrorKind {
    /// The store could not be reached (server selection, IO, pool cleared).
    Connection,
    /// The call did not complete within the configured timeout.
    Timeout,
    /// A stored document could not be decoded into a product.
    Decode,
    /// Any other failure reported by the store or driver.
    Backend,
}

impl core::fmt::Display for StoreErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            StoreErrorKind::Connection => "connection",
            StoreErrorKind::Timeout => "timeout",
            StoreErrorKind::Decode => "decode",
            StoreErrorKind::Backend => "backend",
        })
    }
}

/// Store-layer failure carrying the operation name and the underlying cause.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{kind} error in {operation}: {message}")]
pub struct StoreError {
    pub operation: &'static str,
    pub kind: StoreErrorKind,
    pub message: String,
}

impl StoreError {
    pub fn new(operation: &'static str, kind: StoreErrorKind, message: impl Into<String>) -> Self {
        Self {
            operation,
            kind,
            message: message.into(),
        }
    }

    pub fn is_timeout(&self) -> bool {
        self.kind == StoreErrorKind::Timeout
    }
}

/// Product repository operation error.
///
/// ## Error Categories
///
/// - **Invalid**: presence validation failed; the caller should fix the input
///   and resubmit. Carries every `(field, reason)` pair.
/// - **NotFound**: no record matches the identifier.
/// - **Store**: connectivity, timeout, decode or other store failure; the
///   caller decides whether to retry (no layer retries on its own).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("invalid product: {0}")]
    Invalid(ValidationErrors),

    #[error("product not found")]
    NotFound,

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl RepositoryError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, RepositoryError::NotFound)
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, RepositoryError::Invalid(_))
    }

    pub fn store_kind(&self) -> Option<StoreErrorKind> {
        match self {
            RepositoryError::Store(e) => Some(e.kind),
            _ => None,
        }
    }
}

impl From<ValidationErrors> for RepositoryError {
    fn from(value: ValidationErrors) -> Self {
        RepositoryError::Invalid(value)
    }
}

impl From<DomainError> for RepositoryError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::Validation(errors) => RepositoryError::Invalid(errors),
            // A malformed identifier cannot match any stored record.
            DomainError::InvalidId(_) | DomainError::NotFound => RepositoryError::NotFound,
        }
    }
}

/// Persistence port for product records.
///
/// One call is one round trip to the store. Implementations hold no per-call
/// state and must be safe to share between concurrent callers.
///
/// ## Identifier space
///
/// Every lookup (get, update, delete) is keyed by the store-assigned primary
/// identifier returned from `create_product`.
///
/// ## Implementation Requirements
///
/// - `create_product` ignores any identifier on the input and returns the one
///   the store assigned.
/// - `update_product` and `delete_product` re-run their validation schema and
///   return `NotFound` when nothing matched.
/// - `update_product` replaces every mutable field and never rewrites
///   `created_at`.
/// - `delete_product` removes the record.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn get_all_products(&self) -> Result<Vec<Product>, RepositoryError>;

    async fn get_product_by_id(&self, id: &ProductId) -> Result<Product, RepositoryError>;

    async fn create_product(&self, product: &Product) -> Result<ProductId, RepositoryError>;

    async fn update_product(&self, product: &Product) -> Result<(), RepositoryError>;

    async fn delete_product(&self, product: &Product) -> Result<(), RepositoryError>;
}

#[async_trait]
impl<R> ProductRepository for Arc<R>
where
    R: ProductRepository + ?Sized,
{
    async fn get_all_products(&self) -> Result<Vec<Product>, RepositoryError> {
        (**self).get_all_products().await
    }

    async fn get_product_by_id(&self, id: &ProductId) -> Result<Product, RepositoryError> {
        (**self).get_product_by_id(id).await
    }

    async fn create_product(&self, product: &Product) -> Result<ProductId, RepositoryError> {
        (**self).create_product(product).await
    }

    async fn update_product(&self, product: &Product) -> Result<(), RepositoryError> {
        (**self).update_product(product).await
    }

    async fn delete_product(&self, product: &Product) -> Result<(), RepositoryError> {
        (**self).delete_product(product).await
    }
}
