//! Validation & orchestration layer.
//!
//! `ProductService` is the entry point the (external) transport layer calls.
//! Each operation is one straight pass:
//!
//! ```text
//! entity
//!   ↓
//! 1. Validate against the operation's schema (Invalid → stop, no store call)
//!   ↓
//! 2. Stamp timestamps (created_at on create, updated_at on update)
//!   ↓
//! 3. Delegate to the repository (one round trip)
//! ```
//!
//! The service holds no per-call state and never keeps entity copies between
//! calls. Errors from the repository are returned unchanged; nothing is retried.

use chrono::Utc;
use tracing::{info, instrument};

use preorder_core::ProductId;
use preorder_products::{Product, ProductSchemas};

use crate::repository::{ProductRepository, RepositoryError};

/// Source of "now" as Unix seconds (UTC).
pub trait Clock: Send + Sync {
    fn now(&self) -> i64;
}

/// Wall clock.
#[derive(Debug, Copy, Clone, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> i64 {
        Utc::now().timestamp()
    }
}

impl<F> Clock for F
where
    F: Fn() -> i64 + Send + Sync,
{
    fn now(&self) -> i64 {
        self()
    }
}

/// Product operations: validation and timestamping in front of a repository.
///
/// ## Generic Parameters
///
/// - `R`: repository implementation (`MongoProductRepository` in production,
///   `InMemoryProductRepository` in tests/dev)
/// - `C`: clock used for `created_at` / `updated_at`
#[derive(Debug, Clone)]
pub struct ProductService<R, C = SystemClock> {
    repository: R,
    clock: C,
    schemas: ProductSchemas,
}

impl<R> ProductService<R>
where
    R: ProductRepository,
{
    pub fn new(repository: R) -> Self {
        Self {
            repository,
            clock: SystemClock,
            schemas: ProductSchemas::default(),
        }
    }
}

impl<R, C> ProductService<R, C> {
    pub fn with_clock<C2: Clock>(self, clock: C2) -> ProductService<R, C2> {
        ProductService {
            repository: self.repository,
            clock,
            schemas: self.schemas,
        }
    }

    pub fn with_schemas(mut self, schemas: ProductSchemas) -> Self {
        self.schemas = schemas;
        self
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn schemas(&self) -> &ProductSchemas {
        &self.schemas
    }
}

impl<R, C> ProductService<R, C>
where
    R: ProductRepository,
    C: Clock,
{
    /// All stored products (no filter, no pagination).
    #[instrument(skip(self), err)]
    pub async fn list_products(&self) -> Result<Vec<Product>, RepositoryError> {
        self.repository.get_all_products().await
    }

    #[instrument(skip(self), fields(product_id = %id), err)]
    pub async fn get_product(&self, id: &ProductId) -> Result<Product, RepositoryError> {
        self.repository.get_product_by_id(id).await
    }

    /// Validate, stamp `created_at` and store. Returns the identifier the
    /// store assigned.
    #[instrument(skip(self, product), fields(customer_id = ?product.customer_id), err)]
    pub async fn create_product(&self, mut product: Product) -> Result<ProductId, RepositoryError> {
        self.schemas.validate_create(&product)?;

        product.mark_created(self.clock.now());
        let id = self.repository.create_product(&product).await?;

        info!(product_id = %id, "product created");
        Ok(id)
    }

    /// Validate, stamp `updated_at` with the call time and replace the stored
    /// record's mutable fields.
    ///
    /// The caller's `created_at` is discarded; the stored one is kept. If the
    /// clock is behind the stored `created_at`, the repository raises
    /// `updated_at` to it. Returns the entity as sent to the repository.
    #[instrument(skip(self, product), fields(product_id = %product.id), err)]
    pub async fn update_product(&self, mut product: Product) -> Result<Product, RepositoryError> {
        self.schemas.validate_update(&product)?;

        product.mark_updated(self.clock.now());
        self.repository.update_product(&product).await?;

        info!("product updated");
        Ok(product)
    }

    /// Validate and remove the stored record.
    #[instrument(skip(self, product), fields(product_id = %product.id), err)]
    pub async fn delete_product(&self, product: &Product) -> Result<(), RepositoryError> {
        self.schemas.validate_delete(product)?;

        self.repository.delete_product(product).await?;

        info!("product deleted");
        Ok(())
    }
}
