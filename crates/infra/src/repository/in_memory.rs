use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use tracing::{debug, instrument};

use preorder_core::ProductId;
use preorder_products::{Product, ProductSchemas};

use super::r#trait::{ProductRepository, RepositoryError, StoreError, StoreErrorKind};

/// In-memory product repository.
///
/// Intended for tests/dev. Mirrors the document store contract: ObjectId-style
/// identifiers, re-validation on update/delete and `NotFound` when nothing
/// matches.
#[derive(Debug, Default)]
pub struct InMemoryProductRepository {
    records: RwLock<BTreeMap<ProductId, Product>>,
    schemas: ProductSchemas,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_schemas(schemas: ProductSchemas) -> Self {
        Self {
            records: RwLock::new(BTreeMap::new()),
            schemas,
        }
    }

    pub fn len(&self) -> Result<usize, RepositoryError> {
        self.records
            .read()
            .map(|m| m.len())
            .map_err(|_| poisoned("len"))
    }

    pub fn is_empty(&self) -> Result<bool, RepositoryError> {
        self.len().map(|n| n == 0)
    }
}

fn poisoned(operation: &'static str) -> RepositoryError {
    StoreError::new(operation, StoreErrorKind::Backend, "lock poisoned").into()
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    #[instrument(skip(self), err)]
    async fn get_all_products(&self) -> Result<Vec<Product>, RepositoryError> {
        let records = self
            .records
            .read()
            .map_err(|_| poisoned("get_all_products"))?;
        Ok(records.values().cloned().collect())
    }

    #[instrument(skip(self), fields(product_id = %id), err)]
    async fn get_product_by_id(&self, id: &ProductId) -> Result<Product, RepositoryError> {
        let records = self
            .records
            .read()
            .map_err(|_| poisoned("get_product_by_id"))?;
        records.get(id).cloned().ok_or(RepositoryError::NotFound)
    }

    #[instrument(skip(self, product), err)]
    async fn create_product(&self, product: &Product) -> Result<ProductId, RepositoryError> {
        let id = ProductId::new(ObjectId::new().to_hex());
        let mut stored = product.clone();
        stored.id = id.clone();

        self.records
            .write()
            .map_err(|_| poisoned("create_product"))?
            .insert(id.clone(), stored);

        debug!(product_id = %id, "product stored");
        Ok(id)
    }

    #[instrument(skip(self, product), fields(product_id = %product.id), err)]
    async fn update_product(&self, product: &Product) -> Result<(), RepositoryError> {
        self.schemas.validate_update(product)?;

        let mut records = self
            .records
            .write()
            .map_err(|_| poisoned("update_product"))?;
        let existing = records.get_mut(&product.id).ok_or(RepositoryError::NotFound)?;

        let created_at = existing.created_at;
        *existing = product.clone();
        existing.created_at = created_at;
        if let (Some(updated), Some(created)) = (existing.updated_at, created_at) {
            existing.updated_at = Some(updated.max(created));
        }
        Ok(())
    }

    #[instrument(skip(self, product), fields(product_id = %product.id), err)]
    async fn delete_product(&self, product: &Product) -> Result<(), RepositoryError> {
        self.schemas.validate_delete(product)?;

        self.records
            .write()
            .map_err(|_| poisoned("delete_product"))?
            .remove(&product.id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }
}
