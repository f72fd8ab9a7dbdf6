//! MongoDB-backed product repository.
//!
//! ## Error Mapping
//!
//! Driver errors are mapped to [`RepositoryError`] as follows:
//!
//! | Driver condition | RepositoryError | Scenario |
//! |---|---|---|
//! | `find_one` returned nothing | `NotFound` | unknown identifier |
//! | `matched_count == 0` / `deleted_count == 0` | `NotFound` | unknown identifier on write |
//! | malformed ObjectId hex | `NotFound` | no record can match |
//! | `ServerSelection`, `Io`, `ConnectionPoolCleared` | `Store(Connection)` | store unreachable |
//! | `Io` with `TimedOut` / call exceeded timeout | `Store(Timeout)` | slow or stalled store |
//! | `BsonDeserialization` | `Store(Decode)` | stored document does not fit the product shape |
//! | anything else | `Store(Backend)` | command/write failures, auth, ... |
//!
//! ## Thread Safety
//!
//! `MongoProductRepository` is `Clone + Send + Sync`. The driver's `Client`
//! pools connections internally; no extra locking is added here.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::bson::{Document, doc};
use mongodb::error::ErrorKind;
use mongodb::options::{ClientOptions, ReadPreference, SelectionCriteria};
use mongodb::{Client, Collection};
use tracing::{Span, debug, info, instrument};

use preorder_core::ProductId;
use preorder_products::{Product, ProductSchemas};

use super::document::{COLLECTION, ProductDocument, id_filter, object_id, update_document};
use super::r#trait::{ProductRepository, RepositoryError, StoreError, StoreErrorKind};
use crate::config::MongoConfig;

const APP_NAME: &str = "preorder-products";

/// Product repository over a single MongoDB collection.
///
/// Construction connects and pings the primary; a repository value therefore
/// always wraps a client that was reachable at construction time.
#[derive(Debug, Clone)]
pub struct MongoProductRepository {
    client: Client,
    database: String,
    timeout: Duration,
    schemas: ProductSchemas,
}

impl MongoProductRepository {
    /// Connect to the store described by `config` and verify the primary answers a ping.
    ///
    /// The configured timeout bounds the whole connection step (parsing,
    /// server selection and ping). No retry, no backoff: any failure is
    /// returned and no client is kept.
    #[instrument(skip(config), fields(database = %config.database), err)]
    pub async fn connect(config: &MongoConfig) -> Result<Self, RepositoryError> {
        let client = bounded("connect", config.timeout, connect_client(config)).await?;
        info!(timeout_secs = config.timeout.as_secs(), "connected to document store");

        Ok(Self {
            client,
            database: config.database.clone(),
            timeout: config.timeout,
            schemas: ProductSchemas::default(),
        })
    }

    /// Replace the schemas used to re-validate updates and deletes.
    pub fn with_schemas(mut self, schemas: ProductSchemas) -> Self {
        self.schemas = schemas;
        self
    }

    pub fn database_name(&self) -> &str {
        &self.database
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn collection(&self) -> Collection<ProductDocument> {
        self.client
            .database(&self.database)
            .collection::<ProductDocument>(COLLECTION)
    }
}

async fn connect_client(config: &MongoConfig) -> Result<Client, RepositoryError> {
    let mut options = ClientOptions::parse(&config.url)
        .await
        .map_err(|e| map_mongo_error("parse_connection_string", e))?;
    options.connect_timeout = Some(config.timeout);
    options.server_selection_timeout = Some(config.timeout);
    if options.app_name.is_none() {
        options.app_name = Some(APP_NAME.to_string());
    }

    let client = Client::with_options(options).map_err(|e| map_mongo_error("create_client", e))?;

    client
        .database("admin")
        .run_command(doc! { "ping": 1 })
        .selection_criteria(SelectionCriteria::ReadPreference(ReadPreference::Primary))
        .await
        .map_err(|e| map_mongo_error("ping", e))?;

    Ok(client)
}

/// Run `fut` under a fresh timeout scoped to this single call.
pub(crate) async fn bounded<T, F>(
    operation: &'static str,
    timeout: Duration,
    fut: F,
) -> Result<T, RepositoryError>
where
    F: Future<Output = Result<T, RepositoryError>>,
{
    match tokio::time::timeout(timeout, fut).await {
        Ok(result) => result,
        Err(_) => Err(StoreError::new(
            operation,
            StoreErrorKind::Timeout,
            format!("no response within {}ms", timeout.as_millis()),
        )
        .into()),
    }
}

fn map_mongo_error(operation: &'static str, err: mongodb::error::Error) -> RepositoryError {
    let kind = match err.kind.as_ref() {
        ErrorKind::Io(io) if io.kind() == std::io::ErrorKind::TimedOut => StoreErrorKind::Timeout,
        ErrorKind::ServerSelection { .. }
        | ErrorKind::Io(_)
        | ErrorKind::ConnectionPoolCleared { .. } => StoreErrorKind::Connection,
        ErrorKind::BsonDeserialization(_) => StoreErrorKind::Decode,
        _ => StoreErrorKind::Backend,
    };
    StoreError::new(operation, kind, err.to_string()).into()
}

#[async_trait]
impl ProductRepository for MongoProductRepository {
    #[instrument(
        skip(self),
        fields(collection = COLLECTION, product_count = tracing::field::Empty),
        err
    )]
    async fn get_all_products(&self) -> Result<Vec<Product>, RepositoryError> {
        let collection = self.collection();
        let documents = bounded("get_all_products", self.timeout, async move {
            let cursor = collection
                .find(doc! {})
                .await
                .map_err(|e| map_mongo_error("get_all_products", e))?;
            cursor
                .try_collect::<Vec<ProductDocument>>()
                .await
                .map_err(|e| map_mongo_error("get_all_products.decode", e))
        })
        .await?;

        Span::current().record("product_count", documents.len());
        Ok(documents.into_iter().map(Product::from).collect())
    }

    #[instrument(skip(self), fields(product_id = %id), err)]
    async fn get_product_by_id(&self, id: &ProductId) -> Result<Product, RepositoryError> {
        let oid = object_id(id)?;
        let collection = self.collection();

        let found = bounded("get_product_by_id", self.timeout, async move {
            collection
                .find_one(id_filter(oid))
                .await
                .map_err(|e| map_mongo_error("get_product_by_id", e))
        })
        .await?;

        found.map(Product::from).ok_or(RepositoryError::NotFound)
    }

    #[instrument(skip(self, product), err)]
    async fn create_product(&self, product: &Product) -> Result<ProductId, RepositoryError> {
        let document = ProductDocument::for_insert(product);
        let collection = self.collection();

        let result = bounded("create_product", self.timeout, async move {
            collection
                .insert_one(document)
                .await
                .map_err(|e| map_mongo_error("create_product", e))
        })
        .await?;

        let oid = result.inserted_id.as_object_id().ok_or_else(|| {
            StoreError::new(
                "create_product",
                StoreErrorKind::Backend,
                format!("store assigned a non-ObjectId identifier: {}", result.inserted_id),
            )
        })?;

        let id = ProductId::new(oid.to_hex());
        debug!(product_id = %id, "product inserted");
        Ok(id)
    }

    #[instrument(skip(self, product), fields(product_id = %product.id), err)]
    async fn update_product(&self, product: &Product) -> Result<(), RepositoryError> {
        self.schemas.validate_update(product)?;

        let oid = object_id(&product.id)?;
        let pipeline: Vec<Document> = update_document(product)?;
        let collection = self.collection();

        let result = bounded("update_product", self.timeout, async move {
            collection
                .update_one(id_filter(oid), pipeline)
                .await
                .map_err(|e| map_mongo_error("update_product", e))
        })
        .await?;

        if result.matched_count == 0 {
            return Err(RepositoryError::NotFound);
        }
        debug!(modified = result.modified_count, "product updated");
        Ok(())
    }

    #[instrument(skip(self, product), fields(product_id = %product.id), err)]
    async fn delete_product(&self, product: &Product) -> Result<(), RepositoryError> {
        self.schemas.validate_delete(product)?;

        let oid = object_id(&product.id)?;
        let collection = self.collection();

        let result = bounded("delete_product", self.timeout, async move {
            collection
                .delete_one(id_filter(oid))
                .await
                .map_err(|e| map_mongo_error("delete_product", e))
        })
        .await?;

        if result.deleted_count == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
