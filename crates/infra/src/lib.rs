//! Infrastructure layer: document store adapter, configuration and the
//! product service that fronts it.

pub mod config;
pub mod repository;
pub mod service;

pub use config::{ConfigError, MongoConfig};
pub use repository::{
    InMemoryProductRepository, MongoProductRepository, ProductRepository, RepositoryError,
    StoreError, StoreErrorKind,
};
pub use service::{Clock, ProductService, SystemClock};
