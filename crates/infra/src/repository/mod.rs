//! Product persistence boundary.
//!
//! [`ProductRepository`] is the port the orchestration layer talks to. Two
//! adapters implement it: [`MongoProductRepository`] (production) and
//! [`InMemoryProductRepository`] (tests/dev).

pub mod document;
pub mod in_memory;
pub mod mongo;
pub mod r#trait;

pub use in_memory::InMemoryProductRepository;
pub use mongo::MongoProductRepository;
pub use r#trait::{ProductRepository, RepositoryError, StoreError, StoreErrorKind};
