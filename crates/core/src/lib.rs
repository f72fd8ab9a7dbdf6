//! `preorder-core`: domain building blocks shared by the product crates.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! identifiers, the domain error model and the pluggable validation pipeline
//! shared by the orchestration layer and the persistence adapters.

pub mod entity;
pub mod error;
pub mod id;
pub mod validation;
pub mod value_object;

pub use entity::Entity;
pub use error::DomainError;
pub use id::ProductId;
pub use validation::{FieldViolation, Required, Rule, ValidationErrors, Validator};
pub use value_object::ValueObject;
