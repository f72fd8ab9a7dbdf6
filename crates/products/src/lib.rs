//! Products domain module (pre-order quantity scheduling).
//!
//! This crate contains the product record and the validation schemas applied to
//! it before persistence. It is pure domain logic (no IO, no storage).

pub mod product;
pub mod schema;

pub use product::{BulkQuantity, Price, Product, ProductDetails, QuantityDetails, Schedule};
pub use schema::{ProductSchemas, ScheduleOrder};
