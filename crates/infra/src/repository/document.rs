//! Product ⇄ BSON document mapping.
//!
//! The document shape is part of the persisted-state contract: collection and
//! field names must not change without a migration.
//!
//! ```text
//! product_quantity_schedular
//! {
//!   _id: ObjectId,
//!   pre_order_request_id, customer_id,
//!   product_details:  { product_name, description, ImageUrl },
//!   quantity_details: { bulk_quantity: { volume, units },
//!                       price: { amount, currency, per_unit, units } },
//!   schedular:        { start_date, end_date },
//!   created_at: int64, updated_at: int64
//! }
//! ```
//!
//! Absent optional values are never written.

use mongodb::bson::oid::ObjectId;
use mongodb::bson::{self, Bson, Document, doc};
use serde::{Deserialize, Serialize};

use preorder_core::{DomainError, ProductId, ValueObject};
use preorder_products::{Product, ProductDetails, QuantityDetails, Schedule};

use super::r#trait::{RepositoryError, StoreError, StoreErrorKind};

pub const COLLECTION: &str = "product_quantity_schedular";

pub const FIELD_ID: &str = "_id";
pub const FIELD_PRE_ORDER_REQUEST_ID: &str = "pre_order_request_id";
pub const FIELD_CUSTOMER_ID: &str = "customer_id";
pub const FIELD_PRODUCT_DETAILS: &str = "product_details";
pub const FIELD_QUANTITY_DETAILS: &str = "quantity_details";
pub const FIELD_SCHEDULE: &str = "schedular";
pub const FIELD_CREATED_AT: &str = "created_at";
pub const FIELD_UPDATED_AT: &str = "updated_at";

/// Stored representation of a [`Product`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pre_order_request_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    #[serde(skip_serializing_if = "ValueObject::is_empty")]
    pub product_details: ProductDetails,
    #[serde(skip_serializing_if = "ValueObject::is_empty")]
    pub quantity_details: QuantityDetails,
    #[serde(rename = "schedular", skip_serializing_if = "ValueObject::is_empty")]
    pub schedule: Schedule,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<i64>,
}

impl ProductDocument {
    /// Document for an insert. The input identifier is dropped; the store
    /// assigns `_id`.
    pub fn for_insert(product: &Product) -> Self {
        Self {
            id: None,
            pre_order_request_id: product.pre_order_request_id.clone(),
            customer_id: product.customer_id.clone(),
            product_details: product.product_details.clone(),
            quantity_details: product.quantity_details.clone(),
            schedule: product.schedule.clone(),
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }
}

impl From<ProductDocument> for Product {
    fn from(doc: ProductDocument) -> Self {
        Product {
            id: doc
                .id
                .map(|oid| ProductId::new(oid.to_hex()))
                .unwrap_or_default(),
            pre_order_request_id: doc.pre_order_request_id,
            customer_id: doc.customer_id,
            product_details: doc.product_details,
            quantity_details: doc.quantity_details,
            schedule: doc.schedule,
            created_at: doc.created_at,
            updated_at: doc.updated_at,
        }
    }
}

/// Parse a product identifier into the store's primary key.
pub fn object_id(id: &ProductId) -> Result<ObjectId, DomainError> {
    ObjectId::parse_str(id.as_str())
        .map_err(|e| DomainError::invalid_id(format!("{}: {}", id, e)))
}

/// Primary-key filter used by every single-record operation.
pub fn id_filter(oid: ObjectId) -> Document {
    doc! { FIELD_ID: oid }
}

/// Full replace of the mutable fields, as an update pipeline.
///
/// Present values are `$set` (wrapped in `$literal` so user strings starting
/// with `$` are never read as field paths), absent ones are `$unset`.
/// `created_at` is never written. `updated_at` is raised to the stored
/// `created_at` when the clock is behind it.
pub fn update_document(product: &Product) -> Result<Vec<Document>, RepositoryError> {
    let mut set = Document::new();
    let mut unset: Vec<&str> = Vec::new();

    let mut put = |field: &'static str, value: Option<Bson>| match value {
        Some(v) => {
            set.insert(field, doc! { "$literal": v });
        }
        None => unset.push(field),
    };

    put(
        FIELD_PRE_ORDER_REQUEST_ID,
        product.pre_order_request_id.clone().map(Bson::String),
    );
    put(FIELD_CUSTOMER_ID, product.customer_id.clone().map(Bson::String));
    put(FIELD_PRODUCT_DETAILS, encode_part(&product.product_details)?);
    put(FIELD_QUANTITY_DETAILS, encode_part(&product.quantity_details)?);
    put(FIELD_SCHEDULE, encode_part(&product.schedule)?);

    match product.updated_at {
        Some(now) => {
            set.insert(
                FIELD_UPDATED_AT,
                doc! { "$max": [Bson::Int64(now), format!("${FIELD_CREATED_AT}")] },
            );
        }
        None => unset.push(FIELD_UPDATED_AT),
    }

    let mut pipeline = Vec::with_capacity(2);
    if !set.is_empty() {
        pipeline.push(doc! { "$set": set });
    }
    if !unset.is_empty() {
        pipeline.push(doc! { "$unset": unset });
    }
    Ok(pipeline)
}

fn encode_part<T>(part: &T) -> Result<Option<Bson>, RepositoryError>
where
    T: ValueObject + Serialize,
{
    if part.is_empty() {
        return Ok(None);
    }
    bson::to_bson(part).map(Some).map_err(|e| {
        StoreError::new("encode_document", StoreErrorKind::Backend, e.to_string()).into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use preorder_products::{Price, ProductDetails};

    fn widget() -> Product {
        Product::new()
            .with_customer_id("cust-1")
            .with_product_details(ProductDetails::named("Widget"))
    }

    #[test]
    fn insert_document_omits_absent_fields_and_input_id() {
        let mut p = widget().with_id("65a1f0c2e4b0a1b2c3d4e5f6");
        p.mark_created(1_700_000_000);

        let document = bson::to_document(&ProductDocument::for_insert(&p)).unwrap();

        assert!(!document.contains_key(FIELD_ID));
        assert_eq!(document.get_str(FIELD_CUSTOMER_ID).unwrap(), "cust-1");
        assert_eq!(
            document
                .get_document(FIELD_PRODUCT_DETAILS)
                .unwrap()
                .get_str("product_name")
                .unwrap(),
            "Widget"
        );
        assert_eq!(document.get_i64(FIELD_CREATED_AT).unwrap(), 1_700_000_000);
        assert!(!document.contains_key(FIELD_UPDATED_AT));
        assert!(!document.contains_key(FIELD_QUANTITY_DETAILS));
        assert!(!document.contains_key(FIELD_SCHEDULE));
        assert!(!document.contains_key(FIELD_PRE_ORDER_REQUEST_ID));
    }

    #[test]
    fn image_reference_uses_legacy_field_name() {
        let mut p = widget();
        p.product_details.image_url = Some("img.png".to_string());

        let document = bson::to_document(&ProductDocument::for_insert(&p)).unwrap();
        let details = document.get_document(FIELD_PRODUCT_DETAILS).unwrap();
        assert_eq!(details.get_str("ImageUrl").unwrap(), "img.png");
    }

    #[test]
    fn stored_document_decodes_into_product() {
        let oid = ObjectId::new();
        let raw = doc! {
            "_id": oid,
            "customer_id": "cust-1",
            "product_details": { "product_name": "Widget" },
            "quantity_details": { "price": { "amount": "9", "currency": "USD" } },
            "schedular": { "start_date": "2024-01-01" },
            "created_at": 1_700_000_000_i64,
        };

        let decoded: ProductDocument = bson::from_document(raw).unwrap();
        let product = Product::from(decoded);

        assert_eq!(product.id.as_str(), oid.to_hex());
        assert_eq!(product.quantity_details.price.currency.as_deref(), Some("USD"));
        assert_eq!(product.schedule.start_date.as_deref(), Some("2024-01-01"));
        assert_eq!(product.schedule.end_date, None);
        assert_eq!(product.created_at, Some(1_700_000_000));
        assert_eq!(product.updated_at, None);
    }

    #[test]
    fn update_pipeline_never_touches_created_at() {
        let mut p = widget().with_id(ObjectId::new().to_hex());
        p.created_at = Some(1);
        p.updated_at = Some(2);
        p.quantity_details.price = Price {
            amount: Some("10".to_string()),
            ..Price::default()
        };

        let pipeline = update_document(&p).unwrap();
        assert_eq!(pipeline.len(), 2);
        let set = pipeline[0].get_document("$set").unwrap();
        let unset = pipeline[1].get_array("$unset").unwrap();

        assert!(!set.contains_key(FIELD_CREATED_AT));
        assert!(!set.contains_key(FIELD_ID));
        assert!(!unset.contains(&Bson::from(FIELD_CREATED_AT)));
        assert_eq!(
            set.get_document(FIELD_QUANTITY_DETAILS)
                .unwrap()
                .get_document("$literal")
                .unwrap()
                .get_document("price")
                .unwrap()
                .get_str("amount")
                .unwrap(),
            "10"
        );
        assert!(unset.contains(&Bson::from(FIELD_PRE_ORDER_REQUEST_ID)));
        assert!(unset.contains(&Bson::from(FIELD_SCHEDULE)));
    }

    #[test]
    fn update_time_is_floored_at_stored_creation_time() {
        let mut p = widget().with_id(ObjectId::new().to_hex());
        p.mark_updated(4_000);

        let pipeline = update_document(&p).unwrap();
        let set = pipeline[0].get_document("$set").unwrap();

        assert_eq!(
            set.get_document(FIELD_UPDATED_AT).unwrap(),
            &doc! { "$max": [4_000_i64, "$created_at"] }
        );
    }

    #[test]
    fn user_values_are_literal_in_the_pipeline() {
        let mut p = widget().with_id(ObjectId::new().to_hex());
        p.customer_id = Some("$created_at".to_string());

        let pipeline = update_document(&p).unwrap();
        let set = pipeline[0].get_document("$set").unwrap();

        assert_eq!(
            set.get_document(FIELD_CUSTOMER_ID).unwrap(),
            &doc! { "$literal": "$created_at" }
        );
    }

    #[test]
    fn malformed_identifier_is_an_invalid_id() {
        let err = object_id(&ProductId::new("not-hex")).unwrap_err();
        assert!(matches!(err, DomainError::InvalidId(_)));

        let oid = ObjectId::new();
        assert_eq!(object_id(&ProductId::new(oid.to_hex())).unwrap(), oid);
    }
}
