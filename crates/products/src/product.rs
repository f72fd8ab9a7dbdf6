use serde::{Deserialize, Serialize};

use preorder_core::{Entity, ProductId, ValueObject};

/// Descriptive part of a product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Image reference (URL or storage key).
    #[serde(rename = "ImageUrl", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl ProductDetails {
    pub fn named(product_name: impl Into<String>) -> Self {
        Self {
            product_name: Some(product_name.into()),
            ..Self::default()
        }
    }
}

impl ValueObject for ProductDetails {
    fn is_empty(&self) -> bool {
        self.product_name.is_none() && self.description.is_none() && self.image_url.is_none()
    }
}

/// Volume offered in bulk, e.g. `volume = "500"`, `units = "kg"`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BulkQuantity {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub units: Option<String>,
}

impl ValueObject for BulkQuantity {
    fn is_empty(&self) -> bool {
        self.volume.is_none() && self.units.is_none()
    }
}

/// Price quote. Values are kept as the caller supplied them (no numeric typing,
/// no currency validation).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Price {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub units: Option<String>,
}

impl ValueObject for Price {
    fn is_empty(&self) -> bool {
        self.amount.is_none()
            && self.currency.is_none()
            && self.per_unit.is_none()
            && self.units.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuantityDetails {
    #[serde(skip_serializing_if = "ValueObject::is_empty")]
    pub bulk_quantity: BulkQuantity,
    #[serde(skip_serializing_if = "ValueObject::is_empty")]
    pub price: Price,
}

impl ValueObject for QuantityDetails {
    fn is_empty(&self) -> bool {
        self.bulk_quantity.is_empty() && self.price.is_empty()
    }
}

/// Scheduling window. Dates are free-form strings; ordering is not enforced
/// unless [`ScheduleOrder`](crate::ScheduleOrder) is plugged into a schema.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Schedule {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

impl Schedule {
    pub fn between(start_date: impl Into<String>, end_date: impl Into<String>) -> Self {
        Self {
            start_date: Some(start_date.into()),
            end_date: Some(end_date.into()),
        }
    }
}

impl ValueObject for Schedule {
    fn is_empty(&self) -> bool {
        self.start_date.is_none() && self.end_date.is_none()
    }
}

/// Product record: a customer's pre-order for a quantity of a product over a
/// scheduling window.
///
/// Serialized field names are part of the external contract
/// (`product_id`, `schedular`, `ImageUrl`, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Product {
    /// Store-assigned identifier; empty until first persisted.
    #[serde(rename = "product_id", skip_serializing_if = "ProductId::is_empty")]
    pub id: ProductId,
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
    /// Unix seconds (UTC), stamped once on creation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
    /// Unix seconds (UTC), stamped on every update.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<i64>,
}

impl Product {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(mut self, id: impl Into<ProductId>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_pre_order_request_id(mut self, id: impl Into<String>) -> Self {
        self.pre_order_request_id = Some(id.into());
        self
    }

    pub fn with_customer_id(mut self, id: impl Into<String>) -> Self {
        self.customer_id = Some(id.into());
        self
    }

    pub fn with_product_details(mut self, details: ProductDetails) -> Self {
        self.product_details = details;
        self
    }

    pub fn with_quantity_details(mut self, details: QuantityDetails) -> Self {
        self.quantity_details = details;
        self
    }

    pub fn with_schedule(mut self, schedule: Schedule) -> Self {
        self.schedule = schedule;
        self
    }

    pub fn is_persisted(&self) -> bool {
        !self.id.is_empty()
    }

    /// Stamp creation time. Creation never carries an update time.
    pub fn mark_created(&mut self, now: i64) {
        self.created_at = Some(now);
        self.updated_at = None;
    }

    /// Stamp update time. Any caller-supplied `created_at` is dropped; the
    /// stored creation time is owned by the repository.
    pub fn mark_updated(&mut self, now: i64) {
        self.created_at = None;
        self.updated_at = Some(now);
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
