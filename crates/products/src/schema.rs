//! Validation schemas for [`Product`].
//!
//! Required fields:
//!
//! | operation | required |
//! |---|---|
//! | create | `customer_id`, `product_details.product_name` |
//! | update | create fields + `id` |
//! | delete | `id` |
//!
//! Presence is the only default check. Extra rules (e.g. [`ScheduleOrder`]) can
//! be plugged in with [`ProductSchemas::with_write_rule`].

use preorder_core::{Required, Rule, ValidationErrors, Validator};

use crate::product::Product;

pub const FIELD_ID: &str = "id";
pub const FIELD_CUSTOMER_ID: &str = "customer_id";
pub const FIELD_PRODUCT_NAME: &str = "product_details.product_name";
pub const FIELD_SCHEDULE: &str = "schedular";

fn id_required() -> Required<Product> {
    Required::new(FIELD_ID, |p: &Product| Some(p.id.as_str()))
}

fn content_required() -> Validator<Product> {
    Validator::new()
        .with_rule(Required::new(FIELD_CUSTOMER_ID, |p: &Product| {
            p.customer_id.as_deref()
        }))
        .with_rule(Required::new(FIELD_PRODUCT_NAME, |p: &Product| {
            p.product_details.product_name.as_deref()
        }))
}

/// The three product schemas, one per write operation.
#[derive(Debug, Clone)]
pub struct ProductSchemas {
    create: Validator<Product>,
    update: Validator<Product>,
    delete: Validator<Product>,
}

impl ProductSchemas {
    pub fn new() -> Self {
        let content = content_required();
        Self {
            update: Validator::new().with_rule(id_required()).extend(&content),
            create: content,
            delete: Validator::new().with_rule(id_required()),
        }
    }

    /// Plug a rule into both the create and the update schema.
    pub fn with_write_rule(mut self, rule: impl Rule<Product> + Clone + 'static) -> Self {
        self.create.push(rule.clone());
        self.update.push(rule);
        self
    }

    pub fn create(&self) -> &Validator<Product> {
        &self.create
    }

    pub fn update(&self) -> &Validator<Product> {
        &self.update
    }

    pub fn delete(&self) -> &Validator<Product> {
        &self.delete
    }

    pub fn validate_create(&self, product: &Product) -> Result<(), ValidationErrors> {
        self.create.validate(product)
    }

    pub fn validate_update(&self, product: &Product) -> Result<(), ValidationErrors> {
        self.update.validate(product)
    }

    pub fn validate_delete(&self, product: &Product) -> Result<(), ValidationErrors> {
        self.delete.validate(product)
    }
}

impl Default for ProductSchemas {
    fn default() -> Self {
        Self::new()
    }
}

/// Optional rule: when both dates are present, `start_date <= end_date`.
///
/// Dates are compared as strings, which orders ISO-8601 dates correctly.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScheduleOrder;

impl Rule<Product> for ScheduleOrder {
    fn check(&self, value: &Product, errors: &mut ValidationErrors) {
        if let (Some(start), Some(end)) = (&value.schedule.start_date, &value.schedule.end_date) {
            if start > end {
                errors.push(FIELD_SCHEDULE, "start_date must not be after end_date");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::{ProductDetails, Schedule};

    fn valid() -> Product {
        Product::new()
            .with_customer_id("cust-1")
            .with_product_details(ProductDetails::named("Widget"))
    }

    #[test]
    fn create_accepts_product_without_price_fields() {
        let schemas = ProductSchemas::default();
        assert!(schemas.validate_create(&valid()).is_ok());
    }

    #[test]
    fn create_requires_customer_and_product_name() {
        let schemas = ProductSchemas::default();
        let err = schemas.validate_create(&Product::new()).unwrap_err();
        assert_eq!(
            err.fields().collect::<Vec<_>>(),
            vec![FIELD_CUSTOMER_ID, FIELD_PRODUCT_NAME]
        );
    }

    #[test]
    fn create_does_not_require_an_id() {
        let schemas = ProductSchemas::default();
        assert!(schemas.validate_create(&valid()).is_ok());
        assert!(schemas.validate_update(&valid()).is_err());
    }

    #[test]
    fn update_requires_id_and_content() {
        let schemas = ProductSchemas::default();

        let err = schemas.validate_update(&Product::new().with_id("x")).unwrap_err();
        assert!(!err.contains_field(FIELD_ID));
        assert!(err.contains_field(FIELD_CUSTOMER_ID));

        let err = schemas.validate_update(&valid()).unwrap_err();
        assert_eq!(err.fields().collect::<Vec<_>>(), vec![FIELD_ID]);

        assert!(schemas.validate_update(&valid().with_id("x")).is_ok());
    }

    #[test]
    fn delete_only_requires_id() {
        let schemas = ProductSchemas::default();
        assert!(schemas.validate_delete(&Product::new().with_id("x")).is_ok());
        let err = schemas.validate_delete(&valid()).unwrap_err();
        assert_eq!(err.fields().collect::<Vec<_>>(), vec![FIELD_ID]);
    }

    #[test]
    fn schedule_order_is_not_enforced_by_default() {
        let schemas = ProductSchemas::default();
        let p = valid().with_schedule(Schedule::between("2024-05-01", "2024-04-01"));
        assert!(schemas.validate_create(&p).is_ok());
    }

    #[test]
    fn schedule_order_can_be_plugged_into_writes() {
        let schemas = ProductSchemas::default().with_write_rule(ScheduleOrder);
        let backwards = valid().with_schedule(Schedule::between("2024-05-01", "2024-04-01"));

        let err = schemas.validate_create(&backwards).unwrap_err();
        assert_eq!(err.fields().collect::<Vec<_>>(), vec![FIELD_SCHEDULE]);
        assert!(schemas.validate_update(&backwards.clone().with_id("x")).is_err());
        assert!(schemas.validate_delete(&backwards.with_id("x")).is_ok());

        let forwards = valid().with_schedule(Schedule::between("2024-04-01", "2024-05-01"));
        assert!(schemas.validate_create(&forwards).is_ok());

        let open_ended = valid().with_schedule(Schedule {
            start_date: Some("2024-04-01".to_string()),
            end_date: None,
        });
        assert!(schemas.validate_create(&open_ended).is_ok());
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: a product missing its customer never passes create or update.
            #[test]
            fn missing_customer_is_always_invalid(
                name in "[A-Za-z][A-Za-z0-9 ]{0,40}",
                id in "[a-f0-9]{24}",
                blank in prop::option::of("[ ]{0,4}")
            ) {
                let schemas = ProductSchemas::default();
                let mut p = Product::new()
                    .with_id(id)
                    .with_product_details(ProductDetails::named(name));
                p.customer_id = blank;

                let create = schemas.validate_create(&p).unwrap_err();
                prop_assert_eq!(create.fields().collect::<Vec<_>>(), vec![FIELD_CUSTOMER_ID]);
                prop_assert!(schemas.validate_update(&p).is_err());
            }
        }
    }
}
