//! Pluggable validation pipeline.
//!
//! A [`Validator`] is an ordered list of [`Rule`]s (a *schema*). Running it
//! collects every violation into [`ValidationErrors`] instead of stopping at the
//! first failing field, so callers get `(field, reason)` diagnostics while the
//! error *kind* stays a single "invalid input" case.
//!
//! ```ignore
//! let schema = Validator::new()
//!     .with_rule(Required::new("customer_id", |p: &Order| p.customer_id.as_deref()))
//!     .with_rule(|p: &Order, errors: &mut ValidationErrors| {
//!         if p.lines.is_empty() {
//!             errors.push("lines", "must not be empty");
//!         }
//!     });
//!
//! schema.validate(&order)?;
//! ```

use std::sync::Arc;

use serde::Serialize;

/// A single failed check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    /// Dotted path of the offending field (e.g. `product_details.product_name`).
    pub field: String,
    pub reason: String,
}

impl core::fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} {}", self.field, self.reason)
    }
}

/// Violations collected by a validation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    violations: Vec<FieldViolation>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: impl Into<String>, reason: impl Into<String>) {
        self.violations.push(FieldViolation {
            field: field.into(),
            reason: reason.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn violations(&self) -> &[FieldViolation] {
        &self.violations
    }

    /// Field paths that failed, in rule order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.violations.iter().map(|v| v.field.as_str())
    }

    pub fn contains_field(&self, field: &str) -> bool {
        self.fields().any(|f| f == field)
    }

    /// `Ok(())` when nothing was collected, otherwise `Err(self)`.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl core::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        if self.violations.is_empty() {
            return f.write_str("no violations");
        }
        for (idx, v) in self.violations.iter().enumerate() {
            if idx > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{v}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// One check applied to a `T`.
///
/// Rules append to `errors` rather than returning early so a single run
/// reports every problem. Closures of the shape
/// `Fn(&T, &mut ValidationErrors)` are rules too.
pub trait Rule<T>: Send + Sync {
    fn check(&self, value: &T, errors: &mut ValidationErrors);
}

impl<T, F> Rule<T> for F
where
    F: Fn(&T, &mut ValidationErrors) + Send + Sync,
{
    fn check(&self, value: &T, errors: &mut ValidationErrors) {
        self(value, errors)
    }
}

/// Presence rule: the field must hold a non-blank value.
///
/// This is the only built-in check. It does not look at format, range or
/// relationships between fields.
pub struct Required<T> {
    field: &'static str,
    accessor: fn(&T) -> Option<&str>,
}

impl<T> Required<T> {
    pub const fn new(field: &'static str, accessor: fn(&T) -> Option<&str>) -> Self {
        Self { field, accessor }
    }

    pub fn field(&self) -> &'static str {
        self.field
    }
}

impl<T> core::fmt::Debug for Required<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Required").field("field", &self.field).finish()
    }
}

impl<T> Rule<T> for Required<T> {
    fn check(&self, value: &T, errors: &mut ValidationErrors) {
        match (self.accessor)(value) {
            Some(v) if !v.trim().is_empty() => {}
            _ => errors.push(self.field, "is required"),
        }
    }
}

/// Ordered set of rules applied to a `T`.
///
/// Cloning is cheap: rules are shared, so one rule can be plugged into several
/// schemas.
pub struct Validator<T> {
    rules: Vec<Arc<dyn Rule<T>>>,
}

impl<T> Validator<T> {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn with_rule(mut self, rule: impl Rule<T> + 'static) -> Self {
        self.push(rule);
        self
    }

    pub fn push(&mut self, rule: impl Rule<T> + 'static) {
        self.rules.push(Arc::new(rule));
    }

    pub(crate) fn push_shared(&mut self, rule: Arc<dyn Rule<T>>) {
        self.rules.push(rule);
    }

    /// Append every rule of `other` after this validator's own rules.
    pub fn extend(mut self, other: &Validator<T>) -> Self {
        for rule in &other.rules {
            self.push_shared(Arc::clone(rule));
        }
        self
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Run every rule and return all collected violations.
    pub fn validate(&self, value: &T) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        for rule in &self.rules {
            rule.check(value, &mut errors);
        }
        errors.into_result()
    }
}

impl<T> Default for Validator<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Validator<T> {
    fn clone(&self) -> Self {
        Self {
            rules: self.rules.clone(),
        }
    }
}

impl<T> core::fmt::Debug for Validator<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Validator")
            .field("rules", &self.rules.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct Account {
        owner: Option<String>,
        email: Option<String>,
        tier: u8,
    }

    fn schema() -> Validator<Account> {
        Validator::new()
            .with_rule(Required::new("owner", |a: &Account| a.owner.as_deref()))
            .with_rule(Required::new("email", |a: &Account| a.email.as_deref()))
    }

    #[test]
    fn empty_validator_accepts_anything() {
        let v: Validator<Account> = Validator::new();
        assert!(v.is_empty());
        assert!(v.validate(&Account::default()).is_ok());
    }

    #[test]
    fn required_rejects_missing_and_blank_values() {
        let account = Account {
            owner: Some("   ".to_string()),
            email: None,
            tier: 0,
        };

        let err = schema().validate(&account).unwrap_err();
        assert_eq!(err.len(), 2);
        assert_eq!(err.fields().collect::<Vec<_>>(), vec!["owner", "email"]);
        assert_eq!(err.violations()[0].reason, "is required");
    }

    #[test]
    fn required_accepts_present_values() {
        let account = Account {
            owner: Some("ada".to_string()),
            email: Some("ada@example.com".to_string()),
            tier: 0,
        };
        assert!(schema().validate(&account).is_ok());
    }

    #[test]
    fn closure_rules_plug_into_the_pipeline() {
        let v = schema().with_rule(|a: &Account, errors: &mut ValidationErrors| {
            if a.tier > 3 {
                errors.push("tier", "must be at most 3");
            }
        });

        let account = Account {
            owner: Some("ada".to_string()),
            email: Some("ada@example.com".to_string()),
            tier: 9,
        };

        let err = v.validate(&account).unwrap_err();
        assert!(err.contains_field("tier"));
        assert!(!err.contains_field("owner"));
    }

    #[test]
    fn extend_shares_rules_between_schemas() {
        let base = schema();
        let stricter = Validator::new()
            .with_rule(|a: &Account, errors: &mut ValidationErrors| {
                if a.tier == 0 {
                    errors.push("tier", "must be set");
                }
            })
            .extend(&base);

        assert_eq!(stricter.len(), 3);
        let err = stricter.validate(&Account::default()).unwrap_err();
        assert_eq!(err.fields().collect::<Vec<_>>(), vec!["tier", "owner", "email"]);
    }

    #[test]
    fn display_lists_every_violation() {
        let mut errors = ValidationErrors::new();
        errors.push("a", "is required");
        errors.push("b.c", "is required");
        assert_eq!(errors.to_string(), "a is required; b.c is required");
        assert!(errors.clone().into_result().is_err());
        assert!(ValidationErrors::new().into_result().is_ok());
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: whitespace-only values never satisfy a presence rule.
            #[test]
            fn blank_values_are_always_rejected(blank in "[ \t\n]{0,16}") {
                let account = Account {
                    owner: Some(blank),
                    email: Some("x@example.com".to_string()),
                    tier: 0,
                };
                let err = schema().validate(&account).unwrap_err();
                prop_assert_eq!(err.fields().collect::<Vec<_>>(), vec!["owner"]);
            }

            /// Property: any value with a visible character passes presence checks.
            #[test]
            fn visible_values_are_accepted(owner in "[ ]{0,3}[a-z0-9]{1,12}[ ]{0,3}") {
                let account = Account {
                    owner: Some(owner),
                    email: Some("x@example.com".to_string()),
                    tier: 0,
                };
                prop_assert!(schema().validate(&account).is_ok());
            }
        }
    }
}
