//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects have **no identity**: two instances with the same attribute
/// values are the same value. Nested record parts such as a price or a
/// scheduling window are value objects; the record that owns them is an
/// [`Entity`](crate::Entity).
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq, Eq)]
/// struct Window {
///     start: Option<String>,
///     end: Option<String>,
/// }
///
/// impl ValueObject for Window {}
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {
    /// Returns `true` when no attribute carries a value.
    ///
    /// Empty value objects are omitted from persisted and wire representations.
    fn is_empty(&self) -> bool;
}
