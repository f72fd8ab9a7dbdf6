//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    ///
    /// For store-assigned identifiers this may be empty until the entity has
    /// been persisted once.
    fn id(&self) -> &Self::Id;
}
