//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Credentials are identified by their username, products by a generated id.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
