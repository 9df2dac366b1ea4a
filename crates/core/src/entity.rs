//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Only records with a stable key implement this. Inventory records are
/// addressed by list position and deliberately do not.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug + core::fmt::Display;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
