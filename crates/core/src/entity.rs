//! Entity trait: identity + continuity across state changes.

use crate::id::SequentialId;

/// Entity marker + minimal interface.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}

/// Next identifier for a collection: max existing id + 1, or the first id when empty.
pub fn next_id<E>(records: &[E]) -> E::Id
where
    E: Entity,
    E::Id: SequentialId,
{
    records
        .iter()
        .map(|r| *r.id())
        .max()
        .map(|max| max.next())
        .unwrap_or_else(<E::Id as SequentialId>::first)
}
