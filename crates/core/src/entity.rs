//! Entities: values that keep an identity independent of their fields.

/// Something addressed by id rather than by contents.
///
/// Two entries with different contents but the same id are the same entity;
/// removal and lookup go through the id.
pub trait Entity {
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    fn id(&self) -> &Self::Id;

    /// Whether this entity is the one addressed by `id`.
    fn has_id(&self, id: &Self::Id) -> bool {
        self.id() == id
    }
}
