//! Weak cross-record references.
//!
//! Records point at each other by id only (`sireId`, `damId`, `morphId`).
//! There is no referential integrity: a referenced record may have been
//! deleted, so resolution always produces an `Option`.

/// A record stored in a named collection.
pub trait Record {
    /// The id type that references this record.
    type Id: PartialEq;

    /// Collection name in the document store.
    const COLLECTION: &'static str;

    /// The record's id.
    fn id(&self) -> &Self::Id;
}

/// Resolve `id` against `records` by equality.
///
/// Returns the first match, or `None` if the reference dangles.
#[must_use]
pub fn resolve<'a, R: Record>(id: &R::Id, records: &'a [R]) -> Option<&'a R> {
    records.iter().find(|record| record.id() == id)
}
