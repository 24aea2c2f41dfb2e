//! Undirected duplicate detection for relations.

use crate::error::Result;
use crate::store::RelationStore;

/// Whether `subject --type--> object` or `object --type--> subject` is already stored.
///
/// Not transactional: two imports racing on the same pair can both see
/// `false`.
pub fn relation_exists<S: RelationStore + ?Sized>(
    store: &S,
    subject_id: i64,
    object_id: i64,
    type_id: i64,
) -> Result<bool> {
    Ok(store.relation_exists(subject_id, object_id, type_id)?
        || store.relation_exists(object_id, subject_id, type_id)?)
}
