//! Entity and vocabulary storage used by the relation import.
//!
//! The import only needs a narrow slice of the archival schema: actor lookup
//! by authorized name, directed relation existence checks, relation inserts,
//! and the terms of one taxonomy. [`RelationStore`] captures exactly that, with
//! a SQLite implementation for real runs and an in-memory one for tests.

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// An actor (authority record) as seen through one culture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: i64,
    pub authorized_form_of_name: String,
    pub culture: String,
}

/// One culture-specific label of a taxonomy term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermLabel {
    pub term_id: i64,
    pub culture: String,
    pub name: String,
}

/// A relation ready to be written. Optional fields left as `None` keep the
/// store's column default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRelation {
    pub subject_id: i64,
    pub object_id: i64,
    pub type_id: i64,
    pub description: Option<String>,
    pub date: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub source_culture: String,
}

/// A persisted relation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relation {
    pub id: i64,
    pub subject_id: i64,
    pub object_id: i64,
    pub type_id: i64,
    pub description: Option<String>,
    pub date: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub source_culture: String,
}

impl Relation {
    fn from_new(id: i64, new: &NewRelation) -> Self {
        Self {
            id,
            subject_id: new.subject_id,
            object_id: new.object_id,
            type_id: new.type_id,
            description: new.description.clone(),
            date: new.date.clone(),
            start_date: new.start_date.clone(),
            end_date: new.end_date.clone(),
            source_culture: new.source_culture.clone(),
        }
    }
}

/// Storage operations the relation import depends on.
pub trait RelationStore {
    /// Find an actor whose authorized form of name in `culture` is exactly `name`.
    ///
    /// When several actors share the name, the first row the store yields
    /// wins; no tie-break is applied.
    fn find_actor_by_authorized_name(&self, name: &str, culture: &str) -> Result<Option<Actor>>;

    /// Whether a relation `subject --type--> object` exists, in that direction only.
    fn relation_exists(&self, subject_id: i64, object_id: i64, type_id: i64) -> Result<bool>;

    /// Persist a relation and return its id.
    fn insert_relation(&mut self, relation: &NewRelation) -> Result<i64>;

    /// All term labels of a taxonomy, or `None` when the taxonomy does not exist.
    fn load_taxonomy(&self, taxonomy_id: i64) -> Result<Option<Vec<TermLabel>>>;
}
