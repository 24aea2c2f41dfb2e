use std::collections::HashMap;

use super::{Actor, NewRelation, Relation, RelationStore, TermLabel};
use crate::error::Result;

/// In-memory [`RelationStore`] for tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    actors: Vec<Actor>,
    taxonomies: HashMap<i64, Vec<TermLabel>>,
    relations: Vec<Relation>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_actor(&mut self, id: i64, culture: &str, name: &str) {
        self.actors.push(Actor {
            id,
            authorized_form_of_name: name.to_string(),
            culture: culture.to_string(),
        });
    }

    /// Register an empty taxonomy.
    pub fn add_taxonomy(&mut self, taxonomy_id: i64) {
        self.taxonomies.entry(taxonomy_id).or_default();
    }

    pub fn add_term(&mut self, taxonomy_id: i64, term_id: i64, culture: &str, name: &str) {
        self.taxonomies.entry(taxonomy_id).or_default().push(TermLabel {
            term_id,
            culture: culture.to_string(),
            name: name.to_string(),
        });
    }

    pub fn relations(&self) -> &[Relation] {
        &self.relations
    }
}

impl RelationStore for MemoryStore {
    fn find_actor_by_authorized_name(&self, name: &str, culture: &str) -> Result<Option<Actor>> {
        Ok(self
            .actors
            .iter()
            .find(|a| a.authorized_form_of_name == name && a.culture == culture)
            .cloned())
    }

    fn relation_exists(&self, subject_id: i64, object_id: i64, type_id: i64) -> Result<bool> {
        Ok(self.relations.iter().any(|r| {
            r.subject_id == subject_id && r.object_id == object_id && r.type_id == type_id
        }))
    }

    fn insert_relation(&mut self, relation: &NewRelation) -> Result<i64> {
        let id = self.relations.len() as i64 + 1;
        self.relations.push(Relation::from_new(id, relation));
        Ok(id)
    }

    fn load_taxonomy(&self, taxonomy_id: i64) -> Result<Option<Vec<TermLabel>>> {
        Ok(self.taxonomies.get(&taxonomy_id).cloned())
    }
}
