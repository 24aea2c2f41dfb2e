//! Per-row strategy for the import orchestrator.

use super::dedup::relation_exists;
use super::reader::RowContext;
use super::resolver::EntityResolver;
use super::{ActorRole, RowOutcome, RunContext, SkipReason};
use crate::error::Result;
use crate::store::{NewRelation, RelationStore};

/// Processes one row to a terminal [`RowOutcome`].
///
/// `Err` is reserved for failures that make the rest of the run pointless
/// (storage errors); anything specific to the row is an outcome.
pub trait RowHandler {
    fn handle(&mut self, ctx: &RunContext, row: &RowContext) -> Result<RowOutcome>;
}

/// Creates actor relations from rows.
pub struct RelationRowHandler<'s, S: RelationStore + ?Sized> {
    store: &'s mut S,
    resolver: EntityResolver,
}

impl<'s, S: RelationStore + ?Sized> RelationRowHandler<'s, S> {
    pub fn new(store: &'s mut S, resolver: EntityResolver) -> Self {
        Self { store, resolver }
    }

    pub fn resolver(&self) -> &EntityResolver {
        &self.resolver
    }
}

impl<S: RelationStore + ?Sized> RowHandler for RelationRowHandler<'_, S> {
    fn handle(&mut self, ctx: &RunContext, row: &RowContext) -> Result<RowOutcome> {
        let Some(type_id) = ctx.vocabulary.type_id(&row.culture, &row.category) else {
            return Ok(RowOutcome::Errored(format!(
                "Unknown relationship type: {}",
                row.category
            )));
        };

        let source = self
            .resolver
            .resolve(&*self.store, &row.source_name, &row.culture)?;
        let Some(source) = source else {
            return Ok(RowOutcome::Skipped(SkipReason::MissingActor {
                role: ActorRole::Source,
                name: row.source_name.clone(),
            }));
        };

        let target = self
            .resolver
            .resolve(&*self.store, &row.target_name, &row.culture)?;
        let Some(target) = target else {
            return Ok(RowOutcome::Skipped(SkipReason::MissingActor {
                role: ActorRole::Target,
                name: row.target_name.clone(),
            }));
        };

        if source.id == target.id {
            return Ok(RowOutcome::Skipped(SkipReason::SelfRelation { actor_id: source.id }));
        }

        if relation_exists(&*self.store, source.id, target.id, type_id)? {
            return Ok(RowOutcome::Skipped(SkipReason::Duplicate));
        }

        // Empty cells were already dropped by the reader, so `None` keeps the column default.
        let relation = NewRelation {
            subject_id: source.id,
            object_id: target.id,
            type_id,
            description: row.description.clone(),
            date: row.date.clone(),
            start_date: row.start_date.clone(),
            end_date: row.end_date.clone(),
            source_culture: row.culture.clone(),
        };
        let relation_id = self.store.insert_relation(&relation)?;

        Ok(RowOutcome::Persisted { relation_id })
    }
}
