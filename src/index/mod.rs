//! Search indexing of imported relations.
//!
//! Indexing is gated per run: bulk imports leave it off and rely on a later
//! full rebuild, `--index` makes new relations searchable immediately.

mod sqlite;

pub use sqlite::{sanitize_fts5_query, SqliteIndexer};

use crate::error::Result;

/// Which relations to (re)index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexScope {
    /// Only these relation ids.
    Relations(Vec<i64>),
    /// Every relation in the store.
    All,
}

/// Something that can make relations searchable.
pub trait SearchIndexer {
    /// Index the relations in `scope`, returning how many documents were written.
    fn reindex(&mut self, scope: &IndexScope) -> Result<usize>;
}

/// Run-level switch in front of a [`SearchIndexer`].
#[derive(Debug, Clone, Copy)]
pub struct IndexingTrigger {
    enabled: bool,
}

impl IndexingTrigger {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Reindex `scope` when enabled. Returns `None` without touching the
    /// indexer when disabled.
    pub fn notify<I: SearchIndexer + ?Sized>(
        &self,
        indexer: &mut I,
        scope: &IndexScope,
    ) -> Result<Option<usize>> {
        if !self.enabled {
            log::debug!("Search indexing disabled for this run");
            return Ok(None);
        }
        let count = indexer.reindex(scope)?;
        log::info!("Indexed {} relation(s) for search", count);
        Ok(Some(count))
    }
}
