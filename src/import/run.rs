//! Entry points for a whole import run.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use rusqlite::Connection;
use sha2::{Digest, Sha256};

use super::handler::RelationRowHandler;
use super::orchestrator::{ImportSummary, Orchestrator, RunOutput};
use super::reader::CsvRowReader;
use super::resolver::EntityResolver;
use super::RunContext;
use crate::audit;
use crate::config::ImportConfig;
use crate::error::{RelimportError, Result};
use crate::index::{IndexScope, IndexingTrigger, SearchIndexer, SqliteIndexer};
use crate::store::{RelationStore, SqliteStore};
use crate::vocab::load_vocabulary;

/// Per-run settings.
#[derive(Debug, Clone)]
pub struct ImportOptions {
    pub taxonomy_id: i64,
    pub default_culture: String,
    /// Index persisted relations for search after the last row.
    pub index: bool,
    pub actor_cache_capacity: usize,
}

impl ImportOptions {
    /// Options from configuration; `index_flag` can only turn indexing on.
    pub fn from_config(config: &ImportConfig, index_flag: bool) -> Self {
        Self {
            taxonomy_id: config.taxonomy_id,
            default_culture: config.default_culture.clone(),
            index: index_flag || config.index_by_default,
            actor_cache_capacity: config.actor_cache_capacity,
        }
    }
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self::from_config(&ImportConfig::default(), false)
    }
}

/// Import relations from CSV `input` into `store`.
///
/// Loads the vocabulary and reads the header before touching any row; both
/// failures abort the run. Afterwards the indexer is notified once, and only
/// if indexing is enabled.
pub fn import_rows<S, X, R>(
    store: &mut S,
    indexer: &mut X,
    input: R,
    options: &ImportOptions,
) -> Result<RunOutput>
where
    S: RelationStore + ?Sized,
    X: SearchIndexer + ?Sized,
    R: Read,
{
    let vocabulary = load_vocabulary(&*store, options.taxonomy_id)?;
    let rows = CsvRowReader::new(input, &options.default_culture)?;
    let ctx = RunContext::new(vocabulary, options.index);

    let handler = RelationRowHandler::new(store, EntityResolver::new(options.actor_cache_capacity));
    let mut orchestrator = Orchestrator::new(handler);
    let mut output = orchestrator.run(&ctx, rows)?;

    let (hits, lookups) = orchestrator.handler().resolver().stats();
    log::debug!("Actor lookups: {} ({} served from cache)", lookups, hits);

    let trigger = IndexingTrigger::new(ctx.index_enabled);
    let scope = IndexScope::Relations(output.persisted_ids.clone());
    output.summary.indexed = trigger.notify(indexer, &scope)?.is_some();

    Ok(output)
}

/// Import the CSV file at `path` into the SQLite database behind `conn`.
///
/// The run is recorded in `import_runs`; a run that aborts keeps its row
/// with no `finished_at`.
pub fn run_import(conn: &Connection, path: &Path, options: &ImportOptions) -> Result<ImportSummary> {
    log::info!("Importing relations...");

    let file = File::open(path).map_err(|e| {
        RelimportError::InvalidInput(format!(
            "You must specify a valid filename: {} ({})",
            path.display(),
            e
        ))
    })?;
    let run_id = audit::start_run(conn, &path.display().to_string())?;

    let mut input = HashingReader::new(file);
    let mut store = SqliteStore::new(conn);
    let mut indexer = SqliteIndexer::new(conn);
    let output = import_rows(&mut store, &mut indexer, &mut input, options)?;
    let summary = output.summary;

    audit::finish_run(conn, &run_id, &input.finalize(), &summary)?;

    log::info!(
        "Rows: {}, created: {}, skipped: {} ({} duplicate, {} missing actor, {} self), errors: {}",
        summary.rows,
        summary.persisted,
        summary.skipped(),
        summary.duplicates,
        summary.missing_actors,
        summary.self_relations,
        summary.errored
    );
    log::info!("Done.");

    Ok(summary)
}

/// Feeds every byte read through SHA-256, so the hash covers exactly what
/// the import consumed.
pub struct HashingReader<R> {
    inner: R,
    hasher: Sha256,
}

impl<R: Read> HashingReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            hasher: Sha256::new(),
        }
    }

    /// Hex-encoded digest of the bytes read so far.
    pub fn finalize(self) -> String {
        format!("{:x}", self.hasher.finalize())
    }
}

impl<R: Read> Read for HashingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.hasher.update(&buf[..n]);
        Ok(n)
    }
}
