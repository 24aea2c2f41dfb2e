//! CSV relation import: read rows, resolve actors and relation types, skip
//! duplicates, persist, then optionally index.

pub mod dedup;
pub mod handler;
pub mod orchestrator;
pub mod reader;
pub mod resolver;
pub mod run;

use std::fmt;

use serde::Serialize;

use crate::vocab::Vocabulary;

pub use handler::{RelationRowHandler, RowHandler};
pub use orchestrator::{ImportSummary, Orchestrator, RunOutput};
pub use reader::{CsvRowReader, RowContext, RowError};
pub use resolver::EntityResolver;
pub use run::{import_rows, run_import, ImportOptions};

/// Read-only state shared by every stage of one run.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub vocabulary: Vocabulary,
    pub index_enabled: bool,
}

impl RunContext {
    pub fn new(vocabulary: Vocabulary, index_enabled: bool) -> Self {
        Self {
            vocabulary,
            index_enabled,
        }
    }
}

/// Which side of a relation an actor was named on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ActorRole {
    Source,
    Target,
}

impl fmt::Display for ActorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActorRole::Source => write!(f, "source"),
            ActorRole::Target => write!(f, "target"),
        }
    }
}

/// Why a row was dropped without writing anything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SkipReason {
    /// An actor name did not resolve in the row's culture.
    MissingActor { role: ActorRole, name: String },
    /// The relation already exists in one direction or the other.
    Duplicate,
    /// Source and target resolved to the same actor.
    SelfRelation { actor_id: i64 },
}

/// Terminal state of a single row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum RowOutcome {
    Persisted { relation_id: i64 },
    Skipped(SkipReason),
    Errored(String),
}
