//! Drives rows through a [`RowHandler`] in file order.

use serde::Serialize;

use super::handler::RowHandler;
use super::reader::{RowContext, RowError};
use super::{RowOutcome, RunContext, SkipReason};
use crate::error::Result;

/// Counts of row outcomes for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub rows: usize,
    pub persisted: usize,
    pub duplicates: usize,
    pub missing_actors: usize,
    pub self_relations: usize,
    pub errored: usize,
    pub indexed: bool,
}

impl ImportSummary {
    pub fn skipped(&self) -> usize {
        self.duplicates + self.missing_actors + self.self_relations
    }
}

/// What a run produced: outcome counts and the ids it wrote.
#[derive(Debug, Clone, Default)]
pub struct RunOutput {
    pub summary: ImportSummary,
    pub persisted_ids: Vec<i64>,
}

/// Generic row loop. A row that errors or is skipped never stops the run;
/// only an `Err` from the handler or a failed input stream does.
pub struct Orchestrator<H: RowHandler> {
    handler: H,
}

impl<H: RowHandler> Orchestrator<H> {
    pub fn new(handler: H) -> Self {
        Self { handler }
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    pub fn into_handler(self) -> H {
        self.handler
    }

    /// Process every row, strictly in order.
    pub fn run<I>(&mut self, ctx: &RunContext, rows: I) -> Result<RunOutput>
    where
        I: IntoIterator<Item = std::result::Result<RowContext, RowError>>,
    {
        let mut output = RunOutput::default();

        for item in rows {
            output.summary.rows += 1;
            let (line, outcome) = match item {
                Ok(row) => {
                    let outcome = self.handler.handle(ctx, &row)?;
                    (row.line, outcome)
                }
                Err(RowError::Malformed { line, message }) => (line, RowOutcome::Errored(message)),
                Err(RowError::Stream(e)) => return Err(e.into()),
            };
            log_outcome(line, &outcome);
            record(&mut output, outcome);
        }

        Ok(output)
    }
}

fn log_outcome(line: u64, outcome: &RowOutcome) {
    match outcome {
        RowOutcome::Persisted { relation_id } => {
            log::debug!("Row {}: created relation {}", line, relation_id);
        }
        RowOutcome::Skipped(SkipReason::Duplicate) => {
            log::debug!("Row {}: relation already exists, skipping", line);
        }
        RowOutcome::Skipped(SkipReason::MissingActor { role, name }) => {
            log::warn!("Row {}: Actor \"{}\" does not exist ({})", line, name, role);
        }
        RowOutcome::Skipped(SkipReason::SelfRelation { actor_id }) => {
            log::warn!("Row {}: source and target are the same actor ({}), skipping", line, actor_id);
        }
        RowOutcome::Errored(reason) => {
            log::error!("Row {}: {}", line, reason);
        }
    }
}

fn record(output: &mut RunOutput, outcome: RowOutcome) {
    let summary = &mut output.summary;
    match outcome {
        RowOutcome::Persisted { relation_id } => {
            summary.persisted += 1;
            output.persisted_ids.push(relation_id);
        }
        RowOutcome::Skipped(SkipReason::Duplicate) => summary.duplicates += 1,
        RowOutcome::Skipped(SkipReason::MissingActor { .. }) => summary.missing_actors += 1,
        RowOutcome::Skipped(SkipReason::SelfRelation { .. }) => summary.self_relations += 1,
        RowOutcome::Errored(_) => summary.errored += 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RelimportError;
    use crate::import::ActorRole;
    use crate::vocab::Vocabulary;
    use crate::store::TermLabel;
    use std::collections::VecDeque;

    /// Replays canned results and records which lines it saw.
    struct ScriptedHandler {
        script: VecDeque<Result<RowOutcome>>,
        seen: Vec<u64>,
    }

    impl RowHandler for ScriptedHandler {
        fn handle(&mut self, _ctx: &RunContext, row: &RowContext) -> Result<RowOutcome> {
            self.seen.push(row.line);
            self.script.pop_front().expect("script exhausted")
        }
    }

    fn ctx() -> RunContext {
        let vocabulary = Vocabulary::from_terms(
            55,
            &[TermLabel {
                term_id: 7,
                culture: "en".to_string(),
                name: "associated with".to_string(),
            }],
        )
        .unwrap();
        RunContext::new(vocabulary, false)
    }

    fn row(line: u64) -> std::result::Result<RowContext, RowError> {
        Ok(RowContext {
            line,
            ..Default::default()
        })
    }

    #[test]
    fn test_row_failures_do_not_stop_run() {
        let handler = ScriptedHandler {
            script: VecDeque::from(vec![
                Ok(RowOutcome::Errored("Unknown relationship type: x".to_string())),
                Ok(RowOutcome::Skipped(SkipReason::MissingActor {
                    role: ActorRole::Source,
                    name: "Nobody".to_string(),
                })),
                Ok(RowOutcome::Skipped(SkipReason::Duplicate)),
                Ok(RowOutcome::Skipped(SkipReason::SelfRelation { actor_id: 3 })),
                Ok(RowOutcome::Persisted { relation_id: 10 }),
            ]),
            seen: Vec::new(),
        };
        let rows = vec![
            row(2),
            Err(RowError::Malformed {
                line: 3,
                message: "found record with 2 fields".to_string(),
            }),
            row(4),
            row(5),
            row(6),
            row(7),
        ];

        let mut orchestrator = Orchestrator::new(handler);
        let output = orchestrator.run(&ctx(), rows).unwrap();

        assert_eq!(orchestrator.handler().seen, vec![2, 4, 5, 6, 7]);
        assert_eq!(
            output.summary,
            ImportSummary {
                rows: 6,
                persisted: 1,
                duplicates: 1,
                missing_actors: 1,
                self_relations: 1,
                errored: 2,
                indexed: false,
            }
        );
        assert_eq!(output.summary.skipped(), 3);
        assert_eq!(output.persisted_ids, vec![10]);
    }

    #[test]
    fn test_handler_error_aborts_run() {
        let handler = ScriptedHandler {
            script: VecDeque::from(vec![
                Ok(RowOutcome::Persisted { relation_id: 1 }),
                Err(RelimportError::Database(rusqlite::Error::InvalidQuery)),
            ]),
            seen: Vec::new(),
        };

        let mut orchestrator = Orchestrator::new(handler);
        let result = orchestrator.run(&ctx(), vec![row(2), row(3), row(4)]);

        assert!(matches!(result, Err(RelimportError::Database(_))));
        assert_eq!(orchestrator.into_handler().seen, vec![2, 3]);
    }

    #[test]
    fn test_empty_input() {
        let handler = ScriptedHandler {
            script: VecDeque::new(),
            seen: Vec::new(),
        };
        let output = Orchestrator::new(handler).run(&ctx(), Vec::new()).unwrap();
        assert_eq!(output.summary, ImportSummary::default());
    }
}
