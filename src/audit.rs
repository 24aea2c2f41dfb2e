//! Import run audit trail.

use chrono::Utc;
use rusqlite::{params, Connection};
use serde::Serialize;
use uuid::Uuid;

use crate::error::{RelimportError, Result};
use crate::import::ImportSummary;

/// One row of `import_runs`.
#[derive(Debug, Clone, Serialize)]
pub struct ImportRunRecord {
    pub run_id: String,
    pub filename: String,
    /// SHA-256 of the bytes read; `None` until the run finishes.
    pub file_hash: Option<String>,
    pub started_at: String,
    /// `None` when the run aborted before finishing.
    pub finished_at: Option<String>,
    pub rows_read: i64,
    pub persisted: i64,
    pub duplicates: i64,
    pub missing_actors: i64,
    pub self_relations: i64,
    pub errored: i64,
    pub indexed: bool,
}

/// Record the start of a run. Returns the generated run_id (UUID).
pub fn start_run(conn: &Connection, filename: &str) -> Result<String> {
    let run_id = Uuid::new_v4().to_string();
    conn.execute(
        "INSERT INTO import_runs (run_id, filename, started_at) VALUES (?1, ?2, ?3)",
        params![run_id, filename, Utc::now().to_rfc3339()],
    )?;
    Ok(run_id)
}

/// Record the input hash and outcome counts of a finished run.
pub fn finish_run(
    conn: &Connection,
    run_id: &str,
    file_hash: &str,
    summary: &ImportSummary,
) -> Result<()> {
    let updated = conn.execute(
        r#"
        UPDATE import_runs SET
            finished_at = ?2,
            file_hash = ?3,
            rows_read = ?4,
            persisted = ?5,
            duplicates = ?6,
            missing_actors = ?7,
            self_relations = ?8,
            errored = ?9,
            indexed = ?10
        WHERE run_id = ?1
        "#,
        params![
            run_id,
            Utc::now().to_rfc3339(),
            file_hash,
            summary.rows as i64,
            summary.persisted as i64,
            summary.duplicates as i64,
            summary.missing_actors as i64,
            summary.self_relations as i64,
            summary.errored as i64,
            summary.indexed,
        ],
    )?;
    if updated == 0 {
        return Err(RelimportError::NotFound(format!("import run {}", run_id)));
    }
    Ok(())
}

/// Most recent runs first.
pub fn recent_runs(conn: &Connection, limit: usize) -> Result<Vec<ImportRunRecord>> {
    let mut stmt = conn.prepare(
        r#"
        SELECT run_id, filename, file_hash, started_at, finished_at,
               rows_read, persisted, duplicates, missing_actors, self_relations,
               errored, indexed
        FROM import_runs
        ORDER BY started_at DESC
        LIMIT ?1
        "#,
    )?;
    let runs = stmt
        .query_map(params![limit as i64], |row| {
            Ok(ImportRunRecord {
                run_id: row.get(0)?,
                filename: row.get(1)?,
                file_hash: row.get(2)?,
                started_at: row.get(3)?,
                finished_at: row.get(4)?,
                rows_read: row.get(5)?,
                persisted: row.get(6)?,
                duplicates: row.get(7)?,
                missing_actors: row.get(8)?,
                self_relations: row.get(9)?,
                errored: row.get(10)?,
                indexed: row.get(11)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;
    Ok(runs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrate;
    use std::path::Path;
    use tempfile::TempDir;

    fn setup_conn() -> (Connection, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let mut conn = Connection::open(temp_dir.path().join("test.db")).unwrap();
        let migrations_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("migrations");
        migrate::run_migrations(&mut conn, &migrations_dir).unwrap();
        (conn, temp_dir)
    }

    #[test]
    fn test_start_and_finish_run() {
        let (conn, _temp) = setup_conn();
        let run_id = start_run(&conn, "relations.csv").unwrap();

        let pending = recent_runs(&conn, 10).unwrap();
        assert_eq!(pending.len(), 1);
        assert!(pending[0].finished_at.is_none());
        assert!(pending[0].file_hash.is_none());

        let summary = ImportSummary {
            rows: 4,
            persisted: 2,
            duplicates: 1,
            missing_actors: 1,
            self_relations: 0,
            errored: 0,
            indexed: true,
        };
        finish_run(&conn, &run_id, "abc123", &summary).unwrap();

        let runs = recent_runs(&conn, 10).unwrap();
        let run = &runs[0];
        assert_eq!(run.run_id, run_id);
        assert_eq!(run.filename, "relations.csv");
        assert_eq!(run.file_hash.as_deref(), Some("abc123"));
        assert!(run.finished_at.is_some());
        assert_eq!((run.rows_read, run.persisted, run.duplicates), (4, 2, 1));
        assert!(run.indexed);
    }

    #[test]
    fn test_finish_unknown_run() {
        let (conn, _temp) = setup_conn();
        let result = finish_run(&conn, "missing", "abc123", &ImportSummary::default());
        assert!(matches!(result, Err(RelimportError::NotFound(_))));
    }
}
