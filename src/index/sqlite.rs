use rusqlite::{params, Connection};

use super::{IndexScope, SearchIndexer};
use crate::error::{RelimportError, Result};

/// Joins a relation with its actor names and type label in the relation's
/// own culture.
const INDEX_SELECT: &str = r#"
    SELECT r.id,
           COALESCE(s.authorized_form_of_name, ''),
           COALESCE(o.authorized_form_of_name, ''),
           COALESCE(t.name, ''),
           COALESCE(r.description, '')
    FROM relation r
    LEFT JOIN actor_i18n s ON s.id = r.subject_id AND s.culture = r.source_culture
    LEFT JOIN actor_i18n o ON o.id = r.object_id AND o.culture = r.source_culture
    LEFT JOIN term_i18n t ON t.id = r.type_id AND t.culture = r.source_culture
"#;

/// Writes relations into the `relation_fts` FTS5 table.
pub struct SqliteIndexer<'c> {
    conn: &'c Connection,
}

impl<'c> SqliteIndexer<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    fn index_relation(&self, relation_id: i64) -> Result<usize> {
        self.conn.execute(
            "DELETE FROM relation_fts WHERE relation_id = ?1",
            params![relation_id],
        )?;
        let sql = format!(
            "INSERT INTO relation_fts (relation_id, subject_name, object_name, type_label, description) {} WHERE r.id = ?1",
            INDEX_SELECT
        );
        Ok(self.conn.execute(&sql, params![relation_id])?)
    }

    fn rebuild(&self) -> Result<usize> {
        self.conn.execute("DELETE FROM relation_fts", [])?;
        let sql = format!(
            "INSERT INTO relation_fts (relation_id, subject_name, object_name, type_label, description) {}",
            INDEX_SELECT
        );
        Ok(self.conn.execute(&sql, [])?)
    }

    /// Full-text search over indexed relations, best match first.
    pub fn search(&self, query: &str, limit: usize) -> Result<Vec<i64>> {
        let sanitized = sanitize_fts5_query(query);
        if sanitized.is_empty() {
            return Ok(Vec::new());
        }

        let mut stmt = self.conn.prepare(
            r#"
            SELECT relation_id FROM relation_fts
            WHERE relation_fts MATCH ?1
            ORDER BY bm25(relation_fts)
            LIMIT ?2
            "#,
        )?;
        let ids = stmt
            .query_map(params![sanitized, limit as i64], |row| row.get::<_, i64>(0))?
            .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()
            .map_err(RelimportError::Database)?;
        Ok(ids)
    }
}

impl SearchIndexer for SqliteIndexer<'_> {
    fn reindex(&mut self, scope: &IndexScope) -> Result<usize> {
        match scope {
            IndexScope::All => self.rebuild(),
            IndexScope::Relations(ids) => {
                let mut count = 0;
                for id in ids {
                    count += self.index_relation(*id)?;
                }
                Ok(count)
            }
        }
    }
}

/// Turn free text into an FTS5 query: drop syntax characters, quote each
/// term, and OR the terms together.
pub fn sanitize_fts5_query(query: &str) -> String {
    let cleaned: String = query
        .chars()
        .filter(|c| !matches!(c, '?' | '*' | '(' | ')' | '{' | '}' | '-' | '\'' | '"' | ':' | '^'))
        .collect();

    cleaned
        .split_whitespace()
        .map(|term| format!("\"{}\"", term))
        .collect::<Vec<_>>()
        .join(" OR ")
}
