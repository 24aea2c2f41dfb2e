use rusqlite::{params, Connection, OptionalExtension};

use super::{Actor, NewRelation, Relation, RelationStore, TermLabel};
use crate::error::{RelimportError, Result};

/// [`RelationStore`] over an open SQLite connection.
///
/// Borrows the connection so a whole run shares one connection that the
/// caller opens and closes.
pub struct SqliteStore<'c> {
    conn: &'c Connection,
}

impl<'c> SqliteStore<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    pub fn connection(&self) -> &'c Connection {
        self.conn
    }

    /// Insert or update an actor and its authorized name in `culture`.
    pub fn upsert_actor(&self, id: i64, culture: &str, authorized_form_of_name: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO actor (id, source_culture) VALUES (?1, ?2) ON CONFLICT(id) DO NOTHING",
            params![id, culture],
        )?;
        self.conn.execute(
            r#"
            INSERT INTO actor_i18n (id, culture, authorized_form_of_name)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(id, culture) DO UPDATE SET
                authorized_form_of_name = excluded.authorized_form_of_name
            "#,
            params![id, culture, authorized_form_of_name],
        )?;
        Ok(())
    }

    /// Create the taxonomy if it is missing.
    pub fn ensure_taxonomy(&self, taxonomy_id: i64, name: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO taxonomy (id, name) VALUES (?1, ?2) ON CONFLICT(id) DO NOTHING",
            params![taxonomy_id, name],
        )?;
        Ok(())
    }

    /// Insert or update a term and its label in `culture`.
    pub fn upsert_term(&self, taxonomy_id: i64, term_id: i64, culture: &str, name: &str) -> Result<()> {
        let existing: Option<i64> = self
            .conn
            .query_row(
                "SELECT taxonomy_id FROM term WHERE id = ?1",
                params![term_id],
                |row| row.get(0),
            )
            .optional()?;
        match existing {
            Some(owner) if owner != taxonomy_id => {
                return Err(RelimportError::InvalidInput(format!(
                    "Term {} already belongs to taxonomy {}",
                    term_id, owner
                )));
            }
            Some(_) => {}
            None => {
                self.conn.execute(
                    "INSERT INTO term (id, taxonomy_id) VALUES (?1, ?2)",
                    params![term_id, taxonomy_id],
                )?;
            }
        }
        self.conn.execute(
            r#"
            INSERT INTO term_i18n (id, culture, name) VALUES (?1, ?2, ?3)
            ON CONFLICT(id, culture) DO UPDATE SET name = excluded.name
            "#,
            params![term_id, culture, name],
        )?;
        Ok(())
    }

    /// Fetch a relation by id.
    pub fn get_relation(&self, id: i64) -> Result<Option<Relation>> {
        let relation = self
            .conn
            .query_row(
                r#"
                SELECT id, subject_id, object_id, type_id, description,
                       date, start_date, end_date, source_culture
                FROM relation WHERE id = ?1
                "#,
                params![id],
                |row| {
                    Ok(Relation {
                        id: row.get(0)?,
                        subject_id: row.get(1)?,
                        object_id: row.get(2)?,
                        type_id: row.get(3)?,
                        description: row.get(4)?,
                        date: row.get(5)?,
                        start_date: row.get(6)?,
                        end_date: row.get(7)?,
                        source_culture: row.get(8)?,
                    })
                },
            )
            .optional()?;
        Ok(relation)
    }

    /// Total number of relations.
    pub fn count_relations(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM relation", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

impl RelationStore for SqliteStore<'_> {
    fn find_actor_by_authorized_name(&self, name: &str, culture: &str) -> Result<Option<Actor>> {
        let actor = self
            .conn
            .query_row(
                r#"
                SELECT a.id, i.authorized_form_of_name, i.culture
                FROM actor a
                JOIN actor_i18n i ON i.id = a.id
                WHERE i.authorized_form_of_name = ?1 AND i.culture = ?2
                LIMIT 1
                "#,
                params![name, culture],
                |row| {
                    Ok(Actor {
                        id: row.get(0)?,
                        authorized_form_of_name: row.get(1)?,
                        culture: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(actor)
    }

    fn relation_exists(&self, subject_id: i64, object_id: i64, type_id: i64) -> Result<bool> {
        let mut stmt = self.conn.prepare(
            "SELECT id FROM relation WHERE subject_id = ?1 AND object_id = ?2 AND type_id = ?3",
        )?;
        Ok(stmt.exists(params![subject_id, object_id, type_id])?)
    }

    fn insert_relation(&mut self, relation: &NewRelation) -> Result<i64> {
        self.conn.execute(
            r#"
            INSERT INTO relation (
                subject_id, object_id, type_id, description,
                date, start_date, end_date, source_culture
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                relation.subject_id,
                relation.object_id,
                relation.type_id,
                relation.description,
                relation.date,
                relation.start_date,
                relation.end_date,
                relation.source_culture,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn load_taxonomy(&self, taxonomy_id: i64) -> Result<Option<Vec<TermLabel>>> {
        let exists = self
            .conn
            .prepare("SELECT id FROM taxonomy WHERE id = ?1")?
            .exists(params![taxonomy_id])?;
        if !exists {
            return Ok(None);
        }

        let mut stmt = self.conn.prepare(
            r#"
            SELECT t.id, i.culture, i.name
            FROM term t
            JOIN term_i18n i ON i.id = t.id
            WHERE t.taxonomy_id = ?1
            ORDER BY t.id, i.culture
            "#,
        )?;
        let labels = stmt
            .query_map(params![taxonomy_id], |row| {
                Ok(TermLabel {
                    term_id: row.get(0)?,
                    culture: row.get(1)?,
                    name: row.get(2)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;
        Ok(Some(labels))
    }
}
