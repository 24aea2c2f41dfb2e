use rusqlite::{Connection, params};
use std::fs;
use std::path::Path;
use crate::error::{Result, RelimportError};

/// Migration metadata
struct Migration {
    version: u32,
    name: String,
    sql: String,
}

/// Create schema_migrations table if it doesn't exist
fn ensure_migrations_table(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            applied_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )?;
    Ok(())
}

/// Get list of applied migrations
fn get_applied_migrations(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn.prepare("SELECT name FROM schema_migrations ORDER BY version")?;
    let names: Vec<String> = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()
        .map_err(RelimportError::Database)?;
    Ok(names)
}

/// Load migration files from migrations directory
fn load_migrations(migrations_dir: &Path) -> Result<Vec<Migration>> {
    let mut migrations = Vec::new();

    let entries = fs::read_dir(migrations_dir)
        .map_err(RelimportError::Io)?;

    let mut files: Vec<_> = entries
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().and_then(|s| s.to_str()) == Some("sql"))
        .collect();

    files.sort_by_key(|e| e.file_name());

    for entry in files {
        let path = entry.path();
        let filename = path.file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| RelimportError::Config("Invalid migration filename".to_string()))?;

        // "001_core_tables.sql" -> 1
        let version_str = filename
            .split('_')
            .next()
            .ok_or_else(|| RelimportError::Config(format!("Invalid migration filename: {}", filename)))?;
        let version: u32 = version_str.parse()
            .map_err(|_| RelimportError::Config(format!("Invalid migration version: {}", version_str)))?;

        let sql = fs::read_to_string(&path)
            .map_err(RelimportError::Io)?;

        let name = filename.trim_end_matches(".sql").to_string();

        migrations.push(Migration { version, name, sql });
    }

    migrations.sort_by_key(|m| m.version);

    Ok(migrations)
}

/// Run all pending migrations
pub fn run_migrations(conn: &mut Connection, migrations_dir: &Path) -> Result<()> {
    ensure_migrations_table(conn)?;

    let applied = get_applied_migrations(conn)?;
    let migrations = load_migrations(migrations_dir)?;

    for migration in migrations {
        if applied.contains(&migration.name) {
            log::debug!("Migration {} already applied, skipping", migration.name);
            continue;
        }

        log::info!("Applying migration: {} (version {})", migration.name, migration.version);

        let tx = conn.transaction()?;

        // execute_batch handles trigger bodies containing semicolons
        tx.execute_batch(&migration.sql)
            .map_err(|e| {
                RelimportError::Database(rusqlite::Error::SqliteFailure(
                    rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_ERROR),
                    Some(format!("Failed to execute migration {}: {}", migration.name, e))
                ))
            })?;

        tx.execute(
            "INSERT INTO schema_migrations (version, name) VALUES (?1, ?2)",
            params![migration.version, migration.name],
        )?;

        tx.commit()?;

        log::info!("Migration {} applied successfully", migration.name);
    }

    log::debug!("All migrations completed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use std::fs;

    fn names(conn: &Connection, sql: &str) -> Vec<String> {
        conn.prepare(sql)
            .unwrap()
            .query_map([], |row| row.get::<_, String>(0))
            .unwrap()
            .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()
            .unwrap()
    }

    #[test]
    fn test_migration_tracking() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");
        let conn = Connection::open(&db_path).unwrap();

        ensure_migrations_table(&conn).unwrap();

        conn.execute("CREATE TABLE test (id INTEGER)", []).unwrap();
        conn.execute(
            "INSERT INTO schema_migrations (version, name) VALUES (?1, ?2)",
            params![1, "001_test"],
        ).unwrap();

        let applied = get_applied_migrations(&conn).unwrap();
        assert!(applied.contains(&"001_test".to_string()));
    }

    #[test]
    fn test_load_migrations_sorted_by_version() {
        let temp_dir = TempDir::new().unwrap();
        let migrations_dir = temp_dir.path().join("migrations");
        fs::create_dir(&migrations_dir).unwrap();

        fs::write(
            migrations_dir.join("002_another.sql"),
            "CREATE TABLE another (id INTEGER);"
        ).unwrap();
        fs::write(
            migrations_dir.join("001_test.sql"),
            "CREATE TABLE test (id INTEGER);"
        ).unwrap();
        fs::write(migrations_dir.join("README.txt"), "not a migration").unwrap();

        let migrations = load_migrations(&migrations_dir).unwrap();
        assert_eq!(migrations.len(), 2);
        assert_eq!(migrations[0].version, 1);
        assert_eq!(migrations[1].version, 2);
    }

    #[test]
    fn test_run_migrations_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let mut conn = Connection::open(temp_dir.path().join("test.db")).unwrap();
        let migrations_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("migrations");

        run_migrations(&mut conn, &migrations_dir).unwrap();
        let first = get_applied_migrations(&conn).unwrap();
        run_migrations(&mut conn, &migrations_dir).unwrap();
        let second = get_applied_migrations(&conn).unwrap();

        assert!(!first.is_empty());
        assert_eq!(first, second);
    }

    #[test]
    fn test_full_migration_schema() {
        let temp_dir = TempDir::new().unwrap();
        let mut conn = Connection::open(temp_dir.path().join("test.db")).unwrap();
        let migrations_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("migrations");
        run_migrations(&mut conn, &migrations_dir).unwrap();

        let tables = names(&conn, "SELECT name FROM sqlite_master WHERE type='table' ORDER BY name");
        for expected in [
            "actor",
            "actor_i18n",
            "import_runs",
            "relation",
            "relation_fts",
            "schema_migrations",
            "taxonomy",
            "term",
            "term_i18n",
        ] {
            assert!(tables.contains(&expected.to_string()), "missing table {}", expected);
        }

        let indexes = names(
            &conn,
            "SELECT name FROM sqlite_master WHERE type='index' AND name LIKE 'idx_%' ORDER BY name",
        );
        assert!(indexes.contains(&"idx_relation_subject_object_type".to_string()));
        assert!(indexes.contains(&"idx_actor_i18n_name_culture".to_string()));
    }
}
