use rusqlite::Connection;
use std::path::{Path, PathBuf};
use tokio::task;
use crate::error::{Result, RelimportError};

/// Pragmas applied to every connection.
const CONNECTION_PRAGMAS: &str = "PRAGMA journal_mode = WAL; \
     PRAGMA synchronous = NORMAL; \
     PRAGMA foreign_keys = ON; \
     PRAGMA temp_store = MEMORY; \
     PRAGMA cache_size = -65536;";

/// Database connection wrapper
#[derive(Debug, Clone)]
pub struct Db {
    path: PathBuf,
}

impl Db {
    /// Create a new database connection manager
    pub fn new<P: AsRef<Path>>(db_path: P) -> Self {
        Self {
            path: db_path.as_ref().to_path_buf(),
        }
    }

    /// Path of the underlying SQLite file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open a new database connection with pragmas applied
    pub fn open_connection(&self) -> Result<Connection> {
        open(&self.path)
    }

    /// Execute a closure with a database connection in a blocking task
    ///
    /// The connection lives only for the duration of the closure and is
    /// closed on every exit path, including errors returned by `f`.
    pub async fn with_connection<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let path = self.path.clone();
        task::spawn_blocking(move || {
            let mut conn = open(&path)?;
            f(&mut conn)
        })
        .await
        .map_err(|e| RelimportError::Config(format!("Database task failed: {}", e)))?
    }
}

fn open(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path).map_err(RelimportError::Database)?;
    conn.execute_batch(CONNECTION_PRAGMAS)?;
    Ok(conn)
}

pub mod migrate;

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_db_connection() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");
        let db = Db::new(&db_path);

        let result = db.with_connection(|conn| {
            conn.execute("CREATE TABLE test (id INTEGER PRIMARY KEY)", [])
                .map_err(RelimportError::Database)?;
            Ok(())
        }).await;

        assert!(result.is_ok());
        assert!(db_path.exists());
    }

    #[tokio::test]
    async fn test_pragmas_set() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");
        let db = Db::new(&db_path);

        db.with_connection(|conn| {
            let journal_mode: String = conn.query_row(
                "PRAGMA journal_mode",
                [],
                |row| row.get(0)
            )?;
            assert_eq!(journal_mode.to_uppercase(), "WAL");

            let foreign_keys: i32 = conn.query_row(
                "PRAGMA foreign_keys",
                [],
                |row| row.get(0)
            )?;
            assert_eq!(foreign_keys, 1);

            Ok::<(), RelimportError>(())
        }).await.unwrap();
    }

    #[tokio::test]
    async fn test_closure_error_propagates() {
        let temp_dir = TempDir::new().unwrap();
        let db = Db::new(temp_dir.path().join("test.db"));

        let result: Result<()> = db
            .with_connection(|_conn| Err(RelimportError::InvalidInput("boom".to_string())))
            .await;

        assert!(matches!(result, Err(RelimportError::InvalidInput(_))));
    }
}
