//! TOML fixtures for actors and relation type terms.
//!
//! ```toml
//! [taxonomy]
//! name = "Actor relation type"
//!
//! [[actors]]
//! id = 1
//! culture = "en"
//! name = "Alice"
//!
//! [[terms]]
//! id = 7
//! culture = "en"
//! name = "associated with"
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::error::{RelimportError, Result};
use crate::store::SqliteStore;

#[derive(Debug, Clone, Deserialize)]
pub struct SeedFile {
    #[serde(default)]
    pub taxonomy: SeedTaxonomy,
    #[serde(default)]
    pub actors: Vec<SeedLabel>,
    #[serde(default)]
    pub terms: Vec<SeedLabel>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedTaxonomy {
    #[serde(default = "default_taxonomy_name")]
    pub name: String,
}

impl Default for SeedTaxonomy {
    fn default() -> Self {
        Self {
            name: default_taxonomy_name(),
        }
    }
}

fn default_taxonomy_name() -> String {
    "Actor relation type".to_string()
}

/// An id with a name in one culture.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedLabel {
    pub id: i64,
    pub culture: String,
    pub name: String,
}

/// How many records a seed wrote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedCounts {
    pub actors: usize,
    pub terms: usize,
}

/// Parse a seed file.
pub fn load_seed_file(path: &Path) -> Result<SeedFile> {
    let content = std::fs::read_to_string(path)?;
    let seed: SeedFile = toml::from_str(&content)?;
    for label in seed.actors.iter().chain(seed.terms.iter()) {
        if label.name.trim().is_empty() || label.culture.trim().is_empty() {
            return Err(RelimportError::InvalidInput(format!(
                "Seed entry {} needs a non-empty name and culture",
                label.id
            )));
        }
    }
    Ok(seed)
}

/// Write a seed into the store under `taxonomy_id`. Re-applying is safe.
pub fn apply_seed(store: &SqliteStore, seed: &SeedFile, taxonomy_id: i64) -> Result<SeedCounts> {
    store.ensure_taxonomy(taxonomy_id, &seed.taxonomy.name)?;

    for actor in &seed.actors {
        store.upsert_actor(actor.id, &actor.culture, &actor.name)?;
    }
    for term in &seed.terms {
        store.upsert_term(taxonomy_id, term.id, &term.culture, &term.name)?;
    }

    Ok(SeedCounts {
        actors: seed.actors.len(),
        terms: seed.terms.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrate;
    use crate::store::RelationStore;
    use rusqlite::Connection;
    use std::fs;
    use tempfile::TempDir;

    const SEED: &str = r#"
[[actors]]
id = 1
culture = "en"
name = "Alice"

[[actors]]
id = 2
culture = "en"
name = "Bob"

[[terms]]
id = 7
culture = "en"
name = "associated with"
"#;

    #[test]
    fn test_load_and_apply_seed_twice() {
        let temp_dir = TempDir::new().unwrap();
        let seed_path = temp_dir.path().join("seed.toml");
        fs::write(&seed_path, SEED).unwrap();

        let mut conn = Connection::open(temp_dir.path().join("test.db")).unwrap();
        let migrations_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("migrations");
        migrate::run_migrations(&mut conn, &migrations_dir).unwrap();
        let store = SqliteStore::new(&conn);

        let seed = load_seed_file(&seed_path).unwrap();
        assert_eq!(seed.taxonomy.name, "Actor relation type");
        let counts = apply_seed(&store, &seed, 55).unwrap();
        assert_eq!(counts, SeedCounts { actors: 2, terms: 1 });
        apply_seed(&store, &seed, 55).unwrap();

        assert_eq!(store.load_taxonomy(55).unwrap().unwrap().len(), 1);
        assert!(store.find_actor_by_authorized_name("Bob", "en").unwrap().is_some());
    }

    #[test]
    fn test_seed_rejects_blank_name() {
        let temp_dir = TempDir::new().unwrap();
        let seed_path = temp_dir.path().join("seed.toml");
        fs::write(&seed_path, "[[actors]]\nid = 1\nculture = \"en\"\nname = \"\"\n").unwrap();

        let err = load_seed_file(&seed_path).unwrap_err();
        assert!(matches!(err, RelimportError::InvalidInput(_)));
    }
}
