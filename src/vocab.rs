//! Controlled vocabulary of relation types, keyed by culture then label.

use std::collections::HashMap;

use crate::error::{RelimportError, Result};
use crate::store::{RelationStore, TermLabel};

/// Immutable `culture -> (label -> term id)` mapping for one taxonomy.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    taxonomy_id: i64,
    labels: HashMap<String, HashMap<String, i64>>,
}

impl Vocabulary {
    /// Build a vocabulary from term labels.
    ///
    /// Labels are taken in the given order; if the same label appears twice in
    /// one culture, the first term keeps it.
    pub fn from_terms(taxonomy_id: i64, terms: &[TermLabel]) -> Result<Self> {
        if terms.is_empty() {
            return Err(RelimportError::Vocabulary(format!(
                "Taxonomy {} has no terms",
                taxonomy_id
            )));
        }

        let mut labels: HashMap<String, HashMap<String, i64>> = HashMap::new();
        for term in terms {
            let by_label = labels.entry(term.culture.clone()).or_default();
            match by_label.get(&term.name) {
                Some(&existing) if existing != term.term_id => {
                    log::warn!(
                        "Label \"{}\" ({}) is used by terms {} and {}; using {}",
                        term.name,
                        term.culture,
                        existing,
                        term.term_id,
                        existing
                    );
                }
                Some(_) => {}
                None => {
                    by_label.insert(term.name.clone(), term.term_id);
                }
            }
        }

        Ok(Self { taxonomy_id, labels })
    }

    pub fn taxonomy_id(&self) -> i64 {
        self.taxonomy_id
    }

    /// Term id for `label` in `culture`, if any.
    pub fn type_id(&self, culture: &str, label: &str) -> Option<i64> {
        self.labels.get(culture)?.get(label).copied()
    }

    /// Number of distinct labels across all cultures.
    pub fn len(&self) -> usize {
        self.labels.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn cultures(&self) -> impl Iterator<Item = &str> {
        self.labels.keys().map(String::as_str)
    }
}

/// Load the vocabulary of `taxonomy_id` from the store.
///
/// Fails with [`RelimportError::Vocabulary`] when the taxonomy is absent or
/// has no labelled terms.
pub fn load_vocabulary<S: RelationStore + ?Sized>(store: &S, taxonomy_id: i64) -> Result<Vocabulary> {
    let terms = store.load_taxonomy(taxonomy_id)?.ok_or_else(|| {
        RelimportError::Vocabulary(format!("Taxonomy {} does not exist", taxonomy_id))
    })?;
    let vocabulary = Vocabulary::from_terms(taxonomy_id, &terms)?;
    let mut cultures: Vec<&str> = vocabulary.cultures().collect();
    cultures.sort_unstable();
    log::debug!(
        "Loaded {} relation type labels from taxonomy {} ({})",
        vocabulary.len(),
        taxonomy_id,
        cultures.join(", ")
    );
    Ok(vocabulary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn label(term_id: i64, culture: &str, name: &str) -> TermLabel {
        TermLabel {
            term_id,
            culture: culture.to_string(),
            name: name.to_string(),
        }
    }

    #[test]
    fn test_lookup_is_culture_scoped() {
        let vocab = Vocabulary::from_terms(
            55,
            &[
                label(7, "en", "associated with"),
                label(7, "fr", "associé à"),
                label(8, "en", "is the parent of"),
            ],
        )
        .unwrap();

        assert_eq!(vocab.type_id("en", "associated with"), Some(7));
        assert_eq!(vocab.type_id("fr", "associé à"), Some(7));
        assert_eq!(vocab.type_id("fr", "associated with"), None);
        assert_eq!(vocab.type_id("de", "associated with"), None);
        assert_eq!(vocab.len(), 3);

        let mut cultures: Vec<&str> = vocab.cultures().collect();
        cultures.sort_unstable();
        assert_eq!(cultures, vec!["en", "fr"]);
    }

    #[test]
    fn test_duplicate_label_keeps_first_term() {
        let vocab = Vocabulary::from_terms(
            55,
            &[label(7, "en", "related"), label(9, "en", "related")],
        )
        .unwrap();
        assert_eq!(vocab.type_id("en", "related"), Some(7));
    }

    #[test]
    fn test_missing_taxonomy_is_vocabulary_error() {
        let store = MemoryStore::new();
        let err = load_vocabulary(&store, 55).unwrap_err();
        assert!(matches!(err, RelimportError::Vocabulary(_)));
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn test_empty_taxonomy_is_vocabulary_error() {
        let mut store = MemoryStore::new();
        store.add_taxonomy(55);
        let err = load_vocabulary(&store, 55).unwrap_err();
        assert!(err.to_string().contains("no terms"));
    }

    #[test]
    fn test_load_from_store() {
        let mut store = MemoryStore::new();
        store.add_term(55, 7, "en", "associated with");
        let vocab = load_vocabulary(&store, 55).unwrap();
        assert_eq!(vocab.taxonomy_id(), 55);
        assert_eq!(vocab.type_id("en", "associated with"), Some(7));
    }
}
