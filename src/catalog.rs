//! Read-only verse catalog. The built-in set ships inside the binary so a
//! fresh install works without any data files next to it.

use std::collections::HashMap;

use crate::error::CatalogError;
use crate::models::{Verse, VerseId};

/// JSON array of `{ id, reference, text }` objects compiled into the binary.
const BUILTIN_VERSES: &str = include_str!("../data/verses.json");

/// Validated, immutable list of verses with an id index.
#[derive(Debug, Clone)]
pub struct VerseCatalog {
    verses: Vec<Verse>,
    index: HashMap<VerseId, usize>,
}

impl VerseCatalog {
    /// Build a catalog, rejecting empty input and duplicate ids.
    pub fn from_verses(verses: Vec<Verse>) -> Result<Self, CatalogError> {
        if verses.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut index = HashMap::with_capacity(verses.len());
        for (position, verse) in verses.iter().enumerate() {
            if index.insert(verse.id, position).is_some() {
                return Err(CatalogError::DuplicateId(verse.id));
            }
        }

        Ok(Self { verses, index })
    }

    /// Parse a catalog from its JSON representation.
    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        let verses: Vec<Verse> = serde_json::from_str(raw)?;
        Self::from_verses(verses)
    }

    /// The catalog embedded at compile time.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(BUILTIN_VERSES)
    }

    pub fn get(&self, id: VerseId) -> Option<&Verse> {
        self.index.get(&id).map(|&position| &self.verses[position])
    }

    pub fn contains(&self, id: VerseId) -> bool {
        self.index.contains_key(&id)
    }

    /// Verses in catalog order; random selection indexes into this.
    pub(crate) fn verses(&self) -> &[Verse] {
        &self.verses
    }

    pub fn len(&self) -> usize {
        self.verses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.verses.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Verse> {
        self.verses.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_loads() {
        let catalog = VerseCatalog::builtin().unwrap();
        assert!(catalog.len() > 1);
        assert_eq!(catalog.get(VerseId(3)).unwrap().reference, "Psalm 23:1");
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let result = VerseCatalog::from_verses(vec![
            Verse::new(1, "A 1:1", "first"),
            Verse::new(1, "B 1:1", "second"),
        ]);
        assert!(matches!(result, Err(CatalogError::DuplicateId(VerseId(1)))));
    }

    #[test]
    fn empty_catalog_is_rejected() {
        assert!(matches!(
            VerseCatalog::from_verses(Vec::new()),
            Err(CatalogError::Empty)
        ));
        assert!(matches!(
            VerseCatalog::from_json("[]"),
            Err(CatalogError::Empty)
        ));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(
            VerseCatalog::from_json("{\"id\": 1}"),
            Err(CatalogError::Parse(_))
        ));
    }

    #[test]
    fn lookup_by_id_and_position() {
        let catalog = VerseCatalog::from_verses(vec![
            Verse::new(10, "A 1:1", "first"),
            Verse::new(20, "B 1:1", "second"),
        ])
        .unwrap();
        assert!(catalog.contains(VerseId(20)));
        assert!(!catalog.contains(VerseId(30)));
        assert_eq!(catalog.verses()[1].id, VerseId(20));
        assert!(catalog.get(VerseId(30)).is_none());
    }
}
