//! In-memory catalog of Pokémon Go entries
//!
//! The catalog is built once from a dataset file and never modified. It is
//! shared read-only between the retriever and the front end.

pub mod entry;
pub mod loader;

pub use entry::{columns, Entry, MoveStats, REQUIRED_COLUMNS};
pub use loader::{load, load_auto, Cell, DataFormat, RawTable};

use crate::errors::Result;

/// Ordered, immutable sequence of entries
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    entries: Vec<Entry>,
}

impl Catalog {
    /// Create a catalog from already-typed entries
    pub fn new(entries: Vec<Entry>) -> Self {
        Self { entries }
    }

    /// Validate and convert a raw table
    pub fn from_table(table: &RawTable) -> Result<Self> {
        Ok(Self::new(entry::entries_from_table(table)?))
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Entry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<Vec<Entry>> for Catalog {
    fn from(entries: Vec<Entry>) -> Self {
        Self::new(entries)
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Entry;
    type IntoIter = std::slice::Iter<'a, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
