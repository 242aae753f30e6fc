// Retriever: name search and DPS lookups over the catalog
use std::sync::Arc;

use crate::catalog::{Catalog, Entry};
use crate::errors::{QaError, Result};
use crate::rag::ranking::{DpsScore, DpsTable, ScoredEntry};

/// Read-only lookups against a shared catalog
///
/// All operations take `&self` and never modify the catalog, so one
/// retriever can serve any number of callers.
#[derive(Debug, Clone)]
pub struct Retriever {
    catalog: Arc<Catalog>,
}

impl Retriever {
    /// Create new retriever over a loaded catalog
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog: Arc::new(catalog),
        }
    }

    /// Entries whose name contains `query`, ignoring case, in catalog order
    ///
    /// Entries without a name never match. An empty query matches every
    /// named entry.
    pub fn find_by_name(&self, query: &str) -> Vec<&Entry> {
        let needle = query.to_lowercase();

        self.catalog
            .iter()
            .filter(|entry| {
                entry
                    .name
                    .as_deref()
                    .map(|name| name.to_lowercase().contains(&needle))
                    .unwrap_or(false)
            })
            .collect()
    }

    /// Entry with the highest total DPS; the earliest one wins ties
    pub fn find_highest_dps(&self) -> Result<ScoredEntry<'_>> {
        let table = self.scored_table()?;
        let best = table.best();

        match best {
            Some(best) => {
                tracing::debug!(
                    name = best.entry.display_name(),
                    total_dps = best.score.total_dps,
                    "Highest DPS entry"
                );
                Ok(best)
            }
            None => Err(QaError::DegenerateData {
                entries: table
                    .degenerate()
                    .map(|e| e.display_name().to_string())
                    .collect(),
            }),
        }
    }

    /// Up to `limit` entries by total DPS, highest first
    pub fn rank_by_dps(&self, limit: usize) -> Result<Vec<ScoredEntry<'_>>> {
        let table = self.scored_table()?;
        Ok(table.ranked(limit))
    }

    /// Derived scores for every entry, `None` where the entry was skipped
    pub fn dps_scores(&self) -> Vec<Option<DpsScore>> {
        DpsTable::build(&self.catalog).scores().to_vec()
    }

    /// Get the underlying catalog
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    fn scored_table(&self) -> Result<DpsTable<'_>> {
        if self.catalog.is_empty() {
            return Err(QaError::EmptyCatalog);
        }

        let table = DpsTable::build(&self.catalog);
        for entry in table.degenerate() {
            tracing::warn!(
                name = entry.display_name(),
                fast_duration = entry.fast.duration,
                charge_duration = entry.charge.duration,
                "Skipping entry with unusable move duration"
            );
        }

        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::MoveStats;

    fn entry(name: Option<&str>, fast: (f64, f64), charge: (f64, f64)) -> Entry {
        let mut e = Entry::new(
            "",
            MoveStats {
                name: "Quick Attack".to_string(),
                power: fast.0,
                move_type: "Normal".to_string(),
                duration: fast.1,
                energy: None,
            },
            MoveStats {
                name: "Swift".to_string(),
                power: charge.0,
                move_type: "Normal".to_string(),
                duration: charge.1,
                energy: None,
            },
        );
        e.name = name.map(str::to_string);
        e
    }

    #[test]
    fn test_find_by_name_skips_unnamed_entries() {
        let retriever = Retriever::new(Catalog::new(vec![
            entry(Some("Eevee"), (8.0, 1.0), (60.0, 2.0)),
            entry(None, (8.0, 1.0), (60.0, 2.0)),
        ]));
        assert_eq!(retriever.find_by_name("").len(), 1);
        assert!(retriever.find_by_name("nan").is_empty());
    }

    #[test]
    fn test_find_by_name_is_literal() {
        let retriever = Retriever::new(Catalog::new(vec![entry(
            Some("Mr. Mime"),
            (8.0, 1.0),
            (60.0, 2.0),
        )]));
        assert_eq!(retriever.find_by_name("mr. m").len(), 1);
        assert!(retriever.find_by_name("mr.*").is_empty());
    }

    #[test]
    fn test_find_highest_dps_on_empty_catalog() {
        let retriever = Retriever::new(Catalog::default());
        assert!(matches!(
            retriever.find_highest_dps(),
            Err(QaError::EmptyCatalog)
        ));
        assert!(matches!(retriever.rank_by_dps(5), Err(QaError::EmptyCatalog)));
    }

    #[test]
    fn test_find_highest_dps_all_degenerate() {
        let retriever = Retriever::new(Catalog::new(vec![
            entry(Some("Ditto"), (5.0, 0.0), (10.0, 1.0)),
            entry(Some("Shedinja"), (5.0, 1.0), (10.0, 0.0)),
        ]));
        match retriever.find_highest_dps() {
            Err(QaError::DegenerateData { entries }) => {
                assert_eq!(entries, vec!["Ditto".to_string(), "Shedinja".to_string()]);
            }
            other => panic!("expected degenerate data error, got {:?}", other),
        }
    }

    #[test]
    fn test_catalog_is_not_mutated() {
        let catalog = Catalog::new(vec![
            entry(Some("Eevee"), (8.0, 1.0), (60.0, 2.0)),
            entry(Some("Vaporeon"), (10.0, 1.0), (90.0, 2.0)),
        ]);
        let retriever = Retriever::new(catalog.clone());
        retriever.find_highest_dps().unwrap();
        assert_eq!(retriever.catalog(), &catalog);
    }

    #[test]
    fn test_dps_scores_align_with_catalog() {
        let retriever = Retriever::new(Catalog::new(vec![
            entry(Some("Eevee"), (8.0, 1.0), (60.0, 2.0)),
            entry(Some("Ditto"), (5.0, 0.0), (10.0, 1.0)),
        ]));
        let scores = retriever.dps_scores();
        assert_eq!(scores.len(), 2);
        assert_eq!(scores[0].unwrap().total_dps, 38.0);
        assert!(scores[1].is_none());
    }
}
