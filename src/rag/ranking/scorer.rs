// Damage-per-second scoring for catalog entries
use serde::Serialize;

use crate::catalog::{Catalog, Entry};

/// Derived damage-per-second values for one entry
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DpsScore {
    /// Fast move power / fast move duration
    pub fast_dps: f64,
    /// Charge move power / charge move duration
    pub charge_dps: f64,
    /// fast_dps + charge_dps
    pub total_dps: f64,
}

impl DpsScore {
    /// Score an entry, or `None` if a duration is unusable or the total is
    /// not finite
    pub fn compute(entry: &Entry) -> Option<Self> {
        if !entry.fast.has_usable_duration() || !entry.charge.has_usable_duration() {
            return None;
        }

        let fast_dps = entry.fast.dps();
        let charge_dps = entry.charge.dps();
        let total_dps = fast_dps + charge_dps;

        if !total_dps.is_finite() {
            return None;
        }

        Some(Self {
            fast_dps,
            charge_dps,
            total_dps,
        })
    }
}

/// Entry paired with its derived score
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoredEntry<'a> {
    /// Position of the entry in catalog order
    pub index: usize,
    pub entry: &'a Entry,
    pub score: DpsScore,
}

/// Per-call table of derived scores, indexed like the catalog
///
/// Built fresh for every query so the catalog itself stays untouched.
#[derive(Debug, Clone)]
pub struct DpsTable<'a> {
    catalog: &'a Catalog,
    scores: Vec<Option<DpsScore>>,
}

impl<'a> DpsTable<'a> {
    /// Score every entry of the catalog
    pub fn build(catalog: &'a Catalog) -> Self {
        let scores = catalog.iter().map(DpsScore::compute).collect();
        Self { catalog, scores }
    }

    /// Score for each entry; `None` marks entries skipped as degenerate
    pub fn scores(&self) -> &[Option<DpsScore>] {
        &self.scores
    }

    /// Entries that were excluded from scoring
    pub fn degenerate(&self) -> impl Iterator<Item = &'a Entry> + '_ {
        self.catalog
            .iter()
            .zip(self.scores.iter())
            .filter(|(_, score)| score.is_none())
            .map(|(entry, _)| entry)
    }

    /// Scored entries in catalog order
    pub fn scored(&self) -> impl Iterator<Item = ScoredEntry<'a>> + '_ {
        self.catalog
            .iter()
            .zip(self.scores.iter())
            .enumerate()
            .filter_map(|(index, (entry, score))| {
                score.map(|score| ScoredEntry {
                    index,
                    entry,
                    score,
                })
            })
    }

    /// First entry with the maximum total DPS
    pub fn best(&self) -> Option<ScoredEntry<'a>> {
        let mut best: Option<ScoredEntry<'a>> = None;
        for candidate in self.scored() {
            // Strict comparison keeps the earliest entry on ties
            let replace = match &best {
                Some(current) => candidate.score.total_dps > current.score.total_dps,
                None => true,
            };
            if replace {
                best = Some(candidate);
            }
        }
        best
    }

    /// Scored entries sorted by total DPS descending, ties in catalog order
    pub fn ranked(&self, limit: usize) -> Vec<ScoredEntry<'a>> {
        let mut ranked: Vec<ScoredEntry<'a>> = self.scored().collect();

        // Stable sort; totals are finite so the comparison is total
        ranked.sort_by(|a, b| {
            b.score
                .total_dps
                .partial_cmp(&a.score.total_dps)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        ranked.truncate(limit);
        ranked
    }
}
