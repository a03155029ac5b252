//! Precaution reference table and fuzzy disease lookup.
//!
//! The table is a CSV file whose first column is the disease name and whose
//! remaining columns hold precautions in recommended order:
//!
//! ```text
//! Disease,Precaution_1,Precaution_2,Precaution_3,Precaution_4
//! Drug Reaction,stop irritation,consult nearest hospital,stop taking drug,follow up
//! Malaria,Consult nearest hospital,avoid oily food,avoid non veg food,keep mosquitos out
//! ```
//!
//! Predicted disease names and table keys come from different sources and
//! do not always agree on spelling, so lookups go through [`fuzzy::score`]
//! and accept the best key scoring at least the cutoff.

pub mod fuzzy;

use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::error::{EirError, Result};
use crate::telemetry;

/// Default minimum fuzzy score (0-100) for a table key to count as a match.
pub const DEFAULT_CUTOFF: u8 = 60;

/// Returned in place of precautions when no table key matches.
pub const NO_PRECAUTIONS: &str = "No specific precautions found.";

/// One table row: a disease and its non-empty precautions in column order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrecautionEntry {
    pub disease: String,
    pub precautions: Vec<String>,
}

impl PrecautionEntry {
    /// Build an entry, dropping empty cells but keeping the order of the rest.
    pub fn new<I, S>(disease: impl Into<String>, cells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let precautions = cells
            .into_iter()
            .map(Into::into)
            .filter(|cell: &String| !cell.trim().is_empty())
            .collect();
        Self {
            disease: disease.into(),
            precautions,
        }
    }
}

/// Static disease -> precautions table, loaded once and shared read-only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrecautionTable {
    entries: Vec<PrecautionEntry>,
}

impl PrecautionTable {
    pub fn new(entries: Vec<PrecautionEntry>) -> Self {
        Self { entries }
    }

    /// Load the table from a CSV file with a header row.
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .map_err(|e| EirError::resource_load("precautions", format!("{path:?}: {e}")))?;
        let table = Self::from_reader(file)
            .map_err(|e| EirError::resource_load("precautions", format!("{path:?}: {e}")))?;

        info!(path = %path.display(), rows = table.len(), "loaded precaution table");
        Ok(table)
    }

    /// Parse CSV from any reader. Rows may have differing cell counts;
    /// rows without a disease name are skipped.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut entries = Vec::new();
        for record in csv_reader.records() {
            let record = record?;
            let mut cells = record.iter();
            let Some(disease) = cells.next().filter(|name| !name.is_empty()) else {
                continue;
            };
            entries.push(PrecautionEntry::new(disease, cells));
        }

        Ok(Self { entries })
    }

    /// Best-scoring entry for `disease` with its score, regardless of cutoff.
    ///
    /// Ties keep the earliest entry in table order.
    pub fn best_match(&self, disease: &str) -> Option<(&PrecautionEntry, u8)> {
        let mut best: Option<(&PrecautionEntry, u8)> = None;
        for entry in &self.entries {
            let score = fuzzy::score(disease, &entry.disease);
            if best.is_none_or(|(_, top)| score > top) {
                best = Some((entry, score));
            }
        }
        best
    }

    pub fn entries(&self) -> &[PrecautionEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Precautions for `disease`, or `[NO_PRECAUTIONS]` when the best key in
/// `table` scores below `cutoff` (or the table is empty).
pub fn resolve(disease: &str, table: &PrecautionTable, cutoff: u8) -> Vec<String> {
    match table.best_match(disease) {
        Some((entry, score)) if score >= cutoff => {
            debug!(disease, matched = %entry.disease, score, "precautions matched");
            metrics::counter!(telemetry::PRECAUTION_LOOKUPS_TOTAL, "outcome" => "matched")
                .increment(1);
            entry.precautions.clone()
        }
        best => {
            warn!(
                disease,
                best_score = best.map(|(_, score)| score),
                cutoff,
                "no precaution entry matched"
            );
            metrics::counter!(telemetry::PRECAUTION_LOOKUPS_TOTAL, "outcome" => "unmatched")
                .increment(1);
            vec![NO_PRECAUTIONS.to_string()]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_drops_empty_cells_in_order() {
        let entry = PrecautionEntry::new("Flu", ["Rest", "", "Hydrate", "  "]);
        assert_eq!(entry.precautions, vec!["Rest", "Hydrate"]);
    }

    #[test]
    fn best_match_prefers_first_on_tie() {
        let table = PrecautionTable::new(vec![
            PrecautionEntry::new("Flu", ["first"]),
            PrecautionEntry::new("flu", ["second"]),
        ]);
        let (entry, score) = table.best_match("FLU").unwrap();
        assert_eq!(score, 100);
        assert_eq!(entry.precautions, vec!["first"]);
    }

    #[test]
    fn best_match_on_empty_table_is_none() {
        assert!(PrecautionTable::default().best_match("Flu").is_none());
    }
}
