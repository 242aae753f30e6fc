//! Typed catalog rows
//!
//! One `Entry` per dataset row. Required columns are validated once when the
//! catalog is built, so retrieval never looks anything up by column name.

use serde::Serialize;
use std::collections::HashMap;

use crate::catalog::loader::{Cell, RawTable};
use crate::errors::{QaError, Result};

/// Dataset column names
pub mod columns {
    pub const ID: &str = "ID";
    pub const NAME: &str = "NAME";
    pub const TYPE_ONE: &str = "TYPE_ONE";
    pub const TYPE_TWO: &str = "TYPE_TWO";
    pub const FAST_MOVE: &str = "FAST_MOVE";
    pub const FAST_MOVE_POWER: &str = "FAST_MOVE_POWER";
    pub const FAST_MOVE_TYPE: &str = "FAST_MOVE_TYPE";
    pub const FAST_ENERGY_BOOST: &str = "FAST_ENERGY_BOOST";
    pub const FAST_MOVE_DURATION: &str = "FAST_MOVE_DURATION";
    pub const CHARGE_MOVE: &str = "CHARGE_MOVE";
    pub const CHARGE_MOVE_POWER: &str = "CHARGE_MOVE_POWER";
    // The dataset spells this one differently from its siblings.
    pub const CHARGED_MOVE_TYPE: &str = "CHARGED_MOVE_TYPE";
    pub const CHARGE_MOVE_ENERGY_COST: &str = "CHARGE_MOVE_ENERGY_COST";
    pub const CHARGE_MOVE_DURATION: &str = "CHARGE_MOVE_DURATION";
    pub const DAMAGE_WINDOW_START: &str = "DAMAGE_WINDOW_START";
}

/// Columns every dataset must carry
pub const REQUIRED_COLUMNS: [&str; 9] = [
    columns::NAME,
    columns::FAST_MOVE,
    columns::FAST_MOVE_POWER,
    columns::FAST_MOVE_TYPE,
    columns::FAST_MOVE_DURATION,
    columns::CHARGE_MOVE,
    columns::CHARGE_MOVE_POWER,
    columns::CHARGED_MOVE_TYPE,
    columns::CHARGE_MOVE_DURATION,
];

/// Attributes of a single fast or charge move
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoveStats {
    /// Move name (e.g. "Fire Spin")
    pub name: String,
    /// Base power
    pub power: f64,
    /// Elemental type of the move
    pub move_type: String,
    /// Duration in seconds
    pub duration: f64,
    /// Energy gained (fast) or spent (charge), when the dataset has it
    pub energy: Option<f64>,
}

impl MoveStats {
    /// Power divided by duration. Not checked for a zero duration.
    pub fn dps(&self) -> f64 {
        self.power / self.duration
    }

    /// Duration is strictly positive and finite
    pub fn has_usable_duration(&self) -> bool {
        self.duration.is_finite() && self.duration > 0.0
    }
}

/// One catalog row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Entry {
    pub id: Option<String>,
    /// Entity name; `None` when the cell was empty
    pub name: Option<String>,
    pub type_one: Option<String>,
    pub type_two: Option<String>,
    pub fast: MoveStats,
    pub charge: MoveStats,
    pub damage_window_start: Option<f64>,
}

impl Entry {
    /// Build an entry from the required fields only
    pub fn new(name: impl Into<String>, fast: MoveStats, charge: MoveStats) -> Self {
        Self {
            id: None,
            name: Some(name.into()),
            type_one: None,
            type_two: None,
            fast,
            charge,
            damage_window_start: None,
        }
    }

    /// Name as rendered in answer sentences
    ///
    /// Missing names render as `nan`, which is what the dataset tooling has
    /// always printed for an empty cell.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("nan")
    }
}

/// Resolves column names to positions in a raw table header
pub(crate) struct ColumnIndex {
    positions: HashMap<String, usize>,
}

impl ColumnIndex {
    /// Index the header, rejecting it if any required column is absent
    pub(crate) fn new(headers: &[String]) -> Result<Self> {
        let mut positions = HashMap::with_capacity(headers.len());
        for (idx, header) in headers.iter().enumerate() {
            // First occurrence wins on duplicate headers
            positions.entry(header.trim().to_string()).or_insert(idx);
        }

        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|col| !positions.contains_key(**col))
            .map(|col| col.to_string())
            .collect();

        if !missing.is_empty() {
            return Err(QaError::SchemaError { missing });
        }

        Ok(Self { positions })
    }

    fn cell<'a>(&self, row: &'a [Cell], column: &str) -> Option<&'a Cell> {
        self.positions.get(column).and_then(|&idx| row.get(idx))
    }

    fn text(&self, row: &[Cell], column: &str) -> Option<String> {
        self.cell(row, column).and_then(Cell::as_text)
    }

    fn required_text(&self, row: &[Cell], column: &str) -> String {
        self.text(row, column).unwrap_or_default()
    }

    fn number(&self, row: &[Cell], column: &str, row_num: usize) -> Result<Option<f64>> {
        match self.cell(row, column) {
            None | Some(Cell::Empty) => Ok(None),
            Some(cell) => cell.as_number().map(Some).ok_or_else(|| QaError::InvalidValue {
                row: row_num,
                column: column.to_string(),
                value: cell.as_text().unwrap_or_default(),
            }),
        }
    }

    fn required_number(&self, row: &[Cell], column: &str, row_num: usize) -> Result<f64> {
        self.number(row, column, row_num)?
            .ok_or_else(|| QaError::InvalidValue {
                row: row_num,
                column: column.to_string(),
                value: String::new(),
            })
    }

    /// Convert one raw row; `row_num` is 1-based for error messages
    pub(crate) fn entry(&self, row: &[Cell], row_num: usize) -> Result<Entry> {
        let fast = MoveStats {
            name: self.required_text(row, columns::FAST_MOVE),
            power: self.required_number(row, columns::FAST_MOVE_POWER, row_num)?,
            move_type: self.required_text(row, columns::FAST_MOVE_TYPE),
            duration: self.required_number(row, columns::FAST_MOVE_DURATION, row_num)?,
            energy: self.number(row, columns::FAST_ENERGY_BOOST, row_num)?,
        };

        let charge = MoveStats {
            name: self.required_text(row, columns::CHARGE_MOVE),
            power: self.required_number(row, columns::CHARGE_MOVE_POWER, row_num)?,
            move_type: self.required_text(row, columns::CHARGED_MOVE_TYPE),
            duration: self.required_number(row, columns::CHARGE_MOVE_DURATION, row_num)?,
            energy: self.number(row, columns::CHARGE_MOVE_ENERGY_COST, row_num)?,
        };

        Ok(Entry {
            id: self.text(row, columns::ID),
            name: self.text(row, columns::NAME),
            type_one: self.text(row, columns::TYPE_ONE),
            type_two: self.text(row, columns::TYPE_TWO),
            fast,
            charge,
            damage_window_start: self.number(row, columns::DAMAGE_WINDOW_START, row_num)?,
        })
    }
}

/// Convert a raw table into typed entries
pub(crate) fn entries_from_table(table: &RawTable) -> Result<Vec<Entry>> {
    let index = ColumnIndex::new(&table.headers)?;

    table
        .rows
        .iter()
        .enumerate()
        .map(|(i, row)| index.entry(row, i + 1))
        .collect()
}
