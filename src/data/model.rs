use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::ChartConfig;

/// Calendar year as it appears in a CSV header.
pub type Year = i32;

// ---------------------------------------------------------------------------
// Cell – one numeric cell of a wide table
// ---------------------------------------------------------------------------

/// A numeric cell. Empty and non-numeric text becomes `Missing`; the zero
/// default is applied later by [`crate::data::reshape::MissingPolicy`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Cell {
    Value(f64),
    Missing,
}

impl Cell {
    /// Interpret raw CSV text. Non-finite numbers (`NaN`, `inf`) count as missing.
    pub fn parse(text: &str) -> Self {
        match text.trim().parse::<f64>() {
            Ok(v) if v.is_finite() => Cell::Value(v),
            _ => Cell::Missing,
        }
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            Cell::Value(v) => Some(*v),
            Cell::Missing => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Value(v) => write!(f, "{v}"),
            Cell::Missing => write!(f, "<missing>"),
        }
    }
}

// ---------------------------------------------------------------------------
// WideRow / WideTable – the parsed CSV
// ---------------------------------------------------------------------------

/// One row of a wide table: an entity and its value per year.
#[derive(Debug, Clone, PartialEq)]
pub struct WideRow {
    pub entity: String,
    pub values: BTreeMap<Year, Cell>,
}

impl WideRow {
    /// Cell for `year`; a year the row has no column for is `Missing`.
    pub fn get(&self, year: Year) -> Cell {
        self.values.get(&year).copied().unwrap_or(Cell::Missing)
    }
}

/// A parsed wide table with its header years in column order.
#[derive(Debug, Clone, PartialEq)]
pub struct WideTable {
    /// Header label of the entity column (usually `Country`).
    pub entity_column: String,
    pub years: Vec<Year>,
    pub rows: Vec<WideRow>,
}

impl WideTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Entities in row order.
    pub fn entities(&self) -> Vec<String> {
        self.rows.iter().map(|r| r.entity.clone()).collect()
    }

    /// First and last header year, if any.
    pub fn year_bounds(&self) -> Option<(Year, Year)> {
        let min = self.years.iter().min()?;
        let max = self.years.iter().max()?;
        Some((*min, *max))
    }
}

// ---------------------------------------------------------------------------
// Long-format records
// ---------------------------------------------------------------------------

/// Anything addressable by `(entity, year)`.
pub trait Keyed {
    fn entity(&self) -> &str;
    fn year(&self) -> Year;
}

/// One `(entity, year, value)` observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LongRecord {
    pub entity: String,
    pub year: Year,
    pub value: f64,
}

impl LongRecord {
    pub fn new(entity: impl Into<String>, year: Year, value: f64) -> Self {
        Self {
            entity: entity.into(),
            year,
            value,
        }
    }
}

impl Keyed for LongRecord {
    fn entity(&self) -> &str {
        &self.entity
    }

    fn year(&self) -> Year {
        self.year
    }
}

/// A primary record with the matching secondary value attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinedRecord {
    pub entity: String,
    pub year: Year,
    pub value_a: f64,
    /// `0.0` when the secondary table had no `(entity, year)` match.
    pub value_b: f64,
}

impl Keyed for JoinedRecord {
    fn entity(&self) -> &str {
        &self.entity
    }

    fn year(&self) -> Year {
        self.year
    }
}

// ---------------------------------------------------------------------------
// Stacked bands
// ---------------------------------------------------------------------------

/// The `[low, high]` interval one category occupies in a stacked bar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StackedBand {
    pub category: String,
    pub low: f64,
    pub high: f64,
}

impl StackedBand {
    /// Height of the band, i.e. the category's own value.
    pub fn value(&self) -> f64 {
        self.high - self.low
    }
}

/// Output of [`crate::data::stack::stack`]: bands per stack key plus the
/// value-axis upper bound.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stacked<K: Ord> {
    pub bands: BTreeMap<K, Vec<StackedBand>>,
    pub max_high: f64,
}

// ---------------------------------------------------------------------------
// Selection
// ---------------------------------------------------------------------------

/// A single year (scatter view) or an inclusive year range (line and
/// stacked views).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum YearSelection {
    Single(Year),
    Range(Year, Year),
}

impl YearSelection {
    /// Inclusive bounds; a single year is the range `(y, y)`.
    pub fn bounds(&self) -> (Year, Year) {
        match *self {
            YearSelection::Single(y) => (y, y),
            YearSelection::Range(start, end) => (start, end),
        }
    }
}

/// What the user currently has selected. Owned by the UI and handed to the
/// pipeline by value; updates return a new state.
///
/// The slot count is set when the state is built (`new`, `from_config`)
/// and no `with_*` update changes it. Views whose entity list varies, such
/// as a checkbox set, build a fresh state with `new` on every change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionState {
    /// Entity per slot. Slot `i` keeps its colour; repeats are allowed.
    slots: Vec<String>,
    pub years: YearSelection,
}

impl SelectionState {
    pub fn new(slots: Vec<String>, years: YearSelection) -> Self {
        Self { slots, years }
    }

    /// Initial scatter selection: `slot_count` slots filled from the
    /// configured default entities. Extra defaults are dropped and missing
    /// ones are left blank.
    pub fn from_config(config: &ChartConfig) -> Self {
        let mut slots: Vec<String> = config
            .default_entities
            .iter()
            .take(config.slot_count)
            .cloned()
            .collect();
        slots.resize(config.slot_count, String::new());
        Self::new(slots, YearSelection::Single(config.default_year))
    }

    pub fn slots(&self) -> &[String] {
        &self.slots
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Replace the entity in slot `index`. Out-of-range indices leave the
    /// state unchanged since the slot count is fixed.
    pub fn with_slot(mut self, index: usize, entity: impl Into<String>) -> Self {
        if let Some(slot) = self.slots.get_mut(index) {
            *slot = entity.into();
        }
        self
    }

    pub fn with_year(mut self, year: Year) -> Self {
        self.years = YearSelection::Single(year);
        self
    }

    pub fn with_range(mut self, start: Year, end: Year) -> Self {
        self.years = YearSelection::Range(start, end);
        self
    }
}

/// Result of looking up one selection slot.
#[derive(Debug, Clone, PartialEq)]
pub enum SlotMatch<'a, R> {
    Found(&'a R),
    /// No record exists for this entity in the selected year.
    NoData { entity: String, year: Year },
}

impl<'a, R> SlotMatch<'a, R> {
    pub fn record(&self) -> Option<&'a R> {
        match self {
            SlotMatch::Found(r) => Some(r),
            SlotMatch::NoData { .. } => None,
        }
    }
}
