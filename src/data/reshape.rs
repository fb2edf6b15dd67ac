use serde::{Deserialize, Serialize};

use super::model::{Cell, LongRecord, WideRow, WideTable, Year};

/// What to do with a missing cell when melting a wide row.
///
/// This is the only place a missing cell turns into a number.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MissingPolicy {
    /// Emit the record with value `0.0`. Every `(row, year)` yields a record.
    #[default]
    Zero,
    /// Skip the record. Line charts use this to leave gaps.
    Omit,
}

impl MissingPolicy {
    pub fn resolve(self, cell: Cell) -> Option<f64> {
        match (cell, self) {
            (Cell::Value(v), _) => Some(v),
            (Cell::Missing, MissingPolicy::Zero) => Some(0.0),
            (Cell::Missing, MissingPolicy::Omit) => None,
        }
    }
}

/// Melt wide rows into long records, rows outer and `years` inner.
///
/// `years` need not match the table header: a year the row has no column
/// for is a missing cell. The iterator is lazy and borrows its inputs, so
/// calling `reshape` again yields the same sequence.
pub fn reshape<'a>(
    rows: &'a [WideRow],
    years: &'a [Year],
    policy: MissingPolicy,
) -> impl Iterator<Item = LongRecord> + 'a {
    rows.iter().flat_map(move |row| {
        years.iter().filter_map(move |&year| {
            policy
                .resolve(row.get(year))
                .map(|value| LongRecord::new(row.entity.as_str(), year, value))
        })
    })
}

/// Melt a whole table over its own header years.
pub fn reshape_table(table: &WideTable, policy: MissingPolicy) -> Vec<LongRecord> {
    reshape(&table.rows, &table.years, policy).collect()
}

/// `count` consecutive years starting at `first`, stopping early rather
/// than overflowing `Year`.
pub fn year_span(first: Year, count: usize) -> Vec<Year> {
    (0..count)
        .map_while(|i| Year::try_from(i).ok().and_then(|i| first.checked_add(i)))
        .collect()
}
