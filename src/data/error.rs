//! Error types for parsing and loading wide CSV tables.
//!
//! Lookup misses are not errors: see [`crate::data::model::SlotMatch`] and
//! the zero default in [`crate::data::join`].

use std::path::PathBuf;

use thiserror::Error;

use super::model::Year;

/// Malformed CSV input. Any of these aborts the whole table.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The input has no header row at all.
    #[error("CSV has no header row")]
    MissingHeader,

    /// The header has an entity column but nothing after it.
    #[error("CSV header has no year columns")]
    NoYearColumns,

    /// A header label after the entity column is not an integer year.
    #[error("header column {column}: '{label}' is not a year")]
    InvalidYear { column: usize, label: String },

    /// The same year appears twice in the header.
    #[error("year {year} appears more than once in the header")]
    DuplicateYear { year: Year },

    /// A data row does not have as many cells as the header.
    #[error("row {row}: expected {expected} columns, found {found}")]
    ColumnCount {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// A data row has a blank entity label.
    #[error("row {row}: entity label is empty")]
    EmptyEntity { row: usize },

    /// The same entity appears on two data rows.
    #[error("row {row}: entity '{entity}' already defined")]
    DuplicateEntity { row: usize, entity: String },

    /// Low-level CSV reader failure (I/O, invalid UTF-8).
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// A CSV source could not be turned into a table.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    /// The background loader stopped without sending a result.
    #[error("loader thread exited before finishing")]
    Worker,
}
