use std::collections::{BTreeMap, BTreeSet};
use std::io::Read;

use super::error::ParseError;
use super::model::{Cell, WideRow, WideTable, Year};

// ---------------------------------------------------------------------------
// Wide CSV parser
// ---------------------------------------------------------------------------

/// Parse a wide CSV table.
///
/// Layout: header `Country,<year1>,<year2>,...`, then one row per entity.
/// The first header label names the entity column; every other label must
/// be an integer year, each appearing once.
///
/// Empty or non-numeric cells become [`Cell::Missing`]. A row whose cell
/// count differs from the header fails the whole parse with
/// [`ParseError::ColumnCount`]; rows are never skipped.
pub fn parse_wide_table<R: Read>(reader: R) -> Result<WideTable, ParseError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    let Some(entity_column) = headers.get(0).filter(|h| !h.is_empty()) else {
        return Err(ParseError::MissingHeader);
    };
    let entity_column = entity_column.to_string();

    let years = parse_year_header(&headers)?;
    let expected = headers.len();

    let mut rows = Vec::new();
    let mut seen_entities = BTreeSet::new();
    let mut missing_cells = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // 1-based data row number, header excluded.
        let row = idx + 1;
        let record = result?;

        if record.len() != expected {
            return Err(ParseError::ColumnCount {
                row,
                expected,
                found: record.len(),
            });
        }

        let entity = record.get(0).unwrap_or("").to_string();
        if entity.is_empty() {
            return Err(ParseError::EmptyEntity { row });
        }
        if !seen_entities.insert(entity.clone()) {
            return Err(ParseError::DuplicateEntity { row, entity });
        }

        let values: BTreeMap<Year, Cell> = years
            .iter()
            .zip(record.iter().skip(1))
            .map(|(&year, text)| (year, Cell::parse(text)))
            .collect();
        missing_cells += values.values().filter(|c| c.is_missing()).count();

        rows.push(WideRow { entity, values });
    }

    log::debug!(
        "Parsed {} rows x {} years ({missing_cells} missing cells)",
        rows.len(),
        years.len()
    );

    Ok(WideTable {
        entity_column,
        years,
        rows,
    })
}

/// Convenience wrapper for in-memory CSV text.
pub fn parse_wide_str(text: &str) -> Result<WideTable, ParseError> {
    parse_wide_table(text.as_bytes())
}

fn parse_year_header(headers: &csv::StringRecord) -> Result<Vec<Year>, ParseError> {
    if headers.len() < 2 {
        return Err(ParseError::NoYearColumns);
    }

    let mut seen = BTreeSet::new();
    headers
        .iter()
        .enumerate()
        .skip(1)
        .map(|(column, label)| {
            let year = label.parse::<Year>().map_err(|_| ParseError::InvalidYear {
                column,
                label: label.to_string(),
            })?;
            if !seen.insert(year) {
                return Err(ParseError::DuplicateYear { year });
            }
            Ok(year)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic_table() {
        let table = parse_wide_str("Country,2000,2001\nGermany,10,20\n").unwrap();

        assert_eq!(table.entity_column, "Country");
        assert_eq!(table.years, vec![2000, 2001]);
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows[0].entity, "Germany");
        assert_eq!(table.rows[0].get(2000), Cell::Value(10.0));
        assert_eq!(table.rows[0].get(2001), Cell::Value(20.0));
    }

    #[test]
    fn test_empty_and_text_cells_are_missing_not_zero() {
        let table = parse_wide_str("Country,2000,2001,2002\nIndia,,n/a,3.5\n").unwrap();
        let row = &table.rows[0];

        assert_eq!(row.get(2000), Cell::Missing);
        assert_eq!(row.get(2001), Cell::Missing);
        assert_eq!(row.get(2002), Cell::Value(3.5));
    }

    #[test]
    fn test_quoted_entity_with_comma() {
        let text = "Country,2010\n\"Korea, Rep.\",82.1\n";
        let table = parse_wide_str(text).unwrap();
        assert_eq!(table.rows[0].entity, "Korea, Rep.");
    }

    #[test]
    fn test_wrong_column_count_fails() {
        let err = parse_wide_str("Country,2000,2001\nGermany,10,20\nIndia,5\n").unwrap_err();
        match err {
            ParseError::ColumnCount {
                row,
                expected,
                found,
            } => {
                assert_eq!(row, 2);
                assert_eq!(expected, 3);
                assert_eq!(found, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_header_without_years_fails() {
        assert!(matches!(
            parse_wide_str("Country\nGermany\n"),
            Err(ParseError::NoYearColumns)
        ));
    }

    #[test]
    fn test_empty_input_fails() {
        assert!(matches!(parse_wide_str(""), Err(ParseError::MissingHeader)));
    }

    #[test]
    fn test_non_numeric_year_header_fails() {
        let err = parse_wide_str("Country,2000,Notes\nGermany,1,x\n").unwrap_err();
        assert!(matches!(err, ParseError::InvalidYear { column: 2, .. }));
    }

    #[test]
    fn test_duplicate_year_fails() {
        let err = parse_wide_str("Country,2000,2000\nGermany,1,2\n").unwrap_err();
        assert!(matches!(err, ParseError::DuplicateYear { year: 2000 }));
    }

    #[test]
    fn test_duplicate_entity_fails() {
        let err = parse_wide_str("Country,2000\nGermany,1\nGermany,2\n").unwrap_err();
        assert!(matches!(err, ParseError::DuplicateEntity { row: 2, .. }));
    }

    #[test]
    fn test_blank_entity_fails() {
        let err = parse_wide_str("Country,2000\n,1\n").unwrap_err();
        assert!(matches!(err, ParseError::EmptyEntity { row: 1 }));
    }
}
