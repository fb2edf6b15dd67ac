use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use super::model::{Keyed, LongRecord, SlotMatch, Year};

// ---------------------------------------------------------------------------
// Slot lookup
// ---------------------------------------------------------------------------

/// Look up one record per requested entity for `year`.
///
/// The result has exactly one [`SlotMatch`] per entry of `entities`, in the
/// same order. Repeated entities resolve to the same record; unknown
/// entities (or known ones without data that year) yield
/// [`SlotMatch::NoData`]. Nothing else is ever substituted.
pub fn filter_by_entities<'a, R: Keyed>(
    records: &'a [R],
    entities: &[String],
    year: Year,
) -> Vec<SlotMatch<'a, R>> {
    let mut index: HashMap<&str, &'a R> = HashMap::new();
    for rec in records.iter().filter(|r| r.year() == year) {
        index.entry(rec.entity()).or_insert(rec);
    }

    entities
        .iter()
        .map(|entity| match index.get(entity.as_str()) {
            Some(rec) => SlotMatch::Found(*rec),
            None => {
                log::trace!("no data for '{entity}' in {year}");
                SlotMatch::NoData {
                    entity: entity.clone(),
                    year,
                }
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Year filters
// ---------------------------------------------------------------------------

/// All records of the given entities with `start <= year <= end`, in
/// input order. An inverted range yields nothing.
pub fn filter_by_year_range<'a, R: Keyed>(
    records: &'a [R],
    entities: &[String],
    start: Year,
    end: Year,
) -> Vec<&'a R> {
    if start > end {
        return Vec::new();
    }
    let wanted: HashSet<&str> = entities.iter().map(String::as_str).collect();
    records
        .iter()
        .filter(|r| (start..=end).contains(&r.year()) && wanted.contains(r.entity()))
        .collect()
}

/// Every record of one year, regardless of entity.
pub fn records_for_year<R: Keyed>(records: &[R], year: Year) -> Vec<&R> {
    records.iter().filter(|r| r.year() == year).collect()
}

/// Sorted, de-duplicated entity names.
pub fn unique_entities<R: Keyed>(records: &[R]) -> Vec<String> {
    records
        .iter()
        .map(|r| r.entity())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

// ---------------------------------------------------------------------------
// Chart-shaped groupings
// ---------------------------------------------------------------------------

/// Year-keyed rows for a stacked bar chart: one row per entry of `years`
/// inside `[start, end]`, mapping every entity in `entities` to its value
/// (0 when the entity has no record that year). Pass the table's header
/// years so a year whose cells are all missing still gets a zero row.
pub fn pivot_by_year(
    records: &[LongRecord],
    years: &[Year],
    entities: &[String],
    start: Year,
    end: Year,
) -> BTreeMap<Year, BTreeMap<String, f64>> {
    if start > end {
        return BTreeMap::new();
    }

    let mut rows: BTreeMap<Year, BTreeMap<String, f64>> = years
        .iter()
        .filter(|year| (start..=end).contains(*year))
        .map(|&year| {
            let zeros = entities.iter().map(|e| (e.clone(), 0.0)).collect();
            (year, zeros)
        })
        .collect();

    for rec in filter_by_year_range(records, entities, start, end) {
        if let Some(row) = rows.get_mut(&rec.year) {
            row.insert(rec.entity.clone(), rec.value);
        }
    }
    rows
}

/// One year-ordered series per requested entity, in request order.
/// Entities without any record in range get an empty series.
pub fn series_by_entity(
    records: &[LongRecord],
    entities: &[String],
    start: Year,
    end: Year,
) -> Vec<(String, Vec<(Year, f64)>)> {
    let mut by_entity: HashMap<&str, Vec<(Year, f64)>> = HashMap::new();
    for rec in filter_by_year_range(records, entities, start, end) {
        by_entity
            .entry(rec.entity.as_str())
            .or_default()
            .push((rec.year, rec.value));
    }

    entities
        .iter()
        .map(|entity| {
            let mut points = by_entity.get(entity.as_str()).cloned().unwrap_or_default();
            points.sort_by_key(|(year, _)| *year);
            (entity.clone(), points)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::parser::parse_wide_str;
    use crate::data::reshape::{reshape_table, MissingPolicy};

    fn sample() -> Vec<LongRecord> {
        vec![
            LongRecord::new("Germany", 2010, 80.0),
            LongRecord::new("Germany", 2011, 80.5),
            LongRecord::new("India", 2010, 66.0),
            LongRecord::new("India", 2011, 66.5),
            LongRecord::new("Sweden", 2011, 81.8),
        ]
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_filter_by_entities_one_match_per_slot() {
        let records = sample();
        let slots = names(&["India", "Germany", "India"]);
        let matches = filter_by_entities(&records, &slots, 2011);

        assert_eq!(matches.len(), 3);
        assert_eq!(matches[0].record().unwrap().value, 66.5);
        assert_eq!(matches[1].record().unwrap().value, 80.5);
        assert_eq!(matches[2], matches[0]);
    }

    #[test]
    fn test_filter_by_entities_reports_no_data() {
        let records = sample();
        let slots = names(&["Sweden", "Atlantis"]);
        let matches = filter_by_entities(&records, &slots, 2010);

        assert_eq!(
            matches,
            vec![
                SlotMatch::NoData {
                    entity: "Sweden".into(),
                    year: 2010
                },
                SlotMatch::NoData {
                    entity: "Atlantis".into(),
                    year: 2010
                },
            ]
        );
    }

    #[test]
    fn test_year_range_inclusive() {
        let records = sample();
        let out = filter_by_year_range(&records, &names(&["Germany", "Sweden"]), 2010, 2011);
        let keys: Vec<_> = out.iter().map(|r| (r.entity.as_str(), r.year)).collect();
        assert_eq!(keys, vec![("Germany", 2010), ("Germany", 2011), ("Sweden", 2011)]);
    }

    #[test]
    fn test_year_range_single_year() {
        let records = sample();
        let out = filter_by_year_range(&records, &names(&["Germany", "India"]), 2011, 2011);
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|r| r.year == 2011));
    }

    #[test]
    fn test_year_range_inverted_is_empty() {
        let records = sample();
        assert!(filter_by_year_range(&records, &names(&["Germany"]), 2011, 2010).is_empty());
    }

    #[test]
    fn test_records_for_year_and_unique_entities() {
        let records = sample();
        assert_eq!(records_for_year(&records, 2010).len(), 2);
        assert_eq!(unique_entities(&records), names(&["Germany", "India", "Sweden"]));
    }

    #[test]
    fn test_pivot_fills_absent_entities_with_zero() {
        let records = sample();
        let pivot = pivot_by_year(&records, &[2010, 2011], &names(&["Sweden", "India"]), 2010, 2011);

        assert_eq!(pivot.keys().copied().collect::<Vec<_>>(), vec![2010, 2011]);
        assert_eq!(pivot[&2010]["Sweden"], 0.0);
        assert_eq!(pivot[&2010]["India"], 66.0);
        assert_eq!(pivot[&2011]["Sweden"], 81.8);
        assert!(!pivot[&2011].contains_key("Germany"));
    }

    #[test]
    fn test_pivot_without_entities_keeps_year_rows() {
        let pivot = pivot_by_year(&sample(), &[2010, 2011], &[], 2010, 2011);
        assert_eq!(pivot.len(), 2);
        assert!(pivot.values().all(|row| row.is_empty()));
    }

    #[test]
    fn test_pivot_keeps_header_year_with_all_cells_missing() {
        let table = parse_wide_str("Country,2016,2017,2018\nA,1,,3\nB,4,,6\n").unwrap();
        let records = reshape_table(&table, MissingPolicy::Omit);
        let pivot = pivot_by_year(&records, &table.years, &names(&["A", "B"]), 2016, 2018);

        assert_eq!(pivot.keys().copied().collect::<Vec<_>>(), vec![2016, 2017, 2018]);
        assert_eq!(pivot[&2017]["A"], 0.0);
        assert_eq!(pivot[&2017]["B"], 0.0);
        assert_eq!(pivot[&2018]["B"], 6.0);
    }

    #[test]
    fn test_pivot_only_years_inside_range() {
        let pivot = pivot_by_year(&sample(), &[2009, 2010, 2011, 2012], &names(&["India"]), 2010, 2011);
        assert_eq!(pivot.keys().copied().collect::<Vec<_>>(), vec![2010, 2011]);
    }

    #[test]
    fn test_series_by_entity_in_request_order() {
        let records = sample();
        let series = series_by_entity(&records, &names(&["Sweden", "Germany", "Nowhere"]), 2010, 2011);

        assert_eq!(series[0], ("Sweden".to_string(), vec![(2011, 81.8)]));
        assert_eq!(series[1].1, vec![(2010, 80.0), (2011, 80.5)]);
        assert!(series[2].1.is_empty());
    }
}
