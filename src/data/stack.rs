use std::collections::BTreeMap;

use super::model::{Stacked, StackedBand};

/// Stack category values per key into cumulative bands.
///
/// For every key, `category_order` is walked in order with a running
/// total starting at zero; each category's band is
/// `[total_before, total_before + value]`. Categories a key has no value
/// for contribute a zero-height band. `max_high` is the largest `high`
/// across all bands (negative if every band is), or `0.0` when there are
/// no bands at all.
pub fn stack<K: Ord + Clone>(
    records: &BTreeMap<K, BTreeMap<String, f64>>,
    category_order: &[String],
) -> Stacked<K> {
    let mut max_high: Option<f64> = None;

    let bands = records
        .iter()
        .map(|(key, values)| {
            let mut total = 0.0;
            let bands: Vec<StackedBand> = category_order
                .iter()
                .map(|category| {
                    let low = total;
                    total += values.get(category).copied().unwrap_or(0.0);
                    max_high = Some(max_high.map_or(total, |m: f64| m.max(total)));
                    StackedBand {
                        category: category.clone(),
                        low,
                        high: total,
                    }
                })
                .collect();
            (key.clone(), bands)
        })
        .collect();

    Stacked {
        bands,
        max_high: max_high.unwrap_or(0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn order(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn values(pairs: &[(&str, f64)]) -> BTreeMap<String, f64> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_stack_two_categories() {
        let records = BTreeMap::from([("A".to_string(), values(&[("cat1", 3.0), ("cat2", 5.0)]))]);
        let stacked = stack(&records, &order(&["cat1", "cat2"]));

        let bands: Vec<(f64, f64)> = stacked.bands["A"].iter().map(|b| (b.low, b.high)).collect();
        assert_eq!(bands, vec![(0.0, 3.0), (3.0, 8.0)]);
        assert_eq!(stacked.max_high, 8.0);
    }

    #[test]
    fn test_bands_are_contiguous_and_sum_to_total() {
        let records = BTreeMap::from([
            (2015, values(&[("Germany", 9.9), ("India", 0.1), ("Sweden", 2.7)])),
            (2016, values(&[("Germany", 10.0), ("Sweden", 2.8)])),
        ]);
        let cats = order(&["Sweden", "Germany", "India"]);
        let stacked = stack(&records, &cats);

        for (year, bands) in &stacked.bands {
            assert_eq!(bands.len(), cats.len());
            assert_eq!(bands[0].low, 0.0);
            for pair in bands.windows(2) {
                assert_eq!(pair[0].high, pair[1].low);
            }
            let sum: f64 = records[year].values().sum();
            assert!((bands.last().unwrap().high - sum).abs() < EPS);
        }
        assert!((stacked.max_high - 12.8).abs() < EPS);
    }

    #[test]
    fn test_bands_follow_category_order() {
        let records = BTreeMap::from([("A".to_string(), values(&[("x", 1.0), ("y", 2.0)]))]);
        let stacked = stack(&records, &order(&["y", "x"]));
        let bands = &stacked.bands["A"];

        assert_eq!(bands[0].category, "y");
        assert_eq!((bands[0].low, bands[0].high), (0.0, 2.0));
        assert_eq!((bands[1].low, bands[1].high), (2.0, 3.0));
        assert_eq!(bands[1].value(), 1.0);
    }

    #[test]
    fn test_missing_category_is_zero_height() {
        let records = BTreeMap::from([("A".to_string(), values(&[("x", 4.0)]))]);
        let stacked = stack(&records, &order(&["missing", "x"]));
        let bands = &stacked.bands["A"];

        assert_eq!((bands[0].low, bands[0].high), (0.0, 0.0));
        assert_eq!((bands[1].low, bands[1].high), (0.0, 4.0));
    }

    #[test]
    fn test_all_negative_values_keep_negative_max() {
        let records = BTreeMap::from([("A".to_string(), values(&[("x", -3.0), ("y", -2.0)]))]);
        let stacked = stack(&records, &order(&["x", "y"]));
        let bands = &stacked.bands["A"];

        assert_eq!((bands[0].low, bands[0].high), (0.0, -3.0));
        assert_eq!((bands[1].low, bands[1].high), (-3.0, -5.0));
        assert_eq!(stacked.max_high, -3.0);
    }

    #[test]
    fn test_no_categories_gives_zero_max() {
        let records = BTreeMap::from([("A".to_string(), values(&[("x", -3.0)]))]);
        let stacked = stack(&records, &[]);
        assert!(stacked.bands["A"].is_empty());
        assert_eq!(stacked.max_high, 0.0);
    }

    #[test]
    fn test_empty_input() {
        let records: BTreeMap<String, BTreeMap<String, f64>> = BTreeMap::new();
        let stacked = stack(&records, &order(&["x"]));
        assert!(stacked.bands.is_empty());
        assert_eq!(stacked.max_high, 0.0);
    }
}
