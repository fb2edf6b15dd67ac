use std::collections::HashMap;

use super::model::{JoinedRecord, LongRecord, Year};

/// Attach the secondary value to every primary record by `(entity, year)`.
///
/// * One output record per primary record, in primary order.
/// * `value_b` is `0.0` when the secondary side has no match.
/// * If the secondary side repeats a key, its first occurrence wins.
///
/// The secondary side is indexed once up front, so the join is linear in
/// the size of both inputs.
pub fn join(primary: &[LongRecord], secondary: &[LongRecord]) -> Vec<JoinedRecord> {
    let mut index: HashMap<(&str, Year), f64> = HashMap::with_capacity(secondary.len());
    for rec in secondary {
        index.entry((rec.entity.as_str(), rec.year)).or_insert(rec.value);
    }

    let mut misses = 0usize;
    let joined: Vec<JoinedRecord> = primary
        .iter()
        .map(|rec| {
            let value_b = match index.get(&(rec.entity.as_str(), rec.year)) {
                Some(v) => *v,
                None => {
                    misses += 1;
                    0.0
                }
            };
            JoinedRecord {
                entity: rec.entity.clone(),
                year: rec.year,
                value_a: rec.value,
                value_b,
            }
        })
        .collect();

    if misses > 0 {
        log::debug!(
            "join: {misses} of {} primary records had no secondary match",
            primary.len()
        );
    }
    joined
}

#[cfg(test)]
mod tests {
    use super::*;

    fn joined(entity: &str, year: Year, a: f64, b: f64) -> JoinedRecord {
        JoinedRecord {
            entity: entity.into(),
            year,
            value_a: a,
            value_b: b,
        }
    }

    #[test]
    fn test_join_defaults_missing_to_zero() {
        let primary = vec![LongRecord::new("A", 2010, 5.0), LongRecord::new("A", 2011, 7.0)];
        let secondary = vec![LongRecord::new("A", 2010, 2.0)];

        assert_eq!(
            join(&primary, &secondary),
            vec![joined("A", 2010, 5.0, 2.0), joined("A", 2011, 7.0, 0.0)]
        );
    }

    #[test]
    fn test_join_keeps_primary_order_and_length() {
        let primary = vec![
            LongRecord::new("C", 2000, 1.0),
            LongRecord::new("A", 2000, 2.0),
            LongRecord::new("B", 2001, 3.0),
        ];
        let secondary = vec![
            LongRecord::new("B", 2001, 30.0),
            LongRecord::new("A", 2000, 20.0),
            LongRecord::new("Z", 2000, 99.0),
        ];

        let out = join(&primary, &secondary);
        let keys: Vec<_> = out.iter().map(|r| (r.entity.as_str(), r.year)).collect();
        assert_eq!(keys, vec![("C", 2000), ("A", 2000), ("B", 2001)]);
        assert_eq!(out[0].value_b, 0.0);
        assert_eq!(out[1].value_b, 20.0);
        assert_eq!(out[2].value_b, 30.0);
    }

    #[test]
    fn test_join_matches_entity_and_year_together() {
        let primary = vec![LongRecord::new("A", 2010, 1.0)];
        let secondary = vec![LongRecord::new("A", 2011, 5.0), LongRecord::new("B", 2010, 6.0)];
        assert_eq!(join(&primary, &secondary)[0].value_b, 0.0);
    }

    #[test]
    fn test_join_first_secondary_duplicate_wins() {
        let primary = vec![LongRecord::new("A", 2010, 1.0)];
        let secondary = vec![LongRecord::new("A", 2010, 4.0), LongRecord::new("A", 2010, 8.0)];
        assert_eq!(join(&primary, &secondary)[0].value_b, 4.0);
    }

    #[test]
    fn test_join_empty_primary() {
        let secondary = vec![LongRecord::new("A", 2010, 4.0)];
        assert!(join(&[], &secondary).is_empty());
    }
}
