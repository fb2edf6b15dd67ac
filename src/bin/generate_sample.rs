//! Writes sample wide CSV files matching the default configuration:
//! `LifeExpectency.csv`, `Expenditure.csv` and
//! `doctors_consultations_in_person_dataset.csv`.

use std::path::Path;

use anyhow::{Context, Result};
use health_charts::config::ChartConfig;
use health_charts::data::model::Year;
use health_charts::data::reshape::year_span;

/// Seeded SplitMix64 noise source, so every run writes the same files.
struct Jitter(u64);

impl Jitter {
    fn unit(&mut self) -> f64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^= z >> 31;
        (z >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Normal noise with standard deviation `sd` (Box-Muller).
    fn noise(&mut self, sd: f64) -> f64 {
        let r = (-2.0 * self.unit().max(f64::MIN_POSITIVE).ln()).sqrt();
        sd * r * (std::f64::consts::TAU * self.unit()).cos()
    }

    /// True with probability `p`.
    fn chance(&mut self, p: f64) -> bool {
        self.unit() < p
    }
}

/// (country, life expectancy in 2000, expenditure % GDP, consultations per capita)
const COUNTRIES: &[(&str, f64, f64, f64)] = &[
    ("Belgium", 77.7, 7.9, 7.3),
    ("France", 79.1, 9.5, 6.0),
    ("Germany", 78.2, 9.8, 9.9),
    ("India", 62.7, 4.0, 3.1),
    ("Italy", 79.8, 7.6, 6.8),
    ("Japan", 81.2, 7.2, 12.6),
    ("Spain", 79.3, 6.8, 7.6),
    ("Sweden", 79.7, 7.4, 2.8),
    ("United Kingdom", 77.7, 6.0, 5.0),
    ("United States", 76.6, 12.5, 4.0),
];

/// Write one wide table. `gap` blanks out roughly that fraction of cells.
fn write_wide(
    path: &Path,
    years: &[Year],
    rng: &mut Jitter,
    gap: f64,
    value: impl Fn(usize, usize, &mut Jitter) -> f64,
) -> Result<()> {
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("creating {}", path.display()))?;

    let mut header = vec!["Country".to_string()];
    header.extend(years.iter().map(|y| y.to_string()));
    writer.write_record(&header)?;

    for (c, (country, ..)) in COUNTRIES.iter().enumerate() {
        let mut row = vec![country.to_string()];
        for t in 0..years.len() {
            let v = value(c, t, &mut *rng);
            if rng.chance(gap) {
                row.push(String::new());
            } else {
                row.push(format!("{v:.2}"));
            }
        }
        writer.write_record(&row)?;
    }
    writer.flush()?;
    println!("Wrote {} countries x {} years to {}", COUNTRIES.len(), years.len(), path.display());
    Ok(())
}

fn main() -> Result<()> {
    let config = ChartConfig::default();
    let mut rng = Jitter(42);
    let years = config.scatter_years();

    write_wide(&config.life_expectancy_path, &years, &mut rng, 0.0, |c, t, rng| {
        COUNTRIES[c].1 + 0.2 * t as f64 + rng.noise(0.15)
    })?;

    write_wide(&config.expenditure_path, &years, &mut rng, 0.03, |c, t, rng| {
        (COUNTRIES[c].2 + 0.08 * t as f64 + rng.noise(0.2)).max(0.5)
    })?;

    let (start, end) = config.default_range;
    let range_years = year_span(start, (end - start + 1).max(0) as usize);
    write_wide(&config.consultations_path, &range_years, &mut rng, 0.05, |c, _, rng| {
        (COUNTRIES[c].3 + rng.noise(0.4)).max(0.1)
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = Jitter(7);
        let mut b = Jitter(7);
        for _ in 0..100 {
            let u = a.unit();
            assert_eq!(u, b.unit());
            assert!((0.0..1.0).contains(&u));
        }
    }

    #[test]
    fn test_chance_extremes() {
        let mut rng = Jitter(1);
        assert!((0..50).all(|_| !rng.chance(0.0)));
        assert!((0..50).all(|_| rng.chance(1.0)));
        assert!(rng.noise(0.0).abs() < 1e-12);
    }
}
