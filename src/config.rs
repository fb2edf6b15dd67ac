use std::path::{Path, PathBuf};

use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::model::Year;
use crate::data::reshape::year_span;

/// File looked up in the working directory at startup.
pub const CONFIG_FILE: &str = "health-charts.json";

/// Upper limit for `year_count`; wide tables here span a few decades.
pub const MAX_YEAR_COUNT: usize = 500;

// ---------------------------------------------------------------------------
// Chart configuration
// ---------------------------------------------------------------------------

/// Viewer settings. Every field is optional in the JSON file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// Number of country dropdowns in the scatter view.
    pub slot_count: usize,
    /// Initial slot contents, in slot order.
    pub default_entities: Vec<String>,
    /// Initial scatter year.
    pub default_year: Year,
    /// First year melted from the scatter datasets.
    pub first_year: Year,
    /// Number of consecutive years melted from the scatter datasets.
    pub year_count: usize,
    /// Initial `(start, end)` for the line and stacked views.
    pub default_range: (Year, Year),
    /// Primary scatter dataset (y axis).
    pub life_expectancy_path: PathBuf,
    /// Secondary scatter dataset (x axis), joined onto the primary.
    pub expenditure_path: PathBuf,
    /// Dataset opened in the line and stacked views at startup.
    pub consultations_path: PathBuf,
    /// Scatter axes extend to the largest value times this factor.
    pub axis_padding: f64,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            slot_count: 5,
            default_entities: ["Germany", "India", "United States", "Belgium", "Sweden"]
                .into_iter()
                .map(String::from)
                .collect(),
            default_year: 2010,
            first_year: 2000,
            year_count: 23,
            default_range: (2015, 2022),
            life_expectancy_path: PathBuf::from("LifeExpectency.csv"),
            expenditure_path: PathBuf::from("Expenditure.csv"),
            consultations_path: PathBuf::from("doctors_consultations_in_person_dataset.csv"),
            axis_padding: 1.2,
        }
    }
}

impl ChartConfig {
    /// Read and validate a JSON config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("invalid config {}", path.display()))?;
        Ok(config)
    }

    /// Reject year settings that would run past the `Year` range.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.year_count <= MAX_YEAR_COUNT,
            "year_count {} exceeds {MAX_YEAR_COUNT}",
            self.year_count
        );
        ensure!(
            self.first_year
                .checked_add(self.year_count.saturating_sub(1) as Year)
                .is_some(),
            "first_year {} + year_count {} overflows",
            self.first_year,
            self.year_count
        );
        Ok(())
    }

    /// Load `path` if it exists, otherwise defaults. A broken file is
    /// logged and replaced by defaults rather than aborting startup.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            log::info!("No {} found, using default settings", path.display());
            return Self::default();
        }
        match Self::from_file(path) {
            Ok(config) => {
                log::info!("Loaded settings from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("Ignoring settings: {e:#}");
                Self::default()
            }
        }
    }

    /// Years melted from the scatter datasets.
    pub fn scatter_years(&self) -> Vec<Year> {
        year_span(self.first_year, self.year_count)
    }

    /// Last scatter year (inclusive).
    pub fn last_year(&self) -> Year {
        let span = Year::try_from(self.year_count.saturating_sub(1)).unwrap_or(Year::MAX);
        self.first_year.saturating_add(span)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_cover_2000_to_2022() {
        let config = ChartConfig::default();
        let years = config.scatter_years();
        assert_eq!(years.first(), Some(&2000));
        assert_eq!(years.last(), Some(&2022));
        assert_eq!(config.last_year(), 2022);
        assert_eq!(config.default_entities.len(), config.slot_count);
    }

    #[test]
    fn test_partial_json_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "slot_count": 3, "default_year": 2015 }}"#).unwrap();

        let config = ChartConfig::from_file(file.path()).unwrap();
        assert_eq!(config.slot_count, 3);
        assert_eq!(config.default_year, 2015);
        assert_eq!(config.first_year, 2000);
        assert_eq!(config.axis_padding, 1.2);
    }

    #[test]
    fn test_invalid_json_falls_back_to_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        assert!(ChartConfig::from_file(file.path()).is_err());
        assert_eq!(ChartConfig::load_or_default(file.path()), ChartConfig::default());
    }

    #[test]
    fn test_huge_year_count_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "year_count": 18446744073709551615 }}"#).unwrap();

        let err = ChartConfig::from_file(file.path()).unwrap_err();
        assert!(format!("{err:#}").contains("year_count"));
        assert_eq!(ChartConfig::load_or_default(file.path()), ChartConfig::default());
    }

    #[test]
    fn test_year_overflow_is_rejected() {
        let config = ChartConfig {
            first_year: Year::MAX - 5,
            year_count: 23,
            ..ChartConfig::default()
        };
        assert!(config.validate().is_err());
        assert_eq!(config.last_year(), Year::MAX);
        assert!(ChartConfig::default().validate().is_ok());
    }

    #[test]
    fn test_absent_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = ChartConfig::load_or_default(&dir.path().join(CONFIG_FILE));
        assert_eq!(config, ChartConfig::default());
    }
}
