use std::path::PathBuf;

use eframe::egui::Color32;
use health_charts::config::ChartConfig;
use health_charts::data::filter::unique_entities;
use health_charts::data::join::join;
use health_charts::data::loader::{load_pair, spawn_load_file, PendingLoad};
use health_charts::data::model::{
    JoinedRecord, LongRecord, SelectionState, WideTable, Year, YearSelection,
};
use health_charts::data::reshape::{reshape, reshape_table, MissingPolicy};

use crate::color::{generate_palette, ColorMap};

// ---------------------------------------------------------------------------
// Loaded datasets
// ---------------------------------------------------------------------------

/// Life expectancy joined with expenditure, for the scatter view.
pub struct ScatterData {
    pub records: Vec<JoinedRecord>,
    pub entities: Vec<String>,
    pub colors: ColorMap,
}

/// One wide dataset melted to long form, for the line and stacked views.
pub struct SeriesData {
    pub source: PathBuf,
    pub records: Vec<LongRecord>,
    /// Entities in file row order (checkbox order).
    pub entities: Vec<String>,
    /// Header years in column order, including years with no values.
    pub years: Vec<Year>,
    pub year_bounds: (Year, Year),
    pub colors: ColorMap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Scatter,
    Line,
    Stacked,
}

impl View {
    pub const ALL: [View; 3] = [View::Scatter, View::Line, View::Stacked];

    pub fn label(self) -> &'static str {
        match self {
            View::Scatter => "Life expectancy vs expenditure",
            View::Line => "Trend lines",
            View::Stacked => "Stacked bars",
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering. Derived chart data is not
/// stored here; the plots rebuild it from these fields every frame.
pub struct AppState {
    pub config: ChartConfig,
    pub view: View,

    pub scatter: Option<ScatterData>,
    pub series: Option<SeriesData>,

    /// Scatter dropdown slots and year.
    pub selection: SelectionState,
    /// Checked entities (file row order) and year range for the line and
    /// stacked views. Rebuilt with `SelectionState::new` on every checkbox
    /// change, so its slot count is the number of checked entities.
    pub series_selection: SelectionState,
    /// Colour of each scatter slot.
    pub slot_colors: Vec<Color32>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    pending_scatter: Option<PendingLoad<Vec<JoinedRecord>>>,
    pending_series: Option<(PathBuf, PendingLoad<WideTable>)>,
}

impl AppState {
    pub fn new(config: ChartConfig) -> Self {
        let (start, end) = config.default_range;
        Self {
            selection: SelectionState::from_config(&config),
            series_selection: SelectionState::new(Vec::new(), YearSelection::Range(start, end)),
            slot_colors: generate_palette(config.slot_count),
            config,
            view: View::Scatter,
            scatter: None,
            series: None,
            status_message: None,
            pending_scatter: None,
            pending_series: None,
        }
    }

    /// Whether any file load is still in flight.
    pub fn loading(&self) -> bool {
        self.pending_scatter.is_some() || self.pending_series.is_some()
    }

    /// Labels of the loads still running, for the status bar.
    pub fn loading_labels(&self) -> Vec<&str> {
        let scatter = self.pending_scatter.iter().map(|p| p.label.as_str());
        let series = self.pending_series.iter().map(|(_, p)| p.label.as_str());
        scatter.chain(series).collect()
    }

    // -- Loading --

    /// Load, melt and join the two scatter datasets in the background.
    /// Refused (with a status message) while a scatter load is already
    /// running; returns whether a load was started.
    pub fn start_scatter_load(&mut self) -> bool {
        if let Some(pending) = &self.pending_scatter {
            self.status_message = Some(format!(
                "Still loading {}, try again shortly",
                pending.label
            ));
            log::warn!("Scatter reload ignored: load already in flight");
            return false;
        }
        let primary = self.config.life_expectancy_path.clone();
        let secondary = self.config.expenditure_path.clone();
        let years = self.config.scatter_years();

        let label = format!("{} + {}", primary.display(), secondary.display());
        self.pending_scatter = Some(PendingLoad::spawn(label, move || {
            let (life, spend) = load_pair(&primary, &secondary)?;
            let life: Vec<LongRecord> =
                reshape(&life.rows, &years, MissingPolicy::Zero).collect();
            let spend: Vec<LongRecord> =
                reshape(&spend.rows, &years, MissingPolicy::Zero).collect();
            Ok(join(&life, &spend))
        }));
        true
    }

    /// Load a wide dataset for the line and stacked views. Refused (with a
    /// status message naming the dropped file) while another one is
    /// loading; returns whether a load was started.
    pub fn start_series_load(&mut self, path: PathBuf) -> bool {
        if let Some((current, _)) = &self.pending_series {
            self.status_message = Some(format!(
                "Not opening {}: still loading {}",
                path.display(),
                current.display()
            ));
            log::warn!("Ignored request to open {} during another load", path.display());
            return false;
        }
        self.pending_series = Some((path.clone(), spawn_load_file(path)));
        true
    }

    /// Collect finished background loads. Returns `true` while any load is
    /// still running.
    pub fn poll_loads(&mut self) -> bool {
        if let Some(result) = self.pending_scatter.as_ref().and_then(PendingLoad::poll) {
            self.pending_scatter = None;
            match result {
                Ok(records) => self.set_scatter(records),
                Err(e) => self.report_error(&e),
            }
        }

        let finished = self
            .pending_series
            .as_ref()
            .and_then(|(_, pending)| pending.poll());
        if let Some(result) = finished {
            if let Some((source, _)) = self.pending_series.take() {
                match result {
                    Ok(table) => self.set_series(source, &table),
                    Err(e) => self.report_error(&e),
                }
            }
        }

        self.loading()
    }

    fn report_error(&mut self, e: &dyn std::error::Error) {
        log::error!("Load failed: {e}");
        self.status_message = Some(format!("Error: {e}"));
    }

    /// Ingest joined scatter records and colour entities by sorted index.
    pub fn set_scatter(&mut self, records: Vec<JoinedRecord>) {
        let entities = unique_entities(&records);
        log::info!(
            "Scatter data: {} records for {} countries",
            records.len(),
            entities.len()
        );
        let colors = ColorMap::new(&entities);
        self.scatter = Some(ScatterData {
            records,
            entities,
            colors,
        });
        self.status_message = None;
    }

    /// Ingest a series table. Missing cells are dropped so lines show gaps;
    /// the stacked view zero-fills them again when pivoting. Checkboxes
    /// start cleared and the range is clamped to the file's years.
    pub fn set_series(&mut self, source: PathBuf, table: &WideTable) {
        let records = reshape_table(table, MissingPolicy::Omit);
        let entities = table.entities();
        let year_bounds = table.year_bounds().unwrap_or(self.config.default_range);

        let (start, end) = self.config.default_range;
        let (lo, hi) = year_bounds;
        let start = start.max(lo).min(hi);
        let end = end.max(lo).min(hi);

        self.series = Some(SeriesData {
            source,
            colors: ColorMap::new(&entities),
            records,
            entities,
            years: table.years.clone(),
            year_bounds,
        });
        self.series_selection = SelectionState::new(Vec::new(), YearSelection::Range(start, end));
        self.status_message = None;
    }

    // -- Scatter selection --

    pub fn set_slot(&mut self, index: usize, entity: &str) {
        self.selection = self.selection.clone().with_slot(index, entity);
    }

    pub fn set_year(&mut self, year: Year) {
        self.selection = self.selection.clone().with_year(year);
    }

    pub fn scatter_year(&self) -> Year {
        self.selection.years.bounds().0
    }

    // -- Series selection --

    pub fn series_range(&self) -> (Year, Year) {
        self.series_selection.years.bounds()
    }

    pub fn set_range(&mut self, start: Year, end: Year) {
        self.series_selection = self.series_selection.clone().with_range(start, end);
    }

    pub fn is_checked(&self, entity: &str) -> bool {
        self.series_selection.slots().iter().any(|e| e == entity)
    }

    /// Flip one checkbox. Checked entities stay in file row order.
    pub fn toggle_entity(&mut self, entity: &str) {
        let Some(series) = &self.series else {
            return;
        };
        let was_checked = self.is_checked(entity);
        let checked: Vec<String> = series
            .entities
            .iter()
            .filter(|e| {
                if e.as_str() == entity {
                    !was_checked
                } else {
                    self.is_checked(e)
                }
            })
            .cloned()
            .collect();
        self.series_selection = SelectionState::new(checked, self.series_selection.years);
    }

    pub fn select_all(&mut self) {
        if let Some(series) = &self.series {
            self.series_selection =
                SelectionState::new(series.entities.clone(), self.series_selection.years);
        }
    }

    pub fn select_none(&mut self) {
        self.series_selection = SelectionState::new(Vec::new(), self.series_selection.years);
    }
}
