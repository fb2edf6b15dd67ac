use eframe::egui::{Color32, RichText, Ui};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints, Points};
use health_charts::data::extent::{padded_max, value_extent};
use health_charts::data::filter::{
    filter_by_entities, pivot_by_year, records_for_year, series_by_entity,
};
use health_charts::data::model::{SlotMatch, Year};
use health_charts::data::stack::stack;

use crate::state::{AppState, View};

// ---------------------------------------------------------------------------
// Central panel
// ---------------------------------------------------------------------------

/// Render the active chart. All chart data is rebuilt from the current
/// selection on every call.
pub fn chart(ui: &mut Ui, state: &AppState) {
    match state.view {
        View::Scatter => scatter_plot(ui, state),
        View::Line => line_plot(ui, state),
        View::Stacked => stacked_plot(ui, state),
    }
}

fn placeholder(ui: &mut Ui, text: &str) {
    ui.centered_and_justified(|ui: &mut Ui| {
        ui.heading(text);
    });
}

// ---------------------------------------------------------------------------
// Scatter: life expectancy vs expenditure for one year
// ---------------------------------------------------------------------------

fn scatter_plot(ui: &mut Ui, state: &AppState) {
    let Some(scatter) = &state.scatter else {
        placeholder(ui, "Waiting for life expectancy and expenditure data…");
        return;
    };

    let year = state.scatter_year();
    let year_records = records_for_year(&scatter.records, year);
    let slots = filter_by_entities(&scatter.records, state.selection.slots(), year);

    let missing: Vec<(String, Year)> = slots
        .iter()
        .filter_map(|m| match m {
            SlotMatch::NoData { entity, year } => Some((entity.clone(), *year)),
            SlotMatch::Found(_) => None,
        })
        .collect();
    if let Some(note) = no_data_note(&missing) {
        ui.label(RichText::new(note).color(Color32::YELLOW));
    }

    let padding = state.config.axis_padding;
    let x_max = padded_max(year_records.iter().map(|r| r.value_b), padding);
    let y_max = padded_max(year_records.iter().map(|r| r.value_a), padding);

    Plot::new("scatter_plot")
        .legend(Legend::default())
        .x_axis_label("Expenditure (Percentage of GDP)")
        .y_axis_label("Life Expectancy (years)")
        .include_x(0.0)
        .include_x(x_max)
        .include_y(0.0)
        .include_y(y_max)
        .label_formatter(|name, value| {
            if name.is_empty() {
                String::new()
            } else {
                format!(
                    "{name}\nLife Expectancy: {:.1}\nExpenditure: {:.2}",
                    value.y, value.x
                )
            }
        })
        .show(ui, |plot_ui| {
            for rec in &year_records {
                let points = Points::new(PlotPoints::from(vec![[rec.value_b, rec.value_a]]))
                    .name(&rec.entity)
                    .color(scatter.colors.color_for(&rec.entity))
                    .radius(4.0);
                plot_ui.points(points);
            }

            // Selected slots drawn larger on top, in their slot colour.
            for (i, slot) in slots.iter().enumerate() {
                let Some(rec) = slot.record() else {
                    continue;
                };
                let color = state.slot_colors.get(i).copied().unwrap_or(Color32::WHITE);
                let points = Points::new(PlotPoints::from(vec![[rec.value_b, rec.value_a]]))
                    .name(&rec.entity)
                    .color(color)
                    .radius(9.0);
                plot_ui.points(points);
            }
        });
}

/// Text for the slots the scatter view could not place, if any.
fn no_data_note(missing: &[(String, Year)]) -> Option<String> {
    if missing.is_empty() {
        return None;
    }
    let names: Vec<String> = missing
        .iter()
        .map(|(entity, year)| {
            if entity.is_empty() {
                format!("(empty slot) in {year}")
            } else {
                format!("{entity} in {year}")
            }
        })
        .collect();
    Some(format!("No data for {}", names.join(", ")))
}

// ---------------------------------------------------------------------------
// Line chart: one series per checked country
// ---------------------------------------------------------------------------

fn line_plot(ui: &mut Ui, state: &AppState) {
    let Some(series) = &state.series else {
        placeholder(ui, "Open a dataset to view trends  (File → Open dataset…)");
        return;
    };

    let (start, end) = state.series_range();
    let lines = series_by_entity(&series.records, state.series_selection.slots(), start, end);
    let extent = value_extent(
        lines
            .iter()
            .flat_map(|(_, points)| points.iter().map(|(_, v)| *v)),
    );

    let mut plot = Plot::new("line_plot")
        .legend(Legend::default())
        .x_axis_label("Year")
        .y_axis_label("Value")
        .include_x(start as f64)
        .include_x(end as f64);
    if let Some((lo, hi)) = extent {
        plot = plot.include_y(lo).include_y(hi);
    }

    plot.show(ui, |plot_ui| {
        for (entity, points) in &lines {
            let color = series.colors.color_for(entity);
            let coords: Vec<[f64; 2]> = points
                .iter()
                .map(|(year, v)| [*year as f64, *v])
                .collect();

            plot_ui.line(
                Line::new(PlotPoints::from(coords.clone()))
                    .name(entity)
                    .color(color)
                    .width(2.0),
            );
            plot_ui.points(
                Points::new(PlotPoints::from(coords))
                    .name(entity)
                    .color(color)
                    .radius(3.0),
            );
        }
    });
}

// ---------------------------------------------------------------------------
// Stacked bars: per-year stacks of the checked countries
// ---------------------------------------------------------------------------

fn stacked_plot(ui: &mut Ui, state: &AppState) {
    let Some(series) = &state.series else {
        placeholder(ui, "Open a dataset to view stacked bars  (File → Open dataset…)");
        return;
    };

    let (start, end) = state.series_range();
    let checked = state.series_selection.slots();
    let rows = pivot_by_year(&series.records, &series.years, checked, start, end);
    let stacked = stack(&rows, checked);

    Plot::new("stacked_plot")
        .legend(Legend::default())
        .x_axis_label("Year")
        .y_axis_label("Value")
        .include_y(0.0)
        .include_y(stacked.max_high)
        .show(ui, |plot_ui| {
            for (i, entity) in checked.iter().enumerate() {
                let bars: Vec<Bar> = stacked
                    .bands
                    .iter()
                    .filter_map(|(year, bands)| {
                        let band = bands.get(i)?;
                        Some(
                            Bar::new(*year as f64, band.value())
                                .base_offset(band.low)
                                .width(0.8)
                                .name(format!("{entity} {year}")),
                        )
                    })
                    .collect();

                let chart = BarChart::new(bars)
                    .name(entity)
                    .color(series.colors.color_for(entity))
                    .element_formatter(Box::new(|bar: &Bar, _chart: &BarChart| {
                        format!("{}\nValue: {:.2}", bar.name, bar.value)
                    }));
                plot_ui.bar_chart(chart);
            }
        });
}
