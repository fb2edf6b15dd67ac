use std::path::PathBuf;

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::state::{AppState, View};

// ---------------------------------------------------------------------------
// Left side panel – selection widgets
// ---------------------------------------------------------------------------

/// Render the left selection panel for the active view. Controls are
/// disabled while a dataset is loading.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading(state.view.label());
    ui.separator();

    let enabled = !state.loading();
    ui.add_enabled_ui(enabled, |ui: &mut Ui| match state.view {
        View::Scatter => scatter_controls(ui, state),
        View::Line | View::Stacked => series_controls(ui, state),
    });
}

/// Country dropdown per slot plus the year slider.
fn scatter_controls(ui: &mut Ui, state: &mut AppState) {
    let Some(scatter) = &state.scatter else {
        ui.label("No scatter data loaded.");
        return;
    };

    let mut slot_change: Option<(usize, String)> = None;

    ui.strong("Countries");
    for (i, current) in state.selection.slots().iter().enumerate() {
        let color = state.slot_colors.get(i).copied().unwrap_or(Color32::GRAY);
        ui.horizontal(|ui: &mut Ui| {
            ui.label(RichText::new("●").color(color));
            egui::ComboBox::from_id_salt(("country_slot", i))
                .selected_text(current.as_str())
                .width(180.0)
                .show_ui(ui, |ui: &mut Ui| {
                    for entity in &scatter.entities {
                        if ui.selectable_label(current == entity, entity).clicked() {
                            slot_change = Some((i, entity.clone()));
                        }
                    }
                });
        });
    }
    ui.separator();

    let mut year = state.scatter_year();
    let slider = egui::Slider::new(&mut year, state.config.first_year..=state.config.last_year())
        .text("Year");
    let year_changed = ui.add(slider).changed();

    if let Some((i, entity)) = slot_change {
        state.set_slot(i, &entity);
    }
    if year_changed {
        state.set_year(year);
    }
}

/// Year range sliders and entity checkboxes.
fn series_controls(ui: &mut Ui, state: &mut AppState) {
    let Some(series) = &state.series else {
        ui.label("No dataset loaded.");
        return;
    };

    ui.label(format!("Dataset: {}", series.source.display()));
    ui.separator();

    let (min_year, max_year) = series.year_bounds;
    let (mut start, mut end) = state.series_range();
    ui.strong("Years");
    let start_changed = ui
        .add(egui::Slider::new(&mut start, min_year..=max_year).text("From"))
        .changed();
    let end_changed = ui
        .add(egui::Slider::new(&mut end, min_year..=max_year).text("To"))
        .changed();
    ui.separator();

    let entities = series.entities.clone();
    let mut toggled: Option<String> = None;
    let mut all = false;
    let mut none = false;

    ui.strong(format!(
        "Countries  ({}/{})",
        state.series_selection.slot_count(),
        entities.len()
    ));
    ui.horizontal(|ui: &mut Ui| {
        all = ui.small_button("All").clicked();
        none = ui.small_button("None").clicked();
    });

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for entity in &entities {
                let mut checked = state.is_checked(entity);
                let text = RichText::new(entity).color(series.colors.color_for(entity));
                if ui.checkbox(&mut checked, text).changed() {
                    toggled = Some(entity.clone());
                }
            }
        });

    if start_changed || end_changed {
        state.set_range(start, end);
    }
    if all {
        state.select_all();
    } else if none {
        state.select_none();
    } else if let Some(entity) = toggled {
        state.toggle_entity(&entity);
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        let idle = !state.loading();
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.add_enabled(idle, egui::Button::new("Open dataset…")).clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui
                .add_enabled(idle, egui::Button::new("Reload scatter data"))
                .clicked()
            {
                state.start_scatter_load();
                ui.close_menu();
            }
        });

        ui.separator();

        for view in View::ALL {
            if ui.selectable_label(state.view == view, view.label()).clicked() {
                state.view = view;
            }
        }

        ui.separator();

        let loading = state.loading_labels();
        if !loading.is_empty() {
            ui.spinner();
            ui.label(format!("Loading {}", loading.join(", ")));
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file: Option<PathBuf> = rfd::FileDialog::new()
        .set_title("Open wide CSV dataset")
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        log::info!("Opening {}", path.display());
        if state.start_series_load(path) && state.view == View::Scatter {
            state.view = View::Line;
        }
    }
}
