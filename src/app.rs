use std::time::Duration;

use eframe::egui;
use health_charts::config::ChartConfig;

use crate::state::AppState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct HealthChartsApp {
    pub state: AppState,
}

impl HealthChartsApp {
    /// Build the app and start loading the configured datasets.
    pub fn new(config: ChartConfig) -> Self {
        let mut state = AppState::new(config);
        state.start_scatter_load();
        let consultations = state.config.consultations_path.clone();
        state.start_series_load(consultations);
        Self { state }
    }
}

impl eframe::App for HealthChartsApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Keep polling background loads until they resolve.
        if self.state.poll_loads() {
            ctx.request_repaint_after(Duration::from_millis(50));
        }

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: selection controls ----
        egui::SidePanel::left("selection_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: chart ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::chart(ui, &self.state);
        });
    }
}
