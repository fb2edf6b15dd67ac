mod app;
mod color;
mod state;
mod ui;

use std::path::Path;

use app::HealthChartsApp;
use eframe::egui;
use health_charts::config::{ChartConfig, CONFIG_FILE};

fn main() -> eframe::Result {
    env_logger::init();

    let config = ChartConfig::load_or_default(Path::new(CONFIG_FILE));

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Health Charts",
        options,
        Box::new(|_cc| Ok(Box::new(HealthChartsApp::new(config)))),
    )
}
