mod app;
mod color;
mod config;
mod data;
mod session;
mod ui;

use std::path::Path;

use app::DashboardApp;
use config::{DashboardConfig, CONFIG_FILE_NAME};
use data::loader::DataSource;
use eframe::egui;
use session::Session;

fn main() -> eframe::Result {
    env_logger::init();

    let config = DashboardConfig::load(Path::new(CONFIG_FILE_NAME)).unwrap_or_else(|e| {
        log::error!("Ignoring config: {e}");
        DashboardConfig::default()
    });
    let title = config.title.clone();

    let mut session = Session::new(config);
    if let Some(source) = session.config.source.clone() {
        // A missing default sheet is not fatal; the error shows in the top bar.
        let _ = session.open(DataSource::parse(&source));
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([640.0, 420.0]),
        ..Default::default()
    };

    eframe::run_native(
        &title,
        options,
        Box::new(|_cc| Ok(Box::new(DashboardApp::new(session)))),
    )
}
