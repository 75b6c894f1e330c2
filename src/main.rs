mod analysis;
mod app;
mod color;
mod config;
mod data;
mod export;
mod state;
mod ui;

use std::path::PathBuf;

use app::PressureApp;
use config::Settings;
use eframe::egui;
use state::AppState;

fn main() -> eframe::Result {
    env_logger::init();

    let config_path = Settings::config_path();
    let (settings, config_error) = match Settings::load(&config_path) {
        Ok(settings) => (settings, None),
        Err(e) => {
            log::warn!("Ignoring config: {e:#}");
            (Settings::default(), Some(format!("Config ignored: {e:#}")))
        }
    };

    let mut state = AppState::new(settings);
    state.status_message = config_error;
    // Optional first argument: a data file to open at startup.
    if let Some(path) = std::env::args_os().nth(1).map(PathBuf::from) {
        state.open_path(&path);
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        "Pressure Data Analysis Tool",
        options,
        Box::new(|_cc| Ok(Box::new(PressureApp::new(state)))),
    )
}
