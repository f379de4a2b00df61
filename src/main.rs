mod app;
mod color;
mod data;
mod error;
mod settings;
mod state;
mod ui;

use app::DielectricLabApp;
use eframe::egui;
use settings::Settings;
use state::AppState;

fn main() -> eframe::Result {
    env_logger::init();

    let settings = Settings::load();
    log::info!("Starting with instrument {}", settings.instrument());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([700.0, 450.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Dielectric Lab – Permittivity Viewer",
        options,
        Box::new(|_cc| Ok(Box::new(DielectricLabApp::new(AppState::new(settings))))),
    )
}
