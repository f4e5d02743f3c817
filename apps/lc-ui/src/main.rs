#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app;
mod views;

use std::path::PathBuf;

use app::OscillatorApp;
use lc_app::SimConfig;

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt::init();

    // Optional config file as the only argument.
    let (config, load_error) = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => match lc_app::load_yaml(&path) {
            Ok(config) => (config, None),
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "config not loaded");
                (SimConfig::default(), Some(e.to_string()))
            }
        },
        None => (SimConfig::default(), None),
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 650.0])
            .with_title("LC Oscillations"),
        ..Default::default()
    };

    eframe::run_native(
        "LC Oscillations",
        options,
        Box::new(move |cc| Ok(Box::new(OscillatorApp::new(cc, config, load_error)))),
    )
}
