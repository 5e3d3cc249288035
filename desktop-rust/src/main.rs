mod app;
mod model;

use anyhow::{anyhow, Result};
use app::DesktopApp;
use eframe::egui;
use record_confirm_common::logging::{init_logging, Verbosity};
use record_confirm_common::Config;
use tracing::warn;

fn main() -> Result<()> {
    init_logging(Verbosity::Normal);
    let config = Config::load().unwrap_or_else(|err| {
        warn!(error = %err, "using default configuration");
        Config::default()
    });
    let app = DesktopApp::new(config)?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Database Update")
            .with_inner_size([1080.0, 780.0]),
        ..Default::default()
    };
    eframe::run_native("Database Update", options, Box::new(move |_cc| Box::new(app)))
        .map_err(|err| anyhow!("window error: {err}"))
}
