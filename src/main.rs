//! CSV Dashboard - load, browse and compare CSV files
//!
//! A desktop dashboard showing CSV files in a sortable grid with statistics
//! and comparison charts.

mod charts;
mod config;
mod data;
mod gui;
mod stats;

use anyhow::Result;
use config::{DashboardConfig, CONFIG_FILE_NAME};
use eframe::egui;
use gui::DashboardApp;
use std::path::Path;
use tracing::info;

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let config = DashboardConfig::load_or_default(Path::new(CONFIG_FILE_NAME));
    info!("Starting CSV Dashboard");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.window_width, config.window_height])
            .with_min_inner_size([800.0, 500.0])
            .with_title("CSV Dashboard"),
        ..Default::default()
    };

    eframe::run_native(
        "CSV Dashboard",
        options,
        Box::new(|cc| Ok(Box::new(DashboardApp::new(cc, config)))),
    )
    .map_err(|e| anyhow::anyhow!("Failed to run app: {}", e))?;

    Ok(())
}
