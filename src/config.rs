//! Dashboard Configuration Module
//! Optional JSON settings file read once at startup.

use crate::stats::DEFAULT_BINS;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

/// File looked up in the working directory at startup.
pub const CONFIG_FILE_NAME: &str = "csv_dashboard.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// User-tunable defaults. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Separator pre-filled in the main window.
    pub default_separator: String,
    pub window_width: f32,
    pub window_height: f32,
    /// Bin count for histograms.
    pub histogram_bins: usize,
    /// Sample points along each density curve.
    pub kde_points: usize,
    pub export_width: u32,
    pub export_height: u32,
    /// Open PNG exports with the system viewer.
    pub open_exported_charts: bool,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            default_separator: ",".to_string(),
            window_width: 1200.0,
            window_height: 650.0,
            histogram_bins: DEFAULT_BINS,
            kde_points: 200,
            export_width: 1000,
            export_height: 600,
            open_exported_charts: true,
        }
    }
}

impl DashboardConfig {
    /// Parse a config from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let mut config: DashboardConfig = serde_json::from_str(text)?;
        config.histogram_bins = config.histogram_bins.max(1);
        config.kde_points = config.kde_points.max(2);
        Ok(config)
    }

    /// Load the config if the file exists, falling back to defaults.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            info!("No config at {}, using defaults", path.display());
            return Self::default();
        }

        match Self::from_file(path) {
            Ok(config) => {
                info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                warn!("Ignoring config {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn partial_json_keeps_remaining_defaults() {
        let config = DashboardConfig::from_json(r#"{ "default_separator": ";", "histogram_bins": 25 }"#)
            .unwrap();
        assert_eq!(config.default_separator, ";");
        assert_eq!(config.histogram_bins, 25);
        assert_eq!(config.kde_points, 200);
        assert!(config.open_exported_charts);
    }

    #[test]
    fn zero_bins_are_clamped() {
        let config = DashboardConfig::from_json(r#"{ "histogram_bins": 0, "kde_points": 0 }"#).unwrap();
        assert_eq!(config.histogram_bins, 1);
        assert_eq!(config.kde_points, 2);
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = DashboardConfig::load_or_default(&dir.path().join(CONFIG_FILE_NAME));
        assert_eq!(config, DashboardConfig::default());
    }

    #[test]
    fn malformed_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(b"{ not json").unwrap();

        assert!(DashboardConfig::from_file(&path).is_err());
        assert_eq!(DashboardConfig::load_or_default(&path), DashboardConfig::default());
    }
}
