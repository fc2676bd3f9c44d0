// Application settings
// Loaded from ~/.config/tallygrid/settings.json

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tallygrid_engine::ShortGridPolicy;

/// How new cell ids are produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdScheme {
    /// Random UUIDs (default)
    #[default]
    Random,
    /// c0, c1, c2, ... (reproducible runs)
    Sequential,
}

/// Log verbosity for the CLI's stderr output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Off,
    Error,
    #[default]
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // Grid bounds (enforced by the session, not the grid itself)
    #[serde(rename = "grid.maxRows")]
    pub max_rows: usize,

    #[serde(rename = "grid.maxColumns")]
    pub max_columns: usize,

    // Search
    #[serde(rename = "search.shortGridPolicy")]
    pub short_grid_policy: ShortGridPolicy,

    #[serde(rename = "search.highlightCount")]
    pub highlight_count: usize,

    // Cells
    #[serde(rename = "cells.idScheme")]
    pub id_scheme: IdScheme,

    // Logging
    #[serde(rename = "log.level")]
    pub log_level: LogLevel,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_rows: 100,
            max_columns: 100,
            short_grid_policy: ShortGridPolicy::Reject,
            highlight_count: 0,
            id_scheme: IdScheme::Random,
            log_level: LogLevel::Warn,
        }
    }
}

/// Template written by `Settings::write_default_file`
const DEFAULT_CONFIG: &str = r#"{
    // Grid bounds
    "grid.maxRows": 100,
    "grid.maxColumns": 100,

    // Proximity search
    // Grids with fewer than 4 cells: "reject" or "treat_missing_as_different"
    "search.shortGridPolicy": "reject",
    "search.highlightCount": 0,

    // Cell ids: "random" or "sequential"
    "cells.idScheme": "random",

    // Logging: "off", "error", "warn", "info", "debug", "trace"
    "log.level": "warn"
}
"#;

impl Settings {
    /// Get the settings file path
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("tallygrid");
        config_dir.join("settings.json")
    }

    /// Load settings from `path`, falling back to defaults.
    /// A missing file is not an error.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(contents) => match Self::parse(&contents) {
                Ok(settings) => settings,
                Err(e) => {
                    log::warn!("Error parsing {}: {}", path.display(), e);
                    log::warn!("Using default settings");
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Error reading {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Parse settings JSON. Lines starting with // are comments.
    pub fn parse(contents: &str) -> Result<Self, serde_json::Error> {
        let cleaned: String = contents
            .lines()
            .filter(|line| !line.trim().starts_with("//"))
            .collect::<Vec<_>>()
            .join("\n");

        serde_json::from_str(&cleaned)
    }

    /// Write the commented default file. Refuses to overwrite.
    pub fn write_default_file(path: &Path) -> Result<(), String> {
        if path.exists() {
            return Err(format!("{} already exists", path.display()));
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| e.to_string())?;
        }
        fs::write(path, DEFAULT_CONFIG).map_err(|e| e.to_string())
    }
}
