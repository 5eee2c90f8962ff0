use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

use crate::error::Result;
use crate::heuristic::Heuristic;

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub grid: GridConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub visual: VisualConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize)]
pub struct GridConfig {
    /// Cells per side
    #[serde(default = "default_rows")]
    pub rows: usize,
    /// Window width and height in pixels
    #[serde(default = "default_width")]
    pub width: usize,
}

#[derive(Debug, Deserialize)]
pub struct SearchConfig {
    #[serde(default)]
    pub heuristic: Heuristic,
    /// Engine steps taken between two rendered frames
    #[serde(default = "default_steps_per_frame")]
    pub steps_per_frame: usize,
}

#[derive(Debug, Deserialize)]
pub struct VisualConfig {
    #[serde(default = "default_window_title")]
    pub window_title: String,
}

#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// `tracing-subscriber` filter directive; `RUST_LOG` takes precedence
    #[serde(default = "default_filter")]
    pub filter: String,
    /// Where to write the JSON trace of each finished search
    #[serde(default)]
    pub trace_path: Option<String>,
}

// Default values
fn default_rows() -> usize { 50 }
fn default_width() -> usize { 600 }
fn default_steps_per_frame() -> usize { 1 }
fn default_window_title() -> String { "Path finding using the A* algorithm".to_string() }
fn default_filter() -> String { "info".to_string() }

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            rows: default_rows(),
            width: default_width(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            heuristic: Heuristic::default(),
            steps_per_frame: default_steps_per_frame(),
        }
    }
}

impl Default for VisualConfig {
    fn default() -> Self {
        Self {
            window_title: default_window_title(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
            trace_path: None,
        }
    }
}

impl Config {
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let mut config: Config = toml::from_str(contents)?;
        config.sanitize();
        Ok(config)
    }

    /// Zero-sized grids and zero-step frames would stall the host
    fn sanitize(&mut self) {
        if self.grid.rows == 0 {
            warn!("grid.rows must be positive, using {}", default_rows());
            self.grid.rows = default_rows();
        }
        if self.search.steps_per_frame == 0 {
            self.search.steps_per_frame = default_steps_per_frame();
        }
    }

    /// Load configuration from `config.toml`, or use defaults if it is missing or invalid
    pub fn load() -> Self {
        Self::load_from(DEFAULT_CONFIG_PATH)
    }

    pub fn load_from(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(contents) => match Self::from_toml_str(&contents) {
                Ok(config) => {
                    info!(path = %path.display(), "loaded configuration");
                    config
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "using default configuration");
                    Config::default()
                }
            },
            Err(_) => {
                info!(path = %path.display(), "no configuration file, using defaults");
                Config::default()
            }
        }
    }
}
