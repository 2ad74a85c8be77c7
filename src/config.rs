//! Configuration system using Figment.
//!
//! Strongly-typed settings loaded from:
//! 1. `quest-data.toml` (base configuration)
//! 2. Environment variables (prefixed with `QUEST_DATA_`)
//!
//! The display-category enumeration and the default projection window are
//! compile-time constants (see [`crate::model::DISPLAY_CATEGORIES`] and
//! [`crate::projection::DEFAULT_WINDOW`]); configuration can widen or narrow
//! the chart window but not the category set.
//!
//! # Example
//! ```no_run
//! use quest_data::config::Settings;
//!
//! # fn main() -> Result<(), figment::Error> {
//! let settings = Settings::load()?;
//! println!("API at {}", settings.api.base_url);
//! # Ok(())
//! # }
//! ```

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::projection::{Window, DEFAULT_WINDOW};

/// Top-level application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub api: ApiSettings,
    pub chart: ChartSettings,
    pub export: ExportSettings,
}

/// Application-level settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Quest API settings. The bearer token is consumed as an opaque credential;
/// session mechanics belong to the auth provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub bearer_token: String,
}

/// Chart projection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartSettings {
    /// Lookback window for the time-series projection.
    #[serde(default = "default_window")]
    pub window: Window,
}

/// Export output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportSettings {
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_app_name() -> String {
    "quest-data".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_base_url() -> String {
    "http://localhost:4000/api".to_string()
}

fn default_window() -> Window {
    DEFAULT_WINDOW
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("exports")
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            application: ApplicationSettings {
                name: default_app_name(),
                log_level: default_log_level(),
            },
            api: ApiSettings {
                base_url: default_base_url(),
                bearer_token: String::new(),
            },
            chart: ChartSettings {
                window: default_window(),
            },
            export: ExportSettings {
                output_dir: default_output_dir(),
            },
        }
    }
}

impl Settings {
    /// Load settings from `quest-data.toml` and the environment.
    ///
    /// Environment variables override the file with prefix `QUEST_DATA_`,
    /// e.g. `QUEST_DATA_APPLICATION__LOG_LEVEL=debug` or
    /// `QUEST_DATA_API__BEARER_TOKEN=...`.
    pub fn load() -> Result<Self, figment::Error> {
        Self::load_from("quest-data.toml")
    }

    /// Load settings from a specific file path, with env overrides.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, figment::Error> {
        Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed("QUEST_DATA_").split("__"))
            .extract()
    }
}
