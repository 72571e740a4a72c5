use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use upcheck_platform::AppPaths;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    /// URL, GitHub latest-release API endpoint, or local directory.
    #[serde(default)]
    pub manifest_location: String,

    #[serde(default)]
    pub manifest_filename: String,

    #[serde(default = "default_http_timeout")]
    pub http_timeout_secs: u64,

    #[serde(default)]
    pub fetch_method: FetchMethod,

    /// Explicit path to the download helper; searched for when unset.
    #[serde(default)]
    pub downloader_path: Option<PathBuf>,

    #[serde(default)]
    pub debug_logging: bool,

    #[serde(default = "default_max_log_size_bytes")]
    pub max_log_size_bytes: u64,

    #[serde(default)]
    pub show_tags: bool,

    #[serde(default)]
    pub output_format: OutputFormat,
}

fn default_http_timeout() -> u64 {
    10
}

fn default_max_log_size_bytes() -> u64 {
    5 * 1024 * 1024
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            manifest_location: String::new(),
            manifest_filename: String::new(),
            http_timeout_secs: default_http_timeout(),
            fetch_method: FetchMethod::default(),
            downloader_path: None,
            debug_logging: false,
            max_log_size_bytes: default_max_log_size_bytes(),
            show_tags: false,
            output_format: OutputFormat::default(),
        }
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to read settings from {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid settings in {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl AppSettings {
    /// Settings from the config directory, or defaults when there is no
    /// config directory or no settings file yet.
    ///
    /// # Errors
    /// Returns [`SettingsError`] when the file exists but cannot be read or
    /// parsed; callers fall back to defaults after reporting it.
    pub fn load() -> Result<Self, SettingsError> {
        let Ok(paths) = AppPaths::new() else {
            return Ok(Self::default());
        };
        Self::load_from(&paths.settings_file())
    }

    /// # Errors
    /// See [`AppSettings::load`].
    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn save(&self) -> Result<(), std::io::Error> {
        let paths = AppPaths::new().map_err(std::io::Error::other)?;
        paths.ensure_dirs()?;
        self.save_to(&paths.settings_file())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FetchMethod {
    /// Download directly over HTTP(S).
    #[default]
    Http,
    /// Delegate downloads to the external download helper.
    Helper,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Html,
}
