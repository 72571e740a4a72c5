use std::ffi::OsString;
use std::path::PathBuf;
use thiserror::Error;

const APP_DIR_NAME: &str = "upcheck";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AppPathsError {
    #[error("Could not determine home directory")]
    HomeDirUnavailable,
    #[error("Could not determine config directory")]
    ConfigDirUnavailable,
    #[error("Could not determine cache directory")]
    CacheDirUnavailable,
    #[error("Could not determine data directory")]
    DataDirUnavailable,
    #[error("Unable to find temp directory.")]
    TempDirUnavailable,
}

pub struct AppPaths {
    pub config_dir: PathBuf,
    pub cache_dir: PathBuf,
    pub data_dir: PathBuf,
}

impl AppPaths {
    /// Build application paths for the current platform.
    ///
    /// # Errors
    /// Returns an error when a required base directory (for example the user
    /// home/config/cache/data directory) cannot be determined.
    pub fn new() -> Result<Self, AppPathsError> {
        #[cfg(target_os = "macos")]
        {
            let home = dirs::home_dir().ok_or(AppPathsError::HomeDirUnavailable)?;
            Ok(Self {
                config_dir: home.join("Library/Application Support").join(APP_DIR_NAME),
                cache_dir: home.join("Library/Caches").join(APP_DIR_NAME),
                data_dir: home.join("Library/Application Support").join(APP_DIR_NAME),
            })
        }

        #[cfg(not(target_os = "macos"))]
        {
            Ok(Self {
                config_dir: dirs::config_dir()
                    .ok_or(AppPathsError::ConfigDirUnavailable)?
                    .join(APP_DIR_NAME),
                cache_dir: dirs::cache_dir()
                    .ok_or(AppPathsError::CacheDirUnavailable)?
                    .join(APP_DIR_NAME),
                data_dir: dirs::data_dir()
                    .ok_or(AppPathsError::DataDirUnavailable)?
                    .join(APP_DIR_NAME),
            })
        }
    }

    #[must_use]
    pub fn settings_file(&self) -> PathBuf {
        self.config_dir.join("settings.json")
    }

    #[must_use]
    pub fn log_file(&self) -> PathBuf {
        self.data_dir.join("debug.log")
    }

    /// Ensure all application directories exist on disk.
    ///
    /// # Errors
    /// Returns an error if any directory cannot be created.
    pub fn ensure_dirs(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.config_dir)?;
        std::fs::create_dir_all(&self.cache_dir)?;
        std::fs::create_dir_all(&self.data_dir)?;
        Ok(())
    }
}

/// Directory used to stage downloaded manifests.
///
/// `TMPDIR` wins when it is set and non-empty, otherwise the platform default
/// temp directory is used.
///
/// # Errors
/// Returns [`AppPathsError::TempDirUnavailable`] when neither source yields a
/// usable directory.
pub fn resolve_temp_dir() -> Result<PathBuf, AppPathsError> {
    temp_dir_from(std::env::var_os("TMPDIR"), std::env::temp_dir())
}

fn temp_dir_from(tmpdir: Option<OsString>, fallback: PathBuf) -> Result<PathBuf, AppPathsError> {
    let candidate = tmpdir
        .filter(|value| !value.is_empty())
        .map_or(fallback, PathBuf::from);

    if candidate.as_os_str().is_empty() {
        return Err(AppPathsError::TempDirUnavailable);
    }

    log::debug!("Using temp directory {}", candidate.display());
    Ok(candidate)
}
