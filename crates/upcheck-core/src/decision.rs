use log::{debug, warn};

use crate::types::UpdateInfo;
use crate::version::VersionInfo;

/// Environment variable that replaces the caller's version during a check.
pub const ASSUME_VERSION_ENV: &str = "RDTS_UPDATER_ASSUME_VERSION";

/// Version used when the override is set but cannot be parsed.
pub const FALLBACK_VERSION: VersionInfo = VersionInfo::new(1, 0, 0, 0);

/// Explicit replacement for the caller's current version.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum VersionOverride {
    #[default]
    None,
    Assume(VersionInfo),
}

impl VersionOverride {
    /// Read [`ASSUME_VERSION_ENV`] once. An unparseable value falls back to
    /// [`FALLBACK_VERSION`] rather than being ignored.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_value(std::env::var(ASSUME_VERSION_ENV).ok().as_deref())
    }

    #[must_use]
    pub fn from_value(value: Option<&str>) -> Self {
        let Some(value) = value else {
            return Self::None;
        };

        match value.parse::<VersionInfo>() {
            Ok(version) => {
                warn!("{ASSUME_VERSION_ENV} is set; assuming current version {version}");
                Self::Assume(version)
            }
            Err(e) => {
                warn!("{ASSUME_VERSION_ENV} is invalid ({e}); assuming {FALLBACK_VERSION}");
                Self::Assume(FALLBACK_VERSION)
            }
        }
    }

    #[must_use]
    pub fn reference_version(self, current: VersionInfo) -> VersionInfo {
        match self {
            Self::None => current,
            Self::Assume(version) => version,
        }
    }
}

/// Mark `info` as having an update when any release is newer than
/// `reference`. Releases are scanned in list order; the first newer one wins.
pub fn decide(info: &mut UpdateInfo, reference: VersionInfo) -> bool {
    let newer = info
        .releases
        .iter()
        .find(|release| release.version.is_newer_than(&reference));

    if let Some(release) = newer {
        debug!("Release {} is newer than {reference}", release.version);
        info.is_update_available = true;
    }

    info.is_update_available
}
