use std::sync::Arc;

use log::{debug, info};
use thiserror::Error;

use crate::decision::{self, VersionOverride};
use crate::error::ManifestError;
use crate::fetch::{self, ContentFetcher, FetchError, ManifestLocation};
use crate::filter;
use crate::schema;
use crate::types::{TargetPlatform, UpdateInfo};
use crate::version::VersionInfo;

const API_VERSION: VersionInfo = VersionInfo::new(2, 0, 0, 0);

/// Version of this library's update-check API.
#[must_use]
pub const fn api_version() -> VersionInfo {
    API_VERSION
}

#[derive(Debug, Error)]
pub enum CheckError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Manifest(#[from] ManifestError),
}

impl CheckError {
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Fetch(FetchError::Cancelled))
    }
}

/// Runs the full check: fetch, parse, filter for the host platform, decide.
///
/// Holds no per-check state, so one checker can serve any number of checks.
#[derive(Clone)]
pub struct UpdateChecker {
    fetcher: Arc<dyn ContentFetcher>,
    platform: TargetPlatform,
    version_override: VersionOverride,
}

impl UpdateChecker {
    #[must_use]
    pub fn new(fetcher: Arc<dyn ContentFetcher>, platform: TargetPlatform) -> Self {
        Self {
            fetcher,
            platform,
            version_override: VersionOverride::None,
        }
    }

    #[must_use]
    pub fn with_version_override(mut self, version_override: VersionOverride) -> Self {
        self.version_override = version_override;
        self
    }

    #[must_use]
    pub fn platform(&self) -> TargetPlatform {
        self.platform
    }

    /// Check `location`/`file_name` for releases newer than `current`.
    ///
    /// A manifest with no releases for this platform is a successful check
    /// with no update.
    ///
    /// # Errors
    /// Returns [`CheckError`] when the manifest cannot be retrieved or fails
    /// validation; `is_update_available` is never reported in that case.
    pub async fn check_for_updates(
        &self,
        current: VersionInfo,
        location: &str,
        file_name: &str,
    ) -> Result<UpdateInfo, CheckError> {
        let location = ManifestLocation::resolve(location, file_name)?;
        info!("Checking for updates at {location}");

        let content = fetch::retrieve(self.fetcher.as_ref(), &location).await?;
        let mut info = schema::parse_manifest(&content)?;

        if filter::filter_for_platform(&mut info, self.platform) {
            let reference = self.version_override.reference_version(current);
            debug!("Comparing releases against {reference}");
            decision::decide(&mut info, reference);
        }

        info!(
            "Update check finished: {} release(s), update available: {}",
            info.releases.len(),
            info.is_update_available
        );
        Ok(info)
    }
}
