//! Single-release shape shared by schemas 1.3 and 1.5, and its migration to
//! the canonical multi-release form.

use log::debug;

use crate::types::{
    DownloadLink, InfoPageLink, PackageType, ReleaseInfo, ReleaseType, TargetPlatform, UpdateInfo,
};
use crate::version::VersionInfo;

/// One downloadable package of a legacy manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LegacyPackage {
    pub url: String,
    pub package_type: PackageType,
    pub release_type: ReleaseType,
    pub target_platforms: Vec<TargetPlatform>,
}

/// A legacy manifest describes exactly one version; the platform split lives
/// on each package instead of on the release.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LegacyUpdateInfo {
    pub release_version: VersionInfo,
    pub release_date: String,
    pub release_description: String,
    pub available_packages: Vec<LegacyPackage>,
    pub info_links: Vec<InfoPageLink>,
}

impl LegacyUpdateInfo {
    /// Regroup packages into one release per distinct
    /// `(target_platforms, release_type)` pair, in first-seen order.
    ///
    /// New releases inherit the document's version, date, description (as
    /// title) and info links, and are tagged with their platform names
    /// followed by the release type.
    #[must_use]
    pub fn migrate(mut self) -> UpdateInfo {
        let packages = std::mem::take(&mut self.available_packages);
        let mut releases: Vec<ReleaseInfo> = Vec::new();

        for package in packages {
            let index = match releases.iter().position(|release| {
                release.target_platforms == package.target_platforms
                    && release.release_type == package.release_type
            }) {
                Some(index) => index,
                None => {
                    releases.push(self.seed_release(&package));
                    releases.len() - 1
                }
            };

            releases[index].download_links.push(DownloadLink {
                url: package.url,
                package_type: package.package_type,
                package_name: None,
            });
        }

        debug!(
            "Migrated legacy manifest {} into {} release(s)",
            self.release_version,
            releases.len()
        );

        UpdateInfo {
            is_update_available: false,
            releases,
        }
    }

    fn seed_release(&self, package: &LegacyPackage) -> ReleaseInfo {
        let tags = package
            .target_platforms
            .iter()
            .map(|platform| platform.as_str().to_owned())
            .chain(std::iter::once(package.release_type.as_str().to_owned()))
            .collect();

        ReleaseInfo {
            version: self.release_version,
            date: self.release_date.clone(),
            title: self.release_description.clone(),
            target_platforms: package.target_platforms.clone(),
            release_type: package.release_type,
            tags,
            download_links: Vec::new(),
            info_links: self.info_links.clone(),
        }
    }
}
