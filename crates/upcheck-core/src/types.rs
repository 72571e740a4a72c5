use serde::Serialize;
use std::fmt;

use upcheck_platform::HostPlatform;

use crate::version::VersionInfo;

const UNKNOWN: &str = "Unknown";

/// Operating system family a release is built for.
///
/// Manifests spell [`TargetPlatform::Linux`] as `"Ubuntu"`: the older schemas
/// only ever shipped one Linux flavor and the wire name stuck.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum TargetPlatform {
    #[default]
    Unknown,
    Windows,
    #[serde(rename = "Ubuntu")]
    Linux,
    #[serde(rename = "RHEL")]
    Rhel,
    Darwin,
}

impl TargetPlatform {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => UNKNOWN,
            Self::Windows => "Windows",
            Self::Linux => "Ubuntu",
            Self::Rhel => "RHEL",
            Self::Darwin => "Darwin",
        }
    }

    /// Decode a manifest platform name. `"Unknown"` is not accepted.
    #[must_use]
    pub fn from_wire(value: &str) -> Option<Self> {
        match value {
            "Windows" => Some(Self::Windows),
            "Ubuntu" => Some(Self::Linux),
            "RHEL" => Some(Self::Rhel),
            "Darwin" => Some(Self::Darwin),
            _ => None,
        }
    }
}

impl From<HostPlatform> for TargetPlatform {
    fn from(host: HostPlatform) -> Self {
        match host {
            HostPlatform::Windows => Self::Windows,
            HostPlatform::Linux => Self::Linux,
            HostPlatform::MacOs => Self::Darwin,
            HostPlatform::Other => Self::Unknown,
        }
    }
}

impl fmt::Display for TargetPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum PackageType {
    #[default]
    Unknown,
    #[serde(rename = "ZIP")]
    Zip,
    #[serde(rename = "MSI")]
    Msi,
    #[serde(rename = "TAR")]
    Tar,
    #[serde(rename = "RPM")]
    Rpm,
    Debian,
}

impl PackageType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => UNKNOWN,
            Self::Zip => "ZIP",
            Self::Msi => "MSI",
            Self::Tar => "TAR",
            Self::Rpm => "RPM",
            Self::Debian => "Debian",
        }
    }

    #[must_use]
    pub fn from_wire(value: &str) -> Option<Self> {
        match value {
            "ZIP" => Some(Self::Zip),
            "MSI" => Some(Self::Msi),
            "TAR" => Some(Self::Tar),
            "RPM" => Some(Self::Rpm),
            "Debian" => Some(Self::Debian),
            _ => None,
        }
    }
}

impl fmt::Display for PackageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum ReleaseType {
    #[default]
    Unknown,
    #[serde(rename = "GA")]
    GeneralAvailability,
    Beta,
    Alpha,
    Patch,
    Development,
}

impl ReleaseType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => UNKNOWN,
            Self::GeneralAvailability => "GA",
            Self::Beta => "Beta",
            Self::Alpha => "Alpha",
            Self::Patch => "Patch",
            Self::Development => "Development",
        }
    }

    #[must_use]
    pub fn from_wire(value: &str) -> Option<Self> {
        match value {
            "GA" => Some(Self::GeneralAvailability),
            "Beta" => Some(Self::Beta),
            "Alpha" => Some(Self::Alpha),
            "Patch" => Some(Self::Patch),
            "Development" => Some(Self::Development),
            _ => None,
        }
    }
}

impl fmt::Display for ReleaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InfoPageLink {
    pub url: String,
    pub page_description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DownloadLink {
    pub url: String,
    pub package_type: PackageType,
    pub package_name: Option<String>,
}

/// One publishable version, restricted to a set of target platforms.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReleaseInfo {
    pub version: VersionInfo,
    pub date: String,
    pub title: String,
    pub target_platforms: Vec<TargetPlatform>,
    pub release_type: ReleaseType,
    pub tags: Vec<String>,
    pub download_links: Vec<DownloadLink>,
    pub info_links: Vec<InfoPageLink>,
}

impl ReleaseInfo {
    #[must_use]
    pub fn targets(&self, platform: TargetPlatform) -> bool {
        self.target_platforms.contains(&platform)
    }
}

/// Canonical (schema 1.6 shaped) result of a manifest check.
///
/// `is_update_available` is never read from the manifest; it is computed by
/// the update decision step and stays `false` for anything that failed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UpdateInfo {
    pub is_update_available: bool,
    pub releases: Vec<ReleaseInfo>,
}
