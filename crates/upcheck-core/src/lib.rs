//! Core update-check logic for upcheck.
//!
//! This crate is independent of any UI and of how the host is configured:
//! - Release manifest model and wire names.
//! - Schema 1.3 / 1.5 / 1.6 parsers and the migration into one shape.
//! - Platform filtering and the update decision.
//! - Manifest retrieval over HTTP, through the download helper, or from disk.

mod check;
pub mod decision;
mod downloader;
mod error;
pub mod fetch;
mod filter;
pub mod messages;
pub mod schema;
mod types;
mod version;

/// End-to-end check orchestration and the library's API version.
pub use check::{CheckError, UpdateChecker, api_version};
/// Reference-version override and the update decision.
pub use decision::{ASSUME_VERSION_ENV, VersionOverride, decide};
/// External download helper fetcher.
pub use downloader::HelperDownloader;
/// Error accumulation for manifest validation.
pub use error::{ErrorCollector, ManifestError, Parsed};
/// Manifest retrieval.
pub use fetch::{ContentFetcher, FetchError, HttpFetcher, ManifestLocation, StagingDir};
pub use filter::filter_for_platform;
/// Manifest dispatcher.
pub use schema::{SchemaVersion, parse_manifest};
pub use types::{
    DownloadLink, InfoPageLink, PackageType, ReleaseInfo, ReleaseType, TargetPlatform, UpdateInfo,
};
pub use version::{Comparison, VersionInfo, VersionParseError};
