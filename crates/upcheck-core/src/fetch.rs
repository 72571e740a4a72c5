use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info};
use serde::Deserialize;
use thiserror::Error;
use tokio::io::AsyncWriteExt;

use upcheck_platform::{AppPathsError, resolve_temp_dir};

use crate::messages;

const GITHUB_LATEST_RELEASE: &str = "/releases/latest";
const HTTP_PREFIX: &str = "http";
const JSON_EXTENSION: &str = ".json";
const USER_AGENT: &str = concat!("upcheck/", env!("CARGO_PKG_VERSION"));

/// Staging file name for the GitHub latest-release API response.
pub const LATEST_RELEASE_FILE_NAME: &str = "LatestRelease.json";
const FALLBACK_FILE_NAME: &str = "version.json";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("{}", messages::URL_MUST_POINT_TO_A_JSON_FILE)]
    NotJson,

    #[error("Manifest file name {file_name} must be relative to the location {location}")]
    AbsoluteFileName { location: String, file_name: String },

    #[error(transparent)]
    TempDir(#[from] AppPathsError),

    #[error("{prefix} {program}: {source}", prefix = messages::FAILED_TO_LAUNCH_DOWNLOADER)]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{prefix} {details}", prefix = messages::FAILED_TO_DOWNLOAD_VERSION_FILE)]
    Download { details: String },

    #[error("{prefix} {source}", prefix = messages::FAILED_TO_DOWNLOAD_VERSION_FILE)]
    Http {
        #[source]
        source: reqwest::Error,
    },

    #[error("{prefix} HTTP {status}{body_snippet}", prefix = messages::FAILED_TO_DOWNLOAD_VERSION_FILE)]
    HttpStatus {
        status: reqwest::StatusCode,
        body_snippet: String,
    },

    #[error("{prefix} {}: {source}", .path.display(), prefix = messages::FAILED_TO_LOAD_VERSION_FILE)]
    Load {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}", messages::DOWNLOADED_AN_EMPTY_VERSION_FILE)]
    Empty,

    #[error("{prefix} {details}", prefix = messages::FAILED_TO_LOAD_LATEST_RELEASE)]
    LatestRelease { details: String },

    #[error("{}", messages::MISSING_ASSETS)]
    MissingAssets,

    #[error("{}{}", messages::ASSET_NOT_FOUND, api_suffix(.api_message.as_deref()))]
    AssetNotFound { api_message: Option<String> },

    #[error("{}", messages::ASSET_DOWNLOAD_URL_NOT_FOUND)]
    AssetUrlMissing,

    #[error("The update check was cancelled.")]
    Cancelled,
}

fn api_suffix(message: Option<&str>) -> String {
    message.map(|m| format!(" {m}")).unwrap_or_default()
}

impl FetchError {
    pub(crate) fn download(details: impl fmt::Display) -> Self {
        Self::Download {
            details: details.to_string(),
        }
    }

    pub(crate) fn load(path: &Path, source: std::io::Error) -> Self {
        Self::Load {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Something that can retrieve the body of a URL.
///
/// `file_name` is the name the content is staged under on disk; fetchers
/// that do not stage may ignore it.
#[async_trait]
pub trait ContentFetcher: Send + Sync {
    async fn fetch(&self, url: &str, file_name: &str) -> Result<Vec<u8>, FetchError>;
}

/// Where a manifest lives, derived from the caller's location and file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestLocation {
    /// A GitHub `releases/latest` API URL; the manifest is the release asset
    /// called `asset_name`.
    GitHubLatest { api_url: String, asset_name: String },
    Remote(String),
    Local(PathBuf),
}

impl ManifestLocation {
    /// Classify `location`, joining `file_name` onto it where relevant.
    ///
    /// # Errors
    /// Returns [`FetchError::NotJson`] unless the file name names a JSON
    /// file. An empty file name is accepted when `location` itself names one.
    /// Returns [`FetchError::AbsoluteFileName`] when a local directory is
    /// given together with an absolute file name.
    pub fn resolve(location: &str, file_name: &str) -> Result<Self, FetchError> {
        let names_json = if file_name.is_empty() {
            location.contains(JSON_EXTENSION)
        } else {
            file_name.contains(JSON_EXTENSION)
        };
        if !names_json {
            return Err(FetchError::NotJson);
        }

        let resolved = if location.contains(GITHUB_LATEST_RELEASE) {
            Self::GitHubLatest {
                api_url: location.to_owned(),
                asset_name: file_name.to_owned(),
            }
        } else if location.starts_with(HTTP_PREFIX) {
            if file_name.is_empty() {
                Self::Remote(location.to_owned())
            } else {
                Self::Remote(format!("{location}/{file_name}"))
            }
        } else if location.is_empty() {
            Self::Local(PathBuf::from(file_name))
        } else if Path::new(file_name).is_absolute() {
            return Err(FetchError::AbsoluteFileName {
                location: location.to_owned(),
                file_name: file_name.to_owned(),
            });
        } else {
            Self::Local(Path::new(location).join(file_name))
        };

        debug!("Resolved manifest location: {resolved}");
        Ok(resolved)
    }
}

impl fmt::Display for ManifestLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GitHubLatest {
                api_url,
                asset_name,
            } => write!(f, "asset {asset_name} of {api_url}"),
            Self::Remote(url) => f.write_str(url),
            Self::Local(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Retrieve the raw manifest bytes for `location`.
///
/// # Errors
/// Returns the first [`FetchError`] met along the way.
pub async fn retrieve(
    fetcher: &dyn ContentFetcher,
    location: &ManifestLocation,
) -> Result<Vec<u8>, FetchError> {
    match location {
        ManifestLocation::GitHubLatest {
            api_url,
            asset_name,
        } => {
            let release = fetcher.fetch(api_url, LATEST_RELEASE_FILE_NAME).await?;
            let url = latest_release_asset_url(&release, asset_name)?;
            debug!("Found asset {asset_name} at {url}");
            fetcher.fetch(&url, download_file_name(&url)).await
        }
        ManifestLocation::Remote(url) => fetcher.fetch(url, download_file_name(url)).await,
        ManifestLocation::Local(path) => load_file(path).await,
    }
}

/// Read a manifest from disk, rejecting empty files.
///
/// # Errors
/// [`FetchError::Load`] when the file cannot be read, [`FetchError::Empty`]
/// when it has no content.
pub async fn load_file(path: &Path) -> Result<Vec<u8>, FetchError> {
    let content = tokio::fs::read(path)
        .await
        .map_err(|error| FetchError::load(path, error))?;
    if content.is_empty() {
        return Err(FetchError::Empty);
    }
    Ok(content)
}

/// Local file name for a downloaded URL: its last path segment with any
/// query string removed.
#[must_use]
pub fn download_file_name(url: &str) -> &str {
    let without_query = url.rsplit_once('?').map_or(url, |(head, _)| head);
    let name = without_query
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(without_query);
    if name.is_empty() || name == ".." {
        FALLBACK_FILE_NAME
    } else {
        name
    }
}

#[derive(Deserialize)]
struct GitHubAsset {
    name: Option<String>,
    browser_download_url: Option<String>,
}

#[derive(Deserialize)]
struct GitHubRelease {
    assets: Option<Vec<GitHubAsset>>,
    message: Option<String>,
}

/// Find the download URL of `asset_name` in a GitHub latest-release
/// response.
///
/// # Errors
/// Non-JSON bodies (for example a captive portal page) yield
/// [`FetchError::LatestRelease`]. When the asset is missing, any `message`
/// from the API response is carried along.
pub fn latest_release_asset_url(release: &[u8], asset_name: &str) -> Result<String, FetchError> {
    let release: GitHubRelease =
        serde_json::from_slice(release).map_err(|error| FetchError::LatestRelease {
            details: error.to_string(),
        })?;

    let Some(assets) = release.assets else {
        return Err(FetchError::MissingAssets);
    };

    let Some(asset) = assets
        .into_iter()
        .find(|asset| asset.name.as_deref() == Some(asset_name))
    else {
        return Err(FetchError::AssetNotFound {
            api_message: release.message,
        });
    };

    asset.browser_download_url.ok_or(FetchError::AssetUrlMissing)
}

/// Directory downloads are staged in before being read back.
#[derive(Debug, Clone, Default)]
pub struct StagingDir(Option<PathBuf>);

impl StagingDir {
    /// Stage in the system temp directory, resolved on each use.
    #[must_use]
    pub fn system() -> Self {
        Self(None)
    }

    #[must_use]
    pub fn at(dir: impl Into<PathBuf>) -> Self {
        Self(Some(dir.into()))
    }

    /// Path for `file_name`, with any stale copy from an earlier run removed.
    ///
    /// # Errors
    /// Fails when no temp directory can be found or the stale file cannot be
    /// removed.
    pub async fn prepare(&self, file_name: &str) -> Result<PathBuf, FetchError> {
        let dir = match &self.0 {
            Some(dir) => dir.clone(),
            None => resolve_temp_dir()?,
        };
        let path = dir.join(file_name);

        match tokio::fs::remove_file(&path).await {
            Ok(()) => debug!("Removed stale {}", path.display()),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {}
            Err(error) => return Err(FetchError::load(&path, error)),
        }

        Ok(path)
    }
}

/// Downloads over HTTP(S) with `reqwest`, streaming the body to the staging
/// directory.
pub struct HttpFetcher {
    client: reqwest::Client,
    staging: StagingDir,
}

impl HttpFetcher {
    /// # Errors
    /// Returns [`FetchError::Http`] when the client cannot be built.
    pub fn new(timeout: Duration, staging: StagingDir) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|source| FetchError::Http { source })?;
        Ok(Self { client, staging })
    }

    async fn download(&self, url: &str, dest: &Path) -> Result<(), FetchError> {
        use futures_util::StreamExt;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Http { source })?;

        if !response.status().is_success() {
            let status = response.status();
            let body_snippet = response
                .text()
                .await
                .ok()
                .map(|body| response_snippet(&body, 160))
                .unwrap_or_default();
            return Err(FetchError::HttpStatus {
                status,
                body_snippet,
            });
        }

        let mut file = tokio::fs::File::create(dest)
            .await
            .map_err(|error| FetchError::load(dest, error))?;
        let mut downloaded: u64 = 0;

        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|source| FetchError::Http { source })?;
            file.write_all(&chunk)
                .await
                .map_err(|error| FetchError::load(dest, error))?;
            downloaded += chunk.len() as u64;
        }

        file.flush()
            .await
            .map_err(|error| FetchError::load(dest, error))?;

        info!("Downloaded {downloaded} bytes from {url}");
        Ok(())
    }
}

#[async_trait]
impl ContentFetcher for HttpFetcher {
    async fn fetch(&self, url: &str, file_name: &str) -> Result<Vec<u8>, FetchError> {
        let dest = self.staging.prepare(file_name).await?;
        self.download(url, &dest).await?;
        load_file(&dest).await
    }
}

fn response_snippet(body: &str, max_chars: usize) -> String {
    let snippet: String = body.trim().chars().take(max_chars).collect();
    if snippet.is_empty() {
        String::new()
    } else {
        format!(": {snippet}")
    }
}
