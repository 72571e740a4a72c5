//! Fetcher that delegates downloads to the external download assistant.
//!
//! The helper is invoked as `<helper> <url> <local_path>` and is expected to
//! write the body to `local_path` and exit with status 0.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, warn};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio_util::sync::CancellationToken;

use upcheck_platform::{HostPlatform, helper_command};

use crate::fetch::{ContentFetcher, FetchError, StagingDir, load_file};

pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

pub struct HelperDownloader {
    program: PathBuf,
    staging: StagingDir,
    cancel: CancellationToken,
}

impl HelperDownloader {
    #[must_use]
    pub fn new(program: impl Into<PathBuf>, staging: StagingDir) -> Self {
        Self {
            program: program.into(),
            staging,
            cancel: CancellationToken::new(),
        }
    }

    /// Find the helper: an explicit path wins, then `PATH`, then the
    /// directory of the running executable.
    ///
    /// # Errors
    /// Returns [`FetchError::Launch`] when the helper cannot be found.
    pub fn locate(explicit: Option<&Path>, staging: StagingDir) -> Result<Self, FetchError> {
        if let Some(path) = explicit {
            return Ok(Self::new(path, staging));
        }

        let name = HostPlatform::current().downloader_file_name();
        let found = which::which(name).ok().or_else(|| {
            std::env::current_exe()
                .ok()
                .and_then(|exe| exe.parent().map(|dir| dir.join(name)))
                .filter(|candidate| candidate.is_file())
        });

        match found {
            Some(path) => {
                debug!("Using downloader at {}", path.display());
                Ok(Self::new(path, staging))
            }
            None => Err(FetchError::Launch {
                program: name.to_string(),
                source: std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "not found on PATH or next to the executable",
                ),
            }),
        }
    }

    /// Kill the helper and abandon the fetch when `token` is cancelled.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    async fn run(&self, url: &str, dest: &Path) -> Result<(), FetchError> {
        let program = self.program.display().to_string();
        let mut child = helper_command(&self.program, [OsStr::new(url), dest.as_os_str()])
            .spawn()
            .map_err(|source| FetchError::Launch {
                program: program.clone(),
                source,
            })?;

        let stdout = tokio::spawn(drain(child.stdout.take()));
        let stderr = tokio::spawn(drain(child.stderr.take()));
        let mut ticker = tokio::time::interval(POLL_INTERVAL);

        let status = loop {
            tokio::select! {
                () = self.cancel.cancelled() => {
                    warn!("Cancelling download of {url}; stopping {program}");
                    if let Err(error) = child.kill().await {
                        warn!("Failed to stop {program}: {error}");
                    }
                    return Err(FetchError::Cancelled);
                }
                _ = ticker.tick() => {
                    let polled = child.try_wait().map_err(|source| FetchError::Launch {
                        program: program.clone(),
                        source,
                    })?;
                    if let Some(status) = polled {
                        break status;
                    }
                }
            }
        };

        let _ = stdout.await;
        let stderr = stderr.await.unwrap_or_default();

        if status.success() {
            info!("{program} downloaded {url}");
            Ok(())
        } else {
            let details = stderr.trim();
            Err(FetchError::download(if details.is_empty() {
                format!("{program} exited with {status}")
            } else {
                format!("{program} exited with {status}: {details}")
            }))
        }
    }
}

#[async_trait]
impl ContentFetcher for HelperDownloader {
    async fn fetch(&self, url: &str, file_name: &str) -> Result<Vec<u8>, FetchError> {
        let dest = self.staging.prepare(file_name).await?;
        self.run(url, &dest).await?;
        load_file(&dest).await
    }
}

async fn drain<R: AsyncRead + Unpin>(pipe: Option<R>) -> String {
    let mut text = String::new();
    if let Some(mut pipe) = pipe {
        let mut bytes = Vec::new();
        if pipe.read_to_end(&mut bytes).await.is_ok() {
            text = String::from_utf8_lossy(&bytes).into_owned();
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use tokio_util::sync::CancellationToken;

    use super::HelperDownloader;
    use crate::fetch::{ContentFetcher, FetchError, StagingDir};

    #[cfg(unix)]
    fn script(dir: &Path, name: &str, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("script should be written");
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
            .expect("script should be executable");
        path
    }

    #[test]
    fn explicit_path_is_used_as_is() {
        let downloader =
            HelperDownloader::locate(Some(Path::new("/opt/tools/rtda")), StagingDir::system())
                .expect("explicit path should be accepted");
        assert_eq!(downloader.program, PathBuf::from("/opt/tools/rtda"));
    }

    #[tokio::test]
    async fn missing_helper_is_a_launch_failure() {
        let dir = tempfile::tempdir().expect("temp dir should be created");
        let downloader = HelperDownloader::new(
            dir.path().join("no-such-rtda"),
            StagingDir::at(dir.path()),
        );

        let error = downloader
            .fetch("https://example.com/a.json", "a.json")
            .await
            .expect_err("missing helper should fail");

        assert!(matches!(error, FetchError::Launch { .. }));
        assert!(
            error
                .to_string()
                .starts_with("Failed to launch the Radeon Tools Download Assistant (rtda).")
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn helper_output_file_is_returned() {
        let dir = tempfile::tempdir().expect("temp dir should be created");
        let helper = script(dir.path(), "rtda", r#"printf '{"from":"%s"}' "$1" > "$2""#);
        let downloader = HelperDownloader::new(helper, StagingDir::at(dir.path()));

        let body = downloader
            .fetch("https://example.com/a.json", "a.json")
            .await
            .expect("helper download should succeed");

        assert_eq!(body, br#"{"from":"https://example.com/a.json"}"#);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn failing_helper_reports_stderr() {
        let dir = tempfile::tempdir().expect("temp dir should be created");
        let helper = script(dir.path(), "rtda", "echo 'connection refused' >&2; exit 3");
        let downloader = HelperDownloader::new(helper, StagingDir::at(dir.path()));

        let error = downloader
            .fetch("https://example.com/a.json", "a.json")
            .await
            .expect_err("helper failure should surface");

        assert!(matches!(error, FetchError::Download { .. }));
        assert!(error.to_string().contains("connection refused"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn cancellation_stops_the_helper() {
        let dir = tempfile::tempdir().expect("temp dir should be created");
        let helper = script(dir.path(), "rtda", "sleep 30");
        let token = CancellationToken::new();
        let downloader =
            HelperDownloader::new(helper, StagingDir::at(dir.path())).with_cancellation(token.clone());

        let canceller = tokio::spawn(async move {
            tokio::time::sleep(std::time::Duration::from_millis(150)).await;
            token.cancel();
        });

        let started = std::time::Instant::now();
        let error = downloader
            .fetch("https://example.com/a.json", "a.json")
            .await
            .expect_err("cancelled download should fail");
        canceller.await.expect("canceller should finish");

        assert!(matches!(error, FetchError::Cancelled));
        assert!(started.elapsed() < std::time::Duration::from_secs(10));
    }
}
