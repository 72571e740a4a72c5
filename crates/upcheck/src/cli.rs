use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use upcheck_core::TargetPlatform;

use crate::settings::{AppSettings, FetchMethod, OutputFormat};

#[derive(Parser, Debug)]
#[command(
    name = "upcheck",
    author,
    version,
    about = "Checks a release manifest for newer versions of an application"
)]
pub struct Cli {
    /// Version of the running application, as major.minor.patch.build.
    #[arg(short, long, required_unless_present = "api_version")]
    pub current: Option<String>,

    /// Manifest URL, GitHub latest-release API endpoint, or local directory.
    #[arg(short, long)]
    pub location: Option<String>,

    /// Manifest file name; must be a .json file.
    #[arg(short, long = "file")]
    pub file_name: Option<String>,

    #[arg(short, long, value_enum)]
    pub method: Option<FetchMethod>,

    /// Path to the download helper used by `--method helper`.
    #[arg(long)]
    pub downloader: Option<PathBuf>,

    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Check for another platform than the one this binary was built for.
    #[arg(long, value_enum)]
    pub platform: Option<PlatformArg>,

    #[arg(long)]
    pub show_tags: bool,

    #[arg(long)]
    pub debug: bool,

    /// HTTP request timeout in seconds.
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Give up and cancel the check after this many seconds.
    #[arg(long)]
    pub deadline: Option<u64>,

    /// Persist the effective settings before checking.
    #[arg(long)]
    pub save_settings: bool,

    /// Print the update-check API version and exit.
    #[arg(long)]
    pub api_version: bool,
}

impl Cli {
    /// Command-line values win over the settings file.
    pub fn apply_to(&self, settings: &mut AppSettings) {
        if let Some(location) = &self.location {
            settings.manifest_location.clone_from(location);
        }
        if let Some(file_name) = &self.file_name {
            settings.manifest_filename.clone_from(file_name);
        }
        if let Some(method) = self.method {
            settings.fetch_method = method;
        }
        if let Some(downloader) = &self.downloader {
            settings.downloader_path = Some(downloader.clone());
        }
        if let Some(format) = self.format {
            settings.output_format = format;
        }
        if let Some(timeout) = self.timeout {
            settings.http_timeout_secs = timeout;
        }
        settings.show_tags |= self.show_tags;
        settings.debug_logging |= self.debug;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PlatformArg {
    Windows,
    Linux,
    Rhel,
    Darwin,
}

impl From<PlatformArg> for TargetPlatform {
    fn from(value: PlatformArg) -> Self {
        match value {
            PlatformArg::Windows => Self::Windows,
            PlatformArg::Linux => Self::Linux,
            PlatformArg::Rhel => Self::Rhel,
            PlatformArg::Darwin => Self::Darwin,
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use upcheck_core::TargetPlatform;

    use super::{Cli, PlatformArg};
    use crate::settings::{AppSettings, FetchMethod, OutputFormat};

    #[test]
    fn flags_override_settings() {
        let cli = Cli::try_parse_from([
            "upcheck",
            "--current",
            "1.2.0.0",
            "--location",
            "https://example.com/updates",
            "--file",
            "rgp.json",
            "--method",
            "helper",
            "--format",
            "html",
            "--timeout",
            "3",
            "--show-tags",
        ])
        .expect("arguments should parse");
        let mut settings = AppSettings {
            manifest_location: "/old".to_string(),
            ..AppSettings::default()
        };

        cli.apply_to(&mut settings);

        assert_eq!(settings.manifest_location, "https://example.com/updates");
        assert_eq!(settings.manifest_filename, "rgp.json");
        assert_eq!(settings.fetch_method, FetchMethod::Helper);
        assert_eq!(settings.output_format, OutputFormat::Html);
        assert_eq!(settings.http_timeout_secs, 3);
        assert!(settings.show_tags);
        assert!(!settings.debug_logging);
    }

    #[test]
    fn absent_flags_keep_settings() {
        let cli = Cli::try_parse_from(["upcheck", "-c", "1.0.0.0"]).expect("arguments should parse");
        let mut settings = AppSettings {
            manifest_location: "/srv/manifests".to_string(),
            show_tags: true,
            ..AppSettings::default()
        };

        cli.apply_to(&mut settings);

        assert_eq!(settings.manifest_location, "/srv/manifests");
        assert!(settings.show_tags);
    }

    #[test]
    fn current_version_is_required_unless_asking_for_api_version() {
        assert!(Cli::try_parse_from(["upcheck"]).is_err());
        assert!(Cli::try_parse_from(["upcheck", "--api-version"]).is_ok());
    }

    #[test]
    fn platform_argument_maps_to_wire_platform() {
        let cli = Cli::try_parse_from(["upcheck", "-c", "1.0.0.0", "--platform", "linux"])
            .expect("arguments should parse");

        assert_eq!(cli.platform, Some(PlatformArg::Linux));
        assert_eq!(TargetPlatform::from(PlatformArg::Linux).as_str(), "Ubuntu");
    }
}
