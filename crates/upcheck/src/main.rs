use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use log::{debug, error, warn};
use tokio_util::sync::CancellationToken;
use upcheck::cli::Cli;
use upcheck::controller::{CheckRequest, ControllerEvent, UpdateCheckController};
use upcheck::error::AppError;
use upcheck::settings::{AppSettings, FetchMethod};
use upcheck::{logging, report};
use upcheck_core::{
    ContentFetcher, HelperDownloader, HttpFetcher, StagingDir, TargetPlatform, UpdateChecker,
    VersionInfo, VersionOverride, api_version,
};
use upcheck_platform::HostPlatform;

fn main() -> ExitCode {
    let cli = Cli::parse();
    if cli.api_version {
        println!("{}", api_version());
        return ExitCode::SUCCESS;
    }

    let (mut settings, load_problem) = match AppSettings::load() {
        Ok(settings) => (settings, None),
        Err(error) => (AppSettings::default(), Some(error)),
    };
    cli.apply_to(&mut settings);
    logging::init_logging(settings.debug_logging, settings.max_log_size_bytes);
    if let Some(error) = load_problem {
        warn!("{error}; using default settings");
    }

    match run(&cli, &settings) {
        Ok(code) => code,
        Err(error) => {
            error!("{error}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli, settings: &AppSettings) -> Result<ExitCode, AppError> {
    if cli.save_settings {
        settings.save().map_err(AppError::settings_save_failed)?;
    }
    if settings.manifest_location.is_empty() && settings.manifest_filename.is_empty() {
        return Err(AppError::MissingManifestLocation);
    }

    let raw_current = cli.current.as_deref().unwrap_or_default();
    let current: VersionInfo = raw_current
        .parse()
        .map_err(|_| AppError::invalid_current_version(raw_current))?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| AppError::operation_failed("Starting the async runtime", e))?;

    let cancel = CancellationToken::new();
    let fetcher = build_fetcher(settings, &cancel)?;
    let platform = cli.platform.map_or_else(
        || TargetPlatform::from(HostPlatform::current()),
        TargetPlatform::from,
    );
    debug!("Checking as {platform} with the {:?} fetcher", settings.fetch_method);

    let checker =
        UpdateChecker::new(fetcher, platform).with_version_override(VersionOverride::from_env());
    let mut controller = UpdateCheckController::new(
        checker,
        CheckRequest {
            current,
            location: settings.manifest_location.clone(),
            file_name: settings.manifest_filename.clone(),
        },
        runtime.handle().clone(),
        cancel,
    );
    controller
        .start()
        .map_err(|e| AppError::operation_failed("Update check", e))?;

    let event = match controller.wait(cli.deadline.map(Duration::from_secs)) {
        Some(event) => event,
        None => {
            controller.cancel();
            controller.wait(None).unwrap_or(ControllerEvent::Cancelled)
        }
    };

    match event {
        ControllerEvent::Completed(results) => {
            let rendered = report::render(&results, settings.output_format, settings.show_tags);
            println!("{}", rendered.trim_end());
            Ok(if results.was_check_successful {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        ControllerEvent::Cancelled => Err(AppError::operation_cancelled("Update check")),
    }
}

fn build_fetcher(
    settings: &AppSettings,
    cancel: &CancellationToken,
) -> Result<Arc<dyn ContentFetcher>, AppError> {
    match settings.fetch_method {
        FetchMethod::Http => {
            let fetcher = HttpFetcher::new(
                Duration::from_secs(settings.http_timeout_secs),
                StagingDir::system(),
            )
            .map_err(|e| AppError::fetcher_unavailable("HTTP", e))?;
            Ok(Arc::new(fetcher))
        }
        FetchMethod::Helper => {
            let fetcher =
                HelperDownloader::locate(settings.downloader_path.as_deref(), StagingDir::system())
                    .map_err(|e| AppError::fetcher_unavailable("helper", e))?
                    .with_cancellation(cancel.clone());
            Ok(Arc::new(fetcher))
        }
    }
}
