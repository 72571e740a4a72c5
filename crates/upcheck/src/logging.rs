use simplelog::{
    ColorChoice, CombinedLogger, ConfigBuilder, LevelFilter, SharedLogger, TermLogger,
    TerminalMode, WriteLogger,
};
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use upcheck_platform::AppPaths;

/// Appends to the log file, recreating it if it disappears mid-run.
struct ResilientFileWriter {
    path: PathBuf,
    file: Mutex<Option<File>>,
}

impl ResilientFileWriter {
    fn new(path: PathBuf) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self {
            path,
            file: Mutex::new(Some(file)),
        })
    }

    fn ensure_file(&self) -> io::Result<()> {
        let mut guard = self
            .file
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        if !self.path.exists() {
            if let Some(parent) = self.path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            *guard = Some(
                OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(&self.path)?,
            );
        }

        Ok(())
    }
}

impl Write for ResilientFileWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.ensure_file()?;
        let mut guard = self
            .file
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        match guard.as_mut() {
            Some(file) => file.write(buf),
            None => Err(io::Error::other("log file not available")),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut guard = self
            .file
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        guard.as_mut().map_or(Ok(()), File::flush)
    }
}

/// Drops the older half of the log, cutting at a line boundary.
fn trim_log_file_if_oversized(log_path: &Path, max_log_size: u64) {
    if let Ok(metadata) = std::fs::metadata(log_path)
        && metadata.len() > max_log_size
        && let Ok(contents) = std::fs::read(log_path)
    {
        let half = contents.len() / 2;
        let keep_from = contents[half..]
            .iter()
            .position(|&b| b == b'\n')
            .map_or(half, |pos| half + pos + 1);
        let _ = std::fs::write(log_path, &contents[keep_from..]);
    }
}

/// Install the stderr logger and, when the data directory is usable, a file
/// logger. Returns the log file path if file logging is active.
pub fn init_logging(debug_enabled: bool, max_log_size: u64) -> Option<PathBuf> {
    let log_path = AppPaths::new()
        .ok()
        .filter(|paths| paths.ensure_dirs().is_ok())
        .map(|paths| paths.log_file());

    if let Some(path) = &log_path {
        trim_log_file_if_oversized(path, max_log_size);
    }

    let config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .add_filter_allow_str("upcheck")
        .build();

    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::with_capacity(2);
    loggers.push(TermLogger::new(
        LevelFilter::Debug,
        config.clone(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    ));

    let file_path = log_path.and_then(|path| match ResilientFileWriter::new(path.clone()) {
        Ok(writer) => {
            loggers.push(WriteLogger::new(LevelFilter::Debug, config, writer));
            Some(path)
        }
        Err(_) => None,
    });

    let _ = CombinedLogger::init(loggers);
    set_logging_enabled(debug_enabled);

    if let Some(path) = &file_path {
        log::info!("Debug logging initialized, log file: {}", path.display());
    }

    file_path
}

/// Debug output on or off. Warnings and errors are always kept.
pub fn set_logging_enabled(enabled: bool) {
    if enabled {
        log::set_max_level(log::LevelFilter::Debug);
    } else {
        log::set_max_level(log::LevelFilter::Warn);
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use super::{ResilientFileWriter, set_logging_enabled, trim_log_file_if_oversized};

    #[test]
    fn resilient_writer_recreates_missing_file_on_write() {
        let temp_dir = tempfile::tempdir().expect("temporary directory should be created");
        let log_path = temp_dir.path().join("upcheck.log");
        let mut writer =
            ResilientFileWriter::new(log_path.clone()).expect("writer should open log file");

        writer
            .write_all(b"check started\n")
            .expect("initial write should succeed");
        std::fs::remove_file(&log_path).expect("log file should be removable");
        writer
            .write_all(b"check finished\n")
            .expect("writer should recreate file after deletion");

        let contents =
            std::fs::read_to_string(&log_path).expect("recreated file should be readable");
        assert_eq!(contents, "check finished\n");
    }

    #[test]
    fn trim_log_file_keeps_recent_half() {
        let temp_dir = tempfile::tempdir().expect("temporary directory should be created");
        let log_path = temp_dir.path().join("debug.log");
        std::fs::write(&log_path, "line-1\nline-2\nline-3\nline-4\nline-5\n")
            .expect("test log file should be written");

        trim_log_file_if_oversized(&log_path, 10);

        let trimmed =
            std::fs::read_to_string(&log_path).expect("trimmed log file should be readable");
        assert!(trimmed.starts_with("line-4\n") || trimmed.starts_with("line-3\n"));
        assert!(!trimmed.contains("line-1"));
        assert!(trimmed.ends_with("line-5\n"));
    }

    #[test]
    fn small_log_file_is_left_alone() {
        let temp_dir = tempfile::tempdir().expect("temporary directory should be created");
        let log_path = temp_dir.path().join("debug.log");
        std::fs::write(&log_path, "short\n").expect("test log file should be written");

        trim_log_file_if_oversized(&log_path, 1024);

        let contents = std::fs::read_to_string(&log_path).expect("log file should be readable");
        assert_eq!(contents, "short\n");
    }

    #[test]
    fn set_logging_enabled_updates_global_level() {
        set_logging_enabled(true);
        assert_eq!(log::max_level(), log::LevelFilter::Debug);

        set_logging_enabled(false);
        assert_eq!(log::max_level(), log::LevelFilter::Warn);
    }
}
