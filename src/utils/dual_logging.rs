use crate::utils::app_paths::AppPaths;
use crate::utils::logging::LogEntry;
use chrono::Local;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};

/// Global file logger instance
static DUAL_LOGGER: OnceLock<Option<DualLogger>> = OnceLock::new();

/// Mirrors log lines to stderr when set
pub const DEBUG_ENV_VAR: &str = "CONTACT_CLI_DEBUG";

/// File half of the dual logger; the ring buffer half lives in `logging`
pub struct DualLogger {
    log_file: Mutex<File>,
    log_path: PathBuf,
}

impl DualLogger {
    /// Open a timestamped log file in `log_dir` and point `latest.log` at it
    pub fn create_in(log_dir: &Path) -> std::io::Result<Self> {
        std::fs::create_dir_all(log_dir)?;

        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        let log_path = log_dir.join(format!("contact-cli_{}.log", timestamp));

        #[cfg(unix)]
        {
            let latest_path = log_dir.join("latest.log");
            let _ = std::fs::remove_file(&latest_path);
            let _ = std::os::unix::fs::symlink(&log_path, &latest_path);
        }

        let log_file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        Ok(Self {
            log_file: Mutex::new(log_file),
            log_path,
        })
    }

    pub fn write_entry(&self, entry: &LogEntry) {
        let line = entry.format_for_display();

        if let Ok(mut file) = self.log_file.lock() {
            let _ = writeln!(file, "{}", line);
            let _ = file.flush();
        }

        if std::env::var_os(DEBUG_ENV_VAR).is_some() {
            eprintln!("{}", line);
        }
    }

    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    pub fn flush(&self) {
        if let Ok(mut file) = self.log_file.lock() {
            let _ = file.flush();
        }
    }
}

/// Initialize the global file logger. Returns `None` when no log file could
/// be opened; logging then stays in memory only.
pub fn init_dual_logger() -> Option<&'static DualLogger> {
    DUAL_LOGGER
        .get_or_init(|| {
            AppPaths::log_dir()
                .ok()
                .and_then(|dir| DualLogger::create_in(&dir).ok())
        })
        .as_ref()
}

/// Get the global file logger
pub fn get_dual_logger() -> Option<&'static DualLogger> {
    DUAL_LOGGER.get().and_then(Option::as_ref)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::Level;

    #[test]
    fn test_writes_to_timestamped_file() {
        let dir = tempfile::tempdir().unwrap();
        let logger = DualLogger::create_in(dir.path()).unwrap();
        logger.write_entry(&LogEntry::new(Level::INFO, "search", "hola".to_string()));
        logger.flush();

        let contents = std::fs::read_to_string(logger.log_path()).unwrap();
        assert!(contents.contains("INFO [search] hola"));
        assert!(logger
            .log_path()
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("contact-cli_"));
    }
}
