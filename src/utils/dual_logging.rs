use chrono::Local;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};
use tracing::Level;

use crate::utils::app_paths::AppPaths;

/// Mirrors every log line to stderr when set
pub const DEBUG_ENV: &str = "CASHFLOW_GRID_DEBUG";

static DUAL_LOGGER: OnceLock<DualLogger> = OnceLock::new();

fn get_log_dir() -> PathBuf {
    AppPaths::log_dir().unwrap_or_else(|_| std::env::temp_dir().join("cashflow-grid"))
}

/// Appends log lines to a timestamped file
pub struct DualLogger {
    log_file: Mutex<Option<File>>,
    log_path: PathBuf,
}

impl DualLogger {
    pub fn new() -> Self {
        Self::in_dir(&get_log_dir())
    }

    pub fn in_dir(log_dir: &Path) -> Self {
        let _ = std::fs::create_dir_all(log_dir);

        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        let log_path = log_dir.join(format!("cashflow-grid_{}.log", timestamp));

        #[cfg(unix)]
        {
            let latest_path = log_dir.join("latest.log");
            let _ = std::fs::remove_file(&latest_path);
            let _ = std::os::unix::fs::symlink(&log_path, &latest_path);
        }

        let log_file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)
            .ok();

        Self {
            log_file: Mutex::new(log_file),
            log_path,
        }
    }

    pub fn log(&self, level: Level, target: &str, message: &str) {
        let line = format!(
            "[{}] {} [{}] {}",
            Local::now().format("%H:%M:%S.%3f"),
            level.to_string().to_uppercase(),
            target,
            message
        );

        if let Ok(mut file_opt) = self.log_file.lock() {
            if let Some(ref mut file) = *file_opt {
                let _ = writeln!(file, "{}", line);
                let _ = file.flush();
            }
        }

        if std::env::var(DEBUG_ENV).is_ok() {
            eprintln!("{}", line);
        }
    }

    pub fn log_path(&self) -> &PathBuf {
        &self.log_path
    }

    pub fn flush(&self) {
        if let Ok(mut file_opt) = self.log_file.lock() {
            if let Some(ref mut file) = *file_opt {
                let _ = file.flush();
            }
        }
    }
}

impl Default for DualLogger {
    fn default() -> Self {
        Self::new()
    }
}

pub fn init_dual_logger() -> &'static DualLogger {
    DUAL_LOGGER.get_or_init(DualLogger::new)
}

pub fn get_dual_logger() -> Option<&'static DualLogger> {
    DUAL_LOGGER.get()
}
