use std::{
    env,
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};

use chrono::Local;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogCategory {
    Desktop,
    Startup,
    Navigation,
    Shutdown,
}

impl LogCategory {
    fn tag(self) -> &'static str {
        match self {
            Self::Desktop => "desktop",
            Self::Startup => "startup",
            Self::Navigation => "navigation",
            Self::Shutdown => "shutdown",
        }
    }
}

pub fn resolve_desktop_log_path(packaged_root_dir: Option<PathBuf>, file_name: &str) -> PathBuf {
    packaged_root_dir
        .unwrap_or_else(|| env::temp_dir().join("eastway-admin"))
        .join("logs")
        .join(file_name)
}

fn format_log_line(category: LogCategory, message: &str) -> String {
    format!(
        "{} [{}] {}\n",
        Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
        category.tag(),
        message
    )
}

/// Moves the log aside to `<name>.1` once it has reached `max_bytes`.
/// A previous backup is replaced.
pub fn rotate_if_needed(log_path: &Path, max_bytes: u64) -> Result<bool, String> {
    let size = match fs::metadata(log_path) {
        Ok(metadata) => metadata.len(),
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => return Ok(false),
        Err(error) => {
            return Err(format!(
                "Failed to stat log file {}: {}",
                log_path.display(),
                error
            ));
        }
    };
    if size < max_bytes {
        return Ok(false);
    }

    let mut backup = log_path.as_os_str().to_owned();
    backup.push(".1");
    let backup = PathBuf::from(backup);
    fs::rename(log_path, &backup).map_err(|error| {
        format!(
            "Failed to rotate log file {} to {}: {}",
            log_path.display(),
            backup.display(),
            error
        )
    })?;
    Ok(true)
}

pub fn append_log_line(
    log_path: &Path,
    max_bytes: u64,
    category: LogCategory,
    message: &str,
) -> Result<(), String> {
    if let Some(parent) = log_path.parent() {
        fs::create_dir_all(parent).map_err(|error| {
            format!(
                "Failed to create log directory {}: {}",
                parent.display(),
                error
            )
        })?;
    }
    rotate_if_needed(log_path, max_bytes)?;

    let line = format_log_line(category, message);
    if cfg!(debug_assertions) {
        eprint!("{line}");
    }

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .map_err(|error| format!("Failed to open log file {}: {}", log_path.display(), error))?;
    file.write_all(line.as_bytes())
        .map_err(|error| format!("Failed to write log file {}: {}", log_path.display(), error))
}
