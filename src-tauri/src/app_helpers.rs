use std::{path::PathBuf, sync::OnceLock};

use crate::{
    logging::{self, LogCategory},
    runtime_paths, DESKTOP_LOG_FILE, DESKTOP_LOG_MAX_BYTES,
};

fn desktop_log_path() -> &'static PathBuf {
    static LOG_PATH: OnceLock<PathBuf> = OnceLock::new();
    LOG_PATH.get_or_init(|| {
        logging::resolve_desktop_log_path(
            runtime_paths::default_packaged_root_dir(),
            DESKTOP_LOG_FILE,
        )
    })
}

fn append_log(category: LogCategory, message: &str) {
    if let Err(error) =
        logging::append_log_line(desktop_log_path(), DESKTOP_LOG_MAX_BYTES, category, message)
    {
        eprintln!("eastway desktop log write failed: {error}; message: {message}");
    }
}

pub fn desktop_log_location() -> PathBuf {
    desktop_log_path().clone()
}

pub fn append_desktop_log(message: &str) {
    append_log(LogCategory::Desktop, message);
}

pub fn append_startup_log(message: &str) {
    append_log(LogCategory::Startup, message);
}

pub fn append_navigation_log(message: &str) {
    append_log(LogCategory::Navigation, message);
}

pub fn append_shutdown_log(message: &str) {
    append_log(LogCategory::Shutdown, message);
}
