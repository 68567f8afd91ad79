pub const MAIN_WINDOW_LABEL: &str = "main";
pub const MAIN_WINDOW_TITLE: &str = "Eastway Admin";
pub const MAIN_WINDOW_WIDTH: f64 = 1280.0;
pub const MAIN_WINDOW_HEIGHT: f64 = 800.0;
pub const MAIN_WINDOW_MIN_WIDTH: f64 = 1024.0;
pub const MAIN_WINDOW_MIN_HEIGHT: f64 = 700.0;

pub const DEV_SERVER_URL: &str = "http://localhost:5173/";
pub const PACKAGED_ENTRY_FILE: &str = "index.html";
pub const PACKAGED_SCHEME: &str = "tauri";
pub const PACKAGED_HOST: &str = "localhost";
pub const PACKAGED_WINDOWS_ORIGIN: &str = "http://tauri.localhost";

// Origins whose links are handed to the system browser instead of a new window.
pub const EXTERNAL_ORIGIN_ALLOW_LIST: &[&str] = &["https://admin-dashboard-eastway.vercel.app"];

pub const BRIDGE_NAMESPACE: &str = "eastwayDesktop";
pub const IPC_CHANNEL_VERSION: &str = "app:version";
pub const IPC_CHANNEL_OPEN_EXTERNAL: &str = "app:open-external";
pub const WINDOW_OPEN_COMMAND: &str = "shell_request_window_open";
pub const NAVIGATION_GUARD_PLUGIN: &str = "navigation-guard";

pub const DESKTOP_ROOT_ENV: &str = "EASTWAY_DESKTOP_ROOT";
pub const BUILD_MODE_ENV: &str = "EASTWAY_DESKTOP_BUILD_MODE";
pub const LOAD_TIMEOUT_ENV: &str = "EASTWAY_DESKTOP_LOAD_TIMEOUT_MS";
pub const DEFAULT_LOAD_TIMEOUT_MS: u64 = 15_000;
pub const DEV_SERVER_PROBE_TIMEOUT_MS: u64 = 800;

pub const INSTANCE_LOCK_FILE: &str = "instance.lock";
pub const DESKTOP_LOG_FILE: &str = "desktop.log";
pub const DESKTOP_LOG_MAX_BYTES: u64 = 5 * 1024 * 1024;
