#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app_constants;
mod app_helpers;
mod app_runtime;
mod app_types;
mod desktop_bridge;
mod desktop_bridge_commands;
mod exit_events;
mod logging;
mod main_window;
mod navigation_guard;
mod origin_policy;
mod runtime_paths;
mod shell_config;
mod single_instance;
mod startup_probe;
mod system_browser;
mod window_registry;

pub(crate) use app_constants::*;
pub(crate) use app_helpers::{
    append_desktop_log, append_navigation_log, append_shutdown_log, append_startup_log,
    desktop_log_location,
};
pub(crate) use app_types::{BridgeResult, WindowOpenResult};
pub(crate) use shell_config::ShellConfig;

fn main() {
    app_runtime::run();
}
