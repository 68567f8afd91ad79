use tauri::{AppHandle, ExitRequestApi, Manager};

use crate::{
    append_desktop_log, append_shutdown_log, main_window,
    window_registry::{ActivationDecision, WindowRegistry},
};

/// macOS apps keep running with no windows until an explicit quit.
pub const KEEP_ALIVE_WITHOUT_WINDOWS: bool = cfg!(target_os = "macos");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitRequestDecision {
    Exit,
    StayResident,
}

/// `code` is `None` when the request comes from the last window closing.
pub fn decide_exit_request(code: Option<i32>, keep_alive_without_windows: bool) -> ExitRequestDecision {
    match code {
        None if keep_alive_without_windows => ExitRequestDecision::StayResident,
        _ => ExitRequestDecision::Exit,
    }
}

pub fn handle_exit_requested(api: &ExitRequestApi, code: Option<i32>) {
    match decide_exit_request(code, KEEP_ALIVE_WITHOUT_WINDOWS) {
        ExitRequestDecision::StayResident => {
            append_shutdown_log("all windows closed; staying resident until quit or reopen");
            api.prevent_exit();
        }
        ExitRequestDecision::Exit => {
            append_shutdown_log(&format!("exit requested (code={code:?})"));
        }
    }
}

pub fn handle_exit_event() {
    append_shutdown_log("desktop process exiting");
}

pub fn handle_window_destroyed(app_handle: &AppHandle, label: &str) {
    let removed = app_handle
        .try_state::<WindowRegistry>()
        .map(|registry| registry.remove(label))
        .unwrap_or(false);
    if removed {
        append_desktop_log(&format!("window '{label}' destroyed"));
    }
}

#[cfg_attr(not(target_os = "macos"), allow(dead_code))]
pub fn handle_reopen(app_handle: &AppHandle) {
    let decision = app_handle
        .try_state::<WindowRegistry>()
        .map(|registry| registry.decide_activation())
        .unwrap_or(ActivationDecision::FocusExisting);

    match decision {
        ActivationDecision::CreateWindow => {
            append_desktop_log("activate with no open windows; creating main window");
            if let Err(error) = main_window::open_main_window(app_handle) {
                append_desktop_log(&format!("failed to recreate main window: {error}"));
            }
        }
        ActivationDecision::FocusExisting => main_window::focus_main_window(app_handle),
    }
}
