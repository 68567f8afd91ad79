use tauri::{webview::NewWindowResponse, AppHandle, Manager, WebviewWindow, WebviewWindowBuilder};

use crate::{
    append_desktop_log, append_startup_log, desktop_bridge, navigation_guard, startup_probe,
    window_registry::{ReadyDecision, WindowRegistry},
    ShellConfig, DEV_SERVER_PROBE_TIMEOUT_MS, MAIN_WINDOW_HEIGHT, MAIN_WINDOW_LABEL,
    MAIN_WINDOW_MIN_HEIGHT, MAIN_WINDOW_MIN_WIDTH, MAIN_WINDOW_TITLE, MAIN_WINDOW_WIDTH,
};

// macOS menus are app-wide and disabled on the builder instead.
#[cfg(not(target_os = "macos"))]
fn suppress_window_menu(window: &WebviewWindow) {
    if let Err(error) = window.remove_menu() {
        append_desktop_log(&format!("failed to remove window menu: {error}"));
    }
}

#[cfg(target_os = "macos")]
fn suppress_window_menu(_window: &WebviewWindow) {}

pub fn create_main_window(
    app_handle: &AppHandle,
    config: &ShellConfig,
    registry: &WindowRegistry,
) -> Result<WebviewWindow, String> {
    if app_handle.get_webview_window(MAIN_WINDOW_LABEL).is_some()
        || !registry.register(MAIN_WINDOW_LABEL)
    {
        return Err("Main window already exists; refusing to create a duplicate.".to_string());
    }

    let source = config.content_source();
    if config.build_mode.is_development()
        && !startup_probe::ping_dev_server(&config.dev_server_url, DEV_SERVER_PROBE_TIMEOUT_MS)
    {
        append_startup_log(&format!(
            "dev server {} is not reachable; the window will stay hidden until it serves content",
            config.dev_server_url
        ));
    }
    append_startup_log(&format!("creating main window with content {source:?}"));

    let bridge_script = desktop_bridge::bridge_initialization_script();
    // Popups that bypass the page script (form targets, subframes) land here.
    let new_window_policy = config.policy.clone();
    let window = match WebviewWindowBuilder::new(app_handle, MAIN_WINDOW_LABEL, source.webview_url())
        .title(MAIN_WINDOW_TITLE)
        .inner_size(MAIN_WINDOW_WIDTH, MAIN_WINDOW_HEIGHT)
        .min_inner_size(MAIN_WINDOW_MIN_WIDTH, MAIN_WINDOW_MIN_HEIGHT)
        .visible(false)
        .initialization_script(&bridge_script)
        .on_new_window(move |url, _features| {
            navigation_guard::handle_window_open_request(&new_window_policy, url.as_str());
            NewWindowResponse::Deny
        })
        .build()
    {
        Ok(window) => window,
        Err(error) => {
            registry.remove(MAIN_WINDOW_LABEL);
            return Err(format!("Failed to create main window: {error}"));
        }
    };

    suppress_window_menu(&window);

    if let Some(timeout) = config.load_timeout {
        startup_probe::spawn_load_watchdog(
            app_handle.clone(),
            MAIN_WINDOW_LABEL.to_string(),
            timeout,
            append_startup_log,
        );
    }

    Ok(window)
}

pub fn open_main_window(app_handle: &AppHandle) -> Result<WebviewWindow, String> {
    let config = app_handle
        .try_state::<ShellConfig>()
        .ok_or_else(|| "Shell configuration is not initialized.".to_string())?;
    let registry = app_handle
        .try_state::<WindowRegistry>()
        .ok_or_else(|| "Window registry is not initialized.".to_string())?;
    create_main_window(app_handle, &config, &registry)
}

pub fn show_window_when_ready(app_handle: &AppHandle, label: &str) {
    let Some(registry) = app_handle.try_state::<WindowRegistry>() else {
        return;
    };
    if registry.mark_ready(label) != ReadyDecision::ShowNow {
        return;
    }

    let Some(window) = app_handle.get_webview_window(label) else {
        append_desktop_log(&format!("show-on-ready skipped: window '{label}' not found"));
        return;
    };
    if let Err(error) = window.show() {
        append_desktop_log(&format!("failed to show window '{label}': {error}"));
        return;
    }
    if let Err(error) = window.set_focus() {
        append_desktop_log(&format!("failed to focus window '{label}': {error}"));
    }
}

pub fn focus_main_window(app_handle: &AppHandle) {
    let Some(window) = app_handle.get_webview_window(MAIN_WINDOW_LABEL) else {
        append_desktop_log("focus_main_window skipped: main window not found");
        return;
    };
    let still_loading = app_handle
        .try_state::<WindowRegistry>()
        .map(|registry| registry.is_waiting_for_ready(MAIN_WINDOW_LABEL))
        .unwrap_or(false);
    if still_loading {
        return;
    }
    if let Err(error) = window.show() {
        append_desktop_log(&format!("failed to show main window: {error}"));
    }
    if let Err(error) = window.set_focus() {
        append_desktop_log(&format!("failed to focus main window: {error}"));
    }
}
