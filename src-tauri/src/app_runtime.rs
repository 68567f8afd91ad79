use tauri::{webview::PageLoadEvent, Manager, RunEvent, WindowEvent};

use crate::{
    append_desktop_log, append_startup_log, desktop_log_location, exit_events, main_window,
    navigation_guard, single_instance, window_registry::WindowRegistry, ShellConfig,
};

pub(crate) fn run() {
    append_startup_log("desktop process starting");
    append_startup_log(&format!(
        "desktop log path: {}",
        desktop_log_location().display()
    ));

    let config = match ShellConfig::from_env(append_startup_log) {
        Ok(config) => config,
        Err(error) => {
            append_startup_log(&format!("invalid shell configuration: {error}"));
            eprintln!("Eastway Admin startup failed: {error}");
            std::process::exit(1);
        }
    };
    append_startup_log(&format!("build mode: {:?}", config.build_mode));

    tauri::Builder::default()
        .plugin(single_instance::plugin())
        .plugin(navigation_guard::plugin())
        .enable_macos_default_menu(false)
        .manage(config)
        .manage(WindowRegistry::default())
        .invoke_handler(tauri::generate_handler![
            crate::desktop_bridge_commands::app_version,
            crate::desktop_bridge_commands::app_open_external,
            crate::navigation_guard::shell_request_window_open,
        ])
        .on_window_event(|window, event| {
            if let WindowEvent::Destroyed = event {
                exit_events::handle_window_destroyed(window.app_handle(), window.label());
            }
        })
        .on_page_load(|webview, payload| match payload.event() {
            PageLoadEvent::Started => {
                append_desktop_log(&format!("page-load started: {}", payload.url()));
            }
            PageLoadEvent::Finished => {
                append_desktop_log(&format!("page-load finished: {}", payload.url()));
                main_window::show_window_when_ready(webview.app_handle(), webview.label());
            }
        })
        .setup(|app| {
            let app_handle = app.handle().clone();
            if !single_instance::enforce_startup_lock(&app_handle) {
                app_handle.exit(0);
                return Ok(());
            }
            if let Err(error) = main_window::open_main_window(&app_handle) {
                append_startup_log(&format!("failed to create main window: {error}"));
                app_handle.exit(1);
            }
            Ok(())
        })
        .build(tauri::generate_context!())
        .expect("error while building tauri application")
        .run(|_app_handle, event| match event {
            RunEvent::ExitRequested { api, code, .. } => {
                exit_events::handle_exit_requested(&api, code);
            }
            RunEvent::Exit => {
                exit_events::handle_exit_event();
            }
            #[cfg(target_os = "macos")]
            RunEvent::Reopen { .. } => {
                exit_events::handle_reopen(_app_handle);
            }
            _ => {}
        });
}
