use tauri::{AppHandle, Manager};

use crate::{
    append_desktop_log, system_browser, BridgeResult, IPC_CHANNEL_OPEN_EXTERNAL,
};

fn version_string(version: &semver::Version) -> String {
    version.to_string()
}

#[tauri::command]
pub(crate) fn app_version(app_handle: AppHandle) -> String {
    version_string(&app_handle.package_info().version)
}

// Only the scheme is checked here; the external origin allow-list is not applied
// to user-invoked opens.
fn open_external<F>(raw_url: &str, open: F) -> BridgeResult
where
    F: FnOnce(&url::Url) -> Result<(), String>,
{
    let parsed = match system_browser::parse_openable_url(raw_url) {
        Ok(parsed) => parsed,
        Err(error) => return BridgeResult::failure(error),
    };
    open(&parsed).into()
}

#[tauri::command]
pub(crate) fn app_open_external(url: String) -> BridgeResult {
    let result = open_external(&url, system_browser::open_url_with_system_browser);
    if let Some(reason) = &result.reason {
        append_desktop_log(&format!(
            "{IPC_CHANNEL_OPEN_EXTERNAL} failed for {url}: {reason}"
        ));
    }
    result
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    #[test]
    fn version_string_matches_declared_package_version() {
        let declared = semver::Version::parse(env!("CARGO_PKG_VERSION")).expect("semver");
        let version = version_string(&declared);
        assert!(!version.is_empty());
        assert_eq!(version, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn tauri_config_version_matches_cargo_version() {
        let config: serde_json::Value =
            serde_json::from_str(include_str!("../tauri.conf.json")).expect("tauri.conf.json");
        let declared = config["version"].as_str().expect("version field");
        assert_eq!(declared, env!("CARGO_PKG_VERSION"));
        assert_eq!(
            version_string(&semver::Version::parse(declared).expect("semver")),
            env!("CARGO_PKG_VERSION")
        );
    }

    #[test]
    fn main_capability_grants_no_permissions() {
        let capability: serde_json::Value =
            serde_json::from_str(include_str!("../capabilities/main.json")).expect("capability");
        assert_eq!(capability["windows"], serde_json::json!(["main"]));
        assert_eq!(capability["permissions"], serde_json::json!([]));
    }

    #[test]
    fn version_string_keeps_prerelease_tags() {
        let version = semver::Version::parse("2.0.0-beta.3").expect("semver");
        assert_eq!(version_string(&version), "2.0.0-beta.3");
    }

    #[test]
    fn open_external_skips_origin_allow_list() {
        let opened = RefCell::new(Vec::new());
        let result = open_external("https://random.example.com/page", |url| {
            opened.borrow_mut().push(url.to_string());
            Ok(())
        });

        assert_eq!(result, BridgeResult::success());
        assert_eq!(*opened.borrow(), vec!["https://random.example.com/page"]);
    }

    #[test]
    fn open_external_rejects_non_web_schemes_without_opening() {
        let opened = RefCell::new(0);
        let result = open_external("file:///etc/hosts", |_| {
            *opened.borrow_mut() += 1;
            Ok(())
        });

        assert!(!result.ok);
        assert_eq!(*opened.borrow(), 0);
    }

    #[test]
    fn open_external_surfaces_launcher_errors() {
        let result = open_external("https://admin-dashboard-eastway.vercel.app/", |_| {
            Err("Failed to run 'open': denied".to_string())
        });
        assert_eq!(
            result,
            BridgeResult::failure("Failed to run 'open': denied")
        );
    }
}
