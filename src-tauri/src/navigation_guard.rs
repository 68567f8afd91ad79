use tauri::{
    plugin::{Builder as PluginBuilder, TauriPlugin},
    AppHandle, Manager, Runtime,
};
use url::Url;

use crate::{
    append_navigation_log,
    origin_policy::{DenyReason, NavigationKind, NavigationPolicy, PolicyDecision},
    system_browser, window_registry::WindowRegistry, ShellConfig, WindowOpenResult,
    NAVIGATION_GUARD_PLUGIN, WINDOW_OPEN_COMMAND,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WindowOpenOutcome {
    HandedOff(Url),
    Denied(DenyReason),
    HandOffFailed(String),
}

impl From<WindowOpenOutcome> for WindowOpenResult {
    fn from(outcome: WindowOpenOutcome) -> Self {
        match outcome {
            WindowOpenOutcome::HandedOff(_) => WindowOpenResult {
                handed_off: true,
                reason: None,
            },
            WindowOpenOutcome::Denied(reason) => WindowOpenResult {
                handed_off: false,
                reason: Some(reason.as_str().to_string()),
            },
            WindowOpenOutcome::HandOffFailed(error) => WindowOpenResult {
                handed_off: false,
                reason: Some(error),
            },
        }
    }
}

/// Resolves a new-window request. No window is ever created; `open_external`
/// runs at most once, and only for allow-listed origins.
pub fn apply_window_open<F>(
    policy: &NavigationPolicy,
    raw_url: &str,
    open_external: F,
) -> WindowOpenOutcome
where
    F: FnOnce(&Url) -> Result<(), String>,
{
    match policy.decide(raw_url, NavigationKind::OpenWindow) {
        PolicyDecision::DenyAndHandOff(url) => match open_external(&url) {
            Ok(()) => WindowOpenOutcome::HandedOff(url),
            Err(error) => WindowOpenOutcome::HandOffFailed(error),
        },
        PolicyDecision::Deny(reason) => WindowOpenOutcome::Denied(reason),
        // OpenWindow never yields Allow; treat it as a denial all the same.
        PolicyDecision::Allow => WindowOpenOutcome::Denied(DenyReason::NewWindowsDisabled),
    }
}

fn is_navigation_allowed(policy: Option<&NavigationPolicy>, url: &Url) -> bool {
    let Some(policy) = policy else {
        append_navigation_log(&format!("navigation denied before policy init: {url}"));
        return false;
    };
    match policy.decide_url(url, NavigationKind::InApp) {
        PolicyDecision::Allow => true,
        PolicyDecision::Deny(reason) => {
            append_navigation_log(&format!(
                "navigation denied ({}): {url}",
                reason.as_str()
            ));
            false
        }
        PolicyDecision::DenyAndHandOff(_) => {
            append_navigation_log(&format!("navigation denied: {url}"));
            false
        }
    }
}

fn window_open_interception_script() -> String {
    let command = serde_json::to_string(WINDOW_OPEN_COMMAND)
        .unwrap_or_else(|_| "\"shell_request_window_open\"".to_string());
    format!(
        r#"(function () {{
  if (window.__EASTWAY_WINDOW_OPEN_GUARD__) {{
    return;
  }}
  Object.defineProperty(window, "__EASTWAY_WINDOW_OPEN_GUARD__", {{ value: true }});
  var requestWindowOpen = function (target) {{
    if (target === undefined || target === null) {{
      return;
    }}
    var href;
    try {{
      href = new URL(String(target), window.location.href).href;
    }} catch (_) {{
      return;
    }}
    window.__TAURI_INTERNALS__.invoke({command}, {{ url: href }}).catch(function () {{}});
  }};
  Object.defineProperty(window, "open", {{
    value: function (target) {{
      requestWindowOpen(target);
      return null;
    }},
    writable: false,
    configurable: false
  }});
  var interceptLinkActivation = function (event) {{
    var anchor = event.target && event.target.closest ? event.target.closest("a[href], area[href]") : null;
    if (!anchor) {{
      return;
    }}
    var target = (anchor.getAttribute("target") || "").toLowerCase();
    var opensNewContext = event.type === "auxclick" ||
      event.ctrlKey || event.metaKey || event.shiftKey ||
      !(target === "" || target === "_self" || target === "_parent" || target === "_top");
    if (!opensNewContext) {{
      return;
    }}
    event.preventDefault();
    requestWindowOpen(anchor.href);
  }};
  document.addEventListener("click", interceptLinkActivation, true);
  document.addEventListener("auxclick", function (event) {{
    if (event.button === 1) {{
      interceptLinkActivation(event);
    }}
  }}, true);
}})();"#
    )
}

/// App-level hooks, so every webview is covered no matter how it was created.
pub fn plugin<R: Runtime>() -> TauriPlugin<R> {
    PluginBuilder::new(NAVIGATION_GUARD_PLUGIN)
        .js_init_script(window_open_interception_script())
        .on_navigation(|webview, url| {
            let config = webview.try_state::<ShellConfig>();
            is_navigation_allowed(config.as_ref().map(|config| &config.policy), url)
        })
        .on_webview_ready(|webview| {
            let label = webview.label().to_string();
            let registered = webview
                .try_state::<WindowRegistry>()
                .map(|registry| registry.contains(&label))
                .unwrap_or(false);
            if registered {
                return;
            }

            let source = webview
                .url()
                .map(|url| url.to_string())
                .unwrap_or_else(|_| "<unknown>".to_string());
            let reason = match webview
                .try_state::<ShellConfig>()
                .map(|config| config.policy.decide(&source, NavigationKind::Embed))
            {
                Some(PolicyDecision::Deny(reason)) => reason,
                _ => DenyReason::EmbeddingDisabled,
            };

            append_navigation_log(&format!(
                "embedded webview '{label}' rejected ({}): {source}",
                reason.as_str()
            ));
            if let Err(error) = webview.close() {
                append_navigation_log(&format!(
                    "failed to close embedded webview '{label}': {error}"
                ));
            }
        })
        .build()
}

/// Applies and logs a new-window request from either the page script or the
/// webview's native new-window path.
pub fn handle_window_open_request(policy: &NavigationPolicy, raw_url: &str) -> WindowOpenOutcome {
    let outcome = apply_window_open(policy, raw_url, system_browser::open_url_with_system_browser);
    match &outcome {
        WindowOpenOutcome::HandedOff(target) => {
            append_navigation_log(&format!("window-open handed to system browser: {target}"))
        }
        WindowOpenOutcome::Denied(reason) => append_navigation_log(&format!(
            "window-open denied ({}): {raw_url}",
            reason.as_str()
        )),
        WindowOpenOutcome::HandOffFailed(error) => append_navigation_log(&format!(
            "window-open hand-off failed for {raw_url}: {error}"
        )),
    }
    outcome
}

#[tauri::command]
pub(crate) fn shell_request_window_open(app_handle: AppHandle, url: String) -> WindowOpenResult {
    let Some(config) = app_handle.try_state::<ShellConfig>() else {
        return WindowOpenOutcome::Denied(DenyReason::NewWindowsDisabled).into();
    };
    handle_window_open_request(&config.policy, &url).into()
}
