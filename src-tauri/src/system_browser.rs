use std::process::{Command, Stdio};

use url::Url;

pub fn parse_openable_url(raw_url: &str) -> Result<Url, String> {
    let trimmed = raw_url.trim();
    if trimmed.is_empty() {
        return Err("Missing external URL.".to_string());
    }

    let parsed = Url::parse(trimmed).map_err(|error| format!("Invalid URL: {error}"))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        scheme => Err(format!(
            "Unsupported URL scheme '{scheme}', only http/https are allowed."
        )),
    }
}

fn spawn_detached(program: &str, args: &[&str]) -> Result<(), String> {
    Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map(|_| ())
        .map_err(|error| format!("Failed to run '{program}': {error}"))
}

#[cfg(target_os = "macos")]
pub fn open_url_with_system_browser(url: &Url) -> Result<(), String> {
    spawn_detached("open", &[url.as_str()])
}

#[cfg(target_os = "windows")]
pub fn open_url_with_system_browser(url: &Url) -> Result<(), String> {
    spawn_detached("rundll32", &["url.dll,FileProtocolHandler", url.as_str()])
}

#[cfg(all(unix, not(target_os = "macos")))]
pub fn open_url_with_system_browser(url: &Url) -> Result<(), String> {
    spawn_detached("xdg-open", &[url.as_str()])
}

#[cfg(not(any(target_os = "macos", target_os = "windows", unix)))]
pub fn open_url_with_system_browser(_url: &Url) -> Result<(), String> {
    Err("Opening external URLs is not supported on this platform.".to_string())
}
