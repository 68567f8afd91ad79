use std::{env, time::Duration};

use tauri::WebviewUrl;
use url::Url;

use crate::{
    origin_policy::NavigationPolicy, BUILD_MODE_ENV, DEFAULT_LOAD_TIMEOUT_MS, DEV_SERVER_URL,
    EXTERNAL_ORIGIN_ALLOW_LIST, LOAD_TIMEOUT_ENV, PACKAGED_ENTRY_FILE,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildMode {
    Development,
    Packaged,
}

impl BuildMode {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Some(Self::Development),
            "packaged" | "production" | "prod" => Some(Self::Packaged),
            _ => None,
        }
    }

    pub fn is_development(self) -> bool {
        self == Self::Development
    }
}

/// Where the main window takes its content from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentSource {
    DevServer(Url),
    PackagedEntry(&'static str),
}

impl ContentSource {
    pub fn webview_url(&self) -> WebviewUrl {
        match self {
            Self::DevServer(url) => WebviewUrl::External(url.clone()),
            Self::PackagedEntry(entry) => WebviewUrl::App((*entry).into()),
        }
    }
}

/// Process-wide shell configuration, constructed once before the builder runs.
#[derive(Debug, Clone)]
pub struct ShellConfig {
    pub build_mode: BuildMode,
    pub dev_server_url: Url,
    pub load_timeout: Option<Duration>,
    pub policy: NavigationPolicy,
}

impl ShellConfig {
    pub fn from_env<F>(log: F) -> Result<Self, String>
    where
        F: Fn(&str),
    {
        let build_mode = resolve_build_mode(
            env::var(BUILD_MODE_ENV).ok().as_deref(),
            cfg!(debug_assertions),
            log,
        );
        let load_timeout = resolve_load_timeout(env::var(LOAD_TIMEOUT_ENV).ok().as_deref());
        Self::new(build_mode, load_timeout)
    }

    pub fn new(build_mode: BuildMode, load_timeout: Option<Duration>) -> Result<Self, String> {
        let dev_server_url = Url::parse(DEV_SERVER_URL)
            .map_err(|error| format!("Invalid dev server URL {DEV_SERVER_URL}: {error}"))?;
        let policy =
            NavigationPolicy::new(build_mode, &dev_server_url, EXTERNAL_ORIGIN_ALLOW_LIST)?;
        Ok(Self {
            build_mode,
            dev_server_url,
            load_timeout,
            policy,
        })
    }

    pub fn content_source(&self) -> ContentSource {
        match self.build_mode {
            BuildMode::Development => ContentSource::DevServer(self.dev_server_url.clone()),
            BuildMode::Packaged => ContentSource::PackagedEntry(PACKAGED_ENTRY_FILE),
        }
    }
}

/// Release builds always load the packaged bundle; the env override only
/// applies to debug builds.
fn resolve_build_mode<F>(raw: Option<&str>, debug_build: bool, log: F) -> BuildMode
where
    F: Fn(&str),
{
    let profile_mode = if debug_build {
        BuildMode::Development
    } else {
        BuildMode::Packaged
    };
    let Some(raw) = raw else {
        return profile_mode;
    };
    if !debug_build {
        log(&format!("ignoring {BUILD_MODE_ENV}='{raw}' in a release build"));
        return profile_mode;
    }
    BuildMode::parse(raw).unwrap_or_else(|| {
        log(&format!(
            "ignoring unsupported {BUILD_MODE_ENV}='{raw}'; using compile profile"
        ));
        profile_mode
    })
}

fn resolve_load_timeout(raw: Option<&str>) -> Option<Duration> {
    let timeout_ms = raw
        .and_then(|value| value.trim().parse::<u64>().ok())
        .unwrap_or(DEFAULT_LOAD_TIMEOUT_MS);
    if timeout_ms == 0 {
        return None;
    }
    Some(Duration::from_millis(timeout_ms))
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    #[test]
    fn build_mode_parse_accepts_aliases() {
        assert_eq!(BuildMode::parse("DEV"), Some(BuildMode::Development));
        assert_eq!(BuildMode::parse(" packaged "), Some(BuildMode::Packaged));
        assert_eq!(BuildMode::parse("production"), Some(BuildMode::Packaged));
        assert_eq!(BuildMode::parse("staging"), None);
    }

    #[test]
    fn release_build_ignores_build_mode_override() {
        let logged = RefCell::new(Vec::new());
        let mode = resolve_build_mode(Some("development"), false, |line| {
            logged.borrow_mut().push(line.to_string())
        });

        assert_eq!(mode, BuildMode::Packaged);
        assert_eq!(logged.borrow().len(), 1);
        assert!(logged.borrow()[0].contains("release build"));
    }

    #[test]
    fn debug_build_honours_build_mode_override() {
        assert_eq!(
            resolve_build_mode(Some("packaged"), true, |_| {}),
            BuildMode::Packaged
        );
        assert_eq!(resolve_build_mode(None, true, |_| {}), BuildMode::Development);
        assert_eq!(resolve_build_mode(None, false, |_| {}), BuildMode::Packaged);
    }

    #[test]
    fn debug_build_falls_back_on_unknown_override() {
        assert_eq!(
            resolve_build_mode(Some("staging"), true, |_| {}),
            BuildMode::Development
        );
    }

    #[test]
    fn content_source_follows_build_mode() {
        let dev = ShellConfig::new(BuildMode::Development, None).expect("dev config");
        assert_eq!(
            dev.content_source(),
            ContentSource::DevServer(Url::parse("http://localhost:5173/").unwrap())
        );

        let packaged = ShellConfig::new(BuildMode::Packaged, None).expect("packaged config");
        assert_eq!(
            packaged.content_source(),
            ContentSource::PackagedEntry("index.html")
        );
    }

    #[test]
    fn resolve_load_timeout_defaults_and_disables() {
        assert_eq!(
            resolve_load_timeout(None),
            Some(Duration::from_millis(DEFAULT_LOAD_TIMEOUT_MS))
        );
        assert_eq!(
            resolve_load_timeout(Some("not-a-number")),
            Some(Duration::from_millis(DEFAULT_LOAD_TIMEOUT_MS))
        );
        assert_eq!(
            resolve_load_timeout(Some(" 2500 ")),
            Some(Duration::from_millis(2500))
        );
        assert_eq!(resolve_load_timeout(Some("0")), None);
    }
}
