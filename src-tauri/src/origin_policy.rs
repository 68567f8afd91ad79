//! Navigation and link-opening decisions for every webview the shell hosts.
//!
//! The policy is built once at startup and never mutated. Decisions are closed:
//! anything the allow-lists do not match is denied.

use url::{Origin, Url};

use crate::{shell_config::BuildMode, PACKAGED_HOST, PACKAGED_SCHEME, PACKAGED_WINDOWS_ORIGIN};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationKind {
    /// The current webview is about to load a different document.
    InApp,
    /// Page script asked for a new window (`window.open`, `target="_blank"`).
    OpenWindow,
    /// A webview the shell did not create tried to attach itself.
    Embed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    UnparseableUrl,
    OriginNotAllowed,
    NewWindowsDisabled,
    EmbeddingDisabled,
}

impl DenyReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::UnparseableUrl => "unparseable url",
            Self::OriginNotAllowed => "origin not allowed",
            Self::NewWindowsDisabled => "new windows are disabled",
            Self::EmbeddingDisabled => "embedded webviews are disabled",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyDecision {
    Allow,
    Deny(DenyReason),
    /// Keep the request out of the app and give the URL to the system browser.
    DenyAndHandOff(Url),
}

#[derive(Debug, Clone)]
pub struct NavigationPolicy {
    build_mode: BuildMode,
    dev_origin: Origin,
    packaged_http_origin: Option<Origin>,
    external_origins: Vec<Origin>,
}

impl NavigationPolicy {
    pub fn new(
        build_mode: BuildMode,
        dev_server_url: &Url,
        external_allow_list: &[&str],
    ) -> Result<Self, String> {
        let external_origins = external_allow_list
            .iter()
            .map(|raw| {
                let origin = Url::parse(raw)
                    .map_err(|error| format!("Invalid allow-list origin '{raw}': {error}"))?
                    .origin();
                if !origin.is_tuple() {
                    return Err(format!("Allow-list entry '{raw}' has an opaque origin."));
                }
                Ok(origin)
            })
            .collect::<Result<Vec<_>, String>>()?;

        // WebView2 serves bundled assets over http; other webviews use the custom scheme only.
        let packaged_http_origin = if cfg!(windows) {
            Some(
                Url::parse(PACKAGED_WINDOWS_ORIGIN)
                    .map_err(|error| {
                        format!("Invalid packaged origin {PACKAGED_WINDOWS_ORIGIN}: {error}")
                    })?
                    .origin(),
            )
        } else {
            None
        };

        Ok(Self {
            build_mode,
            dev_origin: dev_server_url.origin(),
            packaged_http_origin,
            external_origins,
        })
    }

    pub fn decide(&self, raw_url: &str, kind: NavigationKind) -> PolicyDecision {
        let parse = || Url::parse(raw_url.trim());
        match kind {
            NavigationKind::Embed => PolicyDecision::Deny(DenyReason::EmbeddingDisabled),
            NavigationKind::InApp => match parse() {
                Ok(url) => self.decide_in_app(&url),
                Err(_) => PolicyDecision::Deny(DenyReason::UnparseableUrl),
            },
            NavigationKind::OpenWindow => match parse() {
                Ok(url) => self.decide_open_window(url),
                Err(_) => PolicyDecision::Deny(DenyReason::UnparseableUrl),
            },
        }
    }

    pub fn decide_url(&self, url: &Url, kind: NavigationKind) -> PolicyDecision {
        self.decide(url.as_str(), kind)
    }

    fn is_packaged_content(&self, url: &Url) -> bool {
        if url.scheme() == PACKAGED_SCHEME {
            return url.host_str() == Some(PACKAGED_HOST) && url.port().is_none();
        }
        self.packaged_http_origin.as_ref() == Some(&url.origin())
    }

    fn decide_in_app(&self, url: &Url) -> PolicyDecision {
        if self.is_packaged_content(url) {
            return PolicyDecision::Allow;
        }
        if self.build_mode.is_development() && url.origin() == self.dev_origin {
            return PolicyDecision::Allow;
        }
        PolicyDecision::Deny(DenyReason::OriginNotAllowed)
    }

    fn decide_open_window(&self, url: Url) -> PolicyDecision {
        let origin = url.origin();
        if origin.is_tuple() && self.external_origins.contains(&origin) {
            return PolicyDecision::DenyAndHandOff(url);
        }
        PolicyDecision::Deny(DenyReason::NewWindowsDisabled)
    }
}
