use mockview_dom::{DomOptions, RuntimeLimits, ABOUT_BLANK};

use super::callbacks::WebViewCallbacks;

/// Everything a mounted backend is configured with.
///
/// Any difference between two configs (callbacks compared by identity)
/// triggers a fresh document on update.
#[derive(Debug, Clone, PartialEq)]
pub struct BackendConfig {
    pub html: String,
    /// Document URL; inline HTML gets `about:blank` when unset.
    pub url: Option<String>,
    /// Runs after parsing, before `DOMContentLoaded` listeners. Skipped when
    /// JavaScript is disabled.
    pub injected_javascript: Option<String>,
    /// Runs before any page script, even when JavaScript is disabled.
    pub injected_javascript_before_content_loaded: Option<String>,
    pub javascript_enabled: bool,
    pub user_agent: Option<String>,
    pub limits: RuntimeLimits,
    pub callbacks: WebViewCallbacks,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            html: String::new(),
            url: None,
            injected_javascript: None,
            injected_javascript_before_content_loaded: None,
            javascript_enabled: true,
            user_agent: None,
            limits: RuntimeLimits::default(),
            callbacks: WebViewCallbacks::default(),
        }
    }
}

impl BackendConfig {
    pub fn with_html(html: impl Into<String>) -> Self {
        Self {
            html: html.into(),
            ..Default::default()
        }
    }

    pub fn document_url(&self) -> &str {
        self.url.as_deref().unwrap_or(ABOUT_BLANK)
    }

    pub(crate) fn dom_options(&self) -> DomOptions {
        DomOptions {
            html: self.html.clone(),
            url: self.document_url().to_string(),
            run_scripts: self.javascript_enabled,
            user_agent: self.user_agent.clone(),
            limits: self.limits.clone(),
        }
    }
}
