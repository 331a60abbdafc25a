//! Native event payloads delivered to WebView callbacks.

use serde::{Deserialize, Serialize};

use mockview_dom::HeadlessDom;

/// How the current navigation was initiated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NavigationType {
    Click,
    FormSubmit,
    BackForward,
    Reload,
    FormResubmit,
    Other,
}

/// Snapshot of navigation state at the moment an event fires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationEvent {
    pub url: String,
    pub title: String,
    pub loading: bool,
    /// Always false: there is no history stack.
    pub can_go_back: bool,
    /// Always false: there is no history stack.
    pub can_go_forward: bool,
    pub navigation_type: NavigationType,
}

impl NavigationEvent {
    /// Read url and title from the live document.
    pub fn capture(dom: &mut HeadlessDom, loading: bool, navigation_type: NavigationType) -> Self {
        Self {
            url: dom.url(),
            title: dom.title(),
            loading,
            can_go_back: false,
            can_go_forward: false,
            navigation_type,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressEvent {
    #[serde(flatten)]
    pub navigation: NavigationEvent,
    /// Load progress in `[0, 1]`.
    pub progress: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageEvent {
    #[serde(flatten)]
    pub navigation: NavigationEvent,
    pub data: String,
}

/// Events dispatched to the callbacks of a mounted backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "nativeEvent", rename_all = "camelCase")]
pub enum WebViewEvent {
    LoadStart(NavigationEvent),
    LoadProgress(ProgressEvent),
    Load(NavigationEvent),
    LoadEnd(NavigationEvent),
    NavigationStateChange(NavigationEvent),
    Message(MessageEvent),
}

impl WebViewEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::LoadStart(_) => "loadStart",
            Self::LoadProgress(_) => "loadProgress",
            Self::Load(_) => "load",
            Self::LoadEnd(_) => "loadEnd",
            Self::NavigationStateChange(_) => "navigationStateChange",
            Self::Message(_) => "message",
        }
    }

    pub fn navigation(&self) -> &NavigationEvent {
        match self {
            Self::LoadStart(e) | Self::Load(e) | Self::LoadEnd(e) | Self::NavigationStateChange(e) => e,
            Self::LoadProgress(e) => &e.navigation,
            Self::Message(e) => &e.navigation,
        }
    }
}
