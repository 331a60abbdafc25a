//! WebView test double backed by a headless document.
//!
//! Provides:
//! - `BackendBridge`: mount, update, pump, and control a headless page
//! - The native-event lifecycle (`loadStart` through `loadEnd`)
//! - A page-to-host message bridge (`window.ReactNativeWebView.postMessage`)
//! - `EventLog` for recording dispatched events in tests

pub mod bridge;
pub mod events;
pub mod ipc;

pub use bridge::{
    initialize_dom, BackendBridge, BackendConfig, BackendState, Callback, EventLog,
    PlaceholderView, WebViewCallbacks, WebViewControl,
};
pub use events::{MessageEvent, NavigationEvent, NavigationType, ProgressEvent, WebViewEvent};
