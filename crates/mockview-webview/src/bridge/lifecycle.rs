use tracing::{debug, warn};

use mockview_common::DomError;
use mockview_dom::{HeadlessDom, LifecycleEvent};

use crate::events::{NavigationEvent, NavigationType, ProgressEvent, WebViewEvent};
use crate::ipc;

use super::callbacks::WebViewCallbacks;
use super::types::BackendConfig;

pub(crate) const BEFORE_CONTENT_ORIGIN: &str = "injectedJavaScriptBeforeContentLoaded";
pub(crate) const INJECTED_ORIGIN: &str = "injectedJavaScript";

/// Construct a headless document for `config` and wire its lifecycle to the
/// configured callbacks.
///
/// `onLoadStart` and `onNavigationStateChange` (loading) fire before this
/// returns. Content-loaded and full-load dispatches happen as the returned
/// document is advanced.
pub fn initialize_dom(
    config: &BackendConfig,
    navigation_type: NavigationType,
) -> Result<HeadlessDom, DomError> {
    let callbacks = config.callbacks.clone();
    let before_content = config.injected_javascript_before_content_loaded.clone();
    let injected = config
        .injected_javascript
        .clone()
        .filter(|_| config.javascript_enabled);
    if config.injected_javascript.is_some() && injected.is_none() {
        debug!("javascript disabled, injectedJavaScript skipped");
    }

    let mut dom = HeadlessDom::with_before_parse(config.dom_options(), |dom| {
        ipc::install_bridge(dom)?;

        if let Some(script) = &before_content {
            if let Err(e) = dom.execute(BEFORE_CONTENT_ORIGIN, script) {
                warn!(error = %e, "injected script failed before content load");
            }
        }

        let on_content = callbacks.clone();
        dom.add_listener(LifecycleEvent::ContentLoaded, move |dom| {
            if let Some(script) = &injected {
                if let Err(e) = dom.execute(INJECTED_ORIGIN, script) {
                    warn!(error = %e, "injected script failed");
                }
            }
            ipc::forward_messages(dom, &on_content, navigation_type);
        });

        let on_load = callbacks.clone();
        dom.add_listener(LifecycleEvent::Load, move |dom| {
            ipc::forward_messages(dom, &on_load, navigation_type);
            dispatch_full_load(dom, &on_load, navigation_type);
        });
        Ok(())
    })?;

    let start = NavigationEvent::capture(&mut dom, true, navigation_type);
    debug!(url = %start.url, ?navigation_type, "load start");
    callbacks.emit(&WebViewEvent::LoadStart(start.clone()));
    callbacks.emit(&WebViewEvent::NavigationStateChange(start));
    Ok(dom)
}

/// progress(1) -> load -> loadEnd -> navigationStateChange, each read live.
fn dispatch_full_load(
    dom: &mut HeadlessDom,
    callbacks: &WebViewCallbacks,
    navigation_type: NavigationType,
) {
    callbacks.emit(&WebViewEvent::LoadProgress(ProgressEvent {
        navigation: NavigationEvent::capture(dom, false, navigation_type),
        progress: 1.0,
    }));
    callbacks.emit(&WebViewEvent::Load(NavigationEvent::capture(
        dom,
        false,
        navigation_type,
    )));
    callbacks.emit(&WebViewEvent::LoadEnd(NavigationEvent::capture(
        dom,
        false,
        navigation_type,
    )));
    callbacks.emit(&WebViewEvent::NavigationStateChange(
        NavigationEvent::capture(dom, false, navigation_type),
    ));
    debug!("full load dispatched");
}
