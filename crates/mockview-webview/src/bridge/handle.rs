use tracing::{debug, warn};

use mockview_common::DomError;
use mockview_dom::{Document, Window};

use crate::events::NavigationType;
use crate::ipc;

use super::{construct, BackendBridge, BackendState};

pub(crate) const INJECT_ORIGIN: &str = "injectJavaScript";

/// Imperative control surface of a mounted WebView.
pub trait WebViewControl {
    /// Discard the current document and load the same content again.
    fn reload(&mut self) -> Result<(), DomError>;

    fn stop_loading(&mut self);

    fn go_back(&mut self);

    fn go_forward(&mut self);

    /// Run `script` in the loaded page. Returns `Ok(false)` without running
    /// anything while the page is still loading.
    fn inject_javascript(&mut self, script: &str) -> Result<bool, DomError>;

    /// Deliver `data` to the page as a `message` event. Same loading rule as
    /// [`WebViewControl::inject_javascript`].
    fn post_message(&mut self, data: &str) -> Result<bool, DomError>;

    fn document(&mut self) -> Document<'_>;

    fn window(&mut self) -> Window<'_>;
}

impl WebViewControl for BackendBridge {
    fn reload(&mut self) -> Result<(), DomError> {
        let cycle = self.load_cycle + 1;
        let navigation_type = NavigationType::Reload;
        let dom = construct(
            &self.mount_id,
            &self.config,
            &self.state,
            cycle,
            navigation_type,
        )?;
        self.replace_document(dom, navigation_type);
        self.load_cycle = cycle;
        debug!(mount = %self.mount_id, cycle, "reloaded");
        Ok(())
    }

    fn stop_loading(&mut self) {
        warn!(mount = %self.mount_id, "stopLoading is not supported by the headless backend");
    }

    fn go_back(&mut self) {
        warn!(mount = %self.mount_id, "goBack is not supported by the headless backend");
    }

    fn go_forward(&mut self) {
        warn!(mount = %self.mount_id, "goForward is not supported by the headless backend");
    }

    fn inject_javascript(&mut self, script: &str) -> Result<bool, DomError> {
        if self.state() != BackendState::Loaded {
            debug!(mount = %self.mount_id, "injectJavaScript ignored while loading");
            return Ok(false);
        }
        let result = self.dom.execute(INJECT_ORIGIN, script);
        ipc::forward_messages(&mut self.dom, &self.config.callbacks, self.navigation_type);
        result.map(|()| true)
    }

    fn post_message(&mut self, data: &str) -> Result<bool, DomError> {
        if self.state() != BackendState::Loaded {
            debug!(mount = %self.mount_id, "postMessage ignored while loading");
            return Ok(false);
        }
        let result = self
            .dom
            .execute("postMessage", &ipc::js_dispatch_message(data));
        ipc::forward_messages(&mut self.dom, &self.config.callbacks, self.navigation_type);
        result.map(|()| true)
    }

    fn document(&mut self) -> Document<'_> {
        self.dom.document()
    }

    fn window(&mut self) -> Window<'_> {
        self.dom.window()
    }
}
