//! Message bridge between page scripts and the host.
//!
//! - **Page -> host**: `window.ReactNativeWebView.postMessage(string)` (or
//!   `window.postMessage(string)`) queues the payload; the host drains the
//!   queue after every lifecycle step and delivers each entry to `onMessage`.
//! - **Host -> page**: [`js_dispatch_message`] builds a script that fires a
//!   `message` event on `window` and `document`.

use tracing::{debug, warn};

use mockview_common::DomError;
use mockview_dom::{HeadlessDom, ReadyState, ScriptValue};

use crate::bridge::WebViewCallbacks;
use crate::events::{MessageEvent, NavigationEvent, NavigationType, WebViewEvent};

/// Installed before any page script runs.
pub const BRIDGE_INIT_SCRIPT: &str = r#"
(function (window) {
    'use strict';
    var outbox = [];
    function postMessage(data) {
        if (typeof data !== 'string') {
            throw new TypeError(
                'postMessage expects a string message, received ' +
                (data === null ? 'null' : typeof data)
            );
        }
        outbox.push(data);
    }
    Object.defineProperty(window, '__mockview_bridge', {
        value: { take: function () { return outbox.splice(0, outbox.length); } },
        enumerable: false,
        configurable: false,
        writable: false
    });
    window.postMessage = postMessage;
    window.ReactNativeWebView = { postMessage: postMessage };
})(globalThis);
"#;

pub(crate) const BRIDGE_ORIGIN: &str = "bridge";

pub fn install_bridge(dom: &mut HeadlessDom) -> Result<(), DomError> {
    dom.execute(BRIDGE_ORIGIN, BRIDGE_INIT_SCRIPT)
}

/// Drain messages the page has posted since the last call.
pub fn take_messages(dom: &mut HeadlessDom) -> Result<Vec<String>, DomError> {
    match dom.evaluate("__mockview_bridge.take()")? {
        ScriptValue::Array(items) => items
            .into_iter()
            .map(|item| match item {
                ScriptValue::String(data) => Ok(data),
                other => Err(DomError::Decode(format!(
                    "queued message is a {}",
                    other.type_name()
                ))),
            })
            .collect(),
        other => Err(DomError::Decode(format!(
            "message queue is a {}",
            other.type_name()
        ))),
    }
}

/// Deliver queued page messages to `onMessage`, in posting order.
pub fn forward_messages(
    dom: &mut HeadlessDom,
    callbacks: &WebViewCallbacks,
    navigation_type: NavigationType,
) {
    let messages = match take_messages(dom) {
        Ok(messages) => messages,
        Err(e) => {
            warn!(error = %e, "page messages unreadable");
            return;
        }
    };

    for data in messages {
        debug!(len = data.len(), "message from page");
        let loading = dom.ready_state() != ReadyState::Complete;
        let event = MessageEvent {
            navigation: NavigationEvent::capture(dom, loading, navigation_type),
            data,
        };
        callbacks.emit(&WebViewEvent::Message(event));
    }
}

/// Script that delivers `data` to the page as a `message` event.
pub fn js_dispatch_message(data: &str) -> String {
    let payload = serde_json::to_string(data).unwrap_or_else(|_| "\"\"".to_string());
    format!(
        "(function (data) {{ \
            window.dispatchEvent(new MessageEvent('message', {{ data: data }})); \
            document.dispatchEvent(new MessageEvent('message', {{ data: data }})); \
        }})({payload});"
    )
}

#[cfg(test)]
mod tests {
    use mockview_dom::DomOptions;

    use super::*;

    fn dom_with_bridge() -> HeadlessDom {
        HeadlessDom::with_before_parse(DomOptions::default(), install_bridge).unwrap()
    }

    #[test]
    fn queued_messages_drain_in_order() {
        let mut dom = dom_with_bridge();
        dom.execute(
            "test",
            "window.ReactNativeWebView.postMessage('a'); window.postMessage('b');",
        )
        .unwrap();
        assert_eq!(take_messages(&mut dom).unwrap(), vec!["a", "b"]);
        assert!(take_messages(&mut dom).unwrap().is_empty());
    }

    #[test]
    fn non_string_payload_throws() {
        let mut dom = dom_with_bridge();
        let err = dom
            .execute("test", "window.ReactNativeWebView.postMessage({ a: 1 })")
            .unwrap_err();
        assert!(err.script_message().unwrap().contains("expects a string"));
        assert!(take_messages(&mut dom).unwrap().is_empty());
    }

    #[test]
    fn bridge_queue_cannot_be_replaced() {
        let mut dom = dom_with_bridge();
        dom.execute("test", "try { window.__mockview_bridge = null; } catch (e) {}")
            .unwrap();
        dom.execute("test", "window.postMessage('still here')").unwrap();
        assert_eq!(take_messages(&mut dom).unwrap(), vec!["still here"]);
    }

    #[test]
    fn dispatch_script_reaches_page_listeners() {
        let mut dom = dom_with_bridge();
        dom.execute(
            "test",
            "window.got = []; window.addEventListener('message', function (e) { got.push(e.data); });",
        )
        .unwrap();
        dom.execute("test", &js_dispatch_message("it's \"quoted\""))
            .unwrap();
        let got = dom.evaluate("got[0]").unwrap();
        assert_eq!(got.as_str(), Some("it's \"quoted\""));
    }
}
