//! Optional host callbacks and their dispatch.

use std::fmt;
use std::rc::Rc;

use tracing::trace;

use crate::events::{MessageEvent, NavigationEvent, ProgressEvent, WebViewEvent};

pub type Callback<E> = Rc<dyn Fn(&E)>;

/// Host callbacks. Every slot is optional; missing slots are skipped.
///
/// Equality is by identity: two sets are equal when each slot holds the same
/// `Rc` (or both are empty). Swapping in a new closure counts as a change.
#[derive(Clone, Default)]
pub struct WebViewCallbacks {
    pub on_message: Option<Callback<MessageEvent>>,
    pub on_load_start: Option<Callback<NavigationEvent>>,
    pub on_load_progress: Option<Callback<ProgressEvent>>,
    pub on_load: Option<Callback<NavigationEvent>>,
    pub on_load_end: Option<Callback<NavigationEvent>>,
    pub on_navigation_state_change: Option<Callback<NavigationEvent>>,
}

impl WebViewCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_message(mut self, f: impl Fn(&MessageEvent) + 'static) -> Self {
        self.on_message = Some(Rc::new(f));
        self
    }

    pub fn on_load_start(mut self, f: impl Fn(&NavigationEvent) + 'static) -> Self {
        self.on_load_start = Some(Rc::new(f));
        self
    }

    pub fn on_load_progress(mut self, f: impl Fn(&ProgressEvent) + 'static) -> Self {
        self.on_load_progress = Some(Rc::new(f));
        self
    }

    pub fn on_load(mut self, f: impl Fn(&NavigationEvent) + 'static) -> Self {
        self.on_load = Some(Rc::new(f));
        self
    }

    pub fn on_load_end(mut self, f: impl Fn(&NavigationEvent) + 'static) -> Self {
        self.on_load_end = Some(Rc::new(f));
        self
    }

    pub fn on_navigation_state_change(mut self, f: impl Fn(&NavigationEvent) + 'static) -> Self {
        self.on_navigation_state_change = Some(Rc::new(f));
        self
    }

    /// Route `event` to its callback, if one is set.
    pub fn emit(&self, event: &WebViewEvent) {
        let delivered = match event {
            WebViewEvent::LoadStart(e) => call(&self.on_load_start, e),
            WebViewEvent::LoadProgress(e) => call(&self.on_load_progress, e),
            WebViewEvent::Load(e) => call(&self.on_load, e),
            WebViewEvent::LoadEnd(e) => call(&self.on_load_end, e),
            WebViewEvent::NavigationStateChange(e) => call(&self.on_navigation_state_change, e),
            WebViewEvent::Message(e) => call(&self.on_message, e),
        };
        trace!(event = event.name(), delivered, "native event");
    }
}

fn call<E>(slot: &Option<Callback<E>>, event: &E) -> bool {
    match slot {
        Some(callback) => {
            callback(event);
            true
        }
        None => false,
    }
}

fn same<E>(a: &Option<Callback<E>>, b: &Option<Callback<E>>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b)),
        _ => false,
    }
}

impl PartialEq for WebViewCallbacks {
    fn eq(&self, other: &Self) -> bool {
        same(&self.on_message, &other.on_message)
            && same(&self.on_load_start, &other.on_load_start)
            && same(&self.on_load_progress, &other.on_load_progress)
            && same(&self.on_load, &other.on_load)
            && same(&self.on_load_end, &other.on_load_end)
            && same(&self.on_navigation_state_change, &other.on_navigation_state_change)
    }
}

impl fmt::Debug for WebViewCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebViewCallbacks")
            .field("on_message", &self.on_message.is_some())
            .field("on_load_start", &self.on_load_start.is_some())
            .field("on_load_progress", &self.on_load_progress.is_some())
            .field("on_load", &self.on_load.is_some())
            .field("on_load_end", &self.on_load_end.is_some())
            .field(
                "on_navigation_state_change",
                &self.on_navigation_state_change.is_some(),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::events::NavigationType;

    fn nav() -> NavigationEvent {
        NavigationEvent {
            url: "about:blank".into(),
            title: String::new(),
            loading: true,
            can_go_back: false,
            can_go_forward: false,
            navigation_type: NavigationType::Other,
        }
    }

    #[test]
    fn emit_routes_to_matching_slot() {
        let hits = Rc::new(Cell::new(0));
        let counter = Rc::clone(&hits);
        let callbacks = WebViewCallbacks::new().on_load_start(move |_| counter.set(counter.get() + 1));

        callbacks.emit(&WebViewEvent::LoadStart(nav()));
        callbacks.emit(&WebViewEvent::Load(nav()));
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn empty_callbacks_ignore_everything() {
        WebViewCallbacks::default().emit(&WebViewEvent::LoadEnd(nav()));
    }

    #[test]
    fn equality_is_by_identity() {
        let a = WebViewCallbacks::new().on_load(|_| {});
        let b = a.clone();
        assert_eq!(a, b);

        let c = WebViewCallbacks::new().on_load(|_| {});
        assert_ne!(a, c);
        assert_ne!(a, WebViewCallbacks::default());
        assert_eq!(WebViewCallbacks::default(), WebViewCallbacks::default());
    }
}
