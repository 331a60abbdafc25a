use std::cell::RefCell;
use std::rc::Rc;

use crate::events::WebViewEvent;

use super::callbacks::WebViewCallbacks;

/// Shared sink that records every dispatched event, in order.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Rc<RefCell<Vec<WebViewEvent>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Callbacks that append each event to this log.
    pub fn callbacks(&self) -> WebViewCallbacks {
        let (message, start, progress, load, end, navigation) = (
            self.clone(),
            self.clone(),
            self.clone(),
            self.clone(),
            self.clone(),
            self.clone(),
        );
        WebViewCallbacks::new()
            .on_message(move |ev| message.record(WebViewEvent::Message(ev.clone())))
            .on_load_start(move |ev| start.record(WebViewEvent::LoadStart(ev.clone())))
            .on_load_progress(move |ev| progress.record(WebViewEvent::LoadProgress(ev.clone())))
            .on_load(move |ev| load.record(WebViewEvent::Load(ev.clone())))
            .on_load_end(move |ev| end.record(WebViewEvent::LoadEnd(ev.clone())))
            .on_navigation_state_change(move |ev| {
                navigation.record(WebViewEvent::NavigationStateChange(ev.clone()))
            })
    }

    pub fn record(&self, event: WebViewEvent) {
        self.events.borrow_mut().push(event);
    }

    /// Take all recorded events, leaving the log empty.
    pub fn drain(&self) -> Vec<WebViewEvent> {
        std::mem::take(&mut *self.events.borrow_mut())
    }

    pub fn snapshot(&self) -> Vec<WebViewEvent> {
        self.events.borrow().clone()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.events.borrow().iter().map(WebViewEvent::name).collect()
    }

    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }
}
