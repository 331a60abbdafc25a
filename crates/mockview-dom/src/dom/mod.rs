//! The headless document: parse, run inline scripts, fire lifecycle events.
//!
//! A document moves through [`LoadPhase`]s one [`HeadlessDom::advance`] at a
//! time. Host listeners registered with [`HeadlessDom::add_listener`] run
//! before page listeners for the same lifecycle event.

use std::collections::VecDeque;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use mockview_common::DomError;

use crate::console::ConsoleMessage;
use crate::handles::{Document, Window};
use crate::location::LocationParts;
use crate::parse::{self, InlineScript};
use crate::prelude::{self, js_string};
use crate::runtime::{RuntimeLimits, ScriptRuntime};
use crate::value::ScriptValue;

pub const ABOUT_BLANK: &str = "about:blank";

/// `navigator.userAgent` when the caller does not supply one.
pub fn default_user_agent() -> String {
    format!(
        "Mozilla/5.0 ({}) AppleWebKit/537.36 (KHTML, like Gecko) mockview/{}",
        std::env::consts::OS,
        env!("CARGO_PKG_VERSION")
    )
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomOptions {
    pub html: String,
    /// Absolute document URL.
    pub url: String,
    /// Whether inline `<script>` elements run. Host scripts always run.
    pub run_scripts: bool,
    pub user_agent: Option<String>,
    pub limits: RuntimeLimits,
}

impl Default for DomOptions {
    fn default() -> Self {
        Self {
            html: String::new(),
            url: ABOUT_BLANK.into(),
            run_scripts: false,
            user_agent: None,
            limits: RuntimeLimits::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadyState {
    Loading,
    Interactive,
    Complete,
}

impl ReadyState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::Interactive => "interactive",
            Self::Complete => "complete",
        }
    }
}

impl fmt::Display for ReadyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadPhase {
    /// Inline scripts run in document order.
    Parse,
    /// `readyState` becomes `interactive`; `DOMContentLoaded` fires.
    ContentLoaded,
    /// `readyState` becomes `complete`; `load` fires on the window.
    Load,
    /// One bounded flush of the timer queue.
    Timers,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleEvent {
    ContentLoaded,
    Load,
}

/// Error raised by page or host script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptError {
    pub origin: String,
    pub message: String,
}

type LifecycleListener = Box<dyn FnMut(&mut HeadlessDom)>;

#[derive(Deserialize)]
struct PageQueues {
    console: Vec<ConsoleMessage>,
    errors: Vec<ScriptError>,
}

pub struct HeadlessDom {
    runtime: ScriptRuntime,
    options: DomOptions,
    scripts: Vec<InlineScript>,
    pending: VecDeque<LoadPhase>,
    ready_state: ReadyState,
    content_loaded_listeners: Vec<LifecycleListener>,
    load_listeners: Vec<LifecycleListener>,
    errors: Vec<ScriptError>,
    console: Vec<ConsoleMessage>,
}

impl fmt::Debug for HeadlessDom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeadlessDom")
            .field("url", &self.options.url)
            .field("ready_state", &self.ready_state)
            .field("pending", &self.pending)
            .field("errors", &self.errors.len())
            .finish_non_exhaustive()
    }
}

impl HeadlessDom {
    pub fn new(options: DomOptions) -> Result<Self, DomError> {
        Self::with_before_parse(options, |_| Ok(()))
    }

    /// Build the document, running `before_parse` after the script globals
    /// exist but before any inline script or lifecycle event.
    pub fn with_before_parse<F>(options: DomOptions, before_parse: F) -> Result<Self, DomError>
    where
        F: FnOnce(&mut HeadlessDom) -> Result<(), DomError>,
    {
        let location = LocationParts::parse(&options.url)?;
        let parsed = parse::parse_document(&options.html);
        let user_agent = options
            .user_agent
            .clone()
            .unwrap_or_else(default_user_agent);

        let mut runtime = ScriptRuntime::new(&options.limits);
        runtime
            .eval(prelude::DOM_PRELUDE)
            .map_err(DomError::Bootstrap)?;
        let boot = prelude::boot_script(&parsed.nodes, &location, &user_agent)?;
        runtime.eval(&boot).map_err(DomError::Bootstrap)?;

        let mut dom = Self {
            runtime,
            options,
            scripts: parsed.scripts,
            pending: VecDeque::from([
                LoadPhase::Parse,
                LoadPhase::ContentLoaded,
                LoadPhase::Load,
                LoadPhase::Timers,
            ]),
            ready_state: ReadyState::Loading,
            content_loaded_listeners: Vec::new(),
            load_listeners: Vec::new(),
            errors: Vec::new(),
            console: Vec::new(),
        };
        debug!(
            url = %dom.options.url,
            scripts = dom.scripts.len(),
            run_scripts = dom.options.run_scripts,
            "headless document created"
        );

        before_parse(&mut dom)?;
        dom.flush_page_queues();
        Ok(dom)
    }

    pub fn add_listener<F>(&mut self, event: LifecycleEvent, listener: F)
    where
        F: FnMut(&mut HeadlessDom) + 'static,
    {
        self.listeners_mut(event).push(Box::new(listener));
    }

    /// Run the next lifecycle phase. `None` once the document is idle.
    pub fn advance(&mut self) -> Option<LoadPhase> {
        let phase = self.pending.pop_front()?;
        match phase {
            LoadPhase::Parse => self.run_inline_scripts(),
            LoadPhase::ContentLoaded => {
                self.set_ready_state(ReadyState::Interactive);
                self.fire_host(LifecycleEvent::ContentLoaded);
                self.run_host_script("lifecycle:DOMContentLoaded", "__mockview_dom.fireContentLoaded()");
            }
            LoadPhase::Load => {
                self.set_ready_state(ReadyState::Complete);
                self.fire_host(LifecycleEvent::Load);
                self.run_host_script("lifecycle:load", "__mockview_dom.fireLoad()");
            }
            LoadPhase::Timers => {
                self.run_timers();
            }
        }
        self.flush_page_queues();
        debug!(?phase, "lifecycle phase complete");
        Some(phase)
    }

    /// Advance until idle, returning the number of phases run.
    pub fn run_until_idle(&mut self) -> usize {
        let mut phases = 0;
        while self.advance().is_some() {
            phases += 1;
        }
        phases
    }

    pub fn is_idle(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn ready_state(&self) -> ReadyState {
        self.ready_state
    }

    /// Run `source` in the page's global scope on behalf of the host.
    pub fn execute(&mut self, origin: &str, source: &str) -> Result<(), DomError> {
        let result = self.runtime.eval(source);
        self.flush_page_queues();
        result.map(|_| ()).map_err(|message| DomError::Script {
            origin: origin.to_string(),
            message,
        })
    }

    /// Evaluate an expression and bring its value back into Rust.
    pub fn evaluate(&mut self, source: &str) -> Result<ScriptValue, DomError> {
        let wrapped = format!("__mockview_dom.capture((0, eval)({}))", js_string(source)?);
        let result = self.runtime.eval_string(&wrapped);
        self.flush_page_queues();
        let raw = result.map_err(|message| DomError::Script {
            origin: "evaluate".into(),
            message,
        })?;
        ScriptValue::from_capture(&raw)
    }

    /// Current `location.href`, falling back to the construction URL.
    pub fn url(&mut self) -> String {
        self.read_string("String(location.href)")
            .unwrap_or_else(|| self.options.url.clone())
    }

    /// Current `document.title`.
    pub fn title(&mut self) -> String {
        self.read_string("String(document.title)")
            .unwrap_or_default()
    }

    /// Flush due timers on the virtual clock, bounded by `max_timer_runs`.
    pub fn run_timers(&mut self) -> usize {
        let limit = self.options.limits.max_timer_runs;
        let runs = self
            .read_string(&format!("String(__mockview_dom.flushTimers({limit}))"))
            .and_then(|s| s.parse().ok())
            .unwrap_or(0);
        self.flush_page_queues();
        if runs > 0 {
            debug!(runs, remaining = self.pending_timers(), "timers flushed");
        }
        runs
    }

    pub fn pending_timers(&mut self) -> usize {
        self.read_string("String(__mockview_dom.pendingTimers())")
            .and_then(|s| s.parse().ok())
            .unwrap_or(0)
    }

    pub fn script_errors(&self) -> &[ScriptError] {
        &self.errors
    }

    pub fn take_script_errors(&mut self) -> Vec<ScriptError> {
        std::mem::take(&mut self.errors)
    }

    pub fn console_messages(&self) -> &[ConsoleMessage] {
        &self.console
    }

    pub fn options(&self) -> &DomOptions {
        &self.options
    }

    pub fn document(&mut self) -> Document<'_> {
        Document::new(self)
    }

    pub fn window(&mut self) -> Window<'_> {
        Window::new(self)
    }

    fn listeners_mut(&mut self, event: LifecycleEvent) -> &mut Vec<LifecycleListener> {
        match event {
            LifecycleEvent::ContentLoaded => &mut self.content_loaded_listeners,
            LifecycleEvent::Load => &mut self.load_listeners,
        }
    }

    fn fire_host(&mut self, event: LifecycleEvent) {
        let mut listeners = std::mem::take(self.listeners_mut(event));
        for listener in listeners.iter_mut() {
            listener(self);
        }
        let added = std::mem::replace(self.listeners_mut(event), listeners);
        self.listeners_mut(event).extend(added);
    }

    fn run_inline_scripts(&mut self) {
        if !self.options.run_scripts {
            if !self.scripts.is_empty() {
                debug!(count = self.scripts.len(), "scripts disabled, inline scripts skipped");
            }
            return;
        }
        for script in std::mem::take(&mut self.scripts) {
            let origin = format!("inline:{}", script.index);
            if let Err(message) = self.runtime.eval(&script.source) {
                self.record_error(ScriptError { origin, message });
            }
            self.flush_page_queues();
        }
    }

    fn set_ready_state(&mut self, state: ReadyState) {
        self.ready_state = state;
        self.run_host_script(
            "lifecycle:readystatechange",
            &format!("__mockview_dom.setReadyState('{state}')"),
        );
    }

    fn run_host_script(&mut self, origin: &str, source: &str) {
        if let Err(message) = self.runtime.eval(source) {
            self.record_error(ScriptError {
                origin: origin.to_string(),
                message,
            });
        }
    }

    fn read_string(&mut self, source: &str) -> Option<String> {
        match self.runtime.eval_string(source) {
            Ok(value) => Some(value),
            Err(e) => {
                debug!(error = %e, "page state unreadable");
                None
            }
        }
    }

    fn record_error(&mut self, error: ScriptError) {
        warn!(origin = %error.origin, message = %error.message, "uncaught script error");
        self.errors.push(error);
    }

    /// Move queued console output and listener errors from the page into Rust.
    fn flush_page_queues(&mut self) {
        let raw = match self.runtime.eval_string("__mockview_dom.drain()") {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, "page queues unreadable");
                return;
            }
        };
        let queues: PageQueues = match serde_json::from_str(&raw) {
            Ok(queues) => queues,
            Err(e) => {
                warn!(error = %e, "page queues malformed");
                return;
            }
        };
        for message in queues.console {
            message.emit();
            self.console.push(message);
        }
        for error in queues.errors {
            self.record_error(error);
        }
    }
}
