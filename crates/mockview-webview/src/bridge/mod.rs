//! Mounted backend: one headless document per load cycle.
//!
//! `BackendBridge` owns the current document, tracks loading/loaded state,
//! and rebuilds the document on reload or when its configuration changes.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use serde::Serialize;
use tracing::{debug, info};

use mockview_common::{DomError, MountId};
use mockview_dom::{HeadlessDom, LoadPhase, ScriptError};

use crate::events::{NavigationEvent, NavigationType};
use crate::ipc;

mod callbacks;
mod handle;
mod lifecycle;
mod recorder;
mod types;
mod view;

pub use callbacks::{Callback, WebViewCallbacks};
pub use handle::WebViewControl;
pub use lifecycle::initialize_dom;
pub use recorder::EventLog;
pub use types::BackendConfig;
pub use view::PlaceholderView;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendState {
    Loading,
    Loaded,
}

impl fmt::Display for BackendState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Loading => "loading",
            Self::Loaded => "loaded",
        })
    }
}

pub struct BackendBridge {
    mount_id: MountId,
    config: BackendConfig,
    /// Shared with the current document's `onLoad` wrapper.
    state: Rc<Cell<BackendState>>,
    load_cycle: u64,
    navigation_type: NavigationType,
    dom: HeadlessDom,
}

impl fmt::Debug for BackendBridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendBridge")
            .field("mount_id", &self.mount_id)
            .field("state", &self.state.get())
            .field("load_cycle", &self.load_cycle)
            .field("navigation_type", &self.navigation_type)
            .finish_non_exhaustive()
    }
}

impl BackendBridge {
    /// Mount a backend and start load cycle 0.
    pub fn mount(config: BackendConfig) -> Result<Self, DomError> {
        let mount_id = MountId::new();
        let state = Rc::new(Cell::new(BackendState::Loading));
        let navigation_type = NavigationType::Other;
        let dom = construct(&mount_id, &config, &state, 0, navigation_type)?;
        info!(mount = %mount_id, url = config.document_url(), "backend mounted");
        Ok(Self {
            mount_id,
            config,
            state,
            load_cycle: 0,
            navigation_type,
            dom,
        })
    }

    /// Apply a new configuration. Returns whether the document was rebuilt.
    pub fn update(&mut self, config: BackendConfig) -> Result<bool, DomError> {
        if config == self.config {
            debug!(mount = %self.mount_id, "configuration unchanged");
            return Ok(false);
        }
        let navigation_type = NavigationType::Other;
        let dom = construct(
            &self.mount_id,
            &config,
            &self.state,
            self.load_cycle,
            navigation_type,
        )?;
        self.replace_document(dom, navigation_type);
        self.config = config;
        Ok(true)
    }

    /// Run the next lifecycle phase of the current document, then deliver
    /// any messages the page posted during it.
    pub fn pump(&mut self) -> Option<LoadPhase> {
        let phase = self.dom.advance()?;
        ipc::forward_messages(&mut self.dom, &self.config.callbacks, self.navigation_type);
        Some(phase)
    }

    /// Pump until the document is idle. Returns the number of phases run.
    pub fn settle(&mut self) -> usize {
        let mut phases = 0;
        while self.pump().is_some() {
            phases += 1;
        }
        phases
    }

    /// Flush timers scheduled after the document went idle.
    pub fn run_timers(&mut self) -> usize {
        let runs = self.dom.run_timers();
        ipc::forward_messages(&mut self.dom, &self.config.callbacks, self.navigation_type);
        runs
    }

    pub fn state(&self) -> BackendState {
        self.state.get()
    }

    pub fn load_cycle(&self) -> u64 {
        self.load_cycle
    }

    pub fn mount_id(&self) -> &MountId {
        &self.mount_id
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    /// Current navigation snapshot, read live from the document.
    pub fn navigation(&mut self) -> NavigationEvent {
        let loading = self.state() == BackendState::Loading;
        NavigationEvent::capture(&mut self.dom, loading, self.navigation_type)
    }

    /// Uncaught page errors collected since the last call.
    pub fn take_script_errors(&mut self) -> Vec<ScriptError> {
        self.dom.take_script_errors()
    }

    pub fn render(&self) -> PlaceholderView {
        PlaceholderView::for_state(self.state(), self.load_cycle)
    }

    fn replace_document(&mut self, dom: HeadlessDom, navigation_type: NavigationType) {
        self.dom = dom;
        self.navigation_type = navigation_type;
        self.state.set(BackendState::Loading);
    }
}

impl Drop for BackendBridge {
    fn drop(&mut self) {
        debug!(mount = %self.mount_id, cycle = self.load_cycle, "backend unmounted");
    }
}

/// Build the document for one load cycle, flipping `state` to loaded when
/// its `onLoad` fires.
fn construct(
    mount_id: &MountId,
    config: &BackendConfig,
    state: &Rc<Cell<BackendState>>,
    cycle: u64,
    navigation_type: NavigationType,
) -> Result<HeadlessDom, DomError> {
    let mut wired = config.clone();
    let flag = Rc::clone(state);
    let on_load = config.callbacks.on_load.clone();
    wired.callbacks.on_load = Some(Rc::new(move |event: &NavigationEvent| {
        flag.set(BackendState::Loaded);
        if let Some(on_load) = &on_load {
            on_load(event);
        }
    }));

    debug!(mount = %mount_id, cycle, ?navigation_type, "constructing document");
    initialize_dom(&wired, navigation_type)
}

#[cfg(test)]
mod tests;
