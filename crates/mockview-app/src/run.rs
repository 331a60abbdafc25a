//! One CLI run: mount, settle, reload, evaluate, report.

use std::io::Write;

use serde::Serialize;
use serde_json::json;
use tracing::{debug, info};

use mockview_common::Result;
use mockview_config::{MockviewConfig, RuntimeConfig};
use mockview_dom::RuntimeLimits;
use mockview_webview::{BackendBridge, BackendConfig, EventLog, WebViewControl};

use crate::cli::Args;

pub fn limits_from_config(runtime: &RuntimeConfig) -> RuntimeLimits {
    RuntimeLimits {
        recursion_limit: runtime.recursion_limit as usize,
        stack_size_limit: runtime.stack_size_limit as usize,
        loop_iteration_limit: runtime.loop_iteration_limit,
        max_timer_runs: runtime.max_timer_runs as usize,
    }
}

/// Merge CLI overrides over config defaults.
pub fn backend_config(args: &Args, config: &MockviewConfig, html: String) -> BackendConfig {
    let url = args
        .url
        .clone()
        .unwrap_or_else(|| config.backend.base_url.clone());
    let user_agent = args
        .user_agent
        .clone()
        .or_else(|| config.backend.user_agent().map(str::to_string));

    BackendConfig {
        html,
        url: Some(url),
        injected_javascript: args.inject.clone(),
        injected_javascript_before_content_loaded: args.inject_before.clone(),
        javascript_enabled: config.backend.javascript_enabled && !args.no_js,
        user_agent,
        limits: limits_from_config(&config.runtime),
        ..Default::default()
    }
}

/// Load the page, drive it to idle, and write one JSON line per event,
/// per `--eval` expression, per uncaught page error, and for the final view.
pub fn run(args: &Args, config: &MockviewConfig, out: &mut impl Write) -> Result<()> {
    let html = std::fs::read_to_string(&args.file)?;
    let log = EventLog::new();
    let backend = BackendConfig {
        callbacks: log.callbacks(),
        ..backend_config(args, config, html)
    };

    let mut bridge = BackendBridge::mount(backend)?;
    info!(file = %args.file.display(), mount = %bridge.mount_id(), "page mounted");
    let phases = bridge.settle();
    debug!(phases, "initial load settled");
    emit_events(&log, &mut bridge, out)?;

    for _ in 0..args.reload {
        bridge.reload()?;
        bridge.settle();
        emit_events(&log, &mut bridge, out)?;
    }

    for expr in &args.eval {
        let line = match bridge.window().evaluate(expr) {
            Ok(value) => json!({ "eval": expr, "result": value.to_json() }),
            Err(e) => json!({ "eval": expr, "error": e.to_string() }),
        };
        write_line(out, &line)?;
        emit_events(&log, &mut bridge, out)?;
    }

    let view = bridge.render();
    write_line(out, &json!({ "view": view }))?;
    Ok(())
}

fn emit_events(log: &EventLog, bridge: &mut BackendBridge, out: &mut impl Write) -> Result<()> {
    for event in log.drain() {
        write_line(out, &event)?;
    }
    for error in bridge.take_script_errors() {
        write_line(out, &json!({ "scriptError": error }))?;
    }
    Ok(())
}

fn write_line(out: &mut impl Write, value: &impl Serialize) -> Result<()> {
    let line = serde_json::to_string(value)?;
    writeln!(out, "{line}")?;
    Ok(())
}
