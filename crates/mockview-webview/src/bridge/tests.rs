use std::cell::RefCell;
use std::rc::Rc;

use mockview_dom::ScriptValue;

use super::*;
use crate::events::WebViewEvent;

const PAGE: &str = "<html><head><title>Fixture</title></head><body>hi</body></html>";

fn logged(config: BackendConfig) -> (BackendBridge, EventLog) {
    let log = EventLog::new();
    let bridge = BackendBridge::mount(BackendConfig {
        callbacks: log.callbacks(),
        ..config
    })
    .unwrap();
    (bridge, log)
}

const APP_SHELL: &str = r#"<html><head><title>Dashboard</title></head><body>
<div id="root"><div class="shell"><div class="sidebar">
<nav class="menu"><ul>
<li class="entry"><a href="/inbox"><span class="icon"></span><span class="text">Inbox</span></a></li>
<li class="entry selected"><a href="/starred"><span class="icon"></span><span class="text">Starred</span></a></li>
</ul></nav></div>
<div class="content"><div class="panel"><div class="panel-body"><p id="status">booting</p></div></div></div>
</div></div>
<script>
document.addEventListener('DOMContentLoaded', function () {
  var label = document.querySelector('.menu li.selected .text').textContent;
  document.getElementById('status').textContent = 'showing ' + label;
  window.ReactNativeWebView.postMessage(label);
});
</script>
</body></html>"#;

const FULL_LOAD: [&str; 4] = ["loadProgress", "load", "loadEnd", "navigationStateChange"];

// =========================================================================
// Mount and load sequence
// =========================================================================

#[test]
fn posts_ready_message_in_documented_order() {
    let (mut bridge, log) = logged(BackendConfig {
        injected_javascript: Some("window.ReactNativeWebView.postMessage('ready')".into()),
        ..BackendConfig::with_html(PAGE)
    });

    assert_eq!(log.names(), vec!["loadStart", "navigationStateChange"]);
    bridge.settle();

    assert_eq!(
        log.names(),
        vec![
            "loadStart",
            "navigationStateChange",
            "message",
            "loadProgress",
            "load",
            "loadEnd",
            "navigationStateChange",
        ]
    );
    match &log.snapshot()[2] {
        WebViewEvent::Message(event) => {
            assert_eq!(event.data, "ready");
            assert!(event.navigation.loading);
        }
        other => panic!("expected message, got {other:?}"),
    }
}

#[test]
fn load_start_fires_once_during_mount() {
    let (mut bridge, log) = logged(BackendConfig::with_html(PAGE));
    bridge.settle();
    let names = log.names();
    assert_eq!(names[0], "loadStart");
    assert_eq!(names.iter().filter(|n| **n == "loadStart").count(), 1);
}

#[test]
fn full_load_sequence_is_complete_and_fires_once() {
    let (mut bridge, log) = logged(BackendConfig::with_html(PAGE));
    bridge.settle();
    bridge.settle();

    let events = log.drain();
    let tail: Vec<_> = events[2..].iter().map(WebViewEvent::name).collect();
    assert_eq!(tail, FULL_LOAD);

    match &events[2] {
        WebViewEvent::LoadProgress(progress) => assert_eq!(progress.progress, 1.0),
        other => panic!("expected progress, got {other:?}"),
    }
    for event in &events[2..] {
        assert!(!event.navigation().loading);
        assert!(!event.navigation().can_go_back);
        assert!(!event.navigation().can_go_forward);
        assert_eq!(event.navigation().navigation_type, NavigationType::Other);
    }
}

#[test]
fn start_events_report_loading() {
    let (_bridge, log) = logged(BackendConfig::with_html(PAGE));
    for event in log.snapshot() {
        assert!(event.navigation().loading);
        assert_eq!(event.navigation().title, "Fixture");
        assert_eq!(event.navigation().url, "about:blank");
    }
}

#[test]
fn events_carry_configured_url() {
    let (mut bridge, log) = logged(BackendConfig {
        url: Some("https://app.test/page".into()),
        ..BackendConfig::with_html(PAGE)
    });
    bridge.settle();
    assert!(log
        .snapshot()
        .iter()
        .all(|event| event.navigation().url == "https://app.test/page"));
}

#[test]
fn title_is_read_live_at_dispatch() {
    let (mut bridge, log) = logged(BackendConfig {
        injected_javascript: Some(
            "document.addEventListener('DOMContentLoaded', function () { document.title = 'Updated'; });"
                .into(),
        ),
        ..BackendConfig::with_html(PAGE)
    });
    bridge.settle();

    let events = log.snapshot();
    assert_eq!(events[0].navigation().title, "Fixture");
    let load = events.iter().find(|e| e.name() == "load").unwrap();
    assert_eq!(load.navigation().title, "Updated");
}

#[test]
fn missing_callbacks_are_skipped() {
    let mut bridge = BackendBridge::mount(BackendConfig {
        injected_javascript: Some("window.ReactNativeWebView.postMessage('nobody listens')".into()),
        ..BackendConfig::with_html(PAGE)
    })
    .unwrap();
    bridge.settle();
    assert_eq!(bridge.state(), BackendState::Loaded);
}

#[test]
fn only_on_load_is_enough_to_track_state() {
    let loads = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&loads);
    let mut bridge = BackendBridge::mount(BackendConfig {
        callbacks: WebViewCallbacks::new().on_load(move |_| *counter.borrow_mut() += 1),
        ..BackendConfig::with_html(PAGE)
    })
    .unwrap();
    assert_eq!(bridge.state(), BackendState::Loading);
    bridge.settle();
    assert_eq!(bridge.state(), BackendState::Loaded);
    assert_eq!(*loads.borrow(), 1);
}

#[test]
fn invalid_url_fails_mount() {
    let err = BackendBridge::mount(BackendConfig {
        url: Some("::not a url::".into()),
        ..BackendConfig::with_html(PAGE)
    })
    .unwrap_err();
    assert!(matches!(err, DomError::InvalidUrl { .. }));
}

// =========================================================================
// Injected scripts
// =========================================================================

#[test]
fn javascript_disabled_skips_page_and_injected_scripts() {
    let (mut bridge, _log) = logged(BackendConfig {
        html: "<body><script>window.inline = true;</script></body>".into(),
        javascript_enabled: false,
        injected_javascript: Some("window.injected = true;".into()),
        injected_javascript_before_content_loaded: Some("window.early = true;".into()),
        ..Default::default()
    });
    bridge.settle();

    let mut window = bridge.window();
    assert!(window.get("inline").unwrap().is_undefined());
    assert!(window.get("injected").unwrap().is_undefined());
    assert_eq!(window.get("early").unwrap(), ScriptValue::Bool(true));
}

#[test]
fn before_content_script_runs_ahead_of_page_scripts() {
    let (mut bridge, _log) = logged(BackendConfig {
        html: "<body><script>window.sawEarly = window.early === 1;</script></body>".into(),
        injected_javascript_before_content_loaded: Some("window.early = 1;".into()),
        ..Default::default()
    });
    bridge.settle();
    assert_eq!(
        bridge.window().get("sawEarly").unwrap(),
        ScriptValue::Bool(true)
    );
}

#[test]
fn injected_script_runs_before_page_content_loaded_listeners() {
    let (mut bridge, _log) = logged(BackendConfig {
        html: r#"<body><script>
            window.order = [];
            document.addEventListener('DOMContentLoaded', function () { order.push('page'); });
        </script></body>"#
            .into(),
        injected_javascript: Some("order.push('injected');".into()),
        ..Default::default()
    });
    bridge.settle();
    let order = bridge.window().evaluate("order.join(',')").unwrap();
    assert_eq!(order.as_str(), Some("injected,page"));
}

#[test]
fn failing_injected_script_does_not_stop_load() {
    let (mut bridge, log) = logged(BackendConfig {
        injected_javascript: Some("throw new Error('broken injection')".into()),
        ..BackendConfig::with_html(PAGE)
    });
    bridge.settle();
    assert_eq!(bridge.state(), BackendState::Loaded);
    assert!(log.names().contains(&"loadEnd"));
}

// =========================================================================
// Message bridge
// =========================================================================

#[test]
fn non_string_post_message_throws_in_page() {
    let (mut bridge, log) = logged(BackendConfig::with_html(PAGE));
    bridge.settle();
    log.drain();

    let err = bridge
        .inject_javascript("window.ReactNativeWebView.postMessage(42)")
        .unwrap_err();
    assert!(err.script_message().unwrap().contains("expects a string"));
    assert!(log.is_empty());
}

#[test]
fn string_post_message_reaches_on_message() {
    let (mut bridge, log) = logged(BackendConfig::with_html(PAGE));
    bridge.settle();
    log.drain();

    assert!(bridge
        .inject_javascript("window.ReactNativeWebView.postMessage('hello')")
        .unwrap());
    let events = log.drain();
    assert_eq!(events.len(), 1);
    match &events[0] {
        WebViewEvent::Message(event) => {
            assert_eq!(event.data, "hello");
            assert!(!event.navigation.loading);
        }
        other => panic!("expected message, got {other:?}"),
    }
}

#[test]
fn messages_from_timers_are_forwarded() {
    let (mut bridge, log) = logged(BackendConfig {
        html: "<body><script>setTimeout(function () { window.postMessage('tick'); }, 10);</script></body>"
            .into(),
        ..Default::default()
    });
    bridge.settle();
    let last = log.snapshot().pop().unwrap();
    match last {
        WebViewEvent::Message(event) => assert_eq!(event.data, "tick"),
        other => panic!("expected message, got {other:?}"),
    }
}

#[test]
fn host_post_message_reaches_page_listener() {
    let (mut bridge, _log) = logged(BackendConfig {
        html: r#"<body><script>
            window.received = null;
            window.addEventListener('message', function (e) { received = e.data; });
        </script></body>"#
            .into(),
        ..Default::default()
    });
    assert!(!bridge.post_message("too early").unwrap());
    bridge.settle();
    assert!(bridge.post_message("from host").unwrap());
    assert_eq!(
        bridge.window().get("received").unwrap().as_str(),
        Some("from host")
    );
}

#[test]
fn page_can_echo_host_messages() {
    let (mut bridge, log) = logged(BackendConfig {
        html: r#"<body><script>
            window.addEventListener('message', function (e) {
                window.ReactNativeWebView.postMessage('echo:' + e.data);
            });
        </script></body>"#
            .into(),
        ..Default::default()
    });
    bridge.settle();
    log.drain();
    bridge.post_message("ping").unwrap();
    let events = log.drain();
    let data: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            WebViewEvent::Message(m) => Some(m.data.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(data, vec!["echo:ping"]);
}

// =========================================================================
// Control handle
// =========================================================================

#[test]
fn inject_while_loading_is_a_no_op() {
    let (mut bridge, _log) = logged(BackendConfig::with_html(PAGE));
    assert_eq!(bridge.state(), BackendState::Loading);
    assert!(!bridge.inject_javascript("window.touched = true;").unwrap());
    bridge.settle();
    assert!(bridge.window().get("touched").unwrap().is_undefined());
}

#[test]
fn inject_after_load_mutates_live_document() {
    let (mut bridge, _log) = logged(BackendConfig::with_html(PAGE));
    bridge.settle();
    assert!(bridge
        .inject_javascript("document.title = 'Injected'; window.flag = 7;")
        .unwrap());
    assert_eq!(bridge.document().title(), "Injected");
    assert_eq!(bridge.window().get("flag").unwrap(), ScriptValue::Number(7.0));
}

#[test]
fn reload_starts_a_new_cycle_each_time() {
    let (mut bridge, log) = logged(BackendConfig::with_html(PAGE));
    bridge.settle();
    let mut cycles = vec![bridge.render().test_id];

    for _ in 0..3 {
        log.drain();
        bridge.reload().unwrap();
        assert_eq!(bridge.state(), BackendState::Loading);
        bridge.settle();

        let events = log.drain();
        let names: Vec<_> = events.iter().map(WebViewEvent::name).collect();
        assert_eq!(names[..2], ["loadStart", "navigationStateChange"]);
        assert_eq!(names[2..], FULL_LOAD);
        assert!(events
            .iter()
            .all(|e| e.navigation().navigation_type == NavigationType::Reload));
        cycles.push(bridge.render().test_id);
    }

    assert_eq!(
        cycles,
        vec![
            "backend-loaded-0",
            "backend-loaded-1",
            "backend-loaded-2",
            "backend-loaded-3"
        ]
    );
    assert_eq!(bridge.load_cycle(), 3);
}

#[test]
fn reload_discards_previous_document_state() {
    let (mut bridge, _log) = logged(BackendConfig::with_html(PAGE));
    bridge.settle();
    bridge.inject_javascript("window.leftover = 1;").unwrap();
    bridge.reload().unwrap();
    bridge.settle();
    assert!(bridge.window().get("leftover").unwrap().is_undefined());
}

#[test]
fn stubs_change_nothing() {
    let (mut bridge, log) = logged(BackendConfig::with_html(PAGE));
    bridge.settle();
    let before = log.len();

    bridge.stop_loading();
    bridge.go_back();
    bridge.go_forward();

    assert_eq!(log.len(), before);
    assert_eq!(bridge.state(), BackendState::Loaded);
    assert_eq!(bridge.load_cycle(), 0);
    assert_eq!(bridge.render().test_id, "backend-loaded-0");
}

#[test]
fn render_tracks_state() {
    let (mut bridge, _log) = logged(BackendConfig::with_html(PAGE));
    let view = bridge.render();
    assert_eq!(view.test_id, "backend-loading-0");
    assert!(view.find("backend-loading-0").is_some());
    assert!(view.children.is_empty());

    bridge.settle();
    let view = bridge.render();
    assert_eq!(view.test_id, "backend-loaded-0");
    assert_eq!(view.children.len(), 1);
    assert_eq!(view.children[0].test_id, "backend-loading-0");
}

#[test]
fn navigation_snapshot_is_live() {
    let (mut bridge, _log) = logged(BackendConfig::with_html(PAGE));
    bridge.settle();
    bridge.inject_javascript("document.title = 'Now';").unwrap();
    let nav = bridge.navigation();
    assert_eq!(nav.title, "Now");
    assert!(!nav.loading);
}

// =========================================================================
// Updates
// =========================================================================

#[test]
fn identical_config_does_not_rebuild() {
    let (mut bridge, log) = logged(BackendConfig::with_html(PAGE));
    bridge.settle();
    log.drain();

    let same = bridge.config().clone();
    assert!(!bridge.update(same).unwrap());
    assert!(log.is_empty());
    assert_eq!(bridge.state(), BackendState::Loaded);
}

#[test]
fn changed_html_rebuilds_document() {
    let (mut bridge, log) = logged(BackendConfig::with_html(PAGE));
    bridge.settle();
    log.drain();

    let next = BackendConfig {
        html: "<html><head><title>Second</title></head><body>bye</body></html>".into(),
        ..bridge.config().clone()
    };
    assert!(bridge.update(next).unwrap());
    assert_eq!(bridge.state(), BackendState::Loading);
    assert_eq!(log.names(), vec!["loadStart", "navigationStateChange"]);

    bridge.settle();
    assert_eq!(bridge.document().title(), "Second");
    assert_eq!(bridge.document().body_text().unwrap(), "bye");
    assert_eq!(bridge.load_cycle(), 0);
}

#[test]
fn new_callback_identity_rebuilds_document() {
    let (mut bridge, _log) = logged(BackendConfig::with_html(PAGE));
    bridge.settle();

    let replacement = EventLog::new();
    let next = BackendConfig {
        callbacks: replacement.callbacks(),
        ..bridge.config().clone()
    };
    assert!(bridge.update(next).unwrap());
    bridge.settle();
    assert_eq!(
        replacement.names(),
        vec![
            "loadStart",
            "navigationStateChange",
            "loadProgress",
            "load",
            "loadEnd",
            "navigationStateChange",
        ]
    );
}

// =========================================================================
// Document shapes
// =========================================================================

#[test]
fn app_shell_loads_and_answers_document_queries() {
    let (mut bridge, log) = logged(BackendConfig::with_html(APP_SHELL));
    bridge.settle();

    assert_eq!(
        log.names(),
        vec![
            "loadStart",
            "navigationStateChange",
            "message",
            "loadProgress",
            "load",
            "loadEnd",
            "navigationStateChange",
        ]
    );
    match &log.snapshot()[2] {
        WebViewEvent::Message(event) => assert_eq!(event.data, "Starred"),
        other => panic!("expected message, got {other:?}"),
    }
    assert_eq!(bridge.state(), BackendState::Loaded);
    assert!(bridge.take_script_errors().is_empty());

    let mut document = bridge.document();
    assert_eq!(document.title(), "Dashboard");
    assert_eq!(document.count(".menu li.entry").unwrap(), 2);
    assert_eq!(
        document.text_content("#status").unwrap().as_deref(),
        Some("showing Starred")
    );
    assert_eq!(
        document.attribute("li.selected a", "href").unwrap().as_deref(),
        Some("/starred")
    );
}

#[test]
fn deeply_nested_page_mounts_and_settles() {
    let depth = 400;
    let html = format!(
        "<html><body>{}<p id=\"deep\">bottom</p>{}</body></html>",
        "<div class=\"wrap\">".repeat(depth),
        "</div>".repeat(depth)
    );
    let (mut bridge, log) = logged(BackendConfig::with_html(html));
    bridge.settle();

    assert_eq!(bridge.state(), BackendState::Loaded);
    assert_eq!(log.names()[2..], FULL_LOAD);

    let mut document = bridge.document();
    assert_eq!(document.count("div.wrap").unwrap(), depth);
    assert_eq!(
        document.text_content(".wrap .wrap #deep").unwrap().as_deref(),
        Some("bottom")
    );

    assert!(bridge
        .inject_javascript("document.getElementById('deep').textContent = 'reached';")
        .unwrap());
    assert_eq!(bridge.document().body_text().unwrap(), "reached");
}
