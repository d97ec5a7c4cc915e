use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use pdfbug_common::{
    logging::ensure_test_logging,
    types::{OperationRecord, OperatorList},
};
use pdfbug_engine::{DebuggerContext, PanelHost, ToolId, ToolSelection};
use pdfbug_tui::{App, Config, EventResponse, Theme, TuiConfig};
use serde_json::json;
use std::{path::PathBuf, time::Duration};
use tracing::info;

fn press(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn app(tools: &str) -> App {
    let mut host = PanelHost::new();
    host.init(&DebuggerContext::default(), &ToolSelection::parse(tools));
    App::new(host.into_shared(), Theme::default(), PathBuf::from("."))
}

fn show_text_list() -> OperatorList {
    [
        OperationRecord::new(10, vec![]),
        OperationRecord::new(44, vec![json!([{ "fontChar": "A", "unicode": "A" }])]),
        OperationRecord::new(11, vec![]),
    ]
    .into_iter()
    .collect()
}

#[test]
fn test_default_tui_config() {
    ensure_test_logging(None);
    info!("Running test");

    let config = TuiConfig::default();

    assert_eq!(config.refresh_interval, Duration::from_millis(50));
    assert!(!config.enable_mouse);
    assert_eq!(config.export_dir, PathBuf::from("."));
}

#[test]
fn test_tui_config_from_file_config() {
    ensure_test_logging(None);
    info!("Running test");

    let mut config = Config::default();
    config.ui.refresh_interval_ms = 0;
    config.ui.enable_mouse = true;

    let tui_config = TuiConfig::from_config(&config, PathBuf::from("/tmp"));
    assert_eq!(tui_config.refresh_interval, Duration::from_millis(1));
    assert_eq!(tui_config.theme, config.colors.theme());
    assert!(tui_config.enable_mouse);

    let cloned = tui_config.clone();
    assert_eq!(cloned.export_dir, tui_config.export_dir);
}

#[test]
fn test_breakpoint_toggled_from_stepper_panel() {
    ensure_test_logging(None);
    info!("Running test");

    let mut app = app("Stepper");
    {
        let mut host = app.host().lock();
        host.page_started(0);
        host.update_operator_list(0, &show_text_list());
    }

    assert_eq!(app.handle_key_event(press(KeyCode::Down)).unwrap(), EventResponse::Handled);
    assert_eq!(app.handle_key_event(press(KeyCode::Char('b'))).unwrap(), EventResponse::Handled);

    let host = app.host().lock();
    let registry = host.stepper().unwrap();
    assert_eq!(registry.stepper(0).unwrap().breakpoints(), &[1]);
    assert_eq!(registry.store().get(0), &[1]);
}

#[test]
fn test_step_and_continue_keys_release_pause() {
    ensure_test_logging(None);
    info!("Running test");

    let mut app = app("all");
    {
        let mut host = app.host().lock();
        host.page_started(0);
        host.update_operator_list(0, &show_text_list());
        host.stepper_mut().unwrap().toggle_breakpoint(0, 1, true);
        host.select_tool(ToolId::Stats);
    }

    let decision = app.host().lock().on_before_execute(0, 1);
    assert!(decision.is_pause());
    assert_eq!(app.host().lock().active_slot().map(|s| s.id()), Some(ToolId::Stepper));

    assert_eq!(app.handle_key_event(press(KeyCode::Char('s'))).unwrap(), EventResponse::Handled);
    assert!(!app.host().lock().stepper().unwrap().is_paused());

    // Not paused any more: 'c' goes to the panel, which ignores it
    assert_eq!(
        app.handle_key_event(press(KeyCode::Char('c'))).unwrap(),
        EventResponse::NotHandled
    );
}

#[test]
fn test_key_release_is_ignored() {
    ensure_test_logging(None);
    info!("Running test");

    let mut app = app("all");
    let mut event = press(KeyCode::Char('q'));
    event.kind = KeyEventKind::Release;

    assert_eq!(app.handle_key_event(event).unwrap(), EventResponse::Handled);
    assert!(!app.should_exit());

    let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
    assert_eq!(app.handle_key_event(ctrl_c).unwrap(), EventResponse::Exit);
}
