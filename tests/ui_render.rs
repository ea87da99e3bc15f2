use almanakka::calendar::models::{CalendarEvent, EventTime};
use almanakka::session::SessionStore;
use almanakka::ui::{render, App};
use chrono::Local;
use ratatui::backend::TestBackend;
use ratatui::Terminal;
use tempfile::tempdir;

fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
    terminal
        .backend()
        .buffer()
        .content
        .iter()
        .map(|cell| cell.symbol())
        .collect()
}

fn app_in(dir: &tempfile::TempDir) -> App {
    App::new(SessionStore::new(dir.path().join("session.toml")))
}

#[test]
fn signed_out_screen_renders_status_message() {
    let dir = tempdir().unwrap();
    let mut app = app_in(&dir);
    app.status = Some(String::from("Waiting for browser authorization..."));

    let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
    terminal
        .draw(|f| render::draw(f, &mut app, Local::now()))
        .unwrap();

    // The waiting message must be on screen before the login flow blocks
    let text = buffer_text(&terminal);
    assert!(text.contains("Waiting for browser authorization"));
    assert!(text.contains("Press s to sign in with Google"));
}

#[test]
fn signed_in_screen_renders_event_table() {
    let dir = tempdir().unwrap();
    let mut app = app_in(&dir);
    app.sign_in("tok", 3600).unwrap();
    app.events = vec![CalendarEvent {
        id: String::from("e1"),
        summary: Some(String::from("Conference day")),
        start: EventTime {
            date: Some(String::from("2024-01-12")),
            ..Default::default()
        },
        end: EventTime {
            date: Some(String::from("2024-01-13")),
            ..Default::default()
        },
        ..Default::default()
    }];

    let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
    terminal
        .draw(|f| render::draw(f, &mut app, Local::now()))
        .unwrap();

    let text = buffer_text(&terminal);
    assert!(text.contains("Conference day"));
    assert!(text.contains("All day"));
}
