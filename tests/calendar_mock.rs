use almanakka::calendar::models::{CalendarEvent, EventTime};
use almanakka::error::FetchError;
use almanakka::session::SessionStore;
use almanakka::ui::{App, InputMode};
use tempfile::tempdir;

/// Mock implementation of the calendar handle for testing without HTTP
#[derive(Debug, Clone, Default)]
pub struct MockCalendarHandle {
    events: Vec<CalendarEvent>,
}

impl MockCalendarHandle {
    /// Create a new mock handle with predefined events
    pub fn new() -> Self {
        let events = vec![
            CalendarEvent {
                id: "event1".to_string(),
                summary: Some("Test Event 1".to_string()),
                description: Some("Test Description 1".to_string()),
                start: EventTime {
                    date_time: Some("2024-01-10T10:00:00Z".to_string()),
                    ..Default::default()
                },
                end: EventTime {
                    date_time: Some("2024-01-10T11:00:00Z".to_string()),
                    ..Default::default()
                },
                ..Default::default()
            },
            CalendarEvent {
                id: "event2".to_string(),
                summary: Some("Test Event 2".to_string()),
                location: Some("Test Location".to_string()),
                start: EventTime {
                    date: Some("2024-01-12".to_string()),
                    ..Default::default()
                },
                end: EventTime {
                    date: Some("2024-01-13".to_string()),
                    ..Default::default()
                },
                ..Default::default()
            },
        ];

        Self { events }
    }

    /// Fetch events from the mock
    pub async fn fetch_events(&self, _token: &str) -> Result<Vec<CalendarEvent>, FetchError> {
        Ok(self.events.clone())
    }
}

#[tokio::test]
async fn mock_handle_returns_events() {
    let mock_handle = MockCalendarHandle::new();

    let events = mock_handle.fetch_events("tok").await.unwrap();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].id, "event1");
    assert_eq!(events[1].id, "event2");
}

#[tokio::test]
async fn completed_fetch_populates_app_state() {
    let dir = tempdir().unwrap();
    let store = SessionStore::new(dir.path().join("session.toml"));
    let mut app = App::new(store);

    app.sign_in("tok", 3600).unwrap();
    let (token, generation) = app.begin_fetch().unwrap();

    let mock_handle = MockCalendarHandle::new();
    let result = mock_handle.fetch_events(&token).await;
    app.apply_fetch_result(generation, result);

    assert!(app.signed_in());
    assert_eq!(app.events.len(), 2);
    assert!(!app.fetch_pending);
}

#[tokio::test]
async fn only_one_fetch_is_in_flight() {
    let dir = tempdir().unwrap();
    let store = SessionStore::new(dir.path().join("session.toml"));
    let mut app = App::new(store);

    app.sign_in("tok", 3600).unwrap();
    assert!(app.begin_fetch().is_some());
    // A second fetch is not issued while the first is pending
    assert!(app.begin_fetch().is_none());
}

#[tokio::test]
async fn forced_logout_leaves_date_entry_mode() {
    let dir = tempdir().unwrap();
    let store = SessionStore::new(dir.path().join("session.toml"));
    let mut app = App::new(store);

    app.sign_in("tok", 3600).unwrap();
    let (_token, generation) = app.begin_fetch().unwrap();

    // The user is mid-way through typing a date when a 401 lands
    app.start_date_entry();
    app.push_date_char('2');
    app.push_date_char('0');
    app.apply_fetch_result(generation, Err(FetchError::Unauthorized));

    assert!(!app.signed_in());
    assert_eq!(app.input_mode, InputMode::Normal);
    assert!(app.date_input.is_empty());
}

#[tokio::test]
async fn stale_fetch_result_after_sign_out_is_ignored() {
    let dir = tempdir().unwrap();
    let store = SessionStore::new(dir.path().join("session.toml"));
    let mut app = App::new(store.clone());

    app.sign_in("tok", 3600).unwrap();
    let (token, generation) = app.begin_fetch().unwrap();

    let mock_handle = MockCalendarHandle::new();
    let result = mock_handle.fetch_events(&token).await;

    // The user signs out while the fetch is still in flight
    app.sign_out();
    app.apply_fetch_result(generation, result);

    // The stale result must not be written into cleared state
    assert!(!app.signed_in());
    assert!(app.events.is_empty());
    assert!(store.load().is_none());
}
