use crate::calendar::{view, CalendarEvent, ViewFilter};
use crate::error::{AppResult, FetchError};
use crate::session::{Session, SessionStore};
use chrono::{DateTime, Local, NaiveDate};
use ratatui::widgets::TableState;
use tracing::{error, info, warn};

/// Input handling mode of the UI loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    /// Typing a date for the date filter
    DateEntry,
}

/// All mutable state of the viewer, owned by the UI loop.
///
/// The session, event list, and filter selections live here and are
/// mutated only in response to completed operations or user input.
pub struct App {
    session_store: SessionStore,
    session: Option<Session>,
    /// Events as received from the provider, validity-filtered at fetch time
    pub events: Vec<CalendarEvent>,
    pub filter: ViewFilter,
    pub selected_date: Option<NaiveDate>,
    pub date_input: String,
    pub input_mode: InputMode,
    pub table_state: TableState,
    pub detail_open: bool,
    pub fetch_pending: bool,
    pub status: Option<String>,
    /// Bumped whenever the session is destroyed, so a fetch result that
    /// was issued under an older session is discarded instead of being
    /// written into state.
    generation: u64,
}

impl App {
    pub fn new(session_store: SessionStore) -> Self {
        Self {
            session_store,
            session: None,
            events: Vec::new(),
            filter: ViewFilter::default(),
            selected_date: None,
            date_input: String::new(),
            input_mode: InputMode::default(),
            table_state: TableState::default(),
            detail_open: false,
            fetch_pending: false,
            status: None,
            generation: 0,
        }
    }

    pub fn signed_in(&self) -> bool {
        self.session.is_some()
    }

    /// Restore a persisted session on startup, returning its token so the
    /// caller can trigger the initial fetch
    pub fn restore_session(&mut self) -> Option<String> {
        let session = self.session_store.load()?;
        info!("Restored persisted session, expires at {}", session.expires_at);
        let token = session.access_token.clone();
        self.session = Some(session);
        Some(token)
    }

    /// Record a fresh login and persist it
    pub fn sign_in(&mut self, token: &str, ttl_seconds: i64) -> AppResult<String> {
        let session = self.session_store.save(token, ttl_seconds)?;
        let token = session.access_token.clone();
        self.session = Some(session);
        self.status = None;
        Ok(token)
    }

    /// Destroy the session: clear persisted state, drop cached events,
    /// and invalidate any fetch still in flight
    pub fn sign_out(&mut self) {
        if let Err(e) = self.session_store.clear() {
            error!("Failed to clear session store: {:?}", e);
        }
        self.session = None;
        self.events.clear();
        self.generation += 1;
        self.fetch_pending = false;
        self.detail_open = false;
        self.table_state.select(None);
        // A forced logout can land mid-keystroke; keys must route to the
        // signed-out screen, not to a leftover date-entry mode
        self.input_mode = InputMode::Normal;
        self.date_input.clear();
        self.status = None;
    }

    /// Mark a fetch as started, handing back what the fetch task needs.
    /// Returns None when signed out or a fetch is already in flight.
    pub fn begin_fetch(&mut self) -> Option<(String, u64)> {
        if self.fetch_pending {
            return None;
        }
        let token = self.session.as_ref()?.access_token.clone();
        self.fetch_pending = true;
        Some((token, self.generation))
    }

    /// Apply a completed fetch. Results tagged with an older generation
    /// arrived after sign-out and are ignored.
    pub fn apply_fetch_result(
        &mut self,
        generation: u64,
        result: Result<Vec<CalendarEvent>, FetchError>,
    ) {
        if generation != self.generation {
            info!("Ignoring stale fetch result from a cleared session");
            return;
        }
        self.fetch_pending = false;

        match result {
            Ok(events) => {
                info!("Fetched {} valid events", events.len());
                self.events = events;
                self.status = None;
            }
            Err(FetchError::Unauthorized) => {
                // The only case that forces a logout from inside the fetch path
                warn!("Calendar API returned 401, signing out");
                self.sign_out();
            }
            Err(FetchError::RequestFailed(reason)) => {
                // Session and previously displayed events are retained
                error!("Event fetch failed: {}", reason);
                self.status = Some(String::from("Fetch failed, press r to retry"));
            }
        }
    }

    /// The displayed, ordered subset for the current filter selections
    pub fn visible_events(&self, now: DateTime<Local>) -> Vec<CalendarEvent> {
        view(&self.events, self.filter, self.selected_date, now)
    }

    pub fn set_filter(&mut self, filter: ViewFilter) {
        if self.filter != filter {
            self.filter = filter;
            self.table_state.select(None);
            self.detail_open = false;
        }
    }

    pub fn start_date_entry(&mut self) {
        self.input_mode = InputMode::DateEntry;
        self.date_input.clear();
    }

    pub fn push_date_char(&mut self, c: char) {
        if (c.is_ascii_digit() || c == '-') && self.date_input.len() < 10 {
            self.date_input.push(c);
        }
    }

    pub fn pop_date_char(&mut self) {
        self.date_input.pop();
    }

    /// Apply the typed date filter; malformed input leaves the filter unchanged
    pub fn commit_date_entry(&mut self) {
        match NaiveDate::parse_from_str(&self.date_input, "%Y-%m-%d") {
            Ok(date) => {
                self.selected_date = Some(date);
                self.table_state.select(None);
                self.detail_open = false;
                self.status = None;
            }
            Err(_) => {
                self.status = Some(String::from("Invalid date, expected YYYY-MM-DD"));
            }
        }
        self.input_mode = InputMode::Normal;
        self.date_input.clear();
    }

    pub fn cancel_date_entry(&mut self) {
        self.input_mode = InputMode::Normal;
        self.date_input.clear();
    }

    pub fn clear_date(&mut self) {
        if self.selected_date.take().is_some() {
            self.table_state.select(None);
            self.detail_open = false;
        }
    }

    pub fn select_next(&mut self, visible_len: usize) {
        if visible_len == 0 {
            self.table_state.select(None);
            return;
        }
        let next = match self.table_state.selected() {
            Some(i) if i + 1 < visible_len => i + 1,
            Some(i) => i,
            None => 0,
        };
        self.table_state.select(Some(next));
    }

    pub fn select_previous(&mut self, visible_len: usize) {
        if visible_len == 0 {
            self.table_state.select(None);
            return;
        }
        let previous = match self.table_state.selected() {
            Some(i) if i > 0 => i - 1,
            Some(_) => 0,
            None => 0,
        };
        self.table_state.select(Some(previous));
    }

    /// Open or close the detail panel for the selected row
    pub fn toggle_detail(&mut self, visible_len: usize) {
        if self.detail_open {
            self.detail_open = false;
        } else if self
            .table_state
            .selected()
            .is_some_and(|i| i < visible_len)
        {
            self.detail_open = true;
        }
    }
}
