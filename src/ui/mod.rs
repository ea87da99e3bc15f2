mod app;
pub mod render;

pub use app::{App, InputMode};

use crate::auth;
use crate::calendar::{CalendarEvent, CalendarHandle, ViewFilter};
use crate::config::Config;
use crate::error::{AppResult, FetchError};
use crate::session::SessionStore;
use chrono::Local;
use crossterm::event::{self, Event as TermEvent, KeyCode, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::error;

/// A completed fetch, tagged with the session generation it was issued under
type FetchResult = (u64, Result<Vec<CalendarEvent>, FetchError>);

/// Set up the terminal, run the event loop, and restore the terminal
pub async fn run(config: Config) -> AppResult<()> {
    let calendar = CalendarHandle::new(config.api_base_url.clone());
    let mut app = App::new(SessionStore::new(&config.session_file));
    let (result_tx, mut result_rx) = mpsc::channel::<FetchResult>(4);

    // Startup session restore triggers the initial fetch
    if app.restore_session().is_some() {
        trigger_fetch(&mut app, &calendar, &result_tx);
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(
        &mut terminal,
        &mut app,
        &config,
        &calendar,
        result_tx,
        &mut result_rx,
    )
    .await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    calendar.shutdown().await;

    result
}

async fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    config: &Config,
    calendar: &CalendarHandle,
    result_tx: mpsc::Sender<FetchResult>,
    result_rx: &mut mpsc::Receiver<FetchResult>,
) -> AppResult<()> {
    loop {
        // Completed fetches are applied before drawing
        while let Ok((generation, result)) = result_rx.try_recv() {
            app.apply_fetch_result(generation, result);
        }

        terminal.draw(|f| render::draw(f, app, Local::now()))?;

        if !event::poll(Duration::from_millis(250))? {
            continue;
        }
        let TermEvent::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match app.input_mode {
            InputMode::DateEntry => match key.code {
                KeyCode::Esc => app.cancel_date_entry(),
                KeyCode::Enter => app.commit_date_entry(),
                KeyCode::Backspace => app.pop_date_char(),
                KeyCode::Char(c) => app.push_date_char(c),
                _ => {}
            },
            InputMode::Normal if !app.signed_in() => match key.code {
                KeyCode::Char('q') => return Ok(()),
                KeyCode::Char('s') => {
                    // Show the waiting message before the flow blocks on the
                    // browser callback
                    app.status = Some(String::from("Waiting for browser authorization..."));
                    terminal.draw(|f| render::draw(f, app, Local::now()))?;
                    handle_sign_in(app, config, calendar, &result_tx).await;
                }
                _ => {}
            },
            InputMode::Normal => {
                let visible_len = app.visible_events(Local::now()).len();
                match key.code {
                    KeyCode::Char('q') => return Ok(()),
                    KeyCode::Char('o') => app.sign_out(),
                    KeyCode::Char('a') => app.set_filter(ViewFilter::All),
                    KeyCode::Char('u') => app.set_filter(ViewFilter::Upcoming),
                    KeyCode::Char('p') => app.set_filter(ViewFilter::Past),
                    KeyCode::Char('b') => app.set_filter(ViewFilter::Birthdays),
                    KeyCode::Char('d') => app.start_date_entry(),
                    KeyCode::Char('c') => app.clear_date(),
                    KeyCode::Char('r') => trigger_fetch(app, calendar, &result_tx),
                    KeyCode::Down => app.select_next(visible_len),
                    KeyCode::Up => app.select_previous(visible_len),
                    KeyCode::Enter => app.toggle_detail(visible_len),
                    KeyCode::Esc => app.detail_open = false,
                    _ => {}
                }
            }
        }
    }
}

/// Run the browser authorization flow, then persist the session and fetch
async fn handle_sign_in(
    app: &mut App,
    config: &Config,
    calendar: &CalendarHandle,
    result_tx: &mpsc::Sender<FetchResult>,
) {
    match auth::authorize(config).await {
        Ok((token, ttl_seconds)) => match app.sign_in(&token, ttl_seconds) {
            Ok(_) => trigger_fetch(app, calendar, result_tx),
            Err(e) => {
                error!("Failed to persist session: {:?}", e);
                app.status = Some(String::from("Sign-in failed, press s to retry"));
            }
        },
        Err(e) => {
            // Rejected or cancelled login: no session, stay signed out
            error!("Login failed: {:?}", e);
            app.status = Some(String::from("Sign-in failed, press s to retry"));
        }
    }
}

/// Spawn a single fetch task unless one is already in flight
fn trigger_fetch(app: &mut App, calendar: &CalendarHandle, result_tx: &mpsc::Sender<FetchResult>) {
    let Some((token, generation)) = app.begin_fetch() else {
        return;
    };
    let calendar = calendar.clone();
    let result_tx = result_tx.clone();
    tokio::spawn(async move {
        let result = calendar.fetch_events(&token).await;
        let _ = result_tx.send((generation, result)).await;
    });
}
