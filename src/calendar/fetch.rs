use super::models::CalendarEvent;
use crate::error::FetchError;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tokio::sync::mpsc;
use tracing::{debug, info};
use url::Url;

/// Success body of the events.list endpoint; only the item list is consumed
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct EventsResponse {
    items: Vec<CalendarEvent>,
}

/// The fetch actor that processes commands
pub struct CalendarFetcher {
    base_url: String,
    client: Client,
    command_rx: mpsc::Receiver<FetchCommand>,
}

/// Commands that can be sent to the fetch actor
pub enum FetchCommand {
    FetchEvents {
        token: String,
        response_tx: mpsc::Sender<Result<Vec<CalendarEvent>, FetchError>>,
    },
    Shutdown,
}

/// Handle for communicating with the fetch actor
#[derive(Clone)]
pub struct FetchActorHandle {
    command_tx: mpsc::Sender<FetchCommand>,
}

impl FetchActorHandle {
    /// Fetch the primary calendar's validated event list
    pub async fn fetch_events(&self, token: &str) -> Result<Vec<CalendarEvent>, FetchError> {
        let (response_tx, mut response_rx) = mpsc::channel(1);
        self.command_tx
            .send(FetchCommand::FetchEvents {
                token: token.to_string(),
                response_tx,
            })
            .await
            .map_err(|e| FetchError::RequestFailed(format!("Fetch actor mailbox error: {}", e)))?;

        response_rx
            .recv()
            .await
            .ok_or_else(|| FetchError::RequestFailed("Response channel closed".to_string()))?
    }

    /// Shutdown the actor
    pub async fn shutdown(&self) {
        let _ = self.command_tx.send(FetchCommand::Shutdown).await;
    }
}

impl CalendarFetcher {
    /// Create a new actor and return its handle
    pub fn new(base_url: String) -> (Self, FetchActorHandle) {
        let (command_tx, command_rx) = mpsc::channel(32);

        let actor = Self {
            base_url,
            client: Client::new(),
            command_rx,
        };

        let handle = FetchActorHandle { command_tx };

        (actor, handle)
    }

    /// Start the actor's processing loop
    pub async fn run(&mut self) {
        info!("Calendar fetch actor started");

        while let Some(cmd) = self.command_rx.recv().await {
            match cmd {
                FetchCommand::FetchEvents { token, response_tx } => {
                    let result = Self::fetch(&self.client, &self.base_url, &token).await;
                    let _ = response_tx.send(result).await;
                }
                FetchCommand::Shutdown => {
                    info!("Calendar fetch actor shutting down");
                    break;
                }
            }
        }

        info!("Calendar fetch actor shut down");
    }

    /// Issue an authenticated read against the primary-calendar event list.
    ///
    /// Only the first response page is consumed. Invalid items are dropped
    /// here so they never reach the filter stage; provider order is kept
    /// (sorting is a display-time concern).
    pub async fn fetch(
        client: &Client,
        base_url: &str,
        token: &str,
    ) -> Result<Vec<CalendarEvent>, FetchError> {
        let mut url = Url::parse(base_url)
            .map_err(|e| FetchError::RequestFailed(format!("Failed to parse URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| FetchError::RequestFailed("Calendar API URL cannot be a base".to_string()))?
            .extend(["calendars", "primary", "events"]);

        let response = client
            .get(url)
            .header("Authorization", format!("Bearer {}", token))
            .send()
            .await
            .map_err(|e| FetchError::RequestFailed(format!("Failed to fetch events: {}", e)))?;

        if response.status() == StatusCode::UNAUTHORIZED {
            return Err(FetchError::Unauthorized);
        }

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(FetchError::RequestFailed(format!(
                "Failed to fetch events: HTTP {} - {}",
                status, error_body
            )));
        }

        let body: EventsResponse = response.json().await.map_err(|e| {
            FetchError::RequestFailed(format!("Failed to parse events response: {}", e))
        })?;

        let total = body.items.len();
        let events: Vec<CalendarEvent> = body
            .items
            .into_iter()
            .filter(CalendarEvent::is_valid)
            .collect();

        if events.len() < total {
            debug!("Dropped {} invalid events from response", total - events.len());
        }

        Ok(events)
    }
}
