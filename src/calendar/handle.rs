use super::fetch::{CalendarFetcher, FetchActorHandle};
use super::models::CalendarEvent;
use crate::error::FetchError;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Handle for interacting with the calendar fetch actor
#[derive(Clone)]
pub struct CalendarHandle {
    actor_handle: FetchActorHandle,
    _actor_task: Arc<JoinHandle<()>>,
}

impl CalendarHandle {
    /// Create a new CalendarHandle and spawn the fetch actor
    pub fn new(base_url: String) -> Self {
        // Create the actor and get its handle
        let (mut actor, handle) = CalendarFetcher::new(base_url);

        // Spawn a task to run the actor
        let actor_task = tokio::spawn(async move {
            actor.run().await;
        });

        Self {
            actor_handle: handle,
            _actor_task: Arc::new(actor_task),
        }
    }

    /// Fetch the primary calendar's validated event list
    pub async fn fetch_events(&self, token: &str) -> Result<Vec<CalendarEvent>, FetchError> {
        self.actor_handle.fetch_events(token).await
    }

    /// Shutdown the actor
    pub async fn shutdown(&self) {
        self.actor_handle.shutdown().await;
    }
}
