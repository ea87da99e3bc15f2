use crate::error::{env_error, AppResult};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;

/// Default base URL for the Google Calendar v3 API
pub const DEFAULT_API_BASE_URL: &str = "https://www.googleapis.com/calendar/v3";

/// Default location of the persisted session file
pub const DEFAULT_SESSION_FILE: &str = "config/session.toml";

/// Default local port for the OAuth loopback redirect
pub const DEFAULT_REDIRECT_PORT: u16 = 8080;

/// Main configuration structure for the viewer
#[derive(Debug, Clone)]
pub struct Config {
    /// Google OAuth client ID
    pub google_client_id: String,
    /// Google OAuth client secret
    pub google_client_secret: String,
    /// Base URL of the Calendar API (overridable for testing)
    pub api_base_url: String,
    /// Path of the persisted session file
    pub session_file: PathBuf,
    /// Local port the OAuth redirect lands on
    pub redirect_port: u16,
}

impl Config {
    /// Load configuration from environment variables and an optional .env file
    pub fn load() -> AppResult<Self> {
        // Load .env file if it exists
        dotenv().ok();

        // Required environment variables
        let google_client_id =
            env::var("GOOGLE_CLIENT_ID").map_err(|_| env_error("GOOGLE_CLIENT_ID"))?;
        let google_client_secret =
            env::var("GOOGLE_CLIENT_SECRET").map_err(|_| env_error("GOOGLE_CLIENT_SECRET"))?;

        let api_base_url = env::var("GOOGLE_CALENDAR_API_URL")
            .unwrap_or_else(|_| String::from(DEFAULT_API_BASE_URL));

        let session_file = env::var("SESSION_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_SESSION_FILE));

        let redirect_port = env::var("OAUTH_REDIRECT_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(DEFAULT_REDIRECT_PORT);

        Ok(Config {
            google_client_id,
            google_client_secret,
            api_base_url,
            session_file,
            redirect_port,
        })
    }
}
