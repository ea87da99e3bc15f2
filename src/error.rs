use miette::{Diagnostic, Result};
use thiserror::Error;

/// Main error type for the application
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("Environment error: {0}")]
    #[diagnostic(code(almanakka::environment))]
    Environment(String),

    #[error("Configuration error: {0}")]
    #[diagnostic(code(almanakka::config))]
    Config(String),

    #[error("Authorization error: {0}")]
    #[diagnostic(code(almanakka::auth))]
    Auth(String),

    #[error("Calendar fetch error: {0}")]
    #[diagnostic(code(almanakka::fetch))]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    #[diagnostic(code(almanakka::io))]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    #[diagnostic(code(almanakka::serialization))]
    Serialization(String),

    #[error("Other error: {0}")]
    #[diagnostic(code(almanakka::other))]
    Other(String),
}

/// Failure modes of the event fetch path.
///
/// `Unauthorized` is the only variant that forces a logout: the caller
/// must clear the session store and drop any cached events. Everything
/// else leaves the session untouched.
#[derive(Debug, Error, Diagnostic)]
pub enum FetchError {
    #[error("Calendar API rejected the access token (HTTP 401)")]
    #[diagnostic(code(almanakka::fetch_unauthorized))]
    Unauthorized,

    #[error("Calendar request failed: {0}")]
    #[diagnostic(code(almanakka::fetch_failed))]
    RequestFailed(String),
}

// Implement From for TOML serialization errors
impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

// Implement From for TOML deserialization errors
impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

/// Type alias for Result with our Error type
pub type AppResult<T> = Result<T, Error>;

/// Helper to create environment errors
pub fn env_error(var: &str) -> Error {
    Error::Environment(format!("Missing environment variable: {}", var))
}

/// Helper to create authorization errors
pub fn auth_error(message: &str) -> Error {
    Error::Auth(message.to_string())
}
