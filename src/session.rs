use crate::error::AppResult;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Default token lifetime when the provider does not supply one
pub const DEFAULT_TTL_SECONDS: i64 = 3600;

/// An authenticated user context: bearer token plus absolute expiry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
}

/// On-disk shape: two key-value entries, with the expiry stored as an
/// epoch-millisecond string.
#[derive(Debug, Serialize, Deserialize)]
struct StoredSession {
    access_token: String,
    expires_at: String,
}

/// File-backed store for the single session.
///
/// All operations touch only the local file; no network calls. At most
/// one session exists at a time, so `save` always overwrites.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Persist a token with `expires_at = now + ttl_seconds`,
    /// overwriting any prior session
    pub fn save(&self, token: &str, ttl_seconds: i64) -> AppResult<Session> {
        self.save_at(token, ttl_seconds, Utc::now())
    }

    /// Clock-explicit variant of [`save`](Self::save)
    pub fn save_at(
        &self,
        token: &str,
        ttl_seconds: i64,
        now: DateTime<Utc>,
    ) -> AppResult<Session> {
        let expires_at = now + Duration::seconds(ttl_seconds);
        // The persisted value is epoch milliseconds; truncate the returned
        // session to the same precision so save and load agree
        let expires_at = Utc
            .timestamp_millis_opt(expires_at.timestamp_millis())
            .single()
            .unwrap_or(expires_at);

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let stored = StoredSession {
            access_token: token.to_string(),
            expires_at: expires_at.timestamp_millis().to_string(),
        };
        fs::write(&self.path, toml::to_string(&stored)?)?;
        debug!("Session saved, expires at {}", expires_at);

        Ok(Session {
            access_token: token.to_string(),
            expires_at,
        })
    }

    /// Return the persisted session if one exists and has not expired.
    /// A stale or unreadable entry is removed as a side effect.
    pub fn load(&self) -> Option<Session> {
        self.load_at(Utc::now())
    }

    /// Clock-explicit variant of [`load`](Self::load)
    pub fn load_at(&self, now: DateTime<Utc>) -> Option<Session> {
        let content = fs::read_to_string(&self.path).ok()?;

        let stored: StoredSession = match toml::from_str(&content) {
            Ok(stored) => stored,
            Err(e) => {
                warn!("Discarding unreadable session file: {}", e);
                let _ = self.clear();
                return None;
            }
        };

        let expires_at = stored
            .expires_at
            .parse::<i64>()
            .ok()
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single());

        match expires_at {
            Some(expires_at) if now < expires_at => Some(Session {
                access_token: stored.access_token,
                expires_at,
            }),
            _ => {
                debug!("Persisted session is expired, clearing it");
                let _ = self.clear();
                None
            }
        }
    }

    /// Remove the persisted session unconditionally
    pub fn clear(&self) -> AppResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
