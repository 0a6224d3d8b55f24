use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Session file name in cache directory
const SESSION_FILE: &str = "session.json";

/// Raw login response. Persisted verbatim as the durable session record, so
/// the cache file always mirrors what the server last sent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginPayload {
    pub ident: Option<String>,
    #[serde(rename = "firstName")]
    pub first_name: Option<String>,
    #[serde(rename = "lastName")]
    pub last_name: Option<String>,
    pub token: Option<String>,
    pub release: Option<String>,
    /// ISO 8601 with offset, e.g. "2024-06-03T17:24:15+02:00".
    pub expire: Option<String>,
}

impl LoginPayload {
    /// Parse the expiry timestamp, if present and well-formed.
    pub fn expire_at(&self) -> Option<DateTime<Utc>> {
        let raw = self.expire.as_deref()?;
        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

/// In-memory authenticated session, distinct from the durable cache.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub expire: DateTime<Utc>,
}

impl Session {
    /// Build a session from a login payload. Returns `None` when the payload
    /// carries no token or no parseable expiry.
    pub fn from_payload(payload: &LoginPayload) -> Option<Self> {
        let token = payload.token.clone().filter(|t| !t.is_empty())?;
        let expire = payload.expire_at()?;
        Some(Session { token, expire })
    }

    /// Authorized means: token present and expiry strictly in the future.
    pub fn authorized(&self) -> bool {
        !self.token.is_empty() && self.expire > Utc::now()
    }
}

/// Durable session cache: one JSON file under the client's cache directory.
pub struct SessionCache {
    cache_dir: PathBuf,
}

impl SessionCache {
    pub fn new(cache_dir: PathBuf) -> Self {
        Self { cache_dir }
    }

    /// Load the cached record if present and still valid. Read and parse
    /// failures are treated as "no cache"; an expired record is ignored but
    /// left on disk.
    pub fn load(&self) -> Option<LoginPayload> {
        match self.try_load() {
            Ok(payload) => payload,
            Err(e) => {
                debug!(error = %e, "ignoring unreadable session cache");
                None
            }
        }
    }

    fn try_load(&self) -> Result<Option<LoginPayload>> {
        let path = self.session_path();
        if !path.exists() {
            return Ok(None);
        }
        let contents =
            std::fs::read_to_string(&path).context("Failed to read session file")?;
        let payload: LoginPayload =
            serde_json::from_str(&contents).context("Failed to parse session file")?;

        match payload.expire_at() {
            Some(expire) if expire > Utc::now() => Ok(Some(payload)),
            _ => Ok(None),
        }
    }

    /// Overwrite the cache with a fresh login response.
    pub fn store(&self, payload: &LoginPayload) -> Result<()> {
        let path = self.session_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(payload)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn session_path(&self) -> PathBuf {
        self.cache_dir.join(SESSION_FILE)
    }
}
