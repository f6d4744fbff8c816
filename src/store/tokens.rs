use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Fixed key the token record lives under
pub const TOKEN_KEY: &str = "Auth_Token";

/// Source of "now" in epoch milliseconds
pub trait Clock: Send {
    fn now_ms(&self) -> i64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// Persisted token record. `expires_in` holds the absolute expiry in epoch ms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    #[serde(rename = "expires_in")]
    pub expires_at_ms: i64,
}

impl AuthSession {
    pub fn is_valid_at(&self, now_ms: i64) -> bool {
        now_ms < self.expires_at_ms
    }
}

/// SQLite-backed key-value store holding the access token
pub struct TokenStore {
    conn: Connection,
    clock: Box<dyn Clock>,
}

impl std::fmt::Debug for TokenStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenStore").finish_non_exhaustive()
    }
}

impl TokenStore {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).with_context(|| format!("open db {}", path.display()))?;
        Self::with_connection(conn, Box::new(SystemClock))
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?, Box::new(SystemClock))
    }

    pub fn with_connection(conn: Connection, clock: Box<dyn Clock>) -> Result<Self> {
        let store = Self { conn, clock };
        store.init()?;
        Ok(store)
    }

    /// Persist `token`, valid for `ttl_seconds` from now.
    pub fn save(&self, token: &str, ttl_seconds: i64) -> Result<()> {
        let session = AuthSession {
            access_token: token.to_string(),
            expires_at_ms: self
                .clock
                .now_ms()
                .saturating_add(ttl_seconds.saturating_mul(1000)),
        };
        let value = serde_json::to_string(&session)?;
        self.conn.execute(
            "INSERT INTO kv(key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value=excluded.value",
            params![TOKEN_KEY, value],
        )?;
        debug!(expires_at_ms = session.expires_at_ms, "saved access token");
        Ok(())
    }

    /// The token if it has not expired. Expired or unreadable records are
    /// removed.
    pub fn read(&self) -> Result<Option<String>> {
        Ok(self.session()?.map(|session| session.access_token))
    }

    pub fn session(&self) -> Result<Option<AuthSession>> {
        let raw: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM kv WHERE key = ?1",
                params![TOKEN_KEY],
                |row| row.get(0),
            )
            .optional()?;
        let Some(raw) = raw else {
            return Ok(None);
        };
        let session = match serde_json::from_str::<AuthSession>(&raw) {
            Ok(session) => session,
            Err(err) => {
                warn!("discarding unreadable token record: {err}");
                self.clear()?;
                return Ok(None);
            }
        };
        if !session.is_valid_at(self.clock.now_ms()) {
            debug!("access token expired");
            self.clear()?;
            return Ok(None);
        }
        Ok(Some(session))
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.read(), Ok(Some(_)))
    }

    pub fn clear(&self) -> Result<()> {
        self.conn
            .execute("DELETE FROM kv WHERE key = ?1", params![TOKEN_KEY])?;
        Ok(())
    }

    fn init(&self) -> Result<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )?;
        Ok(())
    }

    #[cfg(test)]
    fn raw_value(&self) -> Option<String> {
        self.conn
            .query_row(
                "SELECT value FROM kv WHERE key = ?1",
                params![TOKEN_KEY],
                |row| row.get(0),
            )
            .optional()
            .ok()
            .flatten()
    }
}
