//! Session management.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{Duration, NaiveDateTime, Utc};
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use tabletop_commerce::ids::UserId;

use crate::AuthError;

/// Default session lifetime in hours.
pub const DEFAULT_SESSION_TTL_HOURS: i64 = 72;

/// Opaque session token handed to the client.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    /// Wrap an existing token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Generate 32 random bytes, URL-safe base64 encoded.
    pub fn generate() -> Self {
        let mut bytes = [0u8; 32];
        OsRng.fill_bytes(&mut bytes);
        Self(URL_SAFE_NO_PAD.encode(bytes))
    }

    /// Get the token as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A persisted login.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub token: SessionToken,
    pub user_id: UserId,
    /// UTC expiry.
    pub expires_at: NaiveDateTime,
}

impl Session {
    /// Start a session for `user_id` lasting `ttl_hours` (at least one).
    pub fn start(user_id: UserId, ttl_hours: i64) -> Result<Self, AuthError> {
        let expires_at = Duration::try_hours(ttl_hours.max(1))
            .and_then(|ttl| Utc::now().naive_utc().checked_add_signed(ttl))
            .ok_or(AuthError::InvalidSessionTtl(ttl_hours))?;
        Ok(Self {
            token: SessionToken::generate(),
            user_id,
            expires_at,
        })
    }

    /// Check if session is expired at `now`.
    pub fn is_expired_at(&self, now: NaiveDateTime) -> bool {
        now > self.expires_at
    }

    /// Check if session is expired.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now().naive_utc())
    }

    /// Validate the session, returning error if expired.
    pub fn validate(&self) -> Result<(), AuthError> {
        if self.is_expired() {
            Err(AuthError::SessionExpired)
        } else {
            Ok(())
        }
    }
}
