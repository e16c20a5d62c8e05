//! SQL persistence for users and sessions.

use crate::session::{Session, SessionToken};
use crate::user::{Role, UserRecord};
use crate::AuthError;
use chrono::NaiveDateTime;
use tabletop_commerce::ids::UserId;
use tabletop_commerce::store::{format_timestamp, parse_timestamp};
use tabletop_db::{params, Db, Executor, Row};

const USER_COLUMNS: &str =
    "id, username, email, role_id, password_hash, password_salt, created_at";

/// User accounts.
pub struct UserStore<'a> {
    db: &'a Db,
}

impl<'a> UserStore<'a> {
    pub fn new(db: &'a Db) -> Self {
        Self { db }
    }

    /// Find a user whose username or email equals `login`.
    pub fn find_by_username_or_email(&self, login: &str) -> Result<Option<UserRecord>, AuthError> {
        let sql = format!(
            "SELECT {} FROM users WHERE username = ? OR email = ? ORDER BY id LIMIT 1",
            USER_COLUMNS
        );
        let result = self.db.query(&sql, params![login, login])?;
        result.first().map(record_from_row).transpose()
    }

    pub fn find_by_id(&self, id: UserId) -> Result<Option<UserRecord>, AuthError> {
        let sql = format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS);
        let result = self.db.query(&sql, params![id])?;
        result.first().map(record_from_row).transpose()
    }

    pub fn username_exists(&self, username: &str) -> Result<bool, AuthError> {
        Ok(self
            .db
            .query_i64("SELECT 1 FROM users WHERE username = ?", params![username])?
            .is_some())
    }

    pub fn email_exists(&self, email: &str) -> Result<bool, AuthError> {
        Ok(self
            .db
            .query_i64("SELECT 1 FROM users WHERE email = ?", params![email])?
            .is_some())
    }

    /// Insert a user. Returns the new id.
    pub fn create(
        &self,
        username: &str,
        email: Option<&str>,
        hash: &[u8],
        salt: &[u8],
        role: Role,
    ) -> Result<UserId, AuthError> {
        let id = self
            .db
            .insert(
                "INSERT INTO users (username, email, role_id, password_hash, password_salt) \
                 VALUES (?, ?, ?, ?, ?)",
                params![username, email, role.id(), hash, salt],
            )
            .map_err(|e| {
                if e.is_constraint_violation() {
                    AuthError::UserAlreadyExists(username.to_string())
                } else {
                    AuthError::Database(e)
                }
            })?;
        Ok(UserId::new(id))
    }

    pub fn count(&self) -> Result<i64, AuthError> {
        Ok(self
            .db
            .query_i64("SELECT COUNT(*) FROM users", params![])?
            .unwrap_or(0))
    }
}

fn record_from_row(row: &Row) -> Result<UserRecord, AuthError> {
    Ok(UserRecord {
        id: UserId::new(row.get_i64("id")?),
        username: row.get_text("username")?,
        email: row.get_opt_text("email")?,
        role: Role::from_id(row.get_i64("role_id")?),
        password_hash: row.get_blob("password_hash")?,
        password_salt: row.get_blob("password_salt")?,
        created_at: parse_timestamp(&row.get_text("created_at")?)
            .map_err(|e| AuthError::Internal(e.to_string()))?,
    })
}

/// Persisted login sessions.
pub struct SessionStore<'a> {
    db: &'a Db,
}

impl<'a> SessionStore<'a> {
    pub fn new(db: &'a Db) -> Self {
        Self { db }
    }

    pub fn insert(&self, session: &Session) -> Result<(), AuthError> {
        self.db.execute(
            "INSERT INTO sessions (user_id, token, expires_at) VALUES (?, ?, ?)",
            params![
                session.user_id,
                session.token.as_str(),
                format_timestamp(session.expires_at)
            ],
        )?;
        Ok(())
    }

    /// Look up a session by token, expired or not.
    pub fn find(&self, token: &SessionToken) -> Result<Option<Session>, AuthError> {
        let result = self.db.query(
            "SELECT user_id, token, expires_at FROM sessions WHERE token = ?",
            params![token.as_str()],
        )?;
        let Some(row) = result.first() else {
            return Ok(None);
        };
        Ok(Some(Session {
            token: SessionToken::new(row.get_text("token")?),
            user_id: UserId::new(row.get_i64("user_id")?),
            expires_at: parse_timestamp(&row.get_text("expires_at")?)
                .map_err(|e| AuthError::Internal(e.to_string()))?,
        }))
    }

    /// Returns whether a row was deleted.
    pub fn delete(&self, token: &SessionToken) -> Result<bool, AuthError> {
        let deleted = self
            .db
            .execute("DELETE FROM sessions WHERE token = ?", params![token.as_str()])?;
        Ok(deleted > 0)
    }

    /// Drop every session that expired before `now`.
    pub fn purge_expired(&self, now: NaiveDateTime) -> Result<usize, AuthError> {
        let purged = self.db.execute(
            "DELETE FROM sessions WHERE expires_at < ?",
            params![format_timestamp(now)],
        )?;
        if purged > 0 {
            tracing::debug!(purged, "expired sessions removed");
        }
        Ok(purged)
    }
}
