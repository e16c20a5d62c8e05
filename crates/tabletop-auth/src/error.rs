//! Authentication errors.

use thiserror::Error;

/// Authentication error type.
#[derive(Error, Debug)]
pub enum AuthError {
    /// No account matches the username or email.
    #[error("user not found: {0}")]
    UserNotFound(String),

    /// Password does not match.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Username already taken.
    #[error("username already taken: {0}")]
    UserAlreadyExists(String),

    /// Email already registered.
    #[error("email already registered: {0}")]
    EmailAlreadyExists(String),

    /// Username missing or malformed.
    #[error("invalid username: {0}")]
    InvalidUsername(String),

    /// Password too weak.
    #[error("password too weak: {0}")]
    WeakPassword(String),

    /// Session not found.
    #[error("session not found")]
    SessionNotFound,

    /// Session expired.
    #[error("session expired")]
    SessionExpired,

    /// Operation needs a logged-in user.
    #[error("not logged in")]
    NotLoggedIn,

    /// Insufficient permissions.
    #[error("insufficient permissions")]
    InsufficientPermissions,

    /// Hashing backend failure.
    #[error("password hashing failed: {0}")]
    Hashing(String),

    /// Session lifetime that cannot be represented as a timestamp.
    #[error("session lifetime out of range: {0} hours")]
    InvalidSessionTtl(i64),

    /// Database error.
    #[error("database error: {0}")]
    Database(#[from] tabletop_db::DbError),

    /// Internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Check if this is an authentication failure.
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            AuthError::UserNotFound(_)
                | AuthError::InvalidCredentials
                | AuthError::SessionNotFound
                | AuthError::SessionExpired
        )
    }

    /// Check if this is a permission error.
    pub fn is_permission_error(&self) -> bool {
        matches!(
            self,
            AuthError::NotLoggedIn | AuthError::InsufficientPermissions
        )
    }
}
