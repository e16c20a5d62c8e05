//! Login, registration and the current-user state.

use crate::password::{PasswordHasher, DEFAULT_MIN_PASSWORD_LENGTH};
use crate::session::{Session, SessionToken, DEFAULT_SESSION_TTL_HOURS};
use crate::store::{SessionStore, UserStore};
use crate::user::{AuthUser, Role};
use crate::AuthError;
use chrono::Utc;
use tabletop_db::Db;

/// Auth tuning.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub min_password_length: usize,
    pub session_ttl_hours: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            min_password_length: DEFAULT_MIN_PASSWORD_LENGTH,
            session_ttl_hours: DEFAULT_SESSION_TTL_HOURS,
        }
    }
}

/// Holds who is logged in. Every call that touches storage takes the
/// database explicitly.
#[derive(Debug, Default)]
pub struct AuthService {
    config: AuthConfig,
    hasher: PasswordHasher,
    current: Option<AuthUser>,
    session: Option<SessionToken>,
}

impl AuthService {
    pub fn new(config: AuthConfig) -> Self {
        Self {
            config,
            hasher: PasswordHasher::default(),
            current: None,
            session: None,
        }
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    pub fn current_user(&self) -> Option<&AuthUser> {
        self.current.as_ref()
    }

    /// Token of the active session, if logged in.
    pub fn session_token(&self) -> Option<&SessionToken> {
        self.session.as_ref()
    }

    pub fn is_logged_in(&self) -> bool {
        self.current.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.current.as_ref().map(AuthUser::is_admin).unwrap_or(false)
    }

    /// Log in by username or email.
    pub fn login(&mut self, db: &Db, login: &str, password: &str) -> Result<AuthUser, AuthError> {
        let login = login.trim();
        let users = UserStore::new(db);
        let Some(record) = users.find_by_username_or_email(login)? else {
            tracing::warn!(login, "login failed: unknown user");
            return Err(AuthError::UserNotFound(login.to_string()));
        };

        if !self
            .hasher
            .verify(password, &record.password_hash, &record.password_salt)?
        {
            tracing::warn!(login, "login failed: wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        let sessions = SessionStore::new(db);
        sessions.purge_expired(Utc::now().naive_utc())?;
        let session = Session::start(record.id, self.config.session_ttl_hours)?;
        sessions.insert(&session)?;

        let user = AuthUser::from(&record);
        tracing::info!(user_id = %user.id, username = %user.username, "logged in");
        self.current = Some(user.clone());
        self.session = Some(session.token);
        Ok(user)
    }

    /// Create an account and log into it.
    pub fn register(
        &mut self,
        db: &Db,
        username: &str,
        email: Option<&str>,
        password: &str,
        role: Role,
    ) -> Result<AuthUser, AuthError> {
        let user = self.create_account(db, username, email, password, role)?;

        let session = Session::start(user.id, self.config.session_ttl_hours)?;
        SessionStore::new(db).insert(&session)?;

        self.current = Some(user.clone());
        self.session = Some(session.token);
        Ok(user)
    }

    fn create_account(
        &self,
        db: &Db,
        username: &str,
        email: Option<&str>,
        password: &str,
        role: Role,
    ) -> Result<AuthUser, AuthError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(AuthError::InvalidUsername("username is required".to_string()));
        }
        PasswordHasher::validate_password(password, self.config.min_password_length)?;

        let email = email.map(str::trim).filter(|e| !e.is_empty());
        let users = UserStore::new(db);
        if users.username_exists(username)? {
            return Err(AuthError::UserAlreadyExists(username.to_string()));
        }
        if let Some(email) = email {
            if users.email_exists(email)? {
                return Err(AuthError::EmailAlreadyExists(email.to_string()));
            }
        }

        let stored = self.hasher.hash(password)?;
        let id = users.create(username, email, &stored.hash, &stored.salt, role)?;
        tracing::info!(user_id = %id, username, role = %role, "account created");

        Ok(AuthUser {
            id,
            username: username.to_string(),
            email: email.map(str::to_string),
            role,
        })
    }

    /// Forget the current user and delete the session row.
    pub fn logout(&mut self, db: &Db) -> Result<(), AuthError> {
        if let Some(token) = self.session.take() {
            SessionStore::new(db).delete(&token)?;
        }
        if let Some(user) = self.current.take() {
            tracing::info!(user_id = %user.id, "logged out");
        }
        Ok(())
    }

    /// Restore the user of an unexpired session.
    pub fn resume(&mut self, db: &Db, token: &SessionToken) -> Result<AuthUser, AuthError> {
        let sessions = SessionStore::new(db);
        let session = sessions.find(token)?.ok_or(AuthError::SessionNotFound)?;
        if session.is_expired() {
            sessions.delete(token)?;
            return Err(AuthError::SessionExpired);
        }

        let record = UserStore::new(db)
            .find_by_id(session.user_id)?
            .ok_or(AuthError::SessionNotFound)?;
        let user = AuthUser::from(&record);
        tracing::debug!(user_id = %user.id, "session resumed");
        self.current = Some(user.clone());
        self.session = Some(session.token);
        Ok(user)
    }

    /// The current user, if logged in.
    pub fn require_user(&self) -> Result<&AuthUser, AuthError> {
        self.current.as_ref().ok_or(AuthError::NotLoggedIn)
    }

    /// The current user, if logged in as an administrator.
    pub fn require_admin(&self) -> Result<&AuthUser, AuthError> {
        let user = self.require_user()?;
        if !user.is_admin() {
            tracing::warn!(user_id = %user.id, "admin operation refused");
            return Err(AuthError::InsufficientPermissions);
        }
        Ok(user)
    }

    /// Create the administrator account unless a user with that name or
    /// email already exists. Returns whether an account was created.
    ///
    /// Does not log anyone in.
    pub fn ensure_admin_seed(
        &self,
        db: &Db,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<bool, AuthError> {
        let users = UserStore::new(db);
        if users.find_by_username_or_email(username)?.is_some()
            || users.find_by_username_or_email(email)?.is_some()
        {
            return Ok(false);
        }
        self.create_account(db, username, Some(email), password, Role::Admin)?;
        Ok(true)
    }
}
