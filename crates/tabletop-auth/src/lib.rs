//! Authentication for the Tabletop shop.
//!
//! Provides password hashing, user accounts, persisted sessions and the
//! role check that gates admin operations.

mod error;
mod password;
mod service;
mod session;
mod store;
mod user;

pub use error::AuthError;
pub use password::{PasswordHash, PasswordHasher, DEFAULT_MIN_PASSWORD_LENGTH};
pub use service::{AuthConfig, AuthService};
pub use session::{Session, SessionToken, DEFAULT_SESSION_TTL_HOURS};
pub use store::{SessionStore, UserStore};
pub use user::{AuthUser, Role, UserRecord};

/// Default administrator account created on first start.
pub mod seed {
    pub const ADMIN_USERNAME: &str = "admin";
    pub const ADMIN_EMAIL: &str = "admin@example.com";
    pub const ADMIN_PASSWORD: &str = "admin123";
}
