//! Storefront errors.

use thiserror::Error;

/// Errors surfaced by [`crate::Storefront`].
#[derive(Error, Debug)]
pub enum ShopError {
    /// Database error.
    #[error(transparent)]
    Database(#[from] tabletop_db::DbError),

    /// Catalog, cart or order error.
    #[error(transparent)]
    Commerce(#[from] tabletop_commerce::CommerceError),

    /// Login, registration or permission error.
    #[error(transparent)]
    Auth(#[from] tabletop_auth::AuthError),

    /// The background catalog load did not finish.
    #[error("background load failed: {0}")]
    Background(String),
}

impl ShopError {
    /// Whether the user has to log in (or log in as admin) first.
    pub fn is_permission_error(&self) -> bool {
        matches!(self, ShopError::Auth(e) if e.is_permission_error())
    }
}
