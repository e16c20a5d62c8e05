//! Storefront settings.

use std::path::PathBuf;
use tabletop_auth::{seed, AuthConfig};
use tabletop_commerce::Currency;
use tabletop_db::DbOptions;

/// Where the shop database lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseLocation {
    File(PathBuf),
    /// Private to one connection, gone on drop.
    InMemory,
}

/// Administrator account created when none exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminSeed {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl Default for AdminSeed {
    fn default() -> Self {
        Self {
            username: seed::ADMIN_USERNAME.to_string(),
            email: seed::ADMIN_EMAIL.to_string(),
            password: seed::ADMIN_PASSWORD.to_string(),
        }
    }
}

/// Configuration for a [`crate::Storefront`].
#[derive(Debug, Clone)]
pub struct ShopSettings {
    pub database: DatabaseLocation,
    pub db_options: DbOptions,
    pub currency: Currency,
    pub auth: AuthConfig,
    /// `None` skips seeding.
    pub admin_seed: Option<AdminSeed>,
}

impl ShopSettings {
    /// Settings for a database file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            database: DatabaseLocation::File(path.into()),
            ..Self::in_memory()
        }
    }

    /// Settings for a throwaway in-memory database.
    pub fn in_memory() -> Self {
        Self {
            database: DatabaseLocation::InMemory,
            db_options: DbOptions::default(),
            currency: Currency::default(),
            auth: AuthConfig::default(),
            admin_seed: Some(AdminSeed::default()),
        }
    }

    /// Set the shop currency.
    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }

    /// Set the auth tuning.
    pub fn with_auth(mut self, auth: AuthConfig) -> Self {
        self.auth = auth;
        self
    }

    /// Set or clear the admin seed.
    pub fn with_admin_seed(mut self, seed: Option<AdminSeed>) -> Self {
        self.admin_seed = seed;
        self
    }

    /// Set how long writers wait on a locked database.
    pub fn with_busy_timeout_ms(mut self, ms: u64) -> Self {
        self.db_options.busy_timeout_ms = ms;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = ShopSettings::new("shop.db");
        assert_eq!(settings.database, DatabaseLocation::File(PathBuf::from("shop.db")));
        assert_eq!(settings.currency, Currency::CZK);
        assert_eq!(settings.admin_seed, Some(AdminSeed::default()));
        assert_eq!(settings.auth.min_password_length, 6);
        assert_eq!(settings.auth.session_ttl_hours, 72);
    }

    #[test]
    fn test_builder() {
        let settings = ShopSettings::in_memory()
            .with_currency(Currency::EUR)
            .with_admin_seed(None)
            .with_busy_timeout_ms(250);
        assert_eq!(settings.database, DatabaseLocation::InMemory);
        assert_eq!(settings.currency, Currency::EUR);
        assert!(settings.admin_seed.is_none());
        assert_eq!(settings.db_options.busy_timeout_ms, 250);
    }
}
