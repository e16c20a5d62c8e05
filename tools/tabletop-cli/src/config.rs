//! CLI configuration.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, ensure, Context, Result};
use serde::{Deserialize, Serialize};
use tabletop_auth::AuthConfig;
use tabletop_commerce::Currency;
use tabletop_shop::{AdminSeed, ShopSettings};

/// File names searched for, in order, in each directory.
pub const CONFIG_NAMES: [&str; 3] = ["tabletop.toml", ".tabletop.toml", "tabletop.json"];

/// Longest accepted `[auth] session_ttl_hours`, ten years.
const MAX_SESSION_TTL_HOURS: i64 = 24 * 365 * 10;

/// CLI configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// Database location and tuning.
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Shop settings.
    #[serde(default)]
    pub store: StoreConfig,

    /// Accounts and sessions.
    #[serde(default)]
    pub auth: AuthSection,

    /// Log output.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl CliConfig {
    /// Load config from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        if path.extension().is_some_and(|e| e == "json") {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display()))
        }
    }

    /// Find the nearest config file from `start` upwards.
    pub fn discover(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
        loop {
            for name in &CONFIG_NAMES {
                let candidate = current.join(name);
                if candidate.is_file() {
                    return Some(candidate);
                }
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Storefront settings. A relative database path is taken relative to
    /// `base`.
    pub fn shop_settings(&self, base: &Path) -> Result<ShopSettings> {
        let currency = Currency::from_code(&self.store.currency)
            .ok_or_else(|| anyhow!("Unknown currency in config: {}", self.store.currency))?;
        ensure!(
            (1..=MAX_SESSION_TTL_HOURS).contains(&self.auth.session_ttl_hours),
            "session_ttl_hours must be between 1 and {}, got {}",
            MAX_SESSION_TTL_HOURS,
            self.auth.session_ttl_hours
        );

        let settings = if self.database.path == ":memory:" {
            ShopSettings::in_memory()
        } else {
            ShopSettings::new(base.join(&self.database.path))
        };

        let seed = self.auth.seed_admin.then(|| AdminSeed {
            username: self.auth.admin_username.clone(),
            email: self.auth.admin_email.clone(),
            password: self.auth.admin_password.clone(),
        });

        Ok(settings
            .with_currency(currency)
            .with_busy_timeout_ms(self.database.busy_timeout_ms)
            .with_auth(AuthConfig {
                min_password_length: self.auth.min_password_length,
                session_ttl_hours: self.auth.session_ttl_hours,
            })
            .with_admin_seed(seed))
    }
}

/// Database configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite file, or `:memory:`.
    #[serde(default = "default_db_path")]
    pub path: String,

    #[serde(default = "default_busy_timeout")]
    pub busy_timeout_ms: u64,
}

fn default_db_path() -> String {
    "tabletop.db".to_string()
}

fn default_busy_timeout() -> u64 {
    5000
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            busy_timeout_ms: default_busy_timeout(),
        }
    }
}

/// Shop configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// ISO code: CZK, EUR or USD.
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_currency() -> String {
    Currency::default().code().to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            currency: default_currency(),
        }
    }
}

/// Account configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSection {
    #[serde(default = "default_min_password_length")]
    pub min_password_length: usize,

    #[serde(default = "default_session_ttl")]
    pub session_ttl_hours: i64,

    /// Create the admin account on start when missing.
    #[serde(default = "default_true")]
    pub seed_admin: bool,

    #[serde(default = "default_admin_username")]
    pub admin_username: String,

    #[serde(default = "default_admin_email")]
    pub admin_email: String,

    #[serde(default = "default_admin_password")]
    pub admin_password: String,
}

fn default_min_password_length() -> usize {
    tabletop_auth::DEFAULT_MIN_PASSWORD_LENGTH
}

fn default_session_ttl() -> i64 {
    tabletop_auth::DEFAULT_SESSION_TTL_HOURS
}

fn default_true() -> bool {
    true
}

fn default_admin_username() -> String {
    tabletop_auth::seed::ADMIN_USERNAME.to_string()
}

fn default_admin_email() -> String {
    tabletop_auth::seed::ADMIN_EMAIL.to_string()
}

fn default_admin_password() -> String {
    tabletop_auth::seed::ADMIN_PASSWORD.to_string()
}

impl Default for AuthSection {
    fn default() -> Self {
        Self {
            min_password_length: default_min_password_length(),
            session_ttl_hours: default_session_ttl(),
            seed_admin: true,
            admin_username: default_admin_username(),
            admin_email: default_admin_email(),
            admin_password: default_admin_password(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter used when `RUST_LOG` is unset.
    #[serde(default = "default_level")]
    pub level: String,
}

fn default_level() -> String {
    "warn".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

/// Generate a default tabletop.toml config file.
pub fn generate_default_config() -> String {
    r#"# Tabletop shop configuration

[database]
# Relative paths are resolved against this file's directory.
path = "tabletop.db"
busy_timeout_ms = 5000

[store]
currency = "CZK"

[auth]
min_password_length = 6
session_ttl_hours = 72
seed_admin = true
admin_username = "admin"
admin_email = "admin@example.com"
admin_password = "admin123"

[logging]
level = "warn"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabletop_shop::DatabaseLocation;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_from_empty_file() {
        let config: CliConfig = toml::from_str("").unwrap();
        assert_eq!(config.database.path, "tabletop.db");
        assert_eq!(config.store.currency, "CZK");
        assert!(config.auth.seed_admin);
        assert_eq!(config.auth.min_password_length, 6);
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_generated_config_parses() {
        let config: CliConfig = toml::from_str(&generate_default_config()).unwrap();
        assert_eq!(config.auth.session_ttl_hours, 72);
        assert_eq!(config.auth.admin_username, "admin");
    }

    #[test]
    fn test_partial_section() {
        let config: CliConfig = toml::from_str(
            r#"
            [store]
            currency = "EUR"

            [auth]
            seed_admin = false
            "#,
        )
        .unwrap();
        assert_eq!(config.store.currency, "EUR");
        assert!(!config.auth.seed_admin);
        assert_eq!(config.auth.admin_email, "admin@example.com");
        assert_eq!(config.database.busy_timeout_ms, 5000);
    }

    #[test]
    fn test_discover_walks_up() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        assert_eq!(CliConfig::discover(&nested), None);

        let path = dir.path().join(".tabletop.toml");
        std::fs::write(&path, generate_default_config()).unwrap();
        assert_eq!(CliConfig::discover(&nested), Some(path));
    }

    #[test]
    fn test_load_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tabletop.json");
        let mut config = CliConfig::default();
        config.store.currency = "USD".to_string();
        std::fs::write(&path, serde_json::to_string_pretty(&config).unwrap()).unwrap();

        let loaded = CliConfig::load(&path).unwrap();
        assert_eq!(loaded.store.currency, "USD");
    }

    #[test]
    fn test_shop_settings() {
        let mut config = CliConfig::default();
        config.auth.seed_admin = false;
        config.auth.min_password_length = 8;
        let settings = config.shop_settings(Path::new("/srv/shop")).unwrap();
        assert_eq!(
            settings.database,
            DatabaseLocation::File(PathBuf::from("/srv/shop/tabletop.db"))
        );
        assert!(settings.admin_seed.is_none());
        assert_eq!(settings.auth.min_password_length, 8);

        config.database.path = ":memory:".to_string();
        config.store.currency = "XYZ".to_string();
        assert!(config.shop_settings(Path::new(".")).is_err());
        config.store.currency = "eur".to_string();
        let settings = config.shop_settings(Path::new(".")).unwrap();
        assert_eq!(settings.database, DatabaseLocation::InMemory);
    }

    #[test]
    fn test_session_ttl_bounds() {
        let mut config = CliConfig::default();
        config.auth.session_ttl_hours = i64::MAX;
        let err = config.shop_settings(Path::new(".")).unwrap_err();
        assert!(err.to_string().contains("session_ttl_hours"));

        config.auth.session_ttl_hours = 0;
        assert!(config.shop_settings(Path::new(".")).is_err());

        config.auth.session_ttl_hours = 24;
        assert_eq!(
            config.shop_settings(Path::new(".")).unwrap().auth.session_ttl_hours,
            24
        );
    }
}
