//! CLI command implementations.

pub mod admin;
pub mod auth;
pub mod config;
pub mod games;
pub mod orders;
pub mod shop;

use clap::{Args, Subcommand};
use tabletop_commerce::search::{CatalogQuery, PlayTimeBucket};

/// Catalog filter flags.
#[derive(Args, Debug, Default)]
pub struct FilterArgs {
    /// Text contained in the game name.
    #[arg(short, long)]
    pub search: Option<String>,

    /// Genre the game must have (repeatable, all must match).
    #[arg(short, long = "genre")]
    pub genres: Vec<String>,

    /// Lowest price in whole currency units.
    #[arg(long)]
    pub min_price: Option<i64>,

    /// Highest price in whole currency units.
    #[arg(long)]
    pub max_price: Option<i64>,

    /// Number of players the game must support.
    #[arg(short, long)]
    pub players: Option<i64>,

    /// Play time bucket: 30, 60, 120 or more (repeatable, any may match).
    #[arg(short = 't', long = "time")]
    pub times: Vec<PlayTimeBucket>,

    /// Age step: 0, 4, 10, 14, 16 or 18.
    #[arg(short, long)]
    pub age: Option<i64>,
}

impl FilterArgs {
    /// Build the catalog query these flags describe.
    pub fn to_query(&self) -> anyhow::Result<CatalogQuery> {
        let defaults = CatalogQuery::new();
        let mut query = CatalogQuery::new()
            .with_search(self.search.clone().unwrap_or_default())
            .with_genres(self.genres.iter().cloned())?
            .with_price(
                self.min_price.unwrap_or(defaults.price.min),
                self.max_price.unwrap_or(defaults.price.max),
            )
            .with_players(self.players.unwrap_or(0))
            .with_age(self.age);
        for bucket in &self.times {
            query = query.with_play_time(*bucket);
        }
        Ok(query)
    }
}

/// Arguments for the games command.
#[derive(Args)]
pub struct GamesArgs {
    #[command(flatten)]
    pub filter: FilterArgs,

    /// Show only the first N games.
    #[arg(short, long)]
    pub limit: Option<usize>,
}

/// Arguments for the game command.
#[derive(Args)]
pub struct GameArgs {
    /// Game ID.
    pub id: i64,
}

/// Arguments for the login command.
#[derive(Args)]
pub struct LoginArgs {
    /// Username or email.
    pub login: String,

    /// Password (prompted when omitted).
    #[arg(long)]
    pub password: Option<String>,
}

/// Arguments for the register command.
#[derive(Args)]
pub struct RegisterArgs {
    /// Username.
    pub username: String,

    /// Email address.
    #[arg(short, long)]
    pub email: Option<String>,

    /// Password (prompted when omitted).
    #[arg(long)]
    pub password: Option<String>,
}

/// Arguments for the admin command.
#[derive(Args)]
pub struct AdminArgs {
    #[command(subcommand)]
    pub command: AdminCommand,
}

#[derive(Subcommand)]
pub enum AdminCommand {
    /// Add a game to the catalog.
    AddGame(AddGameArgs),
    /// List list prices, optionally editing them.
    Prices {
        /// Only rows whose name or author contains this text.
        #[arg(short, long)]
        search: Option<String>,

        /// Edit prices interactively.
        #[arg(long)]
        edit: bool,
    },
    /// Set the list price of one game.
    SetPrice {
        /// Game ID.
        id: i64,
        /// New price, e.g. 499 or 499.90.
        price: String,
    },
    /// Put a game on sale.
    Discount {
        /// Game ID.
        id: i64,
        /// Percentage off, 0 to 90.
        percent: f64,
        /// Days the sale lasts.
        #[arg(short, long, default_value = "7")]
        days: i64,
    },
}

/// Arguments for the add-game command. Missing fields are prompted for.
#[derive(Args, Default)]
pub struct AddGameArgs {
    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub author: Option<String>,

    /// Author's country.
    #[arg(long)]
    pub country: Option<String>,

    #[arg(long)]
    pub min_players: Option<i64>,

    #[arg(long)]
    pub max_players: Option<i64>,

    /// Play time in minutes.
    #[arg(long)]
    pub time: Option<i64>,

    #[arg(long)]
    pub age: Option<i64>,

    /// Price, e.g. 499 or 499.90.
    #[arg(long)]
    pub price: Option<String>,

    /// Genre (repeatable, up to 5, the first is primary).
    #[arg(short, long = "genre")]
    pub genres: Vec<String>,

    /// Image path.
    #[arg(long)]
    pub image: Option<String>,

    /// Fail instead of prompting for missing fields.
    #[arg(short = 'y', long)]
    pub yes: bool,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Initialize a new config file.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_is_default_query() {
        let query = FilterArgs::default().to_query().unwrap();
        assert!(query.is_default());
    }

    #[test]
    fn test_filter_flags() {
        let args = FilterArgs {
            search: Some("catan".to_string()),
            genres: vec!["Strategy".to_string()],
            max_price: Some(1000),
            players: Some(4),
            times: vec![PlayTimeBucket::UpTo60, PlayTimeBucket::Over120],
            ..FilterArgs::default()
        };
        let query = args.to_query().unwrap();
        assert_eq!(query.search, "catan");
        assert_eq!(query.genres, vec!["Strategy"]);
        assert_eq!(query.price.min, 0);
        assert_eq!(query.price.max, 1000);
        assert_eq!(query.players, 4);
        assert_eq!(query.play_times.len(), 2);
        assert_eq!(query.age, None);
    }

    #[test]
    fn test_too_many_genres() {
        let args = FilterArgs {
            genres: (0..6).map(|i| format!("g{}", i)).collect(),
            ..FilterArgs::default()
        };
        assert!(args.to_query().is_err());
    }
}
