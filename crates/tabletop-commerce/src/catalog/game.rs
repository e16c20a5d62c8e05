//! Game type.

use crate::ids::{AuthorId, GameId, GenreId};
use crate::money::Money;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A board game listed in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Game {
    /// Unique game identifier.
    pub id: GameId,
    /// Display name.
    pub name: String,
    /// Author, if known.
    pub author_id: Option<AuthorId>,
    /// Author name (denormalized for display).
    pub author_name: Option<String>,
    /// Primary genre, used for the single-genre column.
    pub primary_genre_id: Option<GenreId>,
    /// Every genre the game is linked to.
    pub genre_ids: BTreeSet<GenreId>,
    /// Names of `genre_ids`, sorted.
    pub genre_names: Vec<String>,
    /// List price.
    pub price: Money,
    /// Discounted price while a sale is running.
    pub sale_price: Option<Money>,
    pub min_players: i64,
    pub max_players: i64,
    /// Minimum recommended age in years.
    pub min_age: i64,
    /// Typical play time in minutes.
    pub play_time_min: i64,
    /// Units in stock. Displayed only.
    pub stock: i64,
    pub is_active: bool,
    pub image_path: Option<String>,
}

impl Game {
    /// Create an active game with default ranges and no genres.
    pub fn new(id: impl Into<GameId>, name: impl Into<String>, price: Money) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            author_id: None,
            author_name: None,
            primary_genre_id: None,
            genre_ids: BTreeSet::new(),
            genre_names: Vec::new(),
            price,
            sale_price: None,
            min_players: 1,
            max_players: 1,
            min_age: 0,
            play_time_min: 0,
            stock: 0,
            is_active: true,
            image_path: None,
        }
    }

    /// Price the customer pays right now.
    pub fn effective_price(&self) -> Money {
        self.sale_price.unwrap_or(self.price)
    }

    /// Whether a sale price lower than the list price applies.
    pub fn is_on_sale(&self) -> bool {
        self.sale_price
            .map(|s| s.amount_cents < self.price.amount_cents)
            .unwrap_or(false)
    }

    /// Whether the game carries every genre in `required`.
    pub fn has_all_genres<'a>(&self, required: impl IntoIterator<Item = &'a GenreId>) -> bool {
        required.into_iter().all(|id| self.genre_ids.contains(id))
    }

    /// "2-4" style player range.
    pub fn players_label(&self) -> String {
        if self.min_players == self.max_players {
            self.min_players.to_string()
        } else {
            format!("{}-{}", self.min_players, self.max_players)
        }
    }

    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }
}
