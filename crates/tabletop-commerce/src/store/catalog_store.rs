//! Catalog queries and admin writes.

use crate::admin::{PriceRow, PriceSheet, ValidatedGame};
use crate::catalog::{best_sale_price, Author, Game, Genre, PriceDiscount};
use crate::error::CommerceError;
use crate::ids::{AuthorId, DiscountId, GameId, GenreId};
use crate::money::{Currency, Money};
use crate::store::{format_timestamp, parse_timestamp};
use chrono::NaiveDateTime;
use std::collections::HashMap;
use tabletop_db::{params, Db, Executor, Row};

const GAME_COLUMNS: &str = "g.id, g.name, g.author_id, a.name AS author_name, g.genre_id, \
     g.price_cents, g.min_players, g.max_players, g.min_age, g.play_time_min, \
     g.stock, g.is_active, g.image_path";

/// Catalog access over an open database.
pub struct CatalogStore<'a> {
    db: &'a Db,
    currency: Currency,
}

impl<'a> CatalogStore<'a> {
    pub fn new(db: &'a Db, currency: Currency) -> Self {
        Self { db, currency }
    }

    /// Active games ordered by name, with genres, author names and the sale
    /// price current at `now`.
    pub fn active_games(&self, now: NaiveDateTime) -> Result<Vec<Game>, CommerceError> {
        let sql = format!(
            "SELECT {} FROM games g LEFT JOIN authors a ON a.id = g.author_id \
             WHERE g.is_active = 1 ORDER BY g.name, g.id",
            GAME_COLUMNS
        );
        let mut games = self
            .db
            .query(&sql, params![])?
            .iter()
            .map(|row| self.game_from_row(row))
            .collect::<Result<Vec<_>, _>>()?;

        let links = self.db.query(
            "SELECT gg.game_id, gg.genre_id, ge.name FROM game_genres gg \
             JOIN genres ge ON ge.id = gg.genre_id ORDER BY ge.name",
            params![],
        )?;
        let mut genres_by_game: HashMap<i64, Vec<(GenreId, String)>> = HashMap::new();
        for row in links.iter() {
            genres_by_game
                .entry(row.get_i64("game_id")?)
                .or_default()
                .push((GenreId::new(row.get_i64("genre_id")?), row.get_text("name")?));
        }

        let mut discounts_by_game: HashMap<GameId, Vec<PriceDiscount>> = HashMap::new();
        for discount in self.current_discounts(now)? {
            discounts_by_game.entry(discount.game_id).or_default().push(discount);
        }

        for game in &mut games {
            if let Some(links) = genres_by_game.remove(&game.id.get()) {
                for (id, name) in links {
                    game.genre_ids.insert(id);
                    game.genre_names.push(name);
                }
            }
            if let Some(discounts) = discounts_by_game.get(&game.id) {
                game.sale_price = best_sale_price(game.price, discounts, now);
            }
        }

        tracing::debug!(count = games.len(), "loaded active games");
        Ok(games)
    }

    /// One game by id, active or not, without sale prices.
    pub fn game(&self, id: GameId) -> Result<Game, CommerceError> {
        let sql = format!(
            "SELECT {} FROM games g LEFT JOIN authors a ON a.id = g.author_id WHERE g.id = ?",
            GAME_COLUMNS
        );
        let result = self.db.query(&sql, params![id])?;
        let row = result.first().ok_or(CommerceError::GameNotFound(id.get()))?;
        let mut game = self.game_from_row(row)?;
        for (genre_id, name) in self.genres_for_game(id)? {
            game.genre_ids.insert(genre_id);
            game.genre_names.push(name);
        }
        Ok(game)
    }

    fn game_from_row(&self, row: &Row) -> Result<Game, CommerceError> {
        let min_players = row.get_opt_i64("min_players")?.unwrap_or(1);
        Ok(Game {
            id: GameId::new(row.get_i64("id")?),
            name: row.get_text("name")?,
            author_id: row.get_opt_i64("author_id")?.map(AuthorId::new),
            author_name: row.get_opt_text("author_name")?,
            primary_genre_id: row.get_opt_i64("genre_id")?.map(GenreId::new),
            genre_ids: Default::default(),
            genre_names: Vec::new(),
            price: Money::new(row.get_i64("price_cents")?, self.currency),
            sale_price: None,
            min_players,
            max_players: row.get_opt_i64("max_players")?.unwrap_or(min_players),
            min_age: row.get_opt_i64("min_age")?.unwrap_or(0),
            play_time_min: row.get_opt_i64("play_time_min")?.unwrap_or(0),
            stock: row.get_i64("stock")?,
            is_active: row.get_i64("is_active")? != 0,
            image_path: row.get_opt_text("image_path")?,
        })
    }

    /// All genres ordered by name.
    pub fn genres(&self) -> Result<Vec<Genre>, CommerceError> {
        let result = self
            .db
            .query("SELECT id, name FROM genres ORDER BY name", params![])?;
        result
            .iter()
            .map(|row| Ok(Genre::new(row.get_i64("id")?, row.get_text("name")?)))
            .collect()
    }

    pub fn genre_id_by_name(&self, name: &str) -> Result<Option<GenreId>, CommerceError> {
        Ok(self
            .db
            .query_i64("SELECT id FROM genres WHERE name = ?", params![name])?
            .map(GenreId::new))
    }

    fn genres_for_game(&self, id: GameId) -> Result<Vec<(GenreId, String)>, CommerceError> {
        let result = self.db.query(
            "SELECT ge.id, ge.name FROM game_genres gg JOIN genres ge ON ge.id = gg.genre_id \
             WHERE gg.game_id = ? ORDER BY ge.name",
            params![id],
        )?;
        result
            .iter()
            .map(|row| Ok((GenreId::new(row.get_i64("id")?), row.get_text("name")?)))
            .collect()
    }

    /// Genre names linked to a game, ordered by name.
    pub fn genre_names_for_game(&self, id: GameId) -> Result<Vec<String>, CommerceError> {
        Ok(self
            .genres_for_game(id)?
            .into_iter()
            .map(|(_, name)| name)
            .collect())
    }

    pub fn author_name(&self, id: AuthorId) -> Result<Option<String>, CommerceError> {
        let result = self
            .db
            .query("SELECT name FROM authors WHERE id = ?", params![id])?;
        match result.first() {
            Some(row) => Ok(Some(row.get_text("name")?)),
            None => Ok(None),
        }
    }

    pub fn authors(&self) -> Result<Vec<Author>, CommerceError> {
        let result = self
            .db
            .query("SELECT id, name, country FROM authors ORDER BY name", params![])?;
        result
            .iter()
            .map(|row| {
                Ok(Author {
                    id: AuthorId::new(row.get_i64("id")?),
                    name: row.get_text("name")?,
                    country: row.get_opt_text("country")?,
                })
            })
            .collect()
    }

    /// Insert a game with its author and genres in one transaction.
    ///
    /// Missing authors and genres are created. The first genre becomes the
    /// primary genre. New games start active with no stock.
    pub fn add_game(&self, game: &ValidatedGame) -> Result<GameId, CommerceError> {
        if game.price.currency != self.currency {
            return Err(CommerceError::CurrencyMismatch {
                expected: self.currency.code().to_string(),
                got: game.price.currency.code().to_string(),
            });
        }

        let tx = self.db.transaction()?;

        let author_id = match &game.author_name {
            Some(name) => {
                tx.execute(
                    "INSERT OR IGNORE INTO authors (name, country) VALUES (?, ?)",
                    params![name, game.author_country.clone()],
                )?;
                tx.query_i64("SELECT id FROM authors WHERE name = ?", params![name])?
            }
            None => None,
        };

        let mut genre_ids = Vec::with_capacity(game.genres.len());
        for name in &game.genres {
            tx.execute("INSERT OR IGNORE INTO genres (name) VALUES (?)", params![name])?;
            if let Some(id) = tx.query_i64("SELECT id FROM genres WHERE name = ?", params![name])? {
                genre_ids.push(id);
            }
        }

        let game_id = tx.insert(
            "INSERT INTO games (name, author_id, genre_id, price_cents, min_players, max_players, \
             min_age, play_time_min, stock, is_active, image_path) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, 0, 1, ?)",
            params![
                game.name.as_str(),
                author_id,
                genre_ids.first().copied(),
                game.price.amount_cents,
                game.min_players,
                game.max_players,
                game.min_age,
                game.play_time_min,
                game.image_path.clone()
            ],
        )?;

        for genre_id in &genre_ids {
            tx.execute(
                "INSERT OR IGNORE INTO game_genres (game_id, genre_id) VALUES (?, ?)",
                params![game_id, *genre_id],
            )?;
        }

        tx.commit()?;
        tracing::info!(game_id, name = %game.name, genres = genre_ids.len(), "game added");
        Ok(GameId::new(game_id))
    }

    /// Active games with their list prices, ordered by name.
    pub fn price_sheet(&self) -> Result<PriceSheet, CommerceError> {
        let result = self.db.query(
            "SELECT g.id, g.name, a.name AS author, g.price_cents FROM games g \
             LEFT JOIN authors a ON a.id = g.author_id \
             WHERE g.is_active = 1 ORDER BY g.name, g.id",
            params![],
        )?;
        let rows = result
            .iter()
            .map(|row| {
                Ok(PriceRow::new(
                    GameId::new(row.get_i64("id")?),
                    row.get_text("name")?,
                    row.get_opt_text("author")?,
                    Money::new(row.get_i64("price_cents")?, self.currency),
                ))
            })
            .collect::<Result<Vec<_>, CommerceError>>()?;
        Ok(PriceSheet::new(rows))
    }

    /// Write the edited prices in one transaction.
    ///
    /// Returns the number of rows updated. The sheet itself is left alone;
    /// call [`PriceSheet::mark_saved`] after a successful save.
    pub fn save_prices(&self, sheet: &PriceSheet) -> Result<usize, CommerceError> {
        let changed = sheet.changed();
        if changed.is_empty() {
            return Ok(0);
        }
        if let Some(row) = changed.iter().find(|r| r.price.is_negative()) {
            return Err(CommerceError::validation(format!(
                "price must not be negative (game: {})",
                row.name
            )));
        }

        let tx = self.db.transaction()?;
        let mut affected = 0;
        for row in &changed {
            affected += tx.execute(
                "UPDATE games SET price_cents = ? WHERE id = ?",
                params![row.price.amount_cents, row.game_id],
            )?;
        }
        tx.commit()?;

        tracing::info!(affected, "prices saved");
        Ok(affected)
    }

    /// Store a discount after validating it. Returns its id.
    pub fn add_discount(&self, discount: &PriceDiscount) -> Result<DiscountId, CommerceError> {
        discount.validate()?;
        let exists = self
            .db
            .query_i64("SELECT 1 FROM games WHERE id = ?", params![discount.game_id])?;
        if exists.is_none() {
            return Err(CommerceError::GameNotFound(discount.game_id.get()));
        }

        let id = self.db.insert(
            "INSERT INTO discounts (game_id, percent, starts_at, ends_at, is_active) \
             VALUES (?, ?, ?, ?, ?)",
            params![
                discount.game_id,
                discount.percent,
                format_timestamp(discount.starts_at),
                format_timestamp(discount.ends_at),
                discount.is_active
            ],
        )?;
        tracing::info!(
            discount_id = id,
            game_id = %discount.game_id,
            percent = discount.percent,
            "discount added"
        );
        Ok(DiscountId::new(id))
    }

    /// Active discounts whose window contains `now`.
    pub fn current_discounts(&self, now: NaiveDateTime) -> Result<Vec<PriceDiscount>, CommerceError> {
        let now = format_timestamp(now);
        let result = self.db.query(
            "SELECT id, game_id, percent, starts_at, ends_at, is_active FROM discounts \
             WHERE is_active = 1 AND starts_at <= ? AND ends_at >= ?",
            params![now.as_str(), now.as_str()],
        )?;
        result
            .iter()
            .map(|row| {
                Ok(PriceDiscount {
                    id: DiscountId::new(row.get_i64("id")?),
                    game_id: GameId::new(row.get_i64("game_id")?),
                    percent: row.get_f64("percent")?,
                    starts_at: parse_timestamp(&row.get_text("starts_at")?)?,
                    ends_at: parse_timestamp(&row.get_text("ends_at")?)?,
                    is_active: row.get_i64("is_active")? != 0,
                })
            })
            .collect()
    }
}
