//! Catalog query builder.

use crate::catalog::{Game, Genre, MAX_GENRES_PER_GAME};
use crate::error::CommerceError;
use crate::search::{Filter, PlayTimeBucket, PriceRange};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Facet state for browsing the catalog.
///
/// Holds the raw selections. [`CatalogQuery::filters`] turns them into the
/// active facets, dropping the ones that are switched off.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct CatalogQuery {
    /// Free text matched against game names.
    pub search: String,
    /// Selected genre names.
    pub genres: Vec<String>,
    pub price: PriceRange,
    /// Player count, `0` for any.
    pub players: i64,
    pub play_times: BTreeSet<PlayTimeBucket>,
    /// Age step, `None` for any.
    pub age: Option<i64>,
}

impl CatalogQuery {
    /// Create a query that shows the whole catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the search text.
    pub fn with_search(mut self, text: impl Into<String>) -> Self {
        self.set_search(text);
        self
    }

    /// Set the selected genres.
    pub fn with_genres<I, S>(mut self, names: I) -> Result<Self, CommerceError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set_genres(names)?;
        Ok(self)
    }

    /// Set the price range in major units.
    pub fn with_price(mut self, min: i64, max: i64) -> Self {
        self.price = PriceRange::new(min, max);
        self
    }

    /// Set the player count.
    pub fn with_players(mut self, players: i64) -> Self {
        self.players = players;
        self
    }

    /// Select a play time bucket.
    pub fn with_play_time(mut self, bucket: PlayTimeBucket) -> Self {
        self.play_times.insert(bucket);
        self
    }

    /// Set the age step.
    pub fn with_age(mut self, age: Option<i64>) -> Self {
        self.age = age;
        self
    }

    pub fn set_search(&mut self, text: impl Into<String>) {
        self.search = text.into();
    }

    /// Replace the genre selection. Fails when more than
    /// [`MAX_GENRES_PER_GAME`] names are given.
    pub fn set_genres<I, S>(&mut self, names: I) -> Result<(), CommerceError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.len() > MAX_GENRES_PER_GAME {
            return Err(CommerceError::TooManyGenres {
                max: MAX_GENRES_PER_GAME,
                got: names.len(),
            });
        }
        self.genres = names;
        Ok(())
    }

    /// Turn a play time bucket on or off.
    pub fn toggle_play_time(&mut self, bucket: PlayTimeBucket, on: bool) {
        if on {
            self.play_times.insert(bucket);
        } else {
            self.play_times.remove(&bucket);
        }
    }

    /// Restore the defaults.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Whether every facet is at its default.
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    /// Build the active facets. Genre names are resolved against `genres`
    /// and unknown names are dropped.
    pub fn filters(&self, genres: &[Genre]) -> Vec<Filter> {
        let mut filters = Vec::new();

        let text = self.search.trim().to_lowercase();
        if !text.is_empty() {
            filters.push(Filter::Text(text));
        }

        let ids: Vec<_> = self
            .genres
            .iter()
            .filter_map(|name| Genre::find_id(genres, name))
            .collect();
        if !ids.is_empty() {
            filters.push(Filter::AllGenres(ids));
        }

        filters.push(Filter::PriceRange(self.price));

        if self.players > 0 {
            filters.push(Filter::Players(self.players));
        }

        if !self.play_times.is_empty() {
            filters.push(Filter::PlayTime(self.play_times.iter().copied().collect()));
        }

        if let Some(age) = self.age {
            filters.push(Filter::Age(age));
        }

        filters
    }

    /// Games that pass every facet, in catalog order.
    pub fn apply(&self, games: &[Game], genres: &[Genre]) -> Vec<Game> {
        let filters = self.filters(genres);
        let visible: Vec<Game> = games
            .iter()
            .filter(|game| filters.iter().all(|f| f.matches(game)))
            .cloned()
            .collect();
        tracing::debug!(
            total = games.len(),
            visible = visible.len(),
            facets = filters.len(),
            "applied catalog filters"
        );
        visible
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::GenreId;
    use crate::money::{Currency, Money};

    fn genres() -> Vec<Genre> {
        vec![
            Genre::new(1, "Strategy"),
            Genre::new(2, "Family"),
            Genre::new(3, "Party"),
        ]
    }

    fn game(id: i64, name: &str, price: i64, genres: &[i64]) -> Game {
        let mut g = Game::new(id, name, Money::from_major(price, Currency::CZK));
        g.genre_ids = genres.iter().copied().map(GenreId::new).collect();
        g.min_players = 2;
        g.max_players = 4;
        g.play_time_min = 45;
        g.min_age = 10;
        g
    }

    fn catalog() -> Vec<Game> {
        vec![
            game(1, "Azul", 800, &[2]),
            game(2, "Brass", 1500, &[1]),
            game(3, "Codenames", 400, &[2, 3]),
            game(4, "Dixit", 700, &[2, 3]),
        ]
    }

    fn names(games: &[Game]) -> Vec<&str> {
        games.iter().map(|g| g.name.as_str()).collect()
    }

    #[test]
    fn test_default_query_shows_everything() {
        let query = CatalogQuery::new();
        assert!(query.is_default());
        assert_eq!(query.apply(&catalog(), &genres()).len(), 4);
    }

    #[test]
    fn test_search_is_trimmed_and_case_insensitive() {
        let query = CatalogQuery::new().with_search("  DIX ");
        assert_eq!(names(&query.apply(&catalog(), &genres())), vec!["Dixit"]);
    }

    #[test]
    fn test_genres_require_all() {
        let query = CatalogQuery::new()
            .with_genres(["Family", "Party"])
            .unwrap();
        assert_eq!(
            names(&query.apply(&catalog(), &genres())),
            vec!["Codenames", "Dixit"]
        );
    }

    #[test]
    fn test_unknown_genres_are_dropped() {
        let query = CatalogQuery::new()
            .with_genres(["Strategy", "Wargame"])
            .unwrap();
        assert_eq!(names(&query.apply(&catalog(), &genres())), vec!["Brass"]);

        let query = CatalogQuery::new().with_genres(["Wargame"]).unwrap();
        assert_eq!(query.apply(&catalog(), &genres()).len(), 4);
    }

    #[test]
    fn test_too_many_genres() {
        let err = CatalogQuery::new()
            .with_genres(["a", "b", "c", "d", "e", "f"])
            .unwrap_err();
        assert!(matches!(err, CommerceError::TooManyGenres { max: 5, got: 6 }));
    }

    #[test]
    fn test_facets_are_anded() {
        let query = CatalogQuery::new()
            .with_genres(["Family"])
            .unwrap()
            .with_price(500, 800);
        assert_eq!(
            names(&query.apply(&catalog(), &genres())),
            vec!["Azul", "Dixit"]
        );

        let query = query.with_players(5);
        assert!(query.apply(&catalog(), &genres()).is_empty());
    }

    #[test]
    fn test_zero_max_price_is_unbounded() {
        let query = CatalogQuery::new().with_price(1000, 0);
        assert_eq!(names(&query.apply(&catalog(), &genres())), vec!["Brass"]);
    }

    #[test]
    fn test_play_time_and_age() {
        let mut games = catalog();
        games[1].play_time_min = 180;
        games[1].min_age = 14;

        let query = CatalogQuery::new().with_play_time(PlayTimeBucket::Over120);
        assert_eq!(names(&query.apply(&games, &genres())), vec!["Brass"]);

        let query = CatalogQuery::new().with_age(Some(10));
        assert_eq!(
            names(&query.apply(&games, &genres())),
            vec!["Azul", "Codenames", "Dixit"]
        );
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut query = CatalogQuery::new()
            .with_search("x")
            .with_players(3)
            .with_age(Some(4));
        query.toggle_play_time(PlayTimeBucket::UpTo30, true);
        assert!(!query.is_default());
        query.reset();
        assert!(query.is_default());
        assert_eq!(query.price, PriceRange::new(0, 99_999));
    }
}
