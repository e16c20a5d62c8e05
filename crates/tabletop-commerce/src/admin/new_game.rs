//! The add-game form.

use crate::catalog::MAX_GENRES_PER_GAME;
use crate::error::CommerceError;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Raw input for a new catalog entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct NewGame {
    pub name: String,
    pub author_name: String,
    pub author_country: String,
    pub min_players: i64,
    pub max_players: i64,
    /// Play time in minutes.
    pub play_time_min: i64,
    pub min_age: i64,
    pub price: Money,
    /// Genre names, in the order picked. The first becomes the primary genre.
    pub genres: Vec<String>,
    pub image_path: String,
}

/// A [`NewGame`] that passed validation, with blanks turned into `None`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValidatedGame {
    pub name: String,
    pub author_name: Option<String>,
    pub author_country: Option<String>,
    pub min_players: i64,
    pub max_players: i64,
    pub play_time_min: i64,
    pub min_age: i64,
    pub price: Money,
    pub genres: Vec<String>,
    pub image_path: Option<String>,
}

impl ValidatedGame {
    /// Primary genre, if any genre was picked.
    pub fn primary_genre(&self) -> Option<&str> {
        self.genres.first().map(String::as_str)
    }
}

impl NewGame {
    /// Check the form and normalize it.
    pub fn validate(&self) -> Result<ValidatedGame, CommerceError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(CommerceError::validation("name is required"));
        }
        if self.min_players < 1 {
            return Err(CommerceError::validation("min players must be at least 1"));
        }
        if self.max_players < self.min_players {
            return Err(CommerceError::validation(
                "max players must be at least min players",
            ));
        }
        if self.play_time_min <= 0 {
            return Err(CommerceError::validation("play time must be greater than 0"));
        }
        if self.min_age < 0 {
            return Err(CommerceError::validation("age must not be negative"));
        }
        if self.price.is_negative() {
            return Err(CommerceError::validation("price must not be negative"));
        }

        let mut genres: Vec<String> = Vec::new();
        for genre in self.genres.iter().map(|g| g.trim()).filter(|g| !g.is_empty()) {
            if !genres.iter().any(|g| g == genre) {
                genres.push(genre.to_string());
            }
        }
        if genres.len() > MAX_GENRES_PER_GAME {
            return Err(CommerceError::TooManyGenres {
                max: MAX_GENRES_PER_GAME,
                got: genres.len(),
            });
        }

        Ok(ValidatedGame {
            name: name.to_string(),
            author_name: non_blank(&self.author_name),
            author_country: non_blank(&self.author_country),
            min_players: self.min_players,
            max_players: self.max_players,
            play_time_min: self.play_time_min,
            min_age: self.min_age,
            price: self.price,
            genres,
            image_path: non_blank(&self.image_path),
        })
    }
}

fn non_blank(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Currency;

    fn form() -> NewGame {
        NewGame {
            name: "  Azul ".into(),
            author_name: "Michael Kiesling".into(),
            author_country: "  ".into(),
            min_players: 2,
            max_players: 4,
            play_time_min: 45,
            min_age: 8,
            price: Money::new(79900, Currency::CZK),
            genres: vec!["Family".into(), " Abstract ".into(), "Family".into()],
            image_path: String::new(),
        }
    }

    #[test]
    fn test_validate_normalizes() {
        let game = form().validate().unwrap();
        assert_eq!(game.name, "Azul");
        assert_eq!(game.author_name.as_deref(), Some("Michael Kiesling"));
        assert_eq!(game.author_country, None);
        assert_eq!(game.image_path, None);
        assert_eq!(game.genres, vec!["Family", "Abstract"]);
        assert_eq!(game.primary_genre(), Some("Family"));
    }

    #[test]
    fn test_validate_rejects_bad_fields() {
        let cases: Vec<Box<dyn Fn(&mut NewGame)>> = vec![
            Box::new(|f| f.name = "   ".into()),
            Box::new(|f| f.min_players = 0),
            Box::new(|f| f.max_players = 1),
            Box::new(|f| f.play_time_min = 0),
            Box::new(|f| f.min_age = -1),
            Box::new(|f| f.price = Money::new(-1, Currency::CZK)),
        ];
        for mutate in cases {
            let mut f = form();
            mutate(&mut f);
            assert!(matches!(f.validate(), Err(CommerceError::ValidationError(_))));
        }
    }

    #[test]
    fn test_validate_genre_limit() {
        let mut f = form();
        f.genres = (1..=6).map(|i| format!("G{}", i)).collect();
        assert!(matches!(
            f.validate(),
            Err(CommerceError::TooManyGenres { max: 5, got: 6 })
        ));
    }

    #[test]
    fn test_zero_price_is_allowed() {
        let mut f = form();
        f.price = Money::zero(Currency::CZK);
        assert!(f.validate().is_ok());
    }
}
