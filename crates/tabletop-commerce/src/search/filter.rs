//! Catalog facets.
//!
//! Each facet is a predicate over a [`Game`]. A game is visible when it
//! passes every active facet.

use crate::catalog::Game;
use crate::error::CommerceError;
use crate::ids::GenreId;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Age steps offered by the age facet, in years.
pub const AGE_STEPS: [i64; 6] = [0, 4, 10, 14, 16, 18];

/// Default upper bound of the price facet, in major units.
pub const DEFAULT_MAX_PRICE: i64 = 99_999;

/// One active facet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Filter {
    /// Lowercased substring of the game name.
    Text(String),
    /// The game must carry every listed genre.
    AllGenres(Vec<GenreId>),
    /// Effective price within the range.
    PriceRange(PriceRange),
    /// The player range includes this count.
    Players(i64),
    /// Play time falls in any of the buckets.
    PlayTime(Vec<PlayTimeBucket>),
    /// Minimum age falls in the bracket starting at this step.
    Age(i64),
}

impl Filter {
    /// Whether `game` passes this facet.
    pub fn matches(&self, game: &Game) -> bool {
        match self {
            Filter::Text(needle) => game.name.to_lowercase().contains(needle.as_str()),
            Filter::AllGenres(ids) => game.has_all_genres(ids),
            Filter::PriceRange(range) => range.contains_cents(game.effective_price().amount_cents),
            Filter::Players(n) => game.min_players <= *n && *n <= game.max_players,
            Filter::PlayTime(buckets) => buckets.iter().any(|b| b.matches(game.play_time_min)),
            Filter::Age(step) => age_matches(*step, game.min_age),
        }
    }
}

/// Inclusive price bounds in whole major units.
///
/// A negative minimum counts as zero and a non-positive maximum means no
/// upper bound.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PriceRange {
    pub min: i64,
    pub max: i64,
}

impl Default for PriceRange {
    fn default() -> Self {
        Self {
            min: 0,
            max: DEFAULT_MAX_PRICE,
        }
    }
}

impl PriceRange {
    pub fn new(min: i64, max: i64) -> Self {
        Self { min, max }
    }

    /// Lower bound in minor units after normalization.
    pub fn min_cents(&self) -> i64 {
        self.min.max(0).saturating_mul(100)
    }

    /// Upper bound in minor units after normalization.
    pub fn max_cents(&self) -> i64 {
        if self.max <= 0 {
            i64::MAX
        } else {
            self.max.saturating_mul(100)
        }
    }

    pub fn contains_cents(&self, cents: i64) -> bool {
        self.min_cents() <= cents && cents <= self.max_cents()
    }
}

/// Play time buckets. Buckets overlap: a 25 minute game is in all of the
/// first three.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PlayTimeBucket {
    UpTo30,
    UpTo60,
    UpTo120,
    Over120,
}

impl PlayTimeBucket {
    pub const ALL: [PlayTimeBucket; 4] = [
        PlayTimeBucket::UpTo30,
        PlayTimeBucket::UpTo60,
        PlayTimeBucket::UpTo120,
        PlayTimeBucket::Over120,
    ];

    pub fn matches(&self, minutes: i64) -> bool {
        match self {
            PlayTimeBucket::UpTo30 => minutes <= 30,
            PlayTimeBucket::UpTo60 => minutes <= 60,
            PlayTimeBucket::UpTo120 => minutes <= 120,
            PlayTimeBucket::Over120 => minutes > 120,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PlayTimeBucket::UpTo30 => "up to 30 min",
            PlayTimeBucket::UpTo60 => "up to 60 min",
            PlayTimeBucket::UpTo120 => "up to 120 min",
            PlayTimeBucket::Over120 => "over 120 min",
        }
    }
}

impl FromStr for PlayTimeBucket {
    type Err = CommerceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "30" => Ok(PlayTimeBucket::UpTo30),
            "60" => Ok(PlayTimeBucket::UpTo60),
            "120" => Ok(PlayTimeBucket::UpTo120),
            "more" | "120+" => Ok(PlayTimeBucket::Over120),
            other => Err(CommerceError::validation(format!(
                "unknown play time `{}` (expected 30, 60, 120 or more)",
                other
            ))),
        }
    }
}

/// Age bracket test.
///
/// A step other than the last keeps ages in `[step, next step)`. The last
/// step, or any value that is not a step, keeps ages `>= step`.
pub fn age_matches(step: i64, age: i64) -> bool {
    match AGE_STEPS.iter().position(|s| *s == step) {
        Some(index) if index + 1 < AGE_STEPS.len() => {
            step <= age && age < AGE_STEPS[index + 1]
        }
        _ => age >= step,
    }
}
