//! Catalog module.
//!
//! Contains types for games, genres, authors and time-boxed price discounts.

mod discount;
mod game;
mod genre;

pub use discount::{best_sale_price, PriceDiscount, MAX_DISCOUNT_PERCENT};
pub use game::Game;
pub use genre::{Author, Genre, MAX_GENRES_PER_GAME};
