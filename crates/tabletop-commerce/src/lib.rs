//! Board game commerce domain for Tabletop.
//!
//! - **Catalog**: games, genres, authors, time-boxed discounts
//! - **Search**: facet filters over the loaded catalog
//! - **Cart**: in-memory cart with pricing
//! - **Checkout**: order snapshots
//! - **Admin**: add-game form and bulk price sheet
//! - **Store**: SQL persistence on top of `tabletop-db`
//!
//! # Example
//!
//! ```rust,ignore
//! use tabletop_commerce::prelude::*;
//!
//! let games = CatalogStore::new(&db, Currency::CZK).active_games(now)?;
//! let genres = CatalogStore::new(&db, Currency::CZK).genres()?;
//!
//! let query = CatalogQuery::new()
//!     .with_search("ticket")
//!     .with_players(4)
//!     .with_play_time(PlayTimeBucket::UpTo60);
//! let visible = query.apply(&games, &genres);
//!
//! let mut cart = Cart::default();
//! cart.add_game(&visible[0])?;
//! println!("Total: {}", cart.calculate_pricing()?.grand_total);
//! ```

pub mod error;
pub mod ids;
pub mod money;

pub mod admin;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod search;
pub mod store;

pub use error::CommerceError;
pub use ids::*;
pub use money::{Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CommerceError;
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money};

    // Catalog
    pub use crate::catalog::{
        best_sale_price, Author, Game, Genre, PriceDiscount, MAX_GENRES_PER_GAME,
    };

    // Search
    pub use crate::search::{CatalogQuery, Filter, PlayTimeBucket, PriceRange, AGE_STEPS};

    // Cart
    pub use crate::cart::{Cart, CartItem, CartPricing, LineItemPricing, MAX_QUANTITY_PER_ITEM};

    // Checkout
    pub use crate::checkout::{NewOrder, Order, OrderLine, OrderStatus};

    // Admin
    pub use crate::admin::{NewGame, PriceRow, PriceSheet, ValidatedGame};

    // Store
    pub use crate::store::{CatalogStore, OrderStore};
}
