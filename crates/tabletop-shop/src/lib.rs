//! Storefront facade for the Tabletop board game shop.
//!
//! Ties the catalog, search, cart, checkout and auth crates together
//! behind a single [`Storefront`] that front ends drive.

mod error;
mod settings;
mod storefront;

pub use error::ShopError;
pub use settings::{AdminSeed, DatabaseLocation, ShopSettings};
pub use storefront::{CatalogSnapshot, Storefront};

/// Prelude for front ends.
pub mod prelude {
    pub use crate::{AdminSeed, DatabaseLocation, ShopError, ShopSettings, Storefront};
    pub use tabletop_auth::{AuthConfig, AuthError, AuthUser, Role, SessionToken};
    pub use tabletop_commerce::prelude::*;
}
