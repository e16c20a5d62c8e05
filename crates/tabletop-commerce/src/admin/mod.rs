//! Admin forms.
//!
//! Validation for new catalog entries and the bulk price editor. Both are
//! plain data; persistence lives in [`crate::store`].

mod new_game;
mod price_sheet;

pub use new_game::{NewGame, ValidatedGame};
pub use price_sheet::{PriceRow, PriceSheet, NO_AUTHOR};
