//! Bulk price editing.

use crate::error::CommerceError;
use crate::ids::GameId;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Shown in place of a missing author.
pub const NO_AUTHOR: &str = "\u{2014}";

/// One editable row: a game and its list price.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PriceRow {
    pub game_id: GameId,
    pub name: String,
    /// Author name, or [`NO_AUTHOR`].
    pub author: String,
    /// Price as edited.
    pub price: Money,
    /// Price as loaded or last saved.
    pub original_price: Money,
}

impl PriceRow {
    pub fn new(game_id: GameId, name: impl Into<String>, author: Option<String>, price: Money) -> Self {
        Self {
            game_id,
            name: name.into(),
            author: author.unwrap_or_else(|| NO_AUTHOR.to_string()),
            price,
            original_price: price,
        }
    }

    pub fn is_changed(&self) -> bool {
        self.price != self.original_price
    }
}

/// Every active game with its price, ready for editing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct PriceSheet {
    pub rows: Vec<PriceRow>,
}

impl PriceSheet {
    pub fn new(rows: Vec<PriceRow>) -> Self {
        Self { rows }
    }

    /// Rows whose name or author contains `text`, ignoring case.
    pub fn search(&self, text: &str) -> Vec<&PriceRow> {
        let needle = text.trim().to_lowercase();
        self.rows
            .iter()
            .filter(|row| {
                needle.is_empty()
                    || row.name.to_lowercase().contains(&needle)
                    || row.author.to_lowercase().contains(&needle)
            })
            .collect()
    }

    /// Edit the price of one row.
    pub fn set_price(&mut self, game_id: GameId, price: Money) -> Result<(), CommerceError> {
        let row = self
            .rows
            .iter_mut()
            .find(|r| r.game_id == game_id)
            .ok_or(CommerceError::GameNotFound(game_id.get()))?;
        if price.is_negative() {
            return Err(CommerceError::validation(format!(
                "price must not be negative (game: {})",
                row.name
            )));
        }
        if price.currency != row.original_price.currency {
            return Err(CommerceError::CurrencyMismatch {
                expected: row.original_price.currency.code().to_string(),
                got: price.currency.code().to_string(),
            });
        }
        row.price = price;
        Ok(())
    }

    /// Rows with unsaved edits.
    pub fn changed(&self) -> Vec<&PriceRow> {
        self.rows.iter().filter(|r| r.is_changed()).collect()
    }

    pub fn has_changes(&self) -> bool {
        self.rows.iter().any(PriceRow::is_changed)
    }

    /// Accept the current prices as the new originals.
    pub fn mark_saved(&mut self) {
        for row in &mut self.rows {
            row.original_price = row.price;
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
