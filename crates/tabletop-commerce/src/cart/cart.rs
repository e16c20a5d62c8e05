//! Cart and line item types.

use crate::cart::{CartPricing, LineItemPricing};
use crate::catalog::Game;
use crate::error::CommerceError;
use crate::ids::GameId;
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};

/// Maximum quantity allowed per line item.
pub const MAX_QUANTITY_PER_ITEM: i64 = 99;

/// A shopping cart. Lives in memory for one session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Cart {
    /// Items in the cart, in the order they were added.
    pub items: Vec<CartItem>,
    /// Cart currency.
    pub currency: Currency,
}

impl Cart {
    /// Create an empty cart.
    pub fn new(currency: Currency) -> Self {
        Self {
            items: Vec::new(),
            currency,
        }
    }

    /// Add one unit of `game` at its current effective price.
    ///
    /// A game already in the cart gets its quantity bumped instead; the
    /// line keeps the price it was added at.
    pub fn add_game(&mut self, game: &Game) -> Result<i64, CommerceError> {
        if let Some(existing) = self.items.iter_mut().find(|i| i.game_id == game.id) {
            existing.set_quantity(existing.quantity + 1)?;
            return Ok(existing.quantity);
        }

        let price = game.effective_price();
        if price.currency != self.currency {
            return Err(CommerceError::CurrencyMismatch {
                expected: self.currency.code().to_string(),
                got: price.currency.code().to_string(),
            });
        }

        self.items.push(CartItem::new(game.id, &game.name, price, game.price));
        Ok(1)
    }

    /// Bump the quantity of a line by one.
    pub fn increment(&mut self, game_id: GameId) -> Result<i64, CommerceError> {
        let item = self.item_mut(game_id)?;
        item.set_quantity(item.quantity + 1)?;
        Ok(item.quantity)
    }

    /// Lower the quantity of a line by one. A line at quantity 1 is removed.
    ///
    /// Returns the new quantity, `0` when the line was removed.
    pub fn decrement(&mut self, game_id: GameId) -> Result<i64, CommerceError> {
        let item = self.item_mut(game_id)?;
        if item.quantity > 1 {
            item.set_quantity(item.quantity - 1)?;
            return Ok(item.quantity);
        }
        self.remove(game_id);
        Ok(0)
    }

    /// Set a line's quantity directly. Zero or less removes the line.
    pub fn update_quantity(&mut self, game_id: GameId, quantity: i64) -> Result<(), CommerceError> {
        if quantity <= 0 {
            self.remove(game_id);
            return Ok(());
        }
        self.item_mut(game_id)?.set_quantity(quantity)
    }

    /// Remove a line from the cart.
    pub fn remove(&mut self, game_id: GameId) -> bool {
        let len_before = self.items.len();
        self.items.retain(|i| i.game_id != game_id);
        self.items.len() < len_before
    }

    /// Clear all items from the cart.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Get total item count (sum of quantities).
    pub fn item_count(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Get number of unique items.
    pub fn unique_item_count(&self) -> usize {
        self.items.len()
    }

    /// Check if cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get a line by game.
    pub fn get(&self, game_id: GameId) -> Option<&CartItem> {
        self.items.iter().find(|i| i.game_id == game_id)
    }

    fn item_mut(&mut self, game_id: GameId) -> Result<&mut CartItem, CommerceError> {
        self.items
            .iter_mut()
            .find(|i| i.game_id == game_id)
            .ok_or(CommerceError::ItemNotInCart(game_id.get()))
    }

    /// Calculate cart pricing.
    ///
    /// Returns error if arithmetic overflow occurs.
    pub fn calculate_pricing(&self) -> Result<CartPricing, CommerceError> {
        let line_items = self
            .items
            .iter()
            .map(|item| {
                let subtotal = item
                    .list_price
                    .try_multiply(item.quantity)
                    .ok_or(CommerceError::Overflow)?;
                let total = item.line_total()?;
                let savings = subtotal.try_subtract(&total).ok_or(CommerceError::Overflow)?;
                Ok(LineItemPricing {
                    game_id: item.game_id,
                    name: item.name.clone(),
                    unit_price: item.unit_price,
                    quantity: item.quantity,
                    subtotal,
                    savings,
                    total,
                })
            })
            .collect::<Result<Vec<_>, CommerceError>>()?;

        let subtotal = Money::try_sum(line_items.iter().map(|l| &l.subtotal), self.currency)
            .ok_or(CommerceError::Overflow)?;
        let grand_total = Money::try_sum(line_items.iter().map(|l| &l.total), self.currency)
            .ok_or(CommerceError::Overflow)?;
        let savings = subtotal
            .try_subtract(&grand_total)
            .ok_or(CommerceError::Overflow)?;

        Ok(CartPricing {
            subtotal,
            savings,
            grand_total,
            item_count: self.item_count(),
            line_items,
        })
    }
}

/// A line in the cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartItem {
    pub game_id: GameId,
    /// Game name (denormalized for display).
    pub name: String,
    /// Price charged per unit, fixed when the line was added.
    pub unit_price: Money,
    /// List price at the time the line was added.
    pub list_price: Money,
    pub quantity: i64,
}

impl CartItem {
    /// Create a line with quantity 1.
    pub fn new(game_id: GameId, name: impl Into<String>, unit_price: Money, list_price: Money) -> Self {
        Self {
            game_id,
            name: name.into(),
            unit_price,
            list_price,
            quantity: 1,
        }
    }

    /// `unit_price * quantity`.
    pub fn line_total(&self) -> Result<Money, CommerceError> {
        self.unit_price
            .try_multiply(self.quantity)
            .ok_or(CommerceError::Overflow)
    }

    fn set_quantity(&mut self, quantity: i64) -> Result<(), CommerceError> {
        if quantity <= 0 {
            return Err(CommerceError::InvalidQuantity(quantity));
        }
        if quantity > MAX_QUANTITY_PER_ITEM {
            return Err(CommerceError::QuantityExceedsLimit(
                quantity,
                MAX_QUANTITY_PER_ITEM,
            ));
        }
        self.quantity = quantity;
        Ok(())
    }
}
