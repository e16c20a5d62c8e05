//! Commerce error types.

use thiserror::Error;

/// Errors that can occur in catalog, cart and order operations.
#[derive(Error, Debug)]
pub enum CommerceError {
    /// Game not found.
    #[error("Game not found: {0}")]
    GameNotFound(i64),

    /// Item not in cart.
    #[error("Item not in cart: {0}")]
    ItemNotInCart(i64),

    /// Invalid quantity.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i64),

    /// Quantity exceeds maximum allowed.
    #[error("Quantity {0} exceeds maximum allowed ({1})")]
    QuantityExceedsLimit(i64, i64),

    /// Checkout attempted with nothing to buy.
    #[error("Cart is empty")]
    EmptyCart,

    /// Too many genres selected or assigned.
    #[error("At most {max} genres can be selected, got {got}")]
    TooManyGenres { max: usize, got: usize },

    /// Currency mismatch.
    #[error("Currency mismatch: expected {expected}, got {got}")]
    CurrencyMismatch { expected: String, got: String },

    /// Arithmetic overflow.
    #[error("Arithmetic overflow in money calculation")]
    Overflow,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] tabletop_db::DbError),

    /// Validation error.
    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl CommerceError {
    /// Shorthand for a validation failure.
    pub fn validation(msg: impl Into<String>) -> Self {
        CommerceError::ValidationError(msg.into())
    }
}
