//! Shopping cart module.
//!
//! Contains types for the cart, its lines and pricing.

mod cart;
mod pricing;

pub use cart::{Cart, CartItem, MAX_QUANTITY_PER_ITEM};
pub use pricing::{CartPricing, LineItemPricing};
