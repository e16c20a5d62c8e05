//! Checkout module.
//!
//! Turns a cart into an order snapshot.

mod order;

pub use order::{NewOrder, Order, OrderLine, OrderStatus};
