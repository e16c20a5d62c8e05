//! Order types.

use crate::cart::Cart;
use crate::error::CommerceError;
use crate::ids::{GameId, OrderId, UserId};
use crate::money::{Currency, Money};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Order status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum OrderStatus {
    /// Order placed, awaiting processing.
    #[default]
    New,
    /// Order handed over to the customer.
    Completed,
    /// Order cancelled.
    Cancelled,
}

impl OrderStatus {
    /// Value stored in the `orders.status` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::New => "New",
            OrderStatus::Completed => "Completed",
            OrderStatus::Cancelled => "Cancelled",
        }
    }

    /// Check if order is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = CommerceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "New" => Ok(OrderStatus::New),
            "Completed" => Ok(OrderStatus::Completed),
            "Cancelled" => Ok(OrderStatus::Cancelled),
            other => Err(CommerceError::validation(format!(
                "unknown order status `{}`",
                other
            ))),
        }
    }
}

/// A line of a placed order. A snapshot, so it survives catalog edits.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderLine {
    /// 1-based position within the order.
    pub line_no: i64,
    /// `None` once the game has been deleted.
    pub game_id: Option<GameId>,
    pub game_name: String,
    pub quantity: i64,
    pub unit_price: Money,
}

impl OrderLine {
    pub fn total(&self) -> Option<Money> {
        self.unit_price.try_multiply(self.quantity)
    }
}

/// An order ready to be written.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewOrder {
    pub user_id: UserId,
    pub total: Money,
    pub lines: Vec<OrderLine>,
}

impl NewOrder {
    /// Snapshot the cart into an order for `user_id`.
    ///
    /// Fails when the cart is empty or the total is not positive.
    pub fn from_cart(user_id: UserId, cart: &Cart) -> Result<Self, CommerceError> {
        if cart.is_empty() {
            return Err(CommerceError::EmptyCart);
        }

        let pricing = cart.calculate_pricing()?;
        if !pricing.grand_total.is_positive() {
            return Err(CommerceError::validation("order total must be positive"));
        }

        let lines = cart
            .items
            .iter()
            .enumerate()
            .map(|(index, item)| OrderLine {
                line_no: index as i64 + 1,
                game_id: Some(item.game_id),
                game_name: item.name.clone(),
                quantity: item.quantity,
                unit_price: item.unit_price,
            })
            .collect();

        Ok(Self {
            user_id,
            total: pricing.grand_total,
            lines,
        })
    }

    pub fn currency(&self) -> Currency {
        self.total.currency
    }
}

/// A placed order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    /// UTC time the order was written.
    pub placed_at: NaiveDateTime,
    pub total: Money,
    pub status: OrderStatus,
    pub lines: Vec<OrderLine>,
}

impl Order {
    /// Get total item count (sum of quantities).
    pub fn item_count(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Game;

    fn cart_with(prices: &[i64]) -> Cart {
        let mut cart = Cart::default();
        for (i, price) in prices.iter().enumerate() {
            let game = Game::new(i as i64 + 1, format!("Game {}", i + 1), Money::new(*price, Currency::CZK));
            cart.add_game(&game).unwrap();
        }
        cart
    }

    #[test]
    fn test_from_cart_snapshots_lines() {
        let mut cart = cart_with(&[1000, 2500]);
        cart.increment(GameId::new(2)).unwrap();

        let order = NewOrder::from_cart(UserId::new(7), &cart).unwrap();
        assert_eq!(order.user_id, UserId::new(7));
        assert_eq!(order.total.amount_cents, 6000);
        assert_eq!(order.lines.len(), 2);
        assert_eq!(order.lines[0].line_no, 1);
        assert_eq!(order.lines[1].line_no, 2);
        assert_eq!(order.lines[1].quantity, 2);
        assert_eq!(order.lines[1].total().unwrap().amount_cents, 5000);
    }

    #[test]
    fn test_from_cart_rejects_empty() {
        let err = NewOrder::from_cart(UserId::new(1), &Cart::default()).unwrap_err();
        assert!(matches!(err, CommerceError::EmptyCart));
    }

    #[test]
    fn test_from_cart_rejects_zero_total() {
        let cart = cart_with(&[0]);
        let err = NewOrder::from_cart(UserId::new(1), &cart).unwrap_err();
        assert!(matches!(err, CommerceError::ValidationError(_)));
    }

    #[test]
    fn test_status_roundtrip() {
        for status in [OrderStatus::New, OrderStatus::Completed, OrderStatus::Cancelled] {
            assert_eq!(status.as_str().parse::<OrderStatus>().unwrap(), status);
        }
        assert!("Shipped".parse::<OrderStatus>().is_err());
        assert!(!OrderStatus::New.is_terminal());
    }
}
