//! Order persistence.

use crate::checkout::{NewOrder, Order, OrderLine, OrderStatus};
use crate::error::CommerceError;
use crate::ids::{GameId, OrderId, UserId};
use crate::money::{Currency, Money};
use crate::store::{format_timestamp, parse_timestamp};
use chrono::Utc;
use std::collections::HashMap;
use tabletop_db::{params, Db, Executor};

/// Order access over an open database.
pub struct OrderStore<'a> {
    db: &'a Db,
    currency: Currency,
}

impl<'a> OrderStore<'a> {
    pub fn new(db: &'a Db, currency: Currency) -> Self {
        Self { db, currency }
    }

    /// Write an order and its lines in one transaction.
    pub fn place_order(&self, order: &NewOrder) -> Result<Order, CommerceError> {
        if order.lines.is_empty() {
            return Err(CommerceError::EmptyCart);
        }
        if order.currency() != self.currency {
            return Err(CommerceError::CurrencyMismatch {
                expected: self.currency.code().to_string(),
                got: order.currency().code().to_string(),
            });
        }

        let placed_at = Utc::now().naive_utc();
        let tx = self.db.transaction()?;
        let order_id = tx.insert(
            "INSERT INTO orders (user_id, placed_at, total_cents, status) VALUES (?, ?, ?, ?)",
            params![
                order.user_id,
                format_timestamp(placed_at),
                order.total.amount_cents,
                OrderStatus::New.as_str()
            ],
        )?;
        for line in &order.lines {
            tx.execute(
                "INSERT INTO order_items (order_id, line_no, game_id, game_name, quantity, unit_price_cents) \
                 VALUES (?, ?, ?, ?, ?, ?)",
                params![
                    order_id,
                    line.line_no,
                    line.game_id,
                    line.game_name.as_str(),
                    line.quantity,
                    line.unit_price.amount_cents
                ],
            )?;
        }
        tx.commit()?;

        tracing::info!(
            order_id,
            user_id = %order.user_id,
            total = %order.total,
            lines = order.lines.len(),
            "order placed"
        );

        Ok(Order {
            id: OrderId::new(order_id),
            user_id: order.user_id,
            // stored text has second precision
            placed_at: parse_timestamp(&format_timestamp(placed_at))?,
            total: order.total,
            status: OrderStatus::New,
            lines: order.lines.clone(),
        })
    }

    /// Orders of one user, newest first, with their lines.
    pub fn orders_for_user(&self, user_id: UserId) -> Result<Vec<Order>, CommerceError> {
        let headers = self.db.query(
            "SELECT id, placed_at, total_cents, status FROM orders \
             WHERE user_id = ? ORDER BY placed_at DESC, id DESC",
            params![user_id],
        )?;
        let items = self.db.query(
            "SELECT oi.order_id, oi.line_no, oi.game_id, oi.game_name, oi.quantity, oi.unit_price_cents \
             FROM order_items oi JOIN orders o ON o.id = oi.order_id \
             WHERE o.user_id = ? ORDER BY oi.order_id, oi.line_no",
            params![user_id],
        )?;

        let mut lines_by_order: HashMap<i64, Vec<OrderLine>> = HashMap::new();
        for row in items.iter() {
            lines_by_order
                .entry(row.get_i64("order_id")?)
                .or_default()
                .push(OrderLine {
                    line_no: row.get_i64("line_no")?,
                    game_id: row.get_opt_i64("game_id")?.map(GameId::new),
                    game_name: row.get_text("game_name")?,
                    quantity: row.get_i64("quantity")?,
                    unit_price: Money::new(row.get_i64("unit_price_cents")?, self.currency),
                });
        }

        headers
            .iter()
            .map(|row| {
                let id = row.get_i64("id")?;
                Ok(Order {
                    id: OrderId::new(id),
                    user_id,
                    placed_at: parse_timestamp(&row.get_text("placed_at")?)?,
                    total: Money::new(row.get_i64("total_cents")?, self.currency),
                    status: row.get_text("status")?.parse()?,
                    lines: lines_by_order.remove(&id).unwrap_or_default(),
                })
            })
            .collect()
    }

    /// Move an order to another status.
    pub fn set_status(&self, order_id: OrderId, status: OrderStatus) -> Result<(), CommerceError> {
        let changed = self.db.execute(
            "UPDATE orders SET status = ? WHERE id = ?",
            params![status.as_str(), order_id],
        )?;
        if changed == 0 {
            return Err(CommerceError::validation(format!("order {} not found", order_id)));
        }
        tracing::info!(order_id = %order_id, status = %status, "order status changed");
        Ok(())
    }
}
