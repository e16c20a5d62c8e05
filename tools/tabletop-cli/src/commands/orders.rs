//! Order history.

use anyhow::Result;
use tabletop_commerce::checkout::Order;
use tabletop_commerce::store::TIMESTAMP_FORMAT;

use crate::context::Context;
use crate::output::status_badge;

/// List the logged-in user's orders, newest first.
pub async fn run(ctx: &Context) -> Result<()> {
    let shop = ctx.open_shop()?;
    let orders = shop.my_orders()?;
    print_orders(&orders, ctx);
    Ok(())
}

pub fn print_orders(orders: &[Order], ctx: &Context) {
    if ctx.output.is_json() {
        ctx.output.json(&orders);
        return;
    }

    if orders.is_empty() {
        ctx.output.info("No orders yet.");
        return;
    }

    ctx.output.header("Orders");
    for order in orders {
        println!();
        ctx.output.kv(
            &format!("#{}", order.id),
            &format!(
                "{}  {}  {} item(s)  {}",
                order.placed_at.format(TIMESTAMP_FORMAT),
                order.total,
                order.item_count(),
                status_badge(order.status)
            ),
        );
        for line in &order.lines {
            ctx.output.list_item(&format!(
                "{} x {} @ {}",
                line.quantity, line.game_name, line.unit_price
            ));
        }
    }
}
