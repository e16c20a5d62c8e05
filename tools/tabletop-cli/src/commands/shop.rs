//! Interactive storefront session.

use anyhow::Result;
use dialoguer::{Confirm, Input, MultiSelect, Password, Select};
use tabletop_commerce::catalog::Game;
use tabletop_commerce::search::{PlayTimeBucket, AGE_STEPS};
use tabletop_commerce::GameId;
use tabletop_shop::Storefront;

use crate::context::Context;
use crate::output::price_label;

const MENU: [&str; 11] = [
    "Browse games",
    "Search",
    "Filter",
    "Reset filters",
    "Add to cart",
    "Toggle favorite",
    "Favorites",
    "Cart",
    "Checkout",
    "Orders",
    "Quit",
];

/// Run the interactive shop until the user quits.
pub async fn run(ctx: &Context) -> Result<()> {
    let mut shop = ctx.open_catalog().await?;
    match shop.current_user() {
        Some(user) => ctx.output.info(&format!("Welcome back, {}", user.username)),
        None => ctx.output.info("Browsing as guest. You will be asked to log in at checkout."),
    }

    loop {
        let prompt = format!(
            "{} shown, {} in cart",
            shop.visible_games().len(),
            shop.cart_count()
        );
        let choice = Select::new()
            .with_prompt(prompt)
            .items(&MENU)
            .default(0)
            .interact()?;

        let step = match MENU[choice] {
            "Browse games" => {
                browse(&shop, ctx);
                Ok(())
            }
            "Search" => search(&mut shop),
            "Filter" => filter(&mut shop),
            "Reset filters" => {
                shop.reset_filters();
                Ok(())
            }
            "Add to cart" => add_to_cart(&mut shop, ctx),
            "Toggle favorite" => toggle_favorite(&mut shop, ctx),
            "Favorites" => {
                let favorites = shop.favorite_games();
                if favorites.is_empty() {
                    ctx.output.info("No favorites yet.");
                } else {
                    ctx.output.games_table(&favorites);
                }
                Ok(())
            }
            "Cart" => cart(&mut shop, ctx),
            "Checkout" => checkout(&mut shop, ctx),
            "Orders" => shop
                .my_orders()
                .map(|orders| super::orders::print_orders(&orders, ctx))
                .map_err(Into::into),
            _ => break,
        };

        // A failed step is reported and the session carries on.
        if let Err(e) = step {
            ctx.output.error(&format!("{:#}", e));
        }
    }
    Ok(())
}

fn browse(shop: &Storefront, ctx: &Context) {
    let games: Vec<&Game> = shop.visible_games().iter().collect();
    if games.is_empty() {
        ctx.output.info("No games match the filter.");
        return;
    }
    ctx.output.games_table(&games);
}

fn search(shop: &mut Storefront) -> Result<()> {
    let text: String = Input::new()
        .with_prompt("Name contains")
        .allow_empty(true)
        .with_initial_text(shop.query().search.clone())
        .interact_text()?;
    shop.set_search(&text);
    Ok(())
}

fn filter(shop: &mut Storefront) -> Result<()> {
    let names: Vec<String> = shop.genres().iter().map(|g| g.name.clone()).collect();
    if !names.is_empty() {
        let selected: Vec<bool> = names
            .iter()
            .map(|n| shop.query().genres.contains(n))
            .collect();
        let picked = MultiSelect::new()
            .with_prompt("Genres (all must match)")
            .items(&names)
            .defaults(&selected)
            .interact()?;
        shop.set_genres(picked.into_iter().map(|i| names[i].clone()))?;
    }

    let price = shop.query().price;
    let min: i64 = Input::new()
        .with_prompt("Min price")
        .default(price.min)
        .interact_text()?;
    let max: i64 = Input::new()
        .with_prompt("Max price")
        .default(price.max)
        .interact_text()?;
    shop.set_price_range(min, max);

    let players: i64 = Input::new()
        .with_prompt("Players (0 for any)")
        .default(shop.query().players)
        .interact_text()?;
    shop.set_players(players);

    let labels: Vec<&str> = PlayTimeBucket::ALL.iter().map(|b| b.label()).collect();
    let selected: Vec<bool> = PlayTimeBucket::ALL
        .iter()
        .map(|b| shop.query().play_times.contains(b))
        .collect();
    let picked = MultiSelect::new()
        .with_prompt("Play time (any may match)")
        .items(&labels)
        .defaults(&selected)
        .interact()?;
    for (i, bucket) in PlayTimeBucket::ALL.iter().enumerate() {
        shop.set_play_time(*bucket, picked.contains(&i));
    }

    let mut ages: Vec<String> = vec!["any".to_string()];
    ages.extend(AGE_STEPS.iter().map(|a| format!("{}+", a)));
    let current = shop
        .query()
        .age
        .and_then(|a| AGE_STEPS.iter().position(|s| *s == a))
        .map(|i| i + 1)
        .unwrap_or(0);
    let age = Select::new()
        .with_prompt("Age")
        .items(&ages)
        .default(current)
        .interact()?;
    shop.set_age(age.checked_sub(1).map(|i| AGE_STEPS[i]));
    Ok(())
}

fn pick_game(shop: &Storefront, prompt: &str) -> Result<Option<GameId>> {
    let games = shop.visible_games();
    if games.is_empty() {
        return Ok(None);
    }
    let items: Vec<String> = games
        .iter()
        .map(|g| format!("{}  {}", g.name, price_label(g)))
        .collect();
    let choice = Select::new()
        .with_prompt(prompt)
        .items(&items)
        .default(0)
        .interact_opt()?;
    Ok(choice.map(|i| games[i].id))
}

fn add_to_cart(shop: &mut Storefront, ctx: &Context) -> Result<()> {
    let Some(id) = pick_game(shop, "Add to cart (Esc to cancel)")? else {
        return Ok(());
    };
    let quantity = shop.add_to_cart(id)?;
    ctx.output.success(&format!("In cart: {}", quantity));
    Ok(())
}

fn toggle_favorite(shop: &mut Storefront, ctx: &Context) -> Result<()> {
    let Some(id) = pick_game(shop, "Toggle favorite (Esc to cancel)")? else {
        return Ok(());
    };
    if shop.toggle_favorite(id) {
        ctx.output.success("Added to favorites");
    } else {
        ctx.output.info("Removed from favorites");
    }
    Ok(())
}

fn cart(shop: &mut Storefront, ctx: &Context) -> Result<()> {
    loop {
        if shop.cart().is_empty() {
            ctx.output.info("Cart is empty.");
            return Ok(());
        }

        let pricing = shop.cart_pricing()?;
        ctx.output.header("Cart");
        for line in &pricing.line_items {
            ctx.output.kv(
                &line.name,
                &format!("{} x {} = {}", line.quantity, line.unit_price, line.total),
            );
        }
        if pricing.has_savings() {
            ctx.output.kv("You save", &pricing.savings.to_string());
        }
        ctx.output.kv("Total", &pricing.grand_total.to_string());

        let mut items: Vec<String> = pricing
            .line_items
            .iter()
            .map(|l| format!("{} ({})", l.name, l.quantity))
            .collect();
        items.push("Back".to_string());
        let choice = Select::new()
            .with_prompt("Change line")
            .items(&items)
            .default(items.len() - 1)
            .interact()?;
        let Some(line) = pricing.line_items.get(choice) else {
            return Ok(());
        };

        let action = Select::new()
            .with_prompt(&line.name)
            .items(&["+1", "-1", "Remove"])
            .default(0)
            .interact()?;
        match action {
            0 => {
                shop.increment(line.game_id)?;
            }
            1 => {
                shop.decrement(line.game_id)?;
            }
            _ => {
                shop.remove_from_cart(line.game_id);
            }
        }
    }
}

fn checkout(shop: &mut Storefront, ctx: &Context) -> Result<()> {
    if shop.current_user().is_none() {
        ctx.output.info("Log in to check out.");
        let login: String = Input::new().with_prompt("Username or email").interact_text()?;
        let password = Password::new().with_prompt("Password").interact()?;
        shop.login(&login, &password)?;
        ctx.save_session(shop)?;
    }

    let pricing = shop.cart_pricing()?;
    let confirmed = Confirm::new()
        .with_prompt(format!(
            "Place order for {} item(s), {}?",
            pricing.item_count, pricing.grand_total
        ))
        .default(true)
        .interact()?;
    if !confirmed {
        return Ok(());
    }

    let order = shop.checkout()?;
    ctx.output
        .success(&format!("Order #{} placed, total {}", order.id, order.total));
    Ok(())
}
