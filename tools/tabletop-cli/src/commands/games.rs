//! Catalog browsing commands.

use anyhow::{anyhow, Result};
use tabletop_commerce::GameId;

use super::{GameArgs, GamesArgs};
use crate::context::Context;
use crate::output::price_label;

/// List games passing the filter flags.
pub async fn run(args: GamesArgs, ctx: &Context) -> Result<()> {
    let mut shop = ctx.open_catalog().await?;
    shop.set_query(args.filter.to_query()?);

    let mut games: Vec<_> = shop.visible_games().iter().collect();
    let matched = games.len();
    if let Some(limit) = args.limit {
        games.truncate(limit);
    }

    if ctx.output.is_json() {
        ctx.output.json(&games);
        return Ok(());
    }

    if games.is_empty() {
        ctx.output.info("No games match the filter.");
        return Ok(());
    }

    ctx.output.header(&format!("Games ({} of {})", matched, shop.games().len()));
    ctx.output.games_table(&games);
    Ok(())
}

/// Show one game.
pub async fn show(args: GameArgs, ctx: &Context) -> Result<()> {
    let shop = ctx.open_catalog().await?;
    let game = shop
        .game(GameId::new(args.id))
        .ok_or_else(|| anyhow!("Game {} not found", args.id))?;

    if ctx.output.is_json() {
        ctx.output.json(game);
        return Ok(());
    }

    ctx.output.header(&game.name);
    ctx.output.kv("id", &game.id.to_string());
    ctx.output
        .kv("author", game.author_name.as_deref().unwrap_or("unknown"));
    if !game.genre_names.is_empty() {
        ctx.output.kv("genres", &game.genre_names.join(", "));
    }
    ctx.output.kv("price", &price_label(game));
    if game.is_on_sale() {
        ctx.output.kv("list price", &game.price.to_string());
    }
    ctx.output.kv("players", &game.players_label());
    ctx.output
        .kv("play time", &format!("{} min", game.play_time_min));
    ctx.output.kv("age", &format!("{}+", game.min_age));
    ctx.output.kv("stock", &game.stock.to_string());
    if let Some(image) = &game.image_path {
        ctx.output.kv("image", image);
    }
    Ok(())
}

/// List genres.
pub async fn genres(ctx: &Context) -> Result<()> {
    let shop = ctx.open_catalog().await?;

    if ctx.output.is_json() {
        ctx.output.json(&shop.genres());
        return Ok(());
    }

    ctx.output.header("Genres");
    for genre in shop.genres() {
        let count = shop
            .games()
            .iter()
            .filter(|g| g.genre_ids.contains(&genre.id))
            .count();
        ctx.output
            .list_item(&format!("{} ({})", genre.name, count));
    }
    Ok(())
}
