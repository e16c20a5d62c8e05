//! Admin commands: catalog entry, prices and discounts.

use anyhow::{anyhow, bail, Result};
use dialoguer::{Confirm, Input, Select};
use tabletop_commerce::admin::{NewGame, PriceSheet};
use tabletop_commerce::{Currency, GameId, Money};
use tabletop_shop::Storefront;

use super::{AddGameArgs, AdminArgs, AdminCommand};
use crate::context::Context;

/// Run the admin command.
pub async fn run(args: AdminArgs, ctx: &Context) -> Result<()> {
    let mut shop = ctx.open_shop()?;
    if !shop.is_admin() {
        bail!("Admin login required. Run `tabletop login admin` first.");
    }

    match args.command {
        AdminCommand::AddGame(form) => add_game(form, &mut shop, ctx),
        AdminCommand::Prices { search, edit } => prices(search.as_deref(), edit, &mut shop, ctx),
        AdminCommand::SetPrice { id, price } => set_price(id, &price, &mut shop, ctx),
        AdminCommand::Discount { id, percent, days } => {
            let discount = shop.add_discount(GameId::new(id), percent, days)?;
            ctx.output.success(&format!(
                "Discount {} added: {}% off game {} for {} day(s)",
                discount, percent, id, days
            ));
            Ok(())
        }
    }
}

fn add_game(args: AddGameArgs, shop: &mut Storefront, ctx: &Context) -> Result<()> {
    let form = collect_form(args, shop.currency())?;
    let id = shop.add_game(&form)?;

    if ctx.output.is_json() {
        ctx.output.json(&shop.game(id));
    } else {
        ctx.output
            .success(&format!("Added {} (id {})", form.name, id));
    }
    Ok(())
}

/// Fill the form from flags, prompting for whatever is missing unless
/// `--yes` was given.
fn collect_form(args: AddGameArgs, currency: Currency) -> Result<NewGame> {
    let interactive = !args.yes;
    let text = |value: Option<String>, prompt: &str, required: bool| -> Result<String> {
        match value {
            Some(v) => Ok(v),
            None if interactive => Ok(Input::<String>::new()
                .with_prompt(prompt)
                .allow_empty(!required)
                .interact_text()?),
            None if required => bail!("--{} is required", prompt.to_lowercase()),
            None => Ok(String::new()),
        }
    };
    let number = |value: Option<i64>, prompt: &str, default: i64| -> Result<i64> {
        match value {
            Some(v) => Ok(v),
            None if interactive => Ok(Input::<i64>::new()
                .with_prompt(prompt)
                .default(default)
                .interact_text()?),
            None => Ok(default),
        }
    };

    let name = text(args.name, "Name", true)?;
    let author_name = text(args.author, "Author", false)?;
    let author_country = text(args.country, "Country", false)?;
    let min_players = number(args.min_players, "Min players", 1)?;
    let max_players = number(args.max_players, "Max players", min_players.max(4))?;
    let play_time_min = number(args.time, "Play time (min)", 60)?;
    let min_age = number(args.age, "Min age", 8)?;
    let price_text = text(args.price, "Price", true)?;
    let price = Money::parse(&price_text, currency)
        .ok_or_else(|| anyhow!("Invalid price: {}", price_text))?;

    let genres = if args.genres.is_empty() && interactive {
        text(None, "Genres (comma separated)", false)?
            .split(',')
            .map(|g| g.trim().to_string())
            .filter(|g| !g.is_empty())
            .collect()
    } else {
        args.genres
    };
    let image_path = text(args.image, "Image path", false)?;

    Ok(NewGame {
        name,
        author_name,
        author_country,
        min_players,
        max_players,
        play_time_min,
        min_age,
        price,
        genres,
        image_path,
    })
}

fn prices(search: Option<&str>, edit: bool, shop: &mut Storefront, ctx: &Context) -> Result<()> {
    let mut sheet = shop.price_sheet()?;
    let filter = search.unwrap_or("");

    if ctx.output.is_json() {
        ctx.output.json(&sheet.search(filter));
        return Ok(());
    }

    print_sheet(&sheet, filter, ctx);
    if !edit {
        return Ok(());
    }

    loop {
        let rows: Vec<(GameId, String)> = sheet
            .search(filter)
            .iter()
            .map(|row| {
                let marker = if row.is_changed() { " *" } else { "" };
                (row.game_id, format!("{}  {}{}", row.name, row.price, marker))
            })
            .collect();
        if rows.is_empty() {
            ctx.output.info("No games match.");
            return Ok(());
        }

        let mut items: Vec<&str> = rows.iter().map(|(_, label)| label.as_str()).collect();
        items.push("Done");
        let choice = Select::new()
            .with_prompt("Edit price of")
            .items(&items)
            .default(0)
            .interact()?;
        let Some((game_id, _)) = rows.get(choice) else {
            break;
        };

        let input: String = Input::new().with_prompt("New price").interact_text()?;
        match Money::parse(&input, shop.currency()) {
            Some(price) => {
                if let Err(e) = sheet.set_price(*game_id, price) {
                    ctx.output.warn(&e.to_string());
                }
            }
            None => ctx.output.warn(&format!("Invalid price: {}", input)),
        }
    }

    if !sheet.has_changes() {
        ctx.output.info("No changes");
        return Ok(());
    }
    let save = Confirm::new()
        .with_prompt(format!("Save {} change(s)?", sheet.changed().len()))
        .default(true)
        .interact()?;
    if save {
        let status = shop.save_prices(&mut sheet)?;
        ctx.output.success(&status);
    } else {
        ctx.output.warn("Changes discarded");
    }
    Ok(())
}

fn print_sheet(sheet: &PriceSheet, filter: &str, ctx: &Context) {
    ctx.output.header("Prices");
    let widths = [5, 28, 24, 14];
    ctx.output.table_row(&["ID", "NAME", "AUTHOR", "PRICE"], &widths);
    for row in sheet.search(filter) {
        ctx.output.table_row(
            &[
                &row.game_id.to_string(),
                &row.name,
                &row.author,
                &row.price.to_string(),
            ],
            &widths,
        );
    }
}

fn set_price(id: i64, price: &str, shop: &mut Storefront, ctx: &Context) -> Result<()> {
    let price = Money::parse(price, shop.currency())
        .ok_or_else(|| anyhow!("Invalid price: {}", price))?;
    let mut sheet = shop.price_sheet()?;
    sheet.set_price(GameId::new(id), price)?;
    let status = shop.save_prices(&mut sheet)?;
    ctx.output.success(&status);
    Ok(())
}
