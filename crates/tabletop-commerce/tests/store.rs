//! Catalog and order store tests against an in-memory database.

use chrono::{Duration, Utc};
use tabletop_commerce::prelude::*;
use tabletop_db::{params, schema, Db, Executor};

fn shop() -> Db {
    let db = Db::open_in_memory().unwrap();
    schema::ensure_schema(&db).unwrap();
    db
}

fn new_game(name: &str, price: i64, genres: &[&str]) -> NewGame {
    NewGame {
        name: name.to_string(),
        author_name: "Reiner Knizia".to_string(),
        author_country: "Germany".to_string(),
        min_players: 2,
        max_players: 4,
        play_time_min: 45,
        min_age: 10,
        price: Money::from_major(price, Currency::CZK),
        genres: genres.iter().map(|g| g.to_string()).collect(),
        image_path: String::new(),
    }
}

fn add(db: &Db, form: NewGame) -> GameId {
    CatalogStore::new(db, Currency::CZK)
        .add_game(&form.validate().unwrap())
        .unwrap()
}

fn user(db: &Db) -> UserId {
    let id = db
        .insert(
            "INSERT INTO users (username, password_hash, password_salt) VALUES (?, ?, ?)",
            params!["buyer", vec![1u8], vec![2u8]],
        )
        .unwrap();
    UserId::new(id)
}

#[test]
fn add_game_creates_author_and_genres() {
    let db = shop();
    let id = add(&db, new_game("Lost Cities", 399, &["Family", "Card"]));

    let store = CatalogStore::new(&db, Currency::CZK);
    let game = store.game(id).unwrap();
    assert_eq!(game.name, "Lost Cities");
    assert_eq!(game.author_name.as_deref(), Some("Reiner Knizia"));
    assert_eq!(game.stock, 0);
    assert!(game.is_active);
    assert_eq!(game.genre_names, vec!["Card", "Family"]);

    let primary = store.genre_id_by_name("Family").unwrap();
    assert_eq!(game.primary_genre_id, primary);

    // second game by the same author reuses the author row
    add(&db, new_game("Ra", 999, &["Family"]));
    assert_eq!(store.authors().unwrap().len(), 1);
    assert_eq!(store.genres().unwrap().len(), 2);
    assert_eq!(
        store.genre_names_for_game(id).unwrap(),
        vec!["Card".to_string(), "Family".to_string()]
    );
    assert_eq!(
        store.author_name(game.author_id.unwrap()).unwrap().as_deref(),
        Some("Reiner Knizia")
    );
}

#[test]
fn active_games_are_sorted_and_skip_inactive() {
    let db = shop();
    add(&db, new_game("Tigris", 899, &[]));
    let hidden = add(&db, new_game("Modern Art", 699, &[]));
    add(&db, new_game("Blue Moon", 499, &[]));
    db.execute("UPDATE games SET is_active = 0 WHERE id = ?", params![hidden])
        .unwrap();

    let games = CatalogStore::new(&db, Currency::CZK)
        .active_games(Utc::now().naive_utc())
        .unwrap();
    let names: Vec<_> = games.iter().map(|g| g.name.as_str()).collect();
    assert_eq!(names, vec!["Blue Moon", "Tigris"]);
}

#[test]
fn current_discount_sets_sale_price() {
    let db = shop();
    let id = add(&db, new_game("Samurai", 1000, &[]));
    let now = Utc::now().naive_utc();
    let store = CatalogStore::new(&db, Currency::CZK);

    store
        .add_discount(&PriceDiscount {
            id: DiscountId::new(0),
            game_id: id,
            percent: 20.0,
            starts_at: now - Duration::days(1),
            ends_at: now + Duration::days(1),
            is_active: true,
        })
        .unwrap();
    store
        .add_discount(&PriceDiscount {
            id: DiscountId::new(0),
            game_id: id,
            percent: 50.0,
            starts_at: now + Duration::days(5),
            ends_at: now + Duration::days(6),
            is_active: true,
        })
        .unwrap();

    let games = store.active_games(now).unwrap();
    assert_eq!(games[0].sale_price, Some(Money::from_major(800, Currency::CZK)));
    assert_eq!(games[0].effective_price().amount_cents, 80000);
}

#[test]
fn discount_for_unknown_game_is_rejected() {
    let db = shop();
    let now = Utc::now().naive_utc();
    let err = CatalogStore::new(&db, Currency::CZK)
        .add_discount(&PriceDiscount {
            id: DiscountId::new(0),
            game_id: GameId::new(42),
            percent: 10.0,
            starts_at: now,
            ends_at: now,
            is_active: true,
        })
        .unwrap_err();
    assert!(matches!(err, CommerceError::GameNotFound(42)));
}

#[test]
fn price_sheet_saves_only_changes() {
    let db = shop();
    let a = add(&db, new_game("Azul", 799, &[]));
    add(&db, new_game("Brass", 1499, &[]));
    db.execute("UPDATE games SET author_id = NULL WHERE id = ?", params![a])
        .unwrap();

    let store = CatalogStore::new(&db, Currency::CZK);
    let mut sheet = store.price_sheet().unwrap();
    assert_eq!(sheet.len(), 2);
    assert_eq!(sheet.rows[0].author, tabletop_commerce::admin::NO_AUTHOR);

    assert_eq!(store.save_prices(&sheet).unwrap(), 0);

    sheet.set_price(a, Money::from_major(599, Currency::CZK)).unwrap();
    assert_eq!(store.save_prices(&sheet).unwrap(), 1);
    sheet.mark_saved();

    let reloaded = store.game(a).unwrap();
    assert_eq!(reloaded.price.amount_cents, 59900);
}

#[test]
fn orders_roundtrip_newest_first() {
    let db = shop();
    let buyer = user(&db);
    let azul = CatalogStore::new(&db, Currency::CZK)
        .game(add(&db, new_game("Azul", 800, &[])))
        .unwrap();
    let brass = CatalogStore::new(&db, Currency::CZK)
        .game(add(&db, new_game("Brass", 1500, &[])))
        .unwrap();

    let orders = OrderStore::new(&db, Currency::CZK);

    let mut cart = Cart::default();
    cart.add_game(&azul).unwrap();
    let first = orders
        .place_order(&NewOrder::from_cart(buyer, &cart).unwrap())
        .unwrap();

    cart.add_game(&azul).unwrap();
    cart.add_game(&brass).unwrap();
    let second = orders
        .place_order(&NewOrder::from_cart(buyer, &cart).unwrap())
        .unwrap();
    assert_eq!(second.total.amount_cents, 2 * 80000 + 150000);

    let listed = orders.orders_for_user(buyer).unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].id, second.id);
    assert_eq!(listed[1].id, first.id);
    assert_eq!(listed[0].status, OrderStatus::New);
    assert_eq!(listed[0].lines.len(), 2);
    assert_eq!(listed[0].item_count(), 3);
    assert_eq!(listed[0].lines[1].game_name, "Brass");

    orders.set_status(first.id, OrderStatus::Completed).unwrap();
    let listed = orders.orders_for_user(buyer).unwrap();
    assert_eq!(listed[1].status, OrderStatus::Completed);
}

#[test]
fn order_lines_survive_game_deletion() {
    let db = shop();
    let buyer = user(&db);
    let id = add(&db, new_game("Ra", 999, &[]));
    let game = CatalogStore::new(&db, Currency::CZK).game(id).unwrap();

    let mut cart = Cart::default();
    cart.add_game(&game).unwrap();
    let orders = OrderStore::new(&db, Currency::CZK);
    orders
        .place_order(&NewOrder::from_cart(buyer, &cart).unwrap())
        .unwrap();

    db.execute("DELETE FROM games WHERE id = ?", params![id]).unwrap();

    let listed = orders.orders_for_user(buyer).unwrap();
    assert_eq!(listed[0].lines[0].game_id, None);
    assert_eq!(listed[0].lines[0].game_name, "Ra");
}
