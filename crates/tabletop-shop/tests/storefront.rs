//! End-to-end storefront flows over file and in-memory databases.

use tabletop_shop::prelude::*;
use tempfile::TempDir;

fn form(name: &str, price: i64, genres: &[&str], players: (i64, i64), minutes: i64, age: i64) -> NewGame {
    NewGame {
        name: name.to_string(),
        author_name: "Uwe Rosenberg".to_string(),
        author_country: "Germany".to_string(),
        min_players: players.0,
        max_players: players.1,
        play_time_min: minutes,
        min_age: age,
        price: Money::from_major(price, Currency::CZK),
        genres: genres.iter().map(|g| g.to_string()).collect(),
        image_path: String::new(),
    }
}

/// A shop with four games, logged in as the seeded admin.
fn stocked(settings: ShopSettings) -> Storefront {
    let mut shop = Storefront::open(settings).unwrap();
    shop.login("admin", "admin123").unwrap();
    shop.add_game(&form("Agricola", 1290, &["Strategy", "Farming"], (1, 4), 120, 12))
        .unwrap();
    shop.add_game(&form("Patchwork", 450, &["Abstract"], (2, 2), 30, 8))
        .unwrap();
    shop.add_game(&form("Caverna", 1590, &["Strategy"], (1, 7), 180, 12))
        .unwrap();
    shop.add_game(&form("Cottage Garden", 690, &["Family", "Abstract"], (1, 4), 45, 8))
        .unwrap();
    shop.logout().unwrap();
    shop
}

fn names(shop: &Storefront) -> Vec<&str> {
    shop.visible_games().iter().map(|g| g.name.as_str()).collect()
}

#[tokio::test]
async fn refresh_loads_catalog_from_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("shop.db");
    drop(stocked(ShopSettings::new(&path)));

    let mut shop = Storefront::open(ShopSettings::new(&path)).unwrap();
    assert!(shop.games().is_empty());
    shop.refresh().await.unwrap();

    assert_eq!(
        names(&shop),
        vec!["Agricola", "Caverna", "Cottage Garden", "Patchwork"]
    );
    let genres: Vec<_> = shop.genres().iter().map(|g| g.name.as_str()).collect();
    assert_eq!(genres, vec!["Abstract", "Family", "Farming", "Strategy"]);
}

#[tokio::test]
async fn refresh_in_memory_loads_inline() {
    let mut shop = stocked(ShopSettings::in_memory());
    shop.refresh().await.unwrap();
    assert_eq!(shop.games().len(), 4);
}

#[test]
fn facets_combine() {
    let mut shop = stocked(ShopSettings::in_memory());

    shop.set_search("  COT ");
    assert_eq!(names(&shop), vec!["Cottage Garden"]);
    shop.set_search("");

    shop.set_genres(["Strategy"]).unwrap();
    assert_eq!(names(&shop), vec!["Agricola", "Caverna"]);

    shop.set_players(5);
    assert_eq!(names(&shop), vec!["Caverna"]);
    shop.set_players(0);

    shop.set_play_time(PlayTimeBucket::UpTo120, true);
    assert_eq!(names(&shop), vec!["Agricola"]);

    shop.reset_filters();
    assert_eq!(shop.visible_games().len(), 4);

    shop.set_genres(["Abstract", "Family"]).unwrap();
    assert_eq!(names(&shop), vec!["Cottage Garden"]);

    // unknown genres are ignored
    shop.set_genres(["Nope"]).unwrap();
    assert_eq!(shop.visible_games().len(), 4);
    shop.reset_filters();

    shop.set_price_range(500, 1300);
    assert_eq!(names(&shop), vec!["Agricola", "Cottage Garden"]);
    shop.reset_filters();

    shop.set_age(Some(10));
    assert_eq!(names(&shop), vec!["Agricola", "Caverna"]);
    shop.set_age(Some(4));
    assert_eq!(names(&shop), vec!["Cottage Garden", "Patchwork"]);
}

#[test]
fn too_many_genres_is_rejected() {
    let mut shop = stocked(ShopSettings::in_memory());
    let err = shop
        .set_genres(["a", "b", "c", "d", "e", "f"])
        .unwrap_err();
    assert!(matches!(
        err,
        ShopError::Commerce(CommerceError::TooManyGenres { max: 5, got: 6 })
    ));
}

#[test]
fn favorites_follow_catalog_order() {
    let mut shop = stocked(ShopSettings::in_memory());
    let patchwork = shop.games()[3].id;
    let agricola = shop.games()[0].id;
    shop.toggle_favorite(patchwork);
    shop.toggle_favorite(agricola);

    let favorites: Vec<_> = shop.favorite_games().iter().map(|g| g.name.as_str()).collect();
    assert_eq!(favorites, vec!["Agricola", "Patchwork"]);
}

#[test]
fn checkout_requires_login_and_clears_cart() {
    let mut shop = stocked(ShopSettings::in_memory());
    let agricola = shop.games()[0].id;
    let patchwork = shop.games()[3].id;

    assert_eq!(shop.add_to_cart(agricola).unwrap(), 1);
    assert_eq!(shop.add_to_cart(agricola).unwrap(), 2);
    shop.add_to_cart(patchwork).unwrap();
    assert_eq!(shop.cart_count(), 3);
    assert_eq!(shop.decrement(patchwork).unwrap(), 0);
    assert_eq!(shop.increment(agricola).unwrap(), 3);
    assert_eq!(shop.decrement(agricola).unwrap(), 2);

    let pricing = shop.cart_pricing().unwrap();
    assert_eq!(pricing.grand_total, Money::from_major(2580, Currency::CZK));

    let err = shop.checkout().unwrap_err();
    assert!(err.is_permission_error());
    assert_eq!(shop.cart_count(), 2);

    shop.register("zoe", Some("zoe@example.com"), "secret1").unwrap();
    assert!(!shop.is_admin());
    let order = shop.checkout().unwrap();
    assert_eq!(order.total, Money::from_major(2580, Currency::CZK));
    assert_eq!(order.status, OrderStatus::New);
    assert!(shop.cart().is_empty());

    let orders = shop.my_orders().unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].lines[0].game_name, "Agricola");
    assert_eq!(orders[0].lines[0].quantity, 2);
}

#[test]
fn empty_cart_checkout_fails() {
    let mut shop = stocked(ShopSettings::in_memory());
    shop.register("yan", None, "secret1").unwrap();
    assert!(matches!(
        shop.checkout(),
        Err(ShopError::Commerce(CommerceError::EmptyCart))
    ));
}

#[test]
fn admin_operations_are_gated() {
    let mut shop = stocked(ShopSettings::in_memory());
    assert!(shop.price_sheet().unwrap_err().is_permission_error());

    shop.register("xena", None, "secret1").unwrap();
    let err = shop
        .add_game(&form("Fields of Arle", 1490, &[], (1, 2), 120, 12))
        .unwrap_err();
    assert!(matches!(
        err,
        ShopError::Auth(AuthError::InsufficientPermissions)
    ));
    assert_eq!(shop.games().len(), 4);
}

#[test]
fn price_sheet_save_reports_changes() {
    let mut shop = stocked(ShopSettings::in_memory());
    shop.login("admin", "admin123").unwrap();

    let mut sheet = shop.price_sheet().unwrap();
    assert_eq!(shop.save_prices(&mut sheet).unwrap(), "No changes");

    let patchwork = shop.games()[3].id;
    sheet
        .set_price(patchwork, Money::from_major(399, Currency::CZK))
        .unwrap();
    assert_eq!(shop.save_prices(&mut sheet).unwrap(), "Saved changes: 1");
    assert!(!sheet.has_changes());
    assert_eq!(
        shop.game(patchwork).unwrap().price,
        Money::from_major(399, Currency::CZK)
    );
}

#[test]
fn discount_lowers_effective_price() {
    let mut shop = stocked(ShopSettings::in_memory());
    shop.login("admin", "admin123").unwrap();
    let caverna = shop.games()[1].id;

    shop.add_discount(caverna, 10.0, 7).unwrap();
    let game = shop.game(caverna).unwrap();
    assert!(game.is_on_sale());
    assert_eq!(game.effective_price(), Money::from_major(1431, Currency::CZK));

    shop.add_to_cart(caverna).unwrap();
    let pricing = shop.cart_pricing().unwrap();
    assert_eq!(pricing.savings, Money::from_major(159, Currency::CZK));

    assert!(shop.add_discount(caverna, 95.0, 7).is_err());
}

#[test]
fn discount_window_out_of_range_is_rejected() {
    let mut shop = stocked(ShopSettings::in_memory());
    shop.login("admin", "admin123").unwrap();
    let patchwork = shop.games()[3].id;

    let err = shop.add_discount(patchwork, 10.0, 1_000_000_000).unwrap_err();
    assert!(matches!(
        err,
        ShopError::Commerce(CommerceError::ValidationError(_))
    ));
    assert!(!shop.game(patchwork).unwrap().is_on_sale());
}

#[test]
fn session_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("shop.db");

    let token = {
        let mut shop = Storefront::open(ShopSettings::new(&path)).unwrap();
        shop.register("walt", None, "secret1").unwrap();
        shop.session_token().cloned().unwrap()
    };

    let mut shop = Storefront::open(ShopSettings::new(&path)).unwrap();
    let user = shop.resume(&token).unwrap();
    assert_eq!(user.username, "walt");
    assert_eq!(shop.current_user().map(|u| u.role), Some(Role::Customer));
}
