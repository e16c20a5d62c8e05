//! The storefront: one user's view of the shop.
//!
//! Holds the loaded catalog, the active filter, favorites, the cart and
//! the logged-in user. Catalog loads can run off the caller's thread via
//! [`Storefront::refresh`]; everything else works on the local state or
//! makes a short synchronous database call.

use crate::settings::{DatabaseLocation, ShopSettings};
use crate::ShopError;
use chrono::{Duration, Utc};
use std::collections::BTreeSet;
use std::path::Path;
use tabletop_auth::{AuthService, AuthUser, Role, SessionToken};
use tabletop_commerce::admin::{NewGame, PriceSheet};
use tabletop_commerce::cart::{Cart, CartPricing};
use tabletop_commerce::catalog::{Game, Genre, PriceDiscount};
use tabletop_commerce::checkout::{NewOrder, Order};
use tabletop_commerce::search::{CatalogQuery, PlayTimeBucket, PriceRange};
use tabletop_commerce::store::{CatalogStore, OrderStore};
use tabletop_commerce::{CommerceError, Currency, DiscountId, GameId};
use tabletop_db::{schema, Db, DbOptions};

/// Games and genres read in one go.
#[derive(Debug, Clone, Default)]
pub struct CatalogSnapshot {
    pub games: Vec<Game>,
    pub genres: Vec<Genre>,
}

impl CatalogSnapshot {
    /// Read the active catalog with prices as of now.
    pub fn load(db: &Db, currency: Currency) -> Result<Self, ShopError> {
        let store = CatalogStore::new(db, currency);
        let games = store.active_games(Utc::now().naive_utc())?;
        let genres = store.genres()?;
        Ok(Self { games, genres })
    }
}

/// Storefront state over one database connection.
pub struct Storefront {
    db: Db,
    settings: ShopSettings,
    auth: AuthService,
    catalog: CatalogSnapshot,
    query: CatalogQuery,
    visible: Vec<Game>,
    favorites: BTreeSet<GameId>,
    cart: Cart,
}

impl Storefront {
    /// Open the database, create the schema and seed the admin account.
    ///
    /// The catalog starts empty; call [`Storefront::refresh`] to load it.
    pub fn open(settings: ShopSettings) -> Result<Self, ShopError> {
        let db = match &settings.database {
            DatabaseLocation::File(path) => Db::open_with(path, &settings.db_options)?,
            DatabaseLocation::InMemory => Db::open_in_memory()?,
        };
        schema::ensure_schema(&db)?;

        let auth = AuthService::new(settings.auth.clone());
        if let Some(seed) = &settings.admin_seed {
            if auth.ensure_admin_seed(&db, &seed.username, &seed.email, &seed.password)? {
                tracing::info!(username = %seed.username, "admin account seeded");
            }
        }

        tracing::debug!(database = ?settings.database, "storefront opened");
        Ok(Self {
            db,
            cart: Cart::new(settings.currency),
            settings,
            auth,
            catalog: CatalogSnapshot::default(),
            query: CatalogQuery::new(),
            visible: Vec::new(),
            favorites: BTreeSet::new(),
        })
    }

    pub fn settings(&self) -> &ShopSettings {
        &self.settings
    }

    pub fn currency(&self) -> Currency {
        self.settings.currency
    }

    // ---- Catalog -------------------------------------------------------

    /// Reload games and genres on a blocking worker, then re-apply the
    /// filter.
    ///
    /// File databases are read through a second connection so the
    /// storefront's own connection never leaves this task. In-memory
    /// databases are private to their connection and load inline.
    pub async fn refresh(&mut self) -> Result<(), ShopError> {
        let currency = self.settings.currency;
        let snapshot = match self.db.path().map(Path::to_path_buf) {
            Some(path) => {
                let options: DbOptions = self.settings.db_options.clone();
                tokio::task::spawn_blocking(move || {
                    let db = Db::open_with(&path, &options)?;
                    CatalogSnapshot::load(&db, currency)
                })
                .await
                .map_err(|e| ShopError::Background(e.to_string()))??
            }
            None => CatalogSnapshot::load(&self.db, currency)?,
        };
        self.install(snapshot);
        Ok(())
    }

    /// Reload games and genres on the current thread.
    pub fn refresh_blocking(&mut self) -> Result<(), ShopError> {
        let snapshot = CatalogSnapshot::load(&self.db, self.settings.currency)?;
        self.install(snapshot);
        Ok(())
    }

    fn install(&mut self, snapshot: CatalogSnapshot) {
        tracing::debug!(
            games = snapshot.games.len(),
            genres = snapshot.genres.len(),
            "catalog loaded"
        );
        self.catalog = snapshot;
        self.apply_filters();
    }

    fn apply_filters(&mut self) {
        self.visible = self.query.apply(&self.catalog.games, &self.catalog.genres);
    }

    /// Every active game, in catalog order.
    pub fn games(&self) -> &[Game] {
        &self.catalog.games
    }

    /// Games passing the current filter, in catalog order.
    pub fn visible_games(&self) -> &[Game] {
        &self.visible
    }

    pub fn genres(&self) -> &[Genre] {
        &self.catalog.genres
    }

    pub fn game(&self, id: GameId) -> Option<&Game> {
        self.catalog.games.iter().find(|g| g.id == id)
    }

    pub fn query(&self) -> &CatalogQuery {
        &self.query
    }

    /// Replace the whole filter.
    pub fn set_query(&mut self, query: CatalogQuery) {
        self.query = query;
        self.apply_filters();
    }

    pub fn set_search(&mut self, text: &str) {
        self.query.set_search(text);
        self.apply_filters();
    }

    pub fn set_genres<I, S>(&mut self, names: I) -> Result<(), ShopError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.query.set_genres(names)?;
        self.apply_filters();
        Ok(())
    }

    /// Price bounds in whole currency units.
    pub fn set_price_range(&mut self, min: i64, max: i64) {
        self.query.price = PriceRange::new(min, max);
        self.apply_filters();
    }

    /// `0` clears the player count facet.
    pub fn set_players(&mut self, players: i64) {
        self.query.players = players;
        self.apply_filters();
    }

    pub fn set_play_time(&mut self, bucket: PlayTimeBucket, on: bool) {
        self.query.toggle_play_time(bucket, on);
        self.apply_filters();
    }

    pub fn set_age(&mut self, age: Option<i64>) {
        self.query.age = age;
        self.apply_filters();
    }

    pub fn reset_filters(&mut self) {
        self.query.reset();
        self.apply_filters();
    }

    // ---- Favorites -----------------------------------------------------

    /// Flip a game's favorite mark. Returns whether it is now a favorite.
    pub fn toggle_favorite(&mut self, id: GameId) -> bool {
        if self.favorites.remove(&id) {
            false
        } else {
            self.favorites.insert(id);
            true
        }
    }

    pub fn is_favorite(&self, id: GameId) -> bool {
        self.favorites.contains(&id)
    }

    /// Favorite games still in the catalog, in catalog order.
    pub fn favorite_games(&self) -> Vec<&Game> {
        self.catalog
            .games
            .iter()
            .filter(|g| self.favorites.contains(&g.id))
            .collect()
    }

    // ---- Cart ----------------------------------------------------------

    /// Add one copy of a catalog game. Returns the new line quantity.
    pub fn add_to_cart(&mut self, id: GameId) -> Result<i64, ShopError> {
        let game = self
            .catalog
            .games
            .iter()
            .find(|g| g.id == id)
            .ok_or(CommerceError::GameNotFound(id.get()))?;
        Ok(self.cart.add_game(game)?)
    }

    pub fn increment(&mut self, id: GameId) -> Result<i64, ShopError> {
        Ok(self.cart.increment(id)?)
    }

    /// Returns the new quantity, `0` once the line is gone.
    pub fn decrement(&mut self, id: GameId) -> Result<i64, ShopError> {
        Ok(self.cart.decrement(id)?)
    }

    pub fn remove_from_cart(&mut self, id: GameId) -> bool {
        self.cart.remove(id)
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Total number of copies in the cart.
    pub fn cart_count(&self) -> i64 {
        self.cart.item_count()
    }

    pub fn cart_pricing(&self) -> Result<CartPricing, ShopError> {
        Ok(self.cart.calculate_pricing()?)
    }

    /// Turn the cart into an order for the logged-in user and empty it.
    pub fn checkout(&mut self) -> Result<Order, ShopError> {
        let user_id = self.auth.require_user()?.id;
        let new_order = NewOrder::from_cart(user_id, &self.cart)?;
        let order = OrderStore::new(&self.db, self.settings.currency).place_order(&new_order)?;
        self.cart.clear();
        tracing::info!(order_id = %order.id, total = %order.total, "checkout complete");
        Ok(order)
    }

    /// Orders of the logged-in user, newest first.
    pub fn my_orders(&self) -> Result<Vec<Order>, ShopError> {
        let user_id = self.auth.require_user()?.id;
        Ok(OrderStore::new(&self.db, self.settings.currency).orders_for_user(user_id)?)
    }

    // ---- Auth ----------------------------------------------------------

    pub fn login(&mut self, login: &str, password: &str) -> Result<AuthUser, ShopError> {
        Ok(self.auth.login(&self.db, login, password)?)
    }

    /// Register a customer account and log into it.
    pub fn register(
        &mut self,
        username: &str,
        email: Option<&str>,
        password: &str,
    ) -> Result<AuthUser, ShopError> {
        Ok(self
            .auth
            .register(&self.db, username, email, password, Role::Customer)?)
    }

    pub fn logout(&mut self) -> Result<(), ShopError> {
        Ok(self.auth.logout(&self.db)?)
    }

    /// Pick up a session saved by an earlier run.
    pub fn resume(&mut self, token: &SessionToken) -> Result<AuthUser, ShopError> {
        Ok(self.auth.resume(&self.db, token)?)
    }

    pub fn current_user(&self) -> Option<&AuthUser> {
        self.auth.current_user()
    }

    pub fn session_token(&self) -> Option<&SessionToken> {
        self.auth.session_token()
    }

    pub fn is_admin(&self) -> bool {
        self.auth.is_admin()
    }

    // ---- Admin ---------------------------------------------------------

    /// Validate and store a new game, then reload the catalog.
    pub fn add_game(&mut self, game: &NewGame) -> Result<GameId, ShopError> {
        self.auth.require_admin()?;
        let validated = game.validate()?;
        let id = CatalogStore::new(&self.db, self.settings.currency).add_game(&validated)?;
        self.refresh_blocking()?;
        Ok(id)
    }

    /// Editable list prices of all active games.
    pub fn price_sheet(&self) -> Result<PriceSheet, ShopError> {
        self.auth.require_admin()?;
        Ok(CatalogStore::new(&self.db, self.settings.currency).price_sheet()?)
    }

    /// Persist edited prices. Returns the status line shown to the admin.
    pub fn save_prices(&mut self, sheet: &mut PriceSheet) -> Result<String, ShopError> {
        self.auth.require_admin()?;
        if !sheet.has_changes() {
            return Ok("No changes".to_string());
        }
        let saved = CatalogStore::new(&self.db, self.settings.currency).save_prices(sheet)?;
        sheet.mark_saved();
        self.refresh_blocking()?;
        Ok(format!("Saved changes: {}", saved))
    }

    /// Put a game on sale from now for `days` days.
    pub fn add_discount(
        &mut self,
        game_id: GameId,
        percent: f64,
        days: i64,
    ) -> Result<DiscountId, ShopError> {
        self.auth.require_admin()?;
        let starts_at = Utc::now().naive_utc();
        let ends_at = Duration::try_days(days.max(0))
            .and_then(|window| starts_at.checked_add_signed(window))
            .ok_or_else(|| CommerceError::validation("discount window out of range"))?;
        let discount = PriceDiscount {
            id: DiscountId::new(0),
            game_id,
            percent,
            starts_at,
            ends_at,
            is_active: true,
        };
        let id = CatalogStore::new(&self.db, self.settings.currency).add_discount(&discount)?;
        self.refresh_blocking()?;
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open() -> Storefront {
        Storefront::open(ShopSettings::in_memory()).unwrap()
    }

    #[test]
    fn test_open_seeds_admin() {
        let mut shop = open();
        assert!(shop.current_user().is_none());
        shop.login("admin", "admin123").unwrap();
        assert!(shop.is_admin());
    }

    #[test]
    fn test_open_without_seed() {
        let mut shop = Storefront::open(ShopSettings::in_memory().with_admin_seed(None)).unwrap();
        assert!(shop.login("admin", "admin123").is_err());
    }

    #[test]
    fn test_toggle_favorite() {
        let mut shop = open();
        let id = GameId::new(7);
        assert!(shop.toggle_favorite(id));
        assert!(shop.is_favorite(id));
        assert!(!shop.toggle_favorite(id));
        assert!(!shop.is_favorite(id));
    }

    #[test]
    fn test_add_unknown_game_to_cart() {
        let mut shop = open();
        assert!(matches!(
            shop.add_to_cart(GameId::new(99)),
            Err(ShopError::Commerce(CommerceError::GameNotFound(99)))
        ));
        assert_eq!(shop.cart_count(), 0);
    }
}
