//! Shop schema.
//!
//! Money is stored as integer minor units (`*_cents`). Timestamps are UTC
//! text in `YYYY-MM-DD HH:MM:SS` so they compare correctly against
//! `datetime('now')`.

use crate::{Db, DbError, Executor};

/// Current schema version, stored in `PRAGMA user_version`.
pub const SCHEMA_VERSION: i64 = 1;

/// Role id of administrators.
pub const ROLE_ADMIN: i64 = 1;
/// Role id of regular customers.
pub const ROLE_USER: i64 = 2;

const DDL: &str = r#"
CREATE TABLE IF NOT EXISTS genres (
  id   INTEGER PRIMARY KEY AUTOINCREMENT,
  name TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS authors (
  id      INTEGER PRIMARY KEY AUTOINCREMENT,
  name    TEXT NOT NULL UNIQUE,
  country TEXT
);

CREATE TABLE IF NOT EXISTS games (
  id            INTEGER PRIMARY KEY AUTOINCREMENT,
  name          TEXT NOT NULL,
  author_id     INTEGER NULL,
  genre_id      INTEGER NULL,
  price_cents   INTEGER NOT NULL CHECK (price_cents >= 0),
  min_players   INTEGER,
  max_players   INTEGER,
  min_age       INTEGER,
  play_time_min INTEGER,
  stock         INTEGER NOT NULL DEFAULT 0 CHECK (stock >= 0),
  is_active     INTEGER NOT NULL DEFAULT 1,
  image_path    TEXT,
  FOREIGN KEY (author_id) REFERENCES authors(id) ON DELETE SET NULL ON UPDATE CASCADE,
  FOREIGN KEY (genre_id)  REFERENCES genres(id)  ON DELETE SET NULL ON UPDATE CASCADE
);

CREATE TABLE IF NOT EXISTS game_genres (
  game_id  INTEGER NOT NULL,
  genre_id INTEGER NOT NULL,
  PRIMARY KEY (game_id, genre_id),
  FOREIGN KEY (game_id)  REFERENCES games(id)  ON DELETE CASCADE ON UPDATE CASCADE,
  FOREIGN KEY (genre_id) REFERENCES genres(id) ON DELETE CASCADE ON UPDATE CASCADE
);

CREATE TABLE IF NOT EXISTS roles (
  id   INTEGER PRIMARY KEY,
  name TEXT NOT NULL UNIQUE
);
INSERT OR IGNORE INTO roles (id, name) VALUES (1, 'Admin'), (2, 'User');

CREATE TABLE IF NOT EXISTS users (
  id            INTEGER PRIMARY KEY AUTOINCREMENT,
  username      TEXT NOT NULL UNIQUE,
  email         TEXT UNIQUE,
  role_id       INTEGER NOT NULL DEFAULT 2,
  password_hash BLOB NOT NULL,
  password_salt BLOB NOT NULL,
  created_at    TEXT NOT NULL DEFAULT (datetime('now')),
  FOREIGN KEY (role_id) REFERENCES roles(id) ON DELETE RESTRICT ON UPDATE CASCADE
);

CREATE TABLE IF NOT EXISTS sessions (
  id         INTEGER PRIMARY KEY AUTOINCREMENT,
  user_id    INTEGER NOT NULL,
  token      TEXT NOT NULL UNIQUE,
  expires_at TEXT NOT NULL,
  FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS orders (
  id          INTEGER PRIMARY KEY AUTOINCREMENT,
  user_id     INTEGER NOT NULL,
  placed_at   TEXT NOT NULL DEFAULT (datetime('now')),
  total_cents INTEGER NOT NULL CHECK (total_cents >= 0),
  status      TEXT NOT NULL DEFAULT 'New',
  FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE ON UPDATE CASCADE
);

CREATE TABLE IF NOT EXISTS order_items (
  order_id         INTEGER NOT NULL,
  line_no          INTEGER NOT NULL,
  game_id          INTEGER NULL,
  game_name        TEXT NOT NULL,
  quantity         INTEGER NOT NULL CHECK (quantity > 0),
  unit_price_cents INTEGER NOT NULL CHECK (unit_price_cents >= 0),
  PRIMARY KEY (order_id, line_no),
  FOREIGN KEY (order_id) REFERENCES orders(id) ON DELETE CASCADE ON UPDATE CASCADE,
  FOREIGN KEY (game_id)  REFERENCES games(id)  ON DELETE SET NULL ON UPDATE CASCADE
);

CREATE TABLE IF NOT EXISTS discounts (
  id        INTEGER PRIMARY KEY AUTOINCREMENT,
  game_id   INTEGER NOT NULL,
  percent   REAL NOT NULL CHECK (percent >= 0 AND percent <= 90),
  starts_at TEXT NOT NULL,
  ends_at   TEXT NOT NULL,
  is_active INTEGER NOT NULL DEFAULT 1,
  FOREIGN KEY (game_id) REFERENCES games(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_games_genre  ON games(genre_id);
CREATE INDEX IF NOT EXISTS idx_games_author ON games(author_id);
CREATE INDEX IF NOT EXISTS idx_orders_user  ON orders(user_id);
CREATE INDEX IF NOT EXISTS idx_discounts_game ON discounts(game_id);
"#;

/// Create every table the shop needs. Safe to call on every startup.
pub fn ensure_schema(db: &Db) -> Result<(), DbError> {
    let version = db.query_i64("PRAGMA user_version", &[])?.unwrap_or(0);
    if version > SCHEMA_VERSION {
        return Err(DbError::OpenError(format!(
            "database schema version {} is newer than supported version {}",
            version, SCHEMA_VERSION
        )));
    }

    db.execute_batch(DDL)?;
    if version < SCHEMA_VERSION {
        // PRAGMA does not accept bound parameters
        db.execute_batch(&format!("PRAGMA user_version = {};", SCHEMA_VERSION))?;
        tracing::info!(from = version, to = SCHEMA_VERSION, "schema upgraded");
    }
    Ok(())
}
