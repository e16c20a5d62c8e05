//! Type-safe SQLite database layer for the Tabletop shop.
//!
//! Wraps a `rusqlite` connection with positional parameters, typed row
//! access and serde-based result deserialization.
//!
//! # Example
//!
//! ```rust,ignore
//! use tabletop_db::prelude::*;
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct Genre {
//!     id: i64,
//!     name: String,
//! }
//!
//! let db = Db::open("shop.db")?;
//! schema::ensure_schema(&db)?;
//!
//! db.execute("INSERT OR IGNORE INTO genres (name) VALUES (?)", params!["Strategy"])?;
//!
//! let genres: Vec<Genre> = db.query_as(
//!     "SELECT id, name FROM genres ORDER BY name",
//!     params![]
//! )?;
//! ```

mod db;
mod error;
pub mod schema;
mod types;

pub use db::{Db, DbOptions, Executor, Tx};
pub use error::DbError;
pub use types::{QueryResult, Row, Value};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::schema;
    pub use crate::{params, Db, DbError, Executor, QueryResult, Row, Tx, Value};
}

/// Create a parameter list for SQL queries.
///
/// # Example
///
/// ```rust,ignore
/// use tabletop_db::params;
///
/// let params = params!["Catan", 4, 59.9];
/// ```
#[macro_export]
macro_rules! params {
    () => {
        &[]
    };
    ($($param:expr),+ $(,)?) => {
        &[$($crate::Value::from($param)),+]
    };
}
