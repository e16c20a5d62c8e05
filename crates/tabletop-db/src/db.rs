//! Database connection and query execution.

use crate::{DbError, QueryResult, Row, Value};
use rusqlite::Connection;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Connection tuning applied when a database is opened.
#[derive(Debug, Clone)]
pub struct DbOptions {
    /// How long a writer waits on a locked database before failing.
    pub busy_timeout_ms: u64,
    /// Use write-ahead logging (file databases only).
    pub wal: bool,
}

impl Default for DbOptions {
    fn default() -> Self {
        Self {
            busy_timeout_ms: 5000,
            wal: true,
        }
    }
}

/// Query execution shared by plain connections and open transactions.
///
/// Every method takes positional `?` parameters built with [`params!`](crate::params).
pub trait Executor {
    /// The underlying SQLite connection.
    fn connection(&self) -> &Connection;

    /// Execute a SQL statement that doesn't return rows.
    ///
    /// Returns the number of rows changed.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// db.execute(
    ///     "UPDATE games SET price_cents = ? WHERE id = ?",
    ///     params![59900, 3]
    /// )?;
    /// ```
    fn execute(&self, sql: &str, params: &[Value]) -> Result<usize, DbError> {
        tracing::trace!(sql, "execute");
        let changed = self
            .connection()
            .execute(sql, rusqlite::params_from_iter(params.iter()))?;
        Ok(changed)
    }

    /// Execute an INSERT and return the rowid of the new row.
    fn insert(&self, sql: &str, params: &[Value]) -> Result<i64, DbError> {
        self.execute(sql, params)?;
        Ok(self.connection().last_insert_rowid())
    }

    /// Execute a SQL query and return raw results.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let result = db.query("SELECT name FROM games WHERE price_cents < ?", params![50000])?;
    /// for row in result.iter() {
    ///     println!("Game: {}", row.get_text("name")?);
    /// }
    /// ```
    fn query(&self, sql: &str, params: &[Value]) -> Result<QueryResult, DbError> {
        tracing::trace!(sql, "query");
        let mut stmt = self.connection().prepare(sql)?;
        let columns: Vec<String> = stmt
            .column_names()
            .into_iter()
            .map(str::to_string)
            .collect();

        let mut rows = stmt.query(rusqlite::params_from_iter(params.iter()))?;
        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            let mut values = Vec::with_capacity(columns.len());
            for index in 0..columns.len() {
                values.push(Value::from(row.get_ref(index)?));
            }
            out.push(Row::new(columns.clone(), values));
        }

        Ok(QueryResult::new(columns, out))
    }

    /// Execute a SQL query and deserialize results into a vector.
    fn query_as<T: DeserializeOwned>(&self, sql: &str, params: &[Value]) -> Result<Vec<T>, DbError> {
        self.query(sql, params)?.deserialize_all()
    }

    /// Execute a SQL query and return a single row.
    ///
    /// Returns [`DbError::NotFound`] if no rows are returned.
    fn query_one<T: DeserializeOwned>(&self, sql: &str, params: &[Value]) -> Result<T, DbError> {
        let result = self.query(sql, params)?;
        result.first().ok_or(DbError::NotFound)?.deserialize()
    }

    /// Execute a SQL query and return an optional single row.
    fn query_optional<T: DeserializeOwned>(
        &self,
        sql: &str,
        params: &[Value],
    ) -> Result<Option<T>, DbError> {
        let result = self.query(sql, params)?;
        match result.first() {
            Some(row) => Ok(Some(row.deserialize()?)),
            None => Ok(None),
        }
    }

    /// Read the first column of the first row as an integer.
    ///
    /// Returns `None` when there are no rows or the value is NULL.
    fn query_i64(&self, sql: &str, params: &[Value]) -> Result<Option<i64>, DbError> {
        let result = self.query(sql, params)?;
        Ok(result
            .first()
            .and_then(|row| row.get_index(0))
            .and_then(Value::as_integer))
    }
}

/// SQLite database connection.
pub struct Db {
    conn: Connection,
    path: Option<PathBuf>,
}

impl Db {
    /// Open (or create) a database file with default options.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DbError> {
        Self::open_with(path, &DbOptions::default())
    }

    /// Open (or create) a database file.
    pub fn open_with(path: impl AsRef<Path>, options: &DbOptions) -> Result<Self, DbError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| DbError::OpenError(format!("{}: {}", parent.display(), e)))?;
        }

        let conn = Connection::open(path)
            .map_err(|e| DbError::OpenError(format!("{}: {}", path.display(), e)))?;
        let db = Self {
            conn,
            path: Some(path.to_path_buf()),
        };
        db.configure(options)?;
        tracing::debug!(path = %path.display(), "opened database");
        Ok(db)
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn =
            Connection::open_in_memory().map_err(|e| DbError::OpenError(e.to_string()))?;
        let db = Self { conn, path: None };
        db.configure(&DbOptions {
            wal: false,
            ..DbOptions::default()
        })?;
        Ok(db)
    }

    fn configure(&self, options: &DbOptions) -> Result<(), DbError> {
        self.conn
            .busy_timeout(Duration::from_millis(options.busy_timeout_ms))?;
        self.conn
            .execute_batch("PRAGMA foreign_keys = ON; PRAGMA synchronous = NORMAL;")?;
        if options.wal && self.path.is_some() {
            // journal_mode returns the resulting mode as a row
            self.conn
                .query_row("PRAGMA journal_mode = WAL", [], |_| Ok(()))?;
        }
        Ok(())
    }

    /// File path of this database, `None` when in memory.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Run several statements separated by semicolons, without parameters.
    pub fn execute_batch(&self, sql: &str) -> Result<(), DbError> {
        self.conn.execute_batch(sql)?;
        Ok(())
    }

    /// Begin a transaction.
    ///
    /// The transaction rolls back when dropped unless [`Tx::commit`] is called.
    pub fn transaction(&self) -> Result<Tx<'_>, DbError> {
        let inner = self.conn.unchecked_transaction()?;
        Ok(Tx { inner })
    }
}

impl Executor for Db {
    fn connection(&self) -> &Connection {
        &self.conn
    }
}

/// An open transaction.
pub struct Tx<'c> {
    inner: rusqlite::Transaction<'c>,
}

impl Tx<'_> {
    /// Commit the transaction.
    pub fn commit(self) -> Result<(), DbError> {
        self.inner.commit()?;
        Ok(())
    }

    /// Roll the transaction back explicitly.
    pub fn rollback(self) -> Result<(), DbError> {
        self.inner.rollback()?;
        Ok(())
    }
}

impl Executor for Tx<'_> {
    fn connection(&self) -> &Connection {
        &self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params;
    use serde::Deserialize;

    fn scratch() -> Db {
        let db = Db::open_in_memory().unwrap();
        db.execute_batch(
            "CREATE TABLE shelf (id INTEGER PRIMARY KEY, name TEXT NOT NULL UNIQUE, qty INTEGER);",
        )
        .unwrap();
        db
    }

    #[derive(Deserialize, Debug, PartialEq)]
    struct Shelf {
        id: i64,
        name: String,
        qty: Option<i64>,
    }

    #[test]
    fn test_insert_and_query_as() {
        let db = scratch();
        let id = db
            .insert("INSERT INTO shelf (name, qty) VALUES (?, ?)", params!["Azul", 3])
            .unwrap();
        db.insert("INSERT INTO shelf (name, qty) VALUES (?, ?)", params!["Dixit", None::<i64>])
            .unwrap();

        let rows: Vec<Shelf> = db
            .query_as("SELECT id, name, qty FROM shelf ORDER BY name", params![])
            .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, id);
        assert_eq!(rows[0].qty, Some(3));
        assert_eq!(rows[1].qty, None);
    }

    #[test]
    fn test_query_one_and_optional() {
        let db = scratch();
        db.execute("INSERT INTO shelf (name) VALUES (?)", params!["Azul"])
            .unwrap();

        let found: Shelf = db
            .query_one("SELECT id, name, qty FROM shelf WHERE name = ?", params!["Azul"])
            .unwrap();
        assert_eq!(found.name, "Azul");

        let missing: Option<Shelf> = db
            .query_optional("SELECT id, name, qty FROM shelf WHERE name = ?", params!["Go"])
            .unwrap();
        assert!(missing.is_none());

        let err = db
            .query_one::<Shelf>("SELECT id, name, qty FROM shelf WHERE id = ?", params![99])
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound));
    }

    #[test]
    fn test_unique_violation_is_reported() {
        let db = scratch();
        db.execute("INSERT INTO shelf (name) VALUES (?)", params!["Azul"])
            .unwrap();
        let err = db
            .execute("INSERT INTO shelf (name) VALUES (?)", params!["Azul"])
            .unwrap_err();
        assert!(err.is_constraint_violation());
    }

    #[test]
    fn test_transaction_commit_and_rollback() {
        let db = scratch();

        let tx = db.transaction().unwrap();
        tx.execute("INSERT INTO shelf (name) VALUES (?)", params!["Kept"])
            .unwrap();
        tx.commit().unwrap();

        {
            let tx = db.transaction().unwrap();
            tx.execute("INSERT INTO shelf (name) VALUES (?)", params!["Dropped"])
                .unwrap();
            // dropped without commit
        }

        let count = db.query_i64("SELECT COUNT(*) FROM shelf", params![]).unwrap();
        assert_eq!(count, Some(1));
    }

    #[test]
    fn test_open_file_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("shop.db");
        let db = Db::open(&path).unwrap();
        assert_eq!(db.path(), Some(path.as_path()));
        assert!(path.exists());
    }
}
