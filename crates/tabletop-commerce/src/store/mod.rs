//! SQL persistence for the catalog and orders.
//!
//! Stores borrow an open [`tabletop_db::Db`]; they hold no state of their own.

mod catalog_store;
mod order_store;

pub use catalog_store::CatalogStore;
pub use order_store::OrderStore;

use crate::error::CommerceError;
use chrono::NaiveDateTime;

/// Layout of every timestamp column.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Render a UTC timestamp for storage.
pub fn format_timestamp(ts: NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Parse a stored UTC timestamp.
pub fn parse_timestamp(text: &str) -> Result<NaiveDateTime, CommerceError> {
    NaiveDateTime::parse_from_str(text, TIMESTAMP_FORMAT)
        .map_err(|e| CommerceError::validation(format!("bad timestamp `{}`: {}", text, e)))
}
