//! Newtype IDs for type-safe identifiers.
//!
//! All ids are SQLite rowids. Wrapping them prevents passing a `GenreId`
//! where a `GameId` is expected.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Macro to generate integer newtype ID structs.
macro_rules! define_id {
    ($name:ident) => {
        /// A database row identifier.
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wrap a raw rowid.
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            /// Get the raw rowid.
            pub const fn get(&self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> i64 {
                id.0
            }
        }

        impl From<$name> for tabletop_db::Value {
            fn from(id: $name) -> tabletop_db::Value {
                tabletop_db::Value::Integer(id.0)
            }
        }
    };
}

// Define all ID types
define_id!(GameId);
define_id!(GenreId);
define_id!(AuthorId);
define_id!(UserId);
define_id!(OrderId);
define_id!(DiscountId);
