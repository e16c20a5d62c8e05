//! Search module.
//!
//! Contains the facet filters and the query builder that combines them.

mod filter;
mod query;

pub use filter::{age_matches, Filter, PlayTimeBucket, PriceRange, AGE_STEPS, DEFAULT_MAX_PRICE};
pub use query::CatalogQuery;
