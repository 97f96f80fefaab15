//! Wildcard search patterns and the offset ranges they produce.

mod find_spot;
mod pattern;

pub use find_spot::FindSpot;
pub use pattern::{DEFAULT_MAX_WILDCARDS, SearchPattern};
