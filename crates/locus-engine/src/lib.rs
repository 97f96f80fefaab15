//! Locates user-described controls in a rendered document.
//!
//! A locator such as `Billing > Street` is parsed into a [`WPath`], the
//! document's displayed text is indexed once, and every candidate element is
//! evaluated by the matchers of the identifiers that claim it. Hits are ranked
//! in a [`WeightedResultList`] by how they were found, how tightly the text
//! matched and how close they are to the context.

pub mod config;
pub mod error;
pub mod finder;
pub mod identifier;
pub mod index;
pub mod matcher;
pub mod search;
pub mod weighted;
pub mod wpath;

pub use config::{ConfigError, ConfigLoader, EngineConfig};
pub use error::{LocatorError, PatternError};
pub use finder::Finder;
pub use identifier::{IdentifierKind, IdentifierSet};
pub use index::TextIndex;
pub use matcher::{FoundType, MatchMode, MatchResult};
pub use search::{FindSpot, SearchPattern};
pub use weighted::{Control, Entry, WeightedResultList};
pub use wpath::{PathAnchor, TableCoordinate, WPath};
