//! Parsed locator paths.
//!
//! A locator such as `Shipping > [Price; Total] > Save` is a list of
//! fragments. All but the last are context fragments that must appear, in
//! order, somewhere before the target. Fragments written as `[x]`, `[x;y]` or
//! `[;y]` are table coordinates: `x` names a column header cell and `y` a row
//! header cell. A coordinate in last position means the locator has no target
//! text and addresses the cell content directly.

use crate::error::LocatorError;
use crate::index::TextIndex;
use crate::search::{DEFAULT_MAX_WILDCARDS, FindSpot, SearchPattern};
use std::fmt;

const SEPARATOR: char = '>';

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableCoordinate {
    pub column: Option<SearchPattern>,
    pub row: Option<SearchPattern>,
}

impl TableCoordinate {
    fn is_coordinate(fragment: &str) -> bool {
        fragment.len() >= 2 && fragment.starts_with('[') && fragment.ends_with(']')
    }

    fn parse(fragment: &str, max_wildcards: usize) -> Result<Self, LocatorError> {
        let inner = &fragment[1..fragment.len() - 1];
        let compile = |s: &str| -> Result<Option<SearchPattern>, LocatorError> {
            let s = s.trim();
            if s.is_empty() {
                return Ok(None);
            }
            Ok(Some(SearchPattern::compile_bounded(s, max_wildcards)?))
        };

        let coordinate = match inner.split(';').collect::<Vec<_>>().as_slice() {
            [column] => TableCoordinate {
                column: compile(column)?,
                row: None,
            },
            [column, row] => TableCoordinate {
                column: compile(column)?,
                row: compile(row)?,
            },
            _ => {
                return Err(LocatorError::invalid_path(
                    fragment,
                    "a table coordinate has at most one ';'",
                ));
            }
        };

        if coordinate.column.is_none() && coordinate.row.is_none() {
            return Err(LocatorError::invalid_path(fragment, "empty table coordinate"));
        }
        Ok(coordinate)
    }
}

impl fmt::Display for TableCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let show = |p: &Option<SearchPattern>| p.as_ref().map_or("", |p| p.original()).to_string();
        write!(f, "[{};{}]", show(&self.column), show(&self.row))
    }
}

/// Where the context fragments of a path were found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathAnchor {
    /// The path has no context fragments.
    Unconstrained,
    /// First occurrence of the composite context pattern.
    At(FindSpot),
    /// Context fragments given but not present in the document.
    Missing,
}

impl PathAnchor {
    /// Whether a node starting at `start` lies behind the context.
    pub fn admits(&self, start: usize) -> bool {
        match self {
            PathAnchor::Unconstrained => true,
            PathAnchor::At(spot) => spot.end <= start,
            PathAnchor::Missing => false,
        }
    }

    pub fn spot(&self) -> Option<FindSpot> {
        match self {
            PathAnchor::At(spot) => Some(*spot),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct WPath {
    raw: Vec<String>,
    path_nodes: Vec<String>,
    path_pattern: Option<SearchPattern>,
    target: Option<SearchPattern>,
    table_coordinates: Vec<TableCoordinate>,
    table_coordinates_reversed: Vec<TableCoordinate>,
}

impl WPath {
    pub fn new<S: AsRef<str>>(fragments: &[S]) -> Result<Self, LocatorError> {
        Self::with_limit(fragments, DEFAULT_MAX_WILDCARDS)
    }

    /// Split a locator string on `>`.
    pub fn parse_locator(locator: &str) -> Result<Self, LocatorError> {
        Self::parse_locator_with_limit(locator, DEFAULT_MAX_WILDCARDS)
    }

    pub fn parse_locator_with_limit(locator: &str, max_wildcards: usize) -> Result<Self, LocatorError> {
        let fragments: Vec<&str> = locator
            .split(SEPARATOR)
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .collect();
        Self::with_limit(&fragments, max_wildcards)
    }

    pub fn with_limit<S: AsRef<str>>(fragments: &[S], max_wildcards: usize) -> Result<Self, LocatorError> {
        let raw: Vec<String> = fragments.iter().map(|f| f.as_ref().to_string()).collect();
        let mut path_nodes = Vec::new();
        let mut table_coordinates = Vec::new();
        let mut coordinates_closed = false;
        let mut target = None;

        if let Some((last, context)) = raw.split_last() {
            for fragment in context {
                if TableCoordinate::is_coordinate(fragment) {
                    if coordinates_closed {
                        return Err(LocatorError::invalid_path(
                            raw.join(" > "),
                            "only one group of table coordinates is allowed",
                        ));
                    }
                    table_coordinates.push(TableCoordinate::parse(fragment, max_wildcards)?);
                } else {
                    coordinates_closed |= !table_coordinates.is_empty();
                    path_nodes.push(fragment.clone());
                }
            }

            if TableCoordinate::is_coordinate(last) {
                table_coordinates.push(TableCoordinate::parse(last, max_wildcards)?);
            } else {
                target = Some(SearchPattern::compile_bounded(last, max_wildcards)?);
            }
        }

        let path_pattern = if path_nodes.is_empty() {
            None
        } else {
            Some(SearchPattern::from_fragments(&path_nodes, max_wildcards)?)
        };
        let table_coordinates_reversed = table_coordinates.iter().rev().cloned().collect();

        Ok(Self {
            raw,
            path_nodes,
            path_pattern,
            target,
            table_coordinates,
            table_coordinates_reversed,
        })
    }

    pub fn raw(&self) -> &[String] {
        &self.raw
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    pub fn path_nodes(&self) -> &[String] {
        &self.path_nodes
    }

    /// All context fragments joined into one pattern; `None` without context.
    pub fn path_pattern(&self) -> Option<&SearchPattern> {
        self.path_pattern.as_ref()
    }

    pub fn target(&self) -> Option<&SearchPattern> {
        self.target.as_ref()
    }

    pub fn table_coordinates(&self) -> &[TableCoordinate] {
        &self.table_coordinates
    }

    /// Innermost coordinate first.
    pub fn table_coordinates_reversed(&self) -> &[TableCoordinate] {
        &self.table_coordinates_reversed
    }

    /// Locate the context fragments in the document.
    pub fn resolve(&self, index: &TextIndex<'_>) -> PathAnchor {
        match &self.path_pattern {
            None => PathAnchor::Unconstrained,
            Some(pattern) => index
                .first_occurrence(pattern, 0)
                .map_or(PathAnchor::Missing, PathAnchor::At),
        }
    }
}

impl fmt::Display for WPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw.join(" > "))
    }
}
