//! Matchers: one strategy per way a control can be recognised.
//!
//! Every matcher kind is a variant of [`MatcherKind`]; [`MatcherKind::evaluate`]
//! dispatches to the attribute table or to one of the structural matchers.
//! A matcher looks at one candidate node and emits zero or more
//! [`MatchResult`]s. Absence is never an error; only a broken node reference
//! is.

mod attribute;
mod html_label;
mod inner_image;
mod table;
mod visible_text;

pub(crate) use table::in_table_coordinates;
pub use visible_text::scan_visible_text;

use crate::error::LocatorError;
use crate::identifier::IdentifierKind;
use crate::index::TextIndex;
use crate::search::SearchPattern;
use crate::wpath::{PathAnchor, WPath};
use locus_common::{Node, NodeId};
use serde::Serialize;
use std::fmt;

/// How a control was recognised. Lower priority values rank first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FoundType {
    ByText,
    ByTableCoordinate,
    ByImgSrcAttribute,
    ByImgAltAttribute,
    ByImgTitleAttribute,
    ByInnerImgSrcAttribute,
    ByInnerImgAltAttribute,
    ByInnerImgTitleAttribute,
    ByTitleAttribute,
    ByAriaLabelAttribute,
    ByLabelText,
    ByPlaceholder,
    ByLabel,
    ByName,
    ByInnerName,
    ByDataTestid,
    ById,
    BySettable,
}

impl FoundType {
    pub const fn priority(self) -> u32 {
        match self {
            FoundType::ByText => 100,
            FoundType::ByTableCoordinate => 150,
            FoundType::ByImgSrcAttribute
            | FoundType::ByImgAltAttribute
            | FoundType::ByImgTitleAttribute => 200,
            FoundType::ByInnerImgSrcAttribute
            | FoundType::ByInnerImgAltAttribute
            | FoundType::ByInnerImgTitleAttribute => 300,
            FoundType::ByTitleAttribute | FoundType::ByAriaLabelAttribute => 350,
            FoundType::ByLabelText => 400,
            FoundType::ByPlaceholder => 450,
            FoundType::ByLabel => 500,
            FoundType::ByName => 600,
            FoundType::ByInnerName => 650,
            FoundType::ByDataTestid => 680,
            FoundType::ById => 700,
            FoundType::BySettable => 9999,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            FoundType::ByText => "BY_TEXT",
            FoundType::ByTableCoordinate => "BY_TABLE_COORDINATE",
            FoundType::ByImgSrcAttribute => "BY_IMG_SRC_ATTRIBUTE",
            FoundType::ByImgAltAttribute => "BY_IMG_ALT_ATTRIBUTE",
            FoundType::ByImgTitleAttribute => "BY_IMG_TITLE_ATTRIBUTE",
            FoundType::ByInnerImgSrcAttribute => "BY_INNER_IMG_SRC_ATTRIBUTE",
            FoundType::ByInnerImgAltAttribute => "BY_INNER_IMG_ALT_ATTRIBUTE",
            FoundType::ByInnerImgTitleAttribute => "BY_INNER_IMG_TITLE_ATTRIBUTE",
            FoundType::ByTitleAttribute => "BY_TITLE_ATTRIBUTE",
            FoundType::ByAriaLabelAttribute => "BY_ARIA_LABEL_ATTRIBUTE",
            FoundType::ByLabelText => "BY_LABEL_TEXT",
            FoundType::ByPlaceholder => "BY_PLACEHOLDER",
            FoundType::ByLabel => "BY_LABEL",
            FoundType::ByName => "BY_NAME",
            FoundType::ByInnerName => "BY_INNER_NAME",
            FoundType::ByDataTestid => "BY_DATA_TESTID",
            FoundType::ById => "BY_ID",
            FoundType::BySettable => "BY_SETTABLE",
        }
    }
}

impl fmt::Display for FoundType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a value is compared against the target pattern, and how the number
/// of characters outside the match (the coverage) is counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// Pattern anywhere in the value; characters around the tightest match.
    Contains,
    /// Pattern equals the whole value.
    Exact,
    /// Characters trailing the last match.
    StartsWith,
    /// Pattern matches a suffix; characters in front of the last match.
    EndsWith,
}

impl MatchMode {
    /// Coverage of `value` under this mode, `None` when it does not match.
    pub fn deviation(self, pattern: &SearchPattern, value: &str) -> Option<usize> {
        match self {
            MatchMode::Contains => pattern.surrounding_chars(value),
            MatchMode::Exact => pattern
                .matches(value)
                .then(|| pattern.surrounding_chars(value))
                .flatten(),
            MatchMode::StartsWith => pattern.chars_after_last_occurrence(value),
            MatchMode::EndsWith => pattern
                .matches_at_end(value)
                .then(|| pattern.chars_before_last_occurrence(value))
                .flatten(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchResult {
    pub node: NodeId,
    pub found_type: FoundType,
    pub coverage: usize,
    pub distance: usize,
    /// Start of the matched node in the text index.
    pub position: usize,
}

/// Everything a matcher needs besides the candidate node. Shared read-only
/// by all workers of one lookup.
#[derive(Debug, Clone, Copy)]
pub struct MatchContext<'i, 'd> {
    pub index: &'i TextIndex<'d>,
    pub path: &'i WPath,
    pub anchor: PathAnchor,
}

impl<'i, 'd> MatchContext<'i, 'd> {
    pub fn new(index: &'i TextIndex<'d>, path: &'i WPath, anchor: PathAnchor) -> Self {
        Self {
            index,
            path,
            anchor,
        }
    }

    pub fn node(&self, id: NodeId) -> Result<&'d Node, LocatorError> {
        self.index
            .document()
            .node(id)
            .map_err(|e| LocatorError::stale(id, e))
    }

    /// The target pattern, if it can match anything positionally.
    pub(crate) fn usable_target(&self) -> Option<&'i SearchPattern> {
        if self.anchor == PathAnchor::Missing {
            return None;
        }
        self.path.target().filter(|t| t.min_length() > 0)
    }

    /// Characters between the context and the end of `text_before`; without
    /// context, the length of `text_before`.
    pub fn distance(&self, text_before: &str) -> usize {
        self.path
            .path_pattern()
            .and_then(|p| p.chars_after_last_occurrence(text_before))
            .unwrap_or_else(|| text_before.chars().count())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatcherKind {
    Id,
    Name,
    Title,
    AriaLabel,
    Placeholder,
    DataTestid,
    Value,
    LabelAttribute,
    ImageAlt,
    ImageTitle,
    ImageSrc,
    ElementText,
    LabelTextBefore,
    LabelTextAfter,
    InnerImage,
    /// `<label>` elements, reported as the labelled control of this kind.
    HtmlLabel(IdentifierKind),
    /// Controls of this kind addressed through table coordinates.
    TableCoordinates(IdentifierKind),
}

impl MatcherKind {
    pub fn evaluate(
        self,
        ctx: &MatchContext<'_, '_>,
        node: NodeId,
    ) -> Result<Vec<MatchResult>, LocatorError> {
        match self {
            MatcherKind::InnerImage => inner_image::evaluate(ctx, node),
            MatcherKind::HtmlLabel(kind) => html_label::evaluate(ctx, node, kind),
            MatcherKind::TableCoordinates(kind) => table::evaluate(ctx, node, kind),
            _ => match attribute::rule(self) {
                Some(rule) => attribute::evaluate(&rule, ctx, node),
                None => Ok(Vec::new()),
            },
        }
    }
}
