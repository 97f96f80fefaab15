//! Document-wide scan for the target text.
//!
//! Unlike the per-node matchers this one walks every occurrence of the target
//! in the text index and attributes each hit to the smallest displayed
//! element enclosing it.

use super::{FoundType, MatchContext, MatchResult};
use crate::error::LocatorError;
use locus_common::NodeId;
use std::collections::HashSet;

/// Emit one `BY_TEXT` result per enclosing element of a target occurrence
/// behind the context. Hits inside elements for which `claimed` returns true
/// are left to the matcher chain of that element.
pub fn scan_visible_text(
    ctx: &MatchContext<'_, '_>,
    claimed: impl Fn(NodeId) -> bool,
) -> Result<Vec<MatchResult>, LocatorError> {
    let Some(target) = ctx.usable_target() else {
        return Ok(Vec::new());
    };

    let index = ctx.index;
    let mut from = ctx.anchor.spot().map_or(0, |s| s.end);
    let mut seen = HashSet::new();
    let mut results = Vec::new();

    while let Some(hit) = index.first_occurrence(target, from) {
        from = hit.start + 1;

        let Some(element) = index.smallest_enclosing(hit) else {
            continue;
        };
        if claimed(element) || !seen.insert(element) {
            continue;
        }
        ctx.node(element)?;

        let Some(spot) = index.position(element) else {
            continue;
        };
        let text = index.text_before_including_self(element).unwrap_or_default();
        let Some(last) = target.last_occurrence(text) else {
            continue;
        };

        results.push(MatchResult {
            node: element,
            found_type: FoundType::ByText,
            coverage: text[last.end..].chars().count(),
            distance: ctx.distance(&text[..last.start]),
            position: spot.start,
        });
    }

    tracing::debug!(pattern = %target, hits = results.len(), "Visible text scan finished");
    Ok(results)
}
