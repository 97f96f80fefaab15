//! `<label>` elements matched by their text and reported as the control they
//! describe.

use super::{FoundType, MatchContext, MatchResult};
use crate::error::LocatorError;
use crate::identifier::IdentifierKind;
use locus_common::NodeId;

pub(super) fn evaluate(
    ctx: &MatchContext<'_, '_>,
    id: NodeId,
    kind: IdentifierKind,
) -> Result<Vec<MatchResult>, LocatorError> {
    let label = ctx.node(id)?;
    if !label.is_tag("label") {
        return Ok(Vec::new());
    }
    let Some(target) = ctx.usable_target() else {
        return Ok(Vec::new());
    };
    let Some(spot) = ctx.index.position(id) else {
        return Ok(Vec::new());
    };
    if !ctx.anchor.admits(spot.start) {
        return Ok(Vec::new());
    }

    let text = ctx.index.as_text_without_form_controls(id).unwrap_or_default();
    let Some(coverage) = target.surrounding_chars(text) else {
        return Ok(Vec::new());
    };

    let document = ctx.index.document();
    let distance = ctx.distance(ctx.index.text_before(id).unwrap_or_default());
    let result = |node: NodeId| MatchResult {
        node,
        found_type: FoundType::ByLabel,
        coverage,
        distance,
        position: spot.start,
    };
    let mut results = Vec::new();

    if let Some(control) = label
        .attr("for")
        .filter(|f| !f.is_empty())
        .and_then(|f| document.element_by_id(f))
    {
        let control_node = ctx.node(control)?;
        if control_node.is_displayed() && kind.supports(control_node) {
            results.push(result(control));
        }
    }

    for nested in document.descendants(id) {
        if nested.is_displayed() && kind.supports(nested) {
            results.push(result(nested.id));
        }
    }

    Ok(results)
}
