//! Controls recognised through an image they contain, e.g. an icon link.

use super::{FoundType, MatchContext, MatchMode, MatchResult};
use crate::error::LocatorError;
use locus_common::NodeId;

const INNER_RULES: &[(&str, MatchMode, FoundType)] = &[
    ("alt", MatchMode::Contains, FoundType::ByInnerImgAltAttribute),
    ("title", MatchMode::Contains, FoundType::ByInnerImgTitleAttribute),
    ("src", MatchMode::EndsWith, FoundType::ByInnerImgSrcAttribute),
    ("name", MatchMode::Exact, FoundType::ByInnerName),
];

pub(super) fn evaluate(ctx: &MatchContext<'_, '_>, id: NodeId) -> Result<Vec<MatchResult>, LocatorError> {
    ctx.node(id)?;
    let Some(target) = ctx.usable_target() else {
        return Ok(Vec::new());
    };
    let Some(spot) = ctx.index.position(id) else {
        return Ok(Vec::new());
    };
    if !ctx.anchor.admits(spot.start) {
        return Ok(Vec::new());
    }

    let document = ctx.index.document();
    let distance = ctx.distance(ctx.index.text_before(id).unwrap_or_default());
    let mut results = Vec::new();

    for image in document
        .descendants(id)
        .filter(|n| n.is_tag("img") && n.is_displayed())
    {
        for (attribute, mode, found_type) in INNER_RULES {
            let Some(value) = image.attr(attribute).filter(|v| !v.is_empty()) else {
                continue;
            };
            if let Some(coverage) = mode.deviation(target, value) {
                results.push(MatchResult {
                    node: id,
                    found_type: *found_type,
                    coverage,
                    distance,
                    position: spot.start,
                });
            }
        }
    }
    Ok(results)
}
