use super::{FoundType, MatchContext, MatchMode, MatchResult, MatcherKind};
use crate::error::LocatorError;
use locus_common::NodeId;

/// Where an attribute-style matcher reads its value from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum ValueSource {
    Attribute(&'static str),
    /// The node's own rendered text.
    OwnText,
    LabelTextBefore,
    LabelTextAfter,
}

#[derive(Debug, Clone, Copy)]
pub(super) struct AttributeRule {
    pub source: ValueSource,
    pub mode: MatchMode,
    pub found_type: FoundType,
}

const fn attribute(name: &'static str, mode: MatchMode, found_type: FoundType) -> AttributeRule {
    AttributeRule {
        source: ValueSource::Attribute(name),
        mode,
        found_type,
    }
}

pub(super) fn rule(kind: MatcherKind) -> Option<AttributeRule> {
    use FoundType::*;
    use MatchMode::*;

    let rule = match kind {
        MatcherKind::Id => attribute("id", Exact, ById),
        MatcherKind::Name => attribute("name", Contains, ByName),
        MatcherKind::Title => attribute("title", Contains, ByTitleAttribute),
        MatcherKind::AriaLabel => attribute("aria-label", Contains, ByAriaLabelAttribute),
        MatcherKind::Placeholder => attribute("placeholder", Contains, ByPlaceholder),
        MatcherKind::DataTestid => attribute("data-testid", Exact, ByDataTestid),
        MatcherKind::Value => attribute("value", Contains, ByLabelText),
        MatcherKind::LabelAttribute => attribute("label", Contains, ByLabelText),
        MatcherKind::ImageAlt => attribute("alt", Contains, ByImgAltAttribute),
        MatcherKind::ImageTitle => attribute("title", Contains, ByImgTitleAttribute),
        MatcherKind::ImageSrc => attribute("src", EndsWith, ByImgSrcAttribute),
        MatcherKind::ElementText => AttributeRule {
            source: ValueSource::OwnText,
            mode: Contains,
            found_type: ByText,
        },
        MatcherKind::LabelTextBefore => AttributeRule {
            source: ValueSource::LabelTextBefore,
            mode: Contains,
            found_type: ByLabelText,
        },
        MatcherKind::LabelTextAfter => AttributeRule {
            source: ValueSource::LabelTextAfter,
            mode: Contains,
            found_type: ByLabelText,
        },
        MatcherKind::InnerImage | MatcherKind::HtmlLabel(_) | MatcherKind::TableCoordinates(_) => {
            return None;
        }
    };
    Some(rule)
}

pub(super) fn evaluate(
    rule: &AttributeRule,
    ctx: &MatchContext<'_, '_>,
    id: NodeId,
) -> Result<Vec<MatchResult>, LocatorError> {
    let node = ctx.node(id)?;
    let Some(target) = ctx.usable_target() else {
        return Ok(Vec::new());
    };
    let Some(spot) = ctx.index.position(id) else {
        return Ok(Vec::new());
    };
    if !ctx.anchor.admits(spot.start) {
        return Ok(Vec::new());
    }

    let from = ctx.anchor.spot().map_or(0, |s| s.end);
    let value = match rule.source {
        ValueSource::Attribute(name) => node.attr(name),
        ValueSource::OwnText => ctx.index.as_text(id),
        ValueSource::LabelTextBefore => ctx.index.label_text_before(id, from),
        ValueSource::LabelTextAfter => ctx.index.label_text_after(id),
    };
    let Some(value) = value.filter(|v| !v.is_empty()) else {
        return Ok(Vec::new());
    };
    let Some(coverage) = rule.mode.deviation(target, value) else {
        return Ok(Vec::new());
    };

    let text_before = ctx.index.text_before(id).unwrap_or_default();
    // The label in front of a field is not part of the gap to the context.
    let text_before = match rule.source {
        ValueSource::LabelTextBefore => text_before
            .strip_suffix(value)
            .map_or(text_before, str::trim_end),
        _ => text_before,
    };

    Ok(vec![MatchResult {
        node: id,
        found_type: rule.found_type,
        coverage,
        distance: ctx.distance(text_before),
        position: spot.start,
    }])
}
