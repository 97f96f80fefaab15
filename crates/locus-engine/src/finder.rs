//! Fork-join orchestration of one lookup.
//!
//! The text index and the context anchor are computed once. Every candidate
//! element then becomes one or more independent units (one per claiming
//! identifier, or a generic unit for unclaimed elements) plus a single
//! document-wide text scan. Units run on the finder's worker pool, each into
//! its own buffer; the buffers are merged in submission order at the barrier,
//! so the result does not depend on scheduling.

use crate::config::{EngineConfig, FinderConfig};
use crate::error::LocatorError;
use crate::identifier::{IdentifierKind, IdentifierSet};
use crate::index::TextIndex;
use crate::matcher::{
    FoundType, MatchContext, MatchResult, MatcherKind, in_table_coordinates, scan_visible_text,
};
use crate::weighted::{Control, Entry, WeightedResultList};
use crate::wpath::{PathAnchor, WPath};
use locus_common::{Document, Node, NodeId};
use rayon::ThreadPool;
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};

/// Inputs the settable fallback accepts besides text-like ones.
const SETTABLE_INPUT_TYPES: &[&str] = &["password", "file"];

#[derive(Debug, Clone, Copy)]
enum Unit {
    Identifier { node: NodeId, kind: IdentifierKind },
    Generic { node: NodeId },
    TextScan,
}

pub struct Finder {
    pool: ThreadPool,
    identifiers: IdentifierSet,
    config: FinderConfig,
    max_wildcards: usize,
}

impl Finder {
    pub fn new(config: &EngineConfig) -> Result<Self, LocatorError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.finder.workers)
            .thread_name(|i| format!("locus-finder-{i}"))
            .build()?;
        tracing::info!(
            workers = pool.current_num_threads(),
            identifiers = config.finder.identifiers.len(),
            "Created finder pool"
        );

        Ok(Self {
            pool,
            identifiers: IdentifierSet::new(config.finder.identifiers.iter().copied()),
            config: config.finder.clone(),
            max_wildcards: config.search.max_wildcards,
        })
    }

    pub fn identifiers(&self) -> &IdentifierSet {
        &self.identifiers
    }

    pub fn workers(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Parse a `>` separated locator with the configured wildcard limit.
    pub fn parse(&self, locator: &str) -> Result<WPath, LocatorError> {
        WPath::parse_locator_with_limit(locator, self.max_wildcards)
    }

    pub fn find(&self, path: &WPath, document: &Document) -> Result<WeightedResultList, LocatorError> {
        self.find_with_cancel(path, document, &AtomicBool::new(false))
    }

    /// Ranked, deduplicated controls for `path`.
    pub fn find_controls(&self, path: &WPath, document: &Document) -> Result<Vec<Control>, LocatorError> {
        Ok(self.find(path, document)?.controls())
    }

    /// Like [`Finder::find`], aborting with [`LocatorError::Cancelled`] once
    /// `cancel` is raised.
    pub fn find_with_cancel(
        &self,
        path: &WPath,
        document: &Document,
        cancel: &AtomicBool,
    ) -> Result<WeightedResultList, LocatorError> {
        let index = TextIndex::build(document);
        let mut results = WeightedResultList::new();

        if path.is_empty() {
            if self.config.empty_locator_fallback {
                if let Some(entry) = first_settable(&index) {
                    results.add_entry(entry);
                }
            }
            return Ok(results);
        }

        let anchor = path.resolve(&index);
        if anchor == PathAnchor::Missing {
            tracing::debug!(path = %path, "Context not found in document");
            return Ok(results);
        }

        let ctx = MatchContext::new(&index, path, anchor);
        let claimed = self.claimed_elements(&index);
        let units = self.units(&index, &claimed);

        let buffers = self.pool.install(|| {
            units
                .par_iter()
                .map(|unit| {
                    if cancel.load(Ordering::Relaxed) {
                        return Err(LocatorError::Cancelled);
                    }
                    self.evaluate(unit, &ctx, &claimed)
                })
                .collect::<Result<Vec<_>, LocatorError>>()
        })?;
        if cancel.load(Ordering::Relaxed) {
            return Err(LocatorError::Cancelled);
        }

        for (kind, hits) in buffers {
            results.add_results(&index, kind, hits);
        }

        tracing::debug!(
            path = %path,
            units = units.len(),
            entries = results.len(),
            "Lookup finished"
        );
        Ok(results)
    }

    /// Per node: whether some registered identifier claims it.
    fn claimed_elements(&self, index: &TextIndex<'_>) -> Vec<bool> {
        let document = index.document();
        let mut claimed = vec![false; document.len()];
        for id in index.visible_elements() {
            if let Some(node) = document.get(*id) {
                claimed[id.0] = self.identifiers.claims(document, node);
            }
        }
        claimed
    }

    fn units(&self, index: &TextIndex<'_>, claimed: &[bool]) -> Vec<Unit> {
        let document = index.document();
        let mut units = Vec::new();

        for id in index.visible_elements() {
            let Some(node) = document.get(*id) else {
                continue;
            };
            if claimed[id.0] {
                units.extend(
                    self.identifiers
                        .claiming(document, node)
                        .map(|kind| Unit::Identifier { node: *id, kind }),
                );
            } else if self.config.generic_elements {
                units.push(Unit::Generic { node: *id });
            }
        }
        if self.config.generic_elements {
            units.push(Unit::TextScan);
        }
        units
    }

    fn evaluate(
        &self,
        unit: &Unit,
        ctx: &MatchContext<'_, '_>,
        claimed: &[bool],
    ) -> Result<(Option<IdentifierKind>, Vec<MatchResult>), LocatorError> {
        let (kind, mut hits) = self.evaluate_unit(unit, ctx, claimed)?;
        // With a target, coordinates narrow the hits down to the addressed cells
        let coordinates = ctx.path.table_coordinates_reversed();
        if ctx.path.target().is_some() && !coordinates.is_empty() {
            hits.retain(|hit| in_table_coordinates(ctx, hit.node, coordinates));
        }
        Ok((kind, hits))
    }

    fn evaluate_unit(
        &self,
        unit: &Unit,
        ctx: &MatchContext<'_, '_>,
        claimed: &[bool],
    ) -> Result<(Option<IdentifierKind>, Vec<MatchResult>), LocatorError> {
        match *unit {
            Unit::Identifier { node, kind } => {
                let element = ctx.node(node)?;
                let mut hits = Vec::new();
                for matcher in kind.matchers(ctx.path, element) {
                    hits.extend(matcher.evaluate(ctx, node)?);
                }
                Ok((Some(kind), hits))
            }
            Unit::Generic { node } => Ok((None, MatcherKind::Id.evaluate(ctx, node)?)),
            Unit::TextScan => {
                let document = ctx.index.document();
                let inside_claimed = |id: NodeId| {
                    claimed.get(id.0).copied().unwrap_or(false)
                        || document
                            .ancestors(id)
                            .any(|a| claimed.get(a.id.0).copied().unwrap_or(false))
                };
                Ok((None, scan_visible_text(ctx, inside_claimed)?))
            }
        }
    }
}

fn is_settable(node: &Node) -> bool {
    let editable = node.is_tag("textarea")
        || IdentifierKind::TextInput.supports(node)
        || node.is_input_of(SETTABLE_INPUT_TYPES);
    editable && node.is_displayed() && !node.is_disabled() && !node.has_attr("readonly")
}

/// The first field a value can be typed into, for locators without text.
fn first_settable(index: &TextIndex<'_>) -> Option<Entry> {
    let document = index.document();
    let node = index
        .visible_elements()
        .iter()
        .filter_map(|id| document.get(*id))
        .find(|n| is_settable(n))?;

    let kind = [IdentifierKind::TextInput, IdentifierKind::TextArea]
        .into_iter()
        .find(|k| k.supports(node));
    Some(Entry {
        control: Control::new(index, node.id, kind),
        found_type: FoundType::BySettable,
        coverage: 0,
        distance: index.text_before(node.id).unwrap_or_default().chars().count(),
        start: index.position(node.id).map_or(0, |s| s.start),
    })
}
