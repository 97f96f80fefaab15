//! Ranked accumulator of lookup hits.

use crate::identifier::IdentifierKind;
use crate::index::TextIndex;
use crate::matcher::{FoundType, MatchResult};
use locus_common::NodeId;
use serde::Serialize;
use std::fmt;

/// Longest control text quoted in a description.
const DESCRIPTION_TEXT_LIMIT: usize = 40;

/// Handle on a located element plus a human readable description of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Control {
    pub node: NodeId,
    pub kind: Option<IdentifierKind>,
    pub description: String,
}

impl Control {
    pub fn new(index: &TextIndex<'_>, node: NodeId, kind: Option<IdentifierKind>) -> Self {
        Self {
            node,
            kind,
            description: describe(index, node, kind),
        }
    }

    /// Identity of the underlying element.
    pub fn same_element(&self, other: &Control) -> bool {
        self.node == other.node
    }
}

impl fmt::Display for Control {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description)
    }
}

fn describe(index: &TextIndex<'_>, node: NodeId, kind: Option<IdentifierKind>) -> String {
    let Some(element) = index.document().get(node) else {
        return format!("[{node}]");
    };
    let name = match kind {
        Some(kind) => kind.name(),
        None => element.tag().unwrap_or("#text"),
    };

    let mut description = format!("[{name}");
    let text = index.as_text(node).unwrap_or_default();
    if !text.is_empty() {
        let mut quoted: String = text.chars().take(DESCRIPTION_TEXT_LIMIT).collect();
        if quoted.len() < text.len() {
            quoted.push_str("...");
        }
        description.push_str(&format!(" '{quoted}'"));
    }
    for attribute in ["id", "name"] {
        if let Some(value) = element.attr(attribute).filter(|v| !v.is_empty()) {
            description.push_str(&format!(" ({attribute}='{value}')"));
        }
    }
    description.push(']');
    description
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    pub control: Control,
    pub found_type: FoundType,
    pub coverage: usize,
    pub distance: usize,
    /// Start of the matched node in the text index.
    pub start: usize,
}

impl Entry {
    fn rank(&self) -> (u32, usize, usize) {
        (self.found_type.priority(), self.coverage, self.distance)
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} found by: {} coverage: {} distance: {}",
            self.control, self.found_type, self.coverage, self.distance
        )
    }
}

/// Hits of one lookup in insertion order.
#[derive(Debug, Clone, Default)]
pub struct WeightedResultList {
    entries: Vec<Entry>,
}

impl WeightedResultList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, control: Control, found_type: FoundType, coverage: usize, distance: usize) {
        self.add_entry(Entry {
            control,
            found_type,
            coverage,
            distance,
            start: 0,
        });
    }

    pub fn add_entry(&mut self, entry: Entry) {
        self.entries.push(entry);
    }

    /// Append matcher output, describing each node as a control of `kind`.
    pub fn add_results(
        &mut self,
        index: &TextIndex<'_>,
        kind: Option<IdentifierKind>,
        results: impl IntoIterator<Item = MatchResult>,
    ) {
        for result in results {
            self.entries.push(Entry {
                control: Control::new(index, result.node, kind),
                found_type: result.found_type,
                coverage: result.coverage,
                distance: result.distance,
                start: result.position,
            });
        }
    }

    pub fn add_all(&mut self, other: WeightedResultList) {
        self.entries.extend(other.entries);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Entries in insertion order.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Entries ranked by priority, coverage and distance, keeping only the
    /// best entry per element. Ties keep insertion order.
    pub fn sorted(&self) -> Vec<Entry> {
        self.partition().0
    }

    /// Every entry in rank order: the [`sorted`](Self::sorted) view first,
    /// then the entries it dropped because a better one names the same element.
    pub fn explained(&self) -> Vec<Entry> {
        let (mut best, superseded) = self.partition();
        best.extend(superseded);
        best
    }

    fn partition(&self) -> (Vec<Entry>, Vec<Entry>) {
        let mut ranked = self.entries.clone();
        ranked.sort_by_key(Entry::rank);

        let mut unique: Vec<Entry> = Vec::with_capacity(ranked.len());
        let mut superseded = Vec::new();
        for entry in ranked {
            if unique.iter().any(|e| e.control.same_element(&entry.control)) {
                superseded.push(entry);
            } else {
                unique.push(entry);
            }
        }
        (unique, superseded)
    }

    /// Whether more than one distinct element was found.
    pub fn has_multiple(&self) -> bool {
        self.entries
            .first()
            .is_some_and(|first| self.entries.iter().any(|e| !e.control.same_element(&first.control)))
    }

    pub fn controls(&self) -> Vec<Control> {
        self.sorted().into_iter().map(|e| e.control).collect()
    }
}
