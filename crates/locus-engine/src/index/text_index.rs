//! Position index over the displayed text of a document.
//!
//! One depth-first pass renders every displayed node into a normalized text
//! blob and remembers the byte range each node produced. All coverage and
//! distance numbers are computed in this coordinate space, so the same
//! document always yields the same blob and spans.
//!
//! A second blob is built alongside that leaves out everything contributed by
//! form controls; label texts are read from it.

use super::NormalizedText;
use crate::search::{FindSpot, SearchPattern};
use locus_common::{Document, Node, NodeData, NodeId};

/// Elements that are separated from their neighbours by a blank.
const BLOCK_TAGS: &[&str] = &[
    "div", "p", "table", "tr", "th", "td", "ul", "li", "h1", "h2", "h3", "h4", "h5", "h6",
    "form", "tbody", "thead", "tfoot",
];

#[derive(Debug)]
pub struct TextIndex<'a> {
    document: &'a Document,
    text: NormalizedText,
    text_without_controls: NormalizedText,
    positions: Vec<Option<FindSpot>>,
    positions_without_controls: Vec<Option<FindSpot>>,
    visible: Vec<NodeId>,
    visible_bottom_up: Vec<NodeId>,
}

impl<'a> TextIndex<'a> {
    pub fn build(document: &'a Document) -> Self {
        let mut index = Self {
            document,
            text: NormalizedText::new(),
            text_without_controls: NormalizedText::new(),
            positions: vec![None; document.len()],
            positions_without_controls: vec![None; document.len()],
            visible: Vec::new(),
            visible_bottom_up: Vec::new(),
        };
        if let Some(root) = document.root() {
            index.parse(root);
        }
        tracing::debug!(
            nodes = document.len(),
            visible = index.visible.len(),
            text_len = index.text.raw_len(),
            "Built text index"
        );
        index
    }

    pub fn document(&self) -> &'a Document {
        self.document
    }

    fn parse(&mut self, id: NodeId) {
        let document = self.document;
        let Some(node) = document.get(id) else {
            return;
        };

        let start = self.text.raw_len();
        let start_wfc = self.text_without_controls.raw_len();

        if !node.is_displayed() {
            // Descendants may still be displayed, e.g. a visibility override.
            self.parse_children(node);
            return;
        }

        match &node.data {
            NodeData::Text(data) => {
                self.text.append(data);
                self.text_without_controls.append(data);
            }
            NodeData::Comment(_) => {}
            NodeData::Element { tag, .. } => {
                self.visible.push(id);
                self.parse_element(node, tag);
                self.visible_bottom_up.push(id);
            }
        }

        self.positions[id.0] = Some(FindSpot::new(start, self.text.raw_len()));
        self.positions_without_controls[id.0] =
            Some(FindSpot::new(start_wfc, self.text_without_controls.raw_len()));
    }

    fn parse_children(&mut self, node: &'a Node) {
        for child in &node.children {
            self.parse(*child);
        }
    }

    fn blank(&mut self) {
        self.text.append_blank();
        self.text_without_controls.append_blank();
    }

    fn parse_element(&mut self, node: &'a Node, tag: &str) {
        match tag {
            "br" => self.blank(),
            "img" => {
                let alt = node.attr("alt").unwrap_or_default();
                self.text.append(alt);
                self.text_without_controls.append(alt);
            }
            "input" => self.parse_input(node),
            "select" | "textarea" => {
                self.text_without_controls.suppress();
                self.parse_children(node);
                self.text_without_controls.resume();
                self.text.append_blank();
            }
            "option" => {
                self.parse_children(node);
                self.text.append_blank();
            }
            "optgroup" => {
                self.text.append(node.attr("label").unwrap_or_default());
                self.text.append_blank();
                self.parse_children(node);
            }
            "button" => {
                self.text_without_controls.suppress();
                self.parse_children(node);
                self.text_without_controls.resume();
                self.blank();
            }
            "legend" => {
                self.parse_children(node);
                self.blank();
            }
            "ol" => {
                self.blank();
                let mut number = 1;
                for child in &node.children {
                    let is_item = self
                        .document
                        .get(*child)
                        .is_some_and(|c| c.is_tag("li") && c.is_displayed());
                    if is_item {
                        let prefix = format!("{number}. ");
                        self.text.append(&prefix);
                        self.text_without_controls.append(&prefix);
                        number += 1;
                    }
                    self.parse(*child);
                }
                self.blank();
            }
            "iframe" | "frame" | "applet" | "object" => {}
            _ if BLOCK_TAGS.contains(&tag) => {
                self.blank();
                self.parse_children(node);
                self.blank();
            }
            _ => self.parse_children(node),
        }
    }

    fn parse_input(&mut self, node: &Node) {
        let kind = node.input_type().unwrap_or_default();
        match kind.as_str() {
            "hidden" | "file" => {}
            "submit" | "reset" | "button" => {
                self.text.append(node.attr("value").unwrap_or_default());
                self.text.append_blank();
            }
            "checkbox" | "radio" => self.blank(),
            "image" => self.text.append(node.attr("alt").unwrap_or_default()),
            _ => self.text.append(node.attr("value").unwrap_or_default()),
        }
    }

    /// The whole displayed text.
    pub fn text(&self) -> &str {
        self.text.as_str()
    }

    pub fn position(&self, id: NodeId) -> Option<FindSpot> {
        self.positions.get(id.0).copied().flatten()
    }

    pub fn first_occurrence(&self, pattern: &SearchPattern, from: usize) -> Option<FindSpot> {
        pattern.first_occurrence(self.text.raw(), from)
    }

    pub fn text_before(&self, id: NodeId) -> Option<&str> {
        self.position(id).map(|spot| self.text.slice(0, spot.start))
    }

    pub fn text_before_including_self(&self, id: NodeId) -> Option<&str> {
        self.position(id).map(|spot| self.text.slice(0, spot.end))
    }

    pub fn as_text(&self, id: NodeId) -> Option<&str> {
        self.position(id).map(|spot| self.text.slice(spot.start, spot.end))
    }

    pub fn as_text_without_form_controls(&self, id: NodeId) -> Option<&str> {
        self.positions_without_controls
            .get(id.0)
            .copied()
            .flatten()
            .map(|spot| self.text_without_controls.slice(spot.start, spot.end))
    }

    /// Displayed nodes before `id` in document order, nearest first.
    fn displayed_before(&self, id: NodeId) -> impl Iterator<Item = (&'a Node, FindSpot)> + '_ {
        (0..id.0).rev().filter_map(move |i| {
            let spot = self.positions[i]?;
            self.document.get(NodeId(i)).map(|n| (n, spot))
        })
    }

    fn displayed_after(&self, id: NodeId) -> impl Iterator<Item = (&'a Node, FindSpot)> + '_ {
        (id.0 + 1..self.positions.len()).filter_map(move |i| {
            let spot = self.positions[i]?;
            self.document.get(NodeId(i)).map(|n| (n, spot))
        })
    }

    /// Text between the previous displayed form control (or the start of the
    /// form) and the node. Text in front of `from` is never part of it.
    pub fn label_text_before(&self, id: NodeId, from: usize) -> Option<&str> {
        let spot = self.position(id)?;
        let form = self.document.enclosing_form(id);
        let mut start = 0;

        for (node, node_spot) in self.displayed_before(id) {
            if node.is_tag("body") || Some(node.id) == form {
                start = node_spot.start;
                break;
            }
            if node.is_form_control() {
                start = node_spot.end;
                let text = self.text.slice(start.max(from), spot.start);
                if !text.is_empty() {
                    return Some(text);
                }
            }
            if node.is_element() {
                let other = self.document.enclosing_form(node.id);
                if other.is_some() && other != form {
                    start = node_spot.end;
                    break;
                }
            }
        }
        Some(self.text.slice(start.max(from), spot.start))
    }

    /// Text between the node and the next displayed form control, block
    /// element or end of its form.
    pub fn label_text_after(&self, id: NodeId) -> Option<&str> {
        let spot = self.position(id)?;
        let form = self.document.enclosing_form(id);
        let mut end = self.text.raw_len();

        for (node, node_spot) in self.displayed_after(id) {
            if self.document.contains(id, node.id) || !node.is_element() {
                continue;
            }
            let is_block = node.tag().is_some_and(|t| BLOCK_TAGS.contains(&t));
            let leaves_form = form.is_some() && self.document.enclosing_form(node.id) != form;
            if node.is_form_control() || is_block || leaves_form {
                end = node_spot.start;
                break;
            }
        }
        Some(self.text.slice(spot.end, end))
    }

    /// Displayed elements in document order.
    pub fn visible_elements(&self) -> &[NodeId] {
        &self.visible
    }

    /// Displayed elements with every descendant listed before its ancestors.
    pub fn visible_elements_bottom_up(&self) -> &[NodeId] {
        &self.visible_bottom_up
    }

    /// Smallest displayed element whose span encloses `hit`.
    pub fn smallest_enclosing(&self, hit: FindSpot) -> Option<NodeId> {
        self.visible_bottom_up
            .iter()
            .copied()
            .find(|id| self.position(*id).is_some_and(|spot| spot.encloses(&hit)))
    }
}
