//! Arena representation of a rendered document.
//!
//! Nodes are stored in preorder, so a node's subtree is the contiguous id range
//! `[id, subtree_end)`. Visibility is computed once at load time from the
//! renderer's explicit flags, attributes and inherited style, and never changes
//! for the lifetime of a `Document`.

use crate::snapshot::{ElementSnapshot, SnapshotNode};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// Tags whose content is never rendered.
const NON_RENDERED_TAGS: &[&str] = &["head", "script", "style", "title", "template", "noscript"];

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Failed to parse document snapshot: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Node {0} does not exist in this document")]
    StaleNode(NodeId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeData {
    Element {
        tag: String,
        attributes: HashMap<String, String>,
    },
    Text(String),
    Comment(String),
}

#[derive(Debug, Clone)]
pub struct Node {
    pub id: NodeId,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub data: NodeData,
    subtree_end: usize,
    displayed: bool,
}

impl Node {
    pub fn tag(&self) -> Option<&str> {
        match &self.data {
            NodeData::Element { tag, .. } => Some(tag),
            _ => None,
        }
    }

    pub fn is_element(&self) -> bool {
        matches!(self.data, NodeData::Element { .. })
    }

    pub fn is_tag(&self, name: &str) -> bool {
        self.tag() == Some(name)
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        match &self.data {
            NodeData::Element { attributes, .. } => attributes.get(name).map(String::as_str),
            _ => None,
        }
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attr(name).is_some()
    }

    /// Character data of a text node.
    pub fn text(&self) -> Option<&str> {
        match &self.data {
            NodeData::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Lowercased `type` of an `<input>`, defaulting to `text`.
    pub fn input_type(&self) -> Option<String> {
        if !self.is_tag("input") {
            return None;
        }
        Some(
            self.attr("type")
                .map(|t| t.trim().to_ascii_lowercase())
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| "text".to_string()),
        )
    }

    pub fn is_input_of(&self, types: &[&str]) -> bool {
        self.input_type()
            .is_some_and(|t| types.iter().any(|candidate| *candidate == t))
    }

    pub fn is_displayed(&self) -> bool {
        self.displayed
    }

    /// A control that takes part in form submission and is shown to the user.
    pub fn is_form_control(&self) -> bool {
        match self.tag() {
            Some("select" | "textarea" | "button") => true,
            Some("input") => !self.is_input_of(&["hidden"]),
            _ => false,
        }
    }

    pub fn is_disabled(&self) -> bool {
        self.has_attr("disabled")
    }
}

#[derive(Debug, Clone, Default)]
pub struct Document {
    nodes: Vec<Node>,
    ids: HashMap<String, NodeId>,
}

#[derive(Clone, Copy, Default)]
struct Inherited {
    display_none: bool,
    visibility_hidden: bool,
}

impl Document {
    /// A document without any node, as produced for a page without body.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_snapshot(root: &SnapshotNode) -> Self {
        let mut doc = Document::default();
        doc.append(root, None, Inherited::default());
        doc
    }

    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        let root: SnapshotNode = serde_json::from_str(json)?;
        Ok(Self::from_snapshot(&root))
    }

    fn append(&mut self, snapshot: &SnapshotNode, parent: Option<NodeId>, inherited: Inherited) {
        let id = NodeId(self.nodes.len());
        let parent_displayed = parent
            .and_then(|p| self.nodes.get(p.0))
            .is_none_or(|p| p.displayed);

        let (data, displayed, child_state, children) = match snapshot {
            SnapshotNode::Text { text } => (
                NodeData::Text(text.clone()),
                parent_displayed,
                inherited,
                &[][..],
            ),
            SnapshotNode::Comment { comment } => (
                NodeData::Comment(comment.clone()),
                false,
                inherited,
                &[][..],
            ),
            SnapshotNode::Element(element) => {
                let (displayed, state) = element_visibility(element, inherited);
                (
                    NodeData::Element {
                        tag: element.tag.to_ascii_lowercase(),
                        attributes: element.attributes.clone(),
                    },
                    displayed,
                    state,
                    element.children.as_slice(),
                )
            }
        };

        if let NodeData::Element { attributes, .. } = &data {
            if let Some(html_id) = attributes.get("id").filter(|v| !v.is_empty()) {
                self.ids.entry(html_id.clone()).or_insert(id);
            }
        }

        self.nodes.push(Node {
            id,
            parent,
            children: Vec::with_capacity(children.len()),
            data,
            subtree_end: id.0 + 1,
            displayed,
        });
        if let Some(parent) = parent {
            self.nodes[parent.0].children.push(id);
        }

        for child in children {
            self.append(child, Some(id), child_state);
        }
        self.nodes[id.0].subtree_end = self.nodes.len();
    }

    pub fn root(&self) -> Option<NodeId> {
        self.nodes.first().map(|n| n.id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Like [`Document::get`] but reports an unknown id as an error.
    pub fn node(&self, id: NodeId) -> Result<&Node, DocumentError> {
        self.get(id).ok_or(DocumentError::StaleNode(id))
    }

    /// All nodes in document order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Ancestors from the parent up to the root.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = &Node> {
        std::iter::successors(self.parent(id).and_then(|p| self.get(p)), move |n| {
            n.parent.and_then(|p| self.get(p))
        })
    }

    /// Descendants in document order, excluding the node itself.
    pub fn descendants(&self, id: NodeId) -> impl Iterator<Item = &Node> {
        let range = match self.get(id) {
            Some(node) => id.0 + 1..node.subtree_end,
            None => 0..0,
        };
        self.nodes[range].iter()
    }

    /// Whether `node` lies inside the subtree of `ancestor` (or is `ancestor`).
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        self.get(ancestor)
            .is_some_and(|a| ancestor.0 <= node.0 && node.0 < a.subtree_end)
    }

    pub fn element_by_id(&self, html_id: &str) -> Option<NodeId> {
        self.ids.get(html_id).copied()
    }

    pub fn is_displayed(&self, id: NodeId) -> bool {
        self.get(id).is_some_and(Node::is_displayed)
    }

    /// Nearest node (starting with `id` itself) whose tag is one of `tags`.
    pub fn closest(&self, id: NodeId, tags: &[&str]) -> Option<NodeId> {
        let node = self.get(id)?;
        std::iter::once(node)
            .chain(self.ancestors(id))
            .find(|n| n.tag().is_some_and(|t| tags.contains(&t)))
            .map(|n| n.id)
    }

    pub fn enclosing_form(&self, id: NodeId) -> Option<NodeId> {
        self.closest(id, &["form"])
    }

    /// The control a `<label>` describes: the target of its `for` attribute,
    /// or the first form control nested inside it.
    pub fn labeled_control(&self, label: NodeId) -> Option<NodeId> {
        let node = self.get(label)?;
        if !node.is_tag("label") {
            return None;
        }
        if let Some(target) = node.attr("for").filter(|f| !f.is_empty()) {
            return self.element_by_id(target);
        }
        self.descendants(label)
            .find(|n| n.is_form_control())
            .map(|n| n.id)
    }
}

fn element_visibility(element: &ElementSnapshot, inherited: Inherited) -> (bool, Inherited) {
    let tag = element.tag.to_ascii_lowercase();
    let style = element.attributes.get("style").map(String::as_str);

    let hidden_input = tag == "input"
        && element
            .attributes
            .get("type")
            .is_some_and(|t| t.trim().eq_ignore_ascii_case("hidden"));

    let mut display_none = inherited.display_none
        || element.attributes.contains_key("hidden")
        || hidden_input
        || NON_RENDERED_TAGS.contains(&tag.as_str())
        || style_property(style, "display").as_deref() == Some("none");

    let visibility_hidden = match style_property(style, "visibility").as_deref() {
        Some("hidden" | "collapse") => true,
        Some("visible") => false,
        _ => inherited.visibility_hidden,
    };

    let displayed = match element.displayed {
        Some(explicit) => {
            display_none = !explicit;
            explicit
        }
        None => !display_none && !visibility_hidden,
    };

    (
        displayed,
        Inherited {
            display_none,
            visibility_hidden,
        },
    )
}

/// Value of one declaration in an inline `style` attribute, lowercased.
fn style_property(style: Option<&str>, property: &str) -> Option<String> {
    style?
        .split(';')
        .filter_map(|decl| decl.split_once(':'))
        .filter(|(name, _)| name.trim().eq_ignore_ascii_case(property))
        .map(|(_, value)| value.trim().to_ascii_lowercase())
        .next_back()
}
