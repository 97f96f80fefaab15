use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// Custom deserializer for HashMap<String, String> that filters out null values.
/// Renderers report absent attributes as `null`; those are dropped on load.
fn deserialize_nullable_string_map<'de, D>(
    deserializer: D,
) -> Result<HashMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let map: Option<HashMap<String, Option<String>>> = Option::deserialize(deserializer)?;
    Ok(map
        .unwrap_or_default()
        .into_iter()
        .filter_map(|(k, v)| v.map(|val| (k, val)))
        .collect())
}

/// One node of a rendered document as delivered by the rendering collaborator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum SnapshotNode {
    Text { text: String },
    Comment { comment: String },
    Element(ElementSnapshot),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ElementSnapshot {
    pub tag: String,
    #[serde(default, deserialize_with = "deserialize_nullable_string_map")]
    pub attributes: HashMap<String, String>,
    /// Visibility as computed by the renderer. When absent it is derived
    /// from attributes and inherited style.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub displayed: Option<bool>,
    #[serde(default)]
    pub children: Vec<SnapshotNode>,
}

impl SnapshotNode {
    pub fn text(text: impl Into<String>) -> Self {
        SnapshotNode::Text { text: text.into() }
    }

    pub fn comment(comment: impl Into<String>) -> Self {
        SnapshotNode::Comment {
            comment: comment.into(),
        }
    }

    pub fn element(tag: impl Into<String>) -> Self {
        SnapshotNode::Element(ElementSnapshot {
            tag: tag.into(),
            ..Default::default()
        })
    }

    /// Set an attribute. No-op on text and comment nodes.
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        if let SnapshotNode::Element(element) = &mut self {
            element.attributes.insert(name.into(), value.into());
        }
        self
    }

    pub fn child(mut self, child: SnapshotNode) -> Self {
        if let SnapshotNode::Element(element) = &mut self {
            element.children.push(child);
        }
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = SnapshotNode>) -> Self {
        if let SnapshotNode::Element(element) = &mut self {
            element.children.extend(children);
        }
        self
    }

    /// Shorthand for an element holding a single text child.
    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.child(SnapshotNode::text(text))
    }

    /// Mark the element as not displayed by the renderer.
    pub fn hidden(self) -> Self {
        self.displayed(false)
    }

    pub fn displayed(mut self, displayed: bool) -> Self {
        if let SnapshotNode::Element(element) = &mut self {
            element.displayed = Some(displayed);
        }
        self
    }
}
