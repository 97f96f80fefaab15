//! Control kinds and the matcher chain each of them runs.

use crate::matcher::MatcherKind;
use crate::wpath::WPath;
use locus_common::{Document, Node};
use serde::{Deserialize, Serialize};

/// `<input>` types edited as a single line of text.
const TEXT_INPUT_TYPES: &[&str] = &[
    "text", "password", "email", "tel", "search", "url", "number", "date", "time",
    "datetime-local", "month", "week",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentifierKind {
    Anchor,
    Button,
    /// `<input>` of type submit, reset or button.
    InputButton,
    ImageInput,
    Image,
    TextInput,
    TextArea,
    Checkbox,
    RadioButton,
    Select,
    Option,
}

impl IdentifierKind {
    pub const ALL: [IdentifierKind; 11] = [
        IdentifierKind::Anchor,
        IdentifierKind::Button,
        IdentifierKind::InputButton,
        IdentifierKind::ImageInput,
        IdentifierKind::Image,
        IdentifierKind::TextInput,
        IdentifierKind::TextArea,
        IdentifierKind::Checkbox,
        IdentifierKind::RadioButton,
        IdentifierKind::Select,
        IdentifierKind::Option,
    ];

    pub fn name(self) -> &'static str {
        match self {
            IdentifierKind::Anchor => "HtmlAnchor",
            IdentifierKind::Button => "HtmlButton",
            IdentifierKind::InputButton => "HtmlButtonInput",
            IdentifierKind::ImageInput => "HtmlImageInput",
            IdentifierKind::Image => "HtmlImage",
            IdentifierKind::TextInput => "HtmlTextInput",
            IdentifierKind::TextArea => "HtmlTextArea",
            IdentifierKind::Checkbox => "HtmlCheckBoxInput",
            IdentifierKind::RadioButton => "HtmlRadioButtonInput",
            IdentifierKind::Select => "HtmlSelect",
            IdentifierKind::Option => "HtmlOption",
        }
    }

    /// Whether `<label>` elements may stand in for controls of this kind.
    pub fn accepts_labels(self) -> bool {
        matches!(
            self,
            IdentifierKind::TextInput
                | IdentifierKind::TextArea
                | IdentifierKind::Checkbox
                | IdentifierKind::RadioButton
                | IdentifierKind::Select
        )
    }

    /// Whether `node` is a control of this kind.
    pub fn supports(self, node: &Node) -> bool {
        match self {
            IdentifierKind::Anchor => node.is_tag("a"),
            IdentifierKind::Button => node.is_tag("button"),
            IdentifierKind::InputButton => node.is_input_of(&["submit", "reset", "button"]),
            IdentifierKind::ImageInput => node.is_input_of(&["image"]),
            IdentifierKind::Image => node.is_tag("img"),
            IdentifierKind::TextInput => node.is_input_of(TEXT_INPUT_TYPES),
            IdentifierKind::TextArea => node.is_tag("textarea"),
            IdentifierKind::Checkbox => node.is_input_of(&["checkbox"]),
            IdentifierKind::RadioButton => node.is_input_of(&["radio"]),
            IdentifierKind::Select => node.is_tag("select"),
            IdentifierKind::Option => node.is_tag("option"),
        }
    }

    /// Whether this kind evaluates `node`, either as one of its controls or
    /// as a label of one.
    pub fn claims(self, document: &Document, node: &Node) -> bool {
        if self.supports(node) {
            return true;
        }
        self.accepts_labels()
            && node.is_tag("label")
            && document
                .labeled_control(node.id)
                .and_then(|c| document.get(c))
                .is_some_and(|c| self.supports(c))
    }

    /// Matchers to run for `node`, most specific first.
    pub fn matchers(self, path: &WPath, node: &Node) -> Vec<MatcherKind> {
        if node.is_tag("label") {
            return if path.target().is_some() {
                vec![MatcherKind::HtmlLabel(self)]
            } else {
                Vec::new()
            };
        }
        if path.target().is_none() {
            return if path.table_coordinates().is_empty() {
                Vec::new()
            } else {
                vec![MatcherKind::TableCoordinates(self)]
            };
        }

        use MatcherKind::*;
        match self {
            IdentifierKind::Anchor | IdentifierKind::Button => {
                vec![InnerImage, ElementText, Title, AriaLabel, Name, DataTestid, Id]
            }
            IdentifierKind::InputButton => vec![Value, Title, AriaLabel, Name, DataTestid, Id],
            IdentifierKind::ImageInput | IdentifierKind::Image => {
                vec![ImageAlt, ImageSrc, ImageTitle, AriaLabel, Name, DataTestid, Id]
            }
            IdentifierKind::TextInput | IdentifierKind::TextArea => {
                vec![LabelTextBefore, Placeholder, Title, AriaLabel, Name, DataTestid, Id]
            }
            IdentifierKind::Checkbox | IdentifierKind::RadioButton => {
                vec![LabelTextAfter, Title, AriaLabel, Name, DataTestid, Id]
            }
            IdentifierKind::Select => vec![LabelTextBefore, Title, AriaLabel, Name, DataTestid, Id],
            IdentifierKind::Option => vec![ElementText, LabelAttribute, Title, Id],
        }
    }
}

/// The identifier kinds taking part in a lookup, in registration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentifierSet {
    kinds: Vec<IdentifierKind>,
}

impl Default for IdentifierSet {
    fn default() -> Self {
        Self::new(IdentifierKind::ALL)
    }
}

impl IdentifierSet {
    pub fn new(kinds: impl IntoIterator<Item = IdentifierKind>) -> Self {
        let mut unique = Vec::new();
        for kind in kinds {
            if !unique.contains(&kind) {
                unique.push(kind);
            }
        }
        Self { kinds: unique }
    }

    pub fn kinds(&self) -> &[IdentifierKind] {
        &self.kinds
    }

    /// Registered kinds claiming `node`.
    pub fn claiming<'s>(
        &'s self,
        document: &'s Document,
        node: &'s Node,
    ) -> impl Iterator<Item = IdentifierKind> + 's {
        self.kinds
            .iter()
            .copied()
            .filter(move |kind| kind.claims(document, node))
    }

    pub fn claims(&self, document: &Document, node: &Node) -> bool {
        self.claiming(document, node).next().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use locus_common::SnapshotNode;

    // ====
    // supports / claims
    // ====

    #[test]
    fn test_text_input_covers_password_but_not_checkbox() {
        let doc = Document::from_snapshot(
            &SnapshotNode::element("body").children([
                SnapshotNode::element("input").attr("type", "password"),
                SnapshotNode::element("input").attr("type", "checkbox"),
                SnapshotNode::element("input"),
            ]),
        );
        let nodes: Vec<&Node> = doc.nodes().filter(|n| n.is_tag("input")).collect();
        assert!(IdentifierKind::TextInput.supports(nodes[0]));
        assert!(!IdentifierKind::TextInput.supports(nodes[1]));
        assert!(IdentifierKind::Checkbox.supports(nodes[1]));
        assert!(IdentifierKind::TextInput.supports(nodes[2]));
    }

    #[test]
    fn test_label_claimed_by_kind_of_labelled_control() {
        let doc = Document::from_snapshot(
            &SnapshotNode::element("body").children([
                SnapshotNode::element("label").attr("for", "agree").with_text("Agree"),
                SnapshotNode::element("input").attr("type", "checkbox").attr("id", "agree"),
            ]),
        );
        let label = doc.nodes().find(|n| n.is_tag("label")).unwrap();
        assert!(IdentifierKind::Checkbox.claims(&doc, label));
        assert!(!IdentifierKind::TextInput.claims(&doc, label));
        assert!(!IdentifierKind::Anchor.claims(&doc, label));
    }

    // ====
    // registry
    // ====

    #[test]
    fn test_set_drops_duplicates_and_keeps_order() {
        let set = IdentifierSet::new([
            IdentifierKind::Select,
            IdentifierKind::Anchor,
            IdentifierKind::Select,
        ]);
        assert_eq!(set.kinds(), &[IdentifierKind::Select, IdentifierKind::Anchor]);
        assert_eq!(IdentifierSet::default().kinds().len(), IdentifierKind::ALL.len());
    }
}
