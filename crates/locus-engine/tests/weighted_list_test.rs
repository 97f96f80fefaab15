use locus_common::{Document, NodeId, SnapshotNode};
use locus_engine::{Control, FoundType, IdentifierKind, TextIndex, WeightedResultList};

fn control(node: usize) -> Control {
    Control {
        node: NodeId(node),
        kind: None,
        description: format!("[element {node}]"),
    }
}

#[test]
fn test_sorted_by_priority_coverage_distance() {
    let mut list = WeightedResultList::new();
    list.add(control(1), FoundType::ById, 0, 0);
    list.add(control(2), FoundType::ByText, 3, 0);
    list.add(control(3), FoundType::ByText, 1, 9);
    list.add(control(4), FoundType::ByText, 1, 2);

    let nodes: Vec<usize> = list.sorted().iter().map(|e| e.control.node.0).collect();
    assert_eq!(nodes, vec![4, 3, 2, 1]);
}

#[test]
fn test_ties_keep_insertion_order() {
    let mut list = WeightedResultList::new();
    for node in [5, 3, 9, 1] {
        list.add(control(node), FoundType::ByLabel, 2, 2);
    }
    let nodes: Vec<usize> = list.sorted().iter().map(|e| e.control.node.0).collect();
    assert_eq!(nodes, vec![5, 3, 9, 1]);
}

#[test]
fn test_dedup_keeps_best_entry_per_element() {
    let mut list = WeightedResultList::new();
    list.add(control(7), FoundType::ById, 0, 0);
    list.add(control(7), FoundType::ByName, 0, 0);

    let sorted = list.sorted();
    assert_eq!(sorted.len(), 1);
    assert_eq!(sorted[0].found_type, FoundType::ByName);

    // Sorting again does not change the outcome.
    let mut again = WeightedResultList::new();
    for entry in sorted.iter().cloned() {
        again.add_entry(entry);
    }
    assert_eq!(again.sorted(), sorted);
}

#[test]
fn test_add_all_merges_in_order() {
    let mut first = WeightedResultList::new();
    first.add(control(1), FoundType::ByText, 0, 0);
    let mut second = WeightedResultList::new();
    second.add(control(2), FoundType::ByText, 0, 0);
    second.add(control(1), FoundType::ById, 0, 0);

    first.add_all(second);
    assert_eq!(first.len(), 3);
    assert!(first.has_multiple());
    let nodes: Vec<usize> = first.controls().iter().map(|c| c.node.0).collect();
    assert_eq!(nodes, vec![1, 2]);
}

#[test]
fn test_entry_display_format() {
    let mut list = WeightedResultList::new();
    list.add(control(3), FoundType::ByLabelText, 4, 12);
    assert_eq!(
        list.entries()[0].to_string(),
        "[element 3] found by: BY_LABEL_TEXT coverage: 4 distance: 12"
    );
}

#[test]
fn test_control_description() {
    let doc = Document::from_snapshot(&SnapshotNode::element("body").child(
        SnapshotNode::element("button")
            .attr("id", "save")
            .attr("name", "action")
            .with_text("Save changes"),
    ));
    let index = TextIndex::build(&doc);
    let node = doc.element_by_id("save").unwrap();

    let described = Control::new(&index, node, Some(IdentifierKind::Button));
    assert_eq!(described.description, "[HtmlButton 'Save changes' (id='save') (name='action')]");

    let generic = Control::new(&index, node, None);
    assert!(generic.to_string().starts_with("[button 'Save changes'"));
}

#[test]
fn test_empty_list() {
    let list = WeightedResultList::new();
    assert!(list.is_empty());
    assert!(!list.has_multiple());
    assert!(list.sorted().is_empty());
}

#[test]
fn test_entry_json_shape() {
    let mut list = WeightedResultList::new();
    list.add(
        Control {
            node: NodeId(4),
            kind: Some(IdentifierKind::TextInput),
            description: "[HtmlTextInput (id='q')]".to_string(),
        },
        FoundType::ByPlaceholder,
        2,
        5,
    );

    let json = serde_json::to_value(&list.sorted()[0]).unwrap();
    assert_eq!(json["control"]["node"], 4);
    assert_eq!(json["control"]["kind"], "text_input");
    assert_eq!(json["found_type"], "BY_PLACEHOLDER");
    assert_eq!(json["coverage"], 2);
    assert_eq!(json["distance"], 5);

    let generic = serde_json::to_value(control(1)).unwrap();
    assert!(generic["kind"].is_null());
}

#[test]
fn test_explained_lists_ranked_then_superseded() {
    let mut list = WeightedResultList::new();
    list.add(control(1), FoundType::ById, 0, 0);
    list.add(control(2), FoundType::ByText, 0, 4);
    list.add(control(1), FoundType::ByName, 0, 0);

    let explained: Vec<(usize, FoundType)> = list
        .explained()
        .iter()
        .map(|e| (e.control.node.0, e.found_type))
        .collect();
    assert_eq!(
        explained,
        vec![(2, FoundType::ByText), (1, FoundType::ByName), (1, FoundType::ById)]
    );
    assert_eq!(list.explained()[..2], list.sorted()[..]);
}
