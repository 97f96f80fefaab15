use locus_common::{Document, NodeData, NodeId, SnapshotNode};

fn page(body: Vec<SnapshotNode>) -> Document {
    let root = SnapshotNode::element("html")
        .child(SnapshotNode::element("head").child(SnapshotNode::element("title").with_text("T")))
        .child(SnapshotNode::element("body").children(body));
    Document::from_snapshot(&root)
}

fn find_by_id(doc: &Document, id: &str) -> NodeId {
    doc.element_by_id(id).expect("element with id")
}

#[test]
fn test_preorder_ids_and_navigation() {
    let doc = page(vec![
        SnapshotNode::element("div")
            .attr("id", "outer")
            .child(SnapshotNode::element("span").attr("id", "inner").with_text("x")),
        SnapshotNode::element("p").attr("id", "after"),
    ]);

    let outer = find_by_id(&doc, "outer");
    let inner = find_by_id(&doc, "inner");
    let after = find_by_id(&doc, "after");

    assert!(outer < inner && inner < after);
    assert_eq!(doc.parent(inner), Some(outer));
    assert!(doc.contains(outer, inner));
    assert!(!doc.contains(outer, after));

    let below: Vec<NodeId> = doc.descendants(outer).map(|n| n.id).collect();
    assert_eq!(below.len(), 2); // span + its text
    assert_eq!(below[0], inner);

    let tags: Vec<&str> = doc.ancestors(inner).filter_map(|n| n.tag()).collect();
    assert_eq!(tags, vec!["div", "body", "html"]);
}

#[test]
fn test_from_json_drops_null_attributes() {
    let json = r#"{
        "tag": "BODY",
        "children": [
            { "tag": "a", "attributes": { "id": "link", "title": null }, "children": [ { "text": "Go" } ] },
            { "comment": "ignored" }
        ]
    }"#;
    let doc = Document::from_json(json).unwrap();
    let link = doc.get(find_by_id(&doc, "link")).unwrap();

    assert_eq!(doc.get(doc.root().unwrap()).unwrap().tag(), Some("body"));
    assert_eq!(link.attr("title"), None);
    assert_eq!(doc.get(link.children[0]).and_then(|n| n.text()), Some("Go"));
    assert!(matches!(doc.nodes().last().unwrap().data, NodeData::Comment(_)));
}

#[test]
fn test_invalid_json_is_an_error() {
    assert!(Document::from_json("{ not json").is_err());
}

#[test]
fn test_visibility_rules() {
    let doc = page(vec![
        SnapshotNode::element("div")
            .attr("id", "none")
            .attr("style", "display:none")
            .child(SnapshotNode::element("span").attr("id", "none-child")),
        SnapshotNode::element("div")
            .attr("id", "invisible")
            .attr("style", "visibility: hidden")
            .child(SnapshotNode::element("span").attr("id", "invisible-child"))
            .child(
                SnapshotNode::element("span")
                    .attr("id", "override")
                    .attr("style", "visibility: visible"),
            ),
        SnapshotNode::element("input").attr("id", "hidden-input").attr("type", "hidden"),
        SnapshotNode::element("p").attr("id", "attr-hidden").attr("hidden", ""),
        SnapshotNode::element("p").attr("id", "renderer").hidden(),
        SnapshotNode::element("p").attr("id", "visible"),
    ]);

    let displayed = |id: &str| doc.is_displayed(find_by_id(&doc, id));

    assert!(!displayed("none"));
    assert!(!displayed("none-child"));
    assert!(!displayed("invisible"));
    assert!(!displayed("invisible-child"));
    assert!(displayed("override"));
    assert!(!displayed("hidden-input"));
    assert!(!displayed("attr-hidden"));
    assert!(!displayed("renderer"));
    assert!(displayed("visible"));

    let title = doc.nodes().find(|n| n.is_tag("title")).unwrap();
    assert!(!title.is_displayed());
}

#[test]
fn test_labeled_control_by_for_and_nesting() {
    let doc = page(vec![
        SnapshotNode::element("label")
            .attr("id", "for-label")
            .attr("for", "target")
            .with_text("Name"),
        SnapshotNode::element("input").attr("id", "target"),
        SnapshotNode::element("label")
            .attr("id", "nested-label")
            .with_text("Accept")
            .child(SnapshotNode::element("input").attr("id", "nested").attr("type", "checkbox")),
        SnapshotNode::element("label").attr("id", "empty-label").with_text("Nothing"),
    ]);

    assert_eq!(
        doc.labeled_control(find_by_id(&doc, "for-label")),
        Some(find_by_id(&doc, "target"))
    );
    assert_eq!(
        doc.labeled_control(find_by_id(&doc, "nested-label")),
        Some(find_by_id(&doc, "nested"))
    );
    assert_eq!(doc.labeled_control(find_by_id(&doc, "empty-label")), None);
    assert_eq!(doc.labeled_control(find_by_id(&doc, "target")), None);
}

#[test]
fn test_input_type_and_form_controls() {
    let doc = page(vec![
        SnapshotNode::element("form").attr("id", "form").children(vec![
            SnapshotNode::element("input").attr("id", "plain"),
            SnapshotNode::element("input").attr("id", "check").attr("type", "CheckBox"),
            SnapshotNode::element("input").attr("id", "secret").attr("type", "hidden"),
        ]),
    ]);

    let plain = doc.get(find_by_id(&doc, "plain")).unwrap();
    let check = doc.get(find_by_id(&doc, "check")).unwrap();
    let secret = doc.get(find_by_id(&doc, "secret")).unwrap();

    assert_eq!(plain.input_type().as_deref(), Some("text"));
    assert!(check.is_input_of(&["checkbox"]));
    assert!(plain.is_form_control());
    assert!(!secret.is_form_control());
    assert_eq!(doc.enclosing_form(check.id), Some(find_by_id(&doc, "form")));
}

#[test]
fn test_empty_document() {
    let doc = Document::empty();
    assert!(doc.is_empty());
    assert_eq!(doc.root(), None);
    assert!(doc.node(NodeId(0)).is_err());
}
