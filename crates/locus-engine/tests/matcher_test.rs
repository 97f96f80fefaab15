use locus_common::{Document, NodeId, SnapshotNode};
use locus_engine::matcher::{FoundType, MatchContext, MatcherKind};
use locus_engine::{IdentifierKind, LocatorError, MatchResult, TextIndex, WPath};

fn page(body: Vec<SnapshotNode>) -> Document {
    Document::from_snapshot(&SnapshotNode::element("body").children(body))
}

fn id(doc: &Document, html_id: &str) -> NodeId {
    doc.element_by_id(html_id).expect("element with id")
}

fn evaluate(doc: &Document, locator: &str, kind: MatcherKind, node: NodeId) -> Vec<MatchResult> {
    let index = TextIndex::build(doc);
    let path = WPath::parse_locator(locator).unwrap();
    let ctx = MatchContext::new(&index, &path, path.resolve(&index));
    kind.evaluate(&ctx, node).expect("evaluation succeeds")
}

// ============================================================================
// Attribute rules
// ============================================================================

#[test]
fn test_id_requires_exact_value() {
    let doc = page(vec![SnapshotNode::element("input").attr("id", "username")]);
    let node = id(&doc, "username");

    let hits = evaluate(&doc, "username", MatcherKind::Id, node);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].found_type, FoundType::ById);
    assert_eq!(hits[0].coverage, 0);

    assert!(evaluate(&doc, "user", MatcherKind::Id, node).is_empty());
    assert_eq!(evaluate(&doc, "user*", MatcherKind::Id, node)[0].coverage, 4);
}

#[test]
fn test_contains_rules_report_surrounding_chars() {
    let doc = page(vec![SnapshotNode::element("input")
        .attr("id", "q")
        .attr("placeholder", "Search the site")
        .attr("aria-label", "Site search")
        .attr("title", "Search")]);
    let node = id(&doc, "q");

    let placeholder = evaluate(&doc, "Search", MatcherKind::Placeholder, node);
    assert_eq!(placeholder[0].found_type, FoundType::ByPlaceholder);
    assert_eq!(placeholder[0].coverage, 9);

    let aria = evaluate(&doc, "search", MatcherKind::AriaLabel, node);
    assert_eq!(aria[0].found_type, FoundType::ByAriaLabelAttribute);
    assert_eq!(aria[0].coverage, 5);

    let title = evaluate(&doc, "Search", MatcherKind::Title, node);
    assert_eq!((title[0].found_type, title[0].coverage), (FoundType::ByTitleAttribute, 0));
}

#[test]
fn test_data_testid_is_exact() {
    let doc = page(vec![SnapshotNode::element("button")
        .attr("id", "b")
        .attr("data-testid", "submit-order")]);
    let node = id(&doc, "b");
    assert_eq!(
        evaluate(&doc, "submit-order", MatcherKind::DataTestid, node)[0].found_type,
        FoundType::ByDataTestid
    );
    assert!(evaluate(&doc, "submit", MatcherKind::DataTestid, node).is_empty());
}

#[test]
fn test_missing_or_empty_attribute_is_no_match() {
    let doc = page(vec![SnapshotNode::element("input").attr("id", "n").attr("name", "")]);
    let node = id(&doc, "n");
    assert!(evaluate(&doc, "x", MatcherKind::Name, node).is_empty());
    assert!(evaluate(&doc, "x", MatcherKind::Title, node).is_empty());
}

#[test]
fn test_match_all_target_matches_nothing() {
    let doc = page(vec![SnapshotNode::element("input").attr("id", "n").attr("name", "field")]);
    assert!(evaluate(&doc, "*", MatcherKind::Name, id(&doc, "n")).is_empty());
}

#[test]
fn test_option_label_attribute() {
    let doc = page(vec![SnapshotNode::element("select").child(
        SnapshotNode::element("option")
            .attr("id", "o")
            .attr("label", "Germany")
            .with_text("DE"),
    )]);
    let hits = evaluate(&doc, "Germany", MatcherKind::LabelAttribute, id(&doc, "o"));
    assert_eq!(hits[0].found_type, FoundType::ByLabelText);
}

// ============================================================================
// Context and distance
// ============================================================================

#[test]
fn test_nodes_before_context_are_ignored() {
    let doc = page(vec![
        SnapshotNode::element("input").attr("id", "early").attr("name", "city"),
        SnapshotNode::element("h2").with_text("Shipping"),
        SnapshotNode::element("p").with_text("Enter your"),
        SnapshotNode::element("input").attr("id", "late").attr("name", "city"),
    ]);
    assert!(evaluate(&doc, "Shipping > city", MatcherKind::Name, id(&doc, "early")).is_empty());

    let hits = evaluate(&doc, "Shipping > city", MatcherKind::Name, id(&doc, "late"));
    assert_eq!(hits.len(), 1);
    // " Enter your" follows the context
    assert_eq!(hits[0].distance, 11);
}

#[test]
fn test_distance_without_context_is_text_before() {
    let doc = page(vec![
        SnapshotNode::element("p").with_text("abc"),
        SnapshotNode::element("input").attr("id", "f").attr("name", "field"),
    ]);
    let hits = evaluate(&doc, "field", MatcherKind::Name, id(&doc, "f"));
    assert_eq!(hits[0].distance, 3);
}

// ============================================================================
// Structural matchers
// ============================================================================

#[test]
fn test_html_label_nested_control() {
    let doc = page(vec![SnapshotNode::element("label").attr("id", "l").children([
        SnapshotNode::text("Remember me "),
        SnapshotNode::element("input").attr("type", "checkbox").attr("id", "remember"),
    ])]);
    let label = id(&doc, "l");

    let hits = evaluate(&doc, "Remember", MatcherKind::HtmlLabel(IdentifierKind::Checkbox), label);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].node, id(&doc, "remember"));
    assert_eq!(hits[0].found_type, FoundType::ByLabel);
    assert_eq!(hits[0].coverage, 3);

    let wrong_kind = evaluate(&doc, "Remember", MatcherKind::HtmlLabel(IdentifierKind::TextInput), label);
    assert!(wrong_kind.is_empty());
}

#[test]
fn test_html_label_ignores_hidden_control() {
    let doc = page(vec![
        SnapshotNode::element("label").attr("id", "l").attr("for", "x").with_text("Secret"),
        SnapshotNode::element("input").attr("id", "x").hidden(),
    ]);
    let hits = evaluate(
        &doc,
        "Secret",
        MatcherKind::HtmlLabel(IdentifierKind::TextInput),
        id(&doc, "l"),
    );
    assert!(hits.is_empty());
}

#[test]
fn test_inner_image_attributes() {
    let doc = page(vec![SnapshotNode::element("a").attr("id", "a").child(
        SnapshotNode::element("img")
            .attr("alt", "Cart icon")
            .attr("title", "Cart")
            .attr("name", "cart"),
    )]);
    let hits = evaluate(&doc, "Cart", MatcherKind::InnerImage, id(&doc, "a"));
    let found: Vec<FoundType> = hits.iter().map(|h| h.found_type).collect();
    assert_eq!(
        found,
        vec![FoundType::ByInnerImgAltAttribute, FoundType::ByInnerImgTitleAttribute]
    );
    assert!(hits.iter().all(|h| h.node == id(&doc, "a")));

    let by_name = evaluate(&doc, "cart", MatcherKind::InnerImage, id(&doc, "a"));
    assert_eq!(by_name.len(), 1);
    assert_eq!(by_name[0].found_type, FoundType::ByInnerName);
}

#[test]
fn test_table_coordinates_with_colspan() {
    let doc = page(vec![SnapshotNode::element("table").children([
        SnapshotNode::element("tr").children([
            SnapshotNode::element("th").attr("colspan", "2").with_text("Amount"),
        ]),
        SnapshotNode::element("tr").children([
            SnapshotNode::element("td").child(SnapshotNode::element("input").attr("id", "net")),
            SnapshotNode::element("td").child(SnapshotNode::element("input").attr("id", "gross")),
        ]),
    ])]);
    let kind = MatcherKind::TableCoordinates(IdentifierKind::TextInput);

    let first = evaluate(&doc, "[Amount]", kind, id(&doc, "net"));
    assert_eq!(first.len(), 1);
    assert_eq!(first[0].found_type, FoundType::ByTableCoordinate);
    // The header spans both columns but only occupies the first grid slot.
    assert!(evaluate(&doc, "[Amount]", kind, id(&doc, "gross")).is_empty());
}

#[test]
fn test_table_coordinates_outside_table() {
    let doc = page(vec![SnapshotNode::element("input").attr("id", "free")]);
    let kind = MatcherKind::TableCoordinates(IdentifierKind::TextInput);
    assert!(evaluate(&doc, "[Amount]", kind, id(&doc, "free")).is_empty());
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_unknown_node_is_an_evaluation_error() {
    let doc = page(vec![SnapshotNode::element("p").with_text("x")]);
    let index = TextIndex::build(&doc);
    let path = WPath::parse_locator("x").unwrap();
    let ctx = MatchContext::new(&index, &path, path.resolve(&index));

    let err = MatcherKind::Name.evaluate(&ctx, NodeId(999)).unwrap_err();
    assert!(matches!(err, LocatorError::Evaluation { node: NodeId(999), .. }));
}
