use locus_common::{Document, SnapshotNode};
use locus_engine::search::FindSpot;
use locus_engine::{LocatorError, PathAnchor, TextIndex, WPath};

#[test]
fn test_parse_splits_context_and_target() {
    let path = WPath::parse_locator(" Billing >  Street > ").unwrap();
    assert_eq!(path.raw(), &["Billing".to_string(), "Street".to_string()]);
    assert_eq!(path.path_nodes(), &["Billing".to_string()]);
    assert_eq!(path.target().map(|t| t.original()), Some("Street"));
    assert_eq!(path.path_pattern().map(|p| p.original()), Some("Billing"));
    assert!(path.table_coordinates().is_empty());
    assert_eq!(path.to_string(), "Billing > Street");
}

#[test]
fn test_empty_locator() {
    let path = WPath::parse_locator("  ").unwrap();
    assert!(path.is_empty());
    assert!(path.target().is_none());
    assert!(path.path_pattern().is_none());
}

#[test]
fn test_context_fragments_join_into_one_pattern() {
    let path = WPath::new(&["Shipping", "Address", "City"]).unwrap();
    assert_eq!(path.path_pattern().unwrap().original(), "Shipping*Address");
}

// ============================================================================
// Table coordinates
// ============================================================================

#[test]
fn test_table_coordinates_are_not_context() {
    let path = WPath::parse_locator("Orders > [Total; Row 2] > Edit").unwrap();
    assert_eq!(path.path_nodes(), &["Orders".to_string()]);
    let coordinates = path.table_coordinates();
    assert_eq!(coordinates.len(), 1);
    assert_eq!(coordinates[0].column.as_ref().unwrap().original(), "Total");
    assert_eq!(coordinates[0].row.as_ref().unwrap().original(), "Row 2");
    assert_eq!(coordinates[0].to_string(), "[Total;Row 2]");
}

#[test]
fn test_trailing_coordinate_means_no_target() {
    let path = WPath::parse_locator("[Price] > [;Apples]").unwrap();
    assert!(path.target().is_none());
    assert_eq!(path.table_coordinates().len(), 2);
    let reversed = path.table_coordinates_reversed();
    assert!(reversed[0].column.is_none());
    assert_eq!(reversed[1].column.as_ref().unwrap().original(), "Price");
}

#[test]
fn test_invalid_coordinates() {
    assert!(matches!(
        WPath::parse_locator("[a;b;c] > x"),
        Err(LocatorError::InvalidPath { .. })
    ));
    assert!(matches!(
        WPath::parse_locator("[ ; ] > x"),
        Err(LocatorError::InvalidPath { .. })
    ));
    assert!(matches!(
        WPath::parse_locator("[a] > ctx > [b] > x"),
        Err(LocatorError::InvalidPath { .. })
    ));
}

#[test]
fn test_wildcard_limit_applies_to_fragments() {
    let err = WPath::parse_locator_with_limit("a*b*c", 1).unwrap_err();
    assert!(matches!(err, LocatorError::Pattern(_)));
}

// ============================================================================
// Resolution
// ============================================================================

#[test]
fn test_resolve_anchor() {
    let doc = Document::from_snapshot(
        &SnapshotNode::element("body").children([
            SnapshotNode::element("h1").with_text("Billing"),
            SnapshotNode::element("p").with_text("Street"),
        ]),
    );
    let index = TextIndex::build(&doc);

    let path = WPath::parse_locator("Street").unwrap();
    assert_eq!(path.resolve(&index), PathAnchor::Unconstrained);

    let path = WPath::parse_locator("Billing > Street").unwrap();
    let anchor = path.resolve(&index);
    assert_eq!(anchor, PathAnchor::At(FindSpot::new(0, 7)));
    assert!(anchor.admits(8));
    assert!(!anchor.admits(3));

    let path = WPath::parse_locator("Shipping > Street").unwrap();
    let anchor = path.resolve(&index);
    assert_eq!(anchor, PathAnchor::Missing);
    assert!(!anchor.admits(100));
}
