//! Controls addressed by table coordinates instead of text.
//!
//! Coordinates are checked innermost first. For each one the enclosing cell
//! is located and the header texts of its column (`x`) and row (`y`) are
//! compared; if the cell does not qualify, the cell of the next outer table
//! is tried. A satisfied coordinate moves the search to the row holding the
//! cell, so the next coordinate applies to an outer table.

use super::{FoundType, MatchContext, MatchResult};
use crate::error::LocatorError;
use crate::identifier::IdentifierKind;
use crate::search::SearchPattern;
use crate::wpath::{PathAnchor, TableCoordinate};
use locus_common::{Document, Node, NodeId};

const CELL_TAGS: &[&str] = &["td", "th"];

pub(super) fn evaluate(
    ctx: &MatchContext<'_, '_>,
    id: NodeId,
    kind: IdentifierKind,
) -> Result<Vec<MatchResult>, LocatorError> {
    let node = ctx.node(id)?;
    if !kind.supports(node) || ctx.anchor == PathAnchor::Missing {
        return Ok(Vec::new());
    }
    let Some(spot) = ctx.index.position(id) else {
        return Ok(Vec::new());
    };
    if !ctx.anchor.admits(spot.start) {
        return Ok(Vec::new());
    }
    if !in_table_coordinates(ctx, id, ctx.path.table_coordinates_reversed()) {
        return Ok(Vec::new());
    }

    Ok(vec![MatchResult {
        node: id,
        found_type: FoundType::ByTableCoordinate,
        coverage: 0,
        distance: ctx.distance(ctx.index.text_before(id).unwrap_or_default()),
        position: spot.start,
    }])
}

/// Rows of a table, excluding rows of nested tables.
fn rows(document: &Document, table: NodeId) -> Vec<NodeId> {
    document
        .descendants(table)
        .filter(|n| n.is_tag("tr"))
        .filter(|n| document.parent(n.id).and_then(|p| document.closest(p, &["table"])) == Some(table))
        .map(|n| n.id)
        .collect()
}

fn cells(document: &Document, row: NodeId) -> Vec<NodeId> {
    document
        .get(row)
        .map(|r| {
            r.children
                .iter()
                .copied()
                .filter(|c| document.get(*c).is_some_and(is_cell))
                .collect()
        })
        .unwrap_or_default()
}

fn is_cell(node: &Node) -> bool {
    node.tag().is_some_and(|t| CELL_TAGS.contains(&t))
}

fn span(node: &Node, attribute: &str) -> usize {
    node.attr(attribute)
        .and_then(|v| v.trim().parse::<usize>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(1)
}

/// Whether a header cell carries the coordinate text and lies behind the context.
fn header_matches(ctx: &MatchContext<'_, '_>, cell: NodeId, pattern: &SearchPattern) -> bool {
    let Some(spot) = ctx.index.position(cell) else {
        return false;
    };
    let behind_context = ctx.anchor.spot().is_none_or(|path| path.end < spot.start);
    behind_context && ctx.index.as_text(cell).is_some_and(|text| pattern.matches(text))
}

/// Whether `id` sits in a cell that every coordinate (innermost first) addresses.
pub(crate) fn in_table_coordinates(ctx: &MatchContext<'_, '_>, id: NodeId, coordinates: &[TableCoordinate]) -> bool {
    let document = ctx.index.document();
    let mut current = id;

    for coordinate in coordinates {
        let mut cell = document.closest(current, CELL_TAGS);
        let mut found_x = false;
        let mut found_y = false;
        let mut satisfied = false;

        while let Some(cell_id) = cell {
            let Some(row) = document.parent(cell_id).filter(|r| document.get(*r).is_some_and(|n| n.is_tag("tr")))
            else {
                break;
            };
            let Some(table) = document.closest(row, &["table"]) else {
                break;
            };
            let table_rows = rows(document, table);
            let grid: Vec<Vec<NodeId>> = table_rows.iter().map(|r| cells(document, *r)).collect();
            let Some(cell_node) = document.get(cell_id) else {
                break;
            };

            if let (false, Some(pattern)) = (found_x, coordinate.column.as_ref()) {
                let x_start = cells(document, row).iter().position(|c| *c == cell_id).unwrap_or(0);
                let x_end = x_start + span(cell_node, "colspan");
                found_x = (x_start..x_end).any(|x| {
                    grid.iter()
                        .filter_map(|r| r.get(x))
                        .any(|c| header_matches(ctx, *c, pattern))
                });
            }

            if let (false, Some(pattern)) = (found_y, coordinate.row.as_ref()) {
                if let Some(y_start) = table_rows.iter().position(|r| *r == row) {
                    let y_end = (y_start + span(cell_node, "rowspan")).min(grid.len());
                    found_y = grid[y_start..y_end]
                        .iter()
                        .flatten()
                        .any(|c| header_matches(ctx, *c, pattern));
                }
            }

            if (found_x || coordinate.column.is_none()) && (found_y || coordinate.row.is_none()) {
                satisfied = true;
                current = row;
                break;
            }
            cell = document.parent(row).and_then(|p| document.closest(p, CELL_TAGS));
        }

        if !satisfied {
            return false;
        }
    }
    true
}
