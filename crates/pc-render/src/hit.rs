//! Hit testing: point → element, cell or resize boundary.
//!
//! All inputs are page coordinates. Elements are walked in reverse stacking
//! order so the topmost one wins; inside a table the grid geometry decides.

use kurbo::{Point, Rect};
use pc_core::document::{Document, Frame};
use pc_core::geometry::{accum_sizes, anchor_of, point_to_cell};
use pc_core::id::NodeId;
use pc_core::model::{Axis, Table};
use serde::Serialize;

/// A resize boundary under the pointer: dragging it resizes track `index`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BoundaryHit {
    #[serde(serialize_with = "axis_name")]
    pub axis: Axis,
    pub index: usize,
}

fn axis_name<S: serde::Serializer>(axis: &Axis, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(axis.name())
}

fn frame_rect(frame: Frame) -> Rect {
    Rect::new(
        frame.x as f64,
        frame.y as f64,
        (frame.x + frame.w) as f64,
        (frame.y + frame.h) as f64,
    )
}

/// The grid content area of `table` in page coordinates.
pub fn grid_rect(table: &Table) -> Rect {
    let origin = Point::new(table.x as f64, table.y as f64);
    Rect::from_origin_size(
        origin,
        (table.content_width() as f64, table.content_height() as f64),
    )
}

fn contains_inclusive(rect: Rect, p: Point) -> bool {
    p.x >= rect.x0 && p.x <= rect.x1 && p.y >= rect.y0 && p.y <= rect.y1
}

/// Boundary index (into `accum`) closest to `v`, if within `pad`.
/// The leading edge (index 0) never resizes anything.
fn nearest_boundary(sizes: &[f32], v: f64, pad: f64) -> Option<usize> {
    accum_sizes(sizes)
        .into_iter()
        .enumerate()
        .map(|(i, edge)| (i, (v - edge as f64).abs()))
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .filter(|&(i, dist)| i > 0 && dist <= pad)
        .map(|(i, _)| i - 1)
}

/// Find the resize boundary near `(px, py)`. Columns win over rows when the
/// point is near both (a grid corner).
pub fn hit_boundary(table: &Table, px: f64, py: f64, pad: f64) -> Option<BoundaryHit> {
    let area = grid_rect(table).inflate(pad, pad);
    if !contains_inclusive(area, Point::new(px, py)) {
        return None;
    }
    let lx = px - table.x as f64;
    let ly = py - table.y as f64;
    nearest_boundary(&table.col_widths, lx, pad)
        .map(|index| BoundaryHit {
            axis: Axis::Col,
            index,
        })
        .or_else(|| {
            nearest_boundary(&table.row_heights, ly, pad).map(|index| BoundaryHit {
                axis: Axis::Row,
                index,
            })
        })
}

/// Anchor of the cell under `(px, py)`, or `None` outside the grid.
pub fn hit_cell(table: &Table, px: f64, py: f64) -> Option<(usize, usize)> {
    if !grid_rect(table).contains(Point::new(px, py)) {
        return None;
    }
    let (r, c) = point_to_cell(table, (px - table.x as f64) as f32, (py - table.y as f64) as f32);
    Some(anchor_of(table, r, c))
}

/// Find the topmost element of `page` at `(px, py)`.
pub fn hit_test(doc: &Document, page: NodeId, px: f64, py: f64) -> Option<NodeId> {
    let p = Point::new(px, py);
    doc.elements_on(page)
        .into_iter()
        .rev()
        .find(|el| contains_inclusive(frame_rect(el.frame()), p))
        .map(|el| el.id())
}
