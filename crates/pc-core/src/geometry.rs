//! Grid geometry: prefix sums over track sizes, cell rectangles and
//! point → cell lookup. All coordinates are table-local pixels.

use crate::model::{CellRange, CellRect, Table};

/// Left edge of column `c` (sum of the widths before it). `c` is clamped
/// to `col_widths.len()`, which yields the total width.
pub fn col_start(col_widths: &[f32], c: usize) -> f32 {
    col_widths[..c.min(col_widths.len())].iter().sum()
}

/// Top edge of row `r`. Same clamping as [`col_start`].
pub fn row_start(row_heights: &[f32], r: usize) -> f32 {
    row_heights[..r.min(row_heights.len())].iter().sum()
}

/// Track boundaries: `[0, s0, s0+s1, …, Σs]` (`len + 1` entries).
pub fn accum_sizes(sizes: &[f32]) -> Vec<f32> {
    let mut out = Vec::with_capacity(sizes.len() + 1);
    let mut acc = 0.0;
    out.push(acc);
    for s in sizes {
        acc += s;
        out.push(acc);
    }
    out
}

/// Sum of `sizes[start .. start + span]`, clamped.
fn span_size(sizes: &[f32], start: usize, span: usize) -> f32 {
    let start = start.min(sizes.len());
    let end = (start + span).min(sizes.len());
    sizes[start..end].iter().sum()
}

/// Index of the track containing `v`. Values before the first boundary map
/// to track 0, values past the end map to the last track.
fn track_at(sizes: &[f32], v: f32) -> usize {
    let mut edge = 0.0;
    for (i, s) in sizes.iter().enumerate() {
        edge += s;
        if v < edge {
            return i;
        }
    }
    sizes.len().saturating_sub(1)
}

/// Anchor of the cell occupying `(r, c)`. Out-of-range positions are clamped.
pub fn anchor_of(table: &Table, r: usize, c: usize) -> (usize, usize) {
    let r = r.min(table.rows - 1);
    let c = c.min(table.cols - 1);
    table
        .cell_at(r, c)
        .map(|cell| (cell.row, cell.col))
        .unwrap_or((r, c))
}

/// Rectangle of the (possibly merged) cell occupying `(r, c)`.
pub fn cell_rect(table: &Table, r: usize, c: usize) -> CellRect {
    let (row, col) = anchor_of(table, r, c);
    let (row_span, col_span) = table
        .cell_at(row, col)
        .map(|cell| (cell.row_span, cell.col_span))
        .unwrap_or((1, 1));
    CellRect {
        x: col_start(&table.col_widths, col),
        y: row_start(&table.row_heights, row),
        w: span_size(&table.col_widths, col, col_span),
        h: span_size(&table.row_heights, row, row_span),
    }
}

/// Grid position under a table-local point, clamped into the grid.
pub fn point_to_cell(table: &Table, x: f32, y: f32) -> (usize, usize) {
    (
        track_at(&table.row_heights, y),
        track_at(&table.col_widths, x),
    )
}

/// Grow `range` until every cell it touches lies fully inside it.
pub fn expand_to_anchors(table: &Table, range: CellRange) -> CellRange {
    let mut out = range.clamp(table.rows, table.cols);
    loop {
        let mut grown = out;
        for cell in table.cells.iter().filter(|cell| out.intersects(cell)) {
            grown = grown.union(&CellRange::new(
                cell.row,
                cell.col,
                cell.row + cell.row_span - 1,
                cell.col + cell.col_span - 1,
            ));
        }
        if grown == out {
            return out;
        }
        out = grown;
    }
}

/// Bounding rectangle of a range, expanded to whole merged cells.
/// Used for the selection overlay.
pub fn range_rect(table: &Table, range: CellRange) -> CellRect {
    let r = expand_to_anchors(table, range);
    CellRect {
        x: col_start(&table.col_widths, r.c0),
        y: row_start(&table.row_heights, r.r0),
        w: span_size(&table.col_widths, r.c0, r.col_count()),
        h: span_size(&table.row_heights, r.r0, r.row_count()),
    }
}
