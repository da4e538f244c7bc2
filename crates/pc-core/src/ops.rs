//! Structural ops: pure `&Table -> Table` transforms that change the grid
//! shape (rows, columns, merges) or track sizes.
//!
//! Every op clamps its arguments instead of failing and returns a table in
//! canonical form (see [`Table::rebuild`]). The box never ends up smaller
//! than its content.

use crate::config::{DEFAULT_COL_WIDTH, DEFAULT_ROW_HEIGHT, MIN_TRACK_SIZE};
use crate::id::NodeId;
use crate::model::{Axis, Cell, CellRange, Table};

// ─── Helpers ─────────────────────────────────────────────────────────────

fn mean(sizes: &[f32], fallback: f32) -> f32 {
    if sizes.is_empty() {
        fallback
    } else {
        sizes.iter().sum::<f32>() / sizes.len() as f32
    }
}

/// Grid position of `(track, cross)` where `track` runs along `axis`.
fn position(axis: Axis, track: usize, cross: usize) -> (usize, usize) {
    match axis {
        Axis::Row => (track, cross),
        Axis::Col => (cross, track),
    }
}

fn other(axis: Axis) -> Axis {
    match axis {
        Axis::Row => Axis::Col,
        Axis::Col => Axis::Row,
    }
}

/// `\r\n` and lone `\r` become `\n`.
pub(crate) fn normalize_newlines(text: &str) -> String {
    if text.contains('\r') {
        text.replace("\r\n", "\n").replace('\r', "\n")
    } else {
        text.to_string()
    }
}

/// Replace the cell at `index` with 1×1 cells over its former span. The
/// anchor keeps the content; every piece keeps styles and attrs.
fn split_cell(cells: &mut Vec<Cell>, index: usize) {
    let cell = &mut cells[index];
    if !cell.is_merged() {
        return;
    }
    let template = cell.clone();
    cell.row_span = 1;
    cell.col_span = 1;
    for r in template.rows() {
        for c in template.cols() {
            if r != template.row || c != template.col {
                cells.push(Cell::like(&template, r, c));
            }
        }
    }
}

// ─── Insert / delete ─────────────────────────────────────────────────────

fn insert_tracks(t: &Table, axis: Axis, at: usize, count: usize) -> Table {
    if count == 0 {
        return t.clone();
    }
    let n = t.count(axis);
    let at = at.min(n);
    let fallback = match axis {
        Axis::Row => DEFAULT_ROW_HEIGHT,
        Axis::Col => DEFAULT_COL_WIDTH,
    };
    let size = mean(t.sizes(axis), fallback);
    // New tracks inherit styling from the track before them, or from the
    // first track when inserting at the front.
    let template_track = at.saturating_sub(1);

    let mut next = t.clone();
    for cell in &mut next.cells {
        let start = cell.start(axis);
        if start >= at {
            *cell.start_mut(axis) += count;
        } else if start + cell.span(axis) > at {
            *cell.span_mut(axis) += count;
        }
    }

    for cross in 0..t.count(other(axis)) {
        let (r, c) = position(axis, at, cross);
        let crossing = at < n && t.cell_at(r, c).is_some_and(|cell| cell.start(axis) < at);
        if crossing {
            continue;
        }
        let (tr, tc) = position(axis, template_track, cross);
        let template = t.cell_at(tr, tc);
        for k in 0..count {
            let (r, c) = position(axis, at + k, cross);
            next.cells.push(match template {
                Some(template) => Cell::like(template, r, c),
                None => Cell::new(r, c),
            });
        }
    }

    *next.count_mut(axis) += count;
    next.sizes_mut(axis)
        .splice(at..at, std::iter::repeat_n(size, count));
    log::debug!(
        "table {}: inserted {count} {}(s) at {at} ({size:.1}px)",
        t.id,
        axis.name()
    );
    next.finish()
}

fn delete_track(t: &Table, axis: Axis, index: usize) -> Table {
    let n = t.count(axis);
    if n <= 1 {
        log::debug!("table {}: keeping the last {}", t.id, axis.name());
        return t.clone();
    }
    let index = index.min(n - 1);

    let mut next = t.clone();
    next.cells.retain_mut(|cell| {
        let start = cell.start(axis);
        let span = cell.span(axis);
        if start > index {
            *cell.start_mut(axis) -= 1;
            true
        } else if start + span > index {
            // The removed track was this cell's only one
            if span == 1 {
                return false;
            }
            *cell.span_mut(axis) -= 1;
            true
        } else {
            true
        }
    });
    *next.count_mut(axis) -= 1;
    next.sizes_mut(axis).remove(index);
    log::debug!("table {}: deleted {} {index}", t.id, axis.name());
    next.finish()
}

fn delete_track_range(t: &Table, axis: Axis, a: usize, b: usize) -> Table {
    let n = t.count(axis);
    let (a, b) = (a.min(b).min(n - 1), a.max(b).min(n - 1));
    let count = (b - a + 1).min(n - 1);
    let mut next = t.clone();
    for _ in 0..count {
        next = delete_track(&next, axis, a);
    }
    next
}

/// Insert `count` rows before row `at` (`at == rows` appends).
pub fn add_row(t: &Table, at: usize, count: usize) -> Table {
    insert_tracks(t, Axis::Row, at, count)
}

/// Insert `count` columns before column `at` (`at == cols` appends).
pub fn add_column(t: &Table, at: usize, count: usize) -> Table {
    insert_tracks(t, Axis::Col, at, count)
}

/// Remove row `index`. No-op on a single-row table.
pub fn delete_row(t: &Table, index: usize) -> Table {
    delete_track(t, Axis::Row, index)
}

/// Remove column `index`. No-op on a single-column table.
pub fn delete_column(t: &Table, index: usize) -> Table {
    delete_track(t, Axis::Col, index)
}

/// Remove rows `r0..=r1`, always keeping at least one row.
pub fn delete_rows(t: &Table, r0: usize, r1: usize) -> Table {
    delete_track_range(t, Axis::Row, r0, r1)
}

/// Remove columns `c0..=c1`, always keeping at least one column.
pub fn delete_columns(t: &Table, c0: usize, c1: usize) -> Table {
    delete_track_range(t, Axis::Col, c0, c1)
}

// ─── Merge / unmerge ─────────────────────────────────────────────────────

/// Merge `range` into one cell anchored at its top-left position.
///
/// Merges that touch the range are split first. Only the anchor's content
/// survives.
pub fn merge_range(t: &Table, range: CellRange) -> Table {
    let range = range.clamp(t.rows, t.cols);
    if range.is_single() {
        return t.clone();
    }
    let mut next = unmerge_range(t, range);
    next.cells.retain(|cell| {
        !range.contains(cell.row, cell.col) || (cell.row == range.r0 && cell.col == range.c0)
    });
    if let Some(anchor) = next
        .cells
        .iter_mut()
        .find(|cell| cell.row == range.r0 && cell.col == range.c0)
    {
        anchor.row_span = range.row_count();
        anchor.col_span = range.col_count();
    }
    log::debug!(
        "table {}: merged ({},{})..({},{})",
        t.id,
        range.r0,
        range.c0,
        range.r1,
        range.c1
    );
    next.finish()
}

/// Split the cell occupying `(r, c)` into 1×1 cells.
pub fn unmerge_at(t: &Table, r: usize, c: usize) -> Table {
    let r = r.min(t.rows - 1);
    let c = c.min(t.cols - 1);
    let Some(cell) = t.cell_ref_at(r, c) else {
        return t.clone();
    };
    if !t.cell(cell).is_some_and(Cell::is_merged) {
        return t.clone();
    }
    let mut next = t.clone();
    split_cell(&mut next.cells, cell.index());
    log::debug!("table {}: unmerged cell at ({r},{c})", t.id);
    next.finish()
}

/// Split the cell with public id `cell_id`. Unknown ids leave the table as is.
pub fn unmerge(t: &Table, cell_id: NodeId) -> Table {
    match cell_id.cell_position(t.id) {
        Some((r, c)) if r < t.rows && c < t.cols => unmerge_at(t, r, c),
        _ => {
            log::warn!("table {}: unmerge of unknown cell {cell_id}", t.id);
            t.clone()
        }
    }
}

/// Split every merged cell intersecting `range`.
pub fn unmerge_range(t: &Table, range: CellRange) -> Table {
    let merged: Vec<usize> = t
        .anchors_in(range)
        .into_iter()
        .map(|cell| cell.index())
        .filter(|&i| t.cells[i].is_merged())
        .collect();
    if merged.is_empty() {
        return t.clone();
    }
    let mut next = t.clone();
    for i in merged {
        split_cell(&mut next.cells, i);
    }
    next.finish()
}

// ─── Track sizes ─────────────────────────────────────────────────────────

fn resize_tracks(t: &Table, axis: Axis, a: usize, b: usize, size: f32) -> Table {
    if !size.is_finite() {
        log::warn!("table {}: ignoring non-finite {} size", t.id, axis.name());
        return t.clone();
    }
    let n = t.count(axis);
    let (a, b) = (a.min(b).min(n - 1), a.max(b).min(n - 1));
    let size = size.max(MIN_TRACK_SIZE);
    let mut next = t.clone();
    for s in &mut next.sizes_mut(axis)[a..=b] {
        *s = size;
    }
    next.finish()
}

fn distribute(t: &Table, axis: Axis, range: CellRange) -> Table {
    let range = range.clamp(t.rows, t.cols);
    let tracks = range.span_on(axis);
    let sizes = &t.sizes(axis)[tracks.clone()];
    let size = mean(sizes, MIN_TRACK_SIZE);
    let mut next = t.clone();
    for s in &mut next.sizes_mut(axis)[tracks] {
        *s = size;
    }
    log::debug!("table {}: distributed {}s to {size:.1}px", t.id, axis.name());
    next.finish()
}

/// Set row `index` to `height` (floored at the minimum track size).
pub fn resize_row(t: &Table, index: usize, height: f32) -> Table {
    resize_tracks(t, Axis::Row, index, index, height)
}

/// Set column `index` to `width` (floored at the minimum track size).
pub fn resize_col(t: &Table, index: usize, width: f32) -> Table {
    resize_tracks(t, Axis::Col, index, index, width)
}

/// Set every row in `r0..=r1` to `height`.
pub fn resize_rows(t: &Table, r0: usize, r1: usize, height: f32) -> Table {
    resize_tracks(t, Axis::Row, r0, r1, height)
}

/// Set every column in `c0..=c1` to `width`.
pub fn resize_cols(t: &Table, c0: usize, c1: usize, width: f32) -> Table {
    resize_tracks(t, Axis::Col, c0, c1, width)
}

/// Give every row of `range` the mean height. The total is preserved.
pub fn distribute_rows(t: &Table, range: CellRange) -> Table {
    distribute(t, Axis::Row, range)
}

/// Give every column of `range` the mean width. The total is preserved.
pub fn distribute_cols(t: &Table, range: CellRange) -> Table {
    distribute(t, Axis::Col, range)
}

/// Snap the box to the content size.
pub fn fit_box_to_content(t: &Table) -> Table {
    let mut next = t.clone();
    next.w = t.content_width();
    next.h = t.content_height();
    next
}

// ─── Content ─────────────────────────────────────────────────────────────

/// Clear the content of every cell anchored inside `range`.
pub fn clear_range_content(t: &Table, range: CellRange) -> Table {
    let range = range.clamp(t.rows, t.cols);
    let mut next = t.clone();
    for cell in &mut next.cells {
        if range.contains(cell.row, cell.col) {
            cell.content.clear();
        }
    }
    next
}

/// Replace the content of the cell occupying `(r, c)`.
pub fn set_cell_content(t: &Table, r: usize, c: usize, text: &str) -> Table {
    let mut next = t.clone();
    let (r, c) = (r.min(t.rows - 1), c.min(t.cols - 1));
    if let Some(cell) = next.cell_at_mut(r, c) {
        cell.content = normalize_newlines(text);
    }
    next
}
