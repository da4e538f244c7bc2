//! Cell store: lookups over the cell arena and the reference grid, canonical
//! rebuild, and invariant checking.
//!
//! The grid is always derived from the cell list. Ops edit anchors and spans
//! and then call [`Table::rebuild`], which sorts the arena into row-major
//! anchor order and rewrites every `CellRef`.

use crate::config::{DEFAULT_COL_WIDTH, DEFAULT_ROW_HEIGHT, MIN_TRACK_SIZE};
use crate::error::TableError;
use crate::id::NodeId;
use crate::model::{Axis, Cell, CellRange, CellRef, Table};

/// Tolerance for box-vs-content float comparisons.
const BOX_EPSILON: f32 = 0.01;

impl Table {
    pub fn cell_ref_at(&self, r: usize, c: usize) -> Option<CellRef> {
        self.grid.get(r)?.get(c).copied()
    }

    pub fn cell(&self, cell: CellRef) -> Option<&Cell> {
        self.cells.get(cell.index())
    }

    /// The cell occupying `(r, c)` (its anchor may be elsewhere).
    pub fn cell_at(&self, r: usize, c: usize) -> Option<&Cell> {
        self.cell(self.cell_ref_at(r, c)?)
    }

    pub(crate) fn cell_at_mut(&mut self, r: usize, c: usize) -> Option<&mut Cell> {
        let cell = self.cell_ref_at(r, c)?;
        self.cells.get_mut(cell.index())
    }

    /// True when `(r, c)` is the top-left position of its cell.
    pub fn is_anchor(&self, r: usize, c: usize) -> bool {
        self.cell_at(r, c)
            .is_some_and(|cell| cell.row == r && cell.col == c)
    }

    /// Public id of a cell, derived from the table id and the anchor.
    pub fn cell_id_of(&self, cell: &Cell) -> NodeId {
        NodeId::cell(self.id, cell.row, cell.col)
    }

    /// Public id of the cell occupying `(r, c)`.
    pub fn cell_id_at(&self, r: usize, c: usize) -> Option<NodeId> {
        self.cell_at(r, c).map(|cell| self.cell_id_of(cell))
    }

    /// Resolve a public cell id. Ids of positions that are not anchors
    /// (covered merge positions) resolve to nothing.
    pub fn cell_by_id(&self, id: NodeId) -> Option<&Cell> {
        let (r, c) = id.cell_position(self.id)?;
        self.cell_at(r, c)
            .filter(|cell| cell.row == r && cell.col == c)
    }

    /// All cells, one per anchor, in row-major anchor order.
    pub fn anchors(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    /// Cells whose occupied rectangle intersects `range`.
    pub fn anchors_in(&self, range: CellRange) -> Vec<CellRef> {
        let range = range.clamp(self.rows, self.cols);
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| range.intersects(cell))
            .map(|(i, _)| CellRef(i as u32))
            .collect()
    }

    /// Re-derive the grid from the cell list.
    ///
    /// Cells are sorted into row-major anchor order. Spans running past the
    /// grid are clipped, cells overlapping an earlier cell are dropped and
    /// uncovered positions get a blank 1×1 cell, so the result always
    /// satisfies the grid invariants.
    pub fn rebuild(&mut self) {
        self.rows = self.rows.max(1);
        self.cols = self.cols.max(1);
        let (rows, cols) = (self.rows, self.cols);
        sanitize_sizes(&mut self.row_heights, rows, DEFAULT_ROW_HEIGHT);
        sanitize_sizes(&mut self.col_widths, cols, DEFAULT_COL_WIDTH);

        let mut cells = std::mem::take(&mut self.cells);
        cells.sort_by_key(|cell| (cell.row, cell.col));

        let mut claimed = vec![vec![false; cols]; rows];
        let mut kept: Vec<Cell> = Vec::with_capacity(cells.len());
        for mut cell in cells {
            if cell.row >= rows || cell.col >= cols {
                log::warn!(
                    "table {}: dropping cell anchored outside the grid at ({},{})",
                    self.id,
                    cell.row,
                    cell.col
                );
                continue;
            }
            cell.row_span = cell.row_span.clamp(1, rows - cell.row);
            cell.col_span = cell.col_span.clamp(1, cols - cell.col);

            let overlaps = cell
                .rows()
                .any(|r| cell.cols().any(|c| claimed[r][c]));
            if overlaps {
                log::warn!(
                    "table {}: dropping overlapping cell at ({},{})",
                    self.id,
                    cell.row,
                    cell.col
                );
                continue;
            }
            for r in cell.rows() {
                for c in cell.cols() {
                    claimed[r][c] = true;
                }
            }
            kept.push(cell);
        }

        let mut holes = 0usize;
        for (r, line) in claimed.iter().enumerate() {
            for (c, taken) in line.iter().enumerate() {
                if !taken {
                    kept.push(Cell::new(r, c));
                    holes += 1;
                }
            }
        }
        if holes > 0 {
            log::warn!("table {}: filled {holes} uncovered grid positions", self.id);
            kept.sort_by_key(|cell| (cell.row, cell.col));
        }

        let mut grid = vec![vec![CellRef(0); cols]; rows];
        for (i, cell) in kept.iter().enumerate() {
            for r in cell.rows() {
                for c in cell.cols() {
                    grid[r][c] = CellRef(i as u32);
                }
            }
        }
        self.grid = grid;
        self.cells = kept;
    }

    /// Grow the box so it never sits smaller than its content.
    pub(crate) fn clamp_box(&mut self) {
        let content_w = self.content_width();
        let content_h = self.content_height();
        self.w = if self.w.is_finite() {
            self.w.max(content_w)
        } else {
            content_w
        };
        self.h = if self.h.is_finite() {
            self.h.max(content_h)
        } else {
            content_h
        };
    }

    /// Canonicalize after an op: rebuild, floor-clamp the box, and check.
    pub(crate) fn finish(mut self) -> Self {
        self.rebuild();
        self.clamp_box();
        self.debug_assert_consistent();
        self
    }

    /// Canonical form of a table from an untrusted source (host JSON).
    pub fn normalized(mut self) -> Self {
        self.rebuild();
        self.clamp_box();
        self
    }

    /// Verify every structural invariant of the table.
    pub fn check_invariants(&self) -> Result<(), TableError> {
        if self.rows == 0 || self.cols == 0 {
            return Err(TableError::EmptyGrid {
                rows: self.rows,
                cols: self.cols,
            });
        }
        for axis in [Axis::Row, Axis::Col] {
            let sizes = self.sizes(axis);
            if sizes.len() != self.count(axis) {
                return Err(TableError::TrackCount {
                    axis: axis.name(),
                    expected: self.count(axis),
                    found: sizes.len(),
                });
            }
            if let Some((index, &size)) = sizes
                .iter()
                .enumerate()
                .find(|(_, s)| !(s.is_finite() && **s > 0.0))
            {
                return Err(TableError::TrackSize {
                    axis: axis.name(),
                    index,
                    size,
                });
            }
        }
        if self.grid.len() != self.rows {
            return Err(TableError::TrackCount {
                axis: "grid row",
                expected: self.rows,
                found: self.grid.len(),
            });
        }

        for (r, line) in self.grid.iter().enumerate() {
            if line.len() != self.cols {
                return Err(TableError::TrackCount {
                    axis: "grid col",
                    expected: self.cols,
                    found: line.len(),
                });
            }
            for (c, cell_ref) in line.iter().enumerate() {
                let Some(cell) = self.cell(*cell_ref) else {
                    return Err(TableError::DanglingRef {
                        row: r,
                        col: c,
                        cell: cell_ref.index(),
                    });
                };
                if !cell.covers(r, c) {
                    return Err(TableError::SpanMismatch {
                        row: r,
                        col: c,
                        cell: self.cell_id_of(cell),
                    });
                }
            }
        }

        for (i, cell) in self.cells.iter().enumerate() {
            if cell.row_span == 0 || cell.col_span == 0 {
                return Err(TableError::OrphanCell {
                    cell: self.cell_id_of(cell),
                });
            }
            for r in cell.rows() {
                for c in cell.cols() {
                    match self.cell_ref_at(r, c) {
                        Some(found) if found.index() == i => {}
                        Some(_) => {
                            return Err(TableError::SpanMismatch {
                                row: r,
                                col: c,
                                cell: self.cell_id_of(cell),
                            });
                        }
                        None => {
                            return Err(TableError::OrphanCell {
                                cell: self.cell_id_of(cell),
                            });
                        }
                    }
                }
            }
        }

        let content_w = self.content_width();
        if self.w + BOX_EPSILON < content_w {
            return Err(TableError::BoxTooSmall {
                axis: "width",
                found: self.w,
                content: content_w,
            });
        }
        let content_h = self.content_height();
        if self.h + BOX_EPSILON < content_h {
            return Err(TableError::BoxTooSmall {
                axis: "height",
                found: self.h,
                content: content_h,
            });
        }
        Ok(())
    }

    /// Assert consistency in debug builds, log the violation in release.
    pub(crate) fn debug_assert_consistent(&self) {
        if let Err(e) = self.check_invariants() {
            log::error!("table {} is inconsistent: {e}", self.id);
            debug_assert!(false, "table {} is inconsistent: {e}", self.id);
        }
    }
}

/// Pad/truncate to `len` entries and floor every size to the minimum track.
fn sanitize_sizes(sizes: &mut Vec<f32>, len: usize, fallback: f32) {
    sizes.resize(len, fallback);
    for s in sizes.iter_mut() {
        if !s.is_finite() {
            *s = fallback;
        } else if *s < MIN_TRACK_SIZE {
            *s = MIN_TRACK_SIZE;
        }
    }
}
