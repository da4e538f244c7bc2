//! Table cell selection.
//!
//! One table at a time carries an active range, tracked as an anchor corner
//! (where the gesture started) and an active corner (where it is now):
//!
//! ```text
//! Inactive ──down──▶ Anchored ──move──▶ Dragging ──up──▶ Committed
//!     ▲                                                     │
//!     └──────────────── clear / other element ──────────────┘
//! ```
//!
//! The most recent range is remembered per table so toolbar actions can
//! fall back to it after the selection collapsed to the table container.

use pc_core::geometry::anchor_of;
use pc_core::id::NodeId;
use pc_core::model::{CellRange, Table};
use serde::Serialize;

/// The public view of a selection: table id plus a normalized range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableSel {
    pub table_id: NodeId,
    pub r0: usize,
    pub c0: usize,
    pub r1: usize,
    pub c1: usize,
}

impl TableSel {
    pub fn new(table_id: NodeId, range: CellRange) -> Self {
        Self {
            table_id,
            r0: range.r0,
            c0: range.c0,
            r1: range.r1,
            c1: range.c1,
        }
    }

    pub fn range(&self) -> CellRange {
        CellRange::new(self.r0, self.c0, self.r1, self.c1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionState {
    #[default]
    Inactive,
    Anchored,
    Dragging,
    Committed,
}

/// Grid keyboard moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
    Up,
    Down,
    Left,
    Right,
    /// Tab: next cell, wrapping to the next row.
    Next,
    /// Shift+Tab: previous cell, wrapping to the previous row.
    Prev,
    /// Enter: cell below.
    Below,
    /// Shift+Enter: cell above.
    Above,
}

#[derive(Debug, Clone, Default)]
pub struct TableSelection {
    state: SelectionState,
    table_id: Option<NodeId>,
    anchor: (usize, usize),
    active: (usize, usize),
    last: Option<TableSel>,
}

impl TableSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SelectionState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state != SelectionState::Inactive
    }

    /// Current range, or `None` when inactive.
    pub fn sel(&self) -> Option<TableSel> {
        if !self.is_active() {
            return None;
        }
        let table_id = self.table_id?;
        Some(TableSel::new(
            table_id,
            CellRange::new(self.anchor.0, self.anchor.1, self.active.0, self.active.1),
        ))
    }

    /// Current range if it belongs to `table_id`.
    pub fn range_for(&self, table_id: NodeId) -> Option<CellRange> {
        self.sel()
            .filter(|s| s.table_id == table_id)
            .map(|s| s.range())
    }

    /// The last range, kept across `clear`.
    pub fn last(&self) -> Option<TableSel> {
        self.last
    }

    fn place(
        &mut self,
        table_id: NodeId,
        anchor: (usize, usize),
        active: (usize, usize),
        state: SelectionState,
    ) {
        if self.last.is_some_and(|l| l.table_id != table_id) {
            self.last = None;
        }
        self.table_id = Some(table_id);
        self.anchor = anchor;
        self.active = active;
        self.state = state;
        self.last = self.sel();
    }

    /// Set a committed range (corners in any order).
    pub fn set(&mut self, table_id: NodeId, range: CellRange) {
        self.place(
            table_id,
            (range.r0, range.c0),
            (range.r1, range.c1),
            SelectionState::Committed,
        );
    }

    /// Drop the active range. The last-range memory survives.
    pub fn clear(&mut self) {
        if self.is_active() {
            log::debug!("table selection cleared");
        }
        self.state = SelectionState::Inactive;
    }

    /// Pointer pressed on cell `(r, c)`.
    pub fn pointer_down(&mut self, table_id: NodeId, r: usize, c: usize) {
        self.place(table_id, (r, c), (r, c), SelectionState::Anchored);
    }

    /// Move the active corner to `(r, c)`. Ignored for other tables or
    /// without an anchor. Returns whether the range changed.
    pub fn extend_to(&mut self, table_id: NodeId, r: usize, c: usize) -> bool {
        if !self.is_active() || self.table_id != Some(table_id) {
            return false;
        }
        let before = self.sel();
        let state = match self.state {
            SelectionState::Anchored | SelectionState::Dragging => SelectionState::Dragging,
            other => other,
        };
        self.place(table_id, self.anchor, (r, c), state);
        self.sel() != before
    }

    /// Pointer released: freeze the range.
    pub fn pointer_up(&mut self) {
        if matches!(
            self.state,
            SelectionState::Anchored | SelectionState::Dragging
        ) {
            self.state = SelectionState::Committed;
        }
    }

    /// Bring back the remembered range of `table_id`.
    pub fn restore_last(&mut self, table_id: NodeId) -> bool {
        match self.last {
            Some(last) if last.table_id == table_id => {
                self.set(table_id, last.range());
                true
            }
            _ => false,
        }
    }

    /// Apply the clearing rules after the element selection changed: the
    /// range survives only while its table is the sole selected element.
    pub fn on_element_selection(&mut self, selected: &[NodeId]) {
        if let Some(sel) = self.sel()
            && !(selected.len() == 1 && selected[0] == sel.table_id)
        {
            self.clear();
        }
    }

    /// Keyboard move inside `table`. Targets inside a merge snap to its
    /// anchor; with `grow` the arrows move the active corner and keep the
    /// anchor. Returns the new range.
    pub fn navigate(&mut self, table: &Table, key: NavKey, grow: bool) -> Option<CellRange> {
        let sel = self.sel()?;
        if sel.table_id != table.id {
            return None;
        }
        let arrow = matches!(key, NavKey::Up | NavKey::Down | NavKey::Left | NavKey::Right);
        let grow = grow && arrow;
        let from = if grow {
            self.active
        } else {
            (sel.r0, sel.c0)
        };
        let (fr, fc) = anchor_of(table, from.0, from.1);
        let (rs, cs) = table
            .cell_at(fr, fc)
            .map(|cell| (cell.row_span, cell.col_span))
            .unwrap_or((1, 1));
        let max_r = table.rows - 1;
        let max_c = table.cols - 1;

        let target = match key {
            NavKey::Up | NavKey::Above => (fr.saturating_sub(1), fc),
            NavKey::Down | NavKey::Below => ((fr + rs).min(max_r), fc),
            NavKey::Left => (fr, fc.saturating_sub(1)),
            NavKey::Right => (fr, (fc + cs).min(max_c)),
            NavKey::Next => {
                if fc + cs > max_c {
                    ((fr + 1).min(max_r), 0)
                } else {
                    (fr, fc + cs)
                }
            }
            NavKey::Prev => {
                if fc == 0 {
                    (fr.saturating_sub(1), max_c)
                } else {
                    (fr, fc - 1)
                }
            }
        };
        let target = anchor_of(table, target.0, target.1);

        if grow {
            self.place(table.id, self.anchor, target, SelectionState::Committed);
        } else {
            self.place(table.id, target, target, SelectionState::Committed);
        }
        self.sel().map(|s| s.range())
    }
}
