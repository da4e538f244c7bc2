//! Pointer tool for tables.
//!
//! `TableTool` turns pointer events into `ToolAction`s: element picks, cell
//! range gestures and row/column resize drags. It reads the document but
//! never changes it; the session applies the actions.
//!
//! | Press on           | Shift           | Result                    |
//! |--------------------|-----------------|---------------------------|
//! | resize boundary    | any             | resize drag (edit mode)   |
//! | table cell         | no              | anchor + drag range       |
//! | table cell         | yes             | extend current range      |
//! | other element      | add to picks    | element pick              |

use crate::input::InputEvent;
use pc_core::config::MIN_TRACK_SIZE;
use pc_core::document::{Document, Element};
use pc_core::id::NodeId;
use pc_core::model::Axis;
use pc_render::hit::{BoundaryHit, hit_boundary, hit_cell, hit_test};

#[derive(Debug, Clone, PartialEq)]
pub enum ToolAction {
    /// Pick an element (or nothing, on empty canvas).
    SelectElement { id: Option<NodeId>, additive: bool },
    /// Start a cell range at `(r, c)`.
    AnchorCell { table_id: NodeId, r: usize, c: usize },
    /// Move the active corner of the range to `(r, c)`.
    ExtendCell { table_id: NodeId, r: usize, c: usize },
    /// Range gesture finished.
    CommitCells,
    BeginResize {
        table_id: NodeId,
        axis: Axis,
        index: usize,
    },
    /// New absolute size for the dragged track.
    Resize {
        table_id: NodeId,
        axis: Axis,
        index: usize,
        size: f32,
    },
    EndResize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Gesture {
    Idle,
    Selecting {
        table_id: NodeId,
    },
    Resizing {
        table_id: NodeId,
        axis: Axis,
        index: usize,
        origin: f32,
        start_size: f32,
    },
}

#[derive(Debug, Clone)]
pub struct TableTool {
    gesture: Gesture,
    hit_pad: f64,
    /// Boundary under the pointer while idle, for the resize cursor.
    pub hovered: Option<(NodeId, BoundaryHit)>,
}

impl TableTool {
    pub fn new(hit_pad: f64) -> Self {
        Self {
            gesture: Gesture::Idle,
            hit_pad,
            hovered: None,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.gesture == Gesture::Idle
    }

    /// Topmost table on `page` with a resize boundary under the point.
    fn boundary_at(
        &self,
        doc: &Document,
        page: NodeId,
        x: f64,
        y: f64,
    ) -> Option<(NodeId, BoundaryHit)> {
        doc.elements_on(page)
            .into_iter()
            .rev()
            .filter_map(Element::as_table)
            .find_map(|t| hit_boundary(t, x, y, self.hit_pad).map(|hit| (t.id, hit)))
    }

    pub fn handle(
        &mut self,
        event: &InputEvent,
        doc: &Document,
        page: NodeId,
        edit_mode: bool,
    ) -> Vec<ToolAction> {
        match event {
            InputEvent::PointerDown { x, y, modifiers } => {
                let (px, py) = (*x as f64, *y as f64);
                self.gesture = Gesture::Idle;

                if edit_mode && let Some((table_id, hit)) = self.boundary_at(doc, page, px, py) {
                    let Ok(table) = doc.table(table_id) else {
                        return vec![];
                    };
                    let (origin, start_size) = match hit.axis {
                        Axis::Col => (*x, table.col_widths[hit.index]),
                        Axis::Row => (*y, table.row_heights[hit.index]),
                    };
                    self.gesture = Gesture::Resizing {
                        table_id,
                        axis: hit.axis,
                        index: hit.index,
                        origin,
                        start_size,
                    };
                    self.hovered = None;
                    return vec![ToolAction::BeginResize {
                        table_id,
                        axis: hit.axis,
                        index: hit.index,
                    }];
                }

                let hit = hit_test(doc, page, px, py);
                let table = hit.and_then(|id| doc.table(id).ok());
                match table.and_then(|t| hit_cell(t, px, py).map(|rc| (t.id, rc))) {
                    Some((table_id, (r, c))) => {
                        self.gesture = Gesture::Selecting { table_id };
                        if modifiers.shift {
                            vec![ToolAction::ExtendCell { table_id, r, c }]
                        } else {
                            vec![ToolAction::AnchorCell { table_id, r, c }]
                        }
                    }
                    None => vec![ToolAction::SelectElement {
                        id: hit,
                        additive: modifiers.shift || modifiers.command(),
                    }],
                }
            }
            InputEvent::PointerMove { x, y, .. } => match self.gesture {
                Gesture::Selecting { table_id } => doc
                    .table(table_id)
                    .ok()
                    .and_then(|t| hit_cell(t, *x as f64, *y as f64))
                    .map(|(r, c)| vec![ToolAction::ExtendCell { table_id, r, c }])
                    .unwrap_or_default(),
                Gesture::Resizing {
                    table_id,
                    axis,
                    index,
                    origin,
                    start_size,
                } => {
                    let pos = match axis {
                        Axis::Col => *x,
                        Axis::Row => *y,
                    };
                    let size = (start_size + pos - origin).max(MIN_TRACK_SIZE);
                    vec![ToolAction::Resize {
                        table_id,
                        axis,
                        index,
                        size,
                    }]
                }
                Gesture::Idle => {
                    self.hovered = if edit_mode {
                        self.boundary_at(doc, page, *x as f64, *y as f64)
                    } else {
                        None
                    };
                    vec![]
                }
            },
            InputEvent::PointerUp { .. } => {
                let done = match self.gesture {
                    Gesture::Selecting { .. } => vec![ToolAction::CommitCells],
                    Gesture::Resizing { .. } => vec![ToolAction::EndResize],
                    Gesture::Idle => vec![],
                };
                self.gesture = Gesture::Idle;
                done
            }
            InputEvent::Key { .. } => vec![],
        }
    }
}
