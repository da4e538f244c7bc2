//! Editor session: the single owner of editor state.
//!
//! Holds the document, history, element selection, table cell selection and
//! the cell being edited. Every table change goes through
//! [`EditorSession::apply_table_op`], which snapshots the document for undo
//! and replaces the live table wholesale with the op's result.

use crate::history::History;
use crate::input::{InputEvent, Modifiers};
use crate::selection::{NavKey, TableSel, TableSelection};
use crate::shortcuts::{ShortcutMap, TableAction};
use crate::tools::{TableTool, ToolAction};
use pc_core::clipboard::{copy_range, copy_range_html, paste_grid};
use pc_core::config::{BOUNDARY_HIT_PAD, HISTORY_DEPTH};
use pc_core::document::{Document, Element};
use pc_core::error::DocumentError;
use pc_core::geometry::anchor_of;
use pc_core::id::NodeId;
use pc_core::model::{AlignH, AlignV, Axis, CellRange, CellStyleProp, Color, StyleFlag, Table};
use pc_core::ops;
use pc_core::parser::parse_clipboard;
use pc_core::style::{self, BorderMode, CellStylePatch};
use pc_render::view::{RenderContext, TableView};
use serde::Serialize;
use smallvec::SmallVec;

/// Session settings.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorConfig {
    pub history_depth: usize,
    /// Resize grip distance, in pixels.
    pub hit_pad: f64,
    /// Start in edit (design) mode.
    pub edit_mode: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_depth: HISTORY_DEPTH,
            hit_pad: BOUNDARY_HIT_PAD as f64,
            edit_mode: true,
        }
    }
}

/// Both clipboard flavours of a copied range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClipboardPayload {
    pub text: String,
    pub html: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct EditingCell {
    table_id: NodeId,
    r: usize,
    c: usize,
    draft: String,
}

/// Where a style command lands.
enum StyleTarget {
    Cells(NodeId, CellRange),
    Shapes(SmallVec<[NodeId; 4]>),
    /// Only table containers are selected and no cell range can be
    /// recovered: styling the container itself is not allowed.
    Blocked,
}

pub struct EditorSession {
    doc: Document,
    history: History,
    table_sel: TableSelection,
    selected: SmallVec<[NodeId; 4]>,
    current_page: Option<NodeId>,
    editing: Option<EditingCell>,
    tool: TableTool,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl EditorSession {
    /// A session over an empty document with one page.
    pub fn new(config: EditorConfig) -> Self {
        let mut doc = Document::new();
        doc.add_page("Page 1");
        Self::with_document(doc, config)
    }

    pub fn with_document(mut doc: Document, config: EditorConfig) -> Self {
        doc.edit_mode = config.edit_mode;
        let current_page = doc.pages().first().map(|p| p.id);
        Self {
            doc,
            history: History::new(config.history_depth),
            table_sel: TableSelection::new(),
            selected: SmallVec::new(),
            current_page,
            editing: None,
            tool: TableTool::new(config.hit_pad),
        }
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    /// Replace the whole document (host load). Clears selection and history.
    pub fn load(&mut self, doc: Document) {
        let edit_mode = self.doc.edit_mode;
        self.doc = doc;
        self.doc.edit_mode = edit_mode;
        self.current_page = self.doc.pages().first().map(|p| p.id);
        self.selected.clear();
        self.table_sel = TableSelection::new();
        self.editing = None;
    }

    pub fn edit_mode(&self) -> bool {
        self.doc.edit_mode
    }

    /// Switch between edit and run mode. Leaving edit mode drops any cell
    /// edit in progress.
    pub fn set_edit_mode(&mut self, on: bool) {
        self.doc.edit_mode = on;
        if !on {
            self.editing = None;
        }
    }

    pub fn current_page(&self) -> Option<NodeId> {
        self.current_page
    }

    pub fn set_current_page(&mut self, page: NodeId) -> Result<(), DocumentError> {
        if !self.doc.pages().iter().any(|p| p.id == page) {
            return Err(DocumentError::PageNotFound(page));
        }
        self.current_page = Some(page);
        self.select_elements(&[]);
        Ok(())
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    // ─── Elements ────────────────────────────────────────────────────────

    /// Add an element to the current page (one undo step).
    pub fn add_element(&mut self, element: Element) -> Result<NodeId, DocumentError> {
        let page = match self.current_page {
            Some(page) => page,
            None => {
                let page = self.doc.add_page("Page 1");
                self.current_page = Some(page);
                page
            }
        };
        self.history.commit(&self.doc, "add-element")?;
        self.doc.add_element(page, element)
    }

    /// Add a default 3×4 table to the current page.
    pub fn add_table(&mut self) -> Result<NodeId, DocumentError> {
        self.add_element(Element::Table(Table::with_defaults()))
    }

    pub fn selected(&self) -> &[NodeId] {
        &self.selected
    }

    /// Replace the element selection and apply the cell-range clearing
    /// rules. Re-selecting a lone table container restores its last range.
    pub fn select_elements(&mut self, ids: &[NodeId]) {
        self.finish_edit();
        self.selected = ids.iter().copied().collect();
        self.table_sel.on_element_selection(&self.selected);
        if let [only] = self.selected[..]
            && !self.table_sel.is_active()
            && self.doc.table(only).is_ok()
        {
            self.table_sel.restore_last(only);
        }
    }

    fn toggle_element(&mut self, id: NodeId) {
        self.finish_edit();
        if let Some(pos) = self.selected.iter().position(|s| *s == id) {
            self.selected.remove(pos);
        } else {
            self.selected.push(id);
        }
        self.table_sel.on_element_selection(&self.selected);
    }

    // ─── Table selection ─────────────────────────────────────────────────

    /// Current cell range, or `None`.
    pub fn table_sel(&self) -> Option<TableSel> {
        self.table_sel.sel()
    }

    pub fn selection_state(&self) -> crate::selection::SelectionState {
        self.table_sel.state()
    }

    /// Select cells of `table_id` (corners in any order, clamped to the
    /// grid). The table becomes the sole selected element and a pending cell
    /// edit is committed.
    pub fn set_table_selection(
        &mut self,
        table_id: NodeId,
        range: CellRange,
    ) -> Result<(), DocumentError> {
        let table = self.doc.table(table_id)?;
        let range = range.clamp(table.rows, table.cols);
        self.finish_edit();
        if self.selected[..] != [table_id] {
            self.selected = SmallVec::from_slice(&[table_id]);
        }
        self.table_sel.set(table_id, range);
        Ok(())
    }

    pub fn clear_table_selection(&mut self) {
        self.finish_edit();
        self.table_sel.clear();
    }

    /// The table toolbar commands act on: a lone selected table element,
    /// else the table holding the cell range.
    pub fn active_table(&self) -> Option<NodeId> {
        match self.selected[..] {
            [only] if self.doc.table(only).is_ok() => Some(only),
            _ => self.table_sel.sel().map(|s| s.table_id),
        }
    }

    // ─── Ops ─────────────────────────────────────────────────────────────

    /// Run `op` on a clone of the live table and, if it changed anything,
    /// commit a history snapshot and replace the table. Returns whether the
    /// table changed.
    pub fn apply_table_op(
        &mut self,
        table_id: NodeId,
        description: &str,
        op: impl FnOnce(&Table) -> Table,
    ) -> Result<bool, DocumentError> {
        let table = self.doc.table(table_id)?;
        let next = op(table);
        if next == *table {
            return Ok(false);
        }
        self.history.commit(&self.doc, description)?;
        self.doc.replace_table(next)?;
        Ok(true)
    }

    /// Range of the active cell selection on `table_id`.
    fn range_on(&self, table_id: NodeId) -> Option<CellRange> {
        self.table_sel.range_for(table_id)
    }

    /// Insert a row below (`after`) or above the selection; without one,
    /// append at the end.
    pub fn insert_row(&mut self, after: bool) -> Result<bool, DocumentError> {
        self.insert_track(Axis::Row, after)
    }

    /// Insert a column right of (`after`) or left of the selection; without
    /// one, append at the end.
    pub fn insert_column(&mut self, after: bool) -> Result<bool, DocumentError> {
        self.insert_track(Axis::Col, after)
    }

    fn insert_track(&mut self, axis: Axis, after: bool) -> Result<bool, DocumentError> {
        let Some(table_id) = self.active_table() else {
            return Ok(false);
        };
        let range = self.range_on(table_id);
        let at = match (range, axis) {
            (Some(r), Axis::Row) => if after { r.r1 + 1 } else { r.r0 },
            (Some(r), Axis::Col) => if after { r.c1 + 1 } else { r.c0 },
            (None, _) => self.doc.table(table_id)?.count(axis),
        };
        let changed = self.apply_table_op(table_id, "table-insert", |t| match axis {
            Axis::Row => ops::add_row(t, at, 1),
            Axis::Col => ops::add_column(t, at, 1),
        })?;
        // Inserting before the range shifts the selected cells; follow them
        if changed && !after && let Some(r) = range {
            let shifted = match axis {
                Axis::Row => CellRange::new(r.r0 + 1, r.c0, r.r1 + 1, r.c1),
                Axis::Col => CellRange::new(r.r0, r.c0 + 1, r.r1, r.c1 + 1),
            };
            self.table_sel.set(table_id, shifted);
        }
        Ok(changed)
    }

    /// Delete the selected rows (the last row without a selection).
    pub fn delete_rows(&mut self) -> Result<bool, DocumentError> {
        self.delete_tracks(Axis::Row)
    }

    /// Delete the selected columns (the last column without a selection).
    pub fn delete_columns(&mut self) -> Result<bool, DocumentError> {
        self.delete_tracks(Axis::Col)
    }

    fn delete_tracks(&mut self, axis: Axis) -> Result<bool, DocumentError> {
        let Some(table_id) = self.active_table() else {
            return Ok(false);
        };
        let (lo, hi) = match self.range_on(table_id) {
            Some(r) => match axis {
                Axis::Row => (r.r0, r.r1),
                Axis::Col => (r.c0, r.c1),
            },
            None => {
                let last = self.doc.table(table_id)?.count(axis) - 1;
                (last, last)
            }
        };
        let changed = self.apply_table_op(table_id, "table-delete", |t| match axis {
            Axis::Row => ops::delete_rows(t, lo, hi),
            Axis::Col => ops::delete_columns(t, lo, hi),
        })?;
        self.clear_table_selection();
        Ok(changed)
    }

    /// Merge the selected range into one cell.
    pub fn merge(&mut self) -> Result<bool, DocumentError> {
        let Some(sel) = self.table_sel.sel() else {
            return Ok(false);
        };
        let range = sel.range();
        let changed =
            self.apply_table_op(sel.table_id, "table-merge", |t| ops::merge_range(t, range))?;
        self.set_table_selection(sel.table_id, range)?;
        Ok(changed)
    }

    /// Split every merge touching the selection; the range collapses to its
    /// top-left cell.
    pub fn unmerge(&mut self) -> Result<bool, DocumentError> {
        let Some(sel) = self.table_sel.sel() else {
            return Ok(false);
        };
        let range = sel.range();
        let changed = self.apply_table_op(sel.table_id, "table-unmerge", |t| {
            ops::unmerge_range(t, range)
        })?;
        self.set_table_selection(sel.table_id, CellRange::single(range.r0, range.c0))?;
        Ok(changed)
    }

    /// Even out the selected rows (all rows without a selection).
    pub fn distribute_rows(&mut self) -> Result<bool, DocumentError> {
        self.distribute(Axis::Row)
    }

    /// Even out the selected columns (all columns without a selection).
    pub fn distribute_columns(&mut self) -> Result<bool, DocumentError> {
        self.distribute(Axis::Col)
    }

    fn distribute(&mut self, axis: Axis) -> Result<bool, DocumentError> {
        let Some(table_id) = self.active_table() else {
            return Ok(false);
        };
        let range = match self.range_on(table_id) {
            Some(r) => r,
            None => self.doc.table(table_id)?.full_range(),
        };
        self.apply_table_op(table_id, "table-distribute", |t| match axis {
            Axis::Row => ops::distribute_rows(t, range),
            Axis::Col => ops::distribute_cols(t, range),
        })
    }

    /// Empty every cell of the selection.
    pub fn clear_content(&mut self) -> Result<bool, DocumentError> {
        let Some(sel) = self.table_sel.sel() else {
            return Ok(false);
        };
        let range = sel.range();
        self.apply_table_op(sel.table_id, "table-clear", |t| {
            ops::clear_range_content(t, range)
        })
    }

    /// Highlight the cell at `(r, c)` of `table_id` by comparing it with the
    /// cells `min_off`/`max_off` columns away.
    #[allow(clippy::too_many_arguments)]
    pub fn conditional_format(
        &mut self,
        table_id: NodeId,
        r: usize,
        c: usize,
        min_off: isize,
        max_off: isize,
        ok_css: &str,
        nok_css: &str,
    ) -> Result<bool, DocumentError> {
        self.apply_table_op(table_id, "table-conditional-format", |t| {
            style::conditional_format_by_offset(t, r, c, min_off, max_off, ok_css, nok_css)
        })
    }

    // ─── Styling ─────────────────────────────────────────────────────────

    fn style_target(&mut self) -> StyleTarget {
        if let Some(sel) = self.table_sel.sel() {
            return StyleTarget::Cells(sel.table_id, sel.range());
        }
        if self.selected.is_empty() {
            return StyleTarget::Blocked;
        }
        let only_tables = self.selected.iter().all(|id| self.doc.table(*id).is_ok());
        if !only_tables {
            let shapes = self
                .selected
                .iter()
                .copied()
                .filter(|id| self.doc.table(*id).is_err())
                .collect();
            return StyleTarget::Shapes(shapes);
        }
        let first = self.selected[0];
        if self.table_sel.restore_last(first)
            && let Some(range) = self.range_on(first)
        {
            return StyleTarget::Cells(first, range);
        }
        log::debug!("style: table container without cells, ignored");
        StyleTarget::Blocked
    }

    fn patch_shapes(
        &mut self,
        ids: &[NodeId],
        description: &str,
        patch: &CellStylePatch,
    ) -> Result<bool, DocumentError> {
        if patch.is_empty() {
            return Ok(false);
        }
        let targets: SmallVec<[NodeId; 4]> = ids
            .iter()
            .copied()
            .filter(|id| {
                let found = matches!(
                    self.doc.element(*id),
                    Some(
                        Element::Text(_)
                            | Element::Field(_)
                            | Element::Rect(_)
                            | Element::Line(_)
                            | Element::Image(_)
                    )
                );
                if !found {
                    log::warn!("style: element {id} not found");
                }
                found
            })
            .collect();
        if targets.is_empty() {
            return Ok(false);
        }
        self.history.commit(&self.doc, description)?;
        for id in targets {
            if let Some(
                Element::Text(s)
                | Element::Field(s)
                | Element::Rect(s)
                | Element::Line(s)
                | Element::Image(s),
            ) = self.doc.element_mut(id)
            {
                s.styles.merge(patch);
            }
        }
        Ok(true)
    }

    /// Apply a style to the selection: cells when a range is active (or can
    /// be restored), plain elements otherwise.
    fn apply_style(
        &mut self,
        description: &str,
        patch: CellStylePatch,
        cells: impl FnOnce(&Table, CellRange) -> Table,
    ) -> Result<bool, DocumentError> {
        match self.style_target() {
            StyleTarget::Cells(table_id, range) => {
                self.apply_table_op(table_id, description, |t| cells(t, range))
            }
            StyleTarget::Shapes(ids) => self.patch_shapes(&ids, description, &patch),
            StyleTarget::Blocked => Ok(false),
        }
    }

    /// Fill colour; `None` clears it.
    pub fn set_fill(&mut self, color: Option<Color>) -> Result<bool, DocumentError> {
        let patch = CellStylePatch {
            fill: color,
            ..Default::default()
        };
        self.apply_style("style-fill", patch, |t, r| style::apply_cell_bg(t, r, color))
    }

    /// Text colour; `None` clears it.
    pub fn set_text_color(&mut self, color: Option<Color>) -> Result<bool, DocumentError> {
        let patch = CellStylePatch {
            text_color: color,
            ..Default::default()
        };
        self.apply_style("style-text-color", patch, |t, r| {
            style::apply_text_color(t, r, color)
        })
    }

    /// Alignment; `None` leaves that axis alone.
    pub fn set_align(
        &mut self,
        align_h: Option<AlignH>,
        align_v: Option<AlignV>,
    ) -> Result<bool, DocumentError> {
        let patch = CellStylePatch {
            text_align_h: align_h,
            text_align_v: align_v,
            ..Default::default()
        };
        self.apply_style("style-align", patch, |t, r| {
            style::apply_align(t, r, align_h, align_v)
        })
    }

    /// Any single cell style property (stroke, font, padding, ...).
    pub fn set_cell_style(&mut self, prop: CellStyleProp) -> Result<bool, DocumentError> {
        let patch = prop_patch(&prop);
        self.apply_style("style-cell", patch, |t, r| {
            style::apply_cell_style(t, r, &prop)
        })
    }

    /// A host style patch, e.g. from the properties panel.
    pub fn apply_style_patch(&mut self, patch: CellStylePatch) -> Result<bool, DocumentError> {
        let cells = patch.clone();
        self.apply_style("style-patch", patch, |t, r| {
            style::apply_style_patch(t, r, &cells)
        })
    }

    /// Group toggle for bold / italic / underline.
    pub fn toggle_style(&mut self, flag: StyleFlag) -> Result<bool, DocumentError> {
        match self.style_target() {
            StyleTarget::Cells(table_id, range) => {
                self.apply_table_op(table_id, "style-toggle", |t| {
                    style::toggle_cell_style(t, range, flag)
                })
            }
            StyleTarget::Shapes(ids) => {
                let any_off = ids.iter().any(|id| !self.shape_flag(*id, flag));
                let patch = prop_patch(&flag.prop(any_off));
                self.patch_shapes(&ids, "style-toggle", &patch)
            }
            StyleTarget::Blocked => Ok(false),
        }
    }

    fn shape_flag(&self, id: NodeId, flag: StyleFlag) -> bool {
        let styles = match self.doc.element(id) {
            Some(
                Element::Text(s)
                | Element::Field(s)
                | Element::Rect(s)
                | Element::Line(s)
                | Element::Image(s),
            ) => &s.styles,
            _ => return false,
        };
        match flag {
            StyleFlag::Bold => styles.bold,
            StyleFlag::Italic => styles.italic,
            StyleFlag::Underline => styles.underline,
        }
        .unwrap_or(false)
    }

    /// Border preset over the selected cells.
    pub fn set_borders(
        &mut self,
        mode: BorderMode,
        color: Color,
        width: f32,
    ) -> Result<bool, DocumentError> {
        match self.style_target() {
            StyleTarget::Cells(table_id, range) => {
                self.apply_table_op(table_id, "table-borders", |t| {
                    style::apply_borders(t, range, mode, color, width)
                })
            }
            _ => Ok(false),
        }
    }

    // ─── Cell editing ────────────────────────────────────────────────────

    /// Cell being edited, as `(table, r, c)`.
    pub fn editing(&self) -> Option<(NodeId, usize, usize)> {
        self.editing.as_ref().map(|e| (e.table_id, e.r, e.c))
    }

    /// Start editing the selection's top-left cell. `initial` replaces the
    /// text (typing over a cell); `None` keeps it (F2, double click).
    pub fn begin_edit(&mut self, initial: Option<String>) -> bool {
        if !self.doc.edit_mode {
            return false;
        }
        let Some(sel) = self.table_sel.sel() else {
            return false;
        };
        let Ok(table) = self.doc.table(sel.table_id) else {
            return false;
        };
        let (r, c) = anchor_of(table, sel.r0, sel.c0);
        let draft = match initial {
            Some(text) => text,
            None => table
                .cell_at(r, c)
                .map(|cell| cell.content.clone())
                .unwrap_or_default(),
        };
        self.table_sel.set(sel.table_id, CellRange::single(r, c));
        self.editing = Some(EditingCell {
            table_id: sel.table_id,
            r,
            c,
            draft,
        });
        true
    }

    /// Text typed so far into the edited cell.
    pub fn draft(&self) -> Option<&str> {
        self.editing.as_ref().map(|e| e.draft.as_str())
    }

    /// Host reports the edited cell's current text.
    pub fn update_draft(&mut self, text: &str) {
        if let Some(edit) = &mut self.editing {
            edit.draft = text.to_string();
        }
    }

    /// Write the draft into the cell.
    pub fn commit_edit(&mut self) -> Result<bool, DocumentError> {
        let Some(edit) = self.editing.take() else {
            return Ok(false);
        };
        self.commit_cell_text(edit.table_id, edit.r, edit.c, &edit.draft)
    }

    /// Drop the draft.
    pub fn cancel_edit(&mut self) -> bool {
        self.editing.take().is_some()
    }

    /// Commit on blur-like transitions; a failed commit is only logged.
    fn finish_edit(&mut self) {
        if let Err(e) = self.commit_edit() {
            log::warn!("cell edit lost: {e}");
        }
    }

    /// Set a cell's text directly.
    pub fn commit_cell_text(
        &mut self,
        table_id: NodeId,
        r: usize,
        c: usize,
        text: &str,
    ) -> Result<bool, DocumentError> {
        self.apply_table_op(table_id, "cell-text", |t| {
            ops::set_cell_content(t, r, c, text)
        })
    }

    // ─── Clipboard ───────────────────────────────────────────────────────

    /// Copy the selection. Nothing is copied without a range or while a
    /// cell is being edited (the text field owns the clipboard then).
    pub fn copy(&self) -> Option<ClipboardPayload> {
        if self.editing.is_some() {
            return None;
        }
        let sel = self.table_sel.sel()?;
        let table = self.doc.table(sel.table_id).ok()?;
        Some(ClipboardPayload {
            text: copy_range(table, sel.range()),
            html: copy_range_html(table, sel.range()),
        })
    }

    /// Copy, then clear the selected cells.
    pub fn cut(&mut self) -> Result<Option<ClipboardPayload>, DocumentError> {
        let Some(payload) = self.copy() else {
            return Ok(None);
        };
        self.clear_content()?;
        Ok(Some(payload))
    }

    /// Paste clipboard text at the selection's top-left cell and select the
    /// pasted rectangle.
    pub fn paste(&mut self, text: &str) -> Result<bool, DocumentError> {
        if self.editing.is_some() || text.is_empty() {
            return Ok(false);
        }
        let Some(sel) = self.table_sel.sel() else {
            return Ok(false);
        };
        let grid = parse_clipboard(text);
        if grid.is_empty() {
            return Ok(false);
        }
        let (r, c) = anchor_of(self.doc.table(sel.table_id)?, sel.r0, sel.c0);
        let changed =
            self.apply_table_op(sel.table_id, "table-paste", |t| paste_grid(t, r, c, &grid))?;
        let width = grid.iter().map(Vec::len).max().unwrap_or(1).max(1);
        self.set_table_selection(
            sel.table_id,
            CellRange::new(r, c, r + grid.len() - 1, c + width - 1),
        )?;
        Ok(changed)
    }

    // ─── History ─────────────────────────────────────────────────────────

    fn after_restore(&mut self, edit_mode: bool) {
        self.doc.edit_mode = edit_mode;
        self.editing = None;
        self.selected.retain(|id| self.doc.element(*id).is_some());
        if let Some(sel) = self.table_sel.sel() {
            match self.doc.table(sel.table_id) {
                Ok(t) => {
                    let range = sel.range().clamp(t.rows, t.cols);
                    self.table_sel.set(sel.table_id, range);
                }
                Err(_) => self.table_sel.clear(),
            }
        }
        if self
            .current_page
            .is_some_and(|p| !self.doc.pages().iter().any(|page| page.id == p))
        {
            self.current_page = self.doc.pages().first().map(|p| p.id);
        }
    }

    pub fn undo(&mut self) -> Result<bool, DocumentError> {
        self.editing = None;
        let edit_mode = self.doc.edit_mode;
        let undone = self.history.undo(&mut self.doc)?;
        self.after_restore(edit_mode);
        Ok(undone.is_some())
    }

    pub fn redo(&mut self) -> Result<bool, DocumentError> {
        self.editing = None;
        let edit_mode = self.doc.edit_mode;
        let redone = self.history.redo(&mut self.doc)?;
        self.after_restore(edit_mode);
        Ok(redone.is_some())
    }

    // ─── Input ───────────────────────────────────────────────────────────

    /// Feed one input event. Returns whether anything visible changed.
    pub fn handle_event(&mut self, event: &InputEvent) -> Result<bool, DocumentError> {
        if let InputEvent::Key { key, modifiers } = event {
            return self.handle_key(key, *modifiers);
        }
        let Some(page) = self.current_page else {
            return Ok(false);
        };
        let actions = self.tool.handle(event, &self.doc, page, self.doc.edit_mode);
        let mut changed = false;
        for action in actions {
            changed |= self.apply_tool_action(action)?;
        }
        Ok(changed)
    }

    /// Boundary under the pointer while idle, for the resize cursor.
    pub fn hovered_boundary(&self) -> Option<(NodeId, pc_render::BoundaryHit)> {
        self.tool.hovered
    }

    fn apply_tool_action(&mut self, action: ToolAction) -> Result<bool, DocumentError> {
        match action {
            ToolAction::SelectElement { id, additive } => {
                match (id, additive) {
                    (Some(id), true) => self.toggle_element(id),
                    (Some(id), false) => self.select_elements(&[id]),
                    (None, true) => {}
                    (None, false) => self.select_elements(&[]),
                }
                Ok(true)
            }
            ToolAction::AnchorCell { table_id, r, c } => {
                if self.editing() == Some((table_id, r, c)) {
                    return Ok(false);
                }
                self.finish_edit();
                self.selected = SmallVec::from_slice(&[table_id]);
                self.table_sel.pointer_down(table_id, r, c);
                Ok(true)
            }
            ToolAction::ExtendCell { table_id, r, c } => {
                if self.table_sel.range_for(table_id).is_none() {
                    self.finish_edit();
                    self.selected = SmallVec::from_slice(&[table_id]);
                    self.table_sel.pointer_down(table_id, r, c);
                    return Ok(true);
                }
                Ok(self.table_sel.extend_to(table_id, r, c))
            }
            ToolAction::CommitCells => {
                self.table_sel.pointer_up();
                Ok(false)
            }
            ToolAction::BeginResize { .. } => {
                self.finish_edit();
                self.history.begin_batch(&self.doc, "table-resize")?;
                Ok(false)
            }
            ToolAction::Resize {
                table_id,
                axis,
                index,
                size,
            } => {
                // Dragging a boundary inside the selection resizes every
                // selected track along that axis
                let span = self
                    .range_on(table_id)
                    .map(|r| r.span_on(axis))
                    .filter(|span| span.contains(&index));
                self.apply_table_op(table_id, "table-resize", |t| match (axis, span) {
                    (Axis::Col, Some(s)) => ops::resize_cols(t, *s.start(), *s.end(), size),
                    (Axis::Row, Some(s)) => ops::resize_rows(t, *s.start(), *s.end(), size),
                    (Axis::Col, None) => ops::resize_col(t, index, size),
                    (Axis::Row, None) => ops::resize_row(t, index, size),
                })
            }
            ToolAction::EndResize => {
                self.history.end_batch(&self.doc)?;
                Ok(false)
            }
        }
    }

    fn handle_key(&mut self, key: &str, mods: Modifiers) -> Result<bool, DocumentError> {
        if self.editing.is_some() {
            return match ShortcutMap::resolve_editing(key, mods) {
                Some(TableAction::CommitEdit { then }) => {
                    self.commit_edit()?;
                    if let Some(nav) = then {
                        self.navigate(nav, false);
                    }
                    Ok(true)
                }
                Some(TableAction::CancelEdit) => Ok(self.cancel_edit()),
                _ => Ok(false),
            };
        }

        let action = ShortcutMap::resolve(key, mods);
        let Some(sel) = self.table_sel.sel() else {
            return match action {
                Some(TableAction::Undo) => self.undo(),
                Some(TableAction::Redo) => self.redo(),
                _ => Ok(false),
            };
        };
        match action {
            Some(TableAction::Navigate { key, grow }) => Ok(self.navigate(key, grow).is_some()),
            Some(TableAction::ClearSelection) => {
                self.clear_table_selection();
                Ok(true)
            }
            Some(TableAction::ClearContent) => self.clear_content(),
            Some(TableAction::StartEdit) => Ok(self.begin_edit(None)),
            Some(TableAction::TypeToEdit(ch)) => Ok(self.begin_edit(Some(ch.to_string()))),
            Some(TableAction::Toggle(flag)) => self.toggle_style(flag),
            Some(TableAction::SelectAll) => {
                let full = self.doc.table(sel.table_id)?.full_range();
                self.set_table_selection(sel.table_id, full)?;
                Ok(true)
            }
            Some(TableAction::Undo) => self.undo(),
            Some(TableAction::Redo) => self.redo(),
            Some(TableAction::CommitEdit { .. } | TableAction::CancelEdit) | None => Ok(false),
        }
    }

    /// Keyboard move of the cell range.
    pub fn navigate(&mut self, key: NavKey, grow: bool) -> Option<CellRange> {
        let sel = self.table_sel.sel()?;
        let table = self.doc.table(sel.table_id).ok()?;
        self.table_sel.navigate(table, key, grow)
    }

    // ─── Rendering ───────────────────────────────────────────────────────

    /// View of one table with the session's selection and edit state.
    pub fn render_table(&self, table_id: NodeId) -> Result<TableView, DocumentError> {
        let table = self.doc.table(table_id)?;
        let ctx = RenderContext {
            edit_mode: self.doc.edit_mode,
            selection: self.range_on(table_id),
            editing: self
                .editing
                .as_ref()
                .filter(|e| e.table_id == table_id)
                .map(|e| (e.r, e.c)),
        };
        Ok(pc_render::render_table(table, &ctx))
    }

    /// Views of every table on the current page, in stacking order.
    pub fn render_page(&self) -> Vec<TableView> {
        let Some(page) = self.current_page else {
            return Vec::new();
        };
        self.doc
            .elements_on(page)
            .into_iter()
            .filter_map(Element::as_table)
            .filter_map(|t| self.render_table(t.id).ok())
            .collect()
    }
}

/// The host patch equivalent of a single cell style property.
fn prop_patch(prop: &CellStyleProp) -> CellStylePatch {
    let mut p = CellStylePatch::default();
    match prop {
        CellStyleProp::Bg(c) => p.fill = *c,
        CellStyleProp::TextColor(c) => p.text_color = *c,
        CellStyleProp::AlignH(a) => p.text_align_h = Some(*a),
        CellStyleProp::AlignV(a) => p.text_align_v = Some(*a),
        CellStyleProp::Padding(v) => p.padding = Some(*v),
        CellStyleProp::FontFamily(f) => p.font_family = Some(f.clone()),
        CellStyleProp::FontSize(v) => p.font_size = Some(*v),
        CellStyleProp::Bold(b) => p.bold = Some(*b),
        CellStyleProp::Italic(b) => p.italic = Some(*b),
        CellStyleProp::Underline(b) => p.underline = Some(*b),
        CellStyleProp::BorderColor(c) => p.stroke_color = Some(*c),
        CellStyleProp::BorderWidth(v) => p.stroke_width = Some(*v),
        CellStyleProp::Borders(_) => {}
    }
    p
}
