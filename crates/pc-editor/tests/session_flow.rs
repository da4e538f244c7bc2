//! Integration tests: pointer gestures, keyboard flows and toolbar commands
//! driven through `EditorSession`.
//!
//! Every table is the default 3×4 grid at (100, 100): columns are 150px
//! wide and rows 40px tall.

use pc_core::document::Element;
use pc_core::id::NodeId;
use pc_core::model::{CellRange, Color, StyleFlag, Table};
use pc_editor::{EditorSession, InputEvent, Modifiers, SelectionState};
use pretty_assertions::assert_eq;

// ─── Helpers ─────────────────────────────────────────────────────────────

fn session(name: &str) -> (EditorSession, NodeId) {
    let mut s = EditorSession::default();
    let id = s
        .add_element(Element::Table(Table::new(NodeId::intern(name), 3, 4)))
        .unwrap();
    (s, id)
}

/// Page coordinates of the centre of cell `(r, c)`.
fn center(r: usize, c: usize) -> (f32, f32) {
    (100.0 + 150.0 * c as f32 + 75.0, 100.0 + 40.0 * r as f32 + 20.0)
}

fn press(s: &mut EditorSession, (x, y): (f32, f32), mods: Modifiers) {
    s.handle_event(&InputEvent::from_pointer_down(x, y, mods))
        .unwrap();
}

fn drag_to(s: &mut EditorSession, (x, y): (f32, f32)) {
    s.handle_event(&InputEvent::from_pointer_move(x, y, Modifiers::NONE))
        .unwrap();
}

fn release(s: &mut EditorSession, (x, y): (f32, f32)) {
    s.handle_event(&InputEvent::from_pointer_up(x, y, Modifiers::NONE))
        .unwrap();
}

fn key(s: &mut EditorSession, k: &str, mods: Modifiers) -> bool {
    s.handle_event(&InputEvent::from_key(k, mods)).unwrap()
}

fn range(s: &EditorSession) -> Option<CellRange> {
    s.table_sel().map(|sel| sel.range())
}

fn content(s: &EditorSession, id: NodeId, r: usize, c: usize) -> String {
    s.document()
        .table(id)
        .unwrap()
        .cell_at(r, c)
        .unwrap()
        .content
        .clone()
}

// ─── Pointer ─────────────────────────────────────────────────────────────

#[test]
fn drag_selects_a_range() {
    let (mut s, id) = session("tbl_flow_drag");
    press(&mut s, center(0, 0), Modifiers::NONE);
    assert_eq!(s.selection_state(), SelectionState::Anchored);
    drag_to(&mut s, center(1, 2));
    assert_eq!(s.selection_state(), SelectionState::Dragging);
    release(&mut s, center(1, 2));
    assert_eq!(s.selection_state(), SelectionState::Committed);
    assert_eq!(range(&s), Some(CellRange::new(0, 0, 1, 2)));
    assert_eq!(s.selected(), &[id]);
}

#[test]
fn shift_click_extends() {
    let (mut s, _) = session("tbl_flow_shift");
    press(&mut s, center(2, 3), Modifiers::NONE);
    release(&mut s, center(2, 3));
    press(&mut s, center(0, 1), Modifiers::SHIFT);
    release(&mut s, center(0, 1));
    assert_eq!(range(&s), Some(CellRange::new(0, 1, 2, 3)));
}

#[test]
fn clicking_empty_canvas_clears_everything() {
    let (mut s, _) = session("tbl_flow_empty");
    press(&mut s, center(1, 1), Modifiers::NONE);
    release(&mut s, center(1, 1));
    press(&mut s, (5.0, 5.0), Modifiers::NONE);
    assert_eq!(range(&s), None);
    assert!(s.selected().is_empty());
}

#[test]
fn boundary_drag_is_one_undo_step() {
    let (mut s, id) = session("tbl_flow_resize");
    let depth = s.history().undo_depth();
    press(&mut s, (251.0, 150.0), Modifiers::NONE);
    drag_to(&mut s, (261.0, 150.0));
    drag_to(&mut s, (281.0, 150.0));
    release(&mut s, (281.0, 150.0));

    assert_eq!(s.document().table(id).unwrap().col_widths[0], 180.0);
    assert_eq!(s.history().undo_depth(), depth + 1);
    assert!(s.undo().unwrap());
    assert_eq!(s.document().table(id).unwrap().col_widths[0], 150.0);
}

#[test]
fn boundary_inside_selection_resizes_the_band() {
    let (mut s, id) = session("tbl_flow_band");
    s.set_table_selection(id, CellRange::new(0, 0, 2, 1)).unwrap();
    press(&mut s, (251.0, 150.0), Modifiers::NONE);
    drag_to(&mut s, (201.0, 150.0));
    release(&mut s, (201.0, 150.0));
    let t = s.document().table(id).unwrap();
    assert_eq!(t.col_widths, vec![100.0, 100.0, 150.0, 150.0]);
}

#[test]
fn run_mode_has_no_resize() {
    let (mut s, id) = session("tbl_flow_run");
    s.set_edit_mode(false);
    press(&mut s, (251.0, 150.0), Modifiers::NONE);
    drag_to(&mut s, (281.0, 150.0));
    release(&mut s, (281.0, 150.0));
    assert_eq!(s.document().table(id).unwrap().col_widths[0], 150.0);
    assert!(range(&s).is_some());
}

// ─── Keyboard ────────────────────────────────────────────────────────────

#[test]
fn arrows_move_and_shift_grows() {
    let (mut s, id) = session("tbl_flow_arrows");
    s.set_table_selection(id, CellRange::single(0, 0)).unwrap();
    assert!(key(&mut s, "ArrowRight", Modifiers::NONE));
    assert_eq!(range(&s), Some(CellRange::single(0, 1)));
    key(&mut s, "ArrowDown", Modifiers::SHIFT);
    key(&mut s, "ArrowRight", Modifiers::SHIFT);
    assert_eq!(range(&s), Some(CellRange::new(0, 1, 1, 2)));
}

#[test]
fn keys_without_selection_do_nothing() {
    let (mut s, _) = session("tbl_flow_nokeys");
    assert!(!key(&mut s, "ArrowRight", Modifiers::NONE));
    assert!(!key(&mut s, "x", Modifiers::NONE));
    assert_eq!(s.editing(), None);
}

#[test]
fn typing_overwrites_and_enter_commits() {
    let (mut s, id) = session("tbl_flow_type");
    s.commit_cell_text(id, 1, 1, "old").unwrap();
    s.set_table_selection(id, CellRange::single(1, 1)).unwrap();
    key(&mut s, "n", Modifiers::NONE);
    assert_eq!(s.editing(), Some((id, 1, 1)));
    assert_eq!(s.draft(), Some("n"));
    s.update_draft("new");
    key(&mut s, "Enter", Modifiers::NONE);
    assert_eq!(s.editing(), None);
    assert_eq!(content(&s, id, 1, 1), "new");
    assert_eq!(range(&s), Some(CellRange::single(1, 1)));
}

#[test]
fn f2_keeps_text_and_escape_cancels() {
    let (mut s, id) = session("tbl_flow_f2");
    s.commit_cell_text(id, 0, 0, "keep").unwrap();
    s.set_table_selection(id, CellRange::single(0, 0)).unwrap();
    key(&mut s, "F2", Modifiers::NONE);
    assert_eq!(s.draft(), Some("keep"));
    s.update_draft("changed");
    key(&mut s, "Escape", Modifiers::NONE);
    assert_eq!(s.editing(), None);
    assert_eq!(content(&s, id, 0, 0), "keep");
}

#[test]
fn tab_commits_and_wraps() {
    let (mut s, id) = session("tbl_flow_tab");
    s.set_table_selection(id, CellRange::single(0, 3)).unwrap();
    key(&mut s, "F2", Modifiers::NONE);
    s.update_draft("end");
    key(&mut s, "Tab", Modifiers::NONE);
    assert_eq!(content(&s, id, 0, 3), "end");
    assert_eq!(range(&s), Some(CellRange::single(1, 0)));
}

#[test]
fn delete_clears_content_and_escape_clears_range() {
    let (mut s, id) = session("tbl_flow_delete");
    s.commit_cell_text(id, 0, 0, "a").unwrap();
    s.commit_cell_text(id, 0, 1, "b").unwrap();
    s.set_table_selection(id, CellRange::new(0, 0, 0, 1)).unwrap();
    key(&mut s, "Delete", Modifiers::NONE);
    assert_eq!(content(&s, id, 0, 0), "");
    assert_eq!(content(&s, id, 0, 1), "");
    assert!(range(&s).is_some());
    key(&mut s, "Escape", Modifiers::NONE);
    assert_eq!(range(&s), None);
}

#[test]
fn select_all_and_bold_toggle() {
    let (mut s, id) = session("tbl_flow_all");
    s.set_table_selection(id, CellRange::single(1, 1)).unwrap();
    let cmd = Modifiers {
        ctrl: true,
        ..Default::default()
    };
    key(&mut s, "a", cmd);
    assert_eq!(range(&s), Some(CellRange::new(0, 0, 2, 3)));
    key(&mut s, "b", cmd);
    let t = s.document().table(id).unwrap();
    assert!(t.cells.iter().all(|c| c.styles.bold == Some(true)));
}

// ─── Toolbar ─────────────────────────────────────────────────────────────

#[test]
fn insert_row_follows_selection() {
    let (mut s, id) = session("tbl_flow_insert");
    s.set_table_selection(id, CellRange::single(1, 1)).unwrap();
    assert!(s.insert_row(false).unwrap());
    assert_eq!(s.document().table(id).unwrap().rows, 4);
    assert_eq!(range(&s), Some(CellRange::single(2, 1)));

    assert!(s.insert_column(true).unwrap());
    assert_eq!(s.document().table(id).unwrap().cols, 5);
    assert_eq!(range(&s), Some(CellRange::single(2, 1)));
}

#[test]
fn insert_without_selection_appends() {
    let (mut s, id) = session("tbl_flow_append");
    s.select_elements(&[id]);
    s.commit_cell_text(id, 2, 0, "last").unwrap();
    assert!(s.insert_row(true).unwrap());
    let t = s.document().table(id).unwrap();
    assert_eq!(t.rows, 4);
    assert_eq!(t.cell_at(2, 0).unwrap().content, "last");
    assert_eq!(t.cell_at(3, 0).unwrap().content, "");
}

#[test]
fn delete_removes_the_band() {
    let (mut s, id) = session("tbl_flow_band_del");
    s.set_table_selection(id, CellRange::new(0, 1, 2, 2)).unwrap();
    assert!(s.delete_columns().unwrap());
    assert_eq!(s.document().table(id).unwrap().cols, 2);
    assert_eq!(range(&s), None);
}

#[test]
fn merge_then_unmerge() {
    let (mut s, id) = session("tbl_flow_merge");
    s.set_table_selection(id, CellRange::new(0, 0, 1, 1)).unwrap();
    assert!(s.merge().unwrap());
    assert_eq!(range(&s), Some(CellRange::new(0, 0, 1, 1)));
    let cell = s.document().table(id).unwrap().cell_at(1, 1).unwrap().clone();
    assert_eq!((cell.row, cell.col, cell.row_span, cell.col_span), (0, 0, 2, 2));

    assert!(s.unmerge().unwrap());
    assert_eq!(range(&s), Some(CellRange::single(0, 0)));
    assert!(!s.document().table(id).unwrap().cell_at(1, 1).unwrap().is_merged());
}

#[test]
fn fill_applies_to_selected_cells_only() {
    let (mut s, id) = session("tbl_flow_fill");
    s.set_table_selection(id, CellRange::single(2, 3)).unwrap();
    let red = Color::from_hex("#FF0000");
    assert!(s.set_fill(red).unwrap());
    let t = s.document().table(id).unwrap();
    assert_eq!(t.cell_at(2, 3).unwrap().styles.bg, red);
    assert_eq!(t.cell_at(0, 0).unwrap().styles.bg, None);
}

#[test]
fn italic_toggle_on_mixed_range_turns_all_on() {
    let (mut s, id) = session("tbl_flow_italic");
    s.set_table_selection(id, CellRange::single(0, 0)).unwrap();
    s.toggle_style(StyleFlag::Italic).unwrap();
    s.set_table_selection(id, CellRange::new(0, 0, 0, 1)).unwrap();
    s.toggle_style(StyleFlag::Italic).unwrap();
    let t = s.document().table(id).unwrap();
    assert_eq!(t.cell_at(0, 0).unwrap().styles.italic, Some(true));
    assert_eq!(t.cell_at(0, 1).unwrap().styles.italic, Some(true));
}

// ─── Clipboard ───────────────────────────────────────────────────────────

#[test]
fn cut_then_paste_elsewhere() {
    let (mut s, id) = session("tbl_flow_cut");
    s.commit_cell_text(id, 0, 0, "1").unwrap();
    s.commit_cell_text(id, 0, 1, "2").unwrap();
    s.set_table_selection(id, CellRange::new(0, 0, 0, 1)).unwrap();
    let payload = s.cut().unwrap().unwrap();
    assert_eq!(payload.text, "1\t2");
    assert!(payload.html.contains("<table"));
    assert_eq!(content(&s, id, 0, 0), "");

    s.set_table_selection(id, CellRange::single(2, 2)).unwrap();
    assert!(s.paste(&payload.text).unwrap());
    assert_eq!(content(&s, id, 2, 2), "1");
    assert_eq!(content(&s, id, 2, 3), "2");
    assert_eq!(range(&s), Some(CellRange::new(2, 2, 2, 3)));
}

#[test]
fn copied_column_overwrites_filled_column() {
    let (mut s, id) = session("tbl_flow_column");
    for r in 0..3 {
        s.commit_cell_text(id, r, 1, "old").unwrap();
    }
    s.commit_cell_text(id, 0, 0, "a").unwrap();
    s.set_table_selection(id, CellRange::new(0, 0, 2, 0)).unwrap();
    let payload = s.copy().unwrap();

    s.set_table_selection(id, CellRange::single(0, 1)).unwrap();
    assert!(s.paste(&payload.text).unwrap());
    let column: Vec<_> = (0..3).map(|r| content(&s, id, r, 1)).collect();
    assert_eq!(column, ["a", "", ""]);
    assert_eq!(range(&s), Some(CellRange::new(0, 1, 2, 1)));
}

#[test]
fn paste_overflow_is_clamped() {
    let (mut s, id) = session("tbl_flow_overflow");
    s.set_table_selection(id, CellRange::single(2, 3)).unwrap();
    assert!(s.paste("a\tb\nc\td").unwrap());
    let t = s.document().table(id).unwrap();
    assert_eq!((t.rows, t.cols), (3, 4));
    assert_eq!(content(&s, id, 2, 3), "a");
    assert_eq!(range(&s), Some(CellRange::single(2, 3)));
}

// ─── Rendering ───────────────────────────────────────────────────────────

#[test]
fn render_reflects_selection_and_editing() {
    let (mut s, id) = session("tbl_flow_render");
    s.set_table_selection(id, CellRange::new(0, 0, 1, 1)).unwrap();
    let view = s.render_table(id).unwrap();
    let selected = view
        .cells
        .iter()
        .filter(|c| c.classes.contains(&"is-range"))
        .count();
    assert_eq!(selected, 4);
    assert!(view.selection.is_some());

    s.set_table_selection(id, CellRange::single(0, 0)).unwrap();
    s.begin_edit(None);
    let view = s.render_table(id).unwrap();
    let editable: Vec<_> = view.cells.iter().filter(|c| c.editable).collect();
    assert_eq!(editable.len(), 1);
    assert_eq!((editable[0].row, editable[0].col), (0, 0));
    assert_eq!(s.render_page().len(), 1);
}
