//! Integration tests: history through the editor session.

use pc_core::document::{Element, Frame, Shape};
use pc_core::id::NodeId;
use pc_core::model::{CellRange, StyleFlag, Table};
use pc_editor::{EditorConfig, EditorSession, InputEvent, Modifiers};
use pretty_assertions::assert_eq;

fn session(name: &str) -> (EditorSession, NodeId) {
    let mut s = EditorSession::default();
    let id = s
        .add_element(Element::Table(Table::new(NodeId::intern(name), 3, 4)))
        .unwrap();
    (s, id)
}

fn rows(s: &EditorSession, id: NodeId) -> usize {
    s.document().table(id).unwrap().rows
}

// ─── Steps ───────────────────────────────────────────────────────────────

#[test]
fn each_command_is_one_step() {
    let (mut s, id) = session("tbl_ur_steps");
    s.select_elements(&[id]);
    s.insert_row(true).unwrap();
    s.insert_row(true).unwrap();
    assert_eq!(rows(&s, id), 5);

    assert!(s.undo().unwrap());
    assert_eq!(rows(&s, id), 4);
    assert!(s.undo().unwrap());
    assert_eq!(rows(&s, id), 3);
    assert!(s.redo().unwrap());
    assert_eq!(rows(&s, id), 4);
}

#[test]
fn undo_reaches_before_the_table_existed() {
    let (mut s, id) = session("tbl_ur_add");
    assert!(s.undo().unwrap());
    assert!(s.document().element(id).is_none());
    assert!(!s.undo().unwrap());
    assert!(s.redo().unwrap());
    assert_eq!(rows(&s, id), 3);
}

#[test]
fn unchanged_ops_leave_no_step() {
    let (mut s, id) = session("tbl_ur_noop");
    let depth = s.history().undo_depth();
    s.set_table_selection(id, CellRange::single(0, 0)).unwrap();
    // clearing an empty cell changes nothing
    assert!(!s.clear_content().unwrap());
    // nor does committing identical text
    assert!(!s.commit_cell_text(id, 0, 0, "").unwrap());
    assert_eq!(s.history().undo_depth(), depth);
}

#[test]
fn paste_is_a_single_step() {
    let (mut s, id) = session("tbl_ur_paste");
    s.set_table_selection(id, CellRange::single(0, 0)).unwrap();
    s.paste("a\tb\tc\nd\te\tf").unwrap();
    assert!(s.undo().unwrap());
    let t = s.document().table(id).unwrap();
    assert!(t.cells.iter().all(|c| c.content.is_empty()));
}

#[test]
fn new_command_drops_redo() {
    let (mut s, id) = session("tbl_ur_redo");
    s.select_elements(&[id]);
    s.insert_column(true).unwrap();
    s.undo().unwrap();
    assert!(s.history().can_redo());
    s.insert_row(true).unwrap();
    assert!(!s.history().can_redo());
}

#[test]
fn history_depth_is_configurable() {
    let mut s = EditorSession::new(EditorConfig {
        history_depth: 2,
        ..Default::default()
    });
    let id = s
        .add_element(Element::Table(Table::new(NodeId::intern("tbl_ur_depth"), 3, 4)))
        .unwrap();
    s.select_elements(&[id]);
    for _ in 0..4 {
        s.insert_row(true).unwrap();
    }
    assert_eq!(s.history().undo_depth(), 2);
    while s.undo().unwrap() {}
    assert_eq!(rows(&s, id), 5);
}

// ─── Session state after undo ────────────────────────────────────────────

#[test]
fn selection_is_clamped_after_undo() {
    let (mut s, id) = session("tbl_ur_clamp");
    s.select_elements(&[id]);
    s.insert_row(true).unwrap();
    s.set_table_selection(id, CellRange::single(3, 0)).unwrap();
    s.undo().unwrap();
    assert_eq!(s.table_sel().unwrap().range(), CellRange::single(2, 0));
}

#[test]
fn undo_keeps_edit_mode_and_drops_editing() {
    let (mut s, id) = session("tbl_ur_mode");
    s.set_table_selection(id, CellRange::single(0, 0)).unwrap();
    s.begin_edit(Some("x".into()));
    s.undo().unwrap();
    assert_eq!(s.editing(), None);
    assert!(s.edit_mode());
}

#[test]
fn keyboard_undo_redo() {
    let (mut s, id) = session("tbl_ur_keys");
    s.set_table_selection(id, CellRange::single(1, 1)).unwrap();
    s.toggle_style(StyleFlag::Bold).unwrap();
    let cmd = Modifiers {
        meta: true,
        ..Default::default()
    };
    s.handle_event(&InputEvent::from_key("z", cmd)).unwrap();
    let bold = |s: &EditorSession| s.document().table(id).unwrap().cell_at(1, 1).unwrap().styles.bold;
    assert_eq!(bold(&s), None);
    let redo = Modifiers { shift: true, ..cmd };
    s.handle_event(&InputEvent::from_key("z", redo)).unwrap();
    assert_eq!(bold(&s), Some(true));
}

#[test]
fn shape_styles_undo() {
    let mut s = EditorSession::default();
    let id = s
        .add_element(Element::Rect(Shape::new(
            NodeId::intern("rect_ur"),
            Frame {
                x: 10.0,
                y: 10.0,
                w: 20.0,
                h: 20.0,
            },
        )))
        .unwrap();
    s.select_elements(&[id]);
    s.toggle_style(StyleFlag::Underline).unwrap();
    s.undo().unwrap();
    let Some(Element::Rect(shape)) = s.document().element(id) else {
        panic!("expected rect");
    };
    assert_eq!(shape.styles.underline, None);
    assert_eq!(s.selected(), &[id]);
}
