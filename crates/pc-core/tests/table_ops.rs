//! Integration tests: structural, style and clipboard ops on whole tables.
//!
//! Each scenario starts from the default table factory and checks the
//! resulting grid the way the editor sees it.

use pc_core::clipboard::{copy_range, paste_text};
use pc_core::geometry::{cell_rect, point_to_cell};
use pc_core::id::NodeId;
use pc_core::model::*;
use pc_core::ops::*;
use pc_core::style::{any_cell_style_off, apply_cell_style, toggle_cell_style};
use pretty_assertions::assert_eq;

// ─── Helpers ─────────────────────────────────────────────────────────────

fn default_table(name: &str) -> Table {
    Table::new(NodeId::intern(name), 3, 4)
}

fn fill(t: &Table, texts: &[(usize, usize, &str)]) -> Table {
    texts
        .iter()
        .fold(t.clone(), |acc, (r, c, text)| set_cell_content(&acc, *r, *c, text))
}

// ─── Merge ───────────────────────────────────────────────────────────────

#[test]
fn merge_top_left_square() {
    let t = default_table("tbl_it_merge");
    assert_eq!(t.cells.len(), 12);

    let merged = merge_range(&t, CellRange::new(0, 0, 1, 1));
    assert_eq!(merged.cells.len(), 9);
    assert_eq!(merged.grid[0][0], merged.grid[0][1]);
    assert_eq!(merged.grid[0][0], merged.grid[1][0]);
    assert_eq!(merged.grid[0][0], merged.grid[1][1]);
    assert_ne!(merged.grid[0][0], merged.grid[0][2]);

    let anchor = merged.cell_at(1, 1).unwrap();
    assert_eq!((anchor.row, anchor.col), (0, 0));
    assert_eq!((anchor.row_span, anchor.col_span), (2, 2));
    assert_eq!(merged.check_invariants(), Ok(()));
}

#[test]
fn merge_accepts_reversed_corners() {
    let t = default_table("tbl_it_reversed");
    let a = merge_range(&t, CellRange::new(2, 3, 1, 2));
    let b = merge_range(&t, CellRange::new(1, 2, 2, 3));
    assert_eq!(a, b);
}

#[test]
fn merge_then_unmerge_restores_unit_cells() {
    let t = default_table("tbl_it_unmerge");
    let range = CellRange::new(0, 1, 2, 2);
    let merged = merge_range(&t, range);
    let split = unmerge(&merged, NodeId::cell(t.id, 0, 1));
    assert_eq!(split.cells.len(), 12);
    assert!(split.cells.iter().all(|c| !c.is_merged()));
}

#[test]
fn merged_cell_rect_covers_span() {
    let t = merge_range(&default_table("tbl_it_rect"), CellRange::new(1, 1, 2, 3));
    let rect = cell_rect(&t, 2, 2);
    assert_eq!(
        rect,
        CellRect {
            x: 150.0,
            y: 40.0,
            w: 450.0,
            h: 80.0
        }
    );
    assert_eq!(point_to_cell(&t, 500.0, 100.0), (2, 3));
}

// ─── Insert / delete ─────────────────────────────────────────────────────

#[test]
fn delete_first_column() {
    let t = fill(
        &default_table("tbl_it_delcol"),
        &[(0, 1, "b"), (2, 3, "z")],
    );
    let next = delete_column(&t, 0);
    assert_eq!(next.cols, 3);
    assert_eq!(next.col_widths.len(), 3);
    assert_eq!(next.cells.len(), 9);
    assert_eq!(next.cell_at(0, 0).unwrap().content, "b");
    assert_eq!(next.cell_at(2, 2).unwrap().content, "z");
    for cell in &next.cells {
        let before = t
            .cells
            .iter()
            .find(|c| c.row == cell.row && c.col == cell.col + 1)
            .unwrap();
        assert_eq!(before.content, cell.content);
    }
}

#[test]
fn add_then_delete_row_roundtrip() {
    let t = merge_range(
        &fill(&default_table("tbl_it_rowtrip"), &[(0, 0, "a"), (2, 1, "c")]),
        CellRange::new(0, 2, 2, 2),
    );
    for i in 0..=t.rows {
        let back = delete_row(&add_row(&t, i, 1), i);
        assert_eq!(back.rows, t.rows);
        assert_eq!(back.row_heights, t.row_heights);
        assert_eq!(back.grid, t.grid);
        assert_eq!(back.cells, t.cells);
    }
}

#[test]
fn add_column_inside_merge_widens_it() {
    let t = merge_range(&default_table("tbl_it_addcol"), CellRange::new(0, 0, 0, 2));
    let next = add_column(&t, 1, 1);
    assert_eq!(next.cols, 5);
    assert_eq!(next.cell_at(0, 0).unwrap().col_span, 4);
    assert_eq!(next.col_widths[1], 150.0);
}

// ─── Sizes ───────────────────────────────────────────────────────────────

#[test]
fn distribute_middle_columns() {
    let mut t = default_table("tbl_it_dist");
    t.col_widths = vec![40.0, 100.0, 60.0, 20.0];
    let next = distribute_cols(&t, CellRange::new(0, 1, 0, 2));
    assert_eq!(next.col_widths, vec![40.0, 80.0, 80.0, 20.0]);
    assert_eq!(next.content_width(), 220.0);
}

#[test]
fn box_never_smaller_than_content() {
    let t = default_table("tbl_it_box");
    let ops: Vec<Box<dyn Fn(&Table) -> Table>> = vec![
        Box::new(|t: &Table| add_row(t, 1, 3)),
        Box::new(|t: &Table| add_column(t, 0, 2)),
        Box::new(|t: &Table| resize_col(t, 0, 900.0)),
        Box::new(|t: &Table| resize_row(t, 2, 300.0)),
        Box::new(|t: &Table| delete_row(t, 0)),
        Box::new(|t: &Table| merge_range(t, CellRange::new(0, 0, 2, 2))),
    ];
    let mut cur = t;
    for op in ops {
        cur = op(&cur);
        assert!(cur.content_width() <= cur.w);
        assert!(cur.content_height() <= cur.h);
    }
}

// ─── Styles ──────────────────────────────────────────────────────────────

#[test]
fn toggle_bold_over_mixed_range() {
    let t = default_table("tbl_it_bold");
    let t = apply_cell_style(&t, CellRange::single(0, 0), &CellStyleProp::Bold(true));
    let range = CellRange::new(0, 0, 1, 1);
    let off = any_cell_style_off(&t, range, StyleFlag::Bold);
    assert!(off);
    let t = apply_cell_style(&t, range, &StyleFlag::Bold.prop(off));
    assert!(!any_cell_style_off(&t, range, StyleFlag::Bold));
    // Style ops never change shape
    let toggled = toggle_cell_style(&t, range, StyleFlag::Bold);
    assert_eq!(toggled.grid, t.grid);
}

// ─── Clipboard ───────────────────────────────────────────────────────────

#[test]
fn copy_merged_block_pads_covered_positions() {
    let t = merge_range(&default_table("tbl_it_copy"), CellRange::new(0, 0, 1, 1));
    let t = fill(&t, &[(0, 0, "X"), (0, 2, "A"), (1, 2, "B")]);
    // 2×3 selection: the merged X plus A and B on the right
    let text = copy_range(&t, CellRange::new(0, 0, 1, 2));
    assert_eq!(text, "X\t\tA\n\t\tB");

    let pasted = paste_text(&default_table("tbl_it_copy"), 0, 0, &text);
    assert_eq!(pasted.cell_at(0, 0).unwrap().content, "X");
    assert_eq!(pasted.cell_at(0, 1).unwrap().content, "");
    assert_eq!(pasted.cell_at(1, 0).unwrap().content, "");
    assert_eq!(pasted.cell_at(1, 1).unwrap().content, "");
    assert_eq!(pasted.cell_at(0, 2).unwrap().content, "A");
    assert_eq!(pasted.cell_at(1, 2).unwrap().content, "B");
}

#[test]
fn copy_then_paste_into_same_merge_layout() {
    let t = merge_range(&default_table("tbl_it_same"), CellRange::new(0, 0, 1, 1));
    let t = fill(&t, &[(0, 0, "X"), (0, 2, "A"), (1, 2, "B"), (2, 0, "C")]);
    let range = CellRange::new(0, 0, 2, 2);
    let text = copy_range(&t, range);

    let blank = merge_range(&default_table("tbl_it_same"), CellRange::new(0, 0, 1, 1));
    let pasted = paste_text(&blank, 0, 0, &text);
    assert_eq!(copy_range(&pasted, range), text);
    assert_eq!(pasted.cell_at(2, 0).unwrap().content, "C");
}

#[test]
fn paste_over_filled_merge_layout_replaces_content() {
    let t = merge_range(&default_table("tbl_it_dirty"), CellRange::new(0, 0, 1, 1));
    let src = fill(&t, &[(0, 0, "X"), (1, 2, "B")]);
    let range = CellRange::new(0, 0, 2, 2);
    let text = copy_range(&src, range);

    let dirty = fill(
        &t,
        &[(0, 0, "old"), (0, 2, "old"), (1, 2, "old"), (2, 0, "old"), (2, 2, "old")],
    );
    let pasted = paste_text(&dirty, 0, 0, &text);
    assert_eq!(copy_range(&pasted, range), text);
    assert_eq!(pasted.cell_at(1, 1).unwrap().content, "X");
    assert_eq!(pasted.cell_at(0, 2).unwrap().content, "");
    assert_eq!(pasted.cell_at(2, 0).unwrap().content, "");
    // column 3 lies outside the copied range
    assert_eq!(pasted.cells.len(), dirty.cells.len());
}

#[test]
fn single_column_with_empty_cells_clears_target() {
    let src = fill(&default_table("tbl_it_col"), &[(0, 1, "a")]);
    let text = copy_range(&src, CellRange::new(0, 1, 2, 1));

    let dirty = fill(
        &default_table("tbl_it_col"),
        &[(0, 3, "old"), (1, 3, "old"), (2, 3, "old")],
    );
    let pasted = paste_text(&dirty, 0, 3, &text);
    let column: Vec<_> = (0..3)
        .map(|r| pasted.cell_at(r, 3).unwrap().content.clone())
        .collect();
    assert_eq!(column, ["a", "", ""]);
}

#[test]
fn lines_always_have_one_field_per_column() {
    let t = merge_range(&default_table("tbl_it_fields"), CellRange::new(0, 1, 2, 2));
    let text = copy_range(&t, t.full_range());
    for line in text.lines() {
        assert_eq!(line.split('\t').count(), 4);
    }
}
