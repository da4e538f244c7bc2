//! Property tests: invariants that must survive any sequence of table ops.

use pc_core::id::NodeId;
use pc_core::model::*;
use pc_core::ops::*;
use pc_core::style::{any_cell_style_off, apply_cell_style};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    AddRow(usize, usize),
    AddCol(usize, usize),
    DeleteRow(usize),
    DeleteCol(usize),
    Merge(usize, usize, usize, usize),
    Unmerge(usize, usize),
    ResizeRow(usize, f32),
    ResizeCol(usize, f32),
    Distribute(usize, usize, usize, usize),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0usize..8, 1usize..3).prop_map(|(a, n)| Op::AddRow(a, n)),
        (0usize..8, 1usize..3).prop_map(|(a, n)| Op::AddCol(a, n)),
        (0usize..8).prop_map(Op::DeleteRow),
        (0usize..8).prop_map(Op::DeleteCol),
        (0usize..6, 0usize..6, 0usize..6, 0usize..6)
            .prop_map(|(a, b, c, d)| Op::Merge(a, b, c, d)),
        (0usize..6, 0usize..6).prop_map(|(r, c)| Op::Unmerge(r, c)),
        (0usize..6, -20.0f32..400.0).prop_map(|(i, s)| Op::ResizeRow(i, s)),
        (0usize..6, -20.0f32..400.0).prop_map(|(i, s)| Op::ResizeCol(i, s)),
        (0usize..6, 0usize..6, 0usize..6, 0usize..6)
            .prop_map(|(a, b, c, d)| Op::Distribute(a, b, c, d)),
    ]
}

fn apply(t: &Table, op: &Op) -> Table {
    match *op {
        Op::AddRow(at, n) => add_row(t, at, n),
        Op::AddCol(at, n) => add_column(t, at, n),
        Op::DeleteRow(i) => delete_row(t, i),
        Op::DeleteCol(i) => delete_column(t, i),
        Op::Merge(a, b, c, d) => merge_range(t, CellRange::new(a, b, c, d)),
        Op::Unmerge(r, c) => unmerge_at(t, r, c),
        Op::ResizeRow(i, s) => resize_row(t, i, s),
        Op::ResizeCol(i, s) => resize_col(t, i, s),
        Op::Distribute(a, b, c, d) => {
            let range = CellRange::new(a, b, c, d);
            distribute_cols(&distribute_rows(t, range), range)
        }
    }
}

fn build(ops: &[Op]) -> Table {
    let mut t = Table::new(NodeId::intern("tbl_prop"), 3, 4);
    for op in ops {
        t = apply(&t, op);
    }
    t
}

proptest! {
    #[test]
    fn every_op_keeps_the_table_consistent(ops in prop::collection::vec(op_strategy(), 0..24)) {
        let mut t = Table::new(NodeId::intern("tbl_prop"), 3, 4);
        for op in &ops {
            t = apply(&t, op);
            prop_assert_eq!(t.check_invariants(), Ok(()), "after {:?}", op);
            prop_assert!(t.content_width() <= t.w);
            prop_assert!(t.content_height() <= t.h);
            for line in &t.grid {
                for cell in line {
                    prop_assert!(t.cell(*cell).is_some());
                }
            }
        }
    }

    #[test]
    fn add_then_delete_row_restores_table(
        ops in prop::collection::vec(op_strategy(), 0..12),
        at in 0usize..10,
    ) {
        let t = build(&ops);
        let at = at.min(t.rows);
        let back = delete_row(&add_row(&t, at, 1), at);
        prop_assert_eq!(back.rows, t.rows);
        prop_assert_eq!(&back.row_heights, &t.row_heights);
        prop_assert_eq!(&back.grid, &t.grid);
        prop_assert_eq!(&back.cells, &t.cells);
    }

    #[test]
    fn unmerge_after_merge_leaves_unit_cells(
        ops in prop::collection::vec(op_strategy(), 0..12),
        corners in (0usize..6, 0usize..6, 0usize..6, 0usize..6),
    ) {
        let t = build(&ops);
        let (a, b, c, d) = corners;
        let range = CellRange::new(a, b, c, d).clamp(t.rows, t.cols);
        let merged = merge_range(&t, range);
        let split = unmerge_at(&merged, range.r0, range.c0);

        let unit_cells = split
            .cells
            .iter()
            .filter(|cell| !cell.is_merged() && range.contains(cell.row, cell.col))
            .count();
        prop_assert_eq!(unit_cells, range.row_count() * range.col_count());
    }

    #[test]
    fn group_toggle_turns_everything_on(
        ops in prop::collection::vec(op_strategy(), 0..12),
        corners in (0usize..6, 0usize..6, 0usize..6, 0usize..6),
        seeded in prop::collection::vec(any::<bool>(), 0..12),
    ) {
        let mut t = build(&ops);
        for (i, on) in seeded.iter().enumerate() {
            if let Some(cell) = t.cells.get_mut(i) {
                cell.styles.italic = Some(*on);
            }
        }
        let (a, b, c, d) = corners;
        let range = CellRange::new(a, b, c, d);
        let off = any_cell_style_off(&t, range, StyleFlag::Italic);
        let next = apply_cell_style(&t, range, &StyleFlag::Italic.prop(off));
        if off {
            prop_assert!(!any_cell_style_off(&next, range, StyleFlag::Italic));
        } else {
            prop_assert!(next.anchors_in(range).iter().all(|c| next.cell(*c).is_some_and(|c| c.styles.italic == Some(false))));
        }
        prop_assert_eq!(&next.grid, &t.grid);
    }
}
