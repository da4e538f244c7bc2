//! Spreadsheet-compatible clipboard codec for table ranges.
//!
//! Copy produces tab-separated text (and an HTML flavour), paste accepts
//! anything [`parse_clipboard`] understands. Merged cells contribute their
//! content once, at the anchor; every other position they cover is an empty
//! field, so each copied line has exactly one field per column in range.

use crate::geometry::anchor_of;
use crate::model::{CellRange, Table};
use crate::ops::normalize_newlines;
use crate::parser::parse_clipboard;
use std::borrow::Cow;
use std::fmt::Write;

/// Rows of cell texts, as produced by [`parse_clipboard`].
pub type ClipboardGrid = Vec<Vec<String>>;

/// Quote a field if reading it back would split it. In a single column an
/// empty field is quoted too, so trailing empty rows survive the paste.
fn quote_field(text: &str, single_column: bool) -> Cow<'_, str> {
    let special = |c: char| {
        matches!(c, '\t' | '\n' | '"') || (single_column && matches!(c, ',' | ';'))
    };
    if text.contains(special) || (single_column && text.is_empty()) {
        Cow::Owned(format!("\"{}\"", text.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(text)
    }
}

/// Texts of `range`, one entry per position; covered merge positions are empty.
fn range_texts(t: &Table, range: CellRange) -> Vec<Vec<String>> {
    range
        .rows()
        .map(|r| {
            range
                .cols()
                .map(|c| {
                    if t.is_anchor(r, c) {
                        t.cell_at(r, c)
                            .map(|cell| normalize_newlines(&cell.content))
                            .unwrap_or_default()
                    } else {
                        String::new()
                    }
                })
                .collect()
        })
        .collect()
}

/// Serialize `range` as tab-separated text (`\t` between fields, `\n`
/// between rows, no trailing newline).
pub fn copy_range(t: &Table, range: CellRange) -> String {
    let range = range.clamp(t.rows, t.cols);
    let single_column = range.col_count() == 1;
    range_texts(t, range)
        .iter()
        .map(|line| {
            line.iter()
                .map(|text| quote_field(text, single_column))
                .collect::<Vec<_>>()
                .join("\t")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\n' => out.push_str("<br>"),
            c => out.push(c),
        }
    }
    out
}

/// Serialize `range` as an HTML `<table>` with `rowspan`/`colspan`.
///
/// Merges are clipped to the range. Positions covered by a merge anchored
/// outside the range become empty cells.
pub fn copy_range_html(t: &Table, range: CellRange) -> String {
    let range = range.clamp(t.rows, t.cols);
    let mut html = String::from("<table>");
    for r in range.rows() {
        html.push_str("<tr>");
        for c in range.cols() {
            let Some(cell) = t.cell_at(r, c) else {
                continue;
            };
            let anchored_here = cell.row == r && cell.col == c;
            let anchored_outside = !range.contains(cell.row, cell.col);
            if anchored_here {
                let row_span = (cell.row + cell.row_span).min(range.r1 + 1) - r;
                let col_span = (cell.col + cell.col_span).min(range.c1 + 1) - c;
                html.push_str("<td");
                if row_span > 1 {
                    let _ = write!(html, " rowspan=\"{row_span}\"");
                }
                if col_span > 1 {
                    let _ = write!(html, " colspan=\"{col_span}\"");
                }
                html.push('>');
                html.push_str(&escape_html(&normalize_newlines(&cell.content)));
                html.push_str("</td>");
            } else if anchored_outside {
                html.push_str("<td></td>");
            }
        }
        html.push_str("</tr>");
    }
    html.push_str("</table>");
    html
}

/// Write `grid` into the table starting at the anchor of `(r, c)`.
///
/// Rows and columns running past the table are dropped, positions covered
/// by a merge (other than its anchor) are skipped. Only content changes.
pub fn paste_grid(t: &Table, r: usize, c: usize, grid: &[Vec<String>]) -> Table {
    let (r, c) = anchor_of(t, r, c);
    let mut next = t.clone();
    let mut dropped = 0usize;
    for (i, line) in grid.iter().enumerate() {
        for (j, text) in line.iter().enumerate() {
            let (rr, cc) = (r + i, c + j);
            if rr >= t.rows || cc >= t.cols {
                dropped += 1;
                continue;
            }
            if !t.is_anchor(rr, cc) {
                continue;
            }
            if let Some(cell) = next.cell_at_mut(rr, cc) {
                cell.content = normalize_newlines(text);
            }
        }
    }
    if dropped > 0 {
        log::warn!("table {}: paste dropped {dropped} out-of-range fields", t.id);
    }
    log::debug!("table {}: pasted {} row(s) at ({r},{c})", t.id, grid.len());
    next
}

/// Parse clipboard text and paste it at `(r, c)`.
pub fn paste_text(t: &Table, r: usize, c: usize, text: &str) -> Table {
    paste_grid(t, r, c, &parse_clipboard(text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::NodeId;
    use crate::ops::{merge_range, set_cell_content};
    use pretty_assertions::assert_eq;

    fn table() -> Table {
        Table::new(NodeId::intern("tbl_clip"), 3, 3)
    }

    #[test]
    fn copy_plain_range() {
        let mut t = table();
        t = set_cell_content(&t, 0, 0, "a");
        t = set_cell_content(&t, 0, 1, "b");
        t = set_cell_content(&t, 1, 1, "d");
        assert_eq!(copy_range(&t, CellRange::new(0, 0, 1, 1)), "a\tb\n\td");
    }

    #[test]
    fn copy_quotes_special_fields() {
        let t = set_cell_content(&table(), 0, 0, "two\nlines");
        let t = set_cell_content(&t, 1, 0, "1,5");
        assert_eq!(copy_range(&t, CellRange::new(0, 0, 0, 1)), "\"two\nlines\"\t");
        assert_eq!(copy_range(&t, CellRange::new(0, 0, 1, 0)), "\"two\nlines\"\n\"1,5\"");
    }

    #[test]
    fn copy_then_paste_restores_content() {
        let mut t = table();
        t = set_cell_content(&t, 0, 0, "say \"hi\"");
        t = set_cell_content(&t, 0, 1, "x\ty");
        t = set_cell_content(&t, 1, 0, "1,5");
        let text = copy_range(&t, t.full_range());
        let pasted = paste_text(&table(), 0, 0, &text);
        assert_eq!(pasted, t);
    }

    #[test]
    fn single_column_quotes_empty_fields() {
        let t = set_cell_content(&table(), 0, 0, "a");
        assert_eq!(copy_range(&t, CellRange::new(0, 0, 2, 0)), "a\n\"\"\n\"\"");
        assert_eq!(copy_range(&t, CellRange::new(0, 0, 0, 1)), "a\t");
    }

    #[test]
    fn single_column_paste_clears_empty_rows() {
        let t = set_cell_content(&table(), 0, 0, "a");
        let text = copy_range(&t, CellRange::new(0, 0, 2, 0));
        let mut dirty = table();
        for r in 0..3 {
            dirty = set_cell_content(&dirty, r, 0, "old");
        }
        let pasted = paste_text(&dirty, 0, 0, &text);
        let column: Vec<_> = (0..3)
            .map(|r| pasted.cell_at(r, 0).unwrap().content.as_str())
            .collect();
        assert_eq!(column, ["a", "", ""]);
    }

    #[test]
    fn paste_overwrites_filled_cells() {
        let mut src = table();
        src = set_cell_content(&src, 0, 0, "x");
        src = set_cell_content(&src, 1, 1, "y");
        let text = copy_range(&src, CellRange::new(0, 0, 1, 1));

        let mut dirty = table();
        for r in 0..3 {
            for c in 0..3 {
                dirty = set_cell_content(&dirty, r, c, "old");
            }
        }
        let pasted = paste_text(&dirty, 1, 1, &text);
        let content = |r, c| pasted.cell_at(r, c).unwrap().content.clone();
        assert_eq!(content(1, 1), "x");
        assert_eq!(content(1, 2), "");
        assert_eq!(content(2, 1), "");
        assert_eq!(content(2, 2), "y");
        // outside the pasted block
        assert_eq!(content(0, 0), "old");
        assert_eq!(content(0, 2), "old");
    }

    #[test]
    fn paste_onto_filled_merge_keeps_coverage() {
        let mut t = set_cell_content(&table(), 0, 2, "old");
        t = set_cell_content(&t, 0, 0, "old");
        t = merge_range(&t, CellRange::new(0, 0, 1, 1));
        t = set_cell_content(&t, 2, 0, "old");
        let cells = t.cells.len();

        let pasted = paste_text(&t, 0, 0, "a\tb\tc\nd\te\tf\ng\th\ti");
        let content = |r, c| pasted.cell_at(r, c).unwrap().content.clone();
        assert_eq!(content(0, 0), "a");
        // covered positions resolve to the anchor, which keeps the first write
        assert_eq!(content(1, 1), "a");
        assert_eq!(content(0, 2), "c");
        assert_eq!(content(1, 2), "f");
        assert_eq!(content(2, 0), "g");
        assert_eq!(pasted.cells.len(), cells);
        assert_eq!(pasted.cell_at(0, 0).unwrap().row_span, 2);
    }

    #[test]
    fn html_flavour_spans_and_escapes() {
        let t = merge_range(&table(), CellRange::new(0, 0, 1, 1));
        let t = set_cell_content(&t, 0, 0, "a<b & c");
        let html = copy_range_html(&t, CellRange::new(0, 0, 1, 2));
        assert_eq!(
            html,
            "<table><tr><td rowspan=\"2\" colspan=\"2\">a&lt;b &amp; c</td><td></td></tr>\
             <tr><td></td></tr></table>"
        );
    }

    #[test]
    fn html_clips_merges_to_range() {
        let t = merge_range(&table(), CellRange::new(0, 0, 2, 0));
        let html = copy_range_html(&t, CellRange::new(1, 0, 1, 1));
        assert_eq!(html, "<table><tr><td></td><td></td></tr></table>");
        let html = copy_range_html(&t, CellRange::new(0, 0, 1, 0));
        assert_eq!(html, "<table><tr><td rowspan=\"2\"></td></tr><tr></tr></table>");
    }

    #[test]
    fn paste_drops_overflow() {
        let t = paste_text(&table(), 2, 2, "a\tb\nc\td");
        assert_eq!(t.cell_at(2, 2).unwrap().content, "a");
        assert_eq!(
            t.cells.iter().filter(|c| !c.content.is_empty()).count(),
            1
        );
    }

    #[test]
    fn paste_skips_covered_positions() {
        let t = merge_range(&table(), CellRange::new(0, 1, 0, 2));
        let t = paste_text(&t, 0, 0, "a\tb\tc");
        assert_eq!(t.cell_at(0, 0).unwrap().content, "a");
        assert_eq!(t.cell_at(0, 1).unwrap().content, "b");
        assert_eq!(t.cells.len(), 8);
    }

    #[test]
    fn paste_starts_at_anchor() {
        let t = merge_range(&table(), CellRange::new(0, 0, 1, 1));
        let t = paste_text(&t, 1, 1, "x");
        assert_eq!(t.cell_at(0, 0).unwrap().content, "x");
    }
}
