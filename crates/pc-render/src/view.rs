//! Table view projection.
//!
//! `render_table` turns a table into a flat description of the nodes the
//! host has to create: one `CellView` per anchor (never per grid position),
//! with CSS declarations, ARIA grid metadata, selection classes and, in edit
//! mode, resize handles. The projection is pure; applying it to a DOM is the
//! host's job.

use pc_core::config::{DEFAULT_CELL_PADDING, DEFAULT_FONT_SIZE};
use pc_core::geometry::{accum_sizes, cell_rect, range_rect};
use pc_core::model::{
    AlignH, AlignV, Attr, Axis, BorderSides, Cell, CellRange, CellRect, CellStyle, Side, Table,
    attr_text,
};
use serde::Serialize;

/// Per-render state that does not live in the table itself.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderContext {
    /// Edit (design) mode rather than run mode.
    pub edit_mode: bool,
    /// Active cell range of this table, if any.
    pub selection: Option<CellRange>,
    /// Anchor of the cell currently being text-edited.
    pub editing: Option<(usize, usize)>,
}

/// One rendered cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CellView {
    pub id: String,
    pub row: usize,
    pub col: usize,
    pub row_span: usize,
    pub col_span: usize,
    pub rect: CellRect,
    /// CSS `grid-area` (1-based, spans).
    pub grid_area: String,
    pub content: String,
    pub classes: Vec<&'static str>,
    pub attrs: Vec<(String, String)>,
    pub style: Vec<(&'static str, String)>,
    pub editable: bool,
}

/// A draggable row/column boundary, shown in edit mode.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResizeHandle {
    /// `"row"` or `"col"`.
    pub axis: &'static str,
    /// The track that grows or shrinks when dragged.
    pub index: usize,
    /// Boundary offset in table pixels.
    pub position: f32,
}

/// The rendered table.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableView {
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub grid_template_columns: String,
    pub grid_template_rows: String,
    pub attrs: Vec<(String, String)>,
    pub outer_border: String,
    pub cells: Vec<CellView>,
    /// Overlay around the selected range, expanded to whole merges.
    pub selection: Option<CellRect>,
    pub handles: Vec<ResizeHandle>,
}

fn px_list(sizes: &[f32]) -> String {
    sizes
        .iter()
        .map(|s| format!("{s}px"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Cell style over the table defaults.
fn resolve_style(table: &Table, cell: &Cell) -> CellStyle {
    let mut style = table.styles.clone();
    style.merge(&cell.styles);
    style
}

fn cell_css(table: &Table, style: &CellStyle) -> Vec<(&'static str, String)> {
    let h = style.align_h.unwrap_or_default();
    let v = style.align_v.unwrap_or_default();
    let mut css = vec![
        (
            "justify-content",
            match h {
                AlignH::Left => "flex-start",
                AlignH::Center => "center",
                AlignH::Right => "flex-end",
            }
            .to_string(),
        ),
        (
            "align-items",
            match v {
                AlignV::Top => "flex-start",
                AlignV::Middle => "center",
                AlignV::Bottom => "flex-end",
            }
            .to_string(),
        ),
        (
            "text-align",
            match h {
                AlignH::Left => "left",
                AlignH::Center => "center",
                AlignH::Right => "right",
            }
            .to_string(),
        ),
        (
            "padding",
            format!("{}px", style.padding.unwrap_or(DEFAULT_CELL_PADDING)),
        ),
    ];
    if let Some(bg) = style.bg {
        css.push(("background", bg.to_hex()));
    }
    if let Some(color) = style.text_color {
        css.push(("color", color.to_hex()));
    }
    if let Some(family) = &style.font_family {
        css.push(("font-family", family.clone()));
    }
    css.push((
        "font-size",
        format!("{}pt", style.font_size.unwrap_or(DEFAULT_FONT_SIZE)),
    ));
    if let Some(bold) = style.bold {
        css.push(("font-weight", if bold { "700" } else { "400" }.to_string()));
    }
    if let Some(italic) = style.italic {
        css.push((
            "font-style",
            if italic { "italic" } else { "normal" }.to_string(),
        ));
    }
    if let Some(underline) = style.underline {
        css.push((
            "text-decoration",
            if underline { "underline" } else { "none" }.to_string(),
        ));
    }

    let width = style.border_width.unwrap_or(table.border.inner);
    let color = style.border_color.unwrap_or(table.border.color);
    let sides = style.borders.unwrap_or(BorderSides::NONE);
    for (prop, side) in [
        ("border-top", Side::Top),
        ("border-right", Side::Right),
        ("border-bottom", Side::Bottom),
        ("border-left", Side::Left),
    ] {
        let value = if sides.get(side) {
            format!(
                "{width}px {} {}",
                table.border.style.as_css(),
                color.to_hex()
            )
        } else {
            "0 solid transparent".to_string()
        };
        css.push((prop, value));
    }
    css
}

/// Pass-through attributes after the edit-mode policy: in edit mode inline
/// event handlers are dropped unless the cell opts in with `role="button"`
/// or `data-run-actions-in-edit="true"`.
fn visible_attrs(attrs: &[Attr], edit_mode: bool) -> Vec<(String, String)> {
    let allow_actions = !edit_mode
        || attr_text(attrs, "role").is_some_and(|r| r.eq_ignore_ascii_case("button"))
        || attr_text(attrs, "data-run-actions-in-edit")
            .is_some_and(|v| v.eq_ignore_ascii_case("true"));
    attrs
        .iter()
        .filter(|a| allow_actions || !a.is_event_handler())
        .filter_map(|a| Some((a.name.clone(), a.rendered()?.to_string())))
        .collect()
}

fn render_cell(table: &Table, cell: &Cell, ctx: &RenderContext, active: (usize, usize)) -> CellView {
    let (r, c) = (cell.row, cell.col);
    let id = table.cell_id_of(cell).to_string();

    let mut classes = vec!["table-cell"];
    let mut selected = false;
    if let Some(sel) = ctx.selection
        && sel.intersects(cell)
    {
        selected = true;
        classes.push(if sel.is_single() { "is-selected" } else { "is-range" });
    }
    let editable = ctx.edit_mode && ctx.editing == Some((r, c));
    if editable {
        classes.push("is-editing");
    }

    let mut attrs = vec![
        ("role".to_string(), "gridcell".to_string()),
        ("aria-rowindex".to_string(), (r + 1).to_string()),
        ("aria-colindex".to_string(), (c + 1).to_string()),
        ("aria-selected".to_string(), selected.to_string()),
        (
            "tabindex".to_string(),
            if (r, c) == active { "0" } else { "-1" }.to_string(),
        ),
        ("data-table-id".to_string(), table.id.to_string()),
        ("data-r".to_string(), r.to_string()),
        ("data-c".to_string(), c.to_string()),
        ("data-id".to_string(), id.clone()),
    ];
    if cell.row_span > 1 {
        attrs.push(("aria-rowspan".to_string(), cell.row_span.to_string()));
    }
    if cell.col_span > 1 {
        attrs.push(("aria-colspan".to_string(), cell.col_span.to_string()));
    }
    attrs.extend(visible_attrs(&cell.attrs, ctx.edit_mode));

    CellView {
        id,
        row: r,
        col: c,
        row_span: cell.row_span,
        col_span: cell.col_span,
        rect: cell_rect(table, r, c),
        grid_area: format!(
            "{} / {} / span {} / span {}",
            r + 1,
            c + 1,
            cell.row_span,
            cell.col_span
        ),
        content: cell.content.clone(),
        classes,
        attrs,
        style: cell_css(table, &resolve_style(table, cell)),
        editable,
    }
}

fn handles(table: &Table) -> Vec<ResizeHandle> {
    let mut out = Vec::with_capacity(table.rows + table.cols);
    for (axis, sizes) in [(Axis::Col, &table.col_widths), (Axis::Row, &table.row_heights)] {
        for (index, position) in accum_sizes(sizes).into_iter().skip(1).enumerate() {
            out.push(ResizeHandle {
                axis: axis.name(),
                index,
                position,
            });
        }
    }
    out
}

/// Project a table into its view description.
pub fn render_table(table: &Table, ctx: &RenderContext) -> TableView {
    let selection = ctx.selection.map(|s| s.clamp(table.rows, table.cols));
    let ctx = RenderContext {
        selection,
        ..ctx.clone()
    };
    // Roving tabindex: the selection's top-left anchor, else the first cell
    let active = selection
        .map(|s| pc_core::geometry::anchor_of(table, s.r0, s.c0))
        .unwrap_or((0, 0));

    let cells: Vec<CellView> = table
        .anchors()
        .map(|cell| render_cell(table, cell, &ctx, active))
        .collect();
    log::trace!("render table {}: {} cell views", table.id, cells.len());

    let mut attrs = vec![
        ("role".to_string(), "grid".to_string()),
        ("aria-rowcount".to_string(), table.rows.to_string()),
        ("aria-colcount".to_string(), table.cols.to_string()),
        ("aria-multiselectable".to_string(), "true".to_string()),
        ("data-id".to_string(), table.id.to_string()),
    ];
    attrs.extend(visible_attrs(&table.attrs, ctx.edit_mode));

    TableView {
        id: table.id.to_string(),
        x: table.x,
        y: table.y,
        w: table.w,
        h: table.h,
        grid_template_columns: px_list(&table.col_widths),
        grid_template_rows: px_list(&table.row_heights),
        attrs,
        outer_border: format!(
            "{}px {} {}",
            table.border.outer,
            table.border.style.as_css(),
            table.border.color.to_hex()
        ),
        cells,
        selection: selection.map(|s| range_rect(table, s)),
        handles: if ctx.edit_mode {
            handles(table)
        } else {
            Vec::new()
        },
    }
}
