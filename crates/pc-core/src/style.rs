//! Style ops: pure transforms that change cell appearance, never shape.
//!
//! A range addresses whole cells: every cell whose rectangle intersects the
//! range is styled, so a partially selected merge is styled as a unit.

use crate::model::{
    AlignH, AlignV, BorderSides, CellRange, CellStyle, CellStyleProp, Color, Side, StyleFlag,
    Table,
};
use crate::parser::{parse_border_shorthand, parse_css_declarations, parse_loose_number};
use serde::{Deserialize, Serialize};

// ─── Host patches ────────────────────────────────────────────────────────

/// Style patch in the host's element vocabulary (`fill`, `strokeColor`,
/// `textAlignH`, ...). Cell-style names are accepted as aliases.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CellStylePatch {
    #[serde(alias = "bg", skip_serializing_if = "Option::is_none")]
    pub fill: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_color: Option<Color>,
    #[serde(alias = "alignH", skip_serializing_if = "Option::is_none")]
    pub text_align_h: Option<AlignH>,
    #[serde(alias = "alignV", skip_serializing_if = "Option::is_none")]
    pub text_align_v: Option<AlignV>,
    #[serde(alias = "borderColor", skip_serializing_if = "Option::is_none")]
    pub stroke_color: Option<Color>,
    #[serde(alias = "borderWidth", skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub italic: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub underline: Option<bool>,
}

impl CellStylePatch {
    pub fn is_empty(&self) -> bool {
        *self == CellStylePatch::default()
    }

    /// Overlay the keys set in `other`.
    pub fn merge(&mut self, other: &CellStylePatch) {
        if other.fill.is_some() {
            self.fill = other.fill;
        }
        if other.text_color.is_some() {
            self.text_color = other.text_color;
        }
        if other.text_align_h.is_some() {
            self.text_align_h = other.text_align_h;
        }
        if other.text_align_v.is_some() {
            self.text_align_v = other.text_align_v;
        }
        if other.stroke_color.is_some() {
            self.stroke_color = other.stroke_color;
        }
        if other.stroke_width.is_some() {
            self.stroke_width = other.stroke_width;
        }
        if other.padding.is_some() {
            self.padding = other.padding;
        }
        if other.font_family.is_some() {
            self.font_family.clone_from(&other.font_family);
        }
        if other.font_size.is_some() {
            self.font_size = other.font_size;
        }
        if other.bold.is_some() {
            self.bold = other.bold;
        }
        if other.italic.is_some() {
            self.italic = other.italic;
        }
        if other.underline.is_some() {
            self.underline = other.underline;
        }
    }

    /// The patch expressed as cell-style keys.
    pub fn to_cell_style(&self) -> CellStyle {
        CellStyle {
            bg: self.fill,
            text_color: self.text_color,
            align_h: self.text_align_h,
            align_v: self.text_align_v,
            padding: self.padding,
            font_family: self.font_family.clone(),
            font_size: self.font_size,
            bold: self.bold,
            italic: self.italic,
            underline: self.underline,
            border_color: self.stroke_color,
            border_width: self.stroke_width,
            borders: None,
        }
    }

    /// Build a patch from a CSS declaration string such as
    /// `background:#9ccc65;color:#000`. Unknown properties are ignored.
    pub fn from_css(css: &str) -> Self {
        let css = css
            .trim()
            .trim_start_matches(['\'', '"'])
            .trim_end_matches(['\'', '"']);
        let mut p = CellStylePatch::default();
        let mut align_items = None;

        for (key, value) in parse_css_declarations(css) {
            let lower = value.to_ascii_lowercase();
            match key.as_str() {
                "background" | "background-color" => p.fill = Color::from_css(&value),
                "color" | "text-color" => p.text_color = Color::from_css(&value),
                "border" => {
                    let (width, color) = parse_border_shorthand(&value);
                    if let Some(w) = width {
                        p.stroke_width = Some(if w > 0.0 { w } else { 1.0 });
                    }
                    if color.is_some() {
                        p.stroke_color = color;
                    }
                }
                "border-width" => {
                    p.stroke_width = Some(
                        parse_loose_number(value.trim_end_matches("px")).unwrap_or(0.0) as f32,
                    );
                }
                "border-color" => {
                    if let Some(c) = Color::from_css(&value) {
                        p.stroke_color = Some(c);
                    }
                }
                "font-family" => p.font_family = Some(value.clone()),
                "font-size" => {
                    if let Some(n) = parse_loose_number(&value) {
                        let pt = if lower.ends_with("px") {
                            (n * 72.0 / 96.0).round()
                        } else {
                            n.round()
                        };
                        p.font_size = Some(pt as f32);
                    }
                }
                "font-weight" => match lower.as_str() {
                    "bold" | "bolder" => p.bold = Some(true),
                    "normal" | "lighter" => p.bold = Some(false),
                    w => {
                        if let Ok(n) = w.parse::<u32>() {
                            p.bold = Some(n >= 600);
                        }
                    }
                },
                "font-style" => match lower.as_str() {
                    "italic" | "oblique" => p.italic = Some(true),
                    "normal" => p.italic = Some(false),
                    _ => {}
                },
                "text-decoration" | "text-decoration-line" => {
                    if lower.contains("underline") {
                        p.underline = Some(true);
                    } else if lower == "none" {
                        p.underline = Some(false);
                    }
                }
                "text-align" => p.text_align_h = AlignH::parse(&lower),
                "justify-content" => {
                    p.text_align_v = match lower.as_str() {
                        "flex-start" | "start" => Some(AlignV::Top),
                        "center" => Some(AlignV::Middle),
                        "flex-end" | "end" => Some(AlignV::Bottom),
                        _ => p.text_align_v,
                    }
                }
                "align-items" => {
                    align_items = match lower.as_str() {
                        "flex-start" | "start" => Some(AlignH::Left),
                        "center" => Some(AlignH::Center),
                        "flex-end" | "end" => Some(AlignH::Right),
                        _ => align_items,
                    }
                }
                "padding" => {
                    p.padding = parse_loose_number(value.trim_end_matches("px")).map(|n| n as f32)
                }
                _ => log::trace!("css: ignoring `{key}`"),
            }
        }
        if p.text_align_h.is_none() {
            p.text_align_h = align_items;
        }
        p
    }
}

// ─── Range styling ───────────────────────────────────────────────────────

fn for_each_cell_in(t: &Table, range: CellRange, mut f: impl FnMut(&mut CellStyle)) -> Table {
    let mut next = t.clone();
    for cell in t.anchors_in(range) {
        f(&mut next.cells[cell.index()].styles);
    }
    next
}

/// Set one style property on every cell intersecting `range`.
///
/// Setting a border colour or width on a cell that draws no border turns
/// all four sides on so the change is visible.
pub fn apply_cell_style(t: &Table, range: CellRange, prop: &CellStyleProp) -> Table {
    let stroke = prop.is_stroke();
    log::debug!("table {}: style {prop:?}", t.id);
    for_each_cell_in(t, range, |style| {
        style.apply(prop);
        if stroke && !style.borders.is_some_and(|b| b.any()) {
            style.borders = Some(BorderSides::ALL);
        }
    })
}

/// Set (or clear, with `None`) the background of every cell in `range`.
pub fn apply_cell_bg(t: &Table, range: CellRange, color: Option<Color>) -> Table {
    apply_cell_style(t, range, &CellStyleProp::Bg(color))
}

/// Set (or clear) the text colour of every cell in `range`.
pub fn apply_text_color(t: &Table, range: CellRange, color: Option<Color>) -> Table {
    apply_cell_style(t, range, &CellStyleProp::TextColor(color))
}

/// Update alignment; `None` leaves that axis untouched.
pub fn apply_align(
    t: &Table,
    range: CellRange,
    align_h: Option<AlignH>,
    align_v: Option<AlignV>,
) -> Table {
    for_each_cell_in(t, range, |style| {
        if let Some(h) = align_h {
            style.align_h = Some(h);
        }
        if let Some(v) = align_v {
            style.align_v = Some(v);
        }
    })
}

/// True if any cell in `range` has `flag` off (or unset).
pub fn any_cell_style_off(t: &Table, range: CellRange, flag: StyleFlag) -> bool {
    t.anchors_in(range)
        .into_iter()
        .filter_map(|cell| t.cell(cell))
        .any(|cell| !flag.get(&cell.styles))
}

/// Group toggle: if any cell has `flag` off, turn it on everywhere,
/// otherwise turn it off everywhere.
pub fn toggle_cell_style(t: &Table, range: CellRange, flag: StyleFlag) -> Table {
    let on = any_cell_style_off(t, range, flag);
    apply_cell_style(t, range, &flag.prop(on))
}

/// Merge a host style patch into every cell in `range`.
pub fn apply_style_patch(t: &Table, range: CellRange, patch: &CellStylePatch) -> Table {
    if patch.is_empty() {
        return t.clone();
    }
    let style = patch.to_cell_style();
    let stroke = patch.stroke_color.is_some() || patch.stroke_width.is_some();
    for_each_cell_in(t, range, |s| {
        s.merge(&style);
        if stroke && !s.borders.is_some_and(|b| b.any()) {
            s.borders = Some(BorderSides::ALL);
        }
    })
}

// ─── Borders ─────────────────────────────────────────────────────────────

/// Border presets of the border toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BorderMode {
    None,
    All,
    Outer,
    Inner,
    Top,
    Right,
    Bottom,
    Left,
}

impl BorderMode {
    pub fn parse(s: &str) -> Option<Self> {
        Some(match s {
            "none" => Self::None,
            "all" => Self::All,
            "outer" => Self::Outer,
            "inner" => Self::Inner,
            "top" => Self::Top,
            "right" => Self::Right,
            "bottom" => Self::Bottom,
            "left" => Self::Left,
            _ => return None,
        })
    }
}

fn neighbour(r: usize, c: usize, side: Side) -> Option<(usize, usize)> {
    match side {
        Side::Top => Some((r.checked_sub(1)?, c)),
        Side::Bottom => Some((r + 1, c)),
        Side::Left => Some((r, c.checked_sub(1)?)),
        Side::Right => Some((r, c + 1)),
    }
}

/// Rewrite the borders of `range` according to `mode`.
///
/// All cells in the range are reset first. Turning on an edge shared with
/// another in-range cell also turns on that cell's opposite edge. Edges
/// inside a merged cell are ignored.
pub fn apply_borders(
    t: &Table,
    range: CellRange,
    mode: BorderMode,
    color: Color,
    width: f32,
) -> Table {
    let range = range.clamp(t.rows, t.cols);
    let mut next = t.clone();

    for cell in t.anchors_in(range) {
        let style = &mut next.cells[cell.index()].styles;
        style.border_color = Some(color);
        style.border_width = Some(width);
        style.borders = Some(BorderSides::NONE);
    }

    let mut set_edge = |r: usize, c: usize, side: Side| {
        let Some(own) = t.cell_ref_at(r, c) else {
            return;
        };
        let mirror = neighbour(r, c, side)
            .filter(|&(nr, nc)| range.contains(nr, nc))
            .and_then(|(nr, nc)| t.cell_ref_at(nr, nc));
        if mirror == Some(own) {
            return;
        }
        let style = &mut next.cells[own.index()].styles;
        style.borders.get_or_insert(BorderSides::NONE).set(side, true);
        if let Some(other) = mirror {
            let style = &mut next.cells[other.index()].styles;
            style
                .borders
                .get_or_insert(BorderSides::NONE)
                .set(side.opposite(), true);
        }
    };

    for r in range.rows() {
        for c in range.cols() {
            match mode {
                BorderMode::None => {}
                BorderMode::All => {
                    for side in [Side::Top, Side::Right, Side::Bottom, Side::Left] {
                        set_edge(r, c, side);
                    }
                }
                BorderMode::Outer => {
                    if r == range.r0 {
                        set_edge(r, c, Side::Top);
                    }
                    if r == range.r1 {
                        set_edge(r, c, Side::Bottom);
                    }
                    if c == range.c0 {
                        set_edge(r, c, Side::Left);
                    }
                    if c == range.c1 {
                        set_edge(r, c, Side::Right);
                    }
                }
                BorderMode::Inner => {
                    if r < range.r1 {
                        set_edge(r, c, Side::Bottom);
                    }
                    if c < range.c1 {
                        set_edge(r, c, Side::Right);
                    }
                }
                BorderMode::Top => set_edge(r, c, Side::Top),
                BorderMode::Right => set_edge(r, c, Side::Right),
                BorderMode::Bottom => set_edge(r, c, Side::Bottom),
                BorderMode::Left => set_edge(r, c, Side::Left),
            }
        }
    }
    log::debug!("table {}: borders {mode:?}", t.id);
    next
}

// ─── Conditional formatting ──────────────────────────────────────────────

/// Style the cell at `(r, c)` depending on whether its numeric value lies
/// between the values of the cells `min_off` and `max_off` columns away in
/// the same row (offsets clamped into the table, bounds in either order).
///
/// `ok_css` applies when inside the inclusive range, `nok_css` otherwise.
/// If any of the three cells is not numeric the table is returned unchanged.
pub fn conditional_format_by_offset(
    t: &Table,
    r: usize,
    c: usize,
    min_off: isize,
    max_off: isize,
    ok_css: &str,
    nok_css: &str,
) -> Table {
    let (r, c) = crate::geometry::anchor_of(t, r, c);
    let last = t.cols as isize - 1;
    let col_at = |off: isize| (c as isize + off).clamp(0, last) as usize;

    let value = |col: usize| {
        t.cell_at(r, col)
            .and_then(|cell| parse_loose_number(&cell.content))
    };
    let (Some(a), Some(b), Some(own)) = (value(col_at(min_off)), value(col_at(max_off)), value(c))
    else {
        log::debug!("table {}: conditional format skipped, non-numeric input", t.id);
        return t.clone();
    };

    let ok = own >= a.min(b) && own <= a.max(b);
    let patch = CellStylePatch::from_css(if ok { ok_css } else { nok_css });
    if patch.is_empty() {
        return t.clone();
    }
    apply_style_patch(t, CellRange::single(r, c), &patch)
}
