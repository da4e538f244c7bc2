//! Core table data model.
//!
//! A table is one positioned element on a page. Its cells live in a dense
//! arena (`cells`) and the `rows × cols` index grid (`grid`) points into it
//! by `CellRef`. A merged cell is a single arena entry referenced from every
//! grid position of its span. Public cell ids are never stored: they are
//! derived from the table id and the cell's anchor position.

use crate::config::{
    DEFAULT_CELL_PADDING, DEFAULT_COLS, DEFAULT_ROW_HEIGHT, DEFAULT_ROWS, DEFAULT_TABLE_WIDTH,
    MIN_TABLE_BOX_WIDTH,
};
use crate::id::NodeId;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use smallvec::SmallVec;
use std::ops::RangeInclusive;

// ─── Colors ──────────────────────────────────────────────────────────────

/// RGBA color. Stored as 4 × f32 [0.0, 1.0], serialized as a hex string.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

/// Helper to parse a single hex digit.
pub fn hex_val(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

impl Color {
    pub const BLACK: Color = Color::rgba(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Color = Color::rgba(1.0, 1.0, 1.0, 1.0);
    pub const TRANSPARENT: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Build from 8-bit channels.
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0)
    }

    /// Parse a hex color string: `#RGB`, `#RGBA`, `#RRGGBB`, `#RRGGBBAA`.
    /// The string may optionally start with `#`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        let bytes = hex.as_bytes();

        let short = |i: usize| hex_val(bytes[i]).map(|v| (v * 17) as f32 / 255.0);
        let long =
            |i: usize| Some((hex_val(bytes[i])? << 4 | hex_val(bytes[i + 1])?) as f32 / 255.0);

        match bytes.len() {
            3 => Some(Self::rgba(short(0)?, short(1)?, short(2)?, 1.0)),
            4 => Some(Self::rgba(short(0)?, short(1)?, short(2)?, short(3)?)),
            6 => Some(Self::rgba(long(0)?, long(2)?, long(4)?, 1.0)),
            8 => Some(Self::rgba(long(0)?, long(2)?, long(4)?, long(6)?)),
            _ => None,
        }
    }

    /// Parse any CSS color the editor accepts: hex, `rgb()`/`rgba()`,
    /// `transparent` and a handful of named colors.
    pub fn from_css(value: &str) -> Option<Self> {
        crate::parser::parse_css_color(value)
    }

    /// Emit as `#RRGGBB`, or `#RRGGBBAA` when not fully opaque.
    pub fn to_hex(&self) -> String {
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        let (r, g, b, a) = (
            channel(self.r),
            channel(self.g),
            channel(self.b),
            channel(self.a),
        );
        if a == 255 {
            format!("#{r:02X}{g:02X}{b:02X}")
        } else {
            format!("#{r:02X}{g:02X}{b:02X}{a:02X}")
        }
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Color::from_css(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid color `{s}`")))
    }
}

// ─── Cell styling ────────────────────────────────────────────────────────

/// Horizontal alignment of cell text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlignH {
    #[default]
    Left,
    Center,
    Right,
}

/// Vertical alignment of cell text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlignV {
    #[default]
    Top,
    Middle,
    Bottom,
}

impl AlignH {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "left" | "start" => Some(Self::Left),
            "center" => Some(Self::Center),
            "right" | "end" => Some(Self::Right),
            _ => None,
        }
    }
}

impl AlignV {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "top" => Some(Self::Top),
            "middle" | "center" => Some(Self::Middle),
            "bottom" => Some(Self::Bottom),
            _ => None,
        }
    }
}

/// Which of the four cell edges draw a border.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BorderSides {
    pub top: bool,
    pub right: bool,
    pub bottom: bool,
    pub left: bool,
}

impl BorderSides {
    pub const ALL: BorderSides = BorderSides {
        top: true,
        right: true,
        bottom: true,
        left: true,
    };
    pub const NONE: BorderSides = BorderSides {
        top: false,
        right: false,
        bottom: false,
        left: false,
    };

    pub fn any(&self) -> bool {
        self.top || self.right || self.bottom || self.left
    }

    pub fn set(&mut self, side: Side, on: bool) {
        match side {
            Side::Top => self.top = on,
            Side::Right => self.right = on,
            Side::Bottom => self.bottom = on,
            Side::Left => self.left = on,
        }
    }

    pub fn get(&self, side: Side) -> bool {
        match side {
            Side::Top => self.top,
            Side::Right => self.right,
            Side::Bottom => self.bottom,
            Side::Left => self.left,
        }
    }
}

/// One edge of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::Top => Side::Bottom,
            Side::Right => Side::Left,
            Side::Bottom => Side::Top,
            Side::Left => Side::Right,
        }
    }
}

/// Per-cell style overrides. Every key is optional; a missing key falls
/// back to the table defaults, then to the renderer's global defaults.
///
/// The same shape doubles as a style *patch*: merging copies only the
/// `Some` fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CellStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bg: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub align_h: Option<AlignH>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub align_v: Option<AlignV>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    /// Font size in points.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub italic: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub underline: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_width: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub borders: Option<BorderSides>,
}

impl CellStyle {
    /// Style every new cell of a freshly created table starts with.
    pub fn cell_default() -> Self {
        Self {
            align_h: Some(AlignH::Left),
            align_v: Some(AlignV::Top),
            padding: Some(DEFAULT_CELL_PADDING),
            borders: Some(BorderSides::ALL),
            ..Default::default()
        }
    }

    /// Merge `patch` into `self`, overwriting only `Some` fields.
    pub fn merge(&mut self, patch: &CellStyle) {
        if patch.bg.is_some() {
            self.bg = patch.bg;
        }
        if patch.text_color.is_some() {
            self.text_color = patch.text_color;
        }
        if patch.align_h.is_some() {
            self.align_h = patch.align_h;
        }
        if patch.align_v.is_some() {
            self.align_v = patch.align_v;
        }
        if patch.padding.is_some() {
            self.padding = patch.padding;
        }
        if patch.font_family.is_some() {
            self.font_family = patch.font_family.clone();
        }
        if patch.font_size.is_some() {
            self.font_size = patch.font_size;
        }
        if patch.bold.is_some() {
            self.bold = patch.bold;
        }
        if patch.italic.is_some() {
            self.italic = patch.italic;
        }
        if patch.underline.is_some() {
            self.underline = patch.underline;
        }
        if patch.border_color.is_some() {
            self.border_color = patch.border_color;
        }
        if patch.border_width.is_some() {
            self.border_width = patch.border_width;
        }
        if patch.borders.is_some() {
            self.borders = patch.borders;
        }
    }

    /// True when no key is set.
    pub fn is_empty(&self) -> bool {
        *self == CellStyle::default()
    }

    /// Set a single property.
    pub fn apply(&mut self, prop: &CellStyleProp) {
        match prop {
            CellStyleProp::Bg(c) => self.bg = *c,
            CellStyleProp::TextColor(c) => self.text_color = *c,
            CellStyleProp::AlignH(a) => self.align_h = Some(*a),
            CellStyleProp::AlignV(a) => self.align_v = Some(*a),
            CellStyleProp::Padding(p) => self.padding = Some(*p),
            CellStyleProp::FontFamily(f) => self.font_family = Some(f.clone()),
            CellStyleProp::FontSize(s) => self.font_size = Some(*s),
            CellStyleProp::Bold(on) => self.bold = Some(*on),
            CellStyleProp::Italic(on) => self.italic = Some(*on),
            CellStyleProp::Underline(on) => self.underline = Some(*on),
            CellStyleProp::BorderColor(c) => self.border_color = Some(*c),
            CellStyleProp::BorderWidth(w) => self.border_width = Some(*w),
            CellStyleProp::Borders(sides) => self.borders = Some(*sides),
        }
    }
}

/// A single style key with its value, as applied by the style ops.
#[derive(Debug, Clone, PartialEq)]
pub enum CellStyleProp {
    /// `None` clears the background.
    Bg(Option<Color>),
    TextColor(Option<Color>),
    AlignH(AlignH),
    AlignV(AlignV),
    Padding(f32),
    FontFamily(String),
    FontSize(f32),
    Bold(bool),
    Italic(bool),
    Underline(bool),
    BorderColor(Color),
    BorderWidth(f32),
    Borders(BorderSides),
}

impl CellStyleProp {
    /// Stroke properties switch on all four sides of a cell that has none.
    pub fn is_stroke(&self) -> bool {
        matches!(self, Self::BorderColor(_) | Self::BorderWidth(_))
    }
}

/// Boolean style keys that support group toggling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleFlag {
    Bold,
    Italic,
    Underline,
}

impl StyleFlag {
    /// Current value; a missing key reads as off.
    pub fn get(self, style: &CellStyle) -> bool {
        match self {
            StyleFlag::Bold => style.bold,
            StyleFlag::Italic => style.italic,
            StyleFlag::Underline => style.underline,
        }
        .unwrap_or(false)
    }

    pub fn prop(self, on: bool) -> CellStyleProp {
        match self {
            StyleFlag::Bold => CellStyleProp::Bold(on),
            StyleFlag::Italic => CellStyleProp::Italic(on),
            StyleFlag::Underline => CellStyleProp::Underline(on),
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "bold" => Some(Self::Bold),
            "italic" => Some(Self::Italic),
            "underline" => Some(Self::Underline),
            _ => None,
        }
    }
}

// ─── Attributes ──────────────────────────────────────────────────────────

/// Value of a pass-through attribute. `Flag(true)` renders as a bare
/// attribute, `Flag(false)` and empty text remove it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Flag(bool),
    Text(String),
}

/// A DOM-attribute-like key/value pair (`onclick`, `role`, `data-*`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attr {
    pub name: String,
    pub value: AttrValue,
}

impl Attr {
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: AttrValue::Text(value.into()),
        }
    }

    /// True for inline event triggers such as `onclick`.
    pub fn is_event_handler(&self) -> bool {
        let b = self.name.as_bytes();
        b.len() > 2 && b[..2].eq_ignore_ascii_case(b"on") && b[2].is_ascii_alphabetic()
    }

    /// Rendered attribute value, or `None` when the attribute is removed.
    pub fn rendered(&self) -> Option<&str> {
        match &self.value {
            AttrValue::Flag(true) => Some(""),
            AttrValue::Flag(false) => None,
            AttrValue::Text(s) if s.is_empty() => None,
            AttrValue::Text(s) => Some(s),
        }
    }
}

pub type Attrs = SmallVec<[Attr; 2]>;

/// Look up an attribute's text value by name.
pub fn attr_text<'a>(attrs: &'a [Attr], name: &str) -> Option<&'a str> {
    attrs
        .iter()
        .find(|a| a.name == name)
        .and_then(|a| match &a.value {
            AttrValue::Text(s) => Some(s.as_str()),
            AttrValue::Flag(true) => Some("true"),
            AttrValue::Flag(false) => None,
        })
}

// ─── Cells ───────────────────────────────────────────────────────────────

/// Index of a cell in a table's cell arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CellRef(pub u32);

impl CellRef {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A (possibly merged) cell anchored at its top-left grid position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    pub row: usize,
    pub col: usize,
    pub row_span: usize,
    pub col_span: usize,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub styles: CellStyle,
    #[serde(default, skip_serializing_if = "SmallVec::is_empty")]
    pub attrs: Attrs,
}

impl Cell {
    /// An empty 1×1 cell at `(row, col)`.
    pub fn new(row: usize, col: usize) -> Self {
        Self {
            row,
            col,
            row_span: 1,
            col_span: 1,
            content: String::new(),
            styles: CellStyle::default(),
            attrs: SmallVec::new(),
        }
    }

    /// An empty 1×1 cell at `(row, col)` carrying `template`'s styles and attrs.
    pub fn like(template: &Cell, row: usize, col: usize) -> Self {
        Self {
            styles: template.styles.clone(),
            attrs: template.attrs.clone(),
            ..Cell::new(row, col)
        }
    }

    pub fn is_merged(&self) -> bool {
        self.row_span > 1 || self.col_span > 1
    }

    /// Occupied rows, inclusive.
    pub fn rows(&self) -> RangeInclusive<usize> {
        self.row..=self.row + self.row_span - 1
    }

    /// Occupied columns, inclusive.
    pub fn cols(&self) -> RangeInclusive<usize> {
        self.col..=self.col + self.col_span - 1
    }

    pub fn covers(&self, r: usize, c: usize) -> bool {
        self.rows().contains(&r) && self.cols().contains(&c)
    }

    pub fn start(&self, axis: Axis) -> usize {
        match axis {
            Axis::Row => self.row,
            Axis::Col => self.col,
        }
    }

    pub fn span(&self, axis: Axis) -> usize {
        match axis {
            Axis::Row => self.row_span,
            Axis::Col => self.col_span,
        }
    }

    pub fn start_mut(&mut self, axis: Axis) -> &mut usize {
        match axis {
            Axis::Row => &mut self.row,
            Axis::Col => &mut self.col,
        }
    }

    pub fn span_mut(&mut self, axis: Axis) -> &mut usize {
        match axis {
            Axis::Row => &mut self.row_span,
            Axis::Col => &mut self.col_span,
        }
    }
}

/// Grid axis selector used by the structural ops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Row,
    Col,
}

impl Axis {
    pub fn name(self) -> &'static str {
        match self {
            Axis::Row => "row",
            Axis::Col => "col",
        }
    }
}

// ─── Ranges & rects ──────────────────────────────────────────────────────

/// A rectangular block of grid positions, inclusive on both ends.
/// Constructed normalized (`r0 ≤ r1`, `c0 ≤ c1`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellRange {
    pub r0: usize,
    pub c0: usize,
    pub r1: usize,
    pub c1: usize,
}

impl CellRange {
    /// Normalize two corners into a range.
    pub fn new(r0: usize, c0: usize, r1: usize, c1: usize) -> Self {
        Self {
            r0: r0.min(r1),
            c0: c0.min(c1),
            r1: r0.max(r1),
            c1: c0.max(c1),
        }
    }

    pub fn single(r: usize, c: usize) -> Self {
        Self::new(r, c, r, c)
    }

    /// Clamp both corners into a `rows × cols` grid.
    pub fn clamp(&self, rows: usize, cols: usize) -> Self {
        let max_r = rows.saturating_sub(1);
        let max_c = cols.saturating_sub(1);
        Self::new(
            self.r0.min(max_r),
            self.c0.min(max_c),
            self.r1.min(max_r),
            self.c1.min(max_c),
        )
    }

    pub fn rows(&self) -> RangeInclusive<usize> {
        self.r0..=self.r1
    }

    pub fn cols(&self) -> RangeInclusive<usize> {
        self.c0..=self.c1
    }

    pub fn row_count(&self) -> usize {
        self.r1 - self.r0 + 1
    }

    pub fn col_count(&self) -> usize {
        self.c1 - self.c0 + 1
    }

    pub fn is_single(&self) -> bool {
        self.r0 == self.r1 && self.c0 == self.c1
    }

    pub fn contains(&self, r: usize, c: usize) -> bool {
        self.rows().contains(&r) && self.cols().contains(&c)
    }

    /// True if the cell's occupied rectangle overlaps this range.
    pub fn intersects(&self, cell: &Cell) -> bool {
        cell.row <= self.r1
            && cell.row + cell.row_span > self.r0
            && cell.col <= self.c1
            && cell.col + cell.col_span > self.c0
    }

    /// Smallest range covering both.
    pub fn union(&self, other: &CellRange) -> Self {
        Self {
            r0: self.r0.min(other.r0),
            c0: self.c0.min(other.c0),
            r1: self.r1.max(other.r1),
            c1: self.c1.max(other.c1),
        }
    }

    /// Track indices along `axis`.
    pub fn span_on(&self, axis: Axis) -> RangeInclusive<usize> {
        match axis {
            Axis::Row => self.rows(),
            Axis::Col => self.cols(),
        }
    }
}

/// Rectangle in table-local pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CellRect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl CellRect {
    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px <= self.x + self.w && py >= self.y && py <= self.y + self.h
    }
}

// ─── Table ───────────────────────────────────────────────────────────────

/// Line style of table borders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BorderStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
    None,
}

impl BorderStyle {
    pub fn as_css(self) -> &'static str {
        match self {
            BorderStyle::Solid => "solid",
            BorderStyle::Dashed => "dashed",
            BorderStyle::Dotted => "dotted",
            BorderStyle::None => "none",
        }
    }
}

/// Shared border used by cells without a per-cell override.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TableBorder {
    pub inner: f32,
    pub outer: f32,
    pub color: Color,
    pub style: BorderStyle,
}

impl Default for TableBorder {
    fn default() -> Self {
        Self {
            inner: 1.0,
            outer: 1.0,
            color: Color::BLACK,
            style: BorderStyle::Solid,
        }
    }
}

/// A table element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    pub id: NodeId,
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub rows: usize,
    pub cols: usize,
    pub row_heights: Vec<f32>,
    pub col_widths: Vec<f32>,
    pub grid: Vec<Vec<CellRef>>,
    pub cells: Vec<Cell>,
    #[serde(default)]
    pub border: TableBorder,
    #[serde(default)]
    pub styles: CellStyle,
    #[serde(default, skip_serializing_if = "SmallVec::is_empty")]
    pub attrs: Attrs,
}

impl Table {
    /// Create a `rows × cols` table of empty cells with uniform track sizes.
    /// Both dimensions are clamped to at least 1.
    pub fn new(id: NodeId, rows: usize, cols: usize) -> Self {
        let rows = rows.max(1);
        let cols = cols.max(1);
        let col_widths = vec![(DEFAULT_TABLE_WIDTH / cols as f32).round(); cols];
        let row_heights = vec![DEFAULT_ROW_HEIGHT; rows];

        let mut cells = Vec::with_capacity(rows * cols);
        let mut grid = Vec::with_capacity(rows);
        for r in 0..rows {
            let mut line = Vec::with_capacity(cols);
            for c in 0..cols {
                line.push(CellRef(cells.len() as u32));
                cells.push(Cell {
                    styles: CellStyle::cell_default(),
                    ..Cell::new(r, c)
                });
            }
            grid.push(line);
        }

        let content_w: f32 = col_widths.iter().sum();
        let content_h: f32 = row_heights.iter().sum();
        Self {
            id,
            x: 100.0,
            y: 100.0,
            w: content_w.max(MIN_TABLE_BOX_WIDTH),
            h: content_h,
            rows,
            cols,
            row_heights,
            col_widths,
            grid,
            cells,
            border: TableBorder::default(),
            styles: CellStyle::default(),
            attrs: SmallVec::new(),
        }
    }

    /// The factory used when the user adds a table: a fresh id and a 3×4 grid.
    pub fn with_defaults() -> Self {
        Self::new(NodeId::with_prefix("tbl"), DEFAULT_ROWS, DEFAULT_COLS)
    }

    /// Total content width (sum of column widths).
    pub fn content_width(&self) -> f32 {
        self.col_widths.iter().sum()
    }

    /// Total content height (sum of row heights).
    pub fn content_height(&self) -> f32 {
        self.row_heights.iter().sum()
    }

    /// The range covering the whole grid.
    pub fn full_range(&self) -> CellRange {
        CellRange::new(0, 0, self.rows - 1, self.cols - 1)
    }

    /// Number of tracks along `axis`.
    pub fn count(&self, axis: Axis) -> usize {
        match axis {
            Axis::Row => self.rows,
            Axis::Col => self.cols,
        }
    }

    /// Track sizes along `axis`.
    pub fn sizes(&self, axis: Axis) -> &[f32] {
        match axis {
            Axis::Row => &self.row_heights,
            Axis::Col => &self.col_widths,
        }
    }

    pub(crate) fn sizes_mut(&mut self, axis: Axis) -> &mut Vec<f32> {
        match axis {
            Axis::Row => &mut self.row_heights,
            Axis::Col => &mut self.col_widths,
        }
    }

    pub(crate) fn count_mut(&mut self, axis: Axis) -> &mut usize {
        match axis {
            Axis::Row => &mut self.rows,
            Axis::Col => &mut self.cols,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_hex_roundtrip() {
        let c = Color::from_hex("#6C5CE7").unwrap();
        assert_eq!(c.to_hex(), "#6C5CE7");

        let c2 = Color::from_hex("#FF000080").unwrap();
        assert!((c2.a - 128.0 / 255.0).abs() < 0.01);
        assert_eq!(c2.to_hex().len(), 9);

        assert_eq!(Color::from_hex("#000").unwrap(), Color::BLACK);
        assert!(Color::from_hex("#12345").is_none());
    }

    #[test]
    fn color_serializes_as_hex() {
        let json = serde_json::to_string(&Color::WHITE).unwrap();
        assert_eq!(json, "\"#FFFFFF\"");
        let back: Color = serde_json::from_str("\"#fff\"").unwrap();
        assert_eq!(back, Color::WHITE);
    }

    #[test]
    fn factory_builds_uniform_grid() {
        let t = Table::new(NodeId::intern("tbl_factory"), 3, 4);
        assert_eq!(t.rows, 3);
        assert_eq!(t.cols, 4);
        assert_eq!(t.cells.len(), 12);
        assert_eq!(t.col_widths, vec![150.0; 4]);
        assert_eq!(t.row_heights, vec![40.0; 3]);
        assert_eq!(t.w, 600.0);
        assert_eq!(t.h, 120.0);
        assert_eq!(t.grid[2][3], CellRef(11));
    }

    #[test]
    fn factory_clamps_empty_dimensions() {
        let t = Table::new(NodeId::intern("tbl_tiny"), 0, 0);
        assert_eq!((t.rows, t.cols), (1, 1));
        // A single 600px column still keeps the 200px floor irrelevant
        assert_eq!(t.w, 600.0);
    }

    #[test]
    fn range_normalizes_and_clamps() {
        let r = CellRange::new(3, 5, 1, 2);
        assert_eq!(r, CellRange { r0: 1, c0: 2, r1: 3, c1: 5 });
        assert_eq!(r.clamp(2, 3), CellRange { r0: 1, c0: 2, r1: 1, c1: 2 });
    }

    #[test]
    fn range_intersects_merged_cell() {
        let mut cell = Cell::new(1, 1);
        cell.row_span = 2;
        cell.col_span = 2;
        assert!(CellRange::single(2, 2).intersects(&cell));
        assert!(CellRange::new(0, 0, 1, 1).intersects(&cell));
        assert!(!CellRange::new(0, 0, 0, 3).intersects(&cell));
        assert!(!CellRange::new(3, 0, 3, 3).intersects(&cell));
    }

    #[test]
    fn style_merge_overwrites_only_set_keys() {
        let mut base = CellStyle::cell_default();
        let patch = CellStyle {
            bold: Some(true),
            align_h: Some(AlignH::Right),
            ..Default::default()
        };
        base.merge(&patch);
        assert_eq!(base.bold, Some(true));
        assert_eq!(base.align_h, Some(AlignH::Right));
        assert_eq!(base.align_v, Some(AlignV::Top));
        assert_eq!(base.padding, Some(8.0));
    }

    #[test]
    fn event_handler_attrs_are_detected() {
        assert!(Attr::text("onclick", "go()").is_event_handler());
        assert!(Attr::text("onChange", "x()").is_event_handler());
        assert!(!Attr::text("one", "1").is_event_handler());
        assert!(!Attr::text("on", "1").is_event_handler());
        assert!(!Attr::text("role", "button").is_event_handler());
    }

    #[test]
    fn attr_rendering_rules() {
        let bare = Attr {
            name: "disabled".into(),
            value: AttrValue::Flag(true),
        };
        assert_eq!(bare.rendered(), Some(""));
        assert_eq!(Attr::text("title", "").rendered(), None);
        assert_eq!(Attr::text("title", "hi").rendered(), Some("hi"));
    }
}
