//! Editor-wide constants for table geometry and interaction.

/// Smallest row height / column width any resize can produce, in pixels.
pub const MIN_TRACK_SIZE: f32 = 10.0;

/// Row height used when a table has no rows to average from.
pub const DEFAULT_ROW_HEIGHT: f32 = 40.0;

/// Column width used when a table has no columns to average from.
pub const DEFAULT_COL_WIDTH: f32 = 100.0;

/// Total width a freshly created table spreads over its columns.
pub const DEFAULT_TABLE_WIDTH: f32 = 600.0;

/// Minimum box width of a freshly created table.
pub const MIN_TABLE_BOX_WIDTH: f32 = 200.0;

/// Default rows × cols of the table factory.
pub const DEFAULT_ROWS: usize = 3;
pub const DEFAULT_COLS: usize = 4;

/// Default inner cell padding, in pixels.
pub const DEFAULT_CELL_PADDING: f32 = 8.0;

/// Default font size for cell text, in points.
pub const DEFAULT_FONT_SIZE: f32 = 14.0;

/// Distance from a row/column boundary (in table pixels) that still
/// counts as grabbing the resize grip.
pub const BOUNDARY_HIT_PAD: f32 = 6.0;

/// Undo depth of the editor history.
pub const HISTORY_DEPTH: usize = 200;
