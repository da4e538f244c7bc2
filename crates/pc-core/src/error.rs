//! Error types.
//!
//! Table operations clamp instead of failing, so `TableError` only ever
//! describes a broken invariant. `DocumentError` covers host-side lookups
//! and snapshot (de)serialisation.

use crate::id::NodeId;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TableError {
    #[error("table has an empty dimension ({rows}x{cols})")]
    EmptyGrid { rows: usize, cols: usize },

    #[error("{axis} sizes hold {found} entries, expected {expected}")]
    TrackCount {
        axis: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("{axis} size {size} at index {index} is not positive")]
    TrackSize {
        axis: &'static str,
        index: usize,
        size: f32,
    },

    #[error("grid position ({row},{col}) references missing cell #{cell}")]
    DanglingRef { row: usize, col: usize, cell: usize },

    #[error("grid position ({row},{col}) does not match the span of cell {cell}")]
    SpanMismatch { row: usize, col: usize, cell: NodeId },

    #[error("cell {cell} is not referenced by its own anchor")]
    OrphanCell { cell: NodeId },

    #[error("box {axis} {found} is smaller than its content {content}")]
    BoxTooSmall {
        axis: &'static str,
        found: f32,
        content: f32,
    },
}

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("page not found: {0}")]
    PageNotFound(NodeId),

    #[error("element not found: {0}")]
    ElementNotFound(NodeId),

    #[error("element {0} is not a table")]
    NotATable(NodeId),

    #[error("snapshot encode failed: {0}")]
    Encode(#[from] rmp_serde::encode::Error),

    #[error("snapshot decode failed: {0}")]
    Decode(#[from] rmp_serde::decode::Error),

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Table(#[from] TableError),
}
