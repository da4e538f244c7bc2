pub mod clipboard;
pub mod config;
pub mod document;
pub mod error;
pub mod geometry;
pub mod id;
pub mod model;
pub mod ops;
pub mod parser;
pub mod store;
pub mod style;

pub use clipboard::{ClipboardGrid, copy_range, copy_range_html, paste_grid, paste_text};
pub use document::{Document, DocumentData, Element, ElementKind, Frame, Page, PageData, Shape};
pub use error::{DocumentError, TableError};
pub use id::NodeId;
pub use model::*;
pub use parser::parse_clipboard;
pub use style::{BorderMode, CellStylePatch};

// Re-export petgraph types so downstream crates don't need a direct dependency
pub use petgraph::graph::NodeIndex;
