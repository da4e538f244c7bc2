pub mod hit;
pub mod view;

pub use hit::{BoundaryHit, hit_boundary, hit_cell, hit_test};
pub use view::{CellView, RenderContext, ResizeHandle, TableView, render_table};
