pub mod projection;
pub mod render;

pub use projection::{visible_rows, VisibleRow};
pub use render::GraphRenderer;
