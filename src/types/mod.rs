//! Core value types shared by the document model and the renderer

pub mod bounds;
pub mod color;
pub mod handle;
pub mod line_weight;
pub mod transform;
pub mod transparency;
pub mod vector;

pub use bounds::BoundingBox2D;
pub use color::{nearest_index, aci_rgb, Color};
pub use handle::Handle;
pub use line_weight::LineWeight;
pub use transform::Transform;
pub use transparency::Transparency;
pub use vector::Vector2;
