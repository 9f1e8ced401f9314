//! Geometry utilities: paths, flattening, clipping
//!
//! Everything here is a pure function of its inputs.

pub mod clip;
pub mod flatten;
pub mod path;
pub mod polygon;

pub use clip::{ClipRegion, ConvexClipper, PolygonClipper};
pub use flatten::{flatten_path, Subpath};
pub use path::{Path, PathSegment};
pub use polygon::{convex_hull, is_convex, validate_points};

use crate::types::{Transform, Vector2};

/// Map points through `transform`, keeping count and order
pub fn apply_transform(points: &[Vector2], transform: &Transform) -> Vec<Vector2> {
    transform.apply_all(points)
}
