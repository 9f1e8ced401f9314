//! # plotdxf
//!
//! A rendering backend that turns the drawing calls of a 2D plotting
//! library into the entities of a DXF drawing.
//!
//! A host drives a [`Renderer`] through the usual painter's-model calls:
//! save/restore scopes, transforms, clip regions, styles, paths, text and
//! images. Each call is translated into lines, lightweight polylines,
//! splines, hatches, text and raster images, appended to a [`CadDocument`]
//! in draw order. Writing the document to disk is left to a serializer.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use plotdxf::{Path, RenderConfig, Renderer, Style, Vector2};
//!
//! let mut renderer = Renderer::new(RenderConfig::default());
//! renderer.set_style(Style::default().with_line_width(0.5))?;
//! renderer.draw_path(&Path::circle(Vector2::new(50.0, 50.0), 20.0))?;
//! let output = renderer.finish()?;
//! for entity in output.document.entities() {
//!     println!("{} on {}", entity.type_name(), entity.common().layer);
//! }
//! # Ok::<(), plotdxf::RenderError>(())
//! ```
//!
//! ## Architecture
//!
//! - `geometry` - paths, flattening and clipping (pure functions)
//! - `render` - graphics state stack, style resolution, entity emission
//!   and the render session
//! - `document`, `entities`, `tables`, `types` - the produced drawing
//!
//! Recovered problems are collected as notifications; protocol violations
//! are returned as errors and end the session.

#![allow(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod document;
pub mod entities;
pub mod error;
pub mod geometry;
pub mod notification;
pub mod render;
pub mod tables;
pub mod types;

// Re-export commonly used types
pub use error::{ContractViolation, GeometryError, RenderError, Result};
pub use types::{BoundingBox2D, Color, Handle, LineWeight, Transform, Transparency, Vector2};

// Re-export entity types
pub use entities::{Entity, EntityType, Hatch, Line, LwPolyline, RasterImage, Spline, Text};

// Re-export table types
pub use tables::{Layer, LineType, Table, TableEntry};

// Re-export document
pub use document::CadDocument;
pub use notification::{Notification, NotificationCollection, NotificationType};

// Re-export the translation core
pub use geometry::{ClipRegion, ConvexClipper, Path, PathSegment, PolygonClipper};
pub use render::{
    DrawCommand, FontDescriptor, ImageData, RenderConfig, RenderOutput, Renderer, Rgba, Style,
    TextOptions,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_cad_document_creation() {
        let doc = CadDocument::new();
        assert!(doc.layers.contains("0"));
        assert!(doc.line_types.contains("Continuous"));
        assert_eq!(doc.entity_count(), 0);
    }
}
