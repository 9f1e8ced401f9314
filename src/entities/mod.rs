//! CAD entity types and traits

use crate::tables::LineType;
use crate::types::{BoundingBox2D, Color, Handle, LineWeight, Transparency};

pub mod hatch;
pub mod line;
pub mod lwpolyline;
pub mod raster_image;
pub mod spline;
pub mod text;

pub use hatch::{BoundaryPath, BoundaryPathFlags, Hatch, HatchPattern, HatchPatternType};
pub use line::Line;
pub use lwpolyline::{LwPolyline, LwVertex};
pub use raster_image::{ClipBoundary, ImageDefinition, ImageDisplayFlags, RasterImage};
pub use spline::{Spline, SplineFlags};
pub use text::{Text, TextHorizontalAlignment, TextVerticalAlignment};

/// Base trait for all CAD entities
pub trait Entity {
    /// Shared attributes
    fn common(&self) -> &EntityCommon;

    /// Shared attributes, mutable
    fn common_mut(&mut self) -> &mut EntityCommon;

    /// Get the bounding box of the entity, `None` when it has no geometry
    fn bounding_box(&self) -> Option<BoundingBox2D>;

    /// Get the DXF entity type name
    fn entity_type(&self) -> &'static str;

    /// Get the entity's unique handle
    fn handle(&self) -> Handle {
        self.common().handle
    }

    /// Set the entity's handle
    fn set_handle(&mut self, handle: Handle) {
        self.common_mut().handle = handle;
    }

    /// Get the entity's layer name
    fn layer(&self) -> &str {
        &self.common().layer
    }

    /// Get the entity's color
    fn color(&self) -> Color {
        self.common().color
    }

    /// Get the entity's line type name
    fn line_type(&self) -> &str {
        &self.common().line_type
    }

    /// Get the entity's line weight
    fn line_weight(&self) -> LineWeight {
        self.common().line_weight
    }

    /// Get the entity's transparency
    fn transparency(&self) -> Transparency {
        self.common().transparency
    }
}

/// Common entity data shared by all entities
#[derive(Debug, Clone, PartialEq)]
pub struct EntityCommon {
    /// Unique handle
    pub handle: Handle,
    /// Layer name
    pub layer: String,
    /// Color
    pub color: Color,
    /// Line type name
    pub line_type: String,
    /// Line weight
    pub line_weight: LineWeight,
    /// Transparency
    pub transparency: Transparency,
    /// Visibility flag
    pub invisible: bool,
}

impl EntityCommon {
    /// Create new common entity data with defaults
    pub fn new() -> Self {
        EntityCommon {
            handle: Handle::NULL,
            layer: "0".to_string(),
            color: Color::ByLayer,
            line_type: LineType::BY_LAYER.to_string(),
            line_weight: LineWeight::ByLayer,
            transparency: Transparency::OPAQUE,
            invisible: false,
        }
    }

    /// Create with a specific layer
    pub fn with_layer(layer: impl Into<String>) -> Self {
        EntityCommon {
            layer: layer.into(),
            ..Self::new()
        }
    }
}

impl Default for EntityCommon {
    fn default() -> Self {
        Self::new()
    }
}

/// Enumeration of all entity types for type-safe storage
#[derive(Debug, Clone, PartialEq)]
pub enum EntityType {
    /// Line entity
    Line(Line),
    /// Lightweight polyline entity
    LwPolyline(LwPolyline),
    /// Spline entity
    Spline(Spline),
    /// Hatch entity
    Hatch(Hatch),
    /// Text entity
    Text(Text),
    /// RasterImage entity
    RasterImage(RasterImage),
}

impl EntityType {
    /// Get a reference to the entity trait object
    pub fn as_entity(&self) -> &dyn Entity {
        match self {
            EntityType::Line(e) => e,
            EntityType::LwPolyline(e) => e,
            EntityType::Spline(e) => e,
            EntityType::Hatch(e) => e,
            EntityType::Text(e) => e,
            EntityType::RasterImage(e) => e,
        }
    }

    /// Get a mutable reference to the entity trait object
    pub fn as_entity_mut(&mut self) -> &mut dyn Entity {
        match self {
            EntityType::Line(e) => e,
            EntityType::LwPolyline(e) => e,
            EntityType::Spline(e) => e,
            EntityType::Hatch(e) => e,
            EntityType::Text(e) => e,
            EntityType::RasterImage(e) => e,
        }
    }

    /// Shared attributes of the wrapped entity
    pub fn common(&self) -> &EntityCommon {
        self.as_entity().common()
    }

    /// DXF type name of the wrapped entity
    pub fn type_name(&self) -> &'static str {
        self.as_entity().entity_type()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Vector2;

    #[test]
    fn test_common_defaults() {
        let common = EntityCommon::with_layer("Axes");
        assert_eq!(common.layer, "Axes");
        assert_eq!(common.color, Color::ByLayer);
        assert_eq!(common.line_type, "ByLayer");
        assert!(common.handle.is_null());
    }

    #[test]
    fn test_entity_type_dispatch() {
        let line = Line::from_points(Vector2::new(0.0, 0.0), Vector2::new(1.0, 1.0));
        let mut entity = EntityType::Line(line);
        entity.as_entity_mut().set_handle(Handle::new(0x20));
        assert_eq!(entity.type_name(), "LINE");
        assert_eq!(entity.common().handle, Handle::new(0x20));
        assert_eq!(entity.as_entity().layer(), "0");
    }
}
