//! Hatch entity

use super::{Entity, EntityCommon};
use crate::types::{BoundingBox2D, Handle, Vector2};
use bitflags::bitflags;

/// Hatch pattern type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HatchPatternType {
    /// User-defined line pattern
    UserDefined = 0,
    /// Predefined pattern from the standard pattern file
    #[default]
    Predefined = 1,
    /// Custom pattern
    Custom = 2,
}

/// A hatch pattern, referenced by name from the standard pattern file
#[derive(Debug, Clone, PartialEq)]
pub struct HatchPattern {
    /// Pattern name
    pub name: String,
    /// Pattern angle in degrees
    pub angle: f64,
    /// Pattern scale (spacing multiplier)
    pub scale: f64,
}

impl HatchPattern {
    /// Name used for solid fills
    pub const SOLID_NAME: &'static str = "SOLID";

    /// Create a named pattern at unit scale
    pub fn new(name: impl Into<String>) -> Self {
        HatchPattern {
            name: name.into(),
            angle: 0.0,
            scale: 1.0,
        }
    }

    /// The solid fill pattern
    pub fn solid() -> Self {
        Self::new(Self::SOLID_NAME)
    }

    /// Set the angle (degrees)
    pub fn with_angle(mut self, angle: f64) -> Self {
        self.angle = angle;
        self
    }

    /// Set the scale
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }
}

bitflags! {
    /// Boundary path flags (DXF group code 92)
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct BoundaryPathFlags: u32 {
        const DEFAULT = 0;
        const EXTERNAL = 1;
        const POLYLINE = 2;
        const DERIVED = 4;
        const OUTERMOST = 16;
    }
}

/// A closed polyline boundary loop
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryPath {
    /// Boundary flags
    pub flags: BoundaryPathFlags,
    /// Loop vertices, implicitly closed
    pub vertices: Vec<Vector2>,
    /// Handles of the entities this loop was derived from
    pub boundary_handles: Vec<Handle>,
}

impl BoundaryPath {
    /// Create an external polyline loop
    pub fn polyline(vertices: Vec<Vector2>) -> Self {
        BoundaryPath {
            flags: BoundaryPathFlags::EXTERNAL | BoundaryPathFlags::POLYLINE,
            vertices,
            boundary_handles: Vec::new(),
        }
    }

    /// Builder: link the loop to the entity that outlines it
    pub fn with_boundary(mut self, boundary: Handle) -> Self {
        self.boundary_handles.push(boundary);
        self
    }
}

/// A hatch entity (filled area)
#[derive(Debug, Clone, PartialEq)]
pub struct Hatch {
    /// Common entity data
    pub common: EntityCommon,
    /// Fill pattern
    pub pattern: HatchPattern,
    /// Pattern type
    pub pattern_type: HatchPatternType,
    /// Is this a solid fill?
    pub is_solid: bool,
    /// Is the hatch associative (linked to boundary entities)?
    pub is_associative: bool,
    /// Boundary loops
    pub paths: Vec<BoundaryPath>,
}

impl Hatch {
    /// Create a solid fill
    pub fn solid() -> Self {
        Hatch {
            common: EntityCommon::new(),
            pattern: HatchPattern::solid(),
            pattern_type: HatchPatternType::Predefined,
            is_solid: true,
            is_associative: false,
            paths: Vec::new(),
        }
    }

    /// Create a predefined pattern fill
    pub fn with_pattern(pattern: HatchPattern) -> Self {
        Hatch {
            pattern,
            is_solid: false,
            ..Self::solid()
        }
    }

    /// Add a boundary loop. A linked loop makes the hatch associative.
    pub fn add_path(&mut self, path: BoundaryPath) {
        if !path.boundary_handles.is_empty() {
            self.is_associative = true;
        }
        self.paths.push(path);
    }
}

impl Entity for Hatch {
    fn common(&self) -> &EntityCommon {
        &self.common
    }

    fn common_mut(&mut self) -> &mut EntityCommon {
        &mut self.common
    }

    fn bounding_box(&self) -> Option<BoundingBox2D> {
        let points: Vec<Vector2> = self
            .paths
            .iter()
            .flat_map(|p| p.vertices.iter().copied())
            .collect();
        BoundingBox2D::from_points(&points)
    }

    fn entity_type(&self) -> &'static str {
        "HATCH"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solid_hatch() {
        let mut hatch = Hatch::solid();
        hatch.add_path(
            BoundaryPath::polyline(vec![
                Vector2::new(0.0, 0.0),
                Vector2::new(1.0, 0.0),
                Vector2::new(1.0, 1.0),
            ])
            .with_boundary(Handle::new(0x30)),
        );
        assert!(hatch.is_solid);
        assert_eq!(hatch.pattern.name, "SOLID");
        assert!(hatch.is_associative);
        assert_eq!(hatch.paths[0].boundary_handles, vec![Handle::new(0x30)]);
        assert_eq!(hatch.bounding_box().unwrap().max, Vector2::new(1.0, 1.0));
    }

    #[test]
    fn test_unlinked_loop_not_associative() {
        let mut hatch = Hatch::solid();
        hatch.add_path(BoundaryPath::polyline(vec![Vector2::ZERO, Vector2::UNIT_X, Vector2::UNIT_Y]));
        assert!(!hatch.is_associative);
        assert!(hatch.paths[0].boundary_handles.is_empty());
    }

    #[test]
    fn test_pattern_hatch() {
        let hatch = Hatch::with_pattern(HatchPattern::new("ANSI31").with_angle(90.0).with_scale(0.5));
        assert!(!hatch.is_solid);
        assert_eq!(hatch.pattern.angle, 90.0);
        assert!(hatch.bounding_box().is_none());
    }
}
