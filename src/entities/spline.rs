//! Spline entity (NURBS curve)

use super::{Entity, EntityCommon};
use crate::types::{BoundingBox2D, Vector2};

/// Spline flags (DXF group code 70)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SplineFlags {
    /// Is the spline closed?
    pub closed: bool,
    /// Is the spline periodic?
    pub periodic: bool,
    /// Is the spline rational?
    pub rational: bool,
    /// Is the spline planar?
    pub planar: bool,
}

/// A spline entity (NURBS curve)
#[derive(Debug, Clone, PartialEq)]
pub struct Spline {
    /// Common entity data
    pub common: EntityCommon,
    /// Degree of the spline (3 for cubic)
    pub degree: i32,
    /// Spline flags
    pub flags: SplineFlags,
    /// Knot values
    pub knots: Vec<f64>,
    /// Control points
    pub control_points: Vec<Vector2>,
}

impl Spline {
    /// Create an empty cubic spline
    pub fn new() -> Self {
        Spline {
            common: EntityCommon::new(),
            degree: 3,
            flags: SplineFlags {
                planar: true,
                ..SplineFlags::default()
            },
            knots: Vec::new(),
            control_points: Vec::new(),
        }
    }

    /// Build a cubic spline from a chain of Bezier segments
    ///
    /// `control_points` is `p0, c1, c2, p1, c1, c2, p2, ...` (3n + 1
    /// points). Every segment boundary gets a knot of multiplicity 3, which
    /// makes the NURBS curve coincide with the Bezier chain exactly.
    pub fn from_bezier_chain(control_points: Vec<Vector2>, closed: bool) -> Self {
        let segments = control_points.len().saturating_sub(1) / 3;
        let mut knots = vec![0.0; 4];
        for i in 1..segments {
            knots.extend([i as f64; 3]);
        }
        knots.extend([segments as f64; 4]);
        Spline {
            flags: SplineFlags {
                closed,
                planar: true,
                ..SplineFlags::default()
            },
            knots,
            control_points,
            ..Self::new()
        }
    }

    /// Get the number of control points
    pub fn control_point_count(&self) -> usize {
        self.control_points.len()
    }

    /// A valid NURBS needs `knots = control points + degree + 1`
    pub fn is_consistent(&self) -> bool {
        self.knots.len() == self.control_points.len() + self.degree as usize + 1
    }
}

impl Default for Spline {
    fn default() -> Self {
        Self::new()
    }
}

impl Entity for Spline {
    fn common(&self) -> &EntityCommon {
        &self.common
    }

    fn common_mut(&mut self) -> &mut EntityCommon {
        &mut self.common
    }

    fn bounding_box(&self) -> Option<BoundingBox2D> {
        // control polygon hull contains the curve
        BoundingBox2D::from_points(&self.control_points)
    }

    fn entity_type(&self) -> &'static str {
        "SPLINE"
    }
}
