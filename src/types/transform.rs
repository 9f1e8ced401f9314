//! 2D affine transforms
//!
//! A `Transform` maps logical drawing coordinates to document coordinates.
//! It is stored as a homogeneous 3x3 matrix whose last row is `[0, 0, 1]`.

use crate::types::Vector2;
use nalgebra::{Matrix3, Vector3};
use std::ops::Mul;

/// Determinants below this magnitude are treated as a collapsed transform
pub const DEGENERATE_DETERMINANT: f64 = 1e-12;

/// A 2D affine transform
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    matrix: Matrix3<f64>,
}

impl Transform {
    /// The identity transform
    pub fn identity() -> Self {
        Self {
            matrix: Matrix3::identity(),
        }
    }

    /// Build from the six affine coefficients
    ///
    /// The mapping is `x' = a*x + c*y + e`, `y' = b*x + d*y + f`, which is
    /// the column order plotting hosts usually hand over.
    pub fn from_coefficients(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self {
            matrix: Matrix3::new(a, c, e, b, d, f, 0.0, 0.0, 1.0),
        }
    }

    /// Create a translation
    pub fn translation(tx: f64, ty: f64) -> Self {
        Self::from_coefficients(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    /// Create a (possibly non-uniform) scaling about the origin
    pub fn scaling(sx: f64, sy: f64) -> Self {
        Self::from_coefficients(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    /// Create a counter-clockwise rotation about the origin
    pub fn rotation(radians: f64) -> Self {
        let (sin, cos) = radians.sin_cos();
        Self::from_coefficients(cos, sin, -sin, cos, 0.0, 0.0)
    }

    /// The six affine coefficients `(a, b, c, d, e, f)`
    pub fn coefficients(&self) -> [f64; 6] {
        let m = &self.matrix;
        [m[(0, 0)], m[(1, 0)], m[(0, 1)], m[(1, 1)], m[(0, 2)], m[(1, 2)]]
    }

    /// Compose: the result applies `self` first, then `next`
    pub fn then(&self, next: &Transform) -> Transform {
        Transform {
            matrix: next.matrix * self.matrix,
        }
    }

    /// Map a point (translation applies)
    pub fn apply(&self, point: Vector2) -> Vector2 {
        let v = self.matrix * Vector3::new(point.x, point.y, 1.0);
        Vector2::new(v.x, v.y)
    }

    /// Map a direction (translation ignored)
    pub fn apply_vector(&self, vector: Vector2) -> Vector2 {
        let v = self.matrix * Vector3::new(vector.x, vector.y, 0.0);
        Vector2::new(v.x, v.y)
    }

    /// Map a sequence of points, preserving count and order
    pub fn apply_all(&self, points: &[Vector2]) -> Vec<Vector2> {
        points.iter().map(|p| self.apply(*p)).collect()
    }

    /// Determinant of the linear part
    pub fn determinant(&self) -> f64 {
        let [a, b, c, d, _, _] = self.coefficients();
        a * d - b * c
    }

    /// True when the transform collapses the plane (zero scale)
    pub fn is_degenerate(&self) -> bool {
        let det = self.determinant();
        !det.is_finite() || det.abs() < DEGENERATE_DETERMINANT
    }

    /// True when every coefficient is finite
    pub fn is_finite(&self) -> bool {
        self.coefficients().iter().all(|c| c.is_finite())
    }

    /// Invert the transform (returns None if degenerate)
    pub fn inverse(&self) -> Option<Transform> {
        if self.is_degenerate() {
            return None;
        }
        self.matrix.try_inverse().map(|matrix| Transform { matrix })
    }

    /// Geometric mean scale factor, used to scale lengths such as dash
    /// patterns and text heights
    pub fn scale_factor(&self) -> f64 {
        self.determinant().abs().sqrt()
    }

    /// Angle of the transformed x axis, in degrees
    pub fn rotation_degrees(&self) -> f64 {
        let x_axis = self.apply_vector(Vector2::UNIT_X);
        x_axis.y.atan2(x_axis.x).to_degrees()
    }

    /// Check for the identity transform
    pub fn is_identity(&self) -> bool {
        self.matrix == Matrix3::identity()
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Mul<Vector2> for Transform {
    type Output = Vector2;

    fn mul(self, point: Vector2) -> Vector2 {
        self.apply(point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    fn assert_close(a: Vector2, b: Vector2) {
        assert!(a.approx_eq(&b, 1e-9), "{} != {}", a, b);
    }

    #[test]
    fn test_translation_and_scaling() {
        let t = Transform::scaling(2.0, 3.0).then(&Transform::translation(10.0, 20.0));
        assert_close(t.apply(Vector2::new(1.0, 1.0)), Vector2::new(12.0, 23.0));
        assert_close(t.apply_vector(Vector2::new(1.0, 1.0)), Vector2::new(2.0, 3.0));
    }

    #[test]
    fn test_rotation() {
        let t = Transform::rotation(FRAC_PI_2);
        assert_close(t.apply(Vector2::UNIT_X), Vector2::UNIT_Y);
        assert!((t.rotation_degrees() - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_coefficients_round_trip() {
        let t = Transform::from_coefficients(1.0, 2.0, 3.0, 4.0, 5.0, 6.0);
        assert_eq!(t.coefficients(), [1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_close(t.apply(Vector2::new(1.0, 1.0)), Vector2::new(9.0, 12.0));
    }

    #[test]
    fn test_inverse() {
        let t = Transform::rotation(0.3)
            .then(&Transform::scaling(2.0, 0.5))
            .then(&Transform::translation(-3.0, 7.0));
        let inv = t.inverse().unwrap();
        let p = Vector2::new(4.0, -2.0);
        assert_close(inv.apply(t.apply(p)), p);
    }

    #[test]
    fn test_degenerate() {
        let t = Transform::scaling(0.0, 1.0);
        assert!(t.is_degenerate());
        assert!(t.inverse().is_none());
        assert!(!Transform::identity().is_degenerate());
        assert!(Transform::identity().is_identity());
    }

    #[test]
    fn test_apply_all_preserves_order() {
        let t = Transform::translation(1.0, 0.0);
        let pts = vec![Vector2::new(0.0, 0.0), Vector2::new(5.0, 5.0), Vector2::new(-1.0, 2.0)];
        let out = t.apply_all(&pts);
        assert_eq!(out.len(), 3);
        assert_eq!(out[2], Vector2::new(0.0, 2.0));
    }
}
