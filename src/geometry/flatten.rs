//! Curve flattening with a bounded deviation
//!
//! Curves are subdivided with De Casteljau's construction until every
//! control point lies within the tolerance of the chord between the end
//! points. The curve stays inside the hull of its control points, so the
//! chord then deviates from the curve by at most the tolerance.

use super::path::{Path, PathSegment};
use super::polygon::{dedupe, has_area};
use crate::error::GeometryError;
use crate::types::{Transform, Vector2};

/// Subdivision stops at this depth even if the tolerance is not met
pub const MAX_SUBDIVISION_DEPTH: u32 = 16;

/// Tolerances below this are raised to it
pub const MIN_TOLERANCE: f64 = 1e-9;

/// One flattened subpath in document coordinates
///
/// A closed subpath does not repeat its first vertex; the closing edge is
/// implied by `closed`.
#[derive(Debug, Clone, PartialEq)]
pub struct Subpath {
    /// Vertices, consecutive duplicates removed
    pub points: Vec<Vector2>,
    /// Has an implicit closing edge
    pub closed: bool,
}

impl Subpath {
    /// Vertices with the first one repeated at the end when closed
    pub fn ring(&self) -> Vec<Vector2> {
        let mut points = self.points.clone();
        if self.closed {
            if let Some(first) = self.points.first() {
                points.push(*first);
            }
        }
        points
    }
}

/// Flatten `path` after mapping it through `transform`
///
/// The transform is applied to the control points first, so `tolerance`
/// is measured in document units. Subpaths with fewer than two distinct
/// points are dropped and closed subpaths that enclose no area are
/// returned open.
pub fn flatten_path(
    path: &Path,
    transform: &Transform,
    tolerance: f64,
) -> Result<Vec<Subpath>, GeometryError> {
    path.validate()?;
    if !transform.is_finite() {
        return Err(GeometryError::NonFinite("transform"));
    }
    if transform.is_degenerate() {
        return Err(GeometryError::DegenerateTransform(transform.determinant()));
    }
    let tolerance = if tolerance.is_finite() {
        tolerance.max(MIN_TOLERANCE)
    } else {
        MIN_TOLERANCE
    };

    let mut subpaths = Vec::new();
    let mut current: Vec<Vector2> = Vec::new();
    let mut start = Vector2::ZERO;

    for segment in path.transformed(transform).segments() {
        let last = current.last().copied().unwrap_or(start);
        match *segment {
            PathSegment::MoveTo(p) => {
                finish_subpath(&mut current, false, &mut subpaths);
                start = p;
                current.push(p);
            }
            PathSegment::LineTo(p) => {
                if current.is_empty() {
                    current.push(last);
                }
                current.push(p);
            }
            PathSegment::QuadTo(c, p) => {
                if current.is_empty() {
                    current.push(last);
                }
                flatten_quad(last, c, p, tolerance, &mut current);
            }
            PathSegment::CubicTo(c1, c2, p) => {
                if current.is_empty() {
                    current.push(last);
                }
                flatten_cubic(last, c1, c2, p, tolerance, &mut current);
            }
            PathSegment::Close => {
                finish_subpath(&mut current, true, &mut subpaths);
            }
        }
    }
    finish_subpath(&mut current, false, &mut subpaths);
    log::trace!("flattened path into {} subpath(s)", subpaths.len());
    Ok(subpaths)
}

fn finish_subpath(current: &mut Vec<Vector2>, closed: bool, out: &mut Vec<Subpath>) {
    let points = dedupe(current, closed);
    current.clear();
    if points.len() < 2 {
        return;
    }
    let closed = closed && has_area(&points);
    out.push(Subpath { points, closed });
}

/// Append the flattened cubic `p0..p3` to `out`, excluding `p0`
pub fn flatten_cubic(
    p0: Vector2,
    p1: Vector2,
    p2: Vector2,
    p3: Vector2,
    tolerance: f64,
    out: &mut Vec<Vector2>,
) {
    subdivide_cubic(p0, p1, p2, p3, tolerance, 0, out);
}

fn subdivide_cubic(
    p0: Vector2,
    p1: Vector2,
    p2: Vector2,
    p3: Vector2,
    tolerance: f64,
    depth: u32,
    out: &mut Vec<Vector2>,
) {
    let deviation = p1
        .distance_to_segment(&p0, &p3)
        .max(p2.distance_to_segment(&p0, &p3));
    if deviation <= tolerance || depth >= MAX_SUBDIVISION_DEPTH {
        out.push(p3);
        return;
    }
    let p01 = p0.midpoint(&p1);
    let p12 = p1.midpoint(&p2);
    let p23 = p2.midpoint(&p3);
    let p012 = p01.midpoint(&p12);
    let p123 = p12.midpoint(&p23);
    let mid = p012.midpoint(&p123);
    subdivide_cubic(p0, p01, p012, mid, tolerance, depth + 1, out);
    subdivide_cubic(mid, p123, p23, p3, tolerance, depth + 1, out);
}

/// Append the flattened quadratic `p0..p2` to `out`, excluding `p0`
pub fn flatten_quad(p0: Vector2, p1: Vector2, p2: Vector2, tolerance: f64, out: &mut Vec<Vector2>) {
    subdivide_quad(p0, p1, p2, tolerance, 0, out);
}

fn subdivide_quad(
    p0: Vector2,
    p1: Vector2,
    p2: Vector2,
    tolerance: f64,
    depth: u32,
    out: &mut Vec<Vector2>,
) {
    if p1.distance_to_segment(&p0, &p2) <= tolerance || depth >= MAX_SUBDIVISION_DEPTH {
        out.push(p2);
        return;
    }
    let p01 = p0.midpoint(&p1);
    let p12 = p1.midpoint(&p2);
    let mid = p01.midpoint(&p12);
    subdivide_quad(p0, p01, mid, tolerance, depth + 1, out);
    subdivide_quad(mid, p12, p2, tolerance, depth + 1, out);
}

/// Evaluate a cubic Bezier at `t`
pub fn cubic_point(p0: Vector2, p1: Vector2, p2: Vector2, p3: Vector2, t: f64) -> Vector2 {
    let u = 1.0 - t;
    p0 * (u * u * u) + p1 * (3.0 * u * u * t) + p2 * (3.0 * u * t * t) + p3 * (t * t * t)
}
