//! Drawing paths in logical coordinates

use crate::error::GeometryError;
use crate::types::{BoundingBox2D, Transform, Vector2};
use std::f64::consts::FRAC_PI_2;

/// One path segment
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathSegment {
    /// Start a new subpath
    MoveTo(Vector2),
    /// Straight segment
    LineTo(Vector2),
    /// Quadratic Bezier (control, end)
    QuadTo(Vector2, Vector2),
    /// Cubic Bezier (control 1, control 2, end)
    CubicTo(Vector2, Vector2, Vector2),
    /// Close the current subpath
    Close,
}

impl PathSegment {
    fn map(self, f: impl Fn(Vector2) -> Vector2) -> PathSegment {
        match self {
            PathSegment::MoveTo(p) => PathSegment::MoveTo(f(p)),
            PathSegment::LineTo(p) => PathSegment::LineTo(f(p)),
            PathSegment::QuadTo(c, p) => PathSegment::QuadTo(f(c), f(p)),
            PathSegment::CubicTo(c1, c2, p) => PathSegment::CubicTo(f(c1), f(c2), f(p)),
            PathSegment::Close => PathSegment::Close,
        }
    }

    fn points(&self) -> impl Iterator<Item = Vector2> {
        let pts: ([Vector2; 3], usize) = match *self {
            PathSegment::MoveTo(p) | PathSegment::LineTo(p) => ([p, p, p], 1),
            PathSegment::QuadTo(c, p) => ([c, p, p], 2),
            PathSegment::CubicTo(c1, c2, p) => ([c1, c2, p], 3),
            PathSegment::Close => ([Vector2::ZERO; 3], 0),
        };
        pts.0.into_iter().take(pts.1)
    }
}

/// A sequence of subpaths built from move/line/curve/close segments
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Path {
    segments: Vec<PathSegment>,
}

/// Cubic control-point offset for a quarter circle
const KAPPA: f64 = 0.552_284_749_830_793_4;

impl Path {
    /// Create an empty path
    pub fn new() -> Self {
        Path {
            segments: Vec::new(),
        }
    }

    /// Builder: start a subpath
    pub fn move_to(mut self, p: Vector2) -> Self {
        self.segments.push(PathSegment::MoveTo(p));
        self
    }

    /// Builder: straight segment
    pub fn line_to(mut self, p: Vector2) -> Self {
        self.segments.push(PathSegment::LineTo(p));
        self
    }

    /// Builder: quadratic Bezier
    pub fn quad_to(mut self, control: Vector2, p: Vector2) -> Self {
        self.segments.push(PathSegment::QuadTo(control, p));
        self
    }

    /// Builder: cubic Bezier
    pub fn cubic_to(mut self, c1: Vector2, c2: Vector2, p: Vector2) -> Self {
        self.segments.push(PathSegment::CubicTo(c1, c2, p));
        self
    }

    /// Builder: close the current subpath
    pub fn close(mut self) -> Self {
        self.segments.push(PathSegment::Close);
        self
    }

    /// Append a raw segment
    pub fn push(&mut self, segment: PathSegment) {
        self.segments.push(segment);
    }

    /// Append all subpaths of another path
    pub fn extend(&mut self, other: &Path) {
        self.segments.extend_from_slice(&other.segments);
    }

    /// Open or closed polyline through `points`
    pub fn polyline(points: &[Vector2], closed: bool) -> Self {
        let mut path = Path::new();
        for (i, p) in points.iter().enumerate() {
            path.push(if i == 0 {
                PathSegment::MoveTo(*p)
            } else {
                PathSegment::LineTo(*p)
            });
        }
        if closed && !points.is_empty() {
            path.push(PathSegment::Close);
        }
        path
    }

    /// Open polyline through `points`
    pub fn from_points(points: &[Vector2]) -> Self {
        Self::polyline(points, false)
    }

    /// Closed axis-aligned rectangle, counter-clockwise from `origin`
    pub fn rect(origin: Vector2, width: f64, height: f64) -> Self {
        Self::polyline(
            &[
                origin,
                origin + Vector2::new(width, 0.0),
                origin + Vector2::new(width, height),
                origin + Vector2::new(0.0, height),
            ],
            true,
        )
    }

    /// Closed circle made of four cubic arcs
    pub fn circle(center: Vector2, radius: f64) -> Self {
        let k = KAPPA * radius;
        let r = radius;
        let c = center;
        Path::new()
            .move_to(c + Vector2::new(r, 0.0))
            .cubic_to(c + Vector2::new(r, k), c + Vector2::new(k, r), c + Vector2::new(0.0, r))
            .cubic_to(c + Vector2::new(-k, r), c + Vector2::new(-r, k), c + Vector2::new(-r, 0.0))
            .cubic_to(c + Vector2::new(-r, -k), c + Vector2::new(-k, -r), c + Vector2::new(0.0, -r))
            .cubic_to(c + Vector2::new(k, -r), c + Vector2::new(r, -k), c + Vector2::new(r, 0.0))
            .close()
    }

    /// Open circular arc from `start` to `end` (radians, counter-clockwise
    /// when `end > start`), split into cubic pieces of at most 90 degrees
    pub fn arc(center: Vector2, radius: f64, start: f64, end: f64) -> Self {
        let sweep = end - start;
        let pieces = ((sweep.abs() / FRAC_PI_2).ceil() as usize).max(1);
        let step = sweep / pieces as f64;
        let k = 4.0 / 3.0 * (step / 4.0).tan();
        let at = |angle: f64| {
            let (s, c) = angle.sin_cos();
            (
                center + Vector2::new(c, s) * radius,
                Vector2::new(-s, c) * radius,
            )
        };

        let (p0, _) = at(start);
        let mut path = Path::new().move_to(p0);
        for i in 0..pieces {
            let a0 = start + step * i as f64;
            let (q0, t0) = at(a0);
            let (q1, t1) = at(a0 + step);
            path = path.cubic_to(q0 + t0 * k, q1 - t1 * k, q1);
        }
        path
    }

    /// The segments in order
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Check for an empty path
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// True when the path has quadratic or cubic segments
    pub fn has_curves(&self) -> bool {
        self.segments
            .iter()
            .any(|s| matches!(s, PathSegment::QuadTo(..) | PathSegment::CubicTo(..)))
    }

    /// Every coordinate of the path, control points included
    pub fn points(&self) -> impl Iterator<Item = Vector2> + '_ {
        self.segments.iter().flat_map(|s| s.points())
    }

    /// Bounds of the control polygon (contains the curve)
    pub fn bounds(&self) -> Option<BoundingBox2D> {
        BoundingBox2D::from_points(&self.points().collect::<Vec<_>>())
    }

    /// Map every coordinate. Affine maps keep Bezier segments exact.
    pub fn transformed(&self, transform: &Transform) -> Path {
        Path {
            segments: self
                .segments
                .iter()
                .map(|s| s.map(|p| transform.apply(p)))
                .collect(),
        }
    }

    /// Same path shifted by `offset`
    pub fn translated(&self, offset: Vector2) -> Path {
        Path {
            segments: self.segments.iter().map(|s| s.map(|p| p + offset)).collect(),
        }
    }

    /// Reject NaN/infinite coordinates and segments before any `MoveTo`
    pub fn validate(&self) -> Result<(), GeometryError> {
        if !self.points().all(|p| p.is_finite()) {
            return Err(GeometryError::NonFinite("path"));
        }
        match self.segments.first() {
            None | Some(PathSegment::MoveTo(_)) => Ok(()),
            Some(_) => Err(GeometryError::MissingMoveTo),
        }
    }

    /// Express every subpath as a chain of cubic Bezier control points
    /// (`p0, c1, c2, p1, ...`) with its closed flag. Lines become cubics
    /// with controls at thirds, quadratics are degree-elevated.
    pub fn bezier_chains(&self) -> Vec<(Vec<Vector2>, bool)> {
        let mut chains = Vec::new();
        let mut current: Vec<Vector2> = Vec::new();
        let mut start = Vector2::ZERO;

        let flush = |current: &mut Vec<Vector2>, closed: bool, chains: &mut Vec<(Vec<Vector2>, bool)>| {
            if current.len() >= 4 {
                chains.push((std::mem::take(current), closed));
            } else {
                current.clear();
            }
        };

        for segment in &self.segments {
            let last = current.last().copied().unwrap_or(start);
            match *segment {
                PathSegment::MoveTo(p) => {
                    flush(&mut current, false, &mut chains);
                    start = p;
                    current.push(p);
                }
                PathSegment::LineTo(p) => {
                    if current.is_empty() {
                        current.push(last);
                    }
                    current.extend([last.lerp(&p, 1.0 / 3.0), last.lerp(&p, 2.0 / 3.0), p]);
                }
                PathSegment::QuadTo(c, p) => {
                    if current.is_empty() {
                        current.push(last);
                    }
                    current.extend([last.lerp(&c, 2.0 / 3.0), p.lerp(&c, 2.0 / 3.0), p]);
                }
                PathSegment::CubicTo(c1, c2, p) => {
                    if current.is_empty() {
                        current.push(last);
                    }
                    current.extend([c1, c2, p]);
                }
                PathSegment::Close => {
                    if !current.is_empty() && !last.approx_eq(&start, 0.0) {
                        current.extend([last.lerp(&start, 1.0 / 3.0), last.lerp(&start, 2.0 / 3.0), start]);
                    }
                    flush(&mut current, true, &mut chains);
                }
            }
        }
        flush(&mut current, false, &mut chains);
        chains
    }
}
