//! Polygon and polyline clipping against convex clip regions

use super::polygon::{
    convex_contains, convex_hull, dedupe, has_area, is_convex, ring_contains, segments_cross, signed_area,
    to_ccw, DEDUPE_EPSILON,
};
use crate::types::{BoundingBox2D, Vector2};

/// Active clip region in document coordinates
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ClipRegion {
    /// Nothing is clipped
    #[default]
    Unbounded,
    /// Polygon, counter-clockwise. It is convex unless the session's
    /// clipper accepts concave clips. Fewer than three vertices means
    /// everything is clipped away.
    Polygon(Vec<Vector2>),
}

impl ClipRegion {
    /// Rectangular region
    pub fn rect(bounds: &BoundingBox2D) -> Self {
        ClipRegion::Polygon(bounds.corners().to_vec())
    }

    /// Region from a polygon in any orientation
    pub fn polygon(vertices: &[Vector2]) -> Self {
        ClipRegion::Polygon(to_ccw(&dedupe(vertices, true)))
    }

    /// Check for the no-clip sentinel
    pub fn is_unbounded(&self) -> bool {
        matches!(self, ClipRegion::Unbounded)
    }

    /// True when nothing can be visible through this region
    pub fn is_empty(&self) -> bool {
        match self {
            ClipRegion::Unbounded => false,
            ClipRegion::Polygon(v) => !has_area(v),
        }
    }

    /// Polygon vertices, `None` when unbounded
    pub fn vertices(&self) -> Option<&[Vector2]> {
        match self {
            ClipRegion::Unbounded => None,
            ClipRegion::Polygon(v) => Some(v),
        }
    }

    /// Bounds of the region, `None` when unbounded or empty
    pub fn bounds(&self) -> Option<BoundingBox2D> {
        self.vertices().and_then(BoundingBox2D::from_points)
    }

    /// True when every point lies inside the region (boundary included)
    ///
    /// For a concave region the open polyline through `points` must not
    /// cross the region's boundary either.
    pub fn contains_all(&self, points: &[Vector2]) -> bool {
        self.contains_path(points, false)
    }

    /// True when the closed ring lies entirely inside the region
    pub fn contains_ring(&self, ring: &[Vector2]) -> bool {
        self.contains_path(ring, true)
    }

    fn contains_path(&self, points: &[Vector2], closed: bool) -> bool {
        match self {
            ClipRegion::Unbounded => true,
            ClipRegion::Polygon(v) if v.len() < 3 || is_convex(v) => {
                points.iter().all(|p| convex_contains(v, *p))
            }
            ClipRegion::Polygon(v) => {
                if !points.iter().all(|p| ring_contains(v, *p)) {
                    return false;
                }
                let n = points.len();
                let edges = if closed && n > 2 { n } else { n.saturating_sub(1) };
                (0..edges).all(|i| {
                    let (a, b) = (points[i], points[(i + 1) % n]);
                    (0..v.len()).all(|j| !segments_cross(a, b, v[j], v[(j + 1) % v.len()]))
                })
            }
        }
    }

    /// Intersect two regions. The result never grows beyond either input.
    pub fn intersect(&self, other: &ClipRegion, clipper: &dyn PolygonClipper) -> ClipRegion {
        match (self, other) {
            (ClipRegion::Unbounded, r) | (r, ClipRegion::Unbounded) => r.clone(),
            (ClipRegion::Polygon(a), ClipRegion::Polygon(b)) => {
                if a.len() < 3 || b.len() < 3 {
                    return ClipRegion::Polygon(Vec::new());
                }
                ClipRegion::Polygon(to_ccw(&clipper.intersect_regions(a, b)))
            }
        }
    }
}

/// Polygon clipping primitive
///
/// `clip` is a convex polygon unless `accepts_concave_clips` returns true.
/// Implementations may return several disjoint pieces for a single subject.
pub trait PolygonClipper: Send + Sync {
    /// Whether concave clip polygons can be handed over as they are.
    /// Otherwise they are replaced by their convex hull.
    fn accepts_concave_clips(&self) -> bool {
        false
    }

    /// Intersect a closed subject polygon with `clip`
    fn clip_polygon(&self, subject: &[Vector2], clip: &[Vector2]) -> Vec<Vec<Vector2>>;

    /// Keep the parts of an open polyline that lie inside `clip`
    fn clip_polyline(&self, subject: &[Vector2], clip: &[Vector2]) -> Vec<Vec<Vector2>>;

    /// Intersect two clip regions into one region
    fn intersect_regions(&self, a: &[Vector2], b: &[Vector2]) -> Vec<Vector2> {
        let pieces = self.clip_polygon(a, b);
        match pieces.len() {
            0 => Vec::new(),
            1 => pieces.into_iter().next().unwrap_or_default(),
            _ => convex_hull(&pieces.concat()),
        }
    }
}

/// Clipper for convex clip regions
///
/// Subjects may be concave. Each clip edge splits the subject along its
/// supporting line; crossings on the line are paired in order (even-odd),
/// so a concave subject can fall apart into several polygons.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConvexClipper;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NodeKind {
    Vertex,
    Entry,
    Exit,
}

#[derive(Debug, Clone, Copy)]
struct Node {
    point: Vector2,
    kind: NodeKind,
    partner: usize,
}

impl ConvexClipper {
    /// Create a clipper
    pub fn new() -> Self {
        ConvexClipper
    }

    /// Keep the part of `ring` left of the directed line `a -> b`
    fn split_keep_left(ring: &[Vector2], a: Vector2, b: Vector2) -> Vec<Vec<Vector2>> {
        let dir = b - a;
        let len = dir.length();
        if len == 0.0 {
            return vec![ring.to_vec()];
        }
        let dist = |p: &Vector2| {
            let d = dir.cross(&(*p - a)) / len;
            if d.abs() <= DEDUPE_EPSILON {
                0.0
            } else {
                d
            }
        };
        let distances: Vec<f64> = ring.iter().map(dist).collect();
        if distances.iter().all(|d| *d >= 0.0) {
            return vec![ring.to_vec()];
        }
        if distances.iter().all(|d| *d <= 0.0) {
            return Vec::new();
        }

        let ccw = signed_area(ring) >= 0.0;
        let (ring, distances): (Vec<Vector2>, Vec<f64>) = if ccw {
            (ring.to_vec(), distances)
        } else {
            (ring.iter().rev().copied().collect(), distances.into_iter().rev().collect())
        };

        let n = ring.len();
        let mut nodes: Vec<Node> = Vec::with_capacity(n * 2);
        for i in 0..n {
            let j = (i + 1) % n;
            nodes.push(Node {
                point: ring[i],
                kind: NodeKind::Vertex,
                partner: 0,
            });
            let (di, dj) = (distances[i], distances[j]);
            let inside_i = di >= 0.0;
            let inside_j = dj >= 0.0;
            if inside_i != inside_j {
                let t = (di / (di - dj)).clamp(0.0, 1.0);
                nodes.push(Node {
                    point: ring[i].lerp(&ring[j], t),
                    kind: if inside_i { NodeKind::Exit } else { NodeKind::Entry },
                    partner: 0,
                });
            }
        }

        let mut crossings: Vec<usize> = (0..nodes.len())
            .filter(|i| nodes[*i].kind != NodeKind::Vertex)
            .collect();
        let along = |p: Vector2| dir.dot(&(p - a));
        crossings.sort_by(|x, y| {
            let (nx, ny) = (&nodes[*x], &nodes[*y]);
            along(nx.point)
                .total_cmp(&along(ny.point))
                .then_with(|| (nx.kind == NodeKind::Entry).cmp(&(ny.kind == NodeKind::Entry)))
        });
        let well_paired = crossings.chunks(2).all(|pair| {
            pair.len() == 2
                && nodes[pair[0]].kind == NodeKind::Exit
                && nodes[pair[1]].kind == NodeKind::Entry
        });
        if !well_paired {
            log::debug!("crossings do not pair up, clipping as a single ring");
            return Self::sutherland_hodgman(&ring, &distances);
        }
        for pair in crossings.chunks(2) {
            nodes[pair[0]].partner = pair[1];
            nodes[pair[1]].partner = pair[0];
        }

        match Self::trace(&nodes) {
            Some(rings) => rings,
            None => Self::sutherland_hodgman(&ring, &distances),
        }
    }

    /// Walk inside chains, jumping from each exit to its paired entry
    fn trace(nodes: &[Node]) -> Option<Vec<Vec<Vector2>>> {
        let n = nodes.len();
        let mut visited = vec![false; n];
        let mut rings = Vec::new();
        for start in 0..n {
            if nodes[start].kind != NodeKind::Entry || visited[start] {
                continue;
            }
            let mut ring = Vec::new();
            let mut i = start;
            let mut steps = 0;
            loop {
                visited[i] = true;
                ring.push(nodes[i].point);
                if nodes[i].kind == NodeKind::Exit {
                    i = nodes[i].partner;
                    if i == start {
                        break;
                    }
                    visited[i] = true;
                    ring.push(nodes[i].point);
                }
                i = (i + 1) % n;
                if i == start {
                    break;
                }
                steps += 1;
                if steps > 2 * n {
                    return None;
                }
            }
            rings.push(ring);
        }
        Some(rings)
    }

    /// Single-ring half-plane clip, used when crossings cannot be paired
    fn sutherland_hodgman(ring: &[Vector2], distances: &[f64]) -> Vec<Vec<Vector2>> {
        let n = ring.len();
        let mut out = Vec::with_capacity(n + 2);
        for i in 0..n {
            let j = (i + 1) % n;
            let (di, dj) = (distances[i], distances[j]);
            if di >= 0.0 {
                out.push(ring[i]);
            }
            if (di >= 0.0) != (dj >= 0.0) {
                let t = (di / (di - dj)).clamp(0.0, 1.0);
                out.push(ring[i].lerp(&ring[j], t));
            }
        }
        vec![out]
    }

    fn clip_segment(p: Vector2, q: Vector2, clip: &[Vector2]) -> Option<(f64, f64)> {
        let d = q - p;
        let mut t0: f64 = 0.0;
        let mut t1: f64 = 1.0;
        let n = clip.len();
        for i in 0..n {
            let a = clip[i];
            let edge = clip[(i + 1) % n] - a;
            // inward normal of a counter-clockwise ring
            let normal = Vector2::new(-edge.y, edge.x);
            let numerator = normal.dot(&(p - a));
            let denominator = normal.dot(&d);
            if denominator.abs() <= f64::EPSILON * normal.length() * d.length().max(1.0) {
                if numerator < -DEDUPE_EPSILON * normal.length() {
                    return None;
                }
                continue;
            }
            let t = -numerator / denominator;
            if denominator > 0.0 {
                t0 = t0.max(t);
            } else {
                t1 = t1.min(t);
            }
            if t0 > t1 {
                return None;
            }
        }
        Some((t0, t1))
    }
}

impl PolygonClipper for ConvexClipper {
    fn clip_polygon(&self, subject: &[Vector2], clip: &[Vector2]) -> Vec<Vec<Vector2>> {
        let subject = dedupe(subject, true);
        if subject.len() < 3 {
            return Vec::new();
        }
        let clip = to_ccw(&dedupe(clip, true));
        if clip.len() < 3 {
            return Vec::new();
        }

        let mut pieces = vec![subject];
        for i in 0..clip.len() {
            let (a, b) = (clip[i], clip[(i + 1) % clip.len()]);
            pieces = pieces
                .iter()
                .flat_map(|piece| Self::split_keep_left(piece, a, b))
                .map(|piece| dedupe(&piece, true))
                .filter(|piece| has_area(piece))
                .collect();
            if pieces.is_empty() {
                break;
            }
        }
        pieces
    }

    fn clip_polyline(&self, subject: &[Vector2], clip: &[Vector2]) -> Vec<Vec<Vector2>> {
        let clip = to_ccw(&dedupe(clip, true));
        if clip.len() < 3 {
            return Vec::new();
        }
        let mut pieces: Vec<Vec<Vector2>> = Vec::new();
        let mut current: Vec<Vector2> = Vec::new();
        for w in subject.windows(2) {
            let (p, q) = (w[0], w[1]);
            match Self::clip_segment(p, q, &clip) {
                Some((t0, t1)) => {
                    let start = if t0 <= 0.0 { p } else { p.lerp(&q, t0) };
                    let end = if t1 >= 1.0 { q } else { p.lerp(&q, t1) };
                    let continues = current
                        .last()
                        .map_or(false, |last| last.approx_eq(&start, DEDUPE_EPSILON));
                    if !continues {
                        pieces.push(std::mem::take(&mut current));
                        current.push(start);
                    }
                    current.push(end);
                }
                None => pieces.push(std::mem::take(&mut current)),
            }
        }
        pieces.push(current);
        pieces
            .into_iter()
            .map(|piece| dedupe(&piece, false))
            .filter(|piece| piece.len() >= 2)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::polygon::area;

    fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Vec<Vector2> {
        vec![
            Vector2::new(x0, y0),
            Vector2::new(x1, y0),
            Vector2::new(x1, y1),
            Vector2::new(x0, y1),
        ]
    }

    #[test]
    fn test_inside_polygon_unchanged() {
        let subject = rect(0.2, 0.2, 0.8, 0.8);
        let out = ConvexClipper.clip_polygon(&subject, &rect(0.0, 0.0, 1.0, 1.0));
        assert_eq!(out, vec![subject]);
    }

    #[test]
    fn test_disjoint_is_empty() {
        let out = ConvexClipper.clip_polygon(&rect(2.0, 2.0, 3.0, 3.0), &rect(0.0, 0.0, 1.0, 1.0));
        assert!(out.is_empty());
    }

    #[test]
    fn test_half_square() {
        let out = ConvexClipper.clip_polygon(&rect(0.0, 0.0, 1.0, 1.0), &rect(0.0, 0.0, 0.5, 1.0));
        assert_eq!(out.len(), 1);
        assert!((area(&out[0]) - 0.5).abs() < 1e-12);
        assert!(out[0].iter().all(|p| p.x <= 0.5 + 1e-12));
    }

    #[test]
    fn test_clockwise_subject() {
        let mut subject = rect(0.0, 0.0, 1.0, 1.0);
        subject.reverse();
        let out = ConvexClipper.clip_polygon(&subject, &rect(0.5, -1.0, 2.0, 2.0));
        assert_eq!(out.len(), 1);
        assert!((area(&out[0]) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_concave_subject_splits() {
        // U shape opening upwards, clipped to a band across both arms
        let subject = vec![
            Vector2::new(0.0, 0.0),
            Vector2::new(3.0, 0.0),
            Vector2::new(3.0, 3.0),
            Vector2::new(2.0, 3.0),
            Vector2::new(2.0, 1.0),
            Vector2::new(1.0, 1.0),
            Vector2::new(1.0, 3.0),
            Vector2::new(0.0, 3.0),
        ];
        let out = ConvexClipper.clip_polygon(&subject, &rect(-1.0, 2.0, 4.0, 2.5));
        assert_eq!(out.len(), 2);
        for piece in &out {
            assert!((area(piece) - 0.5).abs() < 1e-12);
        }
    }

    #[test]
    fn test_touching_vertex_dropped() {
        let diamond = vec![
            Vector2::new(2.0, 0.0),
            Vector2::new(3.0, 1.0),
            Vector2::new(2.0, 2.0),
            Vector2::new(1.0, 1.0),
        ];
        let out = ConvexClipper.clip_polygon(&diamond, &rect(0.0, 0.0, 1.0, 2.0));
        assert!(out.is_empty());
    }

    #[test]
    fn test_polyline_split_into_pieces() {
        // zig-zag leaving and re-entering the unit square
        let line = vec![
            Vector2::new(0.5, 0.5),
            Vector2::new(1.5, 0.5),
            Vector2::new(1.5, 0.8),
            Vector2::new(0.5, 0.8),
        ];
        let out = ConvexClipper.clip_polyline(&line, &rect(0.0, 0.0, 1.0, 1.0));
        assert_eq!(out.len(), 2);
        assert_eq!(out[0], vec![Vector2::new(0.5, 0.5), Vector2::new(1.0, 0.5)]);
        assert_eq!(out[1], vec![Vector2::new(1.0, 0.8), Vector2::new(0.5, 0.8)]);
    }

    #[test]
    fn test_polyline_inside_kept_whole() {
        let line = vec![Vector2::new(0.1, 0.1), Vector2::new(0.5, 0.9), Vector2::new(0.9, 0.1)];
        let out = ConvexClipper.clip_polyline(&line, &rect(0.0, 0.0, 1.0, 1.0));
        assert_eq!(out, vec![line]);
    }

    #[test]
    fn test_region_intersection_never_widens() {
        let a = ClipRegion::rect(&BoundingBox2D::new(Vector2::ZERO, Vector2::new(2.0, 2.0)));
        let b = ClipRegion::rect(&BoundingBox2D::new(Vector2::new(1.0, 1.0), Vector2::new(3.0, 3.0)));
        let c = a.intersect(&b, &ConvexClipper);
        let bounds = c.bounds().unwrap();
        assert_eq!(bounds.min, Vector2::new(1.0, 1.0));
        assert_eq!(bounds.max, Vector2::new(2.0, 2.0));

        let far = ClipRegion::rect(&BoundingBox2D::new(Vector2::new(5.0, 5.0), Vector2::new(6.0, 6.0)));
        assert!(a.intersect(&far, &ConvexClipper).is_empty());
        assert_eq!(a.intersect(&ClipRegion::Unbounded, &ConvexClipper), a);
    }

    #[test]
    fn test_concave_region_containment() {
        // L shape: the square (1,1)-(2,2) is cut out
        let region = ClipRegion::polygon(&[
            Vector2::new(0.0, 0.0),
            Vector2::new(2.0, 0.0),
            Vector2::new(2.0, 1.0),
            Vector2::new(1.0, 1.0),
            Vector2::new(1.0, 2.0),
            Vector2::new(0.0, 2.0),
        ]);
        assert!(region.contains_all(&[Vector2::new(0.5, 1.8), Vector2::new(0.5, 0.5), Vector2::new(1.8, 0.5)]));
        // both ends inside, the segment runs through the cut-out
        assert!(!region.contains_all(&[Vector2::new(0.5, 1.8), Vector2::new(1.8, 0.5)]));
        assert!(!region.contains_all(&[Vector2::new(1.5, 1.5)]));
        let tri = [Vector2::new(0.2, 0.2), Vector2::new(0.8, 0.2), Vector2::new(0.2, 0.8)];
        assert!(region.contains_ring(&tri));
        let wide = [Vector2::new(0.5, 1.8), Vector2::new(0.5, 0.5), Vector2::new(1.8, 0.5)];
        assert!(!region.contains_ring(&wide));
    }
}
