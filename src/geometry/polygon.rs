//! Polygon helpers shared by flattening, clipping and emission

use crate::error::GeometryError;
use crate::types::Vector2;

/// Points closer than this are merged
pub const DEDUPE_EPSILON: f64 = 1e-9;

/// Signed area (positive for counter-clockwise rings)
pub fn signed_area(ring: &[Vector2]) -> f64 {
    if ring.len() < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for (i, p) in ring.iter().enumerate() {
        let q = ring[(i + 1) % ring.len()];
        sum += p.cross(&q);
    }
    sum * 0.5
}

/// Absolute area
pub fn area(ring: &[Vector2]) -> f64 {
    signed_area(ring).abs()
}

/// Rings at or below this area are treated as degenerate
pub const MIN_AREA: f64 = DEDUPE_EPSILON * DEDUPE_EPSILON;

/// True when `ring` encloses more than `MIN_AREA`
pub fn has_area(ring: &[Vector2]) -> bool {
    ring.len() >= 3 && area(ring) > MIN_AREA
}

/// Return the ring in counter-clockwise order
pub fn to_ccw(ring: &[Vector2]) -> Vec<Vector2> {
    let mut out = ring.to_vec();
    if signed_area(&out) < 0.0 {
        out.reverse();
    }
    out
}

/// Check that a ring is convex. Collinear runs are allowed.
pub fn is_convex(ring: &[Vector2]) -> bool {
    let ring = dedupe(ring, true);
    let n = ring.len();
    if n < 3 {
        return false;
    }
    let mut sign = 0.0;
    for i in 0..n {
        let a = ring[i];
        let b = ring[(i + 1) % n];
        let c = ring[(i + 2) % n];
        let turn = (b - a).cross(&(c - b));
        if turn.abs() <= DEDUPE_EPSILON {
            continue;
        }
        if sign == 0.0 {
            sign = turn.signum();
        } else if turn.signum() != sign {
            return false;
        }
    }
    // a ring that winds more than once is not convex either
    let mut winding = 0.0;
    for i in 0..n {
        let a = ring[(i + n - 1) % n];
        let b = ring[i];
        let c = ring[(i + 1) % n];
        let d1 = b - a;
        let d2 = c - b;
        winding += d1.cross(&d2).atan2(d1.dot(&d2));
    }
    sign != 0.0 && winding.abs() < 2.0 * std::f64::consts::TAU - 1e-6
}

/// Convex hull in counter-clockwise order (monotone chain)
pub fn convex_hull(points: &[Vector2]) -> Vec<Vector2> {
    let mut pts: Vec<Vector2> = points.iter().copied().filter(|p| p.is_finite()).collect();
    pts.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
    pts.dedup_by(|a, b| a.approx_eq(b, DEDUPE_EPSILON));
    if pts.len() < 3 {
        return pts;
    }

    let mut lower = half_hull(pts.iter());
    let mut upper = half_hull(pts.iter().rev());
    // the last point of each chain starts the other one
    lower.pop();
    upper.pop();
    lower.extend(upper);
    lower
}

fn half_hull<'a>(points: impl Iterator<Item = &'a Vector2>) -> Vec<Vector2> {
    let mut chain: Vec<Vector2> = Vec::new();
    for p in points {
        while chain.len() >= 2 {
            let a = chain[chain.len() - 2];
            let b = chain[chain.len() - 1];
            if (b - a).cross(&(*p - b)) <= 0.0 {
                chain.pop();
            } else {
                break;
            }
        }
        chain.push(*p);
    }
    chain
}

/// Collapse consecutive duplicates. For closed rings a trailing copy of
/// the first point is removed too.
pub fn dedupe(points: &[Vector2], closed: bool) -> Vec<Vector2> {
    let mut out: Vec<Vector2> = Vec::with_capacity(points.len());
    for p in points {
        if out.last().map_or(true, |last| !last.approx_eq(p, DEDUPE_EPSILON)) {
            out.push(*p);
        }
    }
    if closed {
        while out.len() > 1 && out[0].approx_eq(&out[out.len() - 1], DEDUPE_EPSILON) {
            out.pop();
        }
    }
    out
}

/// Reject NaN and infinite coordinates
pub fn validate_points(points: &[Vector2], what: &'static str) -> Result<(), GeometryError> {
    if points.iter().all(|p| p.is_finite()) {
        Ok(())
    } else {
        Err(GeometryError::NonFinite(what))
    }
}

/// Point-in-polygon for a counter-clockwise convex ring, boundary included
pub fn convex_contains(ring: &[Vector2], point: Vector2) -> bool {
    let n = ring.len();
    if n < 3 {
        return false;
    }
    (0..n).all(|i| {
        let a = ring[i];
        let b = ring[(i + 1) % n];
        (b - a).cross(&(point - a)) >= -DEDUPE_EPSILON * (b - a).length().max(1.0)
    })
}

/// Even-odd point-in-polygon for any simple ring, boundary included
pub fn ring_contains(ring: &[Vector2], point: Vector2) -> bool {
    let n = ring.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    for i in 0..n {
        let a = ring[i];
        let b = ring[(i + 1) % n];
        if point.distance_to_segment(&a, &b) <= DEDUPE_EPSILON {
            return true;
        }
        if (a.y > point.y) != (b.y > point.y) {
            let x = a.x + (point.y - a.y) / (b.y - a.y) * (b.x - a.x);
            if point.x < x {
                inside = !inside;
            }
        }
    }
    inside
}

/// True when segments `p1-p2` and `q1-q2` cross at a point interior to both
pub fn segments_cross(p1: Vector2, p2: Vector2, q1: Vector2, q2: Vector2) -> bool {
    let d1 = (p2 - p1).cross(&(q1 - p1));
    let d2 = (p2 - p1).cross(&(q2 - p1));
    let d3 = (q2 - q1).cross(&(p1 - q1));
    let d4 = (q2 - q1).cross(&(p2 - q1));
    d1 * d2 < 0.0 && d3 * d4 < 0.0
}
