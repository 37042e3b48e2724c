//! Polygon helpers: containment, bounds, closing and simplification.

use super::bbox::BoundingBox;
use super::point::PolygonPoint;

/// Even-odd ray casting over `points`, treated as an implicitly closed ring.
///
/// Fewer than three vertices never contain anything.
pub fn point_in_polygon(px: f64, py: f64, points: &[PolygonPoint]) -> bool {
    let mut inside = false;
    let Some(mut prev) = points.last() else {
        return false;
    };

    for current in points {
        let (xi, yi) = (current.x, current.y);
        let (xj, yj) = (prev.x, prev.y);

        if (yi > py) != (yj > py) && px < (xj - xi) * (py - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        prev = current;
    }

    inside
}

/// Axis-aligned bounds of a point set.
///
/// An empty input yields a zero box at the origin.
pub fn polygon_bounds(points: &[PolygonPoint]) -> BoundingBox {
    if points.is_empty() {
        return BoundingBox::default();
    }

    let mut min_x = f64::INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut max_y = f64::NEG_INFINITY;

    for p in points {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }

    BoundingBox::new(min_x, min_y, max_x - min_x, max_y - min_y)
}

/// Returns a copy of `points` whose last vertex equals the first.
///
/// Inputs with fewer than two points, or that are already closed, are copied
/// unchanged.
pub fn close_polygon(points: &[PolygonPoint]) -> Vec<PolygonPoint> {
    let mut closed = points.to_vec();
    if let (Some(first), Some(last)) = (points.first(), points.last()) {
        if points.len() >= 2 && (first.x != last.x || first.y != last.y) {
            closed.push(PolygonPoint::new(first.x, first.y));
        }
    }
    closed
}

/// Douglas–Peucker simplification.
///
/// The interior point farthest from the chord between the endpoints splits
/// the run when its distance is strictly greater than `tolerance`; otherwise
/// the run collapses to its two endpoints. Deterministic for a given input
/// order: ties keep the earliest index.
pub fn simplify_polygon(points: &[PolygonPoint], tolerance: f64) -> Vec<PolygonPoint> {
    if points.len() <= 2 {
        return points.to_vec();
    }

    let first = points[0];
    let last = points[points.len() - 1];

    let mut max_dist = 0.0;
    let mut max_index = 0;
    for (i, p) in points.iter().enumerate().take(points.len() - 1).skip(1) {
        let dist = perpendicular_distance(p, &first, &last);
        if dist > max_dist {
            max_dist = dist;
            max_index = i;
        }
    }

    if max_dist > tolerance {
        let mut left = simplify_polygon(&points[..=max_index], tolerance);
        let right = simplify_polygon(&points[max_index..], tolerance);
        // The split vertex ends `left` and starts `right`.
        left.pop();
        left.extend(right);
        return left;
    }

    vec![first, last]
}

/// Distance from `point` to the infinite line through `start` and `end`.
///
/// Falls back to point-to-point distance when the chord has zero length.
fn perpendicular_distance(point: &PolygonPoint, start: &PolygonPoint, end: &PolygonPoint) -> f64 {
    let dx = end.x - start.x;
    let dy = end.y - start.y;

    if dx == 0.0 && dy == 0.0 {
        return point.distance_to(start);
    }

    let numerator = (dy * point.x - dx * point.y + end.x * start.y - end.y * start.x).abs();
    numerator / (dx * dx + dy * dy).sqrt()
}
