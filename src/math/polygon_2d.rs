use super::{Point2, Vector2, TOLERANCE};
use crate::error::{GeometryError, Result};

/// Computes the signed area of a closed polygon (shoelace formula).
///
/// Positive for counter-clockwise, negative for clockwise.
#[must_use]
pub fn signed_area_2d(points: &[Point2]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        sum += points[i].x * points[j].y - points[j].x * points[i].y;
    }
    sum * 0.5
}

/// Returns `true` when the closed polygon is wound clockwise.
#[must_use]
pub fn is_clockwise(points: &[Point2]) -> bool {
    signed_area_2d(points) < 0.0
}

/// Length of a polyline, including the closing segment when `closed`.
#[must_use]
pub fn polyline_length(points: &[Point2], closed: bool) -> f64 {
    let n = points.len();
    if n < 2 {
        return 0.0;
    }
    let open_length: f64 = points.windows(2).map(|w| (w[1] - w[0]).norm()).sum();
    if closed {
        open_length + (points[0] - points[n - 1]).norm()
    } else {
        open_length
    }
}

/// Axis-aligned bounds `(min, max)` of a point set.
#[must_use]
pub fn bounds(points: &[Point2]) -> Option<(Point2, Point2)> {
    let first = points.first()?;
    let mut min = *first;
    let mut max = *first;
    for p in &points[1..] {
        min.x = min.x.min(p.x);
        min.y = min.y.min(p.y);
        max.x = max.x.max(p.x);
        max.y = max.y.max(p.y);
    }
    Some((min, max))
}

/// Computes the normalized direction from point `a` to point `b`.
///
/// # Errors
///
/// Returns `GeometryError::ZeroVector` if the segment has zero length.
pub fn segment_direction(a: &Point2, b: &Point2) -> Result<Vector2> {
    (b - a)
        .try_normalize(TOLERANCE)
        .ok_or_else(|| GeometryError::ZeroVector.into())
}

/// Returns the left-pointing normal of a direction vector.
#[must_use]
pub fn left_normal(dir: Vector2) -> Vector2 {
    Vector2::new(-dir.y, dir.x)
}
