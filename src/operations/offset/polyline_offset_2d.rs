use crate::error::{OperationError, Result};
use crate::math::intersect_2d::{line_line_intersect_2d, point_at, segment_segment_intersect_2d};
use crate::math::polygon_2d::{left_normal, segment_direction, signed_area_2d};
use crate::math::{Point2, Vector2, TOLERANCE};

/// When `cos(angle between consecutive segments) < this`, use a flat cap
/// instead of a miter join. Only for near-180° reversals (> ~169°).
const FLAT_CAP_COS: f64 = -0.98;

/// Default maximum miter distance as a multiple of `|distance|`.
pub const DEFAULT_MITER_LIMIT: f64 = 4.0;

/// Offsets a 2D polyline by a signed distance.
///
/// # Algorithm
///
/// 1. **Phase A**: Offset each segment perpendicular to its direction
/// 2. **Phase B**: Build the raw offset polyline by intersecting consecutive
///    offset lines. Near-antiparallel segments get a flat cap instead of a
///    divergent miter.
/// 3. **Phase C** (closed only): cut the raw ring at crossing edges and
///    keep the piece wound like the input
///
/// # Sign Convention
///
/// - Positive distance: left offset (relative to walking direction)
/// - Negative distance: right offset
#[derive(Debug)]
pub struct PolylineOffset2D {
    points: Vec<Point2>,
    distance: f64,
    closed: bool,
    miter_limit: f64,
}

impl PolylineOffset2D {
    /// Creates a new polyline offset operation.
    #[must_use]
    pub fn new(points: Vec<Point2>, distance: f64, closed: bool) -> Self {
        Self {
            points,
            distance,
            closed,
            miter_limit: DEFAULT_MITER_LIMIT,
        }
    }

    /// Sets the miter limit (multiple of `|distance|`) above which corners
    /// are cut with two points instead of a single miter point.
    #[must_use]
    pub fn with_miter_limit(mut self, miter_limit: f64) -> Self {
        self.miter_limit = miter_limit;
        self
    }

    /// Executes the offset operation.
    ///
    /// For **closed** polylines, produces an inset/outset ring with the same
    /// winding and vertex order as the input. For **open** polylines,
    /// produces the one-sided parallel line, running in the input direction.
    ///
    /// # Errors
    ///
    /// - `OperationError::InvalidInput` if fewer than 2 points are provided
    /// - `OperationError::Failed` if the offset collapses
    pub fn execute(&self) -> Result<Vec<Point2>> {
        let n = self.points.len();
        if n < 2 {
            return Err(OperationError::InvalidInput(
                "at least 2 points are required for polyline offset".to_owned(),
            )
            .into());
        }

        if self.distance.abs() < TOLERANCE {
            return Ok(self.points.clone());
        }

        if self.closed {
            self.execute_closed()
        } else {
            build_one_side_offset(&self.points, self.distance, self.miter_limit)
        }
    }

    fn execute_closed(&self) -> Result<Vec<Point2>> {
        if self.points.len() < 3 {
            return Err(OperationError::InvalidInput(
                "at least 3 points are required for a closed offset".to_owned(),
            )
            .into());
        }

        let raw = build_one_side_offset_closed(&self.points, self.distance, self.miter_limit)?;

        let winding_sign = signed_area_2d(&self.points).signum();
        let trimmed = trim_inverted_loops(&raw, winding_sign);

        if trimmed.len() < 3 {
            return Err(OperationError::Failed(
                "offset collapsed to fewer than 3 points".to_owned(),
            )
            .into());
        }

        // Detect collapse: an inward offset must reduce the area and keep the winding.
        let original_area = signed_area_2d(&self.points);
        let result_area = signed_area_2d(&trimmed);
        let is_inward = original_area * self.distance > 0.0;
        if is_inward
            && original_area.abs() > TOLERANCE
            && (result_area.abs() > original_area.abs() || result_area * original_area <= 0.0)
        {
            return Err(OperationError::Failed(
                "offset collapsed (passed through center)".to_owned(),
            )
            .into());
        }

        Ok(trimmed)
    }
}

/// Offsets every segment by `distance` along its left normal.
fn offset_segments(
    points: &[Point2],
    distance: f64,
    closed: bool,
) -> Result<(Vec<(Point2, Point2)>, Vec<Vector2>)> {
    let n = points.len();
    let segment_count = if closed { n } else { n - 1 };

    let mut segments = Vec::with_capacity(segment_count);
    let mut directions = Vec::with_capacity(segment_count);
    for i in 0..segment_count {
        let j = (i + 1) % n;
        let dir = segment_direction(&points[i], &points[j])?;
        let offset = left_normal(dir) * distance;
        segments.push((points[i] + offset, points[j] + offset));
        directions.push(dir);
    }

    if segments.is_empty() {
        return Err(OperationError::Failed("no valid segments to offset".to_owned()).into());
    }
    Ok((segments, directions))
}

/// Builds a one-sided offset for an open polyline (Phase A + B).
fn build_one_side_offset(points: &[Point2], distance: f64, miter_limit: f64) -> Result<Vec<Point2>> {
    let n = points.len();
    let (segments, directions) = offset_segments(points, distance, false)?;

    let mut raw = Vec::with_capacity(n * 2);
    raw.push(segments[0].0);
    for i in 1..n - 1 {
        push_corner(
            &mut raw,
            (&segments[i - 1], &segments[i]),
            (&directions[i - 1], &directions[i]),
            &points[i],
            distance,
            miter_limit,
        );
    }
    raw.push(segments[segments.len() - 1].1);

    Ok(raw)
}

/// Builds the raw (untrimmed) offset ring for a closed polyline (Phase A + B).
fn build_one_side_offset_closed(
    points: &[Point2],
    distance: f64,
    miter_limit: f64,
) -> Result<Vec<Point2>> {
    let n = points.len();
    let (segments, directions) = offset_segments(points, distance, true)?;

    let mut raw = Vec::with_capacity(n * 2);
    for i in 0..n {
        let prev = if i == 0 { n - 1 } else { i - 1 };
        push_corner(
            &mut raw,
            (&segments[prev], &segments[i]),
            (&directions[prev], &directions[i]),
            &points[i],
            distance,
            miter_limit,
        );
    }
    Ok(raw)
}

/// Pushes corner point(s) into `raw`.
///
/// - Near-antiparallel segments: flat cap (two points).
/// - Miter exceeding the miter limit: two-point cut.
/// - Normal corners: single miter intersection point.
fn push_corner(
    raw: &mut Vec<Point2>,
    (seg_prev, seg_next): (&(Point2, Point2), &(Point2, Point2)),
    (dir_prev, dir_next): (&Vector2, &Vector2),
    original_corner: &Point2,
    distance: f64,
    miter_limit: f64,
) {
    if dir_prev.dot(dir_next) < FLAT_CAP_COS {
        raw.push(seg_prev.1);
        raw.push(seg_next.0);
        return;
    }

    let corner = intersect_offset_lines(seg_prev, seg_next, original_corner, distance);
    let limit = miter_limit * distance.abs();
    if (corner - original_corner).norm_squared() > limit * limit {
        raw.push(seg_prev.1);
        raw.push(seg_next.0);
    } else {
        raw.push(corner);
    }
}

/// Intersects two offset lines and returns the corner point.
///
/// Falls back to shifting the original corner if the lines are parallel.
fn intersect_offset_lines(
    seg_prev: &(Point2, Point2),
    seg_next: &(Point2, Point2),
    original_corner: &Point2,
    distance: f64,
) -> Point2 {
    let d_prev = seg_prev.1 - seg_prev.0;
    let d_next = seg_next.1 - seg_next.0;

    if let Some((t, _u)) = line_line_intersect_2d(&seg_prev.1, &d_prev, &seg_next.0, &d_next) {
        point_at(&seg_prev.1, &d_prev, t)
    } else {
        let normal = left_normal(
            d_prev
                .try_normalize(TOLERANCE)
                .unwrap_or_else(|| Vector2::new(1.0, 0.0)),
        );
        original_corner + normal * distance
    }
}

/// Two non-neighbouring edges of a raw inset ring that cross each other.
///
/// Mitered corners overshoot wherever the boundary is thinner than twice
/// the offset distance, e.g. at a sharp trailing edge. The overshoot shows
/// up as a pair of crossing edges enclosing an inverted loop.
#[derive(Debug, Clone, Copy)]
struct Crossing {
    first: usize,
    second: usize,
    at: Point2,
}

impl Crossing {
    /// First proper crossing in `ring`. Edges that only touch at their
    /// endpoints do not count.
    fn find(ring: &[Point2]) -> Option<Self> {
        let n = ring.len();
        if n < 4 {
            return None;
        }
        let end_eps = TOLERANCE * 100.0;
        let near_end = |s: f64| s < end_eps || s > 1.0 - end_eps;
        let edge = |k: usize| (ring[k], ring[(k + 1) % n]);

        (0..n)
            .flat_map(|first| (first + 2..n).map(move |second| (first, second)))
            .filter(|&(first, second)| !(first == 0 && second == n - 1))
            .find_map(|(first, second)| {
                let (a0, a1) = edge(first);
                let (b0, b1) = edge(second);
                let (at, t, u) = segment_segment_intersect_2d(&a0, &a1, &b0, &b1)?;
                (!(near_end(t) && near_end(u))).then_some(Self { first, second, at })
            })
    }

    /// Splits `ring` into the loop enclosed between the two edges and the
    /// remainder; both pieces start at the crossing point.
    fn split(&self, ring: &[Point2]) -> (Vec<Point2>, Vec<Point2>) {
        let enclosed = std::iter::once(self.at)
            .chain(ring[self.first + 1..=self.second].iter().copied())
            .collect();
        let remainder = std::iter::once(self.at)
            .chain(ring[self.second + 1..].iter().copied())
            .chain(ring[..=self.first].iter().copied())
            .collect();
        (enclosed, remainder)
    }
}

/// Drops repeated vertices and vertices in the middle of a straight run.
fn simplify_ring(ring: &[Point2]) -> Vec<Point2> {
    let tol_sq = TOLERANCE * TOLERANCE * 100.0;
    let mut pts = ring.to_vec();
    pts.dedup_by(|cur, prev| (*cur - *prev).norm_squared() < tol_sq);
    while pts.len() > 1
        && pts
            .first()
            .zip(pts.last())
            .is_some_and(|(first, last)| (*last - *first).norm_squared() < tol_sq)
    {
        pts.pop();
    }
    if pts.len() < 3 {
        return pts;
    }

    let n = pts.len();
    let corners: Vec<Point2> = (0..n)
        .filter(|&i| {
            let prev = pts[(i + n - 1) % n];
            let next = pts[(i + 1) % n];
            (pts[i] - prev).perp(&(next - pts[i])).abs() >= TOLERANCE * TOLERANCE
        })
        .map(|i| pts[i])
        .collect();
    if corners.len() < 3 {
        pts
    } else {
        corners
    }
}

/// Cuts the overshooting loops off a raw inset ring.
///
/// The ring is split at each crossing and both pieces are trimmed on their
/// own. The piece wound like the input (`orientation` is the sign of the
/// input's signed area) survives; if both or neither are, the larger one.
fn trim_inverted_loops(ring: &[Point2], orientation: f64) -> Vec<Point2> {
    let ring = simplify_ring(ring);
    let Some(crossing) = Crossing::find(&ring) else {
        return ring;
    };
    let (enclosed, remainder) = crossing.split(&ring);
    let pieces = [
        trim_inverted_loops(&enclosed, orientation),
        trim_inverted_loops(&remainder, orientation),
    ];
    let keeps_winding = |piece: &[Point2]| signed_area_2d(piece) * orientation > 0.0;
    pieces
        .into_iter()
        .max_by(|a, b| {
            keeps_winding(a)
                .cmp(&keeps_winding(b))
                .then(signed_area_2d(a).abs().total_cmp(&signed_area_2d(b).abs()))
        })
        .unwrap_or_default()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    /// Helper: asserts two points are approximately equal.
    fn assert_point_near(a: &Point2, b: &Point2, tol: f64, msg: &str) {
        let d = (a - b).norm();
        assert!(
            d < tol,
            "{msg}: expected ({}, {}), got ({}, {}), dist={d}",
            b.x,
            b.y,
            a.x,
            a.y
        );
    }

    #[test]
    fn straight_line_left_offset() {
        let result = PolylineOffset2D::new(vec![p(0.0, 0.0), p(10.0, 0.0)], 1.0, false)
            .execute()
            .unwrap();
        assert_eq!(result.len(), 2);
        assert_point_near(&result[0], &p(0.0, 1.0), 1e-9, "start");
        assert_point_near(&result[1], &p(10.0, 1.0), 1e-9, "end");
    }

    #[test]
    fn negative_distance_right_offset() {
        let result = PolylineOffset2D::new(vec![p(0.0, 0.0), p(10.0, 0.0)], -1.0, false)
            .execute()
            .unwrap();
        assert_point_near(&result[0], &p(0.0, -1.0), 1e-9, "start");
        assert_point_near(&result[1], &p(10.0, -1.0), 1e-9, "end");
    }

    #[test]
    fn open_l_shape_miter() {
        let points = vec![p(0.0, 0.0), p(10.0, 0.0), p(10.0, 10.0)];
        let result = PolylineOffset2D::new(points, 1.0, false).execute().unwrap();
        assert_eq!(result.len(), 3);
        assert_point_near(&result[1], &p(9.0, 1.0), 1e-9, "corner");
        assert_point_near(&result[2], &p(9.0, 10.0), 1e-9, "end");
    }

    #[test]
    fn reversal_180_degree_flat_cap() {
        let points = vec![p(0.0, 0.0), p(10.0, 0.0), p(0.0, 0.0)];
        let result = PolylineOffset2D::new(points, 1.0, false).execute().unwrap();
        assert_eq!(result.len(), 4);
        for pt in &result {
            assert!(pt.x.abs() < 15.0 && pt.y.abs() < 5.0, "diverged: {pt}");
        }
    }

    #[test]
    fn closed_square_inward_offset() {
        // CCW square: left normal points inward, so positive distance = inward.
        let points = vec![p(0.0, 0.0), p(10.0, 0.0), p(10.0, 10.0), p(0.0, 10.0)];
        let result = PolylineOffset2D::new(points, 1.0, true).execute().unwrap();

        assert_eq!(result.len(), 4);
        assert_point_near(&result[0], &p(1.0, 1.0), 1e-9, "corner 0");
        assert_point_near(&result[1], &p(9.0, 1.0), 1e-9, "corner 1");
        assert_point_near(&result[2], &p(9.0, 9.0), 1e-9, "corner 2");
        assert_point_near(&result[3], &p(1.0, 9.0), 1e-9, "corner 3");
    }

    #[test]
    fn clockwise_square_inward_offset_is_right() {
        let points = vec![p(0.0, 0.0), p(0.0, 10.0), p(10.0, 10.0), p(10.0, 0.0)];
        let result = PolylineOffset2D::new(points, -1.0, true).execute().unwrap();
        assert_point_near(&result[0], &p(1.0, 1.0), 1e-9, "corner 0");
        assert_point_near(&result[2], &p(9.0, 9.0), 1e-9, "corner 2");
        assert!(signed_area_2d(&result) < 0.0);
    }

    #[test]
    fn closed_square_outward_offset() {
        let points = vec![p(0.0, 0.0), p(10.0, 0.0), p(10.0, 10.0), p(0.0, 10.0)];
        let result = PolylineOffset2D::new(points, -1.0, true).execute().unwrap();
        assert_eq!(result.len(), 4);
        assert_point_near(&result[0], &p(-1.0, -1.0), 1e-9, "corner 0");
        assert_point_near(&result[2], &p(11.0, 11.0), 1e-9, "corner 2");
    }

    #[test]
    fn closed_triangle_collapse_error() {
        // Inradius ≈ 0.577, so offset by 5.0 inward should collapse.
        let points = vec![p(0.0, 0.0), p(2.0, 0.0), p(1.0, 1.732)];
        assert!(PolylineOffset2D::new(points, 5.0, true).execute().is_err());
    }

    #[test]
    fn sharp_wedge_inward_offset_is_trimmed() {
        // Thin trailing-edge wedge: the raw miter ring crosses itself near the tip.
        let points = vec![
            p(0.0, 0.0),
            p(0.5, -0.08),
            p(1.0, -0.002),
            p(1.0, 0.002),
            p(0.5, 0.08),
        ];
        let result = PolylineOffset2D::new(points.clone(), 0.01, true)
            .execute()
            .unwrap();
        assert!(Crossing::find(&result).is_none());
        assert!(signed_area_2d(&result).abs() < signed_area_2d(&points).abs());
        assert!(result.iter().all(|pt| pt.x < 1.0));
    }

    #[test]
    fn figure_eight_keeps_loop_with_input_winding() {
        let ring = vec![p(0.0, 0.0), p(2.0, 2.0), p(2.0, 0.0), p(0.0, 2.0)];
        let crossing = Crossing::find(&ring).unwrap();
        assert_eq!((crossing.first, crossing.second), (0, 2));
        assert_point_near(&crossing.at, &p(1.0, 1.0), 1e-12, "crossing");

        let ccw = trim_inverted_loops(&ring, 1.0);
        assert_eq!(ccw.len(), 3);
        assert!((signed_area_2d(&ccw) - 1.0).abs() < 1e-12);
        assert!(ccw.iter().all(|pt| pt.x <= 1.0 + 1e-12));

        let cw = trim_inverted_loops(&ring, -1.0);
        assert!((signed_area_2d(&cw) + 1.0).abs() < 1e-12);
        assert!(cw.iter().all(|pt| pt.x >= 1.0 - 1e-12));
    }

    #[test]
    fn simplify_drops_repeats_and_straight_runs() {
        let ring = vec![p(0.0, 0.0), p(1.0, 0.0), p(1.0, 0.0), p(2.0, 0.0), p(2.0, 2.0), p(0.0, 0.0)];
        assert_eq!(simplify_ring(&ring), vec![p(0.0, 0.0), p(2.0, 0.0), p(2.0, 2.0)]);
    }

    #[test]
    fn zero_distance_returns_copy() {
        let points = vec![p(1.0, 2.0), p(3.0, 4.0)];
        let result = PolylineOffset2D::new(points.clone(), 0.0, false)
            .execute()
            .unwrap();
        assert_eq!(result, points);
    }

    #[test]
    fn fewer_than_two_points_error() {
        assert!(PolylineOffset2D::new(vec![p(0.0, 0.0)], 1.0, false)
            .execute()
            .is_err());
        assert!(PolylineOffset2D::new(Vec::new(), 1.0, false).execute().is_err());
    }
}
