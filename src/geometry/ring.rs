use geo::{Coord, LineString, Polygon};

use crate::error::{GeometryError, Result};
use crate::math::integrals;
use crate::math::polygon_2d::{bounds, is_clockwise, polyline_length, signed_area_2d};
use crate::math::{Point2, Vector2, TOLERANCE};

/// Closed boundary ring, always wound clockwise.
///
/// The closing point is implicit: the last vertex connects back to the
/// first. Construction canonicalizes the winding, so every ring handed to
/// the integral formulas carries the sign convention they rely on.
#[derive(Debug, Clone, PartialEq)]
pub struct Ring {
    points: Vec<Point2>,
}

impl Ring {
    /// Creates a clockwise ring from raw vertices.
    ///
    /// An explicit closing vertex and consecutive duplicates are dropped.
    /// Counter-clockwise input is reversed.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::Degenerate` if fewer than three distinct
    /// vertices remain or the ring encloses no area.
    pub fn new(points: impl IntoIterator<Item = Point2>) -> Result<Self> {
        let mut deduped: Vec<Point2> = Vec::new();
        for pt in points {
            if deduped.last().is_some_and(|last| (pt - *last).norm() < TOLERANCE) {
                continue;
            }
            deduped.push(pt);
        }
        while deduped.len() > 1
            && deduped
                .first()
                .zip(deduped.last())
                .is_some_and(|(first, last)| (*first - *last).norm() < TOLERANCE)
        {
            deduped.pop();
        }

        if deduped.len() < 3 {
            return Err(GeometryError::Degenerate(format!(
                "ring needs at least 3 distinct vertices, got {}",
                deduped.len()
            ))
            .into());
        }
        if signed_area_2d(&deduped).abs() < TOLERANCE * TOLERANCE {
            return Err(GeometryError::Degenerate("ring encloses no area".into()).into());
        }
        if !is_clockwise(&deduped) {
            deduped.reverse();
        }
        Ok(Self { points: deduped })
    }

    /// Converts the exterior of a `geo` line string.
    ///
    /// # Errors
    ///
    /// Same as [`Ring::new`].
    pub fn from_line_string(line: &LineString<f64>) -> Result<Self> {
        Self::new(line.coords().map(|c| Point2::new(c.x, c.y)))
    }

    /// Vertices in clockwise order, without the closing vertex.
    #[must_use]
    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    /// Number of vertices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always `false`: a ring has at least three vertices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Signed area, negative because the ring is clockwise.
    #[must_use]
    pub fn signed_area(&self) -> f64 {
        signed_area_2d(&self.points)
    }

    /// Enclosed area (positive).
    #[must_use]
    pub fn area(&self) -> f64 {
        integrals::area(&self.points)
    }

    /// Closed perimeter length.
    #[must_use]
    pub fn perimeter(&self) -> f64 {
        polyline_length(&self.points, true)
    }

    /// Axis-aligned bounds `(min, max)`.
    #[must_use]
    pub fn bounds(&self) -> (Point2, Point2) {
        // A ring is never empty, the fallback is unreachable.
        bounds(&self.points).unwrap_or((Point2::origin(), Point2::origin()))
    }

    /// Returns a copy with `refpoint` subtracted from every vertex.
    #[must_use]
    pub fn shifted(&self, refpoint: &Point2) -> Self {
        let offset: Vector2 = refpoint.coords;
        Self {
            points: self.points.iter().map(|p| p - offset).collect(),
        }
    }

    /// Explicitly closed `geo` line string of this ring.
    #[must_use]
    pub fn to_line_string(&self) -> LineString<f64> {
        let mut coords: Vec<Coord<f64>> = self
            .points
            .iter()
            .map(|p| Coord { x: p.x, y: p.y })
            .collect();
        coords.push(Coord {
            x: self.points[0].x,
            y: self.points[0].y,
        });
        LineString::new(coords)
    }

    /// Solid `geo` polygon bounded by this ring.
    #[must_use]
    pub fn to_polygon(&self) -> Polygon<f64> {
        Polygon::new(self.to_line_string(), Vec::new())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    #[test]
    fn counter_clockwise_input_is_reversed() {
        let ring = Ring::new([p(0.0, 0.0), p(2.0, 0.0), p(2.0, 1.0), p(0.0, 1.0)]).unwrap();
        assert!(ring.signed_area() < 0.0);
        assert_relative_eq!(ring.area(), 2.0);
    }

    #[test]
    fn closing_and_duplicate_vertices_are_dropped() {
        let ring = Ring::new([
            p(0.0, 0.0),
            p(0.0, 1.0),
            p(0.0, 1.0),
            p(1.0, 1.0),
            p(1.0, 0.0),
            p(0.0, 0.0),
        ])
        .unwrap();
        assert_eq!(ring.len(), 4);
        assert_eq!(ring.points()[0], p(0.0, 0.0));
    }

    #[test]
    fn degenerate_rings_fail() {
        assert!(Ring::new([p(0.0, 0.0), p(1.0, 0.0)]).is_err());
        assert!(Ring::new([p(0.0, 0.0), p(1.0, 0.0), p(2.0, 0.0)]).is_err());
    }

    #[test]
    fn shifted_ring() {
        let ring = Ring::new([p(1.0, 1.0), p(1.0, 2.0), p(2.0, 2.0), p(2.0, 1.0)]).unwrap();
        let shifted = ring.shifted(&p(1.0, 1.0));
        let (min, max) = shifted.bounds();
        assert_eq!(min, p(0.0, 0.0));
        assert_eq!(max, p(1.0, 1.0));
    }

    #[test]
    fn geo_round_trip_keeps_winding() {
        let ring = Ring::new([p(0.0, 0.0), p(0.0, 1.0), p(1.0, 1.0), p(1.0, 0.0)]).unwrap();
        let back = Ring::from_line_string(&ring.to_line_string()).unwrap();
        assert_eq!(ring, back);
        assert_relative_eq!(ring.perimeter(), 4.0);
    }
}
