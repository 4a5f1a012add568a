use crate::error::{GeometryError, Result};
use crate::geometry::Ring;
use crate::math::intersect_2d::{point_at, segment_slab_range};
use crate::math::{Point2, TOLERANCE};

/// Cuts a ring into the open pieces lying inside a chordwise slab
/// `low <= x <= high`.
///
/// The slab is unbounded in the transverse direction, which is the limit of
/// intersecting the ring with an arbitrarily tall box. Pieces keep the
/// ring's walking direction, and a piece crossing the ring's start vertex
/// comes out as one continuous line.
#[derive(Debug)]
pub struct SlabClip<'a> {
    ring: &'a Ring,
    low: f64,
    high: f64,
}

impl<'a> SlabClip<'a> {
    /// Creates a new slab clip operation.
    #[must_use]
    pub fn new(ring: &'a Ring, low: f64, high: f64) -> Self {
        Self { ring, low, high }
    }

    /// Executes the clip, returning the pieces in walking order.
    ///
    /// A ring entirely inside the slab is returned as one closed line (first
    /// point repeated at the end).
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::ParameterOutOfRange` if `low > high`.
    pub fn execute(&self) -> Result<Vec<Vec<Point2>>> {
        if self.low > self.high {
            return Err(GeometryError::ParameterOutOfRange {
                parameter: "low",
                value: self.low,
                min: f64::NEG_INFINITY,
                max: self.high,
            }
            .into());
        }

        let points = self.ring.points();
        let n = points.len();
        let outside = |p: &Point2| p.x < self.low - TOLERANCE || p.x > self.high + TOLERANCE;

        // Start walking at a vertex outside the slab so no piece wraps around.
        let Some(start) = points.iter().position(outside) else {
            let mut closed = points.to_vec();
            closed.push(points[0]);
            return Ok(vec![closed]);
        };

        let mut pieces = Vec::new();
        let mut current: Vec<Point2> = Vec::new();
        for k in 0..n {
            let a = points[(start + k) % n];
            let b = points[(start + k + 1) % n];
            let Some((t0, t1)) = segment_slab_range(&a, &b, self.low, self.high) else {
                flush(&mut current, &mut pieces);
                continue;
            };
            let dir = b - a;
            let enter = point_at(&a, &dir, t0);
            let exit = point_at(&a, &dir, t1);

            if current.is_empty() || t0 > TOLERANCE {
                flush(&mut current, &mut pieces);
                current.push(enter);
            }
            current.push(exit);
            if t1 < 1.0 - TOLERANCE {
                flush(&mut current, &mut pieces);
            }
        }
        flush(&mut current, &mut pieces);

        Ok(pieces)
    }
}

/// Moves a finished piece into `pieces` unless it is a single point.
fn flush(current: &mut Vec<Point2>, pieces: &mut Vec<Vec<Point2>>) {
    let piece = std::mem::take(current);
    let Some((first, rest)) = piece.split_first() else {
        return;
    };
    if rest.iter().any(|p| (p - first).norm() > TOLERANCE) {
        pieces.push(piece);
    }
}
