use crate::error::Result;
use crate::geometry::Ring;
use crate::math::{Point2, TOLERANCE};

/// Removes seam spikes from a ring.
///
/// Where a carved region rejoins the untouched boundary, boolean
/// operations can leave a vertex at which the ring doubles back on itself:
/// the unit vectors of the incoming and outgoing edges cancel. Such
/// vertices are deleted; `tolerance` bounds the length of their sum.
#[derive(Debug)]
pub struct RefineSeams<'a> {
    ring: &'a Ring,
    tolerance: f64,
}

impl<'a> RefineSeams<'a> {
    #[must_use]
    pub fn new(ring: &'a Ring, tolerance: f64) -> Self {
        Self { ring, tolerance }
    }

    /// Executes the refinement.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::Degenerate` if the remaining ring collapses.
    pub fn execute(&self) -> Result<Ring> {
        let pts = self.ring.points();
        let n = pts.len();
        let kept: Vec<Point2> = (0..n)
            .filter(|&i| {
                let prev = pts[(i + n - 1) % n];
                let next = pts[(i + 1) % n];
                let (Some(incoming), Some(outgoing)) = (
                    (pts[i] - prev).try_normalize(TOLERANCE),
                    (next - pts[i]).try_normalize(TOLERANCE),
                ) else {
                    return true;
                };
                (incoming + outgoing).norm() >= self.tolerance
            })
            .map(|i| pts[i])
            .collect();
        Ring::new(kept)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn spike_vertex_is_removed() {
        // Square with a zero-width spike poking out of the top edge.
        let ring = Ring::new([
            Point2::new(0.0, 0.0),
            Point2::new(0.0, 1.0),
            Point2::new(0.5, 1.0),
            Point2::new(0.5, 1.5),
            Point2::new(0.5, 1.0),
            Point2::new(1.0, 1.0),
            Point2::new(1.0, 0.0),
        ])
        .unwrap();
        let refined = RefineSeams::new(&ring, 1e-3).execute().unwrap();
        assert!(refined.points().iter().all(|p| p.y <= 1.0));
        assert!((refined.area() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn clean_ring_is_unchanged() {
        let ring = Ring::new([
            Point2::new(0.0, 0.0),
            Point2::new(0.0, 1.0),
            Point2::new(1.0, 1.0),
            Point2::new(1.0, 0.0),
        ])
        .unwrap();
        assert_eq!(RefineSeams::new(&ring, 1e-3).execute().unwrap(), ring);
    }
}
