use super::{OffsetSide, PolylineOffset2D};
use crate::error::{OperationError, Result};
use crate::geometry::Ring;
use crate::math::Point2;

/// Closes a boundary piece and its parallel offset into a solid strip.
///
/// The strip is bounded by the source line, the offset line and two
/// straight end caps joining their endpoints.
#[derive(Debug)]
pub struct OffsetBox<'a> {
    line: &'a [Point2],
    thickness: f64,
    side: OffsetSide,
    bevel: f64,
    symmetric: bool,
    miter_limit: f64,
}

impl<'a> OffsetBox<'a> {
    /// Creates a new offset box operation.
    #[must_use]
    pub fn new(line: &'a [Point2], thickness: f64, side: OffsetSide) -> Self {
        Self {
            line,
            thickness,
            side,
            bevel: 0.0,
            symmetric: false,
            miter_limit: super::polyline_offset_2d::DEFAULT_MITER_LIMIT,
        }
    }

    /// Requests beveled end caps. Any positive bevel is rejected on execute.
    #[must_use]
    pub fn with_bevel(mut self, bevel: f64) -> Self {
        self.bevel = bevel;
        self
    }

    /// Places the strip on both sides of the source line, `thickness` each.
    #[must_use]
    pub fn symmetric(mut self, symmetric: bool) -> Self {
        self.symmetric = symmetric;
        self
    }

    /// Sets the miter limit used for both offset lines.
    #[must_use]
    pub fn with_miter_limit(mut self, miter_limit: f64) -> Self {
        self.miter_limit = miter_limit;
        self
    }

    /// The parallel offset of the source line on the configured side.
    ///
    /// # Errors
    ///
    /// Returns an error if the line has fewer than two points.
    pub fn offset_line(&self) -> Result<Vec<Point2>> {
        PolylineOffset2D::new(
            self.line.to_vec(),
            self.side.signed(self.thickness),
            false,
        )
        .with_miter_limit(self.miter_limit)
        .execute()
    }

    /// Executes the operation, returning the strip as a clockwise ring.
    ///
    /// # Errors
    ///
    /// - `OperationError::NotImplemented` for beveled strips
    /// - offset errors, or `GeometryError::Degenerate` for a zero-area strip
    pub fn execute(&self) -> Result<Ring> {
        if self.bevel > 0.0 {
            return Err(OperationError::NotImplemented("beveled offset boxes").into());
        }

        let offset = self.offset_line()?;
        let base = if self.symmetric {
            PolylineOffset2D::new(
                self.line.to_vec(),
                self.side.opposite().signed(self.thickness),
                false,
            )
            .with_miter_limit(self.miter_limit)
            .execute()?
        } else {
            self.line.to_vec()
        };

        Ring::new(base.into_iter().chain(offset.into_iter().rev()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::error::SectionError;

    fn top_edge() -> Vec<Point2> {
        // Walking right along the top of a clockwise shape: inside is to the right.
        vec![Point2::new(0.0, 1.0), Point2::new(2.0, 1.0)]
    }

    #[test]
    fn strip_below_top_edge() {
        let ring = OffsetBox::new(&top_edge(), 0.1, OffsetSide::Right)
            .execute()
            .unwrap();
        assert_relative_eq!(ring.area(), 0.2, epsilon = 1e-12);
        let (min, max) = ring.bounds();
        assert_relative_eq!(min.y, 0.9, epsilon = 1e-12);
        assert_relative_eq!(max.y, 1.0, epsilon = 1e-12);
        assert!(ring.signed_area() < 0.0);
    }

    #[test]
    fn symmetric_strip_straddles_line() {
        let ring = OffsetBox::new(&top_edge(), 0.1, OffsetSide::Right)
            .symmetric(true)
            .execute()
            .unwrap();
        assert_relative_eq!(ring.area(), 0.4, epsilon = 1e-12);
        let (min, max) = ring.bounds();
        assert_relative_eq!(min.y, 0.9, epsilon = 1e-12);
        assert_relative_eq!(max.y, 1.1, epsilon = 1e-12);
    }

    #[test]
    fn bevel_is_not_implemented() {
        let result = OffsetBox::new(&top_edge(), 0.1, OffsetSide::Right)
            .with_bevel(0.01)
            .execute();
        assert!(matches!(
            result,
            Err(SectionError::Operation(OperationError::NotImplemented(_)))
        ));
    }
}
