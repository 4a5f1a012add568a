use crate::geometry::Ring;
use crate::operations::offset::polyline_offset_2d::DEFAULT_MITER_LIMIT;

/// Parameters controlling how features carve the section geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeometryParams {
    /// How far cutting boxes reach beyond the boundary's transverse extent,
    /// as a fraction of the boundary height.
    ///
    /// Boolean operations snap to a grid scaled to the operands' bounding
    /// box, so a cutting box much taller than the section loses precision
    /// on the edges it places.
    pub transverse_margin: f64,
    /// Maximum length of the summed unit edge vectors at which a vertex
    /// counts as a doubled-back seam and is removed.
    pub seam_tolerance: f64,
    /// Corner miter limit for offsets, as a multiple of the offset distance.
    pub miter_limit: f64,
}

impl Default for GeometryParams {
    fn default() -> Self {
        Self {
            transverse_margin: 0.05,
            seam_tolerance: 1e-3,
            miter_limit: DEFAULT_MITER_LIMIT,
        }
    }
}

impl GeometryParams {
    #[must_use]
    pub fn with_transverse_margin(mut self, transverse_margin: f64) -> Self {
        self.transverse_margin = transverse_margin;
        self
    }

    #[must_use]
    pub fn with_seam_tolerance(mut self, seam_tolerance: f64) -> Self {
        self.seam_tolerance = seam_tolerance;
        self
    }

    #[must_use]
    pub fn with_miter_limit(mut self, miter_limit: f64) -> Self {
        self.miter_limit = miter_limit;
        self
    }

    /// Transverse interval `(bottom, top)` a cutting box spans to fully
    /// cross `boundary`.
    #[must_use]
    pub fn cut_range(&self, boundary: &Ring) -> (f64, f64) {
        let (min, max) = boundary.bounds();
        let margin = self.transverse_margin * (max.y - min.y);
        (min.y - margin, max.y + margin)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::math::Point2;

    fn hexagon() -> Ring {
        Ring::new([
            Point2::new(0.0, 0.0),
            Point2::new(0.2, 0.1),
            Point2::new(0.8, 0.1),
            Point2::new(1.0, 0.0),
            Point2::new(0.8, -0.1),
            Point2::new(0.2, -0.1),
        ])
        .unwrap()
    }

    #[test]
    fn cut_range_scales_with_boundary_height() {
        let (bottom, top) = GeometryParams::default().cut_range(&hexagon());
        assert_relative_eq!(bottom, -0.11, epsilon = 1e-15);
        assert_relative_eq!(top, 0.11, epsilon = 1e-15);

        let wide = GeometryParams::default().with_transverse_margin(1.0);
        let (bottom, top) = wide.cut_range(&hexagon());
        assert_relative_eq!(bottom, -0.3, epsilon = 1e-15);
        assert_relative_eq!(top, 0.3, epsilon = 1e-15);
    }
}
