use tracing::debug;

use crate::error::{GeometryError, Result};
use crate::math::integrals::{principal_axis_angle, rotate_inertia, RingIntegrals};
use crate::math::{Point2, TOLERANCE};
use crate::section::{ExportedRegion, Section};

/// Modulus-weighted second moments `(EI_xx, EI_yy, EI_xy)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BendingStiffness {
    pub ei_xx: f64,
    pub ei_yy: f64,
    pub ei_xy: f64,
}

impl BendingStiffness {
    /// Angle of the principal bending axes.
    #[must_use]
    pub fn principal_angle(&self) -> f64 {
        principal_axis_angle(self.ei_xx, self.ei_yy, self.ei_xy)
    }

    /// Stiffnesses about the principal axes, in the rotated `(xx, yy)` order.
    #[must_use]
    pub fn principal(&self) -> (f64, f64) {
        let (ei_1, ei_2, _) =
            rotate_inertia(self.ei_xx, self.ei_yy, self.ei_xy, self.principal_angle());
        (ei_1, ei_2)
    }
}

/// Result of a [`StructuralAnalysis`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StructuralProperties {
    /// Modulus-weighted centroid.
    pub neutral_axis: Point2,
    /// Plain geometric area of all regions.
    pub total_area: f64,
    /// Stiffness tensor about the neutral axis.
    pub bending_stiffness: BendingStiffness,
}

/// Neutral axis and bending stiffness of a section.
///
/// Runs in two passes: the neutral axis is found from the geometry
/// exported at the origin, then the stiffness is integrated on the
/// geometry re-exported about that axis.
#[derive(Debug)]
pub struct StructuralAnalysis<'a> {
    section: &'a Section,
}

impl<'a> StructuralAnalysis<'a> {
    #[must_use]
    pub fn new(section: &'a Section) -> Self {
        Self { section }
    }

    /// Executes both passes.
    ///
    /// # Errors
    ///
    /// - `GeometryError::Degenerate` if `Σ E·A` is zero
    /// - export errors from the section
    pub fn execute(&self) -> Result<StructuralProperties> {
        let regions = self.section.export_geometry(&Point2::origin())?;
        let (total_area, weighted) = weighted_integrals(&regions)?;
        if weighted.area.abs() < TOLERANCE {
            return Err(GeometryError::Degenerate("section has no axial stiffness".into()).into());
        }
        let neutral_axis = Point2::new(weighted.s_y / weighted.area, weighted.s_x / weighted.area);

        let regions = self.section.export_geometry(&neutral_axis)?;
        let (_, about_axis) = weighted_integrals(&regions)?;
        let bending_stiffness = BendingStiffness {
            ei_xx: about_axis.i_xx,
            ei_yy: about_axis.i_yy,
            ei_xy: about_axis.i_xy,
        };

        debug!(
            na_x = neutral_axis.x,
            na_y = neutral_axis.y,
            total_area,
            ei_xx = bending_stiffness.ei_xx,
            ei_yy = bending_stiffness.ei_yy,
            ei_xy = bending_stiffness.ei_xy,
            "structural analysis"
        );
        Ok(StructuralProperties {
            neutral_axis,
            total_area,
            bending_stiffness,
        })
    }
}

/// Plain area and elastic-modulus-weighted integrals of all regions.
fn weighted_integrals(regions: &[ExportedRegion]) -> Result<(f64, RingIntegrals)> {
    let mut area = 0.0;
    let mut weighted = RingIntegrals::default();
    for region in regions {
        let integrals = region.integrals()?;
        area += integrals.area;
        weighted += integrals.scaled(region.material.elastic_modulus);
    }
    Ok((area, weighted))
}
