use geo::BooleanOps;

use super::feature::FillGeometry;
use super::material::MaterialSpec;
use super::GeometryParams;
use crate::error::{GeometryError, Result};
use crate::geometry::Ring;
use crate::operations::{OffsetSide, PolylineOffset2D};

/// Layer of constant thickness covering the whole boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    material: MaterialSpec,
    thickness: f64,
}

impl Layer {
    #[must_use]
    pub fn new(material: impl Into<MaterialSpec>, thickness: f64) -> Self {
        Self {
            material: material.into(),
            thickness,
        }
    }

    #[must_use]
    pub fn material(&self) -> &MaterialSpec {
        &self.material
    }

    #[must_use]
    pub fn thickness(&self) -> f64 {
        self.thickness
    }

    pub fn set_thickness(&mut self, thickness: f64) {
        self.thickness = thickness;
    }

    pub fn set_material(&mut self, material: impl Into<MaterialSpec>) {
        self.material = material.into();
    }

    pub(crate) fn apply(
        &self,
        boundary: &Ring,
        params: &GeometryParams,
    ) -> Result<(Ring, FillGeometry)> {
        check_thickness(self.thickness)?;
        let interior = inward_offset(boundary, self.thickness, params)?;
        let fill = boundary.to_polygon().difference(&interior.to_polygon());
        Ok((interior, FillGeometry::from(fill)))
    }

    /// Perimeter of the mid-thickness line when applied to `exterior`.
    ///
    /// # Errors
    ///
    /// Returns an error if the half-thickness offset collapses.
    pub fn middle_circumference(&self, exterior: &Ring, params: &GeometryParams) -> Result<f64> {
        Ok(self.centerline(exterior, params)?.perimeter())
    }

    /// Area enclosed by the mid-thickness line when applied to `exterior`.
    ///
    /// # Errors
    ///
    /// Returns an error if the half-thickness offset collapses.
    pub fn enclosed_area(&self, exterior: &Ring, params: &GeometryParams) -> Result<f64> {
        Ok(self.centerline(exterior, params)?.area())
    }

    fn centerline(&self, exterior: &Ring, params: &GeometryParams) -> Result<Ring> {
        check_thickness(self.thickness)?;
        inward_offset(exterior, self.thickness / 2.0, params)
    }
}

pub(crate) fn check_thickness(thickness: f64) -> Result<()> {
    if thickness.is_finite() && thickness >= 0.0 {
        Ok(())
    } else {
        Err(GeometryError::ParameterOutOfRange {
            parameter: "thickness",
            value: thickness,
            min: 0.0,
            max: f64::INFINITY,
        }
        .into())
    }
}

/// Offsets the whole ring towards its inside, picking the side from the
/// sign of its signed area.
pub(crate) fn inward_offset(ring: &Ring, distance: f64, params: &GeometryParams) -> Result<Ring> {
    let side = OffsetSide::inside_of(ring.signed_area());
    let points = PolylineOffset2D::new(ring.points().to_vec(), side.signed(distance), true)
        .with_miter_limit(params.miter_limit)
        .execute()?;
    Ring::new(points)
}
