use geo::{BooleanOps, MultiPolygon};

use super::feature::FillGeometry;
use super::ispar::check_chordwise_span;
use super::layer::check_thickness;
use super::material::{MaterialSpec, Part};
use super::GeometryParams;
use crate::error::{GeometryError, Result};
use crate::geometry::Ring;
use crate::operations::boolean::{chordwise_box, transverse_extent};

/// Relative slack on the block height when checking that the flanges
/// leave a gap. Boolean results carry snapping error on their extent.
const FLANGE_GAP_TOLERANCE: f64 = 1e-7;

/// Box spar: two vertical webs closed by flanges at the top and bottom of
/// the boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxSpar {
    material: MaterialSpec,
    midpos: f64,
    width: f64,
    flangeheight: f64,
    webwidth: f64,
}

impl BoxSpar {
    #[must_use]
    pub fn new(
        material: impl Into<MaterialSpec>,
        midpos: f64,
        width: f64,
        flangeheight: f64,
        webwidth: f64,
    ) -> Self {
        Self {
            material: material.into(),
            midpos,
            width,
            flangeheight,
            webwidth,
        }
    }

    #[must_use]
    pub fn material(&self) -> &MaterialSpec {
        &self.material
    }

    #[must_use]
    pub fn midpos(&self) -> f64 {
        self.midpos
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.width
    }

    #[must_use]
    pub fn flangeheight(&self) -> f64 {
        self.flangeheight
    }

    #[must_use]
    pub fn webwidth(&self) -> f64 {
        self.webwidth
    }

    pub fn set_midpos(&mut self, midpos: f64) {
        self.midpos = midpos;
    }

    pub fn set_width(&mut self, width: f64) {
        self.width = width;
    }

    pub fn set_flangeheight(&mut self, flangeheight: f64) {
        self.flangeheight = flangeheight;
    }

    pub fn set_webwidth(&mut self, webwidth: f64) {
        self.webwidth = webwidth;
    }

    pub fn set_material(&mut self, material: impl Into<MaterialSpec>) {
        self.material = material.into();
    }

    pub(crate) fn apply(
        &self,
        boundary: &Ring,
        params: &GeometryParams,
    ) -> Result<(Ring, FillGeometry)> {
        let start = self.midpos - self.width / 2.0;
        let end = self.midpos + self.width / 2.0;
        check_chordwise_span(boundary, start, end)?;
        check_thickness(self.flangeheight)?;
        check_thickness(self.webwidth)?;
        if 2.0 * self.webwidth >= self.width {
            return Err(GeometryError::ParameterOutOfRange {
                parameter: "webwidth",
                value: self.webwidth,
                min: 0.0,
                max: self.width / 2.0,
            }
            .into());
        }

        let (bottom, top) = params.cut_range(boundary);

        let outline = MultiPolygon::new(vec![boundary.to_polygon()]);
        let spar = outline.intersection(&MultiPolygon::new(vec![chordwise_box(
            start, end, bottom, top,
        )]));
        let between_webs = MultiPolygon::new(vec![chordwise_box(
            start + self.webwidth,
            end - self.webwidth,
            bottom,
            top,
        )]);

        let webs = spar.difference(&between_webs);
        let block = spar.intersection(&between_webs);

        let (block_bottom, block_top) = transverse_extent(&block).ok_or_else(|| {
            GeometryError::Degenerate("box spar does not overlap the boundary".into())
        })?;
        let block_height = block_top - block_bottom;
        if 2.0 * self.flangeheight >= block_height * (1.0 - FLANGE_GAP_TOLERANCE) {
            return Err(GeometryError::ParameterOutOfRange {
                parameter: "flangeheight",
                value: self.flangeheight,
                min: 0.0,
                max: block_height / 2.0,
            }
            .into());
        }
        let cutout = MultiPolygon::new(vec![chordwise_box(
            start,
            end,
            block_bottom + self.flangeheight,
            block_top - self.flangeheight,
        )]);
        let flanges = block.difference(&cutout);

        let fill = FillGeometry::new()
            .with(webs, Part::Web)
            .with(flanges, Part::Flange);
        Ok((boundary.clone(), fill))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::error::SectionError;
    use crate::math::Point2;
    use crate::section::material::Material;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    fn hexagon() -> Ring {
        Ring::new([
            p(0.0, 0.0),
            p(0.2, 0.1),
            p(0.8, 0.1),
            p(1.0, 0.0),
            p(0.8, -0.1),
            p(0.2, -0.1),
        ])
        .unwrap()
    }

    fn box_spar(midpos: f64, width: f64) -> BoxSpar {
        BoxSpar::new(Material::new(1600.0, 70e9), midpos, width, 0.01, 0.02)
    }

    #[test]
    fn webs_and_flanges() {
        let params = GeometryParams::default();
        let (boundary, fill) = box_spar(0.5, 0.2).apply(&hexagon(), &params).unwrap();
        assert_eq!(boundary, hexagon());

        assert_relative_eq!(fill.part_area(Part::Web), 2.0 * 0.02 * 0.2, epsilon = 1e-8);
        assert_relative_eq!(fill.part_area(Part::Flange), 2.0 * 0.16 * 0.01, epsilon = 1e-8);

        let regions = fill.regions().unwrap();
        assert_eq!(regions.len(), 4);
    }

    #[test]
    fn too_wide_box_fails() {
        let params = GeometryParams::default();
        let err = box_spar(0.9, 0.4).apply(&hexagon(), &params).unwrap_err();
        assert!(matches!(
            err,
            SectionError::Geometry(GeometryError::FlangeTooWide { .. })
        ));
    }

    #[test]
    fn webs_wider_than_box_fail() {
        let params = GeometryParams::default();
        let mut spar = box_spar(0.5, 0.2);
        spar.set_webwidth(0.1);
        assert!(spar.apply(&hexagon(), &params).is_err());
    }

    #[test]
    fn flanges_taller_than_box_fail() {
        let params = GeometryParams::default();
        let mut spar = box_spar(0.5, 0.2);
        spar.set_flangeheight(0.15);
        assert!(spar.apply(&hexagon(), &params).is_err());
    }

    #[test]
    fn flanges_filling_the_box_fail() {
        // two 0.1 flanges exactly close the 0.2 tall block
        let params = GeometryParams::default();
        let mut spar = box_spar(0.5, 0.2);
        spar.set_flangeheight(0.1);
        let err = spar.apply(&hexagon(), &params).unwrap_err();
        assert!(matches!(
            err,
            SectionError::Geometry(GeometryError::ParameterOutOfRange {
                parameter: "flangeheight",
                ..
            })
        ));
    }

    #[test]
    fn flanges_just_short_of_the_box_succeed() {
        let params = GeometryParams::default();
        let mut spar = box_spar(0.5, 0.2);
        spar.set_flangeheight(0.099);
        let (_, fill) = spar.apply(&hexagon(), &params).unwrap();
        assert_relative_eq!(fill.part_area(Part::Flange), 2.0 * 0.16 * 0.099, epsilon = 1e-8);
    }
}
