use geo::{BooleanOps, MultiPolygon};

use super::feature::FillGeometry;
use super::layer::check_thickness;
use super::material::{MaterialSpec, Part};
use super::GeometryParams;
use crate::error::{GeometryError, Result};
use crate::geometry::Ring;
use crate::math::Point2;
use crate::operations::boolean::chordwise_box;
use crate::operations::{OffsetBox, OffsetSide, SlabClip};

/// I-beam (double-T) spar: two flanges following the boundary, joined by
/// a vertical web.
#[derive(Debug, Clone, PartialEq)]
pub struct ISpar {
    material: MaterialSpec,
    midpos: f64,
    flangewidth: f64,
    flangethickness: f64,
    webpos: f64,
    webthickness: f64,
}

impl ISpar {
    /// Creates an I-spar.
    ///
    /// `midpos` is the absolute chordwise position of the flange centers,
    /// `webpos` the relative web position along the flange (0 at the
    /// leading flange end, 1 at the trailing one).
    #[must_use]
    pub fn new(
        material: impl Into<MaterialSpec>,
        midpos: f64,
        flangewidth: f64,
        flangethickness: f64,
        webpos: f64,
        webthickness: f64,
    ) -> Self {
        Self {
            material: material.into(),
            midpos,
            flangewidth,
            flangethickness,
            webpos,
            webthickness,
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
    pub fn flangewidth(&self) -> f64 {
        self.flangewidth
    }

    #[must_use]
    pub fn flangethickness(&self) -> f64 {
        self.flangethickness
    }

    #[must_use]
    pub fn webpos(&self) -> f64 {
        self.webpos
    }

    #[must_use]
    pub fn webthickness(&self) -> f64 {
        self.webthickness
    }

    /// Absolute chordwise position of the web center.
    #[must_use]
    pub fn webpos_abs(&self) -> f64 {
        self.midpos + (self.webpos - 0.5) * self.flangewidth
    }

    pub fn set_midpos(&mut self, midpos: f64) {
        self.midpos = midpos;
    }

    pub fn set_flangewidth(&mut self, flangewidth: f64) {
        self.flangewidth = flangewidth;
    }

    pub fn set_flangethickness(&mut self, flangethickness: f64) {
        self.flangethickness = flangethickness;
    }

    pub fn set_webpos(&mut self, webpos: f64) {
        self.webpos = webpos;
    }

    pub fn set_webthickness(&mut self, webthickness: f64) {
        self.webthickness = webthickness;
    }

    pub fn set_material(&mut self, material: impl Into<MaterialSpec>) {
        self.material = material.into();
    }

    pub(crate) fn apply(
        &self,
        boundary: &Ring,
        params: &GeometryParams,
    ) -> Result<(Ring, FillGeometry)> {
        check_thickness(self.flangethickness)?;
        check_thickness(self.webthickness)?;
        if !(0.0..=1.0).contains(&self.webpos) {
            return Err(GeometryError::ParameterOutOfRange {
                parameter: "webpos",
                value: self.webpos,
                min: 0.0,
                max: 1.0,
            }
            .into());
        }
        let start = self.midpos - self.flangewidth / 2.0;
        let end = self.midpos + self.flangewidth / 2.0;
        check_chordwise_span(boundary, start, end)?;

        let pieces = SlabClip::new(boundary, start, end).execute()?;
        let [first, second] = pieces.as_slice() else {
            return Err(GeometryError::Degenerate(format!(
                "spar flanges need two boundary pieces in [{start}, {end}], found {}",
                pieces.len()
            ))
            .into());
        };

        let side = OffsetSide::inside_of(boundary.signed_area());
        let mut flanges = Vec::with_capacity(2);
        let mut offsets = Vec::with_capacity(2);
        for piece in [first, second] {
            let flange = OffsetBox::new(piece, self.flangethickness, side)
                .with_miter_limit(params.miter_limit);
            offsets.push(flange.offset_line()?);
            flanges.push(flange.execute()?.to_polygon());
        }

        let web_ring = web_ring(&offsets[0], &offsets[1])?;
        let (bottom, top) = params.cut_range(boundary);
        let webpos_abs = start + self.webpos * self.flangewidth;
        let web_box = chordwise_box(
            webpos_abs - self.webthickness / 2.0,
            webpos_abs + self.webthickness / 2.0,
            bottom,
            top,
        );
        let web = web_box.intersection(&web_ring.to_polygon());

        let fill = FillGeometry::new()
            .with(MultiPolygon::new(flanges), Part::Flange)
            .with(web, Part::Web);
        Ok((boundary.clone(), fill))
    }
}

/// Fails unless `[start, end]` is a non-empty interval inside the
/// boundary's chordwise bounds.
pub(crate) fn check_chordwise_span(boundary: &Ring, start: f64, end: f64) -> Result<()> {
    if end <= start {
        return Err(GeometryError::ParameterOutOfRange {
            parameter: "width",
            value: end - start,
            min: 0.0,
            max: f64::INFINITY,
        }
        .into());
    }
    let (min, max) = boundary.bounds();
    if start < min.x || end > max.x {
        return Err(GeometryError::FlangeTooWide {
            start,
            end,
            min: min.x,
            max: max.x,
        }
        .into());
    }
    Ok(())
}

/// Closes the two flange offset lines into the ring the web is cut from,
/// joining the ends that lie chordwise closest.
fn web_ring(line1: &[Point2], line2: &[Point2]) -> Result<Ring> {
    let (Some(l1_start), Some(l2_start), Some(l2_end)) =
        (line1.first(), line2.first(), line2.last())
    else {
        return Err(GeometryError::Degenerate("empty flange offset line".into()).into());
    };
    let to_l2_end = (l1_start.x - l2_end.x).abs();
    let to_l2_start = (l1_start.x - l2_start.x).abs();

    if to_l2_end < to_l2_start {
        Ring::new(line2.iter().chain(line1).copied())
    } else {
        Ring::new(line1.iter().rev().chain(line2).copied())
    }
}
