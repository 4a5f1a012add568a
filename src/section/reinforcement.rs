use geo::{MultiPolygon, Polygon};

use super::feature::FillGeometry;
use super::layer::{check_thickness, Layer};
use super::material::{MaterialSpec, Part};
use super::GeometryParams;
use crate::error::{GeometryError, Result};
use crate::geometry::Ring;
use crate::operations::boolean::{largest_polygon, subtract_all};
use crate::operations::{OffsetBox, OffsetSide, RefineSeams, SlabClip};

/// Local reinforcement: a layer limited to a chordwise interval.
#[derive(Debug, Clone, PartialEq)]
pub struct Reinforcement {
    material: MaterialSpec,
    thickness: f64,
    low: f64,
    high: f64,
}

impl Reinforcement {
    /// Creates a reinforcement of `thickness` over `low <= x <= high`.
    #[must_use]
    pub fn new(material: impl Into<MaterialSpec>, thickness: f64, low: f64, high: f64) -> Self {
        Self {
            material: material.into(),
            thickness,
            low,
            high,
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

    /// Chordwise limits `(low, high)`.
    #[must_use]
    pub fn limits(&self) -> (f64, f64) {
        (self.low, self.high)
    }

    pub fn set_thickness(&mut self, thickness: f64) {
        self.thickness = thickness;
    }

    pub fn set_limits(&mut self, low: f64, high: f64) {
        self.low = low;
        self.high = high;
    }

    pub(crate) fn apply(
        &self,
        boundary: &Ring,
        params: &GeometryParams,
    ) -> Result<(Ring, FillGeometry)> {
        check_thickness(self.thickness)?;
        if self.low >= self.high {
            return Err(GeometryError::ParameterOutOfRange {
                parameter: "low",
                value: self.low,
                min: f64::NEG_INFINITY,
                max: self.high,
            }
            .into());
        }

        let (min, max) = boundary.bounds();
        if self.low <= min.x && self.high >= max.x {
            // The interval covers the whole boundary: plain layer.
            return Layer::new(self.material.clone(), self.thickness).apply(boundary, params);
        }

        let pieces = SlabClip::new(boundary, self.low, self.high).execute()?;
        if pieces.is_empty() {
            return Err(GeometryError::Degenerate(format!(
                "reinforcement interval [{}, {}] misses the boundary [{}, {}]",
                self.low, self.high, min.x, max.x
            ))
            .into());
        }

        let side = OffsetSide::inside_of(boundary.signed_area());
        let strips = pieces
            .iter()
            .map(|piece| {
                OffsetBox::new(piece, self.thickness, side)
                    .with_miter_limit(params.miter_limit)
                    .execute()
                    .map(|ring| ring.to_polygon())
            })
            .collect::<Result<Vec<Polygon<f64>>>>()?;

        let remaining = subtract_all(MultiPolygon::new(vec![boundary.to_polygon()]), &strips);
        let outer = largest_polygon(&remaining).ok_or_else(|| {
            GeometryError::Degenerate("reinforcement consumes the whole boundary".into())
        })?;
        let interior = Ring::from_line_string(outer.exterior())?;
        let interior = RefineSeams::new(&interior, params.seam_tolerance).execute()?;

        let fill = FillGeometry::new().with(MultiPolygon::new(strips), Part::Whole);
        Ok((interior, fill))
    }
}
