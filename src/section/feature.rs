use geo::{Area, Geometry, MultiPolygon};

use super::material::{MaterialSpec, Part};
use super::{BoxSpar, GeometryParams, ISpar, Layer, Reinforcement};
use crate::analysis::{MassAccumulator, MassProperties};
use crate::error::{MaterialError, Result};
use crate::geometry::{regions_from_geometry, Region, Ring};
use crate::math::TOLERANCE;

/// One structural element of a section.
///
/// Each variant consumes the boundary left by its predecessors and returns
/// the boundary for its successors together with the geometry it fills.
#[derive(Debug, Clone, PartialEq)]
pub enum Feature {
    Layer(Layer),
    Reinforcement(Reinforcement),
    ISpar(ISpar),
    BoxSpar(BoxSpar),
}

impl Feature {
    /// Variant name used in error messages and logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Layer(_) => "Layer",
            Self::Reinforcement(_) => "Reinforcement",
            Self::ISpar(_) => "ISpar",
            Self::BoxSpar(_) => "BoxSpar",
        }
    }

    #[must_use]
    pub fn material(&self) -> &MaterialSpec {
        match self {
            Self::Layer(layer) => layer.material(),
            Self::Reinforcement(reinforcement) => reinforcement.material(),
            Self::ISpar(spar) => spar.material(),
            Self::BoxSpar(spar) => spar.material(),
        }
    }

    /// Carves `boundary`, returning the next boundary and the fill geometry.
    ///
    /// # Errors
    ///
    /// Returns a geometry error if the feature does not fit the boundary,
    /// or a material error if a single-material feature was given a
    /// flange/web mapping.
    pub fn apply(
        &self,
        boundary: &Ring,
        params: &GeometryParams,
    ) -> Result<(Ring, FillGeometry)> {
        if matches!(self, Self::Layer(_) | Self::Reinforcement(_)) && self.material().is_composite()
        {
            return Err(MaterialError::CompositeNotSupported {
                feature: self.kind(),
            }
            .into());
        }
        match self {
            Self::Layer(layer) => layer.apply(boundary, params),
            Self::Reinforcement(reinforcement) => reinforcement.apply(boundary, params),
            Self::ISpar(spar) => spar.apply(boundary, params),
            Self::BoxSpar(spar) => spar.apply(boundary, params),
        }
    }

    /// Mass and density-weighted centroid of the given fill geometry.
    ///
    /// A flange/web material mapping weights each part with its own
    /// density. A feature without fill area has zero mass at the origin.
    ///
    /// # Errors
    ///
    /// Returns a material error for mismatched material shapes, or a
    /// geometry error if the fill cannot be decomposed into polygons.
    pub fn mass_properties(&self, fill: &FillGeometry) -> Result<MassProperties> {
        let mut accumulator = MassAccumulator::default();
        for (region, part) in fill.regions()? {
            let density = self.material().resolve(part, self.kind())?.density;
            let integrals = region.integrals()?;
            if integrals.area.abs() > TOLERANCE {
                accumulator.add(integrals.area * density, integrals.centroid()?);
            }
        }
        Ok(accumulator.finish_or_empty())
    }

    #[must_use]
    pub fn as_layer_mut(&mut self) -> Option<&mut Layer> {
        match self {
            Self::Layer(layer) => Some(layer),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_reinforcement_mut(&mut self) -> Option<&mut Reinforcement> {
        match self {
            Self::Reinforcement(reinforcement) => Some(reinforcement),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_ispar_mut(&mut self) -> Option<&mut ISpar> {
        match self {
            Self::ISpar(spar) => Some(spar),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_box_spar_mut(&mut self) -> Option<&mut BoxSpar> {
        match self {
            Self::BoxSpar(spar) => Some(spar),
            _ => None,
        }
    }
}

impl From<Layer> for Feature {
    fn from(layer: Layer) -> Self {
        Self::Layer(layer)
    }
}

impl From<Reinforcement> for Feature {
    fn from(reinforcement: Reinforcement) -> Self {
        Self::Reinforcement(reinforcement)
    }
}

impl From<ISpar> for Feature {
    fn from(spar: ISpar) -> Self {
        Self::ISpar(spar)
    }
}

impl From<BoxSpar> for Feature {
    fn from(spar: BoxSpar) -> Self {
        Self::BoxSpar(spar)
    }
}

/// A piece of fill geometry tagged with the part it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct FillPart {
    pub geometry: Geometry<f64>,
    pub part: Part,
}

/// Everything a feature occupies, in a fixed part order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FillGeometry {
    parts: Vec<FillPart>,
}

impl FillGeometry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one part; parts are exported in insertion order.
    #[must_use]
    pub fn with(mut self, geometry: impl Into<Geometry<f64>>, part: Part) -> Self {
        self.parts.push(FillPart {
            geometry: geometry.into(),
            part,
        });
        self
    }

    #[must_use]
    pub fn parts(&self) -> &[FillPart] {
        &self.parts
    }

    /// Polygon regions of every part, with their part tag.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::UnsupportedShape` for non-polygon parts.
    pub fn regions(&self) -> Result<Vec<(Region, Part)>> {
        let mut regions = Vec::new();
        for fill_part in &self.parts {
            for region in regions_from_geometry(&fill_part.geometry)? {
                regions.push((region, fill_part.part));
            }
        }
        Ok(regions)
    }

    /// Total unsigned area of one part kind.
    #[must_use]
    pub fn part_area(&self, part: Part) -> f64 {
        self.parts
            .iter()
            .filter(|p| p.part == part)
            .map(|p| p.geometry.unsigned_area())
            .sum()
    }

    /// Total unsigned area.
    #[must_use]
    pub fn area(&self) -> f64 {
        self.parts.iter().map(|p| p.geometry.unsigned_area()).sum()
    }
}

impl From<MultiPolygon<f64>> for FillGeometry {
    fn from(multi: MultiPolygon<f64>) -> Self {
        Self::new().with(multi, Part::Whole)
    }
}
