use tracing::debug;

use crate::error::{GeometryError, Result};
use crate::math::{Point2, Vector2, TOLERANCE};
use crate::section::Section;

/// Total mass and center of gravity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MassProperties {
    pub mass: f64,
    pub center_of_gravity: Point2,
}

/// Running sum of point masses.
#[derive(Debug, Clone, Copy)]
pub struct MassAccumulator {
    mass: f64,
    moment: Vector2,
}

impl Default for MassAccumulator {
    fn default() -> Self {
        Self {
            mass: 0.0,
            moment: Vector2::zeros(),
        }
    }
}

impl MassAccumulator {
    /// Adds `mass` located at `position`.
    pub fn add(&mut self, mass: f64, position: Point2) {
        self.mass += mass;
        self.moment += position.coords * mass;
    }

    #[must_use]
    pub fn mass(&self) -> f64 {
        self.mass
    }

    /// Mass-weighted mean position.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::Degenerate` if no mass was added.
    pub fn finish(self) -> Result<MassProperties> {
        if self.mass.abs() < TOLERANCE {
            return Err(GeometryError::Degenerate("total mass is zero".into()).into());
        }
        Ok(MassProperties {
            mass: self.mass,
            center_of_gravity: Point2::from(self.moment / self.mass),
        })
    }

    /// Like [`MassAccumulator::finish`], but zero mass yields a massless
    /// result at the origin.
    #[must_use]
    pub fn finish_or_empty(self) -> MassProperties {
        self.finish().unwrap_or(MassProperties {
            mass: 0.0,
            center_of_gravity: Point2::origin(),
        })
    }
}

/// Mass and center of gravity of a whole section.
#[derive(Debug)]
pub struct MassAnalysis<'a> {
    section: &'a Section,
}

impl<'a> MassAnalysis<'a> {
    #[must_use]
    pub fn new(section: &'a Section) -> Self {
        Self { section }
    }

    /// Sums the density-weighted fill of every feature.
    ///
    /// # Errors
    ///
    /// - `GeometryError::Degenerate` if the section has no mass
    /// - material or shape errors from a feature's fill geometry
    pub fn execute(&self) -> Result<MassProperties> {
        let mut accumulator = MassAccumulator::default();
        for snapshot in self.section.snapshots() {
            let feature = self.section.feature(snapshot.id)?;
            let properties = feature.mass_properties(&snapshot.fill)?;
            accumulator.add(properties.mass, properties.center_of_gravity);
        }
        let result = accumulator.finish()?;
        debug!(
            mass = result.mass,
            cg_x = result.center_of_gravity.x,
            cg_y = result.center_of_gravity.y,
            "mass analysis"
        );
        Ok(result)
    }
}
