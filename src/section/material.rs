use std::sync::Arc;

use crate::error::{MaterialError, Result};

/// Bulk material record supplied by an external material model.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    /// Density ρ.
    pub density: f64,
    /// Elastic modulus E.
    pub elastic_modulus: f64,
}

impl Material {
    #[must_use]
    pub fn new(density: f64, elastic_modulus: f64) -> Self {
        Self {
            density,
            elastic_modulus,
        }
    }
}

/// Sub-region of a feature's fill geometry, selecting its material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Part {
    /// The whole fill of a single-material feature.
    Whole,
    Flange,
    Web,
}

/// Material assignment of a feature.
#[derive(Debug, Clone, PartialEq)]
pub enum MaterialSpec {
    /// One material for every part.
    Uniform(Arc<Material>),
    /// Separate flange and web materials (spars only).
    Composite {
        flange: Arc<Material>,
        web: Arc<Material>,
    },
}

impl MaterialSpec {
    /// Builds a flange/web mapping from keyed entries.
    ///
    /// # Errors
    ///
    /// - `MaterialError::UnknownPart` for keys other than `flange` and `web`
    /// - `MaterialError::MissingPart` if either key is absent
    pub fn from_parts<K: AsRef<str>>(
        entries: impl IntoIterator<Item = (K, Arc<Material>)>,
    ) -> Result<Self> {
        let mut flange = None;
        let mut web = None;
        for (key, material) in entries {
            match key.as_ref() {
                "flange" => flange = Some(material),
                "web" => web = Some(material),
                other => return Err(MaterialError::UnknownPart(other.to_owned()).into()),
            }
        }
        Ok(Self::Composite {
            flange: flange.ok_or(MaterialError::MissingPart("flange"))?,
            web: web.ok_or(MaterialError::MissingPart("web"))?,
        })
    }

    #[must_use]
    pub fn is_composite(&self) -> bool {
        matches!(self, Self::Composite { .. })
    }

    /// Material of one fill part.
    ///
    /// # Errors
    ///
    /// Returns `MaterialError::CompositeNotSupported` when a flange/web
    /// mapping is asked for a whole-feature material.
    pub fn resolve(&self, part: Part, feature: &'static str) -> Result<&Arc<Material>> {
        match (self, part) {
            (Self::Uniform(material), _) => Ok(material),
            (Self::Composite { flange, .. }, Part::Flange) => Ok(flange),
            (Self::Composite { web, .. }, Part::Web) => Ok(web),
            (Self::Composite { .. }, Part::Whole) => {
                Err(MaterialError::CompositeNotSupported { feature }.into())
            }
        }
    }
}

impl From<Material> for MaterialSpec {
    fn from(material: Material) -> Self {
        Self::Uniform(Arc::new(material))
    }
}

impl From<Arc<Material>> for MaterialSpec {
    fn from(material: Arc<Material>) -> Self {
        Self::Uniform(material)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::error::SectionError;

    fn carbon() -> Arc<Material> {
        Arc::new(Material::new(1600.0, 70e9))
    }

    fn foam() -> Arc<Material> {
        Arc::new(Material::new(60.0, 50e6))
    }

    #[test]
    fn mapping_resolves_parts() {
        let spec = MaterialSpec::from_parts([("web", foam()), ("flange", carbon())]).unwrap();
        assert!(spec.is_composite());
        assert_relative_eq!(spec.resolve(Part::Flange, "ISpar").unwrap().density, 1600.0);
        assert_relative_eq!(spec.resolve(Part::Web, "ISpar").unwrap().density, 60.0);
    }

    #[test]
    fn mapping_without_web_fails() {
        let err = MaterialSpec::from_parts([("flange", carbon())]).unwrap_err();
        assert!(matches!(
            err,
            SectionError::Material(MaterialError::MissingPart("web"))
        ));
    }

    #[test]
    fn mapping_with_unknown_key_fails() {
        let err = MaterialSpec::from_parts([("flange", carbon()), ("core", foam())]).unwrap_err();
        assert!(err.to_string().contains("core"));
    }

    #[test]
    fn uniform_material_serves_every_part() {
        let spec = MaterialSpec::from(carbon());
        assert!(spec.resolve(Part::Web, "ISpar").is_ok());
        assert!(spec.resolve(Part::Whole, "Layer").is_ok());
    }

    #[test]
    fn composite_rejected_for_whole_part() {
        let spec = MaterialSpec::Composite {
            flange: carbon(),
            web: foam(),
        };
        assert!(spec.resolve(Part::Whole, "Layer").is_err());
    }
}
