//! Cross-section builder.
//!
//! A [`Section`] owns an immutable outer boundary and an ordered list of
//! [`Feature`]s. Each feature carves the boundary left by its predecessor,
//! so the whole chain is rebuilt after every mutation. The rebuilt chain is
//! kept as one snapshot per feature and replaced as a whole.

pub mod box_spar;
pub mod feature;
pub mod ispar;
pub mod layer;
pub mod material;
pub mod params;
pub mod reinforcement;

pub use box_spar::BoxSpar;
pub use feature::{Feature, FillGeometry, FillPart};
pub use ispar::ISpar;
pub use layer::Layer;
pub use material::{Material, MaterialSpec, Part};
pub use params::GeometryParams;
pub use reinforcement::Reinforcement;

use std::sync::Arc;

use slotmap::SlotMap;
use tracing::{debug, trace, warn};

use crate::error::{Result, StructureError};
use crate::geometry::Ring;
use crate::math::integrals::{self, RingIntegrals};
use crate::math::Point2;

slotmap::new_key_type! {
    /// Handle of a feature inside a [`Section`].
    pub struct FeatureId;
}

/// Boundaries and fill of one feature after the last recompute.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureSnapshot {
    pub id: FeatureId,
    /// Boundary the feature was applied to.
    pub exterior: Ring,
    /// Boundary handed to the next feature.
    pub interior: Ring,
    pub fill: FillGeometry,
}

/// One polygon of exported fill geometry with its material.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportedRegion {
    pub exterior: Ring,
    pub holes: Vec<Ring>,
    pub material: Arc<Material>,
}

impl ExportedRegion {
    /// Integral properties of the region about the export reference point.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::WindingMismatch` if a ring is not clockwise.
    pub fn integrals(&self) -> Result<RingIntegrals> {
        integrals::composite(
            self.exterior.points(),
            self.holes.iter().map(Ring::points),
            RingIntegrals::of,
        )
    }
}

/// Wing cross-section built from an outer boundary and a feature chain.
#[derive(Debug, Clone)]
pub struct Section {
    outer: Ring,
    params: GeometryParams,
    features: SlotMap<FeatureId, Feature>,
    order: Vec<FeatureId>,
    cache: Vec<FeatureSnapshot>,
}

impl Section {
    /// Creates an empty section from the outer boundary points.
    ///
    /// # Errors
    ///
    /// Returns an error if the points do not form a valid ring.
    pub fn new(outer: impl IntoIterator<Item = Point2>) -> Result<Self> {
        Self::with_params(outer, GeometryParams::default())
    }

    /// Creates an empty section using custom geometry parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if the points do not form a valid ring.
    pub fn with_params(
        outer: impl IntoIterator<Item = Point2>,
        params: GeometryParams,
    ) -> Result<Self> {
        Ok(Self {
            outer: Ring::new(outer)?,
            params,
            features: SlotMap::with_key(),
            order: Vec::new(),
            cache: Vec::new(),
        })
    }

    // --- Mutations ---

    /// Appends a feature to the end of the chain.
    ///
    /// # Errors
    ///
    /// Returns the feature's geometry or material error. The section is
    /// left unchanged on failure.
    pub fn append(&mut self, feature: impl Into<Feature>) -> Result<FeatureId> {
        let index = self.order.len();
        self.insert(index, feature)
    }

    /// Inserts a feature at `index` in the chain.
    ///
    /// # Errors
    ///
    /// - `StructureError::IndexOutOfBounds` if `index > len`
    /// - the geometry or material error of any feature in the rebuilt chain
    pub fn insert(&mut self, index: usize, feature: impl Into<Feature>) -> Result<FeatureId> {
        if index > self.order.len() {
            return Err(StructureError::IndexOutOfBounds {
                index,
                len: self.order.len(),
            }
            .into());
        }
        let id = self.features.insert(feature.into());
        let mut order = self.order.clone();
        order.insert(index, id);
        if let Err(err) = self.rebuild(order) {
            self.features.remove(id);
            return Err(err);
        }
        Ok(id)
    }

    /// Appends several features with a single recompute.
    ///
    /// # Errors
    ///
    /// Returns the first failing feature's error; none of the features is
    /// added in that case.
    pub fn extend<I>(&mut self, features: I) -> Result<Vec<FeatureId>>
    where
        I: IntoIterator,
        I::Item: Into<Feature>,
    {
        let ids: Vec<FeatureId> = features
            .into_iter()
            .map(|feature| self.features.insert(feature.into()))
            .collect();
        let mut order = self.order.clone();
        order.extend_from_slice(&ids);
        if let Err(err) = self.rebuild(order) {
            for id in &ids {
                self.features.remove(*id);
            }
            return Err(err);
        }
        Ok(ids)
    }

    /// Removes a feature and returns it.
    ///
    /// # Errors
    ///
    /// - `StructureError::FeatureNotFound` for an unknown handle
    /// - the error of a remaining feature that no longer fits
    pub fn remove(&mut self, id: FeatureId) -> Result<Feature> {
        if !self.features.contains_key(id) {
            return Err(StructureError::FeatureNotFound(id).into());
        }
        let order = self.order.iter().copied().filter(|&k| k != id).collect();
        self.rebuild(order)?;
        self.features
            .remove(id)
            .ok_or_else(|| StructureError::FeatureNotFound(id).into())
    }

    /// Removes the last feature of the chain.
    ///
    /// # Errors
    ///
    /// Same as [`Section::remove`].
    pub fn pop(&mut self) -> Result<Option<Feature>> {
        match self.order.last() {
            Some(&id) => self.remove(id).map(Some),
            None => Ok(None),
        }
    }

    /// Changes a feature's parameters and recomputes the chain.
    ///
    /// The closure works on a copy; the copy replaces the stored feature
    /// only if the whole chain still builds.
    ///
    /// # Errors
    ///
    /// - `StructureError::UntrackedFeature` if `id` does not belong to this
    ///   section
    /// - the geometry or material error of the rebuilt chain
    pub fn update<F>(&mut self, id: FeatureId, change: F) -> Result<()>
    where
        F: FnOnce(&mut Feature),
    {
        let mut candidate = self
            .features
            .get(id)
            .cloned()
            .ok_or(StructureError::UntrackedFeature(id))?;
        change(&mut candidate);

        let previous = std::mem::replace(&mut self.features[id], candidate);
        if let Err(err) = self.rebuild(self.order.clone()) {
            self.features[id] = previous;
            return Err(err);
        }
        Ok(())
    }

    /// Rebuilds the whole chain from the current features.
    ///
    /// # Errors
    ///
    /// Returns the first failing feature's error; the cache is kept.
    pub fn recompute(&mut self) -> Result<()> {
        self.rebuild(self.order.clone())
    }

    /// Builds the cache for `order` and commits both on success.
    fn rebuild(&mut self, order: Vec<FeatureId>) -> Result<()> {
        match self.build_cache(&order) {
            Ok(cache) => {
                debug!(
                    features = order.len(),
                    inner_vertices = cache.last().map_or(self.outer.len(), |s| s.interior.len()),
                    "section recomputed"
                );
                self.order = order;
                self.cache = cache;
                Ok(())
            }
            Err(err) => {
                warn!(%err, "section rebuild failed, keeping previous features");
                Err(err)
            }
        }
    }

    fn build_cache(&self, order: &[FeatureId]) -> Result<Vec<FeatureSnapshot>> {
        let mut cache = Vec::with_capacity(order.len());
        let mut boundary = self.outer.clone();
        for &id in order {
            let feature = self
                .features
                .get(id)
                .ok_or(StructureError::FeatureNotFound(id))?;
            let (interior, fill) = feature.apply(&boundary, &self.params)?;
            integrals::ensure_clockwise(interior.points())?;
            trace!(
                kind = feature.kind(),
                vertices = interior.len(),
                fill_area = fill.area(),
                "feature applied"
            );
            cache.push(FeatureSnapshot {
                id,
                exterior: std::mem::replace(&mut boundary, interior.clone()),
                interior,
                fill,
            });
        }
        Ok(cache)
    }

    // --- Accessors ---

    /// Number of features in the chain.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Feature at chain position `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Feature> {
        self.order.get(index).and_then(|&id| self.features.get(id))
    }

    /// Looks up a feature by handle.
    ///
    /// # Errors
    ///
    /// Returns `StructureError::FeatureNotFound` for an unknown handle.
    pub fn feature(&self, id: FeatureId) -> Result<&Feature> {
        self.features
            .get(id)
            .ok_or_else(|| StructureError::FeatureNotFound(id).into())
    }

    /// Feature handles in chain order.
    #[must_use]
    pub fn ids(&self) -> &[FeatureId] {
        &self.order
    }

    /// Features in chain order.
    pub fn features(&self) -> impl Iterator<Item = &Feature> + '_ {
        self.order.iter().filter_map(|&id| self.features.get(id))
    }

    #[must_use]
    pub fn params(&self) -> &GeometryParams {
        &self.params
    }

    #[must_use]
    pub fn outer_boundary(&self) -> &Ring {
        &self.outer
    }

    /// Boundary left after the last feature.
    #[must_use]
    pub fn inner_boundary(&self) -> &Ring {
        self.cache.last().map_or(&self.outer, |s| &s.interior)
    }

    /// Cached boundaries and fill of one feature.
    ///
    /// # Errors
    ///
    /// Returns `StructureError::FeatureNotFound` for an unknown handle.
    pub fn snapshot(&self, id: FeatureId) -> Result<&FeatureSnapshot> {
        self.cache
            .iter()
            .find(|s| s.id == id)
            .ok_or_else(|| StructureError::FeatureNotFound(id).into())
    }

    /// Cached snapshots in chain order.
    #[must_use]
    pub fn snapshots(&self) -> &[FeatureSnapshot] {
        &self.cache
    }

    // --- Export ---

    /// Flattens all fill geometry into clockwise regions, shifted so that
    /// `refpoint` becomes the origin.
    ///
    /// # Errors
    ///
    /// - `GeometryError::UnsupportedShape` for non-polygon fill geometry
    /// - `MaterialError::CompositeNotSupported` for a flange/web mapping on
    ///   a whole-feature fill
    pub fn export_geometry(&self, refpoint: &Point2) -> Result<Vec<ExportedRegion>> {
        let mut exported = Vec::new();
        for snapshot in &self.cache {
            let feature = self.feature(snapshot.id)?;
            for (region, part) in snapshot.fill.regions()? {
                let material = feature.material().resolve(part, feature.kind())?;
                let region = region.shifted(refpoint);
                integrals::ensure_clockwise(region.exterior.points())?;
                exported.push(ExportedRegion {
                    exterior: region.exterior,
                    holes: region.holes,
                    material: Arc::clone(material),
                });
            }
        }
        Ok(exported)
    }
}
