use geo::{Geometry, Polygon};
use tracing::trace;

use super::Ring;
use crate::error::{GeometryError, Result};
use crate::math::integrals::{self, RingIntegrals};
use crate::math::{Point2, TOLERANCE};

/// Simple polygon with optional holes; every ring is clockwise.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub exterior: Ring,
    pub holes: Vec<Ring>,
}

impl Region {
    /// Creates a region without holes.
    #[must_use]
    pub fn solid(exterior: Ring) -> Self {
        Self {
            exterior,
            holes: Vec::new(),
        }
    }

    /// Converts a `geo` polygon, canonicalizing every ring to clockwise.
    ///
    /// Returns `Ok(None)` for zero-area slivers left behind by boolean
    /// operations. Zero-area holes are dropped the same way.
    ///
    /// # Errors
    ///
    /// Returns an error if a ring cannot be built.
    pub fn from_polygon(polygon: &Polygon<f64>) -> Result<Option<Self>> {
        if is_sliver(polygon.exterior()) {
            return Ok(None);
        }
        let exterior = Ring::from_line_string(polygon.exterior())?;
        let holes = polygon
            .interiors()
            .iter()
            .filter(|hole| !is_sliver(hole))
            .map(Ring::from_line_string)
            .collect::<Result<Vec<_>>>()?;
        Ok(Some(Self { exterior, holes }))
    }

    /// Returns a copy with `refpoint` subtracted from every vertex.
    #[must_use]
    pub fn shifted(&self, refpoint: &Point2) -> Self {
        Self {
            exterior: self.exterior.shifted(refpoint),
            holes: self.holes.iter().map(|h| h.shifted(refpoint)).collect(),
        }
    }

    /// Exterior-minus-holes integral properties about the origin.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::WindingMismatch` if a ring lost its winding.
    pub fn integrals(&self) -> Result<RingIntegrals> {
        integrals::composite(
            self.exterior.points(),
            self.holes.iter().map(Ring::points),
            RingIntegrals::of,
        )
    }

    /// Net area.
    ///
    /// # Errors
    ///
    /// Same as [`Region::integrals`].
    pub fn area(&self) -> Result<f64> {
        integrals::composite(
            self.exterior.points(),
            self.holes.iter().map(Ring::points),
            integrals::area,
        )
    }

    /// `geo` polygon of this region.
    #[must_use]
    pub fn to_polygon(&self) -> Polygon<f64> {
        Polygon::new(
            self.exterior.to_line_string(),
            self.holes.iter().map(Ring::to_line_string).collect(),
        )
    }
}

fn is_sliver(ring: &geo::LineString<f64>) -> bool {
    let pts: Vec<Point2> = ring.coords().map(|c| Point2::new(c.x, c.y)).collect();
    integrals::area(&pts).abs() < TOLERANCE
}

/// Decomposes a fill geometry into polygon regions.
///
/// Collections are flattened recursively; rectangles and triangles are
/// treated as polygons.
///
/// # Errors
///
/// Returns `GeometryError::UnsupportedShape` naming the offending kind for
/// points and lines.
pub fn regions_from_geometry(geometry: &Geometry<f64>) -> Result<Vec<Region>> {
    let polygons: Vec<Polygon<f64>> = match geometry {
        Geometry::Polygon(polygon) => vec![polygon.clone()],
        Geometry::MultiPolygon(multi) => multi.0.clone(),
        Geometry::Rect(rect) => vec![rect.to_polygon()],
        Geometry::Triangle(triangle) => vec![triangle.to_polygon()],
        Geometry::GeometryCollection(collection) => {
            let mut regions = Vec::new();
            for member in &collection.0 {
                regions.extend(regions_from_geometry(member)?);
            }
            return Ok(regions);
        }
        Geometry::Point(_) => return Err(GeometryError::UnsupportedShape("Point").into()),
        Geometry::Line(_) => return Err(GeometryError::UnsupportedShape("Line").into()),
        Geometry::LineString(_) => {
            return Err(GeometryError::UnsupportedShape("LineString").into())
        }
        Geometry::MultiPoint(_) => {
            return Err(GeometryError::UnsupportedShape("MultiPoint").into())
        }
        Geometry::MultiLineString(_) => {
            return Err(GeometryError::UnsupportedShape("MultiLineString").into())
        }
    };

    let mut regions = Vec::with_capacity(polygons.len());
    for polygon in &polygons {
        match Region::from_polygon(polygon)? {
            Some(region) => regions.push(region),
            None => trace!("dropping zero-area sliver"),
        }
    }
    Ok(regions)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;
    use geo::{coord, GeometryCollection, LineString, Rect};

    use super::*;

    fn square(half: f64) -> Ring {
        Ring::new([
            Point2::new(-half, -half),
            Point2::new(-half, half),
            Point2::new(half, half),
            Point2::new(half, -half),
        ])
        .unwrap()
    }

    #[test]
    fn square_with_hole_area() {
        let region = Region {
            exterior: square(5.0),
            holes: vec![square(2.0)],
        };
        assert_relative_eq!(region.area().unwrap(), 84.0, epsilon = 1e-12);
    }

    #[test]
    fn geo_polygon_holes_become_clockwise() {
        // geo convention: counter-clockwise exterior, clockwise hole; we
        // hand it the opposite to check both get canonicalized
        let polygon = Polygon::new(
            square(5.0).to_line_string(),
            vec![LineString::from(vec![
                (-2.0, -2.0),
                (2.0, -2.0),
                (2.0, 2.0),
                (-2.0, 2.0),
                (-2.0, -2.0),
            ])],
        );
        let region = Region::from_polygon(&polygon).unwrap().unwrap();
        assert!(region.holes[0].signed_area() < 0.0);
        assert_relative_eq!(region.area().unwrap(), 84.0, epsilon = 1e-12);
    }

    #[test]
    fn collections_are_flattened() {
        let rect = Rect::new(coord! { x: 0.0, y: 0.0 }, coord! { x: 1.0, y: 2.0 });
        let geometry = Geometry::GeometryCollection(GeometryCollection(vec![
            Geometry::Rect(rect),
            Geometry::Polygon(square(1.0).to_polygon()),
        ]));
        let regions = regions_from_geometry(&geometry).unwrap();
        assert_eq!(regions.len(), 2);
        assert_relative_eq!(regions[0].area().unwrap(), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn line_geometry_is_rejected() {
        let geometry = Geometry::LineString(LineString::from(vec![(0.0, 0.0), (1.0, 0.0)]));
        let err = regions_from_geometry(&geometry).unwrap_err();
        assert!(err.to_string().contains("LineString"));
    }

    #[test]
    fn shifted_region_moves_centroid() {
        let region = Region::solid(square(1.0)).shifted(&Point2::new(1.0, -2.0));
        let c = region.integrals().unwrap().centroid().unwrap();
        assert_relative_eq!(c.x, -1.0, epsilon = 1e-12);
        assert_relative_eq!(c.y, 2.0, epsilon = 1e-12);
    }
}
