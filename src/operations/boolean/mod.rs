//! Polygon booleans.
//!
//! Area booleans (difference, intersection) are delegated to
//! [`geo::BooleanOps`]; this module only adds the chordwise helpers the
//! section features need on top of it.

mod slab_clip;

use geo::{coord, BooleanOps, BoundingRect, MultiPolygon, Polygon, Rect};

pub use slab_clip::SlabClip;

/// Axis-aligned box spanning `[low, high]` chordwise and `[bottom, top]`
/// transversely.
#[must_use]
pub fn chordwise_box(low: f64, high: f64, bottom: f64, top: f64) -> Polygon<f64> {
    Rect::new(coord! { x: low, y: bottom }, coord! { x: high, y: top }).to_polygon()
}

/// Subtracts every polygon in `cutters` from `base`, one after another.
#[must_use]
pub fn subtract_all<'a>(
    base: MultiPolygon<f64>,
    cutters: impl IntoIterator<Item = &'a Polygon<f64>>,
) -> MultiPolygon<f64> {
    cutters
        .into_iter()
        .fold(base, |remaining, cutter| {
            remaining.difference(&MultiPolygon::new(vec![cutter.clone()]))
        })
}

/// The polygon with the largest area, if any.
#[must_use]
pub fn largest_polygon(multi: &MultiPolygon<f64>) -> Option<&Polygon<f64>> {
    use geo::Area;
    multi
        .0
        .iter()
        .max_by(|a, b| a.unsigned_area().total_cmp(&b.unsigned_area()))
}

/// Transverse extent `(bottom, top)` of a multipolygon.
#[must_use]
pub fn transverse_extent(multi: &MultiPolygon<f64>) -> Option<(f64, f64)> {
    multi.bounding_rect().map(|rect| (rect.min().y, rect.max().y))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;
    use geo::Area;

    use super::*;

    #[test]
    fn subtract_two_strips_from_box() {
        let base = MultiPolygon::new(vec![chordwise_box(0.0, 10.0, 0.0, 10.0)]);
        let cutters = [
            chordwise_box(0.0, 10.0, 0.0, 1.0),
            chordwise_box(0.0, 10.0, 9.0, 10.0),
        ];
        let rest = subtract_all(base, &cutters);
        assert_relative_eq!(rest.unsigned_area(), 80.0, epsilon = 1e-9);
        let (bottom, top) = transverse_extent(&rest).unwrap();
        assert_relative_eq!(bottom, 1.0, epsilon = 1e-9);
        assert_relative_eq!(top, 9.0, epsilon = 1e-9);
    }

    #[test]
    fn largest_polygon_of_split_box() {
        let base = MultiPolygon::new(vec![chordwise_box(0.0, 10.0, 0.0, 1.0)]);
        let rest = subtract_all(base, [&chordwise_box(2.0, 3.0, -1.0, 2.0)]);
        assert_eq!(rest.0.len(), 2);
        assert_relative_eq!(
            largest_polygon(&rest).unwrap().unsigned_area(),
            7.0,
            epsilon = 1e-9
        );
    }
}
