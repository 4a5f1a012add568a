//! Discrete line integrals over closed polygon rings.
//!
//! All formulas pair each vertex with its cyclic *predecessor*, so a
//! clockwise ring yields a positive area. Every property is taken about the
//! coordinate origin; callers shift coordinates to move the reference point.

use std::ops::{Add, AddAssign, Sub, SubAssign};

use super::polygon_2d::signed_area_2d;
use super::{Point2, TOLERANCE};
use crate::error::{GeometryError, Result};

/// Calls `f(x_i, y_i, x_p, y_p, cross)` for every vertex `i` and its
/// predecessor `p`, where `cross = y_p * x_i - y_i * x_p`.
fn for_each_edge(points: &[Point2], mut f: impl FnMut(f64, f64, f64, f64, f64)) {
    let n = points.len();
    if n < 3 {
        return;
    }
    for i in 0..n {
        let cur = points[i];
        let prev = points[(i + n - 1) % n];
        let cross = prev.y * cur.x - cur.y * prev.x;
        f(cur.x, cur.y, prev.x, prev.y, cross);
    }
}

/// Enclosed area, positive for clockwise rings.
#[must_use]
pub fn area(points: &[Point2]) -> f64 {
    let mut sum = 0.0;
    for_each_edge(points, |_, _, _, _, cross| sum += cross);
    0.5 * sum
}

/// First moments of area `(S_x, S_y)` = `(∫y dA, ∫x dA)`.
#[must_use]
pub fn static_moments(points: &[Point2]) -> (f64, f64) {
    let mut s_x = 0.0;
    let mut s_y = 0.0;
    for_each_edge(points, |x_i, y_i, x_p, y_p, cross| {
        s_x += (y_i + y_p) * cross;
        s_y += (x_i + x_p) * cross;
    });
    (s_x / 6.0, s_y / 6.0)
}

/// Second moments of area `(I_xx, I_yy, I_xy)` = `(∫y² dA, ∫x² dA, ∫xy dA)`.
#[must_use]
pub fn inertia_moments(points: &[Point2]) -> (f64, f64, f64) {
    let mut i_xx = 0.0;
    let mut i_yy = 0.0;
    let mut i_xy = 0.0;
    for_each_edge(points, |x_i, y_i, x_p, y_p, cross| {
        i_xx += (y_i * y_i + y_i * y_p + y_p * y_p) * cross;
        i_yy += (x_i * x_i + x_i * x_p + x_p * x_p) * cross;
        i_xy += (x_i * y_p + 2.0 * x_i * y_i + 2.0 * x_p * y_p + x_p * y_i) * cross;
    });
    (i_xx / 12.0, i_yy / 12.0, i_xy / 24.0)
}

/// Geometric centroid `(S_y / A, S_x / A)` of a single ring.
///
/// # Errors
///
/// Returns `GeometryError::Degenerate` if the ring encloses no area.
pub fn neutral_center(points: &[Point2]) -> Result<Point2> {
    RingIntegrals::of(points).centroid()
}

/// Rotation angle `phi` of the principal axes, `0.5 * atan2(2 I_xy, I_yy - I_xx)`.
///
/// The result is the frame angle itself, not the double angle `2 phi`.
/// Rotating by it with [`rotate_inertia`] makes the product moment vanish.
#[must_use]
pub fn principal_axis_angle(i_xx: f64, i_yy: f64, i_xy: f64) -> f64 {
    0.5 * (2.0 * i_xy).atan2(i_yy - i_xx)
}

/// Transforms `(I_xx, I_yy, I_xy)` into a frame rotated by `phi`.
#[must_use]
pub fn rotate_inertia(i_xx: f64, i_yy: f64, i_xy: f64, phi: f64) -> (f64, f64, f64) {
    let mean = 0.5 * (i_xx + i_yy);
    let half_diff = 0.5 * (i_xx - i_yy);
    let (sin2, cos2) = (2.0 * phi).sin_cos();
    (
        mean + half_diff * cos2 - i_xy * sin2,
        mean - half_diff * cos2 + i_xy * sin2,
        half_diff * sin2 + i_xy * cos2,
    )
}

/// All integral properties of one ring (or a composite of rings).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RingIntegrals {
    pub area: f64,
    pub s_x: f64,
    pub s_y: f64,
    pub i_xx: f64,
    pub i_yy: f64,
    pub i_xy: f64,
}

impl RingIntegrals {
    /// Evaluates every property on a single ring.
    #[must_use]
    pub fn of(points: &[Point2]) -> Self {
        let (s_x, s_y) = static_moments(points);
        let (i_xx, i_yy, i_xy) = inertia_moments(points);
        Self {
            area: area(points),
            s_x,
            s_y,
            i_xx,
            i_yy,
            i_xy,
        }
    }

    /// Area centroid `(S_y / A, S_x / A)`.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::Degenerate` if the area is zero.
    pub fn centroid(&self) -> Result<Point2> {
        if self.area.abs() < TOLERANCE {
            return Err(GeometryError::Degenerate("centroid of a zero-area region".into()).into());
        }
        Ok(Point2::new(self.s_y / self.area, self.s_x / self.area))
    }

    /// Multiplies every property by `factor` (e.g. an elastic modulus).
    #[must_use]
    pub fn scaled(self, factor: f64) -> Self {
        Self {
            area: self.area * factor,
            s_x: self.s_x * factor,
            s_y: self.s_y * factor,
            i_xx: self.i_xx * factor,
            i_yy: self.i_yy * factor,
            i_xy: self.i_xy * factor,
        }
    }
}

impl Add for RingIntegrals {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            area: self.area + rhs.area,
            s_x: self.s_x + rhs.s_x,
            s_y: self.s_y + rhs.s_y,
            i_xx: self.i_xx + rhs.i_xx,
            i_yy: self.i_yy + rhs.i_yy,
            i_xy: self.i_xy + rhs.i_xy,
        }
    }
}

impl AddAssign for RingIntegrals {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for RingIntegrals {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        self + rhs.scaled(-1.0)
    }
}

impl SubAssign for RingIntegrals {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

/// Checks that a ring consumed by the integral formulas is clockwise.
///
/// # Errors
///
/// Returns `GeometryError::WindingMismatch` for counter-clockwise rings.
pub fn ensure_clockwise(points: &[Point2]) -> Result<()> {
    if signed_area_2d(points) > TOLERANCE {
        return Err(GeometryError::WindingMismatch.into());
    }
    Ok(())
}

/// Evaluates `property` on the exterior and subtracts it for every hole.
///
/// Holes must share the exterior's clockwise winding, otherwise their
/// contribution would be added instead of removed.
///
/// # Errors
///
/// Returns `GeometryError::WindingMismatch` if any ring is counter-clockwise.
pub fn composite<'a, T, F>(
    exterior: &[Point2],
    holes: impl IntoIterator<Item = &'a [Point2]>,
    property: F,
) -> Result<T>
where
    T: SubAssign,
    F: Fn(&[Point2]) -> T,
{
    ensure_clockwise(exterior)?;
    let mut value = property(exterior);
    for hole in holes {
        ensure_clockwise(hole)?;
        value -= property(hole);
    }
    Ok(value)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    /// Clockwise axis-aligned rectangle.
    fn rect_cw(x0: f64, y0: f64, x1: f64, y1: f64) -> Vec<Point2> {
        vec![
            Point2::new(x0, y0),
            Point2::new(x0, y1),
            Point2::new(x1, y1),
            Point2::new(x1, y0),
        ]
    }

    #[test]
    fn clockwise_rectangle_area_is_positive() {
        assert_relative_eq!(area(&rect_cw(0.0, 0.0, 3.0, 2.0)), 6.0);
    }

    #[test]
    fn counter_clockwise_area_is_negative() {
        let mut ring = rect_cw(0.0, 0.0, 3.0, 2.0);
        ring.reverse();
        assert_relative_eq!(area(&ring), -6.0);
        assert!(ensure_clockwise(&ring).is_err());
    }

    #[test]
    fn static_moments_of_offset_rectangle() {
        let (s_x, s_y) = static_moments(&rect_cw(1.0, 2.0, 3.0, 6.0));
        // A = 8, centroid (2, 4)
        assert_relative_eq!(s_x, 32.0, epsilon = 1e-12);
        assert_relative_eq!(s_y, 16.0, epsilon = 1e-12);
        let nc = neutral_center(&rect_cw(1.0, 2.0, 3.0, 6.0)).unwrap();
        assert_relative_eq!(nc.x, 2.0, epsilon = 1e-12);
        assert_relative_eq!(nc.y, 4.0, epsilon = 1e-12);
    }

    #[test]
    fn rectangle_inertia_about_centroid() {
        let (w, h) = (0.3, 0.8);
        let (i_xx, i_yy, i_xy) = inertia_moments(&rect_cw(-w / 2.0, -h / 2.0, w / 2.0, h / 2.0));
        assert_relative_eq!(i_xx, w * h.powi(3) / 12.0, epsilon = 1e-14);
        assert_relative_eq!(i_yy, h * w.powi(3) / 12.0, epsilon = 1e-14);
        assert!(i_xy.abs() < 1e-14);
    }

    #[test]
    fn product_moment_of_unit_square_at_origin() {
        let (_, _, i_xy) = inertia_moments(&rect_cw(0.0, 0.0, 1.0, 1.0));
        assert_relative_eq!(i_xy, 0.25, epsilon = 1e-14);
    }

    #[test]
    fn square_with_centered_hole() {
        let exterior = rect_cw(-5.0, -5.0, 5.0, 5.0);
        let hole = rect_cw(-2.0, -2.0, 2.0, 2.0);
        let a = composite(&exterior, [hole.as_slice()], area).unwrap();
        assert_relative_eq!(a, 84.0, epsilon = 1e-12);

        let props = composite(&exterior, [hole.as_slice()], RingIntegrals::of).unwrap();
        assert_relative_eq!(props.i_xx, (10.0f64.powi(4) - 4.0f64.powi(4)) / 12.0, epsilon = 1e-9);
    }

    #[test]
    fn composite_rejects_counter_clockwise_hole() {
        let exterior = rect_cw(-5.0, -5.0, 5.0, 5.0);
        let mut hole = rect_cw(-2.0, -2.0, 2.0, 2.0);
        hole.reverse();
        let result = composite(&exterior, [hole.as_slice()], area);
        assert!(matches!(
            result,
            Err(crate::SectionError::Geometry(GeometryError::WindingMismatch))
        ));
    }

    #[test]
    fn principal_rotation_removes_product_moment() {
        // L-shape, unsymmetric about both axes
        let ring = vec![
            Point2::new(0.0, 0.0),
            Point2::new(0.0, 3.0),
            Point2::new(1.0, 3.0),
            Point2::new(1.0, 1.0),
            Point2::new(2.0, 1.0),
            Point2::new(2.0, 0.0),
        ];
        let props = RingIntegrals::of(&ring);
        let c = props.centroid().unwrap();
        let shifted: Vec<Point2> = ring.iter().map(|p| Point2::from(p - c)).collect();
        let (i_xx, i_yy, i_xy) = inertia_moments(&shifted);
        assert!(i_xy.abs() > 1e-3);

        let phi = principal_axis_angle(i_xx, i_yy, i_xy);
        let (i_u, i_v, i_uv) = rotate_inertia(i_xx, i_yy, i_xy, phi);
        assert!(i_uv.abs() < 1e-12, "product moment after rotation: {i_uv}");
        assert_relative_eq!(i_u + i_v, i_xx + i_yy, epsilon = 1e-12);
    }

    #[test]
    fn principal_angle_is_the_frame_angle() {
        // equal moments with a product term: axes at 45 degrees
        let phi = principal_axis_angle(3.0, 3.0, 1.0);
        assert_relative_eq!(phi, std::f64::consts::FRAC_PI_4, epsilon = 1e-15);
        assert_relative_eq!(principal_axis_angle(2.0, 5.0, 0.0), 0.0);
    }

    #[test]
    fn zero_area_centroid_fails() {
        let line = vec![Point2::new(0.0, 0.0), Point2::new(1.0, 0.0), Point2::new(2.0, 0.0)];
        assert!(neutral_center(&line).is_err());
    }
}
