mod offset_box;
pub mod polyline_offset_2d;

pub use offset_box::OffsetBox;
pub use polyline_offset_2d::PolylineOffset2D;

/// Side of a walked boundary on which an offset is placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OffsetSide {
    Left,
    Right,
}

impl OffsetSide {
    /// Inside direction of a ring from its signed area: positive
    /// (counter-clockwise) rings have their interior on the left.
    #[must_use]
    pub fn inside_of(signed_area: f64) -> Self {
        if signed_area > 0.0 {
            Self::Left
        } else {
            Self::Right
        }
    }

    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Signed distance for [`PolylineOffset2D`] (positive is left).
    #[must_use]
    pub fn signed(self, distance: f64) -> f64 {
        match self {
            Self::Left => distance,
            Self::Right => -distance,
        }
    }
}
