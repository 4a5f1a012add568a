pub mod region;
pub mod ring;

pub use region::{regions_from_geometry, Region};
pub use ring::Ring;
