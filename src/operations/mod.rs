pub mod boolean;
pub mod cleanup;
pub mod offset;

pub use boolean::SlabClip;
pub use cleanup::RefineSeams;
pub use offset::{OffsetBox, OffsetSide, PolylineOffset2D};
