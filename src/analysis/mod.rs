//! Section-level properties computed from the exported geometry.

pub mod mass;
pub mod structural;

pub use mass::{MassAccumulator, MassAnalysis, MassProperties};
pub use structural::{BendingStiffness, StructuralAnalysis, StructuralProperties};
