//! Structural cross-sections of lifting surfaces.
//!
//! A [`Section`](section::Section) starts from an airfoil outline and carves
//! it inward with an ordered chain of features (layers, reinforcements and
//! spars). The resulting composite geometry feeds the
//! [`StructuralAnalysis`](analysis::StructuralAnalysis) and
//! [`MassAnalysis`](analysis::MassAnalysis) queries.

pub mod analysis;
pub mod error;
pub mod geometry;
pub mod math;
pub mod operations;
pub mod section;

pub use error::{Result, SectionError};
