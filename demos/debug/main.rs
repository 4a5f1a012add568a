//! Wingsection debug harness: builds a NACA 0012 section with every
//! feature kind and logs its structural and mass properties.
//!
//! Usage:
//! ```text
//! cargo run --example debug
//! RUST_LOG=wingsection=trace cargo run --example debug   # per-feature trace
//! ```

use std::sync::Arc;

use tracing::info;
use wingsection::analysis::{MassAnalysis, StructuralAnalysis};
use wingsection::math::Point2;
use wingsection::section::{
    BoxSpar, Feature, ISpar, Layer, Material, MaterialSpec, Reinforcement, Section,
};
use wingsection::SectionError;

/// Points per airfoil surface.
const SURFACE_POINTS: usize = 60;

/// Symmetric NACA 4-digit airfoil of relative `thickness`, unit chord,
/// clockwise from the trailing edge over the upper surface.
fn naca_symmetric(thickness: f64) -> Vec<Point2> {
    let half_thickness = |x: f64| {
        5.0 * thickness
            * (0.2969 * x.sqrt() - 0.1260 * x - 0.3516 * x.powi(2) + 0.2843 * x.powi(3)
                - 0.1015 * x.powi(4))
    };
    #[allow(clippy::cast_precision_loss)]
    let station = |i: usize| {
        0.5 * (1.0 - (std::f64::consts::PI * i as f64 / SURFACE_POINTS as f64).cos())
    };

    let upper = (0..=SURFACE_POINTS)
        .rev()
        .map(station)
        .map(|x| Point2::new(x, half_thickness(x)));
    let lower = (1..SURFACE_POINTS)
        .map(station)
        .map(|x| Point2::new(x, -half_thickness(x)));
    upper.chain(lower).collect()
}

fn main() -> Result<(), SectionError> {
    // Default: WARN for everything, DEBUG for wingsection.
    // Override with RUST_LOG env var.
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into())
        .add_directive("debug=info".parse().unwrap_or_default())
        .add_directive("wingsection=debug".parse().unwrap_or_default());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let glass = Arc::new(Material::new(1900.0, 20e9));
    let carbon = Arc::new(Material::new(1600.0, 120e9));
    let foam = Arc::new(Material::new(60.0, 50e6));

    let mut section = Section::new(naca_symmetric(0.12))?;
    section.extend([
        Feature::from(Layer::new(Arc::clone(&glass), 0.002)),
        Feature::from(Reinforcement::new(Arc::clone(&carbon), 0.003, 0.15, 0.45)),
    ])?;
    let spar = section.append(ISpar::new(
        MaterialSpec::Composite {
            flange: Arc::clone(&carbon),
            web: Arc::clone(&foam),
        },
        0.3,
        0.08,
        0.004,
        0.5,
        0.01,
    ))?;
    section.append(BoxSpar::new(Arc::clone(&glass), 0.65, 0.1, 0.002, 0.002))?;

    let structural = StructuralAnalysis::new(&section).execute()?;
    let mass = MassAnalysis::new(&section).execute()?;
    info!(?structural, ?mass, "baseline section");

    section.update(spar, |feature| {
        if let Some(ispar) = feature.as_ispar_mut() {
            ispar.set_midpos(0.35);
        }
    })?;
    let moved = StructuralAnalysis::new(&section).execute()?;
    info!(
        dx = moved.neutral_axis.x - structural.neutral_axis.x,
        ei_xx_ratio = moved.bending_stiffness.ei_xx / structural.bending_stiffness.ei_xx,
        "spar moved aft"
    );

    Ok(())
}
