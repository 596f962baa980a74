//! The HEPA filter holder: dimensions, construction sequence and builder.

pub mod analysis;
pub mod builder;
pub mod params;
pub mod plan;


pub use analysis::{expected_bounds, expected_volume};
pub use builder::{build_holder, HolderBuilder};
pub use params::{BoxExtents, CylinderSize, FeaturePair, HolderParams};
pub use plan::{names, BooleanOp, BuildPlan, BuildStep, Shape};
