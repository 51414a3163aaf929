//! # Glide Engine
//!
//! Monte Carlo engine estimating statistics of cross-country glider flight
//! through a stochastically generated field of thermal updraft cells: mean
//! free path between thermals, energy balance and flight duration/distance,
//! under a naive fixed-heading strategy or a thermal-seeking heuristic.
//!
//! The crate is a batch/offline statistical library; visualization, map
//! rendering and recorded-flight ingestion are external consumers of the
//! exported histories and aggregates.

// Re-export the main types and functions
pub use convection::Weather;
pub use error::GlideError;
pub use field::Field;
pub use geometry::{distance, intersect, Point};
pub use glider::{Glider, LiftHit, Strategy};
pub use monte_carlo::{
    linear_fit, run_density_sweep, run_trials, BatchResults, DensityPoint, SummaryStatistics,
    TrialSummary,
};
pub use scene::{EnergySample, Scene, SceneOutcome, SimConfig};

// Module declarations
pub mod constants;
pub mod convection;
mod error;
pub mod field;
pub mod geometry;
pub mod glider;
pub mod monte_carlo;
pub mod scene;
