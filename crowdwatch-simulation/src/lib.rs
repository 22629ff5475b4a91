//! Crowd motion and density classification.
//!
//! A tick is two passes over the whole crowd, run in order by the
//! [`Scheduler`](crowdwatch_core::Scheduler):
//!
//! 1. [`motion`]: goal seeking, short-range repulsion and boundary clamping,
//!    computed from the pre-tick crowd and swapped in at once. Produces a
//!    neighbour count per person.
//! 2. [`density`]: tags every person from their neighbour count and derives
//!    the global risk tier from the tag distribution.
//!
//! [`CrowdSimulation`] wraps both passes with the run lifecycle (spawn,
//! activate, resize, reset) and tier-change notifications.

pub mod density;
pub mod heatmap;
pub mod motion;
pub mod simulation;
pub mod spatial;
pub mod spawn;

pub use density::{classify_crowd, classify_person, DensitySystem};
pub use heatmap::HeatMap;
pub use motion::{step, MotionSystem, Step};
pub use simulation::{CrowdSimulation, PendingChange, TierObserver};
pub use spatial::SpatialGrid;
pub use spawn::CrowdSpawner;

/// Default number of people in a run.
pub const DEFAULT_CROWD_SIZE: usize = 150;
/// Crowd size of the high-density "surge" preset.
pub const SURGE_CROWD_SIZE: usize = 250;
