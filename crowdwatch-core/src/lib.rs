//! Core data model for the crowd density simulation.
//!
//! Main components:
//! - [`entity`]: simulated people and their identifiers.
//! - [`risk`]: risk tiers, tallies and tier-change events.
//! - [`arena`]: the bounded area people move in, plus entry/exit regions.
//! - [`crowding`]: per-tick neighbour counts shared between systems.
//! - [`world`]: the aggregate state a simulation owns.
//! - [`snapshot`]: read-only views handed to observers after a tick.
//! - [`system`] / [`scheduler`]: ordered per-tick passes over the world.

pub mod arena;
pub mod crowding;
pub mod entity;
pub mod risk;
pub mod scheduler;
pub mod snapshot;
pub mod system;
pub mod world;

pub use arena::{Arena, Region};
pub use crowding::NeighborCounts;
pub use entity::{EntityId, Person};
pub use risk::{RiskCounts, RiskLevel, TierChange};
pub use scheduler::Scheduler;
pub use snapshot::{PersonState, Snapshot};
pub use system::System;
pub use world::World;

// Re-exported so downstream crates agree on the vector type.
pub use glam::Vec2;
