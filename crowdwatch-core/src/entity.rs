use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::risk::RiskLevel;

/// Stable identifier of a simulated person.
///
/// Unique within one simulation run; a reset or resize hands out ids from
/// zero again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One simulated person.
///
/// `target` is fixed at creation. `position` and `velocity` are rewritten by
/// the motion pass every tick and `risk` by the density pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub id: EntityId,
    pub position: Vec2,
    pub velocity: Vec2,
    pub target: Vec2,
    pub risk: RiskLevel,
}

impl Person {
    /// Creates a person at rest with a safe risk tag.
    pub fn new(id: u32, position: Vec2, target: Vec2) -> Self {
        Self {
            id: EntityId(id),
            position,
            velocity: Vec2::ZERO,
            target,
            risk: RiskLevel::Safe,
        }
    }

    /// Builder-style override of the initial velocity.
    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    /// Distance left to the goal point.
    #[inline]
    pub fn distance_to_target(&self) -> f32 {
        (self.target - self.position).length()
    }
}
