use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::entity::EntityId;
use crate::risk::{RiskCounts, RiskLevel};

/// Read-only view of one person after a completed tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PersonState {
    pub id: EntityId,
    pub position: Vec2,
    pub velocity: Vec2,
    pub risk: RiskLevel,
    /// People within crowding distance when the tick started.
    pub neighbors: u32,
}

/// Owned copy of the crowd handed to observers (renderer, alert feed).
///
/// Observers can do whatever they like with it; the simulation never sees
/// changes made to a snapshot.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Snapshot {
    pub frame: u64,
    pub risk_level: RiskLevel,
    pub people: Vec<PersonState>,
}

impl Snapshot {
    pub fn len(&self) -> usize {
        self.people.len()
    }

    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }

    /// How many people carry each risk tag.
    pub fn counts(&self) -> RiskCounts {
        RiskCounts::tally(self.people.iter().map(|p| p.risk))
    }

    pub fn get(&self, id: EntityId) -> Option<&PersonState> {
        self.people.iter().find(|p| p.id == id)
    }
}
