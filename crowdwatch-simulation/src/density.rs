//! Density-to-risk classification.
//!
//! Each person is tagged from the neighbour count the motion pass left in
//! the world, the tags are tallied, and the tally decides the global tier.
//! The thresholds are fixed heuristics and part of the observable contract.

use crowdwatch_core::{RiskCounts, RiskLevel, System, World};
use log::{info, trace, warn};

/// More neighbours than this makes a person's surroundings a warning.
pub const WARNING_NEIGHBORS: u32 = 3;
/// More neighbours than this makes a person's surroundings dangerous.
pub const DANGER_NEIGHBORS: u32 = 6;

/// Share of people in danger above which the whole crowd is in danger.
pub const DANGER_SHARE: f64 = 0.15;
/// Share of people in danger above which the crowd needs a warning.
pub const WARNING_DANGER_SHARE: f64 = 0.05;
/// Share of people in warning above which the crowd needs a warning.
pub const WARNING_SHARE: f64 = 0.30;

/// Risk tag for one person with `neighbors` others nearby.
#[inline]
pub fn classify_person(neighbors: u32) -> RiskLevel {
    if neighbors > DANGER_NEIGHBORS {
        RiskLevel::Danger
    } else if neighbors > WARNING_NEIGHBORS {
        RiskLevel::Warning
    } else {
        RiskLevel::Safe
    }
}

/// Global tier for a crowd of `total` people with the given tag tallies.
///
/// An empty crowd is always safe.
pub fn classify_crowd(danger: usize, warning: usize, total: usize) -> RiskLevel {
    if total == 0 {
        return RiskLevel::Safe;
    }
    let n = total as f64;
    if danger as f64 > DANGER_SHARE * n {
        RiskLevel::Danger
    } else if danger as f64 > WARNING_DANGER_SHARE * n || warning as f64 > WARNING_SHARE * n {
        RiskLevel::Warning
    } else {
        RiskLevel::Safe
    }
}

/// [`classify_crowd`] over a tally.
#[inline]
pub fn classify_counts(counts: &RiskCounts) -> RiskLevel {
    classify_crowd(counts.danger, counts.warning, counts.total())
}

/// Scheduler pass that tags people and updates the global tier.
///
/// Must run after [`crate::motion::MotionSystem`] in the same tick. If the
/// neighbour counts in the world were not completed for the current frame
/// the pass refuses to classify rather than read stale or partial counts.
#[derive(Debug, Default)]
pub struct DensitySystem;

impl DensitySystem {
    pub fn new() -> Self {
        Self
    }
}

impl System for DensitySystem {
    fn name(&self) -> &'static str {
        "density"
    }

    fn run(&mut self, world: &mut World) {
        let frame = world.frame();
        if !world.neighbors().is_current(frame, world.len()) {
            warn!(
                "Skipping density classification for frame {}: neighbour counts are from frame {:?}",
                frame,
                world.neighbors().frame()
            );
            return;
        }

        let (people, neighbors) = world.people_with_neighbors();
        for (idx, person) in people.iter_mut().enumerate() {
            person.risk = classify_person(neighbors.get(idx));
        }
        let counts = RiskCounts::tally(people.iter().map(|p| p.risk));

        let level = classify_counts(&counts);
        trace!(
            "frame {}: {} safe, {} warning, {} danger -> {}",
            frame, counts.safe, counts.warning, counts.danger, level
        );

        if let Some(change) = world.set_risk_level(level) {
            if change.is_escalation() {
                warn!(
                    "Crowd risk escalated {} -> {} at frame {} ({} in danger, {} in warning of {})",
                    change.from, change.to, frame, counts.danger, counts.warning, counts.total()
                );
            } else {
                info!("Crowd risk eased {} -> {} at frame {}", change.from, change.to, frame);
            }
        }
    }
}
