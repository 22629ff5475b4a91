use crate::arena::Arena;
use crate::crowding::NeighborCounts;
use crate::entity::Person;
use crate::risk::{RiskLevel, TierChange};
use crate::snapshot::{PersonState, Snapshot};

/// Aggregate state of one simulation run.
///
/// Holds the crowd, the per-tick neighbour counts, the global risk tier and
/// the frame counter. Systems mutate it through the scheduler; everything
/// outside the simulation only ever sees [`Snapshot`]s.
#[derive(Debug, Clone)]
pub struct World {
    arena: Arena,
    people: Vec<Person>,
    neighbors: NeighborCounts,
    risk_level: RiskLevel,
    frame: u64,
    /// Tier changes raised during the current tick, drained by the owner.
    tier_changes: Vec<TierChange>,
}

impl World {
    pub fn new(arena: Arena, people: Vec<Person>) -> Self {
        let len = people.len();
        Self {
            arena,
            people,
            neighbors: NeighborCounts::with_len(len),
            risk_level: RiskLevel::Safe,
            frame: 0,
            tier_changes: Vec::new(),
        }
    }

    /// Starts the world at `level` instead of safe, without raising a change.
    ///
    /// Used when a crowd is rebuilt mid-run so the next classification is
    /// compared with the tier observers last heard.
    pub fn with_risk_level(mut self, level: RiskLevel) -> Self {
        self.risk_level = level;
        self
    }

    /// World with no people in it.
    pub fn empty(arena: Arena) -> Self {
        Self::new(arena, Vec::new())
    }

    #[inline]
    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    #[inline]
    pub fn people(&self) -> &[Person] {
        &self.people
    }

    /// Mutable access to the crowd for in-place passes (risk tagging).
    ///
    /// Only the slice is handed out, so the crowd size cannot change.
    #[inline]
    pub fn people_mut(&mut self) -> &mut [Person] {
        &mut self.people
    }

    /// Swaps in the next crowd state computed from the current one and
    /// hands back the previous state so its allocation can be reused.
    ///
    /// `next` must describe the same people in the same order; the crowd size
    /// is fixed for a run.
    pub fn replace_people(&mut self, next: Vec<Person>) -> Vec<Person> {
        debug_assert_eq!(next.len(), self.people.len(), "crowd size changed mid-run");
        std::mem::replace(&mut self.people, next)
    }

    /// The crowd together with this tick's neighbour counts, for passes that
    /// tag people from their counts.
    pub fn people_with_neighbors(&mut self) -> (&mut [Person], &NeighborCounts) {
        (&mut self.people, &self.neighbors)
    }

    pub fn len(&self) -> usize {
        self.people.len()
    }

    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }

    pub fn neighbors(&self) -> &NeighborCounts {
        &self.neighbors
    }

    pub fn neighbors_mut(&mut self) -> &mut NeighborCounts {
        &mut self.neighbors
    }

    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Advances the frame counter and clears last tick's events.
    pub fn begin_frame(&mut self) -> u64 {
        self.frame += 1;
        self.tier_changes.clear();
        self.frame
    }

    #[inline]
    pub fn risk_level(&self) -> RiskLevel {
        self.risk_level
    }

    /// Stores a freshly computed global tier.
    ///
    /// Returns the change (and queues it for the owner) only when the tier
    /// actually differs from the stored one.
    pub fn set_risk_level(&mut self, level: RiskLevel) -> Option<TierChange> {
        if level == self.risk_level {
            return None;
        }
        let change = TierChange {
            frame: self.frame,
            from: self.risk_level,
            to: level,
        };
        self.risk_level = level;
        self.tier_changes.push(change);
        Some(change)
    }

    /// Takes the tier changes raised since the last drain.
    pub fn drain_tier_changes(&mut self) -> Vec<TierChange> {
        std::mem::take(&mut self.tier_changes)
    }

    /// Copies the crowd into an observer-facing snapshot.
    pub fn snapshot(&self) -> Snapshot {
        let people = self
            .people
            .iter()
            .enumerate()
            .map(|(i, p)| PersonState {
                id: p.id,
                position: p.position,
                velocity: p.velocity,
                risk: p.risk,
                neighbors: self.neighbors.get(i),
            })
            .collect();

        Snapshot {
            frame: self.frame,
            risk_level: self.risk_level,
            people,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn two_people() -> Vec<Person> {
        vec![
            Person::new(0, Vec2::new(20.0, 20.0), Vec2::new(400.0, 100.0)),
            Person::new(1, Vec2::new(30.0, 20.0), Vec2::new(400.0, 120.0)),
        ]
    }

    #[test]
    fn set_risk_level_only_reports_real_changes() {
        let mut world = World::new(Arena::default(), two_people());
        world.begin_frame();

        assert_eq!(world.set_risk_level(RiskLevel::Safe), None);

        let change = world.set_risk_level(RiskLevel::Danger).unwrap();
        assert_eq!(change.from, RiskLevel::Safe);
        assert_eq!(change.to, RiskLevel::Danger);
        assert_eq!(change.frame, 1);

        assert_eq!(world.set_risk_level(RiskLevel::Danger), None);
        assert_eq!(world.drain_tier_changes(), vec![change]);
        assert!(world.drain_tier_changes().is_empty());
    }

    #[test]
    fn carried_risk_level_is_the_baseline_for_changes() {
        let mut world = World::new(Arena::default(), two_people()).with_risk_level(RiskLevel::Danger);
        assert_eq!(world.risk_level(), RiskLevel::Danger);
        assert!(world.drain_tier_changes().is_empty());

        world.begin_frame();
        let change = world.set_risk_level(RiskLevel::Safe).unwrap();
        assert_eq!((change.from, change.to), (RiskLevel::Danger, RiskLevel::Safe));
    }

    #[test]
    fn begin_frame_clears_undrained_events() {
        let mut world = World::new(Arena::default(), two_people());
        world.begin_frame();
        world.set_risk_level(RiskLevel::Warning);
        assert_eq!(world.begin_frame(), 2);
        assert!(world.drain_tier_changes().is_empty());
    }

    #[test]
    fn snapshot_copies_people_and_counts() {
        let mut world = World::new(Arena::default(), two_people());
        world.neighbors_mut().set(1, 3);

        let mut snap = world.snapshot();
        assert_eq!(snap.len(), 2);
        assert_eq!(snap.people[1].neighbors, 3);
        assert_eq!(snap.risk_level, RiskLevel::Safe);

        // Mutating the copy leaves the world untouched.
        snap.people[0].position = Vec2::ZERO;
        assert_eq!(world.people()[0].position, Vec2::new(20.0, 20.0));
    }

    #[test]
    fn empty_world_snapshot() {
        let world = World::empty(Arena::default());
        let snap = world.snapshot();
        assert!(snap.is_empty());
        assert_eq!(snap.counts().total(), 0);
    }
}
