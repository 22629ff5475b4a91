//! Run lifecycle around the motion and density passes.

use crowdwatch_core::{Arena, Person, RiskLevel, Scheduler, Snapshot, TierChange, World};
use log::{debug, info};

use crate::density::DensitySystem;
use crate::heatmap::HeatMap;
use crate::motion::MotionSystem;
use crate::spawn::CrowdSpawner;

/// Callback run when the global risk tier changes.
pub type TierObserver = Box<dyn FnMut(TierChange) + Send>;

/// How often (in frames) a progress line is logged at debug level.
const PROGRESS_INTERVAL: u64 = 100;

/// Crowd rebuild requested while a run is active; applied at the next tick boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingChange {
    /// Respawn with a new crowd size.
    Resize(usize),
    /// Respawn with the current crowd size.
    Reset,
}

impl PendingChange {
    /// Folds a new request into an already queued one. A resize carries
    /// a reset with it, so it is never downgraded.
    fn merge(self, next: PendingChange) -> PendingChange {
        match (self, next) {
            (PendingChange::Resize(n), PendingChange::Reset) => PendingChange::Resize(n),
            (_, next) => next,
        }
    }
}

/// A complete crowd run: the world, its systems and the lifecycle around them.
///
/// Each [`tick`](Self::tick) runs motion and then density classification
/// over the whole crowd, notifies observers of a tier change, and returns an
/// owned snapshot. The simulation is created inactive; ticks are no-ops
/// until [`set_active`](Self::set_active) turns it on.
pub struct CrowdSimulation {
    world: World,
    scheduler: Scheduler,
    spawner: CrowdSpawner,
    active: bool,
    pending: Option<PendingChange>,
    observers: Vec<TierObserver>,
    last_change: Option<TierChange>,
}

impl CrowdSimulation {
    /// Empty, inactive simulation over the default arena.
    pub fn new(spawner: CrowdSpawner) -> Self {
        let arena = Arena::default();
        let mut scheduler = Scheduler::new();
        scheduler
            .add_system(MotionSystem::new(&arena))
            .add_system(DensitySystem::new());

        Self {
            world: World::empty(arena),
            scheduler,
            spawner,
            active: false,
            pending: None,
            observers: Vec::new(),
            last_change: None,
        }
    }

    /// Inactive simulation over a fixed, caller-supplied crowd.
    ///
    /// Positions outside the arena are pulled inside. Later resets and
    /// resizes respawn from `spawner`.
    pub fn with_layout(arena: Arena, people: Vec<Person>, spawner: CrowdSpawner) -> Self {
        let mut sim = Self::new(spawner);
        sim.install(arena, people);
        sim
    }

    /// Discards the current crowd and spawns `count` new people.
    ///
    /// The global tier is kept, so the first tick over the new crowd reports
    /// a change against the tier observers last heard. Any queued resize or
    /// reset is dropped.
    pub fn initialize(&mut self, count: usize, arena: Arena) {
        let people = self.spawner.spawn(count, &arena);
        self.install(arena, people);
        info!(
            "Initialized crowd of {} in a {}x{} arena",
            count,
            arena.width(),
            arena.height()
        );
    }

    fn install(&mut self, arena: Arena, mut people: Vec<Person>) {
        for person in &mut people {
            person.position = arena.clamp(person.position);
        }
        let held = self.world.risk_level();
        self.world = World::new(arena, people).with_risk_level(held);
        self.pending = None;
    }

    /// Advances one frame and returns the resulting state.
    ///
    /// While inactive nothing moves and the current state is returned.
    pub fn tick(&mut self) -> Snapshot {
        if !self.active {
            return self.world.snapshot();
        }
        self.apply_pending();

        let frame = self.world.begin_frame();
        let elapsed = self.scheduler.execute_once(&mut self.world);

        // Density sets the tier once per tick, so there is at most one change.
        if let Some(change) = self.world.drain_tier_changes().pop() {
            self.last_change = Some(change);
            for observer in &mut self.observers {
                observer(change);
            }
        }

        let snapshot = self.world.snapshot();
        if frame % PROGRESS_INTERVAL == 0 {
            let counts = snapshot.counts();
            debug!(
                "frame {}: {} people, {} safe / {} warning / {} danger, tier {}, tick {:?}",
                frame,
                snapshot.len(),
                counts.safe,
                counts.warning,
                counts.danger,
                snapshot.risk_level,
                elapsed
            );
        }
        snapshot
    }

    /// Registers a callback fired with every tier change, at most once per tick.
    pub fn on_risk_tier_changed<F>(&mut self, observer: F)
    where
        F: FnMut(TierChange) + Send + 'static,
    {
        self.observers.push(Box::new(observer));
    }

    /// Starts or stops ticking.
    ///
    /// Stopping happens between ticks, so any queued rebuild is applied on
    /// the spot.
    pub fn set_active(&mut self, active: bool) {
        if self.active == active {
            return;
        }
        self.active = active;
        if active {
            info!("Simulation started at frame {}", self.world.frame());
        } else {
            self.apply_pending();
            info!("Simulation stopped at frame {}", self.world.frame());
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Respawns the crowd with `count` people.
    ///
    /// Applied immediately when inactive, otherwise at the start of the next tick.
    pub fn request_resize(&mut self, count: usize) {
        self.request(PendingChange::Resize(count));
    }

    /// Respawns the crowd at its current size.
    ///
    /// Applied immediately when inactive, otherwise at the start of the next tick.
    pub fn request_reset(&mut self) {
        self.request(PendingChange::Reset);
    }

    fn request(&mut self, change: PendingChange) {
        self.pending = Some(match self.pending {
            Some(queued) => queued.merge(change),
            None => change,
        });
        if !self.active {
            self.apply_pending();
        }
    }

    /// A rebuild waiting for the next tick boundary, if any.
    pub fn pending_change(&self) -> Option<PendingChange> {
        self.pending
    }

    fn apply_pending(&mut self) {
        let Some(change) = self.pending.take() else {
            return;
        };
        let count = match change {
            PendingChange::Resize(count) => count,
            PendingChange::Reset => self.world.len(),
        };
        let arena = *self.world.arena();
        info!("Applying {:?}", change);
        self.initialize(count, arena);
    }

    /// Current state without advancing.
    pub fn snapshot(&self) -> Snapshot {
        self.world.snapshot()
    }

    pub fn risk_level(&self) -> RiskLevel {
        self.world.risk_level()
    }

    /// Most recent tier change of the run.
    pub fn last_tier_change(&self) -> Option<TierChange> {
        self.last_change
    }

    pub fn frame(&self) -> u64 {
        self.world.frame()
    }

    pub fn len(&self) -> usize {
        self.world.len()
    }

    pub fn is_empty(&self) -> bool {
        self.world.is_empty()
    }

    pub fn arena(&self) -> &Arena {
        self.world.arena()
    }

    pub fn people(&self) -> &[Person] {
        self.world.people()
    }

    /// Density field over the current positions.
    pub fn heat_map(&self) -> HeatMap {
        HeatMap::compute(self.world.arena(), self.world.people().iter().map(|p| p.position))
    }
}

impl Default for CrowdSimulation {
    fn default() -> Self {
        Self::new(CrowdSpawner::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crowdwatch_core::Vec2;
    use std::sync::{Arc, Mutex};

    fn seeded() -> CrowdSimulation {
        CrowdSimulation::new(CrowdSpawner::from_seed(11))
    }

    #[test]
    fn starts_empty_and_inactive() {
        let sim = seeded();
        assert!(!sim.is_active());
        assert!(sim.is_empty());
        assert_eq!(sim.risk_level(), RiskLevel::Safe);
        assert_eq!(*sim.arena(), Arena::default());
    }

    #[test]
    fn inactive_tick_does_not_advance() {
        let mut sim = seeded();
        sim.initialize(30, Arena::default());
        let before = sim.snapshot();
        let after = sim.tick();
        assert_eq!(before, after);
        assert_eq!(sim.frame(), 0);
    }

    #[test]
    fn active_tick_advances_one_frame() {
        let mut sim = seeded();
        sim.initialize(30, Arena::default());
        sim.set_active(true);
        let snap = sim.tick();
        assert_eq!(snap.frame, 1);
        assert_eq!(snap.len(), 30);
        assert_eq!(sim.tick().frame, 2);
    }

    #[test]
    fn resize_while_inactive_applies_immediately() {
        let mut sim = seeded();
        sim.initialize(10, Arena::default());
        sim.request_resize(25);
        assert_eq!(sim.len(), 25);
        assert_eq!(sim.pending_change(), None);
    }

    #[test]
    fn resize_while_active_waits_for_tick_boundary() {
        let mut sim = seeded();
        sim.initialize(10, Arena::default());
        sim.set_active(true);
        sim.tick();

        sim.request_resize(40);
        assert_eq!(sim.len(), 10);
        assert_eq!(sim.pending_change(), Some(PendingChange::Resize(40)));

        let snap = sim.tick();
        assert_eq!(snap.len(), 40);
        // Rebuilt world starts counting again.
        assert_eq!(snap.frame, 1);
        assert_eq!(sim.pending_change(), None);
    }

    #[test]
    fn reset_does_not_undo_a_queued_resize() {
        let mut sim = seeded();
        sim.initialize(10, Arena::default());
        sim.set_active(true);
        sim.request_resize(5);
        sim.request_reset();
        assert_eq!(sim.pending_change(), Some(PendingChange::Resize(5)));
        sim.request_resize(7);
        assert_eq!(sim.pending_change(), Some(PendingChange::Resize(7)));
    }

    #[test]
    fn stopping_applies_queued_rebuild() {
        let mut sim = seeded();
        sim.initialize(10, Arena::default());
        sim.set_active(true);
        sim.request_reset();
        sim.set_active(false);
        assert_eq!(sim.pending_change(), None);
        assert_eq!(sim.frame(), 0);
        assert_eq!(sim.len(), 10);
    }

    #[test]
    fn observers_hear_tier_changes() {
        // Ten people on one spot: everybody has nine neighbours.
        let people = (0..10)
            .map(|i| Person::new(i, Vec2::new(200.0, 150.0), Vec2::new(200.0, 150.0)))
            .collect();
        let mut sim = CrowdSimulation::with_layout(Arena::default(), people, CrowdSpawner::from_seed(1));
        let heard = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&heard);
        sim.on_risk_tier_changed(move |change| sink.lock().unwrap().push(change));

        sim.set_active(true);
        for _ in 0..5 {
            sim.tick();
        }

        let heard = heard.lock().unwrap();
        assert_eq!(heard.len(), 1);
        assert_eq!(heard[0].to, RiskLevel::Danger);
        assert_eq!(heard[0].frame, 1);
        assert_eq!(sim.last_tier_change(), Some(heard[0]));
    }

    fn stacked(count: u32) -> Vec<Person> {
        (0..count)
            .map(|i| Person::new(i, Vec2::new(200.0, 150.0), Vec2::new(200.0, 150.0)))
            .collect()
    }

    #[test]
    fn rebuild_keeps_held_tier_until_next_tick() {
        let mut sim = CrowdSimulation::with_layout(Arena::default(), stacked(10), CrowdSpawner::from_seed(1));
        let heard = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&heard);
        sim.on_risk_tier_changed(move |change: TierChange| sink.lock().unwrap().push(change.to));

        sim.set_active(true);
        sim.tick();
        assert_eq!(sim.risk_level(), RiskLevel::Danger);

        // Mid-run resize to a crowd too small to crowd anyone.
        sim.request_resize(4);
        assert_eq!(sim.risk_level(), RiskLevel::Danger);
        for _ in 0..5 {
            sim.tick();
        }

        assert_eq!(sim.len(), 4);
        assert_eq!(sim.risk_level(), RiskLevel::Safe);
        let heard = heard.lock().unwrap();
        assert_eq!(*heard, vec![RiskLevel::Danger, RiskLevel::Safe]);
        assert_eq!(heard.last().copied(), Some(sim.risk_level()));
        assert_eq!(sim.last_tier_change().map(|c| c.from), Some(RiskLevel::Danger));
    }

    #[test]
    fn initialize_while_stopped_reports_drop_on_next_tick() {
        let mut sim = CrowdSimulation::with_layout(Arena::default(), stacked(10), CrowdSpawner::from_seed(1));
        let heard = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&heard);
        sim.on_risk_tier_changed(move |change: TierChange| sink.lock().unwrap().push(change.to));

        sim.set_active(true);
        sim.tick();
        sim.set_active(false);
        sim.initialize(0, Arena::default());
        assert_eq!(heard.lock().unwrap().len(), 1);

        sim.set_active(true);
        sim.tick();
        assert_eq!(*heard.lock().unwrap(), vec![RiskLevel::Danger, RiskLevel::Safe]);
    }

    #[test]
    fn layout_positions_are_clamped() {
        let people = vec![Person::new(0, Vec2::new(-50.0, 900.0), Vec2::new(400.0, 150.0))];
        let sim = CrowdSimulation::with_layout(Arena::default(), people, CrowdSpawner::from_seed(1));
        assert_eq!(sim.people()[0].position, Vec2::new(10.0, 290.0));
    }

    #[test]
    fn heat_map_follows_people() {
        let people = vec![Person::new(0, Vec2::new(100.0, 60.0), Vec2::new(100.0, 60.0))];
        let sim = CrowdSimulation::with_layout(Arena::default(), people, CrowdSpawner::from_seed(1));
        let map = sim.heat_map();
        assert_eq!(map.hottest().map(|(cell, _)| cell), Some((2, 1)));
    }
}
