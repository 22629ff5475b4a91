//! Randomised crowd placement.

use crowdwatch_core::arena::{DEFAULT_ENTRY, DEFAULT_EXIT};
use crowdwatch_core::{Arena, Person, Region, Vec2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Places a fresh crowd: start positions in the entry region, targets in the
/// exit region and a small random initial drift.
///
/// Seeded spawners are fully reproducible.
#[derive(Debug, Clone)]
pub struct CrowdSpawner {
    rng: StdRng,
    entry: Region,
    exit: Region,
}

impl CrowdSpawner {
    /// Seeded when `seed` is given, otherwise seeded from OS entropy.
    pub fn new(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::from_seed(seed),
            None => Self::from_entropy(),
        }
    }

    pub fn from_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            rng,
            entry: DEFAULT_ENTRY,
            exit: DEFAULT_EXIT,
        }
    }

    /// Replaces the entry and exit regions.
    pub fn with_regions(mut self, entry: Region, exit: Region) -> Self {
        self.entry = entry;
        self.exit = exit;
        self
    }

    pub fn entry(&self) -> Region {
        self.entry
    }

    pub fn exit(&self) -> Region {
        self.exit
    }

    /// Creates `count` people with ids `0..count`.
    ///
    /// Both regions are first restricted to the arena's clamp rectangle, so
    /// every spawned person already satisfies the position bounds.
    pub fn spawn(&mut self, count: usize, arena: &Arena) -> Vec<Person> {
        let entry = self.entry.clamped_to(arena);
        let exit = self.exit.clamped_to(arena);

        (0..count)
            .map(|i| {
                let position = entry.lerp(self.unit());
                let target = exit.lerp(self.unit());
                let velocity = Vec2::new(
                    self.rng.gen_range(-1.0..1.0),
                    self.rng.gen_range(-1.0..1.0),
                );
                Person::new(i as u32, position, target).with_velocity(velocity)
            })
            .collect()
    }

    /// Uniform point in `[0, 1)²`.
    fn unit(&mut self) -> Vec2 {
        Vec2::new(self.rng.gen::<f32>(), self.rng.gen::<f32>())
    }
}

impl Default for CrowdSpawner {
    fn default() -> Self {
        Self::from_entropy()
    }
}
