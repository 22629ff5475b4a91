//! Goal seeking, local repulsion and boundary clamping.
//!
//! Every person is advanced against the same pre-update snapshot of the
//! crowd: the next state is built in a side buffer and swapped into the
//! world only once everybody has been computed, so the result does not
//! depend on the order people are visited in.

use crowdwatch_core::{Arena, Person, System, Vec2, World};
use log::trace;

use crate::spatial::SpatialGrid;

/// Beyond this distance from its target a person walks; within it they have arrived.
pub const ARRIVAL_RADIUS: f32 = 5.0;
/// Distance covered per tick while walking toward the target.
pub const WALK_SPEED: f32 = 1.5;
/// Others closer than this count as crowding neighbours.
pub const CROWDING_RADIUS: f32 = 20.0;
/// Others closer than this push a person away.
pub const REPULSION_RADIUS: f32 = 15.0;
/// Velocity added per too-close neighbour.
pub const REPULSION_STRENGTH: f32 = 0.5;

/// Result of advancing a whole crowd by one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub people: Vec<Person>,
    /// Neighbour count per person, taken from the pre-update positions.
    pub neighbor_counts: Vec<u32>,
}

/// Impulse pushing a person away from a neighbour `offset` away (`self - other`).
///
/// Coincident people (zero distance) have no defined direction, so they
/// exert no push on each other.
#[inline]
pub fn repulsion(offset: Vec2, distance: f32) -> Vec2 {
    if distance > 0.0 {
        offset / distance * REPULSION_STRENGTH
    } else {
        Vec2::ZERO
    }
}

/// Velocity after the goal-seeking rule: walk straight at the target until
/// arrived, then keep whatever velocity the person already had.
#[inline]
pub fn seek(person: &Person) -> Vec2 {
    let to_goal = person.target - person.position;
    let distance = to_goal.length();
    if distance > ARRIVAL_RADIUS {
        to_goal / distance * WALK_SPEED
    } else {
        person.velocity
    }
}

/// Advances the person at `idx` by one tick.
///
/// `people` is the pre-update crowd and `grid` must have been rebuilt from
/// exactly those positions. Returns the updated person and how many others
/// were within [`CROWDING_RADIUS`].
pub fn advance(idx: usize, people: &[Person], arena: &Arena, grid: &SpatialGrid) -> (Person, u32) {
    let me = people[idx];
    let mut velocity = seek(&me);
    let mut neighbors = 0u32;

    for other_idx in grid.candidates(me.position, CROWDING_RADIUS) {
        if other_idx == idx {
            continue;
        }
        let offset = me.position - people[other_idx].position;
        let distance = offset.length();
        if distance < CROWDING_RADIUS {
            neighbors += 1;
            if distance < REPULSION_RADIUS {
                velocity += repulsion(offset, distance);
            }
        }
    }

    let next = Person {
        position: arena.clamp(me.position + velocity),
        velocity,
        ..me
    };
    (next, neighbors)
}

/// Advances a whole crowd by one tick without touching the input.
pub fn step(people: &[Person], arena: &Arena) -> Step {
    let mut grid = SpatialGrid::new(CROWDING_RADIUS, arena);
    grid.rebuild(arena, people.iter().map(|p| p.position));

    let (people, neighbor_counts) = (0..people.len())
        .map(|idx| advance(idx, people, arena, &grid))
        .unzip();

    Step { people, neighbor_counts }
}

/// Scheduler pass wrapping [`advance`].
///
/// Keeps its grid and scratch buffers between ticks so a steady-state tick
/// does not allocate.
pub struct MotionSystem {
    grid: SpatialGrid,
    next: Vec<Person>,
    counts: Vec<u32>,
}

impl MotionSystem {
    pub fn new(arena: &Arena) -> Self {
        Self {
            grid: SpatialGrid::new(CROWDING_RADIUS, arena),
            next: Vec::new(),
            counts: Vec::new(),
        }
    }
}

impl System for MotionSystem {
    fn name(&self) -> &'static str {
        "motion"
    }

    fn run(&mut self, world: &mut World) {
        let frame = world.frame();
        let arena = *world.arena();

        // Phase one: compute everybody's next state from the frozen crowd.
        let people = world.people();
        self.grid.rebuild(&arena, people.iter().map(|p| p.position));
        self.next.clear();
        self.counts.clear();
        for idx in 0..people.len() {
            let (person, neighbors) = advance(idx, people, &arena, &self.grid);
            self.next.push(person);
            self.counts.push(neighbors);
        }

        // Phase two: swap the new state in and publish the counts.
        let next = std::mem::take(&mut self.next);
        self.next = world.replace_people(next);

        let buffer = world.neighbors_mut();
        buffer.ensure_len(self.counts.len());
        for (idx, &count) in self.counts.iter().enumerate() {
            buffer.set(idx, count);
        }
        buffer.stamp(frame);

        trace!("motion advanced {} people for frame {}", self.counts.len(), frame);
    }
}
