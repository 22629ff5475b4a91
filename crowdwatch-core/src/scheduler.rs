use crate::system::System;
use crate::World;
use log::trace;
use std::time::{Duration, Instant};

/// Runs the registered systems sequentially, once per tick.
#[derive(Default)]
pub struct Scheduler {
    systems: Vec<Box<dyn System>>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a system; it runs after every system added before it.
    pub fn add_system<T: System + 'static>(&mut self, system: T) -> &mut Self {
        self.systems.push(Box::new(system));
        self
    }

    /// Execute all systems once and return the total time spent.
    pub fn execute_once(&mut self, world: &mut World) -> Duration {
        let start = Instant::now();

        for system in &mut self.systems {
            let system_start = Instant::now();
            system.run(world);
            trace!(
                "system {} took {:?} (frame {})",
                system.name(),
                system_start.elapsed(),
                world.frame()
            );
        }

        start.elapsed()
    }

    pub fn system_count(&self) -> usize {
        self.systems.len()
    }

    /// Names in execution order.
    pub fn system_names(&self) -> Vec<&'static str> {
        self.systems.iter().map(|s| s.name()).collect()
    }
}
