use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossbeam_channel::unbounded;
use crowdwatch_config::{Config, ConfigError};
use crowdwatch_core::{Snapshot, TierChange};
use crowdwatch_simulation::{CrowdSimulation, CrowdSpawner};
use crowdwatch_transport::{TransportController, TransportError};
use log::{info, warn};
use thiserror::Error;

use crate::stats::{TickStats, TickSummary};

#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Failed to install Ctrl+C handler: {0}")]
    Signal(#[from] ctrlc::Error),

    #[error("Failed to set up tick statistics: {0}")]
    Stats(#[from] hdrhistogram::CreationError),
}

/// What a finished run looked like.
#[derive(Debug)]
pub struct RunSummary {
    pub ticks: u64,
    pub final_snapshot: Snapshot,
    pub tier_changes: Vec<TierChange>,
    pub frames_sent: u64,
    pub timing: TickSummary,
}

/// Runs the simulation at the configured frame rate until `running` is
/// cleared or `max_ticks` is reached.
///
/// `running` is only checked between ticks, so a tick that has started
/// always completes.
pub fn run(config: &Config, running: Arc<AtomicBool>) -> Result<RunSummary, RunnerError> {
    let sim_config = &config.simulation;
    let arena = sim_config.arena.to_arena();

    let mut transport = TransportController::from_config(&config.transport)?;
    let mut stats = TickStats::new()?;

    let mut sim = CrowdSimulation::new(CrowdSpawner::new(sim_config.seed));
    sim.initialize(sim_config.crowd_size(), arena);

    // The callback runs inside tick(); hand changes to the loop for publishing.
    let (tier_tx, tier_rx) = unbounded();
    sim.on_risk_tier_changed(move |change| {
        // Receiver outlives the simulation, a failed send only means shutdown.
        let _ = tier_tx.send(change);
    });

    let frame_duration = Duration::from_secs_f64(1.0 / f64::from(sim_config.frame_rate.max(1)));
    info!(
        "Running {} people at {} FPS{}",
        sim.len(),
        sim_config.frame_rate,
        match sim_config.max_ticks {
            Some(max) => format!(" for {} ticks", max),
            None => String::new(),
        }
    );

    let mut tier_changes = Vec::new();
    let mut ticks = 0u64;
    let mut final_snapshot = sim.snapshot();
    sim.set_active(true);

    while running.load(Ordering::SeqCst) {
        if sim_config.max_ticks.is_some_and(|max| ticks >= max) {
            break;
        }
        let frame_start = Instant::now();

        let snapshot = sim.tick();
        ticks += 1;

        for change in tier_rx.try_iter() {
            transport.publish_tier_change(&change)?;
            tier_changes.push(change);
        }

        let heat_map = (sim_config.heat_map && transport.wants_frame(snapshot.frame)).then(|| sim.heat_map());
        transport.publish_frame(&snapshot, heat_map.as_ref())?;
        final_snapshot = snapshot;

        let elapsed = frame_start.elapsed();
        stats.record(elapsed);
        if elapsed < frame_duration {
            spin_sleep::sleep(frame_duration - elapsed);
        } else if sim_config.frame_rate > 10 {
            // Only worth reporting when the target rate is high enough to matter.
            warn!("Frame {} exceeded budget: {:?} > {:?}", final_snapshot.frame, elapsed, frame_duration);
        }
    }

    sim.set_active(false);
    transport.flush()?;
    stats.log_summary();
    info!(
        "Stopped after {} ticks with crowd risk {}",
        ticks,
        final_snapshot.risk_level
    );

    Ok(RunSummary {
        ticks,
        final_snapshot,
        tier_changes,
        frames_sent: transport.frames_sent(),
        timing: stats.summary(),
    })
}
