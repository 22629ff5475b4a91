use std::error::Error;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use clap::Parser;
use log::info;

mod cli;
mod driver;
mod stats;

use cli::Args;
use driver::RunnerError;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = args.load_config().map_err(RunnerError::from)?;
    match &args.config {
        Some(path) => info!("Using configuration from {}", path.display()),
        None => info!("Using default configuration"),
    }

    // Cleared by Ctrl+C; the driver stops at the next tick boundary.
    let running = Arc::new(AtomicBool::new(true));
    let flag = Arc::clone(&running);
    ctrlc::set_handler(move || {
        flag.store(false, Ordering::SeqCst);
    })
    .map_err(RunnerError::from)?;

    let summary = driver::run(&config, running)?;
    info!(
        "{} ticks, {} frames published, {} tier change(s), final tier {} (p99 tick {:?})",
        summary.ticks,
        summary.frames_sent,
        summary.tier_changes.len(),
        summary.final_snapshot.risk_level,
        summary.timing.p99
    );
    Ok(())
}
