use crowdwatch_core::{Snapshot, TierChange};
use crowdwatch_simulation::HeatMap;
use serde::Serialize;

/// Everything the runner publishes, borrowed from the simulation so nothing
/// is copied just to be serialized.
///
/// Externally tagged, e.g. `{"frame": {...}}` or `{"tier_change": {...}}`
/// in JSON.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Message<'a> {
    Frame(FrameMessage<'a>),
    TierChange(&'a TierChange),
}

/// State after one completed tick.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct FrameMessage<'a> {
    pub snapshot: &'a Snapshot,
    pub heat_map: Option<&'a HeatMap>,
}

impl<'a> Message<'a> {
    pub fn frame(snapshot: &'a Snapshot, heat_map: Option<&'a HeatMap>) -> Self {
        Message::Frame(FrameMessage { snapshot, heat_map })
    }

    pub fn tier_change(change: &'a TierChange) -> Self {
        Message::TierChange(change)
    }
}
