use crowdwatch_core::Arena;
use serde::{Deserialize, Serialize};

/// Root configuration structure
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub transport: TransportConfig,
}

/// Simulation-specific configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SimulationConfig {
    /// Number of people to spawn. Zero or negative means an empty crowd.
    #[serde(default = "default_crowd_size")]
    pub crowd_size: i64,
    #[serde(default)]
    pub arena: ArenaConfig,
    #[serde(default = "default_frame_rate")]
    pub frame_rate: u32,
    /// Fixed RNG seed for reproducible runs; entropy when absent.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Stop after this many ticks; run until interrupted when absent.
    #[serde(default)]
    pub max_ticks: Option<u64>,
    /// Attach a density heat map to every emitted frame.
    #[serde(default)]
    pub heat_map: bool,
}

/// Arena dimensions and the wall margin people keep
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ArenaConfig {
    #[serde(default = "default_width")]
    pub width: f32,
    #[serde(default = "default_height")]
    pub height: f32,
    #[serde(default = "default_margin")]
    pub margin: f32,
}

/// Transport-specific configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TransportConfig {
    #[serde(default)]
    pub serializer: SerializerType,
    #[serde(default)]
    pub sender: SenderConfig,
    /// Emit a frame every N ticks. Tier changes are always emitted.
    #[serde(default = "default_output_frequency")]
    pub output_frequency: u32,
}

/// Wire format for emitted frames and events
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SerializerType {
    #[default]
    Json,
    Binary,
}

/// Where emitted data goes
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SenderConfig {
    #[default]
    Stdio,
    File { output_path: String },
    Null,
}

fn default_crowd_size() -> i64 { 150 }
fn default_frame_rate() -> u32 { 60 }
fn default_width() -> f32 { crowdwatch_core::arena::DEFAULT_WIDTH }
fn default_height() -> f32 { crowdwatch_core::arena::DEFAULT_HEIGHT }
fn default_margin() -> f32 { crowdwatch_core::arena::DEFAULT_MARGIN }
fn default_output_frequency() -> u32 { 1 }

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            crowd_size: default_crowd_size(),
            arena: ArenaConfig::default(),
            frame_rate: default_frame_rate(),
            seed: None,
            max_ticks: None,
            heat_map: false,
        }
    }
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            margin: default_margin(),
        }
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            serializer: SerializerType::default(),
            sender: SenderConfig::default(),
            output_frequency: default_output_frequency(),
        }
    }
}

// --- Helper Methods ---

impl SimulationConfig {
    /// Crowd size as a count, with negative values treated as an empty crowd.
    pub fn crowd_size(&self) -> usize {
        if self.crowd_size < 0 {
            log::warn!("Negative crowd size {} treated as an empty crowd", self.crowd_size);
            0
        } else {
            self.crowd_size as usize
        }
    }
}

impl ArenaConfig {
    pub fn to_arena(&self) -> Arena {
        Arena::new(self.width, self.height, self.margin)
    }
}
