//! Risk tiers shared by per-person tags and the global crowd state.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Discrete safety tier.
///
/// Ordered from least to most severe so `a < b` reads as "b is an escalation".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    #[default]
    Safe,
    Warning,
    Danger,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Safe => "safe",
            RiskLevel::Warning => "warning",
            RiskLevel::Danger => "danger",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Number of people per risk tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RiskCounts {
    pub safe: usize,
    pub warning: usize,
    pub danger: usize,
}

impl RiskCounts {
    /// Tallies an iterator of risk tags.
    pub fn tally<I>(levels: I) -> Self
    where
        I: IntoIterator<Item = RiskLevel>,
    {
        let mut counts = Self::default();
        for level in levels {
            match level {
                RiskLevel::Safe => counts.safe += 1,
                RiskLevel::Warning => counts.warning += 1,
                RiskLevel::Danger => counts.danger += 1,
            }
        }
        counts
    }

    #[inline]
    pub fn total(&self) -> usize {
        self.safe + self.warning + self.danger
    }
}

/// Emitted when the global tier differs from the previous tick's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierChange {
    pub frame: u64,
    pub from: RiskLevel,
    pub to: RiskLevel,
}

impl TierChange {
    /// True when the crowd got more dangerous.
    pub fn is_escalation(&self) -> bool {
        self.to > self.from
    }
}
