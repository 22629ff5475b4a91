//! The bounded area the crowd moves in.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Default arena size, matching the monitoring canvas.
pub const DEFAULT_WIDTH: f32 = 800.0;
pub const DEFAULT_HEIGHT: f32 = 300.0;
/// Default distance kept between people and the arena walls.
pub const DEFAULT_MARGIN: f32 = 10.0;

/// Where people appear when a run starts.
pub const DEFAULT_ENTRY: Region = Region::new(Vec2::new(50.0, 50.0), Vec2::new(350.0, 250.0));
/// Where people try to go.
pub const DEFAULT_EXIT: Region = Region::new(Vec2::new(350.0, 50.0), Vec2::new(650.0, 250.0));

/// Axis-aligned rectangle of the arena, inclusive of both corners.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub min: Vec2,
    pub max: Vec2,
}

impl Region {
    pub const fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        (self.max - self.min).max(Vec2::ZERO)
    }

    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Maps unit coordinates `u ∈ [0, 1]²` onto the region.
    ///
    /// A degenerate (zero or negative width) axis collapses onto `min`.
    #[inline]
    pub fn lerp(&self, u: Vec2) -> Vec2 {
        self.min + self.size() * u
    }

    /// Restricts the region to the part of the arena people may occupy.
    pub fn clamped_to(&self, arena: &Arena) -> Self {
        let min = arena.clamp(self.min);
        let max = arena.clamp(self.max).max(min);
        Self { min, max }
    }
}

/// Fixed bounded arena with an interior clamp margin.
///
/// Construction never fails: non-finite or negative dimensions become zero,
/// and margins are capped at half the matching dimension so the clamp range
/// `[margin, size - margin]` can never invert.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Arena {
    width: f32,
    height: f32,
    margin_x: f32,
    margin_y: f32,
}

impl Arena {
    /// Arena with the same margin on both axes.
    pub fn new(width: f32, height: f32, margin: f32) -> Self {
        Self::with_margins(width, height, margin, margin)
    }

    pub fn with_margins(width: f32, height: f32, margin_x: f32, margin_y: f32) -> Self {
        let width = sanitize(width);
        let height = sanitize(height);
        let (raw_x, raw_y) = (sanitize(margin_x), sanitize(margin_y));
        let margin_x = raw_x.min(width / 2.0);
        let margin_y = raw_y.min(height / 2.0);

        if margin_x < raw_x || margin_y < raw_y {
            log::warn!(
                "Arena margins ({}, {}) exceed a {}x{} arena; capping at half the dimension",
                raw_x, raw_y, width, height
            );
        }

        Self { width, height, margin_x, margin_y }
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.height
    }

    #[inline]
    pub fn margins(&self) -> Vec2 {
        Vec2::new(self.margin_x, self.margin_y)
    }

    /// Lowest coordinate a person may occupy.
    #[inline]
    pub fn clamp_min(&self) -> Vec2 {
        Vec2::new(self.margin_x, self.margin_y)
    }

    /// Highest coordinate a person may occupy.
    #[inline]
    pub fn clamp_max(&self) -> Vec2 {
        Vec2::new(self.width - self.margin_x, self.height - self.margin_y)
    }

    /// The rectangle people are confined to.
    pub fn interior(&self) -> Region {
        Region::new(self.clamp_min(), self.clamp_max())
    }

    /// Pulls a point back inside the interior rectangle.
    #[inline]
    pub fn clamp(&self, p: Vec2) -> Vec2 {
        // min <= max holds by construction, so glam's clamp precondition is met.
        p.clamp(self.clamp_min(), self.clamp_max())
    }

    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        self.interior().contains(p)
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::new(DEFAULT_WIDTH, DEFAULT_HEIGHT, DEFAULT_MARGIN)
    }
}

/// Finite and non-negative, with anything else mapped to zero.
fn sanitize(v: f32) -> f32 {
    if v.is_finite() {
        v.max(0.0)
    } else {
        0.0
    }
}
