//! Coarse crowd density field for overlays.
//!
//! The arena is cut into square cells. Every person within [`HEAT_RADIUS`]
//! of a cell centre adds `1 - d / HEAT_RADIUS` to that cell, so a person
//! standing on a centre counts fully and one at the radius not at all.
//! Colouring is left to whoever draws the map.

use crowdwatch_core::{Arena, Vec2};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

/// Edge length of one heat map cell.
pub const HEAT_CELL_SIZE: f32 = 40.0;
/// How far from a cell centre a person still contributes.
pub const HEAT_RADIUS: f32 = 40.0;
/// Density at which a cell reaches full intensity.
pub const SATURATION_DENSITY: f32 = 3.0;
/// Cells at or below this intensity are not worth drawing.
pub const HOT_THRESHOLD: f32 = 0.1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatMap {
    cell_size: f32,
    cols: usize,
    rows: usize,
    /// Row-major raw densities.
    cells: Vec<f32>,
}

impl HeatMap {
    /// Builds the density field for a set of positions.
    pub fn compute<I>(arena: &Arena, positions: I) -> Self
    where
        I: IntoIterator<Item = Vec2>,
    {
        let cell_size = HEAT_CELL_SIZE;
        let cols = (arena.width() / cell_size).ceil() as usize;
        let rows = (arena.height() / cell_size).ceil() as usize;
        let mut map = Self {
            cell_size,
            cols,
            rows,
            cells: vec![0.0; cols * rows],
        };
        if map.cells.is_empty() {
            return map;
        }

        let reach = (HEAT_RADIUS / cell_size).ceil() as i64;
        for p in positions {
            if !p.is_finite() {
                continue;
            }
            // Cell holding the point, kept within `reach` of the grid so the
            // range arithmetic below cannot overflow for far-away points.
            let cx = ((p.x / cell_size).floor() as i64).clamp(-reach, cols as i64 + reach);
            let cy = ((p.y / cell_size).floor() as i64).clamp(-reach, rows as i64 + reach);
            for y in (cy - reach).max(0)..=(cy + reach).min(rows as i64 - 1) {
                for x in (cx - reach).max(0)..=(cx + reach).min(cols as i64 - 1) {
                    let (x, y) = (x as usize, y as usize);
                    let d = p.distance(map.cell_center(x, y));
                    if d < HEAT_RADIUS {
                        map.cells[y * cols + x] += 1.0 - d / HEAT_RADIUS;
                    }
                }
            }
        }
        map
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.cols, self.rows)
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    pub fn cell_center(&self, x: usize, y: usize) -> Vec2 {
        Vec2::new(
            (x as f32 + 0.5) * self.cell_size,
            (y as f32 + 0.5) * self.cell_size,
        )
    }

    /// Raw density of a cell, `0.0` outside the grid.
    pub fn density(&self, x: usize, y: usize) -> f32 {
        if x >= self.cols || y >= self.rows {
            return 0.0;
        }
        self.cells[y * self.cols + x]
    }

    /// Density scaled into `[0, 1]`.
    pub fn intensity(&self, x: usize, y: usize) -> f32 {
        (self.density(x, y) / SATURATION_DENSITY).min(1.0)
    }

    pub fn is_hot(&self, x: usize, y: usize) -> bool {
        self.intensity(x, y) > HOT_THRESHOLD
    }

    /// Coordinates of every hot cell, row by row.
    pub fn hot_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.rows)
            .flat_map(move |y| (0..self.cols).map(move |x| (x, y)))
            .filter(move |&(x, y)| self.is_hot(x, y))
    }

    /// Densest cell and its density, `None` when the map is empty or cold.
    pub fn hottest(&self) -> Option<((usize, usize), f32)> {
        self.cells
            .iter()
            .enumerate()
            .map(|(i, &d)| (i, d))
            .max_by_key(|&(_, d)| OrderedFloat(d))
            .filter(|&(_, d)| d > 0.0)
            .map(|(i, d)| ((i % self.cols, i / self.cols), d))
    }
}
