//! Uniform grid used to gather neighbour candidates without an all-pairs scan.

use crowdwatch_core::{Arena, Vec2};
use smallvec::SmallVec;

type Cell = SmallVec<[usize; 8]>;

/// Buckets crowd indices by grid cell.
///
/// Rebuilt from scratch every tick from the pre-update positions. Cell
/// coordinates are clamped to the grid, so points outside the arena land in
/// the nearest edge cell; clamping never increases the cell distance between
/// two points, so no true neighbour is ever missed.
#[derive(Debug, Clone)]
pub struct SpatialGrid {
    cell_size: f32,
    cols: usize,
    rows: usize,
    cells: Vec<Cell>,
}

impl SpatialGrid {
    pub fn new(cell_size: f32, arena: &Arena) -> Self {
        let mut grid = Self {
            cell_size: if cell_size > 0.0 { cell_size } else { 1.0 },
            cols: 0,
            rows: 0,
            cells: Vec::new(),
        };
        grid.resize_for(arena);
        grid
    }

    /// Matches the grid dimensions to the arena, keeping allocations when unchanged.
    fn resize_for(&mut self, arena: &Arena) {
        let cols = ((arena.width() / self.cell_size).ceil() as usize).max(1);
        let rows = ((arena.height() / self.cell_size).ceil() as usize).max(1);
        if cols != self.cols || rows != self.rows {
            self.cols = cols;
            self.rows = rows;
            self.cells = vec![Cell::new(); cols * rows];
        }
    }

    /// Get the grid cell coordinates for a position
    #[inline]
    fn cell_of(&self, p: Vec2) -> (usize, usize) {
        // `as` saturates (and maps NaN to 0), then clamp to the grid.
        let x = ((p.x / self.cell_size).floor() as i64).clamp(0, self.cols as i64 - 1);
        let y = ((p.y / self.cell_size).floor() as i64).clamp(0, self.rows as i64 - 1);
        (x as usize, y as usize)
    }

    /// Refill the grid with the given positions; index `i` is the position's
    /// place in the iterator.
    pub fn rebuild<I>(&mut self, arena: &Arena, positions: I)
    where
        I: IntoIterator<Item = Vec2>,
    {
        self.resize_for(arena);
        for cell in &mut self.cells {
            cell.clear();
        }
        for (idx, pos) in positions.into_iter().enumerate() {
            let (x, y) = self.cell_of(pos);
            self.cells[y * self.cols + x].push(idx);
        }
    }

    /// All indices in cells that could hold a point within `radius` of
    /// `center`. Callers still have to check the exact distance.
    pub fn candidates(&self, center: Vec2, radius: f32) -> impl Iterator<Item = usize> + '_ {
        let reach = (radius / self.cell_size).ceil().max(0.0) as usize;
        let (cx, cy) = self.cell_of(center);

        let x0 = cx.saturating_sub(reach);
        let x1 = (cx + reach).min(self.cols - 1);
        let y0 = cy.saturating_sub(reach);
        let y1 = (cy + reach).min(self.rows - 1);

        (y0..=y1)
            .flat_map(move |y| (x0..=x1).map(move |x| y * self.cols + x))
            .flat_map(move |cell| self.cells[cell].iter().copied())
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.cols, self.rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scatter() -> Vec<Vec2> {
        // Deterministic spread including points on cell borders and outside the arena.
        let mut points = Vec::new();
        for i in 0..60 {
            let fi = i as f32;
            points.push(Vec2::new((fi * 37.0) % 820.0 - 10.0, (fi * 53.0) % 320.0 - 10.0));
        }
        points.push(Vec2::new(20.0, 20.0));
        points.push(Vec2::new(39.9, 20.0));
        points.push(Vec2::new(40.0, 20.0));
        points
    }

    #[test]
    fn candidates_cover_every_point_within_radius() {
        let arena = Arena::default();
        let points = scatter();
        let mut grid = SpatialGrid::new(20.0, &arena);
        grid.rebuild(&arena, points.iter().copied());

        for (i, &p) in points.iter().enumerate() {
            let found: Vec<usize> = grid.candidates(p, 20.0).collect();
            for (j, &q) in points.iter().enumerate() {
                if p.distance(q) < 20.0 {
                    assert!(found.contains(&j), "point {j} near {i} missing from candidates");
                }
            }
        }
    }

    #[test]
    fn rebuild_replaces_previous_contents() {
        let arena = Arena::default();
        let mut grid = SpatialGrid::new(20.0, &arena);
        grid.rebuild(&arena, [Vec2::new(100.0, 100.0)]);
        grid.rebuild(&arena, [Vec2::new(500.0, 200.0)]);

        assert_eq!(grid.candidates(Vec2::new(100.0, 100.0), 20.0).count(), 0);
        assert_eq!(grid.candidates(Vec2::new(500.0, 200.0), 20.0).collect::<Vec<_>>(), vec![0]);
    }

    #[test]
    fn dimensions_follow_arena() {
        let grid = SpatialGrid::new(20.0, &Arena::default());
        assert_eq!(grid.dimensions(), (40, 15));

        let tiny = SpatialGrid::new(20.0, &Arena::new(0.0, 0.0, 0.0));
        assert_eq!(tiny.dimensions(), (1, 1));
    }
}
