use crate::agent::{Agent, AgentKey};
use colony_common::Vec2;
use std::collections::HashMap;

/// Integer coordinate of a grid cell.
pub type CellCoord = (i32, i32);

/// Uniform spatial hash over the hazard agents of one tick.
///
/// Cells are keyed by coordinate rather than laid out in a bounded array,
/// so positions may be negative or drift arbitrarily far from the origin.
/// The index is rebuilt every tick and must not outlive it.
#[derive(Debug, Clone)]
pub struct HazardGrid {
    inv_cell_size: f32,
    cells: HashMap<CellCoord, Vec<(Vec2, AgentKey)>>,
    len: usize,
}

impl HazardGrid {
    /// Empty grid. `cell_size` must be at least the largest radius that
    /// will be queried, otherwise the 3x3 scan can miss neighbors.
    pub fn new(cell_size: f32) -> Self {
        let inv_cell_size = if cell_size > 1e-9 { 1.0 / cell_size } else { 0.0 };
        Self { inv_cell_size, cells: HashMap::new(), len: 0 }
    }

    /// Bins every live producer. Other agents are not hazards and are skipped.
    pub fn build<'a, I>(agents: I, cell_size: f32) -> Self
    where
        I: IntoIterator<Item = &'a Agent>,
    {
        let mut grid = Self::new(cell_size);
        for agent in agents {
            if agent.cell_type.is_producer() {
                grid.insert(agent.body.position.xy(), agent.key);
            }
        }
        grid
    }

    pub fn insert(&mut self, pos: Vec2, key: AgentKey) {
        let coord = self.cell_coord(pos);
        self.cells.entry(coord).or_default().push((pos, key));
        self.len += 1;
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// `(floor(x / cell_size), floor(y / cell_size))`
    #[inline(always)]
    pub fn cell_coord(&self, pos: Vec2) -> CellCoord {
        (
            (pos.x * self.inv_cell_size).floor() as i32,
            (pos.y * self.inv_cell_size).floor() as i32,
        )
    }

    /// Every entry in the 3x3 block of cells centered on `pos`'s cell.
    /// Order is unspecified. At the edge of the `i32` coordinate range the
    /// block is cut off instead of wrapping.
    pub fn neighbors(&self, pos: Vec2) -> impl Iterator<Item = (Vec2, AgentKey)> + '_ {
        let (cx, cy) = self.cell_coord(pos);
        (-1..=1)
            .flat_map(move |dy| (-1..=1).map(move |dx| (dx, dy)))
            .filter_map(move |(dx, dy)| Some((cx.checked_add(dx)?, cy.checked_add(dy)?)))
            .filter_map(move |coord| self.cells.get(&coord))
            .flat_map(|entries| entries.iter().copied())
    }

    /// Returns the first neighbor within `max_dist_sq` (inclusive) for which
    /// `f` returns true. Stops scanning at the first hit.
    #[inline(always)]
    pub fn find_first_within<F>(&self, pos: Vec2, max_dist_sq: f32, mut f: F) -> Option<AgentKey>
    where
        F: FnMut(AgentKey) -> bool,
    {
        if self.is_empty() {
            return None;
        }
        for (neighbor_pos, key) in self.neighbors(pos) {
            if pos.distance_squared(neighbor_pos) <= max_dist_sq && f(key) {
                return Some(key);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_with(cell_size: f32, points: &[(f32, f32)]) -> HazardGrid {
        let mut grid = HazardGrid::new(cell_size);
        for (i, &(x, y)) in points.iter().enumerate() {
            grid.insert(Vec2::new(x, y), AgentKey(i as u64));
        }
        grid
    }

    fn hit(grid: &HazardGrid, x: f32, y: f32, max_dist_sq: f32) -> bool {
        grid.find_first_within(Vec2::new(x, y), max_dist_sq, |_| true).is_some()
    }

    #[test]
    fn cell_coord_floors_negative_positions() {
        let grid = HazardGrid::new(2.0);
        assert_eq!(grid.cell_coord(Vec2::new(0.5, 3.9)), (0, 1));
        assert_eq!(grid.cell_coord(Vec2::new(-0.1, -2.0)), (-1, -1));
        assert_eq!(grid.cell_coord(Vec2::new(-2.1, 4.0)), (-2, 2));
    }

    #[test]
    fn neighbors_scan_exactly_the_3x3_block() {
        // One point in the center of each cell from -2..=2 on both axes.
        let mut points = Vec::new();
        for gy in -2..=2 {
            for gx in -2..=2 {
                points.push((gx as f32 + 0.5, gy as f32 + 0.5));
            }
        }
        let grid = grid_with(1.0, &points);
        let found: Vec<_> = grid.neighbors(Vec2::new(0.2, 0.7)).collect();
        assert_eq!(found.len(), 9);
        for (pos, _) in found {
            let (gx, gy) = grid.cell_coord(pos);
            assert!((-1..=1).contains(&gx) && (-1..=1).contains(&gy));
        }
    }

    #[test]
    fn boundary_distance_is_inclusive() {
        let grid = grid_with(2.0, &[(0.0, 0.0)]);
        assert!(hit(&grid, 2.0, 0.0, 4.0));
        assert!(!hit(&grid, 2.001, 0.0, 4.0));
        assert!(hit(&grid, -1.2, -1.6, 4.0));
    }

    #[test]
    fn first_hit_respects_filter() {
        let grid = grid_with(2.0, &[(0.0, 0.0), (0.5, 0.0)]);
        let hit = grid.find_first_within(Vec2::new(0.25, 0.0), 1.0, |key| key == AgentKey(1));
        assert_eq!(hit, Some(AgentKey(1)));
        assert_eq!(grid.find_first_within(Vec2::new(0.25, 0.0), 1.0, |_| false), None);
    }

    #[test]
    fn empty_grid_finds_nothing() {
        let grid = HazardGrid::new(2.0);
        assert!(grid.is_empty());
        assert!(!hit(&grid, 0.0, 0.0, 100.0));
    }

    #[test]
    fn far_out_positions_clip_the_scan_without_overflow() {
        let grid = grid_with(1.0, &[(1.0e12, 1.0e12), (-1.0e12, -1.0e12)]);
        assert_eq!(grid.cell_coord(Vec2::new(1.0e12, 1.0e12)), (i32::MAX, i32::MAX));
        assert_eq!(grid.cell_coord(Vec2::new(-1.0e12, -1.0e12)), (i32::MIN, i32::MIN));

        let high: Vec<_> = grid.neighbors(Vec2::new(1.0e12, 1.0e12)).collect();
        assert_eq!(high, vec![(Vec2::new(1.0e12, 1.0e12), AgentKey(0))]);
        assert!(hit(&grid, -1.0e12, -1.0e12, 1.0));
        assert!(!hit(&grid, 1.0e12, -1.0e12, 1.0));
    }
}
