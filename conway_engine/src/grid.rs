// grid.rs - Bounded Game of Life grid with incremental updates
//
// Every cell carries a live-neighbor count. A change to a cell queues it and
// its neighbors on the dirty worklist; a generation only re-evaluates the
// worklist, so a quiet board costs next to nothing.

use arrayvec::ArrayVec;

use crate::error::LifeError;
use crate::geometry::{Point, Rect};
use crate::shape::Shape;

// Game rules
const BIRTH: u8 = 3;
const SURVIVE_MIN: u8 = 2;
const SURVIVE_MAX: u8 = 3;

#[rustfmt::skip]
const OFFSETS: [(i32, i32); 8] = [
    (-1, -1), (0, -1), (1, -1),
    (-1,  0),          (1,  0),
    (-1,  1), (0,  1), (1,  1),
];

/// In-bounds neighbors of one cell, as flat indices.
type Neighbors = ArrayVec<u32, 8>;

pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<bool>,
    counts: Vec<u8>,
    adjacency: Vec<Neighbors>,

    dirty: Vec<u32>,    // cells to re-evaluate next generation
    queued: Vec<bool>,  // membership flags for `dirty`
    born: Vec<u32>,
    died: Vec<u32>,

    updating: bool,
    changed: bool,
    generation: u64,
    population: usize,
}

impl Grid {
    /// Allocate an all-dead `width x height` grid.
    pub fn new(width: usize, height: usize) -> Result<Self, LifeError> {
        let invalid = LifeError::InvalidDimension { width, height };
        if width < 1 || height < 1 || width > i32::MAX as usize || height > i32::MAX as usize {
            return Err(invalid);
        }
        let len = match width.checked_mul(height) {
            Some(len) if len <= u32::MAX as usize => len,
            _ => return Err(invalid),
        };

        Ok(Self {
            width,
            height,
            cells: vec![false; len],
            counts: vec![0; len],
            adjacency: build_adjacency(width, height),
            dirty: Vec::new(),
            queued: vec![false; len],
            born: Vec::new(),
            died: Vec::new(),
            updating: false,
            changed: false,
            generation: 0,
            population: 0,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of generations simulated since construction or the last reset.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn population(&self) -> usize {
        self.population
    }

    /// Cells waiting to be evaluated by the next `update`.
    #[cfg(test)]
    fn pending(&self) -> usize {
        self.dirty.len()
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        let in_bounds = x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height;
        in_bounds.then(|| y as usize * self.width + x as usize)
    }

    fn point_of(&self, index: usize) -> Point {
        Point::new((index % self.width) as i32, (index / self.width) as i32)
    }

    /// Live state of `(x, y)`; off-grid cells read as dead.
    pub fn get_tile(&self, x: i32, y: i32) -> bool {
        self.index(x, y).is_some_and(|i| self.cells[i])
    }

    /// Live-neighbor count of `(x, y)`, `None` off-grid.
    pub fn neighbor_count(&self, x: i32, y: i32) -> Option<u8> {
        self.index(x, y).map(|i| self.counts[i])
    }

    /// Set one cell. Off-grid, unchanged, or mid-generation calls do nothing.
    /// Returns whether the cell flipped.
    pub fn set_tile(&mut self, x: i32, y: i32, alive: bool) -> bool {
        if self.updating {
            return false;
        }
        let Some(i) = self.index(x, y) else {
            return false;
        };
        if self.cells[i] == alive {
            return false;
        }
        self.flip(i, alive);
        self.changed = true;
        true
    }

    /// Turn on every cell of `shape`, centered on `(x, y)`. Never clears cells.
    pub fn put_shape(&mut self, x: i32, y: i32, shape: &Shape) {
        let center = shape.center();
        for p in shape.points() {
            let px = x.saturating_add(p.x - center.x);
            let py = y.saturating_add(p.y - center.y);
            self.set_tile(px, py, true);
        }
    }

    /// Live cells inside `bounds` (clipped to the grid), as a normalized shape.
    pub fn get_shape(&self, bounds: Rect) -> Shape {
        let start_x = bounds.x.max(0);
        let start_y = bounds.y.max(0);
        let end_x = bounds.x.saturating_add(bounds.width).min(self.width as i32);
        let end_y = bounds.y.saturating_add(bounds.height).min(self.height as i32);

        let mut points = Vec::new();
        for y in start_y..end_y {
            for x in start_x..end_x {
                if self.get_tile(x, y) {
                    points.push(Point::new(x, y));
                }
            }
        }
        Shape::new(points)
    }

    /// Coordinates of every live cell, row by row.
    pub fn live_cells(&self) -> impl Iterator<Item = Point> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &alive)| alive)
            .map(|(i, _)| self.point_of(i))
    }

    /// Advance exactly one generation.
    ///
    /// Every dirty cell is judged against the counts as they stood when the
    /// generation began; flips and their count deltas are applied afterwards.
    pub fn update(&mut self) {
        self.updating = true;

        let mut dirty = std::mem::take(&mut self.dirty);
        for &i in &dirty {
            let i = i as usize;
            self.queued[i] = false;
            match (self.cells[i], self.counts[i]) {
                (false, BIRTH) => self.born.push(i as u32),
                (true, n) if !(SURVIVE_MIN..=SURVIVE_MAX).contains(&n) => self.died.push(i as u32),
                _ => {}
            }
        }
        dirty.clear();
        self.dirty = dirty;

        let born = std::mem::take(&mut self.born);
        let died = std::mem::take(&mut self.died);
        for &i in &born {
            self.flip(i as usize, true);
        }
        for &i in &died {
            self.flip(i as usize, false);
        }
        if !born.is_empty() || !died.is_empty() {
            self.changed = true;
        }
        self.born = born;
        self.died = died;
        self.born.clear();
        self.died.clear();

        self.generation += 1;
        self.updating = false;
    }

    /// Kill every live cell and empty the worklist.
    pub fn reset(&mut self) {
        if self.updating {
            return;
        }
        for i in 0..self.cells.len() {
            if self.cells[i] {
                self.flip(i, false);
                self.changed = true;
            }
        }
        for &i in &self.dirty {
            self.queued[i as usize] = false;
        }
        self.dirty.clear();
        self.generation = 0;
        debug_assert!(self.counts.iter().all(|&c| c == 0));
    }

    /// Consume the "changed since last render" flag.
    pub fn take_changed(&mut self) -> bool {
        std::mem::take(&mut self.changed)
    }

    #[cfg(test)]
    fn is_changed(&self) -> bool {
        self.changed
    }

    fn flip(&mut self, i: usize, alive: bool) {
        self.cells[i] = alive;
        if alive {
            self.population += 1;
        } else {
            self.population -= 1;
        }

        let Self { adjacency, counts, dirty, queued, .. } = self;
        mark(dirty, queued, i as u32);
        for &n in &adjacency[i] {
            let slot = &mut counts[n as usize];
            if alive {
                *slot += 1;
            } else {
                *slot -= 1;
            }
            mark(dirty, queued, n);
        }
    }
}

fn mark(dirty: &mut Vec<u32>, queued: &mut [bool], i: u32) {
    let flag = &mut queued[i as usize];
    if !*flag {
        *flag = true;
        dirty.push(i);
    }
}

fn build_adjacency(width: usize, height: usize) -> Vec<Neighbors> {
    let (w, h) = (width as i32, height as i32);
    let mut table = Vec::with_capacity(width * height);
    for y in 0..h {
        for x in 0..w {
            let neighbors: Neighbors = OFFSETS
                .iter()
                .map(|&(dx, dy)| (x + dx, y + dy))
                .filter(|&(nx, ny)| nx >= 0 && nx < w && ny >= 0 && ny < h)
                .map(|(nx, ny)| (ny * w + nx) as u32)
                .collect();
            table.push(neighbors);
        }
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    fn live(grid: &Grid) -> Vec<Point> {
        grid.live_cells().collect()
    }

    fn sorted(mut v: Vec<Point>) -> Vec<Point> {
        v.sort_unstable();
        v
    }

    fn pts(raw: &[(i32, i32)]) -> Vec<Point> {
        raw.iter().copied().map(Point::from).collect()
    }

    fn brute_count(grid: &Grid, x: i32, y: i32) -> u8 {
        OFFSETS.iter().filter(|&&(dx, dy)| grid.get_tile(x + dx, y + dy)).count() as u8
    }

    fn assert_counts_consistent(grid: &Grid) {
        for y in 0..grid.height() as i32 {
            for x in 0..grid.width() as i32 {
                assert_eq!(
                    grid.neighbor_count(x, y),
                    Some(brute_count(grid, x, y)),
                    "neighbor count drifted at ({x}, {y})"
                );
            }
        }
        assert_eq!(grid.population(), grid.live_cells().count());
    }

    /// Plain full-board generation, used as the reference.
    fn naive_step(grid: &Grid) -> Vec<Point> {
        let mut next = Vec::new();
        for y in 0..grid.height() as i32 {
            for x in 0..grid.width() as i32 {
                let next_state = match (grid.get_tile(x, y), brute_count(grid, x, y)) {
                    (true, 2) | (true, 3) => true,  // Survival
                    (false, 3) => true,             // Birth
                    _ => false,                     // Death or stays dead
                };
                if next_state {
                    next.push(Point::new(x, y));
                }
            }
        }
        next
    }

    struct Lcg(u64);

    impl Lcg {
        fn next(&mut self) -> u64 {
            self.0 = self.0.wrapping_mul(1103515245).wrapping_add(12345);
            self.0 >> 16
        }
    }

    #[test]
    fn rejects_zero_dimensions() {
        assert_eq!(Grid::new(0, 5).err(), Some(LifeError::InvalidDimension { width: 0, height: 5 }));
        assert!(Grid::new(5, 0).is_err());
        assert!(Grid::new(1, 1).is_ok());
    }

    #[test]
    fn starts_dead_with_zero_counts() {
        let grid = Grid::new(4, 3).unwrap();
        assert_eq!(grid.population(), 0);
        assert_eq!(grid.pending(), 0);
        assert_counts_consistent(&grid);
    }

    #[test]
    fn adjacency_sizes_by_position() {
        let grid = Grid::new(4, 4).unwrap();
        assert_eq!(grid.adjacency[0].len(), 3);   // corner
        assert_eq!(grid.adjacency[1].len(), 5);   // edge
        assert_eq!(grid.adjacency[5].len(), 8);   // interior
        assert_eq!(grid.adjacency[15].len(), 3);

        let strip = Grid::new(3, 1).unwrap();
        assert_eq!(strip.adjacency[0].len(), 1);
        assert_eq!(strip.adjacency[1].len(), 2);
    }

    #[test]
    fn set_tile_is_idempotent() {
        let mut grid = Grid::new(5, 5).unwrap();
        assert!(grid.set_tile(2, 2, true));
        let counts = grid.counts.clone();
        assert!(!grid.set_tile(2, 2, true));
        assert_eq!(grid.counts, counts);
        assert_eq!(grid.population(), 1);
        assert_eq!(grid.neighbor_count(1, 1), Some(1));
        assert_counts_consistent(&grid);
    }

    #[test]
    fn out_of_bounds_is_silent() {
        let mut grid = Grid::new(3, 3).unwrap();
        assert!(!grid.set_tile(-1, 0, true));
        assert!(!grid.set_tile(3, 0, true));
        assert!(!grid.set_tile(0, 3, true));
        assert!(!grid.get_tile(-1, -1));
        assert!(!grid.get_tile(10, 10));
        assert_eq!(grid.neighbor_count(3, 3), None);
        assert!(!grid.is_changed());
    }

    #[test]
    fn changed_flag_is_consumed() {
        let mut grid = Grid::new(3, 3).unwrap();
        assert!(!grid.take_changed());
        grid.set_tile(1, 1, true);
        assert!(grid.take_changed());
        assert!(!grid.take_changed());
        grid.update(); // lone cell dies
        assert!(grid.take_changed());
        grid.update(); // nothing left to do
        assert!(!grid.take_changed());
    }

    #[test]
    fn blinker_oscillates() {
        let mut grid = Grid::new(3, 3).unwrap();
        for p in pts(&[(1, 0), (1, 1), (1, 2)]) {
            grid.set_tile(p.x, p.y, true);
        }
        grid.update();
        assert_eq!(sorted(live(&grid)), pts(&[(0, 1), (1, 1), (2, 1)]));
        assert_counts_consistent(&grid);

        grid.update();
        assert_eq!(sorted(live(&grid)), pts(&[(1, 0), (1, 1), (1, 2)]));
        assert_eq!(grid.generation(), 2);
        assert_counts_consistent(&grid);
    }

    #[test]
    fn block_is_still_and_goes_quiet() {
        let mut grid = Grid::new(6, 6).unwrap();
        let block = pts(&[(2, 2), (2, 3), (3, 2), (3, 3)]);
        for p in &block {
            grid.set_tile(p.x, p.y, true);
        }
        for _ in 0..5 {
            grid.update();
            assert_eq!(sorted(live(&grid)), block);
        }
        assert_eq!(grid.pending(), 0);
        assert_counts_consistent(&grid);
    }

    #[test]
    fn lone_cell_dies() {
        let mut grid = Grid::new(5, 5).unwrap();
        grid.set_tile(2, 2, true);
        grid.update();
        assert_eq!(grid.population(), 0);
        assert_counts_consistent(&grid);
    }

    #[test]
    fn corner_cells_do_not_wrap() {
        let mut grid = Grid::new(4, 4).unwrap();
        // would be a block if the board were a torus
        for p in pts(&[(0, 0), (3, 0), (0, 3), (3, 3)]) {
            grid.set_tile(p.x, p.y, true);
        }
        grid.update();
        assert_eq!(grid.population(), 0);
    }

    #[test]
    fn matches_full_recompute_on_random_soup() {
        let mut grid = Grid::new(24, 17).unwrap();
        let mut rng = Lcg(42);
        for y in 0..17 {
            for x in 0..24 {
                if rng.next() % 3 == 0 {
                    grid.set_tile(x, y, true);
                }
            }
        }
        for _ in 0..40 {
            let expected = naive_step(&grid);
            grid.update();
            assert_eq!(live(&grid), expected);
            assert_counts_consistent(&grid);
        }
    }

    #[test]
    fn counts_hold_across_mixed_paint_and_update() {
        let mut grid = Grid::new(9, 7).unwrap();
        let mut rng = Lcg(7);
        for round in 0..200 {
            let x = (rng.next() % 11) as i32 - 1;
            let y = (rng.next() % 9) as i32 - 1;
            grid.set_tile(x, y, rng.next() % 4 != 0);
            if round % 5 == 0 {
                grid.update();
            }
            assert_counts_consistent(&grid);
        }
    }

    #[test]
    fn reset_clears_cells_counts_and_worklist() {
        let mut grid = Grid::new(8, 8).unwrap();
        for p in pts(&[(0, 0), (1, 1), (2, 2), (7, 7), (3, 4)]) {
            grid.set_tile(p.x, p.y, true);
        }
        grid.update();
        grid.reset();
        assert_eq!(grid.population(), 0);
        assert_eq!(grid.pending(), 0);
        assert_eq!(grid.generation(), 0);
        assert!(grid.counts.iter().all(|&c| c == 0));
        assert!(grid.queued.iter().all(|&q| !q));

        // still usable afterwards
        grid.set_tile(4, 4, true);
        grid.update();
        assert_eq!(grid.population(), 0);
    }

    #[test]
    fn set_tile_ignored_while_updating() {
        let mut grid = Grid::new(3, 3).unwrap();
        grid.updating = true;
        assert!(!grid.set_tile(1, 1, true));
        grid.updating = false;
        assert!(grid.set_tile(1, 1, true));
    }

    #[test]
    fn put_shape_centers_and_clips() {
        let mut grid = Grid::new(5, 5).unwrap();
        let bar = Shape::new(pts(&[(0, 0), (1, 0), (2, 0)]));
        grid.put_shape(2, 2, &bar);
        assert_eq!(live(&grid), pts(&[(1, 2), (2, 2), (3, 2)]));

        grid.reset();
        grid.put_shape(0, 0, &bar);
        assert_eq!(live(&grid), pts(&[(0, 0), (1, 0)]));
    }

    #[test]
    fn put_shape_never_clears() {
        let mut grid = Grid::new(5, 5).unwrap();
        grid.set_tile(0, 4, true);
        grid.put_shape(2, 2, &Shape::new(pts(&[(0, 0)])));
        assert!(grid.get_tile(0, 4));
        assert!(grid.get_tile(2, 2));
    }

    #[test]
    fn get_shape_clips_to_grid() {
        let mut grid = Grid::new(5, 5).unwrap();
        grid.set_tile(0, 0, true);
        grid.set_tile(1, 0, true);
        grid.set_tile(4, 4, true);

        let shape = grid.get_shape(Rect::new(-3, -3, 5, 5));
        assert_eq!(shape.points(), pts(&[(0, 0), (1, 0)]).as_slice());

        assert!(grid.get_shape(Rect::new(2, 2, 2, 2)).is_empty());
        assert!(grid.get_shape(Rect::new(9, 9, 3, 3)).is_empty());
    }

    #[test]
    fn get_then_put_reproduces_pattern() {
        let mut grid = Grid::new(12, 12).unwrap();
        let glider = pts(&[(5, 4), (6, 5), (4, 6), (5, 6), (6, 6)]);
        for p in &glider {
            grid.set_tile(p.x, p.y, true);
        }
        let shape = grid.get_shape(Rect::new(4, 4, 3, 3));
        grid.reset();

        let anchor = Point::new(4 + shape.center().x, 4 + shape.center().y);
        grid.put_shape(anchor.x, anchor.y, &shape);
        assert_eq!(sorted(live(&grid)), sorted(glider));
    }
}
