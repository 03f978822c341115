//! Four-rooms layout generation.
//!
//! The map is a walled square split into four quadrant rooms by a full-height
//! wall at column `size / 2` and a full-width wall at row `size / 2`. Each of
//! the four half-segments gets exactly one randomly placed gap, so every room
//! connects to its two neighbours.

use crate::grid::{CellKind, Grid};
use crate::prng::Prng;

/// Gap cells punched into the dividing walls, as `(x, y)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gaps {
    pub vertical_upper: (i32, i32),
    pub vertical_lower: (i32, i32),
    pub horizontal_left: (i32, i32),
    pub horizontal_right: (i32, i32),
}

impl Gaps {
    pub fn all(&self) -> [(i32, i32); 4] {
        [
            self.vertical_upper,
            self.vertical_lower,
            self.horizontal_left,
            self.horizontal_right,
        ]
    }
}

/// Allocates a fresh `size × size` map and stamps a four-rooms layout into it.
///
/// `size` must be at least 6 (see [`crate::config::EnvConfig::MIN_SIZE`]);
/// callers validate this up front.
pub fn generate(size: usize, rng: &mut Prng) -> (Grid<CellKind>, Gaps) {
    let mut grid = Grid::filled(size, CellKind::Empty);
    let gaps = stamp_four_rooms(&mut grid, rng);
    (grid, gaps)
}

/// Rebuilds `grid` in place. Any previous contents are discarded.
pub fn stamp_four_rooms(grid: &mut Grid<CellKind>, rng: &mut Prng) -> Gaps {
    let size = grid.size();
    debug_assert!(size >= 6, "four-rooms layout needs size >= 6");
    let n = size as i32;
    let mid = (size / 2) as i32;

    grid.fill(CellKind::Empty);

    for i in 0..n {
        grid.set(i, 0, CellKind::Wall);
        grid.set(i, n - 1, CellKind::Wall);
        grid.set(0, i, CellKind::Wall);
        grid.set(n - 1, i, CellKind::Wall);
    }

    for i in 0..n {
        grid.set(mid, i, CellKind::Wall);
        grid.set(i, mid, CellKind::Wall);
    }

    // Same ranges on both axes: one gap in each half of each dividing wall.
    let half = size / 2;
    let upper = rng.range_inclusive(1, half - 2) as i32;
    let lower = rng.range_inclusive(half + 1, size - 2) as i32;
    let left = rng.range_inclusive(1, half - 2) as i32;
    let right = rng.range_inclusive(half + 1, size - 2) as i32;

    let gaps = Gaps {
        vertical_upper: (mid, upper),
        vertical_lower: (mid, lower),
        horizontal_left: (left, mid),
        horizontal_right: (right, mid),
    };
    for (x, y) in gaps.all() {
        grid.set(x, y, CellKind::Empty);
    }
    gaps
}
