#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::grid::{CellKind, Grid};

/// How walls interact with the agent's line of sight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Visibility {
    /// Walls hide everything behind them.
    #[default]
    LineOfSight,
    /// Every cell is visible regardless of walls.
    SeeThroughWalls,
}

impl Visibility {
    pub fn from_see_through(see_through_walls: bool) -> Self {
        if see_through_walls {
            Visibility::SeeThroughWalls
        } else {
            Visibility::LineOfSight
        }
    }
}

/// Returns whether `target` can be seen from `observer`.
///
/// Walks the integer Bresenham line from `observer` towards `target`. Any
/// in-bounds wall strictly between the two endpoints blocks the view. The
/// target itself is always visible once reached, so a wall is seen but hides
/// what lies behind it. Lattice points off the map never block.
pub fn is_visible(
    map: &Grid<CellKind>,
    observer: (i32, i32),
    target: (i32, i32),
    mode: Visibility,
) -> bool {
    if mode == Visibility::SeeThroughWalls {
        return true;
    }

    let (tx, ty) = target;
    let (mut x, mut y) = observer;
    let dx = (tx - x).abs();
    let dy = (ty - y).abs();
    let step_x = if tx > x { 1 } else { -1 };
    let step_y = if ty > y { 1 } else { -1 };
    let mut err = dx - dy;

    while (x, y) != target {
        let e2 = 2 * err;
        if e2 > -dy {
            err -= dy;
            x += step_x;
        }
        if e2 < dx {
            err += dx;
            y += step_y;
        }

        if (x, y) != target && map.is_wall(x, y) {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_room(size: usize) -> Grid<CellKind> {
        let mut g = Grid::filled(size, CellKind::Empty);
        let n = size as i32;
        for i in 0..n {
            g.set(i, 0, CellKind::Wall);
            g.set(i, n - 1, CellKind::Wall);
            g.set(0, i, CellKind::Wall);
            g.set(n - 1, i, CellKind::Wall);
        }
        g
    }

    #[test]
    fn a_cell_always_sees_itself() {
        let g = open_room(7);
        for y in 0..7 {
            for x in 0..7 {
                assert!(is_visible(&g, (x, y), (x, y), Visibility::LineOfSight));
            }
        }
    }

    #[test]
    fn walls_are_seen_but_block_what_is_behind() {
        let mut g = open_room(9);
        g.set(4, 3, CellKind::Wall);

        assert!(is_visible(&g, (2, 3), (4, 3), Visibility::LineOfSight));
        assert!(!is_visible(&g, (2, 3), (6, 3), Visibility::LineOfSight));
        assert!(!is_visible(&g, (2, 3), (5, 3), Visibility::LineOfSight));
        // The border itself is visible from inside.
        assert!(is_visible(&g, (2, 3), (2, 0), Visibility::LineOfSight));
    }

    #[test]
    fn diagonal_line_is_blocked_by_wall_on_the_path() {
        let mut g = open_room(9);
        g.set(3, 3, CellKind::Wall);
        assert!(!is_visible(&g, (1, 1), (5, 5), Visibility::LineOfSight));
        assert!(is_visible(&g, (1, 1), (3, 3), Visibility::LineOfSight));
        assert!(is_visible(&g, (1, 1), (5, 1), Visibility::LineOfSight));
    }

    #[test]
    fn shallow_line_follows_bresenham_cells() {
        // (1,1) -> (4,2) passes through (2,1) then (3,2).
        for wall in [(2, 1), (3, 2)] {
            let mut g = open_room(9);
            g.set(wall.0, wall.1, CellKind::Wall);
            assert!(!is_visible(&g, (1, 1), (4, 2), Visibility::LineOfSight), "{wall:?}");
        }
        // Neighbours the line skips never block it.
        for wall in [(3, 1), (2, 2)] {
            let mut g = open_room(9);
            g.set(wall.0, wall.1, CellKind::Wall);
            assert!(is_visible(&g, (1, 1), (4, 2), Visibility::LineOfSight), "{wall:?}");
        }
    }

    #[test]
    fn see_through_mode_ignores_walls() {
        let mut g = open_room(9);
        g.set(4, 3, CellKind::Wall);
        assert!(is_visible(&g, (2, 3), (6, 3), Visibility::SeeThroughWalls));
    }

    #[test]
    fn off_map_points_do_not_block() {
        let g = open_room(5);
        assert!(is_visible(&g, (0, 0), (-3, -2), Visibility::LineOfSight));
    }
}
