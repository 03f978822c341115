#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// What occupies a single map cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CellKind {
    #[default]
    Empty,
    Wall,
    Agent,
    Goal,
}

impl CellKind {
    #[inline]
    pub fn is_wall(self) -> bool {
        self == CellKind::Wall
    }
}

/// Square, row-major grid addressed by signed `(x, y)` coordinates.
///
/// Coordinates are signed so callers can probe cells outside the map (view
/// windows near the border do this constantly); such probes return `None`
/// instead of panicking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid<T> {
    size: usize,
    cells: Vec<T>,
}

impl<T: Copy> Grid<T> {
    pub fn filled(size: usize, value: T) -> Self {
        Self {
            size,
            cells: vec![value; size * size],
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.size && (y as usize) < self.size
    }

    #[inline]
    fn idx(&self, x: i32, y: i32) -> Option<usize> {
        if self.in_bounds(x, y) {
            Some((y as usize) * self.size + (x as usize))
        } else {
            None
        }
    }

    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Option<T> {
        self.idx(x, y).map(|i| self.cells[i])
    }

    /// Writes `value` at `(x, y)`. Returns `false` (and writes nothing) when
    /// the coordinate is outside the grid.
    #[inline]
    pub fn set(&mut self, x: i32, y: i32, value: T) -> bool {
        match self.idx(x, y) {
            Some(i) => {
                self.cells[i] = value;
                true
            }
            None => false,
        }
    }

    pub fn fill(&mut self, value: T) {
        self.cells.fill(value);
    }

    /// Cells in row-major order.
    pub fn cells(&self) -> &[T] {
        &self.cells
    }
}

impl Grid<CellKind> {
    #[inline]
    pub fn is_wall(&self, x: i32, y: i32) -> bool {
        matches!(self.get(x, y), Some(CellKind::Wall))
    }

    pub fn count(&self, kind: CellKind) -> usize {
        self.cells.iter().filter(|&&c| c == kind).count()
    }
}
