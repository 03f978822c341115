//! Partial, egocentric observations.
//!
//! The agent sees a 7×7 window of `(object, color, state)` triples in the
//! MiniGrid encoding. The window is not centered on the agent: its center is
//! pushed [`HALF_VIEW`] cells forward along the facing direction, so the agent
//! sees mostly what is ahead of it. The window is not rotated with the agent;
//! rows run along world `y` and columns along world `x`.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::env::Direction;
use crate::grid::{CellKind, Grid};
use crate::visibility::{is_visible, Visibility};

pub const VIEW_SIZE: usize = 7;
pub const HALF_VIEW: i32 = (VIEW_SIZE / 2) as i32;

/// Channels per observed cell: object, color, state.
pub const CHANNELS: usize = 3;

/// Length of a flattened observation.
pub const OBS_LEN: usize = VIEW_SIZE * VIEW_SIZE * CHANNELS;

/// Object codes. Only `Unseen`, `Empty`, `Wall`, `Goal` and `Agent` are ever
/// produced; the rest keep their slots in the shared encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum ObjectKind {
    Unseen = 0,
    Empty = 1,
    Wall = 2,
    Floor = 3,
    Door = 4,
    Key = 5,
    Ball = 6,
    Box = 7,
    Goal = 8,
    Lava = 9,
    Agent = 10,
}

impl ObjectKind {
    /// Largest raw object code; the upper bound of the observation space.
    pub const MAX_CODE: u8 = ObjectKind::Agent as u8;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum ColorKind {
    Black = 0,
    Green = 1,
    Blue = 2,
    Purple = 3,
    Yellow = 4,
    Grey = 5,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ObsCell {
    pub object: ObjectKind,
    pub color: ColorKind,
    /// Reserved for stateful objects (doors); always 0 here.
    pub state: u8,
}

impl ObsCell {
    pub const UNSEEN: ObsCell = ObsCell::new(ObjectKind::Unseen, ColorKind::Black);
    pub const OUT_OF_BOUNDS: ObsCell = ObsCell::new(ObjectKind::Wall, ColorKind::Grey);

    pub const fn new(object: ObjectKind, color: ColorKind) -> Self {
        Self {
            object,
            color,
            state: 0,
        }
    }

    pub fn from_cell(cell: CellKind) -> Self {
        match cell {
            CellKind::Empty => ObsCell::new(ObjectKind::Empty, ColorKind::Black),
            CellKind::Wall => ObsCell::new(ObjectKind::Wall, ColorKind::Grey),
            CellKind::Agent => ObsCell::new(ObjectKind::Agent, ColorKind::Blue),
            CellKind::Goal => ObsCell::new(ObjectKind::Goal, ColorKind::Green),
        }
    }

    pub fn to_bytes(self) -> [u8; CHANNELS] {
        [self.object as u8, self.color as u8, self.state]
    }
}

/// A 7×7 egocentric view, indexed `[row][col]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Observation {
    pub cells: [[ObsCell; VIEW_SIZE]; VIEW_SIZE],
}

impl Default for Observation {
    fn default() -> Self {
        Self {
            cells: [[ObsCell::UNSEEN; VIEW_SIZE]; VIEW_SIZE],
        }
    }
}

impl Observation {
    pub fn get(&self, row: usize, col: usize) -> Option<ObsCell> {
        self.cells.get(row).and_then(|r| r.get(col)).copied()
    }

    /// Flattened `(row * 7 + col) * 3 + channel` byte layout.
    pub fn to_bytes(&self) -> [u8; OBS_LEN] {
        let mut out = [0u8; OBS_LEN];
        self.write_into(&mut out);
        out
    }

    /// Writes the flattened layout into the first [`OBS_LEN`] bytes of `out`.
    ///
    /// Panics if `out` is shorter than [`OBS_LEN`].
    pub fn write_into(&self, out: &mut [u8]) {
        let out = &mut out[..OBS_LEN];
        for (chunk, cell) in out
            .chunks_exact_mut(CHANNELS)
            .zip(self.cells.iter().flatten())
        {
            chunk.copy_from_slice(&cell.to_bytes());
        }
    }
}

/// Center of the view window for an agent at `agent` facing `dir`.
pub fn view_center(agent: (i32, i32), dir: Direction) -> (i32, i32) {
    let (dx, dy) = dir.delta();
    (agent.0 + dx * HALF_VIEW, agent.1 + dy * HALF_VIEW)
}

/// World coordinate of window cell `(row, col)`.
pub fn window_to_world(agent: (i32, i32), dir: Direction, row: usize, col: usize) -> (i32, i32) {
    let (cx, cy) = view_center(agent, dir);
    (cx - HALF_VIEW + col as i32, cy - HALF_VIEW + row as i32)
}

/// Renders the agent's view of `map`.
///
/// Per cell, in order: off the map reads as a grey wall, a cell hidden from
/// the agent reads as unseen, anything else copies the map contents.
pub fn encode(
    map: &Grid<CellKind>,
    agent: (i32, i32),
    dir: Direction,
    visibility: Visibility,
) -> Observation {
    let mut obs = Observation::default();
    for (row, cells) in obs.cells.iter_mut().enumerate() {
        for (col, out) in cells.iter_mut().enumerate() {
            let (wx, wy) = window_to_world(agent, dir, row, col);
            *out = match map.get(wx, wy) {
                None => ObsCell::OUT_OF_BOUNDS,
                Some(_) if !is_visible(map, agent, (wx, wy), visibility) => ObsCell::UNSEEN,
                Some(cell) => ObsCell::from_cell(cell),
            };
        }
    }
    obs
}
