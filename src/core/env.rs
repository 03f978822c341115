//! The four-rooms episode state machine.
//!
//! One [`FourRooms`] owns everything an episode needs: the map, the agent pose,
//! the goal, the tick counter, its random source and its episode log.
//! Terminal steps reset the episode in place, so between calls the
//! environment is always mid-episode.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::config::EnvConfig;
use crate::error::EnvError;
use crate::grid::{CellKind, Grid};
use crate::log::EpisodeLog;
use crate::mapgen;
use crate::observation::{encode, Observation};
use crate::prng::Prng;
use crate::visibility::Visibility;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum Direction {
    East = 0,
    South = 1,
    West = 2,
    North = 3,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::East,
        Direction::South,
        Direction::West,
        Direction::North,
    ];

    pub fn from_index(i: usize) -> Self {
        Self::ALL[i % 4]
    }

    pub fn index(self) -> usize {
        self as usize
    }

    /// Counter-clockwise quarter turn.
    pub fn turn_left(self) -> Self {
        Self::from_index(self.index() + 3)
    }

    /// Clockwise quarter turn.
    pub fn turn_right(self) -> Self {
        Self::from_index(self.index() + 1)
    }

    /// Unit step in map coordinates (`y` grows downwards).
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::East => (1, 0),
            Direction::South => (0, 1),
            Direction::West => (-1, 0),
            Direction::North => (0, -1),
        }
    }
}

/// The discrete action space. Only the first three move the agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum Action {
    Left = 0,
    Right = 1,
    Forward = 2,
    Pickup = 3,
    Drop = 4,
    Toggle = 5,
    Done = 6,
}

impl Action {
    /// Size of the discrete action space.
    pub const COUNT: usize = 7;

    /// Decodes a host action. Unknown values map to `None` and act as a no-op.
    pub fn from_raw(raw: i32) -> Option<Self> {
        Some(match raw {
            0 => Action::Left,
            1 => Action::Right,
            2 => Action::Forward,
            3 => Action::Pickup,
            4 => Action::Drop,
            5 => Action::Toggle,
            6 => Action::Done,
            _ => return None,
        })
    }
}

/// Why an episode ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum EpisodeEnd {
    GoalReached,
    Timeout,
}

/// Result of a single step.
///
/// On a terminal step `observation` already belongs to the freshly reset
/// episode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    pub observation: Observation,
    pub reward: f32,
    pub terminal: bool,
    pub ended: Option<EpisodeEnd>,
}

#[derive(Debug, Clone)]
pub struct FourRooms {
    config: EnvConfig,
    visibility: Visibility,
    rng: Prng,
    map: Grid<CellKind>,
    agent: (i32, i32),
    dir: Direction,
    goal: (i32, i32),
    tick: u32,
    observation: Observation,
    log: EpisodeLog,
}

impl FourRooms {
    /// Validates `config`, allocates the map and starts the first episode.
    pub fn new(config: EnvConfig) -> Result<Self, EnvError> {
        config.validate()?;
        let mut env = Self {
            visibility: Visibility::from_see_through(config.see_through_walls),
            rng: Prng::new(config.seed),
            map: Grid::filled(config.size, CellKind::Empty),
            agent: (0, 0),
            dir: Direction::East,
            goal: (0, 0),
            tick: 0,
            observation: Observation::default(),
            log: EpisodeLog::new(),
            config,
        };
        env.reset();
        Ok(env)
    }

    /// Replaces the random source. Takes effect from the next reset.
    pub fn reseed(&mut self, seed: u64) {
        self.rng = Prng::new(seed);
    }

    /// Hands over an explicit random source, e.g. one derived per instance.
    pub fn set_rng(&mut self, rng: Prng) {
        self.rng = rng;
    }

    /// Starts a new episode on a freshly generated map.
    pub fn reset(&mut self) -> Observation {
        mapgen::stamp_four_rooms(&mut self.map, &mut self.rng);

        self.agent = self.sample_empty_cell(None);
        self.goal = self.sample_empty_cell(Some(self.agent));
        self.map.set(self.agent.0, self.agent.1, CellKind::Agent);
        self.map.set(self.goal.0, self.goal.1, CellKind::Goal);

        self.dir = Direction::from_index(self.rng.below(4));
        self.tick = 0;
        self.observe()
    }

    /// Applies a raw host action. Values outside `0..=2` leave the pose
    /// untouched but still advance the tick.
    pub fn step(&mut self, raw_action: i32) -> Step {
        self.apply(Action::from_raw(raw_action))
    }

    pub fn step_action(&mut self, action: Action) -> Step {
        self.apply(Some(action))
    }

    fn apply(&mut self, action: Option<Action>) -> Step {
        self.tick += 1;
        self.map.set(self.agent.0, self.agent.1, CellKind::Empty);

        let mut pos = self.agent;
        let mut dir = self.dir;
        match action {
            Some(Action::Left) => dir = dir.turn_left(),
            Some(Action::Right) => dir = dir.turn_right(),
            Some(Action::Forward) => {
                let (dx, dy) = dir.delta();
                let (nx, ny) = (pos.0 + dx, pos.1 + dy);
                match self.map.get(nx, ny) {
                    Some(cell) if !cell.is_wall() => pos = (nx, ny),
                    _ => trace!(x = nx, y = ny, "forward blocked"),
                }
            }
            Some(other) => trace!(?other, "reserved action ignored"),
            None => trace!("unknown action ignored"),
        }
        self.dir = dir;
        self.agent = pos;

        if self.agent == self.goal {
            return self.finish(EpisodeEnd::GoalReached, 1.0);
        }

        self.map.set(self.agent.0, self.agent.1, CellKind::Agent);

        if self.tick >= self.max_ticks() {
            return self.finish(EpisodeEnd::Timeout, 0.0);
        }

        Step {
            observation: self.observe(),
            reward: 0.0,
            terminal: false,
            ended: None,
        }
    }

    fn finish(&mut self, end: EpisodeEnd, reward: f32) -> Step {
        self.log.record_episode(reward, self.tick);
        debug!(?end, tick = self.tick, reward, "episode finished");
        let observation = self.reset();
        Step {
            observation,
            reward,
            terminal: true,
            ended: Some(end),
        }
    }

    fn observe(&mut self) -> Observation {
        self.observation = encode(&self.map, self.agent, self.dir, self.visibility);
        self.observation
    }

    // A well-formed four-rooms map always has empty interior cells, so the
    // rejection loop terminates.
    fn sample_empty_cell(&mut self, exclude: Option<(i32, i32)>) -> (i32, i32) {
        let hi = self.config.size - 2;
        loop {
            let x = self.rng.range_inclusive(1, hi) as i32;
            let y = self.rng.range_inclusive(1, hi) as i32;
            if self.map.get(x, y) == Some(CellKind::Empty) && exclude != Some((x, y)) {
                return (x, y);
            }
        }
    }

    /// Step budget per episode: `size²`.
    pub fn max_ticks(&self) -> u32 {
        u32::try_from(self.config.size * self.config.size).unwrap_or(u32::MAX)
    }

    pub fn size(&self) -> usize {
        self.config.size
    }

    pub fn config(&self) -> &EnvConfig {
        &self.config
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn map(&self) -> &Grid<CellKind> {
        &self.map
    }

    pub fn agent_pos(&self) -> (i32, i32) {
        self.agent
    }

    pub fn direction(&self) -> Direction {
        self.dir
    }

    pub fn goal_pos(&self) -> (i32, i32) {
        self.goal
    }

    pub fn tick(&self) -> u32 {
        self.tick
    }

    /// The most recent observation.
    pub fn observation(&self) -> &Observation {
        &self.observation
    }

    pub fn log(&self) -> &EpisodeLog {
        &self.log
    }

    /// Returns the accumulated log and starts a new one.
    pub fn take_log(&mut self) -> EpisodeLog {
        std::mem::take(&mut self.log)
    }

    /// Releases the instance and its map.
    pub fn close(self) {
        debug!(episodes = self.log.n, "closing environment");
    }

    #[cfg(test)]
    fn place(&mut self, agent: (i32, i32), dir: Direction, goal: (i32, i32)) {
        self.map.set(self.agent.0, self.agent.1, CellKind::Empty);
        self.map.set(self.goal.0, self.goal.1, CellKind::Empty);
        self.agent = agent;
        self.dir = dir;
        self.goal = goal;
        self.map.set(agent.0, agent.1, CellKind::Agent);
        self.map.set(goal.0, goal.1, CellKind::Goal);
    }
}
