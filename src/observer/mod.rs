use crate::env::{Direction, FourRooms};
use crate::grid::CellKind;
use crate::observation::{window_to_world, Observation, VIEW_SIZE};
use crate::visibility::is_visible;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A read-only snapshot of an environment, for renderers and debuggers.
///
/// Design intent:
/// - Observers cannot mutate or steer the environment.
/// - Snapshotting is *on-demand* and allocates; stepping stays allocation-free.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EnvSnapshot {
    pub size: usize,
    /// Row-major map contents.
    pub cells: Vec<CellKind>,
    pub agent: (i32, i32),
    pub direction: Direction,
    pub goal: (i32, i32),
    pub tick: u32,
    /// World cells inside the view window that the agent can currently see.
    pub visible: Vec<(i32, i32)>,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub observation: Observation,
}

pub struct EnvAdapter<'a> {
    env: &'a FourRooms,
}

impl<'a> EnvAdapter<'a> {
    pub fn new(env: &'a FourRooms) -> Self {
        Self { env }
    }

    pub fn snapshot(&self) -> EnvSnapshot {
        let env = self.env;
        let map = env.map();
        let agent = env.agent_pos();
        let direction = env.direction();

        let mut visible = Vec::with_capacity(VIEW_SIZE * VIEW_SIZE);
        for row in 0..VIEW_SIZE {
            for col in 0..VIEW_SIZE {
                let p = window_to_world(agent, direction, row, col);
                if map.in_bounds(p.0, p.1) && is_visible(map, agent, p, env.visibility()) {
                    visible.push(p);
                }
            }
        }

        EnvSnapshot {
            size: env.size(),
            cells: map.cells().to_vec(),
            agent,
            direction,
            goal: env.goal_pos(),
            tick: env.tick(),
            visible,
            observation: *env.observation(),
        }
    }
}

impl EnvSnapshot {
    pub fn cell(&self, x: i32, y: i32) -> Option<CellKind> {
        if x < 0 || y < 0 || x as usize >= self.size || y as usize >= self.size {
            return None;
        }
        self.cells.get(y as usize * self.size + x as usize).copied()
    }

    /// Text frame: `#` wall, `G` goal, `>v<^` agent, `.` visible floor.
    pub fn to_ascii(&self) -> String {
        let mut out = String::with_capacity((self.size + 1) * self.size);
        for y in 0..self.size as i32 {
            for x in 0..self.size as i32 {
                let ch = match self.cell(x, y) {
                    Some(CellKind::Wall) => '#',
                    Some(CellKind::Goal) => 'G',
                    Some(CellKind::Agent) => match self.direction {
                        Direction::East => '>',
                        Direction::South => 'v',
                        Direction::West => '<',
                        Direction::North => '^',
                    },
                    Some(CellKind::Empty) if self.visible.contains(&(x, y)) => '.',
                    _ => ' ',
                };
                out.push(ch);
            }
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EnvConfig;

    #[test]
    fn snapshot_mirrors_env_without_touching_it() {
        let mut env = FourRooms::new(EnvConfig::default().with_size(9).with_seed(3)).unwrap();
        env.step(1);
        let before = env.clone();

        let snap = EnvAdapter::new(&env).snapshot();
        assert_eq!(snap.agent, env.agent_pos());
        assert_eq!(snap.goal, env.goal_pos());
        assert_eq!(snap.tick, 1);
        assert_eq!(snap.cells.len(), 81);
        assert_eq!(&snap.observation, env.observation());
        assert!(snap.visible.contains(&env.agent_pos()));

        assert_eq!(env.map(), before.map());
        assert_eq!(env.tick(), before.tick());
    }

    #[test]
    fn ascii_frame_shape() {
        let env = FourRooms::new(EnvConfig::default().with_size(9).with_seed(8)).unwrap();
        let frame = EnvAdapter::new(&env).snapshot().to_ascii();
        let lines: Vec<&str> = frame.lines().collect();
        assert_eq!(lines.len(), 9);
        assert!(lines.iter().all(|l| l.chars().count() == 9));
        assert_eq!(lines[0], "#########");
        assert_eq!(frame.matches('G').count(), 1);
        assert_eq!(frame.chars().filter(|c| "><v^".contains(*c)).count(), 1);
    }
}
