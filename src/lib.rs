//! # fourrooms
//!
//! A partially-observable "four rooms" grid world for reinforcement learning.
//!
//! A single agent moves through a procedurally generated map of four rooms
//! joined by narrow gaps and must reach a goal cell. It only perceives a 7×7
//! window in front of it, and walls block its line of sight. Reaching the goal
//! pays `1.0`; running out of steps (`size²`) pays nothing. Either way the
//! episode resets immediately.
//!
//! ## Quick Start
//!
//! ```
//! use fourrooms::prelude::*;
//!
//! let mut env = FourRooms::new(EnvConfig::default().with_seed(42)).unwrap();
//! let first = env.reset();
//! assert_eq!(first.cells.len(), 7);
//!
//! let step = env.step(Action::Forward as i32);
//! if step.terminal {
//!     println!("episode over, reward {}", step.reward);
//! }
//! ```
//!
//! ## Feature Flags
//!
//! - `serde` (default): Serialize configs, logs and snapshots
//! - `parallel`: Step [`vec_env::VecEnv`] instances on the rayon pool
//!
//! ## Modules
//!
//! - [`mapgen`]: Four-rooms layout generation
//! - [`visibility`]: Line-of-sight checks
//! - [`observation`]: Egocentric 7×7 observation encoding
//! - [`env`]: Episode state machine
//! - [`vec_env`]: Batched instances behind flat host buffers
//! - [`observer`]: Read-only snapshots for renderers

#[path = "core/config.rs"]
pub mod config;

#[path = "core/env.rs"]
pub mod env;

#[path = "core/error.rs"]
pub mod error;

#[path = "core/grid.rs"]
pub mod grid;

#[path = "core/log.rs"]
pub mod log;

#[path = "core/mapgen.rs"]
pub mod mapgen;

#[path = "core/observation.rs"]
pub mod observation;

#[path = "core/prng.rs"]
pub mod prng;

#[path = "core/vec_env.rs"]
pub mod vec_env;

#[path = "core/visibility.rs"]
pub mod visibility;

pub mod observer;

/// Prelude module for convenient imports.
///
/// ```
/// use fourrooms::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::{EnvConfig, VecEnvConfig};
    pub use crate::env::{Action, Direction, EpisodeEnd, FourRooms, Step};
    pub use crate::error::EnvError;
    pub use crate::grid::{CellKind, Grid};
    pub use crate::log::{EpisodeLog, LogSummary};
    pub use crate::observation::{ColorKind, ObjectKind, ObsCell, Observation, OBS_LEN, VIEW_SIZE};
    pub use crate::observer::{EnvAdapter, EnvSnapshot};
    pub use crate::prng::Prng;
    pub use crate::vec_env::VecEnv;
    pub use crate::visibility::Visibility;
}
