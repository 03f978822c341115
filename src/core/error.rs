use thiserror::Error;

/// Errors surfaced by the environment constructors and the vectorized host API.
///
/// Stepping a single environment never fails; these are all caller mistakes
/// that should be fixed at the call site rather than recovered from.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnvError {
    #[error("map size {size} is too small for the four-rooms layout (minimum {min})")]
    SizeTooSmall { size: usize, min: usize },

    #[error("map size {size} is too large (maximum {max})")]
    SizeTooLarge { size: usize, max: usize },

    #[error("a vectorized environment needs at least one instance")]
    NoEnvironments,

    #[error("expected {expected} actions (one per instance), got {got}")]
    ActionCount { expected: usize, got: usize },

    #[error("invalid configuration: {0}")]
    Parse(String),
}
