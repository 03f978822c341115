#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::EnvError;

/// Configuration for a single four-rooms instance.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EnvConfig {
    /// Side length of the square map.
    pub size: usize,
    /// When set, line of sight is never blocked by walls.
    pub see_through_walls: bool,
    /// Seed for this instance's random source.
    pub seed: u64,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            size: Self::DEFAULT_SIZE,
            see_through_walls: false,
            seed: 0,
        }
    }
}

impl EnvConfig {
    pub const DEFAULT_SIZE: usize = 19;

    /// Smallest map where every wall segment still has room for a gap.
    pub const MIN_SIZE: usize = 6;

    /// Largest map: keeps `size²` inside `u32` and coordinates inside `i32`.
    pub const MAX_SIZE: usize = u16::MAX as usize;

    pub fn with_size(mut self, size: usize) -> Self {
        self.size = size;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_see_through_walls(mut self, enabled: bool) -> Self {
        self.see_through_walls = enabled;
        self
    }

    pub fn validate(&self) -> Result<(), EnvError> {
        if self.size < Self::MIN_SIZE {
            return Err(EnvError::SizeTooSmall {
                size: self.size,
                min: Self::MIN_SIZE,
            });
        }
        if self.size > Self::MAX_SIZE {
            return Err(EnvError::SizeTooLarge {
                size: self.size,
                max: Self::MAX_SIZE,
            });
        }
        Ok(())
    }
}

/// Configuration for a batch of independent instances driven by one host.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct VecEnvConfig {
    pub num_envs: usize,
    /// Base seed; instance `i` derives its own stream from it.
    pub seed: u64,
    /// Host steps between log reports.
    pub log_interval: u64,
    /// Settings shared by every instance. Its `seed` is ignored.
    pub env: EnvConfig,
}

impl Default for VecEnvConfig {
    fn default() -> Self {
        Self {
            num_envs: 1,
            seed: 0,
            log_interval: 128,
            env: EnvConfig::default(),
        }
    }
}

impl VecEnvConfig {
    pub fn with_num_envs(mut self, num_envs: usize) -> Self {
        self.num_envs = num_envs;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_env(mut self, env: EnvConfig) -> Self {
        self.env = env;
        self
    }

    pub fn validate(&self) -> Result<(), EnvError> {
        if self.num_envs == 0 {
            return Err(EnvError::NoEnvironments);
        }
        self.env.validate()
    }

    #[cfg(feature = "serde")]
    pub fn from_json(text: &str) -> Result<Self, EnvError> {
        let cfg: Self = serde_json::from_str(text).map_err(|e| EnvError::Parse(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert_eq!(EnvConfig::default().size, 19);
        assert!(VecEnvConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_maps_without_room_for_gaps() {
        let err = EnvConfig::default().with_size(5).validate().unwrap_err();
        assert_eq!(err, EnvError::SizeTooSmall { size: 5, min: 6 });
        assert!(EnvConfig::default().with_size(6).validate().is_ok());
    }

    #[test]
    fn rejects_maps_too_large_to_index() {
        let err = EnvConfig::default()
            .with_size(EnvConfig::MAX_SIZE + 1)
            .validate()
            .unwrap_err();
        assert_eq!(
            err,
            EnvError::SizeTooLarge {
                size: 65_536,
                max: 65_535
            }
        );
        assert!(EnvConfig::default()
            .with_size(EnvConfig::MAX_SIZE)
            .validate()
            .is_ok());
    }

    #[test]
    fn oversized_map_fails_construction_instead_of_panicking() {
        for size in [EnvConfig::MAX_SIZE + 1, usize::MAX] {
            let err = crate::env::FourRooms::new(EnvConfig::default().with_size(size)).unwrap_err();
            assert_eq!(
                err,
                EnvError::SizeTooLarge {
                    size,
                    max: EnvConfig::MAX_SIZE
                }
            );
        }

        #[cfg(feature = "serde")]
        assert!(matches!(
            VecEnvConfig::from_json(r#"{ "env": { "size": 100000 } }"#),
            Err(EnvError::SizeTooLarge { size: 100_000, .. })
        ));
    }

    #[test]
    fn rejects_empty_batch() {
        let err = VecEnvConfig::default().with_num_envs(0).validate().unwrap_err();
        assert_eq!(err, EnvError::NoEnvironments);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn parses_partial_json_with_defaults() {
        let cfg = VecEnvConfig::from_json(r#"{ "num_envs": 4, "env": { "size": 11 } }"#).unwrap();
        assert_eq!(cfg.num_envs, 4);
        assert_eq!(cfg.log_interval, 128);
        assert_eq!(cfg.env.size, 11);
        assert!(!cfg.env.see_through_walls);

        let err = VecEnvConfig::from_json(r#"{ "env": { "size": 3 } }"#).unwrap_err();
        assert!(matches!(err, EnvError::SizeTooSmall { size: 3, .. }));

        assert!(matches!(
            VecEnvConfig::from_json("not json"),
            Err(EnvError::Parse(_))
        ));
    }
}
