//! A batch of independent four-rooms instances behind flat host buffers.
//!
//! Instances never share state; each owns its map, pose and random stream.
//! With the `parallel` feature they are stepped on the rayon pool.

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::info;

use crate::config::VecEnvConfig;
use crate::env::{FourRooms, Step};
use crate::error::EnvError;
use crate::log::{EpisodeLog, LogSummary};
use crate::observation::OBS_LEN;
use crate::prng::Prng;

#[derive(Debug)]
pub struct VecEnv {
    config: VecEnvConfig,
    envs: Vec<FourRooms>,
    observations: Vec<u8>,
    rewards: Vec<f32>,
    terminals: Vec<bool>,
}

impl VecEnv {
    pub fn new(config: VecEnvConfig) -> Result<Self, EnvError> {
        config.validate()?;
        let n = config.num_envs;
        let mut envs = Vec::with_capacity(n);
        for i in 0..n {
            let mut env = FourRooms::new(config.env.clone())?;
            env.set_rng(Prng::for_stream(config.seed, i as u64));
            envs.push(env);
        }
        info!(
            num_envs = n,
            size = config.env.size,
            see_through_walls = config.env.see_through_walls,
            "vectorized four-rooms ready"
        );

        let mut vec_env = Self {
            envs,
            observations: vec![0; n * OBS_LEN],
            rewards: vec![0.0; n],
            terminals: vec![false; n],
            config,
        };
        vec_env.reset(None);
        Ok(vec_env)
    }

    pub fn num_envs(&self) -> usize {
        self.envs.len()
    }

    pub fn config(&self) -> &VecEnvConfig {
        &self.config
    }

    /// Resets every instance. With `Some(seed)` each instance is first
    /// reseeded from its own stream of `seed`.
    pub fn reset(&mut self, seed: Option<u64>) -> &[u8] {
        for (i, env) in self.envs.iter_mut().enumerate() {
            if let Some(seed) = seed {
                env.set_rng(Prng::for_stream(seed, i as u64));
            }
            let obs = env.reset();
            obs.write_into(&mut self.observations[i * OBS_LEN..(i + 1) * OBS_LEN]);
        }
        self.rewards.fill(0.0);
        self.terminals.fill(false);
        &self.observations
    }

    /// Steps instance `i` with `actions[i]` and refreshes the host buffers.
    pub fn step(&mut self, actions: &[i32]) -> Result<(), EnvError> {
        if actions.len() != self.envs.len() {
            return Err(EnvError::ActionCount {
                expected: self.envs.len(),
                got: actions.len(),
            });
        }

        step_all(
            &mut self.envs,
            actions,
            &mut self.observations,
            &mut self.rewards,
            &mut self.terminals,
        );
        Ok(())
    }

    /// `num_envs × 147` bytes, instance-major.
    pub fn observations(&self) -> &[u8] {
        &self.observations
    }

    pub fn rewards(&self) -> &[f32] {
        &self.rewards
    }

    pub fn terminals(&self) -> &[bool] {
        &self.terminals
    }

    pub fn env(&self, i: usize) -> Option<&FourRooms> {
        self.envs.get(i)
    }

    /// Whether the host should report logs after its `tick`-th step.
    pub fn should_log(&self, tick: u64) -> bool {
        self.config.log_interval > 0 && tick % self.config.log_interval == 0
    }

    /// Drains every instance's episode log into one summary.
    ///
    /// Returns `None` when no episode finished since the previous call.
    pub fn log(&mut self) -> Option<LogSummary> {
        let mut total = EpisodeLog::new();
        for env in self.envs.iter_mut() {
            total.merge(&env.take_log());
        }
        total.summary()
    }

    /// Drops every instance. Safe to call more than once.
    pub fn close(&mut self) {
        for env in self.envs.drain(..) {
            env.close();
        }
        self.observations.clear();
        self.rewards.clear();
        self.terminals.clear();
    }

    pub fn is_closed(&self) -> bool {
        self.envs.is_empty()
    }
}

// Each instance writes its own slice of the host buffers; nothing is collected.
fn write_step(step: Step, obs: &mut [u8], reward: &mut f32, terminal: &mut bool) {
    step.observation.write_into(obs);
    *reward = step.reward;
    *terminal = step.terminal;
}

#[cfg(feature = "parallel")]
fn step_all(
    envs: &mut [FourRooms],
    actions: &[i32],
    observations: &mut [u8],
    rewards: &mut [f32],
    terminals: &mut [bool],
) {
    envs.par_iter_mut()
        .zip(actions.par_iter())
        .zip(observations.par_chunks_exact_mut(OBS_LEN))
        .zip(rewards.par_iter_mut())
        .zip(terminals.par_iter_mut())
        .for_each(|((((env, &a), obs), reward), terminal)| {
            write_step(env.step(a), obs, reward, terminal)
        });
}

#[cfg(not(feature = "parallel"))]
fn step_all(
    envs: &mut [FourRooms],
    actions: &[i32],
    observations: &mut [u8],
    rewards: &mut [f32],
    terminals: &mut [bool],
) {
    let slots = observations
        .chunks_exact_mut(OBS_LEN)
        .zip(rewards.iter_mut())
        .zip(terminals.iter_mut());
    for ((env, &a), ((obs, reward), terminal)) in envs.iter_mut().zip(actions).zip(slots) {
        write_step(env.step(a), obs, reward, terminal);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EnvConfig;

    fn vec_env(n: usize, seed: u64) -> VecEnv {
        VecEnv::new(VecEnvConfig::default().with_num_envs(n).with_seed(seed)).unwrap()
    }

    #[test]
    fn buffers_are_sized_per_instance() {
        let v = vec_env(4, 1);
        assert_eq!(v.observations().len(), 4 * OBS_LEN);
        assert_eq!(v.rewards().len(), 4);
        assert_eq!(v.terminals().len(), 4);
    }

    #[test]
    fn instances_are_independent() {
        let v = vec_env(2, 1);
        let a = v.env(0).unwrap();
        let b = v.env(1).unwrap();
        assert!(a.map() != b.map() || a.agent_pos() != b.agent_pos() || a.goal_pos() != b.goal_pos());
    }

    #[test]
    fn wrong_action_count_is_rejected() {
        let mut v = vec_env(3, 1);
        assert_eq!(
            v.step(&[0, 1]),
            Err(EnvError::ActionCount {
                expected: 3,
                got: 2
            })
        );
    }

    #[test]
    fn reseeded_reset_is_reproducible() {
        let mut a = vec_env(3, 10);
        let mut b = vec_env(3, 99);
        let oa = a.reset(Some(5)).to_vec();
        let ob = b.reset(Some(5)).to_vec();
        assert_eq!(oa, ob);

        for t in 0..200 {
            let actions = [t % 3, (t + 1) % 3, (t + 2) % 3];
            a.step(&actions).unwrap();
            b.step(&actions).unwrap();
            assert_eq!(a.observations(), b.observations());
            assert_eq!(a.rewards(), b.rewards());
        }
    }

    #[test]
    fn log_drains_finished_episodes() {
        let cfg = VecEnvConfig::default()
            .with_num_envs(2)
            .with_env(EnvConfig::default().with_size(6));
        let mut v = VecEnv::new(cfg).unwrap();
        assert!(v.log().is_none());

        // 36 no-op steps time every instance out at least once.
        for _ in 0..36 {
            v.step(&[6, 6]).unwrap();
        }
        assert!(v.terminals().iter().all(|&t| t));
        let summary = v.log().unwrap();
        assert_eq!(summary.episodes, 2);
        assert_eq!(summary.perf, 0.0);
        assert_eq!(summary.episode_length, 36.0);
        assert!(v.log().is_none());
    }

    #[test]
    fn buffers_match_each_instance_after_a_step() {
        let mut v = vec_env(3, 4);
        // Turning in place can neither reach the goal nor time out.
        let actions = [0, 1, 0];
        v.step(&actions).unwrap();
        for i in 0..3 {
            let env = v.env(i).unwrap();
            assert_eq!(
                &v.observations()[i * OBS_LEN..(i + 1) * OBS_LEN],
                &env.observation().to_bytes()[..]
            );
            assert_eq!(v.rewards()[i], 0.0);
            assert!(!v.terminals()[i]);
        }
    }

    #[test]
    fn log_cadence() {
        let v = vec_env(1, 0);
        assert!(!v.should_log(1));
        assert!(v.should_log(128));
        assert!(v.should_log(256));
    }

    #[test]
    fn close_is_idempotent() {
        let mut v = vec_env(2, 0);
        v.close();
        assert!(v.is_closed());
        v.close();
        assert!(v.is_closed());
        assert_eq!(v.num_envs(), 0);
        assert!(v.observations().is_empty());
    }
}
