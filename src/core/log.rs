#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Running episode totals, updated once per finished episode.
///
/// Fields are sums; divide by `n` (see [`EpisodeLog::summary`]) for
/// per-episode means.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EpisodeLog {
    /// Number of episodes that ended with a positive reward.
    pub perf: f32,
    pub score: f32,
    pub episode_return: f32,
    pub episode_length: f32,
    /// Number of finished episodes.
    pub n: f32,
}

/// Per-episode means over a window of finished episodes.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LogSummary {
    /// Fraction of episodes that reached the goal.
    pub perf: f32,
    pub score: f32,
    pub episode_return: f32,
    pub episode_length: f32,
    pub episodes: u64,
}

impl EpisodeLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_episode(&mut self, reward: f32, length: u32) {
        if reward > 0.0 {
            self.perf += 1.0;
        }
        self.score += reward;
        self.episode_return += reward;
        self.episode_length += length as f32;
        self.n += 1.0;
    }

    pub fn merge(&mut self, other: &EpisodeLog) {
        self.perf += other.perf;
        self.score += other.score;
        self.episode_return += other.episode_return;
        self.episode_length += other.episode_length;
        self.n += other.n;
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0.0
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Means per episode, or `None` if no episode has finished yet.
    pub fn summary(&self) -> Option<LogSummary> {
        if self.is_empty() {
            return None;
        }
        let n = self.n;
        Some(LogSummary {
            perf: self.perf / n,
            score: self.score / n,
            episode_return: self.episode_return / n,
            episode_length: self.episode_length / n,
            episodes: n as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_log_has_no_summary() {
        assert!(EpisodeLog::new().summary().is_none());
    }

    #[test]
    fn success_and_timeout_are_averaged() {
        let mut log = EpisodeLog::new();
        log.record_episode(1.0, 10);
        log.record_episode(0.0, 30);

        assert_eq!(log.perf, 1.0);
        assert_eq!(log.n, 2.0);

        let s = log.summary().unwrap();
        assert_eq!(s.episodes, 2);
        assert!((s.perf - 0.5).abs() < 1e-6);
        assert!((s.episode_return - 0.5).abs() < 1e-6);
        assert!((s.episode_length - 20.0).abs() < 1e-6);
    }

    #[test]
    fn merge_then_clear() {
        let mut a = EpisodeLog::new();
        a.record_episode(1.0, 4);
        let mut b = EpisodeLog::new();
        b.record_episode(1.0, 6);
        b.merge(&a);
        assert_eq!(b.n, 2.0);
        assert_eq!(b.episode_length, 10.0);
        b.clear();
        assert!(b.is_empty());
    }
}
