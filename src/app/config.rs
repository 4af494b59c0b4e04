//! Configuration for maze training runs.

use std::{fs::File, io::BufReader, path::Path};

use serde::{Deserialize, Serialize};

use crate::{Error, Result, q_learning::RewardSchedule};

/// Every tunable of a training run.
///
/// Defaults reproduce the reference setup: a 100x100 maze, α = 0.1,
/// γ = 0.9, ε starting at 1.0 with 100 uniform warm-up episodes and a 0.999
/// decay, 10 000 episodes.
///
/// # Examples
///
/// ```
/// use qmaze::app::MazeConfig;
///
/// let config = MazeConfig::default()
///     .with_grid_size(10)
///     .with_episodes(500)
///     .with_seed(42);
/// config.validate()?;
/// # Ok::<(), qmaze::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MazeConfig {
    /// Side length N of the square grid
    pub grid_size: usize,
    /// Learning rate α
    pub learning_rate: f64,
    /// Discount factor γ
    pub discount_factor: f64,
    /// ε at the start of training
    pub initial_epsilon: f64,
    /// Episodes that select actions uniformly at random
    pub warmup_episodes: usize,
    /// Multiplicative ε decay per post-warm-up episode
    pub epsilon_decay: f64,
    /// Number of training episodes
    pub episodes: usize,
    /// Steps after which a training episode is abandoned
    pub max_episode_steps: usize,
    /// Steps after which policy replay is reported as non-terminating
    pub max_replay_steps: usize,
    /// Random seed for reproducibility
    pub seed: Option<u64>,
    /// Walls placed when generating a random maze
    pub wall_count: usize,
    /// Reward values for the transition model
    pub rewards: RewardSchedule,
}

impl Default for MazeConfig {
    fn default() -> Self {
        Self {
            grid_size: 100,
            learning_rate: 0.1,
            discount_factor: 0.9,
            initial_epsilon: 1.0,
            warmup_episodes: 100,
            epsilon_decay: 0.999,
            episodes: 10_000,
            max_episode_steps: 1_000_000,
            max_replay_steps: 10_000,
            seed: None,
            wall_count: 1000,
            rewards: RewardSchedule::default(),
        }
    }
}

impl MazeConfig {
    /// Read a JSON configuration file; absent fields keep their defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|e| Error::io(format!("open config file {}", path.display()), e))?;
        let config: Self = serde_json::from_reader(BufReader::new(file))?;
        config.validate()?;
        Ok(config)
    }

    /// Check every parameter is usable before training starts.
    pub fn validate(&self) -> Result<()> {
        fn invalid(message: String) -> Result<()> {
            Err(Error::InvalidConfiguration { message })
        }

        if self.grid_size < 2 {
            return invalid(format!(
                "grid_size must be at least 2, got {}",
                self.grid_size
            ));
        }
        if !(self.learning_rate > 0.0 && self.learning_rate <= 1.0) {
            return invalid(format!(
                "learning_rate must be in (0, 1], got {}",
                self.learning_rate
            ));
        }
        if !(0.0..=1.0).contains(&self.discount_factor) {
            return invalid(format!(
                "discount_factor must be in [0, 1], got {}",
                self.discount_factor
            ));
        }
        if !(0.0..=1.0).contains(&self.initial_epsilon) {
            return invalid(format!(
                "initial_epsilon must be in [0, 1], got {}",
                self.initial_epsilon
            ));
        }
        if !(self.epsilon_decay > 0.0 && self.epsilon_decay <= 1.0) {
            return invalid(format!(
                "epsilon_decay must be in (0, 1], got {}",
                self.epsilon_decay
            ));
        }
        if self.max_episode_steps == 0 {
            return invalid("max_episode_steps must be positive".to_string());
        }
        if self.max_replay_steps == 0 {
            return invalid("max_replay_steps must be positive".to_string());
        }
        if !self.rewards.is_finite() {
            return invalid("reward values must be finite".to_string());
        }
        Ok(())
    }

    pub fn with_grid_size(mut self, grid_size: usize) -> Self {
        self.grid_size = grid_size;
        self
    }

    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    pub fn with_discount_factor(mut self, discount_factor: f64) -> Self {
        self.discount_factor = discount_factor;
        self
    }

    pub fn with_initial_epsilon(mut self, epsilon: f64) -> Self {
        self.initial_epsilon = epsilon;
        self
    }

    pub fn with_warmup_episodes(mut self, warmup_episodes: usize) -> Self {
        self.warmup_episodes = warmup_episodes;
        self
    }

    pub fn with_epsilon_decay(mut self, decay: f64) -> Self {
        self.epsilon_decay = decay;
        self
    }

    pub fn with_episodes(mut self, episodes: usize) -> Self {
        self.episodes = episodes;
        self
    }

    pub fn with_max_episode_steps(mut self, steps: usize) -> Self {
        self.max_episode_steps = steps;
        self
    }

    pub fn with_max_replay_steps(mut self, steps: usize) -> Self {
        self.max_replay_steps = steps;
        self
    }

    /// Set the random seed for deterministic behavior.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_wall_count(mut self, wall_count: usize) -> Self {
        self.wall_count = wall_count;
        self
    }

    pub fn with_rewards(mut self, rewards: RewardSchedule) -> Self {
        self.rewards = rewards;
        self
    }
}
