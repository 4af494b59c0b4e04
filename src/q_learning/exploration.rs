//! ε-greedy action selection with a warm-up phase and multiplicative annealing

use rand::{Rng, seq::IndexedRandom};
use serde::{Deserialize, Serialize};

use super::q_table::QTable;
use crate::types::{Action, Position};

/// ε-greedy exploration schedule
///
/// During the first `warmup_episodes` episodes every action is drawn
/// uniformly at random and ε is ignored. Afterwards an action is random with
/// probability ε and greedy otherwise. ε shrinks by `decay` once per
/// completed episode whose index exceeds `warmup_episodes`.
///
/// With the default ε = 1.0 the greedy branch cannot fire until ε has decayed
/// below 1: a draw from [0, 1) is always below 1.0. That is the intended
/// start of the annealing schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpsilonGreedy {
    epsilon: f64,
    initial_epsilon: f64,
    warmup_episodes: usize,
    decay: f64,
}

impl EpsilonGreedy {
    pub fn new(epsilon: f64, warmup_episodes: usize, decay: f64) -> Self {
        Self {
            epsilon,
            initial_epsilon: epsilon,
            warmup_episodes,
            decay,
        }
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn initial_epsilon(&self) -> f64 {
        self.initial_epsilon
    }

    pub fn warmup_episodes(&self) -> usize {
        self.warmup_episodes
    }

    pub fn decay(&self) -> f64 {
        self.decay
    }

    /// Whether `episode` still falls inside the uniform warm-up window
    pub fn in_warmup(&self, episode: usize) -> bool {
        episode < self.warmup_episodes
    }

    /// Choose an action for `position` during episode `episode`
    pub fn select<R: Rng + ?Sized>(
        &self,
        episode: usize,
        position: Position,
        q_table: &QTable,
        rng: &mut R,
    ) -> Action {
        if self.in_warmup(episode) {
            return Self::random_action(rng);
        }

        if rng.random::<f64>() < self.epsilon {
            // Explore: random action
            Self::random_action(rng)
        } else {
            // Exploit: greedy action based on Q-values
            q_table.best_action(position, rng)
        }
    }

    fn random_action<R: Rng + ?Sized>(rng: &mut R) -> Action {
        *Action::ALL.choose(rng).unwrap_or(&Action::North)
    }

    /// Anneal ε after `episode` has finished.
    ///
    /// Returns whether ε changed.
    pub fn end_episode(&mut self, episode: usize) -> bool {
        if episode > self.warmup_episodes {
            self.epsilon *= self.decay;
            true
        } else {
            false
        }
    }

    /// Restore ε to its initial value
    pub fn reset(&mut self) {
        self.epsilon = self.initial_epsilon;
    }
}
