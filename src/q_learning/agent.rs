//! Q-learning agent
//!
//! Bundles the Q-table, the exploration schedule and the random stream they
//! share. The training pipeline owns the agent exclusively while it runs.

use rand::{SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};

use super::{
    environment::Transition, exploration::EpsilonGreedy, policy::GreedyPolicy, q_table::QTable,
};
use crate::{
    Result,
    app::MazeConfig,
    types::{Action, Position},
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct AgentState {
    pub q_table: QTable,
    pub exploration: EpsilonGreedy,
    pub rng_seed: Option<u64>,
}

fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

/// Q-learning agent (off-policy TD control)
///
/// Learns toward the maximum next-state value regardless of the action the
/// ε-greedy behaviour policy actually takes next.
#[derive(Debug, Clone)]
pub struct QLearningAgent {
    q_table: QTable,
    exploration: EpsilonGreedy,
    rng: StdRng,
    rng_seed: Option<u64>,
}

impl QLearningAgent {
    /// Create a new Q-learning agent
    ///
    /// # Arguments
    ///
    /// * `grid_size` - Side length of the maze the table covers
    /// * `learning_rate` - α parameter (0.0 to 1.0)
    /// * `discount_factor` - γ parameter (0.0 to 1.0)
    /// * `epsilon` - Initial exploration rate
    /// * `warmup_episodes` - Episodes of uniformly random action selection
    /// * `epsilon_decay` - Multiplicative decay per post-warm-up episode
    pub fn new(
        grid_size: usize,
        learning_rate: f64,
        discount_factor: f64,
        epsilon: f64,
        warmup_episodes: usize,
        epsilon_decay: f64,
    ) -> Self {
        Self {
            q_table: QTable::new(grid_size, learning_rate, discount_factor),
            exploration: EpsilonGreedy::new(epsilon, warmup_episodes, epsilon_decay),
            rng: build_rng(None),
            rng_seed: None,
        }
    }

    /// Build an agent from a validated configuration
    pub fn from_config(config: &MazeConfig) -> Result<Self> {
        config.validate()?;
        let agent = Self::new(
            config.grid_size,
            config.learning_rate,
            config.discount_factor,
            config.initial_epsilon,
            config.warmup_episodes,
            config.epsilon_decay,
        );
        Ok(match config.seed {
            Some(seed) => agent.with_seed(seed),
            None => agent,
        })
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self.rng_seed = Some(seed);
        self
    }

    /// Reseed the random stream used for exploration and tie-breaking
    pub fn set_rng_seed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
        self.rng_seed = Some(seed);
    }

    pub fn q_table(&self) -> &QTable {
        &self.q_table
    }

    pub fn q_table_mut(&mut self) -> &mut QTable {
        &mut self.q_table
    }

    pub fn exploration(&self) -> &EpsilonGreedy {
        &self.exploration
    }

    pub fn epsilon(&self) -> f64 {
        self.exploration.epsilon()
    }

    pub fn grid_size(&self) -> usize {
        self.q_table.size()
    }

    /// ε-greedy action for `position` in episode `episode`
    pub fn select_action(&mut self, episode: usize, position: Position) -> Action {
        self.exploration
            .select(episode, position, &self.q_table, &mut self.rng)
    }

    /// Apply the Q-learning update for one observed transition
    pub fn learn(&mut self, state: Position, action: Action, transition: &Transition) -> Result<f64> {
        self.q_table
            .q_learning_update(state, action, transition.reward, transition.next_state)
    }

    /// Decay epsilon after episode
    pub fn end_episode(&mut self, episode: usize) -> bool {
        self.exploration.end_episode(episode)
    }

    /// Snapshot the greedy policy, breaking ties with the agent's stream
    pub fn extract_policy(&mut self) -> GreedyPolicy {
        GreedyPolicy::extract(&self.q_table, &mut self.rng)
    }

    /// Forget everything learned and restart the random stream
    pub fn reset(&mut self) {
        self.q_table = QTable::new(
            self.q_table.size(),
            self.q_table.learning_rate(),
            self.q_table.discount_factor(),
        );
        self.exploration.reset();
        self.rng = build_rng(self.rng_seed);
    }

    pub(crate) fn export_state(&self) -> AgentState {
        AgentState {
            q_table: self.q_table.clone(),
            exploration: self.exploration.clone(),
            rng_seed: self.rng_seed,
        }
    }

    pub(crate) fn from_state(state: AgentState) -> Self {
        Self {
            q_table: state.q_table,
            exploration: state.exploration,
            rng: build_rng(state.rng_seed),
            rng_seed: state.rng_seed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config() {
        let config = MazeConfig::default()
            .with_grid_size(4)
            .with_initial_epsilon(0.5)
            .with_warmup_episodes(3)
            .with_seed(1);
        let agent = QLearningAgent::from_config(&config).unwrap();
        assert_eq!(agent.grid_size(), 4);
        assert_eq!(agent.epsilon(), 0.5);
        assert_eq!(agent.exploration().warmup_episodes(), 3);
        assert_eq!(agent.q_table().learning_rate(), 0.1);
    }

    #[test]
    fn test_from_config_rejects_invalid() {
        let config = MazeConfig::default().with_learning_rate(-1.0);
        assert!(QLearningAgent::from_config(&config).is_err());
    }

    #[test]
    fn test_seeded_selection_is_reproducible() {
        let picks = |seed| {
            let mut agent = QLearningAgent::new(3, 0.1, 0.9, 1.0, 0, 0.999).with_seed(seed);
            (0..20)
                .map(|_| agent.select_action(0, Position::new(1, 1)))
                .collect::<Vec<_>>()
        };
        assert_eq!(picks(42), picks(42));
    }

    #[test]
    fn test_learn_updates_table() {
        let mut agent = QLearningAgent::new(3, 0.1, 0.9, 1.0, 0, 0.999).with_seed(0);
        let transition = Transition {
            reward: 1.0,
            next_state: Position::new(2, 2),
            terminal: true,
        };
        let value = agent
            .learn(Position::new(2, 1), Action::East, &transition)
            .unwrap();
        assert!((value - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_reset_clears_learning() {
        let mut agent = QLearningAgent::new(3, 0.1, 0.9, 1.0, 0, 0.5).with_seed(0);
        agent.q_table_mut().set(Position::new(0, 0), Action::East, 3.0);
        agent.end_episode(1);
        assert_eq!(agent.epsilon(), 0.5);

        agent.reset();
        assert_eq!(agent.q_table().get(Position::new(0, 0), Action::East), 0.0);
        assert_eq!(agent.epsilon(), 1.0);
    }
}
