//! Training pipeline: the per-episode state machine and the episode loop

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    app::MazeConfig,
    maze::Cell,
    ports::Observer,
    q_learning::{MazeEnvironment, QLearningAgent},
    types::{Action, Position},
};

/// Training configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Number of training episodes
    pub episodes: usize,

    /// Steps after which an episode is abandoned as runaway
    pub max_episode_steps: usize,

    /// Random seed; reseeds the agent before training when set
    pub seed: Option<u64>,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            episodes: 10_000,
            max_episode_steps: 1_000_000,
            seed: None,
        }
    }
}

impl From<&MazeConfig> for TrainingConfig {
    fn from(config: &MazeConfig) -> Self {
        Self {
            episodes: config.episodes,
            max_episode_steps: config.max_episode_steps,
            seed: config.seed,
        }
    }
}

/// How an episode ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EpisodeOutcome {
    /// The agent entered the goal cell
    ReachedGoal,
    /// The step cap was hit before reaching the goal
    Runaway,
}

/// Phase of the episode state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EpisodePhase {
    Running,
    Terminal,
}

/// One training step as seen by observers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    pub episode: usize,
    /// Step number within the episode (0-based)
    pub step: usize,
    pub state: Position,
    pub action: Action,
    pub reward: f64,
    pub next_state: Position,
    pub terminal: bool,
    /// Q(state, action) after the update
    pub q_value: f64,
}

/// Summary of a finished or abandoned episode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeSummary {
    pub episode: usize,
    pub outcome: EpisodeOutcome,
    pub steps: usize,
    pub total_reward: f64,
    pub wall_hits: usize,
    /// ε after any end-of-episode annealing
    pub epsilon: f64,
}

/// State machine driving a single training episode
///
/// Starts `Running` at the start cell with a first action already chosen.
/// Each [`Episode::step`] applies the current action, records the new cell,
/// chooses the following action, updates the Q-table and advances. Entering
/// the goal moves the machine to `Terminal`.
#[derive(Debug, Clone)]
pub struct Episode {
    index: usize,
    phase: EpisodePhase,
    state: Position,
    action: Action,
    trace: Vec<Position>,
    steps: usize,
    total_reward: f64,
    wall_hits: usize,
}

impl Episode {
    /// Enter the start cell and select the first action
    pub fn begin(index: usize, agent: &mut QLearningAgent, env: &MazeEnvironment<'_>) -> Self {
        let state = env.grid().start();
        let action = agent.select_action(index, state);
        Self {
            index,
            phase: EpisodePhase::Running,
            state,
            action,
            trace: vec![state],
            steps: 0,
            total_reward: 0.0,
            wall_hits: 0,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn phase(&self) -> EpisodePhase {
        self.phase
    }

    pub fn state(&self) -> Position {
        self.state
    }

    /// Action that the next step will take
    pub fn pending_action(&self) -> Action {
        self.action
    }

    /// Cells visited so far, starting with the start cell
    pub fn trace(&self) -> &[Position] {
        &self.trace
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Advance one step. Does nothing once the episode is terminal.
    pub fn step(
        &mut self,
        agent: &mut QLearningAgent,
        env: &MazeEnvironment<'_>,
    ) -> Result<Option<StepRecord>> {
        if self.phase == EpisodePhase::Terminal {
            return Ok(None);
        }

        let (state, action) = (self.state, self.action);
        let transition = env.step(state, action)?;

        // Chosen before the update; only used for the following step
        let next_action = agent.select_action(self.index, transition.next_state);
        let q_value = agent.learn(state, action, &transition)?;
        self.trace.push(transition.next_state);

        if transition.next_state != state && env.grid().cell_at(transition.next_state)? == Cell::Wall
        {
            self.wall_hits += 1;
        }

        let record = StepRecord {
            episode: self.index,
            step: self.steps,
            state,
            action,
            reward: transition.reward,
            next_state: transition.next_state,
            terminal: transition.terminal,
            q_value,
        };

        self.state = transition.next_state;
        self.action = next_action;
        self.steps += 1;
        self.total_reward += transition.reward;
        if transition.terminal {
            self.phase = EpisodePhase::Terminal;
        }

        Ok(Some(record))
    }
}

/// Result of a training run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingResult {
    /// Total episodes run
    pub total_episodes: usize,

    /// Episodes that reached the goal
    pub completed_episodes: usize,

    /// Episodes abandoned at the step cap
    pub runaway_episodes: usize,

    /// Steps taken across all episodes
    pub total_steps: usize,

    /// Mean steps of completed episodes
    pub mean_steps: f64,

    /// Steps of the last completed episode
    pub last_episode_steps: Option<usize>,

    /// ε when training finished
    pub final_epsilon: f64,
}

impl TrainingResult {
    /// Save result to JSON file
    pub fn save<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Load result from JSON file
    pub fn load<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let result = serde_json::from_reader(file)?;
        Ok(result)
    }
}

/// Training pipeline for a Q-learning agent on a single maze
pub struct TrainingPipeline {
    config: TrainingConfig,
    observers: Vec<Box<dyn Observer>>,
}

impl TrainingPipeline {
    /// Create a new training pipeline
    pub fn new(config: TrainingConfig) -> Self {
        Self {
            config,
            observers: Vec::new(),
        }
    }

    /// Add an observer to the pipeline
    pub fn with_observer(mut self, observer: Box<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    fn check_dimensions(agent: &QLearningAgent, env: &MazeEnvironment<'_>) -> Result<()> {
        let size = env.grid().size();
        if agent.grid_size() != size {
            return Err(Error::DimensionMismatch {
                expected: agent.grid_size(),
                got: size,
            });
        }
        Ok(())
    }

    /// Run every configured episode against `env`.
    ///
    /// The Q-table persists across episodes. Runaway episodes are logged and
    /// counted; training moves on to the next episode.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] if the agent's Q-table was built
    /// for a different grid size than the maze.
    pub fn run(
        &mut self,
        agent: &mut QLearningAgent,
        env: &MazeEnvironment<'_>,
    ) -> Result<TrainingResult> {
        Self::check_dimensions(agent, env)?;
        if let Some(seed) = self.config.seed {
            agent.set_rng_seed(seed);
        }

        info!(
            "training {} episodes on a {}x{} maze",
            self.config.episodes,
            env.grid().size(),
            env.grid().size()
        );

        // Notify observers of training start
        for observer in &mut self.observers {
            observer.on_training_start(self.config.episodes)?;
        }

        let mut completed = 0;
        let mut runaway = 0;
        let mut total_steps = 0;
        let mut completed_steps = 0;
        let mut last_episode_steps = None;

        for episode in 0..self.config.episodes {
            let summary = self.run_episode(episode, agent, env)?;
            total_steps += summary.steps;
            match summary.outcome {
                EpisodeOutcome::ReachedGoal => {
                    completed += 1;
                    completed_steps += summary.steps;
                    last_episode_steps = Some(summary.steps);
                }
                EpisodeOutcome::Runaway => runaway += 1,
            }

            // Notify observers of episode end
            for observer in &mut self.observers {
                observer.on_episode_end(&summary)?;
            }
        }

        // Notify observers of training end
        for observer in &mut self.observers {
            observer.on_training_end()?;
        }

        let mean_steps = if completed > 0 {
            completed_steps as f64 / completed as f64
        } else {
            0.0
        };
        info!(
            "training finished: {completed} reached goal, {runaway} runaway, epsilon {:.4}",
            agent.epsilon()
        );

        Ok(TrainingResult {
            total_episodes: self.config.episodes,
            completed_episodes: completed,
            runaway_episodes: runaway,
            total_steps,
            mean_steps,
            last_episode_steps,
            final_epsilon: agent.epsilon(),
        })
    }

    /// Drive one episode to the goal or to the step cap
    pub fn run_episode(
        &mut self,
        episode: usize,
        agent: &mut QLearningAgent,
        env: &MazeEnvironment<'_>,
    ) -> Result<EpisodeSummary> {
        Self::check_dimensions(agent, env)?;
        for observer in &mut self.observers {
            observer.on_episode_start(episode)?;
        }

        let mut state_machine = Episode::begin(episode, agent, env);
        while state_machine.phase() == EpisodePhase::Running
            && state_machine.steps() < self.config.max_episode_steps
        {
            if let Some(record) = state_machine.step(agent, env)? {
                for observer in &mut self.observers {
                    observer.on_step(&record)?;
                }
            }
        }

        let outcome = match state_machine.phase() {
            EpisodePhase::Terminal => {
                agent.end_episode(episode);
                EpisodeOutcome::ReachedGoal
            }
            EpisodePhase::Running => {
                warn!(
                    "episode {episode} abandoned after {} steps without reaching the goal",
                    state_machine.steps()
                );
                EpisodeOutcome::Runaway
            }
        };

        debug!(
            "episode {episode}: {outcome:?} in {} steps, epsilon {:.4}",
            state_machine.steps(),
            agent.epsilon()
        );

        Ok(EpisodeSummary {
            episode,
            outcome,
            steps: state_machine.steps(),
            total_reward: state_machine.total_reward,
            wall_hits: state_machine.wall_hits,
            epsilon: agent.epsilon(),
        })
    }
}
