//! Tabular Q-learning for grid mazes
//!
//! ## Components
//!
//! - **QTable**: dense (position, action) → value table with the Bellman update
//! - **EpsilonGreedy**: exploration schedule with a uniform warm-up window
//! - **MazeEnvironment**: deterministic transition and reward model
//! - **QLearningAgent**: table, schedule and random stream bundled together
//! - **GreedyPolicy**: immutable best-action lookup extracted after training
//!
//! ## Update rule
//!
//! Q-learning is off-policy: the update bootstraps from
//! `max_a' Q(s', a')` regardless of the next action the behaviour policy
//! picks.
//!
//! ```text
//! Q(s,a) ← Q(s,a) + α[r + γ max_a' Q(s',a') - Q(s,a)]
//! ```
//!
//! ## Usage Example
//!
//! ```no_run
//! use qmaze::q_learning::QLearningAgent;
//!
//! let agent = QLearningAgent::new(
//!     100,   // grid_size
//!     0.1,   // learning_rate
//!     0.9,   // discount_factor
//!     1.0,   // epsilon (exploration)
//!     100,   // warmup_episodes
//!     0.999, // epsilon_decay
//! )
//! .with_seed(42);
//! ```

pub mod agent;
pub mod environment;
pub mod exploration;
pub mod policy;
pub mod q_table;
pub mod serialization;

// Public re-exports
pub use agent::QLearningAgent;
pub use environment::{MazeEnvironment, RewardSchedule, Transition};
pub use exploration::EpsilonGreedy;
pub use policy::GreedyPolicy;
pub use q_table::QTable;
pub use serialization::{SavedAgent, TrainingMetadata};
