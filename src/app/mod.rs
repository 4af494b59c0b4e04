//! Application layer: run configuration.
//!
//! [`MazeConfig`] gathers every tunable of a run (grid size, learning
//! parameters, exploration schedule, step caps, seed, rewards). The CLI
//! loads it from JSON, applies flag overrides and validates it before any
//! training starts.
//!
//! # Usage
//!
//! ```
//! use qmaze::{app::MazeConfig, q_learning::QLearningAgent};
//!
//! let config = MazeConfig::default().with_grid_size(5).with_seed(42);
//! let agent = QLearningAgent::from_config(&config)?;
//! assert_eq!(agent.grid_size(), 5);
//! # Ok::<(), qmaze::Error>(())
//! ```

pub mod config;

pub use config::MazeConfig;
