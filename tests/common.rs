//! Common test utilities for the qmaze test suite.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use qmaze::{
    app::MazeConfig,
    maze::Grid,
    pipeline::{EpisodeSummary, TrainingConfig, TrainingPipeline, TrainingResult},
    ports::Observer,
    q_learning::{MazeEnvironment, QLearningAgent},
};

/// Write maze text to `name` inside `dir` and return the path.
pub fn write_maze(dir: &Path, name: &str, text: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, text).unwrap();
    path
}

/// Train a fresh agent built from `config` on `grid`.
pub fn train(config: &MazeConfig, grid: &Grid) -> (QLearningAgent, TrainingResult) {
    let mut agent = QLearningAgent::from_config(config).unwrap();
    let env = MazeEnvironment::new(grid, config.rewards);
    let result = TrainingPipeline::new(TrainingConfig::from(config))
        .run(&mut agent, &env)
        .unwrap();
    (agent, result)
}

/// Observer that keeps every episode summary.
#[derive(Default)]
pub struct SummaryRecorder {
    pub summaries: Vec<EpisodeSummary>,
}

impl Observer for SummaryRecorder {
    fn on_episode_end(&mut self, summary: &EpisodeSummary) -> qmaze::Result<()> {
        self.summaries.push(summary.clone());
        Ok(())
    }
}
