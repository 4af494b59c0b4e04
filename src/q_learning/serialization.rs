//! Serialization support for trained maze agents.

use std::{
    fs::File,
    io::{BufReader, BufWriter},
    path::Path,
};

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::{
    app::MazeConfig,
    pipeline::TrainingResult,
    q_learning::{QLearningAgent, agent::AgentState, policy::GreedyPolicy},
};

/// Training metadata stored alongside a saved agent
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrainingMetadata {
    pub episodes_trained: usize,
    pub completed_episodes: usize,
    pub runaway_episodes: usize,
    pub final_epsilon: f64,
}

impl From<&TrainingResult> for TrainingMetadata {
    fn from(result: &TrainingResult) -> Self {
        Self {
            episodes_trained: result.total_episodes,
            completed_episodes: result.completed_episodes,
            runaway_episodes: result.runaway_episodes,
            final_epsilon: result.final_epsilon,
        }
    }
}

/// A trained agent together with the policy extracted from it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedAgent {
    pub version: u32,
    pub config: MazeConfig,
    state: AgentState,
    pub policy: GreedyPolicy,
    pub metadata: TrainingMetadata,
}

impl SavedAgent {
    pub const VERSION: u32 = 1;

    pub fn new(
        agent: &QLearningAgent,
        policy: GreedyPolicy,
        config: MazeConfig,
        metadata: TrainingMetadata,
    ) -> Self {
        Self {
            version: Self::VERSION,
            config,
            state: agent.export_state(),
            policy,
            metadata,
        }
    }

    fn check(&self) -> Result<()> {
        if self.version != Self::VERSION {
            return Err(anyhow!(
                "Unsupported agent save format version: {}. Expected {}",
                self.version,
                Self::VERSION
            ));
        }
        let size = self.state.q_table.size();
        if self.policy.size() != size || !self.policy.is_consistent() {
            return Err(anyhow!(
                "Saved policy does not match the {size}x{size} Q-table"
            ));
        }
        if self.state.q_table.len() != size * size * 4 || !self.state.q_table.is_finite() {
            return Err(anyhow!("Saved Q-table is corrupt"));
        }
        Ok(())
    }

    /// Rebuild the trained agent
    pub fn to_agent(&self) -> Result<QLearningAgent> {
        self.check()?;
        Ok(QLearningAgent::from_state(self.state.clone()))
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path.as_ref())
            .with_context(|| format!("Failed to create file: {}", path.as_ref().display()))?;
        let mut writer = BufWriter::new(file);

        rmp_serde::encode::write(&mut writer, self).context("Failed to serialize agent")?;

        Ok(())
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())
            .with_context(|| format!("Failed to open file: {}", path.as_ref().display()))?;
        let reader = BufReader::new(file);

        let saved: Self =
            rmp_serde::decode::from_read(reader).context("Failed to deserialize agent")?;
        saved.check()?;
        Ok(saved)
    }
}
