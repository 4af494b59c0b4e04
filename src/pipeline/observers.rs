//! Observer pattern for training pipelines
//!
//! Observers allow composable data collection during training without coupling
//! training logic to specific output formats.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};

use crate::{
    Result,
    pipeline::training::{EpisodeOutcome, EpisodeSummary, StepRecord},
    ports::Observer,
};

/// Complete observation of a training episode
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Observation {
    #[serde(flatten)]
    pub summary: EpisodeSummary,
    /// Per-step records, present only when step capture is enabled
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub steps: Vec<StepRecord>,
}

/// Progress bar observer - Shows training progress
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
    completed: usize,
    runaway: usize,
}

impl ProgressObserver {
    /// Create a new progress observer
    pub fn new() -> Self {
        Self {
            progress_bar: None,
            completed: 0,
            runaway: 0,
        }
    }

    fn message(&self, epsilon: f64) -> String {
        format!(
            "goal:{} runaway:{} ε:{epsilon:.3}",
            self.completed, self.runaway
        )
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for ProgressObserver {
    fn on_training_start(&mut self, total_episodes: usize) -> Result<()> {
        let pb = ProgressBar::new(total_episodes as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} episodes ({msg})")
                .map_err(|e| crate::Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        self.progress_bar = Some(pb);
        Ok(())
    }

    fn on_episode_end(&mut self, summary: &EpisodeSummary) -> Result<()> {
        match summary.outcome {
            EpisodeOutcome::ReachedGoal => self.completed += 1,
            EpisodeOutcome::Runaway => self.runaway += 1,
        }

        if let Some(pb) = &self.progress_bar {
            pb.set_position(summary.episode as u64 + 1);
            pb.set_message(self.message(summary.epsilon));
        }
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message(format!(
                "goal:{} runaway:{}",
                self.completed, self.runaway
            ));
        }
        Ok(())
    }
}

/// Metrics observer - Tracks training metrics
pub struct MetricsObserver {
    total_episodes: usize,
    completed: usize,
    runaway: usize,
    episode_lengths: Vec<usize>,
    total_rewards: Vec<f64>,
    wall_hits: usize,
    final_epsilon: Option<f64>,
    window: usize,
}

impl MetricsObserver {
    /// Create a new metrics observer
    pub fn new() -> Self {
        Self {
            total_episodes: 0,
            completed: 0,
            runaway: 0,
            episode_lengths: Vec::new(),
            total_rewards: Vec::new(),
            wall_hits: 0,
            final_epsilon: None,
            window: 100,
        }
    }

    /// Number of trailing episodes used for the recent-length average
    pub fn with_window(mut self, window: usize) -> Self {
        self.window = window.max(1);
        self
    }

    /// Fraction of episodes that reached the goal
    pub fn completion_rate(&self) -> f64 {
        if self.total_episodes == 0 {
            0.0
        } else {
            self.completed as f64 / self.total_episodes as f64
        }
    }

    /// Get average episode length
    pub fn avg_episode_length(&self) -> f64 {
        mean(self.episode_lengths.iter().map(|&len| len as f64))
    }

    /// Average length over the trailing window
    pub fn recent_episode_length(&self) -> f64 {
        let skip = self.episode_lengths.len().saturating_sub(self.window);
        mean(self.episode_lengths[skip..].iter().map(|&len| len as f64))
    }

    pub fn avg_total_reward(&self) -> f64 {
        mean(self.total_rewards.iter().copied())
    }

    /// Shortest episode that reached the goal
    pub fn shortest_episode(&self) -> Option<usize> {
        self.episode_lengths.iter().copied().min()
    }

    pub fn episode_lengths(&self) -> &[usize] {
        &self.episode_lengths
    }

    /// Get metrics summary
    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            total_episodes: self.total_episodes,
            completed_episodes: self.completed,
            runaway_episodes: self.runaway,
            completion_rate: self.completion_rate(),
            avg_episode_length: self.avg_episode_length(),
            recent_episode_length: self.recent_episode_length(),
            shortest_episode: self.shortest_episode(),
            avg_total_reward: self.avg_total_reward(),
            wall_hits: self.wall_hits,
            final_epsilon: self.final_epsilon,
        }
    }
}

fn mean(values: impl ExactSizeIterator<Item = f64>) -> f64 {
    let len = values.len();
    if len == 0 {
        0.0
    } else {
        values.sum::<f64>() / len as f64
    }
}

/// Summary of training metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub total_episodes: usize,
    pub completed_episodes: usize,
    pub runaway_episodes: usize,
    pub completion_rate: f64,
    /// Mean steps over episodes that reached the goal
    pub avg_episode_length: f64,
    pub recent_episode_length: f64,
    pub shortest_episode: Option<usize>,
    pub avg_total_reward: f64,
    pub wall_hits: usize,
    pub final_epsilon: Option<f64>,
}

impl Default for MetricsObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for MetricsObserver {
    fn on_episode_end(&mut self, summary: &EpisodeSummary) -> Result<()> {
        self.total_episodes += 1;
        self.wall_hits += summary.wall_hits;
        self.total_rewards.push(summary.total_reward);
        self.final_epsilon = Some(summary.epsilon);
        match summary.outcome {
            EpisodeOutcome::ReachedGoal => {
                self.completed += 1;
                self.episode_lengths.push(summary.steps);
            }
            EpisodeOutcome::Runaway => self.runaway += 1,
        }
        Ok(())
    }
}

/// JSONL observer - Exports observations to JSON Lines format
pub struct JsonlObserver {
    writer: BufWriter<File>,
    capture_steps: bool,
    current_steps: Vec<StepRecord>,
}

impl JsonlObserver {
    /// Create a new JSONL observer
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        Ok(Self {
            writer,
            capture_steps: false,
            current_steps: Vec::new(),
        })
    }

    /// Also record every step of each episode
    pub fn with_steps(mut self, capture_steps: bool) -> Self {
        self.capture_steps = capture_steps;
        self
    }
}

impl Observer for JsonlObserver {
    fn on_episode_start(&mut self, _episode: usize) -> Result<()> {
        self.current_steps.clear();
        Ok(())
    }

    fn on_step(&mut self, step: &StepRecord) -> Result<()> {
        if self.capture_steps {
            self.current_steps.push(*step);
        }
        Ok(())
    }

    fn on_episode_end(&mut self, summary: &EpisodeSummary) -> Result<()> {
        let observation = Observation {
            summary: summary.clone(),
            steps: std::mem::take(&mut self.current_steps),
        };

        // Write as JSONL (one JSON object per line)
        serde_json::to_writer(&mut self.writer, &observation)?;
        writeln!(&mut self.writer)?;
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Shared handle to an observer, so its data can be read after training
///
/// The pipeline owns its observers; register a clone of this handle and keep
/// the original to inspect the observer once `run` returns.
pub struct SharedObserver<O> {
    inner: Arc<Mutex<O>>,
}

impl<O: Observer> SharedObserver<O> {
    pub fn new(observer: O) -> Self {
        Self {
            inner: Arc::new(Mutex::new(observer)),
        }
    }

    /// Lock the wrapped observer
    pub fn lock(&self) -> MutexGuard<'_, O> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<O> Clone for SharedObserver<O> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<O: Observer> Observer for SharedObserver<O> {
    fn on_training_start(&mut self, total_episodes: usize) -> Result<()> {
        self.lock().on_training_start(total_episodes)
    }

    fn on_episode_start(&mut self, episode: usize) -> Result<()> {
        self.lock().on_episode_start(episode)
    }

    fn on_step(&mut self, step: &StepRecord) -> Result<()> {
        self.lock().on_step(step)
    }

    fn on_episode_end(&mut self, summary: &EpisodeSummary) -> Result<()> {
        self.lock().on_episode_end(summary)
    }

    fn on_training_end(&mut self) -> Result<()> {
        self.lock().on_training_end()
    }
}
