//! Training and replay pipeline
//!
//! This module provides:
//! - The episode state machine and the training loop around it
//! - Policy replay with a step cap
//! - Observers for recording progress and metrics during training

pub mod observers;
pub mod replay;
pub mod training;

// Re-export observer implementations (adapters)
pub use observers::{
    JsonlObserver, MetricsObserver, MetricsSummary, Observation, ProgressObserver, SharedObserver,
};
pub use replay::{PolicyRunner, Replay, ReplayOutcome};
pub use training::{
    Episode, EpisodeOutcome, EpisodePhase, EpisodeSummary, StepRecord, TrainingConfig,
    TrainingPipeline, TrainingResult,
};

pub use crate::ports::Observer;
