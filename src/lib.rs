//! Tabular Q-learning for grid mazes
//!
//! This crate provides:
//! - Maze grids with a plain-text file format, random generation and
//!   colored rendering
//! - An ε-greedy Q-learning agent with a uniform warm-up window and
//!   multiplicative ε annealing
//! - A training pipeline with bounded episodes and pluggable observers
//! - Greedy policy extraction and bounded policy replay

pub mod app;
pub mod cli;
pub mod error;
pub mod maze;
pub mod pipeline;
pub mod ports;
pub mod q_learning;
pub mod types;

pub use error::{Error, Result};
pub use types::{Action, Position};
