//! CLI infrastructure for the maze Q-learning toolkit
//!
//! This module provides the command-line interface for generating mazes,
//! training agents on them and replaying saved policies.

pub mod commands;
pub mod output;
