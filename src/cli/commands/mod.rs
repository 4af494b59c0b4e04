//! Subcommands of the `qmaze` binary

pub mod generate;
pub mod replay;
pub mod train;
