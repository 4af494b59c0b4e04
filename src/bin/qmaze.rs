//! qmaze CLI - Q-learning agents for grid mazes
//!
//! This CLI provides a unified interface for:
//! - Generating random mazes
//! - Training agents and replaying the learned policy
//! - Replaying saved agents on maze files

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "qmaze")]
#[command(version, about = "Tabular Q-learning for grid mazes", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train an agent on a maze file or a generated maze
    Train(Box<qmaze::cli::commands::train::TrainArgs>),

    /// Generate a random maze file
    Generate(qmaze::cli::commands::generate::GenerateArgs),

    /// Replay a saved agent on a maze
    Replay(qmaze::cli::commands::replay::ReplayArgs),
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Train(args) => qmaze::cli::commands::train::execute(*args),
        Commands::Generate(args) => qmaze::cli::commands::generate::execute(args),
        Commands::Replay(args) => qmaze::cli::commands::replay::execute(args),
    }
}
