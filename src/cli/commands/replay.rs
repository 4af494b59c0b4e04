//! Replay command - Run a saved agent's policy on a maze

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crate::{
    cli::output::{format_number, print_kv, print_replay, print_section, print_subsection},
    maze::Grid,
    pipeline::{PolicyRunner, ReplayOutcome},
    q_learning::SavedAgent,
};

#[derive(Parser, Debug)]
#[command(about = "Replay a saved agent's greedy policy")]
pub struct ReplayArgs {
    /// Saved agent file
    pub agent: PathBuf,

    /// Maze file to replay on
    #[arg(long, short = 'm')]
    pub maze: PathBuf,

    /// Steps after which replay gives up (defaults to the saved config)
    #[arg(long)]
    pub max_steps: Option<usize>,

    /// Print the greedy policy as arrows
    #[arg(long, default_value_t = false)]
    pub show_policy: bool,

    /// Disable ANSI colors when printing
    #[arg(long, default_value_t = false)]
    pub no_color: bool,

    /// Exit with an error when the policy does not reach the goal
    #[arg(long, default_value_t = false)]
    pub strict: bool,
}

pub fn execute(args: ReplayArgs) -> Result<()> {
    let saved = SavedAgent::load_from_file(&args.agent)?;
    let size = saved.policy.size();
    let grid = Grid::load(&args.maze, size)
        .with_context(|| format!("Failed to load maze {}", args.maze.display()))?;
    let max_steps = args.max_steps.unwrap_or(saved.config.max_replay_steps);

    print_section("Policy replay");
    print_kv("Agent", &args.agent.display().to_string());
    print_kv("Maze", &format!("{0}x{0}", size));
    print_kv(
        "Trained episodes",
        &format_number(saved.metadata.episodes_trained),
    );
    print_kv("Step cap", &format_number(max_steps));

    let replay = PolicyRunner::new(&grid, max_steps).run(&saved.policy)?;
    print_replay(&replay, !args.no_color);

    if args.show_policy {
        print_subsection("Greedy policy");
        print!("{}", saved.policy.arrows());
    }

    if args.strict && replay.outcome == ReplayOutcome::NonTerminating {
        anyhow::bail!("policy did not reach the goal within {max_steps} steps");
    }
    Ok(())
}
