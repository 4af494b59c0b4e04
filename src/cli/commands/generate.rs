//! Generate command - Write a random maze file

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use rand::{SeedableRng, rngs::StdRng};

use crate::{
    cli::output::{format_number, print_grid, print_kv, print_section},
    maze::{Cell, generate},
};

/// Random stream for maze generation
pub(crate) fn maze_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_rng(&mut rand::rng()),
    }
}

#[derive(Parser, Debug)]
#[command(about = "Generate a random maze")]
pub struct GenerateArgs {
    /// Output maze file
    pub output: PathBuf,

    /// Side length of the square maze
    #[arg(long, short = 'n', default_value_t = 100)]
    pub size: usize,

    /// Number of walls to scatter
    #[arg(long, short = 'w', default_value_t = 1000)]
    pub walls: usize,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Print the generated maze
    #[arg(long, default_value_t = false)]
    pub show: bool,

    /// Disable ANSI colors when printing
    #[arg(long, default_value_t = false)]
    pub no_color: bool,
}

pub fn execute(args: GenerateArgs) -> Result<()> {
    let mut rng = maze_rng(args.seed);
    let grid = generate(args.size, args.walls, &mut rng)
        .with_context(|| format!("Failed to generate a {0}x{0} maze", args.size))?;
    grid.save(&args.output)
        .with_context(|| format!("Failed to write maze to {}", args.output.display()))?;
    info!("wrote maze to {}", args.output.display());

    print_section("Maze generated");
    print_kv("Size", &format!("{0}x{0}", grid.size()));
    print_kv("Walls", &format_number(grid.count(Cell::Wall)));
    print_kv("Output", &args.output.display().to_string());
    if args.show {
        println!();
        print_grid(&grid, !args.no_color);
    }
    Ok(())
}
