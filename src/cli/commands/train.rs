//! Train command - Train a Q-learning agent on a maze and replay its policy

use std::{
    fs::File,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use log::info;
use serde::Serialize;
use serde_json::to_writer_pretty;

use super::generate::maze_rng;
use crate::{
    app::MazeConfig,
    cli::output::{format_number, print_kv, print_replay, print_section, print_subsection},
    maze::{Cell, Grid, generate},
    pipeline::{
        JsonlObserver, MetricsObserver, MetricsSummary, PolicyRunner, ProgressObserver,
        ReplayOutcome, SharedObserver, TrainingConfig, TrainingPipeline, TrainingResult,
    },
    q_learning::{MazeEnvironment, QLearningAgent, SavedAgent, TrainingMetadata},
};

#[derive(Debug, Serialize)]
struct ReplaySummary {
    outcome: ReplayOutcome,
    steps: usize,
    wall_hits: usize,
}

#[derive(Debug, Serialize)]
struct TrainingSummaryFile {
    training: TrainingResult,
    metrics: MetricsSummary,
    replay: ReplaySummary,
    config: MazeConfig,
    maze: Option<PathBuf>,
}

fn sanitize_summary_path(raw: &Path) -> PathBuf {
    let mut normalized = raw.to_path_buf();
    let raw_str = raw.as_os_str().to_string_lossy();

    // Treat trailing separators or missing filename as a directory target.
    if raw_str.ends_with(std::path::MAIN_SEPARATOR) || normalized.file_name().is_none() {
        normalized.push("training_summary.json");
        return normalized;
    }

    match normalized.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => normalized,
        _ => {
            normalized.set_extension("json");
            normalized
        }
    }
}

#[derive(Parser, Debug)]
#[command(about = "Train a Q-learning agent on a maze")]
pub struct TrainArgs {
    /// Maze file to train on (a random maze is generated when omitted)
    #[arg(long, short = 'm')]
    pub maze: Option<PathBuf>,

    /// JSON configuration file; flags below override its values
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Side length of the square maze
    #[arg(long, short = 'n')]
    pub size: Option<usize>,

    /// Walls to scatter when generating a maze
    #[arg(long, short = 'w')]
    pub walls: Option<usize>,

    /// Write the generated maze to this file
    #[arg(long)]
    pub save_maze: Option<PathBuf>,

    /// Number of training episodes
    #[arg(long, short = 'e')]
    pub episodes: Option<usize>,

    /// Learning rate α (0.0-1.0]
    #[arg(long)]
    pub learning_rate: Option<f64>,

    /// Discount factor γ (0.0-1.0)
    #[arg(long)]
    pub discount: Option<f64>,

    /// Initial epsilon (exploration rate)
    #[arg(long)]
    pub epsilon: Option<f64>,

    /// Episodes of uniformly random exploration before ε applies
    #[arg(long)]
    pub warmup: Option<usize>,

    /// Multiplicative ε decay per post-warm-up episode
    #[arg(long)]
    pub epsilon_decay: Option<f64>,

    /// Steps after which a training episode is abandoned
    #[arg(long)]
    pub max_episode_steps: Option<usize>,

    /// Steps after which policy replay gives up
    #[arg(long)]
    pub max_replay_steps: Option<usize>,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Output file for trained agent
    #[arg(long, short = 'O')]
    pub output: Option<PathBuf>,

    /// Optional file for JSONL observations
    #[arg(long)]
    pub observations: Option<PathBuf>,

    /// Include every step in the JSONL observations
    #[arg(long, default_value_t = false)]
    pub observe_steps: bool,

    /// Optional path for writing a summary JSON file
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Hide the progress bar
    #[arg(long, default_value_t = false)]
    pub no_progress: bool,

    /// Print the maze with the replayed path
    #[arg(long, default_value_t = false)]
    pub show: bool,

    /// Print the greedy policy as arrows
    #[arg(long, default_value_t = false)]
    pub show_policy: bool,

    /// Disable ANSI colors when printing
    #[arg(long, default_value_t = false)]
    pub no_color: bool,
}

impl TrainArgs {
    /// Configuration file (or defaults) with command-line overrides applied
    pub fn resolve_config(&self) -> Result<MazeConfig> {
        let mut config = match &self.config {
            Some(path) => MazeConfig::load(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => MazeConfig::default(),
        };

        if let Some(size) = self.size {
            config = config.with_grid_size(size);
        }
        if let Some(walls) = self.walls {
            config = config.with_wall_count(walls);
        }
        if let Some(episodes) = self.episodes {
            config = config.with_episodes(episodes);
        }
        if let Some(rate) = self.learning_rate {
            config = config.with_learning_rate(rate);
        }
        if let Some(discount) = self.discount {
            config = config.with_discount_factor(discount);
        }
        if let Some(epsilon) = self.epsilon {
            config = config.with_initial_epsilon(epsilon);
        }
        if let Some(warmup) = self.warmup {
            config = config.with_warmup_episodes(warmup);
        }
        if let Some(decay) = self.epsilon_decay {
            config = config.with_epsilon_decay(decay);
        }
        if let Some(steps) = self.max_episode_steps {
            config = config.with_max_episode_steps(steps);
        }
        if let Some(steps) = self.max_replay_steps {
            config = config.with_max_replay_steps(steps);
        }
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }

        config.validate().context("Invalid training configuration")?;
        Ok(config)
    }
}

fn build_grid(args: &TrainArgs, config: &MazeConfig) -> Result<Grid> {
    match &args.maze {
        Some(path) => Grid::load(path, config.grid_size)
            .with_context(|| format!("Failed to load maze {}", path.display())),
        None => {
            let grid = generate(config.grid_size, config.wall_count, &mut maze_rng(config.seed))
                .context("Failed to generate maze")?;
            if let Some(path) = &args.save_maze {
                grid.save(path)
                    .with_context(|| format!("Failed to write maze to {}", path.display()))?;
                println!("✓ Maze saved to: {}", path.display());
            }
            Ok(grid)
        }
    }
}

pub fn execute(args: TrainArgs) -> Result<()> {
    let config = args.resolve_config()?;
    if args.maze.is_some() && args.save_maze.is_some() {
        return Err(anyhow!(
            "--save-maze only applies to generated mazes; drop it or --maze"
        ));
    }

    let summary_spec = args.summary.as_ref().map(|raw| {
        let sanitized = sanitize_summary_path(raw);
        let normalized = sanitized != *raw;
        (sanitized, normalized)
    });

    let grid = build_grid(&args, &config)?;
    let env = MazeEnvironment::new(&grid, config.rewards);
    let mut agent = QLearningAgent::from_config(&config)?;

    print_section("Q-learning maze training");
    print_kv("Maze", &format!("{0}x{0}", grid.size()));
    print_kv("Walls", &format_number(grid.count(Cell::Wall)));
    print_kv("Episodes", &format_number(config.episodes));
    print_kv("Learning rate", &config.learning_rate.to_string());
    print_kv("Discount", &config.discount_factor.to_string());
    print_kv(
        "Exploration",
        &format!(
            "ε={} warm-up={} decay={}",
            config.initial_epsilon, config.warmup_episodes, config.epsilon_decay
        ),
    );
    if let Some(seed) = config.seed {
        print_kv("Seed", &seed.to_string());
    }

    let metrics = SharedObserver::new(MetricsObserver::new());
    let mut pipeline =
        TrainingPipeline::new(TrainingConfig::from(&config)).with_observer(Box::new(metrics.clone()));
    if !args.no_progress {
        pipeline = pipeline.with_observer(Box::new(ProgressObserver::new()));
    }
    if let Some(path) = &args.observations {
        let observer = JsonlObserver::new(path)
            .with_context(|| format!("Failed to create {}", path.display()))?
            .with_steps(args.observe_steps);
        pipeline = pipeline.with_observer(Box::new(observer));
    }

    let result = pipeline.run(&mut agent, &env)?;
    let metrics_summary = metrics.lock().summary();

    print_subsection("Training results");
    print_kv("Reached goal", &format_number(result.completed_episodes));
    print_kv("Runaway", &format_number(result.runaway_episodes));
    print_kv("Total steps", &format_number(result.total_steps));
    print_kv("Mean steps", &format!("{:.1}", result.mean_steps));
    print_kv(
        "Recent mean steps",
        &format!("{:.1}", metrics_summary.recent_episode_length),
    );
    if let Some(shortest) = metrics_summary.shortest_episode {
        print_kv("Shortest episode", &format_number(shortest));
    }
    print_kv("Final ε", &format!("{:.4}", result.final_epsilon));

    let policy = agent.extract_policy();
    let replay = PolicyRunner::new(&grid, config.max_replay_steps).run(&policy)?;
    info!("replay {:?} after {} steps", replay.outcome, replay.steps);

    if args.show {
        print_replay(&replay, !args.no_color);
    } else {
        print_subsection("Policy replay");
        print_kv("Outcome", &format!("{:?}", replay.outcome));
        print_kv("Steps", &format_number(replay.steps));
    }
    if args.show_policy {
        print_subsection("Greedy policy");
        print!("{}", policy.arrows());
    }

    // Save agent if output path provided
    if let Some(output_path) = &args.output {
        let saved = SavedAgent::new(
            &agent,
            policy,
            config.clone(),
            TrainingMetadata::from(&result),
        );
        saved.save_to_file(output_path)?;
        println!("✓ Agent saved to: {}", output_path.display());
    }

    if let Some((summary_path, normalized)) = summary_spec {
        if normalized {
            println!(
                "\n⚠️  Normalizing summary path to {}",
                summary_path.display()
            );
        }
        if let Some(parent) = summary_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let summary = TrainingSummaryFile {
            training: result,
            metrics: metrics_summary,
            replay: ReplaySummary {
                outcome: replay.outcome,
                steps: replay.steps,
                wall_hits: replay.wall_hits,
            },
            config,
            maze: args.maze.clone(),
        };

        let file = File::create(&summary_path)?;
        to_writer_pretty(file, &summary)?;
        println!("\nSummary written to {}", summary_path.display());
    }

    Ok(())
}
