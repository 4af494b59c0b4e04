//! CLI command tests driven through the clap argument structs

mod common;

use clap::Parser;
use common::write_maze;
use qmaze::{
    cli::commands::{
        generate::{self, GenerateArgs},
        replay::{self, ReplayArgs},
        train::{self, TrainArgs},
    },
    maze::{Cell, Grid},
    q_learning::SavedAgent,
};
use tempfile::tempdir;

#[test]
fn train_writes_agent_summary_and_observations() {
    let tmp = tempdir().unwrap();
    let maze = write_maze(tmp.path(), "maze.txt", "S000\n0W00\n00W0\n000G\n");
    let agent_path = tmp.path().join("agent.msgpack");
    let observations = tmp.path().join("episodes.jsonl");
    let summary_stem = tmp.path().join("run_overview");

    let args = TrainArgs::parse_from([
        "qmaze-train",
        "--maze",
        maze.to_str().unwrap(),
        "--size",
        "4",
        "--episodes",
        "50",
        "--warmup",
        "10",
        "--seed",
        "42",
        "--no-progress",
        "--output",
        agent_path.to_str().unwrap(),
        "--observations",
        observations.to_str().unwrap(),
        "--summary",
        summary_stem.to_str().unwrap(),
    ]);
    train::execute(args).expect("training should succeed");

    let saved = SavedAgent::load_from_file(&agent_path).unwrap();
    assert_eq!(saved.policy.size(), 4);
    assert_eq!(saved.metadata.episodes_trained, 50);
    assert_eq!(saved.config.seed, Some(42));

    let lines = std::fs::read_to_string(&observations).unwrap();
    assert_eq!(lines.lines().count(), 50);

    let expected_path = summary_stem.with_extension("json");
    let contents = std::fs::read_to_string(&expected_path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(parsed["training"]["total_episodes"], 50);
    assert_eq!(parsed["config"]["grid_size"], 4);
    assert!(parsed["replay"]["outcome"].is_string());
}

#[test]
fn train_rejects_maze_with_wrong_dimensions() {
    let tmp = tempdir().unwrap();
    let maze = write_maze(tmp.path(), "maze.txt", "S00\n000\n00G\n");

    let args = TrainArgs::parse_from([
        "qmaze-train",
        "--maze",
        maze.to_str().unwrap(),
        "--size",
        "4",
        "--episodes",
        "5",
        "--no-progress",
    ]);
    assert!(train::execute(args).is_err());
}

#[test]
fn train_reads_config_file() {
    let tmp = tempdir().unwrap();
    let config = tmp.path().join("config.json");
    std::fs::write(
        &config,
        r#"{ "grid_size": 5, "wall_count": 3, "episodes": 20, "seed": 9 }"#,
    )
    .unwrap();
    let maze_out = tmp.path().join("generated.txt");
    let summary = format!("{}/", tmp.path().join("summaries").display());

    let args = TrainArgs::parse_from([
        "qmaze-train",
        "--config",
        config.to_str().unwrap(),
        "--save-maze",
        maze_out.to_str().unwrap(),
        "--summary",
        &summary,
        "--no-progress",
    ]);
    train::execute(args).expect("training from config should succeed");

    let grid = Grid::load(&maze_out, 5).unwrap();
    assert_eq!(grid.count(Cell::Wall), 3);

    let contents =
        std::fs::read_to_string(tmp.path().join("summaries").join("training_summary.json"))
            .unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(parsed["training"]["total_episodes"], 20);
}

#[test]
fn generate_then_replay_saved_agent() {
    let tmp = tempdir().unwrap();
    let maze = tmp.path().join("maze.txt");
    let agent_path = tmp.path().join("agent.msgpack");

    generate::execute(GenerateArgs::parse_from([
        "qmaze-generate",
        maze.to_str().unwrap(),
        "--size",
        "6",
        "--walls",
        "5",
        "--seed",
        "1",
    ]))
    .expect("generation should succeed");
    assert_eq!(Grid::load(&maze, 6).unwrap().count(Cell::Wall), 5);

    train::execute(TrainArgs::parse_from([
        "qmaze-train",
        "--maze",
        maze.to_str().unwrap(),
        "--size",
        "6",
        "--episodes",
        "30",
        "--seed",
        "2",
        "--no-progress",
        "--output",
        agent_path.to_str().unwrap(),
    ]))
    .expect("training should succeed");

    replay::execute(ReplayArgs::parse_from([
        "qmaze-replay",
        agent_path.to_str().unwrap(),
        "--maze",
        maze.to_str().unwrap(),
        "--max-steps",
        "50",
        "--no-color",
    ]))
    .expect("non-strict replay never fails on a valid agent");
}

#[test]
fn generate_rejects_too_many_walls() {
    let tmp = tempdir().unwrap();
    let maze = tmp.path().join("maze.txt");
    let result = generate::execute(GenerateArgs::parse_from([
        "qmaze-generate",
        maze.to_str().unwrap(),
        "--size",
        "3",
        "--walls",
        "8",
    ]));
    assert!(result.is_err());
    assert!(!maze.exists());
}
