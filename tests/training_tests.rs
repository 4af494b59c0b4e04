//! End-to-end tests for training, extraction and replay

mod common;

use common::{SummaryRecorder, train};
use qmaze::{
    Position,
    app::MazeConfig,
    maze::{Cell, Grid},
    pipeline::{
        Episode, EpisodeOutcome, PolicyRunner, ReplayOutcome, SharedObserver, TrainingConfig,
        TrainingPipeline,
    },
    q_learning::{MazeEnvironment, QLearningAgent},
};

fn greedy_config(seed: u64) -> MazeConfig {
    MazeConfig::default()
        .with_grid_size(3)
        .with_learning_rate(0.1)
        .with_discount_factor(0.9)
        .with_initial_epsilon(0.0)
        .with_warmup_episodes(0)
        .with_episodes(200)
        .with_max_episode_steps(100_000)
        .with_max_replay_steps(100)
        .with_seed(seed)
}

#[test]
fn test_first_action_is_seed_deterministic() {
    let grid = Grid::open(3).unwrap();
    let env = MazeEnvironment::new(&grid, Default::default());

    for seed in [1, 7, 42] {
        let config = greedy_config(seed);
        let mut a = QLearningAgent::from_config(&config).unwrap();
        let mut b = QLearningAgent::from_config(&config).unwrap();
        let first_a = Episode::begin(0, &mut a, &env).pending_action();
        let first_b = Episode::begin(0, &mut b, &env).pending_action();
        assert_eq!(first_a, first_b, "seed {seed}");
    }
}

#[test]
fn test_greedy_training_replays_to_goal() {
    let grid = Grid::open(3).unwrap();

    for seed in [3, 11, 2024] {
        let (mut agent, result) = train(&greedy_config(seed), &grid);
        assert_eq!(result.completed_episodes, 200, "seed {seed}");
        assert_eq!(result.runaway_episodes, 0, "seed {seed}");

        let policy = agent.extract_policy();
        let replay = PolicyRunner::new(&grid, 100).run(&policy).unwrap();
        assert_eq!(replay.outcome, ReplayOutcome::ReachedGoal, "seed {seed}");
        assert!(replay.steps >= 4);
        assert_eq!(replay.path.last(), Some(&grid.goal()));
        assert_eq!(replay.wall_hits, 0);
    }
}

#[test]
fn test_greedy_training_finds_four_step_route() {
    let grid = Grid::open(3).unwrap();
    let config = greedy_config(42).with_episodes(2_000);

    let (mut agent, result) = train(&config, &grid);
    assert_eq!(result.completed_episodes, 2_000);

    let replay = PolicyRunner::new(&grid, 100)
        .run(&agent.extract_policy())
        .unwrap();
    assert_eq!(replay.outcome, ReplayOutcome::ReachedGoal);
    assert_eq!(replay.steps, 4);
    assert_eq!(replay.wall_hits, 0);
    assert_eq!(replay.path.last(), Some(&grid.goal()));
}

#[test]
fn test_warmup_then_greedy_finds_shortest_path() {
    let grid = Grid::open(3).unwrap();
    let config = greedy_config(99)
        .with_warmup_episodes(500)
        .with_episodes(1_000);

    let (mut agent, result) = train(&config, &grid);
    assert_eq!(result.completed_episodes, 1_000);
    // The exploit phase walks the learned shortest route
    assert_eq!(result.last_episode_steps, Some(4));

    let replay = PolicyRunner::new(&grid, 100)
        .run(&agent.extract_policy())
        .unwrap();
    assert!(replay.reached_goal());
    assert_eq!(replay.steps, 4);
    assert_eq!(replay.grid.count(Cell::Trace), 3);
}

#[test]
fn test_training_is_reproducible() {
    let mut grid = Grid::open(5).unwrap();
    grid.set(Position::new(2, 2), Cell::Wall).unwrap();
    let config = MazeConfig::default()
        .with_grid_size(5)
        .with_warmup_episodes(10)
        .with_epsilon_decay(0.95)
        .with_episodes(60)
        .with_seed(1234);

    let (mut a, result_a) = train(&config, &grid);
    let (mut b, result_b) = train(&config, &grid);

    assert_eq!(result_a.total_steps, result_b.total_steps);
    for position in grid.positions() {
        assert_eq!(
            a.q_table().action_values(position),
            b.q_table().action_values(position)
        );
    }
    assert_eq!(a.extract_policy(), b.extract_policy());
}

#[test]
fn test_epsilon_constant_during_warmup_then_decays() {
    let grid = Grid::open(4).unwrap();
    let env = MazeEnvironment::new(&grid, Default::default());
    let recorder = SharedObserver::new(SummaryRecorder::default());

    let mut agent = QLearningAgent::new(4, 0.1, 0.9, 1.0, 5, 0.9);
    let config = TrainingConfig {
        episodes: 30,
        max_episode_steps: 1_000_000,
        seed: Some(8),
    };
    TrainingPipeline::new(config)
        .with_observer(Box::new(recorder.clone()))
        .run(&mut agent, &env)
        .unwrap();

    let guard = recorder.lock();
    let summaries = &guard.summaries;
    assert_eq!(summaries.len(), 30);
    assert!(
        summaries
            .iter()
            .all(|s| s.outcome == EpisodeOutcome::ReachedGoal)
    );

    for summary in &summaries[..=5] {
        assert_eq!(summary.epsilon, 1.0, "episode {}", summary.episode);
    }
    for pair in summaries[5..].windows(2) {
        assert!(pair[1].epsilon < pair[0].epsilon);
    }
    let last = summaries.last().unwrap();
    assert!((last.epsilon - 0.9f64.powi(24)).abs() < 1e-12);
}

#[test]
fn test_runaway_episodes_do_not_stop_training() {
    let grid = Grid::open(8).unwrap();
    let env = MazeEnvironment::new(&grid, Default::default());
    let recorder = SharedObserver::new(SummaryRecorder::default());

    let mut agent = QLearningAgent::new(8, 0.1, 0.9, 1.0, 0, 0.99);
    let config = TrainingConfig {
        episodes: 40,
        max_episode_steps: 20,
        seed: Some(5),
    };
    let result = TrainingPipeline::new(config)
        .with_observer(Box::new(recorder.clone()))
        .run(&mut agent, &env)
        .unwrap();

    let guard = recorder.lock();
    let summaries = &guard.summaries;
    assert_eq!(summaries.len(), 40);
    assert_eq!(result.completed_episodes + result.runaway_episodes, 40);
    // Fourteen moves are needed to cross an 8x8 grid; random walks rarely
    // make it in twenty
    assert!(result.runaway_episodes > 0);
    for summary in summaries {
        match summary.outcome {
            EpisodeOutcome::Runaway => assert_eq!(summary.steps, 20),
            EpisodeOutcome::ReachedGoal => assert!(summary.steps <= 20),
        }
    }
}

#[test]
fn test_unconverged_policy_reports_non_terminating() {
    // No training: every cell ties, and a 10-step cap cannot cross 8x8
    let grid = Grid::open(8).unwrap();
    let mut agent = QLearningAgent::new(8, 0.1, 0.9, 1.0, 0, 0.99).with_seed(3);
    let replay = PolicyRunner::new(&grid, 10)
        .run(&agent.extract_policy())
        .unwrap();
    assert_eq!(replay.outcome, ReplayOutcome::NonTerminating);
    assert_eq!(replay.steps, 10);
    assert_eq!(replay.path.len(), 10);
}
