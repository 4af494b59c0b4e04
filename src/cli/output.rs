//! Output formatting for CLI

use crate::{
    maze::{Grid, render},
    pipeline::{Replay, ReplayOutcome},
};

/// Print a section header
pub fn print_section(title: &str) {
    println!("\n{}", "=".repeat(60));
    println!("{title}");
    println!("{}", "=".repeat(60));
}

/// Print a subsection header
pub fn print_subsection(title: &str) {
    println!("\n{title}");
    println!("{}", "-".repeat(40));
}

/// Format a number with thousands separators
pub fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i.is_multiple_of(3) {
            result.insert(0, ',');
        }
        result.insert(0, c);
    }
    result
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:20} {}", format!("{}:", key), value);
}

/// Print statistics table
pub fn print_stats_table(stats: &[(&str, &str)]) {
    for (key, value) in stats {
        print_kv(key, value);
    }
}

/// Print the maze, colored or as plain maze-file text
pub fn print_grid(grid: &Grid, color: bool) {
    if color {
        print!("{}", render(grid));
    } else {
        print!("{grid}");
    }
}

/// Print the outcome of a policy replay followed by the traced maze
pub fn print_replay(replay: &Replay, color: bool) {
    print_subsection("Policy replay");
    let outcome = match replay.outcome {
        ReplayOutcome::ReachedGoal => "reached goal",
        ReplayOutcome::NonTerminating => "did not terminate",
    };
    print_stats_table(&[
        ("Outcome", outcome),
        ("Steps", &format_number(replay.steps)),
        ("Walls crossed", &format_number(replay.wall_hits)),
    ]);
    println!();
    print_grid(&replay.grid, color);
}
