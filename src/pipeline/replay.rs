//! Policy replay: follow a greedy policy from the start cell

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    maze::{Cell, Grid},
    q_learning::GreedyPolicy,
    types::Position,
};

/// How a replay ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplayOutcome {
    ReachedGoal,
    /// The step cap was hit; the policy loops or stalls
    NonTerminating,
}

/// Outcome of replaying a policy, with the cells it passed through
#[derive(Debug, Clone)]
pub struct Replay {
    pub outcome: ReplayOutcome,
    pub steps: usize,
    /// Cells entered after leaving the start, in order; ends with the goal
    /// when the goal was reached
    pub path: Vec<Position>,
    /// Walls the path walks across
    pub wall_hits: usize,
    /// Copy of the maze with the path marked as [`Cell::Trace`]
    pub grid: Grid,
}

impl Replay {
    pub fn reached_goal(&self) -> bool {
        self.outcome == ReplayOutcome::ReachedGoal
    }
}

/// Replays a fixed policy against a maze with a step cap
#[derive(Debug, Clone, Copy)]
pub struct PolicyRunner<'a> {
    grid: &'a Grid,
    max_steps: usize,
}

impl<'a> PolicyRunner<'a> {
    pub fn new(grid: &'a Grid, max_steps: usize) -> Self {
        Self { grid, max_steps }
    }

    /// Walk `policy` from the start cell.
    ///
    /// A move off the grid leaves the walker in place. Walls are crossed and
    /// marked like any other cell; the start and goal keep their glyphs.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] if the policy was extracted for a
    /// different grid size.
    pub fn run(&self, policy: &GreedyPolicy) -> Result<Replay> {
        let size = self.grid.size();
        if policy.size() != size {
            return Err(Error::DimensionMismatch {
                expected: policy.size(),
                got: size,
            });
        }

        let mut marked = self.grid.clone();
        let mut path = Vec::new();
        let mut wall_hits = 0;
        let mut state = self.grid.start();

        let outcome = loop {
            if self.grid.cell_at(state)? == Cell::Goal {
                break ReplayOutcome::ReachedGoal;
            }
            if path.len() >= self.max_steps {
                warn!(
                    "policy did not reach the goal within {} steps; stopped at {state}",
                    self.max_steps
                );
                break ReplayOutcome::NonTerminating;
            }

            let action = policy.action_at(state).ok_or_else(|| Error::OutOfRange {
                position: state,
                size,
            })?;
            let next = state.step(action, size).unwrap_or(state);
            path.push(next);

            match self.grid.cell_at(next)? {
                Cell::Goal => break ReplayOutcome::ReachedGoal,
                Cell::Start => {}
                cell => {
                    if cell == Cell::Wall && next != state {
                        wall_hits += 1;
                    }
                    marked.set(next, Cell::Trace)?;
                }
            }
            state = next;
        };

        debug!("replay finished: {outcome:?} after {} steps", path.len());

        Ok(Replay {
            outcome,
            steps: path.len(),
            path,
            wall_hits,
            grid: marked,
        })
    }
}
