//! Deterministic transition and reward model for the maze

use serde::{Deserialize, Serialize};

use crate::{
    Result,
    maze::{Cell, Grid},
    types::{Action, Position},
};

/// Reward values used by the transition model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardSchedule {
    /// Reward for entering the goal (ends the episode)
    pub goal: f64,
    /// Reward for stepping onto a wall
    pub wall: f64,
    /// Reward for trying to leave the grid
    pub out_of_bounds: f64,
    /// Reward for any other move
    pub step: f64,
    /// Bonus added when a move onto a wall also reduces the distance to goal
    pub closer_wall_bonus: f64,
}

impl Default for RewardSchedule {
    fn default() -> Self {
        Self {
            goal: 1.0,
            wall: -1.0,
            out_of_bounds: -5.0,
            step: 0.0,
            closer_wall_bonus: 0.5,
        }
    }
}

impl RewardSchedule {
    pub fn is_finite(&self) -> bool {
        [
            self.goal,
            self.wall,
            self.out_of_bounds,
            self.step,
            self.closer_wall_bonus,
        ]
        .iter()
        .all(|v| v.is_finite())
    }
}

/// Outcome of applying one action
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub reward: f64,
    pub next_state: Position,
    pub terminal: bool,
}

/// Transition model over a read-only grid
///
/// Walls do not block movement: the agent enters the wall cell and is
/// penalized. Leaving the grid keeps the agent in place.
#[derive(Debug, Clone, Copy)]
pub struct MazeEnvironment<'a> {
    grid: &'a Grid,
    rewards: RewardSchedule,
}

impl<'a> MazeEnvironment<'a> {
    pub fn new(grid: &'a Grid, rewards: RewardSchedule) -> Self {
        Self { grid, rewards }
    }

    pub fn grid(&self) -> &'a Grid {
        self.grid
    }

    pub fn rewards(&self) -> &RewardSchedule {
        &self.rewards
    }

    /// Apply `action` in `state`.
    ///
    /// # Errors
    ///
    /// Fails only if `state` itself lies outside the grid.
    pub fn step(&self, state: Position, action: Action) -> Result<Transition> {
        self.grid.cell_at(state)?;
        let Some(next_state) = state.step(action, self.grid.size()) else {
            return Ok(Transition {
                reward: self.rewards.out_of_bounds,
                next_state: state,
                terminal: false,
            });
        };

        let cell = self.grid.cell_at(next_state)?;
        let (mut reward, terminal) = match cell {
            Cell::Goal => (self.rewards.goal, true),
            Cell::Wall => (self.rewards.wall, false),
            _ => (self.rewards.step, false),
        };

        // Shaping only applies to wall cells, never to the goal
        let goal = self.grid.goal();
        if cell == Cell::Wall && state.manhattan(goal) > next_state.manhattan(goal) {
            reward += self.rewards.closer_wall_bonus;
        }

        Ok(Transition {
            reward,
            next_state,
            terminal,
        })
    }
}
