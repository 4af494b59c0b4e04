//! Greedy policy extracted from a trained Q-table

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::q_table::QTable;
use crate::types::{Action, Position};

/// Immutable per-state best-action lookup
///
/// Built once from a Q-table snapshot; later changes to the table do not
/// affect it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GreedyPolicy {
    size: usize,
    actions: Vec<Action>,
}

impl GreedyPolicy {
    /// Take the best action for every cell, ties broken uniformly at random
    pub fn extract<R: Rng + ?Sized>(q_table: &QTable, rng: &mut R) -> Self {
        let size = q_table.size();
        let actions = (0..size * size)
            .map(|i| q_table.best_action(Position::new(i / size, i % size), rng))
            .collect();
        Self { size, actions }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Whether the stored lookup covers exactly `size`x`size` cells
    pub(crate) fn is_consistent(&self) -> bool {
        self.actions.len() == self.size * self.size
    }

    /// Action for `position`, or `None` outside the grid
    pub fn action_at(&self, position: Position) -> Option<Action> {
        if position.row < self.size && position.col < self.size {
            Some(self.actions[position.row * self.size + position.col])
        } else {
            None
        }
    }

    /// Render the policy as one arrow per cell
    pub fn arrows(&self) -> String {
        let mut out = String::with_capacity(self.size * (self.size + 1));
        for row in self.actions.chunks(self.size) {
            for action in row {
                out.push(match action {
                    Action::North => '^',
                    Action::East => '>',
                    Action::South => 'v',
                    Action::West => '<',
                });
            }
            out.push('\n');
        }
        out
    }
}
