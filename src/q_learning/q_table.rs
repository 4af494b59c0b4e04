//! Q-table implementation for tabular Q-learning on a square grid

use rand::{Rng, seq::IndexedRandom};
use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    types::{Action, Position},
};

/// Q-table mapping (position, action) pairs to Q-values
///
/// Values live in a flat vector indexed by `(row * size + col) * 4 + action`
/// and start at 0.0.
///
/// # Panics
///
/// Accessors panic when handed a position outside the `size`x`size` grid the
/// table was built for; the transition model never produces one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QTable {
    size: usize,
    q_values: Vec<f64>,
    /// Learning rate α
    learning_rate: f64,
    /// Discount factor γ
    discount_factor: f64,
}

impl QTable {
    /// Create a zero-initialized Q-table for a `size`x`size` grid
    pub fn new(size: usize, learning_rate: f64, discount_factor: f64) -> Self {
        Self {
            size,
            q_values: vec![0.0; size * size * Action::COUNT],
            learning_rate,
            discount_factor,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn discount_factor(&self) -> f64 {
        self.discount_factor
    }

    fn slot(&self, position: Position) -> usize {
        assert!(
            position.row < self.size && position.col < self.size,
            "position {position} outside {0}x{0} Q-table",
            self.size
        );
        (position.row * self.size + position.col) * Action::COUNT
    }

    /// Get Q-value for a state-action pair
    pub fn get(&self, position: Position, action: Action) -> f64 {
        self.q_values[self.slot(position) + action.index()]
    }

    /// Set Q-value for a state-action pair
    pub fn set(&mut self, position: Position, action: Action, value: f64) {
        let slot = self.slot(position);
        self.q_values[slot + action.index()] = value;
    }

    /// All four action values for a state, in action index order
    pub fn action_values(&self, position: Position) -> [f64; Action::COUNT] {
        let slot = self.slot(position);
        let mut values = [0.0; Action::COUNT];
        values.copy_from_slice(&self.q_values[slot..slot + Action::COUNT]);
        values
    }

    /// Maximum Q-value over all actions in a state
    pub fn max_q(&self, position: Position) -> f64 {
        self.action_values(position)
            .into_iter()
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Select the greedy action for a state.
    ///
    /// When several actions share the maximum value exactly, one of them is
    /// drawn uniformly from that tie set.
    pub fn best_action<R: Rng + ?Sized>(&self, position: Position, rng: &mut R) -> Action {
        let values = self.action_values(position);
        let max = values.into_iter().fold(f64::NEG_INFINITY, f64::max);
        let tied: Vec<Action> = Action::ALL
            .into_iter()
            .filter(|action| values[action.index()] == max)
            .collect();
        tied.choose(rng).copied().unwrap_or(Action::North)
    }

    /// Q-learning update: off-policy TD control
    ///
    /// Q(s,a) ← Q(s,a) + α[r + γ max_a' Q(s',a') - Q(s,a)]
    ///
    /// The bootstrap term is the plain maximum over `next_state`, independent
    /// of the action the behaviour policy takes next. Terminal states are not
    /// special-cased: their values are never updated and stay at zero.
    ///
    /// Returns the new value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NonFiniteValue`] (leaving the table untouched) if the
    /// update would store NaN or an infinity.
    pub fn q_learning_update(
        &mut self,
        state: Position,
        action: Action,
        reward: f64,
        next_state: Position,
    ) -> Result<f64> {
        let current_q = self.get(state, action);
        let max_next_q = self.max_q(next_state);
        let td_target = reward + self.discount_factor * max_next_q;
        let td_error = td_target - current_q;
        let new_q = current_q + self.learning_rate * td_error;
        if !new_q.is_finite() {
            return Err(Error::NonFiniteValue {
                position: state,
                value: new_q,
            });
        }
        self.set(state, action, new_q);
        Ok(new_q)
    }

    /// Number of state-action entries
    pub fn len(&self) -> usize {
        self.q_values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.q_values.is_empty()
    }

    /// Whether every stored value is finite
    pub fn is_finite(&self) -> bool {
        self.q_values.iter().all(|v| v.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    #[test]
    fn test_qtable_initialization() {
        let qtable = QTable::new(3, 0.1, 0.9);
        assert_eq!(qtable.len(), 36);
        assert_eq!(qtable.get(Position::new(2, 1), Action::West), 0.0);
        assert!(qtable.is_finite());
    }

    #[test]
    fn test_qtable_set_get() {
        let mut qtable = QTable::new(3, 0.1, 0.9);
        let state = Position::new(1, 2);
        qtable.set(state, Action::South, 1.5);
        assert_eq!(qtable.get(state, Action::South), 1.5);
        assert_eq!(qtable.get(state, Action::North), 0.0);
        assert_eq!(qtable.get(Position::new(2, 1), Action::South), 0.0);
    }

    #[test]
    fn test_max_q() {
        let mut qtable = QTable::new(3, 0.1, 0.9);
        let state = Position::new(0, 0);
        qtable.set(state, Action::North, -5.0);
        qtable.set(state, Action::East, 0.5);
        qtable.set(state, Action::South, 0.8);
        assert_eq!(qtable.max_q(state), 0.8);
    }

    #[test]
    fn test_best_action_unique_max() {
        let mut qtable = QTable::new(3, 0.1, 0.9);
        let state = Position::new(1, 1);
        qtable.set(state, Action::West, 2.0);
        qtable.set(state, Action::East, 1.0);
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..50 {
            assert_eq!(qtable.best_action(state, &mut rng), Action::West);
        }
    }

    #[test]
    fn test_best_action_samples_tie_set_uniformly() {
        let mut qtable = QTable::new(3, 0.1, 0.9);
        let state = Position::new(1, 1);
        qtable.set(state, Action::North, 1.0);
        qtable.set(state, Action::East, 1.0);
        qtable.set(state, Action::South, -1.0);
        qtable.set(state, Action::West, 1.0);

        let mut rng = StdRng::seed_from_u64(42);
        let trials = 9000;
        let mut counts = [0usize; 4];
        for _ in 0..trials {
            counts[qtable.best_action(state, &mut rng).index()] += 1;
        }

        assert_eq!(counts[Action::South.index()], 0);
        for action in [Action::North, Action::East, Action::West] {
            let freq = counts[action.index()] as f64 / trials as f64;
            assert!(
                (freq - 1.0 / 3.0).abs() < 0.03,
                "{action} chosen with frequency {freq}"
            );
        }
    }

    #[test]
    fn test_q_learning_update_literal() {
        let mut qtable = QTable::new(3, 0.1, 0.9);
        let state = Position::new(1, 2);
        let next_state = Position::new(2, 2);

        // Q(s,a) = 0 + 0.1 * (1 + 0.9 * 0 - 0) = 0.1
        let new_q = qtable
            .q_learning_update(state, Action::South, 1.0, next_state)
            .unwrap();
        assert!((new_q - 0.1).abs() < 1e-12);
        assert!((qtable.get(state, Action::South) - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_q_learning_update_uses_max_next_value() {
        let mut qtable = QTable::new(3, 0.5, 0.9);
        let state = Position::new(0, 0);
        let next_state = Position::new(0, 1);
        qtable.set(next_state, Action::East, 1.0);
        qtable.set(next_state, Action::South, 2.0);
        qtable.set(state, Action::East, 0.4);

        // 0.4 + 0.5 * (0 + 0.9 * 2.0 - 0.4) = 1.1
        let new_q = qtable
            .q_learning_update(state, Action::East, 0.0, next_state)
            .unwrap();
        assert!((new_q - 1.1).abs() < 1e-12);
    }

    #[test]
    fn test_q_learning_update_is_reproducible() {
        let mut a = QTable::new(3, 0.1, 0.9);
        let mut b = QTable::new(3, 0.1, 0.9);
        for table in [&mut a, &mut b] {
            table.set(Position::new(1, 1), Action::East, 0.25);
            table
                .q_learning_update(Position::new(1, 0), Action::East, -1.0, Position::new(1, 1))
                .unwrap();
        }
        assert_eq!(
            a.get(Position::new(1, 0), Action::East),
            b.get(Position::new(1, 0), Action::East)
        );
    }

    #[test]
    fn test_q_learning_update_rejects_non_finite() {
        let mut qtable = QTable::new(2, 0.1, 0.9);
        let state = Position::new(0, 0);
        let result = qtable.q_learning_update(state, Action::East, f64::INFINITY, state);
        assert!(matches!(result, Err(Error::NonFiniteValue { .. })));
        assert_eq!(qtable.get(state, Action::East), 0.0);
        assert!(qtable.is_finite());
    }
}
