//! Q-table implementation for temporal difference learning

use std::collections::HashMap;

use crate::{q_learning::encoder::State, types::Action};

/// Initial Q-value for unseen state-action pairs, high enough to make the
/// agent try every action at least once.
pub const DEFAULT_Q_INIT: f64 = 3.0;

/// Q-table mapping (state, action) pairs to Q-values
///
/// Entries are only created or overwritten, never removed. Missing entries
/// read as `q_init`.
#[derive(Debug, Clone)]
pub struct QTable {
    /// Q-values: (state, action) -> Q-value
    q_values: HashMap<(State, Action), f64>,
    /// Learning rate α
    learning_rate: f64,
    /// Discount factor γ
    discount_factor: f64,
    /// Initial Q-value for unseen state-action pairs
    q_init: f64,
}

impl QTable {
    /// Create a new Q-table
    pub fn new(learning_rate: f64, discount_factor: f64, q_init: f64) -> Self {
        Self {
            q_values: HashMap::new(),
            learning_rate,
            discount_factor,
            q_init,
        }
    }

    /// Get Q-value for a state-action pair
    pub fn get(&self, state: &State, action: Action) -> f64 {
        *self.q_values.get(&(*state, action)).unwrap_or(&self.q_init)
    }

    /// Set Q-value for a state-action pair
    pub fn set(&mut self, state: State, action: Action, value: f64) {
        self.q_values.insert((state, action), value);
    }

    /// Maximum Q-value in a state together with every action's value, in
    /// [`Action::ALL`] order.
    pub fn best_value(&self, state: &State) -> (f64, Vec<f64>) {
        let values: Vec<f64> = Action::ALL
            .iter()
            .map(|&action| self.get(state, action))
            .collect();
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        (max, values)
    }

    /// Q-learning target from the value held before acting
    ///
    /// Q_new = Q_old + α[r + (γ max_a' Q(s',a') - Q_old)]
    pub fn updated_value(&self, old_value: f64, reward: f64, max_next: f64) -> f64 {
        let learned = reward + (self.discount_factor * max_next - old_value);
        old_value + self.learning_rate * learned
    }

    /// Q-learning update: bootstrap from `next_state` and write the new
    /// value for `(state, action)`. Returns the stored value.
    pub fn q_learning_update(
        &mut self,
        state: State,
        action: Action,
        old_value: f64,
        reward: f64,
        next_state: &State,
    ) -> f64 {
        let (max_next, _) = self.best_value(next_state);
        let new_value = self.updated_value(old_value, reward, max_next);
        self.set(state, action, new_value);
        new_value
    }

    /// Get total number of Q-values stored
    pub fn size(&self) -> usize {
        self.q_values.len()
    }

    /// Iterate over stored entries
    pub fn entries(&self) -> impl Iterator<Item = (&(State, Action), &f64)> {
        self.q_values.iter()
    }
}

impl Default for QTable {
    fn default() -> Self {
        Self::new(0.5, 0.3, DEFAULT_Q_INIT)
    }
}
