//! Greedy action selection with randomized tie-breaking

use rand::{SeedableRng, rngs::StdRng, seq::IndexedRandom};

use crate::{
    q_learning::{encoder::State, q_table::QTable},
    types::Action,
};

fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

/// Picks the highest-valued action for a state.
///
/// When several actions share the maximum, one of them is drawn uniformly
/// at random. Unvisited states tie on every action, which is where the
/// optimistic table default turns into exploration.
#[derive(Debug, Clone)]
pub struct ActionSelector {
    rng: StdRng,
}

impl ActionSelector {
    pub fn new(seed: Option<u64>) -> Self {
        Self {
            rng: build_rng(seed),
        }
    }

    pub fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    /// Returns the maximum value in `state` and the chosen action
    pub fn choose(&mut self, table: &QTable, state: &State) -> (f64, Action) {
        let (max, values) = table.best_value(state);
        let tied: Vec<usize> = values
            .iter()
            .enumerate()
            .filter(|&(_, &value)| value == max)
            .map(|(index, _)| index)
            .collect();

        let index = match tied.as_slice() {
            [only] => *only,
            // best_value covers the full enumeration, so `tied` is never empty
            candidates => *candidates.choose(&mut self.rng).unwrap_or(&0),
        };

        (max, Action::ALL[index])
    }
}

impl Default for ActionSelector {
    fn default() -> Self {
        Self::new(None)
    }
}
