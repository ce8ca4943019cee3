//! Configuration types for agent and world creation.

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    q_learning::{CounterMode, DEFAULT_Q_INIT},
};

/// Configuration for creating a learning agent.
///
/// # Examples
///
/// ```
/// use smartcab::app::AgentConfig;
///
/// let config = AgentConfig::default()
///     .with_learning_rate(0.5)
///     .with_discount_factor(0.3)
///     .with_seed(7);
/// assert_eq!(config.q_init, 3.0);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Learning rate α
    pub learning_rate: f64,
    /// Discount factor γ
    pub discount_factor: f64,
    /// Value read for unseen state-action pairs
    pub q_init: f64,
    /// Random seed for tie-breaking (None = non-deterministic)
    pub seed: Option<u64>,
    /// Counter behaviour at trial boundaries
    pub counter_mode: CounterMode,
}

impl AgentConfig {
    /// Set the learning rate.
    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    /// Set the discount factor.
    pub fn with_discount_factor(mut self, discount_factor: f64) -> Self {
        self.discount_factor = discount_factor;
        self
    }

    /// Set the initial Q-value.
    pub fn with_q_init(mut self, q_init: f64) -> Self {
        self.q_init = q_init;
        self
    }

    /// Set the random seed for deterministic behavior.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_counter_mode(mut self, counter_mode: CounterMode) -> Self {
        self.counter_mode = counter_mode;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.learning_rate) {
            return Err(Error::InvalidConfiguration {
                message: format!("learning rate {} must be in [0, 1]", self.learning_rate),
            });
        }
        if !(0.0..=1.0).contains(&self.discount_factor) {
            return Err(Error::InvalidConfiguration {
                message: format!(
                    "discount factor {} must be in [0, 1]",
                    self.discount_factor
                ),
            });
        }
        if !self.q_init.is_finite() {
            return Err(Error::InvalidConfiguration {
                message: format!("initial Q-value {} must be finite", self.q_init),
            });
        }
        Ok(())
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.5,
            discount_factor: 0.3,
            q_init: DEFAULT_Q_INIT,
            seed: None,
            counter_mode: CounterMode::default(),
        }
    }
}

/// Configuration for the reference grid world.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldConfig {
    /// Intersections west to east
    pub columns: i32,
    /// Intersections north to south
    pub rows: i32,
    /// Wandering vehicles besides the agent
    pub dummies: usize,
    /// End a trial as soon as its deadline runs out
    pub enforce_deadline: bool,
    /// Deadline at which a trial always ends
    pub hard_time_limit: i32,
    /// Deadline = multiplier x distance to destination
    pub deadline_multiplier: i32,
    /// Smallest start-to-destination distance
    pub min_distance: i32,
    /// Shortest traffic light period, in ticks
    pub min_light_period: u32,
    /// Longest traffic light period, in ticks
    pub max_light_period: u32,
    /// Random seed for the world (None = non-deterministic)
    pub seed: Option<u64>,
}

impl WorldConfig {
    pub fn with_grid(mut self, columns: i32, rows: i32) -> Self {
        self.columns = columns;
        self.rows = rows;
        self
    }

    pub fn with_dummies(mut self, dummies: usize) -> Self {
        self.dummies = dummies;
        self
    }

    pub fn with_enforce_deadline(mut self, enforce_deadline: bool) -> Self {
        self.enforce_deadline = enforce_deadline;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.columns < 1 || self.rows < 1 {
            return Err(Error::InvalidConfiguration {
                message: format!("grid {}x{} must be non-empty", self.columns, self.rows),
            });
        }
        // Farthest two intersections can be on the grid
        if self.columns - 1 + self.rows - 1 < self.min_distance {
            return Err(Error::InvalidConfiguration {
                message: format!(
                    "grid {}x{} cannot fit a trip of at least {} blocks",
                    self.columns, self.rows, self.min_distance
                ),
            });
        }
        if self.deadline_multiplier < 1 {
            return Err(Error::InvalidConfiguration {
                message: "deadline multiplier must be at least 1".to_string(),
            });
        }
        if self.hard_time_limit > 0 {
            return Err(Error::InvalidConfiguration {
                message: format!(
                    "hard time limit {} must not be positive",
                    self.hard_time_limit
                ),
            });
        }
        if self.min_light_period == 0 || self.min_light_period > self.max_light_period {
            return Err(Error::InvalidConfiguration {
                message: format!(
                    "light period range {}..={} is empty or starts at zero",
                    self.min_light_period, self.max_light_period
                ),
            });
        }
        Ok(())
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            columns: 8,
            rows: 6,
            dummies: 3,
            enforce_deadline: true,
            hard_time_limit: -100,
            deadline_multiplier: 5,
            min_distance: 4,
            min_light_period: 3,
            max_light_period: 5,
            seed: None,
        }
    }
}
