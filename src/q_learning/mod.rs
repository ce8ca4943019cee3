//! Tabular Q-learning for the driving agent
//!
//! The agent learns one Q-value per (state, action) pair through the
//! off-policy temporal difference update
//!
//! ```text
//! Q(s,a) ← Q(s,a) + α[r + γ max_a' Q(s',a') - Q(s,a)]
//! ```
//!
//! with α = 0.5 and γ = 0.3 by default. Unseen pairs read as an optimistic
//! 3.0, and ties between maximal actions are broken uniformly at random, so
//! the agent explores without an explicit ε schedule.
//!
//! ## Usage Example
//!
//! ```no_run
//! use smartcab::{
//!     adapters::RoutePlanner,
//!     app::AgentConfig,
//!     q_learning::LearningAgent,
//! };
//!
//! # fn main() -> smartcab::Result<()> {
//! let agent = LearningAgent::new(
//!     RoutePlanner::new(),
//!     &AgentConfig::default().with_seed(42),
//! )?;
//! assert_eq!(agent.q_table().size(), 0);
//! # Ok(())
//! # }
//! ```

pub mod agent;
pub mod encoder;
pub mod q_table;
pub mod selector;
pub mod stats;

// Public re-exports
pub use agent::{LearningAgent, StepRecord, TrialPhase};
pub use encoder::{State, StateEncoder};
pub use q_table::{DEFAULT_Q_INIT, QTable};
pub use selector::ActionSelector;
pub use stats::{CounterMode, TrialOutcome, TrialStatistics, TrialSummary};
