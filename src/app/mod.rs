//! Application layer: configuration for agents, worlds and training runs.
//!
//! # Usage
//!
//! ```
//! use smartcab::app::{AgentConfig, WorldConfig};
//! use smartcab::q_learning::CounterMode;
//!
//! let agent = AgentConfig::default()
//!     .with_seed(42)
//!     .with_counter_mode(CounterMode::PerTrial);
//! agent.validate()?;
//!
//! let world = WorldConfig::default().with_dummies(5);
//! world.validate()?;
//! # Ok::<(), smartcab::Error>(())
//! ```

pub mod config;

pub use config::{AgentConfig, WorldConfig};
