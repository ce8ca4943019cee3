//! Tabular Q-learning driving agent
//!
//! This crate provides:
//! - State abstraction, Q-table and tie-breaking action selection
//! - A learning agent that updates its Q-values once per simulated tick
//! - A trial runner with per-trial penalty and deadline-overrun histories
//! - A reference grid-world traffic simulation and route planner
//! - A CLI for training runs and reporting

pub mod adapters;
pub mod app;
pub mod cli;
pub mod error;
pub mod pipeline;
pub mod ports;
pub mod q_learning;
pub mod types;

pub use error::{Error, Result};
pub use q_learning::{
    ActionSelector, CounterMode, LearningAgent, QTable, State, StateEncoder, TrialOutcome,
    TrialPhase,
};
pub use types::{Action, LightPhase, Percepts};
