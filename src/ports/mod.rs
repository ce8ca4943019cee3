//! Ports (trait boundaries) for external collaborators.
//!
//! The learner only talks to the simulated world through these traits. The
//! world, its route planner and anything watching a training run live behind
//! them as adapters.

pub mod environment;
pub mod observer;
pub mod planner;

pub use environment::{Environment, Simulation};
pub use observer::TrialObserver;
pub use planner::Planner;
