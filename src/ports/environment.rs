//! Environment port - the sensing/acting boundary of the tracked agent

use crate::{
    q_learning::TrialOutcome,
    types::{Action, Location, Percepts, Pose},
};

/// The simulated world, seen from the single agent it tracks.
///
/// Implementations are trusted to always return a complete percept set and
/// to accept every action of the fixed enumeration; the learner does not
/// guard against either.
///
/// # Examples
///
/// ```no_run
/// use smartcab::{
///     ports::Environment,
///     types::{Action, Percepts},
/// };
///
/// fn idle_reward<E: Environment>(env: &mut E) -> f64 {
///     let _inputs: Percepts = env.sense();
///     env.act(Action::Idle)
/// }
/// ```
pub trait Environment {
    /// Signals perceivable at the agent's current intersection
    fn sense(&self) -> Percepts;

    /// Ticks remaining before the current trip is overdue
    fn deadline(&self) -> i32;

    /// Execute `action` for the agent and return the reward it earned
    fn act(&mut self, action: Action) -> f64;

    /// Current location and heading, for route planning
    fn pose(&self) -> Pose;
}

/// A world that can run whole trips, driven tick by tick by the trial runner.
///
/// Per tick the runner calls [`advance`](Simulation::advance), lets the agent
/// take its decision step, then calls [`settle`](Simulation::settle).
pub trait Simulation: Environment {
    /// Place the agent for a new trip and return its destination
    fn reset(&mut self) -> Location;

    /// Move everything except the agent (lights, other traffic)
    fn advance(&mut self);

    /// Finish the tick; `Some` once the trip has ended
    fn settle(&mut self) -> Option<TrialOutcome>;
}
