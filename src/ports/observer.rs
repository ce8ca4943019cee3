//! Observer port - abstraction for watching a training run
//!
//! Observers collect data during training without coupling the trial loop
//! to specific output formats or metrics.

use crate::{
    Result,
    q_learning::{StepRecord, TrialSummary},
};

/// Observer trait for monitoring training
///
/// # Event Sequence
///
/// 1. `on_training_start(total_trials)` - Once at the beginning
/// 2. For each trial:
///    - `on_trial_start(trial, deadline)`
///    - `on_step(trial, record)` - For each decision step
///    - `on_trial_end(summary)`
/// 3. `on_training_end()` - Once at the end
///
/// # Examples
///
/// ```no_run
/// use smartcab::{ports::TrialObserver, q_learning::TrialSummary};
///
/// struct StepCounter {
///     steps: usize,
/// }
///
/// impl TrialObserver for StepCounter {
///     fn on_trial_end(&mut self, summary: &TrialSummary) -> smartcab::Result<()> {
///         self.steps += summary.steps;
///         Ok(())
///     }
/// }
/// ```
pub trait TrialObserver: Send {
    /// Called when training starts.
    fn on_training_start(&mut self, _total_trials: usize) -> Result<()> {
        Ok(())
    }

    /// Called when a trial starts, with the deadline it was given.
    fn on_trial_start(&mut self, _trial: usize, _deadline: i32) -> Result<()> {
        Ok(())
    }

    /// Called after every decision step of the tracked agent.
    ///
    /// # Parameters
    ///
    /// * `trial` - Index of the current trial
    /// * `record` - Diagnostic record of the step, including the updated Q-value
    fn on_step(&mut self, _trial: usize, _record: &StepRecord) -> Result<()> {
        Ok(())
    }

    /// Called at the trial boundary, after the histories were appended.
    fn on_trial_end(&mut self, _summary: &TrialSummary) -> Result<()> {
        Ok(())
    }

    /// Called when training completes.
    ///
    /// Use this to finalize outputs or display summaries.
    fn on_training_end(&mut self) -> Result<()> {
        Ok(())
    }
}
