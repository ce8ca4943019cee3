//! Per-trial penalty and deadline-overrun bookkeeping

use serde::{Deserialize, Serialize};

/// How the penalty and overrun counters behave at a trial boundary.
///
/// `Cumulative` never resets the counters, so each history entry is the
/// running total over every trial so far. `PerTrial` resets both counters
/// after the snapshot, so each entry counts that trial alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CounterMode {
    #[default]
    Cumulative,
    PerTrial,
}

/// How a trial ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrialOutcome {
    /// Reached the destination
    Completed,
    /// Ran out of time before arriving
    TimedOut,
}

/// What happened during one finished trial
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialSummary {
    /// Trial index (0-based)
    pub trial: usize,
    pub outcome: TrialOutcome,
    /// Decision steps taken
    pub steps: usize,
    /// Sum of rewards received
    pub net_reward: f64,
    /// Penalty history entry appended for this trial
    pub penalties: u32,
    /// Deadline-overrun history entry appended for this trial
    pub deadline_overruns: u32,
}

/// Lifetime counters plus their per-trial snapshots
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrialStatistics {
    penalty: u32,
    time_over: u32,
    penalties: Vec<u32>,
    deadlines: Vec<u32>,
    outcomes: Vec<TrialOutcome>,
    mode: CounterMode,
}

impl TrialStatistics {
    pub fn new(mode: CounterMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn record_penalty(&mut self) {
        self.penalty += 1;
    }

    pub fn record_time_over(&mut self) {
        self.time_over += 1;
    }

    /// Append the current counters to both histories
    pub fn close_trial(&mut self, outcome: TrialOutcome) {
        self.penalties.push(self.penalty);
        self.deadlines.push(self.time_over);
        self.outcomes.push(outcome);
        if self.mode == CounterMode::PerTrial {
            self.penalty = 0;
            self.time_over = 0;
        }
    }

    pub fn penalty(&self) -> u32 {
        self.penalty
    }

    pub fn time_over(&self) -> u32 {
        self.time_over
    }

    /// Penalty counter snapshot per completed trial
    pub fn penalties(&self) -> &[u32] {
        &self.penalties
    }

    /// Deadline-overrun counter snapshot per completed trial
    pub fn deadlines(&self) -> &[u32] {
        &self.deadlines
    }

    pub fn outcomes(&self) -> &[TrialOutcome] {
        &self.outcomes
    }

    pub fn completed_trials(&self) -> usize {
        self.penalties.len()
    }

    pub fn mode(&self) -> CounterMode {
        self.mode
    }
}
