//! Observer implementations for training runs
//!
//! Observers allow composable data collection during training without coupling
//! the trial loop to specific output formats.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
    sync::{Arc, Mutex},
};

use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};

use crate::{
    Result,
    ports::TrialObserver,
    q_learning::{StepRecord, TrialOutcome, TrialSummary},
};

/// Progress bar observer - Shows training progress
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
    successes: usize,
    timeouts: usize,
}

impl ProgressObserver {
    /// Create a new progress observer
    pub fn new() -> Self {
        Self {
            progress_bar: None,
            successes: 0,
            timeouts: 0,
        }
    }

    fn message(&self) -> String {
        format!("ok:{} late:{}", self.successes, self.timeouts)
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl TrialObserver for ProgressObserver {
    fn on_training_start(&mut self, total_trials: usize) -> Result<()> {
        let pb = ProgressBar::new(total_trials as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} trials ({msg})")
                .map_err(|e| crate::Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        self.progress_bar = Some(pb);
        Ok(())
    }

    fn on_trial_end(&mut self, summary: &TrialSummary) -> Result<()> {
        match summary.outcome {
            TrialOutcome::Completed => self.successes += 1,
            TrialOutcome::TimedOut => self.timeouts += 1,
        }

        if let Some(pb) = &self.progress_bar {
            pb.set_position(summary.trial as u64 + 1);
            pb.set_message(self.message());
        }
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message(self.message());
        }
        Ok(())
    }
}

/// Summary of training metrics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub total_trials: usize,
    pub successes: usize,
    pub success_rate: f64,
    /// Mean number of decision steps per trial
    pub avg_steps: f64,
    /// Mean summed reward per trial
    pub avg_net_reward: f64,
    /// Fraction of steps that earned a negative reward
    pub penalty_rate: f64,
    /// Success rate over the last `window` trials
    pub recent_success_rate: f64,
}

/// Metrics observer - Tracks per-trial learning metrics
pub struct MetricsObserver {
    window: usize,
    outcomes: Vec<TrialOutcome>,
    steps: Vec<usize>,
    rewards: Vec<f64>,
    negative_steps: usize,
    total_steps: usize,
}

impl MetricsObserver {
    /// Create a new metrics observer; the recent success rate covers the
    /// last `window` trials.
    pub fn new(window: usize) -> Self {
        Self {
            window: window.max(1),
            outcomes: Vec::new(),
            steps: Vec::new(),
            rewards: Vec::new(),
            negative_steps: 0,
            total_steps: 0,
        }
    }

    fn rate(outcomes: &[TrialOutcome]) -> f64 {
        if outcomes.is_empty() {
            0.0
        } else {
            let successes = outcomes
                .iter()
                .filter(|&&o| o == TrialOutcome::Completed)
                .count();
            successes as f64 / outcomes.len() as f64
        }
    }

    fn mean<T: Copy + Into<f64>>(values: &[T]) -> f64 {
        if values.is_empty() {
            0.0
        } else {
            values.iter().map(|&v| v.into()).sum::<f64>() / values.len() as f64
        }
    }

    /// Get metrics summary
    pub fn summary(&self) -> MetricsSummary {
        let recent_start = self.outcomes.len().saturating_sub(self.window);
        let steps: Vec<f64> = self.steps.iter().map(|&s| s as f64).collect();
        MetricsSummary {
            total_trials: self.outcomes.len(),
            successes: self
                .outcomes
                .iter()
                .filter(|&&o| o == TrialOutcome::Completed)
                .count(),
            success_rate: Self::rate(&self.outcomes),
            avg_steps: Self::mean(&steps),
            avg_net_reward: Self::mean(&self.rewards),
            penalty_rate: if self.total_steps == 0 {
                0.0
            } else {
                self.negative_steps as f64 / self.total_steps as f64
            },
            recent_success_rate: Self::rate(&self.outcomes[recent_start..]),
        }
    }
}

impl Default for MetricsObserver {
    fn default() -> Self {
        Self::new(10)
    }
}

impl TrialObserver for MetricsObserver {
    fn on_step(&mut self, _trial: usize, record: &StepRecord) -> Result<()> {
        self.total_steps += 1;
        if record.reward < 0.0 {
            self.negative_steps += 1;
        }
        Ok(())
    }

    fn on_trial_end(&mut self, summary: &TrialSummary) -> Result<()> {
        self.outcomes.push(summary.outcome);
        self.steps.push(summary.steps);
        self.rewards.push(summary.net_reward);
        Ok(())
    }
}

/// Shared handle so a metrics observer can be read after the pipeline
/// consumed its boxed copy.
#[derive(Clone, Default)]
pub struct SharedMetricsObserver {
    inner: Arc<Mutex<MetricsObserver>>,
}

impl SharedMetricsObserver {
    pub fn new(window: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(MetricsObserver::new(window))),
        }
    }

    pub fn summary(&self) -> MetricsSummary {
        match self.inner.lock() {
            Ok(metrics) => metrics.summary(),
            Err(poisoned) => poisoned.into_inner().summary(),
        }
    }
}

impl TrialObserver for SharedMetricsObserver {
    fn on_step(&mut self, trial: usize, record: &StepRecord) -> Result<()> {
        match self.inner.lock() {
            Ok(mut metrics) => metrics.on_step(trial, record),
            Err(poisoned) => poisoned.into_inner().on_step(trial, record),
        }
    }

    fn on_trial_end(&mut self, summary: &TrialSummary) -> Result<()> {
        match self.inner.lock() {
            Ok(mut metrics) => metrics.on_trial_end(summary),
            Err(poisoned) => poisoned.into_inner().on_trial_end(summary),
        }
    }
}

/// Complete observation of one trial
#[derive(Debug, Clone, Serialize)]
pub struct Observation {
    pub trial: usize,
    pub outcome: TrialOutcome,
    pub deadline: i32,
    pub net_reward: f64,
    pub steps: Vec<StepRecord>,
}

/// JSONL observer - Exports every trial's step records as JSON Lines
pub struct JsonlObserver {
    writer: BufWriter<File>,
    current_steps: Vec<StepRecord>,
    current_deadline: i32,
}

impl JsonlObserver {
    /// Create a new JSONL observer
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        Ok(Self {
            writer,
            current_steps: Vec::new(),
            current_deadline: 0,
        })
    }
}

impl TrialObserver for JsonlObserver {
    fn on_trial_start(&mut self, _trial: usize, deadline: i32) -> Result<()> {
        self.current_steps.clear();
        self.current_deadline = deadline;
        Ok(())
    }

    fn on_step(&mut self, _trial: usize, record: &StepRecord) -> Result<()> {
        self.current_steps.push(record.clone());
        Ok(())
    }

    fn on_trial_end(&mut self, summary: &TrialSummary) -> Result<()> {
        let observation = Observation {
            trial: summary.trial,
            outcome: summary.outcome,
            deadline: self.current_deadline,
            net_reward: summary.net_reward,
            steps: std::mem::take(&mut self.current_steps),
        };

        // One JSON object per line
        serde_json::to_writer(&mut self.writer, &observation)?;
        writeln!(&mut self.writer)?;
        self.writer.flush()?;

        Ok(())
    }
}
