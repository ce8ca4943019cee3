//! Trial runner driving a learning agent through repeated trips

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    Error, Result,
    ports::{Planner, Simulation, TrialObserver},
    q_learning::{CounterMode, LearningAgent, TrialOutcome},
};

/// Training configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Number of trials (trips) to run
    pub num_trials: usize,

    /// Random seed for the agent's tie-breaking
    pub seed: Option<u64>,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            num_trials: 100,
            seed: None,
        }
    }
}

/// Result of a training run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingResult {
    /// Total trials run
    pub total_trials: usize,

    /// Trials that reached the destination
    pub successes: usize,

    /// Trials that ran out of time
    pub timeouts: usize,

    /// Fraction of trials that reached the destination
    pub success_rate: f64,

    /// Penalty counter snapshot per trial
    pub penalties: Vec<u32>,

    /// Deadline-overrun counter snapshot per trial
    pub deadlines: Vec<u32>,

    /// How each trial ended
    pub outcomes: Vec<TrialOutcome>,

    /// Whether the snapshots are running totals or per-trial counts
    pub counter_mode: CounterMode,

    /// Number of learned Q-values
    pub q_table_size: usize,
}

#[derive(Debug, Serialize, Deserialize)]
struct HistoryRow {
    trial: usize,
    penalties: u32,
    deadline_overruns: u32,
    outcome: TrialOutcome,
}

impl TrainingResult {
    /// Build a result from the agent's trial histories
    pub fn from_agent<P: Planner>(agent: &LearningAgent<P>) -> Self {
        let stats = agent.stats();
        let total_trials = stats.completed_trials();
        let successes = stats
            .outcomes()
            .iter()
            .filter(|&&outcome| outcome == TrialOutcome::Completed)
            .count();
        let success_rate = if total_trials > 0 {
            successes as f64 / total_trials as f64
        } else {
            0.0
        };

        Self {
            total_trials,
            successes,
            timeouts: total_trials - successes,
            success_rate,
            penalties: stats.penalties().to_vec(),
            deadlines: stats.deadlines().to_vec(),
            outcomes: stats.outcomes().to_vec(),
            counter_mode: stats.mode(),
            q_table_size: agent.q_table().size(),
        }
    }

    /// Save result to JSON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Load result from JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let result = serde_json::from_reader(file)?;
        Ok(result)
    }

    /// Write one CSV row per trial
    pub fn save_history_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut writer = csv::Writer::from_path(path)?;
        for (trial, ((&penalties, &deadline_overruns), &outcome)) in self
            .penalties
            .iter()
            .zip(&self.deadlines)
            .zip(&self.outcomes)
            .enumerate()
        {
            writer.serialize(HistoryRow {
                trial,
                penalties,
                deadline_overruns,
                outcome,
            })?;
        }
        writer.flush()?;
        Ok(())
    }
}

/// Runs a learning agent through a sequence of trips in a simulation.
pub struct TrainingPipeline {
    config: TrainingConfig,
    observers: Vec<Box<dyn TrialObserver>>,
}

impl TrainingPipeline {
    /// Create a new training pipeline
    pub fn new(config: TrainingConfig) -> Self {
        Self {
            config,
            observers: Vec::new(),
        }
    }

    /// Add an observer to the pipeline
    pub fn with_observer(mut self, observer: Box<dyn TrialObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Run every trial, then move the agent to its terminal phase.
    pub fn run<P, S>(
        &mut self,
        agent: &mut LearningAgent<P>,
        world: &mut S,
    ) -> Result<TrainingResult>
    where
        P: Planner,
        S: Simulation + ?Sized,
    {
        if self.config.num_trials == 0 {
            return Err(Error::InvalidConfiguration {
                message: "number of trials must be at least 1".to_string(),
            });
        }
        if let Some(seed) = self.config.seed {
            agent.set_rng_seed(seed);
        }

        for observer in &mut self.observers {
            observer.on_training_start(self.config.num_trials)?;
        }

        for trial in 0..self.config.num_trials {
            let destination = world.reset();
            agent.begin_trial(destination)?;

            for observer in &mut self.observers {
                observer.on_trial_start(trial, world.deadline())?;
            }

            let outcome = loop {
                world.advance();
                let record = agent.update(&mut *world)?;
                for observer in &mut self.observers {
                    observer.on_step(trial, &record)?;
                }
                if let Some(outcome) = world.settle() {
                    break outcome;
                }
            };

            let summary = agent.reset(outcome)?;
            info!(
                trial,
                outcome = ?summary.outcome,
                steps = summary.steps,
                penalties = summary.penalties,
                deadline_overruns = summary.deadline_overruns,
                "trial finished"
            );

            for observer in &mut self.observers {
                observer.on_trial_end(&summary)?;
            }
        }

        agent.finish()?;

        for observer in &mut self.observers {
            observer.on_training_end()?;
        }

        Ok(TrainingResult::from_agent(agent))
    }
}
