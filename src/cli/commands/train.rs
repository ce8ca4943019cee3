//! Train command - run the learning agent through a series of trips

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use crate::{
    adapters::{GridWorld, RoutePlanner},
    app::{AgentConfig, WorldConfig},
    cli::{config::CommonConfig, output},
    pipeline::{
        JsonlObserver, ProgressObserver, SharedMetricsObserver, TrainingConfig, TrainingPipeline,
    },
    q_learning::{CounterMode, LearningAgent},
};

/// Counter behaviour at trial boundaries
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CounterArg {
    /// Histories hold running totals over all trials
    Cumulative,
    /// Counters reset after every trial
    PerTrial,
}

impl From<CounterArg> for CounterMode {
    fn from(arg: CounterArg) -> Self {
        match arg {
            CounterArg::Cumulative => CounterMode::Cumulative,
            CounterArg::PerTrial => CounterMode::PerTrial,
        }
    }
}

#[derive(Parser, Debug)]
#[command(about = "Train the driving agent", allow_negative_numbers = true)]
pub struct TrainArgs {
    /// Number of trials (trips) to run
    #[arg(long, short = 'n', default_value_t = 100)]
    pub trials: usize,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Learning rate α
    #[arg(long, default_value_t = 0.5)]
    pub learning_rate: f64,

    /// Discount factor γ
    #[arg(long, default_value_t = 0.3)]
    pub discount_factor: f64,

    /// Value assumed for unseen state-action pairs
    #[arg(long, default_value_t = 3.0)]
    pub q_init: f64,

    /// Penalty / overrun counter behaviour at trial boundaries
    #[arg(long, value_enum, default_value_t = CounterArg::Cumulative)]
    pub counters: CounterArg,

    /// Grid width in intersections
    #[arg(long, default_value_t = 8)]
    pub columns: i32,

    /// Grid height in intersections
    #[arg(long, default_value_t = 6)]
    pub rows: i32,

    /// Number of wandering vehicles
    #[arg(long, default_value_t = 3)]
    pub dummies: usize,

    /// Keep driving past the deadline until the hard time limit
    #[arg(long, default_value_t = false)]
    pub no_enforce_deadline: bool,

    /// Optional path for writing a summary JSON file
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Optional path for a per-trial history CSV
    #[arg(long)]
    pub history_csv: Option<PathBuf>,

    /// Optional file for JSONL step observations
    #[arg(long)]
    pub observations: Option<PathBuf>,

    /// Hide the progress bar
    #[arg(long, default_value_t = false)]
    pub no_progress: bool,
}

impl TrainArgs {
    fn agent_config(&self) -> AgentConfig {
        let config = AgentConfig::default()
            .with_learning_rate(self.learning_rate)
            .with_discount_factor(self.discount_factor)
            .with_q_init(self.q_init)
            .with_counter_mode(self.counters.into());
        match self.seed {
            Some(seed) => config.with_seed(seed),
            None => config,
        }
    }

    fn world_config(&self) -> WorldConfig {
        let config = WorldConfig::default()
            .with_grid(self.columns, self.rows)
            .with_dummies(self.dummies)
            .with_enforce_deadline(!self.no_enforce_deadline);
        match self.seed {
            Some(seed) => config.with_seed(seed.wrapping_add(1)),
            None => config,
        }
    }

    pub fn common(&self, verbose: bool) -> CommonConfig {
        CommonConfig {
            seed: self.seed,
            progress: !self.no_progress,
            verbose,
        }
    }
}

pub fn execute(args: TrainArgs, common: &CommonConfig) -> Result<()> {
    let mut world = GridWorld::new(args.world_config()).context("Failed to build grid world")?;
    let mut agent = LearningAgent::new(RoutePlanner::new(), &args.agent_config())
        .context("Invalid agent configuration")?;

    let metrics = SharedMetricsObserver::new(10);
    let mut pipeline = TrainingPipeline::new(TrainingConfig {
        num_trials: args.trials,
        seed: common.seed,
    })
    .with_observer(Box::new(metrics.clone()));

    if common.progress {
        pipeline = pipeline.with_observer(Box::new(ProgressObserver::new()));
    }
    if let Some(path) = &args.observations {
        let observer = JsonlObserver::new(path).with_context(|| {
            format!("Failed to create observations file: {}", path.display())
        })?;
        pipeline = pipeline.with_observer(Box::new(observer));
    }

    let result = pipeline.run(&mut agent, &mut world)?;

    output::print_training_report(&result, &metrics.summary());

    if let Some(path) = &args.summary {
        result
            .save(path)
            .with_context(|| format!("Failed to write summary: {}", path.display()))?;
        println!("\nSummary written to {}", path.display());
    }
    if let Some(path) = &args.history_csv {
        result
            .save_history_csv(path)
            .with_context(|| format!("Failed to write history CSV: {}", path.display()))?;
        println!("History written to {}", path.display());
    }

    Ok(())
}
