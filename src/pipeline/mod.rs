//! Training pipeline abstractions
//!
//! This module provides:
//! - The trial runner that drives an agent through repeated trips
//! - Observers recording progress, metrics and step traces during training

pub mod observers;
pub mod training;

// Re-export observer implementations (adapters)
pub use observers::{
    JsonlObserver, MetricsObserver, MetricsSummary, Observation, ProgressObserver,
    SharedMetricsObserver,
};
pub use training::{TrainingConfig, TrainingPipeline, TrainingResult};

pub use crate::ports::TrialObserver;
