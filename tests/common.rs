//! Common test utilities for the smartcab test suite.
//!
//! Provides a scripted environment, a fixed planner and a goodness-of-fit
//! helper shared across integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;

use smartcab::{
    ports::{Environment, Planner, Simulation},
    q_learning::TrialOutcome,
    types::{Action, Heading, LightPhase, Location, Percepts, Pose, Waypoint},
};

/// Planner that always suggests the same waypoint.
pub struct FixedPlanner {
    pub waypoint: Waypoint,
    pub destinations: Vec<Location>,
}

impl FixedPlanner {
    pub fn new(waypoint: Waypoint) -> Self {
        Self {
            waypoint,
            destinations: Vec::new(),
        }
    }
}

impl Planner for FixedPlanner {
    fn route_to(&mut self, destination: Location) {
        self.destinations.push(destination);
    }

    fn next_waypoint(&self, _pose: Pose) -> Waypoint {
        self.waypoint
    }
}

/// Environment replaying scripted rewards; sensing always returns `percepts`.
///
/// When the script runs dry every action earns `default_reward`. Each trial
/// lasts `trial_length` ticks and is reported with `outcome`.
pub struct ScriptedEnvironment {
    pub percepts: Percepts,
    pub rewards: VecDeque<f64>,
    pub default_reward: f64,
    pub deadline: i32,
    pub trial_length: usize,
    pub outcome: TrialOutcome,
    pub actions: Vec<Action>,
    ticks: usize,
    resets: usize,
}

impl ScriptedEnvironment {
    pub fn new(default_reward: f64) -> Self {
        Self {
            percepts: Percepts::clear(LightPhase::Green),
            rewards: VecDeque::new(),
            default_reward,
            deadline: 10,
            trial_length: 5,
            outcome: TrialOutcome::Completed,
            actions: Vec::new(),
            ticks: 0,
            resets: 0,
        }
    }

    pub fn with_rewards(mut self, rewards: &[f64]) -> Self {
        self.rewards = rewards.iter().copied().collect();
        self
    }

    pub fn resets(&self) -> usize {
        self.resets
    }
}

impl Environment for ScriptedEnvironment {
    fn sense(&self) -> Percepts {
        self.percepts
    }

    fn deadline(&self) -> i32 {
        self.deadline
    }

    fn act(&mut self, action: Action) -> f64 {
        self.actions.push(action);
        self.rewards.pop_front().unwrap_or(self.default_reward)
    }

    fn pose(&self) -> Pose {
        Pose {
            location: Location::new(1, 1),
            heading: Heading::NORTH,
        }
    }
}

impl Simulation for ScriptedEnvironment {
    fn reset(&mut self) -> Location {
        self.ticks = 0;
        self.resets += 1;
        Location::new(self.resets as i32, 1)
    }

    fn advance(&mut self) {}

    fn settle(&mut self) -> Option<TrialOutcome> {
        self.ticks += 1;
        (self.ticks >= self.trial_length).then_some(self.outcome)
    }
}

/// Pearson chi-square statistic of `counts` against a uniform expectation.
pub fn chi_square_uniform(counts: &[usize]) -> f64 {
    let total: usize = counts.iter().sum();
    let expected = total as f64 / counts.len() as f64;
    counts
        .iter()
        .map(|&observed| {
            let diff = observed as f64 - expected;
            diff * diff / expected
        })
        .sum()
}
