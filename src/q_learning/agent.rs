//! Q-learning driving agent
//!
//! One call to [`LearningAgent::update`] is one decision step: read the
//! waypoint and percepts, pick an action, act, then write the updated
//! Q-value back for the state the action was chosen in.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    Error, Result,
    app::AgentConfig,
    ports::{Environment, Planner},
    q_learning::{
        encoder::{State, StateEncoder},
        q_table::QTable,
        selector::ActionSelector,
        stats::{TrialOutcome, TrialStatistics, TrialSummary},
    },
    types::{Action, Location, Percepts, Waypoint},
};

/// Lifecycle of the agent across trials
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrialPhase {
    /// Pursuing a destination
    InTransit,
    /// Last trial reached its destination
    Completed,
    /// Last trial ran out of time
    TimedOut,
    /// No more trials will run
    Finished,
}

/// Diagnostic record of a single decision step
#[derive(Debug, Clone, Serialize)]
pub struct StepRecord {
    /// Deadline read before acting
    pub deadline: i32,
    /// Percepts the action was chosen from
    pub inputs: Percepts,
    pub action: Action,
    pub reward: f64,
    pub waypoint: Waypoint,
    /// Decision state the Q-value was written for
    pub state: State,
    /// Maximum value in `state` before the update
    pub old_value: f64,
    /// Value stored for `(state, action)`
    pub new_value: f64,
}

/// Tabular Q-learning agent with greedy, randomly tie-broken action choice.
///
/// The agent exclusively owns its Q-table, counters and histories.
#[derive(Debug, Clone)]
pub struct LearningAgent<P> {
    planner: P,
    q_table: QTable,
    selector: ActionSelector,
    stats: TrialStatistics,
    phase: TrialPhase,
    next_waypoint: Waypoint,
    state: Option<State>,
    trial_steps: usize,
    trial_reward: f64,
}

impl<P: Planner> LearningAgent<P> {
    /// Create an agent with an empty Q-table.
    pub fn new(planner: P, config: &AgentConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            planner,
            q_table: QTable::new(config.learning_rate, config.discount_factor, config.q_init),
            selector: ActionSelector::new(config.seed),
            stats: TrialStatistics::new(config.counter_mode),
            phase: TrialPhase::InTransit,
            next_waypoint: None,
            state: None,
            trial_steps: 0,
            trial_reward: 0.0,
        })
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.selector.reseed(seed);
        self
    }

    pub fn set_rng_seed(&mut self, seed: u64) {
        self.selector.reseed(seed);
    }

    /// Point the planner at a new destination and start pursuing it.
    pub fn begin_trial(&mut self, destination: Location) -> Result<()> {
        if self.phase == TrialPhase::Finished {
            return Err(Error::InvalidTransition {
                operation: "begin a trial",
                phase: self.phase,
            });
        }
        self.planner.route_to(destination);
        self.phase = TrialPhase::InTransit;
        self.trial_steps = 0;
        self.trial_reward = 0.0;
        Ok(())
    }

    /// Run one decision step against `env`.
    pub fn update<E: Environment + ?Sized>(&mut self, env: &mut E) -> Result<StepRecord> {
        if self.phase != TrialPhase::InTransit {
            return Err(Error::InvalidTransition {
                operation: "take a decision step",
                phase: self.phase,
            });
        }

        // Gather inputs
        self.next_waypoint = self.planner.next_waypoint(env.pose());
        let inputs = env.sense();
        let deadline = env.deadline();

        let state = StateEncoder::decision(self.next_waypoint, &inputs);
        self.state = Some(state);

        let (old_value, action) = self.selector.choose(&self.q_table, &state);

        let reward = env.act(action);
        if reward < 0.0 {
            self.stats.record_penalty();
        }
        // Checked against the deadline read before acting
        if deadline < 1 {
            self.stats.record_time_over();
        }

        let new_inputs = env.sense();
        let outcome_state = StateEncoder::outcome(self.next_waypoint, &new_inputs);
        let new_value =
            self.q_table
                .q_learning_update(state, action, old_value, reward, &outcome_state);

        self.trial_steps += 1;
        self.trial_reward += reward;

        debug!(
            deadline,
            inputs = %inputs,
            action = %action,
            reward,
            waypoint = ?self.next_waypoint,
            "LearningAgent.update()"
        );

        Ok(StepRecord {
            deadline,
            inputs,
            action,
            reward,
            waypoint: self.next_waypoint,
            state,
            old_value,
            new_value,
        })
    }

    /// Trial boundary: snapshot both counters into the histories.
    pub fn reset(&mut self, outcome: TrialOutcome) -> Result<TrialSummary> {
        if self.phase != TrialPhase::InTransit {
            return Err(Error::InvalidTransition {
                operation: "close a trial",
                phase: self.phase,
            });
        }

        let trial = self.stats.completed_trials();
        self.stats.close_trial(outcome);
        self.phase = match outcome {
            TrialOutcome::Completed => TrialPhase::Completed,
            TrialOutcome::TimedOut => TrialPhase::TimedOut,
        };

        Ok(TrialSummary {
            trial,
            outcome,
            steps: self.trial_steps,
            net_reward: self.trial_reward,
            penalties: self.stats.penalties()[trial],
            deadline_overruns: self.stats.deadlines()[trial],
        })
    }

    /// Enter the terminal phase; no further trials or steps are accepted.
    pub fn finish(&mut self) -> Result<()> {
        if self.phase == TrialPhase::Finished {
            return Err(Error::InvalidTransition {
                operation: "finish",
                phase: self.phase,
            });
        }
        self.phase = TrialPhase::Finished;
        Ok(())
    }

    pub fn phase(&self) -> TrialPhase {
        self.phase
    }

    /// Waypoint chosen in the latest step, for display
    pub fn next_waypoint(&self) -> Waypoint {
        self.next_waypoint
    }

    /// Decision state of the latest step
    pub fn state(&self) -> Option<State> {
        self.state
    }

    pub fn q_table(&self) -> &QTable {
        &self.q_table
    }

    pub fn stats(&self) -> &TrialStatistics {
        &self.stats
    }

    pub fn planner(&self) -> &P {
        &self.planner
    }

    /// Lifetime penalty counter
    pub fn penalty(&self) -> u32 {
        self.stats.penalty()
    }

    /// Lifetime deadline-overrun counter
    pub fn time_over(&self) -> u32 {
        self.stats.time_over()
    }
}
