//! State abstraction over raw percepts
//!
//! Each decision step encodes two different keys from the same waypoint:
//!
//! - the *decision* state `(waypoint, light, left, right)` selects the action
//!   and keys the Q-value write-back;
//! - the *outcome* state `(waypoint, light, oncoming, left, right)` is only
//!   used to look up the best value reachable after acting.
//!
//! The two forms never compare equal, so outcome lookups only ever see
//! entries keyed by outcome states. With the learner as the sole writer and
//! it writing decision states only, the bootstrap term reads the table
//! default. This asymmetry is kept as observed behaviour; whether the
//! omitted oncoming feature is intentional is undecided.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{LightPhase, Percepts, Traffic, Waypoint};

/// Discrete, immutable state key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "form", rename_all = "snake_case")]
pub enum State {
    Decision {
        waypoint: Waypoint,
        light: LightPhase,
        left: Traffic,
        right: Traffic,
    },
    Outcome {
        waypoint: Waypoint,
        light: LightPhase,
        oncoming: Traffic,
        left: Traffic,
        right: Traffic,
    },
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn show<T: fmt::Display>(value: Option<T>) -> String {
            value.map_or_else(|| "None".to_string(), |v| v.to_string())
        }
        match self {
            State::Decision {
                waypoint,
                light,
                left,
                right,
            } => write!(
                f,
                "({}, {}, {}, {})",
                show(*waypoint),
                light,
                show(*left),
                show(*right)
            ),
            State::Outcome {
                waypoint,
                light,
                oncoming,
                left,
                right,
            } => write!(
                f,
                "({}, {}, {}, {}, {})",
                show(*waypoint),
                light,
                show(*oncoming),
                show(*left),
                show(*right)
            ),
        }
    }
}

/// Maps the planner's waypoint and a percept snapshot onto state keys
#[derive(Debug, Clone, Copy, Default)]
pub struct StateEncoder;

impl StateEncoder {
    /// Key used for action selection and for the Q-value write-back
    pub fn decision(waypoint: Waypoint, percepts: &Percepts) -> State {
        State::Decision {
            waypoint,
            light: percepts.light,
            left: percepts.left,
            right: percepts.right,
        }
    }

    /// Key used to evaluate the best value after the action was taken
    pub fn outcome(waypoint: Waypoint, percepts: &Percepts) -> State {
        State::Outcome {
            waypoint,
            light: percepts.light,
            oncoming: percepts.oncoming,
            left: percepts.left,
            right: percepts.right,
        }
    }
}
