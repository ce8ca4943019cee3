//! Core value types shared by the learner and its environment

use std::fmt;

use serde::{Deserialize, Serialize};

/// Movement choice at an intersection.
///
/// The order of [`Action::ALL`] is the fixed action enumeration shared with
/// the environment; per-action value lists always follow it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Stay put for this tick
    Idle,
    Forward,
    Left,
    Right,
}

impl Action {
    /// Fixed action enumeration, in value-list order
    pub const ALL: [Action; 4] = [Action::Idle, Action::Forward, Action::Left, Action::Right];

    /// Directions a planner or another vehicle can intend to take
    pub const MOVES: [Action; 3] = [Action::Forward, Action::Left, Action::Right];

    /// Position of this action in [`Action::ALL`]
    pub fn index(self) -> usize {
        match self {
            Action::Idle => 0,
            Action::Forward => 1,
            Action::Left => 2,
            Action::Right => 3,
        }
    }

    pub fn is_move(self) -> bool {
        self != Action::Idle
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Action::Idle => "None",
            Action::Forward => "forward",
            Action::Left => "left",
            Action::Right => "right",
        };
        f.write_str(label)
    }
}

/// Traffic seen in one direction: the intended move of a vehicle there, if any.
pub type Traffic = Option<Action>;

/// Suggested next direction from the route planner (`None` at the destination).
pub type Waypoint = Option<Action>;

/// Traffic light phase as seen from the agent's heading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LightPhase {
    Red,
    Green,
}

impl fmt::Display for LightPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LightPhase::Red => f.write_str("red"),
            LightPhase::Green => f.write_str("green"),
        }
    }
}

/// Snapshot of the signals an agent can perceive at its intersection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Percepts {
    pub light: LightPhase,
    pub oncoming: Traffic,
    pub left: Traffic,
    pub right: Traffic,
}

impl Percepts {
    /// Percepts at an empty intersection
    pub fn clear(light: LightPhase) -> Self {
        Self {
            light,
            oncoming: None,
            left: None,
            right: None,
        }
    }
}

impl fmt::Display for Percepts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn show(traffic: Traffic) -> String {
            traffic.map_or_else(|| "None".to_string(), |action| action.to_string())
        }
        write!(
            f,
            "{{light: {}, oncoming: {}, left: {}, right: {}}}",
            self.light,
            show(self.oncoming),
            show(self.left),
            show(self.right)
        )
    }
}

/// Unit heading vector on the grid; `dy` grows southward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Heading {
    pub dx: i32,
    pub dy: i32,
}

impl Heading {
    pub const NORTH: Heading = Heading { dx: 0, dy: -1 };
    pub const SOUTH: Heading = Heading { dx: 0, dy: 1 };
    pub const EAST: Heading = Heading { dx: 1, dy: 0 };
    pub const WEST: Heading = Heading { dx: -1, dy: 0 };

    pub const ALL: [Heading; 4] = [Heading::NORTH, Heading::EAST, Heading::SOUTH, Heading::WEST];

    pub fn turn_left(self) -> Self {
        Heading {
            dx: self.dy,
            dy: -self.dx,
        }
    }

    pub fn turn_right(self) -> Self {
        Heading {
            dx: -self.dy,
            dy: self.dx,
        }
    }

    pub fn dot(self, other: Heading) -> i32 {
        self.dx * other.dx + self.dy * other.dy
    }

    /// True when travelling north or south
    pub fn is_vertical(self) -> bool {
        self.dy != 0
    }
}

/// Intersection coordinates, 1-based
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub x: i32,
    pub y: i32,
}

impl Location {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn manhattan(self, other: Location) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }
}

/// Where a vehicle is and which way it faces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pose {
    pub location: Location,
    pub heading: Heading,
}
