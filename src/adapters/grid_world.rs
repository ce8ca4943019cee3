//! Reference grid-world traffic simulation
//!
//! A wrap-around grid of intersections, each with a two-phase traffic light,
//! a handful of wandering vehicles, and one tracked agent driving to a
//! destination under a deadline. It implements the [`Environment`] and
//! [`Simulation`] ports so the learner can be trained end-to-end.

use rand::{Rng, SeedableRng, rngs::StdRng};
use tracing::trace;

use crate::{
    Result,
    adapters::route_planner::waypoint_towards,
    app::WorldConfig,
    ports::{Environment, Simulation},
    q_learning::TrialOutcome,
    types::{Action, Heading, LightPhase, Location, Percepts, Pose, Traffic},
};

/// Reward for an illegal move; the agent stays where it is
pub const REWARD_VIOLATION: f64 = -1.0;
/// Reward for waiting legally
pub const REWARD_IDLE: f64 = 0.0;
/// Reward for a legal move along the planner's waypoint
pub const REWARD_ON_ROUTE: f64 = 2.0;
/// Reward for a legal move off the planner's waypoint
pub const REWARD_OFF_ROUTE: f64 = -0.5;
/// Bonus for arriving before the deadline runs out
pub const REWARD_ARRIVAL: f64 = 10.0;

const PRIMARY: usize = 0;

#[derive(Debug, Clone)]
struct TrafficLight {
    /// North-south traffic has green when set
    north_south: bool,
    period: u32,
    last_flip: u64,
}

impl TrafficLight {
    fn update(&mut self, t: u64) {
        if t - self.last_flip >= u64::from(self.period) {
            self.north_south = !self.north_south;
            self.last_flip = t;
        }
    }

    fn phase_for(&self, heading: Heading) -> LightPhase {
        if self.north_south == heading.is_vertical() {
            LightPhase::Green
        } else {
            LightPhase::Red
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Vehicle {
    pose: Pose,
    /// Move the vehicle wants to make next (dummies only)
    intent: Traffic,
}

/// Grid-world environment tracking a single learning agent.
#[derive(Debug, Clone)]
pub struct GridWorld {
    config: WorldConfig,
    rng: StdRng,
    lights: Vec<TrafficLight>,
    /// Index 0 is the tracked agent, the rest are dummies
    vehicles: Vec<Vehicle>,
    destination: Location,
    deadline: i32,
    t: u64,
    done: Option<TrialOutcome>,
}

impl GridWorld {
    pub fn new(config: WorldConfig) -> Result<Self> {
        config.validate()?;
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };

        let lights = (0..config.columns * config.rows)
            .map(|_| TrafficLight {
                north_south: rng.random_bool(0.5),
                period: rng.random_range(config.min_light_period..=config.max_light_period),
                last_flip: 0,
            })
            .collect();

        let mut world = Self {
            config,
            rng,
            lights,
            vehicles: Vec::new(),
            destination: Location::new(1, 1),
            deadline: 0,
            t: 0,
            done: None,
        };
        let vehicles = (0..=world.config.dummies)
            .map(|_| Vehicle {
                pose: world.random_pose(),
                intent: Some(world.random_move()),
            })
            .collect();
        world.vehicles = vehicles;
        Ok(world)
    }

    pub fn destination(&self) -> Location {
        self.destination
    }

    /// Place the tracked agent directly; used to set up scenarios
    pub fn place_agent(&mut self, pose: Pose, destination: Location, deadline: i32) {
        self.vehicles[PRIMARY].pose = pose;
        self.destination = destination;
        self.deadline = deadline;
        self.done = None;
    }

    /// Remove every dummy vehicle
    pub fn clear_traffic(&mut self) {
        self.vehicles.truncate(1);
    }

    fn random_location(&mut self) -> Location {
        Location::new(
            self.rng.random_range(1..=self.config.columns),
            self.rng.random_range(1..=self.config.rows),
        )
    }

    fn random_pose(&mut self) -> Pose {
        Pose {
            location: self.random_location(),
            heading: Heading::ALL[self.rng.random_range(0..Heading::ALL.len())],
        }
    }

    fn random_move(&mut self) -> Action {
        Action::MOVES[self.rng.random_range(0..Action::MOVES.len())]
    }

    fn light_at(&self, location: Location) -> &TrafficLight {
        let index = (location.y - 1) * self.config.columns + (location.x - 1);
        &self.lights[index as usize]
    }

    fn intent_of(&self, index: usize) -> Traffic {
        if index == PRIMARY {
            waypoint_towards(self.vehicles[PRIMARY].pose, self.destination)
        } else {
            self.vehicles[index].intent
        }
    }

    fn sense_for(&self, index: usize) -> Percepts {
        let me = self.vehicles[index].pose;
        let mut percepts = Percepts::clear(self.light_at(me.location).phase_for(me.heading));

        for (other_index, other) in self.vehicles.iter().enumerate() {
            if other_index == index
                || other.pose.location != me.location
                || other.pose.heading == me.heading
            {
                continue;
            }
            let intent = self.intent_of(other_index);
            if me.heading.dot(other.pose.heading) == -1 {
                if percepts.oncoming != Some(Action::Left) {
                    percepts.oncoming = intent;
                }
            } else if other.pose.heading == me.heading.turn_left() {
                if !matches!(percepts.right, Some(Action::Forward | Action::Left)) {
                    percepts.right = intent;
                }
            } else if percepts.left != Some(Action::Forward) {
                percepts.left = intent;
            }
        }
        percepts
    }

    /// Apply `action` for vehicle `index` if traffic rules allow it.
    ///
    /// Returns false, leaving the vehicle in place, on a violation.
    fn drive(&mut self, index: usize, action: Action) -> bool {
        let percepts = self.sense_for(index);
        let green = percepts.light == LightPhase::Green;
        let heading = self.vehicles[index].pose.heading;

        let new_heading = match action {
            Action::Idle => return true,
            Action::Forward if green => heading,
            Action::Left if green && matches!(percepts.oncoming, None | Some(Action::Left)) => {
                heading.turn_left()
            }
            Action::Right if green || percepts.left != Some(Action::Forward) => {
                heading.turn_right()
            }
            _ => return false,
        };

        let pose = &mut self.vehicles[index].pose;
        pose.heading = new_heading;
        pose.location = Location::new(
            (pose.location.x + new_heading.dx - 1).rem_euclid(self.config.columns) + 1,
            (pose.location.y + new_heading.dy - 1).rem_euclid(self.config.rows) + 1,
        );
        true
    }

    fn move_dummy(&mut self, index: usize) {
        let Some(intent) = self.vehicles[index].intent else {
            return;
        };
        let percepts = self.sense_for(index);
        let red = percepts.light == LightPhase::Red;
        let okay = match intent {
            Action::Right => !(red && percepts.left == Some(Action::Forward)),
            Action::Forward => !red,
            Action::Left => {
                !(red || matches!(percepts.oncoming, Some(Action::Forward | Action::Right)))
            }
            Action::Idle => true,
        };
        if okay && self.drive(index, intent) {
            let next = self.random_move();
            self.vehicles[index].intent = Some(next);
        }
    }
}

impl Environment for GridWorld {
    fn sense(&self) -> Percepts {
        self.sense_for(PRIMARY)
    }

    fn deadline(&self) -> i32 {
        self.deadline
    }

    fn act(&mut self, action: Action) -> f64 {
        let waypoint = self.intent_of(PRIMARY);
        let mut reward = if !self.drive(PRIMARY, action) {
            REWARD_VIOLATION
        } else if action == Action::Idle {
            REWARD_IDLE
        } else if Some(action) == waypoint {
            REWARD_ON_ROUTE
        } else {
            REWARD_OFF_ROUTE
        };

        if self.vehicles[PRIMARY].pose.location == self.destination {
            if self.deadline >= 0 {
                reward += REWARD_ARRIVAL;
            }
            self.done = Some(TrialOutcome::Completed);
        }
        reward
    }

    fn pose(&self) -> Pose {
        self.vehicles[PRIMARY].pose
    }
}

impl Simulation for GridWorld {
    fn reset(&mut self) -> Location {
        let start = self.random_pose();
        let mut destination = self.random_location();
        while start.location.manhattan(destination) < self.config.min_distance {
            destination = self.random_location();
        }

        self.place_agent(
            start,
            destination,
            start.location.manhattan(destination) * self.config.deadline_multiplier,
        );
        for index in 1..self.vehicles.len() {
            self.vehicles[index].pose = self.random_pose();
        }

        trace!(?start, ?destination, deadline = self.deadline, "trip reset");
        destination
    }

    fn advance(&mut self) {
        let t = self.t;
        for light in &mut self.lights {
            light.update(t);
        }
        for index in 1..self.vehicles.len() {
            self.move_dummy(index);
        }
    }

    fn settle(&mut self) -> Option<TrialOutcome> {
        if self.done.is_some() {
            return self.done;
        }
        if self.deadline <= self.config.hard_time_limit
            || (self.config.enforce_deadline && self.deadline <= 0)
        {
            self.done = Some(TrialOutcome::TimedOut);
        }
        self.deadline -= 1;
        self.t += 1;
        self.done
    }
}
