//! Adapters implementing domain ports.
//!
//! Adapters depend on the ports, not the other way around: the learner never
//! names a concrete world or planner.

pub mod grid_world;
pub mod route_planner;

pub use grid_world::GridWorld;
pub use route_planner::{RoutePlanner, waypoint_towards};
