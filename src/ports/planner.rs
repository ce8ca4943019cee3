//! Planner port - suggests the next direction towards a destination

use crate::types::{Location, Pose, Waypoint};

/// Route planner consulted once per decision step.
pub trait Planner {
    /// Retarget the planner, called at every trial boundary
    fn route_to(&mut self, destination: Location);

    /// Suggested move from `pose`; `None` once the destination is reached.
    ///
    /// Never suggests [`Action::Idle`](crate::types::Action::Idle).
    fn next_waypoint(&self, pose: Pose) -> Waypoint;
}
