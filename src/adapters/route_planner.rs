//! Greedy route planner for the wrap-around grid

use crate::{
    ports::Planner,
    types::{Action, Location, Pose, Waypoint},
};

/// Next move from `pose` towards `destination`.
///
/// Closes the east-west gap first, then the north-south gap. Facing away
/// from the destination yields a right turn (the long way round).
pub fn waypoint_towards(pose: Pose, destination: Location) -> Waypoint {
    let dx = destination.x - pose.location.x;
    let dy = destination.y - pose.location.y;
    let heading = pose.heading;

    if dx == 0 && dy == 0 {
        return None;
    }

    let action = if dx != 0 {
        if dx * heading.dx > 0 {
            Action::Forward
        } else if dx * heading.dx < 0 {
            Action::Right
        } else if dx * heading.dy > 0 {
            Action::Left
        } else {
            Action::Right
        }
    } else if dy * heading.dy > 0 {
        Action::Forward
    } else if dy * heading.dy < 0 {
        Action::Right
    } else if dy * heading.dx > 0 {
        Action::Right
    } else {
        Action::Left
    };

    Some(action)
}

/// Planner adapter holding the current destination
#[derive(Debug, Clone, Default)]
pub struct RoutePlanner {
    destination: Option<Location>,
}

impl RoutePlanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn destination(&self) -> Option<Location> {
        self.destination
    }
}

impl Planner for RoutePlanner {
    fn route_to(&mut self, destination: Location) {
        self.destination = Some(destination);
    }

    fn next_waypoint(&self, pose: Pose) -> Waypoint {
        self.destination
            .and_then(|destination| waypoint_towards(pose, destination))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Heading;

    fn pose(x: i32, y: i32, heading: Heading) -> Pose {
        Pose {
            location: Location::new(x, y),
            heading,
        }
    }

    #[test]
    fn test_none_at_destination() {
        assert_eq!(waypoint_towards(pose(3, 3, Heading::EAST), Location::new(3, 3)), None);
    }

    #[test]
    fn test_east_west_gap_first() {
        let dest = Location::new(6, 5);
        assert_eq!(
            waypoint_towards(pose(2, 2, Heading::EAST), dest),
            Some(Action::Forward)
        );
        assert_eq!(
            waypoint_towards(pose(2, 2, Heading::WEST), dest),
            Some(Action::Right)
        );
        // Facing south, east is on the left
        assert_eq!(
            waypoint_towards(pose(2, 2, Heading::SOUTH), dest),
            Some(Action::Left)
        );
        assert_eq!(
            waypoint_towards(pose(2, 2, Heading::NORTH), dest),
            Some(Action::Right)
        );
    }

    #[test]
    fn test_north_south_gap() {
        let dest = Location::new(2, 5);
        assert_eq!(
            waypoint_towards(pose(2, 2, Heading::SOUTH), dest),
            Some(Action::Forward)
        );
        assert_eq!(
            waypoint_towards(pose(2, 2, Heading::NORTH), dest),
            Some(Action::Right)
        );
        // Facing east, south is on the right
        assert_eq!(
            waypoint_towards(pose(2, 2, Heading::EAST), dest),
            Some(Action::Right)
        );
        assert_eq!(
            waypoint_towards(pose(2, 2, Heading::WEST), dest),
            Some(Action::Left)
        );
    }

    #[test]
    fn test_planner_without_destination_suggests_nothing() {
        let mut planner = RoutePlanner::new();
        assert_eq!(planner.next_waypoint(pose(1, 1, Heading::EAST)), None);
        planner.route_to(Location::new(4, 1));
        assert_eq!(planner.destination(), Some(Location::new(4, 1)));
        assert_eq!(
            planner.next_waypoint(pose(1, 1, Heading::EAST)),
            Some(Action::Forward)
        );
    }
}
