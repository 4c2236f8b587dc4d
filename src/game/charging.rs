//! Exclusive assignment of the two charging stations.
//!
//! Stations are tested in fixed priority order: if both regions somehow
//! overlap the same robot, station 1 wins. A robot holds at most one
//! station; granting one releases any other it held. Leaving a station's
//! region releases it the same tick.

use crate::track::snapshot::{FieldRegion, RobotId};
use crate::util::vec2::Vec2;

/// Snapshot region names for the stations, in priority order.
pub const STATION_REGIONS: [&str; 2] = ["charging_station_1", "charging_station_2"];

/// Number of charging stations on the field.
pub const STATION_COUNT: usize = STATION_REGIONS.len();

/// Current station occupancy. `None` means vacant.
#[derive(Debug, Clone, Default)]
pub struct ChargingArbiter {
    holders: [Option<RobotId>; STATION_COUNT],
}

impl ChargingArbiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-evaluate one robot against both station regions. Returns true
    /// if the robot holds a station after this call.
    ///
    /// A station is granted iff the robot is inside its region and the
    /// station is vacant or already held by this robot. Outside both
    /// regions, any held station is released.
    pub fn evaluate(
        &mut self,
        robot: RobotId,
        position: Vec2,
        stations: [&FieldRegion; STATION_COUNT],
    ) -> bool {
        for (slot, region) in stations.iter().enumerate() {
            let open = self.holders[slot].map_or(true, |holder| holder == robot);
            if open && region.contains(position) {
                // One station per robot: drop any other slot first
                self.release(robot);
                self.holders[slot] = Some(robot);
                return true;
            }
        }
        self.release(robot);
        false
    }

    /// Release every station held by this robot.
    pub fn release(&mut self, robot: RobotId) {
        for holder in &mut self.holders {
            if *holder == Some(robot) {
                *holder = None;
            }
        }
    }

    /// Holder of the given station slot, if occupied.
    pub fn holder(&self, slot: usize) -> Option<RobotId> {
        self.holders.get(slot).copied().flatten()
    }

    /// Whether this robot currently holds any station.
    pub fn holds_any(&self, robot: RobotId) -> bool {
        self.holders.contains(&Some(robot))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::track::snapshot::FieldRegion;

    fn stations() -> (FieldRegion, FieldRegion) {
        (
            FieldRegion::rect(0.0, 0.0, 10.0, 10.0),
            FieldRegion::rect(20.0, 0.0, 30.0, 10.0),
        )
    }

    #[test]
    fn test_grant_vacant_station() {
        let (s1, s2) = stations();
        let mut arbiter = ChargingArbiter::new();

        assert!(arbiter.evaluate(11, Vec2::new(5.0, 5.0), [&s1, &s2]));
        assert_eq!(arbiter.holder(0), Some(11));
        assert_eq!(arbiter.holder(1), None);
    }

    #[test]
    fn test_occupied_station_not_granted() {
        let (s1, s2) = stations();
        let mut arbiter = ChargingArbiter::new();

        assert!(arbiter.evaluate(11, Vec2::new(5.0, 5.0), [&s1, &s2]));
        // Second robot on the same station gets nothing
        assert!(!arbiter.evaluate(22, Vec2::new(6.0, 5.0), [&s1, &s2]));
        assert_eq!(arbiter.holder(0), Some(11));
    }

    #[test]
    fn test_holder_keeps_station_on_reevaluate() {
        let (s1, s2) = stations();
        let mut arbiter = ChargingArbiter::new();

        assert!(arbiter.evaluate(11, Vec2::new(5.0, 5.0), [&s1, &s2]));
        assert!(arbiter.evaluate(11, Vec2::new(6.0, 6.0), [&s1, &s2]));
        assert_eq!(arbiter.holder(0), Some(11));
    }

    #[test]
    fn test_leaving_region_releases() {
        let (s1, s2) = stations();
        let mut arbiter = ChargingArbiter::new();

        assert!(arbiter.evaluate(11, Vec2::new(5.0, 5.0), [&s1, &s2]));
        assert!(!arbiter.evaluate(11, Vec2::new(15.0, 5.0), [&s1, &s2]));
        assert_eq!(arbiter.holder(0), None);
        assert!(!arbiter.holds_any(11));
    }

    #[test]
    fn test_station_one_priority_on_overlap() {
        // Overlapping regions: the same point is inside both
        let s1 = FieldRegion::rect(0.0, 0.0, 10.0, 10.0);
        let s2 = FieldRegion::rect(0.0, 0.0, 10.0, 10.0);
        let mut arbiter = ChargingArbiter::new();

        assert!(arbiter.evaluate(11, Vec2::new(5.0, 5.0), [&s1, &s2]));
        assert_eq!(arbiter.holder(0), Some(11));
        assert_eq!(arbiter.holder(1), None);
    }

    #[test]
    fn test_moving_between_stations_releases_old_slot() {
        let (s1, s2) = stations();
        let mut arbiter = ChargingArbiter::new();

        assert!(arbiter.evaluate(11, Vec2::new(25.0, 5.0), [&s1, &s2]));
        assert_eq!(arbiter.holder(1), Some(11));

        assert!(arbiter.evaluate(11, Vec2::new(5.0, 5.0), [&s1, &s2]));
        assert_eq!(arbiter.holder(0), Some(11));
        assert_eq!(arbiter.holder(1), None);
    }

    #[test]
    fn test_blocked_first_station_falls_through_to_second() {
        // Both regions cover the point, but station 1 is taken
        let s1 = FieldRegion::rect(0.0, 0.0, 10.0, 10.0);
        let s2 = FieldRegion::rect(0.0, 0.0, 10.0, 10.0);
        let mut arbiter = ChargingArbiter::new();

        assert!(arbiter.evaluate(11, Vec2::new(5.0, 5.0), [&s1, &s2]));
        assert!(arbiter.evaluate(22, Vec2::new(5.0, 5.0), [&s1, &s2]));
        assert_eq!(arbiter.holder(0), Some(11));
        assert_eq!(arbiter.holder(1), Some(22));
    }
}
