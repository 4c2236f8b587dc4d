//! Tracked-object snapshot as published by the vision pipeline.
//!
//! A snapshot is replaced wholesale on every publish and is read-only to
//! the game engine. It carries robot positions, scoring-object positions
//! grouped by category, and the calibrated field regions used for
//! containment tests.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::util::vec2::Vec2;

/// Stable robot/team identifier from the competition roster
pub type RobotId = u32;

/// Identifier of a tracked scoring object (AprilTag id)
pub type ObjectId = u32;

/// Position and heading of one tracked marker
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TrackedObject {
    pub id: u32,
    pub position: Vec2,
    /// Heading in radians; informational only, containment ignores it
    #[serde(default)]
    pub direction: f32,
}

/// Named field region, a convex or concave polygon in field coordinates
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldRegion {
    pub corners: Vec<Vec2>,
}

impl FieldRegion {
    pub fn new(corners: Vec<Vec2>) -> Self {
        Self { corners }
    }

    /// Axis-aligned rectangular region from two opposite corners
    pub fn rect(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self {
            corners: vec![
                Vec2::new(x0, y0),
                Vec2::new(x1, y0),
                Vec2::new(x1, y1),
                Vec2::new(x0, y1),
            ],
        }
    }

    /// Even-odd ray-casting containment test. Degenerate regions with
    /// fewer than three corners contain nothing.
    pub fn contains(&self, point: Vec2) -> bool {
        let n = self.corners.len();
        if n < 3 {
            return false;
        }

        let mut inside = false;
        let mut j = n - 1;
        for i in 0..n {
            let a = self.corners[i];
            let b = self.corners[j];
            if (a.y > point.y) != (b.y > point.y) {
                let cross_x = a.x + (point.y - a.y) / (b.y - a.y) * (b.x - a.x);
                if point.x < cross_x {
                    inside = !inside;
                }
            }
            j = i;
        }
        inside
    }
}

/// One timestamped read of everything the tracker sees
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    /// Tracker-side capture time, seconds; strictly increasing between
    /// publishes
    pub timestamp: f64,
    /// Robot markers keyed by robot id
    #[serde(default)]
    pub robots: HashMap<RobotId, TrackedObject>,
    /// Scoring objects keyed by category name, then object id
    #[serde(default)]
    pub objects: HashMap<String, HashMap<ObjectId, TrackedObject>>,
    /// Calibrated field regions keyed by name (baskets, charging stations)
    #[serde(default)]
    pub fields: HashMap<String, FieldRegion>,
}
