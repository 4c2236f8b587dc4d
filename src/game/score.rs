//! Containment scoring: pure computation of per-team score deltas from
//! one snapshot.
//!
//! Policy: per-tick accumulation. Every tick an object spends inside a
//! team's basket attributes that category's point value again, and
//! manual overrides add on top. (Earlier revisions overwrote the score
//! with the latest containment value, which discarded overrides.)

use hashbrown::HashMap;

use crate::game::team::Team;
use crate::game::TickError;
use crate::track::snapshot::{RobotId, Snapshot};

/// Compute per-team score deltas for one tick.
///
/// Every scoring category present in the snapshot must have a
/// configured point value, and every team's basket region must be
/// present; otherwise the whole tick is rejected before any state is
/// touched. An object inside more than one basket (possible only with a
/// miscalibrated field) attributes to every satisfied team.
pub fn score_deltas(
    teams: &HashMap<RobotId, Team>,
    snapshot: &Snapshot,
    points: &HashMap<String, i32>,
) -> Result<HashMap<RobotId, i32>, TickError> {
    let mut baskets = Vec::with_capacity(teams.len());
    for team in teams.values() {
        let name = team.color.basket_region();
        let region = snapshot
            .fields
            .get(name)
            .ok_or_else(|| TickError::MissingRegion(name.to_string()))?;
        baskets.push((team.robot_id, region));
    }

    let mut deltas: HashMap<RobotId, i32> = HashMap::new();
    for (category, objects) in &snapshot.objects {
        let value = *points
            .get(category)
            .ok_or_else(|| TickError::UnknownCategory(category.clone()))?;

        for object in objects.values() {
            for (robot_id, region) in &baskets {
                if region.contains(object.position) {
                    *deltas.entry(*robot_id).or_insert(0) += value;
                }
            }
        }
    }

    Ok(deltas)
}
