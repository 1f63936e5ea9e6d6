//! Burn trajectories and the active fire front.
//!
//! Every ignited cell that still has burnable, unburned neighbors owns one
//! [`BurnTrajectory`] per such neighbor. The front maps source cells to
//! their trajectories in a `BTreeMap`, whose row-major key order is what
//! makes candidate resolution deterministic.

use crate::core_types::raster::CellIndex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The eight neighbor offsets `(di, dj)` in clockwise-from-north order.
pub const NEIGHBOR_OFFSETS: [(i8, i8); 8] = [
    (-1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
];

/// Azimuth (degrees clockwise from north) of a neighbor offset.
#[must_use]
pub fn offset_to_degrees(trajectory: (i8, i8)) -> f64 {
    match trajectory {
        (-1, 0) => 0.0,
        (-1, 1) => 45.0,
        (0, 1) => 90.0,
        (1, 1) => 135.0,
        (1, 0) => 180.0,
        (1, -1) => 225.0,
        (0, -1) => 270.0,
        (-1, -1) => 315.0,
        _ => unreachable!("not an 8-neighbor offset: {trajectory:?}"),
    }
}

/// Heating state of one source-to-neighbor spread path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BurnTrajectory {
    /// Destination neighbor.
    pub cell: CellIndex,
    /// Offset from source to destination.
    pub trajectory: (i8, i8),
    /// Azimuth of the offset (degrees clockwise from north).
    pub spread_direction: f64,
    /// 3-D center-to-center distance (ft).
    pub terrain_distance: f64,
    /// Spread rate along this trajectory (ft/min).
    pub spread_rate: f64,
    /// Btu/ft·s at the destination if this trajectory ignites it.
    pub fire_line_intensity: f64,
    /// ft at the destination if this trajectory ignites it.
    pub flame_length: f64,
    /// Fraction of `terrain_distance` heated so far; crossing 1.0 ignites.
    pub fractional_distance: f64,
    /// Whether this trajectory carries crown fire.
    pub crown_fire: bool,
}

/// Ignited cells that can still spread, with their outgoing trajectories.
pub type ActiveFront = BTreeMap<CellIndex, Vec<BurnTrajectory>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn azimuth_table_matches_compass() {
        assert_eq!(offset_to_degrees((-1, 0)), 0.0);
        assert_eq!(offset_to_degrees((0, 1)), 90.0);
        assert_eq!(offset_to_degrees((1, 0)), 180.0);
        assert_eq!(offset_to_degrees((0, -1)), 270.0);
        assert_eq!(offset_to_degrees((1, -1)), 225.0);
    }

    #[test]
    fn offsets_cover_all_eight_directions() {
        let mut azimuths: Vec<f64> =
            NEIGHBOR_OFFSETS.iter().map(|&o| offset_to_degrees(o)).collect();
        azimuths.sort_by(f64::total_cmp);
        assert_eq!(azimuths, vec![0.0, 45.0, 90.0, 135.0, 180.0, 225.0, 270.0, 315.0]);
    }

    #[test]
    fn front_iterates_row_major() {
        let mut front = ActiveFront::new();
        front.insert(CellIndex::new(2, 0), Vec::new());
        front.insert(CellIndex::new(0, 5), Vec::new());
        front.insert(CellIndex::new(0, 1), Vec::new());
        let order: Vec<CellIndex> = front.keys().copied().collect();
        assert_eq!(
            order,
            vec![CellIndex::new(0, 1), CellIndex::new(0, 5), CellIndex::new(2, 0)]
        );
    }
}
