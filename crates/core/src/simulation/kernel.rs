//! The adaptive-timestep spread kernel.
//!
//! Each step: size the timestep from the fastest trajectory, accumulate
//! fractional distances, resolve ignition candidates into events, collect
//! and apply spot ignitions, maintain the front, and advance the clock.
//! The ordering is fixed; candidate resolution iterates the front in
//! row-major key order, so a fixed seed reproduces the run exactly.

use crate::core_types::raster::CellIndex;
use crate::core_types::units::FPM_PER_MPH;
use crate::physics::crown_fire::{
    crown_fire_eccentricity, crown_fire_line_intensity, cruz_crown_spread_rate,
    van_wagner_initiation,
};
use crate::physics::fuel_catalog::is_burnable_fuel_number;
use crate::physics::fuel_moisture::fuel_moisture;
use crate::physics::rothermel::{
    anderson_flame_depth, byram_fire_line_intensity, byram_flame_length, rothermel_any,
    rothermel_max, wind_adjustment_factor,
};
use crate::simulation::front::{offset_to_degrees, BurnTrajectory, NEIGHBOR_OFFSETS};
use crate::simulation::spotting::{self, SpotContext};
use crate::simulation::{FireSpreadEngine, FIRE_TYPE_CROWN, FIRE_TYPE_SURFACE};
use crate::weather::extract_constants;
use std::collections::{BTreeMap, BTreeSet};
use tracing::trace;

/// A trajectory that crossed `fractional_distance >= 1` this step.
struct IgnitionCandidate {
    dest: CellIndex,
    trajectory: (i8, i8),
    fractional_distance: f64,
    flame_length: f64,
    fire_line_intensity: f64,
    crown_fire: bool,
}

/// Spread rates below this are treated as stalled when sizing the
/// timestep.
const MIN_SPREAD_RATE: f64 = 1.0e-10;

impl FireSpreadEngine<'_> {
    /// Advance the simulation by one adaptive step.
    pub(super) fn step(&mut self) {
        let remaining = self.max_runtime - self.global_clock;
        let max_rate = self
            .active_front
            .values()
            .flatten()
            .map(|t| t.spread_rate)
            .fold(0.0, f64::max);
        let dt = if max_rate > MIN_SPREAD_RATE {
            (self.landscape.cell_size() / max_rate).min(remaining)
        } else {
            // the whole front is stalled; burn the clock down
            remaining
        };
        if dt <= 0.0 {
            self.global_clock = self.max_runtime;
            return;
        }

        // Accumulate heat along every trajectory and collect candidates.
        let mut candidates = Vec::new();
        for trajectories in self.active_front.values_mut() {
            for t in trajectories {
                if t.spread_rate <= 0.0 {
                    continue;
                }
                t.fractional_distance += t.spread_rate * dt / t.terrain_distance;
                if t.fractional_distance >= 1.0 {
                    candidates.push(IgnitionCandidate {
                        dest: t.cell,
                        trajectory: t.trajectory,
                        fractional_distance: t.fractional_distance,
                        flame_length: t.flame_length,
                        fire_line_intensity: t.fire_line_intensity,
                        crown_fire: t.crown_fire,
                    });
                }
            }
        }

        // Resolve: one event per destination, largest fractional distance
        // wins, earlier (row-major) source wins ties.
        let mut events: BTreeMap<CellIndex, IgnitionCandidate> = BTreeMap::new();
        for candidate in candidates {
            let wins = events
                .get(&candidate.dest)
                .map_or(true, |held| candidate.fractional_distance > held.fractional_distance);
            if wins {
                events.insert(candidate.dest, candidate);
            }
        }

        // Commit ignition events.
        let ignition_time = self.global_clock + dt;
        for (&dest, event) in &events {
            self.fire_spread.put(dest, 1.0);
            self.flame_length.put(dest, event.flame_length);
            self.fire_line_intensity.put(dest, event.fire_line_intensity);
            self.burn_time.put(dest, ignition_time);
            self.fire_type.put(
                dest,
                if event.crown_fire {
                    FIRE_TYPE_CROWN
                } else {
                    FIRE_TYPE_SURFACE
                },
            );
            trace!(
                row = dest.row,
                col = dest.col,
                time = ignition_time,
                crown = event.crown_fire,
                "cell ignited"
            );
        }

        // Spotting: collect brands from this step's events, then release
        // whatever is due by the end of the step.
        if let (Some(config), Some(brand_grid)) =
            (&self.spotting, self.firebrand_count.as_mut())
        {
            let ctx = SpotContext {
                config,
                landscape: self.landscape,
                weather: self.weather,
                perturbations: &self.perturbations,
                global_clock: self.global_clock,
            };
            for (&dest, event) in &events {
                let spots = spotting::spot_ignitions(
                    &ctx,
                    &mut self.rng,
                    dest,
                    event.fire_line_intensity,
                    event.flame_length,
                    event.crown_fire,
                    brand_grid,
                    &mut self.diagnostics,
                );
                for (cell, spot) in spots {
                    // keep the earliest pending ignition per cell
                    self.spot_schedule
                        .entry(cell)
                        .and_modify(|existing| {
                            if spot.time < existing.time {
                                *existing = spot;
                            }
                        })
                        .or_insert(spot);
                }
            }
        }

        let due: Vec<(CellIndex, spotting::ScheduledSpot)> = self
            .spot_schedule
            .iter()
            .filter(|(_, spot)| spot.time <= ignition_time)
            .map(|(&cell, &spot)| (cell, spot))
            .collect();
        let mut spot_ignited = Vec::new();
        for (cell, spot) in due {
            self.spot_schedule.remove(&cell);
            if self.fire_spread.at(cell) < spot.probability {
                self.fire_spread.put(cell, spot.probability);
                self.burn_time.put(cell, ignition_time);
                self.fire_type.put(cell, FIRE_TYPE_SURFACE);
                spot_ignited.push(cell);
                trace!(
                    row = cell.row,
                    col = cell.col,
                    probability = spot.probability,
                    "spot ignition"
                );
            }
        }

        // Front maintenance: drop trajectories into newly ignited cells,
        // retire exhausted sources, enroll the new ones.
        let mut newly_ignited: BTreeSet<CellIndex> = events.keys().copied().collect();
        newly_ignited.extend(spot_ignited.iter().copied());
        for trajectories in self.active_front.values_mut() {
            trajectories.retain(|t| !newly_ignited.contains(&t.cell));
        }
        self.active_front.retain(|_, trajectories| !trajectories.is_empty());

        for (dest, event) in events {
            let overflow = (event.trajectory, event.fractional_distance - 1.0);
            let trajectories = self.compute_neighborhood(dest, Some(overflow));
            if !trajectories.is_empty() {
                self.active_front.insert(dest, trajectories);
            }
        }
        for cell in spot_ignited {
            let trajectories = self.compute_neighborhood(cell, None);
            if !trajectories.is_empty() {
                self.active_front.insert(cell, trajectories);
            }
        }

        self.global_clock += dt;
    }

    /// Build the outgoing trajectories of an ignited cell: one per
    /// in-bounds, burnable, unburned 8-neighbor.
    ///
    /// `overflow` seeds the trajectory that triggered this cell's own
    /// ignition with the residual heat carried past 1.0, preserving energy
    /// balance across the cell boundary.
    pub(super) fn compute_neighborhood(
        &mut self,
        source: CellIndex,
        overflow: Option<((i8, i8), f64)>,
    ) -> Vec<BurnTrajectory> {
        let constants = extract_constants(
            self.landscape,
            self.weather,
            &self.perturbations,
            self.global_clock,
            source,
        );
        if !(1.0..=256.0).contains(&constants.fuel_model_number) {
            return Vec::new();
        }
        let moisture = fuel_moisture(constants.relative_humidity, constants.temperature);
        let Some(entry) = self
            .memo
            .get_or_build(constants.fuel_model_number as u16, &moisture)
        else {
            return Vec::new();
        };
        if !entry.fuel.burnable() {
            return Vec::new();
        }

        let waf = wind_adjustment_factor(
            entry.fuel.depth,
            constants.canopy_height,
            constants.canopy_cover,
        );
        let midflame_wind = constants.wind_speed_20ft * FPM_PER_MPH * waf;
        let max_info = rothermel_max(
            &entry.min,
            midflame_wind,
            constants.wind_from_direction,
            constants.slope,
            constants.aspect,
            self.ellipse_adjustment_factor,
        );
        let crown_spread_max = cruz_crown_spread_rate(
            constants.wind_speed_20ft,
            constants.crown_bulk_density,
            moisture.dead_1hr,
        );
        let crown_ecc =
            crown_fire_eccentricity(constants.wind_speed_20ft, self.ellipse_adjustment_factor);

        let rows = self.landscape.num_rows();
        let cols = self.landscape.num_cols();
        let mut trajectories = Vec::new();
        for &(di, dj) in &NEIGHBOR_OFFSETS {
            let Some(neighbor) = source.offset(di as i64, dj as i64, rows, cols) else {
                continue;
            };
            if self.fire_spread.at(neighbor) > 0.0
                || !is_burnable_fuel_number(self.landscape.fuel_model.at(neighbor))
            {
                continue;
            }

            let spread_direction = offset_to_degrees((di, dj));
            let surface_rate = rothermel_any(&max_info, spread_direction);
            let surface_intensity = byram_fire_line_intensity(
                entry.min.reaction_intensity,
                anderson_flame_depth(surface_rate, entry.min.residence_time),
            );
            let crown = van_wagner_initiation(
                constants.canopy_cover,
                constants.canopy_base_height,
                self.foliar_moisture,
                surface_intensity,
            );
            let (mut spread_rate, mut intensity) = if crown {
                let crown_info = max_info.with_crown(crown_spread_max, crown_ecc);
                let crown_rate = rothermel_any(&crown_info, spread_direction);
                let crown_intensity = crown_fire_line_intensity(
                    crown_rate,
                    constants.crown_bulk_density,
                    constants.canopy_height,
                    constants.canopy_base_height,
                    entry.fuel.heat_dead,
                );
                (
                    surface_rate.max(crown_rate),
                    surface_intensity + crown_intensity,
                )
            } else {
                (surface_rate, surface_intensity)
            };
            if spread_rate < 0.0 {
                spread_rate = 0.0;
                self.diagnostics.clamped_spread_rates += 1;
            }
            if intensity < 0.0 {
                intensity = 0.0;
                self.diagnostics.clamped_intensities += 1;
            }

            let fractional_distance = match overflow {
                Some((trajectory, carry)) if trajectory == (di, dj) => carry.max(0.0),
                _ => 0.0,
            };

            trajectories.push(BurnTrajectory {
                cell: neighbor,
                trajectory: (di, dj),
                spread_direction,
                terrain_distance: self.landscape.terrain_distance(source, neighbor),
                spread_rate,
                fire_line_intensity: intensity,
                flame_length: byram_flame_length(intensity),
                fractional_distance,
                crown_fire: crown,
            });
        }
        trajectories
    }
}
