//! Firebrand spotting: stochastic ignitions seeded ahead of the front by
//! lofted embers.
//!
//! Each ignition event may launch a batch of firebrands. Dispersal follows
//! the plume regime: displacement along the wind is log-normal with
//! parameters switched on the plume Froude number, displacement across the
//! wind is normal. Landed brands accumulate per cell; a landing cell
//! ignites with the Schroeder probability of ignition decayed by distance,
//! aggregated over its brand count, after a lofting delay.
//!
//! # References
//! - Sardoy, N. et al. (2008). "Numerical study of ground-level distribution
//!   of firebrands generated by line fires." Combustion and Flame 154.
//! - Perryman, H.A. et al. (2013). "A cellular automata model to link
//!   surface fires to firebrand lift-off and dispersal." Int. J. Wildland
//!   Fire 22(4).
//! - Schroeder, M.J. (1969). "Ignition probability." USDA Forest Service,
//!   unpublished office report.
//! - Albini, F.A. (1979). "Spot fire distance from burning trees: a
//!   predictive model." USDA Forest Service INT-56.

use crate::core_types::raster::{CellIndex, Grid2D};
use crate::core_types::units::{
    btu_ft_s_to_kw_m, fahrenheit_to_celsius, fahrenheit_to_kelvin, feet_to_meters,
    meters_to_feet, mph_to_mps, normalize_azimuth, sec_to_min, GRAVITY_SI,
};
use crate::core_types::Landscape;
use crate::error::{Error, Result};
use crate::physics::fuel_catalog::is_burnable_fuel_number;
use crate::physics::fuel_moisture::fuel_moisture;
use crate::rng::SimRng;
use crate::simulation::SpreadDiagnostics;
use crate::weather::perturbation::PerturbationSet;
use crate::weather::{extract_constants, WeatherInputs};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A probability that is either fixed or drawn uniformly per event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ValueOrRange {
    Scalar(f64),
    Range(f64, f64),
}

impl ValueOrRange {
    fn sample(&self, rng: &mut SimRng) -> f64 {
        match *self {
            ValueOrRange::Scalar(v) => v,
            ValueOrRange::Range(lo, hi) => rng.uniform(lo, hi),
        }
    }

    fn validate(&self, what: &'static str) -> Result<()> {
        let ok = match *self {
            ValueOrRange::Scalar(v) => v.is_finite(),
            ValueOrRange::Range(lo, hi) => lo.is_finite() && hi.is_finite() && lo <= hi,
        };
        if ok {
            Ok(())
        } else {
            Err(Error::InvalidSpotting(what))
        }
    }
}

/// One bound of the firebrand count, itself possibly a uniform-int range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntBound {
    Fixed(u32),
    Uniform(u32, u32),
}

impl IntBound {
    fn sample(&self, rng: &mut SimRng) -> u32 {
        match *self {
            IntBound::Fixed(n) => n,
            IntBound::Uniform(lo, hi) => rng.uniform_int(lo.min(hi), lo.max(hi)),
        }
    }
}

/// Firebrands launched per ignition event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FirebrandCount {
    Fixed(u32),
    Range { lo: IntBound, hi: IntBound },
}

impl FirebrandCount {
    fn sample(&self, rng: &mut SimRng) -> u32 {
        match *self {
            FirebrandCount::Fixed(n) => n,
            FirebrandCount::Range { lo, hi } => {
                let lo = lo.sample(rng);
                let hi = hi.sample(rng);
                rng.uniform_int(lo.min(hi), lo.max(hi))
            }
        }
    }
}

/// Spot chances for surface fire, gated on intensity and looked up by fuel
/// model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceFireSpotting {
    /// Btu/ft·s below which surface fire never spots.
    pub critical_fire_line_intensity: f64,
    /// Ordered `[(fuel model range, probability)]`; later entries override
    /// earlier ones on overlap, unmatched models spot with probability 0.
    pub spotting_percent: Vec<((u16, u16), f64)>,
}

impl SurfaceFireSpotting {
    fn lookup(&self, fuel_model_number: u16) -> f64 {
        let mut percent = 0.0;
        for &((lo, hi), p) in &self.spotting_percent {
            if (lo..=hi).contains(&fuel_model_number) {
                percent = p;
            }
        }
        percent
    }
}

/// Full spotting configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpottingConfig {
    pub num_firebrands: FirebrandCount,
    /// kg/m³ of the ambient plume gas.
    pub ambient_gas_density: f64,
    /// kJ/(kg·K) of the ambient plume gas.
    pub specific_heat_gas: f64,
    /// 1/ft; ignition probability decays as `exp(-decay_constant * d)`.
    pub decay_constant: f64,
    /// Spot chance for torching (crown fire) cells.
    pub crown_fire_spotting_percent: ValueOrRange,
    pub surface_fire_spotting: Option<SurfaceFireSpotting>,
}

impl SpottingConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.ambient_gas_density > 0.0) {
            return Err(Error::InvalidSpotting("ambient_gas_density"));
        }
        if !(self.specific_heat_gas > 0.0) {
            return Err(Error::InvalidSpotting("specific_heat_gas"));
        }
        if !(self.decay_constant >= 0.0) {
            return Err(Error::InvalidSpotting("decay_constant"));
        }
        self.crown_fire_spotting_percent
            .validate("crown_fire_spotting_percent")?;
        if let Some(surface) = &self.surface_fire_spotting {
            if !(surface.critical_fire_line_intensity >= 0.0) {
                return Err(Error::InvalidSpotting("critical_fire_line_intensity"));
            }
            for &((lo, hi), p) in &surface.spotting_percent {
                if lo > hi || !(0.0..=1.0).contains(&p) {
                    return Err(Error::InvalidSpotting("spotting_percent"));
                }
            }
        }
        Ok(())
    }
}

impl Default for SpottingConfig {
    fn default() -> Self {
        Self {
            num_firebrands: FirebrandCount::Fixed(10),
            ambient_gas_density: 1.2,
            specific_heat_gas: 1.004,
            decay_constant: 0.005,
            crown_fire_spotting_percent: ValueOrRange::Scalar(0.1),
            surface_fire_spotting: None,
        }
    }
}

/// A pending spot ignition: eligible at `time`, ignites with probability
/// `probability` (which becomes the cell's `fire_spread` value).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScheduledSpot {
    pub time: f64,
    pub probability: f64,
}

/// Shared read-only context for one spotting invocation.
pub(crate) struct SpotContext<'a> {
    pub config: &'a SpottingConfig,
    pub landscape: &'a Landscape,
    pub weather: &'a WeatherInputs,
    pub perturbations: &'a PerturbationSet,
    pub global_clock: f64,
}

/// Collect the spot ignitions seeded by one ignition event.
///
/// Draw order is fixed for reproducibility: the gate draw(s), the firebrand
/// count, all parallel deltas, all perpendicular deltas, then one landing
/// gate per distinct landing cell in row-major order.
pub(crate) fn spot_ignitions(
    ctx: &SpotContext<'_>,
    rng: &mut SimRng,
    source: CellIndex,
    fire_line_intensity: f64,
    flame_length: f64,
    crown_fire: bool,
    firebrand_count: &mut Grid2D,
    diagnostics: &mut SpreadDiagnostics,
) -> Vec<(CellIndex, ScheduledSpot)> {
    if !passes_gate(ctx, rng, source, fire_line_intensity, crown_fire) {
        return Vec::new();
    }

    let constants = extract_constants(
        ctx.landscape,
        ctx.weather,
        ctx.perturbations,
        ctx.global_clock,
        source,
    );
    let wind_mps = mph_to_mps(constants.wind_speed_20ft);
    if wind_mps <= 0.0 || fire_line_intensity <= 0.0 {
        // nothing to loft the brands or push them downwind
        return Vec::new();
    }

    let num_brands = ctx.config.num_firebrands.sample(rng);
    if num_brands == 0 {
        return Vec::new();
    }

    let intensity_kw = btu_ft_s_to_kw_m(fire_line_intensity);
    let temp_k = fahrenheit_to_kelvin(constants.temperature);
    let (mu, sigma) = dispersal_parameters(
        intensity_kw,
        wind_mps,
        temp_k,
        ctx.config.ambient_gas_density,
        ctx.config.specific_heat_gas,
    );

    // all parallel deltas first, then all perpendicular deltas
    let parallel: Vec<f64> = (0..num_brands)
        .map(|_| match rng.lognormal(mu, sigma) {
            Some(d) => d,
            None => {
                diagnostics.degenerate_firebrand_draws += 1;
                0.0
            }
        })
        .collect();
    let perpendicular: Vec<f64> =
        (0..num_brands).map(|_| rng.normal(0.0, SIGMA_PERPENDICULAR)).collect();

    let wind_to = normalize_azimuth(constants.wind_from_direction + 180.0);
    let mut landed = BTreeSet::new();
    for (d_par, d_perp) in parallel.iter().zip(&perpendicular) {
        let (dx, dy) = deltas_wind_to_coord(
            meters_to_feet(*d_par),
            meters_to_feet(*d_perp),
            wind_to,
        );
        let Some(cell) = landing_cell(ctx.landscape, source, dx, dy) else {
            continue;
        };
        if cell == source || !is_burnable_fuel_number(ctx.landscape.fuel_model.at(cell)) {
            continue;
        }
        firebrand_count.put(cell, firebrand_count.at(cell) + 1.0);
        landed.insert(cell);
    }

    // one landing gate per distinct cell, row-major
    let delay = 2.0 * firebrand_time_of_max_height(flame_length, wind_mps) + 20.0;
    let mut spots = Vec::new();
    for cell in landed {
        let local = extract_constants(
            ctx.landscape,
            ctx.weather,
            ctx.perturbations,
            ctx.global_clock,
            cell,
        );
        let p_schroeder =
            schroeder_ignition_probability(local.relative_humidity, local.temperature);
        let distance = ctx.landscape.terrain_distance(source, cell);
        let decay = (-ctx.config.decay_constant * distance).exp();
        let per_brand = (p_schroeder * decay).clamp(0.0, 1.0);
        let brands = firebrand_count.at(cell);
        let p_spot = 1.0 - (1.0 - per_brand).powf(brands);
        if p_spot > rng.unit() {
            spots.push((
                cell,
                ScheduledSpot {
                    time: ctx.global_clock + delay,
                    probability: p_spot,
                },
            ));
        }
    }
    spots
}

/// Cross-wind scatter of landed brands (meters).
const SIGMA_PERPENDICULAR: f64 = 0.92;

fn passes_gate(
    ctx: &SpotContext<'_>,
    rng: &mut SimRng,
    source: CellIndex,
    fire_line_intensity: f64,
    crown_fire: bool,
) -> bool {
    if crown_fire {
        let p = ctx.config.crown_fire_spotting_percent.sample(rng);
        return p >= rng.unit();
    }
    let Some(surface) = &ctx.config.surface_fire_spotting else {
        return false;
    };
    if fire_line_intensity <= surface.critical_fire_line_intensity {
        return false;
    }
    let number = ctx.landscape.fuel_model.at(source);
    if !(1.0..=256.0).contains(&number) {
        return false;
    }
    surface.lookup(number as u16) >= rng.unit()
}

/// Log-normal parameters for the along-wind displacement, switched on the
/// plume Froude number (buoyancy- vs wind-driven).
fn dispersal_parameters(
    intensity_kw: f64,
    wind_mps: f64,
    temp_k: f64,
    gas_density: f64,
    specific_heat: f64,
) -> (f64, f64) {
    let characteristic_length = (intensity_kw
        / (gas_density * specific_heat * temp_k * GRAVITY_SI.sqrt()))
    .powf(2.0 / 3.0);
    let froude = wind_mps / (GRAVITY_SI * characteristic_length).sqrt();
    let i = intensity_kw;
    let w = wind_mps;
    if froude <= 1.0 {
        (
            1.47 * i.powf(0.54) * w.powf(-0.55) + 1.14,
            0.86 * i.powf(-0.21) * w.powf(0.44) + 0.19,
        )
    } else {
        (
            1.32 * i.powf(0.26) * w.powf(0.11) - 0.02,
            4.95 * i.powf(-0.01) * w.powf(-0.02) - 3.48,
        )
    }
}

/// Rotate a (parallel, perpendicular) displacement into grid-plane offsets.
///
/// `dx` is the row offset in feet (north negative), `dy` the column offset
/// (east positive).
fn deltas_wind_to_coord(d_parallel: f64, d_perpendicular: f64, wind_to_direction: f64) -> (f64, f64) {
    let magnitude = d_parallel.hypot(d_perpendicular);
    if magnitude == 0.0 {
        return (0.0, 0.0);
    }
    let theta =
        (wind_to_direction + (d_perpendicular / d_parallel).atan().to_degrees()).to_radians();
    (-magnitude * theta.cos(), magnitude * theta.sin())
}

/// Map a displacement from a source cell center to the landing cell,
/// truncating toward zero; `None` when the brand leaves the grid.
fn landing_cell(
    landscape: &Landscape,
    source: CellIndex,
    dx: f64,
    dy: f64,
) -> Option<CellIndex> {
    let cell_size = landscape.cell_size();
    let step = cell_size / 2.0;
    let row_pos = (2 * source.row + 1) as f64 * step + dx;
    let col_pos = (2 * source.col + 1) as f64 * step + dy;
    let row = (row_pos / cell_size).trunc() as i64;
    let col = (col_pos / cell_size).trunc() as i64;
    if row_pos < 0.0 || col_pos < 0.0 || !landscape.contains(row, col) {
        return None;
    }
    Some(CellIndex::new(row as usize, col as usize))
}

/// Schroeder (1969) probability that a firebrand ignites fine dead fuel.
///
/// Heat of preignition from the fine dead fuel moisture and ambient
/// temperature, mapped through the empirical quartic.
#[must_use]
pub fn schroeder_ignition_probability(relative_humidity: f64, temperature: f64) -> f64 {
    let moisture = fuel_moisture(relative_humidity, temperature).dead_1hr;
    let temp_c = fahrenheit_to_celsius(temperature);
    const T_IGNITION: f64 = 320.0;
    let heat_capacity = 0.266 + 0.0016 * (T_IGNITION + temp_c) / 2.0;
    let q_ig = (T_IGNITION - temp_c) * heat_capacity
        + (100.0 - temp_c) * moisture
        + 18.54 * (1.0 - (-15.1 * moisture).exp())
        + 540.0 * moisture;
    let x = ((400.0 - q_ig) / 10.0).max(0.0);
    (4.8e-5 * x.powf(4.3) / 50.0).clamp(0.0, 1.0)
}

/// Albini lofting delay: minutes until a brand launched by a flame of this
/// length tops out in the plume.
fn firebrand_time_of_max_height(flame_length: f64, wind_mps: f64) -> f64 {
    let flame_m = feet_to_meters(flame_length);
    if flame_m <= 0.0 || wind_mps <= 0.0 {
        return 0.0;
    }
    const D: f64 = 0.003;
    let z_max = 0.39 * D * 1.0e5;
    const A: f64 = 5.963;
    const B: f64 = A - 1.4;
    let t = 2.0 * flame_m / wind_mps + 1.2 + (A / 3.0) * ((B + z_max / flame_m) / A).powf(1.5)
        - A / 3.0;
    sec_to_min(t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn surface_table_later_entries_override() {
        let surface = SurfaceFireSpotting {
            critical_fire_line_intensity: 100.0,
            spotting_percent: vec![((1, 13), 0.2), ((5, 8), 0.9)],
        };
        assert_eq!(surface.lookup(3), 0.2);
        assert_eq!(surface.lookup(6), 0.9, "overlapping later entry must win");
        assert_eq!(surface.lookup(42), 0.0, "unmatched model must not spot");
    }

    #[test]
    fn firebrand_count_sampling_is_bounded() {
        let mut rng = SimRng::from_seed(5);
        let count = FirebrandCount::Range {
            lo: IntBound::Uniform(5, 10),
            hi: IntBound::Fixed(50),
        };
        for _ in 0..200 {
            let n = count.sample(&mut rng);
            assert!((5..=50).contains(&n), "count {n} out of range");
        }
        assert_eq!(FirebrandCount::Fixed(7).sample(&mut rng), 7);
    }

    #[test]
    fn schroeder_probability_behaves() {
        let dry_hot = schroeder_ignition_probability(10.0, 95.0);
        let damp_cool = schroeder_ignition_probability(80.0, 45.0);
        assert!(dry_hot > damp_cool, "dry/hot {dry_hot} !> damp/cool {damp_cool}");
        assert!((0.0..=1.0).contains(&dry_hot));
        assert!((0.0..=1.0).contains(&damp_cool));
    }

    #[test]
    fn dispersal_switches_on_froude_regime() {
        // weak wind over a hot fire: buoyancy-driven
        let (mu_b, sigma_b) = dispersal_parameters(5000.0, 1.0, 300.0, 1.2, 1.004);
        // strong wind over a weak fire: wind-driven
        let (mu_w, sigma_w) = dispersal_parameters(50.0, 15.0, 300.0, 1.2, 1.004);
        assert!(mu_b.is_finite() && sigma_b > 0.0);
        assert!(mu_w.is_finite() && sigma_w.is_finite());
        assert_ne!(mu_b, mu_w);
    }

    #[test]
    fn wind_rotation_sends_brands_downwind() {
        // wind blowing toward the north (azimuth 0): rows decrease
        let (dx, dy) = deltas_wind_to_coord(100.0, 0.0, 0.0);
        assert!((dx + 100.0).abs() < 1e-9, "dx was {dx}");
        assert!(dy.abs() < 1e-9, "dy was {dy}");
        // toward the east (azimuth 90): columns increase
        let (dx, dy) = deltas_wind_to_coord(100.0, 0.0, 90.0);
        assert!(dx.abs() < 1e-9, "dx was {dx}");
        assert!((dy - 100.0).abs() < 1e-9, "dy was {dy}");
        assert_eq!(deltas_wind_to_coord(0.0, 0.0, 90.0), (0.0, 0.0));
    }

    #[test]
    fn landing_cell_truncates_toward_zero() {
        let landscape = Landscape::uniform(10, 10, 100.0, 1.0);
        let source = CellIndex::new(5, 5);
        // 40 ft north from the center of (5,5) stays inside the cell
        assert_eq!(
            landing_cell(&landscape, source, -40.0, 0.0),
            Some(source)
        );
        // 60 ft north crosses into row 4
        assert_eq!(
            landing_cell(&landscape, source, -60.0, 0.0),
            Some(CellIndex::new(4, 5))
        );
        // far off-grid brands are dropped
        assert_eq!(landing_cell(&landscape, source, -2000.0, 0.0), None);
    }

    #[test]
    fn lofting_delay_grows_with_flame_length() {
        let short = firebrand_time_of_max_height(3.0, 5.0);
        let tall = firebrand_time_of_max_height(30.0, 5.0);
        assert!(short > 0.0);
        assert!(tall > short, "short {short} !< tall {tall}");
        assert_eq!(firebrand_time_of_max_height(0.0, 5.0), 0.0);
    }

    #[test]
    fn config_validation_catches_bad_ranges() {
        let mut cfg = SpottingConfig::default();
        assert!(cfg.validate().is_ok());
        cfg.crown_fire_spotting_percent = ValueOrRange::Range(0.8, 0.2);
        assert!(cfg.validate().is_err());
        cfg.crown_fire_spotting_percent = ValueOrRange::Scalar(1.0);
        cfg.ambient_gas_density = 0.0;
        assert!(cfg.validate().is_err());
    }
}
