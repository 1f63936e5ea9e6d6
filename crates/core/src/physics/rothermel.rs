//! Rothermel surface fire spread model (1972) with the Albini (1976)
//! size-class weighting, plus the Byram intensity and flame length
//! relations the spread kernel reports per trajectory.
//!
//! The model splits into a wind- and slope-free part
//! ([`rothermel_no_wind_no_slope`], expensive, memoizable per fuel model ×
//! moisture) and the directional part ([`rothermel_max`],
//! [`rothermel_any`], cheap, evaluated per cell per step).
//!
//! # References
//! - Rothermel, R.C. (1972). "A mathematical model for predicting fire
//!   spread in wildland fuels." USDA Forest Service INT-115.
//! - Albini, F.A. (1976). "Estimating wildfire behavior and effects."
//!   USDA Forest Service INT-30.
//! - Albini, F.A., Baughman, R.G. (1979). "Estimating windspeeds for
//!   predicting wildland fire behavior." USDA Forest Service INT-221.
//! - Anderson, H.E. (1969). "Heat transfer and fire spread." USDA Forest
//!   Service INT-69.
//! - Byram, G.M. (1959). "Combustion of forest fuels." In: Forest Fire:
//!   Control and Use. McGraw-Hill.

use crate::core_types::units::{azimuth_difference, normalize_azimuth};
use crate::physics::fuel::{
    FuelModel, EFFECTIVE_MINERAL_CONTENT, PARTICLE_DENSITY, TOTAL_MINERAL_CONTENT,
};
use serde::{Deserialize, Serialize};

/// Wind- and slope-free spread terms for one moisturized fuel model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceSpreadMin {
    /// No-wind, no-slope spread rate R0 (ft/min).
    pub base_spread_rate: f64,
    /// Reaction intensity I_R (Btu/ft²/min).
    pub reaction_intensity: f64,
    /// Flaming residence time (min).
    pub residence_time: f64,
    /// Heat sink ρ_b·ε·Q_ig (Btu/ft³).
    pub heat_sink: f64,
    /// Propagating flux ratio ξ.
    pub propagating_flux_ratio: f64,
    /// Packing ratio β.
    pub packing_ratio: f64,
    /// Optimum packing ratio β_op.
    pub optimum_packing_ratio: f64,
    /// Characteristic surface-area-to-volume ratio σ (ft²/ft³).
    pub characteristic_sav: f64,
}

impl SurfaceSpreadMin {
    fn inert() -> Self {
        Self {
            base_spread_rate: 0.0,
            reaction_intensity: 0.0,
            residence_time: 0.0,
            heat_sink: 0.0,
            propagating_flux_ratio: 0.0,
            packing_ratio: 0.0,
            optimum_packing_ratio: 0.0,
            characteristic_sav: 0.0,
        }
    }
}

/// Head-fire terms after wind and slope are folded in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceSpreadMax {
    /// Head-fire spread rate (ft/min).
    pub max_spread_rate: f64,
    /// Azimuth of maximum spread (degrees clockwise from north).
    pub max_spread_direction: f64,
    /// Eccentricity of the spread ellipse, in [0, 1).
    pub eccentricity: f64,
    /// Effective wind speed backing the ellipse shape (ft/min).
    pub effective_wind_speed: f64,
}

impl SurfaceSpreadMax {
    /// Same ellipse orientation with the crown fire rate and eccentricity
    /// substituted; used when a trajectory transitions to crown fire.
    #[must_use]
    pub fn with_crown(&self, crown_spread_rate: f64, crown_eccentricity: f64) -> Self {
        Self {
            max_spread_rate: crown_spread_rate,
            eccentricity: crown_eccentricity,
            ..*self
        }
    }
}

/// Rothermel moisture damping coefficient η_M.
fn moisture_damping(moisture: f64, moisture_of_extinction: f64) -> f64 {
    if moisture_of_extinction <= 0.0 {
        return 0.0;
    }
    let r = (moisture / moisture_of_extinction).min(1.0);
    (1.0 - 2.59 * r + 5.11 * r * r - 3.52 * r * r * r).clamp(0.0, 1.0)
}

/// Wind- and slope-free spread info for a moisturized fuel model.
///
/// Returns an inert (all-zero) result for empty fuel beds so callers never
/// divide by a zero heat sink.
#[must_use]
pub fn rothermel_no_wind_no_slope(fm: &FuelModel) -> SurfaceSpreadMin {
    // Surface areas per class, A_ij = σ_ij w_ij / ρ_p
    let area = |load: f64, sav: f64| sav * load / PARTICLE_DENSITY;
    let dead_areas: Vec<f64> = fm
        .dead
        .iter()
        .map(|c| if c.present() { area(c.load, c.sav) } else { 0.0 })
        .collect();
    let live_areas: Vec<f64> = fm
        .live
        .iter()
        .map(|c| if c.present() { area(c.load, c.sav) } else { 0.0 })
        .collect();
    let a_dead: f64 = dead_areas.iter().sum();
    let a_live: f64 = live_areas.iter().sum();
    let a_total = a_dead + a_live;
    if a_total <= 0.0 || fm.depth <= 0.0 {
        return SurfaceSpreadMin::inert();
    }

    // Within-category and category weights
    let f_dead_j: Vec<f64> = dead_areas
        .iter()
        .map(|a| if a_dead > 0.0 { a / a_dead } else { 0.0 })
        .collect();
    let f_live_j: Vec<f64> = live_areas
        .iter()
        .map(|a| if a_live > 0.0 { a / a_live } else { 0.0 })
        .collect();
    let f_dead = a_dead / a_total;
    let f_live = a_live / a_total;

    // Characteristic surface-area-to-volume ratio
    let sigma_dead: f64 = fm
        .dead
        .iter()
        .zip(&f_dead_j)
        .map(|(c, f)| f * c.sav)
        .sum();
    let sigma_live: f64 = fm
        .live
        .iter()
        .zip(&f_live_j)
        .map(|(c, f)| f * c.sav)
        .sum();
    let sigma = f_dead * sigma_dead + f_live * sigma_live;
    if sigma <= 0.0 {
        return SurfaceSpreadMin::inert();
    }

    // Bulk and packing ratios
    let total_load: f64 = fm.dead.iter().chain(fm.live.iter()).map(|c| c.load).sum();
    let bulk_density = total_load / fm.depth;
    let beta = bulk_density / PARTICLE_DENSITY;
    let beta_op = 3.348 * sigma.powf(-0.8189);
    let ratio = beta / beta_op;

    // Optimum reaction velocity
    let sigma_15 = sigma.powf(1.5);
    let gamma_max = sigma_15 / (495.0 + 0.0594 * sigma_15);
    let a_exp = 133.0 * sigma.powf(-0.7913);
    let gamma = gamma_max * ratio.powf(a_exp) * (a_exp * (1.0 - ratio)).exp();

    // Category moistures and live extinction moisture
    let m_dead: f64 = fm
        .dead
        .iter()
        .zip(&f_dead_j)
        .map(|(c, f)| f * c.moisture)
        .sum();
    let m_live: f64 = fm
        .live
        .iter()
        .zip(&f_live_j)
        .map(|(c, f)| f * c.moisture)
        .sum();

    let dead_fine: f64 = fm
        .dead
        .iter()
        .filter(|c| c.present())
        .map(|c| c.load * (-138.0 / c.sav).exp())
        .sum();
    let live_fine: f64 = fm
        .live
        .iter()
        .filter(|c| c.present())
        .map(|c| c.load * (-500.0 / c.sav).exp())
        .sum();
    let mx_live = if live_fine > 0.0 && dead_fine > 0.0 {
        let w = dead_fine / live_fine;
        let m_dead_fine: f64 = fm
            .dead
            .iter()
            .filter(|c| c.present())
            .map(|c| c.load * c.moisture * (-138.0 / c.sav).exp())
            .sum::<f64>()
            / dead_fine;
        (2.9 * w * (1.0 - m_dead_fine / fm.mx_dead) - 0.226).max(fm.mx_dead)
    } else {
        fm.mx_dead
    };

    let eta_m_dead = moisture_damping(m_dead, fm.mx_dead);
    let eta_m_live = moisture_damping(m_live, mx_live);
    let eta_s = 0.174 * EFFECTIVE_MINERAL_CONTENT.powf(-0.19);

    // Net loads, category-weighted
    let net = |load: f64| load * (1.0 - TOTAL_MINERAL_CONTENT);
    let wn_dead: f64 = fm
        .dead
        .iter()
        .zip(&f_dead_j)
        .map(|(c, f)| f * net(c.load))
        .sum();
    let wn_live: f64 = fm
        .live
        .iter()
        .zip(&f_live_j)
        .map(|(c, f)| f * net(c.load))
        .sum();

    let reaction_intensity = gamma
        * (wn_dead * fm.heat_dead * eta_m_dead + wn_live * fm.heat_live * eta_m_live)
        * eta_s;

    let propagating_flux_ratio =
        ((0.792 + 0.681 * sigma.sqrt()) * (beta + 0.1)).exp() / (192.0 + 0.2595 * sigma);

    // Heat sink: ρ_b Σ_i f_i Σ_j f_ij ε_ij Q_ig,ij
    let sink_term = |c: &crate::physics::fuel::FuelClass, f: f64| {
        if c.present() {
            f * (-138.0 / c.sav).exp() * (250.0 + 1116.0 * c.moisture)
        } else {
            0.0
        }
    };
    let sink_dead: f64 = fm
        .dead
        .iter()
        .zip(&f_dead_j)
        .map(|(c, &f)| sink_term(c, f))
        .sum();
    let sink_live: f64 = fm
        .live
        .iter()
        .zip(&f_live_j)
        .map(|(c, &f)| sink_term(c, f))
        .sum();
    let heat_sink = bulk_density * (f_dead * sink_dead + f_live * sink_live);

    let base_spread_rate = if heat_sink > 0.0 {
        (reaction_intensity * propagating_flux_ratio / heat_sink).max(0.0)
    } else {
        0.0
    };

    SurfaceSpreadMin {
        base_spread_rate,
        reaction_intensity,
        residence_time: 384.0 / sigma,
        heat_sink,
        propagating_flux_ratio,
        packing_ratio: beta,
        optimum_packing_ratio: beta_op,
        characteristic_sav: sigma,
    }
}

/// Ratio of effective wind speed to reaction intensity above which the wind
/// effect no longer grows (Rothermel's wind limit).
const EFFECTIVE_WIND_LIMIT: f64 = 0.9;

/// Length/width growth per ft/min of effective wind (Anderson 1983;
/// 0.25 per mi/h).
const LENGTH_WIDTH_SLOPE: f64 = 0.25 / 88.0;

/// Fold midflame wind and slope into the head-fire rate, direction, and
/// ellipse eccentricity.
///
/// Wind and slope are combined vectorially about the upslope axis; the
/// combined coefficient is inverted through the wind function to recover an
/// effective wind speed, which (after the Rothermel wind limit) shapes the
/// spread ellipse.
///
/// # Arguments
/// * `min` - wind/slope-free spread info for the cell's fuel
/// * `midflame_wind_speed` - ft/min at midflame height
/// * `wind_from_direction` - degrees clockwise from north
/// * `slope` - rise/run (tan of the slope angle)
/// * `aspect` - downslope azimuth, degrees clockwise from north
/// * `ellipse_adjustment_factor` - scales ellipse elongation; 1.0 = standard
#[must_use]
pub fn rothermel_max(
    min: &SurfaceSpreadMin,
    midflame_wind_speed: f64,
    wind_from_direction: f64,
    slope: f64,
    aspect: f64,
    ellipse_adjustment_factor: f64,
) -> SurfaceSpreadMax {
    let upslope = normalize_azimuth(aspect + 180.0);
    if min.base_spread_rate <= 0.0 {
        return SurfaceSpreadMax {
            max_spread_rate: 0.0,
            max_spread_direction: upslope,
            eccentricity: 0.0,
            effective_wind_speed: 0.0,
        };
    }

    let sigma = min.characteristic_sav;
    let b = 0.02526 * sigma.powf(0.54);
    let c = 7.47 * (-0.133 * sigma.powf(0.55)).exp();
    let e = 0.715 * (-3.59e-4 * sigma).exp();
    let ratio = min.packing_ratio / min.optimum_packing_ratio;

    let phi_wind = if midflame_wind_speed > 0.0 {
        c * midflame_wind_speed.powf(b) * ratio.powf(-e)
    } else {
        0.0
    };
    let phi_slope = if slope > 0.0 {
        5.275 * min.packing_ratio.powf(-0.3) * slope * slope
    } else {
        0.0
    };

    // Vector combination about the upslope axis
    let wind_to = normalize_azimuth(wind_from_direction + 180.0);
    let offset = (wind_to - upslope).to_radians();
    let x = phi_slope + phi_wind * offset.cos();
    let y = phi_wind * offset.sin();
    let phi_combined = (x * x + y * y).sqrt();

    let max_spread_rate = min.base_spread_rate * (1.0 + phi_combined);
    let max_spread_direction = if phi_combined > 0.0 {
        normalize_azimuth(upslope + y.atan2(x).to_degrees())
    } else {
        upslope
    };

    // Invert the wind function to get the effective wind speed, then apply
    // the Rothermel wind limit before shaping the ellipse.
    let effective_wind_speed = if phi_combined > 0.0 {
        (phi_combined * ratio.powf(e) / c)
            .powf(1.0 / b)
            .min(EFFECTIVE_WIND_LIMIT * min.reaction_intensity)
    } else {
        0.0
    };

    let length_width =
        1.0 + LENGTH_WIDTH_SLOPE * effective_wind_speed * ellipse_adjustment_factor;
    let eccentricity = (length_width * length_width - 1.0).sqrt() / length_width;

    SurfaceSpreadMax {
        max_spread_rate,
        max_spread_direction,
        eccentricity,
        effective_wind_speed,
    }
}

/// Spread rate along an arbitrary azimuth via the standard elliptical
/// projection.
#[must_use]
pub fn rothermel_any(max: &SurfaceSpreadMax, spread_direction: f64) -> f64 {
    if max.max_spread_rate <= 0.0 {
        return 0.0;
    }
    let theta = azimuth_difference(spread_direction, max.max_spread_direction).to_radians();
    let e = max.eccentricity;
    max.max_spread_rate * (1.0 - e) / (1.0 - e * theta.cos())
}

/// Albini & Baughman (1979) wind adjustment factor from 20-ft to midflame
/// height.
///
/// Sheltered (canopy cover above 5% with a real canopy) and unsheltered
/// formulations; fuel bed depth in feet, canopy height in feet, canopy
/// cover in percent.
#[must_use]
pub fn wind_adjustment_factor(
    fuel_bed_depth: f64,
    canopy_height: f64,
    canopy_cover: f64,
) -> f64 {
    if canopy_cover > 5.0 && canopy_height > 0.0 {
        let crown_fill = canopy_cover / 300.0;
        0.555
            / ((crown_fill * canopy_height).sqrt()
                * ((20.0 + 0.36 * canopy_height) / (0.13 * canopy_height)).ln())
    } else if fuel_bed_depth > 0.0 {
        1.83 / ((20.0 + 0.36 * fuel_bed_depth) / (0.13 * fuel_bed_depth)).ln()
    } else {
        1.0
    }
}

/// Anderson (1969) flame depth (ft) from spread rate and residence time.
#[inline]
#[must_use]
pub fn anderson_flame_depth(spread_rate: f64, residence_time: f64) -> f64 {
    spread_rate * residence_time
}

/// Byram fire-line intensity (Btu/ft·s) from reaction intensity and flame
/// depth.
#[inline]
#[must_use]
pub fn byram_fire_line_intensity(reaction_intensity: f64, flame_depth: f64) -> f64 {
    reaction_intensity * flame_depth / 60.0
}

/// Byram flame length (ft) from fire-line intensity.
#[inline]
#[must_use]
pub fn byram_flame_length(fire_line_intensity: f64) -> f64 {
    0.45 * fire_line_intensity.max(0.0).powf(0.46)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::fuel_catalog::build_fuel_model;
    use crate::physics::fuel_moisture::FuelMoisture;

    fn grass(moisture_1hr: f64) -> FuelModel {
        let m = FuelMoisture {
            dead_1hr: moisture_1hr,
            dead_10hr: moisture_1hr + 0.01,
            dead_100hr: moisture_1hr + 0.02,
            live_herbaceous: 0.9,
            live_woody: 0.6,
        };
        build_fuel_model(1).unwrap().moisturize(&m)
    }

    #[test]
    fn short_grass_base_rate_is_plausible() {
        let min = rothermel_no_wind_no_slope(&grass(0.06));
        // BehavePlus puts fuel model 1 at roughly 3-6 ft/min with no wind
        assert!(
            min.base_spread_rate > 1.0 && min.base_spread_rate < 10.0,
            "R0 was {}",
            min.base_spread_rate
        );
        assert!(min.reaction_intensity > 100.0, "I_R was {}", min.reaction_intensity);
        // residence time 384/3500 ≈ 0.11 min
        assert!((min.residence_time - 384.0 / 3500.0).abs() < 1e-9);
    }

    #[test]
    fn wet_fuel_does_not_spread() {
        // 1-h moisture above the 12% extinction moisture
        let min = rothermel_no_wind_no_slope(&grass(0.20));
        assert_eq!(min.base_spread_rate, 0.0, "spread past extinction moisture");
    }

    #[test]
    fn moisture_slows_spread() {
        let dry = rothermel_no_wind_no_slope(&grass(0.03));
        let damp = rothermel_no_wind_no_slope(&grass(0.09));
        assert!(
            dry.base_spread_rate > damp.base_spread_rate,
            "dry {} !> damp {}",
            dry.base_spread_rate,
            damp.base_spread_rate
        );
    }

    #[test]
    fn wind_accelerates_and_aligns_the_head() {
        let min = rothermel_no_wind_no_slope(&grass(0.06));
        let calm = rothermel_max(&min, 0.0, 0.0, 0.0, 0.0, 1.0);
        // wind from the west blows the head east (azimuth 90)
        let windy = rothermel_max(&min, 300.0, 270.0, 0.0, 0.0, 1.0);
        assert!(windy.max_spread_rate > 2.0 * calm.max_spread_rate);
        assert!(
            azimuth_difference(windy.max_spread_direction, 90.0) < 1.0,
            "head at {}",
            windy.max_spread_direction
        );
        assert!(windy.eccentricity > 0.0 && windy.eccentricity < 1.0);
        assert_eq!(calm.eccentricity, 0.0);
    }

    #[test]
    fn slope_pushes_the_head_upslope() {
        let min = rothermel_no_wind_no_slope(&grass(0.06));
        // aspect 180 (south-facing) puts upslope at azimuth 0
        let sloped = rothermel_max(&min, 0.0, 0.0, 0.4, 180.0, 1.0);
        assert!(sloped.max_spread_rate > min.base_spread_rate);
        assert!(
            azimuth_difference(sloped.max_spread_direction, 0.0) < 1.0,
            "head at {}",
            sloped.max_spread_direction
        );
    }

    #[test]
    fn flank_spread_is_slower_than_head() {
        let min = rothermel_no_wind_no_slope(&grass(0.06));
        let max = rothermel_max(&min, 300.0, 270.0, 0.0, 0.0, 1.0);
        let head = rothermel_any(&max, max.max_spread_direction);
        let flank = rothermel_any(&max, max.max_spread_direction + 90.0);
        let back = rothermel_any(&max, max.max_spread_direction + 180.0);
        assert!((head - max.max_spread_rate).abs() < 1e-9);
        assert!(flank < head);
        assert!(back < flank);
        assert!(back > 0.0);
    }

    #[test]
    fn ellipse_adjustment_stretches_the_ellipse() {
        let min = rothermel_no_wind_no_slope(&grass(0.06));
        let round = rothermel_max(&min, 300.0, 270.0, 0.0, 0.0, 0.5);
        let long = rothermel_max(&min, 300.0, 270.0, 0.0, 0.0, 2.0);
        assert!(long.eccentricity > round.eccentricity);
    }

    #[test]
    fn waf_sheltered_is_smaller_than_open() {
        let open = wind_adjustment_factor(1.0, 0.0, 0.0);
        let sheltered = wind_adjustment_factor(1.0, 60.0, 70.0);
        assert!(open > 0.0 && open < 1.0, "open WAF {open}");
        assert!(sheltered < open, "sheltered {sheltered} !< open {open}");
    }

    #[test]
    fn byram_chain() {
        let min = rothermel_no_wind_no_slope(&grass(0.06));
        let depth = anderson_flame_depth(min.base_spread_rate, min.residence_time);
        let intensity = byram_fire_line_intensity(min.reaction_intensity, depth);
        let flame = byram_flame_length(intensity);
        assert!(intensity > 0.0);
        assert!(flame > 0.0 && flame < 10.0, "flame length {flame} ft");
        assert_eq!(byram_flame_length(-5.0), 0.0);
    }

    #[test]
    fn inert_fuel_yields_inert_info() {
        let nb = build_fuel_model(91).unwrap();
        let min = rothermel_no_wind_no_slope(&nb);
        assert_eq!(min.base_spread_rate, 0.0);
        let max = rothermel_max(&min, 500.0, 0.0, 1.0, 0.0, 1.0);
        assert_eq!(max.max_spread_rate, 0.0);
        assert_eq!(rothermel_any(&max, 45.0), 0.0);
    }
}
