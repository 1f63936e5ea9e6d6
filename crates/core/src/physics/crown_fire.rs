//! Crown fire initiation and spread.
//!
//! Van Wagner's critical-intensity threshold decides whether a surface fire
//! reaches the canopy; Cruz's empirical model gives the crown spread rate,
//! with the passive-crowning decay applied below the active-crowning
//! criterion.
//!
//! # References
//! - Van Wagner, C.E. (1977). "Conditions for the start and spread of crown
//!   fire." Canadian Journal of Forest Research, 7(1), 23-34.
//! - Cruz, M.G., Alexander, M.E., Wakimoto, R.H. (2005). "Development and
//!   testing of models for predicting crown fire rate of spread in conifer
//!   forest stands." Canadian Journal of Forest Research, 35(7), 1626-1639.

use crate::core_types::units::{
    feet_to_meters, kw_m_to_btu_ft_s, lb_ft3_to_kg_m3, meters_to_feet, mph_to_km_hr,
};
use serde::{Deserialize, Serialize};

/// Canopy cover (percent) below which a stand cannot carry crown fire.
const MIN_CANOPY_COVER_FOR_CROWNING: f64 = 40.0;

/// 20-ft winds run about 87% of 10-m winds over the same surface.
const WIND_20FT_TO_10M: f64 = 1.0 / 0.87;

/// Van Wagner critical surface intensity (Btu/ft·s) for crown ignition.
///
/// `I_o = (0.010 · CBH · (460 + 25.9 · FMC))^1.5` in kW/m with CBH in
/// meters and foliar moisture in percent.
///
/// # Arguments
/// * `canopy_base_height` - ft
/// * `foliar_moisture` - fraction (e.g. 0.9)
#[must_use]
pub fn van_wagner_critical_intensity(canopy_base_height: f64, foliar_moisture: f64) -> f64 {
    let cbh_m = feet_to_meters(canopy_base_height);
    let fmc_pct = foliar_moisture * 100.0;
    let kw_m = (0.010 * cbh_m * (460.0 + 25.9 * fmc_pct)).powf(1.5);
    kw_m_to_btu_ft_s(kw_m)
}

/// Does the surface fire ignite the canopy?
///
/// Requires a real canopy (positive base height, cover above 40%) and a
/// surface intensity above the Van Wagner threshold.
///
/// # Arguments
/// * `canopy_cover` - percent (0–100)
/// * `canopy_base_height` - ft
/// * `foliar_moisture` - fraction
/// * `surface_intensity` - Btu/ft·s
#[must_use]
pub fn van_wagner_initiation(
    canopy_cover: f64,
    canopy_base_height: f64,
    foliar_moisture: f64,
    surface_intensity: f64,
) -> bool {
    canopy_base_height > 0.0
        && canopy_cover > MIN_CANOPY_COVER_FOR_CROWNING
        && surface_intensity > van_wagner_critical_intensity(canopy_base_height, foliar_moisture)
}

/// Cruz crown fire spread rate (ft/min).
///
/// Active rate `11.02 · U10^0.90 · CBD^0.19 · exp(-0.17 · M)` (m/min) with
/// U10 in km/h, CBD in kg/m³, M the fine dead fuel moisture in percent.
/// Below the active-crowning criterion `R_critical = 3.0 / CBD` the rate
/// decays by `exp(-CAC)` (passive crowning).
///
/// # Arguments
/// * `wind_speed_20ft` - mi/h
/// * `crown_bulk_density` - lb/ft³
/// * `fine_dead_fuel_moisture` - 1-h dead moisture, fraction
#[must_use]
pub fn cruz_crown_spread_rate(
    wind_speed_20ft: f64,
    crown_bulk_density: f64,
    fine_dead_fuel_moisture: f64,
) -> f64 {
    let cbd = lb_ft3_to_kg_m3(crown_bulk_density);
    if cbd <= 0.0 || wind_speed_20ft <= 0.0 {
        return 0.0;
    }
    let u10_km_hr = mph_to_km_hr(wind_speed_20ft * WIND_20FT_TO_10M);
    let moisture_pct = fine_dead_fuel_moisture * 100.0;
    let active = 11.02 * u10_km_hr.powf(0.90) * cbd.powf(0.19) * (-0.17 * moisture_pct).exp();
    let critical = 3.0 / cbd;
    let cac = active / critical;
    let m_per_min = if cac < 1.0 { active * (-cac).exp() } else { active };
    meters_to_feet(m_per_min)
}

/// Eccentricity of the crown fire spread ellipse.
///
/// Crown fires run less elongated than surface fires at the same wind:
/// length/width grows at 0.125 per mi/h of 20-ft wind.
#[must_use]
pub fn crown_fire_eccentricity(wind_speed_20ft: f64, ellipse_adjustment_factor: f64) -> f64 {
    let length_width = 1.0 + 0.125 * wind_speed_20ft.max(0.0) * ellipse_adjustment_factor;
    (length_width * length_width - 1.0).sqrt() / length_width
}

/// Fire-line intensity contributed by the burning canopy (Btu/ft·s).
///
/// Consumes the canopy layer between base height and stand height at the
/// crown spread rate.
///
/// # Arguments
/// * `crown_spread_rate` - ft/min
/// * `crown_bulk_density` - lb/ft³
/// * `canopy_height`, `canopy_base_height` - ft
/// * `heat_content` - Btu/lb of the 1-h dead class
#[must_use]
pub fn crown_fire_line_intensity(
    crown_spread_rate: f64,
    crown_bulk_density: f64,
    canopy_height: f64,
    canopy_base_height: f64,
    heat_content: f64,
) -> f64 {
    let canopy_depth = (canopy_height - canopy_base_height).max(0.0);
    crown_spread_rate * crown_bulk_density * canopy_depth * heat_content / 60.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn critical_intensity_rises_with_base_height_and_moisture() {
        let low = van_wagner_critical_intensity(3.0, 0.8);
        let high = van_wagner_critical_intensity(12.0, 0.8);
        let moist = van_wagner_critical_intensity(3.0, 1.2);
        assert!(high > low, "higher canopy base must need more intensity");
        assert!(moist > low, "wetter foliage must need more intensity");
    }

    #[test]
    fn initiation_requires_canopy() {
        // no canopy base height
        assert!(!van_wagner_initiation(80.0, 0.0, 0.8, 1e6));
        // open stand
        assert!(!van_wagner_initiation(20.0, 3.0, 0.8, 1e6));
        // weak surface fire
        assert!(!van_wagner_initiation(80.0, 3.0, 0.8, 1.0));
        // intense surface fire under a dense low canopy
        assert!(van_wagner_initiation(80.0, 3.0, 0.8, 500.0));
    }

    #[test]
    fn cruz_rate_grows_with_wind() {
        let slow = cruz_crown_spread_rate(10.0, 0.01, 0.06);
        let fast = cruz_crown_spread_rate(30.0, 0.01, 0.06);
        assert!(fast > slow, "slow {slow} !< fast {fast}");
        assert_eq!(cruz_crown_spread_rate(0.0, 0.01, 0.06), 0.0);
        assert_eq!(cruz_crown_spread_rate(10.0, 0.0, 0.06), 0.0);
    }

    #[test]
    fn cruz_passive_decay_below_criterion() {
        // Thin canopy: active rate falls under R_critical and decays
        let cbd_thin = 0.002; // lb/ft³ ≈ 0.032 kg/m³
        let cbd_dense = 0.012;
        let thin = cruz_crown_spread_rate(20.0, cbd_thin, 0.06);
        let dense = cruz_crown_spread_rate(20.0, cbd_dense, 0.06);
        assert!(thin < dense, "thin {thin} !< dense {dense}");
        assert!(thin > 0.0);
    }

    #[test]
    fn crown_ellipse_rounder_than_surface_at_same_wind() {
        let ecc = crown_fire_eccentricity(20.0, 1.0);
        assert!(ecc > 0.0 && ecc < 1.0, "eccentricity {ecc}");
        assert_eq!(crown_fire_eccentricity(0.0, 1.0), 0.0);
    }

    #[test]
    fn crown_intensity_scales_with_canopy_depth() {
        let shallow = crown_fire_line_intensity(50.0, 0.01, 20.0, 15.0, 8000.0);
        let deep = crown_fire_line_intensity(50.0, 0.01, 60.0, 5.0, 8000.0);
        assert!(deep > shallow);
        // degenerate canopy
        assert_eq!(crown_fire_line_intensity(50.0, 0.01, 10.0, 15.0, 8000.0), 0.0);
    }
}
