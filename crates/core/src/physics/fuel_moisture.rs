//! Fuel moisture from ambient weather.
//!
//! Dead and live fuel moistures are derived from the equilibrium moisture
//! content of fine fuel, itself a piecewise empirical function of relative
//! humidity and air temperature.
//!
//! # References
//! - Simard, A.J. (1968). "The moisture content of forest fuels — a review
//!   of the basic concepts." Canada Dept. of Forestry FF-X-14.
//! - Schroeder, M.J., Buck, C.C. (1970). "Fire weather." USDA Handbook 360.

use serde::{Deserialize, Serialize};

/// Moisture contents (fractions) for the five size classes the surface
/// model tracks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FuelMoisture {
    pub dead_1hr: f64,
    pub dead_10hr: f64,
    pub dead_100hr: f64,
    pub live_herbaceous: f64,
    pub live_woody: f64,
}

impl FuelMoisture {
    /// Quantized key for memoization: each component rounded to 4 decimal
    /// places so float jitter between samples does not bust the cache.
    #[must_use]
    pub fn fingerprint(&self) -> [i32; 5] {
        let q = |m: f64| (m * 1.0e4).round() as i32;
        [
            q(self.dead_1hr),
            q(self.dead_10hr),
            q(self.dead_100hr),
            q(self.live_herbaceous),
            q(self.live_woody),
        ]
    }
}

/// Equilibrium moisture content (fraction) of fine dead fuel.
///
/// Simard's three humidity branches, then divided by 30 to land in
/// moisture-fraction space.
///
/// # Arguments
/// * `relative_humidity` - percent (0–100)
/// * `temperature` - °F
#[must_use]
pub fn equilibrium_moisture_content(relative_humidity: f64, temperature: f64) -> f64 {
    let rh = relative_humidity;
    let t = temperature;
    let emc = if rh < 10.0 {
        0.03 + 0.2626 * rh - 0.00104 * rh * t
    } else if rh < 50.0 {
        1.76 + 0.1601 * rh - 0.0266 * t
    } else {
        21.06 - 0.4944 * rh + 0.005565 * rh * rh - 0.00063 * rh * t
    };
    (emc / 30.0).max(0.0)
}

/// Moisture for every size class from the sampled weather.
///
/// Dead classes add fixed timelag offsets to the equilibrium value; live
/// classes scale it.
#[must_use]
pub fn fuel_moisture(relative_humidity: f64, temperature: f64) -> FuelMoisture {
    let emc = equilibrium_moisture_content(relative_humidity, temperature);
    FuelMoisture {
        dead_1hr: emc + 0.002,
        dead_10hr: emc + 0.015,
        dead_100hr: emc + 0.025,
        live_herbaceous: emc * 2.0,
        live_woody: emc * 0.5,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emc_increases_with_humidity() {
        let t = 70.0;
        let dry = equilibrium_moisture_content(5.0, t);
        let mid = equilibrium_moisture_content(30.0, t);
        let damp = equilibrium_moisture_content(80.0, t);
        assert!(dry < mid, "dry {dry} !< mid {mid}");
        assert!(mid < damp, "mid {mid} !< damp {damp}");
    }

    #[test]
    fn emc_decreases_with_temperature() {
        let warm = equilibrium_moisture_content(30.0, 90.0);
        let cool = equilibrium_moisture_content(30.0, 40.0);
        assert!(warm < cool, "warm {warm} !< cool {cool}");
    }

    #[test]
    fn dead_classes_order_by_timelag() {
        let m = fuel_moisture(20.0, 70.0);
        assert!(m.dead_1hr < m.dead_10hr);
        assert!(m.dead_10hr < m.dead_100hr);
        assert!(m.live_woody < m.live_herbaceous);
    }

    #[test]
    fn fingerprint_is_stable_under_tiny_jitter() {
        let a = fuel_moisture(20.0, 70.0);
        let mut b = a;
        b.dead_1hr += 1.0e-6;
        assert_eq!(a.fingerprint(), b.fingerprint());
        b.dead_1hr += 1.0e-3;
        assert_ne!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn branch_boundaries_stay_positive_and_sane() {
        for rh in [0.0, 9.9, 10.0, 49.9, 50.0, 100.0] {
            for t in [0.0, 40.0, 70.0, 110.0] {
                let m = equilibrium_moisture_content(rh, t);
                assert!((0.0..1.5).contains(&m), "emc({rh}, {t}) = {m}");
            }
        }
    }
}
