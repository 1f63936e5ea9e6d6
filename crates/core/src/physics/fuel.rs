//! Surface fuel model representation.
//!
//! A [`FuelModel`] carries the size-class structure the surface spread
//! model consumes: dead 1-h, 10-h, 100-h particles plus a cured-herbaceous
//! slot, and live herbaceous and woody particles. Loadings are lb/ft²,
//! surface-area-to-volume ratios ft²/ft³, heat contents Btu/lb.
//!
//! Dynamic fuel models (the grass and grass-shrub groups) transfer a cured
//! fraction of the live herbaceous load into the dead herbaceous slot when
//! moisture is applied, following the standard curing rule: fully cured at
//! 30% live herbaceous moisture, uncured at 120%.

use crate::physics::fuel_moisture::FuelMoisture;
use serde::{Deserialize, Serialize};

/// lb/ft² per ton/acre; the catalog stores loadings in tons/acre.
pub const LB_FT2_PER_TON_ACRE: f64 = 2000.0 / 43560.0;

/// Fixed SAV of 10-h dead particles (ft²/ft³).
pub const SAV_10HR: f64 = 109.0;
/// Fixed SAV of 100-h dead particles (ft²/ft³).
pub const SAV_100HR: f64 = 30.0;

/// Oven-dry particle density (lb/ft³).
pub const PARTICLE_DENSITY: f64 = 32.0;
/// Total mineral content (fraction).
pub const TOTAL_MINERAL_CONTENT: f64 = 0.0555;
/// Effective (silica-free) mineral content (fraction).
pub const EFFECTIVE_MINERAL_CONTENT: f64 = 0.010;

/// One size class of fuel particles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FuelClass {
    /// Oven-dry loading (lb/ft²).
    pub load: f64,
    /// Surface-area-to-volume ratio (ft²/ft³).
    pub sav: f64,
    /// Moisture content (fraction); zero until `moisturize` runs.
    pub moisture: f64,
}

impl FuelClass {
    #[must_use]
    pub fn new(load: f64, sav: f64) -> Self {
        Self {
            load,
            sav,
            moisture: 0.0,
        }
    }

    /// Does this class contribute to the fuel bed at all?
    #[inline]
    #[must_use]
    pub fn present(&self) -> bool {
        self.load > 0.0 && self.sav > 0.0
    }
}

/// Indexes into [`FuelModel::dead`].
pub const DEAD_1HR: usize = 0;
pub const DEAD_10HR: usize = 1;
pub const DEAD_100HR: usize = 2;
/// Cured herbaceous load lands here for dynamic models.
pub const DEAD_HERBACEOUS: usize = 3;

/// Indexes into [`FuelModel::live`].
pub const LIVE_HERBACEOUS: usize = 0;
pub const LIVE_WOODY: usize = 1;

/// A complete surface fuel model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuelModel {
    /// Catalog number (1–256; 91–99 reserved non-burnable).
    pub number: u16,
    /// Short code, e.g. `GR2` or `FM10`.
    pub code: &'static str,
    pub name: &'static str,
    /// Fuel bed depth δ (ft).
    pub depth: f64,
    /// Dead fuel extinction moisture (fraction).
    pub mx_dead: f64,
    /// Heat content of dead particles (Btu/lb).
    pub heat_dead: f64,
    /// Heat content of live particles (Btu/lb).
    pub heat_live: f64,
    /// Live herbaceous load cures into the dead herbaceous slot.
    pub dynamic: bool,
    /// Dead classes: 1-h, 10-h, 100-h, cured herbaceous.
    pub dead: [FuelClass; 4],
    /// Live classes: herbaceous, woody.
    pub live: [FuelClass; 2],
}

impl FuelModel {
    /// A model burns if it carries any fuel and is not a reserved
    /// non-burnable code.
    #[must_use]
    pub fn burnable(&self) -> bool {
        if (91..=99).contains(&self.number) {
            return false;
        }
        let dead: f64 = self.dead.iter().map(|c| c.load).sum();
        let live: f64 = self.live.iter().map(|c| c.load).sum();
        dead + live > 0.0
    }

    /// Fraction of the live herbaceous load that has cured, from its
    /// moisture content: 1 at ≤30%, 0 at ≥120%, linear between.
    #[must_use]
    pub fn fraction_cured(live_herbaceous_moisture: f64) -> f64 {
        ((1.20 - live_herbaceous_moisture) / 0.90).clamp(0.0, 1.0)
    }

    /// Populate class moistures, applying the dynamic curing transfer.
    ///
    /// The returned model is what the spread calculations consume; the
    /// receiver is left untouched so catalog models stay pristine.
    #[must_use]
    pub fn moisturize(&self, moisture: &FuelMoisture) -> FuelModel {
        let mut fm = self.clone();

        fm.dead[DEAD_1HR].moisture = moisture.dead_1hr;
        fm.dead[DEAD_10HR].moisture = moisture.dead_10hr;
        fm.dead[DEAD_100HR].moisture = moisture.dead_100hr;
        // Cured herbaceous fuel is fine and dries like 1-h dead fuel.
        fm.dead[DEAD_HERBACEOUS].moisture = moisture.dead_1hr;
        fm.live[LIVE_HERBACEOUS].moisture = moisture.live_herbaceous;
        fm.live[LIVE_WOODY].moisture = moisture.live_woody;

        if fm.dynamic && fm.live[LIVE_HERBACEOUS].load > 0.0 {
            let cured = Self::fraction_cured(moisture.live_herbaceous);
            let herb_load = fm.live[LIVE_HERBACEOUS].load;
            fm.dead[DEAD_HERBACEOUS].load = cured * herb_load;
            fm.dead[DEAD_HERBACEOUS].sav = fm.live[LIVE_HERBACEOUS].sav;
            fm.live[LIVE_HERBACEOUS].load = (1.0 - cured) * herb_load;
        }

        fm
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::fuel_catalog::build_fuel_model;

    fn moisture(d1: f64, herb: f64) -> FuelMoisture {
        FuelMoisture {
            dead_1hr: d1,
            dead_10hr: d1 + 0.01,
            dead_100hr: d1 + 0.02,
            live_herbaceous: herb,
            live_woody: 0.9,
        }
    }

    #[test]
    fn curing_fraction_endpoints() {
        assert_eq!(FuelModel::fraction_cured(0.30), 1.0);
        assert_eq!(FuelModel::fraction_cured(1.20), 0.0);
        let half = FuelModel::fraction_cured(0.75);
        assert!((half - 0.5).abs() < 1e-12, "mid-cure was {half}");
    }

    #[test]
    fn dynamic_model_transfers_cured_load() {
        let gr2 = build_fuel_model(102).expect("GR2 in catalog");
        let total_before =
            gr2.live[LIVE_HERBACEOUS].load + gr2.dead[DEAD_HERBACEOUS].load;
        let wet = gr2.moisturize(&moisture(0.06, 0.75));
        let total_after =
            wet.live[LIVE_HERBACEOUS].load + wet.dead[DEAD_HERBACEOUS].load;
        assert!((total_before - total_after).abs() < 1e-12, "load not conserved");
        assert!(wet.dead[DEAD_HERBACEOUS].load > 0.0);
        assert_eq!(wet.dead[DEAD_HERBACEOUS].sav, gr2.live[LIVE_HERBACEOUS].sav);
        // cured herbaceous fuel dries like 1-h dead fuel
        assert_eq!(wet.dead[DEAD_HERBACEOUS].moisture, 0.06);
    }

    #[test]
    fn static_model_keeps_live_load() {
        let fm10 = build_fuel_model(10).expect("model 10 in catalog");
        let wet = fm10.moisturize(&moisture(0.06, 0.75));
        assert_eq!(wet.dead[DEAD_HERBACEOUS].load, 0.0);
        assert_eq!(wet.live[LIVE_WOODY].load, fm10.live[LIVE_WOODY].load);
    }

    #[test]
    fn non_burnable_codes_never_burn() {
        for n in [91u16, 92, 93, 98, 99] {
            let fm = build_fuel_model(n).expect("non-burnable entry present");
            assert!(!fm.burnable(), "model {n} must not burn");
        }
    }
}
