//! Static surface fuel model catalog.
//!
//! Anderson's 13 original models (1–13), the reserved non-burnable codes
//! (91–99), and Scott & Burgan's 40 (101–204). Loadings are tabulated in
//! tons/acre and converted to lb/ft² on construction; extinction moisture
//! is tabulated in percent and converted to a fraction.
//!
//! # References
//! - Anderson, H.E. (1982). "Aids to determining fuel models for estimating
//!   fire behavior." USDA Forest Service INT-122.
//! - Scott, J.H., Burgan, R.E. (2005). "Standard fire behavior fuel models."
//!   USDA Forest Service RMRS-GTR-153.

use crate::physics::fuel::{
    FuelClass, FuelModel, LB_FT2_PER_TON_ACRE, SAV_100HR, SAV_10HR,
};

/// One catalog row: number, code, name, depth (ft), dead extinction
/// moisture (%), dead/live heat content (Btu/lb), dynamic flag, loadings
/// (tons/acre: 1-h, 10-h, 100-h, live herbaceous, live woody), SAV
/// (ft²/ft³: dead 1-h, live herbaceous, live woody).
type Row = (
    u16,
    &'static str,
    &'static str,
    f64,
    f64,
    f64,
    f64,
    bool,
    [f64; 5],
    [f64; 3],
);

#[rustfmt::skip]
const CATALOG: &[Row] = &[
    // Anderson 13 (all static, heat 8000)
    (1,  "FM1",  "Short grass",                      1.0, 12.0, 8000.0, 8000.0, false, [0.74, 0.00, 0.00, 0.00, 0.00], [3500.0,    0.0,    0.0]),
    (2,  "FM2",  "Timber grass and understory",      1.0, 15.0, 8000.0, 8000.0, false, [2.00, 1.00, 0.50, 0.50, 0.00], [3000.0, 1500.0,    0.0]),
    (3,  "FM3",  "Tall grass",                       2.5, 25.0, 8000.0, 8000.0, false, [3.01, 0.00, 0.00, 0.00, 0.00], [1500.0,    0.0,    0.0]),
    (4,  "FM4",  "Chaparral",                        6.0, 20.0, 8000.0, 8000.0, false, [5.01, 4.01, 2.00, 0.00, 5.01], [2000.0,    0.0, 1500.0]),
    (5,  "FM5",  "Brush",                            2.0, 20.0, 8000.0, 8000.0, false, [1.00, 0.50, 0.00, 0.00, 2.00], [2000.0,    0.0, 1500.0]),
    (6,  "FM6",  "Dormant brush, hardwood slash",    2.5, 25.0, 8000.0, 8000.0, false, [1.50, 2.50, 2.00, 0.00, 0.00], [1750.0,    0.0,    0.0]),
    (7,  "FM7",  "Southern rough",                   2.5, 40.0, 8000.0, 8000.0, false, [1.13, 1.87, 1.50, 0.00, 0.37], [1750.0,    0.0, 1550.0]),
    (8,  "FM8",  "Closed timber litter",             0.2, 30.0, 8000.0, 8000.0, false, [1.50, 1.00, 2.50, 0.00, 0.00], [2000.0,    0.0,    0.0]),
    (9,  "FM9",  "Hardwood litter",                  0.2, 25.0, 8000.0, 8000.0, false, [2.92, 0.41, 0.15, 0.00, 0.00], [2500.0,    0.0,    0.0]),
    (10, "FM10", "Timber litter and understory",     1.0, 25.0, 8000.0, 8000.0, false, [3.01, 2.00, 5.01, 0.00, 2.00], [2000.0,    0.0, 1500.0]),
    (11, "FM11", "Light logging slash",              1.0, 15.0, 8000.0, 8000.0, false, [1.50, 4.51, 5.51, 0.00, 0.00], [1500.0,    0.0,    0.0]),
    (12, "FM12", "Medium logging slash",             2.3, 20.0, 8000.0, 8000.0, false, [4.01, 14.03, 16.53, 0.00, 0.00], [1500.0,   0.0,    0.0]),
    (13, "FM13", "Heavy logging slash",              3.0, 25.0, 8000.0, 8000.0, false, [7.01, 23.04, 28.05, 0.00, 0.00], [1500.0,   0.0,    0.0]),
    // Reserved non-burnable codes
    (91, "NB1",  "Urban or developed",               0.0,  0.0, 8000.0, 8000.0, false, [0.00, 0.00, 0.00, 0.00, 0.00], [   0.0,    0.0,    0.0]),
    (92, "NB2",  "Snow or ice",                      0.0,  0.0, 8000.0, 8000.0, false, [0.00, 0.00, 0.00, 0.00, 0.00], [   0.0,    0.0,    0.0]),
    (93, "NB3",  "Agricultural",                     0.0,  0.0, 8000.0, 8000.0, false, [0.00, 0.00, 0.00, 0.00, 0.00], [   0.0,    0.0,    0.0]),
    (98, "NB8",  "Open water",                       0.0,  0.0, 8000.0, 8000.0, false, [0.00, 0.00, 0.00, 0.00, 0.00], [   0.0,    0.0,    0.0]),
    (99, "NB9",  "Bare ground",                      0.0,  0.0, 8000.0, 8000.0, false, [0.00, 0.00, 0.00, 0.00, 0.00], [   0.0,    0.0,    0.0]),
    // Scott & Burgan 40: grass
    (101, "GR1", "Short, sparse dry climate grass",  0.4, 15.0, 8000.0, 8000.0, true,  [0.10, 0.00, 0.00, 0.30, 0.00], [2200.0, 2000.0,    0.0]),
    (102, "GR2", "Low load dry climate grass",       1.0, 15.0, 8000.0, 8000.0, true,  [0.10, 0.00, 0.00, 1.00, 0.00], [2000.0, 1800.0,    0.0]),
    (103, "GR3", "Low load very coarse humid grass", 2.0, 30.0, 8000.0, 8000.0, true,  [0.10, 0.40, 0.00, 1.50, 0.00], [1500.0, 1300.0,    0.0]),
    (104, "GR4", "Moderate load dry climate grass",  2.0, 15.0, 8000.0, 8000.0, true,  [0.25, 0.00, 0.00, 1.90, 0.00], [2000.0, 1800.0,    0.0]),
    (105, "GR5", "Low load humid climate grass",     1.5, 40.0, 8000.0, 8000.0, true,  [0.40, 0.00, 0.00, 2.50, 0.00], [1800.0, 1600.0,    0.0]),
    (106, "GR6", "Moderate load humid grass",        1.5, 40.0, 9000.0, 9000.0, true,  [0.10, 0.00, 0.00, 3.40, 0.00], [2200.0, 2000.0,    0.0]),
    (107, "GR7", "High load dry climate grass",      3.0, 15.0, 8000.0, 8000.0, true,  [1.00, 0.00, 0.00, 5.40, 0.00], [2000.0, 1800.0,    0.0]),
    (108, "GR8", "High load very coarse humid grass",4.0, 30.0, 8000.0, 8000.0, true,  [0.50, 1.00, 0.00, 7.30, 0.00], [1500.0, 1300.0,    0.0]),
    (109, "GR9", "Very high load humid grass",       5.0, 40.0, 8000.0, 8000.0, true,  [1.00, 1.00, 0.00, 9.00, 0.00], [1800.0, 1600.0,    0.0]),
    // grass-shrub
    (121, "GS1", "Low load dry climate grass-shrub", 0.9, 15.0, 8000.0, 8000.0, true,  [0.20, 0.00, 0.00, 0.50, 0.65], [2000.0, 1800.0, 1800.0]),
    (122, "GS2", "Moderate load dry grass-shrub",    1.5, 15.0, 8000.0, 8000.0, true,  [0.50, 0.50, 0.00, 0.60, 1.00], [2000.0, 1800.0, 1800.0]),
    (123, "GS3", "Moderate load humid grass-shrub",  1.8, 40.0, 8000.0, 8000.0, true,  [0.30, 0.25, 0.00, 1.45, 1.25], [1800.0, 1600.0, 1600.0]),
    (124, "GS4", "High load humid grass-shrub",      2.1, 40.0, 8000.0, 8000.0, true,  [1.90, 0.30, 0.10, 3.40, 7.10], [1800.0, 1600.0, 1600.0]),
    // shrub
    (141, "SH1", "Low load dry climate shrub",       1.0, 15.0, 8000.0, 8000.0, true,  [0.25, 0.25, 0.00, 0.15, 1.30], [2000.0, 1800.0, 1600.0]),
    (142, "SH2", "Moderate load dry climate shrub",  1.0, 15.0, 8000.0, 8000.0, false, [1.35, 2.40, 0.75, 0.00, 3.85], [2000.0,    0.0, 1600.0]),
    (143, "SH3", "Moderate load humid climate shrub",2.4, 40.0, 8000.0, 8000.0, false, [0.45, 3.00, 0.00, 0.00, 6.20], [1600.0,    0.0, 1400.0]),
    (144, "SH4", "Low load humid climate timber-shrub", 3.0, 30.0, 8000.0, 8000.0, false, [0.85, 1.15, 0.20, 0.00, 2.55], [2000.0, 1800.0, 1600.0]),
    (145, "SH5", "High load dry climate shrub",      6.0, 15.0, 8000.0, 8000.0, false, [3.60, 2.10, 0.00, 0.00, 2.90], [ 750.0,    0.0, 1600.0]),
    (146, "SH6", "Low load humid climate shrub",     2.0, 30.0, 8000.0, 8000.0, false, [2.90, 1.45, 0.00, 0.00, 1.40], [ 750.0,    0.0, 1600.0]),
    (147, "SH7", "Very high load dry climate shrub", 6.0, 15.0, 8000.0, 8000.0, false, [3.50, 5.30, 2.20, 0.00, 3.40], [ 750.0,    0.0, 1600.0]),
    (148, "SH8", "High load humid climate shrub",    3.0, 40.0, 8000.0, 8000.0, false, [2.05, 3.40, 0.85, 0.00, 4.35], [ 750.0,    0.0, 1600.0]),
    (149, "SH9", "Very high load humid shrub",       4.4, 40.0, 8000.0, 8000.0, true,  [4.50, 2.45, 0.00, 1.55, 7.00], [ 750.0, 1800.0, 1500.0]),
    // timber-understory
    (161, "TU1", "Low load dry climate timber-grass-shrub", 0.6, 20.0, 8000.0, 8000.0, true, [0.20, 0.90, 1.50, 0.20, 0.90], [2000.0, 1800.0, 1600.0]),
    (162, "TU2", "Moderate load humid timber-shrub", 1.0, 30.0, 8000.0, 8000.0, false, [0.95, 1.80, 1.25, 0.00, 0.20], [2000.0,    0.0, 1600.0]),
    (163, "TU3", "Moderate load humid timber-grass-shrub", 1.3, 30.0, 8000.0, 8000.0, true, [1.10, 0.15, 0.25, 0.65, 1.10], [1800.0, 1600.0, 1400.0]),
    (164, "TU4", "Dwarf conifer with understory",    0.5, 12.0, 8000.0, 8000.0, false, [4.50, 0.00, 0.00, 0.00, 2.00], [2300.0,    0.0, 2000.0]),
    (165, "TU5", "Very high load dry climate timber-shrub", 1.0, 25.0, 8000.0, 8000.0, false, [4.00, 4.00, 3.00, 0.00, 3.00], [1500.0, 0.0, 750.0]),
    // timber litter
    (181, "TL1", "Low load compact conifer litter",  0.2, 30.0, 8000.0, 8000.0, false, [1.00, 2.20, 3.60, 0.00, 0.00], [2000.0,    0.0,    0.0]),
    (182, "TL2", "Low load broadleaf litter",        0.2, 25.0, 8000.0, 8000.0, false, [1.40, 2.30, 2.20, 0.00, 0.00], [2000.0,    0.0,    0.0]),
    (183, "TL3", "Moderate load conifer litter",     0.3, 20.0, 8000.0, 8000.0, false, [0.50, 2.20, 2.80, 0.00, 0.00], [2000.0,    0.0,    0.0]),
    (184, "TL4", "Small downed logs",                0.4, 25.0, 8000.0, 8000.0, false, [0.50, 1.50, 4.20, 0.00, 0.00], [2000.0,    0.0,    0.0]),
    (185, "TL5", "High load conifer litter",         0.6, 25.0, 8000.0, 8000.0, false, [1.15, 2.50, 4.40, 0.00, 0.00], [2000.0,    0.0,    0.0]),
    (186, "TL6", "Moderate load broadleaf litter",   0.3, 25.0, 8000.0, 8000.0, false, [2.40, 1.20, 1.20, 0.00, 0.00], [2000.0,    0.0,    0.0]),
    (187, "TL7", "Large downed logs",                0.4, 25.0, 8000.0, 8000.0, false, [0.30, 1.40, 8.10, 0.00, 0.00], [2000.0,    0.0,    0.0]),
    (188, "TL8", "Long-needle litter",               0.3, 35.0, 8000.0, 8000.0, false, [5.80, 1.40, 1.10, 0.00, 0.00], [1800.0,    0.0,    0.0]),
    (189, "TL9", "Very high load broadleaf litter",  0.6, 35.0, 8000.0, 8000.0, false, [6.65, 3.30, 4.15, 0.00, 0.00], [1800.0,    0.0,    0.0]),
    // slash-blowdown
    (201, "SB1", "Low load activity fuel",           1.0, 25.0, 8000.0, 8000.0, false, [1.50, 3.00, 11.00, 0.00, 0.00], [2000.0,   0.0,    0.0]),
    (202, "SB2", "Moderate load activity fuel",      1.0, 25.0, 8000.0, 8000.0, false, [4.50, 4.25, 4.00, 0.00, 0.00], [2000.0,    0.0,    0.0]),
    (203, "SB3", "High load activity fuel",          1.2, 25.0, 8000.0, 8000.0, false, [5.50, 2.75, 3.00, 0.00, 0.00], [2000.0,    0.0,    0.0]),
    (204, "SB4", "High load blowdown",               2.7, 25.0, 8000.0, 8000.0, false, [5.25, 3.50, 5.25, 0.00, 0.00], [2000.0,    0.0,    0.0]),
];

/// Build the fuel model for a catalog number, or `None` when the number is
/// not defined. Moistures start at zero; run
/// [`FuelModel::moisturize`](crate::physics::fuel::FuelModel::moisturize)
/// before any spread calculation.
#[must_use]
pub fn build_fuel_model(number: u16) -> Option<FuelModel> {
    let &(num, code, name, depth, mx_dead_pct, heat_dead, heat_live, dynamic, loads, savs) =
        CATALOG.iter().find(|row| row.0 == number)?;
    let to_load = |tons_acre: f64| tons_acre * LB_FT2_PER_TON_ACRE;
    Some(FuelModel {
        number: num,
        code,
        name,
        depth,
        mx_dead: mx_dead_pct / 100.0,
        heat_dead,
        heat_live,
        dynamic,
        dead: [
            FuelClass::new(to_load(loads[0]), savs[0]),
            FuelClass::new(to_load(loads[1]), SAV_10HR),
            FuelClass::new(to_load(loads[2]), SAV_100HR),
            // dynamic transfer fills this slot at moisturize time
            FuelClass::new(0.0, savs[1]),
        ],
        live: [
            FuelClass::new(to_load(loads[3]), savs[1]),
            FuelClass::new(to_load(loads[4]), savs[2]),
        ],
    })
}

/// Burnability of a raw fuel-model layer value: burnable iff it falls in
/// (0, 91) ∪ (99, 257). The reserved codes 91–99, zero and negative values,
/// and the nodata sentinels rasters tend to carry are barriers. A burnable
/// code with no catalog coefficients still produces no spread (its cells
/// can ignite but emit no trajectories).
#[must_use]
pub fn is_burnable_fuel_number(value: f64) -> bool {
    value.is_finite()
        && ((value > 0.0 && value < 91.0) || (value > 99.0 && value < 257.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::fuel::{DEAD_1HR, LIVE_HERBACEOUS};

    #[test]
    fn catalog_has_the_expected_families() {
        assert_eq!(CATALOG.iter().filter(|r| r.0 <= 13).count(), 13);
        assert_eq!(CATALOG.iter().filter(|r| (91..=99).contains(&r.0)).count(), 5);
        assert_eq!(CATALOG.iter().filter(|r| r.0 >= 101).count(), 40);
    }

    #[test]
    fn catalog_numbers_are_unique() {
        let mut numbers: Vec<u16> = CATALOG.iter().map(|r| r.0).collect();
        numbers.sort_unstable();
        numbers.dedup();
        assert_eq!(numbers.len(), CATALOG.len(), "duplicate catalog number");
    }

    #[test]
    fn short_grass_converts_loading() {
        let fm1 = build_fuel_model(1).unwrap();
        // 0.74 tons/acre
        let expected = 0.74 * LB_FT2_PER_TON_ACRE;
        assert!((fm1.dead[DEAD_1HR].load - expected).abs() < 1e-12);
        assert_eq!(fm1.dead[DEAD_1HR].sav, 3500.0);
        assert_eq!(fm1.mx_dead, 0.12);
        assert!(fm1.burnable());
    }

    #[test]
    fn grass_models_are_dynamic() {
        for n in 101..=109 {
            let fm = build_fuel_model(n).unwrap();
            assert!(fm.dynamic, "{} should be dynamic", fm.code);
            assert!(fm.live[LIVE_HERBACEOUS].load > 0.0);
        }
    }

    #[test]
    fn burnability_of_layer_values() {
        assert!(is_burnable_fuel_number(1.0));
        assert!(is_burnable_fuel_number(102.0));
        assert!(is_burnable_fuel_number(256.0));
        // burnable range even without catalog coefficients
        assert!(is_burnable_fuel_number(57.0));
        assert!(!is_burnable_fuel_number(91.0));
        assert!(!is_burnable_fuel_number(95.0));
        assert!(!is_burnable_fuel_number(99.0));
        assert!(!is_burnable_fuel_number(0.0));
        assert!(!is_burnable_fuel_number(-9999.0));
        assert!(!is_burnable_fuel_number(300.0));
        assert!(!is_burnable_fuel_number(f64::NAN));
    }
}
