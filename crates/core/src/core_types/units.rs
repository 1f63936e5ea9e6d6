//! Unit conversions shared by the fire behavior and spotting models.
//!
//! The engine works in the customary wildland-fire units: feet, minutes,
//! miles per hour at 20 ft, degrees Fahrenheit, Btu. The crown fire and
//! spotting sub-models are published in SI, so every crossing between the
//! two systems goes through this module rather than inline literals.

/// Standard gravity (m/s²), used by the firebrand Froude number.
pub const GRAVITY_SI: f64 = 9.81;

/// Feet per meter.
pub const FEET_PER_METER: f64 = 3.280_839_895_013_123;

/// One Btu/(ft·s) of fire-line intensity in kW/m.
pub const KW_PER_M_PER_BTU_FT_S: f64 = 3.46414;

/// Pounds per cubic foot expressed in kg/m³.
pub const KG_PER_M3_PER_LB_FT3: f64 = 16.018_463;

/// mi/h → ft/min. The 88 shows up throughout the surface fire model as the
/// midflame wind conversion.
pub const FPM_PER_MPH: f64 = 88.0;

#[inline]
#[must_use]
pub fn fahrenheit_to_celsius(deg_f: f64) -> f64 {
    (deg_f - 32.0) / 1.8
}

#[inline]
#[must_use]
pub fn fahrenheit_to_kelvin(deg_f: f64) -> f64 {
    fahrenheit_to_celsius(deg_f) + 273.15
}

#[inline]
#[must_use]
pub fn btu_ft_s_to_kw_m(intensity: f64) -> f64 {
    intensity * KW_PER_M_PER_BTU_FT_S
}

#[inline]
#[must_use]
pub fn kw_m_to_btu_ft_s(intensity: f64) -> f64 {
    intensity / KW_PER_M_PER_BTU_FT_S
}

#[inline]
#[must_use]
pub fn mph_to_mps(speed: f64) -> f64 {
    speed * 0.44704
}

#[inline]
#[must_use]
pub fn mph_to_km_hr(speed: f64) -> f64 {
    speed * 1.609_344
}

#[inline]
#[must_use]
pub fn meters_to_feet(length: f64) -> f64 {
    length * FEET_PER_METER
}

#[inline]
#[must_use]
pub fn feet_to_meters(length: f64) -> f64 {
    length / FEET_PER_METER
}

#[inline]
#[must_use]
pub fn lb_ft3_to_kg_m3(density: f64) -> f64 {
    density * KG_PER_M3_PER_LB_FT3
}

#[inline]
#[must_use]
pub fn sec_to_min(seconds: f64) -> f64 {
    seconds / 60.0
}

/// Normalize an azimuth to [0, 360).
#[inline]
#[must_use]
pub fn normalize_azimuth(degrees: f64) -> f64 {
    let d = degrees % 360.0;
    if d < 0.0 {
        d + 360.0
    } else {
        d
    }
}

/// Smallest absolute angle (degrees) between two azimuths, in [0, 180].
#[inline]
#[must_use]
pub fn azimuth_difference(a: f64, b: f64) -> f64 {
    let d = (normalize_azimuth(a) - normalize_azimuth(b)).abs();
    if d > 180.0 {
        360.0 - d
    } else {
        d
    }
}
