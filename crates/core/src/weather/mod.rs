//! Weather inputs and the per-cell sampler.
//!
//! Each weather variable is either a scalar for the whole run or an hourly
//! raster stack, possibly coarser than the landscape grid. The spread
//! kernel never touches rasters directly; it asks [`extract_constants`] for
//! the bundle of per-cell, per-clock values it needs, with perturbations
//! already applied.

pub mod perturbation;

use crate::core_types::raster::{CellIndex, RasterStack};
use crate::core_types::units::normalize_azimuth;
use crate::core_types::Landscape;
use crate::error::{Error, Result};
use perturbation::{PerturbationSet, PerturbedLayer};
use serde::{Deserialize, Serialize};

/// One weather variable: fixed for the run, or sampled from an hourly
/// stack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WeatherInput {
    Scalar(f64),
    Raster(RasterStack),
}

impl WeatherInput {
    /// Value at a landscape cell and simulation minute. Raster inputs map
    /// through their resolution multiplier and hourly band selection.
    #[must_use]
    pub fn sample_at(&self, cell: CellIndex, global_clock: f64) -> f64 {
        match self {
            WeatherInput::Scalar(v) => *v,
            WeatherInput::Raster(stack) => stack.sample(cell, global_clock),
        }
    }

    fn validate(&self, name: &'static str) -> Result<()> {
        match self {
            WeatherInput::Scalar(v) if !v.is_finite() => Err(Error::NonFiniteValue {
                layer: name,
                row: 0,
                col: 0,
            }),
            WeatherInput::Scalar(_) => Ok(()),
            WeatherInput::Raster(stack) => stack.ensure_finite(name),
        }
    }
}

/// The four weather variables the engine consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherInputs {
    /// °F
    pub temperature: WeatherInput,
    /// percent (0–100)
    pub relative_humidity: WeatherInput,
    /// mi/h at 20 ft
    pub wind_speed_20ft: WeatherInput,
    /// degrees clockwise from north
    pub wind_from_direction: WeatherInput,
}

impl WeatherInputs {
    /// Scalar weather for the whole run.
    #[must_use]
    pub fn constant(
        temperature: f64,
        relative_humidity: f64,
        wind_speed_20ft: f64,
        wind_from_direction: f64,
    ) -> Self {
        Self {
            temperature: WeatherInput::Scalar(temperature),
            relative_humidity: WeatherInput::Scalar(relative_humidity),
            wind_speed_20ft: WeatherInput::Scalar(wind_speed_20ft),
            wind_from_direction: WeatherInput::Scalar(wind_from_direction),
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.temperature.validate("temperature")?;
        self.relative_humidity.validate("relative_humidity")?;
        self.wind_speed_20ft.validate("wind_speed_20ft")?;
        self.wind_from_direction.validate("wind_from_direction")?;
        Ok(())
    }
}

/// Everything the spread kernel needs to know about one cell at one
/// simulation minute.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SiteConstants {
    pub slope: f64,
    pub aspect: f64,
    pub fuel_model_number: f64,
    pub canopy_height: f64,
    pub canopy_base_height: f64,
    pub crown_bulk_density: f64,
    pub canopy_cover: f64,
    pub temperature: f64,
    pub relative_humidity: f64,
    pub wind_speed_20ft: f64,
    pub wind_from_direction: f64,
}

/// Sample the landscape and weather at `cell`, applying any configured
/// perturbations, and clamp each value back into its physical domain.
#[must_use]
pub fn extract_constants(
    landscape: &Landscape,
    weather: &WeatherInputs,
    perturbations: &PerturbationSet,
    global_clock: f64,
    cell: CellIndex,
) -> SiteConstants {
    let p = |layer: PerturbedLayer| perturbations.offset(layer, cell, global_clock);

    let temperature =
        weather.temperature.sample_at(cell, global_clock) + p(PerturbedLayer::Temperature);
    let relative_humidity = (weather.relative_humidity.sample_at(cell, global_clock)
        + p(PerturbedLayer::RelativeHumidity))
    .clamp(0.0, 100.0);
    let wind_speed_20ft = (weather.wind_speed_20ft.sample_at(cell, global_clock)
        + p(PerturbedLayer::WindSpeed20ft))
    .max(0.0);
    let wind_from_direction = normalize_azimuth(
        weather.wind_from_direction.sample_at(cell, global_clock)
            + p(PerturbedLayer::WindFromDirection),
    );

    SiteConstants {
        slope: landscape.slope.at(cell).max(0.0),
        aspect: normalize_azimuth(landscape.aspect.at(cell)),
        fuel_model_number: landscape.fuel_model.at(cell),
        canopy_height: (landscape.canopy_height.at(cell) + p(PerturbedLayer::CanopyHeight))
            .max(0.0),
        canopy_base_height: (landscape.canopy_base_height.at(cell)
            + p(PerturbedLayer::CanopyBaseHeight))
        .max(0.0),
        crown_bulk_density: (landscape.crown_bulk_density.at(cell)
            + p(PerturbedLayer::CrownBulkDensity))
        .max(0.0),
        canopy_cover: (landscape.canopy_cover.at(cell) + p(PerturbedLayer::CanopyCover))
            .clamp(0.0, 100.0),
        temperature,
        relative_humidity,
        wind_speed_20ft,
        wind_from_direction,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::raster::Grid2D;
    use crate::weather::perturbation::{Perturbation, SpatialType};
    use std::collections::BTreeMap;

    #[test]
    fn scalar_weather_ignores_position_and_time() {
        let w = WeatherInput::Scalar(68.0);
        assert_eq!(w.sample_at(CellIndex::new(0, 0), 0.0), 68.0);
        assert_eq!(w.sample_at(CellIndex::new(9, 9), 300.0), 68.0);
    }

    #[test]
    fn raster_weather_tracks_bands() {
        let stack = RasterStack::new(
            vec![Grid2D::filled(2, 2, 50.0), Grid2D::filled(2, 2, 70.0)],
            1,
        )
        .unwrap();
        let w = WeatherInput::Raster(stack);
        assert_eq!(w.sample_at(CellIndex::new(1, 1), 30.0), 50.0);
        assert_eq!(w.sample_at(CellIndex::new(1, 1), 90.0), 70.0);
    }

    #[test]
    fn non_finite_raster_band_fails_validation() {
        let mut band = Grid2D::filled(2, 2, 60.0);
        band.set(1, 0, f64::NAN);
        let stack = RasterStack::new(vec![band], 1).unwrap();
        let mut weather = WeatherInputs::constant(70.0, 20.0, 5.0, 270.0);
        weather.relative_humidity = WeatherInput::Raster(stack);
        let err = weather.validate().unwrap_err();
        assert!(
            err.to_string().contains("relative_humidity"),
            "got: {err}"
        );
    }

    #[test]
    fn extract_constants_clamps_physical_domains() {
        let landscape = Landscape::uniform(4, 4, 98.425, 1.0);
        let weather = WeatherInputs::constant(70.0, 2.0, 0.5, 350.0);
        let mut layers = BTreeMap::new();
        layers.insert(
            PerturbedLayer::RelativeHumidity,
            Perturbation {
                spatial_type: SpatialType::Global,
                range: (-10.0, -10.0),
                frequency: None,
            },
        );
        layers.insert(
            PerturbedLayer::WindSpeed20ft,
            Perturbation {
                spatial_type: SpatialType::Global,
                range: (-3.0, -3.0),
                frequency: None,
            },
        );
        layers.insert(
            PerturbedLayer::WindFromDirection,
            Perturbation {
                spatial_type: SpatialType::Global,
                range: (20.0, 20.0),
                frequency: None,
            },
        );
        let perturbations = PerturbationSet::new(&layers, 1).unwrap();
        let c = extract_constants(
            &landscape,
            &weather,
            &perturbations,
            0.0,
            CellIndex::new(1, 1),
        );
        assert_eq!(c.relative_humidity, 0.0, "humidity must clamp at zero");
        assert_eq!(c.wind_speed_20ft, 0.0, "wind speed must clamp at zero");
        assert!((c.wind_from_direction - 10.0).abs() < 1e-9, "azimuth wraps");
        assert_eq!(c.fuel_model_number, 1.0);
    }
}
