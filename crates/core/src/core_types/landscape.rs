//! The immutable landscape shared by every simulation.
//!
//! Eight aligned layers on a uniform square grid. The driver owns the
//! rasters and lends the landscape to the engine by shared reference; the
//! engine never mutates it (independent simulations may read it from many
//! threads at once).

use crate::core_types::raster::{CellIndex, Grid2D};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Aligned terrain, fuel, and canopy layers.
///
/// Units: elevation and canopy heights in feet, slope as rise/run, aspect
/// in degrees clockwise from north, crown bulk density in lb/ft³, canopy
/// cover in percent (0–100), fuel model as an integer code stored in a
/// double.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Landscape {
    num_rows: usize,
    num_cols: usize,
    /// Cell edge length in feet.
    cell_size: f64,
    pub elevation: Grid2D,
    pub slope: Grid2D,
    pub aspect: Grid2D,
    pub fuel_model: Grid2D,
    pub canopy_height: Grid2D,
    pub canopy_base_height: Grid2D,
    pub crown_bulk_density: Grid2D,
    pub canopy_cover: Grid2D,
}

impl Landscape {
    /// Validate dimensions and finiteness of every layer up front, so the
    /// spread loop never has to re-check.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        cell_size: f64,
        elevation: Grid2D,
        slope: Grid2D,
        aspect: Grid2D,
        fuel_model: Grid2D,
        canopy_height: Grid2D,
        canopy_base_height: Grid2D,
        crown_bulk_density: Grid2D,
        canopy_cover: Grid2D,
    ) -> Result<Self> {
        let num_rows = elevation.rows();
        let num_cols = elevation.cols();
        let layers: [(&'static str, &Grid2D); 8] = [
            ("elevation", &elevation),
            ("slope", &slope),
            ("aspect", &aspect),
            ("fuel_model", &fuel_model),
            ("canopy_height", &canopy_height),
            ("canopy_base_height", &canopy_base_height),
            ("crown_bulk_density", &crown_bulk_density),
            ("canopy_cover", &canopy_cover),
        ];
        for (name, layer) in layers {
            if layer.rows() != num_rows || layer.cols() != num_cols {
                return Err(Error::DimensionMismatch {
                    layer: name,
                    rows: layer.rows(),
                    cols: layer.cols(),
                    expected_rows: num_rows,
                    expected_cols: num_cols,
                });
            }
            layer.ensure_finite(name)?;
        }
        Ok(Self {
            num_rows,
            num_cols,
            cell_size,
            elevation,
            slope,
            aspect,
            fuel_model,
            canopy_height,
            canopy_base_height,
            crown_bulk_density,
            canopy_cover,
        })
    }

    /// Flat landscape of one fuel model, handy for tests and calibration.
    #[must_use]
    pub fn uniform(num_rows: usize, num_cols: usize, cell_size: f64, fuel_model: f64) -> Self {
        Self {
            num_rows,
            num_cols,
            cell_size,
            elevation: Grid2D::filled(num_rows, num_cols, 0.0),
            slope: Grid2D::filled(num_rows, num_cols, 0.0),
            aspect: Grid2D::filled(num_rows, num_cols, 0.0),
            fuel_model: Grid2D::filled(num_rows, num_cols, fuel_model),
            canopy_height: Grid2D::filled(num_rows, num_cols, 0.0),
            canopy_base_height: Grid2D::filled(num_rows, num_cols, 0.0),
            crown_bulk_density: Grid2D::filled(num_rows, num_cols, 0.0),
            canopy_cover: Grid2D::filled(num_rows, num_cols, 0.0),
        }
    }

    #[inline]
    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    #[inline]
    #[must_use]
    pub fn num_cols(&self) -> usize {
        self.num_cols
    }

    #[inline]
    #[must_use]
    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, row: i64, col: i64) -> bool {
        self.fuel_model.in_bounds(row, col)
    }

    /// 3-D distance (feet) between two cell centers, using the elevation
    /// layer for the vertical leg.
    #[must_use]
    pub fn terrain_distance(&self, from: CellIndex, to: CellIndex) -> f64 {
        let di = to.row as f64 - from.row as f64;
        let dj = to.col as f64 - from.col as f64;
        let dz = self.elevation.at(to) - self.elevation.at(from);
        let dx = self.cell_size * di;
        let dy = self.cell_size * dj;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mismatched_layer_is_rejected() {
        let good = Grid2D::filled(4, 4, 0.0);
        let bad = Grid2D::filled(4, 5, 0.0);
        let err = Landscape::new(
            98.425,
            good.clone(),
            bad,
            good.clone(),
            good.clone(),
            good.clone(),
            good.clone(),
            good.clone(),
            good.clone(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("slope"), "got: {err}");
    }

    #[test]
    fn terrain_distance_uses_elevation() {
        let mut lsc = Landscape::uniform(3, 3, 100.0, 1.0);
        lsc.elevation.set(0, 1, 30.0);
        let flat = lsc.terrain_distance(CellIndex::new(0, 0), CellIndex::new(0, 2));
        assert!((flat - 200.0).abs() < 1e-9);
        let sloped = lsc.terrain_distance(CellIndex::new(0, 0), CellIndex::new(0, 1));
        assert!((sloped - (100.0f64 * 100.0 + 30.0 * 30.0).sqrt()).abs() < 1e-9);
    }

    #[test]
    fn diagonal_distance_is_longer() {
        let lsc = Landscape::uniform(3, 3, 100.0, 1.0);
        let cardinal = lsc.terrain_distance(CellIndex::new(1, 1), CellIndex::new(1, 2));
        let diagonal = lsc.terrain_distance(CellIndex::new(1, 1), CellIndex::new(2, 2));
        assert!((cardinal - 100.0).abs() < 1e-9);
        assert!((diagonal - 100.0 * std::f64::consts::SQRT_2).abs() < 1e-9);
    }
}
