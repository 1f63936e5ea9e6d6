//! Row-major raster grids and cell addressing.
//!
//! Every landscape layer and every per-simulation result matrix is a
//! [`Grid2D`]: a flat `Vec<f64>` indexed `(row, col)` with row 0 at the
//! north edge. Hourly weather stacks are a [`RasterStack`], one band per
//! simulated hour, which may be coarser than the landscape grid.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Address of one landscape cell. Ordering is row-major lexicographic,
/// which is what gives the spread kernel its deterministic iteration order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct CellIndex {
    pub row: usize,
    pub col: usize,
}

impl CellIndex {
    #[inline]
    #[must_use]
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Apply a signed neighbor offset, returning `None` when it would leave
    /// the `rows x cols` grid.
    #[must_use]
    pub fn offset(&self, di: i64, dj: i64, rows: usize, cols: usize) -> Option<CellIndex> {
        let row = self.row as i64 + di;
        let col = self.col as i64 + dj;
        if row < 0 || col < 0 || row >= rows as i64 || col >= cols as i64 {
            None
        } else {
            Some(CellIndex::new(row as usize, col as usize))
        }
    }
}

/// Dense 2-D raster of `f64` values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid2D {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Grid2D {
    /// Grid filled with a constant value.
    #[must_use]
    pub fn filled(rows: usize, cols: usize, value: f64) -> Self {
        Self {
            rows,
            cols,
            data: vec![value; rows * cols],
        }
    }

    /// Wrap an existing row-major buffer.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(Error::BufferSize {
                rows,
                cols,
                len: data.len(),
            });
        }
        Ok(Self { rows, cols, data })
    }

    #[inline]
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        debug_assert!(row < self.rows && col < self.cols);
        self.data[row * self.cols + col]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        debug_assert!(row < self.rows && col < self.cols);
        self.data[row * self.cols + col] = value;
    }

    #[inline]
    #[must_use]
    pub fn at(&self, cell: CellIndex) -> f64 {
        self.get(cell.row, cell.col)
    }

    #[inline]
    pub fn put(&mut self, cell: CellIndex, value: f64) {
        self.set(cell.row, cell.col, value);
    }

    #[inline]
    #[must_use]
    pub fn in_bounds(&self, row: i64, col: i64) -> bool {
        row >= 0 && col >= 0 && row < self.rows as i64 && col < self.cols as i64
    }

    /// Row-major view of the backing buffer.
    #[must_use]
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Iterate `(cell, value)` in row-major order.
    pub fn iter_cells(&self) -> impl Iterator<Item = (CellIndex, f64)> + '_ {
        self.data.iter().enumerate().map(move |(k, &v)| {
            (CellIndex::new(k / self.cols, k % self.cols), v)
        })
    }

    /// Error if any value is non-finite; `layer` names the raster in the error.
    pub fn ensure_finite(&self, layer: &'static str) -> Result<()> {
        for (cell, v) in self.iter_cells() {
            if !v.is_finite() {
                return Err(Error::NonFiniteValue {
                    layer,
                    row: cell.row,
                    col: cell.col,
                });
            }
        }
        Ok(())
    }
}

/// Time-varying raster: one band per simulated hour.
///
/// The stack may be coarser than the landscape grid; `resolution_multiplier`
/// is the integer ratio of landscape cells per weather cell along each axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RasterStack {
    bands: Vec<Grid2D>,
    resolution_multiplier: usize,
}

impl RasterStack {
    pub fn new(bands: Vec<Grid2D>, resolution_multiplier: usize) -> Result<Self> {
        if bands.is_empty() {
            return Err(Error::EmptyWeatherStack("raster stack"));
        }
        Ok(Self {
            bands,
            resolution_multiplier: resolution_multiplier.max(1),
        })
    }

    #[must_use]
    pub fn num_bands(&self) -> usize {
        self.bands.len()
    }

    /// Error if any band holds a non-finite value; `layer` names the
    /// variable in the error.
    pub fn ensure_finite(&self, layer: &'static str) -> Result<()> {
        for band in &self.bands {
            band.ensure_finite(layer)?;
        }
        Ok(())
    }

    /// Band for a simulation clock in minutes: one band per hour, clamped to
    /// the last available band.
    #[must_use]
    pub fn band_at(&self, global_clock: f64) -> &Grid2D {
        let band = (global_clock / 60.0).floor().max(0.0) as usize;
        &self.bands[band.min(self.bands.len() - 1)]
    }

    /// Sample at a landscape cell, mapping through the resolution multiplier
    /// by integer division and clamping to the stack's native extent.
    #[must_use]
    pub fn sample(&self, cell: CellIndex, global_clock: f64) -> f64 {
        let band = self.band_at(global_clock);
        let m = self.resolution_multiplier;
        let row = (cell.row / m).min(band.rows() - 1);
        let col = (cell.col / m).min(band.cols() - 1);
        band.get(row, col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_vec_rejects_wrong_length() {
        assert!(Grid2D::from_vec(2, 2, vec![0.0; 3]).is_err());
        assert!(Grid2D::from_vec(2, 2, vec![0.0; 4]).is_ok());
    }

    #[test]
    fn cell_offset_respects_bounds() {
        let c = CellIndex::new(0, 0);
        assert_eq!(c.offset(-1, 0, 10, 10), None);
        assert_eq!(c.offset(1, 1, 10, 10), Some(CellIndex::new(1, 1)));
        assert_eq!(CellIndex::new(9, 9).offset(1, 0, 10, 10), None);
    }

    #[test]
    fn ensure_finite_reports_position() {
        let mut g = Grid2D::filled(3, 3, 1.0);
        g.set(1, 2, f64::NAN);
        let err = g.ensure_finite("elevation").unwrap_err();
        assert!(err.to_string().contains("(1, 2)"), "got: {err}");
    }

    #[test]
    fn stack_band_selection_is_hourly_and_clamped() {
        let bands = vec![
            Grid2D::filled(2, 2, 10.0),
            Grid2D::filled(2, 2, 20.0),
        ];
        let stack = RasterStack::new(bands, 1).unwrap();
        let cell = CellIndex::new(0, 0);
        assert_eq!(stack.sample(cell, 0.0), 10.0);
        assert_eq!(stack.sample(cell, 59.9), 10.0);
        assert_eq!(stack.sample(cell, 60.0), 20.0);
        // past the end of the stack: hold the last band
        assert_eq!(stack.sample(cell, 600.0), 20.0);
    }

    #[test]
    fn stack_ensure_finite_scans_every_band() {
        let mut bad = Grid2D::filled(2, 2, 5.0);
        bad.set(0, 1, f64::INFINITY);
        let stack =
            RasterStack::new(vec![Grid2D::filled(2, 2, 5.0), bad], 1).unwrap();
        let err = stack.ensure_finite("temperature").unwrap_err();
        assert!(err.to_string().contains("temperature"), "got: {err}");
        let clean = RasterStack::new(vec![Grid2D::filled(2, 2, 5.0)], 1).unwrap();
        assert!(clean.ensure_finite("temperature").is_ok());
    }

    #[test]
    fn stack_resolution_multiplier_divides_indices() {
        let mut band = Grid2D::filled(2, 2, 0.0);
        band.set(0, 0, 1.0);
        band.set(1, 1, 4.0);
        let stack = RasterStack::new(vec![band], 5).unwrap();
        assert_eq!(stack.sample(CellIndex::new(4, 4), 0.0), 1.0);
        assert_eq!(stack.sample(CellIndex::new(5, 5), 0.0), 4.0);
    }
}
