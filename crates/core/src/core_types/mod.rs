//! Core data types: rasters, the landscape bundle, and unit conversions.

pub mod landscape;
pub mod raster;
pub mod units;

pub use landscape::Landscape;
pub use raster::{CellIndex, Grid2D, RasterStack};
