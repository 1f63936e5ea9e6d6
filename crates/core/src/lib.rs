#![forbid(unsafe_code)]
//! firegrid-core: raster-based wildfire spread engine.
//!
//! Given aligned terrain/fuel/canopy rasters, scalar or hourly-raster
//! weather, and an ignition, the engine advances a fire front over the
//! grid with an adaptive timestep and returns per-cell rasters of ignition
//! time, flame length, fire-line intensity, and cumulative ignition
//! probability. Fire behavior couples the Rothermel surface spread model,
//! Van Wagner/Cruz crown fire, and a stochastic firebrand spotting model;
//! a rayon-parallel Monte Carlo helper aggregates burn probability across
//! seeded simulations.
//!
//! Raster I/O, projection handling, and the sampling driver are the
//! caller's concern: the engine consumes already-loaded grids and is pure
//! with respect to its inputs.

pub mod core_types;
pub mod error;
pub mod physics;
pub mod rng;
pub mod simulation;
pub mod weather;

pub use core_types::{CellIndex, Grid2D, Landscape, RasterStack};
pub use error::{Error, Result};
pub use simulation::{
    burn_probability, BurnProbability, FireSpreadEngine, Ignition, SimulationInputs,
    SpreadDiagnostics, SpreadOutputs, FIRE_TYPE_CROWN, FIRE_TYPE_SURFACE, FIRE_TYPE_UNBURNED,
};
pub use weather::{WeatherInput, WeatherInputs};
