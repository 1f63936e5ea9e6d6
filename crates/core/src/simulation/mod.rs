//! The fire spread engine: inputs, outputs, ignition handling, and the
//! main loop.
//!
//! One [`FireSpreadEngine`] value is one stochastic simulation. It borrows
//! the landscape and weather read-only (so independent simulations can
//! share them across threads), owns every mutable matrix for the duration
//! of the run, and hands them back in [`SpreadOutputs`] at termination.
//! The step machinery lives in `kernel`, firebrand transport in
//! `spotting`, burn-probability aggregation in `monte_carlo`.

pub mod front;
mod kernel;
mod memo;
pub mod monte_carlo;
pub mod spotting;

use crate::core_types::raster::{CellIndex, Grid2D};
use crate::core_types::Landscape;
use crate::error::{Error, Result};
use crate::physics::fuel_catalog::is_burnable_fuel_number;
use crate::rng::SimRng;
use crate::weather::perturbation::{Perturbation, PerturbationSet, PerturbedLayer};
use crate::weather::WeatherInputs;
use front::{ActiveFront, NEIGHBOR_OFFSETS};
use memo::SpreadMemo;
use serde::{Deserialize, Serialize};
use spotting::ScheduledSpot;
use std::collections::BTreeMap;
use tracing::debug;

pub use front::BurnTrajectory;
pub use monte_carlo::{burn_probability, BurnProbability};
pub use spotting::{
    FirebrandCount, IntBound, SpottingConfig, SurfaceFireSpotting, ValueOrRange,
};

/// How the fire starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Ignition {
    /// Reject-sample a burnable cell with at least one burnable neighbor.
    Random,
    /// Ignite exactly this cell; rejected (empty result) when it is out of
    /// bounds, non-burnable, or walled in by non-burnable cells.
    Point { row: usize, col: usize },
    /// Nonzero cells are already burning at clock zero; their burn time
    /// keeps the -1 sentinel for the whole run.
    Perimeter(Grid2D),
}

/// Everything one simulation needs, composed by the external driver.
#[derive(Debug, Clone)]
pub struct SimulationInputs<'a> {
    pub landscape: &'a Landscape,
    pub weather: &'a WeatherInputs,
    /// Simulated minutes to run for.
    pub max_runtime: f64,
    /// Scales spread-ellipse elongation; 1.0 = standard.
    pub ellipse_adjustment_factor: f64,
    /// Foliar moisture content as a fraction (e.g. 0.9).
    pub foliar_moisture: f64,
    pub perturbations: BTreeMap<PerturbedLayer, Perturbation>,
    pub spotting: Option<SpottingConfig>,
    /// Fixed seed for reproducible runs; `None` draws one from OS entropy.
    pub random_seed: Option<u64>,
}

impl<'a> SimulationInputs<'a> {
    /// Inputs with no perturbations, no spotting, and standard ellipse and
    /// foliar moisture values.
    #[must_use]
    pub fn new(landscape: &'a Landscape, weather: &'a WeatherInputs, max_runtime: f64) -> Self {
        Self {
            landscape,
            weather,
            max_runtime,
            ellipse_adjustment_factor: 1.0,
            foliar_moisture: 0.9,
            perturbations: BTreeMap::new(),
            spotting: None,
            random_seed: None,
        }
    }
}

/// `fire_type` raster value for cells that never burned.
pub const FIRE_TYPE_UNBURNED: f64 = 0.0;
/// `fire_type` raster value for surface fire ignitions.
pub const FIRE_TYPE_SURFACE: f64 = 1.0;
/// `fire_type` raster value for crown fire ignitions.
pub const FIRE_TYPE_CROWN: f64 = 2.0;

/// Counts of numeric anomalies recovered inside the loop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpreadDiagnostics {
    /// Negative spread rates clamped to zero.
    pub clamped_spread_rates: u64,
    /// Negative intensities clamped to zero.
    pub clamped_intensities: u64,
    /// Log-normal draws degenerate (σ ≤ 0) and replaced by zero
    /// displacement.
    pub degenerate_firebrand_draws: u64,
}

/// Result matrices of one simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpreadOutputs {
    /// Simulation clock at termination (minutes).
    pub global_clock: f64,
    /// Cells with `fire_spread > 0`, row-major.
    pub ignited_cells: Vec<CellIndex>,
    /// Max cumulative ignition probability per cell; 1.0 for conducted
    /// ignitions, in (0,1) for spot ignitions, 0 for unburned.
    pub fire_spread: Grid2D,
    /// ft, recorded at ignition.
    pub flame_length: Grid2D,
    /// Btu/ft·s, recorded at ignition.
    pub fire_line_intensity: Grid2D,
    /// Minutes; -1 for never-burned cells and perimeter cells that never
    /// re-ignited.
    pub burn_time: Grid2D,
    /// [`FIRE_TYPE_UNBURNED`], [`FIRE_TYPE_SURFACE`], or
    /// [`FIRE_TYPE_CROWN`] per cell; perimeter-initialized cells stay
    /// unburned here.
    pub fire_type: Grid2D,
    /// Brands landed per cell; present only when spotting is enabled.
    pub firebrand_count: Option<Grid2D>,
    pub diagnostics: SpreadDiagnostics,
}

/// One running simulation.
pub struct FireSpreadEngine<'a> {
    landscape: &'a Landscape,
    weather: &'a WeatherInputs,
    max_runtime: f64,
    ellipse_adjustment_factor: f64,
    foliar_moisture: f64,
    spotting: Option<SpottingConfig>,
    perturbations: PerturbationSet,
    rng: SimRng,
    memo: SpreadMemo,
    fire_spread: Grid2D,
    flame_length: Grid2D,
    fire_line_intensity: Grid2D,
    burn_time: Grid2D,
    fire_type: Grid2D,
    firebrand_count: Option<Grid2D>,
    active_front: ActiveFront,
    spot_schedule: BTreeMap<CellIndex, ScheduledSpot>,
    global_clock: f64,
    diagnostics: SpreadDiagnostics,
}

/// Rejection-sampling bound for random ignition on landscapes with little
/// or no burnable fuel.
const MAX_RANDOM_IGNITION_ATTEMPTS: u32 = 100_000;

impl<'a> FireSpreadEngine<'a> {
    /// Run one simulation to termination.
    ///
    /// Structural input problems error out before the loop starts. A
    /// rejected point or random ignition is not an error: the result has an
    /// empty `ignited_cells` and a zero clock.
    pub fn run(inputs: &SimulationInputs<'a>, ignition: &Ignition) -> Result<SpreadOutputs> {
        if !(inputs.max_runtime > 0.0) {
            return Err(Error::InvalidRuntime(inputs.max_runtime));
        }
        inputs.weather.validate()?;
        if let Some(spotting) = &inputs.spotting {
            spotting.validate()?;
        }
        if let Ignition::Perimeter(perimeter) = ignition {
            let (rows, cols) = (inputs.landscape.num_rows(), inputs.landscape.num_cols());
            if perimeter.rows() != rows || perimeter.cols() != cols {
                return Err(Error::DimensionMismatch {
                    layer: "ignition_perimeter",
                    rows: perimeter.rows(),
                    cols: perimeter.cols(),
                    expected_rows: rows,
                    expected_cols: cols,
                });
            }
        }

        let seed = inputs.random_seed.unwrap_or_else(rand::random);
        let mut engine = Self::new(inputs, seed)?;
        debug!(
            rows = engine.landscape.num_rows(),
            cols = engine.landscape.num_cols(),
            max_runtime = engine.max_runtime,
            seed,
            "starting fire spread simulation"
        );

        if !engine.ignite(ignition) {
            debug!("ignition rejected; returning empty result");
            return Ok(engine.into_outputs());
        }

        while !engine.active_front.is_empty() && engine.global_clock < engine.max_runtime {
            engine.step();
        }
        // pending spot ignitions die with the run
        engine.spot_schedule.clear();

        debug!(
            clock = engine.global_clock,
            ignited = engine
                .fire_spread
                .data()
                .iter()
                .filter(|&&v| v > 0.0)
                .count(),
            "simulation finished"
        );
        Ok(engine.into_outputs())
    }

    fn new(inputs: &SimulationInputs<'a>, seed: u64) -> Result<Self> {
        let rows = inputs.landscape.num_rows();
        let cols = inputs.landscape.num_cols();
        Ok(Self {
            landscape: inputs.landscape,
            weather: inputs.weather,
            max_runtime: inputs.max_runtime,
            ellipse_adjustment_factor: inputs.ellipse_adjustment_factor,
            foliar_moisture: inputs.foliar_moisture,
            spotting: inputs.spotting.clone(),
            perturbations: PerturbationSet::new(&inputs.perturbations, seed)?,
            rng: SimRng::from_seed(seed),
            memo: SpreadMemo::new(),
            fire_spread: Grid2D::filled(rows, cols, 0.0),
            flame_length: Grid2D::filled(rows, cols, 0.0),
            fire_line_intensity: Grid2D::filled(rows, cols, 0.0),
            burn_time: Grid2D::filled(rows, cols, -1.0),
            fire_type: Grid2D::filled(rows, cols, FIRE_TYPE_UNBURNED),
            firebrand_count: inputs
                .spotting
                .is_some()
                .then(|| Grid2D::filled(rows, cols, 0.0)),
            active_front: ActiveFront::new(),
            spot_schedule: BTreeMap::new(),
            global_clock: 0.0,
            diagnostics: SpreadDiagnostics::default(),
        })
    }

    /// Seed the initial fire. Returns false when the requested ignition is
    /// rejected.
    fn ignite(&mut self, ignition: &Ignition) -> bool {
        match ignition {
            Ignition::Point { row, col } => {
                let cell = CellIndex::new(*row, *col);
                if !self.valid_point_ignition(cell) {
                    return false;
                }
                self.ignite_point(cell)
            }
            Ignition::Random => {
                for _ in 0..MAX_RANDOM_IGNITION_ATTEMPTS {
                    let row = self.rng.uniform_int(0, self.landscape.num_rows() as u32 - 1);
                    let col = self.rng.uniform_int(0, self.landscape.num_cols() as u32 - 1);
                    let cell = CellIndex::new(row as usize, col as usize);
                    if self.valid_point_ignition(cell) {
                        return self.ignite_point(cell);
                    }
                }
                false
            }
            Ignition::Perimeter(perimeter) => self.ignite_perimeter(perimeter),
        }
    }

    fn valid_point_ignition(&self, cell: CellIndex) -> bool {
        if cell.row >= self.landscape.num_rows() || cell.col >= self.landscape.num_cols() {
            return false;
        }
        is_burnable_fuel_number(self.landscape.fuel_model.at(cell))
            && self.has_burnable_unburned_neighbor(cell)
    }

    fn ignite_point(&mut self, cell: CellIndex) -> bool {
        self.fire_spread.put(cell, 1.0);
        self.flame_length.put(cell, 1.0);
        self.fire_line_intensity.put(cell, 1.0);
        self.burn_time.put(cell, 0.0);
        self.fire_type.put(cell, FIRE_TYPE_SURFACE);
        let trajectories = self.compute_neighborhood(cell, None);
        if !trajectories.is_empty() {
            self.active_front.insert(cell, trajectories);
        }
        true
    }

    fn ignite_perimeter(&mut self, perimeter: &Grid2D) -> bool {
        let mut seeds = Vec::new();
        for (cell, value) in perimeter.iter_cells() {
            if value != 0.0 {
                self.fire_spread.put(cell, 1.0);
                self.flame_length.put(cell, -1.0);
                self.fire_line_intensity.put(cell, -1.0);
                self.burn_time.put(cell, -1.0);
                seeds.push(cell);
            }
        }
        for cell in seeds {
            if self.has_burnable_unburned_neighbor(cell) {
                let trajectories = self.compute_neighborhood(cell, None);
                if !trajectories.is_empty() {
                    self.active_front.insert(cell, trajectories);
                }
            }
        }
        !self.fire_spread.data().iter().all(|&v| v == 0.0)
    }

    fn has_burnable_unburned_neighbor(&self, cell: CellIndex) -> bool {
        NEIGHBOR_OFFSETS.iter().any(|&(di, dj)| {
            cell.offset(
                di as i64,
                dj as i64,
                self.landscape.num_rows(),
                self.landscape.num_cols(),
            )
            .is_some_and(|n| {
                self.fire_spread.at(n) == 0.0
                    && is_burnable_fuel_number(self.landscape.fuel_model.at(n))
            })
        })
    }

    fn into_outputs(self) -> SpreadOutputs {
        let ignited_cells = self
            .fire_spread
            .iter_cells()
            .filter(|&(_, v)| v > 0.0)
            .map(|(cell, _)| cell)
            .collect();
        SpreadOutputs {
            global_clock: self.global_clock,
            ignited_cells,
            fire_spread: self.fire_spread,
            flame_length: self.flame_length,
            fire_line_intensity: self.fire_line_intensity,
            burn_time: self.burn_time,
            fire_type: self.fire_type,
            firebrand_count: self.firebrand_count,
            diagnostics: self.diagnostics,
        }
    }
}
