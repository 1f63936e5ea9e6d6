//! Per-layer perturbations of sampled inputs.
//!
//! A perturbation adds a uniform offset from a closed range to every value
//! sampled from one layer. `Global` draws one offset per simulation,
//! `Pixel` one per cell. An optional `frequency` (minutes) re-draws the
//! offset every frequency interval, so e.g. a 60-minute frequency yields a
//! fresh field of offsets each simulated hour and identical values inside
//! each hour.
//!
//! Offsets are not taken from the simulation's draw stream: they are a pure
//! hash of `(seed, layer, cell, epoch)`, so sampling order cannot perturb
//! reproducibility and a cell's offset can be recomputed at any time.

use crate::core_types::raster::CellIndex;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Layers that accept perturbations.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum PerturbedLayer {
    Temperature,
    RelativeHumidity,
    WindSpeed20ft,
    WindFromDirection,
    CanopyHeight,
    CanopyBaseHeight,
    CrownBulkDensity,
    CanopyCover,
}

impl PerturbedLayer {
    fn salt(self) -> u64 {
        match self {
            PerturbedLayer::Temperature => 0x01,
            PerturbedLayer::RelativeHumidity => 0x02,
            PerturbedLayer::WindSpeed20ft => 0x03,
            PerturbedLayer::WindFromDirection => 0x04,
            PerturbedLayer::CanopyHeight => 0x05,
            PerturbedLayer::CanopyBaseHeight => 0x06,
            PerturbedLayer::CrownBulkDensity => 0x07,
            PerturbedLayer::CanopyCover => 0x08,
        }
    }
}

/// Whether one offset covers the whole grid or each cell draws its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpatialType {
    Global,
    Pixel,
}

/// Configuration for one layer's perturbation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Perturbation {
    pub spatial_type: SpatialType,
    /// Closed offset range `[lo, hi]`.
    pub range: (f64, f64),
    /// Re-draw cadence in minutes; `None` fixes the offset for the run.
    pub frequency: Option<f64>,
}

impl Perturbation {
    fn validate(&self, layer: &'static str) -> Result<()> {
        let (lo, hi) = self.range;
        if !lo.is_finite() || !hi.is_finite() || lo > hi {
            return Err(Error::InvalidPerturbation(layer));
        }
        if let Some(f) = self.frequency {
            if !(f > 0.0) {
                return Err(Error::InvalidPerturbation(layer));
            }
        }
        Ok(())
    }
}

/// All configured perturbations for one simulation, bound to its seed.
#[derive(Debug, Clone, Default)]
pub struct PerturbationSet {
    layers: BTreeMap<PerturbedLayer, Perturbation>,
    seed: u64,
}

impl PerturbationSet {
    pub fn new(
        layers: &BTreeMap<PerturbedLayer, Perturbation>,
        seed: u64,
    ) -> Result<Self> {
        for (layer, p) in layers {
            let name = match layer {
                PerturbedLayer::Temperature => "temperature",
                PerturbedLayer::RelativeHumidity => "relative_humidity",
                PerturbedLayer::WindSpeed20ft => "wind_speed_20ft",
                PerturbedLayer::WindFromDirection => "wind_from_direction",
                PerturbedLayer::CanopyHeight => "canopy_height",
                PerturbedLayer::CanopyBaseHeight => "canopy_base_height",
                PerturbedLayer::CrownBulkDensity => "crown_bulk_density",
                PerturbedLayer::CanopyCover => "canopy_cover",
            };
            p.validate(name)?;
        }
        Ok(Self {
            layers: layers.clone(),
            seed,
        })
    }

    /// Offset to add to a value sampled from `layer` at `cell` and
    /// simulation minute `clock`. Zero when the layer is unperturbed.
    #[must_use]
    pub fn offset(&self, layer: PerturbedLayer, cell: CellIndex, clock: f64) -> f64 {
        let Some(p) = self.layers.get(&layer) else {
            return 0.0;
        };
        let epoch = match p.frequency {
            Some(f) => (clock / f).floor() as i64,
            None => 0,
        };
        let (lo, hi) = p.range;
        let key_cell = match p.spatial_type {
            SpatialType::Global => CellIndex::new(0, 0),
            SpatialType::Pixel => cell,
        };
        let u = hash_unit(self.seed, layer.salt(), key_cell, epoch);
        lo + u * (hi - lo)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

/// SplitMix64 finalizer.
#[inline]
fn mix(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Deterministic uniform value in `[0, 1)` keyed on the perturbation
/// coordinates.
fn hash_unit(seed: u64, salt: u64, cell: CellIndex, epoch: i64) -> f64 {
    let mut h = mix(seed ^ salt.wrapping_mul(0xA076_1D64_78BD_642F));
    h = mix(h ^ (cell.row as u64).wrapping_mul(0xE703_7ED1_A0B4_28DB));
    h = mix(h ^ (cell.col as u64).wrapping_mul(0x8EBC_6AF0_9C88_C6E3));
    h = mix(h ^ (epoch as u64).wrapping_mul(0x5899_65CC_7537_4CC3));
    // upper 53 bits to a double in [0, 1)
    (h >> 11) as f64 / (1u64 << 53) as f64
}
