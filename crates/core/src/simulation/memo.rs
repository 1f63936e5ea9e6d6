//! Per-engine memoization of the wind/slope-free spread info.
//!
//! Building a fuel model and running the wind/slope-free Rothermel pass is
//! the expensive half of a trajectory computation and is pure on
//! `(fuel model number, moisture fingerprint)`. Each engine owns one
//! bounded cache; nothing is shared across simulations, so no locking.

use crate::physics::fuel::FuelModel;
use crate::physics::fuel_catalog::build_fuel_model;
use crate::physics::fuel_moisture::FuelMoisture;
use crate::physics::rothermel::{rothermel_no_wind_no_slope, SurfaceSpreadMin};
use std::collections::HashMap;

/// Moisturized model plus its wind/slope-free spread info.
#[derive(Debug, Clone)]
pub(crate) struct MemoEntry {
    pub fuel: FuelModel,
    pub min: SurfaceSpreadMin,
}

#[derive(Debug, Default)]
pub(crate) struct SpreadMemo {
    map: HashMap<(u16, [i32; 5]), MemoEntry>,
}

impl SpreadMemo {
    /// Cache bound; weather bands and quantized moistures keep real runs
    /// far below it, so eviction is a wholesale clear.
    const MAX_ENTRIES: usize = 4096;

    pub fn new() -> Self {
        Self::default()
    }

    /// Cached spread info for a fuel model at a moisture fingerprint, or
    /// `None` when the number has no catalog entry.
    pub fn get_or_build(
        &mut self,
        fuel_model_number: u16,
        moisture: &FuelMoisture,
    ) -> Option<MemoEntry> {
        let key = (fuel_model_number, moisture.fingerprint());
        if let Some(entry) = self.map.get(&key) {
            return Some(entry.clone());
        }
        let fuel = build_fuel_model(fuel_model_number)?.moisturize(moisture);
        let min = rothermel_no_wind_no_slope(&fuel);
        if self.map.len() >= Self::MAX_ENTRIES {
            self.map.clear();
        }
        let entry = MemoEntry { fuel, min };
        self.map.insert(key, entry.clone());
        Some(entry)
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.map.len()
    }
}
