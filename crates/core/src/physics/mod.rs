//! Fire behavior physics: fuel models, surface spread, crown fire, and
//! fuel moisture.

pub mod crown_fire;
pub mod fuel;
pub mod fuel_catalog;
pub mod fuel_moisture;
pub mod rothermel;

pub use fuel::FuelModel;
pub use fuel_catalog::{build_fuel_model, is_burnable_fuel_number};
pub use fuel_moisture::{fuel_moisture, FuelMoisture};
pub use rothermel::{SurfaceSpreadMax, SurfaceSpreadMin};
