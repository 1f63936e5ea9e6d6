//! Error types and result alias for the crate.
//!
//! Structural problems with the inputs are surfaced here before the main
//! loop starts. Numeric anomalies inside the loop are never errors: they are
//! clamped locally and tallied in
//! [`SpreadDiagnostics`](crate::simulation::SpreadDiagnostics).

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    #[error(
        "layer '{layer}' is {rows}x{cols}, expected {expected_rows}x{expected_cols}"
    )]
    DimensionMismatch {
        layer: &'static str,
        rows: usize,
        cols: usize,
        expected_rows: usize,
        expected_cols: usize,
    },

    #[error("layer '{layer}' holds a non-finite value at ({row}, {col})")]
    NonFiniteValue {
        layer: &'static str,
        row: usize,
        col: usize,
    },

    #[error("grid dimensions {rows}x{cols} do not match buffer of length {len}")]
    BufferSize { rows: usize, cols: usize, len: usize },

    #[error("max_runtime must be positive, got {0}")]
    InvalidRuntime(f64),

    #[error("invalid spotting configuration: {0}")]
    InvalidSpotting(&'static str),

    #[error("weather raster stack for '{0}' has no bands")]
    EmptyWeatherStack(&'static str),

    #[error("perturbation range for '{0}' is reversed or non-finite")]
    InvalidPerturbation(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dimension_mismatch_names_the_layer() {
        let err = Error::DimensionMismatch {
            layer: "slope",
            rows: 10,
            cols: 12,
            expected_rows: 10,
            expected_cols: 10,
        };
        assert!(err.to_string().contains("slope"));
        assert!(err.to_string().contains("10x12"));
    }
}
