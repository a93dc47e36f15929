use thiserror::Error;

use crate::profile::Dimension;

#[derive(Debug, Error)]
pub enum CargoError {
    /// The merged environmental window for `dimension` is empty: no single
    /// set of conditions satisfies every item in the manifest.
    #[error("infeasible cargo mix: merged {dimension} window [{min}, {max}] is empty")]
    InfeasibleCargoMix { dimension: Dimension, min: f64, max: f64 },

    #[error("cargo item {index} has invalid {field}: {value}")]
    InvalidItem { index: usize, field: &'static str, value: f64 },
}

pub type CargoResult<T> = Result<T, CargoError>;
