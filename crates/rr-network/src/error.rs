//! Network-subsystem error type.

use thiserror::Error;

use rr_core::{GeoPoint, NodeId};

/// Errors produced by `rr-network`.
///
/// `OutOfCoverage` is an ordinary per-request outcome.  The remaining
/// variants are snapshot construction failures and mean the data source
/// handed over inconsistent topology.
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("no network node within {radius_m} m of {point}")]
    OutOfCoverage { point: GeoPoint, radius_m: f64 },

    #[error("node {index} has invalid coordinates {pos}")]
    InvalidNode { index: usize, pos: GeoPoint },

    #[error("segment {segment} references missing node {node}")]
    DanglingNode { segment: usize, node: NodeId },

    #[error("segment {segment} is invalid: {reason}")]
    InvalidSegment { segment: usize, reason: String },

    #[error("too many {what} for 32-bit ids: {count}")]
    CapacityExceeded { what: &'static str, count: usize },

    #[error("network parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type NetworkResult<T> = Result<T, NetworkError>;
