//! Caller-facing error type.
//!
//! Every failure a route request can produce is one [`RoutingError`]
//! variant.  The sub-crate errors convert via `From`, so the orchestrator
//! propagates them with `?` and the per-request kinds keep their own
//! variant instead of collapsing into a generic wrapper.

use thiserror::Error;

use rr_cargo::{CargoError, Dimension};
use rr_core::{CoreError, GeoPoint, NodeId, SegmentId};
use rr_network::NetworkError;
use rr_routing::{CostError, SearchError};

#[derive(Debug, Error)]
pub enum RoutingError {
    #[error("no network node within {radius_m} m of {point}")]
    OutOfCoverage { point: GeoPoint, radius_m: f64 },

    #[error("infeasible cargo mix: merged {dimension} window [{min}, {max}] is empty")]
    InfeasibleCargoMix { dimension: Dimension, min: f64, max: f64 },

    #[error("travel-time prediction unavailable for {segment}: {reason}")]
    PredictionUnavailable { segment: SegmentId, reason: String },

    #[error("no route from {from} to {to}")]
    NoRouteFound { from: NodeId, to: NodeId },

    #[error("origin and destination both resolve to {0}")]
    SameNode(NodeId),

    #[error("route request cancelled")]
    Cancelled,

    /// Backpressure: the service already has `limit` requests in flight.
    #[error("route service busy: {limit} requests already in flight")]
    Busy { limit: usize },

    /// The request's worker panicked; the service itself keeps running.
    #[error("route worker panicked: {0}")]
    WorkerPanicked(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid cargo manifest: {0}")]
    InvalidCargo(String),

    /// Snapshot construction or loading failed.
    #[error("network error: {0}")]
    Network(NetworkError),

    #[error("{0} is not in the network snapshot")]
    UnknownNode(NodeId),

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type RoutingResult<T> = Result<T, RoutingError>;

impl From<NetworkError> for RoutingError {
    fn from(e: NetworkError) -> Self {
        match e {
            NetworkError::OutOfCoverage { point, radius_m } => RoutingError::OutOfCoverage { point, radius_m },
            other => RoutingError::Network(other),
        }
    }
}

impl From<CargoError> for RoutingError {
    fn from(e: CargoError) -> Self {
        match e {
            CargoError::InfeasibleCargoMix { dimension, min, max } => {
                RoutingError::InfeasibleCargoMix { dimension, min, max }
            }
            other @ CargoError::InvalidItem { .. } => RoutingError::InvalidCargo(other.to_string()),
        }
    }
}

impl From<CostError> for RoutingError {
    fn from(e: CostError) -> Self {
        match e {
            CostError::PredictionUnavailable { segment, reason } => {
                RoutingError::PredictionUnavailable { segment, reason }
            }
            other @ CostError::InvalidPenalty(_) => RoutingError::Config(other.to_string()),
        }
    }
}

impl From<SearchError> for RoutingError {
    fn from(e: SearchError) -> Self {
        match e {
            SearchError::NoRouteFound { from, to } => RoutingError::NoRouteFound { from, to },
            SearchError::SameNode(node) => RoutingError::SameNode(node),
            SearchError::Cancelled => RoutingError::Cancelled,
            SearchError::UnknownNode(node) => RoutingError::UnknownNode(node),
            SearchError::Cost(cost) => cost.into(),
        }
    }
}
