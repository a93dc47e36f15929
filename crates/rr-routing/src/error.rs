//! Routing-subsystem error types.

use thiserror::Error;

use rr_core::{NodeId, SegmentId};

/// Errors from the cost model.
#[derive(Debug, Error)]
pub enum CostError {
    /// The predictor could not score a segment.  Terminal for the request:
    /// it points at a missing or incompatible model, not a transient fault.
    #[error("travel-time prediction unavailable for {segment}: {reason}")]
    PredictionUnavailable { segment: SegmentId, reason: String },

    #[error("penalty factor must be finite and greater than 1, got {0}")]
    InvalidPenalty(f64),
}

pub type CostResult<T> = Result<T, CostError>;

/// Errors from the path search.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("no route from {from} to {to}")]
    NoRouteFound { from: NodeId, to: NodeId },

    #[error("origin and destination both resolve to {0}")]
    SameNode(NodeId),

    #[error("search cancelled")]
    Cancelled,

    /// A node id outside the snapshot.  Only reachable if ids from one
    /// snapshot are used against another.
    #[error("{0} is not in the network snapshot")]
    UnknownNode(NodeId),

    #[error(transparent)]
    Cost(#[from] CostError),
}

pub type SearchResult<T> = Result<T, SearchError>;
