//! Request and response records.

use serde::{Deserialize, Serialize};

use rr_cargo::CargoPriority;
use rr_core::{GeoPoint, NodeId, RiskTolerance, SegmentId};
use rr_network::NetworkSnapshot;
use rr_routing::Metrics;

/// Where a shipment starts and ends.  Cargo travels separately as a
/// manifest of `CargoItem`s.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Shipment {
    /// Caller's reference, carried into logs only.
    #[serde(default)]
    pub id:          String,
    pub origin:      GeoPoint,
    pub destination: GeoPoint,
    /// Recorded on the request span; does not change the route.
    #[serde(default)]
    pub priority:    CargoPriority,
}

impl Shipment {
    pub fn new(id: impl Into<String>, origin: GeoPoint, destination: GeoPoint) -> Self {
        Self { id: id.into(), origin, destination, priority: CargoPriority::default() }
    }

    pub fn priority(mut self, priority: CargoPriority) -> Self {
        self.priority = priority;
        self
    }
}

/// A computed route.  Owned by the caller once returned.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoutePlan {
    /// Geographic trace, origin node first, destination node last.
    pub waypoints:               Vec<GeoPoint>,
    pub segments:                Vec<SegmentId>,
    pub origin_node:             NodeId,
    pub destination_node:        NodeId,
    pub risk_tolerance:          RiskTolerance,
    /// Same as `metrics.total_time_secs`.
    pub estimated_duration_secs: f64,
    pub metrics:                 Metrics,
}

/// Concatenate the stored geometry of `segments`, emitting each shared
/// junction point once.
pub(crate) fn trace_waypoints(snapshot: &NetworkSnapshot, segments: &[SegmentId]) -> Vec<GeoPoint> {
    let mut out: Vec<GeoPoint> = Vec::new();
    for &segment in segments {
        let points = snapshot.segment_waypoints(segment);
        let skip = match (out.last(), points.first()) {
            (Some(last), Some(first)) if last == first => 1,
            _ => 0,
        };
        out.extend_from_slice(&points[skip..]);
    }
    out
}
