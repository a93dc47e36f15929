//! The request/response cycle.
//!
//! # Pipeline
//!
//! ```text
//! optimize(shipment, cargo, time?):
//!   ① profile   ← ConstraintProfile::build(cargo)         InfeasibleCargoMix
//!   ② snapshot  ← shared.current()                        pinned for the request
//!   ③ origin    ← nearest_node(shipment.origin)            OutOfCoverage
//!      dest     ← nearest_node(shipment.destination)       OutOfCoverage
//!   ④ path      ← finder.find_path(origin, dest, cost)     NoRouteFound / SameNode /
//!                                                          PredictionUnavailable / Cancelled
//!   ⑤ metrics   ← aggregate(path, profile)
//!   ⑥ waypoints ← stored segment geometry, junctions deduplicated
//! ```
//!
//! Any failure ends the request; no partial plan is returned.  The
//! optimizer holds no per-request state, so `optimize` takes `&self` and
//! any number of threads may call it at once.

use std::sync::Arc;

use tracing::{field, info, info_span, warn};

use rr_cargo::{CargoItem, ConstraintProfile};
use rr_core::{CancelToken, TimeContext};
use rr_network::{NetworkSnapshot, SharedSnapshot};
use rr_routing::{aggregate, CostModel, DijkstraSearch, PathFinder, RequestCost, TravelTimePredictor};

use crate::config::OptimizerConfig;
use crate::plan::{trace_waypoints, RoutePlan, Shipment};
use crate::{RoutingError, RoutingResult};

/// Composes locator, profile builder, cost model, search and metrics into
/// one call.
///
/// `F` is the path search engine; [`DijkstraSearch`] unless replaced with
/// [`with_path_finder`](Self::with_path_finder).
pub struct RouteOptimizer<F: PathFinder = DijkstraSearch> {
    snapshot:  Arc<SharedSnapshot>,
    predictor: Arc<dyn TravelTimePredictor>,
    finder:    F,
    model:     CostModel,
    config:    OptimizerConfig,
}

impl RouteOptimizer<DijkstraSearch> {
    /// Fails with `Config` if `config` does not validate.
    pub fn new(
        snapshot:  Arc<SharedSnapshot>,
        predictor: Arc<dyn TravelTimePredictor>,
        config:    OptimizerConfig,
    ) -> RoutingResult<Self> {
        Self::with_path_finder(snapshot, predictor, config, DijkstraSearch)
    }
}

impl<F: PathFinder> RouteOptimizer<F> {
    pub fn with_path_finder(
        snapshot:  Arc<SharedSnapshot>,
        predictor: Arc<dyn TravelTimePredictor>,
        config:    OptimizerConfig,
        finder:    F,
    ) -> RoutingResult<Self> {
        config.validate()?;
        let model = CostModel::new(config.penalty_factor)?;
        Ok(Self { snapshot, predictor, finder, model, config })
    }

    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    pub fn shared_snapshot(&self) -> &Arc<SharedSnapshot> {
        &self.snapshot
    }

    /// Swap in a rebuilt network.  Requests already running finish on the
    /// snapshot they started with.  Returns the new generation number.
    pub fn refresh(&self, snapshot: NetworkSnapshot) -> u64 {
        self.snapshot.replace(snapshot);
        self.snapshot.generation()
    }

    /// Route `shipment` carrying `cargo` at `time` (now, if `None`).
    pub fn optimize(
        &self,
        shipment: &Shipment,
        cargo:    &[CargoItem],
        time:     Option<TimeContext>,
    ) -> RoutingResult<RoutePlan> {
        self.optimize_with_cancel(shipment, cargo, time, &CancelToken::new())
    }

    /// Like [`optimize`](Self::optimize), abandoning the search with
    /// `Cancelled` once `cancel` fires.
    pub fn optimize_with_cancel(
        &self,
        shipment: &Shipment,
        cargo:    &[CargoItem],
        time:     Option<TimeContext>,
        cancel:   &CancelToken,
    ) -> RoutingResult<RoutePlan> {
        let span = info_span!(
            "optimize",
            shipment = %shipment.id,
            priority = %shipment.priority,
            tolerance = field::Empty,
        );
        let _enter = span.enter();

        let result = self.plan(shipment, cargo, time, cancel, &span);
        match &result {
            Ok(plan) => info!(
                segments = plan.segments.len(),
                distance_m = plan.metrics.total_distance_m,
                duration_secs = plan.estimated_duration_secs,
                risk_level = plan.metrics.risk_level.as_str(),
                "route planned"
            ),
            Err(e) => warn!(error = %e, "route request failed"),
        }
        result
    }

    fn plan(
        &self,
        shipment: &Shipment,
        cargo:    &[CargoItem],
        time:     Option<TimeContext>,
        cancel:   &CancelToken,
        span:     &tracing::Span,
    ) -> RoutingResult<RoutePlan> {
        if cancel.is_cancelled() {
            return Err(RoutingError::Cancelled);
        }

        let profile = ConstraintProfile::build(cargo)?;
        span.record("tolerance", profile.risk_tolerance.as_str());
        let time = time.unwrap_or_else(TimeContext::now);

        let snapshot = self.snapshot.current();
        let radius = self.config.max_snap_radius_m;
        let origin = snapshot.nearest_node(shipment.origin, radius)?;
        let destination = snapshot.nearest_node(shipment.destination, radius)?;

        let cost = RequestCost {
            snapshot:  &snapshot,
            predictor: &*self.predictor,
            model:     self.model,
            time,
            tolerance: profile.risk_tolerance,
            profile:   &profile,
        };
        let path = self.finder.find_path(&snapshot, origin, destination, &cost, cancel)?;
        let metrics = aggregate(&snapshot, &path, &profile, &self.config.risk);

        Ok(RoutePlan {
            waypoints: trace_waypoints(&snapshot, &path.segments),
            segments: path.segments,
            origin_node: origin,
            destination_node: destination,
            risk_tolerance: profile.risk_tolerance,
            estimated_duration_secs: metrics.total_time_secs,
            metrics,
        })
    }
}
