//! Optimizer configuration.
//!
//! Loaded from JSON by the application and handed to
//! [`RouteOptimizer::new`](crate::RouteOptimizer::new), which validates it.
//! Every field has a default, so a partial (or empty `{}`) document is
//! accepted.
//!
//! ```json
//! {
//!   "max_snap_radius_m": 500.0,
//!   "penalty_factor": 5.0,
//!   "worker_threads": null,
//!   "max_in_flight": 64,
//!   "risk": { "dangerous_goods_increment": 50.0, "environmental_increment": 30.0 }
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use rr_routing::{RiskPolicy, DEFAULT_PENALTY_FACTOR};

use crate::{RoutingError, RoutingResult};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    /// Furthest a shipment endpoint may lie from its snapped node, metres.
    pub max_snap_radius_m: f64,

    /// Cost multiplier for segments the cargo constraints penalise.  Must be
    /// greater than 1.
    pub penalty_factor: f64,

    /// Route service worker threads.  `None` uses all logical cores.
    pub worker_threads: Option<usize>,

    /// Requests the route service accepts concurrently before answering
    /// `Busy`.
    pub max_in_flight: usize,

    pub risk: RiskPolicy,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            max_snap_radius_m: 500.0,
            penalty_factor:    DEFAULT_PENALTY_FACTOR,
            worker_threads:    None,
            max_in_flight:     64,
            risk:              RiskPolicy::default(),
        }
    }
}

impl OptimizerConfig {
    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> RoutingResult<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| RoutingError::Config(format!("invalid optimizer config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file.
    pub fn from_path(path: &Path) -> RoutingResult<Self> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| RoutingError::Config(format!("reading {}: {e}", path.display())))?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> RoutingResult<()> {
        if !self.max_snap_radius_m.is_finite() || self.max_snap_radius_m <= 0.0 {
            return Err(RoutingError::Config(format!(
                "max_snap_radius_m must be positive, got {}",
                self.max_snap_radius_m
            )));
        }
        if !self.penalty_factor.is_finite() || self.penalty_factor <= 1.0 {
            return Err(RoutingError::Config(format!(
                "penalty_factor must be greater than 1, got {}",
                self.penalty_factor
            )));
        }
        if self.max_in_flight == 0 {
            return Err(RoutingError::Config("max_in_flight must be at least 1".into()));
        }
        if self.worker_threads == Some(0) {
            return Err(RoutingError::Config("worker_threads must be at least 1 when set".into()));
        }
        for (name, value) in [
            ("risk.dangerous_goods_increment", self.risk.dangerous_goods_increment),
            ("risk.environmental_increment", self.risk.environmental_increment),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(RoutingError::Config(format!("{name} must be non-negative, got {value}")));
            }
        }
        Ok(())
    }
}
