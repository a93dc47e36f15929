//! Per-request segment cost model.
//!
//! # Cost formula
//!
//! ```text
//! predicted = predictor(features(segment, time))           seconds
//! weighted  = predicted × tolerance multiplier             1.5 / 1.0 / 0.7
//! cost      = max(weighted × penalty?, MIN_SEGMENT_COST)
//! ```
//!
//! The penalty applies when the segment is an exposure hazard and the cargo
//! is climate-sensitive, or it is a hazard corridor and the cargo includes
//! dangerous goods.  It is a soft constraint: penalised segments stay in
//! the graph so a route through them is still found when nothing else
//! connects.
//!
//! A predictor **error** is terminal for the request.  A predictor
//! **value** that is negative or not finite means the segment cannot be
//! scored; it is left out of this request's graph.

use tracing::warn;

use rr_cargo::ConstraintProfile;
use rr_core::{RiskTolerance, SegmentId, TimeContext};
use rr_network::{HazardTag, NetworkSnapshot, SegmentView};

use crate::predictor::{FeatureVector, TravelTimePredictor};
use crate::{CostError, CostResult};

/// Floor for a segment cost so every admitted edge is strictly positive.
pub const MIN_SEGMENT_COST: f64 = 1e-6;

/// Default multiplier for constraint-penalised segments.
pub const DEFAULT_PENALTY_FACTOR: f64 = 5.0;

// ── SegmentCost ───────────────────────────────────────────────────────────────

/// Cost breakdown for one segment under one request.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SegmentCost {
    /// Raw predictor output, seconds.
    pub predicted_secs: f64,
    /// Predicted time scaled by the risk tolerance multiplier.  This is the
    /// time the route metrics report.
    pub weighted_secs:  f64,
    /// Search weight: `weighted_secs`, penalised if applicable, floored.
    pub cost:           f64,
    pub penalized:      bool,
}

// ── CostModel ─────────────────────────────────────────────────────────────────

/// Request-independent cost parameters.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CostModel {
    penalty_factor: f64,
}

impl CostModel {
    /// Fails unless `penalty_factor` is finite and `> 1`.
    pub fn new(penalty_factor: f64) -> CostResult<Self> {
        if !penalty_factor.is_finite() || penalty_factor <= 1.0 {
            return Err(CostError::InvalidPenalty(penalty_factor));
        }
        Ok(Self { penalty_factor })
    }

    pub fn penalty_factor(&self) -> f64 {
        self.penalty_factor
    }

    /// `true` if the cargo constraints penalise traversing `segment`.
    pub fn penalty_applies(segment: &SegmentView<'_>, profile: &ConstraintProfile) -> bool {
        match segment.hazard {
            Some(HazardTag::Exposure) => profile.is_climate_sensitive(),
            Some(HazardTag::Corridor) => profile.has_dangerous_goods,
            None => false,
        }
    }

    /// Cost of traversing `segment` at `time` for a shipment with the given
    /// tolerance and constraints.
    ///
    /// Returns `Ok(None)` when the predictor's value cannot be used, which
    /// excludes the segment from this request's search.
    pub fn segment_cost<P: TravelTimePredictor + ?Sized>(
        &self,
        segment:   &SegmentView<'_>,
        time:      TimeContext,
        tolerance: RiskTolerance,
        profile:   &ConstraintProfile,
        predictor: &P,
    ) -> CostResult<Option<SegmentCost>> {
        let features = FeatureVector::for_segment(segment, time);
        let predicted_secs = predictor.predict(&features).map_err(|e| {
            CostError::PredictionUnavailable { segment: segment.id, reason: e.to_string() }
        })?;

        if !predicted_secs.is_finite() || predicted_secs < 0.0 {
            warn!(segment = %segment.id, predicted_secs, "unusable prediction, segment excluded");
            return Ok(None);
        }

        let weighted_secs = predicted_secs * tolerance.time_multiplier();
        let penalized = Self::penalty_applies(segment, profile);
        let raw = if penalized { weighted_secs * self.penalty_factor } else { weighted_secs };

        Ok(Some(SegmentCost {
            predicted_secs,
            weighted_secs,
            cost: raw.max(MIN_SEGMENT_COST),
            penalized,
        }))
    }
}

impl Default for CostModel {
    fn default() -> Self {
        Self { penalty_factor: DEFAULT_PENALTY_FACTOR }
    }
}

// ── CostFunction ──────────────────────────────────────────────────────────────

/// Edge weights for one search, keyed by segment.
///
/// Evaluated lazily: the search asks only for segments it actually relaxes.
/// `Ok(None)` excludes the segment; `Err` aborts the search.
pub trait CostFunction {
    fn segment_cost(&self, segment: SegmentId) -> CostResult<Option<SegmentCost>>;
}

impl<F> CostFunction for F
where
    F: Fn(SegmentId) -> CostResult<Option<SegmentCost>>,
{
    fn segment_cost(&self, segment: SegmentId) -> CostResult<Option<SegmentCost>> {
        self(segment)
    }
}

/// [`CostModel`] closed over one request's parameters.
///
/// Holds only shared borrows, so any number of these can run against the
/// same snapshot and predictor at once.
pub struct RequestCost<'a, P: TravelTimePredictor + ?Sized> {
    pub snapshot:  &'a NetworkSnapshot,
    pub predictor: &'a P,
    pub model:     CostModel,
    pub time:      TimeContext,
    pub tolerance: RiskTolerance,
    pub profile:   &'a ConstraintProfile,
}

impl<P: TravelTimePredictor + ?Sized> CostFunction for RequestCost<'_, P> {
    fn segment_cost(&self, segment: SegmentId) -> CostResult<Option<SegmentCost>> {
        self.model.segment_cost(
            &self.snapshot.segment(segment),
            self.time,
            self.tolerance,
            self.profile,
            self.predictor,
        )
    }
}
