//! Route metrics aggregation.
//!
//! # Zone classification
//!
//! A traversed segment is a **danger zone** if it carries any hazard tag or
//! incurred the constraint penalty during the search; otherwise it is a
//! **safe zone**.  Counts are per segment, not distance-weighted.
//!
//! # Risk accumulation
//!
//! | Contribution        | Condition                                           |
//! |---------------------|-----------------------------------------------------|
//! | `risk_score`        | dangerous goods and at least one danger zone        |
//! | `environmental_risk`| climate-sensitive and any segment not `Compliant`   |
//!
//! The overall [`RiskLevel`] classifies `risk_score + environmental_risk`.

use rr_cargo::ConstraintProfile;
use rr_core::RiskLevel;
use rr_network::{NetworkSnapshot, SegmentView};

use crate::cost::SegmentCost;
use crate::search::FoundPath;

/// Fixed risk increments.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RiskPolicy {
    /// Added to `risk_score` when dangerous goods cross a danger zone.
    pub dangerous_goods_increment: f64,
    /// Added to `environmental_risk` when climate-sensitive cargo crosses a
    /// segment without compliant handling.
    pub environmental_increment:   f64,
}

impl Default for RiskPolicy {
    fn default() -> Self {
        Self { dangerous_goods_increment: 50.0, environmental_increment: 30.0 }
    }
}

/// Path-level distance, time and risk summary.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Metrics {
    pub total_distance_m:   f64,
    /// Sum of the risk-weighted predicted times used by the search.
    pub total_time_secs:    f64,
    pub risk_score:         f64,
    pub environmental_risk: f64,
    pub safe_zones:         u32,
    pub danger_zones:       u32,
    pub risk_level:         RiskLevel,
}

impl Metrics {
    pub fn total_risk(&self) -> f64 {
        self.risk_score + self.environmental_risk
    }
}

#[inline]
pub fn is_danger_zone(segment: &SegmentView<'_>, cost: &SegmentCost) -> bool {
    segment.hazard.is_some() || cost.penalized
}

/// Reduce `path` to [`Metrics`].
///
/// Times come from the costs cached in `path`; the predictor is not called
/// again.
pub fn aggregate(
    snapshot: &NetworkSnapshot,
    path:     &FoundPath,
    profile:  &ConstraintProfile,
    policy:   &RiskPolicy,
) -> Metrics {
    let mut total_distance_m = 0.0;
    let mut total_time_secs = 0.0;
    let mut danger_zones = 0u32;
    let mut all_climate_compliant = true;

    for (&id, cost) in path.segments.iter().zip(&path.costs) {
        let segment = snapshot.segment(id);
        total_distance_m += segment.length_m;
        total_time_secs += cost.weighted_secs;
        if is_danger_zone(&segment, cost) {
            danger_zones += 1;
        }
        all_climate_compliant &= segment.climate.is_compliant();
    }
    let safe_zones = path.segments.len() as u32 - danger_zones;

    let risk_score = if profile.has_dangerous_goods && danger_zones > 0 {
        policy.dangerous_goods_increment
    } else {
        0.0
    };
    let environmental_risk = if profile.is_climate_sensitive() && !all_climate_compliant {
        policy.environmental_increment
    } else {
        0.0
    };

    Metrics {
        total_distance_m,
        total_time_secs,
        risk_score,
        environmental_risk,
        safe_zones,
        danger_zones,
        risk_level: RiskLevel::from_total(risk_score + environmental_risk),
    }
}
