//! Travel-time predictor seam.
//!
//! The trained model lives outside this workspace.  The engine only needs
//! `features → seconds`, expressed by [`TravelTimePredictor`].  Any
//! `Fn(&FeatureVector) -> Result<f64, PredictionError>` closure qualifies,
//! which keeps adapters for external models to a few lines.
//!
//! [`FreeFlowPredictor`] is a deterministic baseline for deployments
//! without a trained model and for tests.

use thiserror::Error;

use rr_core::TimeContext;
use rr_network::SegmentView;

// ── Features ──────────────────────────────────────────────────────────────────

/// Inputs the predictor sees for one segment under one time context.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FeatureVector {
    /// [`RoadClass::code`](rr_network::RoadClass::code).
    pub road_class:  u8,
    pub length_m:    f64,
    pub speed_mps:   f64,
    pub hour:        u8,
    pub day_of_week: u8,
}

impl FeatureVector {
    pub fn for_segment(segment: &SegmentView<'_>, time: TimeContext) -> Self {
        Self {
            road_class:  segment.class.code(),
            length_m:    segment.length_m,
            speed_mps:   segment.speed_mps,
            hour:        time.hour(),
            day_of_week: time.day_of_week(),
        }
    }

    /// Flat numeric layout `[class, length, speed, hour, day]` for models
    /// that take a plain row.
    pub fn to_array(&self) -> [f64; 5] {
        [
            self.road_class as f64,
            self.length_m,
            self.speed_mps,
            self.hour as f64,
            self.day_of_week as f64,
        ]
    }
}

// ── Predictor trait ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
#[error("{0}")]
pub struct PredictionError(pub String);

/// Maps segment features to an expected traversal time in seconds.
///
/// # Thread safety
///
/// One predictor serves every concurrent request, so implementations must
/// be `Send + Sync` and must not rely on interior mutability that could
/// serialise callers.
pub trait TravelTimePredictor: Send + Sync {
    fn predict(&self, features: &FeatureVector) -> Result<f64, PredictionError>;
}

impl<F> TravelTimePredictor for F
where
    F: Fn(&FeatureVector) -> Result<f64, PredictionError> + Send + Sync,
{
    fn predict(&self, features: &FeatureVector) -> Result<f64, PredictionError> {
        self(features)
    }
}

// ── FreeFlowPredictor ─────────────────────────────────────────────────────────

/// Congestion multiplier during weekday rush hours.
pub const RUSH_HOUR_FACTOR: f64 = 1.3;

/// `length / free-flow speed`, scaled by an hour-of-day congestion profile.
///
/// The default profile applies [`RUSH_HOUR_FACTOR`] on weekdays at 07–09
/// and 16–18 and 1.0 at all other times.
#[derive(Clone, Debug)]
pub struct FreeFlowPredictor {
    weekday: [f64; 24],
    weekend: [f64; 24],
}

impl FreeFlowPredictor {
    /// Plain `length / speed` with no congestion at any hour.
    pub fn uncongested() -> Self {
        Self { weekday: [1.0; 24], weekend: [1.0; 24] }
    }

    /// Custom per-hour factors.  Factors must be positive and finite.
    pub fn with_profiles(weekday: [f64; 24], weekend: [f64; 24]) -> Result<Self, PredictionError> {
        if weekday.iter().chain(weekend.iter()).any(|f| !f.is_finite() || *f <= 0.0) {
            return Err(PredictionError("congestion factors must be positive and finite".into()));
        }
        Ok(Self { weekday, weekend })
    }

    pub fn factor(&self, hour: u8, day_of_week: u8) -> f64 {
        let profile = if day_of_week >= 5 { &self.weekend } else { &self.weekday };
        profile[(hour as usize).min(23)]
    }
}

impl Default for FreeFlowPredictor {
    fn default() -> Self {
        let mut weekday = [1.0; 24];
        for h in [7, 8, 16, 17] {
            weekday[h] = RUSH_HOUR_FACTOR;
        }
        Self { weekday, weekend: [1.0; 24] }
    }
}

impl TravelTimePredictor for FreeFlowPredictor {
    fn predict(&self, f: &FeatureVector) -> Result<f64, PredictionError> {
        if !f.speed_mps.is_finite() || f.speed_mps <= 0.0 {
            return Err(PredictionError(format!("free-flow speed {} m/s is not positive", f.speed_mps)));
        }
        Ok(f.length_m / f.speed_mps * self.factor(f.hour, f.day_of_week))
    }
}
