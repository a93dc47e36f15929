//! Risk posture enums shared by the cargo, routing and optimizer crates.

/// How much route risk a shipment accepts in exchange for speed.
///
/// Derived from the cargo manifest; scales predicted segment times in the
/// cost model.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum RiskTolerance {
    /// Pad estimates and favour well-understood segments.
    Low,
    #[default]
    Medium,
    /// Accept shorter but less certain segments.
    High,
}

impl RiskTolerance {
    /// Multiplier applied to predicted traversal time.
    ///
    /// | Tolerance | Factor |
    /// |-----------|--------|
    /// | low       | 1.5    |
    /// | medium    | 1.0    |
    /// | high      | 0.7    |
    #[inline]
    pub fn time_multiplier(self) -> f64 {
        match self {
            RiskTolerance::Low    => 1.5,
            RiskTolerance::Medium => 1.0,
            RiskTolerance::High   => 0.7,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RiskTolerance::Low    => "low",
            RiskTolerance::Medium => "medium",
            RiskTolerance::High   => "high",
        }
    }
}

impl std::fmt::Display for RiskTolerance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Overall risk classification of a computed route.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Upper bound (exclusive) of the `Low` band.
    pub const MEDIUM_FROM: f64 = 30.0;
    /// Upper bound (exclusive) of the `Medium` band.
    pub const HIGH_FROM: f64 = 70.0;

    /// Classify a combined risk total.  Each band includes its lower bound,
    /// so exactly 30 is `Medium` and exactly 70 is `High`.
    pub fn from_total(total: f64) -> Self {
        if total < Self::MEDIUM_FROM {
            RiskLevel::Low
        } else if total < Self::HIGH_FROM {
            RiskLevel::Medium
        } else {
            RiskLevel::High
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RiskLevel::Low    => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High   => "high",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
