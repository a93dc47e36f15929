//! Constraint profile derived from a cargo manifest.
//!
//! # Merge rules
//!
//! | Field               | Rule                                                |
//! |---------------------|-----------------------------------------------------|
//! | environmental window| min = max of item minimums, max = min of maximums   |
//! | totals              | sum over items                                      |
//! | dangerous goods     | any item hazardous                                  |
//! | risk tolerance      | any critical → low; else all low → high; else medium |
//!
//! A merged window with `min > max` is an unshippable mix and is rejected
//! here, before any routing work starts.

use rr_core::RiskTolerance;

use crate::cargo::{CargoItem, CargoPriority};
use crate::{CargoError, CargoResult};

/// Environmental quantity a window constrains.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Dimension {
    Temperature,
    Humidity,
}

impl std::fmt::Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Dimension::Temperature => "temperature",
            Dimension::Humidity    => "humidity",
        })
    }
}

/// Closed interval with optionally open ends.  `None` means unbounded on
/// that side.
#[derive(Copy, Clone, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Window {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl Window {
    /// Tighten `self` by one item's bounds.
    fn intersect(&mut self, min: Option<f64>, max: Option<f64>) {
        if let Some(lo) = min {
            self.min = Some(self.min.map_or(lo, |cur| cur.max(lo)));
        }
        if let Some(hi) = max {
            self.max = Some(self.max.map_or(hi, |cur| cur.min(hi)));
        }
    }

    pub fn is_feasible(&self) -> bool {
        match (self.min, self.max) {
            (Some(lo), Some(hi)) => lo <= hi,
            _ => true,
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        self.min.is_none_or(|lo| value >= lo) && self.max.is_none_or(|hi| value <= hi)
    }
}

/// Routing constraints and risk posture for one request.  Immutable once
/// built; create with [`ConstraintProfile::build`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConstraintProfile {
    /// `Some` iff at least one item carries a temperature bound.
    pub temperature:         Option<Window>,
    /// `Some` iff at least one item carries a humidity bound.
    pub humidity:            Option<Window>,
    pub total_weight:        f64,
    pub total_volume:        f64,
    pub has_dangerous_goods: bool,
    pub risk_tolerance:      RiskTolerance,
}

impl ConstraintProfile {
    /// Derive the profile for `items`.
    ///
    /// Pure and deterministic.  Fails with
    /// [`CargoError::InfeasibleCargoMix`] if the merged temperature or
    /// humidity window is empty, and with [`CargoError::InvalidItem`] on a
    /// non-finite or negative quantity.
    ///
    /// An empty manifest yields an unconstrained profile with `High`
    /// tolerance: "every item is low priority" holds vacuously.
    pub fn build(items: &[CargoItem]) -> CargoResult<Self> {
        let mut temperature: Option<Window> = None;
        let mut humidity: Option<Window> = None;
        let mut total_weight = 0.0;
        let mut total_volume = 0.0;
        let mut has_dangerous_goods = false;

        for (index, item) in items.iter().enumerate() {
            validate_item(index, item)?;

            if item.is_temperature_sensitive() {
                temperature
                    .get_or_insert_with(Window::default)
                    .intersect(item.temperature_min, item.temperature_max);
            }
            if item.is_humidity_sensitive() {
                humidity
                    .get_or_insert_with(Window::default)
                    .intersect(item.humidity_min, item.humidity_max);
            }

            total_weight += item.weight;
            total_volume += item.volume;
            has_dangerous_goods |= item.is_hazardous();
        }

        check_feasible(Dimension::Temperature, temperature)?;
        check_feasible(Dimension::Humidity, humidity)?;

        Ok(Self {
            temperature,
            humidity,
            total_weight,
            total_volume,
            has_dangerous_goods,
            risk_tolerance: risk_tolerance_for(items),
        })
    }

    #[inline]
    pub fn temp_sensitive(&self) -> bool {
        self.temperature.is_some()
    }

    #[inline]
    pub fn humidity_sensitive(&self) -> bool {
        self.humidity.is_some()
    }

    /// Temperature- or humidity-sensitive.
    #[inline]
    pub fn is_climate_sensitive(&self) -> bool {
        self.temp_sensitive() || self.humidity_sensitive()
    }
}

/// Any critical item takes precedence over "all low".
pub fn risk_tolerance_for(items: &[CargoItem]) -> RiskTolerance {
    if items.iter().any(|i| i.priority == CargoPriority::Critical) {
        RiskTolerance::Low
    } else if items.iter().all(|i| i.priority == CargoPriority::Low) {
        RiskTolerance::High
    } else {
        RiskTolerance::Medium
    }
}

fn check_feasible(dimension: Dimension, window: Option<Window>) -> CargoResult<()> {
    match window {
        Some(w @ Window { min: Some(min), max: Some(max) }) if !w.is_feasible() => {
            Err(CargoError::InfeasibleCargoMix { dimension, min, max })
        }
        _ => Ok(()),
    }
}

fn validate_item(index: usize, item: &CargoItem) -> CargoResult<()> {
    for (field, value) in [("weight", item.weight), ("volume", item.volume)] {
        if !value.is_finite() || value < 0.0 {
            return Err(CargoError::InvalidItem { index, field, value });
        }
    }
    let bounds = [
        ("temperature_min", item.temperature_min),
        ("temperature_max", item.temperature_max),
        ("humidity_min", item.humidity_min),
        ("humidity_max", item.humidity_max),
    ];
    for (field, bound) in bounds {
        if let Some(value) = bound.filter(|v| !v.is_finite()) {
            return Err(CargoError::InvalidItem { index, field, value });
        }
    }
    Ok(())
}
