//! Cargo manifest items as handed over by the persistence layer.

/// Hazard classes that make a cargo item dangerous goods.
pub const HAZARDOUS_TYPES: [&str; 4] = ["ammunition", "explosive", "fuel", "chemical"];

/// Handling priority of a single cargo item.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum CargoPriority {
    Low,
    #[default]
    Standard,
    High,
    Urgent,
    Critical,
}

impl CargoPriority {
    pub fn as_str(self) -> &'static str {
        match self {
            CargoPriority::Low      => "low",
            CargoPriority::Standard => "standard",
            CargoPriority::High     => "high",
            CargoPriority::Urgent   => "urgent",
            CargoPriority::Critical => "critical",
        }
    }
}

impl std::fmt::Display for CargoPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One line of a shipment's cargo manifest.
///
/// Environmental bounds are independent: an item with only
/// `temperature_min` set is still temperature-sensitive.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CargoItem {
    pub name:            String,
    /// Free-form type tag, e.g. `"medical"`, `"fuel"`.
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub cargo_type:      String,
    /// Kilograms.
    pub weight:          f64,
    /// Cubic metres.
    pub volume:          f64,
    pub priority:        CargoPriority,
    /// Degrees Celsius.
    pub temperature_min: Option<f64>,
    pub temperature_max: Option<f64>,
    /// Relative humidity, percent.
    pub humidity_min:    Option<f64>,
    pub humidity_max:    Option<f64>,
}

impl CargoItem {
    pub fn new(name: impl Into<String>, cargo_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cargo_type: cargo_type.into(),
            ..Self::default()
        }
    }

    pub fn priority(mut self, priority: CargoPriority) -> Self {
        self.priority = priority;
        self
    }

    pub fn weight(mut self, kg: f64) -> Self {
        self.weight = kg;
        self
    }

    pub fn volume(mut self, m3: f64) -> Self {
        self.volume = m3;
        self
    }

    pub fn temperature(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.temperature_min = min;
        self.temperature_max = max;
        self
    }

    pub fn humidity(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.humidity_min = min;
        self.humidity_max = max;
        self
    }

    /// `true` if the type tag names a hazardous class (case-insensitive).
    pub fn is_hazardous(&self) -> bool {
        let tag = self.cargo_type.trim();
        HAZARDOUS_TYPES.iter().any(|h| tag.eq_ignore_ascii_case(h))
    }

    pub fn is_temperature_sensitive(&self) -> bool {
        self.temperature_min.is_some() || self.temperature_max.is_some()
    }

    pub fn is_humidity_sensitive(&self) -> bool {
        self.humidity_min.is_some() || self.humidity_max.is_some()
    }
}
