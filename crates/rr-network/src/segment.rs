//! Per-segment attributes and the builder-side segment description.

use rr_core::{GeoPoint, NodeId};

// ── RoadClass ─────────────────────────────────────────────────────────────────

/// Functional class of a drivable road, after the OSM `highway` tag.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RoadClass {
    Motorway,
    Trunk,
    Primary,
    Secondary,
    Tertiary,
    Residential,
    Service,
    #[default]
    Unclassified,
}

impl RoadClass {
    /// Parse an OSM `highway` value.
    ///
    /// Link roads map onto their parent class.  Returns `None` for values
    /// that are not drivable by a cargo vehicle; unknown values fall back to
    /// `Unclassified` rather than being dropped.
    pub fn parse(highway: &str) -> Option<RoadClass> {
        match highway.trim() {
            "motorway" | "motorway_link"     => Some(RoadClass::Motorway),
            "trunk" | "trunk_link"           => Some(RoadClass::Trunk),
            "primary" | "primary_link"       => Some(RoadClass::Primary),
            "secondary" | "secondary_link"   => Some(RoadClass::Secondary),
            "tertiary" | "tertiary_link"     => Some(RoadClass::Tertiary),
            "residential" | "living_street"  => Some(RoadClass::Residential),
            "service"                        => Some(RoadClass::Service),
            "footway" | "path" | "cycleway"
            | "pedestrian" | "steps" | "track" => None,
            _                                => Some(RoadClass::Unclassified),
        }
    }

    /// Free-flow speed (m/s) assumed when the data source gives none.
    pub fn default_speed_mps(self) -> f64 {
        match self {
            RoadClass::Motorway     => 29.1, // ~105 km/h
            RoadClass::Trunk        => 24.6, // ~89 km/h
            RoadClass::Primary      => 20.1, // ~72 km/h
            RoadClass::Secondary    => 17.9, // ~64 km/h
            RoadClass::Tertiary     => 13.4, // ~48 km/h
            RoadClass::Residential  => 8.9,  // ~32 km/h
            RoadClass::Service      => 6.7,  // ~24 km/h
            RoadClass::Unclassified => 8.9,
        }
    }

    /// Ordinal code fed to travel-time predictors (0 = motorway).
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RoadClass::Motorway     => "motorway",
            RoadClass::Trunk        => "trunk",
            RoadClass::Primary      => "primary",
            RoadClass::Secondary    => "secondary",
            RoadClass::Tertiary     => "tertiary",
            RoadClass::Residential  => "residential",
            RoadClass::Service      => "service",
            RoadClass::Unclassified => "unclassified",
        }
    }
}

impl std::fmt::Display for RoadClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Hazard and climate tags ───────────────────────────────────────────────────

/// Hazard classification of a segment.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum HazardTag {
    /// Environmental exposure (unsheltered, extreme heat, flood-prone).
    /// Relevant to temperature- and humidity-sensitive cargo.
    Exposure,
    /// Restricted or hazard corridor.  Relevant to dangerous goods.
    Corridor,
}

impl HazardTag {
    pub fn parse(s: &str) -> Option<HazardTag> {
        match s.trim() {
            "exposure" => Some(HazardTag::Exposure),
            "corridor" => Some(HazardTag::Corridor),
            _ => None,
        }
    }
}

/// Whether a segment supports climate-controlled transport.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ClimateHandling {
    Compliant,
    NonCompliant,
    /// No data.  Treated as non-compliant by the risk metrics.
    #[default]
    Unknown,
}

impl ClimateHandling {
    pub fn parse(s: &str) -> Option<ClimateHandling> {
        match s.trim() {
            "compliant"     => Some(ClimateHandling::Compliant),
            "non_compliant" => Some(ClimateHandling::NonCompliant),
            "unknown" | ""  => Some(ClimateHandling::Unknown),
            _ => None,
        }
    }

    /// Only an explicit `Compliant` counts.
    #[inline]
    pub fn is_compliant(self) -> bool {
        self == ClimateHandling::Compliant
    }
}

// ── SegmentSpec ───────────────────────────────────────────────────────────────

/// Description of one directed segment handed to
/// [`SnapshotBuilder::add_segment`](crate::SnapshotBuilder::add_segment).
///
/// ```
/// use rr_core::NodeId;
/// use rr_network::{HazardTag, RoadClass, SegmentSpec};
///
/// let spec = SegmentSpec::new(NodeId(0), NodeId(1), 850.0, RoadClass::Primary)
///     .speed_mps(16.7)
///     .hazard(HazardTag::Corridor);
/// assert_eq!(spec.hazard, Some(HazardTag::Corridor));
/// ```
#[derive(Clone, Debug)]
pub struct SegmentSpec {
    pub from:      NodeId,
    pub to:        NodeId,
    pub length_m:  f64,
    /// `None` uses [`RoadClass::default_speed_mps`].
    pub speed_mps: Option<f64>,
    pub class:     RoadClass,
    pub hazard:    Option<HazardTag>,
    pub climate:   ClimateHandling,
    /// Shape points from `from` to `to`.  Empty means "straight line between
    /// the two end nodes".
    pub geometry:  Vec<GeoPoint>,
}

impl SegmentSpec {
    pub fn new(from: NodeId, to: NodeId, length_m: f64, class: RoadClass) -> Self {
        Self {
            from,
            to,
            length_m,
            speed_mps: None,
            class,
            hazard: None,
            climate: ClimateHandling::Unknown,
            geometry: Vec::new(),
        }
    }

    pub fn speed_mps(mut self, speed: f64) -> Self {
        self.speed_mps = Some(speed);
        self
    }

    pub fn hazard(mut self, tag: HazardTag) -> Self {
        self.hazard = Some(tag);
        self
    }

    pub fn climate(mut self, climate: ClimateHandling) -> Self {
        self.climate = climate;
        self
    }

    pub fn geometry(mut self, points: Vec<GeoPoint>) -> Self {
        self.geometry = points;
        self
    }

    /// The same segment in the opposite direction, shape points reversed.
    pub fn reversed(&self) -> Self {
        let mut geometry = self.geometry.clone();
        geometry.reverse();
        Self {
            from: self.to,
            to: self.from,
            geometry,
            ..self.clone()
        }
    }
}
