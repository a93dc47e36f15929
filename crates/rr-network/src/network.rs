//! Network snapshot representation and builder.
//!
//! # Data layout
//!
//! Outgoing segments are stored in **Compressed Sparse Row (CSR)** form.
//! Given a `NodeId n`, its outgoing segments are the ids
//!
//! ```text
//! node_out_start[n] .. node_out_start[n+1]
//! ```
//!
//! and every `seg_*` column is indexed by `SegmentId`.  Shape points are a
//! second CSR level: segment `s` owns
//! `waypoints[waypoint_start[s] .. waypoint_start[s+1]]`.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) over node `[lat, lon]` backs
//! [`nearest_node`](NetworkSnapshot::nearest_node); see [`crate::locator`].
//!
//! # Immutability
//!
//! A snapshot has no `&mut self` methods.  Refreshing road data means
//! building a new snapshot and swapping it in through
//! [`SharedSnapshot`](crate::SharedSnapshot).

use rstar::{PointDistance, RTree, RTreeObject, AABB};
use tracing::info;

use rr_core::{GeoPoint, NodeId, SegmentId};

use crate::segment::{ClimateHandling, HazardTag, RoadClass, SegmentSpec};
use crate::{NetworkError, NetworkResult};

// ── R-tree node entry ─────────────────────────────────────────────────────────

#[derive(Clone)]
pub(crate) struct NodeEntry {
    pub(crate) point: [f64; 2], // [lat, lon]
    pub(crate) id:    NodeId,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodeEntry {
    /// Squared distance in degree space.  Only used to rank candidates; the
    /// locator re-measures the best few with haversine.
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dlat = self.point[0] - point[0];
        let dlon = self.point[1] - point[1];
        dlat * dlat + dlon * dlon
    }
}

// ── SegmentView ───────────────────────────────────────────────────────────────

/// Borrowed view of every attribute of one segment.
#[derive(Copy, Clone, Debug)]
pub struct SegmentView<'a> {
    pub id:        SegmentId,
    pub from:      NodeId,
    pub to:        NodeId,
    pub length_m:  f64,
    pub speed_mps: f64,
    pub class:     RoadClass,
    pub hazard:    Option<HazardTag>,
    pub climate:   ClimateHandling,
    pub waypoints: &'a [GeoPoint],
}

// ── NetworkSnapshot ───────────────────────────────────────────────────────────

/// Immutable directed road graph in CSR format plus a node spatial index.
///
/// Columns are `pub` for direct indexed access on the search hot path.  Do
/// not construct directly; use [`SnapshotBuilder`].
pub struct NetworkSnapshot {
    // ── Node data ─────────────────────────────────────────────────────────
    /// Geographic position of each node.  Indexed by `NodeId`.
    pub node_pos: Vec<GeoPoint>,

    /// CSR row pointer, length `node_count + 1`.
    pub node_out_start: Vec<u32>,

    // ── Segment data (indexed by SegmentId) ───────────────────────────────
    pub seg_from:      Vec<NodeId>,
    pub seg_to:        Vec<NodeId>,
    /// Length in metres.
    pub seg_length_m:  Vec<f64>,
    /// Free-flow speed in metres per second.
    pub seg_speed_mps: Vec<f64>,
    pub seg_class:     Vec<RoadClass>,
    pub seg_hazard:    Vec<Option<HazardTag>>,
    pub seg_climate:   Vec<ClimateHandling>,

    // ── Shape points ──────────────────────────────────────────────────────
    /// Second-level row pointer into `waypoints`, length `segment_count + 1`.
    pub waypoint_start: Vec<u32>,
    pub waypoints:      Vec<GeoPoint>,

    pub(crate) spatial_idx: RTree<NodeEntry>,
}

impl NetworkSnapshot {
    /// A snapshot with no nodes or segments.  Every locator query against it
    /// fails with `OutOfCoverage`.
    pub fn empty() -> Self {
        Self {
            node_pos:       Vec::new(),
            node_out_start: vec![0],
            seg_from:       Vec::new(),
            seg_to:         Vec::new(),
            seg_length_m:   Vec::new(),
            seg_speed_mps:  Vec::new(),
            seg_class:      Vec::new(),
            seg_hazard:     Vec::new(),
            seg_climate:    Vec::new(),
            waypoint_start: vec![0],
            waypoints:      Vec::new(),
            spatial_idx:    RTree::new(),
        }
    }

    pub fn node_count(&self) -> usize {
        self.node_pos.len()
    }

    pub fn segment_count(&self) -> usize {
        self.seg_to.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_pos.is_empty()
    }

    /// Ids of all segments leaving `node`, in ascending id order.
    #[inline]
    pub fn out_segments(&self, node: NodeId) -> impl Iterator<Item = SegmentId> + '_ {
        let start = self.node_out_start[node.index()];
        let end   = self.node_out_start[node.index() + 1];
        (start..end).map(SegmentId)
    }

    #[inline]
    pub fn out_degree(&self, node: NodeId) -> usize {
        (self.node_out_start[node.index() + 1] - self.node_out_start[node.index()]) as usize
    }

    #[inline]
    pub fn node_position(&self, node: NodeId) -> GeoPoint {
        self.node_pos[node.index()]
    }

    /// Shape points of `segment`, always at least its two end points.
    #[inline]
    pub fn segment_waypoints(&self, segment: SegmentId) -> &[GeoPoint] {
        let start = self.waypoint_start[segment.index()] as usize;
        let end   = self.waypoint_start[segment.index() + 1] as usize;
        &self.waypoints[start..end]
    }

    pub fn segment(&self, segment: SegmentId) -> SegmentView<'_> {
        let i = segment.index();
        SegmentView {
            id:        segment,
            from:      self.seg_from[i],
            to:        self.seg_to[i],
            length_m:  self.seg_length_m[i],
            speed_mps: self.seg_speed_mps[i],
            class:     self.seg_class[i],
            hazard:    self.seg_hazard[i],
            climate:   self.seg_climate[i],
            waypoints: self.segment_waypoints(segment),
        }
    }

    /// First segment from `from` to `to`, if any.  Mostly useful in tests
    /// and diagnostics; routing never needs it.
    pub fn find_segment(&self, from: NodeId, to: NodeId) -> Option<SegmentId> {
        self.out_segments(from).find(|s| self.seg_to[s.index()] == to)
    }
}

// ── SnapshotBuilder ───────────────────────────────────────────────────────────

/// Construct a [`NetworkSnapshot`] incrementally, then call
/// [`build`](Self::build).
///
/// Segment ids are assigned at build time: segments are stably sorted by
/// source node, so ids follow `(source, insertion order)`.
///
/// # Example
///
/// ```
/// use rr_core::GeoPoint;
/// use rr_network::{RoadClass, SegmentSpec, SnapshotBuilder};
///
/// let mut b = SnapshotBuilder::new();
/// let a = b.add_node(GeoPoint::new(28.61, 77.20));
/// let c = b.add_node(GeoPoint::new(28.62, 77.21));
/// b.add_road(SegmentSpec::new(a, c, 1_450.0, RoadClass::Primary));
/// let net = b.build().unwrap();
/// assert_eq!(net.node_count(), 2);
/// assert_eq!(net.segment_count(), 2); // both directions
/// ```
pub struct SnapshotBuilder {
    nodes:    Vec<GeoPoint>,
    segments: Vec<SegmentSpec>,
}

impl SnapshotBuilder {
    pub fn new() -> Self {
        Self { nodes: Vec::new(), segments: Vec::new() }
    }

    /// Pre-allocate when bulk-loading from a data source.
    pub fn with_capacity(nodes: usize, segments: usize) -> Self {
        Self {
            nodes:    Vec::with_capacity(nodes),
            segments: Vec::with_capacity(segments),
        }
    }

    /// Add a node and return its `NodeId` (sequential from 0).
    ///
    /// Past the id space the returned id is `NodeId::INVALID` and
    /// [`build`](Self::build) fails with `CapacityExceeded`.
    pub fn add_node(&mut self, pos: GeoPoint) -> NodeId {
        let id = NodeId::try_from(self.nodes.len()).unwrap_or(NodeId::INVALID);
        self.nodes.push(pos);
        id
    }

    /// Add one **directed** segment.
    pub fn add_segment(&mut self, spec: SegmentSpec) {
        self.segments.push(spec);
    }

    /// Add `spec` and its reverse (a two-way road).
    pub fn add_road(&mut self, spec: SegmentSpec) {
        let back = spec.reversed();
        self.segments.push(spec);
        self.segments.push(back);
    }

    pub fn node_pos(&self, id: NodeId) -> Option<GeoPoint> {
        self.nodes.get(id.index()).copied()
    }

    pub fn node_count(&self) -> usize { self.nodes.len() }
    pub fn segment_count(&self) -> usize { self.segments.len() }

    /// Validate and freeze the network.
    ///
    /// Fails if a node has invalid coordinates, a segment references a node
    /// that was never added, or a segment has a non-finite or negative length
    /// or a non-positive speed.
    ///
    /// Time complexity: O(E log E) for the segment sort + O(N log N) for the
    /// R-tree bulk load.
    pub fn build(self) -> NetworkResult<NetworkSnapshot> {
        let node_count = self.nodes.len();
        dense_count("nodes", node_count)?;
        dense_count("segments", self.segments.len())?;

        for (index, &pos) in self.nodes.iter().enumerate() {
            if !pos.is_valid() {
                return Err(NetworkError::InvalidNode { index, pos });
            }
        }
        for (i, spec) in self.segments.iter().enumerate() {
            validate_segment(i, spec, node_count)?;
        }

        // Stable: ties keep insertion order, which fixes segment ids.
        let mut raw = self.segments;
        raw.sort_by_key(|s| s.from.0);
        let segment_count = raw.len();

        let mut seg_from      = Vec::with_capacity(segment_count);
        let mut seg_to        = Vec::with_capacity(segment_count);
        let mut seg_length_m  = Vec::with_capacity(segment_count);
        let mut seg_speed_mps = Vec::with_capacity(segment_count);
        let mut seg_class     = Vec::with_capacity(segment_count);
        let mut seg_hazard    = Vec::with_capacity(segment_count);
        let mut seg_climate   = Vec::with_capacity(segment_count);
        let mut waypoint_start = Vec::with_capacity(segment_count + 1);
        let mut waypoints      = Vec::with_capacity(segment_count * 2);
        waypoint_start.push(0u32);

        for spec in raw {
            seg_from.push(spec.from);
            seg_to.push(spec.to);
            seg_length_m.push(spec.length_m);
            seg_speed_mps.push(spec.speed_mps.unwrap_or_else(|| spec.class.default_speed_mps()));
            seg_class.push(spec.class);
            seg_hazard.push(spec.hazard);
            seg_climate.push(spec.climate);

            if spec.geometry.len() >= 2 {
                waypoints.extend_from_slice(&spec.geometry);
            } else {
                waypoints.push(self.nodes[spec.from.index()]);
                waypoints.push(self.nodes[spec.to.index()]);
            }
            waypoint_start.push(dense_count("waypoints", waypoints.len())?);
        }

        let mut node_out_start = vec![0u32; node_count + 1];
        for from in &seg_from {
            node_out_start[from.index() + 1] += 1;
        }
        for i in 1..=node_count {
            node_out_start[i] += node_out_start[i - 1];
        }
        debug_assert_eq!(node_out_start[node_count] as usize, segment_count);

        let entries: Vec<NodeEntry> = self
            .nodes
            .iter()
            .enumerate()
            // Lossless: node_count passed dense_count above.
            .map(|(i, pos)| NodeEntry { point: [pos.lat, pos.lon], id: NodeId(i as u32) })
            .collect();
        let spatial_idx = RTree::bulk_load(entries);

        if node_count > 0 {
            info!(nodes = node_count, segments = segment_count, "network snapshot built");
        }

        Ok(NetworkSnapshot {
            node_pos: self.nodes,
            node_out_start,
            seg_from,
            seg_to,
            seg_length_m,
            seg_speed_mps,
            seg_class,
            seg_hazard,
            seg_climate,
            waypoint_start,
            waypoints,
            spatial_idx,
        })
    }
}

impl Default for SnapshotBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// `count` as a `u32` row pointer or id bound.  `u32::MAX` itself is the
/// `INVALID` sentinel, so it is rejected too.
pub(crate) fn dense_count(what: &'static str, count: usize) -> NetworkResult<u32> {
    u32::try_from(count)
        .ok()
        .filter(|&n| n < u32::MAX)
        .ok_or(NetworkError::CapacityExceeded { what, count })
}

fn validate_segment(segment: usize, spec: &SegmentSpec, node_count: usize) -> NetworkResult<()> {
    for node in [spec.from, spec.to] {
        if node.index() >= node_count {
            return Err(NetworkError::DanglingNode { segment, node });
        }
    }
    if !spec.length_m.is_finite() || spec.length_m < 0.0 {
        return Err(NetworkError::InvalidSegment {
            segment,
            reason: format!("length {} m is not a finite non-negative number", spec.length_m),
        });
    }
    if let Some(speed) = spec.speed_mps {
        if !speed.is_finite() || speed <= 0.0 {
            return Err(NetworkError::InvalidSegment {
                segment,
                reason: format!("free-flow speed {speed} m/s must be positive"),
            });
        }
    }
    if spec.geometry.iter().any(|p| !p.is_valid()) {
        return Err(NetworkError::InvalidSegment {
            segment,
            reason: "geometry contains an invalid coordinate".into(),
        });
    }
    Ok(())
}
