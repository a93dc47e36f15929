//! Path search trait and default Dijkstra implementation.
//!
//! # Pluggability
//!
//! The optimizer calls the search through the [`PathFinder`] trait, so a
//! different algorithm (A*, contraction hierarchies) can be swapped in
//! without touching the orchestration.  [`DijkstraSearch`] is the default.
//!
//! # Request-scoped weights
//!
//! Edge weights come from a [`CostFunction`] evaluated lazily, once per
//! relaxed segment.  The snapshot is never written and every piece of
//! search state lives on the calling thread's stack and heap, so searches
//! with different cost functions run concurrently without coordination.
//!
//! # Determinism
//!
//! Labels compare by `(total cost, segment count)`.  On an exact tie the
//! path whose node-id sequence is lexicographically smaller wins, and
//! among parallel segments the lowest `SegmentId` wins.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use ordered_float::OrderedFloat;
use tracing::debug;

use rr_core::{CancelToken, NodeId, SegmentId};
use rr_network::NetworkSnapshot;

use crate::cost::{CostFunction, SegmentCost};
use crate::{SearchError, SearchResult};

// ── FoundPath ─────────────────────────────────────────────────────────────────

/// The winning path: segments in travel order with the cost breakdown the
/// search used for each.
#[derive(Debug, Clone, PartialEq)]
pub struct FoundPath {
    pub segments:   Vec<SegmentId>,
    /// Parallel to `segments`.
    pub costs:      Vec<SegmentCost>,
    pub total_cost: f64,
}

impl FoundPath {
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Node sequence visited, origin first.
    pub fn nodes(&self, snapshot: &NetworkSnapshot) -> Vec<NodeId> {
        let mut nodes = Vec::with_capacity(self.segments.len() + 1);
        if let Some(first) = self.segments.first() {
            nodes.push(snapshot.seg_from[first.index()]);
        }
        nodes.extend(self.segments.iter().map(|s| snapshot.seg_to[s.index()]));
        nodes
    }
}

// ── PathFinder trait ──────────────────────────────────────────────────────────

/// Pluggable shortest-path engine.
///
/// # Thread safety
///
/// Implementations must be `Send + Sync`; one instance is shared by every
/// worker in the route service.
pub trait PathFinder: Send + Sync {
    /// Cheapest path from `origin` to `destination` under `cost`.
    ///
    /// Fails with `SameNode` when the two are equal, `NoRouteFound` when no
    /// admitted path connects them, `Cancelled` once `cancel` fires, and
    /// propagates cost errors unchanged.
    fn find_path(
        &self,
        snapshot:    &NetworkSnapshot,
        origin:      NodeId,
        destination: NodeId,
        cost:        &dyn CostFunction,
        cancel:      &CancelToken,
    ) -> SearchResult<FoundPath>;
}

// ── DijkstraSearch ────────────────────────────────────────────────────────────

/// Dijkstra's algorithm over the CSR snapshot with lazily evaluated,
/// request-scoped edge costs.
#[derive(Copy, Clone, Debug, Default)]
pub struct DijkstraSearch;

impl PathFinder for DijkstraSearch {
    fn find_path(
        &self,
        snapshot:    &NetworkSnapshot,
        origin:      NodeId,
        destination: NodeId,
        cost:        &dyn CostFunction,
        cancel:      &CancelToken,
    ) -> SearchResult<FoundPath> {
        dijkstra(snapshot, origin, destination, cost, cancel)
    }
}

// ── Dijkstra internals ────────────────────────────────────────────────────────

/// Per-search node labels.  Dropped when the search returns.
struct Labels {
    dist:      Vec<f64>,
    hops:      Vec<u32>,
    prev:      Vec<SegmentId>,
    prev_cost: Vec<Option<SegmentCost>>,
    settled:   Vec<bool>,
}

impl Labels {
    fn new(n: usize) -> Self {
        Self {
            dist:      vec![f64::INFINITY; n],
            hops:      vec![u32::MAX; n],
            prev:      vec![SegmentId::INVALID; n],
            prev_cost: vec![None; n],
            settled:   vec![false; n],
        }
    }

    /// Whether the settled path to `a` is lexicographically smaller, by node
    /// id, than the settled path to `b`.  Both paths must have the same hop
    /// count.  Walks back only as far as the two paths share a node.
    fn path_precedes(&self, snapshot: &NetworkSnapshot, mut a: NodeId, mut b: NodeId) -> bool {
        // Last difference seen walking backwards = first one from the origin.
        let mut first_diff = Ordering::Equal;
        while a != b {
            first_diff = a.cmp(&b);
            let (pa, pb) = (self.prev[a.index()], self.prev[b.index()]);
            if !pa.is_valid() || !pb.is_valid() {
                break;
            }
            a = snapshot.seg_from[pa.index()];
            b = snapshot.seg_from[pb.index()];
        }
        first_diff == Ordering::Less
    }
}

fn compare_label(a: (f64, u32), b: (f64, u32)) -> Ordering {
    a.0.total_cmp(&b.0).then(a.1.cmp(&b.1))
}

fn dijkstra(
    snapshot:    &NetworkSnapshot,
    origin:      NodeId,
    destination: NodeId,
    cost:        &dyn CostFunction,
    cancel:      &CancelToken,
) -> SearchResult<FoundPath> {
    let n = snapshot.node_count();
    for node in [origin, destination] {
        if node.index() >= n {
            return Err(SearchError::UnknownNode(node));
        }
    }
    if origin == destination {
        return Err(SearchError::SameNode(origin));
    }

    let mut labels = Labels::new(n);
    labels.dist[origin.index()] = 0.0;
    labels.hops[origin.index()] = 0;

    // Min-heap on (cost, hops, node).  Reverse turns BinaryHeap's max-heap
    // into a min-heap; the NodeId component makes pop order deterministic.
    let mut heap: BinaryHeap<Reverse<(OrderedFloat<f64>, u32, NodeId)>> = BinaryHeap::new();
    heap.push(Reverse((OrderedFloat(0.0), 0, origin)));
    let mut expanded = 0usize;

    while let Some(Reverse((OrderedFloat(dist), hops, node))) = heap.pop() {
        if cancel.is_cancelled() {
            debug!(expanded, "search cancelled");
            return Err(SearchError::Cancelled);
        }
        if labels.settled[node.index()] {
            continue;
        }
        labels.settled[node.index()] = true;
        expanded += 1;

        if node == destination {
            debug!(expanded, total_cost = dist, "path found");
            return Ok(reconstruct(snapshot, &labels, destination, dist));
        }

        for segment in snapshot.out_segments(node) {
            let next = snapshot.seg_to[segment.index()];
            if labels.settled[next.index()] {
                continue;
            }
            let Some(step) = cost.segment_cost(segment)? else {
                continue;
            };

            let candidate = (dist + step.cost, hops + 1);
            let current = (labels.dist[next.index()], labels.hops[next.index()]);
            let take = match compare_label(candidate, current) {
                Ordering::Less => true,
                Ordering::Greater => false,
                Ordering::Equal => {
                    let incumbent = snapshot.seg_from[labels.prev[next.index()].index()];
                    labels.path_precedes(snapshot, node, incumbent)
                }
            };

            if take {
                labels.dist[next.index()] = candidate.0;
                labels.hops[next.index()] = candidate.1;
                labels.prev[next.index()] = segment;
                labels.prev_cost[next.index()] = Some(step);
                heap.push(Reverse((OrderedFloat(candidate.0), candidate.1, next)));
            }
        }
    }

    debug!(expanded, "destination unreachable");
    Err(SearchError::NoRouteFound { from: origin, to: destination })
}

fn reconstruct(snapshot: &NetworkSnapshot, labels: &Labels, destination: NodeId, total_cost: f64) -> FoundPath {
    let mut segments = Vec::new();
    let mut costs = Vec::new();
    let mut cur = destination;
    while let Some(step) = labels.prev_cost[cur.index()] {
        let segment = labels.prev[cur.index()];
        segments.push(segment);
        costs.push(step);
        cur = snapshot.seg_from[segment.index()];
    }
    segments.reverse();
    costs.reverse();
    FoundPath { segments, costs, total_cost }
}
