//! Unit tests for rr-network.
//!
//! All tests use hand-built networks or in-memory CSV.

#[cfg(test)]
mod helpers {
    use rr_core::{GeoPoint, NodeId};
    use crate::{NetworkSnapshot, RoadClass, SegmentSpec, SnapshotBuilder};

    /// Small grid, roughly 1.1 km between neighbours.
    ///
    /// Nodes (lat, lon):
    ///   0:(0.00,0.00)  1:(0.00,0.01)  2:(0.00,0.02)
    ///   3:(0.01,0.00)                 4:(0.01,0.02)
    ///
    /// Two-way roads: 0-1, 1-2, 0-3, 2-4, 3-4
    pub fn grid_network() -> (NetworkSnapshot, [NodeId; 5]) {
        let mut b = SnapshotBuilder::new();
        let n0 = b.add_node(GeoPoint::new(0.00, 0.00));
        let n1 = b.add_node(GeoPoint::new(0.00, 0.01));
        let n2 = b.add_node(GeoPoint::new(0.00, 0.02));
        let n3 = b.add_node(GeoPoint::new(0.01, 0.00));
        let n4 = b.add_node(GeoPoint::new(0.01, 0.02));

        b.add_road(SegmentSpec::new(n0, n1, 1_100.0, RoadClass::Primary));
        b.add_road(SegmentSpec::new(n1, n2, 1_100.0, RoadClass::Primary));
        b.add_road(SegmentSpec::new(n2, n4, 1_100.0, RoadClass::Secondary));
        b.add_road(SegmentSpec::new(n0, n3, 1_100.0, RoadClass::Residential));
        b.add_road(SegmentSpec::new(n3, n4, 2_200.0, RoadClass::Residential));

        (b.build().unwrap(), [n0, n1, n2, n3, n4])
    }
}

// ── Builder & snapshot structure ──────────────────────────────────────────────

#[cfg(test)]
mod builder {
    use rr_core::{GeoPoint, NodeId};
    use crate::{ClimateHandling, HazardTag, NetworkError, RoadClass, SegmentSpec, SnapshotBuilder};

    #[test]
    fn empty_build() {
        let net = SnapshotBuilder::new().build().unwrap();
        assert_eq!(net.node_count(), 0);
        assert_eq!(net.segment_count(), 0);
        assert!(net.is_empty());
    }

    #[test]
    fn csr_out_segments() {
        let (net, [n0, n1, n2, n3, n4]) = super::helpers::grid_network();
        assert_eq!(net.segment_count(), 10);
        assert_eq!(net.out_degree(n0), 2);
        assert_eq!(net.out_degree(n1), 2);
        assert_eq!(net.out_degree(n2), 2);
        assert_eq!(net.out_degree(n3), 2);
        assert_eq!(net.out_degree(n4), 2);
        for s in net.out_segments(n0) {
            assert_eq!(net.seg_from[s.index()], n0);
        }
    }

    #[test]
    fn one_way_segment() {
        let mut b = SnapshotBuilder::new();
        let a = b.add_node(GeoPoint::new(0.0, 0.0));
        let c = b.add_node(GeoPoint::new(0.0, 0.01));
        b.add_segment(SegmentSpec::new(a, c, 1_100.0, RoadClass::Service));
        let net = b.build().unwrap();
        assert_eq!(net.out_degree(a), 1);
        assert_eq!(net.out_degree(c), 0);
        assert!(net.find_segment(a, c).is_some());
        assert!(net.find_segment(c, a).is_none());
    }

    #[test]
    fn default_speed_and_attributes() {
        let mut b = SnapshotBuilder::new();
        let a = b.add_node(GeoPoint::new(0.0, 0.0));
        let c = b.add_node(GeoPoint::new(0.0, 0.01));
        b.add_segment(
            SegmentSpec::new(a, c, 500.0, RoadClass::Tertiary)
                .hazard(HazardTag::Exposure)
                .climate(ClimateHandling::Compliant),
        );
        let net = b.build().unwrap();
        let seg = net.segment(net.find_segment(a, c).unwrap());
        assert_eq!(seg.speed_mps, RoadClass::Tertiary.default_speed_mps());
        assert_eq!(seg.hazard, Some(HazardTag::Exposure));
        assert!(seg.climate.is_compliant());
        assert_eq!(seg.length_m, 500.0);
    }

    #[test]
    fn waypoints_default_to_endpoints() {
        let (net, [n0, n1, ..]) = super::helpers::grid_network();
        let s = net.find_segment(n0, n1).unwrap();
        assert_eq!(net.segment_waypoints(s), &[net.node_position(n0), net.node_position(n1)]);
    }

    #[test]
    fn reverse_direction_reverses_geometry() {
        let mut b = SnapshotBuilder::new();
        let a = b.add_node(GeoPoint::new(0.0, 0.0));
        let c = b.add_node(GeoPoint::new(0.0, 0.02));
        let bend = GeoPoint::new(0.005, 0.01);
        b.add_road(
            SegmentSpec::new(a, c, 2_300.0, RoadClass::Primary)
                .geometry(vec![GeoPoint::new(0.0, 0.0), bend, GeoPoint::new(0.0, 0.02)]),
        );
        let net = b.build().unwrap();
        let back = net.segment_waypoints(net.find_segment(c, a).unwrap());
        assert_eq!(back.len(), 3);
        assert_eq!(back[0], GeoPoint::new(0.0, 0.02));
        assert_eq!(back[1], bend);
    }

    #[test]
    fn segment_ids_follow_source_then_insertion() {
        let mut b = SnapshotBuilder::new();
        let a = b.add_node(GeoPoint::new(0.0, 0.0));
        let c = b.add_node(GeoPoint::new(0.0, 0.01));
        let d = b.add_node(GeoPoint::new(0.0, 0.02));
        b.add_segment(SegmentSpec::new(c, d, 1.0, RoadClass::Primary));
        b.add_segment(SegmentSpec::new(a, d, 2.0, RoadClass::Primary));
        b.add_segment(SegmentSpec::new(a, c, 3.0, RoadClass::Primary));
        let net = b.build().unwrap();
        assert_eq!(net.seg_length_m, vec![2.0, 3.0, 1.0]);
    }

    #[test]
    fn dangling_node_rejected() {
        let mut b = SnapshotBuilder::new();
        let a = b.add_node(GeoPoint::new(0.0, 0.0));
        b.add_segment(SegmentSpec::new(a, NodeId(9), 100.0, RoadClass::Primary));
        assert!(matches!(
            b.build(),
            Err(NetworkError::DanglingNode { segment: 0, node: NodeId(9) })
        ));
    }

    #[test]
    fn invalid_length_and_speed_rejected() {
        let mut b = SnapshotBuilder::new();
        let a = b.add_node(GeoPoint::new(0.0, 0.0));
        let c = b.add_node(GeoPoint::new(0.0, 0.01));
        b.add_segment(SegmentSpec::new(a, c, f64::NAN, RoadClass::Primary));
        assert!(matches!(b.build(), Err(NetworkError::InvalidSegment { .. })));

        let mut b = SnapshotBuilder::new();
        let a = b.add_node(GeoPoint::new(0.0, 0.0));
        let c = b.add_node(GeoPoint::new(0.0, 0.01));
        b.add_segment(SegmentSpec::new(a, c, 10.0, RoadClass::Primary).speed_mps(0.0));
        assert!(matches!(b.build(), Err(NetworkError::InvalidSegment { .. })));
    }

    #[test]
    fn invalid_node_rejected() {
        let mut b = SnapshotBuilder::new();
        b.add_node(GeoPoint::new(95.0, 0.0));
        assert!(matches!(b.build(), Err(NetworkError::InvalidNode { index: 0, .. })));
    }

    #[test]
    fn counts_must_fit_32_bit_ids() {
        use crate::network::dense_count;
        assert_eq!(dense_count("nodes", 5).unwrap(), 5);
        assert_eq!(dense_count("nodes", u32::MAX as usize - 1).unwrap(), u32::MAX - 1);
        // u32::MAX itself is the INVALID sentinel.
        assert!(matches!(
            dense_count("segments", u32::MAX as usize),
            Err(NetworkError::CapacityExceeded { what: "segments", .. })
        ));
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn counts_past_u32_are_not_truncated() {
        let count = u32::MAX as usize + 6;
        assert!(matches!(
            crate::network::dense_count("waypoints", count),
            Err(NetworkError::CapacityExceeded { what: "waypoints", count: c }) if c == count
        ));
    }

    #[test]
    fn road_class_parsing() {
        assert_eq!(RoadClass::parse("motorway_link"), Some(RoadClass::Motorway));
        assert_eq!(RoadClass::parse("footway"), None);
        assert_eq!(RoadClass::parse("busway"), Some(RoadClass::Unclassified));
    }
}

// ── Spatial locator ───────────────────────────────────────────────────────────

#[cfg(test)]
mod locator {
    use rr_core::GeoPoint;
    use crate::{NetworkError, NetworkSnapshot, SnapshotBuilder};

    #[test]
    fn exact_position() {
        let (net, [n0, ..]) = super::helpers::grid_network();
        assert_eq!(net.nearest_node(GeoPoint::new(0.0, 0.0), 10.0).unwrap(), n0);
    }

    #[test]
    fn nearest_of_two() {
        let (net, [n0, n1, ..]) = super::helpers::grid_network();
        assert_eq!(net.nearest_node(GeoPoint::new(0.0, 0.004), 1_000.0).unwrap(), n0);
        assert_eq!(net.nearest_node(GeoPoint::new(0.0, 0.006), 1_000.0).unwrap(), n1);
    }

    #[test]
    fn equidistant_resolves_to_lowest_id() {
        let (net, [n0, ..]) = super::helpers::grid_network();
        // Halfway between n0 (0,0) and n1 (0,0.01) along the equator.
        let mid = GeoPoint::new(0.0, 0.005);
        assert_eq!(net.nearest_node(mid, 1_000.0).unwrap(), n0);
    }

    #[test]
    fn beyond_radius_is_out_of_coverage() {
        let (net, _) = super::helpers::grid_network();
        let far = GeoPoint::new(0.5, 0.5);
        let err = net.nearest_node(far, 500.0).unwrap_err();
        assert!(matches!(err, NetworkError::OutOfCoverage { radius_m, .. } if radius_m == 500.0));
    }

    #[test]
    fn radius_measured_in_metres() {
        let (net, [n0, ..]) = super::helpers::grid_network();
        // ~111 m north of n0.
        let p = GeoPoint::new(0.001, 0.0);
        assert!(net.nearest_node(p, 100.0).is_err());
        assert_eq!(net.nearest_node(p, 120.0).unwrap(), n0);
    }

    #[test]
    fn high_latitude_nearest_beyond_degree_ranking() {
        // At 60°N a degree of longitude is half a degree of latitude on the
        // ground.  Eight nodes ~1.1 km north rank ahead of the ~830 m east
        // node in degree space; the east node is still the answer.
        let p = GeoPoint::new(60.0, 10.0);
        let mut b = SnapshotBuilder::new();
        for i in 0..8 {
            b.add_node(GeoPoint::new(60.01, 10.0 + i as f64 * 0.0001));
        }
        let east = b.add_node(GeoPoint::new(60.0, 10.015));
        let net = b.build().unwrap();

        assert!(p.distance_m(net.node_position(east)) < 900.0);
        assert_eq!(net.nearest_node(p, 900.0).unwrap(), east);
        assert_eq!(net.nearest_node(p, 5_000.0).unwrap(), east);
        assert!(net.nearest_node(p, 800.0).is_err());
    }

    #[test]
    fn search_circle_crosses_antimeridian() {
        let mut b = SnapshotBuilder::new();
        let west = b.add_node(GeoPoint::new(0.0, -179.999));
        b.add_node(GeoPoint::new(0.0, 179.99));
        let net = b.build().unwrap();
        // ~220 m from `west` across the 180° line, ~1.1 km from the other.
        let p = GeoPoint::new(0.0, 179.999);
        assert_eq!(net.nearest_node(p, 500.0).unwrap(), west);
    }

    #[test]
    fn search_circle_covers_pole() {
        let mut b = SnapshotBuilder::new();
        let far_side = b.add_node(GeoPoint::new(89.999, -170.0));
        let net = b.build().unwrap();
        // Both points are ~111 m from the pole, on opposite meridians.
        let p = GeoPoint::new(89.999, 10.0);
        assert_eq!(net.nearest_node(p, 300.0).unwrap(), far_side);
    }

    #[test]
    fn empty_snapshot_is_out_of_coverage() {
        let net = NetworkSnapshot::empty();
        assert!(matches!(
            net.nearest_node(GeoPoint::new(0.0, 0.0), 1e9),
            Err(NetworkError::OutOfCoverage { .. })
        ));
    }

    #[test]
    fn invalid_point_is_out_of_coverage() {
        let (net, _) = super::helpers::grid_network();
        assert!(net.nearest_node(GeoPoint::new(f64::NAN, 0.0), 1e9).is_err());
    }

    #[test]
    fn concurrent_queries() {
        let (net, [n0, ..]) = super::helpers::grid_network();
        std::thread::scope(|s| {
            for _ in 0..4 {
                s.spawn(|| {
                    for _ in 0..100 {
                        assert_eq!(net.nearest_node(GeoPoint::new(0.0, 0.001), 500.0).unwrap(), n0);
                    }
                });
            }
        });
    }
}

// ── CSV loader ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod loader {
    use std::io::{Cursor, Write};

    use rr_core::GeoPoint;
    use crate::{load_snapshot_csv, load_snapshot_readers, ClimateHandling, HazardTag, NetworkError, RoadClass};

    const NODES: &str = "\
id,lat,lon
1001,28.6100,77.2000
1002,28.6150,77.2050
1003,28.6200,77.2100
";

    const SEGMENTS: &str = "\
source,target,length_m,speed_kph,road_class,hazard,climate,geometry,oneway
1001,1002,720.0,54,primary,,compliant,,false
1002,1003,705.5,,residential,exposure,,28.6150 77.2050;28.6180 77.2060;28.6200 77.2100,true
1001,1003,1500.0,,footway,,,,false
";

    #[test]
    fn loads_nodes_and_segments() {
        let net = load_snapshot_readers(Cursor::new(NODES), Cursor::new(SEGMENTS)).unwrap();
        assert_eq!(net.node_count(), 3);
        // 2 for the two-way primary, 1 for the one-way residential; footway skipped.
        assert_eq!(net.segment_count(), 3);

        let a = net.nearest_node(GeoPoint::new(28.61, 77.20), 50.0).unwrap();
        let b = net.nearest_node(GeoPoint::new(28.615, 77.205), 50.0).unwrap();
        let c = net.nearest_node(GeoPoint::new(28.62, 77.21), 50.0).unwrap();

        let ab = net.segment(net.find_segment(a, b).unwrap());
        assert!((ab.speed_mps - 15.0).abs() < 1e-9);
        assert_eq!(ab.climate, ClimateHandling::Compliant);
        assert!(net.find_segment(b, a).is_some());

        let bc = net.segment(net.find_segment(b, c).unwrap());
        assert_eq!(bc.class, RoadClass::Residential);
        assert_eq!(bc.hazard, Some(HazardTag::Exposure));
        assert_eq!(bc.climate, ClimateHandling::Unknown);
        assert_eq!(bc.waypoints.len(), 3);
        assert!(net.find_segment(c, b).is_none());
    }

    #[test]
    fn unknown_node_reference_is_parse_error() {
        let segments = "\
source,target,length_m,speed_kph,road_class,hazard,climate,geometry,oneway
1001,9999,10.0,,primary,,,,true
";
        let result = load_snapshot_readers(Cursor::new(NODES), Cursor::new(segments));
        assert!(matches!(result, Err(NetworkError::Parse(msg)) if msg.contains("9999")));
    }

    #[test]
    fn bad_hazard_tag_is_parse_error() {
        let segments = "\
source,target,length_m,speed_kph,road_class,hazard,climate,geometry,oneway
1001,1002,10.0,,primary,volcano,,,true
";
        assert!(load_snapshot_readers(Cursor::new(NODES), Cursor::new(segments)).is_err());
    }

    #[test]
    fn bad_geometry_is_parse_error() {
        let segments = "\
source,target,length_m,speed_kph,road_class,hazard,climate,geometry,oneway
1001,1002,10.0,,primary,,,28.61;77.20,true
";
        assert!(load_snapshot_readers(Cursor::new(NODES), Cursor::new(segments)).is_err());
    }

    #[test]
    fn duplicate_node_id_rejected() {
        let nodes = "id,lat,lon\n1,0.0,0.0\n1,0.0,0.1\n";
        let segments = "source,target,length_m,speed_kph,road_class,hazard,climate,geometry,oneway\n";
        assert!(load_snapshot_readers(Cursor::new(nodes), Cursor::new(segments)).is_err());
    }

    #[test]
    fn loads_from_files() {
        let dir = tempfile::tempdir().unwrap();
        let nodes_path = dir.path().join("nodes.csv");
        let segments_path = dir.path().join("segments.csv");
        std::fs::File::create(&nodes_path).unwrap().write_all(NODES.as_bytes()).unwrap();
        std::fs::File::create(&segments_path).unwrap().write_all(SEGMENTS.as_bytes()).unwrap();

        let net = load_snapshot_csv(&nodes_path, &segments_path).unwrap();
        assert_eq!(net.segment_count(), 3);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.csv");
        assert!(matches!(load_snapshot_csv(&missing, &missing), Err(NetworkError::Io(_))));
    }
}

// ── Shared snapshot handle ────────────────────────────────────────────────────

#[cfg(test)]
mod shared {
    use std::sync::Arc;

    use crate::{NetworkSnapshot, SharedSnapshot};

    #[test]
    fn replace_keeps_pinned_snapshot_alive() {
        let (net, _) = super::helpers::grid_network();
        let shared = SharedSnapshot::new(net);
        let pinned = shared.current();
        assert_eq!(pinned.node_count(), 5);

        let old = shared.replace(NetworkSnapshot::empty());
        assert!(Arc::ptr_eq(&old, &pinned));
        assert_eq!(pinned.node_count(), 5);
        assert!(shared.current().is_empty());
        assert_eq!(shared.generation(), 1);
    }
}
