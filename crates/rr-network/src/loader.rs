//! CSV snapshot loader.
//!
//! The network data source extracts topology into two tables; this module
//! turns them into a [`NetworkSnapshot`].  It does not read any geographic
//! source format itself.
//!
//! # `nodes.csv`
//!
//! ```csv
//! id,lat,lon
//! 1001,28.6139,77.2090
//! 1002,28.6200,77.2150
//! ```
//!
//! `id` is the source's own integer id (any `i64`, need not be dense).
//!
//! # `segments.csv`
//!
//! ```csv
//! source,target,length_m,speed_kph,road_class,hazard,climate,geometry,oneway
//! 1001,1002,850.0,50,primary,,compliant,,false
//! 1002,1003,420.5,,residential,exposure,,28.62 77.215;28.621 77.216,true
//! ```
//!
//! | Column       | Meaning                                                   |
//! |--------------|-----------------------------------------------------------|
//! | `speed_kph`  | empty → road-class default                                |
//! | `road_class` | OSM `highway` value; non-drivable rows are skipped        |
//! | `hazard`     | empty, `exposure` or `corridor`                           |
//! | `climate`    | empty/`unknown`, `compliant` or `non_compliant`           |
//! | `geometry`   | empty, or `lat lon` pairs separated by `;`                |
//! | `oneway`     | `false` (or empty) also adds the reverse direction        |

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info};

use rr_core::{GeoPoint, NodeId};

use crate::network::{NetworkSnapshot, SnapshotBuilder};
use crate::segment::{ClimateHandling, HazardTag, RoadClass, SegmentSpec};
use crate::{NetworkError, NetworkResult};

// ── CSV records ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct NodeRecord {
    id:  i64,
    lat: f64,
    lon: f64,
}

#[derive(Deserialize)]
struct SegmentRecord {
    source:     i64,
    target:     i64,
    length_m:   f64,
    speed_kph:  Option<f64>,
    road_class: String,
    hazard:     Option<String>,
    climate:    Option<String>,
    geometry:   Option<String>,
    oneway:     Option<bool>,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a snapshot from a `nodes.csv` / `segments.csv` pair on disk.
pub fn load_snapshot_csv(nodes: &Path, segments: &Path) -> NetworkResult<NetworkSnapshot> {
    let nodes_file = std::fs::File::open(nodes)?;
    let segments_file = std::fs::File::open(segments)?;
    info!(nodes = %nodes.display(), segments = %segments.display(), "loading network snapshot");
    load_snapshot_readers(nodes_file, segments_file)
}

/// Like [`load_snapshot_csv`] but accepts any `Read` sources.
///
/// Useful for tests (pass a `std::io::Cursor`) or for data streamed from
/// the network data source.
pub fn load_snapshot_readers<N: Read, S: Read>(nodes: N, segments: S) -> NetworkResult<NetworkSnapshot> {
    let mut builder = SnapshotBuilder::new();
    let mut by_source_id: HashMap<i64, NodeId> = HashMap::new();

    // ── Nodes ─────────────────────────────────────────────────────────────
    let mut node_reader = csv::Reader::from_reader(nodes);
    for result in node_reader.deserialize::<NodeRecord>() {
        let row = result.map_err(|e| NetworkError::Parse(e.to_string()))?;
        let id = builder.add_node(GeoPoint::new(row.lat, row.lon));
        if by_source_id.insert(row.id, id).is_some() {
            return Err(NetworkError::Parse(format!("duplicate node id {}", row.id)));
        }
    }

    // ── Segments ──────────────────────────────────────────────────────────
    let mut skipped = 0usize;
    let mut segment_reader = csv::Reader::from_reader(segments);
    for (line, result) in segment_reader.deserialize::<SegmentRecord>().enumerate() {
        let row = result.map_err(|e| NetworkError::Parse(e.to_string()))?;

        let Some(class) = RoadClass::parse(&row.road_class) else {
            debug!(row = line, road_class = %row.road_class, "skipping non-drivable segment");
            skipped += 1;
            continue;
        };

        let lookup = |source_id: i64| {
            by_source_id.get(&source_id).copied().ok_or_else(|| {
                NetworkError::Parse(format!("segment row {line} references unknown node id {source_id}"))
            })
        };
        let from = lookup(row.source)?;
        let to = lookup(row.target)?;

        let mut spec = SegmentSpec::new(from, to, row.length_m, class);
        if let Some(kph) = row.speed_kph {
            spec = spec.speed_mps(kph / 3.6);
        }
        if let Some(tag) = non_empty(&row.hazard) {
            spec = spec.hazard(HazardTag::parse(tag).ok_or_else(|| {
                NetworkError::Parse(format!("segment row {line}: unknown hazard tag {tag:?}"))
            })?);
        }
        if let Some(climate) = non_empty(&row.climate) {
            spec = spec.climate(ClimateHandling::parse(climate).ok_or_else(|| {
                NetworkError::Parse(format!("segment row {line}: unknown climate value {climate:?}"))
            })?);
        }
        if let Some(geometry) = non_empty(&row.geometry) {
            spec = spec.geometry(parse_geometry(geometry).map_err(|e| {
                NetworkError::Parse(format!("segment row {line}: {e}"))
            })?);
        }

        if row.oneway.unwrap_or(false) {
            builder.add_segment(spec);
        } else {
            builder.add_road(spec);
        }
    }

    if skipped > 0 {
        info!(skipped, "ignored non-drivable segments");
    }
    builder.build()
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Parse `"lat lon;lat lon;..."`.
fn parse_geometry(s: &str) -> Result<Vec<GeoPoint>, String> {
    s.split(';')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|pair| {
            let mut it = pair.split_whitespace().map(str::parse::<f64>);
            match (it.next(), it.next(), it.next()) {
                (Some(Ok(lat)), Some(Ok(lon)), None) => Ok(GeoPoint::new(lat, lon)),
                _ => Err(format!("invalid geometry point {pair:?}: expected \"lat lon\"")),
            }
        })
        .collect()
}
