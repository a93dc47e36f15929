//! convoy — routes a handful of shipments across a small road network in
//! the Los Angeles basin.
//!
//! The network is the bundled `data/nodes.csv` / `data/segments.csv` pair.
//! One corridor (Echo Park → Glendale) is tagged as a hazard corridor and
//! the Cahuenga Pass motorway as an environmental exposure, so the cargo
//! mix visibly changes the chosen route.
//!
//! Usage: `convoy [config.json]`.  Log verbosity follows `RUST_LOG`
//! (default `info`).

use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use rr_cargo::{CargoItem, CargoPriority};
use rr_core::{GeoPoint, TimeContext};
use rr_network::{SharedSnapshot, load_snapshot_readers};
use rr_optimizer::{OptimizerConfig, RouteOptimizer, RouteService, Shipment};
use rr_routing::FreeFlowPredictor;

// ── Data ──────────────────────────────────────────────────────────────────────

const NODES_CSV:    &str = include_str!("../data/nodes.csv");
const SEGMENTS_CSV: &str = include_str!("../data/segments.csv");

const DOWNTOWN:  GeoPoint = GeoPoint { lat: 34.05, lon: -118.25 };
const VAN_NUYS:  GeoPoint = GeoPoint { lat: 34.22, lon: -118.40 };
const SAN_DIEGO: GeoPoint = GeoPoint { lat: 32.72, lon: -117.16 };

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

fn manifests() -> Vec<(Shipment, Vec<CargoItem>)> {
    vec![
        (
            Shipment::new("SHP-001", DOWNTOWN, VAN_NUYS),
            vec![
                CargoItem::new("office supplies", "general").weight(420.0).volume(3.5),
                CargoItem::new("printer toner", "general").weight(60.0).volume(0.4),
            ],
        ),
        (
            Shipment::new("SHP-002", DOWNTOWN, VAN_NUYS).priority(CargoPriority::High),
            vec![CargoItem::new("diesel drums", "fuel").weight(1_800.0).volume(2.0)],
        ),
        (
            Shipment::new("SHP-003", DOWNTOWN, VAN_NUYS).priority(CargoPriority::Critical),
            vec![
                CargoItem::new("insulin", "medical")
                    .priority(CargoPriority::Critical)
                    .temperature(Some(2.0), Some(8.0))
                    .weight(35.0),
                CargoItem::new("test kits", "medical")
                    .temperature(Some(4.0), Some(25.0))
                    .humidity(None, Some(60.0))
                    .weight(20.0),
            ],
        ),
        (
            Shipment::new("SHP-004", DOWNTOWN, VAN_NUYS).priority(CargoPriority::Low),
            vec![CargoItem::new("linen", "textiles").priority(CargoPriority::Low).weight(300.0)],
        ),
        (
            Shipment::new("SHP-005", DOWNTOWN, VAN_NUYS),
            vec![
                CargoItem::new("frozen plasma", "medical").temperature(None, Some(-18.0)),
                CargoItem::new("vaccines", "medical").temperature(Some(2.0), Some(8.0)),
            ],
        ),
        (
            Shipment::new("SHP-006", DOWNTOWN, SAN_DIEGO),
            vec![CargoItem::new("furniture", "general").weight(900.0)],
        ),
    ]
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("=== convoy — risk-aware shipment routing ===");

    // 1. Configuration.
    let config = match std::env::args().nth(1) {
        Some(path) => OptimizerConfig::from_path(Path::new(&path))?,
        None       => OptimizerConfig::default(),
    };
    println!(
        "Config: snap radius {} m, penalty x{}, max in flight {}",
        config.max_snap_radius_m, config.penalty_factor, config.max_in_flight
    );

    // 2. Network snapshot.
    let snapshot = load_snapshot_readers(Cursor::new(NODES_CSV), Cursor::new(SEGMENTS_CSV))?;
    println!(
        "Road network: {} nodes, {} directed segments",
        snapshot.node_count(),
        snapshot.segment_count()
    );

    // 3. Optimizer and service.  Monday 08:00 puts the run in rush hour.
    let optimizer = RouteOptimizer::new(
        Arc::new(SharedSnapshot::new(snapshot)),
        Arc::new(FreeFlowPredictor::default()),
        config,
    )?;
    let service = RouteService::new(optimizer)?;
    let departure = TimeContext::new(8, 0)?;
    println!("Departure: {departure}");
    println!();

    // 4. Submit everything, then collect.
    let t0 = Instant::now();
    let mut pending = Vec::new();
    for (shipment, cargo) in manifests() {
        let id = shipment.id.clone();
        pending.push((id, service.submit(shipment, cargo, Some(departure))));
    }

    println!(
        "{:<9} {:<8} {:>5} {:>9} {:>9} {:>6} {:>6} {:<7}",
        "Shipment", "Tol.", "Segs", "Dist km", "Time min", "Safe", "Danger", "Risk"
    );
    println!("{}", "-".repeat(68));

    let mut first_plan = None;
    for (id, ticket) in pending {
        let result = ticket.and_then(|t| t.wait_timeout(REQUEST_TIMEOUT));
        match result {
            Ok(plan) => {
                let m = &plan.metrics;
                println!(
                    "{:<9} {:<8} {:>5} {:>9.2} {:>9.1} {:>6} {:>6} {:<7}",
                    id,
                    plan.risk_tolerance.as_str(),
                    plan.segments.len(),
                    m.total_distance_m / 1_000.0,
                    plan.estimated_duration_secs / 60.0,
                    m.safe_zones,
                    m.danger_zones,
                    m.risk_level.as_str(),
                );
                first_plan.get_or_insert(plan);
            }
            Err(e) => println!("{id:<9} rejected: {e}"),
        }
    }
    println!();
    println!("Routed in {:.3} ms", t0.elapsed().as_secs_f64() * 1_000.0);

    // 5. What the persistence layer would receive.
    if let Some(plan) = first_plan {
        println!();
        println!("{}", serde_json::to_string_pretty(&plan)?);
    }

    Ok(())
}
