//! `rr-optimizer` — the caller-facing entry point of the routing engine.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                 |
//! |---------------|----------------------------------------------------------|
//! | [`optimizer`] | `RouteOptimizer::optimize` request pipeline              |
//! | [`service`]   | `RouteService` bounded worker pool, `RouteTicket`        |
//! | [`plan`]      | `Shipment` input, `RoutePlan` output                     |
//! | [`config`]    | `OptimizerConfig` (JSON)                                 |
//! | [`error`]     | `RoutingError`, `RoutingResult<T>`                       |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use rr_network::{load_snapshot_csv, SharedSnapshot};
//! use rr_optimizer::{OptimizerConfig, RouteOptimizer, Shipment};
//! use rr_routing::FreeFlowPredictor;
//!
//! let snapshot = load_snapshot_csv(nodes, segments)?;
//! let optimizer = RouteOptimizer::new(
//!     Arc::new(SharedSnapshot::new(snapshot)),
//!     Arc::new(FreeFlowPredictor::default()),
//!     OptimizerConfig::from_path(config_path)?,
//! )?;
//! let plan = optimizer.optimize(&shipment, &cargo, None)?;
//! ```

pub mod config;
pub mod error;
pub mod optimizer;
pub mod plan;
pub mod service;


pub use config::OptimizerConfig;
pub use error::{RoutingError, RoutingResult};
pub use optimizer::RouteOptimizer;
pub use plan::{RoutePlan, Shipment};
pub use service::{RouteService, RouteTicket};
