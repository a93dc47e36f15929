//! `rr-routing` — cost model, path search and route metrics.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                 |
//! |---------------|----------------------------------------------------------|
//! | [`predictor`] | `TravelTimePredictor`, `FeatureVector`, `FreeFlowPredictor` |
//! | [`cost`]      | `CostModel`, `CostFunction`, `RequestCost`, `SegmentCost` |
//! | [`search`]    | `PathFinder` trait, `DijkstraSearch`, `FoundPath`        |
//! | [`metrics`]   | `aggregate`, `Metrics`, `RiskPolicy`                     |
//! | [`error`]     | `CostError`, `SearchError`                               |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on metrics and costs.      |

pub mod cost;
pub mod error;
pub mod metrics;
pub mod predictor;
pub mod search;


pub use cost::{CostFunction, CostModel, RequestCost, SegmentCost, DEFAULT_PENALTY_FACTOR, MIN_SEGMENT_COST};
pub use error::{CostError, CostResult, SearchError, SearchResult};
pub use metrics::{aggregate, is_danger_zone, Metrics, RiskPolicy};
pub use predictor::{FeatureVector, FreeFlowPredictor, PredictionError, TravelTimePredictor, RUSH_HOUR_FACTOR};
pub use search::{DijkstraSearch, FoundPath, PathFinder};
