//! `rr-core` — foundational types for the `riskroute` routing engine.
//!
//! Every other `rr-*` crate depends on this one.  It has no `rr-*`
//! dependencies and only `chrono` and `thiserror` externally (plus optional
//! `serde`).
//!
//! # What lives here
//!
//! | Module     | Contents                                              |
//! |------------|-------------------------------------------------------|
//! | [`ids`]    | `NodeId`, `SegmentId`                                 |
//! | [`geo`]    | `GeoPoint`, haversine distance                        |
//! | [`time`]   | `TimeContext` (hour of day, day of week)              |
//! | [`risk`]   | `RiskTolerance`, `RiskLevel`                          |
//! | [`cancel`] | `CancelToken`                                         |
//! | [`error`]  | `CoreError`, `CoreResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod cancel;
pub mod error;
pub mod geo;
pub mod ids;
pub mod risk;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use cancel::CancelToken;
pub use error::{CoreError, CoreResult};
pub use geo::GeoPoint;
pub use ids::{NodeId, SegmentId};
pub use risk::{RiskLevel, RiskTolerance};
pub use time::TimeContext;
