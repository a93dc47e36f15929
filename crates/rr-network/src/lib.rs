//! `rr-network` — road-network snapshot, spatial locator and CSV loading.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                   |
//! |-------------|------------------------------------------------------------|
//! | [`network`] | `NetworkSnapshot` (CSR + R-tree), `SnapshotBuilder`        |
//! | [`segment`] | `RoadClass`, `HazardTag`, `ClimateHandling`, `SegmentSpec` |
//! | [`locator`] | `NetworkSnapshot::nearest_node`                            |
//! | [`loader`]  | `load_snapshot_csv`, `load_snapshot_readers`               |
//! | [`shared`]  | `SharedSnapshot` (swappable `Arc` handle)                  |
//! | [`error`]   | `NetworkError`, `NetworkResult<T>`                         |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on the segment enums.      |

pub mod error;
pub mod loader;
pub mod locator;
pub mod network;
pub mod segment;
pub mod shared;

#[cfg(test)]
mod tests;

pub use error::{NetworkError, NetworkResult};
pub use loader::{load_snapshot_csv, load_snapshot_readers};
pub use network::{NetworkSnapshot, SegmentView, SnapshotBuilder};
pub use segment::{ClimateHandling, HazardTag, RoadClass, SegmentSpec};
pub use shared::SharedSnapshot;
