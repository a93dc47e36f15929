//! `rr-cargo` — cargo manifests and the constraint profile builder.
//!
//! [`ConstraintProfile::build`] is a pure function from a manifest to the
//! constraints and risk posture that drive one routing request.

pub mod cargo;
pub mod error;
pub mod profile;


pub use cargo::{CargoItem, CargoPriority, HAZARDOUS_TYPES};
pub use error::{CargoError, CargoResult};
pub use profile::{ConstraintProfile, Dimension, Window, risk_tolerance_for};
