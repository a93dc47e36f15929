//! Base error type for `rr-core`.
//!
//! Downstream crates define their own enums; the caller-facing
//! `RoutingError` in `rr-optimizer` converts from all of them.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid time context: hour {hour} (0-23), day {day_of_week} (0-6)")]
    InvalidTimeContext { hour: u8, day_of_week: u8 },

    #[error("configuration error: {0}")]
    Config(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
