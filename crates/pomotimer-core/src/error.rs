//! Core error types for pomotimer-core.
//!
//! Action dispatch never fails; every error here indicates a programming or
//! configuration defect and is surfaced synchronously to the caller.

use thiserror::Error;

/// Core error type for pomotimer-core.
#[derive(Error, Debug)]
pub enum TimerError {
    /// A duration that cannot be formatted (negative seconds).
    #[error("invalid duration: {seconds} seconds cannot be formatted")]
    InvalidDuration { seconds: i64 },

    /// A configuration value rejected at construction or merge time.
    #[error("invalid configuration value for '{field}': {message}")]
    InvalidConfig {
        field: &'static str,
        message: String,
    },

    /// A read through a [`SessionContext`](crate::SessionContext) that holds
    /// no session.
    #[error("no active timer session")]
    NoActiveSession,
}

/// Result type alias for TimerError.
pub type Result<T, E = TimerError> = std::result::Result<T, E>;
