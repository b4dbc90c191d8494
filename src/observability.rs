//! Logging macros for column events.
//!
//! Columns log through `tracing` with target "chcolumn" and an `event` field
//! for filtering. The library never installs a subscriber; applications
//! configure one via `tracing_subscriber` or similar.
//!
//! ## Conventions
//!
//! - `event`: snake_case event name (required)
//! - `component`: column family (e.g., "nullable", "low_cardinality")
//! - Use `%` for Display, `?` for Debug formatting

/// Target for all column log events.
pub(crate) const COLUMN_TARGET: &str = "chcolumn";

/// Macro for debug-level log events.
///
/// # Example
/// ```ignore
/// log_debug!(
///     component = "column",
///     event = "load_failed",
///     column_type = %ty,
///     rows,
/// );
/// ```
macro_rules! log_debug {
    ($($field:tt)*) => {
        ::tracing::debug!(target: $crate::observability::COLUMN_TARGET, $($field)*)
    };
}

/// Macro for warn-level log events.
macro_rules! log_warn {
    ($($field:tt)*) => {
        ::tracing::warn!(target: $crate::observability::COLUMN_TARGET, $($field)*)
    };
}

pub(crate) use log_debug;
pub(crate) use log_warn;
