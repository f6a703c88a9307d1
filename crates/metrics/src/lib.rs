//! Metrics definitions and export for deskroute.
//!
//! Library crates record through the `metrics` facade behind their own
//! optional `metrics` feature; nothing is recorded unless a binary installs a
//! recorder with [`init_metrics`]. With the `prometheus` feature the recorder
//! renders Prometheus text.
//!
//! ```rust,ignore
//! use deskroute_metrics::{counter, routing};
//!
//! counter!(routing::TICKETS_ROUTED_TOTAL, "kind" => "internal").increment(1);
//! ```

mod definitions;
pub mod error;
mod recorder;

pub use {
    definitions::*,
    error::{Error, Result},
    recorder::{MetricsHandle, MetricsRecorderConfig, init_metrics},
};

// Re-export metrics macros for convenience
pub use metrics::{counter, gauge, histogram};
