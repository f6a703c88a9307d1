//! Shared ticket types, error definitions, and lifecycle hooks used across all
//! deskroute crates.

pub mod error;
pub mod hooks;
pub mod types;

pub use error::{DeskrouteError, Error, FromMessage, Result};
