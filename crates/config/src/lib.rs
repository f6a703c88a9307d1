//! Configuration loading, parameter store, validation, and env substitution.
//!
//! Config files: `deskroute.toml`, `deskroute.yaml`, or `deskroute.json`
//! Searched in `./` then `~/.config/deskroute/`.
//!
//! Supports `${ENV_VAR}` substitution in all string values.

pub mod env_subst;
pub mod loader;
pub mod params;
pub mod routing;
pub mod schema;
pub mod template;
pub mod validate;

pub use {
    loader::{config_dir, discover_and_load, find_or_default_config_path, load_config},
    params::{MemoryParamStore, ParamStore},
    routing::RoutingConfig,
    schema::{DeskrouteConfig, MessageTemplate, NotificationsConfig, ParamValue, RoutingParams},
    validate::{Diagnostic, Severity, ValidationResult},
};
