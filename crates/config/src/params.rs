//! Key-value parameter store.
//!
//! The host keeps routing settings as string parameters. Routing only ever
//! reads them, once per operation, through [`ParamStore`].

use std::{collections::HashMap, sync::RwLock};

use crate::schema::{DeskrouteConfig, ParamValue};

/// Parameter keys read by the router.
pub mod keys {
    pub const INTERNAL_DOMAINS: &str = "helpdesk_routing.internal_domains";
    pub const INTERNAL_TEAM_ID: &str = "helpdesk_routing.internal_team_id";
    pub const EXTERNAL_TEAM_ID: &str = "helpdesk_routing.external_team_id";
    pub const ENABLE_NOTIFICATIONS: &str = "helpdesk_routing.enable_notifications";

    pub const ALL: &[&str] = &[
        INTERNAL_DOMAINS,
        INTERNAL_TEAM_ID,
        EXTERNAL_TEAM_ID,
        ENABLE_NOTIFICATIONS,
    ];
}

/// Read-only view of the host's parameter store.
pub trait ParamStore: Send + Sync {
    /// Raw value for `key`, or `None` when unset.
    fn get_param(&self, key: &str) -> Option<String>;
}

/// Parameters backed by the `[routing]` section of the config file.
impl ParamStore for DeskrouteConfig {
    fn get_param(&self, key: &str) -> Option<String> {
        let routing = &self.routing;
        match key {
            keys::INTERNAL_DOMAINS => routing.internal_domains.clone(),
            keys::INTERNAL_TEAM_ID => routing.internal_team_id.as_ref().map(ParamValue::as_param),
            keys::EXTERNAL_TEAM_ID => routing.external_team_id.as_ref().map(ParamValue::as_param),
            keys::ENABLE_NOTIFICATIONS => routing
                .enable_notifications
                .as_ref()
                .map(ParamValue::as_param),
            _ => None,
        }
    }
}

/// In-memory parameter store. Settings can change between operations, as
/// they do when an admin saves the settings screen.
#[derive(Default)]
pub struct MemoryParamStore {
    params: RwLock<HashMap<String, String>>,
}

impl MemoryParamStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) {
        let mut params = self.params.write().unwrap_or_else(|e| e.into_inner());
        params.insert(key.into(), value.into());
    }

    pub fn remove(&self, key: &str) {
        let mut params = self.params.write().unwrap_or_else(|e| e.into_inner());
        params.remove(key);
    }
}

impl ParamStore for MemoryParamStore {
    fn get_param(&self, key: &str) -> Option<String> {
        let params = self.params.read().unwrap_or_else(|e| e.into_inner());
        params.get(key).cloned()
    }
}

#[cfg(test)]
mod tests {
    use {super::*, crate::schema::RoutingParams};

    #[test]
    fn config_file_exposes_routing_section() {
        let cfg = DeskrouteConfig {
            routing: RoutingParams {
                internal_domains: Some("wavext.io".into()),
                internal_team_id: Some(ParamValue::Int(5)),
                external_team_id: None,
                enable_notifications: Some(ParamValue::Bool(true)),
            },
            ..DeskrouteConfig::default()
        };
        assert_eq!(
            cfg.get_param(keys::INTERNAL_DOMAINS).as_deref(),
            Some("wavext.io")
        );
        assert_eq!(cfg.get_param(keys::INTERNAL_TEAM_ID).as_deref(), Some("5"));
        assert_eq!(cfg.get_param(keys::EXTERNAL_TEAM_ID), None);
        assert_eq!(
            cfg.get_param(keys::ENABLE_NOTIFICATIONS).as_deref(),
            Some("True")
        );
        assert_eq!(cfg.get_param("helpdesk_routing.unknown"), None);
    }

    #[test]
    fn memory_store_set_and_remove() {
        let store = MemoryParamStore::new().with(keys::INTERNAL_DOMAINS, "a.io");
        assert_eq!(store.get_param(keys::INTERNAL_DOMAINS).as_deref(), Some("a.io"));
        store.set(keys::INTERNAL_DOMAINS, "b.io");
        assert_eq!(store.get_param(keys::INTERNAL_DOMAINS).as_deref(), Some("b.io"));
        store.remove(keys::INTERNAL_DOMAINS);
        assert_eq!(store.get_param(keys::INTERNAL_DOMAINS), None);
    }
}
