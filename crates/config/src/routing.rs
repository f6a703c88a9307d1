//! Typed routing settings, read from a [`ParamStore`].
//!
//! Every parameter has a documented default and a malformed value falls back
//! to it with a warning; loading never fails.

use std::collections::BTreeSet;

use {
    deskroute_common::types::{TeamId, TeamKind},
    tracing::warn,
};

use crate::params::{ParamStore, keys};

/// Domain list used when none is configured.
pub const DEFAULT_INTERNAL_DOMAINS: &str = "wavext.io";

/// Routing settings for one operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingConfig {
    /// Normalized (trimmed, lower-cased) internal email domains.
    pub internal_domains: BTreeSet<String>,
    /// Explicit team for internal tickets.
    pub internal_team: Option<TeamId>,
    /// Explicit team for external tickets.
    pub external_team: Option<TeamId>,
    pub notifications_enabled: bool,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            internal_domains: parse_domains(DEFAULT_INTERNAL_DOMAINS),
            internal_team: None,
            external_team: None,
            notifications_enabled: true,
        }
    }
}

impl RoutingConfig {
    /// Snapshot the routing parameters.
    pub fn load(params: &dyn ParamStore) -> Self {
        let internal_domains = params
            .get_param(keys::INTERNAL_DOMAINS)
            .map(|raw| parse_domains(&raw))
            .filter(|set| !set.is_empty())
            .unwrap_or_else(|| parse_domains(DEFAULT_INTERNAL_DOMAINS));

        let notifications_enabled = params
            .get_param(keys::ENABLE_NOTIFICATIONS)
            .map(|raw| parse_flag(&raw))
            .unwrap_or(true);

        Self {
            internal_domains,
            internal_team: team_param(params, keys::INTERNAL_TEAM_ID),
            external_team: team_param(params, keys::EXTERNAL_TEAM_ID),
            notifications_enabled,
        }
    }

    /// Explicitly configured team for `kind`, if any.
    #[must_use]
    pub fn team_override(&self, kind: TeamKind) -> Option<TeamId> {
        match kind {
            TeamKind::Internal => self.internal_team,
            TeamKind::External => self.external_team,
        }
    }
}

/// Trim and lower-case a configured domain.
#[must_use]
pub fn normalize_domain(domain: &str) -> String {
    domain.trim().to_lowercase()
}

/// Split a comma-separated domain list into a normalized set. Empty entries
/// (`"wavext.io,"`) are dropped.
#[must_use]
pub fn parse_domains(raw: &str) -> BTreeSet<String> {
    raw.split(',')
        .map(normalize_domain)
        .filter(|d| !d.is_empty())
        .collect()
}

/// Boolean-as-string parameter: only a case-insensitive `true` is true.
#[must_use]
pub fn parse_flag(raw: &str) -> bool {
    raw.trim().eq_ignore_ascii_case("true")
}

fn team_param(params: &dyn ParamStore, key: &str) -> Option<TeamId> {
    let raw = params.get_param(key)?;
    if raw.trim().is_empty() {
        return None;
    }
    match raw.parse::<TeamId>() {
        Ok(id) => Some(id),
        Err(e) => {
            warn!(key, error = %e, "ignoring malformed team parameter, using seed team");
            None
        },
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {super::*, crate::params::MemoryParamStore, rstest::rstest};

    fn domains(list: &[&str]) -> BTreeSet<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[rstest]
    #[case("wavext.io", &["wavext.io"])]
    #[case(" Example.COM ", &["example.com"])]
    #[case("wavext.io, Corp.Example ,,", &["corp.example", "wavext.io"])]
    #[case(" , ", &[])]
    fn parses_domain_lists(#[case] raw: &str, #[case] expected: &[&str]) {
        assert_eq!(parse_domains(raw), domains(expected));
    }

    #[rstest]
    #[case("True", true)]
    #[case("true", true)]
    #[case(" TRUE ", true)]
    #[case("False", false)]
    #[case("yes", false)]
    #[case("1", false)]
    #[case("", false)]
    fn parses_flags(#[case] raw: &str, #[case] expected: bool) {
        assert_eq!(parse_flag(raw), expected);
    }

    #[test]
    fn defaults_when_store_is_empty() {
        let config = RoutingConfig::load(&MemoryParamStore::new());
        assert_eq!(config, RoutingConfig::default());
        assert_eq!(config.internal_domains, domains(&["wavext.io"]));
        assert!(config.notifications_enabled);
    }

    #[test]
    fn blank_domain_list_falls_back_to_default() {
        let store = MemoryParamStore::new().with(keys::INTERNAL_DOMAINS, " ,, ");
        let config = RoutingConfig::load(&store);
        assert_eq!(config.internal_domains, domains(&["wavext.io"]));
    }

    #[test]
    fn reads_all_parameters() {
        let store = MemoryParamStore::new()
            .with(keys::INTERNAL_DOMAINS, "a.io,B.io")
            .with(keys::INTERNAL_TEAM_ID, "7")
            .with(keys::EXTERNAL_TEAM_ID, " 8 ")
            .with(keys::ENABLE_NOTIFICATIONS, "False");
        let config = RoutingConfig::load(&store);
        assert_eq!(config.internal_domains, domains(&["a.io", "b.io"]));
        assert_eq!(config.team_override(TeamKind::Internal), Some(TeamId(7)));
        assert_eq!(config.team_override(TeamKind::External), Some(TeamId(8)));
        assert!(!config.notifications_enabled);
    }

    #[test]
    fn malformed_team_id_is_ignored() {
        let store = MemoryParamStore::new()
            .with(keys::INTERNAL_TEAM_ID, "support")
            .with(keys::EXTERNAL_TEAM_ID, "");
        let config = RoutingConfig::load(&store);
        assert_eq!(config.internal_team, None);
        assert_eq!(config.external_team, None);
    }
}
