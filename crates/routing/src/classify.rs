use deskroute_config::routing::{
    DEFAULT_INTERNAL_DOMAINS, RoutingConfig, normalize_domain, parse_domains,
};

/// Whether `domain` belongs to the internal allow-list.
///
/// Configured entries are compared trimmed and lower-cased, so a config
/// assembled by hand with odd casing still matches. An empty allow-list
/// means the default `wavext.io`. A missing domain is never internal.
pub fn classify(domain: Option<&str>, config: &RoutingConfig) -> bool {
    let Some(domain) = domain else {
        return false;
    };
    let domain = domain.to_lowercase();

    let mut configured = config
        .internal_domains
        .iter()
        .map(|d| normalize_domain(d))
        .filter(|d| !d.is_empty())
        .peekable();

    if configured.peek().is_none() {
        return parse_domains(DEFAULT_INTERNAL_DOMAINS).contains(&domain);
    }
    configured.any(|d| d == domain)
}

#[cfg(test)]
mod tests {
    use {super::*, rstest::rstest, std::collections::BTreeSet};

    fn config(domains: &[&str]) -> RoutingConfig {
        RoutingConfig {
            internal_domains: domains.iter().map(|d| d.to_string()).collect(),
            ..RoutingConfig::default()
        }
    }

    #[rstest]
    #[case(Some("wavext.io"), &["wavext.io"], true)]
    #[case(Some("example.com"), &[" Example.COM "], true)]
    #[case(Some("Example.com"), &["example.com"], true)]
    #[case(Some("other.com"), &["wavext.io", "example.com"], false)]
    #[case(Some("sub.wavext.io"), &["wavext.io"], false)]
    #[case(None, &["wavext.io"], false)]
    #[case(Some(""), &["wavext.io"], false)]
    #[case(Some(""), &[], false)]
    #[case(Some("wavext.io"), &[], true)]
    #[case(Some("wavext.io"), &["  "], true)]
    #[case(Some("other.com"), &[], false)]
    fn classifies(#[case] domain: Option<&str>, #[case] domains: &[&str], #[case] expected: bool) {
        assert_eq!(classify(domain, &config(domains)), expected);
    }

    #[test]
    fn default_config_knows_wavext() {
        let config = RoutingConfig::default();
        assert_eq!(
            config.internal_domains,
            BTreeSet::from(["wavext.io".to_string()])
        );
        assert!(classify(Some("wavext.io"), &config));
    }
}
