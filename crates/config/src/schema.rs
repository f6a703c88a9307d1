/// Config schema types (routing parameters, seed teams, notifications).
use {
    deskroute_common::types::Team,
    serde::{Deserialize, Serialize},
};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DeskrouteConfig {
    pub routing: RoutingParams,
    /// Seed teams. The ones carrying `symbolic_ref = "internal_helpdesk_team"`
    /// and `"external_helpdesk_team"` are the fallbacks used when no team id
    /// is configured.
    pub teams: Vec<Team>,
    pub notifications: NotificationsConfig,
}

/// Routing parameters as the host's settings screen stores them.
///
/// Values stay raw here; [`crate::RoutingConfig`] does the parsing so that a
/// malformed value degrades to its default instead of failing the load.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingParams {
    /// Comma-separated list of internal email domains.
    pub internal_domains: Option<String>,
    /// Team for internal tickets.
    pub internal_team_id: Option<ParamValue>,
    /// Team for external tickets.
    pub external_team_id: Option<ParamValue>,
    /// `"True"`/`"False"`; anything but a case-insensitive `true` disables.
    pub enable_notifications: Option<ParamValue>,
}

/// A scalar parameter value. Accepts TOML/YAML/JSON strings, integers and
/// booleans and renders them the way a string-typed parameter store would.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Int(i64),
    Text(String),
}

impl ParamValue {
    #[must_use]
    pub fn as_param(&self) -> String {
        match self {
            Self::Bool(true) => "True".into(),
            Self::Bool(false) => "False".into(),
            Self::Int(n) => n.to_string(),
            Self::Text(s) => s.clone(),
        }
    }
}

/// Team-leader notification settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationsConfig {
    /// Language used for the assignment email when the leader has none set.
    pub default_lang: Option<String>,
    /// Assignment message template. Without one, a plain message is
    /// synthesized.
    pub template: Option<MessageTemplate>,
}

/// Subject and body of the assignment message.
///
/// Both accept `{{ticket}}`, `{{customer}}`, `{{email}}`, `{{kind}}`,
/// `{{kind_lower}}`, `{{team}}` and `{{leader}}` placeholders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageTemplate {
    pub subject: String,
    pub body: String,
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {super::*, deskroute_common::types::TeamId};

    #[test]
    fn parses_full_toml() {
        let cfg: DeskrouteConfig = toml::from_str(
            r#"
            [routing]
            internal_domains = "wavext.io, Example.COM"
            internal_team_id = 3
            external_team_id = "4"
            enable_notifications = false

            [[teams]]
            id = 3
            name = "Internal"
            symbolic_ref = "internal_helpdesk_team"

            [teams.leader]
            id = 30
            name = "Ana"
            email = "ana@wavext.io"
            lang = "es_ES"

            [notifications]
            default_lang = "en_US"

            [notifications.template]
            subject = "New {{kind}} ticket {{ticket}}"
            body = "Customer: {{customer}}"
            "#,
        )
        .unwrap();

        assert_eq!(
            cfg.routing.internal_team_id.as_ref().map(ParamValue::as_param),
            Some("3".into())
        );
        assert_eq!(
            cfg.routing.external_team_id,
            Some(ParamValue::Text("4".into()))
        );
        assert_eq!(
            cfg.routing.enable_notifications.as_ref().map(ParamValue::as_param),
            Some("False".into())
        );
        assert_eq!(cfg.teams[0].id, TeamId(3));
        assert_eq!(
            cfg.teams[0].leader.as_ref().and_then(|l| l.lang.as_deref()),
            Some("es_ES")
        );
        assert!(cfg.notifications.template.is_some());
    }

    #[test]
    fn empty_document_is_default() {
        let cfg: DeskrouteConfig = toml::from_str("").unwrap();
        assert!(cfg.routing.internal_domains.is_none());
        assert!(cfg.teams.is_empty());
        assert!(cfg.notifications.template.is_none());
    }
}
