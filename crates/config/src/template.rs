//! Default configuration template with all options documented.
//!
//! Used by `deskroute config template` so operators can see every setting,
//! including the ones they leave at their defaults.

/// Generate the default config template.
pub fn default_config_template() -> String {
    r##"# Deskroute Configuration
# =======================
# Routes helpdesk tickets to the internal or external team by requester
# email domain and notifies the team leader.
#
# Environment variable substitution is supported: ${ENV_VAR} or
# ${ENV_VAR:-fallback}

# ══════════════════════════════════════════════════════════════════════════════
# ROUTING
# ══════════════════════════════════════════════════════════════════════════════
# Values mirror the helpdesk settings screen and are read as strings.

[routing]
internal_domains = "wavext.io"    # Comma-separated; case and spaces are ignored
# internal_team_id = 1            # Team for internal tickets (default: seed team)
# external_team_id = 2            # Team for external tickets (default: seed team)
enable_notifications = "True"     # Anything but "True" disables leader notifications

# ══════════════════════════════════════════════════════════════════════════════
# SEED TEAMS
# ══════════════════════════════════════════════════════════════════════════════
# Teams with symbolic_ref "internal_helpdesk_team" / "external_helpdesk_team"
# are used when no team id is configured above.

[[teams]]
id = 1
name = "Internal"
symbolic_ref = "internal_helpdesk_team"
# [teams.leader]
# id = 100
# name = "Internal Lead"
# email = "internal-lead@wavext.io"
# lang = "en_US"

[[teams]]
id = 2
name = "External"
symbolic_ref = "external_helpdesk_team"
# [teams.leader]
# id = 200
# name = "External Lead"
# email = "external-lead@wavext.io"

# ══════════════════════════════════════════════════════════════════════════════
# NOTIFICATIONS
# ══════════════════════════════════════════════════════════════════════════════

[notifications]
# default_lang = "en_US"          # Used when the leader has no language set

# Assignment message. Without a template a plain message is synthesized.
# Placeholders: {{ticket}} {{customer}} {{email}} {{kind}} {{kind_lower}}
#               {{team}} {{leader}}
# [notifications.template]
# subject = "New {{kind}} ticket {{ticket}}"
# body = "Ticket {{ticket}} from {{customer}} <{{email}}> was assigned to {{team}}."
"##
    .to_string()
}
