use {
    deskroute_common::types::{Team, TeamKind},
    deskroute_config::RoutingConfig,
    tracing::{debug, warn},
};

use crate::directory::TeamDirectory;

/// Team a freshly classified ticket should go to.
///
/// The configured team for the class wins; without one the seed team is
/// used. A configured id that no longer resolves yields `None` rather than
/// the seed team, and so does a directory error.
pub async fn select_team(
    is_internal: bool,
    config: &RoutingConfig,
    directory: &dyn TeamDirectory,
) -> Option<Team> {
    let kind = TeamKind::from_internal(is_internal);

    let lookup = match config.team_override(kind) {
        Some(id) => {
            debug!(%kind, team_id = %id, "using configured team");
            directory.find_team_by_id(id).await
        },
        None => directory.find_default_team(kind).await,
    };

    match lookup {
        Ok(Some(team)) => Some(team),
        Ok(None) => {
            warn!(
                %kind,
                team_id = ?config.team_override(kind),
                seed = kind.default_team_ref(),
                "no team found for ticket class"
            );
            None
        },
        Err(e) => {
            warn!(%kind, error = %e, "team lookup failed");
            None
        },
    }
}
