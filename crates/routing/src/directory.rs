use std::{collections::BTreeMap, sync::RwLock};

use {
    async_trait::async_trait,
    deskroute_common::types::{Team, TeamId, TeamKind},
    deskroute_config::DeskrouteConfig,
};

use crate::Result;

/// Read access to the host's team records.
#[async_trait]
pub trait TeamDirectory: Send + Sync {
    /// Team with `id`, `Ok(None)` when it no longer exists.
    async fn find_team_by_id(&self, id: TeamId) -> Result<Option<Team>>;

    /// The seed team for `kind`, found by its symbolic reference.
    async fn find_default_team(&self, kind: TeamKind) -> Result<Option<Team>>;
}

/// Team directory held in memory, keyed by id.
#[derive(Default)]
pub struct MemoryDirectory {
    teams: RwLock<BTreeMap<TeamId, Team>>,
}

impl MemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_teams(teams: impl IntoIterator<Item = Team>) -> Self {
        Self {
            teams: RwLock::new(teams.into_iter().map(|t| (t.id, t)).collect()),
        }
    }

    /// Directory seeded with the teams declared in the config file.
    pub fn from_config(config: &DeskrouteConfig) -> Self {
        Self::from_teams(config.teams.iter().cloned())
    }

    /// Insert or replace a team.
    pub fn insert(&self, team: Team) {
        let mut teams = self.teams.write().unwrap_or_else(|e| e.into_inner());
        teams.insert(team.id, team);
    }

    pub fn remove(&self, id: TeamId) -> Option<Team> {
        let mut teams = self.teams.write().unwrap_or_else(|e| e.into_inner());
        teams.remove(&id)
    }
}

#[async_trait]
impl TeamDirectory for MemoryDirectory {
    async fn find_team_by_id(&self, id: TeamId) -> Result<Option<Team>> {
        let teams = self.teams.read().unwrap_or_else(|e| e.into_inner());
        Ok(teams.get(&id).cloned())
    }

    async fn find_default_team(&self, kind: TeamKind) -> Result<Option<Team>> {
        let teams = self.teams.read().unwrap_or_else(|e| e.into_inner());
        let wanted = kind.default_team_ref();
        Ok(teams
            .values()
            .find(|t| t.symbolic_ref.as_deref() == Some(wanted))
            .cloned())
    }
}
