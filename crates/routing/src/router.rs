//! Routing orchestration over the ticket lifecycle.

use std::sync::Arc;

#[cfg(feature = "metrics")]
use std::time::Instant;

use {
    async_trait::async_trait,
    deskroute_common::{
        hooks::TicketHook,
        types::{Team, TeamId, TeamKind, Ticket, TicketChanges, TicketId},
    },
    deskroute_config::{ParamStore, RoutingConfig},
    serde::Serialize,
    tracing::{debug, info, warn},
};

#[cfg(feature = "metrics")]
use deskroute_metrics::{counter, histogram, labels, routing as routing_metrics};

use crate::{
    classify::classify,
    directory::TeamDirectory,
    domain::resolve_domain,
    notify::{LeaderNotifier, NotificationOutcome, NotifyGuard},
    select::select_team,
};

/// Per-call switches supplied by the host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RouteOptions {
    /// Route and assign, but do not notify the team leader.
    pub suppress_notification: bool,
}

impl RouteOptions {
    #[must_use]
    pub fn without_notification() -> Self {
        Self {
            suppress_notification: true,
        }
    }
}

/// Team assignment result of a routing run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Assignment {
    Assigned { team_id: TeamId, team_name: String },
    /// The ticket already had a team; it was kept.
    AlreadyAssigned { team_id: TeamId },
    Unassigned,
}

/// Why a create or update did not run the routing steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The update did not touch either email field.
    EmailUnchanged,
    /// The update changed the email but a team is assigned.
    TeamAssigned,
    /// The update set `routed` itself.
    RoutedByWrite,
}

impl SkipReason {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EmailUnchanged => "email_unchanged",
            Self::TeamAssigned => "team_assigned",
            Self::RoutedByWrite => "routed_by_write",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RoutingStatus {
    Routed {
        assignment: Assignment,
        notification: NotificationOutcome,
    },
    /// Created with `routed` already set: the team is kept as written and
    /// only its leader is notified.
    RoutedUpstream {
        notification: NotificationOutcome,
    },
    Skipped {
        reason: SkipReason,
    },
}

/// Summary of one create/update pass over a ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoutingOutcome {
    pub ticket_id: TicketId,
    pub email_domain: Option<String>,
    pub is_internal: bool,
    #[serde(flatten)]
    pub status: RoutingStatus,
}

impl RoutingOutcome {
    #[must_use]
    pub fn is_routed(&self) -> bool {
        matches!(self.status, RoutingStatus::Routed { .. })
    }
}

/// Classifies tickets by requester domain, assigns a team and notifies its
/// leader.
///
/// Parameters are read once per call, so a configuration change applies to
/// the next ticket without a restart. No call ever fails: lookups, channels
/// and the log are best-effort.
pub struct Router {
    params: Arc<dyn ParamStore>,
    directory: Arc<dyn TeamDirectory>,
    notifier: LeaderNotifier,
}

impl Router {
    pub fn new(
        params: Arc<dyn ParamStore>,
        directory: Arc<dyn TeamDirectory>,
        notifier: LeaderNotifier,
    ) -> Self {
        Self {
            params,
            directory,
            notifier,
        }
    }

    /// Current routing parameters.
    pub fn config(&self) -> RoutingConfig {
        RoutingConfig::load(self.params.as_ref())
    }

    /// Recompute `email_domain` and `is_internal` from the ticket's emails.
    pub fn refresh_classification(ticket: &mut Ticket, config: &RoutingConfig) {
        ticket.email_domain = resolve_domain(ticket);
        ticket.is_internal = classify(ticket.email_domain.as_deref(), config);
    }

    pub async fn on_create(&self, ticket: &mut Ticket) -> RoutingOutcome {
        self.on_create_with(ticket, RouteOptions::default()).await
    }

    /// Route a newly created ticket.
    pub async fn on_create_with(&self, ticket: &mut Ticket, options: RouteOptions) -> RoutingOutcome {
        let config = self.config();
        Self::refresh_classification(ticket, &config);

        if ticket.routed {
            return self.notify_upstream(ticket, &config, options).await;
        }
        self.route(ticket, &config, options).await
    }

    /// Route every ticket of a batch create. Each ticket gets its own run.
    pub async fn on_create_batch(&self, tickets: &mut [Ticket]) -> Vec<RoutingOutcome> {
        let mut outcomes = Vec::with_capacity(tickets.len());
        for ticket in tickets.iter_mut() {
            outcomes.push(self.on_create(ticket).await);
        }
        outcomes
    }

    pub async fn on_update(&self, ticket: &mut Ticket, changes: &TicketChanges) -> RoutingOutcome {
        self.on_update_with(ticket, changes, RouteOptions::default())
            .await
    }

    /// React to an update already written to `ticket`.
    ///
    /// Derived fields always follow the current emails. The ticket is routed
    /// again only when the email changed, no team is assigned and the write
    /// did not set `routed` to true.
    pub async fn on_update_with(
        &self,
        ticket: &mut Ticket,
        changes: &TicketChanges,
        options: RouteOptions,
    ) -> RoutingOutcome {
        let config = self.config();
        Self::refresh_classification(ticket, &config);

        if !changes.touches_email() {
            return skipped(ticket, SkipReason::EmailUnchanged);
        }
        if changes.routed == Some(true) {
            return skipped(ticket, SkipReason::RoutedByWrite);
        }
        if ticket.team.is_some() {
            return skipped(ticket, SkipReason::TeamAssigned);
        }
        self.route(ticket, &config, options).await
    }

    async fn route(
        &self,
        ticket: &mut Ticket,
        config: &RoutingConfig,
        options: RouteOptions,
    ) -> RoutingOutcome {
        #[cfg(feature = "metrics")]
        let started = Instant::now();
        let kind = TeamKind::from_internal(ticket.is_internal);

        let (assignment, team) = match ticket.team {
            Some(team_id) => (
                Assignment::AlreadyAssigned { team_id },
                self.existing_team(team_id).await,
            ),
            None => match select_team(ticket.is_internal, config, self.directory.as_ref()).await {
                Some(team) => {
                    ticket.team = Some(team.id);
                    #[cfg(feature = "metrics")]
                    counter!(routing_metrics::TEAMS_ASSIGNED_TOTAL, labels::KIND => kind.to_string())
                        .increment(1);
                    (
                        Assignment::Assigned {
                            team_id: team.id,
                            team_name: team.name.clone(),
                        },
                        Some(team),
                    )
                },
                None => {
                    #[cfg(feature = "metrics")]
                    counter!(routing_metrics::ASSIGNMENT_MISSES_TOTAL, labels::KIND => kind.to_string())
                        .increment(1);
                    (Assignment::Unassigned, None)
                },
            },
        };

        let mut guard = NotifyGuard {
            notified: false,
            suppressed: options.suppress_notification,
        };
        let notification = self
            .notifier
            .notify_leader(ticket, team.as_ref(), config.notifications_enabled, &mut guard)
            .await;

        ticket.routed = true;

        info!(
            ticket = %ticket.name,
            domain = ticket.email_domain.as_deref().unwrap_or("-"),
            %kind,
            team_id = ?ticket.team,
            ?notification,
            "ticket routed"
        );
        #[cfg(feature = "metrics")]
        {
            counter!(routing_metrics::TICKETS_ROUTED_TOTAL, labels::KIND => kind.to_string()).increment(1);
            histogram!(routing_metrics::DURATION_SECONDS).record(started.elapsed().as_secs_f64());
        }

        RoutingOutcome {
            ticket_id: ticket.id,
            email_domain: ticket.email_domain.clone(),
            is_internal: ticket.is_internal,
            status: RoutingStatus::Routed {
                assignment,
                notification,
            },
        }
    }

    /// A ticket routed before it reached us keeps its team; its leader is
    /// still told about it.
    async fn notify_upstream(
        &self,
        ticket: &Ticket,
        config: &RoutingConfig,
        options: RouteOptions,
    ) -> RoutingOutcome {
        let team = match ticket.team {
            Some(id) => self.existing_team(id).await,
            None => None,
        };
        let mut guard = NotifyGuard {
            notified: false,
            suppressed: options.suppress_notification,
        };
        let notification = self
            .notifier
            .notify_leader(ticket, team.as_ref(), config.notifications_enabled, &mut guard)
            .await;

        debug!(ticket = %ticket.name, ?notification, "ticket arrived routed, selection skipped");
        #[cfg(feature = "metrics")]
        counter!(routing_metrics::TICKETS_SKIPPED_TOTAL, labels::REASON => "routed_upstream")
            .increment(1);

        RoutingOutcome {
            ticket_id: ticket.id,
            email_domain: ticket.email_domain.clone(),
            is_internal: ticket.is_internal,
            status: RoutingStatus::RoutedUpstream { notification },
        }
    }

    /// Team already on the ticket, looked up for its leader.
    async fn existing_team(&self, id: TeamId) -> Option<Team> {
        match self.directory.find_team_by_id(id).await {
            Ok(Some(team)) => Some(team),
            Ok(None) => {
                warn!(team_id = %id, "assigned team not found in directory");
                None
            },
            Err(e) => {
                warn!(team_id = %id, error = %e, "team lookup failed");
                None
            },
        }
    }
}

fn skipped(ticket: &Ticket, reason: SkipReason) -> RoutingOutcome {
    debug!(ticket = %ticket.name, reason = reason.as_str(), "routing skipped");
    #[cfg(feature = "metrics")]
    counter!(routing_metrics::TICKETS_SKIPPED_TOTAL, labels::REASON => reason.as_str()).increment(1);
    RoutingOutcome {
        ticket_id: ticket.id,
        email_domain: ticket.email_domain.clone(),
        is_internal: ticket.is_internal,
        status: RoutingStatus::Skipped { reason },
    }
}

#[async_trait]
impl TicketHook for Router {
    fn name(&self) -> &str {
        "helpdesk-routing"
    }

    async fn on_create(&self, ticket: &mut Ticket) -> anyhow::Result<()> {
        Router::on_create(self, ticket).await;
        Ok(())
    }

    async fn on_update(&self, ticket: &mut Ticket, changes: &TicketChanges) -> anyhow::Result<()> {
        Router::on_update(self, ticket, changes).await;
        Ok(())
    }
}
