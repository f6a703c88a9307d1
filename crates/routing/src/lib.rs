//! Route helpdesk tickets by requester email domain.
//!
//! Decision procedure, run once per ticket:
//! 1. Resolve the requester email (ticket email, then contact record email)
//!    and derive its lower-cased domain.
//! 2. Classify: internal iff the domain is in the configured allow-list.
//! 3. If the ticket has no team, assign the configured team for its class,
//!    falling back to the seed team.
//! 4. Notify the team leader once, over email and an in-app note.
//! 5. Mark the ticket routed.
//!
//! Routing is best-effort: every failure is logged and absorbed so the host's
//! create or update always goes through.

pub mod classify;
pub mod directory;
pub mod domain;
pub mod error;
pub mod notify;
pub mod router;
pub mod select;

pub use {
    classify::classify,
    directory::{MemoryDirectory, TeamDirectory},
    domain::{resolve_domain, resolve_email},
    error::{Error, Result},
    notify::{LeaderNotifier, NotificationOutcome, NotifyGuard},
    router::{Assignment, RouteOptions, Router, RoutingOutcome, RoutingStatus, SkipReason},
    select::select_team,
};
