//! Ticket, team and user records as the routing core sees them.
//!
//! These mirror the handful of host-record fields routing reads or writes.
//! Everything else about a ticket (stage, priority, messages) stays in the
//! host and never crosses this boundary.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::Error;

macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let trimmed = s.trim();
                trimmed
                    .parse::<u64>()
                    .map(Self)
                    .map_err(|e| Error::invalid_id(trimmed, e))
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }
    };
}

record_id!(
    /// Identifier of a helpdesk team record.
    TeamId
);
record_id!(
    /// Identifier of a user record.
    UserId
);
record_id!(
    /// Identifier of a ticket record.
    TicketId
);

// ── Classification ──────────────────────────────────────────────────────────

/// Which side of the internal/external split a ticket lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TeamKind {
    Internal,
    External,
}

impl TeamKind {
    pub const ALL: &'static [TeamKind] = &[Self::Internal, Self::External];

    #[must_use]
    pub fn from_internal(is_internal: bool) -> Self {
        if is_internal {
            Self::Internal
        } else {
            Self::External
        }
    }

    /// Capitalized label used in notification content ("Internal"/"External").
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Internal => "Internal",
            Self::External => "External",
        }
    }

    /// Symbolic reference of the seed team used when no team is configured.
    #[must_use]
    pub fn default_team_ref(&self) -> &'static str {
        match self {
            Self::Internal => "internal_helpdesk_team",
            Self::External => "external_helpdesk_team",
        }
    }
}

impl fmt::Display for TeamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Internal => write!(f, "internal"),
            Self::External => write!(f, "external"),
        }
    }
}

// ── Records ─────────────────────────────────────────────────────────────────

/// A user record, reduced to what a notification needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    /// Preferred language code (e.g. `es_ES`).
    #[serde(default)]
    pub lang: Option<String>,
}

/// A helpdesk team and its designated leader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    /// Symbolic reference for seed teams (e.g. `internal_helpdesk_team`).
    #[serde(default)]
    pub symbolic_ref: Option<String>,
    #[serde(default)]
    pub leader: Option<User>,
}

/// The contact record linked to a ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// A support ticket, restricted to the fields routing reads and writes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: TicketId,
    /// Human reference shown to agents (e.g. `HT00042`).
    pub name: String,
    /// Email typed on the ticket itself.
    #[serde(default)]
    pub contact_email: Option<String>,
    #[serde(default)]
    pub contact: Option<Contact>,
    #[serde(default)]
    pub email_domain: Option<String>,
    #[serde(default)]
    pub is_internal: bool,
    #[serde(default)]
    pub team: Option<TeamId>,
    #[serde(default)]
    pub routed: bool,
}

impl Ticket {
    pub fn new(id: impl Into<TicketId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            contact_email: None,
            contact: None,
            email_domain: None,
            is_internal: false,
            team: None,
            routed: false,
        }
    }

    #[must_use]
    pub fn with_contact_email(mut self, email: impl Into<String>) -> Self {
        self.contact_email = Some(email.into());
        self
    }

    #[must_use]
    pub fn with_contact(mut self, contact: Contact) -> Self {
        self.contact = Some(contact);
        self
    }

    #[must_use]
    pub fn with_team(mut self, team: impl Into<TeamId>) -> Self {
        self.team = Some(team.into());
        self
    }

    /// Email stored on the linked contact record, if any.
    pub fn contact_record_email(&self) -> Option<&str> {
        self.contact.as_ref().and_then(|c| c.email.as_deref())
    }
}

// ── Updates ─────────────────────────────────────────────────────────────────

/// Fields written by a single host update.
///
/// `None` means "not part of this write"; `Some(None)` clears the field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicketChanges {
    pub contact_email: Option<Option<String>>,
    pub contact: Option<Option<Contact>>,
    pub team: Option<Option<TeamId>>,
    pub routed: Option<bool>,
}

impl TicketChanges {
    #[must_use]
    pub fn contact_email(email: Option<String>) -> Self {
        Self {
            contact_email: Some(email),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn contact(contact: Option<Contact>) -> Self {
        Self {
            contact: Some(contact),
            ..Self::default()
        }
    }

    /// True when this write touches either source of the requester email.
    #[must_use]
    pub fn touches_email(&self) -> bool {
        self.contact_email.is_some() || self.contact.is_some()
    }

    /// Write the changed fields onto `ticket`.
    pub fn apply(&self, ticket: &mut Ticket) {
        if let Some(email) = &self.contact_email {
            ticket.contact_email = email.clone();
        }
        if let Some(contact) = &self.contact {
            ticket.contact = contact.clone();
        }
        if let Some(team) = self.team {
            ticket.team = team;
        }
        if let Some(routed) = self.routed {
            ticket.routed = routed;
        }
    }
}
