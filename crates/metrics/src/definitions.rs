//! Metric name and label definitions.
//!
//! Every metric deskroute records is named here so the full set can be read
//! in one place.

/// Ticket routing metrics
pub mod routing {
    /// Routing runs completed, by classification
    pub const TICKETS_ROUTED_TOTAL: &str = "deskroute_tickets_routed_total";
    /// Tickets whose create/update did not trigger a routing run
    pub const TICKETS_SKIPPED_TOTAL: &str = "deskroute_tickets_skipped_total";
    /// Teams assigned by routing, by classification
    pub const TEAMS_ASSIGNED_TOTAL: &str = "deskroute_teams_assigned_total";
    /// Routing runs that found no team to assign, by classification
    pub const ASSIGNMENT_MISSES_TOTAL: &str = "deskroute_assignment_misses_total";
    /// Duration of a routing run in seconds
    pub const DURATION_SECONDS: &str = "deskroute_routing_duration_seconds";
}

/// Team-leader notification metrics
pub mod notifications {
    /// Messages handed to a channel, by channel
    pub const SENT_TOTAL: &str = "deskroute_notifications_sent_total";
    /// Channel attempts that failed, by channel
    pub const FAILED_TOTAL: &str = "deskroute_notifications_failed_total";
    /// Notifications not attempted, by reason
    pub const SKIPPED_TOTAL: &str = "deskroute_notifications_skipped_total";
}

/// Common label keys
pub mod labels {
    /// Ticket classification ("internal"/"external")
    pub const KIND: &str = "kind";
    /// Notification channel ("email"/"note")
    pub const CHANNEL: &str = "channel";
    /// Why something was skipped
    pub const REASON: &str = "reason";
}

/// Histogram bucket boundaries
pub mod buckets {
    /// Routing run duration buckets (in seconds)
    /// Covers 100µs to 10s; the tail is mail submission
    pub const ROUTING_DURATION: &[f64] = &[
        0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 2.5, 5.0, 10.0,
    ];
}
