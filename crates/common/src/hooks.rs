//! Ticket lifecycle hooks.
//!
//! The host calls into deskroute only from its create and update paths. This
//! module defines the hook trait those paths dispatch to and a registry that
//! fans events out to every registered hook. Hook failures are recorded and
//! logged; they never abort the host write.

use std::{
    fmt,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::{Duration, Instant},
};

use {
    anyhow::Result,
    async_trait::async_trait,
    serde::{Deserialize, Serialize},
    tracing::{debug, info, warn},
};

use crate::types::{Ticket, TicketChanges};

// ── HookEvent ───────────────────────────────────────────────────────────────

/// Lifecycle events a hook is invoked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HookEvent {
    TicketCreated,
    TicketUpdated,
}

impl fmt::Display for HookEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

// ── TicketHook trait ────────────────────────────────────────────────────────

/// A business rule attached to the ticket lifecycle.
///
/// Hooks receive the ticket after the host has stored the write and may
/// mutate it; the host persists whatever the hooks leave behind.
#[async_trait]
pub trait TicketHook: Send + Sync {
    /// A human-readable name for this hook.
    fn name(&self) -> &str;

    /// Priority for ordering. Higher values run first. Default is 0.
    fn priority(&self) -> i32 {
        0
    }

    /// Called once per newly created ticket.
    async fn on_create(&self, ticket: &mut Ticket) -> Result<()>;

    /// Called after `changes` were written to `ticket`.
    async fn on_update(&self, ticket: &mut Ticket, changes: &TicketChanges) -> Result<()>;
}

// ── HookStats ───────────────────────────────────────────────────────────────

/// Per-hook call statistics.
pub struct HookStats {
    pub call_count: AtomicU64,
    pub failure_count: AtomicU64,
    pub total_latency_us: AtomicU64,
}

impl HookStats {
    pub fn new() -> Self {
        Self {
            call_count: AtomicU64::new(0),
            failure_count: AtomicU64::new(0),
            total_latency_us: AtomicU64::new(0),
        }
    }

    pub fn record_success(&self, latency: Duration) {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        self.total_latency_us
            .fetch_add(latency.as_micros() as u64, Ordering::Relaxed);
    }

    pub fn record_failure(&self, latency: Duration) {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        self.failure_count.fetch_add(1, Ordering::Relaxed);
        self.total_latency_us
            .fetch_add(latency.as_micros() as u64, Ordering::Relaxed);
    }

    pub fn avg_latency(&self) -> Duration {
        let calls = self.call_count.load(Ordering::Relaxed);
        if calls == 0 {
            return Duration::ZERO;
        }
        let total = self.total_latency_us.load(Ordering::Relaxed);
        Duration::from_micros(total / calls)
    }
}

impl Default for HookStats {
    fn default() -> Self {
        Self::new()
    }
}

struct HookEntry {
    hook: Arc<dyn TicketHook>,
    stats: Arc<HookStats>,
}

// ── HookRegistry ────────────────────────────────────────────────────────────

/// Holds the registered hooks and drives them from the host's write paths.
pub struct HookRegistry {
    hooks: Vec<HookEntry>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self { hooks: Vec::new() }
    }

    /// Register a hook. Hooks are kept sorted by priority (descending).
    pub fn register(&mut self, hook: Arc<dyn TicketHook>) {
        info!(hook = hook.name(), "ticket hook registered");
        self.hooks.push(HookEntry {
            hook,
            stats: Arc::new(HookStats::new()),
        });
        self.hooks
            .sort_by_key(|h| std::cmp::Reverse(h.hook.priority()));
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Registered hook names in dispatch order.
    pub fn hook_names(&self) -> Vec<String> {
        self.hooks
            .iter()
            .map(|e| e.hook.name().to_string())
            .collect()
    }

    /// Get stats for a named hook. Returns None if not found.
    pub fn hook_stats(&self, name: &str) -> Option<Arc<HookStats>> {
        self.hooks
            .iter()
            .find(|e| e.hook.name() == name)
            .map(|e| Arc::clone(&e.stats))
    }

    /// Run the create hooks for a freshly inserted batch.
    ///
    /// Tickets are independent; each one goes through every hook in turn.
    pub async fn created(&self, tickets: &mut [Ticket]) {
        for ticket in tickets.iter_mut() {
            debug!(event = %HookEvent::TicketCreated, ticket = %ticket.name, count = self.hooks.len(), "dispatching ticket hook");
            for entry in &self.hooks {
                let start = Instant::now();
                let result = entry.hook.on_create(ticket).await;
                Self::record(entry, HookEvent::TicketCreated, &ticket.name, start, result);
            }
        }
    }

    /// Write `changes` to `ticket`, then run the update hooks.
    pub async fn updated(&self, ticket: &mut Ticket, changes: &TicketChanges) {
        changes.apply(ticket);
        debug!(event = %HookEvent::TicketUpdated, ticket = %ticket.name, count = self.hooks.len(), "dispatching ticket hook");
        for entry in &self.hooks {
            let start = Instant::now();
            let result = entry.hook.on_update(ticket, changes).await;
            Self::record(entry, HookEvent::TicketUpdated, &ticket.name, start, result);
        }
    }

    fn record(
        entry: &HookEntry,
        event: HookEvent,
        ticket: &str,
        start: Instant,
        result: Result<()>,
    ) {
        let latency = start.elapsed();
        match result {
            Ok(()) => entry.stats.record_success(latency),
            Err(e) => {
                entry.stats.record_failure(latency);
                warn!(hook = entry.hook.name(), event = %event, ticket, error = %e, "ticket hook failed");
            },
        }
    }
}

impl Default for HookRegistry {
    fn default() -> Self {
        Self::new()
    }
}
