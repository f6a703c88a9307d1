use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use {
    anyhow::{Context, Result},
    clap::Args,
    deskroute_common::types::Ticket,
    deskroute_config::DeskrouteConfig,
    deskroute_metrics::MetricsRecorderConfig,
    deskroute_notify::{LogMailSender, LogNoteSink, MemoryNotificationLog, NotificationLogEntry},
    deskroute_routing::{LeaderNotifier, MemoryDirectory, Router, RoutingOutcome},
    serde::Serialize,
    tracing::info,
};

#[derive(Args)]
pub struct RouteArgs {
    /// JSON file holding an array of tickets.
    pub tickets: PathBuf,
    /// Config file to use instead of the discovered one.
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Print Prometheus metrics to stderr after routing.
    #[arg(long)]
    pub metrics: bool,
}

/// What a dry run did to each ticket.
#[derive(Debug, Serialize)]
pub struct RouteReport {
    pub tickets: Vec<Ticket>,
    pub outcomes: Vec<RoutingOutcome>,
    pub notifications: Vec<NotificationLogEntry>,
}

pub async fn handle_route(args: RouteArgs) -> Result<()> {
    let metrics = deskroute_metrics::init_metrics(MetricsRecorderConfig {
        enabled: args.metrics,
        global_labels: Vec::new(),
    })?;

    let config = match &args.config {
        Some(path) => deskroute_config::load_config(path)?,
        None => deskroute_config::discover_and_load(),
    };

    let report = route_file(&args.tickets, config).await?;
    println!("{}", serde_json::to_string_pretty(&report)?);

    if args.metrics {
        eprint!("{}", metrics.render());
    }
    Ok(())
}

/// Route every ticket in `path` against `config`, with seed teams from the
/// config and logging-only channels.
pub async fn route_file(path: &Path, config: DeskrouteConfig) -> Result<RouteReport> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let mut tickets: Vec<Ticket> = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse tickets from {}", path.display()))?;

    let directory = Arc::new(MemoryDirectory::from_config(&config));
    let log = Arc::new(MemoryNotificationLog::new());
    let notifier = LeaderNotifier::from_config(
        Arc::new(LogMailSender),
        Arc::new(LogNoteSink),
        &config.notifications,
    )
    .with_log(log.clone());
    let router = Router::new(Arc::new(config), directory, notifier);

    let outcomes = router.on_create_batch(&mut tickets).await;
    info!(
        tickets = tickets.len(),
        routed = outcomes.iter().filter(|o| o.is_routed()).count(),
        "dry run complete"
    );

    Ok(RouteReport {
        tickets,
        outcomes,
        notifications: log.entries(),
    })
}
