use clap::Parser;
use dnsbl_reconciler_application::{
    DnsFailureAlertUseCase, DnsFanoutChecker, HealthAggregator, ReconcileIpUseCase, TicketDeduplicationUseCase,
};
use dnsbl_reconciler_domain::{CliOverrides, ReconcilerConfig};
use dnsbl_reconciler_infrastructure::{
    create_pool, HickoryDnsResolverAdapter, HickorySupplementalProbe, RestTicketTrackerClient, SqliteThrottleStore,
};
use dnsbl_reconciler_jobs::ReconciliationJob;
use std::sync::Arc;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "dnsbl-reconciler")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Reconciles a mail fleet's outbound IPs against DNSBL zones")]
struct Cli {
    /// Log only what would change; perform no store writes or tracker calls
    #[arg(long)]
    dry_run: bool,

    /// Per-query DNS timeout in seconds
    #[arg(long)]
    dns_timeout: Option<u64>,

    /// Maximum concurrent DNS queries in flight
    #[arg(long)]
    dns_concurrency: Option<usize>,

    /// Overall run deadline in seconds
    #[arg(long)]
    max_execution_time: Option<u64>,

    /// Run the supplemental public-resolver probe
    #[arg(long)]
    enable_supplemental_probe: Option<bool>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let overrides = CliOverrides {
        dry_run: if cli.dry_run { Some(true) } else { None },
        dns_timeout_secs: cli.dns_timeout,
        dns_concurrency: cli.dns_concurrency,
        max_execution_time_secs: cli.max_execution_time,
        enable_supplemental_probe: cli.enable_supplemental_probe,
    };

    let config = match ReconcilerConfig::load(overrides) {
        Ok(config) => config,
        Err(e) => {
            init_logging();
            error!("configuration invalid: {e}");
            println!("{}", serde_json::json!({"error": "config_invalid", "message": e.to_string()}));
            std::process::exit(2);
        }
    };

    init_logging();

    info!(
        zones = config.dnsbl_zones.len(),
        dry_run = config.dry_run,
        concurrency = config.dns_concurrency,
        "starting reconciliation run"
    );

    let job = match build_job(&config).await {
        Ok(job) => job,
        Err(e) => {
            error!("failed to initialize run: {e}");
            println!("{}", serde_json::json!({"error": "startup_failed", "message": e.to_string()}));
            std::process::exit(1);
        }
    };

    match job.run_once().await {
        Ok(summary) => {
            info!(duration_sec = summary.duration_sec, "reconciliation run complete");
            Ok(())
        }
        Err(e) => {
            error!("reconciliation run failed: {e}");
            println!(
                "{}",
                serde_json::json!({"error": "run_failed", "fatal": e.is_fatal(), "message": e.to_string()})
            );
            std::process::exit(1);
        }
    }
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_target(true)
        .with_thread_ids(false)
        .with_level(true)
        .json()
        .init();
}

async fn build_job(config: &ReconcilerConfig) -> anyhow::Result<ReconciliationJob> {
    let database_url = format!("sqlite:{}", config.db_dsn);
    let pool = create_pool(&database_url).await?;
    let store = Arc::new(SqliteThrottleStore::new(pool));

    let resolver = Arc::new(HickoryDnsResolverAdapter::from_system_config());
    let checker = Arc::new(DnsFanoutChecker::new(resolver, config.dns_concurrency, config.dns_timeout));

    let tracker = Arc::new(RestTicketTrackerClient::new(
        config.tracker_url.clone(),
        config.tracker_user.clone(),
        config.tracker_token.clone(),
        config.tracker_project.clone(),
        config.tracker_excluded_statuses.clone(),
    ));

    let ticket_dedup = Arc::new(TicketDeduplicationUseCase::new(
        tracker.clone(),
        config.tracker_issue_type.clone(),
        config.dry_run,
    ));
    let dns_failure_alert = Arc::new(DnsFailureAlertUseCase::new(
        tracker,
        config.tracker_dns_failure_type.clone(),
        config.dry_run,
    ));

    let health = Arc::new(HealthAggregator::new());

    let reconcile_ip = Arc::new(ReconcileIpUseCase::new(
        checker,
        store.clone(),
        ticket_dedup,
        config.listed_priority,
        config.clean_fallback_priority,
        config.dry_run,
    ));

    let probe = Arc::new(HickorySupplementalProbe::new(config.enable_supplemental_probe));

    Ok(ReconciliationJob::new(
        store,
        reconcile_ip,
        dns_failure_alert,
        probe,
        health,
        config.dnsbl_zones.clone(),
        config.max_execution_time,
    ))
}
