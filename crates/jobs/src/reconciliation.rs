//! Run orchestrator.
//!
//! A one-shot job: rather than `tokio::spawn`-ing an `interval.tick()` loop,
//! `run_once` processes the fleet exactly once and returns a `RunSummary`.

use chrono::Utc;
use dnsbl_reconciler_application::{
    DnsFailureAlertUseCase, HealthAggregator, ReconcileIpUseCase, SupplementalProbePort, ThrottleStorePort,
    TrackerAction,
};
use dnsbl_reconciler_domain::{DomainError, IpRecord, Transition, ZoneName};
use serde::Serialize;
use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, info, instrument, warn};

/// One line of stdout JSON per reconciled IP.
#[derive(Debug, Serialize)]
pub struct PerIpRecord {
    pub timestamp: chrono::DateTime<Utc>,
    pub ip: Ipv4Addr,
    pub listed_zones: Vec<ZoneName>,
    pub unknown_zones: Vec<ZoneName>,
    pub decision: &'static str,
    pub db_changes: bool,
    pub tracker_action: &'static str,
    pub duration_ms: u128,
}

/// Final run summary.
#[derive(Debug, Default, Serialize)]
pub struct RunSummary {
    pub total_ips: usize,
    pub listed: usize,
    pub cleared: usize,
    pub unchanged: usize,
    pub tracker_created: usize,
    pub tracker_updated: usize,
    pub dns_failures: usize,
    pub duration_sec: f64,
}

fn tracker_action_label(action: TrackerAction) -> &'static str {
    match action {
        TrackerAction::Create => "create",
        TrackerAction::Comment => "comment",
        TrackerAction::None => "none",
    }
}

pub struct ReconciliationJob {
    store: Arc<dyn ThrottleStorePort>,
    reconcile_ip: Arc<ReconcileIpUseCase>,
    dns_failure_alert: Arc<DnsFailureAlertUseCase>,
    supplemental_probe: Arc<dyn SupplementalProbePort>,
    health: Arc<HealthAggregator>,
    zones: Vec<ZoneName>,
    max_execution_time: Duration,
}

impl ReconciliationJob {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        store: Arc<dyn ThrottleStorePort>,
        reconcile_ip: Arc<ReconcileIpUseCase>,
        dns_failure_alert: Arc<DnsFailureAlertUseCase>,
        supplemental_probe: Arc<dyn SupplementalProbePort>,
        health: Arc<HealthAggregator>,
        zones: Vec<ZoneName>,
        max_execution_time: Duration,
    ) -> Self {
        Self {
            store,
            reconcile_ip,
            dns_failure_alert,
            supplemental_probe,
            health,
            zones,
            max_execution_time,
        }
    }

    /// Processes the whole fleet exactly once. The top-level deadline always
    /// wins over an in-flight retry: `RunDeadline` aborts the run and
    /// whatever summary has accumulated so far is still emitted.
    #[instrument(skip(self))]
    pub async fn run_once(&self) -> Result<RunSummary, DomainError> {
        let run_started = Instant::now();

        match tokio::time::timeout(self.max_execution_time, self.run_body(run_started)).await {
            Ok(result) => result,
            Err(_elapsed) => Err(DomainError::RunDeadline(self.max_execution_time)),
        }
    }

    async fn run_body(&self, run_started: Instant) -> Result<RunSummary, DomainError> {
        let fleet = self.store.fetch_ip_records().await?;
        let mut summary = RunSummary {
            total_ips: fleet.len(),
            ..Default::default()
        };

        for record in &fleet {
            self.reconcile_one(record, &mut summary).await?;
        }

        // The supplemental probe only runs once health has already flagged a
        // widespread failure this run — below that threshold the probe
        // result can't change the outcome, so it's left unqueried.
        let probe_result = if self.health.broken_fraction(&self.zones) >= 0.5 {
            self.supplemental_probe.probe().await
        } else {
            dnsbl_reconciler_domain::SupplementalProbeResult::disabled()
        };
        let health_summary = self
            .health
            .summary(&self.zones, probe_result, run_started.elapsed().as_millis() as u64);

        summary.dns_failures = health_summary.broken_dnsbls;
        if self
            .dns_failure_alert
            .maybe_raise(Utc::now().date_naive(), &health_summary)
            .await?
        {
            warn!(broken = health_summary.broken_dnsbls, total = health_summary.total_dnsbls, "mass DNSBL failure alert raised");
        }

        println!("{}", serde_json::to_string(&health_summary).expect("HealthSummary always serializes"));
        if health_summary.pruned_list_suppressed {
            warn!("every monitored zone is broken this run; pruned-zone list suppressed");
        } else {
            println!(
                "{}",
                serde_json::json!({"pruned_zones": health_summary.pruned_zones})
            );
        }

        summary.duration_sec = run_started.elapsed().as_secs_f64();
        println!("{}", serde_json::to_string(&summary).expect("RunSummary always serializes"));

        Ok(summary)
    }

    async fn reconcile_one(&self, record: &IpRecord, summary: &mut RunSummary) -> Result<(), DomainError> {
        let per_ip_started = Instant::now();

        let outcome = self.reconcile_ip.reconcile(record, &self.zones, &self.health).await?;

        match &outcome.transition {
            Transition::NoOp => summary.unchanged += 1,
            Transition::NewListing(_) | Transition::ZoneChange(_) => summary.listed += 1,
            Transition::Cleared => summary.cleared += 1,
        }
        match outcome.tracker_action {
            TrackerAction::Create => summary.tracker_created += 1,
            TrackerAction::Comment => summary.tracker_updated += 1,
            TrackerAction::None => {}
        }

        let decision = if outcome.listed_zones.is_empty() { "CLEAN" } else { "LISTED" };
        let record_line = PerIpRecord {
            timestamp: Utc::now(),
            ip: outcome.ip,
            listed_zones: outcome.listed_zones,
            unknown_zones: outcome.unknown_zones,
            decision,
            db_changes: outcome.db_changed,
            tracker_action: tracker_action_label(outcome.tracker_action),
            duration_ms: per_ip_started.elapsed().as_millis(),
        };
        println!("{}", serde_json::to_string(&record_line).expect("PerIpRecord always serializes"));
        info!(ip = %record_line.ip, decision = record_line.decision, db_changes = record_line.db_changes, "reconciled ip");

        Ok(())
    }
}
