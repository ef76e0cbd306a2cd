//! Per-calendar-day deduplicated outage ticket: once the health aggregator
//! reports a broken fraction at or above the alert threshold, this raises a
//! single, per-calendar-day deduplicated ticket tagged as a
//! major-malfunction alert.

use crate::ports::{NewIssue, TicketTrackerPort};
use crate::use_cases::retry::with_retry;
use chrono::NaiveDate;
use dnsbl_reconciler_domain::{DomainError, HealthSummary};
use std::sync::Arc;
use tracing::instrument;

const BROKEN_FRACTION_THRESHOLD: f64 = 0.5;

pub struct DnsFailureAlertUseCase {
    tracker: Arc<dyn TicketTrackerPort>,
    dns_failure_type: String,
    dry_run: bool,
}

fn search_token(day: NaiveDate) -> String {
    format!("DNSBL outage {}", day.format("%Y-%m-%d"))
}

fn summary(day: NaiveDate, broken_fraction: f64) -> String {
    format!(
        "DNSBL outage {}: {:.0}% of monitored lists unreachable",
        day.format("%Y-%m-%d"),
        broken_fraction * 100.0
    )
}

fn description(summary: &HealthSummary) -> String {
    let mut lines = vec![format!(
        "{} of {} monitored DNSBLs broken this run.",
        summary.broken_dnsbls, summary.total_dnsbls
    )];
    for zone in &summary.zones {
        lines.push(format!(
            "{}: status={:?} checks={} failures={} failure_rate={:.2} kinds={:?}",
            zone.zone, zone.status, zone.checks_performed, zone.failed_checks, zone.failure_rate, zone.failure_types
        ));
    }
    lines.join("\n")
}

impl DnsFailureAlertUseCase {
    pub fn new(tracker: Arc<dyn TicketTrackerPort>, dns_failure_type: String, dry_run: bool) -> Self {
        Self {
            tracker,
            dns_failure_type,
            dry_run,
        }
    }

    /// Returns `true` iff an alert was raised (created or already open).
    /// A no-op (returns `false`, no tracker traffic) below the threshold.
    #[instrument(skip(self, health), fields(day = %today))]
    pub async fn maybe_raise(&self, today: NaiveDate, health: &HealthSummary) -> Result<bool, DomainError> {
        if health.broken_dnsbls == 0 || (health.broken_dnsbls as f64 / health.total_dnsbls.max(1) as f64) < BROKEN_FRACTION_THRESHOLD {
            return Ok(false);
        }

        let token = search_token(today);
        let existing = with_retry(|| self.tracker.search_by_summary_substring(&token)).await?;
        if !existing.is_empty() {
            return Ok(true);
        }

        if self.dry_run {
            tracing::info!(day = %today, "dry-run: would create DNS outage ticket");
            return Ok(true);
        }

        let broken_fraction = health.broken_dnsbls as f64 / health.total_dnsbls.max(1) as f64;
        let issue = NewIssue {
            issue_type: self.dns_failure_type.clone(),
            summary: summary(today, broken_fraction),
            description: description(health),
            labels: vec!["major-malfunction".to_string()],
        };
        with_retry(|| self.tracker.create_issue(issue.clone())).await?;
        Ok(true)
    }
}
