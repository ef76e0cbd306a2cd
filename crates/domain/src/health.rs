//! Per-zone health record types tracking DNSBL query reliability.

use crate::dns_answer::FailureKind;
use crate::zone::ZoneName;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoneStatus {
    Healthy,
    Broken,
}

/// Monotonic counter set for one zone, accumulated over a single run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ZoneCounters {
    pub checks: u64,
    pub successes: u64,
    pub failures: u64,
    pub failures_by_kind: BTreeMap<String, u64>,
}

impl ZoneCounters {
    pub fn record_success(&mut self) {
        self.checks += 1;
        self.successes += 1;
    }

    pub fn record_failure(&mut self, kind: FailureKind) {
        self.checks += 1;
        self.failures += 1;
        *self.failures_by_kind.entry(kind.as_str().to_string()).or_insert(0) += 1;
    }

    pub fn failure_rate(&self) -> f64 {
        if self.checks == 0 {
            0.0
        } else {
            self.failures as f64 / self.checks as f64
        }
    }

    pub fn status(&self) -> ZoneStatus {
        if self.checks > 0 && self.failure_rate() == 1.0 {
            ZoneStatus::Broken
        } else {
            ZoneStatus::Healthy
        }
    }
}

/// Per-zone view emitted in the structured health summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoneHealth {
    pub zone: ZoneName,
    pub status: ZoneStatus,
    pub checks_performed: u64,
    pub successful_checks: u64,
    pub failed_checks: u64,
    pub failure_rate: f64,
    pub failure_types: BTreeMap<String, u64>,
}

impl ZoneHealth {
    pub fn from_counters(zone: ZoneName, counters: &ZoneCounters) -> Self {
        Self {
            zone,
            status: counters.status(),
            checks_performed: counters.checks,
            successful_checks: counters.successes,
            failed_checks: counters.failures,
            failure_rate: counters.failure_rate(),
            failure_types: counters.failures_by_kind.clone(),
        }
    }
}

/// Result of the supplemental probe, when it ran.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupplementalProbeResult {
    pub check_enabled: bool,
    pub cloudflare_reachable: bool,
    pub google_reachable: bool,
}

impl SupplementalProbeResult {
    pub fn disabled() -> Self {
        Self {
            check_enabled: false,
            cloudflare_reachable: false,
            google_reachable: false,
        }
    }

    /// "public-DNS unreachable" iff both resolvers failed.
    pub fn both_unreachable(&self) -> bool {
        self.check_enabled && !self.cloudflare_reachable && !self.google_reachable
    }
}

/// The end-of-run health rollup emitted as a structured artefact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthSummary {
    pub total_dnsbls: usize,
    pub broken_dnsbls: usize,
    pub network_issue_detected: bool,
    pub total_ip_checks: u64,
    pub execution_duration_ms: u64,
    pub zones: Vec<ZoneHealth>,
    pub probe: SupplementalProbeResult,
    /// Healthy zone names, sorted ascending — a suggested pruned list of
    /// zones still worth monitoring. Empty (not a replacement) when every
    /// zone is broken.
    pub pruned_zones: Vec<ZoneName>,
    pub pruned_list_suppressed: bool,
}
