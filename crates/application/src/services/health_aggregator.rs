//! Health aggregator.
//!
//! This is the only mutable in-memory structure shared among concurrent DNS
//! query completions, so it must guarantee that per-zone counter increments
//! are atomic per zone. Backed by `DashMap`, which shards its locking per
//! key — a per-zone lock without having to hand-roll one.

use dashmap::DashMap;
use dnsbl_reconciler_domain::{
    Classification, HealthSummary, SupplementalProbeResult, ZoneCounters, ZoneHealth, ZoneName,
};

pub struct HealthAggregator {
    counters: DashMap<ZoneName, ZoneCounters>,
}

impl Default for HealthAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl HealthAggregator {
    pub fn new() -> Self {
        Self {
            counters: DashMap::new(),
        }
    }

    /// Publishes one (zone, classification) completion. Called synchronously
    /// by the fan-out checker after each query, before its semaphore permit
    /// is released.
    pub fn record(&self, zone: &ZoneName, classification: &Classification) {
        let mut entry = self.counters.entry(zone.clone()).or_default();
        match classification {
            Classification::Listed { .. } | Classification::NotListed => entry.record_success(),
            Classification::Unknown { failure } => entry.record_failure(*failure),
        }
    }

    fn counters_for(&self, zone: &ZoneName) -> ZoneCounters {
        self.counters.get(zone).map(|c| c.clone()).unwrap_or_default()
    }

    /// Zones with `checks > 0 ∧ failure_rate == 1.0`.
    pub fn broken_zones(&self, configured_zones: &[ZoneName]) -> Vec<ZoneName> {
        configured_zones
            .iter()
            .filter(|zone| {
                let c = self.counters_for(zone);
                c.checks > 0 && c.failure_rate() == 1.0
            })
            .cloned()
            .collect()
    }

    /// All configured zones not in `broken_zones`.
    pub fn healthy_zones(&self, configured_zones: &[ZoneName]) -> Vec<ZoneName> {
        let broken = self.broken_zones(configured_zones);
        configured_zones
            .iter()
            .filter(|z| !broken.contains(z))
            .cloned()
            .collect()
    }

    pub fn broken_fraction(&self, configured_zones: &[ZoneName]) -> f64 {
        if configured_zones.is_empty() {
            return 0.0;
        }
        self.broken_zones(configured_zones).len() as f64 / configured_zones.len() as f64
    }

    pub fn total_checks(&self, configured_zones: &[ZoneName]) -> u64 {
        configured_zones
            .iter()
            .map(|z| self.counters_for(z).checks)
            .sum()
    }

    /// Builds the end-of-run structured artefact.
    pub fn summary(
        &self,
        configured_zones: &[ZoneName],
        probe: SupplementalProbeResult,
        execution_duration_ms: u64,
    ) -> HealthSummary {
        let broken = self.broken_zones(configured_zones);
        let mut healthy = self.healthy_zones(configured_zones);
        healthy.sort();

        let network_issue_detected =
            self.broken_fraction(configured_zones) >= 0.5 && probe.both_unreachable();

        let pruned_list_suppressed = healthy.is_empty() && !configured_zones.is_empty();

        let mut zones: Vec<ZoneHealth> = configured_zones
            .iter()
            .map(|z| ZoneHealth::from_counters(z.clone(), &self.counters_for(z)))
            .collect();
        zones.sort_by(|a, b| a.zone.cmp(&b.zone));

        HealthSummary {
            total_dnsbls: configured_zones.len(),
            broken_dnsbls: broken.len(),
            network_issue_detected,
            total_ip_checks: self.total_checks(configured_zones),
            execution_duration_ms,
            zones,
            probe,
            pruned_zones: if pruned_list_suppressed { Vec::new() } else { healthy },
            pruned_list_suppressed,
        }
    }
}
