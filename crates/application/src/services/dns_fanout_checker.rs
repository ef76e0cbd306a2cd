//! Bounded-parallel DNS fan-out checker.

use crate::ports::DnsResolverPort;
use crate::services::HealthAggregator;
use dnsbl_reconciler_domain::{Classification, FailureKind, ZoneName};
use std::collections::BTreeMap;
use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tracing::instrument;

/// Fans a single IP out across every configured zone, bounded by one
/// `Semaphore` that is constructed once per run and shared across every IP —
/// the concurrency bound applies to the whole run, not per-IP — and wraps
/// each query in its own deadline.
pub struct DnsFanoutChecker {
    resolver: Arc<dyn DnsResolverPort>,
    semaphore: Arc<Semaphore>,
    per_query_timeout: Duration,
}

impl DnsFanoutChecker {
    pub fn new(resolver: Arc<dyn DnsResolverPort>, concurrency: usize, per_query_timeout: Duration) -> Self {
        Self {
            resolver,
            semaphore: Arc::new(Semaphore::new(concurrency.max(1))),
            per_query_timeout,
        }
    }

    /// Checks `ip` against every zone in `zones`, publishing each completion
    /// to `health` synchronously, before that query's semaphore permit is
    /// released. Returns the full per-zone classification map so the caller
    /// can feed it to the transition engine and the structured per-IP
    /// record.
    #[instrument(skip(self, health), fields(ip = %ip, zone_count = zones.len()))]
    pub async fn check_ip(
        &self,
        ip: Ipv4Addr,
        zones: &[ZoneName],
        health: &Arc<HealthAggregator>,
    ) -> BTreeMap<ZoneName, Classification> {
        let mut tasks = Vec::with_capacity(zones.len());

        for zone in zones {
            let resolver = Arc::clone(&self.resolver);
            let semaphore = Arc::clone(&self.semaphore);
            let health = Arc::clone(health);
            let zone = zone.clone();
            let timeout = self.per_query_timeout;

            tasks.push(tokio::spawn(async move {
                let _permit = semaphore
                    .acquire()
                    .await
                    .expect("fan-out semaphore is never closed");

                let classification = match tokio::time::timeout(timeout, resolver.lookup(ip, &zone)).await {
                    Ok(classification) => classification,
                    Err(_elapsed) => Classification::Unknown {
                        failure: FailureKind::Timeout,
                    },
                };

                health.record(&zone, &classification);
                (zone, classification)
            }));
        }

        let mut results = BTreeMap::new();
        for task in tasks {
            match task.await {
                Ok((zone, classification)) => {
                    results.insert(zone, classification);
                }
                Err(join_err) => {
                    tracing::error!(error = %join_err, "dns fan-out task panicked");
                }
            }
        }
        results
    }
}
