//! Combines the fan-out checker, transition engine, throttle-store writer,
//! and ticket deduplicator for a single IP.

use crate::ports::ThrottleStorePort;
use crate::services::{DnsFanoutChecker, HealthAggregator};
use crate::use_cases::ticket_deduplication::{TicketDeduplicationUseCase, TrackerAction};
use dnsbl_reconciler_domain::{decide_transition, Classification, DomainError, IpRecord, Transition, ZoneName};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::instrument;

/// The fully-formed outcome of reconciling one IP, handed to the
/// orchestrator (`crates/jobs`) to fold into the per-IP structured record
/// and the final run summary.
pub struct ReconcileOutcome {
    pub ip: std::net::Ipv4Addr,
    pub listed_zones: Vec<ZoneName>,
    pub unknown_zones: Vec<ZoneName>,
    pub transition: Transition,
    pub db_changed: bool,
    pub tracker_action: TrackerAction,
}

pub struct ReconcileIpUseCase {
    checker: Arc<DnsFanoutChecker>,
    store: Arc<dyn ThrottleStorePort>,
    ticket_dedup: Arc<TicketDeduplicationUseCase>,
    listed_priority: i64,
    clean_fallback_priority: i64,
    dry_run: bool,
}

impl ReconcileIpUseCase {
    pub fn new(
        checker: Arc<DnsFanoutChecker>,
        store: Arc<dyn ThrottleStorePort>,
        ticket_dedup: Arc<TicketDeduplicationUseCase>,
        listed_priority: i64,
        clean_fallback_priority: i64,
        dry_run: bool,
    ) -> Self {
        Self {
            checker,
            store,
            ticket_dedup,
            listed_priority,
            clean_fallback_priority,
            dry_run,
        }
    }

    #[instrument(skip(self, record, zones, health), fields(ip = %record.ip))]
    pub async fn reconcile(
        &self,
        record: &IpRecord,
        zones: &[ZoneName],
        health: &Arc<HealthAggregator>,
    ) -> Result<ReconcileOutcome, DomainError> {
        let classifications = self.checker.check_ip(record.ip, zones, health).await;
        let (listed_zones, unknown_zones) = split_listed_and_unknown(&classifications);

        let transition = decide_transition(&record.blocking_lists, &listed_zones);

        if transition.is_noop() {
            return Ok(ReconcileOutcome {
                ip: record.ip,
                listed_zones,
                unknown_zones,
                transition,
                db_changed: false,
                tracker_action: TrackerAction::None,
            });
        }

        let db_changed = self.apply_store_write(record, &transition).await?;
        let tracker_action = self
            .ticket_dedup
            .handle_transition(record.ip, &transition, &classifications)
            .await?;

        Ok(ReconcileOutcome {
            ip: record.ip,
            listed_zones,
            unknown_zones,
            transition,
            db_changed,
            tracker_action,
        })
    }

    async fn apply_store_write(&self, record: &IpRecord, transition: &Transition) -> Result<bool, DomainError> {
        if self.dry_run {
            tracing::info!(ip = %record.ip, transition = ?transition, "dry-run: would write throttle store");
            return Ok(false);
        }
        let outcome = match transition {
            Transition::NoOp => unreachable!("NoOp is handled before reaching apply_store_write"),
            Transition::NewListing(zones) => {
                self.store
                    .apply_new_listing(record.id, zones, self.listed_priority)
                    .await?
            }
            Transition::ZoneChange(zones) => self.store.apply_zone_change(record.id, zones).await?,
            Transition::Cleared => self.store.apply_cleared(record.id, self.clean_fallback_priority).await?,
        };
        Ok(outcome.changed())
    }
}

fn split_listed_and_unknown(
    classifications: &BTreeMap<ZoneName, Classification>,
) -> (Vec<ZoneName>, Vec<ZoneName>) {
    let mut listed = Vec::new();
    let mut unknown = Vec::new();
    for (zone, classification) in classifications {
        match classification {
            Classification::Listed { .. } => listed.push(zone.clone()),
            Classification::Unknown { .. } => unknown.push(zone.clone()),
            Classification::NotListed => {}
        }
    }
    (listed, unknown)
}
