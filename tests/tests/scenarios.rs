//! End-to-end scenarios exercised against in-memory fakes rather than real
//! infrastructure — the whole reconciliation stack (fan-out checker,
//! transition engine, store writer, ticket deduplicator, orchestrator) wired
//! together exactly as `crates/cli` wires it, minus the concrete adapters.

mod helpers;

use dnsbl_reconciler_application::{
    DnsFailureAlertUseCase, DnsFanoutChecker, HealthAggregator, ReconcileIpUseCase, TicketDeduplicationUseCase,
};
use dnsbl_reconciler_domain::{IpRecord, ZoneName};
use dnsbl_reconciler_jobs::ReconciliationJob;
use helpers::fakes::{FakeProbe, FakeResolver, FakeThrottleStore, FakeTracker, StubAnswer};
use std::sync::Arc;
use std::time::Duration;

fn clean_record(id: i64, ip: &str) -> IpRecord {
    IpRecord {
        id,
        ip: ip.parse().unwrap(),
        priority: 50,
        old_priority: None,
        blocking_lists: String::new(),
        last_event: None,
    }
}

struct Harness {
    job: ReconciliationJob,
    resolver: Arc<FakeResolver>,
    store: Arc<FakeThrottleStore>,
    tracker: Arc<FakeTracker>,
}

fn build_harness(records: Vec<IpRecord>, zones: Vec<ZoneName>, dry_run: bool, probe: Arc<FakeProbe>) -> Harness {
    let resolver = Arc::new(FakeResolver::new());
    let checker = Arc::new(DnsFanoutChecker::new(resolver.clone(), 10, Duration::from_secs(1)));
    let store = Arc::new(FakeThrottleStore::seeded(records));
    let tracker = Arc::new(FakeTracker::default());
    let ticket_dedup = Arc::new(TicketDeduplicationUseCase::new(tracker.clone(), "Bug".to_string(), dry_run));
    let dns_failure_alert = Arc::new(DnsFailureAlertUseCase::new(tracker.clone(), "Outage".to_string(), dry_run));
    let health = Arc::new(HealthAggregator::new());
    let reconcile_ip = Arc::new(ReconcileIpUseCase::new(
        checker,
        store.clone(),
        ticket_dedup,
        0,
        50,
        dry_run,
    ));

    let job = ReconciliationJob::new(
        store.clone(),
        reconcile_ip,
        dns_failure_alert,
        probe,
        health,
        zones,
        Duration::from_secs(30),
    );

    Harness {
        job,
        resolver,
        store,
        tracker,
    }
}

fn no_outage_probe() -> Arc<FakeProbe> {
    Arc::new(FakeProbe {
        cloudflare_reachable: true,
        google_reachable: true,
    })
}

/// A fresh listing on one of two zones creates a ticket and writes the row.
#[tokio::test]
async fn new_listing_writes_row_and_creates_ticket() {
    let ip = "203.0.113.45";
    let zen = ZoneName::new("zen.x.org");
    let bl = ZoneName::new("bl.y.org");
    let harness = build_harness(
        vec![clean_record(1, ip)],
        vec![zen.clone(), bl.clone()],
        false,
        no_outage_probe(),
    );
    harness.resolver.stub(ip.parse().unwrap(), &zen, StubAnswer::Listed);
    harness.resolver.stub(ip.parse().unwrap(), &bl, StubAnswer::NotListed);

    let summary = harness.job.run_once().await.unwrap();

    assert_eq!(summary.listed, 1);
    assert_eq!(summary.tracker_created, 1);
    let row = harness.store.snapshot().into_iter().find(|r| r.id == 1).unwrap();
    assert_eq!(row.priority, 0);
    assert_eq!(row.old_priority, Some(50));
    assert_eq!(row.blocking_lists, "zen.x.org");
    assert_eq!(row.last_event.as_deref(), Some("new block from list(s) zen.x.org"));
    let created = harness.tracker.created.read().unwrap();
    assert_eq!(created[0].summary, "IP 203.0.113.45 blacklisted by zen.x.org");
}

/// An identical second run over the same DNS answers is a no-op.
#[tokio::test]
async fn identical_rerun_produces_zero_writes_and_zero_tracker_calls() {
    let ip = "203.0.113.45";
    let zen = ZoneName::new("zen.x.org");
    let bl = ZoneName::new("bl.y.org");
    let harness = build_harness(
        vec![clean_record(1, ip)],
        vec![zen.clone(), bl.clone()],
        false,
        no_outage_probe(),
    );
    harness.resolver.stub(ip.parse().unwrap(), &zen, StubAnswer::Listed);
    harness.resolver.stub(ip.parse().unwrap(), &bl, StubAnswer::NotListed);

    harness.job.run_once().await.unwrap();
    let created_after_first = harness.tracker.created.read().unwrap().len();

    let summary = harness.job.run_once().await.unwrap();

    assert_eq!(summary.listed, 0);
    assert_eq!(summary.unchanged, 1);
    assert_eq!(harness.tracker.created.read().unwrap().len(), created_after_first);
    assert!(harness.tracker.comments.read().unwrap().is_empty());
}

/// Both zones now list the IP — a zone-change comment, oldPriority untouched.
#[tokio::test]
async fn zone_change_comments_existing_ticket_and_preserves_old_priority() {
    let ip = "203.0.113.45";
    let zen = ZoneName::new("zen.x.org");
    let bl = ZoneName::new("bl.y.org");
    let harness = build_harness(
        vec![clean_record(1, ip)],
        vec![zen.clone(), bl.clone()],
        false,
        no_outage_probe(),
    );
    harness.resolver.stub(ip.parse().unwrap(), &zen, StubAnswer::Listed);
    harness.resolver.stub(ip.parse().unwrap(), &bl, StubAnswer::NotListed);
    harness.job.run_once().await.unwrap();

    harness.resolver.stub(ip.parse().unwrap(), &bl, StubAnswer::Listed);
    let summary = harness.job.run_once().await.unwrap();

    assert_eq!(summary.listed, 1);
    assert_eq!(summary.tracker_updated, 1);
    let row = harness.store.snapshot().into_iter().find(|r| r.id == 1).unwrap();
    assert_eq!(row.blocking_lists, "bl.y.org,zen.x.org");
    assert_eq!(row.old_priority, Some(50));
    assert_eq!(row.priority, 0);
    assert_eq!(harness.tracker.comments.read().unwrap().len(), 1);
}

/// Both zones clear — priority restored, ticket commented but not closed.
#[tokio::test]
async fn cleared_restores_priority_and_comments_without_closing() {
    let ip = "203.0.113.45";
    let zen = ZoneName::new("zen.x.org");
    let bl = ZoneName::new("bl.y.org");
    let harness = build_harness(
        vec![clean_record(1, ip)],
        vec![zen.clone(), bl.clone()],
        false,
        no_outage_probe(),
    );
    harness.resolver.stub(ip.parse().unwrap(), &zen, StubAnswer::Listed);
    harness.resolver.stub(ip.parse().unwrap(), &bl, StubAnswer::Listed);
    harness.job.run_once().await.unwrap();

    harness.resolver.stub(ip.parse().unwrap(), &zen, StubAnswer::NotListed);
    harness.resolver.stub(ip.parse().unwrap(), &bl, StubAnswer::NotListed);
    let summary = harness.job.run_once().await.unwrap();

    assert_eq!(summary.cleared, 1);
    let row = harness.store.snapshot().into_iter().find(|r| r.id == 1).unwrap();
    assert_eq!(row.priority, 50);
    assert!(row.old_priority.is_none());
    assert_eq!(row.blocking_lists, "");
    assert_eq!(row.last_event.as_deref(), Some("block removed"));
    assert_eq!(harness.tracker.comments.read().unwrap().len(), 1);
}

/// Dry-run suppresses every write while still reporting the intended
/// decision and tracker action on the in-memory outcome.
#[tokio::test]
async fn dry_run_suppresses_all_writes() {
    let ip = "203.0.113.45";
    let zone = ZoneName::new("zen.x.org");
    let harness = build_harness(vec![clean_record(1, ip)], vec![zone.clone()], true, no_outage_probe());
    harness.resolver.stub(ip.parse().unwrap(), &zone, StubAnswer::Listed);

    let summary = harness.job.run_once().await.unwrap();

    assert_eq!(summary.listed, 1);
    assert_eq!(summary.tracker_created, 1, "dry-run still reports intended tracker action");
    let row = harness.store.snapshot().into_iter().find(|r| r.id == 1).unwrap();
    assert_eq!(row.priority, 50, "dry-run must not write the store");
    assert!(row.old_priority.is_none());
    assert_eq!(row.blocking_lists, "");
    assert!(harness.tracker.created.read().unwrap().is_empty(), "dry-run must not call the tracker");
}

/// Six of ten zones time out for every IP, both public resolvers fail —
/// network-outage flag raised, one deduplicated major-malfunction ticket,
/// and per-IP decisions use only the four responsive zones.
#[tokio::test]
async fn mass_dns_failure_raises_deduplicated_outage_ticket() {
    let ip = "203.0.113.45";
    let responsive: Vec<ZoneName> = (0..4).map(|i| ZoneName::new(format!("ok{i}.org"))).collect();
    let broken: Vec<ZoneName> = (0..6).map(|i| ZoneName::new(format!("broken{i}.org"))).collect();
    let mut zones = responsive.clone();
    zones.extend(broken.iter().cloned());

    let harness = build_harness(
        vec![clean_record(1, ip)],
        zones,
        false,
        Arc::new(FakeProbe::both_unreachable()),
    );
    for zone in &broken {
        harness.resolver.stub(ip.parse().unwrap(), zone, StubAnswer::Timeout);
    }
    for zone in &responsive {
        harness.resolver.stub(ip.parse().unwrap(), zone, StubAnswer::NotListed);
    }

    let summary = harness.job.run_once().await.unwrap();

    assert_eq!(summary.dns_failures, 6);
    assert_eq!(summary.listed, 0, "no zone actually listed the ip, only timed out");

    let created = harness.tracker.created.read().unwrap();
    assert_eq!(created.len(), 1);
    assert!(created[0].summary.contains("60%"));

    // Running again the same calendar day must not create a second alert.
    let tracker_before = harness.tracker.created.read().unwrap().len();
    let _ = harness.job.run_once().await.unwrap();
    assert_eq!(harness.tracker.created.read().unwrap().len(), tracker_before);
}
