//! Hand-rolled `Arc<RwLock<...>>` fakes for the end-to-end scenario tests.

use async_trait::async_trait;
use dnsbl_reconciler_application::{
    DnsResolverPort, NewIssue, SupplementalProbePort, ThrottleStorePort, TicketTrackerPort, WriteOutcome,
};
use dnsbl_reconciler_domain::{
    canonical_zone_list, Classification, DomainError, FailureKind, IpRecord, IssueStatus, SupplementalProbeResult,
    Ticket, ZoneName,
};
use std::collections::HashMap;
use std::net::Ipv4Addr;
use std::sync::RwLock;

#[derive(Clone)]
pub enum StubAnswer {
    Listed,
    NotListed,
    Timeout,
}

#[derive(Default)]
pub struct FakeResolver {
    answers: RwLock<HashMap<(Ipv4Addr, String), StubAnswer>>,
}

impl FakeResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stub(&self, ip: Ipv4Addr, zone: &ZoneName, answer: StubAnswer) {
        self.answers
            .write()
            .unwrap()
            .insert((ip, zone.as_str().to_string()), answer);
    }
}

#[async_trait]
impl DnsResolverPort for FakeResolver {
    async fn lookup(&self, ip: Ipv4Addr, zone: &ZoneName) -> Classification {
        match self.answers.read().unwrap().get(&(ip, zone.as_str().to_string())) {
            Some(StubAnswer::Listed) => Classification::Listed {
                addresses: vec!["127.0.0.2".parse().unwrap()],
            },
            Some(StubAnswer::Timeout) => Classification::Unknown {
                failure: FailureKind::Timeout,
            },
            Some(StubAnswer::NotListed) | None => Classification::NotListed,
        }
    }
}

#[derive(Default)]
pub struct FakeThrottleStore {
    records: RwLock<Vec<IpRecord>>,
}

impl FakeThrottleStore {
    pub fn seeded(records: Vec<IpRecord>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }

    pub fn snapshot(&self) -> Vec<IpRecord> {
        self.records.read().unwrap().clone()
    }

    fn find_mut<F: FnOnce(&mut IpRecord)>(&self, id: i64, f: F) -> u64 {
        let mut guard = self.records.write().unwrap();
        if let Some(record) = guard.iter_mut().find(|r| r.id == id) {
            f(record);
            1
        } else {
            0
        }
    }
}

#[async_trait]
impl ThrottleStorePort for FakeThrottleStore {
    async fn fetch_ip_records(&self) -> Result<Vec<IpRecord>, DomainError> {
        Ok(self.snapshot())
    }

    async fn apply_new_listing(
        &self,
        id: i64,
        zones: &[ZoneName],
        listed_priority: i64,
    ) -> Result<WriteOutcome, DomainError> {
        let canonical = canonical_zone_list(zones);
        let rows = self.find_mut(id, |record| {
            if record.blocking_lists == canonical {
                return;
            }
            if record.old_priority.is_none() {
                record.old_priority = Some(record.priority);
            }
            record.priority = listed_priority;
            record.blocking_lists = canonical.clone();
            record.last_event = Some(format!("new block from list(s) {canonical}"));
        });
        Ok(WriteOutcome { rows_affected: rows })
    }

    async fn apply_zone_change(&self, id: i64, zones: &[ZoneName]) -> Result<WriteOutcome, DomainError> {
        let canonical = canonical_zone_list(zones);
        let rows = self.find_mut(id, |record| {
            record.blocking_lists = canonical.clone();
            record.last_event = Some(format!("blocking list change: {canonical}"));
        });
        Ok(WriteOutcome { rows_affected: rows })
    }

    async fn apply_cleared(&self, id: i64, fallback_priority: i64) -> Result<WriteOutcome, DomainError> {
        let rows = self.find_mut(id, |record| {
            record.priority = record.old_priority.unwrap_or(fallback_priority);
            record.old_priority = None;
            record.blocking_lists.clear();
            record.last_event = Some("block removed".to_string());
        });
        Ok(WriteOutcome { rows_affected: rows })
    }
}

#[derive(Default)]
pub struct FakeTracker {
    pub created: RwLock<Vec<NewIssue>>,
    pub comments: RwLock<Vec<(String, String)>>,
    pub search_results: RwLock<Vec<Ticket>>,
}

impl FakeTracker {
    pub fn seed_open_ticket(&self, key: &str, summary: &str) {
        self.search_results.write().unwrap().push(Ticket {
            key: key.to_string(),
            summary: summary.to_string(),
            status: IssueStatus {
                name: "Open".to_string(),
            },
            created_at: chrono::Utc::now(),
        });
    }
}

#[async_trait]
impl TicketTrackerPort for FakeTracker {
    async fn search_by_summary_substring(&self, substring: &str) -> Result<Vec<Ticket>, DomainError> {
        Ok(self
            .search_results
            .read()
            .unwrap()
            .iter()
            .filter(|t| t.summary.contains(substring))
            .cloned()
            .collect())
    }

    async fn create_issue(&self, issue: NewIssue) -> Result<Ticket, DomainError> {
        self.created.write().unwrap().push(issue.clone());
        let key = format!("ISS-{}", self.created.read().unwrap().len());
        let ticket = Ticket {
            key: key.clone(),
            summary: issue.summary.clone(),
            status: IssueStatus {
                name: "Open".to_string(),
            },
            created_at: chrono::Utc::now(),
        };
        self.search_results.write().unwrap().push(ticket.clone());
        Ok(ticket)
    }

    async fn add_comment(&self, issue_key: &str, comment: &str) -> Result<(), DomainError> {
        self.comments
            .write()
            .unwrap()
            .push((issue_key.to_string(), comment.to_string()));
        Ok(())
    }
}

pub struct FakeProbe {
    pub cloudflare_reachable: bool,
    pub google_reachable: bool,
}

impl FakeProbe {
    pub fn both_unreachable() -> Self {
        Self {
            cloudflare_reachable: false,
            google_reachable: false,
        }
    }
}

#[async_trait]
impl SupplementalProbePort for FakeProbe {
    async fn probe(&self) -> SupplementalProbeResult {
        SupplementalProbeResult {
            check_enabled: true,
            cloudflare_reachable: self.cloudflare_reachable,
            google_reachable: self.google_reachable,
        }
    }
}
