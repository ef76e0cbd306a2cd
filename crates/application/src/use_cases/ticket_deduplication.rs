//! Ticket deduplicator.

use crate::ports::{NewIssue, TicketTrackerPort};
use crate::use_cases::retry::with_retry;
use dnsbl_reconciler_domain::{
    canonical_zone_list, ticket_summary, search_token, Classification, DomainError, Ticket, Transition,
    ZoneName,
};
use std::collections::BTreeMap;
use std::net::Ipv4Addr;
use std::sync::Arc;
use tracing::{instrument, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerAction {
    Create,
    Comment,
    None,
}

/// Splits a full per-zone classification map into the three sets ticket
/// descriptions report: LISTED, NOT_LISTED, UNKNOWN.
fn group_classifications(
    classifications: &BTreeMap<ZoneName, Classification>,
) -> (Vec<ZoneName>, Vec<ZoneName>, Vec<ZoneName>) {
    let mut listed = Vec::new();
    let mut not_listed = Vec::new();
    let mut unknown = Vec::new();
    for (zone, classification) in classifications {
        match classification {
            Classification::Listed { .. } => listed.push(zone.clone()),
            Classification::NotListed => not_listed.push(zone.clone()),
            Classification::Unknown { .. } => unknown.push(zone.clone()),
        }
    }
    (listed, not_listed, unknown)
}

fn per_zone_report(classifications: &BTreeMap<ZoneName, Classification>) -> String {
    let (listed, not_listed, unknown) = group_classifications(classifications);
    format!(
        "LISTED: {}\nNOT_LISTED: {}\nUNKNOWN: {}",
        canonical_zone_list(&listed),
        canonical_zone_list(&not_listed),
        canonical_zone_list(&unknown),
    )
}

pub struct TicketDeduplicationUseCase {
    tracker: Arc<dyn TicketTrackerPort>,
    issue_type: String,
    dry_run: bool,
}

impl TicketDeduplicationUseCase {
    pub fn new(tracker: Arc<dyn TicketTrackerPort>, issue_type: String, dry_run: bool) -> Self {
        Self {
            tracker,
            issue_type,
            dry_run,
        }
    }

    /// Finds the open ticket for `ip`, most-recently-created first. Warns
    /// (never errors) when more than one match is returned.
    async fn find_open_ticket(&self, ip: Ipv4Addr) -> Result<Option<Ticket>, DomainError> {
        let token = search_token(ip);
        let mut matches = with_retry(|| self.tracker.search_by_summary_substring(&token)).await?;
        if matches.len() > 1 {
            warn!(ip = %ip, count = matches.len(), "multiple open tickets matched, using most recent");
        }
        matches.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(matches.into_iter().next())
    }

    #[instrument(skip(self, classifications), fields(ip = %ip))]
    pub async fn handle_transition(
        &self,
        ip: Ipv4Addr,
        transition: &Transition,
        classifications: &BTreeMap<ZoneName, Classification>,
    ) -> Result<TrackerAction, DomainError> {
        match transition {
            Transition::NoOp => Ok(TrackerAction::None),
            Transition::NewListing(zones) => self.on_new_listing(ip, zones, classifications).await,
            Transition::ZoneChange(zones) => self.on_zone_change(ip, zones, classifications).await,
            Transition::Cleared => self.on_cleared(ip).await,
        }
    }

    async fn on_new_listing(
        &self,
        ip: Ipv4Addr,
        zones: &[ZoneName],
        classifications: &BTreeMap<ZoneName, Classification>,
    ) -> Result<TrackerAction, DomainError> {
        let summary = ticket_summary(ip, zones);
        match self.find_open_ticket(ip).await? {
            None => {
                if self.dry_run {
                    tracing::info!(ip = %ip, %summary, "dry-run: would create ticket");
                    return Ok(TrackerAction::Create);
                }
                let issue = NewIssue {
                    issue_type: self.issue_type.clone(),
                    summary,
                    description: per_zone_report(classifications),
                    labels: vec!["dnsbl-listing".to_string()],
                };
                with_retry(|| self.tracker.create_issue(issue.clone())).await?;
                Ok(TrackerAction::Create)
            }
            Some(ticket) => {
                let comment = format!("New listing observed: {}", canonical_zone_list(zones));
                if self.dry_run {
                    tracing::info!(ip = %ip, key = %ticket.key, %comment, "dry-run: would comment");
                    return Ok(TrackerAction::Comment);
                }
                with_retry(|| self.tracker.add_comment(&ticket.key, &comment)).await?;
                Ok(TrackerAction::Comment)
            }
        }
    }

    /// Never creates a ticket on a zone change, except the single documented
    /// recovery path: an operator closed the previous ticket manually, so no
    /// open ticket is found and one must be opened to keep tracking the IP.
    async fn on_zone_change(
        &self,
        ip: Ipv4Addr,
        zones: &[ZoneName],
        classifications: &BTreeMap<ZoneName, Classification>,
    ) -> Result<TrackerAction, DomainError> {
        match self.find_open_ticket(ip).await? {
            Some(ticket) => {
                let comment = format!("Blocking list set changed: now {}", canonical_zone_list(zones));
                if self.dry_run {
                    tracing::info!(ip = %ip, key = %ticket.key, %comment, "dry-run: would comment");
                    return Ok(TrackerAction::Comment);
                }
                with_retry(|| self.tracker.add_comment(&ticket.key, &comment)).await?;
                Ok(TrackerAction::Comment)
            }
            None => {
                let summary = ticket_summary(ip, zones);
                if self.dry_run {
                    tracing::info!(ip = %ip, %summary, "dry-run: would create ticket (recovery path)");
                    return Ok(TrackerAction::Create);
                }
                let issue = NewIssue {
                    issue_type: self.issue_type.clone(),
                    summary,
                    description: per_zone_report(classifications),
                    labels: vec!["dnsbl-listing".to_string()],
                };
                with_retry(|| self.tracker.create_issue(issue.clone())).await?;
                Ok(TrackerAction::Create)
            }
        }
    }

    /// Comments only; closing a ticket is always a human decision.
    async fn on_cleared(&self, ip: Ipv4Addr) -> Result<TrackerAction, DomainError> {
        match self.find_open_ticket(ip).await? {
            Some(ticket) => {
                let comment = "IP is now clean on all monitored lists.".to_string();
                if self.dry_run {
                    tracing::info!(ip = %ip, key = %ticket.key, "dry-run: would comment clean");
                    return Ok(TrackerAction::Comment);
                }
                with_retry(|| self.tracker.add_comment(&ticket.key, &comment)).await?;
                Ok(TrackerAction::Comment)
            }
            None => Ok(TrackerAction::None),
        }
    }
}
