//! Ticket — external, owned by the issue tracker. The core only needs a
//! deterministic summary, an open/closed classification, and the ability to
//! create/comment on one; it never models the tracker's full schema.

use crate::zone::ZoneName;
use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;

/// Status as reported by the tracker. Open/closed is derived externally by
/// comparing `name` against the configured exclusion list — this type just
/// carries what the tracker told us.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueStatus {
    pub name: String,
}

impl IssueStatus {
    /// Closed iff its status name is in the configured exclusion list.
    pub fn is_excluded(&self, excluded_statuses: &[String]) -> bool {
        excluded_statuses
            .iter()
            .any(|s| s.eq_ignore_ascii_case(&self.name))
    }
}

/// A tracker issue as the core cares about it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    pub key: String,
    pub summary: String,
    pub status: IssueStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Canonical ticket summary: `"IP <ip> blacklisted by <canonical(zones)>"`.
pub fn ticket_summary(ip: Ipv4Addr, zones: &[ZoneName]) -> String {
    format!(
        "IP {} blacklisted by {}",
        ip,
        crate::transition::canonical_zone_list(zones)
    )
}

/// The substring used by the ticket-search summary-contains filter: `"IP <ip>"`.
pub fn search_token(ip: Ipv4Addr) -> String {
    format!("IP {}", ip)
}
