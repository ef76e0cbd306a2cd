//! Mirrors one row of the mail server's throttle table — persisted
//! externally, owned by that schema. This is the in-memory shape the
//! reconciler reads and the writer (`crates/infrastructure::store`) maps
//! rows into/out of.

use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IpRecord {
    pub id: i64,
    pub ip: Ipv4Addr,
    pub priority: i64,
    pub old_priority: Option<i64>,
    /// Canonical form: "" when clean, else comma-joined sorted zone names.
    pub blocking_lists: String,
    pub last_event: Option<String>,
}

impl IpRecord {
    /// `blockingLists` is empty iff the IP is in the clean state.
    pub fn is_clean(&self) -> bool {
        self.blocking_lists.is_empty()
    }

    /// `oldPriority` is non-null iff the IP is in the listed state.
    pub fn invariant_holds(&self) -> bool {
        self.blocking_lists.is_empty() == self.old_priority.is_none()
    }
}
