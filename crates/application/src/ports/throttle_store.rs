use async_trait::async_trait;
use dnsbl_reconciler_domain::{DomainError, IpRecord, ZoneName};

/// Whether the underlying store actually changed a row. The writer reports
/// back whether the underlying store reported zero rows affected, but never
/// treats a zero-affected result as an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOutcome {
    pub rows_affected: u64,
}

impl WriteOutcome {
    pub fn changed(&self) -> bool {
        self.rows_affected > 0
    }
}

/// Throttle-store writer port.
///
/// Exactly three conditional-update operations, one per non-NoOp
/// `Transition` variant, plus the single-row read the orchestrator needs to
/// fetch the fleet. Every write is a single-row, single-transaction,
/// read-committed conditional update whose guard makes repeated application
/// a no-op.
#[async_trait]
pub trait ThrottleStorePort: Send + Sync {
    async fn fetch_ip_records(&self) -> Result<Vec<IpRecord>, DomainError>;

    /// Sets priority to `listed_priority`, captures `oldPriority` only if it
    /// is currently null, sets `blockingLists`/`lastEvent`. Guard: refuses to
    /// write if `blockingLists` already equals `canonical(zones)`.
    async fn apply_new_listing(
        &self,
        id: i64,
        zones: &[ZoneName],
        listed_priority: i64,
    ) -> Result<WriteOutcome, DomainError>;

    /// Updates only `blockingLists`/`lastEvent`. Same guard as NewListing.
    async fn apply_zone_change(
        &self,
        id: i64,
        zones: &[ZoneName],
    ) -> Result<WriteOutcome, DomainError>;

    /// Restores `priority` from `oldPriority` (or `fallback_priority` if
    /// null), clears `oldPriority`/`blockingLists`, sets `lastEvent`. Guard:
    /// only writes if `blockingLists` is currently non-empty.
    async fn apply_cleared(
        &self,
        id: i64,
        fallback_priority: i64,
    ) -> Result<WriteOutcome, DomainError>;
}
