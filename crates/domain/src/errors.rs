use thiserror::Error;

/// Error taxonomy for the reconciliation run.
///
/// Some variants are recovered at the boundary where they occur
/// (`DnsTransient`, `StoreConflict`), others are fatal to the whole run
/// (`StoreFatal`, `TrackerAuth`, `RunDeadline`).
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("invalid IPv4 address: {0}")]
    InvalidIpAddress(String),

    #[error("invalid zone name: {0}")]
    InvalidZoneName(String),

    #[error("throttle store connection failed: {0}")]
    StoreFatal(String),

    #[error("throttle store write affected zero rows for id {0}")]
    StoreConflict(i64),

    #[error("DNS query failed transiently: {0}")]
    DnsTransient(String),

    #[error("issue tracker call failed transiently: {0}")]
    TrackerTransient(String),

    #[error("issue tracker authentication failed: {0}")]
    TrackerAuth(String),

    #[error("issue tracker rejected the request: {0}")]
    TrackerRejected(String),

    #[error("issue tracker retries exhausted: {0}")]
    TrackerRetriesExhausted(String),

    #[error("run deadline exceeded after {0:?}")]
    RunDeadline(std::time::Duration),
}

impl DomainError {
    /// Whether this error should abort the whole run.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            DomainError::StoreFatal(_)
                | DomainError::TrackerAuth(_)
                | DomainError::TrackerRejected(_)
                | DomainError::TrackerRetriesExhausted(_)
                | DomainError::RunDeadline(_)
        )
    }
}
