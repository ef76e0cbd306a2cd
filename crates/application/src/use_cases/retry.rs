//! Bounded backoff for tracker calls: every call is wrapped in a bounded
//! retry, retried at 2s, 4s, 8s (cumulative <=14s); once retries are
//! exhausted the failure is fatal.

use dnsbl_reconciler_domain::DomainError;
use std::future::Future;
use std::time::Duration;

const BACKOFF: [Duration; 3] = [
    Duration::from_secs(2),
    Duration::from_secs(4),
    Duration::from_secs(8),
];

/// Retries `call` on `TrackerTransient` only. `TrackerAuth` and every other
/// variant propagate immediately, unretried, per the error taxonomy.
pub(crate) async fn with_retry<T, F, Fut>(mut call: F) -> Result<T, DomainError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, DomainError>>,
{
    let mut attempt = 0usize;
    loop {
        match call().await {
            Ok(value) => return Ok(value),
            Err(DomainError::TrackerTransient(msg)) => {
                if attempt >= BACKOFF.len() {
                    return Err(DomainError::TrackerRetriesExhausted(msg));
                }
                tokio::time::sleep(BACKOFF[attempt]).await;
                attempt += 1;
            }
            Err(other) => return Err(other),
        }
    }
}
