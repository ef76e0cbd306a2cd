use async_trait::async_trait;
use dnsbl_reconciler_domain::SupplementalProbeResult;

/// Supplemental probe port: checks reachability of well-known public
/// resolvers when the configured DNSBL zones look widely broken.
#[async_trait]
pub trait SupplementalProbePort: Send + Sync {
    async fn probe(&self) -> SupplementalProbeResult;
}
