use async_trait::async_trait;
use dnsbl_reconciler_domain::{Classification, ZoneName};
use std::net::Ipv4Addr;

/// DNS resolver contract: a recursive resolver reachable from the host,
/// answering A-record queries for arbitrary names with one of an RRset,
/// NXDOMAIN, SERVFAIL, or timeout.
///
/// The classifier is total, so this port never returns a `Result` — every
/// observable outcome of a recursive lookup maps onto a `Classification`,
/// including resolver-side failures (`Unknown`). The fan-out checker (not
/// this port) is responsible for enforcing the per-query deadline;
/// implementations should not impose their own timeout beyond what they're
/// asked to honor through the query itself.
#[async_trait]
pub trait DnsResolverPort: Send + Sync {
    /// Looks up the reverse-octet DNSBL name for `ip` under `zone` and
    /// classifies the result per RFC 5782 semantics.
    async fn lookup(&self, ip: Ipv4Addr, zone: &ZoneName) -> Classification;
}
