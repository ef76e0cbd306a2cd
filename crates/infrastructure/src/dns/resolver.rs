//! `DnsResolverPort` over `hickory-resolver`.
//!
//! Builds a `TokioResolver`, issues `lookup_ip` against the reverse-octet
//! query name, and classifies the result. Timeouts are enforced by the
//! caller (the fan-out checker), not here — this adapter reports whatever
//! the resolver itself returns.

use async_trait::async_trait;
use dnsbl_reconciler_application::DnsResolverPort;
use dnsbl_reconciler_domain::{classify_addresses, format_query_name, Classification, FailureKind, ZoneName};
use hickory_resolver::config::ResolverConfig;
use hickory_resolver::name_server::TokioConnectionProvider;
use hickory_resolver::ResolveErrorKind;
use hickory_resolver::TokioResolver;
use std::net::Ipv4Addr;

pub struct HickoryDnsResolverAdapter {
    resolver: TokioResolver,
}

impl HickoryDnsResolverAdapter {
    /// Uses the host's own system resolver configuration, falling back to
    /// hickory's bundled defaults if `/etc/resolv.conf` can't be read.
    pub fn from_system_config() -> Self {
        let resolver = TokioResolver::builder_tokio()
            .map(|b| b.build())
            .unwrap_or_else(|_| {
                TokioResolver::builder_with_config(
                    ResolverConfig::default(),
                    TokioConnectionProvider::default(),
                )
                .build()
            });
        Self { resolver }
    }

    /// Whether a negative-cache SOA's owner corroborates that `zone` itself
    /// exists — resolves the apex-vs-name NXDOMAIN ambiguity: the SOA owner
    /// must be `zone` or a parent of it.
    fn soa_confirms_zone(owner: &str, zone: &ZoneName) -> bool {
        let owner = owner.trim_end_matches('.');
        let zone = zone.as_str();
        owner == zone || zone.ends_with(&format!(".{owner}"))
    }
}

#[async_trait]
impl DnsResolverPort for HickoryDnsResolverAdapter {
    async fn lookup(&self, ip: Ipv4Addr, zone: &ZoneName) -> Classification {
        let query_name = format_query_name(ip, zone);

        match self.resolver.lookup_ip(query_name.as_str()).await {
            Ok(response) => {
                let addresses: Vec<Ipv4Addr> = response
                    .iter()
                    .filter_map(|addr| match addr {
                        std::net::IpAddr::V4(v4) => Some(v4),
                        std::net::IpAddr::V6(_) => None,
                    })
                    .collect();
                if addresses.is_empty() {
                    Classification::Unknown {
                        failure: FailureKind::InvalidResponseType,
                    }
                } else {
                    classify_addresses(&addresses)
                }
            }
            Err(err) => match err.kind() {
                ResolveErrorKind::NoRecordsFound { soa, .. } => match soa {
                    Some(soa_record) if Self::soa_confirms_zone(&soa_record.name().to_utf8(), zone) => {
                        Classification::NotListed
                    }
                    _ => Classification::Unknown {
                        failure: FailureKind::NxdomainZone,
                    },
                },
                ResolveErrorKind::Timeout => Classification::Unknown {
                    failure: FailureKind::Timeout,
                },
                _ => Classification::Unknown {
                    failure: FailureKind::ResolverError,
                },
            },
        }
    }
}
