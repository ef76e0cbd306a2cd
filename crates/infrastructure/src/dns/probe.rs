//! Supplemental probe: two independent A-record queries for a well-known
//! domain, one per hard-wired public resolver.

use async_trait::async_trait;
use dnsbl_reconciler_application::SupplementalProbePort;
use dnsbl_reconciler_domain::SupplementalProbeResult;
use hickory_resolver::config::{NameServerConfigGroup, ResolverConfig};
use hickory_resolver::name_server::TokioConnectionProvider;
use hickory_resolver::TokioResolver;
use std::time::Duration;

const PROBE_DOMAIN: &str = "www.google.com.";
const PROBE_TIMEOUT: Duration = Duration::from_secs(2);

pub struct HickorySupplementalProbe {
    enabled: bool,
    cloudflare: TokioResolver,
    google: TokioResolver,
}

impl HickorySupplementalProbe {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            cloudflare: build_resolver(NameServerConfigGroup::cloudflare()),
            google: build_resolver(NameServerConfigGroup::google()),
        }
    }

    async fn reachable(resolver: &TokioResolver) -> bool {
        matches!(
            tokio::time::timeout(PROBE_TIMEOUT, resolver.lookup_ip(PROBE_DOMAIN)).await,
            Ok(Ok(response)) if response.iter().next().is_some()
        )
    }
}

fn build_resolver(nameservers: NameServerConfigGroup) -> TokioResolver {
    TokioResolver::builder_with_config(
        ResolverConfig::from_parts(None, vec![], nameservers),
        TokioConnectionProvider::default(),
    )
    .build()
}

#[async_trait]
impl SupplementalProbePort for HickorySupplementalProbe {
    async fn probe(&self) -> SupplementalProbeResult {
        if !self.enabled {
            return SupplementalProbeResult::disabled();
        }

        let (cloudflare_reachable, google_reachable) = tokio::join!(
            Self::reachable(&self.cloudflare),
            Self::reachable(&self.google),
        );

        SupplementalProbeResult {
            check_enabled: true,
            cloudflare_reachable,
            google_reachable,
        }
    }
}
