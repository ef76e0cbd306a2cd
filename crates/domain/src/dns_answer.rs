//! DNSBL response classifier types, following RFC 5782 semantics.

use crate::zone::ZoneName;
use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;

/// Why a lookup resolved to UNKNOWN instead of a definite LISTED/NOT_LISTED.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// One or more A records were returned but none fell in 127.0.0.0/8.
    InvalidResponseRange,
    /// A non-A record was returned where an A record was expected.
    InvalidResponseType,
    /// The query did not complete within its deadline.
    Timeout,
    /// Negative response with no corroborating SOA for the configured zone —
    /// the zone apex itself could not be confirmed alive.
    NxdomainZone,
    /// SERVFAIL, nameserver unreachable, or any other resolver-side failure.
    ResolverError,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::InvalidResponseRange => "invalid_response_range",
            FailureKind::InvalidResponseType => "invalid_response_type",
            FailureKind::Timeout => "timeout",
            FailureKind::NxdomainZone => "nxdomain_zone",
            FailureKind::ResolverError => "resolver_error",
        }
    }
}

/// The total classification of a single (ip, zone) query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Classification {
    Listed { addresses: Vec<Ipv4Addr> },
    NotListed,
    Unknown { failure: FailureKind },
}

impl Classification {
    pub fn is_listed(&self) -> bool {
        matches!(self, Classification::Listed { .. })
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            Classification::Unknown { failure } => Some(*failure),
            _ => None,
        }
    }
}

/// ⟨ip, zone, classification⟩ — the transient result of one DNSBL query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DnsAnswer {
    pub ip: Ipv4Addr,
    pub zone: ZoneName,
    pub classification: Classification,
}

/// `127.0.0.0/8` per RFC 5782 — the range a LISTED response must fall in.
pub fn is_in_loopback_block(addr: &Ipv4Addr) -> bool {
    addr.octets()[0] == 127
}

/// Classifies a resolved set of A records (all addresses for one query).
/// Total over the set of possible address lists: empty is never passed here
/// (an empty RRset with NOERROR is itself a resolver anomaly and is mapped
/// to `ResolverError` by the caller before reaching this function).
pub fn classify_addresses(addresses: &[Ipv4Addr]) -> Classification {
    if addresses.is_empty() {
        return Classification::Unknown {
            failure: FailureKind::ResolverError,
        };
    }
    if addresses.iter().all(is_in_loopback_block) {
        Classification::Listed {
            addresses: addresses.to_vec(),
        }
    } else {
        Classification::Unknown {
            failure: FailureKind::InvalidResponseRange,
        }
    }
}
