//! IP-query formatter: builds DNSBL lookup names from an IPv4 address.

use crate::errors::DomainError;
use crate::zone::ZoneName;
use std::net::Ipv4Addr;

/// Builds the reverse-octet DNSBL query name for `ip` under `zone`.
///
/// `203.0.113.45` with zone `zen.example.org` becomes
/// `45.113.0.203.zen.example.org`.
pub fn format_query_name(ip: Ipv4Addr, zone: &ZoneName) -> String {
    let [a, b, c, d] = ip.octets();
    format!("{d}.{c}.{b}.{a}.{}", zone.as_str())
}

/// Parses a dotted-quad string, rejecting anything that is not exactly four
/// decimal octets in 0..=255.
pub fn parse_ipv4(raw: &str) -> Result<Ipv4Addr, DomainError> {
    let parts: Vec<&str> = raw.split('.').collect();
    if parts.len() != 4 {
        return Err(DomainError::InvalidIpAddress(raw.to_string()));
    }
    let mut octets = [0u8; 4];
    for (slot, part) in octets.iter_mut().zip(parts.iter()) {
        if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DomainError::InvalidIpAddress(raw.to_string()));
        }
        *slot = part
            .parse::<u16>()
            .ok()
            .filter(|v| *v <= 255)
            .ok_or_else(|| DomainError::InvalidIpAddress(raw.to_string()))? as u8;
    }
    Ok(Ipv4Addr::from(octets))
}
