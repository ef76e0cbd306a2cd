use serde::{Deserialize, Serialize};
use std::fmt;

/// A configured DNSBL zone name, e.g. `zen.spamhaus.org`.
///
/// Kept as a thin newtype (rather than a bare `String`) so call sites that
/// take a zone can't accidentally be handed an IP or a free-form comment —
/// the same explicit-record-type preference applied at the config layer,
/// applied one level down.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ZoneName(pub String);

impl ZoneName {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ZoneName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ZoneName {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ZoneName {
    fn from(s: String) -> Self {
        Self(s)
    }
}
