pub mod dns_resolver;
pub mod supplemental_probe;
pub mod throttle_store;
pub mod ticket_tracker;

pub use dns_resolver::DnsResolverPort;
pub use supplemental_probe::SupplementalProbePort;
pub use throttle_store::{ThrottleStorePort, WriteOutcome};
pub use ticket_tracker::{NewIssue, TicketTrackerPort};
