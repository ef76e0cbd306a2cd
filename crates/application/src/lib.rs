pub mod ports;
pub mod services;
pub mod use_cases;

pub use ports::{DnsResolverPort, NewIssue, SupplementalProbePort, TicketTrackerPort, ThrottleStorePort, WriteOutcome};
pub use services::{DnsFanoutChecker, HealthAggregator};
pub use use_cases::{DnsFailureAlertUseCase, ReconcileIpUseCase, ReconcileOutcome, TicketDeduplicationUseCase, TrackerAction};
