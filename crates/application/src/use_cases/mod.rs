mod retry;

pub mod dns_failure_alert;
pub mod reconcile_ip;
pub mod ticket_deduplication;

pub use dns_failure_alert::DnsFailureAlertUseCase;
pub use reconcile_ip::{ReconcileIpUseCase, ReconcileOutcome};
pub use ticket_deduplication::{TicketDeduplicationUseCase, TrackerAction};
