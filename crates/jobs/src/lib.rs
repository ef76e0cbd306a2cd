pub mod reconciliation;

pub use reconciliation::{PerIpRecord, ReconciliationJob, RunSummary};
