pub mod database;
pub mod dns;
pub mod store;
pub mod tracker;

pub use database::create_pool;
pub use dns::{HickoryDnsResolverAdapter, HickorySupplementalProbe};
pub use store::SqliteThrottleStore;
pub use tracker::RestTicketTrackerClient;
