pub mod dns_fanout_checker;
pub mod health_aggregator;

pub use dns_fanout_checker::DnsFanoutChecker;
pub use health_aggregator::HealthAggregator;
