pub mod probe;
pub mod resolver;

pub use probe::HickorySupplementalProbe;
pub use resolver::HickoryDnsResolverAdapter;
