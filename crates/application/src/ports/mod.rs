mod host_resolver;
mod upstream_exchanger;

pub use host_resolver::HostResolver;
pub use upstream_exchanger::{Exchange, UpstreamExchanger};
