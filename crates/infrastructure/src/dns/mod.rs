pub mod exchanger;
pub mod server;
pub mod system_resolver;
pub mod transport;

pub use exchanger::TransportExchanger;
pub use server::DnsServerHandler;
pub use system_resolver::SystemResolver;
