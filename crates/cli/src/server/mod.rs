pub mod dns;

pub use dns::DnsServers;
