//! Answer Domain Layer
pub mod config;
pub mod dns_protocol;
pub mod dns_record;
pub mod errors;

pub use config::{
    CliOverrides, Config, ConfigError, DnsConfig, LogLevel, LoggingConfig, ServerConfig,
    NOTICE_TARGET,
};
pub use dns_protocol::{ListenerTransport, UpstreamAddr, DEFAULT_DNS_PORT};
pub use dns_record::{MailExchanger, RecordType};
pub use errors::DomainError;
