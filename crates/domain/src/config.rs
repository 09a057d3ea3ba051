pub mod dns;
pub mod errors;
pub mod logging;
pub mod root;
pub mod server;

pub use dns::DnsConfig;
pub use errors::ConfigError;
pub use logging::{LogLevel, LoggingConfig, NOTICE_TARGET};
pub use root::{CliOverrides, Config};
pub use server::ServerConfig;
