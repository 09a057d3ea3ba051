use serde::{Deserialize, Serialize};

use super::dns::DnsConfig;
use super::errors::ConfigError;
use super::logging::{LogLevel, LoggingConfig};
use super::server::ServerConfig;
use crate::UpstreamAddr;

const LOCAL_CONFIG_PATH: &str = "answer.toml";
const SYSTEM_CONFIG_PATH: &str = "/etc/answer/config.toml";

/// Main configuration structure for Answer
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Listener configuration (address, timeouts)
    #[serde(default)]
    pub server: ServerConfig,

    /// Forwarding configuration
    #[serde(default)]
    pub dns: DnsConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from file or use defaults
    ///
    /// Priority order:
    /// 1. Explicitly provided path
    /// 2. answer.toml in current directory
    /// 3. /etc/answer/config.toml
    /// 4. Default configuration
    pub fn load(path: Option<&str>, cli_overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = path {
            Self::from_file(path)?
        } else if std::path::Path::new(LOCAL_CONFIG_PATH).exists() {
            Self::from_file(LOCAL_CONFIG_PATH)?
        } else if std::path::Path::new(SYSTEM_CONFIG_PATH).exists() {
            Self::from_file(SYSTEM_CONFIG_PATH)?
        } else {
            Self::default()
        };

        config.apply_cli_overrides(cli_overrides);
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;
        toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    fn apply_cli_overrides(&mut self, overrides: CliOverrides) {
        if let Some(host) = overrides.host {
            self.server.host = host;
        }
        if let Some(port) = overrides.port {
            self.server.port = port;
        }
        if let Some(timeout) = overrides.read_timeout {
            self.server.read_timeout = timeout;
        }
        if let Some(timeout) = overrides.write_timeout {
            self.server.write_timeout = timeout;
        }
        if !overrides.upstream_servers.is_empty() {
            self.dns.upstream_servers = overrides.upstream_servers;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
        if let Some(file) = overrides.log_file {
            self.logging.file = Some(file);
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("DNS port cannot be 0".to_string()));
        }
        if self.server.host.trim().is_empty() {
            return Err(ConfigError::Validation("Host cannot be empty".to_string()));
        }
        if self.server.read_timeout == 0 || self.server.write_timeout == 0 {
            return Err(ConfigError::Validation(
                "Read and write timeouts must be at least one second".to_string(),
            ));
        }
        self.upstreams()?;
        Ok(())
    }

    /// Upstream servers normalized to `host:port`, in configured order.
    pub fn upstreams(&self) -> Result<Vec<UpstreamAddr>, ConfigError> {
        self.dns
            .upstream_servers
            .iter()
            .map(|s| {
                s.parse::<UpstreamAddr>()
                    .map_err(|e| ConfigError::Validation(e.to_string()))
            })
            .collect()
    }

    /// Get the path to the configuration file being used
    pub fn get_config_path() -> Option<String> {
        if std::path::Path::new(LOCAL_CONFIG_PATH).exists() {
            Some(LOCAL_CONFIG_PATH.to_string())
        } else if std::path::Path::new(SYSTEM_CONFIG_PATH).exists() {
            Some(SYSTEM_CONFIG_PATH.to_string())
        } else {
            None
        }
    }
}

/// Command-line overrides for configuration
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub read_timeout: Option<u64>,
    pub write_timeout: Option<u64>,
    pub upstream_servers: Vec<String>,
    pub log_level: Option<LogLevel>,
    pub log_file: Option<String>,
}
