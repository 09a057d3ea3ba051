use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Seconds. Bounds listener reads, upstream receives and upstream hostname lookups.
    #[serde(default = "default_timeout")]
    pub read_timeout: u64,

    /// Seconds. Bounds upstream connects and sends.
    #[serde(default = "default_timeout")]
    pub write_timeout: u64,
}

impl ServerConfig {
    /// `host:port`, bracketing IPv6 literals.
    pub fn bind_address(&self) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout)
    }

    pub fn write_timeout(&self) -> Duration {
        Duration::from_secs(self.write_timeout)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            read_timeout: default_timeout(),
            write_timeout: default_timeout(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    53
}

fn default_timeout() -> u64 {
    5
}
