use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DnsConfig {
    /// Tried strictly in order. Empty disables forwarding.
    #[serde(default)]
    pub upstream_servers: Vec<String>,

    /// TTL stamped on answers produced by the host resolver.
    #[serde(default)]
    pub answer_ttl: u32,
}
