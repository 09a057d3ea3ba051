use crate::DomainError;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::sync::Arc;

pub const DEFAULT_DNS_PORT: u16 = 53;

/// Transport a listener accepts queries on. Each listener forwards over the same kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerTransport {
    Tcp,
    Udp,
}

impl ListenerTransport {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListenerTransport::Tcp => "TCP",
            ListenerTransport::Udp => "UDP",
        }
    }
}

impl fmt::Display for ListenerTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Represents an upstream server address that may or may not be resolved to an IP.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum UpstreamAddr {
    Resolved(SocketAddr),
    Unresolved { hostname: Arc<str>, port: u16 },
}

impl fmt::Display for UpstreamAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpstreamAddr::Resolved(addr) => write!(f, "{}", addr),
            UpstreamAddr::Unresolved { hostname, port } => write!(f, "{}:{}", hostname, port),
        }
    }
}

/// Splits `host:port` or `[v6]:port`. Returns `None` when no port is present.
fn parse_host_port(s: &str) -> Result<Option<(&str, u16)>, DomainError> {
    let invalid = || DomainError::InvalidUpstreamAddress(s.to_string());

    if let Some(rest) = s.strip_prefix('[') {
        let end = rest.find(']').ok_or_else(invalid)?;
        let host = &rest[..end];
        let tail = &rest[end + 1..];
        if tail.is_empty() {
            return Ok(Some((host, DEFAULT_DNS_PORT)));
        }
        let port = tail
            .strip_prefix(':')
            .and_then(|p| p.parse::<u16>().ok())
            .ok_or_else(invalid)?;
        return Ok(Some((host, port)));
    }

    match s.rsplit_once(':') {
        Some((host, port_str)) if !host.contains(':') => {
            let port = port_str.parse::<u16>().map_err(|_| invalid())?;
            Ok(Some((host, port)))
        }
        _ => Ok(None),
    }
}

impl FromStr for UpstreamAddr {
    type Err = DomainError;

    /// Normalizes an upstream to `host:port`, applying port 53 to a bare host.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(DomainError::InvalidUpstreamAddress(s.to_string()));
        }

        if let Ok(addr) = s.parse::<SocketAddr>() {
            return Ok(UpstreamAddr::Resolved(addr));
        }
        if let Ok(ip) = s.parse::<IpAddr>() {
            return Ok(UpstreamAddr::Resolved(SocketAddr::new(ip, DEFAULT_DNS_PORT)));
        }

        let (host, port) = parse_host_port(s)?.unwrap_or((s, DEFAULT_DNS_PORT));
        if let Ok(ip) = host.parse::<IpAddr>() {
            return Ok(UpstreamAddr::Resolved(SocketAddr::new(ip, port)));
        }
        if host.is_empty() || host.contains(':') || host.contains(char::is_whitespace) {
            return Err(DomainError::InvalidUpstreamAddress(s.to_string()));
        }

        Ok(UpstreamAddr::Unresolved {
            hostname: host.into(),
            port,
        })
    }
}
