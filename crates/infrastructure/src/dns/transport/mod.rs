pub mod resolver;
pub mod tcp;
pub mod udp;

use answer_domain::{DomainError, ListenerTransport};
use async_trait::async_trait;
use std::net::SocketAddr;
use std::time::Duration;

/// Upper bound on a DNS message over either transport.
pub const MAX_MESSAGE_SIZE: usize = 65535;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub read: Duration,
    pub write: Duration,
}

impl Timeouts {
    pub fn new(read: Duration, write: Duration) -> Self {
        Self { read, write }
    }

    /// Budget for resolving a hostname upstream. Waiting on a lookup is a read.
    pub fn lookup(&self) -> Duration {
        self.read
    }
}

#[derive(Debug)]
pub struct TransportResponse {
    pub bytes: Vec<u8>,

    pub protocol_used: &'static str,
}

#[async_trait]
pub trait DnsTransport: Send + Sync {
    async fn send(
        &self,
        message_bytes: &[u8],
        timeouts: Timeouts,
    ) -> Result<TransportResponse, DomainError>;
}

pub enum Transport {
    Udp(udp::UdpTransport),
    Tcp(tcp::TcpTransport),
}

impl Transport {
    pub async fn send(
        &self,
        message_bytes: &[u8],
        timeouts: Timeouts,
    ) -> Result<TransportResponse, DomainError> {
        match self {
            Self::Udp(t) => DnsTransport::send(t, message_bytes, timeouts).await,
            Self::Tcp(t) => DnsTransport::send(t, message_bytes, timeouts).await,
        }
    }
}

/// Forwarding always uses the same network kind the query arrived on.
pub fn create_transport(kind: ListenerTransport, server_addr: SocketAddr) -> Transport {
    match kind {
        ListenerTransport::Udp => Transport::Udp(udp::UdpTransport::new(server_addr)),
        ListenerTransport::Tcp => Transport::Tcp(tcp::TcpTransport::new(server_addr)),
    }
}

pub(crate) fn io_error(server: SocketAddr, action: &str, e: std::io::Error) -> DomainError {
    DomainError::TransportIo {
        server: server.to_string(),
        reason: format!("{}: {}", action, e),
    }
}

pub(crate) fn timeout_error(server: SocketAddr) -> DomainError {
    DomainError::TransportTimeout {
        server: server.to_string(),
    }
}
