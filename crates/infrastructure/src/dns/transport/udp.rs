//! UDP transport for upstream exchanges (RFC 1035 §4.2.1).
//!
//! Messages are sent unframed. The receive buffer is sized for the 65535-byte
//! payload advertised through EDNS(0) on UDP-originated requests.

use super::{io_error, timeout_error, DnsTransport, Timeouts, TransportResponse, MAX_MESSAGE_SIZE};
use async_trait::async_trait;
use answer_domain::DomainError;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use tokio::net::UdpSocket;
use tracing::debug;

pub struct UdpTransport {
    server_addr: SocketAddr,
}

impl UdpTransport {
    pub fn new(server_addr: SocketAddr) -> Self {
        Self { server_addr }
    }

    fn bind_addr(&self) -> SocketAddr {
        if self.server_addr.is_ipv4() {
            SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0))
        } else {
            SocketAddr::from((Ipv6Addr::UNSPECIFIED, 0))
        }
    }
}

#[async_trait]
impl DnsTransport for UdpTransport {
    async fn send(
        &self,
        message_bytes: &[u8],
        timeouts: Timeouts,
    ) -> Result<TransportResponse, DomainError> {
        let server = self.server_addr;

        let socket = UdpSocket::bind(self.bind_addr())
            .await
            .map_err(|e| io_error(server, "bind", e))?;
        socket
            .connect(server)
            .await
            .map_err(|e| io_error(server, "connect", e))?;

        let bytes_sent = tokio::time::timeout(timeouts.write, socket.send(message_bytes))
            .await
            .map_err(|_| timeout_error(server))?
            .map_err(|e| io_error(server, "send", e))?;

        debug!(server = %server, bytes_sent, "UDP query sent");

        let mut recv_buf = vec![0u8; MAX_MESSAGE_SIZE];
        let bytes_received = tokio::time::timeout(timeouts.read, socket.recv(&mut recv_buf))
            .await
            .map_err(|_| timeout_error(server))?
            .map_err(|e| io_error(server, "receive", e))?;

        recv_buf.truncate(bytes_received);

        debug!(server = %server, bytes_received, "UDP response received");

        Ok(TransportResponse {
            bytes: recv_buf,
            protocol_used: "UDP",
        })
    }
}
