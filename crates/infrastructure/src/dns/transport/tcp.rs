//! TCP transport for upstream exchanges (RFC 1035 §4.2.2): one connection per
//! exchange, messages framed with a two-byte length prefix.

use super::{io_error, timeout_error, DnsTransport, Timeouts, TransportResponse};
use async_trait::async_trait;
use answer_domain::DomainError;
use std::net::SocketAddr;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::debug;

pub struct TcpTransport {
    server_addr: SocketAddr,
}

impl TcpTransport {
    pub fn new(server_addr: SocketAddr) -> Self {
        Self { server_addr }
    }

    async fn connect(&self, timeouts: Timeouts) -> Result<TcpStream, DomainError> {
        let server = self.server_addr;

        let stream = tokio::time::timeout(timeouts.write, TcpStream::connect(server))
            .await
            .map_err(|_| timeout_error(server))?
            .map_err(|e| io_error(server, "connect", e))?;

        stream
            .set_nodelay(true)
            .map_err(|e| io_error(server, "set TCP_NODELAY", e))?;

        Ok(stream)
    }
}

#[async_trait]
impl DnsTransport for TcpTransport {
    async fn send(
        &self,
        message_bytes: &[u8],
        timeouts: Timeouts,
    ) -> Result<TransportResponse, DomainError> {
        let server = self.server_addr;
        let mut stream = self.connect(timeouts).await?;

        tokio::time::timeout(
            timeouts.write,
            send_with_length_prefix(&mut stream, message_bytes),
        )
        .await
        .map_err(|_| timeout_error(server))?
        .map_err(|e| io_error(server, "send", e))?;

        debug!(server = %server, message_len = message_bytes.len(), "TCP query sent");

        let response_bytes =
            tokio::time::timeout(timeouts.read, read_with_length_prefix(&mut stream))
                .await
                .map_err(|_| timeout_error(server))?
                .map_err(|e| io_error(server, "receive", e))?;

        debug!(server = %server, response_len = response_bytes.len(), "TCP response received");

        Ok(TransportResponse {
            bytes: response_bytes,
            protocol_used: "TCP",
        })
    }
}

pub(crate) async fn send_with_length_prefix<S>(
    stream: &mut S,
    message_bytes: &[u8],
) -> std::io::Result<()>
where
    S: AsyncWriteExt + Unpin,
{
    let length = u16::try_from(message_bytes.len()).map_err(|_| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("message of {} bytes exceeds TCP framing", message_bytes.len()),
        )
    })?;

    stream.write_all(&length.to_be_bytes()).await?;
    stream.write_all(message_bytes).await?;
    stream.flush().await
}

pub(crate) async fn read_with_length_prefix<S>(stream: &mut S) -> std::io::Result<Vec<u8>>
where
    S: AsyncReadExt + Unpin,
{
    let mut len_buf = [0u8; 2];
    stream.read_exact(&mut len_buf).await?;

    let response_len = u16::from_be_bytes(len_buf) as usize;

    let mut response = vec![0u8; response_len];
    stream.read_exact(&mut response).await?;

    Ok(response)
}
