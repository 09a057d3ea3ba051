use super::transport::resolver::resolve_upstream;
use super::transport::{create_transport, Timeouts};
use answer_application::ports::{Exchange, UpstreamExchanger};
use answer_domain::{DomainError, ListenerTransport, UpstreamAddr};
use async_trait::async_trait;
use hickory_proto::op::Message;
use std::time::{Duration, Instant};
use tracing::debug;

/// Exchanges messages with upstreams over one network kind and fixed timeouts.
pub struct TransportExchanger {
    kind: ListenerTransport,
    timeouts: Timeouts,
}

impl TransportExchanger {
    pub fn new(kind: ListenerTransport, read_timeout: Duration, write_timeout: Duration) -> Self {
        Self {
            kind,
            timeouts: Timeouts::new(read_timeout, write_timeout),
        }
    }
}

#[async_trait]
impl UpstreamExchanger for TransportExchanger {
    async fn exchange(
        &self,
        request: &Message,
        upstream: &UpstreamAddr,
    ) -> Result<Exchange, DomainError> {
        let message_bytes = request
            .to_vec()
            .map_err(|e| DomainError::Codec(e.to_string()))?;

        let server_addr = resolve_upstream(upstream, self.timeouts.lookup()).await?;
        let transport = create_transport(self.kind, server_addr);

        let start = Instant::now();
        let response = transport.send(&message_bytes, self.timeouts).await?;
        let rtt = start.elapsed();

        let message = Message::from_vec(&response.bytes).map_err(|e| {
            DomainError::InvalidDnsResponse(format!("{} from {}", e, upstream))
        })?;

        if message.id() != request.id() {
            return Err(DomainError::IdMismatch {
                server: upstream.to_string(),
                expected: request.id(),
                received: message.id(),
            });
        }

        debug!(
            server = %upstream,
            protocol = response.protocol_used,
            rtt_ms = rtt.as_millis() as u64,
            bytes = response.bytes.len(),
            "Upstream exchange complete"
        );

        Ok(Exchange {
            response: message,
            rtt,
        })
    }

    fn protocol_name(&self) -> &'static str {
        self.kind.as_str()
    }
}
