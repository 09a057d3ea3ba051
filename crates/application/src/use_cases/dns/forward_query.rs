use super::reply::reply_to;
use crate::ports::UpstreamExchanger;
use answer_domain::UpstreamAddr;
use hickory_proto::op::{Message, ResponseCode};
use std::sync::Arc;
use tracing::{info, warn};

/// Relays a request to upstream servers, strictly in configured order.
pub struct ForwardQueryUseCase {
    exchanger: Arc<dyn UpstreamExchanger>,
    upstreams: Arc<[UpstreamAddr]>,
}

impl ForwardQueryUseCase {
    pub fn new(exchanger: Arc<dyn UpstreamExchanger>, upstreams: Arc<[UpstreamAddr]>) -> Self {
        Self {
            exchanger,
            upstreams,
        }
    }

    pub fn upstreams(&self) -> &[UpstreamAddr] {
        &self.upstreams
    }

    /// Returns the first NOERROR response verbatim, even with an empty answer
    /// section. When every upstream fails the reply is an empty NOERROR.
    pub async fn execute(&self, request: &Message) -> Message {
        let protocol = self.exchanger.protocol_name();

        for upstream in self.upstreams.iter() {
            match self.exchanger.exchange(request, upstream).await {
                Ok(exchange) if exchange.response.response_code() == ResponseCode::NoError => {
                    info!(
                        server = %upstream,
                        protocol,
                        rtt_ms = exchange.rtt.as_millis() as u64,
                        answers = exchange.response.answers().len(),
                        "Upstream answered"
                    );
                    return exchange.response;
                }
                Ok(exchange) => {
                    warn!(
                        server = %upstream,
                        protocol,
                        rcode = %exchange.response.response_code(),
                        "Upstream returned error code, trying next"
                    );
                }
                Err(e) if e.is_transport_error() => {
                    warn!(server = %upstream, protocol, error = %e, "Upstream unreachable, trying next");
                }
                Err(e) => {
                    warn!(server = %upstream, protocol, error = %e, "Upstream response unusable, trying next");
                }
            }
        }

        warn!(
            servers = self.upstreams.len(),
            protocol, "All upstreams failed, replying with empty answer"
        );
        reply_to(request)
    }
}
