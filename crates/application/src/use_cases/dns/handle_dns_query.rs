use super::{ForwardQueryUseCase, ResolveQueryUseCase};
use answer_domain::ListenerTransport;
use hickory_proto::op::{Edns, Message};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{debug, info};

/// EDNS0 payload size advertised upstream for UDP-originated requests.
pub const UDP_PAYLOAD_SIZE: u16 = 65535;

/// Per-request entry point shared by every connection of one listener.
pub struct HandleDnsQueryUseCase {
    transport: ListenerTransport,
    resolve: Arc<ResolveQueryUseCase>,
    forward: Option<ForwardQueryUseCase>,
}

impl HandleDnsQueryUseCase {
    pub fn new(transport: ListenerTransport, resolve: Arc<ResolveQueryUseCase>) -> Self {
        Self {
            transport,
            resolve,
            forward: None,
        }
    }

    /// Enables fallback to upstreams. A forwarder without upstreams is ignored.
    pub fn with_forwarding(mut self, forward: ForwardQueryUseCase) -> Self {
        self.forward = (!forward.upstreams().is_empty()).then_some(forward);
        self
    }

    pub fn transport(&self) -> ListenerTransport {
        self.transport
    }

    pub fn forwards(&self) -> bool {
        self.forward.is_some()
    }

    pub async fn execute(&self, mut request: Message, peer: SocketAddr) -> Message {
        info!(peer = %peer, transport = %self.transport, id = request.id(), "Query received");

        let mut reply = self.resolve.execute(&request).await;

        if reply.answers().is_empty() {
            if let Some(forward) = &self.forward {
                if self.transport == ListenerTransport::Udp {
                    advertise_udp_payload(&mut request);
                }
                debug!(peer = %peer, transport = %self.transport, "No local answer, forwarding");
                reply = forward.execute(&request).await;
            }
        }

        for answer in reply.answers() {
            info!(peer = %peer, transport = %self.transport, answer = %answer, "Answer");
        }

        reply
    }
}

/// Declares a 65535-byte UDP payload with the DO bit set, keeping any other
/// EDNS settings of the request. An existing OPT is updated, never duplicated.
fn advertise_udp_payload(request: &mut Message) {
    let mut edns = request.extensions().clone().unwrap_or_else(Edns::new);
    edns.set_max_payload(UDP_PAYLOAD_SIZE).set_dnssec_ok(true);
    request.set_edns(edns);
}
