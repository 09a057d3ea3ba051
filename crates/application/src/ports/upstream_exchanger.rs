use answer_domain::{DomainError, UpstreamAddr};
use async_trait::async_trait;
use hickory_proto::op::Message;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Exchange {
    pub response: Message,

    pub rtt: Duration,
}

/// One query/response round trip with an upstream server, bounded by the
/// exchanger's configured timeouts.
#[async_trait]
pub trait UpstreamExchanger: Send + Sync {
    async fn exchange(
        &self,
        request: &Message,
        upstream: &UpstreamAddr,
    ) -> Result<Exchange, DomainError>;

    fn protocol_name(&self) -> &'static str;
}
