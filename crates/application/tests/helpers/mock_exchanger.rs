use super::upstream_response;
use answer_application::ports::{Exchange, UpstreamExchanger};
use answer_domain::{DomainError, UpstreamAddr};
use async_trait::async_trait;
use hickory_proto::op::{Message, ResponseCode};
use std::collections::HashMap;
use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// What a scripted upstream does when asked.
#[derive(Clone)]
pub enum Outcome {
    Timeout,
    Malformed,
    Rcode(ResponseCode),
    Answer(Vec<Ipv4Addr>),
}

#[derive(Clone, Default)]
pub struct MockExchanger {
    outcomes: Arc<RwLock<HashMap<UpstreamAddr, Outcome>>>,
    attempts: Arc<RwLock<Vec<(UpstreamAddr, Message)>>>,
}

impl MockExchanger {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn script(&self, upstream: &UpstreamAddr, outcome: Outcome) {
        self.outcomes
            .write()
            .await
            .insert(upstream.clone(), outcome);
    }

    pub async fn attempted(&self) -> Vec<UpstreamAddr> {
        self.attempts
            .read()
            .await
            .iter()
            .map(|(upstream, _)| upstream.clone())
            .collect()
    }

    /// Requests exactly as they were sent upstream.
    pub async fn sent(&self) -> Vec<Message> {
        self.attempts
            .read()
            .await
            .iter()
            .map(|(_, request)| request.clone())
            .collect()
    }
}

#[async_trait]
impl UpstreamExchanger for MockExchanger {
    async fn exchange(
        &self,
        request: &Message,
        upstream: &UpstreamAddr,
    ) -> Result<Exchange, DomainError> {
        self.attempts
            .write()
            .await
            .push((upstream.clone(), request.clone()));

        let outcome = self.outcomes.read().await.get(upstream).cloned();
        let response = match outcome {
            Some(Outcome::Timeout) => {
                return Err(DomainError::TransportTimeout {
                    server: upstream.to_string(),
                })
            }
            Some(Outcome::Malformed) => {
                return Err(DomainError::InvalidDnsResponse(format!(
                    "truncated message from {}",
                    upstream
                )))
            }
            None => {
                return Err(DomainError::TransportIo {
                    server: upstream.to_string(),
                    reason: "connection refused".to_string(),
                })
            }
            Some(Outcome::Rcode(code)) => upstream_response(request, code, &[]),
            Some(Outcome::Answer(ips)) => upstream_response(request, ResponseCode::NoError, &ips),
        };

        Ok(Exchange {
            response,
            rtt: Duration::from_millis(3),
        })
    }

    fn protocol_name(&self) -> &'static str {
        "MOCK"
    }
}
